//! Domain Services - Logic that spans several model types
//!
//! - `maze_generator`: perfect maze carving
//! - `units`: the six mini-games behind the `GameUnit` contract
//! - `report`: labels and text summary for a finished session

pub mod maze_generator;
pub mod report;
pub mod units;

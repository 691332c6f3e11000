//! Maze Generator - Randomized recursive-backtracking carving
//!
//! Starting at (1, 1) every cell begins as wall. From the current cell the
//! four two-step directions are tried in a random order; a direction whose
//! target is an interior wall carves both the target and the cell between,
//! then carving continues from the target. When all four are exhausted the
//! carver backs up to the previous cell.
//!
//! New path is only ever carved into wall, and always as a pair joined to the
//! cell it came from, so the open cells form a tree: the result is a perfect
//! maze with exactly one simple path between any two open cells.
//!
//! The walk uses an explicit stack instead of recursion. Cells are visited in
//! the same order the recursive formulation would visit them, without tying
//! the maze size to the call-stack depth.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::model::maze::{Cell, Direction, Maze, Position};

/// Side length used when nothing else is configured
pub const DEFAULT_MAZE_SIZE: usize = 21;

/// One level of the carve
struct Frame {
    pos: Position,
    directions: [Direction; 4],
    next: usize,
}

impl Frame {
    fn new<R: Rng + ?Sized>(pos: Position, rng: &mut R) -> Self {
        let mut directions = Direction::all();
        directions.shuffle(rng);
        Self {
            pos,
            directions,
            next: 0,
        }
    }

    fn next_direction(&mut self) -> Option<Direction> {
        let direction = self.directions.get(self.next).copied();
        self.next += 1;
        direction
    }
}

/// Builds perfect mazes of a fixed odd size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MazeGenerator {
    size: usize,
}

impl MazeGenerator {
    /// `size` must be odd and at least 5
    pub fn new(size: usize) -> Result<Self, MazeError> {
        if size < 5 || size % 2 == 0 {
            return Err(MazeError::InvalidSize { size });
        }
        Ok(Self { size })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Carve a fresh maze
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Maze {
        let mut maze = Maze::filled(self.size);
        let start = maze.start();

        maze.set(start, Cell::Path);
        let mut stack = vec![Frame::new(start, rng)];

        while let Some(frame) = stack.last_mut() {
            let Some(direction) = frame.next_direction() else {
                stack.pop();
                continue;
            };
            let from = frame.pos;

            let target = match from.offset(direction, 2) {
                Some(target) if maze.is_interior(target) => target,
                _ => continue,
            };
            if maze.cell(target) != Cell::Wall {
                continue;
            }
            if let Some(between) = from.offset(direction, 1) {
                maze.set(between, Cell::Path);
            }
            maze.set(target, Cell::Path);
            stack.push(Frame::new(target, rng));
        }

        let exit = maze.exit();
        maze.set(start, Cell::Player);
        maze.set(exit, Cell::Exit);
        maze
    }
}

impl Default for MazeGenerator {
    fn default() -> Self {
        Self {
            size: DEFAULT_MAZE_SIZE,
        }
    }
}

/// Errors that can occur while setting up a generator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MazeError {
    InvalidSize { size: usize },
}

impl core::fmt::Display for MazeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            MazeError::InvalidSize { size } => {
                write!(f, "Maze size must be odd and at least 5, got {}", size)
            }
        }
    }
}

impl std::error::Error for MazeError {}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::{HashSet, VecDeque};

    fn reachable_from(maze: &Maze, start: Position) -> HashSet<Position> {
        let mut seen = HashSet::from([start]);
        let mut queue = VecDeque::from([start]);
        while let Some(pos) = queue.pop_front() {
            for next in maze.open_neighbours(pos) {
                if seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        seen
    }

    /// Undirected edges between horizontally or vertically adjacent open cells
    fn edge_count(maze: &Maze) -> usize {
        maze.open_cells()
            .map(|p| {
                [Direction::Right, Direction::Down]
                    .into_iter()
                    .filter_map(|d| p.offset(d, 1))
                    .filter(|n| maze.is_open(*n))
                    .count()
            })
            .sum()
    }

    /// Number of simple paths between two cells (exhaustive DFS)
    fn simple_paths(maze: &Maze, from: Position, to: Position) -> usize {
        fn walk(maze: &Maze, at: Position, to: Position, seen: &mut HashSet<Position>) -> usize {
            if at == to {
                return 1;
            }
            let mut total = 0;
            let neighbours: Vec<Position> = maze.open_neighbours(at).collect();
            for next in neighbours {
                if seen.insert(next) {
                    total += walk(maze, next, to, seen);
                    seen.remove(&next);
                }
            }
            total
        }
        let mut seen = HashSet::from([from]);
        walk(maze, from, to, &mut seen)
    }

    #[test]
    fn test_every_open_cell_is_reachable() {
        let generator = MazeGenerator::default();
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let maze = generator.generate(&mut rng);

            let reachable = reachable_from(&maze, maze.start());
            assert_eq!(reachable.len(), maze.open_cells().count(), "seed {}", seed);
            assert!(reachable.contains(&maze.exit()));
        }
    }

    #[test]
    fn test_open_cells_form_a_tree() {
        let generator = MazeGenerator::new(15).unwrap();
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let maze = generator.generate(&mut rng);

            // Connected with V - 1 edges means no cycles
            let open = maze.open_cells().count();
            assert_eq!(edge_count(&maze), open - 1, "seed {}", seed);
        }
    }

    #[test]
    fn test_exactly_one_path_from_start_to_exit() {
        let generator = MazeGenerator::new(9).unwrap();
        for seed in 0..10 {
            let mut rng = StdRng::seed_from_u64(seed);
            let maze = generator.generate(&mut rng);
            assert_eq!(simple_paths(&maze, maze.start(), maze.exit()), 1);
        }
    }

    #[test]
    fn test_every_odd_cell_is_carved() {
        let generator = MazeGenerator::default();
        let mut rng = StdRng::seed_from_u64(7);
        let maze = generator.generate(&mut rng);

        for y in (1..maze.size() - 1).step_by(2) {
            for x in (1..maze.size() - 1).step_by(2) {
                assert!(maze.is_open(Position::new(x, y)));
            }
        }
    }

    #[test]
    fn test_border_stays_wall_and_markers_placed() {
        let generator = MazeGenerator::default();
        let mut rng = StdRng::seed_from_u64(3);
        let maze = generator.generate(&mut rng);
        let n = maze.size();

        for i in 0..n {
            assert_eq!(maze.cell(Position::new(i, 0)), Cell::Wall);
            assert_eq!(maze.cell(Position::new(i, n - 1)), Cell::Wall);
            assert_eq!(maze.cell(Position::new(0, i)), Cell::Wall);
            assert_eq!(maze.cell(Position::new(n - 1, i)), Cell::Wall);
        }
        assert_eq!(maze.cell(Position::new(1, 1)), Cell::Player);
        assert_eq!(maze.cell(Position::new(n - 2, n - 2)), Cell::Exit);
        assert!(maze.is_well_formed());
    }

    #[test]
    fn test_same_seed_same_maze() {
        let generator = MazeGenerator::default();
        let a = generator.generate(&mut StdRng::seed_from_u64(99));
        let b = generator.generate(&mut StdRng::seed_from_u64(99));
        let c = generator.generate(&mut StdRng::seed_from_u64(100));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_invalid_sizes_rejected() {
        assert_eq!(MazeGenerator::new(4), Err(MazeError::InvalidSize { size: 4 }));
        assert!(MazeGenerator::new(3).is_err());
        assert!(MazeGenerator::new(5).is_ok());
    }
}

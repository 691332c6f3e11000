//! Countdown - The one-second timer every timed game runs on
//!
//! The host calls `tick()` once per second while a round is playing.
//! Expiry is reported exactly once; after expiry or `cancel()` every further
//! tick is a no-op, so a late tick can never touch a finished round.

use serde::{Deserialize, Serialize};

/// Where the countdown is in its life
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountdownStatus {
    Running,
    Expired,
    Cancelled,
}

/// What a single tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Still running, this many seconds left
    Running { remaining: u32 },
    /// Just reached zero (reported once)
    Expired,
    /// Already expired or cancelled; nothing happened
    Stopped,
}

/// Seconds-granularity countdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Countdown {
    remaining: u32,
    status: CountdownStatus,
}

impl Countdown {
    /// Start a running countdown
    pub fn start(seconds: u32) -> Self {
        Self {
            remaining: seconds,
            status: if seconds == 0 {
                CountdownStatus::Expired
            } else {
                CountdownStatus::Running
            },
        }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn status(&self) -> CountdownStatus {
        self.status
    }

    pub fn is_running(&self) -> bool {
        self.status == CountdownStatus::Running
    }

    /// Advance by one second
    pub fn tick(&mut self) -> Tick {
        if self.status != CountdownStatus::Running {
            return Tick::Stopped;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.status = CountdownStatus::Expired;
            Tick::Expired
        } else {
            Tick::Running {
                remaining: self.remaining,
            }
        }
    }

    /// Stop the countdown, keeping the remaining time
    ///
    /// Cancelling an expired countdown leaves it expired.
    pub fn cancel(&mut self) {
        if self.status == CountdownStatus::Running {
            self.status = CountdownStatus::Cancelled;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expires_exactly_once() {
        let mut countdown = Countdown::start(3);
        assert_eq!(countdown.tick(), Tick::Running { remaining: 2 });
        assert_eq!(countdown.tick(), Tick::Running { remaining: 1 });
        assert_eq!(countdown.tick(), Tick::Expired);

        for _ in 0..5 {
            assert_eq!(countdown.tick(), Tick::Stopped);
        }
        assert_eq!(countdown.remaining(), 0);
        assert_eq!(countdown.status(), CountdownStatus::Expired);
    }

    #[test]
    fn test_cancel_stops_ticks() {
        let mut countdown = Countdown::start(30);
        countdown.tick();
        countdown.cancel();

        assert_eq!(countdown.tick(), Tick::Stopped);
        assert_eq!(countdown.remaining(), 29);
        assert!(!countdown.is_running());
    }

    #[test]
    fn test_cancel_after_expiry_keeps_expired() {
        let mut countdown = Countdown::start(1);
        assert_eq!(countdown.tick(), Tick::Expired);
        countdown.cancel();
        assert_eq!(countdown.status(), CountdownStatus::Expired);
    }

    #[test]
    fn test_zero_length_is_already_expired() {
        let mut countdown = Countdown::start(0);
        assert_eq!(countdown.status(), CountdownStatus::Expired);
        assert_eq!(countdown.tick(), Tick::Stopped);
    }
}

//! Command values exchanged between producers and the dispatch queue.

use std::time::{Duration, Instant};

/// Highest value of the device position/speed range.
pub const PROTOCOL_MAX: u8 = 99;

/// Targets closer together than this many device units are "similar":
/// the older pending command carries no intent the newer one doesn't.
pub const SIMILARITY_WINDOW: u8 = 10;

/// A discrete instruction: move to a position at a speed, optionally with an
/// explicit duration. Immutable once created; all byte fields are clamped to
/// the protocol range at construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Command {
    pub position_from: u8,
    pub position_to: u8,
    pub speed: u8,
    pub duration: Duration,
}

impl Command {
    pub fn new(position_from: u8, position_to: u8, speed: u8, duration: Duration) -> Self {
        Self {
            position_from: position_from.min(PROTOCOL_MAX),
            position_to: position_to.min(PROTOCOL_MAX),
            speed: speed.min(PROTOCOL_MAX),
            duration,
        }
    }

    /// A move with no explicit duration (the firmware derives it from speed).
    pub fn to_position(position_to: u8, speed: u8) -> Self {
        Self::new(0, position_to, speed, Duration::ZERO)
    }
}

/// Default similarity predicate used for queue coalescing.
pub fn commands_are_similar(a: &Command, b: &Command) -> bool {
    a.position_to.abs_diff(b.position_to) < SIMILARITY_WINDOW
}

/// A command plus the instant it was handed to the queue. Owned by the queue
/// until dequeued, then transferred to the dispatcher.
#[derive(Debug, Clone)]
pub struct QueueEntry {
    pub command: Command,
    pub submitted_at: Instant,
}

impl QueueEntry {
    pub fn new(command: Command) -> Self {
        Self {
            command,
            submitted_at: Instant::now(),
        }
    }
}

pub mod clock;

pub use clock::{Clock, MonotonicClock};

use std::time::Duration;

/// Capability interface for anything that executes positional commands.
///
/// Implementations transmit a `(position, speed)` pair to a physical device
/// or a simulation of one. The call may block while the transport waits for
/// an acknowledgment. Errors cross the boundary as boxed errors so adapter
/// crates can keep their own typed enums.
pub trait Actuator {
    /// Move to `position_to` (0..=99) at `speed` (0..=99). `duration` is the
    /// producer's estimate of how long the move should take; device families
    /// that derive timing from speed alone may ignore it.
    fn set_command(
        &mut self,
        position_to: u8,
        speed: u8,
        duration: Duration,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    /// Halt any in-progress motion.
    fn stop(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

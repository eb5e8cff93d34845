//! Test and helper adapters for glide_core.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use glide_traits::Actuator;

/// Adapter that rejects every write; exercises the disconnect path.
pub struct FailingActuator;

impl Actuator for FailingActuator {
    fn set_command(
        &mut self,
        _position_to: u8,
        _speed: u8,
        _duration: Duration,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        Err(Box::new(std::io::Error::other("failing actuator")))
    }

    fn stop(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        Ok(())
    }
}

/// One observed adapter write.
#[derive(Debug, Clone, Copy)]
pub struct RecordedCommand {
    pub at: Instant,
    pub position_to: u8,
    pub speed: u8,
    pub duration: Duration,
}

/// Adapter that records every command it receives with its arrival time.
/// Clone the log handle before handing the actuator to a dispatcher.
#[derive(Default)]
pub struct RecordingActuator {
    log: Arc<Mutex<Vec<RecordedCommand>>>,
    stopped: Arc<Mutex<bool>>,
}

impl RecordingActuator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&self) -> Arc<Mutex<Vec<RecordedCommand>>> {
        Arc::clone(&self.log)
    }

    pub fn stopped_flag(&self) -> Arc<Mutex<bool>> {
        Arc::clone(&self.stopped)
    }
}

impl Actuator for RecordingActuator {
    fn set_command(
        &mut self,
        position_to: u8,
        speed: u8,
        duration: Duration,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(RecordedCommand {
                at: Instant::now(),
                position_to,
                speed,
                duration,
            });
        Ok(())
    }

    fn stop(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        *self.stopped.lock().unwrap_or_else(PoisonError::into_inner) = true;
        Ok(())
    }
}

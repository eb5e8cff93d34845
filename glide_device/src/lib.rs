//! Device-side adapters: protocol encoding and a simulated actuator.
//!
//! Real transports (Bluetooth characteristic plumbing) live behind the
//! `glide_traits::Actuator` seam and are not part of this crate; what lives
//! here is everything the relay needs to develop and test against without
//! hardware.

pub mod error;

use std::time::{Duration, Instant};

use error::DeviceError;
use glide_core::translator;
use glide_traits::{Actuator, Clock, MonotonicClock};

/// How a device family interprets `(position, speed)` pairs. Dispatched once
/// per write instead of through per-family subclasses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Protocol {
    /// Timed-move firmware: the raw pair is sent as-is and the device works
    /// out its own motion profile.
    #[default]
    TimedMove,
    /// Intensity-driven devices: the speed byte is rescaled into a
    /// normalized vibration level.
    Vibration,
}

/// A command encoded for a concrete device family.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProtocolCommand {
    Move { position: u8, speed: u8 },
    Intensity(f64),
}

impl Protocol {
    pub fn encode(self, position_to: u8, speed: u8) -> ProtocolCommand {
        match self {
            Self::TimedMove => ProtocolCommand::Move {
                position: position_to.min(99),
                speed: speed.min(99),
            },
            Self::Vibration => ProtocolCommand::Intensity(translator::speed_to_intensity(speed)),
        }
    }
}

/// Full travel lengths per second the device manages at maximum speed.
pub const LENGTHS_PER_SECOND: f32 = 6.0;

/// Development adapter that integrates commanded moves at the device's real
/// travel rate instead of writing to hardware. Useful for demos, the CLI
/// self-check, and tests that need an observable device.
pub struct SimulatedActuator<C: Clock = MonotonicClock> {
    clock: C,
    protocol: Protocol,
    /// Current travel position, 0..=99.
    position: f32,
    target: f32,
    speed: f32,
    intensity: f64,
    last_advance: Instant,
    writes: u64,
    severed: bool,
}

impl SimulatedActuator<MonotonicClock> {
    pub fn new(protocol: Protocol) -> Self {
        Self::with_clock(protocol, MonotonicClock::new())
    }
}

impl<C: Clock> SimulatedActuator<C> {
    pub fn with_clock(protocol: Protocol, clock: C) -> Self {
        let last_advance = clock.now();
        Self {
            clock,
            protocol,
            position: 0.0,
            target: 0.0,
            speed: 0.0,
            intensity: 0.0,
            last_advance,
            writes: 0,
            severed: false,
        }
    }

    /// Simulate the transport dropping out: every later write fails the way
    /// an unplugged device would.
    pub fn sever(&mut self) {
        self.severed = true;
    }

    pub fn position(&self) -> f32 {
        self.position
    }

    pub fn intensity(&self) -> f64 {
        self.intensity
    }

    pub fn writes(&self) -> u64 {
        self.writes
    }

    /// Integrate travel since the last observation at the commanded speed.
    fn advance(&mut self) {
        let now = self.clock.now();
        let dt = now.saturating_duration_since(self.last_advance).as_secs_f32();
        self.last_advance = now;

        let relative_speed = self.speed / translator::MAX_VALUE;
        let max_step = relative_speed * LENGTHS_PER_SECOND * dt * translator::MAX_VALUE;
        let delta = self.target - self.position;
        if delta.abs() <= max_step {
            self.position = self.target;
        } else {
            self.position += max_step.copysign(delta);
        }
    }
}

impl<C: Clock> Actuator for SimulatedActuator<C> {
    fn set_command(
        &mut self,
        position_to: u8,
        speed: u8,
        _duration: Duration,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if self.severed {
            return Err(Box::new(DeviceError::Disconnected));
        }
        self.advance();
        self.writes += 1;
        match self.protocol.encode(position_to, speed) {
            ProtocolCommand::Move { position, speed } => {
                self.target = f32::from(position);
                self.speed = f32::from(speed);
                tracing::debug!(position, speed, "simulated move");
            }
            ProtocolCommand::Intensity(level) => {
                self.intensity = level;
                tracing::debug!(level, "simulated intensity");
            }
        }
        Ok(())
    }

    fn stop(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.advance();
        self.speed = 0.0;
        self.intensity = 0.0;
        Ok(())
    }
}

//! Runtime configuration for the relay engine.
//!
//! These are the structs the core consumes. They are separate from the
//! TOML-deserialized schema in `glide_config`; see `conversions` for the
//! mapping.

use std::time::Duration;

/// Pacing and shutdown knobs for one managed device.
#[derive(Debug, Clone, Copy)]
pub struct DeviceCfg {
    /// Minimum spacing between consecutive adapter writes. The firmware
    /// cannot absorb a higher command rate.
    pub min_command_interval: Duration,
    /// Dequeue-to-execution latency above which a diagnostic is logged.
    pub acceptable_execution_delay: Duration,
    /// Upper bound on waiting for the dispatch thread to stop.
    pub join_timeout: Duration,
}

impl Default for DeviceCfg {
    fn default() -> Self {
        Self {
            min_command_interval: Duration::from_millis(166),
            acceptable_execution_delay: Duration::from_millis(5),
            join_timeout: Duration::from_millis(500),
        }
    }
}

/// Tuning for the zone signal detector.
#[derive(Debug, Clone, Copy)]
pub struct SignalCfg {
    /// Position samples per second.
    pub sample_rate_hz: f32,
    /// Sustained-direction time that triggers a command when the motion is
    /// fast (threshold floor, seconds).
    pub min_signal_time: f32,
    /// Threshold ceiling for slow motion (seconds). A longer window gives
    /// slow runs the best chance of capturing a representative speed.
    pub max_signal_time: f32,
    /// Threshold value before the first adaptation (seconds).
    pub initial_signal_time: f32,
    /// Rolling average velocity at or below which the threshold sits at
    /// `max_signal_time`.
    pub lower_velocity_barrier: f32,
    /// Rolling average velocity at or above which the threshold sits at
    /// `min_signal_time`.
    pub higher_velocity_barrier: f32,
    /// User scale applied to per-direction speed estimates, after the raw
    /// estimate is recorded for threshold adaptation.
    pub speed_multiplier: f32,
}

impl Default for SignalCfg {
    fn default() -> Self {
        Self {
            sample_rate_hz: 40.0,
            min_signal_time: 0.1,
            max_signal_time: 0.25,
            initial_signal_time: 0.099,
            lower_velocity_barrier: 10.0,
            higher_velocity_barrier: 45.0,
            speed_multiplier: 1.0,
        }
    }
}

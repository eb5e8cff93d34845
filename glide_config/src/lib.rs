#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schema for the motion relay.
//!
//! `Config` and its sub-structs are deserialized from TOML and validated.
//! Everything here is plain numeric knobs consumed by `glide_core` and the
//! CLI; no relay logic lives in the loader.

use serde::Deserialize;

/// How the target device family interprets `(position, speed)` pairs.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Protocol {
    /// Timed-move firmware: the raw pair is sent as-is.
    #[default]
    TimedMove,
    /// Intensity-driven devices: the speed byte is rescaled into `[0, 1]`.
    Vibration,
}

/// Pacing limits for one managed device.
#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct Device {
    /// Minimum spacing between consecutive writes to the device (ms).
    pub min_command_interval_ms: u64,
    /// Dequeue-to-execution latency above which a diagnostic is logged (ms).
    pub acceptable_execution_delay_ms: u64,
    /// Upper bound on waiting for the dispatch thread to stop (ms).
    pub join_timeout_ms: u64,
    pub protocol: Protocol,
}

impl Default for Device {
    fn default() -> Self {
        Self {
            min_command_interval_ms: 166,
            acceptable_execution_delay_ms: 5,
            join_timeout_ms: 500,
            protocol: Protocol::TimedMove,
        }
    }
}

/// Capture volume, expressed as a center point and half-extents in the
/// coordinate frame the motion samples arrive in.
#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct Zone {
    pub center: [f32; 3],
    pub width: f32,
    pub height: f32,
    pub depth: f32,
}

impl Default for Zone {
    fn default() -> Self {
        Self {
            center: [0.0; 3],
            width: 0.1,
            height: 0.1,
            depth: 0.1,
        }
    }
}

/// Tuning for the motion-to-signal detector.
#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct Signal {
    /// Position samples per second.
    pub sample_rate_hz: f32,
    /// Shortest sustained-direction time that triggers a command (fast motion).
    pub min_signal_time_s: f32,
    /// Longest sustained-direction time that triggers a command (slow motion).
    pub max_signal_time_s: f32,
    /// Threshold before the first adaptation.
    pub initial_signal_time_s: f32,
    /// Average velocity at or below which the threshold sits at the max.
    pub lower_velocity_barrier: f32,
    /// Average velocity at or above which the threshold sits at the min.
    pub higher_velocity_barrier: f32,
    /// User scale applied to per-direction speed estimates.
    pub speed_multiplier: f32,
}

impl Default for Signal {
    fn default() -> Self {
        Self {
            sample_rate_hz: 40.0,
            min_signal_time_s: 0.1,
            max_signal_time_s: 0.25,
            initial_signal_time_s: 0.099,
            lower_velocity_barrier: 10.0,
            higher_velocity_barrier: 45.0,
            speed_multiplier: 1.0,
        }
    }
}

/// UDP endpoints and loop rates for the producer/server record stream.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Network {
    pub host: String,
    /// Port the device-side server listens on (producers send here).
    pub listen_port: u16,
    /// Port the producer listens on (the server's send target).
    pub send_port: u16,
    /// How often queued datagrams are drained.
    pub poll_rate_hz: u32,
    /// How often the latest snapshot is forwarded to the dispatcher.
    pub update_rate_hz: u32,
}

impl Default for Network {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            listen_port: 15601,
            send_port: 15600,
            poll_rate_hz: 60,
            update_rate_hz: 60,
        }
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct Logging {
    /// Path to a .log file (JSON lines); console-only when absent.
    pub file: Option<String>,
    /// "error" | "warn" | "info" | "debug" | "trace"
    pub level: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub device: Device,
    pub zone: Zone,
    pub signal: Signal,
    pub network: Network,
    pub logging: Logging,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

impl Config {
    /// Reject configurations the relay cannot run with.
    pub fn validate(&self) -> eyre::Result<()> {
        if self.device.min_command_interval_ms == 0 {
            eyre::bail!("device.min_command_interval_ms must be at least 1");
        }
        if self.device.join_timeout_ms == 0 {
            eyre::bail!("device.join_timeout_ms must be at least 1");
        }
        let s = &self.signal;
        if !s.sample_rate_hz.is_finite() || s.sample_rate_hz <= 0.0 {
            eyre::bail!("signal.sample_rate_hz must be positive");
        }
        if !s.min_signal_time_s.is_finite() || s.min_signal_time_s <= 0.0 {
            eyre::bail!("signal.min_signal_time_s must be positive");
        }
        if !s.max_signal_time_s.is_finite() || s.max_signal_time_s < s.min_signal_time_s {
            eyre::bail!("signal.max_signal_time_s must be >= signal.min_signal_time_s");
        }
        if !s.initial_signal_time_s.is_finite() || s.initial_signal_time_s <= 0.0 {
            eyre::bail!("signal.initial_signal_time_s must be positive");
        }
        if !s.lower_velocity_barrier.is_finite()
            || !s.higher_velocity_barrier.is_finite()
            || s.lower_velocity_barrier < 0.0
            || s.higher_velocity_barrier <= s.lower_velocity_barrier
        {
            eyre::bail!(
                "signal velocity barriers must satisfy 0 <= lower < higher"
            );
        }
        if !s.speed_multiplier.is_finite() || s.speed_multiplier <= 0.0 {
            eyre::bail!("signal.speed_multiplier must be positive");
        }
        let z = &self.zone;
        for (name, v) in [("width", z.width), ("height", z.height), ("depth", z.depth)] {
            if !v.is_finite() || v <= 0.0 {
                eyre::bail!("zone.{name} must be positive");
            }
        }
        if self.network.listen_port == self.network.send_port {
            eyre::bail!("network.listen_port and network.send_port must differ");
        }
        if self.network.poll_rate_hz == 0 || self.network.update_rate_hz == 0 {
            eyre::bail!("network poll/update rates must be at least 1 Hz");
        }
        Ok(())
    }
}

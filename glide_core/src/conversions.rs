//! `From` implementations bridging `glide_config` types to `glide_core` types.
//!
//! These keep the TOML schema and the runtime structs from drifting apart in
//! ad-hoc mapping code at the call sites.

use std::time::Duration;

use crate::config::{DeviceCfg, SignalCfg};
use crate::zone::CaptureZone;

// ── Device ──────────────────────────────────────────────────────────────────

impl From<&glide_config::Device> for DeviceCfg {
    fn from(c: &glide_config::Device) -> Self {
        Self {
            min_command_interval: Duration::from_millis(c.min_command_interval_ms),
            acceptable_execution_delay: Duration::from_millis(c.acceptable_execution_delay_ms),
            join_timeout: Duration::from_millis(c.join_timeout_ms),
        }
    }
}

// ── Signal ──────────────────────────────────────────────────────────────────

impl From<&glide_config::Signal> for SignalCfg {
    fn from(c: &glide_config::Signal) -> Self {
        Self {
            sample_rate_hz: c.sample_rate_hz,
            min_signal_time: c.min_signal_time_s,
            max_signal_time: c.max_signal_time_s,
            initial_signal_time: c.initial_signal_time_s,
            lower_velocity_barrier: c.lower_velocity_barrier,
            higher_velocity_barrier: c.higher_velocity_barrier,
            speed_multiplier: c.speed_multiplier,
        }
    }
}

// ── Zone ────────────────────────────────────────────────────────────────────

impl From<&glide_config::Zone> for CaptureZone {
    fn from(c: &glide_config::Zone) -> Self {
        Self {
            center: c.center,
            half_extents: [c.width, c.height, c.depth],
        }
    }
}

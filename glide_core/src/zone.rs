//! Zone-based motion-to-signal detection.
//!
//! Samples a continuously moving target inside a capture volume and decides
//! when a direction-sustained motion is significant enough to become a
//! discrete device command. The detector is a debounced, adaptive-hysteresis
//! edge detector over the position signal: slow motion is reproduced
//! faithfully at the sampled position, fast motion as full strokes to the
//! zone extreme.

use std::collections::VecDeque;

use crate::config::SignalCfg;
use crate::translator;
use crate::util::{inverse_lerp, lerp, sample_interval};

/// Capacity of the per-direction speed windows.
pub const VELOCITY_BUFFER_CAPACITY: usize = 20;
/// Capacity of the rolling history behind the average-velocity estimate.
pub const AVG_VELOCITY_BUFFER_CAPACITY: usize = 100;

/// Axis-aligned capture volume: center plus half-extents, in the frame the
/// motion samples arrive in. The vertical (Y) span maps onto the device
/// travel range.
#[derive(Debug, Clone, Copy)]
pub struct CaptureZone {
    pub center: [f32; 3],
    pub half_extents: [f32; 3],
}

impl CaptureZone {
    pub fn new(center: [f32; 3], half_extents: [f32; 3]) -> Self {
        Self {
            center,
            half_extents,
        }
    }

    /// Normalized local coordinates of `point`, or `None` when it falls
    /// outside the volume.
    pub fn localize(&self, point: [f32; 3]) -> Option<[f32; 3]> {
        let mut local = [0.0f32; 3];
        for axis in 0..3 {
            let extent = self.half_extents[axis].max(f32::EPSILON);
            let c = (point[axis] - self.center[axis]) / extent;
            if !(-1.0..=1.0).contains(&c) {
                return None;
            }
            local[axis] = c;
        }
        Some(local)
    }

    /// The world point whose vertical coordinate corresponds to `travel`
    /// device units (0..=99). Driver and test aid.
    pub fn point_at(&self, travel: f32) -> [f32; 3] {
        let factor = (travel / translator::MAX_VALUE).clamp(0.0, 1.0);
        let y = lerp(-1.0, 1.0, factor) * self.half_extents[1];
        [self.center[0], self.center[1] + y, self.center[2]]
    }
}

/// A discrete motion signal distilled from the sample stream, ready to be
/// turned into a device command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotionSignal {
    pub position: u8,
    pub speed: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Run {
    Up,
    Down,
}

/// Stateful detector for one tracked target bound to one capture zone.
///
/// Feed it the target's position every tick via [`Self::update`]; it paces
/// its own sampling, classifies motion direction, and emits at most one
/// signal per sustained direction run.
#[derive(Debug)]
pub struct ZoneSignalDetector {
    cfg: SignalCfg,
    zone: CaptureZone,
    last_position: f32,
    sample_timer: f32,
    time_moving_up: f32,
    time_moving_down: f32,
    // Latched on emission so a run signals exactly once even when the
    // adapted threshold lands back above the accumulated time.
    signalled_up: bool,
    signalled_down: bool,
    current_threshold: f32,
    up_speeds: VecDeque<f32>,
    down_speeds: VecDeque<f32>,
    velocity_history: VecDeque<f32>,
}

impl ZoneSignalDetector {
    pub fn new(cfg: SignalCfg, zone: CaptureZone) -> Self {
        let current_threshold = cfg.initial_signal_time;
        Self {
            cfg,
            zone,
            last_position: 0.0,
            sample_timer: 0.0,
            time_moving_up: 0.0,
            time_moving_down: 0.0,
            signalled_up: false,
            signalled_down: false,
            current_threshold,
            up_speeds: VecDeque::with_capacity(VELOCITY_BUFFER_CAPACITY),
            down_speeds: VecDeque::with_capacity(VELOCITY_BUFFER_CAPACITY),
            velocity_history: VecDeque::with_capacity(AVG_VELOCITY_BUFFER_CAPACITY),
        }
    }

    /// The adaptive signal-time threshold currently in effect (seconds).
    pub fn current_threshold(&self) -> f32 {
        self.current_threshold
    }

    /// Last sampled target position in device units.
    pub fn last_position(&self) -> f32 {
        self.last_position
    }

    /// Rolling average of the recorded instantaneous speed estimates.
    pub fn average_velocity(&self) -> f32 {
        if self.velocity_history.is_empty() {
            return 0.0;
        }
        let sum: f32 = self.velocity_history.iter().sum();
        sum / self.velocity_history.len() as f32
    }

    /// Clear all run state and buffers. Call when the target binding is
    /// cleared; direction reversals are handled internally.
    pub fn reset(&mut self) {
        self.time_moving_up = 0.0;
        self.time_moving_down = 0.0;
        self.signalled_up = false;
        self.signalled_down = false;
        self.up_speeds.clear();
        self.down_speeds.clear();
        self.velocity_history.clear();
        self.sample_timer = 0.0;
        self.last_position = 0.0;
        self.current_threshold = self.cfg.initial_signal_time;
    }

    /// Advance the sample timer by `dt` seconds and, when it elapses, take a
    /// sample of `target`. Motion tracking is suspended while the target is
    /// outside the capture volume.
    pub fn update(&mut self, target: [f32; 3], dt: f32) -> Option<MotionSignal> {
        self.sample_timer -= dt;
        if self.sample_timer > 0.0 {
            return None;
        }
        let interval = sample_interval(self.cfg.sample_rate_hz);
        // Carry the overshoot into the next period so the cadence stays
        // honest across uneven tick sizes.
        self.sample_timer = interval - (-self.sample_timer).min(interval);

        let local = self.zone.localize(target)?;
        let factor = inverse_lerp(-1.0, 1.0, local[1]);
        let position = lerp(0.0, translator::MAX_VALUE, factor);
        self.sample(position, interval)
    }

    /// Process one already-normalized position sample. `interval` is the
    /// elapsed time since the previous sample.
    fn sample(&mut self, position: f32, interval: f32) -> Option<MotionSignal> {
        let delta = position - self.last_position;
        if delta == 0.0 {
            // Stationary tick: speed is undefined at zero distance, so no
            // sample is recorded and neither run advances.
            return None;
        }

        // Raw estimate feeds the rolling average before the user multiplier
        // so tuning the multiplier cannot skew threshold adaptation.
        let estimate = translator::speed_for_move(self.last_position, position, interval);
        if self.velocity_history.len() == AVG_VELOCITY_BUFFER_CAPACITY {
            self.velocity_history.pop_front();
        }
        self.velocity_history.push_back(estimate);

        let scaled = (estimate * self.cfg.speed_multiplier).clamp(0.0, translator::MAX_VALUE);

        let signal = if delta > 0.0 {
            let signal = self.advance_run(Run::Up, scaled, interval, position);
            self.time_moving_down = 0.0;
            self.down_speeds.clear();
            self.signalled_down = false;
            signal
        } else {
            let signal = self.advance_run(Run::Down, scaled, interval, position);
            self.time_moving_up = 0.0;
            self.up_speeds.clear();
            self.signalled_up = false;
            signal
        };

        self.last_position = position;
        signal
    }

    fn advance_run(
        &mut self,
        run: Run,
        scaled_speed: f32,
        interval: f32,
        position: f32,
    ) -> Option<MotionSignal> {
        {
            let buffer = match run {
                Run::Up => &mut self.up_speeds,
                Run::Down => &mut self.down_speeds,
            };
            if buffer.len() == VELOCITY_BUFFER_CAPACITY {
                buffer.pop_front();
            }
            buffer.push_back(scaled_speed);
        }

        let previous = match run {
            Run::Up => self.time_moving_up,
            Run::Down => self.time_moving_down,
        };
        let accumulated = previous + interval;
        match run {
            Run::Up => self.time_moving_up = accumulated,
            Run::Down => self.time_moving_down = accumulated,
        }

        // Edge-triggered: fire on the tick that crosses the threshold,
        // exactly once per direction run.
        let already = match run {
            Run::Up => self.signalled_up,
            Run::Down => self.signalled_down,
        };
        if already || !(previous < self.current_threshold && accumulated >= self.current_threshold)
        {
            return None;
        }
        match run {
            Run::Up => self.signalled_up = true,
            Run::Down => self.signalled_down = true,
        }

        // The peak of the run is the closest single-speed representation of
        // the whole motion.
        let peak = match run {
            Run::Up => &self.up_speeds,
            Run::Down => &self.down_speeds,
        }
        .iter()
        .copied()
        .fold(0.0f32, f32::max)
        .round();

        let extreme = match run {
            Run::Up => translator::MAX_VALUE,
            Run::Down => 0.0,
        };
        // Slow sustained motion targets the exact sampled point; anything
        // faster strokes to the zone extreme.
        let target = if peak > 1.0 { extreme } else { position };
        let signal = MotionSignal {
            position: target as u8,
            speed: peak as u8,
        };

        self.adapt_threshold();

        if peak <= 1.0 {
            // Too slow to be a continuing stroke: treat as settled and let
            // the next accumulation count as a fresh run.
            match run {
                Run::Up => {
                    self.time_moving_up = 0.0;
                    self.up_speeds.clear();
                    self.signalled_up = false;
                }
                Run::Down => {
                    self.time_moving_down = 0.0;
                    self.down_speeds.clear();
                    self.signalled_down = false;
                }
            }
        }

        Some(signal)
    }

    /// Re-derive the signal-time threshold from the rolling average
    /// velocity: faster averages shorten the window, slower ones stretch it
    /// toward the maximum.
    fn adapt_threshold(&mut self) {
        let factor = inverse_lerp(
            self.cfg.lower_velocity_barrier,
            self.cfg.higher_velocity_barrier,
            self.average_velocity(),
        );
        self.current_threshold = lerp(self.cfg.max_signal_time, self.cfg.min_signal_time, factor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_zone() -> CaptureZone {
        CaptureZone::new([0.0; 3], [1.0; 3])
    }

    #[test]
    fn localize_rejects_points_outside_the_volume() {
        let zone = CaptureZone::new([1.0, 2.0, 3.0], [0.5, 0.5, 0.5]);
        assert!(zone.localize([1.0, 2.0, 3.0]).is_some());
        assert!(zone.localize([1.4, 2.0, 3.0]).is_some());
        assert!(zone.localize([1.6, 2.0, 3.0]).is_none());
        assert!(zone.localize([1.0, 2.0, 3.51]).is_none());
    }

    #[test]
    fn point_at_round_trips_through_localize() {
        let zone = CaptureZone::new([0.3, -0.2, 0.9], [0.2, 0.4, 0.1]);
        for travel in [0.0f32, 24.75, 49.5, 99.0] {
            let point = zone.point_at(travel);
            let local = zone.localize(point).expect("inside");
            let position = lerp(0.0, 99.0, inverse_lerp(-1.0, 1.0, local[1]));
            assert!((position - travel).abs() < 1e-3, "travel {travel} -> {position}");
        }
    }

    #[test]
    fn stationary_target_never_signals() {
        let mut det = ZoneSignalDetector::new(SignalCfg::default(), unit_zone());
        let point = unit_zone().point_at(50.0);
        for _ in 0..200 {
            assert_eq!(det.update(point, 0.025), None);
        }
    }
}

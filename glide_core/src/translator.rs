//! Numeric model of the actuator's travel characteristics.
//!
//! The device specifies moves as `(position, speed)` and works out timing on
//! its own; these functions approximate that relationship so the relay can
//! pick a speed that lands a move in the observed time window, and predict
//! durations and distances for moves it has issued. The model is an
//! empirical power-law fit over the firmware's 0-90 travel-unit range, so
//! the three predictions are approximate inverses of one another, not exact
//! round-trips.

/// Upper bound of the device position/speed range.
pub const MAX_VALUE: f32 = 99.0;
/// Lowest speed the firmware executes reliably.
pub const MIN_SPEED: f32 = 10.0;
/// Highest speed inside the safe operating band.
pub const MAX_SPEED: f32 = 90.0;

/// Speed required to travel from `prev_pos` to `new_pos` (device units,
/// 0..=99) in `elapsed_secs`, clamped to the safe operating band.
///
/// A zero-distance move has no defined speed; callers must guard against
/// calling this with `prev_pos == new_pos`.
pub fn speed_for_move(prev_pos: f32, new_pos: f32, elapsed_secs: f32) -> f32 {
    let dist = f64::from((new_pos - prev_pos).abs());
    // Scale the move into the firmware's native 0-90 travel-unit range.
    let millis = f64::from(elapsed_secs) * 1000.0 * 90.0 / dist;
    let speed = 25000.0 * millis.powf(-1.05);
    (speed as f32).clamp(MIN_SPEED, MAX_SPEED).clamp(0.0, MAX_VALUE)
}

/// Seconds a move of `distance` device units takes at `speed`.
/// Non-positive distances take no time.
pub fn duration_for_move(distance: f32, speed: f32) -> f32 {
    if distance <= 0.0 {
        return 0.0;
    }
    let millis = (f64::from(speed) / 25000.0).powf(-0.95);
    ((millis / (90.0 / f64::from(distance))) / 1000.0) as f32
}

/// Device units covered after `elapsed_secs` of travel at `speed`.
/// Non-positive speeds cover no distance.
pub fn distance_for_move(speed: f32, elapsed_secs: f32) -> f32 {
    if speed <= 0.0 {
        return 0.0;
    }
    let millis = (f64::from(speed) / 25000.0).powf(-0.95);
    let diff = millis - f64::from(elapsed_secs) * 1000.0;
    (90.0 - diff / millis * 90.0) as f32
}

/// Rescale a protocol speed byte into a `[0, 1]` intensity for devices
/// driven by vibration level rather than timed moves.
pub fn speed_to_intensity(speed: u8) -> f64 {
    ((f64::from(speed) + 1.0) / 100.0).clamp(0.0, 1.0)
}

/// Rescale a protocol position byte into a `[0, 1]` intensity, inverted so
/// the retracted end of travel is the strongest signal.
pub fn position_to_intensity(position: u8) -> f64 {
    (1.0 - (f64::from(position) + 1.0) / 100.0).clamp(0.0, 1.0)
}

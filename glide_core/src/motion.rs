//! Procedural motion sources.
//!
//! These generate the same position stream a tracked object would, so the
//! relay can run without a 3D host.

/// Triangle-wave sweep between two travel positions at a fixed rate.
#[derive(Debug, Clone)]
pub struct Oscillator {
    min_position: f32,
    max_position: f32,
    /// Travel rate in device units per second.
    speed: f32,
    position: f32,
    rising: bool,
}

impl Oscillator {
    pub fn new(min_position: f32, max_position: f32, speed: f32) -> Self {
        let lo = min_position.min(max_position).clamp(0.0, 99.0);
        let hi = min_position.max(max_position).clamp(0.0, 99.0);
        Self {
            min_position: lo,
            max_position: hi,
            speed: speed.max(0.0),
            position: lo,
            rising: true,
        }
    }

    pub fn position(&self) -> f32 {
        self.position
    }

    /// Advance by `dt` seconds and return the new target position.
    pub fn tick(&mut self, dt: f32) -> f32 {
        let step = self.speed * dt.max(0.0);
        if self.rising {
            self.position += step;
            if self.position >= self.max_position {
                self.position = self.max_position;
                self.rising = false;
            }
        } else {
            self.position -= step;
            if self.position <= self.min_position {
                self.position = self.min_position;
                self.rising = true;
            }
        }
        self.position
    }
}

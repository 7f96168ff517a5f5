//! Single-axis velocity state machine.

use crate::AxisInput;

/// What an axis did on its most recent tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisPhase {
    /// The positive key is held; velocity ramps toward `+max`.
    AcceleratingPositive,
    /// The negative key is held; velocity ramps toward `-max`.
    AcceleratingNegative,
    /// No key is held; velocity decays geometrically toward zero.
    Decaying,
}

/// A single bounded velocity scalar with ramp, clamp, and decay-to-rest.
///
/// The acceleration step is `max / 100`, so holding a key for 100 ticks from
/// rest lands exactly on the maximum. The positive key wins when both
/// directions are held at once.
#[derive(Debug, Clone)]
pub struct AxisMotion {
    velocity: f32,
    max: f32,
    step: f32,
    decay: f32,
    rest_epsilon: f32,
    phase: AxisPhase,
}

impl AxisMotion {
    /// Create an axis at rest.
    pub fn new(max: f32, decay: f32, rest_epsilon: f32) -> Self {
        Self {
            velocity: 0.0,
            max,
            step: max / 100.0,
            decay,
            rest_epsilon,
            phase: AxisPhase::Decaying,
        }
    }

    /// Advance one tick from the current key state.
    pub fn tick(&mut self, input: AxisInput) {
        if input.positive {
            self.phase = AxisPhase::AcceleratingPositive;
            self.velocity = (self.velocity + self.step).min(self.max);
        } else if input.negative {
            self.phase = AxisPhase::AcceleratingNegative;
            self.velocity = (self.velocity - self.step).max(-self.max);
        } else {
            self.phase = AxisPhase::Decaying;
            self.velocity *= self.decay;
            if self.velocity.abs() < self.rest_epsilon {
                self.velocity = 0.0;
            }
        }
    }

    /// Current velocity in `[-max, +max]`.
    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    /// Phase selected by the most recent tick.
    pub fn phase(&self) -> AxisPhase {
        self.phase
    }

    /// Configured velocity bound.
    pub fn max(&self) -> f32 {
        self.max
    }
}

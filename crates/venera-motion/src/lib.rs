//! Key-state to motion integration.
//!
//! Converts held directional keys into smoothed, clamped walk/turn velocities.
//! Each axis is a small state machine: while a key is held the velocity ramps
//! linearly toward that direction's maximum; with no key held it decays
//! geometrically and snaps to rest once it drops below a threshold, so a
//! released axis reaches exactly zero in a bounded number of ticks.
//!
//! There is no delta-time scaling: one tick corresponds to one frame callback,
//! matching the fixed acceleration-per-tick model of the capture loop.

mod axis;

pub use axis::{AxisMotion, AxisPhase};

use venera_config::MotionConfig;

/// Which directional keys are held for one axis during a tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct AxisInput {
    /// The key driving the axis positive (walk forward / turn left).
    pub positive: bool,
    /// The key driving the axis negative (walk back / turn right).
    pub negative: bool,
}

/// The pair of smoothed walk/turn velocity scalars.
///
/// Mutated only by [`tick`](Self::tick); consumers read the velocities and
/// never write them.
#[derive(Debug, Clone)]
pub struct MotionState {
    /// Tangential walk velocity, radians of globe rotation per tick.
    pub walk: AxisMotion,
    /// Yaw turn velocity, radians per tick.
    pub turn: AxisMotion,
}

impl MotionState {
    /// Create a motion state at rest with the configured limits.
    pub fn new(config: &MotionConfig) -> Self {
        Self {
            walk: AxisMotion::new(
                config.max_walk_speed,
                config.decay_factor,
                config.rest_epsilon,
            ),
            turn: AxisMotion::new(
                config.max_turn_speed,
                config.decay_factor,
                config.rest_epsilon,
            ),
        }
    }

    /// Advance both axes by one tick from the current key state.
    pub fn tick(&mut self, walk: AxisInput, turn: AxisInput) {
        self.walk.tick(walk);
        self.turn.tick(turn);
    }

    /// Current walk velocity.
    pub fn walk_speed(&self) -> f32 {
        self.walk.velocity()
    }

    /// Current turn velocity.
    pub fn turn_speed(&self) -> f32 {
        self.turn.velocity()
    }

    /// True when both axes are at rest.
    pub fn is_at_rest(&self) -> bool {
        self.walk.velocity() == 0.0 && self.turn.velocity() == 0.0
    }
}

//! The terrain scene's heading frame.

use glam::{Quat, Vec3};

/// Yaw frame for the terrain scene's directional cue.
///
/// The directional light hangs off this frame; yawing it by the negative of
/// every turn keeps the light bearing fixed relative to the walking
/// direction, which is what makes turning legible from the surface view.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadingFrame {
    /// Accumulated yaw in radians about the terrain plane's up axis.
    pub yaw: f32,
}

impl HeadingFrame {
    /// Counter-yaw for one tick's turn.
    pub fn apply_turn(&mut self, turn: f32) {
        self.yaw -= turn;
    }

    /// The frame's rotation about the up (+Z, plane-local) axis.
    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_z(self.yaw)
    }

    /// Where the frame currently points a resting-frame direction.
    pub fn direction(&self, rest: Vec3) -> Vec3 {
        self.rotation() * rest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_shifts_yaw_negatively() {
        let mut heading = HeadingFrame::default();
        heading.apply_turn(0.25);
        assert!((heading.yaw + 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_turns_accumulate() {
        let mut heading = HeadingFrame::default();
        heading.apply_turn(0.1);
        heading.apply_turn(-0.3);
        assert!((heading.yaw - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_direction_rotates_about_up() {
        let mut heading = HeadingFrame::default();
        heading.apply_turn(-std::f32::consts::FRAC_PI_2);
        let dir = heading.direction(Vec3::X);
        assert!((dir - Vec3::Y).length() < 1e-5);
    }
}

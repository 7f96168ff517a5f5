//! The orbit rig: frozen rotation axes plus one accumulated orientation.

use glam::{Quat, Vec3};

/// How closely the two derived axes must be orthogonal unit vectors.
const AXIS_TOLERANCE: f32 = 1e-4;

/// Errors from deriving the rig's axes at construction.
#[derive(Debug, thiserror::Error)]
pub enum RigError {
    /// A reference point coincided with the sphere center.
    #[error("rig reference point is at the sphere center; axis is undefined")]
    DegenerateAxis,

    /// The camera and forward reference directions are not perpendicular.
    #[error("rig axes are not orthogonal (dot = {0})")]
    NonOrthogonalAxes(f32),
}

/// An orientation frame attached to the sphere center.
///
/// `spin_axis` points from the center through the camera; `forward_axis`
/// points from the center through a perpendicular reference point on the rig.
/// Rotating about `forward_axis` walks the camera over the surface; rotating
/// about `spin_axis` yaws it in place. Both axes live in the rig's local
/// frame, are captured once from the resting transform, and never change;
/// only `orientation` accumulates.
#[derive(Debug, Clone)]
pub struct OrbitRig {
    orientation: Quat,
    forward_axis: Vec3,
    spin_axis: Vec3,
}

impl OrbitRig {
    /// Derive and freeze the axes from the rig's resting transform.
    ///
    /// `camera_pos` is the capture camera's world position and
    /// `forward_ref_pos` the perpendicular reference point, both while the
    /// rig is still at its resting orientation (so local and world frames
    /// coincide). `center` is the sphere center.
    pub fn from_rest_transform(
        center: Vec3,
        camera_pos: Vec3,
        forward_ref_pos: Vec3,
    ) -> Result<Self, RigError> {
        let spin_axis = (camera_pos - center).try_normalize().ok_or(RigError::DegenerateAxis)?;
        let forward_axis = (forward_ref_pos - center)
            .try_normalize()
            .ok_or(RigError::DegenerateAxis)?;

        let dot = spin_axis.dot(forward_axis);
        if dot.abs() > AXIS_TOLERANCE {
            return Err(RigError::NonOrthogonalAxes(dot));
        }

        Ok(Self {
            orientation: Quat::IDENTITY,
            forward_axis,
            spin_axis,
        })
    }

    /// Walk then turn, composed onto the same frame.
    ///
    /// Forward-axis rotation is applied first so that turning does not change
    /// the walk axis mid-tick. Both rotations are in the rig's local frame.
    pub fn advance(&mut self, walk: f32, turn: f32) {
        self.rotate_local(self.forward_axis, walk);
        self.rotate_local(self.spin_axis, turn);
    }

    /// One-off yaw about the spin axis (pointer-drag counter-rotation).
    pub fn spin(&mut self, angle: f32) {
        self.rotate_local(self.spin_axis, angle);
    }

    fn rotate_local(&mut self, axis: Vec3, angle: f32) {
        if angle != 0.0 {
            self.orientation = (self.orientation * Quat::from_axis_angle(axis, angle)).normalize();
        }
    }

    /// The accumulated orientation.
    pub fn orientation(&self) -> Quat {
        self.orientation
    }

    /// The frozen walk axis in the rig's local frame.
    pub fn forward_axis(&self) -> Vec3 {
        self.forward_axis
    }

    /// The frozen yaw axis in the rig's local frame.
    pub fn spin_axis(&self) -> Vec3 {
        self.spin_axis
    }

    /// Where the local frame currently sends a resting-frame point.
    pub fn transform_point(&self, local: Vec3) -> Vec3 {
        self.orientation * local
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Resting transform matching the app setup: camera on -Z, forward
    /// reference on +Y, sphere at the origin.
    fn rig() -> OrbitRig {
        OrbitRig::from_rest_transform(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.02), Vec3::Y).unwrap()
    }

    #[test]
    fn test_axes_derived_from_rest_transform() {
        let rig = rig();
        assert!((rig.spin_axis() - Vec3::NEG_Z).length() < 1e-6);
        assert!((rig.forward_axis() - Vec3::Y).length() < 1e-6);
        assert_eq!(rig.orientation(), Quat::IDENTITY);
    }

    #[test]
    fn test_axes_are_orthogonal_unit_vectors() {
        let rig = rig();
        assert!((rig.spin_axis().length() - 1.0).abs() < 1e-6);
        assert!((rig.forward_axis().length() - 1.0).abs() < 1e-6);
        assert!(rig.spin_axis().dot(rig.forward_axis()).abs() < 1e-6);
    }

    #[test]
    fn test_center_point_is_degenerate() {
        let result = OrbitRig::from_rest_transform(Vec3::ZERO, Vec3::ZERO, Vec3::Y);
        assert!(matches!(result, Err(RigError::DegenerateAxis)));
    }

    #[test]
    fn test_non_orthogonal_axes_rejected() {
        let result =
            OrbitRig::from_rest_transform(Vec3::ZERO, Vec3::new(0.0, 1.0, -1.0), Vec3::Y);
        assert!(matches!(result, Err(RigError::NonOrthogonalAxes(_))));
    }

    #[test]
    fn test_axes_frozen_after_motion() {
        let mut rig = rig();
        let fwd = rig.forward_axis();
        let spin = rig.spin_axis();
        for _ in 0..1000 {
            rig.advance(0.01, 0.02);
        }
        assert_eq!(rig.forward_axis(), fwd);
        assert_eq!(rig.spin_axis(), spin);
    }

    #[test]
    fn test_walk_carries_camera_over_surface() {
        let mut rig = rig();
        let camera_rest = Vec3::new(0.0, 0.0, -1.02);
        // A quarter turn about +Y sends -Z to -X.
        rig.advance(std::f32::consts::FRAC_PI_2, 0.0);
        let camera_now = rig.transform_point(camera_rest);
        assert!((camera_now - Vec3::new(-1.02, 0.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_turn_leaves_camera_in_place() {
        let mut rig = rig();
        let camera_rest = Vec3::new(0.0, 0.0, -1.02);
        rig.advance(0.0, 1.3);
        let camera_now = rig.transform_point(camera_rest);
        assert!((camera_now - camera_rest).length() < 1e-5);
    }

    #[test]
    fn test_turn_rotates_walk_direction_by_angle() {
        let mut rig = rig();
        let t = 0.4;
        let before = rig.transform_point(rig.forward_axis());
        rig.advance(0.0, t);
        let after = rig.transform_point(rig.forward_axis());
        assert!((before.angle_between(after) - t).abs() < 1e-5);
    }

    #[test]
    fn test_forward_rotation_applied_before_spin() {
        // Composing walk-then-turn in one call must equal doing the two
        // rotations in that order by hand.
        let mut rig_a = rig();
        rig_a.advance(0.3, 0.7);

        let mut rig_b = rig();
        rig_b.advance(0.3, 0.0);
        rig_b.advance(0.0, 0.7);

        let d = rig_a.orientation().dot(rig_b.orientation()).abs();
        assert!(d > 1.0 - 1e-6, "orders diverged: dot = {d}");
    }

    #[test]
    fn test_orientation_stays_normalized() {
        let mut rig = rig();
        for _ in 0..10_000 {
            rig.advance(1e-3, -2e-3);
        }
        assert!((rig.orientation().length() - 1.0).abs() < 1e-5);
    }
}

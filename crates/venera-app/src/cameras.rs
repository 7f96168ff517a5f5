//! Camera derivations for the three views.
//!
//! All three cameras are stateless functions of the simulation state: the
//! rig owns the orbit, the pivot owns the drag tilt, and the cameras are
//! rebuilt from them every frame rather than accumulating their own drift.

use glam::{Quat, Vec3};
use venera_config::GlobeConfig;
use venera_render::SceneCamera;
use venera_rig::{HeadingFrame, MinimapOrbit, OrbitRig, TerrainPivot};

use crate::vehicle::VehicleTransform;

/// The nadir capture camera, carried around the globe by the orbit rig.
///
/// Rest pose matches the rig's axis derivation: on -Z at the configured
/// altitude, looking at the sphere center. The far plane sits at the
/// altitude so the sphere's far side never reaches the capture.
pub fn nadir_camera(rig: &OrbitRig, globe: &GlobeConfig) -> SceneCamera {
    let rest_position = Vec3::new(0.0, 0.0, -globe.camera_altitude_radii);
    let mut camera = SceneCamera {
        position: rest_position,
        fov_y: globe.capture_fov_deg.to_radians(),
        aspect_ratio: 1.0,
        near: 0.01,
        far: globe.camera_altitude_radii,
        ..SceneCamera::default()
    };
    camera.look_at(Vec3::ZERO, Vec3::Y);
    camera.rotation = (rig.orientation() * camera.rotation).normalize();
    camera.position = rig.transform_point(rest_position);
    camera
}

/// The minimap camera, orbiting the globe on its own lon/lat frame.
pub fn minimap_camera(orbit: &MinimapOrbit) -> SceneCamera {
    let rest_position = Vec3::new(0.1, 0.0, -2.0);
    let mut camera = SceneCamera {
        position: rest_position,
        fov_y: 75.0_f32.to_radians(),
        aspect_ratio: 1.0,
        near: 0.01,
        far: 100.0,
        ..SceneCamera::default()
    };
    camera.look_at(Vec3::ZERO, Vec3::Y);

    let frame = Quat::from_rotation_y(orbit.lon) * Quat::from_rotation_x(orbit.lat);
    camera.position = frame * rest_position;
    camera.rotation = (frame * camera.rotation).normalize();
    camera
}

/// Zoom/height state of the chase camera, adjusted by wheel and drag.
#[derive(Debug, Clone, Copy)]
pub struct ChaseView {
    /// Distance behind the vehicle.
    pub distance: f32,
    /// Extra height above the vehicle.
    pub height: f32,
}

impl Default for ChaseView {
    fn default() -> Self {
        Self {
            distance: 2.0,
            height: 0.0,
        }
    }
}

impl ChaseView {
    /// Scroll-wheel zoom: each line scales the distance by 0.9 (in) or
    /// 1.1 (out).
    pub fn zoom(&mut self, scroll_lines: f32) {
        if scroll_lines > 0.0 {
            self.distance *= 0.9;
        } else if scroll_lines < 0.0 {
            self.distance *= 1.1;
        }
    }

    /// Vertical drag raises or lowers the eye.
    pub fn raise(&mut self, dy: f32) {
        self.height += dy;
    }
}

/// The surface chase camera: behind the vehicle, orbited by the drag pivot,
/// always looking at the vehicle with the plane's +Z as up.
pub fn chase_camera(
    vehicle: &VehicleTransform,
    pivot: &TerrainPivot,
    view: &ChaseView,
    aspect_ratio: f32,
) -> SceneCamera {
    let orbit = Quat::from_rotation_z(pivot.yaw) * Quat::from_rotation_y(pivot.pitch);
    let offset = orbit * Vec3::new(-view.distance, 0.0, 0.0) + Vec3::new(0.0, 0.0, view.height);

    let mut camera = SceneCamera {
        position: vehicle.position + offset,
        fov_y: 75.0_f32.to_radians(),
        aspect_ratio,
        near: 0.01,
        far: 100.0,
        ..SceneCamera::default()
    };
    camera.look_at(vehicle.position, Vec3::Z);
    camera
}

/// Direction toward the terrain scene's directional light.
///
/// The light hangs half a plane out and an eighth of a plane up, swung
/// around the up axis by the heading frame so it stays locked to the walking
/// direction.
pub fn heading_light_direction(heading: &HeadingFrame, plane_scale: f32) -> Vec3 {
    let rest = Vec3::new(0.0, plane_scale / 2.0, plane_scale / 8.0).normalize();
    heading.direction(rest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use venera_config::Config;

    fn rest_rig(globe: &GlobeConfig) -> OrbitRig {
        OrbitRig::from_rest_transform(
            Vec3::ZERO,
            Vec3::new(0.0, 0.0, -globe.camera_altitude_radii),
            Vec3::Y,
        )
        .unwrap()
    }

    #[test]
    fn test_nadir_camera_rest_pose() {
        let globe = GlobeConfig::default();
        let rig = rest_rig(&globe);
        let camera = nadir_camera(&rig, &globe);

        assert!((camera.position - Vec3::new(0.0, 0.0, -globe.camera_altitude_radii)).length() < 1e-6);
        // Looking at the center from -Z means forward is +Z.
        assert!((camera.forward() - Vec3::Z).length() < 1e-5);
        assert!((camera.fov_y - 30.0_f32.to_radians()).abs() < 1e-6);
        assert_eq!(camera.aspect_ratio, 1.0);
    }

    #[test]
    fn test_nadir_camera_tracks_rig_walk() {
        let globe = GlobeConfig::default();
        let mut rig = rest_rig(&globe);
        rig.advance(std::f32::consts::FRAC_PI_2, 0.0);
        let camera = nadir_camera(&rig, &globe);

        // A quarter walk about +Y carries the camera from -Z to -X, still
        // at altitude and still aimed at the center.
        assert!(
            (camera.position - Vec3::new(-globe.camera_altitude_radii, 0.0, 0.0)).length() < 1e-5
        );
        let to_center = (-camera.position).normalize();
        assert!((camera.forward() - to_center).length() < 1e-4);
    }

    #[test]
    fn test_nadir_camera_turn_keeps_aim() {
        let globe = GlobeConfig::default();
        let mut rig = rest_rig(&globe);
        rig.advance(0.4, 1.1);
        let camera = nadir_camera(&rig, &globe);
        let to_center = (-camera.position).normalize();
        assert!((camera.forward() - to_center).length() < 1e-4);
    }

    #[test]
    fn test_minimap_camera_orbits_center() {
        let mut orbit = MinimapOrbit::default();
        let rest = minimap_camera(&orbit);
        orbit.lon = 1.0;
        orbit.lat = -0.4;
        let moved = minimap_camera(&orbit);

        assert!((rest.position.length() - moved.position.length()).abs() < 1e-5);
        assert_ne!(rest.position, moved.position);
    }

    #[test]
    fn test_chase_camera_looks_at_vehicle() {
        let config = Config::default();
        let mut vehicle = VehicleTransform::new(config.terrain.vehicle_clearance);
        vehicle.position.z = 0.5;
        let camera = chase_camera(
            &vehicle,
            &TerrainPivot::default(),
            &ChaseView::default(),
            16.0 / 9.0,
        );

        let to_vehicle = (vehicle.position - camera.position).normalize();
        assert!((camera.forward() - to_vehicle).length() < 1e-4);
        assert!((camera.position - vehicle.position).length() > 1.0);
    }

    #[test]
    fn test_chase_zoom_scales_distance() {
        let mut view = ChaseView::default();
        view.zoom(1.0);
        assert!((view.distance - 1.8).abs() < 1e-6);
        view.zoom(-1.0);
        assert!((view.distance - 1.98).abs() < 1e-5);
        view.zoom(0.0);
        assert!((view.distance - 1.98).abs() < 1e-5);
    }

    #[test]
    fn test_light_direction_counter_rotates_with_heading() {
        let plane_scale = 40.0;
        let mut heading = HeadingFrame::default();
        let before = heading_light_direction(&heading, plane_scale);
        heading.apply_turn(0.5);
        let after = heading_light_direction(&heading, plane_scale);

        assert!((before.length() - 1.0).abs() < 1e-6);
        // The light's horizontal bearing swings with the heading yaw...
        let bearing_before = before.y.atan2(before.x);
        let bearing_after = after.y.atan2(after.x);
        assert!(((bearing_before - bearing_after) - 0.5).abs() < 1e-5);
        // ...while its elevation above the plane is untouched.
        assert!((before.z - after.z).abs() < 1e-6);
    }
}

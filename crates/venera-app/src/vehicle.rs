//! The walking vehicle, glued to the sampled surface.

use glam::{Mat4, Vec3};
use venera_height::{HeightField, place_on_surface};

/// Position of the walking entity on the terrain plane.
///
/// Walking rotates the globe under the capture camera, so the vehicle stays
/// at the plane origin while the surface streams beneath it; only its
/// out-of-plane coordinate changes, pinned each frame to the current field's
/// elevation plus a fixed clearance.
#[derive(Debug, Clone)]
pub struct VehicleTransform {
    /// Plane-space position; z is the elevation coordinate.
    pub position: Vec3,
    /// Fixed height of the vehicle origin above the sampled surface.
    pub clearance: f32,
}

impl VehicleTransform {
    /// A vehicle resting at the plane origin.
    pub fn new(clearance: f32) -> Self {
        Self {
            position: Vec3::ZERO,
            clearance,
        }
    }

    /// Re-pin the elevation from this frame's field.
    ///
    /// Must run after the field refresh in the same tick; placing the vehicle
    /// from a stale field puts it visibly above or below the ground.
    pub fn update_elevation(&mut self, field: &HeightField) {
        self.position.z = place_on_surface(field, self.position.x, self.position.y, self.clearance);
    }

    /// Model matrix for rendering.
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.position)
    }
}

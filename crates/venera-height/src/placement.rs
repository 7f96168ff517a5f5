//! Point-elevation queries for surface placement.

use crate::HeightField;

/// Current elevation at a plane coordinate.
///
/// Thin pass-through to [`HeightField::sample`]; a pure function of the
/// current field with no caching across frames.
pub fn elevation_at(field: &HeightField, x: f32, y: f32) -> f32 {
    field.sample(x, y)
}

/// Elevation plus a fixed clearance, keeping an entity glued to the surface.
pub fn place_on_surface(field: &HeightField, x: f32, y: f32, clearance: f32) -> f32 {
    elevation_at(field, x, y) + clearance
}

//! Pointer-drag rigs: the terrain-view pivot and the minimap orbit.
//!
//! Dragging over the main view tilts/yaws the whole terrain scene and
//! counter-rotates the orbit rig's spin by the same yaw, so the globe view
//! and the surface view stay visually consistent. Dragging over the minimap
//! (with the modifier held) orbits only the minimap camera.

use crate::{HeadingFrame, OrbitRig};

/// One pointer-drag step in normalized screen units (fractions of the
/// window, positive right/down).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DragDelta {
    pub dx: f32,
    pub dy: f32,
}

/// Tilt/yaw of the whole terrain scene under the chase camera.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerrainPivot {
    /// Tilt toward/away from the viewer, radians.
    pub pitch: f32,
    /// Rotation about the plane's up axis, radians.
    pub yaw: f32,
}

/// Longitude/latitude orbit of the minimap camera around the globe.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinimapOrbit {
    pub lon: f32,
    pub lat: f32,
}

/// Drag over the main view: pivot the terrain scene and keep the globe rig
/// and heading cue in step with the yaw component.
pub fn apply_main_drag(
    rig: &mut OrbitRig,
    heading: &mut HeadingFrame,
    pivot: &mut TerrainPivot,
    delta: DragDelta,
) {
    pivot.pitch += delta.dy;
    pivot.yaw += delta.dx;
    rig.spin(delta.dx);
    heading.apply_turn(delta.dx);
}

/// Drag over the minimap: orbit the minimap camera only. The 2x factor
/// makes a full-window drag sweep roughly a full revolution.
pub fn apply_minimap_drag(orbit: &mut MinimapOrbit, delta: DragDelta) {
    orbit.lon -= 2.0 * delta.dx;
    orbit.lat += 2.0 * delta.dy;
}

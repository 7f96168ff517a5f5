//! Camera rig synchronization over a unit sphere.
//!
//! Two paired orientation frames are kept in lockstep: the [`OrbitRig`]
//! carrying the nadir capture camera around the globe, and the
//! [`HeadingFrame`] yawing the terrain scene's directional cue opposite every
//! turn so the light stays visually locked to the walking direction.
//!
//! The rig's two rotation axes are derived once from its resting transform
//! and frozen; all subsequent motion composes axis-angle rotations onto a
//! single orientation quaternion. Re-deriving the axes from an accumulated
//! transform each tick is a known source of drift in rigs like this, so it is
//! deliberately impossible here.

mod drag;
mod heading;
mod orbit;
mod sync;

pub use drag::{DragDelta, MinimapOrbit, TerrainPivot, apply_main_drag, apply_minimap_drag};
pub use heading::HeadingFrame;
pub use orbit::{OrbitRig, RigError};
pub use sync::sync_rigs;

//! Elevation sampling from the orbital capture buffer.
//!
//! The nadir camera's offscreen capture is read back as RGBA bytes once per
//! frame; the red channel of that buffer *is* the elevation data. This crate
//! owns the quantized [`HeightField`] built from those bytes, the fixed
//! byte-to-elevation scale ([`height_multiplier`]), and the point-elevation
//! queries used for vehicle placement.

mod field;
mod multiplier;
mod placement;

pub use field::{HeightField, HeightFieldError};
pub use multiplier::height_multiplier;
pub use placement::{elevation_at, place_on_surface};

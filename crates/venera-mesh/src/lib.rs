//! Terrain plane mesh: fixed grid topology, per-frame height deformation.
//!
//! The plane is allocated once at startup with `(detail + 1)²` vertices and a
//! fixed triangle-list index buffer. Every frame the current
//! [`HeightField`](venera_height::HeightField) overwrites each vertex's
//! elevation and the smoothed vertex normals are recomputed from the new
//! geometry, so lighting always reflects the frame that produced it.

mod plane;
mod vertex;

pub use plane::TerrainMesh;
pub use vertex::MeshVertex;

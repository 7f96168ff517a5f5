//! wgpu render host for the globe and terrain scenes.
//!
//! Owns the GPU context, the offscreen nadir capture target with its
//! synchronous readback path, the two scene pipelines (textured-unlit for
//! globe and sky, lit for terrain and vehicle), and the viewport helpers for
//! picture-in-picture minimap rendering.

mod camera;
mod capture;
mod depth;
mod globe;
mod gpu;
mod mesh_buffer;
mod terrain;
mod texture;
mod textured;
mod viewport;

pub use camera::{CameraUniform, SceneCamera};
pub use capture::{CaptureError, CaptureTarget, padded_bytes_per_row};
pub use depth::DepthBuffer;
pub use globe::{GlobeScene, sphere_mesh};
pub use gpu::{GpuContext, GpuError, SurfaceError, init_gpu_blocking};
pub use mesh_buffer::MeshBuffer;
pub use terrain::{LightUniform, ModelUniform, RgbaPixels, TerrainScene, box_mesh};
pub use texture::SceneTexture;
pub use textured::{TEXTURED_UNLIT_SHADER_SOURCE, TexturedUnlitPipeline};
pub use viewport::{Viewport, capture_debug_viewport, minimap_viewport};

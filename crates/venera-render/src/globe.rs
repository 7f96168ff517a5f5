//! The globe scene: a bump-mapped unit sphere and its cameras' renders.

use glam::Vec3;
use venera_mesh::MeshVertex;

use crate::camera::SceneCamera;
use crate::capture::CaptureTarget;
use crate::mesh_buffer::MeshBuffer;
use crate::texture::SceneTexture;
use crate::textured::TexturedUnlitPipeline;
use crate::viewport::Viewport;

/// Generate a UV sphere of the given radius.
///
/// `segments` around the equator, `rings` pole to pole; UVs are
/// equirectangular. The globe uses 32×32.
pub fn sphere_mesh(radius: f32, segments: u32, rings: u32) -> (Vec<MeshVertex>, Vec<u32>) {
    let mut vertices = Vec::with_capacity(((rings + 1) * (segments + 1)) as usize);

    for ring in 0..=rings {
        let v = ring as f32 / rings as f32;
        let theta = v * std::f32::consts::PI;
        for seg in 0..=segments {
            let u = seg as f32 / segments as f32;
            let phi = u * std::f32::consts::TAU;

            let dir = Vec3::new(
                theta.sin() * phi.cos(),
                theta.cos(),
                theta.sin() * phi.sin(),
            );
            vertices.push(MeshVertex {
                position: (dir * radius).to_array(),
                normal: dir.to_array(),
                uv: [u, v],
            });
        }
    }

    let stride = segments + 1;
    let mut indices = Vec::with_capacity((rings * segments * 6) as usize);
    for ring in 0..rings {
        for seg in 0..segments {
            let a = ring * stride + seg;
            let b = a + stride;
            // Wound so front faces point outward.
            indices.extend_from_slice(&[a, a + 1, b, a + 1, b + 1, b]);
        }
    }

    (vertices, indices)
}

/// The globe scene and both pipelines it renders through: one targeting the
/// linear capture texture, one targeting the window surface for the minimap
/// and capture-debug views.
pub struct GlobeScene {
    capture_pipeline: TexturedUnlitPipeline,
    surface_pipeline: TexturedUnlitPipeline,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    texture_bind_group: wgpu::BindGroup,
    sphere: MeshBuffer,
}

impl GlobeScene {
    /// Build the sphere, upload the bump map, and create both pipelines.
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        bump_rgba: &[u8],
        bump_width: u32,
        bump_height: u32,
    ) -> Self {
        use wgpu::util::DeviceExt;

        let capture_pipeline = TexturedUnlitPipeline::new(
            device,
            CaptureTarget::FORMAT,
            None,
            Some(wgpu::Face::Back),
        );
        let surface_pipeline =
            TexturedUnlitPipeline::new(device, surface_format, None, Some(wgpu::Face::Back));

        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("globe-camera-uniform"),
            contents: bytemuck::cast_slice(&[SceneCamera::default().to_uniform()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("globe-camera-bind-group"),
            layout: &capture_pipeline.camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let bump = SceneTexture::from_rgba(
            device,
            queue,
            "globe-bump",
            bump_rgba,
            bump_width,
            bump_height,
            false,
        );
        let texture_bind_group = bump.bind_group(
            device,
            &capture_pipeline.texture_bind_group_layout,
            "globe-bump-bind-group",
        );

        let (vertices, indices) = sphere_mesh(1.0, 32, 32);
        let sphere = MeshBuffer::new(device, "globe-sphere", &vertices, &indices);

        Self {
            capture_pipeline,
            surface_pipeline,
            camera_buffer,
            camera_bind_group,
            texture_bind_group,
            sphere,
        }
    }

    /// Render the globe from the nadir camera into the capture target.
    ///
    /// This is the first half of a height refresh; the caller reads the
    /// target back immediately afterwards.
    pub fn render_capture(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        target: &CaptureTarget,
        camera: &SceneCamera,
    ) {
        self.render(device, queue, &target.view, &self.capture_pipeline, camera, None);
    }

    /// Render the globe into a window-surface view, optionally confined to a
    /// picture-in-picture viewport.
    pub fn render_to_surface(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_view: &wgpu::TextureView,
        camera: &SceneCamera,
        viewport: Option<Viewport>,
    ) {
        self.render(device, queue, surface_view, &self.surface_pipeline, camera, viewport);
    }

    fn render(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        target: &wgpu::TextureView,
        pipeline: &TexturedUnlitPipeline,
        camera: &SceneCamera,
        viewport: Option<Viewport>,
    ) {
        queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[camera.to_uniform()]),
        );

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("globe-encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("globe-pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        // Minimap and debug views clear only their scissor
                        // rectangle; the full capture clears everything.
                        load: if viewport.is_some() {
                            wgpu::LoadOp::Load
                        } else {
                            wgpu::LoadOp::Clear(wgpu::Color::BLACK)
                        },
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            if let Some(vp) = viewport {
                vp.apply(&mut pass);
            }

            pass.set_pipeline(&pipeline.pipeline);
            pass.set_bind_group(0, &self.camera_bind_group, &[]);
            pass.set_bind_group(1, &self.texture_bind_group, &[]);
            self.sphere.bind(&mut pass);
            self.sphere.draw(&mut pass);
        }

        queue.submit([encoder.finish()]);
    }
}

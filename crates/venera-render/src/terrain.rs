//! The terrain scene: deformed plane, vehicle, and sky dome in one pass.

use std::num::NonZeroU64;

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use venera_mesh::MeshVertex;

use crate::camera::SceneCamera;
use crate::depth::DepthBuffer;
use crate::mesh_buffer::MeshBuffer;
use crate::texture::SceneTexture;
use crate::textured::TexturedUnlitPipeline;
use crate::viewport::Viewport;

/// Directional light plus ambient term, as laid out for the GPU.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct LightUniform {
    /// Direction *toward* the light, xyz; w unused.
    pub direction: [f32; 4],
    pub sun_color: [f32; 4],
    pub ambient_color: [f32; 4],
}

impl LightUniform {
    /// The terrain scene's warm dusk palette with the given light bearing.
    pub fn with_direction(direction: Vec3) -> Self {
        let d = direction.normalize_or_zero();
        Self {
            direction: [d.x, d.y, d.z, 0.0],
            sun_color: [0.2, 0.19, 0.1, 1.0],
            ambient_color: [0.6, 0.57, 0.33, 1.0],
        }
    }
}

/// Per-drawable transform and material switches.
///
/// `params.x` > 0.5 enables the elevation-blended detail textures (terrain);
/// otherwise `tint` is used as a solid base color (vehicle). `params.y` is
/// the height multiplier the blend normalizes elevations by.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct ModelUniform {
    pub model: [[f32; 4]; 4],
    pub tint: [f32; 4],
    pub params: [f32; 4],
}

impl ModelUniform {
    /// The terrain plane: identity transform, textured, elevation-blended.
    pub fn terrain(height_multiplier: f32) -> Self {
        Self {
            model: Mat4::IDENTITY.to_cols_array_2d(),
            tint: [1.0, 1.0, 1.0, 1.0],
            params: [1.0, height_multiplier, 0.0, 0.0],
        }
    }

    /// The vehicle: solid matte gray at the given transform.
    pub fn vehicle(model: Mat4) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            tint: [0.6, 0.6, 0.6, 1.0],
            params: [0.0, 1.0, 0.0, 0.0],
        }
    }
}

/// An axis-aligned box with per-face normals, centered on the origin.
pub fn box_mesh(width: f32, depth: f32, height: f32) -> (Vec<MeshVertex>, Vec<u32>) {
    let (hx, hy, hz) = (width / 2.0, depth / 2.0, height / 2.0);
    let faces: [([f32; 3], [[f32; 3]; 4]); 6] = [
        // +Z
        (
            [0.0, 0.0, 1.0],
            [
                [-hx, -hy, hz],
                [hx, -hy, hz],
                [hx, hy, hz],
                [-hx, hy, hz],
            ],
        ),
        // -Z
        (
            [0.0, 0.0, -1.0],
            [
                [hx, -hy, -hz],
                [-hx, -hy, -hz],
                [-hx, hy, -hz],
                [hx, hy, -hz],
            ],
        ),
        // +X
        (
            [1.0, 0.0, 0.0],
            [
                [hx, -hy, hz],
                [hx, -hy, -hz],
                [hx, hy, -hz],
                [hx, hy, hz],
            ],
        ),
        // -X
        (
            [-1.0, 0.0, 0.0],
            [
                [-hx, -hy, -hz],
                [-hx, -hy, hz],
                [-hx, hy, hz],
                [-hx, hy, -hz],
            ],
        ),
        // +Y
        (
            [0.0, 1.0, 0.0],
            [
                [-hx, hy, hz],
                [hx, hy, hz],
                [hx, hy, -hz],
                [-hx, hy, -hz],
            ],
        ),
        // -Y
        (
            [0.0, -1.0, 0.0],
            [
                [-hx, -hy, -hz],
                [hx, -hy, -hz],
                [hx, -hy, hz],
                [-hx, -hy, hz],
            ],
        ),
    ];

    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for (normal, corners) in faces {
        let base = vertices.len() as u32;
        for corner in corners {
            vertices.push(MeshVertex {
                position: corner,
                normal,
                uv: [0.0, 0.0],
            });
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    (vertices, indices)
}

/// Raw decoded pixels handed in by the asset loader.
#[derive(Clone, Copy)]
pub struct RgbaPixels<'a> {
    pub rgba: &'a [u8],
    pub width: u32,
    pub height: u32,
}

/// Everything the surface view draws: lit terrain and vehicle, plus the
/// unlit sky dome, sharing one depth buffer and one camera.
pub struct TerrainScene {
    pipeline: wgpu::RenderPipeline,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    light_buffer: wgpu::Buffer,
    light_bind_group: wgpu::BindGroup,
    detail_bind_group: wgpu::BindGroup,
    terrain_model_bind_group: wgpu::BindGroup,
    vehicle_model_buffer: wgpu::Buffer,
    vehicle_model_bind_group: wgpu::BindGroup,
    terrain_mesh: MeshBuffer,
    vehicle_mesh: MeshBuffer,
    sky_pipeline: TexturedUnlitPipeline,
    sky_camera_bind_group: wgpu::BindGroup,
    sky_texture_bind_group: wgpu::BindGroup,
    sky_mesh: MeshBuffer,
}

impl TerrainScene {
    /// Build pipelines, upload detail and sky textures, and allocate the
    /// terrain, vehicle, and sky meshes.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        terrain_vertices: &[MeshVertex],
        terrain_indices: &[u32],
        plane_scale: f32,
        height_multiplier: f32,
        detail_low: RgbaPixels,
        detail_high: RgbaPixels,
        sky: RgbaPixels,
    ) -> Self {
        use wgpu::util::DeviceExt;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("terrain-lit-shader"),
            source: wgpu::ShaderSource::Wgsl(TERRAIN_LIT_SHADER_SOURCE.into()),
        });

        let uniform_entry = |binding, visibility, size| wgpu::BindGroupLayoutEntry {
            binding,
            visibility,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: NonZeroU64::new(size),
            },
            count: None,
        };

        let camera_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("terrain-camera-bgl"),
            entries: &[uniform_entry(0, wgpu::ShaderStages::VERTEX, 80)],
        });
        let light_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("terrain-light-bgl"),
            entries: &[uniform_entry(0, wgpu::ShaderStages::FRAGMENT, 48)],
        });
        let detail_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("terrain-detail-bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });
        let model_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("terrain-model-bgl"),
            entries: &[uniform_entry(
                0,
                wgpu::ShaderStages::VERTEX_FRAGMENT,
                std::mem::size_of::<ModelUniform>() as u64,
            )],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("terrain-pipeline-layout"),
            bind_group_layouts: &[&camera_bgl, &light_bgl, &detail_bgl, &model_bgl],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("terrain-pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[MeshVertex::layout()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DepthBuffer::FORMAT,
                depth_write_enabled: true,
                depth_compare: DepthBuffer::COMPARE_FUNCTION,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview_mask: None,
            cache: None,
        });

        // Shared uniforms
        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("terrain-camera-uniform"),
            contents: bytemuck::cast_slice(&[SceneCamera::default().to_uniform()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("terrain-camera-bind-group"),
            layout: &camera_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let light_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("terrain-light-uniform"),
            contents: bytemuck::cast_slice(&[LightUniform::with_direction(Vec3::new(
                0.0, 0.5, 0.125,
            ))]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let light_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("terrain-light-bind-group"),
            layout: &light_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: light_buffer.as_entire_binding(),
            }],
        });

        // Detail textures share the repeat sampler of the first.
        let low = SceneTexture::from_rgba(
            device,
            queue,
            "terrain-detail-low",
            detail_low.rgba,
            detail_low.width,
            detail_low.height,
            true,
        );
        let high = SceneTexture::from_rgba(
            device,
            queue,
            "terrain-detail-high",
            detail_high.rgba,
            detail_high.width,
            detail_high.height,
            true,
        );
        let detail_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("terrain-detail-bind-group"),
            layout: &detail_bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&low.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&high.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&low.sampler),
                },
            ],
        });

        // Per-drawable model uniforms
        let terrain_model_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("terrain-model-uniform"),
            contents: bytemuck::cast_slice(&[ModelUniform::terrain(height_multiplier)]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let terrain_model_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("terrain-model-bind-group"),
            layout: &model_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: terrain_model_buffer.as_entire_binding(),
            }],
        });

        let vehicle_model_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("vehicle-model-uniform"),
            contents: bytemuck::cast_slice(&[ModelUniform::vehicle(Mat4::IDENTITY)]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let vehicle_model_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("vehicle-model-bind-group"),
            layout: &model_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: vehicle_model_buffer.as_entire_binding(),
            }],
        });

        let terrain_mesh = MeshBuffer::new(device, "terrain-plane", terrain_vertices, terrain_indices);

        let (box_vertices, box_indices) = box_mesh(0.1, 0.1, 0.05);
        let vehicle_mesh = MeshBuffer::new(device, "vehicle-box", &box_vertices, &box_indices);

        // Sky dome: unlit, viewed from inside, half the plane across.
        let sky_pipeline = TexturedUnlitPipeline::new(
            device,
            surface_format,
            Some(DepthBuffer::FORMAT),
            Some(wgpu::Face::Front),
        );
        let sky_camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("sky-camera-bind-group"),
            layout: &sky_pipeline.camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });
        let sky_texture = SceneTexture::from_rgba(
            device,
            queue,
            "sky-dome",
            sky.rgba,
            sky.width,
            sky.height,
            false,
        );
        let sky_texture_bind_group = sky_texture.bind_group(
            device,
            &sky_pipeline.texture_bind_group_layout,
            "sky-dome-bind-group",
        );
        let (sky_vertices, sky_indices) = crate::globe::sphere_mesh(plane_scale / 2.0, 16, 16);
        let sky_mesh = MeshBuffer::new(device, "sky-dome", &sky_vertices, &sky_indices);

        Self {
            pipeline,
            camera_buffer,
            camera_bind_group,
            light_buffer,
            light_bind_group,
            detail_bind_group,
            terrain_model_bind_group,
            vehicle_model_buffer,
            vehicle_model_bind_group,
            terrain_mesh,
            vehicle_mesh,
            sky_pipeline,
            sky_camera_bind_group,
            sky_texture_bind_group,
            sky_mesh,
        }
    }

    /// Rewrite the terrain vertex buffer with this frame's deformed mesh.
    pub fn update_terrain(&self, queue: &wgpu::Queue, vertices: &[MeshVertex]) {
        self.terrain_mesh.update_vertices(queue, vertices);
    }

    /// Move the vehicle for this frame.
    pub fn set_vehicle_transform(&self, queue: &wgpu::Queue, model: Mat4) {
        queue.write_buffer(
            &self.vehicle_model_buffer,
            0,
            bytemuck::cast_slice(&[ModelUniform::vehicle(model)]),
        );
    }

    /// Re-aim the directional light (the heading frame's cue).
    pub fn set_light(&self, queue: &wgpu::Queue, light: LightUniform) {
        queue.write_buffer(&self.light_buffer, 0, bytemuck::cast_slice(&[light]));
    }

    /// Render sky, terrain, and vehicle into the surface view.
    pub fn render(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_view: &wgpu::TextureView,
        depth: &DepthBuffer,
        camera: &SceneCamera,
        viewport: Option<Viewport>,
    ) {
        queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[camera.to_uniform()]),
        );

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("terrain-encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("terrain-pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: surface_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &depth.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(DepthBuffer::CLEAR_VALUE),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            if let Some(vp) = viewport {
                vp.apply(&mut pass);
            }

            // Sky first; terrain and vehicle are closer and win the
            // reverse-Z depth test.
            pass.set_pipeline(&self.sky_pipeline.pipeline);
            pass.set_bind_group(0, &self.sky_camera_bind_group, &[]);
            pass.set_bind_group(1, &self.sky_texture_bind_group, &[]);
            self.sky_mesh.bind(&mut pass);
            self.sky_mesh.draw(&mut pass);

            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &self.camera_bind_group, &[]);
            pass.set_bind_group(1, &self.light_bind_group, &[]);
            pass.set_bind_group(2, &self.detail_bind_group, &[]);

            pass.set_bind_group(3, &self.terrain_model_bind_group, &[]);
            self.terrain_mesh.bind(&mut pass);
            self.terrain_mesh.draw(&mut pass);

            pass.set_bind_group(3, &self.vehicle_model_bind_group, &[]);
            self.vehicle_mesh.bind(&mut pass);
            self.vehicle_mesh.draw(&mut pass);
        }

        queue.submit([encoder.finish()]);
    }
}

/// WGSL shader source for the lit terrain and vehicle.
pub const TERRAIN_LIT_SHADER_SOURCE: &str = r#"
struct CameraUniform {
    view_proj: mat4x4<f32>,
    camera_pos: vec4<f32>,
};

struct LightUniform {
    direction: vec4<f32>,
    sun_color: vec4<f32>,
    ambient_color: vec4<f32>,
};

struct ModelUniform {
    model: mat4x4<f32>,
    tint: vec4<f32>,
    params: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> camera: CameraUniform;
@group(1) @binding(0)
var<uniform> light: LightUniform;
@group(2) @binding(0)
var t_low: texture_2d<f32>;
@group(2) @binding(1)
var t_high: texture_2d<f32>;
@group(2) @binding(2)
var s_detail: sampler;
@group(3) @binding(0)
var<uniform> model: ModelUniform;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_pos: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    let world = model.model * vec4<f32>(in.position, 1.0);
    out.clip_position = camera.view_proj * world;
    out.world_pos = world.xyz;
    out.normal = (model.model * vec4<f32>(in.normal, 0.0)).xyz;
    out.uv = in.uv;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let tiled = in.uv * 16.0;
    let low = textureSample(t_low, s_detail, tiled).rgb;
    let high = textureSample(t_high, s_detail, tiled).rgb;

    var base = model.tint.rgb;
    if (model.params.x > 0.5) {
        // Blend detail textures by elevation, normalized to the height
        // multiplier's full range.
        let h = clamp(in.world_pos.z / max(model.params.y, 1e-4) * 0.5 + 0.5, 0.0, 1.0);
        base = mix(low, high, h);
    }

    let n = normalize(in.normal);
    let ndotl = max(dot(n, normalize(light.direction.xyz)), 0.0);
    let lit = light.ambient_color.rgb + light.sun_color.rgb * ndotl;
    return vec4<f32>(base * lit, 1.0);
}
"#;

use std::mem::size_of;

use anyhow::{Context, Result};
use bytemuck::{bytes_of, cast_slice, Pod, Zeroable};
use glam::{const_vec3, Mat4, Vec3, Vec4};
use wgpu::util::DeviceExt;

use crate::{color::srgb_to_linear, field::Field, renderer::is_srgb, Engine};

/// Opacity every point is drawn with.
pub const POINT_OPACITY: f32 = 0.8;

const QUAD_VERTICES: [Vec3; 4] = [
    const_vec3!([-0.5, -0.5, 0.]),
    const_vec3!([-0.5, 0.5, 0.]),
    const_vec3!([0.5, -0.5, 0.]),
    const_vec3!([0.5, 0.5, 0.]),
];
const QUAD_INDICES: [u16; 6] = [0, 2, 1, 1, 2, 3];

#[derive(Debug, Copy, Clone, Default, Pod, Zeroable)]
#[repr(C)]
struct Uniforms {
    mv_mat: Mat4,
    p_mat: Mat4,
    particle_size: f32,
    opacity: f32,
    _pad0: [f32; 2],
}

impl Uniforms {
    fn new(engine: &Engine) -> Self {
        let camera = engine.camera();

        Self {
            mv_mat: engine.view_matrix() * engine.model_matrix(),
            p_mat: engine.projection_matrix(),
            particle_size: world_point_size(engine.point_size(), camera.fov),
            opacity: POINT_OPACITY,
            ..Default::default()
        }
    }
}

/// World-space quad size that covers as many pixels as a size-attenuated point
/// of `point_size`, which spans `point_size * (height / 2) / depth` pixels.
fn world_point_size(point_size: f32, fov_degrees: f32) -> f32 {
    point_size * (fov_degrees.to_radians() * 0.5).tan()
}

#[derive(Debug, Copy, Clone, Default, Pod, Zeroable)]
#[repr(C)]
struct Instance {
    position: Vec4,
    color: Vec4,
}

/// Point colors are sRGB; `linear` decodes them for targets that encode on store.
fn instances(field: &Field, linear: bool) -> Vec<Instance> {
    field
        .points()
        .iter()
        .map(|point| {
            let color = if linear {
                srgb_to_linear(point.color)
            } else {
                point.color
            };
            Instance {
                position: (point.position, 1.0).into(),
                color: (color, 1.0).into(),
            }
        })
        .collect()
}

pub struct ParticleRenderer {
    uniform_buffer: wgpu::Buffer,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    _instance_buffer: wgpu::Buffer,
    instance_count: u32,
    bind_group: wgpu::BindGroup,
    render_pipeline: wgpu::RenderPipeline,
}

impl ParticleRenderer {
    pub fn update(&self, queue: &wgpu::Queue, engine: &Engine) {
        queue.write_buffer(&self.uniform_buffer, 0, bytes_of(&Uniforms::new(engine)));
    }

    pub fn draw<'rpass>(&'rpass self, rpass: &mut impl wgpu::util::RenderEncoder<'rpass>) {
        rpass.set_pipeline(&self.render_pipeline);
        rpass.set_bind_group(0, &self.bind_group, &[]);
        rpass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        rpass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
        rpass.draw_indexed(0..(QUAD_INDICES.len() as _), 0, 0..self.instance_count);
    }
}

pub struct ParticleRendererBuilder<'a> {
    engine: &'a Engine,
    color_format: Option<wgpu::TextureFormat>,
    depth_format: Option<wgpu::TextureFormat>,
}

impl<'a> ParticleRendererBuilder<'a> {
    pub fn new(engine: &'a Engine) -> Self {
        Self {
            engine,
            color_format: None,
            depth_format: None,
        }
    }

    pub fn color_target_format(mut self, format: wgpu::TextureFormat) -> Self {
        self.color_format = Some(format);
        self
    }

    pub fn depth_format(mut self, format: wgpu::TextureFormat) -> Self {
        self.depth_format = Some(format);
        self
    }

    pub fn build(self, device: &wgpu::Device) -> Result<ParticleRenderer> {
        let engine = self.engine;
        let color_format = self.color_format.context("No color format provided")?;
        let depth_format = self.depth_format.context("No depth format provided")?;

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Particle Vertex Buffer"),
            contents: bytes_of(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Particle Index Buffer"),
            contents: bytes_of(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: None,
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: true },
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(size_of::<Instance>() as _),
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(size_of::<Uniforms>() as _),
                    },
                    count: None,
                },
            ],
        });

        let shader_module = device.create_shader_module(&wgpu::include_wgsl!("particle.wgsl"));

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: None,
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Particle Render Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader_module,
                entry_point: "vs_main",
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: size_of::<Vec3>() as _,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &[wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32x3,
                        offset: 0,
                        shader_location: 0,
                    }],
                }],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader_module,
                entry_point: "fs_main",
                targets: &[wgpu::ColorTargetState {
                    format: color_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                }],
            }),
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
                format: depth_format,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::LessEqual,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
        });

        let field = engine.field();

        let instance_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Particle Instance Buffer"),
            contents: cast_slice(instances(field, is_srgb(color_format)).as_slice()),
            usage: wgpu::BufferUsages::STORAGE,
        });
        let instance_count = field.len() as u32;

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Particle Uniform Buffer"),
            contents: bytes_of(&Uniforms::new(engine)),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: None,
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: instance_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: uniform_buffer.as_entire_binding(),
                },
            ],
        });

        Ok(ParticleRenderer {
            uniform_buffer,
            vertex_buffer,
            index_buffer,
            _instance_buffer: instance_buffer,
            instance_count,
            bind_group,
            render_pipeline,
        })
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    use super::*;
    use crate::FieldConfig;

    #[test]
    fn test_uniform_layout_matches_shader() {
        // two mat4x4 plus size and opacity, rounded up to 16 bytes
        assert_eq!(size_of::<Uniforms>(), 144);
        assert_eq!(size_of::<Instance>(), 32);
    }

    #[test]
    fn test_instances_follow_points() {
        let mut rng = Pcg64Mcg::seed_from_u64(11);
        let engine = Engine::with_rng(&FieldConfig::new(16, 0.5..=0.8, 3.0), &mut rng).unwrap();
        let instances = instances(engine.field(), false);

        assert_eq!(instances.len(), 16);
        for (instance, point) in instances.iter().zip(engine.field().points()) {
            assert_eq!(instance.position.truncate(), point.position);
            assert_eq!(instance.position.w, 1.0);
            assert_eq!(instance.color.truncate(), point.color);
        }
    }

    #[test]
    fn test_instances_decode_srgb_colors() {
        let mut rng = Pcg64Mcg::seed_from_u64(12);
        let engine = Engine::with_rng(&FieldConfig::new(8, 0.5..=0.8, 3.0), &mut rng).unwrap();
        let linear = instances(engine.field(), is_srgb(wgpu::TextureFormat::Bgra8UnormSrgb));

        for (instance, point) in linear.iter().zip(engine.field().points()) {
            assert_eq!(instance.position.truncate(), point.position);
            assert_eq!(instance.color.truncate(), srgb_to_linear(point.color));
            assert_eq!(instance.color.w, 1.0);
        }
    }

    #[test]
    fn test_world_point_size() {
        // tan(45°) = 1, so the size carries over unchanged
        assert!((world_point_size(3.0, 90.0) - 3.0).abs() < 1e-5);
        assert!(world_point_size(2.0, 75.0) < 2.0);
    }
}

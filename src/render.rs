use std::borrow::Cow;

use glam::{Mat4, Vec2, Vec3};
use wgpu::util::DeviceExt;

use crate::{physics::Attributes, types::Dimension};

const CAMERA_EYE: Vec3 = Vec3::new(0.0, 0.8, 4.2);
const CAMERA_TARGET: Vec3 = Vec3::new(0.0, -0.2, 0.0);

const FLOAT_SIZE: u64 = std::mem::size_of::<f32>() as u64;

const POSITION_2D: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];
const POSITION_3D: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];
const COLOR: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![1 => Float32x3];
const CORNER: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![2 => Float32x2];

/// Two triangles covering the unit square, expanded per particle in the shader
const CORNERS: [f32; 12] = [
    -1.0, -1.0, 1.0, -1.0, 1.0, 1.0, //
    -1.0, -1.0, 1.0, 1.0, -1.0, 1.0,
];

#[repr(C)]
#[derive(bytemuck::Pod, bytemuck::Zeroable, Clone, Copy, Debug, PartialEq)]
pub struct RenderUniforms {
    pub view_proj: Mat4,
    pub screen_size: Vec2,
    pub point_size: f32,
    pub padding: f32,
}

pub struct RenderModule {
    dimension: Dimension,
    num_particles: u32,
    sample_count: u32,
    format: wgpu::TextureFormat,
    uniforms: RenderUniforms,

    uniform_buffer: wgpu::Buffer,
    position_buffer: wgpu::Buffer,
    color_buffer: Option<wgpu::Buffer>,
    corner_buffer: wgpu::Buffer,
    msaa_view: Option<wgpu::TextureView>,

    bind_group: wgpu::BindGroup,
    pipeline: wgpu::RenderPipeline,
}

impl RenderModule {
    pub fn new(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
        sample_count: u32,
        dimension: Dimension,
        num_particles: usize,
        point_size: f32,
    ) -> Self {
        let shader_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("points"),
            source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(include_str!("render.wgsl"))),
        });

        let uniforms = RenderUniforms {
            view_proj: view_projection(dimension, config.width, config.height),
            screen_size: Vec2::new(config.width as f32, config.height as f32),
            point_size,
            padding: 0.0,
        };
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Render Uniform Buffer"),
            contents: bytemuck::bytes_of(&uniforms),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        // Sized once for the whole store, overwritten every frame
        let position_components = dimension.position_components() as u64;
        let position_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Particle Positions"),
            size: num_particles as u64 * position_components * FLOAT_SIZE,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let color_buffer = dimension.has_color().then(|| {
            device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("Particle Colors"),
                size: num_particles as u64 * 3 * FLOAT_SIZE,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            })
        });
        let corner_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Point Corners"),
            contents: bytemuck::cast_slice(&CORNERS),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: None,
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: None,
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let mut buffers = vec![wgpu::VertexBufferLayout {
            array_stride: position_components * FLOAT_SIZE,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: match dimension {
                Dimension::Two => &POSITION_2D,
                Dimension::Three => &POSITION_3D,
            },
        }];
        if dimension.has_color() {
            buffers.push(wgpu::VertexBufferLayout {
                array_stride: 3 * FLOAT_SIZE,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &COLOR,
            });
        }
        buffers.push(wgpu::VertexBufferLayout {
            array_stride: 2 * FLOAT_SIZE,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &CORNER,
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("render"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(dimension.window_title()),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader_module,
                entry_point: dimension.vertex_entry_point(),
                buffers: &buffers,
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader_module,
                entry_point: "fragment",
                targets: &[Some(config.format.into())],
            }),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState {
                count: sample_count,
                ..Default::default()
            },
            multiview: None,
        });

        let msaa_view = create_msaa_view(
            device,
            config.format,
            sample_count,
            config.width,
            config.height,
        );

        Self {
            dimension,
            num_particles: num_particles as u32,
            sample_count,
            format: config.format,
            uniforms,

            uniform_buffer,
            position_buffer,
            color_buffer,
            corner_buffer,
            msaa_view,

            bind_group,
            pipeline,
        }
    }

    /// Replace the whole contents of the vertex buffers
    pub fn upload(&self, queue: &wgpu::Queue, attributes: Attributes<'_>) {
        queue.write_buffer(
            &self.position_buffer,
            0,
            bytemuck::cast_slice(attributes.positions),
        );

        if let (Some(buffer), Some(colors)) = (&self.color_buffer, attributes.colors) {
            queue.write_buffer(buffer, 0, bytemuck::cast_slice(colors));
        }
    }

    /// Reset the viewport and everything sized after it
    pub fn update_size(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        width: u32,
        height: u32,
    ) {
        self.uniforms.screen_size = Vec2::new(width as f32, height as f32);
        self.uniforms.view_proj = view_projection(self.dimension, width, height);
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&self.uniforms));

        self.msaa_view = create_msaa_view(device, self.format, self.sample_count, width, height);
    }

    pub fn begin_pass<'a>(
        &'a self,
        encoder: &'a mut wgpu::CommandEncoder,
        view: &'a wgpu::TextureView,
    ) -> wgpu::RenderPass<'a> {
        let (attachment, resolve_target) = match &self.msaa_view {
            Some(msaa_view) => (msaa_view, Some(view)),
            None => (view, None),
        };

        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: None,
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: attachment,
                resolve_target,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        let size = self.uniforms.screen_size;
        rpass.set_viewport(0.0, 0.0, size.x, size.y, 0.0, 1.0);
        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, &self.bind_group, &[]);

        let mut slot = 0;
        rpass.set_vertex_buffer(slot, self.position_buffer.slice(..));
        if let Some(color_buffer) = &self.color_buffer {
            slot += 1;
            rpass.set_vertex_buffer(slot, color_buffer.slice(..));
        }
        rpass.set_vertex_buffer(slot + 1, self.corner_buffer.slice(..));

        rpass.draw(0..(CORNERS.len() / 2) as u32, 0..self.num_particles);

        rpass
    }
}

/// Clip-space transform for the demo; 2D positions are already in clip space
pub fn view_projection(dimension: Dimension, width: u32, height: u32) -> Mat4 {
    match dimension {
        Dimension::Two => Mat4::IDENTITY,
        Dimension::Three => {
            let aspect = width.max(1) as f32 / height.max(1) as f32;
            let projection = Mat4::perspective_rh(45f32.to_radians(), aspect, 0.1, 100.0);
            let view = Mat4::look_at_rh(CAMERA_EYE, CAMERA_TARGET, Vec3::Y);
            projection * view
        }
    }
}

fn create_msaa_view(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    sample_count: u32,
    width: u32,
    height: u32,
) -> Option<wgpu::TextureView> {
    if sample_count <= 1 {
        return None;
    }

    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Multisampled Frame"),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });

    Some(texture.create_view(&wgpu::TextureViewDescriptor::default()))
}

#[cfg(test)]
mod tests {
    use glam::Vec4;

    use super::*;

    #[test]
    fn uniforms_match_the_shader_layout() {
        assert_eq!(std::mem::size_of::<RenderUniforms>(), 80);
    }

    #[test]
    fn flat_demo_draws_in_clip_space() {
        assert_eq!(view_projection(Dimension::Two, 800, 600), Mat4::IDENTITY);
    }

    #[test]
    fn particle_volume_is_in_view() {
        let view_proj = view_projection(Dimension::Three, 800, 800);

        for corner in [
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(1.0, 0.6, 1.0),
            Vec3::new(-1.0, 0.6, 1.0),
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(-1.0, -1.0, 1.0),
        ] {
            let clip = view_proj * Vec4::from((corner, 1.0));
            let ndc = clip.truncate() / clip.w;
            assert!(clip.w > 0.0);
            assert!(ndc.x.abs() <= 1.0 && ndc.y.abs() <= 1.0, "{corner} -> {ndc}");
            assert!((0.0..=1.0).contains(&ndc.z));
        }
    }

    #[test]
    fn quad_covers_the_unit_square() {
        assert_eq!(CORNERS.len() % 2, 0);
        for xy in CORNERS.chunks_exact(2) {
            assert_eq!(xy[0].abs(), 1.0);
            assert_eq!(xy[1].abs(), 1.0);
        }
    }
}

//! Flat-color mesh pipeline.

use std::collections::{HashMap, HashSet};

use glam::Mat4;
use hovercube_scene::{Camera, ObjectId, Scene};
use wgpu::util::DeviceExt;

use crate::context::RenderContext;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Vertex of the shared unit cube.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    /// Object-space position.
    pub position: [f32; 3],
}

/// Corners of a unit cube centered on the origin.
pub const UNIT_CUBE_VERTICES: [MeshVertex; 8] = [
    MeshVertex { position: [-0.5, -0.5, 0.5] },
    MeshVertex { position: [0.5, -0.5, 0.5] },
    MeshVertex { position: [0.5, 0.5, 0.5] },
    MeshVertex { position: [-0.5, 0.5, 0.5] },
    MeshVertex { position: [-0.5, -0.5, -0.5] },
    MeshVertex { position: [0.5, -0.5, -0.5] },
    MeshVertex { position: [0.5, 0.5, -0.5] },
    MeshVertex { position: [-0.5, 0.5, -0.5] },
];

/// Counter-clockwise triangles for the six faces of [`UNIT_CUBE_VERTICES`].
pub const UNIT_CUBE_INDICES: [u16; 36] = [
    0, 1, 2, 2, 3, 0, // +Z
    1, 5, 6, 6, 2, 1, // +X
    5, 4, 7, 7, 6, 5, // -Z
    4, 0, 3, 3, 7, 4, // -X
    3, 2, 6, 6, 7, 3, // +Y
    4, 5, 1, 1, 0, 4, // -Y
];

/// Uniform data sent to GPU for camera transforms.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    /// View-projection matrix
    pub view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    /// Create camera uniform from camera.
    pub fn from_camera(camera: &Camera) -> Self {
        Self {
            view_proj: camera.view_projection_matrix().to_cols_array_2d(),
        }
    }
}

/// Per-object model transform and color.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniform {
    /// Model matrix including the geometry extents.
    pub model: [[f32; 4]; 4],
    /// Linear RGBA color.
    pub color: [f32; 4],
}

struct ObjectBinding {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

/// Draw list entry produced by [`collect_draws`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawItem {
    /// Scene object being drawn.
    pub object: ObjectId,
    /// GPU uniform for the object.
    pub uniform: ObjectUniform,
}

/// Visible meshes of `scene` in traversal order.
pub fn collect_draws(scene: &Scene) -> Vec<DrawItem> {
    scene
        .traverse_ids()
        .into_iter()
        .filter(|id| scene.is_visible(*id))
        .filter_map(|id| {
            let mesh = scene.object(id)?.mesh.as_ref()?;
            let world = scene.world_matrix(id)?;
            let model = world * Mat4::from_scale(mesh.geometry.size());
            Some(DrawItem {
                object: id,
                uniform: ObjectUniform {
                    model: model.to_cols_array_2d(),
                    color: mesh.material.color.to_linear_rgba(),
                },
            })
        })
        .collect()
}

/// Pipeline drawing box meshes with an unlit color.
pub struct MeshPipeline {
    render_pipeline: wgpu::RenderPipeline,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    object_bind_group_layout: wgpu::BindGroupLayout,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    depth_view: wgpu::TextureView,
    objects: HashMap<ObjectId, ObjectBinding>,
    draws: Vec<ObjectId>,
}

impl MeshPipeline {
    /// Create the pipeline for the context's surface format.
    pub fn new(ctx: &RenderContext) -> Self {
        let device = &ctx.device;

        let camera_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Camera Buffer"),
            size: std::mem::size_of::<CameraUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let camera_bind_group_layout = uniform_layout(device, "Camera Bind Group Layout");
        let object_bind_group_layout = uniform_layout(device, "Object Bind Group Layout");

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Camera Bind Group"),
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Unit Cube Vertex Buffer"),
            contents: bytemuck::cast_slice(&UNIT_CUBE_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Unit Cube Index Buffer"),
            contents: bytemuck::cast_slice(&UNIT_CUBE_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Basic Material Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/basic.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Mesh Pipeline Layout"),
            bind_group_layouts: &[&camera_bind_group_layout, &object_bind_group_layout],
            push_constant_ranges: &[],
        });

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Mesh Render Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_main",
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<MeshVertex>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &[wgpu::VertexAttribute {
                        offset: 0,
                        shader_location: 0,
                        format: wgpu::VertexFormat::Float32x3,
                    }],
                }],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.config.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
        });

        let depth_view = create_depth_view(device, ctx.size);

        Self {
            render_pipeline,
            camera_buffer,
            camera_bind_group,
            object_bind_group_layout,
            vertex_buffer,
            index_buffer,
            depth_view,
            objects: HashMap::new(),
            draws: Vec::new(),
        }
    }

    /// Recreate the depth buffer for a new surface size.
    pub fn resize(&mut self, device: &wgpu::Device, size: (u32, u32)) {
        self.depth_view = create_depth_view(device, size);
    }

    /// Upload camera and object uniforms for this frame.
    pub fn prepare(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, scene: &Scene, camera: &Camera) {
        queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[CameraUniform::from_camera(camera)]),
        );

        let draws = collect_draws(scene);
        let live: HashSet<ObjectId> = draws.iter().map(|draw| draw.object).collect();
        let before = self.objects.len();
        self.objects.retain(|id, _| live.contains(id));
        if self.objects.len() != before {
            tracing::debug!(
                dropped = before - self.objects.len(),
                "released GPU bindings for removed objects"
            );
        }

        self.draws.clear();
        for draw in draws {
            let layout = &self.object_bind_group_layout;
            let binding = self
                .objects
                .entry(draw.object)
                .or_insert_with(|| create_object_binding(device, layout, draw.object));
            queue.write_buffer(&binding.buffer, 0, bytemuck::cast_slice(&[draw.uniform]));
            self.draws.push(draw.object);
        }
    }

    /// Record the draw pass into `encoder`, clearing to `clear_color`.
    pub fn draw(&self, encoder: &mut wgpu::CommandEncoder, view: &wgpu::TextureView, clear_color: wgpu::Color) {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Mesh Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear_color),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            ..Default::default()
        });

        render_pass.set_pipeline(&self.render_pipeline);
        render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);

        for id in &self.draws {
            if let Some(binding) = self.objects.get(id) {
                render_pass.set_bind_group(1, &binding.bind_group, &[]);
                render_pass.draw_indexed(0..UNIT_CUBE_INDICES.len() as u32, 0, 0..1);
            }
        }
    }

    /// Number of objects drawn by the last [`MeshPipeline::prepare`].
    pub fn draw_count(&self) -> usize {
        self.draws.len()
    }
}

fn uniform_layout(device: &wgpu::Device, label: &str) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
    })
}

fn create_object_binding(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    id: ObjectId,
) -> ObjectBinding {
    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Object Uniform Buffer"),
        size: std::mem::size_of::<ObjectUniform>() as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Object Bind Group"),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: buffer.as_entire_binding(),
        }],
    });
    tracing::debug!(object = %id, "created GPU binding");
    ObjectBinding { buffer, bind_group }
}

fn create_depth_view(device: &wgpu::Device, size: (u32, u32)) -> wgpu::TextureView {
    let depth_texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width: size.0.max(1),
            height: size.1.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    depth_texture.create_view(&wgpu::TextureViewDescriptor::default())
}

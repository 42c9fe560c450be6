use crate::shaders;
use bytemuck::{Pod, Zeroable};
use cubeview_render::{FrameView, RenderMode};
use cubeview_scene::{Scene, SceneObject};
use glam::Mat4;
use wgpu::util::DeviceExt;

const MAX_LIGHTS: usize = 8;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct GpuLight {
    position: [f32; 4],
    color: [f32; 4],
    attenuation: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Globals {
    view_proj: [[f32; 4]; 4],
    eye: [f32; 4],
    light_count: [u32; 4],
    lights: [GpuLight; MAX_LIGHTS],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Vertex {
    position: [f32; 3],
    normal: [f32; 3],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct InstanceData {
    model_0: [f32; 4],
    model_1: [f32; 4],
    model_2: [f32; 4],
    model_3: [f32; 4],
    ambient: [f32; 4],
    diffuse: [f32; 4],
    specular_shininess: [f32; 4],
}

/// The fixed pipeline produced clip z in [-1, 1]; wgpu consumes [0, 1].
fn depth_remap() -> Mat4 {
    Mat4::from_translation(glam::Vec3::new(0.0, 0.0, 0.5))
        * Mat4::from_scale(glam::Vec3::new(1.0, 1.0, 0.5))
}

/// One scene object's GPU-side buffers: a triangle-soup vertex buffer and a
/// line index stream closing each triangle's 3-edge loop.
struct ObjectBuffers {
    vertex_buffer: wgpu::Buffer,
    vertex_count: u32,
    edge_index_buffer: wgpu::Buffer,
    edge_index_count: u32,
}

impl ObjectBuffers {
    fn upload(device: &wgpu::Device, object: &SceneObject) -> Self {
        let vertices: Vec<Vertex> = object
            .mesh
            .vertices()
            .iter()
            .zip(object.mesh.normals())
            .map(|(v, n)| Vertex {
                position: v.to_array(),
                normal: n.to_array(),
            })
            .collect();

        // Closed loop per triangle: three edges, six indices.
        let mut edges: Vec<u32> = Vec::with_capacity(vertices.len() * 2);
        for k in 0..object.mesh.triangle_count() as u32 {
            let base = 3 * k;
            edges.extend_from_slice(&[
                base,
                base + 1,
                base + 1,
                base + 2,
                base + 2,
                base,
            ]);
        }

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("object_vertex_buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let edge_index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("object_edge_index_buffer"),
            contents: bytemuck::cast_slice(&edges),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            vertex_buffer,
            vertex_count: vertices.len() as u32,
            edge_index_buffer,
            edge_index_count: edges.len() as u32,
        }
    }
}

/// wgpu renderer for the scene: solid triangle pipeline plus a wireframe
/// line pipeline, both fed by the same object buffers.
pub struct WgpuSceneRenderer {
    solid_pipeline: wgpu::RenderPipeline,
    wire_pipeline: wgpu::RenderPipeline,
    globals_buffer: wgpu::Buffer,
    globals_bind_group: wgpu::BindGroup,
    objects: Vec<ObjectBuffers>,
    instance_buffer: wgpu::Buffer,
    depth_texture: wgpu::TextureView,
}

impl WgpuSceneRenderer {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        scene: &Scene,
    ) -> Self {
        let globals_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("globals_buffer"),
            contents: bytemuck::bytes_of(&Globals {
                view_proj: Mat4::IDENTITY.to_cols_array_2d(),
                eye: [0.0; 4],
                light_count: [0; 4],
                lights: [GpuLight {
                    position: [0.0; 4],
                    color: [0.0; 4],
                    attenuation: [0.0; 4],
                }; MAX_LIGHTS],
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("globals_bind_group_layout"),
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
        });

        let globals_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("globals_bind_group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::SCENE_SHADER.into()),
        });

        let vertex_layouts = [
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<Vertex>() as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &wgpu::vertex_attr_array![
                    0 => Float32x3,
                    1 => Float32x3,
                ],
            },
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<InstanceData>() as u64,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &wgpu::vertex_attr_array![
                    2 => Float32x4,
                    3 => Float32x4,
                    4 => Float32x4,
                    5 => Float32x4,
                    6 => Float32x4,
                    7 => Float32x4,
                    8 => Float32x4,
                ],
            },
        ];

        let depth_stencil = Some(wgpu::DepthStencilState {
            format: wgpu::TextureFormat::Depth32Float,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: Default::default(),
            bias: Default::default(),
        });

        let solid_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("solid_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &vertex_layouts,
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: Some(wgpu::Face::Back),
                ..Default::default()
            },
            depth_stencil: depth_stencil.clone(),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        // Wireframe reuses the shader; lines cannot be back-face culled.
        let wire_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("wire_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &vertex_layouts,
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::LineList,
                ..Default::default()
            },
            depth_stencil,
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        let objects: Vec<ObjectBuffers> = scene
            .objects()
            .iter()
            .map(|object| ObjectBuffers::upload(device, object))
            .collect();

        let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("instance_buffer"),
            size: (objects.len().max(1) * std::mem::size_of::<InstanceData>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let depth_texture = Self::create_depth_texture(device, width, height);

        tracing::debug!(
            objects = objects.len(),
            lights = scene.lights().len(),
            "scene uploaded"
        );

        Self {
            solid_pipeline,
            wire_pipeline,
            globals_buffer,
            globals_bind_group,
            objects,
            instance_buffer,
            depth_texture,
        }
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_texture = Self::create_depth_texture(device, width, height);
    }

    /// Render one frame of the scene into the given surface view.
    pub fn render(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        scene: &Scene,
        frame: &FrameView,
    ) {
        let mut lights = [GpuLight {
            position: [0.0; 4],
            color: [0.0; 4],
            attenuation: [0.0; 4],
        }; MAX_LIGHTS];
        let light_count = scene.lights().len().min(MAX_LIGHTS);
        for (slot, light) in lights.iter_mut().zip(scene.lights()) {
            slot.position = light.position.to_array();
            slot.color = light.color.extend(1.0).to_array();
            slot.attenuation = [light.attenuation, 0.0, 0.0, 0.0];
        }

        queue.write_buffer(
            &self.globals_buffer,
            0,
            bytemuck::bytes_of(&Globals {
                view_proj: (depth_remap() * frame.view_proj).to_cols_array_2d(),
                eye: frame.eye.extend(1.0).to_array(),
                light_count: [light_count as u32, 0, 0, 0],
                lights,
            }),
        );

        let instances: Vec<InstanceData> = scene
            .objects()
            .iter()
            .map(|object| {
                let cols = object.model_matrix().to_cols_array_2d();
                let m = &object.material;
                InstanceData {
                    model_0: cols[0],
                    model_1: cols[1],
                    model_2: cols[2],
                    model_3: cols[3],
                    ambient: m.ambient.extend(1.0).to_array(),
                    diffuse: m.diffuse.extend(1.0).to_array(),
                    specular_shininess: [
                        m.specular.x,
                        m.specular.y,
                        m.specular.z,
                        m.shininess,
                    ],
                }
            })
            .collect();
        if !instances.is_empty() {
            queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&instances));
        }

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("render_encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("main_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            match frame.mode {
                RenderMode::Solid => pass.set_pipeline(&self.solid_pipeline),
                RenderMode::Wireframe => pass.set_pipeline(&self.wire_pipeline),
            }
            pass.set_bind_group(0, &self.globals_bind_group, &[]);
            pass.set_vertex_buffer(1, self.instance_buffer.slice(..));

            for (i, buffers) in self.objects.iter().enumerate() {
                let instance = i as u32..i as u32 + 1;
                pass.set_vertex_buffer(0, buffers.vertex_buffer.slice(..));
                match frame.mode {
                    RenderMode::Solid => {
                        pass.draw(0..buffers.vertex_count, instance);
                    }
                    RenderMode::Wireframe => {
                        pass.set_index_buffer(
                            buffers.edge_index_buffer.slice(..),
                            wgpu::IndexFormat::Uint32,
                        );
                        pass.draw_indexed(0..buffers.edge_index_count, 0, instance);
                    }
                }
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
    }

    fn create_depth_texture(
        device: &wgpu::Device,
        width: u32,
        height: u32,
    ) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth_texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Depth32Float,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&Default::default())
    }
}

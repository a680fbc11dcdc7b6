// src/rendering_lib/renderer.rs

use std::collections::HashMap;
use std::path::PathBuf;
use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;

use super::shader::MAX_POINT_LIGHTS;
use super::texture::{GpuTexture, DEPTH_FORMAT};
use super::vertex::Vertex;
use crate::engine_lib::assets::{MeshData, ModelData};
use crate::engine_lib::camera::Camera;
use crate::engine_lib::scene_types::{ModelId, SceneDescription, ShadingKind};

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct FrameUniform {
    view_proj: [[f32; 4]; 4],
    view_pos: [f32; 4],
    light_color: [f32; 4],
    attenuation: [f32; 4],
    lights: [[f32; 4]; MAX_POINT_LIGHTS],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct InstanceUniform {
    model: [[f32; 4]; 4],
    normal_matrix: [[f32; 4]; 4],
    own_light: [f32; 4],
}

impl InstanceUniform {
    fn new(model: Mat4, own_light: Vec3) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            normal_matrix: model.inverse().transpose().to_cols_array_2d(),
            own_light: own_light.extend(0.0).to_array(),
        }
    }
}

struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    texture_index: usize,
}

// One per placement, in `SceneDescription::placements` order.
struct InstanceSlot {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

const WHITE_TEXTURE: usize = 0;

pub struct Renderer {
    lit_pipeline: wgpu::RenderPipeline,
    lamp_pipeline: wgpu::RenderPipeline,

    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,

    models: HashMap<ModelId, Vec<GpuMesh>>,
    textures: Vec<wgpu::BindGroup>,
    instances: Vec<InstanceSlot>,

    _depth_texture: wgpu::Texture,
    depth_view: wgpu::TextureView,
}

impl Renderer {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        shader_source: &str,
        width: u32,
        height: u32,
        scene: &SceneDescription,
        models: &HashMap<ModelId, ModelData>,
    ) -> Self {
        let shader_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Walkthrough Shader Module"),
            source: wgpu::ShaderSource::Wgsl(shader_source.into()),
        });

        let uniform_entry = wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };
        let frame_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[uniform_entry],
            label: Some("frame_bind_group_layout"),
        });
        let instance_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[uniform_entry],
            label: Some("instance_bind_group_layout"),
        });
        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
            label: Some("texture_bind_group_layout"),
        });

        let frame_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Frame Uniform Buffer"),
            contents: bytemuck::bytes_of(&FrameUniform::zeroed()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &frame_layout,
            entries: &[wgpu::BindGroupEntry { binding: 0, resource: frame_buffer.as_entire_binding() }],
            label: Some("frame_bind_group"),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Walkthrough Pipeline Layout"),
            bind_group_layouts: &[&frame_layout, &instance_layout, &texture_layout],
            push_constant_ranges: &[],
        });
        let lit_pipeline = create_pipeline(device, &pipeline_layout, &shader_module, surface_format, "fs_lit", "Lit Pipeline");
        let lamp_pipeline = create_pipeline(device, &pipeline_layout, &shader_module, surface_format, "fs_lamp", "Lamp Pipeline");

        let mut textures = vec![texture_bind_group(device, &texture_layout, &GpuTexture::white(device, queue))];
        let mut texture_cache: HashMap<PathBuf, usize> = HashMap::new();
        let mut gpu_models = HashMap::new();
        for (&id, model) in models {
            let meshes = model
                .meshes
                .iter()
                .filter(|mesh| !mesh.indices.is_empty())
                .map(|mesh| {
                    let texture_index = resolve_texture(device, queue, &texture_layout, mesh, &mut textures, &mut texture_cache);
                    upload_mesh(device, mesh, texture_index)
                })
                .collect();
            gpu_models.insert(id, meshes);
        }
        log::info!("Uploaded {} models, {} textures", gpu_models.len(), textures.len() - 1);

        let instances = scene
            .placements()
            .map(|placement| {
                let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(placement.name),
                    contents: bytemuck::bytes_of(&InstanceUniform::new(placement.model_matrix(0.0), Vec3::ZERO)),
                    usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                });
                let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                    layout: &instance_layout,
                    entries: &[wgpu::BindGroupEntry { binding: 0, resource: buffer.as_entire_binding() }],
                    label: Some("instance_bind_group"),
                });
                InstanceSlot { buffer, bind_group }
            })
            .collect();

        let (depth_texture, depth_view) = GpuTexture::create_depth(device, width, height);

        Self {
            lit_pipeline,
            lamp_pipeline,
            frame_buffer,
            frame_bind_group,
            models: gpu_models,
            textures,
            instances,
            _depth_texture: depth_texture,
            depth_view,
        }
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        let (texture, view) = GpuTexture::create_depth(device, width, height);
        self._depth_texture = texture;
        self.depth_view = view;
    }

    pub fn render_scene(
        &mut self,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        output_view: &wgpu::TextureView,
        scene: &SceneDescription,
        camera: &Camera,
        time: f32,
        aspect_ratio: f32,
    ) {
        let frame = frame_uniform(scene, camera, aspect_ratio);
        queue.write_buffer(&self.frame_buffer, 0, bytemuck::bytes_of(&frame));

        for (placement, slot) in scene.placements().zip(&self.instances) {
            let own_light = match placement.shading {
                ShadingKind::Lamp { light_index } => scene
                    .lights
                    .get(light_index)
                    .map(|light| light.position)
                    .unwrap_or(Vec3::ZERO),
                ShadingKind::Lit => Vec3::ZERO,
            };
            let uniform = InstanceUniform::new(placement.model_matrix(time), own_light);
            queue.write_buffer(&slot.buffer, 0, bytemuck::bytes_of(&uniform));
        }

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Scene Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: output_view,
                resolve_target: None,
                ops: wgpu::Operations { load: wgpu::LoadOp::Clear(wgpu::Color::BLACK), store: wgpu::StoreOp::Store },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_view,
                depth_ops: Some(wgpu::Operations { load: wgpu::LoadOp::Clear(1.0), store: wgpu::StoreOp::Store }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        render_pass.set_bind_group(0, &self.frame_bind_group, &[]);
        for (placement, slot) in scene.placements().zip(&self.instances) {
            let Some(meshes) = self.models.get(placement.model) else { continue };
            let pipeline = match placement.shading {
                ShadingKind::Lit => &self.lit_pipeline,
                ShadingKind::Lamp { .. } => &self.lamp_pipeline,
            };
            render_pass.set_pipeline(pipeline);
            render_pass.set_bind_group(1, &slot.bind_group, &[]);
            for mesh in meshes {
                render_pass.set_bind_group(2, &self.textures[mesh.texture_index], &[]);
                render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                render_pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..mesh.index_count, 0, 0..1);
            }
        }
    }
}

fn frame_uniform(scene: &SceneDescription, camera: &Camera, aspect_ratio: f32) -> FrameUniform {
    let view_proj = camera.projection_matrix(aspect_ratio) * camera.view_matrix();
    let mut lights = [[0.0; 4]; MAX_POINT_LIGHTS];
    for (slot, light) in lights.iter_mut().zip(&scene.lights) {
        *slot = light.position.extend(1.0).to_array();
    }
    let light_count = scene.lights.len().min(MAX_POINT_LIGHTS);
    let lighting = &scene.lighting;

    FrameUniform {
        view_proj: view_proj.to_cols_array_2d(),
        view_pos: camera.position.extend(1.0).to_array(),
        light_color: lighting.color.extend(1.0).to_array(),
        attenuation: [lighting.constant, lighting.linear, lighting.quadratic, light_count as f32],
        lights,
    }
}

fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader_module: &wgpu::ShaderModule,
    surface_format: wgpu::TextureFormat,
    fragment_entry: &str,
    label: &str,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader_module,
            entry_point: "vs_main",
            buffers: &[Vertex::desc()],
        },
        fragment: Some(wgpu::FragmentState {
            module: shader_module,
            entry_point: fragment_entry,
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        // House interiors are seen from both sides.
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
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
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview: None,
    })
}

fn upload_mesh(device: &wgpu::Device, mesh: &MeshData, texture_index: usize) -> GpuMesh {
    let vertices: Vec<Vertex> = mesh
        .positions
        .iter()
        .zip(&mesh.normals)
        .zip(&mesh.tex_coords)
        .map(|((p, n), t)| Vertex::new(*p, *n, *t))
        .collect();
    let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(mesh.name.as_str()),
        contents: bytemuck::cast_slice(&vertices),
        usage: wgpu::BufferUsages::VERTEX,
    });
    let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(mesh.name.as_str()),
        contents: bytemuck::cast_slice(&mesh.indices),
        usage: wgpu::BufferUsages::INDEX,
    });
    GpuMesh { vertex_buffer, index_buffer, index_count: mesh.indices.len() as u32, texture_index }
}

fn resolve_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    layout: &wgpu::BindGroupLayout,
    mesh: &MeshData,
    textures: &mut Vec<wgpu::BindGroup>,
    cache: &mut HashMap<PathBuf, usize>,
) -> usize {
    let Some(path) = &mesh.diffuse_texture else { return WHITE_TEXTURE };
    if let Some(&index) = cache.get(path) {
        return index;
    }
    let index = match GpuTexture::from_path(device, queue, path) {
        Ok(texture) => {
            textures.push(texture_bind_group(device, layout, &texture));
            textures.len() - 1
        }
        Err(e) => {
            log::warn!("{}; drawing '{}' untextured", e, mesh.name);
            WHITE_TEXTURE
        }
    };
    cache.insert(path.clone(), index);
    index
}

fn texture_bind_group(device: &wgpu::Device, layout: &wgpu::BindGroupLayout, texture: &GpuTexture) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout,
        entries: &[
            wgpu::BindGroupEntry { binding: 0, resource: wgpu::BindingResource::TextureView(&texture.view) },
            wgpu::BindGroupEntry { binding: 1, resource: wgpu::BindingResource::Sampler(&texture.sampler) },
        ],
        label: Some("texture_bind_group"),
    })
}

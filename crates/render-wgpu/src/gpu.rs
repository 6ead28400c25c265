use std::collections::BTreeMap;
use std::ops::Range;

use diorama_common::{MaterialId, MeshHandle};
use diorama_grass::BladeMesh;
use diorama_render::{RenderBackend, ShaderValue};
use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;

use crate::error::GpuError;
use crate::shaders;
use crate::uniforms::{BendUniform, FrameUniform, InstanceRaw, Vertex};

const TARGET_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;
const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Slack around the culling volume, in NDC units. Instances are culled by
/// origin, so this keeps blades whose root is just off-screen.
const CULL_MARGIN: f32 = 0.1;

struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

struct GpuMaterial {
    values: BendUniform,
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    dirty: bool,
}

struct QueuedDraw {
    mesh: MeshHandle,
    material: MaterialId,
    instances: Range<u32>,
}

/// Counters for one rendered frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub draws: usize,
    pub instances: usize,
    pub culled: usize,
    /// Draws dropped because their mesh was never uploaded.
    pub skipped_draws: usize,
}

/// Headless wgpu renderer for instanced grass.
///
/// Implements [`RenderBackend`]: named uniforms update a per-material
/// [`BendUniform`], instanced draws are queued (and culled by origin against
/// the active culling matrix) until [`render`](Self::render) encodes them
/// into an offscreen target.
pub struct GpuBackend {
    device: wgpu::Device,
    queue: wgpu::Queue,
    pipeline: wgpu::RenderPipeline,
    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    material_layout: wgpu::BindGroupLayout,
    materials: BTreeMap<MaterialId, GpuMaterial>,
    meshes: BTreeMap<MeshHandle, GpuMesh>,
    instances: Vec<InstanceRaw>,
    draws: Vec<QueuedDraw>,
    culled: usize,
    view_proj: Mat4,
    culling: Option<Mat4>,
    target: wgpu::Texture,
    target_view: wgpu::TextureView,
    depth_view: wgpu::TextureView,
    width: u32,
    height: u32,
}

impl GpuBackend {
    /// Create a device without a window and an offscreen target of the
    /// given size.
    pub fn headless(width: u32, height: u32) -> Result<Self, GpuError> {
        if width == 0 || height == 0 {
            return Err(GpuError::InvalidSize { width, height });
        }

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface: None,
            force_fallback_adapter: false,
        }))
        .ok_or(GpuError::NoAdapter)?;
        tracing::info!(adapter = ?adapter.get_info().name, "using GPU adapter");

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("diorama_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_defaults(),
                memory_hints: Default::default(),
            },
            None,
        ))?;

        Ok(Self::new(device, queue, width, height))
    }

    /// Build the renderer on an existing device.
    pub fn new(device: wgpu::Device, queue: wgpu::Queue, width: u32, height: u32) -> Self {
        let frame_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("frame_uniform"),
            contents: bytemuck::bytes_of(&FrameUniform::new(Mat4::IDENTITY)),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let frame_layout = uniform_layout(&device, "frame_layout", wgpu::ShaderStages::VERTEX);
        let material_layout = uniform_layout(
            &device,
            "bend_layout",
            wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
        );

        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("frame_bind_group"),
            layout: &frame_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("grass_pipeline_layout"),
            bind_group_layouts: &[&frame_layout, &material_layout],
            push_constant_ranges: &[],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("grass_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::GRASS_SHADER.into()),
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("grass_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<Vertex>() as u64,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &wgpu::vertex_attr_array![
                            0 => Float32x3,
                            1 => Float32x3,
                            2 => Float32x2,
                        ],
                    },
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<InstanceRaw>() as u64,
                        step_mode: wgpu::VertexStepMode::Instance,
                        attributes: &wgpu::vertex_attr_array![
                            3 => Float32x4,
                            4 => Float32x4,
                            5 => Float32x4,
                            6 => Float32x4,
                        ],
                    },
                ],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: TARGET_FORMAT,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            // Blades are single quads seen from both sides.
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        let (target, target_view) = create_target(&device, width, height);
        let depth_view = create_depth_texture(&device, width, height);

        Self {
            device,
            queue,
            pipeline,
            frame_buffer,
            frame_bind_group,
            material_layout,
            materials: BTreeMap::new(),
            meshes: BTreeMap::new(),
            instances: Vec::new(),
            draws: Vec::new(),
            culled: 0,
            view_proj: Mat4::IDENTITY,
            culling: None,
            target,
            target_view,
            depth_view,
            width,
            height,
        }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Camera matrix used for drawing and as the default culling volume.
    pub fn set_view_projection(&mut self, view_proj: Mat4) {
        self.view_proj = view_proj;
    }

    pub fn upload_blade(&mut self, handle: MeshHandle, blade: &BladeMesh) {
        let vertices = blade_vertices(blade);
        let vertex_buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("blade_vertex_buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("blade_index_buffer"),
            contents: bytemuck::cast_slice(&blade.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        self.meshes.insert(
            handle,
            GpuMesh {
                vertex_buffer,
                index_buffer,
                index_count: blade.indices.len() as u32,
            },
        );
        tracing::debug!(mesh = handle.0, vertices = vertices.len(), "uploaded blade mesh");
    }

    /// Encode and submit every queued draw, then clear the queue.
    pub fn render(&mut self) -> FrameStats {
        self.queue.write_buffer(
            &self.frame_buffer,
            0,
            bytemuck::bytes_of(&FrameUniform::new(self.view_proj)),
        );
        for material in self.materials.values_mut().filter(|m| m.dirty) {
            self.queue
                .write_buffer(&material.buffer, 0, bytemuck::bytes_of(&material.values));
            material.dirty = false;
        }

        let instance_buffer = (!self.instances.is_empty()).then(|| {
            self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("instance_buffer"),
                contents: bytemuck::cast_slice(&self.instances),
                usage: wgpu::BufferUsages::VERTEX,
            })
        });

        let mut stats = FrameStats {
            culled: self.culled,
            ..FrameStats::default()
        };

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("grass_encoder"),
        });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("grass_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.target_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
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

            if let Some(instance_buffer) = &instance_buffer {
                pass.set_pipeline(&self.pipeline);
                pass.set_bind_group(0, &self.frame_bind_group, &[]);
                pass.set_vertex_buffer(1, instance_buffer.slice(..));

                for draw in &self.draws {
                    let (Some(mesh), Some(material)) =
                        (self.meshes.get(&draw.mesh), self.materials.get(&draw.material))
                    else {
                        tracing::warn!(
                            mesh = draw.mesh.0,
                            "draw references a mesh that was never uploaded"
                        );
                        stats.skipped_draws += 1;
                        continue;
                    };
                    pass.set_bind_group(1, &material.bind_group, &[]);
                    pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                    pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
                    pass.draw_indexed(0..mesh.index_count, 0, draw.instances.clone());
                    stats.draws += 1;
                    stats.instances += draw.instances.len();
                }
            }
        }
        self.queue.submit(std::iter::once(encoder.finish()));

        self.instances.clear();
        self.draws.clear();
        self.culled = 0;
        tracing::debug!(?stats, "rendered frame");
        stats
    }

    /// Copy the offscreen target back as tightly packed RGBA8 rows.
    pub fn read_pixels(&self) -> Result<Vec<u8>, GpuError> {
        let padded = padded_bytes_per_row(self.width);
        let buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("readback_buffer"),
            size: u64::from(padded) * u64::from(self.height),
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("readback_encoder"),
        });
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &self.target,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(padded),
                    rows_per_image: Some(self.height),
                },
            },
            wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
        );
        self.queue.submit(std::iter::once(encoder.finish()));

        let slice = buffer.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        let _ = self.device.poll(wgpu::Maintain::Wait);
        rx.recv().map_err(|_| GpuError::ReadbackLost)??;

        let pixels = strip_row_padding(&slice.get_mapped_range(), self.width, self.height, padded);
        buffer.unmap();
        Ok(pixels)
    }

    fn material_mut(&mut self, id: MaterialId) -> &mut GpuMaterial {
        let device = &self.device;
        let layout = &self.material_layout;
        self.materials
            .entry(id)
            .or_insert_with(|| create_material(device, layout, id))
    }
}

impl RenderBackend for GpuBackend {
    fn set_shader_value(&mut self, material: MaterialId, name: &'static str, value: ShaderValue) {
        let entry = self.material_mut(material);
        if entry.values.apply(name, value) {
            entry.dirty = true;
        } else {
            tracing::trace!(material = material.0, name, "no uniform slot, value ignored");
        }
    }

    fn draw_instanced(&mut self, mesh: MeshHandle, material: MaterialId, instances: &[Mat4]) {
        self.material_mut(material);
        let culling = self.culling.unwrap_or(self.view_proj);
        let start = self.instances.len() as u32;
        for m in instances {
            if is_visible(culling, m.w_axis.truncate()) {
                self.instances.push(InstanceRaw::from(m));
            } else {
                self.culled += 1;
            }
        }
        let end = self.instances.len() as u32;
        if end > start {
            self.draws.push(QueuedDraw {
                mesh,
                material,
                instances: start..end,
            });
        }
    }

    fn set_culling_matrix(&mut self, matrix: Mat4) {
        tracing::trace!("culling matrix overridden");
        self.culling = Some(matrix);
    }

    fn reset_culling_matrix(&mut self) {
        tracing::trace!("culling matrix reset");
        self.culling = None;
    }
}

/// Whether `point` falls inside the clip volume of `matrix` (depth 0..1),
/// padded by [`CULL_MARGIN`].
pub(crate) fn is_visible(matrix: Mat4, point: Vec3) -> bool {
    let clip = matrix * point.extend(1.0);
    if clip.w <= 0.0 {
        return false;
    }
    let ndc = clip.truncate() / clip.w;
    let limit = 1.0 + CULL_MARGIN;
    ndc.x.abs() <= limit && ndc.y.abs() <= limit && (-CULL_MARGIN..=limit).contains(&ndc.z)
}

/// Number of pixels any draw wrote to; the target is cleared to transparent.
pub fn covered_pixels(rgba: &[u8]) -> usize {
    rgba.chunks_exact(4).filter(|px| px[3] != 0).count()
}

pub(crate) fn blade_vertices(blade: &BladeMesh) -> Vec<Vertex> {
    blade
        .positions
        .iter()
        .zip(&blade.normals)
        .zip(&blade.uvs)
        .map(|((p, n), uv)| Vertex {
            position: p.to_array(),
            normal: n.to_array(),
            uv: uv.to_array(),
        })
        .collect()
}

pub(crate) fn padded_bytes_per_row(width: u32) -> u32 {
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    (width * 4).div_ceil(align) * align
}

pub(crate) fn strip_row_padding(data: &[u8], width: u32, height: u32, padded: u32) -> Vec<u8> {
    let row = (width * 4) as usize;
    let mut out = Vec::with_capacity(row * height as usize);
    for chunk in data.chunks(padded as usize).take(height as usize) {
        out.extend_from_slice(&chunk[..row]);
    }
    out
}

fn uniform_layout(
    device: &wgpu::Device,
    label: &str,
    visibility: wgpu::ShaderStages,
) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
    })
}

fn create_material(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    id: MaterialId,
) -> GpuMaterial {
    tracing::debug!(material = id.0, "creating material uniforms");
    let values = BendUniform::default();
    let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("bend_uniform"),
        contents: bytemuck::bytes_of(&values),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    });
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("bend_bind_group"),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: buffer.as_entire_binding(),
        }],
    });
    GpuMaterial {
        values,
        buffer,
        bind_group,
        dirty: false,
    }
}

fn create_target(
    device: &wgpu::Device,
    width: u32,
    height: u32,
) -> (wgpu::Texture, wgpu::TextureView) {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("offscreen_target"),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: TARGET_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
        view_formats: &[],
    });
    let view = texture.create_view(&Default::default());
    (texture, view)
}

fn create_depth_texture(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
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
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&Default::default())
}

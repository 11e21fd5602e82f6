use anyhow::{Context, Result};
use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::core::RenderingCore;
use crate::device::{Gpu, GpuContext, SurfaceErrorAction, SurfaceLost};

use super::camera::Camera;
use super::mesh::{Vertex, cube_vertices};

const PBR_SHADER: &str = include_str!("shaders/pbr.wgsl");

const NOT_INITIALIZED: &str = "renderer not initialized; init() must run after surface creation";

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct CameraUniform {
    mvp: [[f32; 4]; 4],
}

/// Physically based cube renderer.
///
/// Draws a textured unit cube lit by a single point light. The texture uploaded
/// through [`RenderingCore::upload_texture_2d`] is used as albedo; until then a
/// white texel stands in.
pub struct PbrRenderer {
    gpu: GpuContext,
    camera: Camera,
    state: Option<Pipeline>,
}

/// GPU objects tied to one device. Rebuilt on every `init`.
struct Pipeline {
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,

    camera_ubo: wgpu::Buffer,
    vertex_buffer: wgpu::Buffer,
    vertex_count: u32,

    sampler: wgpu::Sampler,
    albedo_view: wgpu::TextureView,

    depth_format: Option<wgpu::TextureFormat>,
    depth: Option<DepthTarget>,
}

struct DepthTarget {
    view: wgpu::TextureView,
    width: u32,
    height: u32,
}

impl PbrRenderer {
    pub fn new(gpu: GpuContext) -> Self {
        Self {
            gpu,
            camera: Camera::default(),
            state: None,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.state.is_some()
    }
}

impl RenderingCore for PbrRenderer {
    fn init(&mut self) -> Result<()> {
        let pipeline = self.gpu.with(Pipeline::new)?;
        if self.state.replace(pipeline).is_some() {
            log::debug!("PbrRenderer: surface re-created, pipeline rebuilt");
        }
        log::info!("PbrRenderer: pipeline ready");
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        let state = self.state.as_mut().context(NOT_INITIALIZED)?;
        let mvp = self.camera.view_projection(width, height);

        self.gpu.with(|gpu| {
            let uniform = CameraUniform { mvp: mvp.to_cols_array_2d() };
            gpu.queue()
                .write_buffer(&state.camera_ubo, 0, bytemuck::bytes_of(&uniform));

            let size = gpu.size();
            state.ensure_depth(gpu.device(), size.width, size.height);
        })
    }

    fn upload_texture_2d(&mut self, pixels: &[u8], width: u32, height: u32) -> Result<()> {
        anyhow::ensure!(width > 0 && height > 0, "texture has zero size ({width}x{height})");

        let expected = (width as usize) * (height as usize) * 4;
        anyhow::ensure!(
            pixels.len() == expected,
            "texture buffer is {} bytes, expected {expected} for {width}x{height} RGBA8",
            pixels.len()
        );

        let state = self.state.as_mut().context(NOT_INITIALIZED)?;

        self.gpu.with(|gpu| -> Result<()> {
            let max = gpu.device().limits().max_texture_dimension_2d;
            anyhow::ensure!(
                width <= max && height <= max,
                "texture {width}x{height} exceeds device limit {max}"
            );

            state.albedo_view = create_albedo(gpu, pixels, width, height);
            state.rebuild_bind_group(gpu.device());

            log::info!("PbrRenderer: albedo texture {width}x{height} uploaded");
            Ok(())
        })?
    }

    fn step(&mut self) -> Result<()> {
        let state = self.state.as_mut().context(NOT_INITIALIZED)?;
        self.gpu.with(|gpu| state.draw(gpu))?
    }
}

impl Pipeline {
    fn new(gpu: &mut Gpu) -> Self {
        let device = gpu.device();

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("albedo pbr shader"),
            source: wgpu::ShaderSource::Wgsl(PBR_SHADER.into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("albedo pbr bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(
                            std::mem::size_of::<CameraUniform>() as u64,
                        ),
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

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("albedo pbr pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let depth_format = gpu.depth_format();

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("albedo pbr pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[Vertex::layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: gpu.surface_format(),
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: depth_format.map(|format| wgpu::DepthStencilState {
                format,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let camera_ubo = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("albedo camera ubo"),
            size: std::mem::size_of::<CameraUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let vertices = cube_vertices();
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("albedo cube vbo"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        // Nearest filtering, clamped edges.
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("albedo sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        let albedo_view = create_albedo(gpu, &[0xff; 4], 1, 1);

        let bind_group = create_bind_group(
            gpu.device(),
            &bind_group_layout,
            &camera_ubo,
            &albedo_view,
            &sampler,
        );

        Self {
            pipeline,
            bind_group_layout,
            bind_group,
            camera_ubo,
            vertex_buffer,
            vertex_count: vertices.len() as u32,
            sampler,
            albedo_view,
            depth_format,
            depth: None,
        }
    }

    fn rebuild_bind_group(&mut self, device: &wgpu::Device) {
        self.bind_group = create_bind_group(
            device,
            &self.bind_group_layout,
            &self.camera_ubo,
            &self.albedo_view,
            &self.sampler,
        );
    }

    fn ensure_depth(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        let Some(format) = self.depth_format else { return };
        if width == 0 || height == 0 {
            return;
        }
        if self
            .depth
            .as_ref()
            .is_some_and(|d| d.width == width && d.height == height)
        {
            return;
        }

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("albedo depth"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });

        self.depth = Some(DepthTarget {
            view: texture.create_view(&wgpu::TextureViewDescriptor::default()),
            width,
            height,
        });
    }

    fn draw(&mut self, gpu: &mut Gpu) -> Result<()> {
        let mut frame = match gpu.begin_frame() {
            Ok(f) => f,
            Err(err) => {
                let reason = err.to_string();
                return match gpu.handle_surface_error(err) {
                    SurfaceErrorAction::Fatal => Err(SurfaceLost::new(reason).into()),
                    action => {
                        log::debug!("PbrRenderer: frame skipped ({action:?}): {reason}");
                        Ok(())
                    }
                };
            }
        };

        let (width, height) = frame.target_size();
        self.ensure_depth(gpu.device(), width, height);

        {
            let mut rpass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("albedo pbr pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: self.depth.as_ref().map(|d| {
                    wgpu::RenderPassDepthStencilAttachment {
                        view: &d.view,
                        depth_ops: Some(wgpu::Operations {
                            load: wgpu::LoadOp::Clear(1.0),
                            store: wgpu::StoreOp::Discard,
                        }),
                        stencil_ops: None,
                    }
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            rpass.set_pipeline(&self.pipeline);
            rpass.set_bind_group(0, &self.bind_group, &[]);
            rpass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            rpass.draw(0..self.vertex_count, 0..1);
        }

        gpu.submit(frame);
        Ok(())
    }
}

fn create_albedo(gpu: &Gpu, pixels: &[u8], width: u32, height: u32) -> wgpu::TextureView {
    let size = wgpu::Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    };

    let texture = gpu.device().create_texture(&wgpu::TextureDescriptor {
        label: Some("albedo texture"),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8Unorm,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    gpu.queue().write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        pixels,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * width),
            rows_per_image: Some(height),
        },
        size,
    );

    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

fn create_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    camera_ubo: &wgpu::Buffer,
    albedo_view: &wgpu::TextureView,
    sampler: &wgpu::Sampler,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("albedo pbr bind group"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_ubo.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::TextureView(albedo_view),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detached() -> PbrRenderer {
        PbrRenderer::new(GpuContext::new())
    }

    #[test]
    fn init_without_current_context_fails() {
        let mut r = detached();
        let err = r.init().unwrap_err();
        assert!(err.to_string().contains("no GPU context"));
        assert!(!r.is_initialized());
    }

    #[test]
    fn calls_before_init_fail() {
        let mut r = detached();
        assert!(r.resize(800, 600).unwrap_err().to_string().contains("not initialized"));
        assert!(r.step().unwrap_err().to_string().contains("not initialized"));
        assert!(r.upload_texture_2d(&[0; 4], 1, 1).is_err());
    }

    #[test]
    fn upload_rejects_mismatched_buffer() {
        let mut r = detached();
        let err = r.upload_texture_2d(&[0; 12], 2, 2).unwrap_err();
        assert!(err.to_string().contains("expected 16"));
    }

    #[test]
    fn upload_rejects_zero_size() {
        let mut r = detached();
        assert!(r.upload_texture_2d(&[], 0, 4).is_err());
    }

    #[test]
    fn shader_parses_and_validates() {
        let module = naga::front::wgsl::parse_str(PBR_SHADER).unwrap();
        naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::empty(),
        )
        .validate(&module)
        .unwrap();

        let entries: Vec<_> = module
            .entry_points
            .iter()
            .map(|ep| (ep.name.as_str(), ep.stage))
            .collect();
        assert!(entries.contains(&("vs_main", naga::ShaderStage::Vertex)));
        assert!(entries.contains(&("fs_main", naga::ShaderStage::Fragment)));
    }

    #[test]
    fn camera_uniform_is_a_mat4() {
        assert_eq!(std::mem::size_of::<CameraUniform>(), 64);
    }
}

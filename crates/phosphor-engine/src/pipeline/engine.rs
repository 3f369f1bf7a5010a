use std::time::Instant;

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::device::Gpu;
use crate::error::{EngineError, ShaderStage};
use crate::raster::Raster;
use crate::shaders::{compose, ShaderCatalog};

use super::sizer::SurfaceSizer;

/// Format of the source texture and the output surface.
///
/// Plain (non-sRGB) RGBA keeps a byte-for-byte correspondence with the
/// raster's pixel values, so the passthrough variant is exactly lossless.
pub const OUTPUT_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// Per-frame uniforms, shared by every variant. Must match the `Globals`
/// struct the composed WGSL declares, std140-compatible at 32 bytes.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct Globals {
    resolution: [f32; 2],
    time: f32,
    curvature: f32,
    scanlines: f32,
    vignette: f32,
    _pad: [f32; 2],
}

/// Tunables of the distortion variants. Variants that do not read a field
/// simply ignore it.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct EffectParams {
    /// Barrel distortion strength; larger is flatter. Clamped to >= 1 in
    /// the shader.
    pub curvature: f32,
    /// Scanline darkening in [0, 1].
    pub scanlines: f32,
    /// Corner vignette strength in [0, 1].
    pub vignette: f32,
}

impl Default for EffectParams {
    fn default() -> Self {
        Self {
            curvature: 6.0,
            scanlines: 0.25,
            vignette: 0.2,
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct QuadVertex {
    position: [f32; 3],
    tex_coord: [f32; 2],
}

impl QuadVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

const QUAD_VERTICES: [QuadVertex; 4] = [
    QuadVertex { position: [-1.0, -1.0, 0.0], tex_coord: [0.0, 0.0] },
    QuadVertex { position: [1.0, -1.0, 0.0], tex_coord: [1.0, 0.0] },
    QuadVertex { position: [1.0, 1.0, 0.0], tex_coord: [1.0, 1.0] },
    QuadVertex { position: [-1.0, 1.0, 0.0], tex_coord: [0.0, 1.0] },
];

const QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

struct SourceTexture {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    width: u32,
    height: u32,
}

/// GPU-backed image the engine renders into. Its dimensions follow
/// [`super::sizer::output_dims`], never the window.
pub struct OutputSurface {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    width: u32,
    height: u32,
}

impl OutputSurface {
    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    pub fn texture(&self) -> &wgpu::Texture {
        &self.texture
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

/// Owns pipelines, geometry, the source texture and the output surface, and
/// executes the per-frame draw.
///
/// Variant pipelines are compiled lazily on first selection and cached for
/// the engine's lifetime. A failed [`RenderEngine::set_variant`] leaves the
/// previously active variant in place.
pub struct RenderEngine {
    catalog: ShaderCatalog,
    vertex_module: wgpu::ShaderModule,
    bind_group_layout: wgpu::BindGroupLayout,
    pipeline_layout: wgpu::PipelineLayout,
    sampler: wgpu::Sampler,
    quad_vbo: wgpu::Buffer,
    quad_ibo: wgpu::Buffer,
    globals_ubo: wgpu::Buffer,

    pipelines: Vec<Option<wgpu::RenderPipeline>>,
    active: usize,

    source: Option<SourceTexture>,
    bind_group: Option<wgpu::BindGroup>,
    output: Option<OutputSurface>,
    sizer: SurfaceSizer,

    effects: EffectParams,
    started: Instant,
}

impl RenderEngine {
    /// Builds the engine and compiles the fallback (passthrough) pipeline.
    pub fn new(gpu: &Gpu, catalog: ShaderCatalog) -> Result<Self, EngineError> {
        let device = gpu.device();

        let vertex_module = compile_module(
            device,
            "quad vertex",
            compose::VERTEX_WGSL,
            ShaderStage::Vertex,
        )?;

        let bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("phosphor bgl"),
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
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 2,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: Some(globals_min_binding_size()),
                        },
                        count: None,
                    },
                ],
            });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("phosphor pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            // Newer wgpu uses immediate constants; keep disabled for now.
            immediate_size: 0,
        });

        // The raster is sampled nearest: each output texel must see exactly
        // one source pixel, never an interpolated blend.
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("phosphor source sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        let quad_vbo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("phosphor quad vbo"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let quad_ibo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("phosphor quad ibo"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });

        let globals_ubo = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("phosphor globals ubo"),
            size: std::mem::size_of::<Globals>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let mut engine = Self {
            pipelines: (0..catalog.len()).map(|_| None).collect(),
            catalog,
            vertex_module,
            bind_group_layout,
            pipeline_layout,
            sampler,
            quad_vbo,
            quad_ibo,
            globals_ubo,
            active: 0,
            source: None,
            bind_group: None,
            output: None,
            sizer: SurfaceSizer::new(),
            effects: EffectParams::default(),
            started: Instant::now(),
        };

        let fallback = engine.compile_variant(gpu, 0)?;
        engine.pipelines[0] = Some(fallback);
        Ok(engine)
    }

    pub fn catalog(&self) -> &ShaderCatalog {
        &self.catalog
    }

    pub fn active_variant(&self) -> &'static str {
        self.catalog
            .by_index(self.active)
            .map(|variant| variant.name)
            .unwrap_or(self.catalog.fallback().name)
    }

    pub fn effects(&self) -> EffectParams {
        self.effects
    }

    pub fn set_effects(&mut self, effects: EffectParams) {
        self.effects = effects;
    }

    /// Reallocations of the output surface so far.
    pub fn output_reallocs(&self) -> u64 {
        self.sizer.reallocs()
    }

    pub fn output(&self) -> Option<&OutputSurface> {
        self.output.as_ref()
    }

    /// Selects the active shader variant by display name.
    ///
    /// The candidate pipeline is fully compiled and validated before the
    /// swap; on any failure the previously active variant stays selected
    /// and keeps rendering.
    pub fn set_variant(&mut self, gpu: &Gpu, name: &str) -> Result<(), EngineError> {
        let index = self
            .catalog
            .index_of(name)
            .ok_or_else(|| EngineError::VariantNotFound(name.to_string()))?;

        if self.pipelines[index].is_none() {
            let pipeline = self.compile_variant(gpu, index)?;
            self.pipelines[index] = Some(pipeline);
        }

        self.active = index;
        log::debug!("shader variant: {name}");
        Ok(())
    }

    /// Uploads `raster`, sizes the output surface for `scale` and draws one
    /// frame with the active variant.
    pub fn render(&mut self, gpu: &Gpu, raster: &Raster, scale: f32) -> Result<(), EngineError> {
        self.upload_source(gpu, raster);
        self.ensure_output(gpu, raster, scale);
        self.write_globals(gpu);

        let output = self
            .output
            .as_ref()
            .ok_or_else(|| EngineError::ContextUnavailable("no output surface".to_string()))?;
        let pipeline = self.pipelines[self.active]
            .as_ref()
            .ok_or_else(|| EngineError::ContextUnavailable("active pipeline missing".to_string()))?;
        let bind_group = self
            .bind_group
            .as_ref()
            .ok_or_else(|| EngineError::ContextUnavailable("source not uploaded".to_string()))?;

        let mut encoder = gpu
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("phosphor frame encoder"),
            });

        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("phosphor crt pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &output.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            rpass.set_pipeline(pipeline);
            rpass.set_bind_group(0, bind_group, &[]);
            rpass.set_vertex_buffer(0, self.quad_vbo.slice(..));
            rpass.set_index_buffer(self.quad_ibo.slice(..), wgpu::IndexFormat::Uint16);
            rpass.draw_indexed(0..QUAD_INDICES.len() as u32, 0, 0..1);
        }

        gpu.queue().submit(std::iter::once(encoder.finish()));
        Ok(())
    }

    /// Copies the output surface back into a [`Raster`].
    ///
    /// Blocks until the GPU finishes. Intended for exports and tests, not
    /// the per-frame path.
    pub fn read_output(&self, gpu: &Gpu) -> Result<Raster, EngineError> {
        let output = self
            .output
            .as_ref()
            .ok_or_else(|| EngineError::Readback("nothing rendered yet".to_string()))?;

        // COPY_BYTES_PER_ROW_ALIGNMENT padding for the intermediate buffer.
        let bytes_per_row = (4 * output.width).next_multiple_of(wgpu::COPY_BYTES_PER_ROW_ALIGNMENT);
        let buffer = gpu.device().create_buffer(&wgpu::BufferDescriptor {
            label: Some("phosphor readback buffer"),
            size: u64::from(bytes_per_row) * u64::from(output.height),
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let mut encoder = gpu
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("phosphor readback encoder"),
            });
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &output.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(bytes_per_row),
                    rows_per_image: Some(output.height),
                },
            },
            wgpu::Extent3d {
                width: output.width,
                height: output.height,
                depth_or_array_layers: 1,
            },
        );
        gpu.queue().submit(std::iter::once(encoder.finish()));

        let slice = buffer.slice(..);
        let (sender, receiver) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = sender.send(result);
        });
        gpu.device()
            .poll(wgpu::PollType::wait_indefinitely())
            .map_err(|err| EngineError::Readback(err.to_string()))?;
        receiver
            .recv()
            .map_err(|err| EngineError::Readback(err.to_string()))?
            .map_err(|err| EngineError::Readback(err.to_string()))?;

        let mut pixels = Vec::with_capacity((output.width * output.height) as usize);
        {
            let data = slice.get_mapped_range();
            for row in 0..output.height {
                let start = (row * bytes_per_row) as usize;
                for texel in 0..output.width as usize {
                    let offset = start + texel * 4;
                    let bytes = [
                        data[offset],
                        data[offset + 1],
                        data[offset + 2],
                        data[offset + 3],
                    ];
                    pixels.push(u32::from_le_bytes(bytes));
                }
            }
        }
        buffer.unmap();

        Raster::from_pixels(output.width, output.height, pixels)
            .ok_or_else(|| EngineError::Readback("pixel count mismatch".to_string()))
    }

    fn compile_variant(
        &self,
        gpu: &Gpu,
        index: usize,
    ) -> Result<wgpu::RenderPipeline, EngineError> {
        let device = gpu.device();
        let variant = self
            .catalog
            .by_index(index)
            .ok_or_else(|| EngineError::VariantNotFound(index.to_string()))?;

        let fragment_module =
            compile_module(device, variant.name, &variant.fragment, ShaderStage::Fragment)?;

        let error_scope = device.push_error_scope(wgpu::ErrorFilter::Validation);
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(variant.name),
            layout: Some(&self.pipeline_layout),

            vertex: wgpu::VertexState {
                module: &self.vertex_module,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[QuadVertex::layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &fragment_module,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: OUTPUT_FORMAT,
                    blend: None,
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

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });
        if let Some(error) = pollster::block_on(error_scope.pop()) {
            return Err(EngineError::ProgramLink {
                variant: variant.name.to_string(),
                log: error.to_string(),
            });
        }

        log::debug!("compiled shader variant {:?}", variant.name);
        Ok(pipeline)
    }

    /// (Re)creates the source texture on dimension change and uploads the
    /// raster. The raster is mutated in place by the painting layer, so the
    /// upload happens on every render.
    fn upload_source(&mut self, gpu: &Gpu, raster: &Raster) {
        let dims_changed = self
            .source
            .as_ref()
            .map(|source| (source.width, source.height) != (raster.width(), raster.height()))
            .unwrap_or(true);

        if dims_changed {
            let texture = gpu.device().create_texture(&wgpu::TextureDescriptor {
                label: Some("phosphor source texture"),
                size: wgpu::Extent3d {
                    width: raster.width(),
                    height: raster.height(),
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: OUTPUT_FORMAT,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            });
            let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
            self.source = Some(SourceTexture {
                texture,
                view,
                width: raster.width(),
                height: raster.height(),
            });
            self.bind_group = None;
        }

        let source = match self.source.as_ref() {
            Some(source) => source,
            None => return,
        };

        gpu.queue().write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &source.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            raster.as_bytes(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * raster.width()),
                rows_per_image: Some(raster.height()),
            },
            wgpu::Extent3d {
                width: raster.width(),
                height: raster.height(),
                depth_or_array_layers: 1,
            },
        );

        if self.bind_group.is_none() {
            self.bind_group = Some(gpu.device().create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("phosphor bind group"),
                layout: &self.bind_group_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(&source.view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(&self.sampler),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: self.globals_ubo.as_entire_binding(),
                    },
                ],
            }));
        }
    }

    fn ensure_output(&mut self, gpu: &Gpu, raster: &Raster, scale: f32) {
        let Some((width, height)) = self.sizer.request(raster.width(), raster.height(), scale)
        else {
            return;
        };

        let texture = gpu.device().create_texture(&wgpu::TextureDescriptor {
            label: Some("phosphor output surface"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: OUTPUT_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                | wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        self.output = Some(OutputSurface {
            texture,
            view,
            width,
            height,
        });
    }

    fn write_globals(&self, gpu: &Gpu) {
        let (width, height) = self
            .output
            .as_ref()
            .map(|output| (output.width, output.height))
            .unwrap_or((1, 1));

        let animated = self
            .catalog
            .by_index(self.active)
            .map(|variant| variant.animated)
            .unwrap_or(false);

        // Static variants see time pinned at zero so identical inputs give
        // pixel-identical frames.
        let time = if animated {
            self.started.elapsed().as_secs_f32()
        } else {
            0.0
        };

        let globals = Globals {
            resolution: [width as f32, height as f32],
            time,
            curvature: self.effects.curvature,
            scanlines: self.effects.scanlines,
            vignette: self.effects.vignette,
            _pad: [0.0; 2],
        };
        gpu.queue()
            .write_buffer(&self.globals_ubo, 0, bytemuck::bytes_of(&globals));
    }
}

/// Creates a shader module under a validation error scope, turning any
/// captured diagnostic into [`EngineError::ShaderCompile`].
fn compile_module(
    device: &wgpu::Device,
    name: &str,
    source: &str,
    stage: ShaderStage,
) -> Result<wgpu::ShaderModule, EngineError> {
    let error_scope = device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(name),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });
    if let Some(error) = pollster::block_on(error_scope.pop()) {
        return Err(EngineError::ShaderCompile {
            variant: name.to_string(),
            stage,
            log: error.to_string(),
        });
    }
    Ok(module)
}

/// `Globals` is 32 bytes by construction, so the size is always non-zero.
/// Centralising this avoids `.unwrap()` at the pipeline-creation site.
fn globals_min_binding_size() -> std::num::NonZeroU64 {
    std::num::NonZeroU64::new(std::mem::size_of::<Globals>() as u64)
        .expect("Globals has non-zero size by construction")
}

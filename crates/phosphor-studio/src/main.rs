//! Windowed viewer for `.pix` documents.
//!
//! Loads a document (or a built-in demo raster), runs it through the CRT
//! render engine and presents the output surface. Keys 1-6 switch the
//! shader variant, `+`/`-` change the zoom scale, `S` saves a `.pix` copy,
//! Escape quits.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use phosphor_engine::logging::{init_logging, LoggingConfig};
use phosphor_engine::{names, Blitter, Gpu, GpuInit, Raster, RenderEngine, ShaderCatalog};
use phosphor_file::{binary, json, Document};

const DEFAULT_SCALE: f32 = 16.0;
const SCALE_STEP: f32 = 2.0;
const MIN_SCALE: f32 = 1.0;
const MAX_SCALE: f32 = 64.0;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let document = match std::env::args().nth(1) {
        Some(path) => load_document(Path::new(&path))
            .with_context(|| format!("failed to load {path}"))?,
        None => demo_document(),
    };
    let raster = Raster::from_pixels(
        u32::from(document.width),
        u32::from(document.height),
        document.pixels.clone(),
    )
    .context("document pixel count does not match its dimensions")?;

    log::info!(
        "document: {}x{}, shader {:?}",
        document.width,
        document.height,
        document.shader
    );

    let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut studio = Studio::new(document, raster);
    event_loop
        .run_app(&mut studio)
        .context("winit event loop terminated with error")?;
    Ok(())
}

fn load_document(path: &Path) -> Result<Document> {
    let is_json = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if is_json {
        let text = std::fs::read_to_string(path)?;
        Ok(json::from_json(&text)?)
    } else {
        let bytes = std::fs::read(path)?;
        Ok(binary::decode(&bytes)?)
    }
}

/// A colour-bar test card for running without a document.
fn demo_document() -> Document {
    let width = 32u16;
    let height = 24u16;
    let bars: [u32; 8] = [
        0xFFFFFFFF, 0xFF00FFFF, 0xFFFFFF00, 0xFF00FF00, 0xFFFF00FF, 0xFF0000FF, 0xFFFF0000,
        0xFF000000,
    ];
    let mut pixels = Vec::with_capacity(usize::from(width) * usize::from(height));
    for _row in 0..height {
        for col in 0..width {
            pixels.push(bars[usize::from(col) * bars.len() / usize::from(width)]);
        }
    }
    Document {
        width,
        height,
        pixels,
        palette: Vec::new(),
        shader: names::SHADOW_MASK_V02.to_string(),
    }
}

struct GpuState {
    gpu: Gpu,
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,
    engine: RenderEngine,
    blitter: Blitter,
}

struct Studio {
    document: Document,
    raster: Raster,
    scale: f32,
    state: Option<GpuState>,
}

impl Studio {
    fn new(document: Document, raster: Raster) -> Self {
        Self {
            document,
            raster,
            scale: DEFAULT_SCALE,
            state: None,
        }
    }

    fn init_gpu(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title("phosphor studio")
            .with_inner_size(LogicalSize::new(
                f64::from(self.raster.width()) * f64::from(self.scale) / 4.0,
                f64::from(self.raster.height()) * f64::from(self.scale) / 4.0,
            ));
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to create window")?,
        );

        let gpu = Gpu::new_blocking(GpuInit::default())?;
        let surface = gpu
            .instance()
            .create_surface(window.clone())
            .context("failed to create wgpu surface")?;

        let caps = surface.get_capabilities(gpu.adapter());
        // The raster's bytes are already display-encoded; a non-sRGB surface
        // presents them unmodified.
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|format| !format.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .context("no supported surface formats")?;

        let size = window.inner_size();
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(gpu.device(), &config);

        let mut engine = RenderEngine::new(&gpu, ShaderCatalog::builtin())?;
        match engine.set_variant(&gpu, &self.document.shader) {
            Ok(()) => {}
            Err(err) => {
                // Unknown or broken variants drop to passthrough; the
                // document itself stays untouched.
                log::warn!("{err}; falling back to {}", names::PASSTHROUGH);
                engine.set_variant(&gpu, names::PASSTHROUGH)?;
            }
        }
        let blitter = Blitter::new(&gpu)?;

        self.state = Some(GpuState {
            gpu,
            window,
            surface,
            config,
            engine,
            blitter,
        });
        Ok(())
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(state) = self.state.as_mut() else {
            return;
        };

        if let Err(err) = state.engine.render(&state.gpu, &self.raster, self.scale) {
            log::error!("render failed: {err}");
            event_loop.exit();
            return;
        }

        let frame = match state.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                state.surface.configure(state.gpu.device(), &state.config);
                return;
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("surface out of memory");
                event_loop.exit();
                return;
            }
            Err(wgpu::SurfaceError::Timeout | wgpu::SurfaceError::Other) => return,
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder =
            state
                .gpu
                .device()
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("studio present encoder"),
                });
        if let Some(output) = state.engine.output() {
            state.blitter.blit(
                &state.gpu,
                &mut encoder,
                output,
                &view,
                state.config.format,
            );
        }
        state.gpu.queue().submit(std::iter::once(encoder.finish()));
        frame.present();

        state.window.request_redraw();
    }

    fn select_variant(&mut self, index: usize) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        let Some(name) = state.engine.catalog().names().get(index).copied() else {
            return;
        };
        match state.engine.set_variant(&state.gpu, name) {
            Ok(()) => self.document.shader = name.to_string(),
            Err(err) => log::warn!("{err}"),
        }
    }

    fn save(&self) {
        let path = PathBuf::from("pixelart.pix");
        let result = binary::encode(&self.document)
            .map_err(anyhow::Error::from)
            .and_then(|bytes| std::fs::write(&path, bytes).map_err(anyhow::Error::from));
        match result {
            Ok(()) => log::info!("saved {}", path.display()),
            Err(err) => log::error!("save failed: {err}"),
        }
    }

    fn handle_key(&mut self, code: KeyCode, event_loop: &ActiveEventLoop) {
        match code {
            KeyCode::Escape => event_loop.exit(),
            KeyCode::Digit1 => self.select_variant(0),
            KeyCode::Digit2 => self.select_variant(1),
            KeyCode::Digit3 => self.select_variant(2),
            KeyCode::Digit4 => self.select_variant(3),
            KeyCode::Digit5 => self.select_variant(4),
            KeyCode::Digit6 => self.select_variant(5),
            KeyCode::Equal | KeyCode::NumpadAdd => {
                self.scale = (self.scale + SCALE_STEP).min(MAX_SCALE);
                log::info!("scale {}", self.scale);
            }
            KeyCode::Minus | KeyCode::NumpadSubtract => {
                self.scale = (self.scale - SCALE_STEP).max(MIN_SCALE);
                log::info!("scale {}", self.scale);
            }
            KeyCode::KeyS => self.save(),
            _ => {}
        }
    }
}

impl ApplicationHandler for Studio {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        if let Err(err) = self.init_gpu(event_loop) {
            log::error!("initialization failed: {err:#}");
            event_loop.exit();
            return;
        }
        if let Some(state) = self.state.as_ref() {
            state.window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),

            WindowEvent::Resized(new_size) => {
                if let Some(state) = self.state.as_mut() {
                    if new_size.width > 0 && new_size.height > 0 {
                        state.config.width = new_size.width;
                        state.config.height = new_size.height;
                        state.surface.configure(state.gpu.device(), &state.config);
                    }
                    state.window.request_redraw();
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed && !event.repeat {
                    if let PhysicalKey::Code(code) = event.physical_key {
                        self.handle_key(code, event_loop);
                    }
                }
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            _ => {}
        }
    }
}

//! Phosphor engine crate.
//!
//! CRT shader emulation for pixel-art rasters: a catalogue of shadow-mask
//! and scanline variants, the wgpu pipeline that applies them, and the
//! CPU-side coordinate/weight math the shaders are generated from.

pub mod device;
pub mod pipeline;
pub mod shaders;

pub mod coords;
pub mod error;
pub mod logging;
pub mod mask;
pub mod raster;

pub use device::{Gpu, GpuInit};
pub use error::{EngineError, ShaderStage};
pub use pipeline::{Blitter, EffectParams, RenderEngine, BASE_SCALE};
pub use raster::Raster;
pub use shaders::{names, ShaderCatalog, ShaderVariant};

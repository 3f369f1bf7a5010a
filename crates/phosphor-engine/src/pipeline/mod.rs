//! Render pipeline: variant compilation, per-frame draw and output sizing.
//!
//! The engine renders into an offscreen [`OutputSurface`]; a windowed host
//! presents it with [`Blitter`], and tests read it back with
//! [`RenderEngine::read_output`].

mod engine;
mod present;
mod sizer;

pub use engine::{EffectParams, OutputSurface, RenderEngine, OUTPUT_FORMAT};
pub use present::Blitter;
pub use sizer::{output_dims, SurfaceSizer, BASE_SCALE};

//! GPU device management.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue
//! - exposing them to the pipeline layer
//!
//! It owns no surface: the engine renders into offscreen textures, and a
//! host that wants a window creates its surface from [`Gpu::instance`].

mod gpu;

pub use gpu::{Gpu, GpuInit};

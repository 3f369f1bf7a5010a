//! Shader registry: composed WGSL sources for the built-in CRT variants.

mod catalog;
pub(crate) mod compose;

pub use catalog::{names, ShaderCatalog, ShaderVariant};
pub use compose::VERTEX_WGSL;

//! Geometry types shared by the mask math and its tests.
//!
//! Canonical space is output-surface texels: origin top-left, +X right,
//! +Y down, matching what the fragment stages compute from `uv * resolution`.

mod vec2;

pub use vec2::Vec2;

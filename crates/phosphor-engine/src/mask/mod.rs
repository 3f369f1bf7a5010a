//! Coordinate and weight math for the shadow-mask shader family.
//!
//! These are the CPU-side reference definitions. The fragment stages use the
//! same tables and formulas; `shaders::compose` splices the constants from
//! here into the generated WGSL so both sides always agree.

mod hex;
mod triad;
mod weights;

pub use hex::{hex_to_pixel, in_phosphor, pixel_to_hex, Hex, HEX_SAMPLE_OFFSETS, SQRT3};
pub use triad::{
    discrete_channel, discrete_channel_soft, mod_positive, mod_positive_f32, phosphor_channel,
    TRIAD,
};
pub use weights::{
    ring_weight, CELL_SIZE, HEX_RADIUS, MASK_FACTOR, NEIGHBOUR_OFFSETS, NEIGHBOUR_POSITIONS,
    PHOSPHOR_RADIUS_RATIO, RING_WEIGHTS, SUBPIXEL_WEIGHTS,
};

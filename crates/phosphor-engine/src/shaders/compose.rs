//! WGSL assembly for the built-in variants.
//!
//! Fragment bodies live under `wgsl/` as plain text. This module prepends
//! the shared binding preamble and the constant tables generated from
//! [`crate::mask`], so the shader-side tables can never drift from the
//! CPU-side maths they are tested against.

use crate::mask::{
    CELL_SIZE, HEX_RADIUS, HEX_SAMPLE_OFFSETS, MASK_FACTOR, NEIGHBOUR_OFFSETS,
    NEIGHBOUR_POSITIONS, PHOSPHOR_RADIUS_RATIO, RING_WEIGHTS, SQRT3, SUBPIXEL_WEIGHTS, TRIAD,
};

/// Shared vertex stage, complete as written.
pub const VERTEX_WGSL: &str = include_str!("wgsl/quad.vert.wgsl");

const PASSTHROUGH_BODY: &str = include_str!("wgsl/passthrough.frag.wgsl");
const MASK_RECT_POINT_BODY: &str = include_str!("wgsl/mask_rect_point.frag.wgsl");
const MASK_RECT_MEAN_BODY: &str = include_str!("wgsl/mask_rect_mean.frag.wgsl");
const MASK_HEX_PURE_BODY: &str = include_str!("wgsl/mask_hex_pure.frag.wgsl");
const MASK_HEX_BLEND_BODY: &str = include_str!("wgsl/mask_hex_blend.frag.wgsl");
const SCANLINE_BODY: &str = include_str!("wgsl/scanline.frag.wgsl");

/// Bindings every fragment stage sees, in declaration order: the source
/// raster, its nearest-neighbour sampler and the per-frame uniforms.
const PREAMBLE_WGSL: &str = "\
struct Globals {
    resolution: vec2f,
    time: f32,
    curvature: f32,
    scanlines: f32,
    vignette: f32,
    _pad: vec2f,
}

@group(0) @binding(0) var source_tex: texture_2d<f32>;
@group(0) @binding(1) var source_samp: sampler;
@group(0) @binding(2) var<uniform> globals: Globals;
";

const RECT_HELPERS_WGSL: &str = "\
fn ring_weight(pos: vec2i) -> f32 {
    if (pos.x < 0 || pos.x > 5 || pos.y < 0 || pos.y > 5) {
        return 0.0;
    }
    return ring_weights[pos.x + pos.y * 6];
}

fn spill_weights(subpixel: vec2i, neighbour: i32) -> vec3f {
    return vec3f(
        ring_weight(neighbour_offsets[neighbour * 3] + subpixel),
        ring_weight(neighbour_offsets[neighbour * 3 + 1] + subpixel),
        ring_weight(neighbour_offsets[neighbour * 3 + 2] + subpixel),
    );
}
";

const HEX_HELPERS_WGSL: &str = "\
fn hex_to_pixel(hex: vec2i) -> vec2f {
    return vec2f(
        (f32(hex.x) * SQRT3 + f32(hex.y) * SQRT3 * 0.5) * HEX_RADIUS,
        f32(hex.y) * 1.5 * HEX_RADIUS,
    );
}

fn pixel_to_hex(pixel: vec2f) -> vec2i {
    let q = (pixel.x * SQRT3 / 3.0 - pixel.y / 3.0) / HEX_RADIUS;
    let r = (pixel.y * 2.0 / 3.0) / HEX_RADIUS;
    return vec2i(i32(round(q)), i32(round(r)));
}

fn in_phosphor(centre: vec2f, pixel: vec2f) -> bool {
    return length(pixel - centre) < PHOSPHOR_RADIUS;
}

fn mod_positive(n: i32, m: i32) -> i32 {
    return ((n % m) + m) % m;
}

fn phosphor_channel(hex: vec2i) -> i32 {
    return triad[mod_positive(hex.x, 3) * 3 + mod_positive(hex.y, 3)];
}

fn mean_hex_colour(centre: vec2f) -> vec3f {
    var colour = textureSampleLevel(source_tex, source_samp, centre / globals.resolution, 0.0).rgb;
    for (var i = 0; i < 6; i++) {
        let sample_uv = (centre + hex_sample_offsets[i]) / globals.resolution;
        colour += textureSampleLevel(source_tex, source_samp, sample_uv, 0.0).rgb;
    }
    return colour / 7.0;
}
";

/// Which generated table block a fragment body needs.
enum Tables {
    None,
    Rect,
    Hex,
}

fn rect_tables_wgsl() -> String {
    let mut wgsl = String::new();
    wgsl.push_str(&format!("const CELL_SIZE: f32 = {CELL_SIZE:?};\n\n"));

    wgsl.push_str("var<private> ring_weights: array<f32, 36> = array<f32, 36>(\n");
    for row in RING_WEIGHTS.chunks(6) {
        let entries: Vec<String> = row.iter().map(|w| format!("{w:?}")).collect();
        wgsl.push_str(&format!("    {},\n", entries.join(", ")));
    }
    wgsl.push_str(");\n\n");

    wgsl.push_str("var<private> neighbour_positions: array<vec2f, 6> = array<vec2f, 6>(\n");
    for [x, y] in NEIGHBOUR_POSITIONS {
        wgsl.push_str(&format!("    vec2f({x:?}, {y:?}),\n"));
    }
    wgsl.push_str(");\n\n");

    wgsl.push_str("var<private> neighbour_offsets: array<vec2i, 18> = array<vec2i, 18>(\n");
    for [x, y] in NEIGHBOUR_OFFSETS {
        wgsl.push_str(&format!("    vec2i({x}, {y}),\n"));
    }
    wgsl.push_str(");\n\n");

    wgsl.push_str("var<private> subpixel_weights: array<vec3f, 16> = array<vec3f, 16>(\n");
    for [r, g, b] in SUBPIXEL_WEIGHTS {
        wgsl.push_str(&format!("    vec3f({r:?}, {g:?}, {b:?}),\n"));
    }
    wgsl.push_str(");\n");
    wgsl
}

fn hex_tables_wgsl() -> String {
    let mut wgsl = String::new();
    wgsl.push_str(&format!("const SQRT3: f32 = {SQRT3:?};\n"));
    wgsl.push_str(&format!("const HEX_RADIUS: f32 = {HEX_RADIUS:?};\n"));
    let phosphor_radius = PHOSPHOR_RADIUS_RATIO * HEX_RADIUS;
    wgsl.push_str(&format!("const PHOSPHOR_RADIUS: f32 = {phosphor_radius:?};\n"));
    wgsl.push_str(&format!("const MASK_FACTOR: f32 = {MASK_FACTOR:?};\n\n"));

    wgsl.push_str("var<private> hex_sample_offsets: array<vec2f, 6> = array<vec2f, 6>(\n");
    for offset in HEX_SAMPLE_OFFSETS {
        wgsl.push_str(&format!("    vec2f({:?}, {:?}),\n", offset.x, offset.y));
    }
    wgsl.push_str(");\n\n");

    wgsl.push_str("var<private> triad: array<i32, 9> = array<i32, 9>(\n");
    for row in TRIAD {
        let entries: Vec<String> = row.iter().map(|c| c.to_string()).collect();
        wgsl.push_str(&format!("    {},\n", entries.join(", ")));
    }
    wgsl.push_str(");\n");
    wgsl
}

fn compose(body: &str, tables: Tables) -> String {
    let mut wgsl = String::from(PREAMBLE_WGSL);
    wgsl.push('\n');
    match tables {
        Tables::None => {}
        Tables::Rect => {
            wgsl.push_str(&rect_tables_wgsl());
            wgsl.push('\n');
            wgsl.push_str(RECT_HELPERS_WGSL);
            wgsl.push('\n');
        }
        Tables::Hex => {
            wgsl.push_str(&hex_tables_wgsl());
            wgsl.push('\n');
            wgsl.push_str(HEX_HELPERS_WGSL);
            wgsl.push('\n');
        }
    }
    wgsl.push_str(body);
    wgsl
}

pub fn passthrough_fragment() -> String {
    compose(PASSTHROUGH_BODY, Tables::None)
}

pub fn mask_rect_point_fragment() -> String {
    compose(MASK_RECT_POINT_BODY, Tables::Rect)
}

pub fn mask_rect_mean_fragment() -> String {
    compose(MASK_RECT_MEAN_BODY, Tables::Rect)
}

pub fn mask_hex_pure_fragment() -> String {
    compose(MASK_HEX_PURE_BODY, Tables::Hex)
}

pub fn mask_hex_blend_fragment() -> String {
    compose(MASK_HEX_BLEND_BODY, Tables::Hex)
}

pub fn scanline_fragment() -> String {
    compose(SCANLINE_BODY, Tables::None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_tables_carry_the_shared_constants() {
        let rect = rect_tables_wgsl();
        assert!(rect.contains("const CELL_SIZE: f32 = 4.0;"));
        assert!(rect.contains("array<f32, 36>"));
        assert!(rect.contains("array<vec3f, 16>"));

        let hex = hex_tables_wgsl();
        assert!(hex.contains("const HEX_RADIUS: f32 = 4.0;"));
        assert!(hex.contains("const PHOSPHOR_RADIUS: f32 = 3.2;"));
        assert!(hex.contains("array<i32, 9>"));
    }

    #[test]
    fn every_fragment_source_declares_the_bindings_once() {
        for source in [
            passthrough_fragment(),
            mask_rect_point_fragment(),
            mask_rect_mean_fragment(),
            mask_hex_pure_fragment(),
            mask_hex_blend_fragment(),
            scanline_fragment(),
        ] {
            assert_eq!(source.matches("@group(0) @binding(0)").count(), 1);
            assert_eq!(source.matches("fn fs_main").count(), 1);
        }
    }
}

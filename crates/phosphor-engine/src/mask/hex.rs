//! Axial hex-grid conversions used by the hexagonal mask family.
//!
//! The grid is pointy-top with radius [`HEX_RADIUS`](super::HEX_RADIUS);
//! each hex hosts one circular phosphor dot.

use crate::coords::Vec2;

use super::weights::{HEX_RADIUS, PHOSPHOR_RADIUS_RATIO};

pub const SQRT3: f32 = 1.732_050_8;

const SQRT3_HALF: f32 = SQRT3 / 2.0;

/// Scale of the 6-tap ring around a hex centre, relative to the radius.
const SAMPLE_RING_SCALE: f32 = 0.6;

/// Offsets of the 6 ring taps of the 7-sample mean kernel, in texels.
pub const HEX_SAMPLE_OFFSETS: [Vec2; 6] = [
    Vec2::new(0.0, -HEX_RADIUS * SAMPLE_RING_SCALE),
    Vec2::new(SQRT3_HALF * HEX_RADIUS * SAMPLE_RING_SCALE, -0.5 * HEX_RADIUS * SAMPLE_RING_SCALE),
    Vec2::new(SQRT3_HALF * HEX_RADIUS * SAMPLE_RING_SCALE, 0.5 * HEX_RADIUS * SAMPLE_RING_SCALE),
    Vec2::new(0.0, HEX_RADIUS * SAMPLE_RING_SCALE),
    Vec2::new(-SQRT3_HALF * HEX_RADIUS * SAMPLE_RING_SCALE, 0.5 * HEX_RADIUS * SAMPLE_RING_SCALE),
    Vec2::new(-SQRT3_HALF * HEX_RADIUS * SAMPLE_RING_SCALE, -0.5 * HEX_RADIUS * SAMPLE_RING_SCALE),
];

/// Axial hex coordinate (q, r).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Hex {
    pub q: i32,
    pub r: i32,
}

impl Hex {
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }
}

/// Pixel-space centre of a hex cell.
pub fn hex_to_pixel(hex: Hex) -> Vec2 {
    Vec2::new(
        (hex.q as f32 * SQRT3 + hex.r as f32 * SQRT3_HALF) * HEX_RADIUS,
        hex.r as f32 * 1.5 * HEX_RADIUS,
    )
}

/// Hex cell containing a pixel. Each axial component rounds to the nearest
/// integer independently.
pub fn pixel_to_hex(pixel: Vec2) -> Hex {
    Hex {
        q: ((pixel.x * SQRT3 / 3.0 - pixel.y / 3.0) / HEX_RADIUS).round() as i32,
        r: ((pixel.y * 2.0 / 3.0) / HEX_RADIUS).round() as i32,
    }
}

/// True when `pixel` falls inside the phosphor dot centred on `centre`.
pub fn in_phosphor(centre: Vec2, pixel: Vec2) -> bool {
    (pixel - centre).length() < PHOSPHOR_RADIUS_RATIO * HEX_RADIUS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_pixel_round_trip_is_exact() {
        for q in -20..=20 {
            for r in -20..=20 {
                let hex = Hex::new(q, r);
                assert_eq!(pixel_to_hex(hex_to_pixel(hex)), hex, "at ({q}, {r})");
            }
        }
    }

    #[test]
    fn phosphor_membership_at_the_radius_boundary() {
        let radius = PHOSPHOR_RADIUS_RATIO * HEX_RADIUS;
        let centre = hex_to_pixel(Hex::new(3, -2));
        let epsilon = 1e-3;

        let just_inside = centre + Vec2::new(radius - epsilon, 0.0);
        let just_outside = centre + Vec2::new(radius + epsilon, 0.0);
        assert!(in_phosphor(centre, just_inside));
        assert!(!in_phosphor(centre, just_outside));
    }

    #[test]
    fn phosphor_dots_do_not_overlap_neighbouring_centres() {
        // A pixel near one centre is outside every other cell's dot.
        let home = hex_to_pixel(Hex::new(0, 0));
        let pixel = home + Vec2::new(0.1, 0.1);
        for q in -2..=2 {
            for r in -2..=2 {
                if (q, r) == (0, 0) {
                    continue;
                }
                assert!(!in_phosphor(hex_to_pixel(Hex::new(q, r)), pixel));
            }
        }
    }

    #[test]
    fn sample_ring_is_centred() {
        let sum = HEX_SAMPLE_OFFSETS
            .iter()
            .fold(Vec2::zero(), |acc, &offset| acc + offset);
        assert!(sum.length() < 1e-5);
    }
}

//! Shared constant tables for both shadow-mask families.

/// Cell edge length of the rectangular mask family, in output texels.
pub const CELL_SIZE: f32 = 4.0;

/// Hex radius R of the hexagonal mask family, in output texels.
pub const HEX_RADIUS: f32 = 4.0;

/// Phosphor dot radius as a proportion of [`HEX_RADIUS`].
pub const PHOSPHOR_RADIUS_RATIO: f32 = 0.8;

/// Attenuation factor for suppressed channels and the out-of-dot
/// passthrough of the blended hex variant.
pub const MASK_FACTOR: f32 = 0.25;

// Ring falloff by distance class (degrees of separation in the staggered
// cell layout: 0 / 25 / 45 / 65 / 85 / 125).
const W0: f32 = 1.0;
const W25: f32 = 0.5;
const W45: f32 = 0.35;
const W65: f32 = 0.15;
const W85: f32 = 0.1;
const W125: f32 = 0.05;

/// 6x6 neighbour spill weight table, centre-peaked and symmetric under a
/// 180-degree rotation of index space. Indexed as `x + y * 6`.
#[rustfmt::skip]
pub const RING_WEIGHTS: [f32; 36] = [
    W125, W85, W65, W65, W85, W125,
    W85,  W45, W25, W25, W45, W85,
    W65,  W25, W0,  W0,  W25, W65,
    W65,  W25, W0,  W0,  W25, W65,
    W85,  W45, W25, W25, W45, W85,
    W125, W85, W65, W65, W85, W125,
];

/// Offsets to the 6 hex-adjacent neighbour cells of the staggered
/// rectangular mask, in cell units.
pub const NEIGHBOUR_POSITIONS: [[f32; 2]; 6] = [
    [0.0, -1.0],
    [1.0, -0.5],
    [1.0, 0.5],
    [0.0, 1.0],
    [-1.0, 0.5],
    [-1.0, -0.5],
];

/// Per-channel base coordinates into [`RING_WEIGHTS`], three consecutive
/// entries (R, G, B) for each of the 6 neighbours.
#[rustfmt::skip]
pub const NEIGHBOUR_OFFSETS: [[i32; 2]; 18] = [
    [1, 6],  [2, 4],  [0, 4],
    [-3, 4], [-2, 2], [-4, 2],
    [-3, 0], [-2, -2], [-4, -2],
    [1, -2], [2, -4], [0, -4],
    [5, 0],  [6, -2], [4, -2],
    [5, 4],  [6, 2],  [4, 2],
];

/// Directional RGB weights for the 16 subpixels of a 4x4 mask cell,
/// row-major from the cell's top-left subpixel.
#[rustfmt::skip]
pub const SUBPIXEL_WEIGHTS: [[f32; 3]; 16] = [
    [0.5, 0.2, 0.2], [1.0, 0.2, 0.2], [1.0, 0.2, 0.2], [0.5, 0.2, 0.2],
    [0.5, 0.6, 0.2], [1.0, 0.8, 0.7], [1.0, 0.7, 0.8], [0.5, 0.2, 0.6],
    [0.4, 1.0, 0.2], [0.8, 1.0, 0.8], [0.8, 0.8, 1.0], [0.4, 0.2, 1.0],
    [0.2, 1.0, 0.2], [0.2, 1.0, 0.6], [0.2, 0.6, 1.0], [0.2, 0.2, 1.0],
];

/// Spill weight at a ring-table coordinate.
///
/// Coordinates outside the 6x6 table contribute zero, which is what clamps
/// colour bleed at the edge of the neighbour ring.
pub fn ring_weight(x: i32, y: i32) -> f32 {
    if !(0..6).contains(&x) || !(0..6).contains(&y) {
        return 0.0;
    }
    RING_WEIGHTS[(x + y * 6) as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_table_symmetric_under_half_turn() {
        // (x, y) and (5 - x, 5 - y) carry the same weight.
        for y in 0..6 {
            for x in 0..6 {
                assert_eq!(ring_weight(x, y), ring_weight(5 - x, 5 - y), "at ({x}, {y})");
            }
        }
    }

    #[test]
    fn ring_table_peaks_at_centre() {
        for (x, y) in [(2, 2), (3, 2), (2, 3), (3, 3)] {
            assert_eq!(ring_weight(x, y), 1.0);
        }
        assert!(ring_weight(0, 0) < ring_weight(1, 1));
    }

    #[test]
    fn out_of_table_lookups_weigh_zero() {
        assert_eq!(ring_weight(-1, 2), 0.0);
        assert_eq!(ring_weight(6, 2), 0.0);
        assert_eq!(ring_weight(2, -1), 0.0);
        assert_eq!(ring_weight(2, 6), 0.0);
    }

    #[test]
    fn subpixel_weights_stay_in_unit_range() {
        for weight in SUBPIXEL_WEIGHTS {
            for channel in weight {
                assert!(channel > 0.0 && channel <= 1.0);
            }
        }
    }

    #[test]
    fn neighbour_positions_form_a_hex_ring() {
        // Opposite entries cancel out, so the ring is balanced.
        for i in 0..3 {
            let a = NEIGHBOUR_POSITIONS[i];
            let b = NEIGHBOUR_POSITIONS[i + 3];
            assert_eq!(a[0], -b[0]);
            assert_eq!(a[1], -b[1]);
        }
    }
}

//! Rotating RGB triad: which colour channel each hex cell drives.

use super::weights::MASK_FACTOR;

/// Channel index per `(q mod 3, r mod 3)` cell, `TRIAD[q][r]`.
///
/// The table is a Latin square, so within any 3x3 tile each channel appears
/// exactly once per row and per column and no cell shares a channel with an
/// orthogonal neighbour.
pub const TRIAD: [[usize; 3]; 3] = [
    [0, 2, 1],
    [1, 0, 2],
    [2, 1, 0],
];

/// Positive modulo, `((n mod m) + m) mod m`.
///
/// Grid coordinates go negative left of / above the origin; plain `%`
/// would alias those cells onto the wrong triad entry.
pub fn mod_positive(n: i32, m: i32) -> i32 {
    ((n % m) + m) % m
}

/// Positive modulo over floats, mirroring the shader-side helper.
pub fn mod_positive_f32(n: f32, m: f32) -> f32 {
    ((n % m) + m) % m
}

/// Channel driven by the hex cell at axial `(q, r)`.
pub fn phosphor_channel(q: i32, r: i32) -> usize {
    TRIAD[mod_positive(q, 3) as usize][mod_positive(r, 3) as usize]
}

/// Keeps only the phosphor's channel; the other two go dark.
pub fn discrete_channel(colour: [f32; 3], channel: usize) -> [f32; 3] {
    let mut result = [0.0; 3];
    result[channel] = colour[channel];
    result
}

/// Keeps the phosphor's channel at full value and suppresses the other two
/// to `c^2 * MASK_FACTOR`, the "impure" extraction of the blended variant.
pub fn discrete_channel_soft(colour: [f32; 3], channel: usize) -> [f32; 3] {
    let mut result = [
        colour[0] * colour[0] * MASK_FACTOR,
        colour[1] * colour[1] * MASK_FACTOR,
        colour[2] * colour[2] * MASK_FACTOR,
    ];
    result[channel] = colour[channel];
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triad_is_a_latin_square() {
        for i in 0..3 {
            let row: Vec<usize> = (0..3).map(|j| TRIAD[i][j]).collect();
            let col: Vec<usize> = (0..3).map(|j| TRIAD[j][i]).collect();
            for channel in 0..3 {
                assert_eq!(row.iter().filter(|&&c| c == channel).count(), 1);
                assert_eq!(col.iter().filter(|&&c| c == channel).count(), 1);
            }
        }
    }

    #[test]
    fn orthogonal_neighbours_never_share_a_channel() {
        // Wrapping neighbours included: the tile repeats across the grid.
        for q in 0..3i32 {
            for r in 0..3i32 {
                let here = phosphor_channel(q, r);
                assert_ne!(here, phosphor_channel(q + 1, r));
                assert_ne!(here, phosphor_channel(q - 1, r));
                assert_ne!(here, phosphor_channel(q, r + 1));
                assert_ne!(here, phosphor_channel(q, r - 1));
            }
        }
    }

    #[test]
    fn negative_coordinates_use_positive_modulo() {
        assert_eq!(mod_positive(-1, 3), 2);
        assert_eq!(mod_positive(-3, 3), 0);
        assert_eq!(phosphor_channel(-1, -1), phosphor_channel(2, 2));
        assert_eq!(mod_positive_f32(-1.0, 3.0), 2.0);
    }

    #[test]
    fn discrete_extraction_keeps_one_channel() {
        let colour = [0.8, 0.6, 0.4];
        assert_eq!(discrete_channel(colour, 0), [0.8, 0.0, 0.0]);
        assert_eq!(discrete_channel(colour, 1), [0.0, 0.6, 0.0]);
        assert_eq!(discrete_channel(colour, 2), [0.0, 0.0, 0.4]);
    }

    #[test]
    fn soft_extraction_squares_and_attenuates_the_rest() {
        let colour = [0.8, 0.6, 0.4];
        let result = discrete_channel_soft(colour, 0);
        assert_eq!(result[0], 0.8);
        assert_eq!(result[1], 0.6 * 0.6 * MASK_FACTOR);
        assert_eq!(result[2], 0.4 * 0.4 * MASK_FACTOR);
    }
}

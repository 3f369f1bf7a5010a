//! Output surface sizing.
//!
//! The output surface is reallocated only when its computed dimensions
//! actually change; rendering at the same (source, scale) triple frame after
//! frame must not touch the allocator.

/// Base magnification the mask cell geometry is designed against: one source
/// pixel maps to a 4x4 output cell at `scale == BASE_SCALE`.
pub const BASE_SCALE: f32 = 4.0;

/// Output surface dimensions for a source raster at a zoom scale,
/// `floor(source * scale / BASE_SCALE)` per axis, clamped to at least 1.
pub fn output_dims(source_width: u32, source_height: u32, scale: f32) -> (u32, u32) {
    let width = (source_width as f32 * scale / BASE_SCALE).floor() as u32;
    let height = (source_height as f32 * scale / BASE_SCALE).floor() as u32;
    (width.max(1), height.max(1))
}

/// Decides when the output surface needs reallocating.
#[derive(Debug, Default)]
pub struct SurfaceSizer {
    current: Option<(u32, u32)>,
    reallocs: u64,
}

impl SurfaceSizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `Some(dims)` when the caller must reallocate at `dims`, or
    /// `None` when the current allocation already matches.
    pub fn request(&mut self, source_width: u32, source_height: u32, scale: f32) -> Option<(u32, u32)> {
        let dims = output_dims(source_width, source_height, scale);
        if self.current == Some(dims) {
            return None;
        }
        log::debug!(
            "output surface {:?} -> {:?}",
            self.current.unwrap_or((0, 0)),
            dims
        );
        self.current = Some(dims);
        self.reallocs += 1;
        Some(dims)
    }

    pub fn current(&self) -> Option<(u32, u32)> {
        self.current
    }

    /// Total reallocations since construction. Exposed for the performance
    /// contract tests.
    pub fn reallocs(&self) -> u64 {
        self.reallocs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── dimension formula ──

    #[test]
    fn base_scale_is_identity() {
        assert_eq!(output_dims(64, 48, BASE_SCALE), (64, 48));
        assert_eq!(output_dims(2, 2, BASE_SCALE), (2, 2));
    }

    #[test]
    fn dims_floor_and_clamp_to_one() {
        assert_eq!(output_dims(3, 3, 5.0), (3, 3));
        assert_eq!(output_dims(1, 1, 1.0), (1, 1));
        assert_eq!(output_dims(1, 1, 0.5), (1, 1));
    }

    #[test]
    fn degenerate_scales_still_yield_a_surface() {
        assert_eq!(output_dims(16, 16, 0.0), (1, 1));
        assert_eq!(output_dims(16, 16, f32::NAN), (1, 1));
    }

    // ── reallocation policy ──

    #[test]
    fn repeated_requests_allocate_once() {
        let mut sizer = SurfaceSizer::new();
        for _ in 0..100 {
            sizer.request(32, 32, 8.0);
        }
        assert_eq!(sizer.reallocs(), 1);
        assert_eq!(sizer.current(), Some((64, 64)));
    }

    #[test]
    fn scale_changes_that_floor_to_the_same_dims_do_not_reallocate() {
        let mut sizer = SurfaceSizer::new();
        assert!(sizer.request(2, 2, 4.0).is_some());
        // 2 * 4.2 / 4 = 2.1, still floors to 2.
        assert!(sizer.request(2, 2, 4.2).is_none());
        assert_eq!(sizer.reallocs(), 1);
    }

    #[test]
    fn dimension_changes_reallocate() {
        let mut sizer = SurfaceSizer::new();
        assert_eq!(sizer.request(2, 2, 4.0), Some((2, 2)));
        assert_eq!(sizer.request(2, 2, 8.0), Some((4, 4)));
        assert_eq!(sizer.request(4, 2, 8.0), Some((8, 4)));
        assert_eq!(sizer.reallocs(), 3);
    }
}

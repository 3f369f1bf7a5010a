//! CPU-side pixel-art raster.

/// A fixed-size row-major grid of packed 32-bit RGBA texels.
///
/// Packing follows the image-buffer convention: R occupies the lowest byte,
/// A the highest (`0xAABBGGRR` on a little-endian host). The invariant
/// `pixels.len() == w * h` holds by construction; the painting layer mutates
/// cells in place and the render pipeline only ever reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

impl Raster {
    /// Creates a raster filled with transparent black.
    ///
    /// Zero-sized rasters are not representable; both dimensions must be
    /// positive.
    pub fn new(width: u32, height: u32) -> Self {
        assert!(width > 0 && height > 0, "raster dimensions must be positive");
        Self {
            width,
            height,
            pixels: vec![0; (width * height) as usize],
        }
    }

    /// Wraps an existing pixel sequence. Returns `None` when the sequence
    /// length does not match `width * height` or a dimension is zero.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<u32>) -> Option<Self> {
        if width == 0 || height == 0 || pixels.len() != (width * height) as usize {
            return None;
        }
        Some(Self { width, height, pixels })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Raw texel bytes in upload order (row-major, R first within each texel).
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    pub fn get(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[(y * self.width + x) as usize])
    }

    /// Writes one texel. Out-of-range coordinates are ignored.
    pub fn set(&mut self, x: u32, y: u32, texel: u32) {
        if x < self.width && y < self.height {
            self.pixels[(y * self.width + x) as usize] = texel;
        }
    }

    pub fn fill(&mut self, texel: u32) {
        self.pixels.fill(texel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_pixels_enforces_length_invariant() {
        assert!(Raster::from_pixels(2, 2, vec![0; 4]).is_some());
        assert!(Raster::from_pixels(2, 2, vec![0; 3]).is_none());
        assert!(Raster::from_pixels(0, 2, vec![]).is_none());
    }

    #[test]
    fn set_get_round_trip() {
        let mut raster = Raster::new(3, 2);
        raster.set(2, 1, 0xFF00_FF00);
        assert_eq!(raster.get(2, 1), Some(0xFF00_FF00));
        assert_eq!(raster.get(3, 1), None);
    }

    #[test]
    fn bytes_are_little_endian_rgba() {
        let raster = Raster::from_pixels(1, 1, vec![0x4433_2211]).unwrap();
        assert_eq!(raster.as_bytes(), &[0x11, 0x22, 0x33, 0x44]);
    }
}

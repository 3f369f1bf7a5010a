//! The persisted pixel-art document.

use serde::{Deserialize, Serialize};

use crate::color::Color;

/// Everything a save file carries: the raster, the working palette and the
/// name of the shader variant the piece was authored under.
///
/// `pixels` is row-major with R in the lowest byte of each value. The
/// `pixels.len() == width * height` invariant is enforced at the codec
/// boundaries, not here; this is plain data the editor mutates freely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub width: u16,
    pub height: u16,
    pub pixels: Vec<u32>,
    pub palette: Vec<Color>,
    pub shader: String,
}

impl Document {
    /// A blank document: transparent pixels, empty palette, and the
    /// passthrough shader selected.
    pub fn blank(width: u16, height: u16, shader: impl Into<String>) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; usize::from(width) * usize::from(height)],
            palette: Vec::new(),
            shader: shader.into(),
        }
    }

    pub fn pixel_count(&self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_document_satisfies_the_pixel_invariant() {
        let doc = Document::blank(7, 3, "Passthrough");
        assert_eq!(doc.pixels.len(), doc.pixel_count());
        assert!(doc.pixels.iter().all(|&texel| texel == 0));
        assert_eq!(doc.shader, "Passthrough");
    }
}

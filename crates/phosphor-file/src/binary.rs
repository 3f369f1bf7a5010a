//! The `.pix` binary layout.
//!
//! All multi-byte fields are little-endian:
//!
//! | Field        | Size            |
//! |--------------|-----------------|
//! | width        | u16             |
//! | height       | u16             |
//! | pixels       | width*height u32 |
//! | paletteCount | u8              |
//! | palette      | paletteCount RGBA quads |
//! | shaderLen    | u8              |
//! | shader       | shaderLen UTF-8 bytes |
//!
//! Bytes after the shader name are ignored, so readers stay compatible with
//! writers that append new trailing sections.

use crate::color::Color;
use crate::document::Document;
use crate::error::{DecodeError, EncodeError};

/// Serializes `document` into the `.pix` byte layout.
pub fn encode(document: &Document) -> Result<Vec<u8>, EncodeError> {
    let expected = document.pixel_count();
    if document.pixels.len() != expected {
        return Err(EncodeError::PixelCountMismatch {
            expected,
            actual: document.pixels.len(),
        });
    }
    if document.palette.len() > u8::MAX as usize {
        return Err(EncodeError::PaletteTooLarge(document.palette.len()));
    }
    let shader = document.shader.as_bytes();
    if shader.len() > u8::MAX as usize {
        return Err(EncodeError::ShaderNameTooLong(shader.len()));
    }

    let total = 2 + 2 + document.pixels.len() * 4 + 1 + document.palette.len() * 4 + 1 + shader.len();
    let mut bytes = Vec::with_capacity(total);

    bytes.extend_from_slice(&document.width.to_le_bytes());
    bytes.extend_from_slice(&document.height.to_le_bytes());
    for &texel in &document.pixels {
        bytes.extend_from_slice(&texel.to_le_bytes());
    }
    bytes.push(document.palette.len() as u8);
    for color in &document.palette {
        bytes.extend_from_slice(&[color.r, color.g, color.b, color.a]);
    }
    bytes.push(shader.len() as u8);
    bytes.extend_from_slice(shader);

    Ok(bytes)
}

/// Parses the `.pix` byte layout back into a [`Document`].
pub fn decode(bytes: &[u8]) -> Result<Document, DecodeError> {
    let mut reader = Reader::new(bytes);

    let width = reader.u16_le()?;
    let height = reader.u16_le()?;
    if width == 0 || height == 0 {
        return Err(DecodeError::ZeroDimension { width, height });
    }

    // The header is untrusted; reserve only after the buffer proves it can
    // hold the pixels it promises.
    let pixel_count = usize::from(width) * usize::from(height);
    let pixel_bytes = pixel_count * 4;
    if pixel_bytes > reader.remaining() {
        return Err(DecodeError::Truncated {
            needed: pixel_bytes - reader.remaining(),
            available: reader.remaining(),
        });
    }
    let mut pixels = Vec::with_capacity(pixel_count);
    for _ in 0..pixel_count {
        pixels.push(reader.u32_le()?);
    }

    let palette_count = reader.u8()?;
    let mut palette = Vec::with_capacity(usize::from(palette_count));
    for _ in 0..palette_count {
        let quad = reader.take(4)?;
        palette.push(Color::new(quad[0], quad[1], quad[2], quad[3]));
    }

    let shader_len = reader.u8()?;
    let shader = std::str::from_utf8(reader.take(usize::from(shader_len))?)
        .map_err(DecodeError::ShaderNameNotUtf8)?
        .to_string();

    Ok(Document {
        width,
        height,
        pixels,
        palette,
        shader,
    })
}

struct Reader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.offset
    }

    fn take(&mut self, count: usize) -> Result<&'a [u8], DecodeError> {
        let available = self.remaining();
        if count > available {
            return Err(DecodeError::Truncated {
                needed: count - available,
                available,
            });
        }
        let slice = &self.bytes[self.offset..self.offset + count];
        self.offset += count;
        Ok(slice)
    }

    fn u8(&mut self) -> Result<u8, DecodeError> {
        Ok(self.take(1)?[0])
    }

    fn u16_le(&mut self) -> Result<u16, DecodeError> {
        let bytes = self.take(2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    fn u32_le(&mut self) -> Result<u32, DecodeError> {
        let bytes = self.take(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Document {
        Document {
            width: 2,
            height: 2,
            pixels: vec![0xFF0000FF, 0xFF00FF00, 0xFFFF0000, 0xFFFFFFFF],
            palette: vec![Color::opaque(255, 0, 0), Color::new(0, 255, 0, 128)],
            shader: "Shadow Mask CRT v0.2".to_string(),
        }
    }

    // ── round trips ──

    #[test]
    fn encode_decode_round_trip() {
        let doc = sample();
        let decoded = decode(&encode(&doc).unwrap()).unwrap();
        assert_eq!(decoded, doc);
    }

    #[test]
    fn round_trip_preserves_dimensions_and_pixels() {
        let doc = sample();
        let decoded = decode(&encode(&doc).unwrap()).unwrap();
        assert_eq!(decoded.width, 2);
        assert_eq!(decoded.height, 2);
        assert_eq!(
            decoded.pixels,
            vec![0xFF0000FF, 0xFF00FF00, 0xFFFF0000, 0xFFFFFFFF]
        );
    }

    #[test]
    fn empty_palette_and_shader_name_are_valid() {
        let doc = Document::blank(1, 1, "");
        let decoded = decode(&encode(&doc).unwrap()).unwrap();
        assert_eq!(decoded, doc);
    }

    // ── layout ──

    #[test]
    fn header_is_little_endian() {
        let bytes = encode(&Document::blank(258, 1, "")).unwrap();
        assert_eq!(&bytes[..4], &[0x02, 0x01, 0x01, 0x00]);
    }

    #[test]
    fn trailing_bytes_are_tolerated() {
        let mut bytes = encode(&sample()).unwrap();
        bytes.extend_from_slice(b"future section");
        assert_eq!(decode(&bytes).unwrap(), sample());
    }

    // ── malformed input ──

    #[test]
    fn truncation_at_every_prefix_is_an_error_not_a_panic() {
        let bytes = encode(&sample()).unwrap();
        for len in 0..bytes.len() {
            assert!(
                matches!(decode(&bytes[..len]), Err(DecodeError::Truncated { .. })),
                "prefix of {len} bytes"
            );
        }
    }

    #[test]
    fn oversized_header_on_a_tiny_file_fails_without_allocating() {
        // A 4-byte file claiming 65535x65535 pixels must come back as a
        // truncation error, not a multi-gigabyte reservation.
        let bytes = [0xFFu8, 0xFF, 0xFF, 0xFF];
        assert!(matches!(
            decode(&bytes),
            Err(DecodeError::Truncated { available: 0, .. })
        ));
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        // Hand-built header: width 0, height 2.
        let bytes = [0u8, 0, 2, 0, 0, 0];
        assert!(matches!(
            decode(&bytes),
            Err(DecodeError::ZeroDimension { .. })
        ));
    }

    #[test]
    fn invalid_shader_name_bytes_are_rejected() {
        let mut bytes = encode(&Document::blank(1, 1, "ab")).unwrap();
        let shader_start = bytes.len() - 2;
        bytes[shader_start] = 0xFF;
        assert!(matches!(
            decode(&bytes),
            Err(DecodeError::ShaderNameNotUtf8(_))
        ));
    }

    #[test]
    fn encode_rejects_structural_violations() {
        let mut doc = sample();
        doc.pixels.pop();
        assert!(matches!(
            encode(&doc),
            Err(EncodeError::PixelCountMismatch { expected: 4, actual: 3 })
        ));

        let mut doc = sample();
        doc.palette = vec![Color::opaque(0, 0, 0); 256];
        assert!(matches!(encode(&doc), Err(EncodeError::PaletteTooLarge(256))));

        let mut doc = sample();
        doc.shader = "x".repeat(256);
        assert!(matches!(
            encode(&doc),
            Err(EncodeError::ShaderNameTooLong(256))
        ));
    }
}

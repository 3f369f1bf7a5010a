//! Palette colour type and the conversions the editor's picker relies on.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An RGBA colour with 8-bit channels.
///
/// Serialized as a hex string (`#rrggbb`, or `#rrggbbaa` when the alpha is
/// not opaque), the form the palette editor displays.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Packs into the raster texel layout: R in the lowest byte, A in the
    /// highest.
    pub const fn to_packed(self) -> u32 {
        (self.a as u32) << 24 | (self.b as u32) << 16 | (self.g as u32) << 8 | self.r as u32
    }

    pub const fn from_packed(texel: u32) -> Self {
        Self {
            r: (texel & 0xFF) as u8,
            g: (texel >> 8 & 0xFF) as u8,
            b: (texel >> 16 & 0xFF) as u8,
            a: (texel >> 24 & 0xFF) as u8,
        }
    }

    /// Parses `#rrggbb` or `#rrggbbaa`; the leading `#` is optional.
    pub fn parse_hex(text: &str) -> Option<Self> {
        let digits = text.strip_prefix('#').unwrap_or(text);
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        match digits.len() {
            6 => Some(Self::opaque(channel(0)?, channel(2)?, channel(4)?)),
            8 => Some(Self::new(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => None,
        }
    }

    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    /// Hue in degrees [0, 360), saturation and value in [0, 1].
    pub fn to_hsv(self) -> (f32, f32, f32) {
        let r = self.r as f32 / 255.0;
        let g = self.g as f32 / 255.0;
        let b = self.b as f32 / 255.0;
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;

        if delta == 0.0 {
            return (0.0, 0.0, max);
        }

        let hue = if max == r {
            (g - b) / delta
        } else if max == g {
            2.0 + (b - r) / delta
        } else {
            4.0 + (r - g) / delta
        };
        ((hue * 60.0).rem_euclid(360.0), delta / max, max)
    }

    /// Opaque colour from hue in degrees, saturation and value in [0, 1].
    pub fn from_hsv(hue: f32, saturation: f32, value: f32) -> Self {
        let h = (hue.rem_euclid(360.0)) / 60.0;
        let sector = h.floor() as u32 % 6;
        let f = h - h.floor();
        let p = value * (1.0 - saturation);
        let q = value * (1.0 - f * saturation);
        let t = value * (1.0 - (1.0 - f) * saturation);

        let (r, g, b) = match sector {
            0 => (value, t, p),
            1 => (q, value, p),
            2 => (p, value, t),
            3 => (p, q, value),
            4 => (t, p, value),
            _ => (value, p, q),
        };
        Self::opaque(
            (r * 255.0).round() as u8,
            (g * 255.0).round() as u8,
            (b * 255.0).round() as u8,
        )
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        Self::parse_hex(&text).ok_or_else(|| format!("invalid hex colour {text:?}"))
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packed_layout_puts_red_in_the_lowest_byte() {
        let color = Color::new(0x11, 0x22, 0x33, 0x44);
        assert_eq!(color.to_packed(), 0x4433_2211);
        assert_eq!(Color::from_packed(0x4433_2211), color);
    }

    #[test]
    fn hex_parsing_accepts_six_and_eight_digits() {
        assert_eq!(Color::parse_hex("#ff8000"), Some(Color::opaque(255, 128, 0)));
        assert_eq!(Color::parse_hex("ff8000"), Some(Color::opaque(255, 128, 0)));
        assert_eq!(
            Color::parse_hex("#ff800080"),
            Some(Color::new(255, 128, 0, 128))
        );
        assert_eq!(Color::parse_hex("#xyzxyz"), None);
        assert_eq!(Color::parse_hex("#fff"), None);
    }

    #[test]
    fn hex_formatting_drops_an_opaque_alpha() {
        assert_eq!(Color::opaque(255, 128, 0).to_hex(), "#ff8000");
        assert_eq!(Color::new(255, 128, 0, 128).to_hex(), "#ff800080");
    }

    #[test]
    fn hsv_round_trip_on_primaries() {
        for color in [
            Color::opaque(255, 0, 0),
            Color::opaque(0, 255, 0),
            Color::opaque(0, 0, 255),
            Color::opaque(255, 255, 255),
            Color::opaque(0, 0, 0),
        ] {
            let (h, s, v) = color.to_hsv();
            assert_eq!(Color::from_hsv(h, s, v), color);
        }
    }
}

use std::fmt;

/// A structural failure while encoding a document to the `.pix` binary
/// layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// `pixels.len()` disagrees with `width * height`.
    PixelCountMismatch { expected: usize, actual: usize },
    /// The palette has more than 255 entries.
    PaletteTooLarge(usize),
    /// The shader name is longer than 255 UTF-8 bytes.
    ShaderNameTooLong(usize),
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodeError::PixelCountMismatch { expected, actual } => {
                write!(f, "expected {expected} pixels, document has {actual}")
            }
            EncodeError::PaletteTooLarge(len) => {
                write!(f, "palette has {len} entries, limit is 255")
            }
            EncodeError::ShaderNameTooLong(len) => {
                write!(f, "shader name is {len} bytes, limit is 255")
            }
        }
    }
}

impl std::error::Error for EncodeError {}

/// A failure while decoding `.pix` bytes.
#[derive(Debug)]
pub enum DecodeError {
    /// The byte stream ended before a field it promised.
    Truncated { needed: usize, available: usize },
    /// A header dimension is zero; a document always has at least one pixel.
    ZeroDimension { width: u16, height: u16 },
    /// The shader name bytes are not valid UTF-8.
    ShaderNameNotUtf8(std::str::Utf8Error),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::Truncated { needed, available } => {
                write!(f, "truncated file: needed {needed} more bytes, {available} available")
            }
            DecodeError::ZeroDimension { width, height } => {
                write!(f, "zero dimension in header: {width}x{height}")
            }
            DecodeError::ShaderNameNotUtf8(err) => {
                write!(f, "shader name is not UTF-8: {err}")
            }
        }
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DecodeError::ShaderNameNotUtf8(err) => Some(err),
            _ => None,
        }
    }
}

/// A failure while reading the JSON project representation.
#[derive(Debug)]
pub enum JsonError {
    Syntax(serde_json::Error),
    /// The decoded pixel sequence disagrees with the decoded dimensions.
    PixelCountMismatch { expected: usize, actual: usize },
}

impl fmt::Display for JsonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JsonError::Syntax(err) => write!(f, "invalid project JSON: {err}"),
            JsonError::PixelCountMismatch { expected, actual } => {
                write!(f, "expected {expected} pixels, JSON document has {actual}")
            }
        }
    }
}

impl std::error::Error for JsonError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            JsonError::Syntax(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for JsonError {
    fn from(err: serde_json::Error) -> Self {
        JsonError::Syntax(err)
    }
}

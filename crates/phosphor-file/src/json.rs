//! JSON project representation.
//!
//! A human-inspectable alternative to the `.pix` binary, mirroring its
//! fields one to one. Pixels stay numeric; palette entries serialize as hex
//! strings.

use crate::document::Document;
use crate::error::JsonError;

/// Pretty-printed JSON for `document`.
pub fn to_json(document: &Document) -> Result<String, JsonError> {
    Ok(serde_json::to_string_pretty(document)?)
}

/// Parses project JSON, enforcing the pixel-count invariant the format
/// itself cannot express.
pub fn from_json(text: &str) -> Result<Document, JsonError> {
    let document: Document = serde_json::from_str(text)?;
    let expected = document.pixel_count();
    if document.pixels.len() != expected {
        return Err(JsonError::PixelCountMismatch {
            expected,
            actual: document.pixels.len(),
        });
    }
    Ok(document)
}

//! Codecs for **pixel-art documents** (`.pix` binary and project JSON).
//!
//! This crate is intentionally free of GPU dependencies so it can be
//! consumed by converters, asset pipelines, and tests without pulling in
//! any engine code.
//!
//! # Structure
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`document`] | `Document` |
//! | [`color`] | `Color`, hex and HSV conversions |
//! | [`binary`] | `.pix` `encode` / `decode` |
//! | [`json`] | `to_json` / `from_json` |
//! | [`error`] | `EncodeError`, `DecodeError`, `JsonError` |
//!
//! # Quick start
//!
//! ```rust
//! use phosphor_file::{binary, Document};
//!
//! let doc = Document::blank(2, 2, "Passthrough");
//! let bytes = binary::encode(&doc).unwrap();
//! assert_eq!(binary::decode(&bytes).unwrap(), doc);
//! ```

pub mod binary;
pub mod color;
pub mod document;
pub mod error;
pub mod json;

pub use color::Color;
pub use document::Document;
pub use error::{DecodeError, EncodeError, JsonError};

//! Utility functions and shared types for caption-core
//!
//! Contains the crate error type and the text decoding helpers used by the
//! plain subtitle extractor.

pub mod encoding;
pub mod errors;

pub use encoding::{decode_text, detect_bom, normalize_line_endings, BomType, TextEncoding};
pub use errors::{CaptionError, ErrorCategory};

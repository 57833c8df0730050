//! Utility types for caption-layout

pub mod errors;

pub use errors::{LayoutError, Result};

//! Error types for layout and sessions

use caption_core::CaptionError;
use thiserror::Error;

/// Layout error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    /// Error raised by caption-core
    #[error("Caption error: {0}")]
    Caption(#[from] CaptionError),

    /// A collision entry no longer matches an active attribute
    #[error("Stale collision entry {id}")]
    StaleEntry {
        /// Entry id
        id: u32,
    },

    /// The collision boundary covers no pixels
    #[error("Invalid collision boundary: {width}x{height}")]
    InvalidBoundary {
        /// Boundary width
        width: i32,
        /// Boundary height
        height: i32,
    },
}

impl LayoutError {
    /// Check if the session can carry on after this error
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Caption(err) => err.is_recoverable(),
            Self::StaleEntry { .. } | Self::InvalidBoundary { .. } => true,
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = core::result::Result<T, LayoutError>;

//! Error types shared by extractors, style resolution and geometry
//!
//! Nothing in caption processing is fatal: most of these errors are raised
//! inside an extractor, logged, and turned into a skipped run or a skipped
//! field. They surface to callers only from constructors that validate
//! host-supplied values.

use core::fmt;
use thiserror::Error;

/// Main error type for caption-core operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CaptionError {
    /// Source type does not match the configured caption type
    #[error("Caption type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        /// Type the consumer is configured for
        expected: String,
        /// Type carried by the submitted source
        actual: String,
    },

    /// Payload bytes could not be decoded as text
    #[error("Decode error: {0}")]
    Decode(String),

    /// Length value unusable for layout (non-finite or negative)
    #[error("Invalid length: {0}")]
    InvalidLength(String),

    /// Rendering dimensions out of range
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Offending width
        width: i32,
        /// Offending height
        height: i32,
    },

    /// Window description inconsistent with the caption format
    #[error("Invalid window: {0}")]
    InvalidWindow(String),

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CaptionError {
    /// Create a type mismatch error
    pub fn type_mismatch<E: fmt::Display, A: fmt::Display>(expected: E, actual: A) -> Self {
        Self::TypeMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    /// Create a decode error
    pub fn decode<T: fmt::Display>(message: T) -> Self {
        Self::Decode(message.to_string())
    }

    /// Create an invalid length error
    pub fn invalid_length<T: fmt::Display>(value: T, reason: &str) -> Self {
        Self::InvalidLength(format!("'{value}': {reason}"))
    }

    /// Create an invalid dimensions error
    #[must_use]
    pub const fn invalid_dimensions(width: i32, height: i32) -> Self {
        Self::InvalidDimensions { width, height }
    }

    /// Create an invalid window error
    pub fn invalid_window<T: fmt::Display>(message: T) -> Self {
        Self::InvalidWindow(message.to_string())
    }

    /// Check if the caption pipeline can continue after this error
    ///
    /// Only configuration problems require the host to act; every payload
    /// problem is absorbed by skipping the affected content.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        match self {
            Self::TypeMismatch { .. }
            | Self::Decode(_)
            | Self::InvalidLength(_)
            | Self::InvalidWindow(_) => true,
            Self::InvalidDimensions { .. } | Self::Config(_) => false,
        }
    }

    /// Get error category for filtering/grouping
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::TypeMismatch { .. } => ErrorCategory::Routing,
            Self::Decode(_) => ErrorCategory::Encoding,
            Self::InvalidLength(_) | Self::InvalidWindow(_) => ErrorCategory::Payload,
            Self::InvalidDimensions { .. } => ErrorCategory::Geometry,
            Self::Config(_) => ErrorCategory::Configuration,
        }
    }
}

/// Error category for logging and filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Source sent to a consumer of another caption type
    Routing,
    /// Text encoding failures
    Encoding,
    /// Malformed style or window records
    Payload,
    /// Rectangles and rendering areas
    Geometry,
    /// Host configuration
    Configuration,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Routing => write!(f, "routing"),
            Self::Encoding => write!(f, "encoding"),
            Self::Payload => write!(f, "payload"),
            Self::Geometry => write!(f, "geometry"),
            Self::Configuration => write!(f, "configuration"),
        }
    }
}

impl From<core::str::Utf8Error> for CaptionError {
    fn from(err: core::str::Utf8Error) -> Self {
        Self::Decode(format!("invalid UTF-8 at byte {}", err.valid_up_to()))
    }
}

impl From<std::string::FromUtf16Error> for CaptionError {
    fn from(err: std::string::FromUtf16Error) -> Self {
        Self::Decode(format!("invalid UTF-16: {err}"))
    }
}

/// Result type alias for convenience
pub type Result<T> = core::result::Result<T, CaptionError>;

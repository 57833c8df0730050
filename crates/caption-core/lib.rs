//! Caption extraction and style resolution
//!
//! Turns heterogeneous caption sources into one format-neutral model:
//! positioned, styled [`RenderingAttribute`]s. Supported inputs are CEA-608
//! character grids, CEA-708 window services, TTML cues and plain subtitle
//! cues (SRT, SUB, SMI). The crate never draws and never measures text; it
//! produces relative window rectangles, text runs and style records that a
//! layout stage places inside a [`geometry::RenderingArea`].
//!
//! # Quick Start
//!
//! ```rust
//! use caption_core::extract::{plain, ExtractContext, FontColorMap, PlainCue};
//! use caption_core::geometry::RenderingArea;
//! use caption_core::style::CaptionSettings;
//!
//! let colors = FontColorMap::new();
//! let ctx = ExtractContext::new(RenderingArea::default(), &colors);
//! let attribute = plain::extract(&PlainCue::text(1, 0, 2000, "Hello"), &ctx);
//!
//! // Viewer preferences are merged over the cue's own settings
//! let user = CaptionSettings::default();
//! let resolved = attribute.cue_settings.resolve(&user, &ctx.area);
//! assert!(resolved.font_size.is_some());
//! ```
//!
//! # Modules
//!
//! - [`geometry`]: integer rectangles, percentages and the rendering area
//! - [`model`]: attributes, runs, colors and payloads
//! - [`style`]: caption settings, touched-field merge and unit conversion
//! - [`extract`]: one extractor per caption format
//! - [`utils`]: errors and text decoding

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(clippy::all)]
#![deny(unsafe_code)]

pub mod extract;
pub mod geometry;
pub mod model;
pub mod style;
pub mod utils;

pub use extract::{CaptionSource, CaptionType, ExtractContext, FontColorMap};
pub use geometry::{Rect, RenderingArea};
pub use model::{Color, Payload, Removal, RenderingAttribute, TextRun, WindowRect, TIME_INFINITE};
pub use style::{CaptionSettings, FontSize, Measure};
pub use utils::{errors::Result, CaptionError, ErrorCategory};

/// Crate version for runtime compatibility checks
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! Caption layout and live caption sessions
//!
//! Places the attributes produced by `caption-core` inside a rendering area:
//! relative windows become pixel rects, viewer settings are merged over the
//! cue styles, and overlapping windows are moved apart by a shared
//! collision resolver. A [`CaptionSession`] ties this together for one
//! caption track and publishes the active attribute list after every
//! change.
//!
//! # Quick Start
//!
//! ```rust
//! use caption_core::extract::{cea608::CellAttributes, CaptionSource, Cea608Frame};
//! use caption_core::{CaptionType, RenderingArea};
//! use caption_layout::{CaptionSession, SessionConfig};
//!
//! let config = SessionConfig::builder(CaptionType::Cea608).build()?;
//! let mut session = CaptionSession::new(config, RenderingArea::default())?;
//! session.set_publisher(|attributes: &[caption_core::RenderingAttribute]| {
//!     println!("{} captions on screen", attributes.len());
//! });
//!
//! let mut frame = Cea608Frame::new(0);
//! frame.grid.write_text(14, 0, "HELLO", CellAttributes::default());
//! assert!(session.submit(CaptionSource::Cea608(frame)));
//! assert_eq!(session.attributes().len(), 1);
//! # Ok::<(), caption_layout::LayoutError>(())
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(clippy::all)]
#![deny(unsafe_code)]

pub mod collision;
pub mod layout;
pub mod session;
pub mod utils;

pub use collision::{CollisionEntry, CollisionResolver, CollisionStrategy, Resolution};
pub use layout::{absolute_rect, layout_attribute};
pub use session::{CaptionPublisher, CaptionSession, SessionConfig, SessionConfigBuilder, SessionState};
pub use utils::{LayoutError, Result};

/// Crate version for runtime compatibility checks
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! Format-neutral caption data model
//!
//! Every extractor lowers its source into [`RenderingAttribute`]s built from
//! the types in this module; nothing downstream knows which caption format
//! a block came from.

pub mod attribute;
pub mod color;
pub mod text;

pub use attribute::{
    AnchorPoint, Payload, Removal, RenderingAttribute, TextDirection, WindowRect,
    TIME_INFINITE,
};
pub use color::Color;
pub use text::{Bitmap, RunStyle, TextRun, TextStyle};

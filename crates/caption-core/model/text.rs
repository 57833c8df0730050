//! Styled text runs and image payloads

use super::color::Color;
use crate::{style::EdgeStyle, utils::CaptionError, Result};

bitflags::bitflags! {
    /// Character decorations carried by a run
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TextStyle: u8 {
        /// Bold (CEA-608 "large")
        const BOLD = 1 << 0;
        /// Italic
        const ITALIC = 1 << 1;
        /// Underline
        const UNDERLINE = 1 << 2;
        /// Strike-through
        const STRIKETHROUGH = 1 << 3;
        /// Overline
        const OVERLINE = 1 << 4;
        /// Raised baseline
        const SUPERSCRIPT = 1 << 5;
        /// Lowered baseline
        const SUBSCRIPT = 1 << 6;
    }
}

/// Every attribute of a run except its text
///
/// Two adjacent characters belong to the same run exactly when their
/// `RunStyle`s compare equal.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunStyle {
    /// Foreground color after palette and color-map resolution
    pub font_color: Color,
    /// Background behind the glyphs
    pub background_color: Color,
    /// Decoration flags
    pub flags: TextStyle,
    /// Per-run edge override, `None` defers to the window settings
    pub edge_style: Option<EdgeStyle>,
    /// Color for `edge_style`
    pub edge_color: Option<Color>,
    /// Multiplier on the window font size (CEA-708 pen size)
    pub relative_size: f32,
}

impl Default for RunStyle {
    fn default() -> Self {
        Self {
            font_color: Color::WHITE,
            background_color: Color::TRANSPARENT,
            flags: TextStyle::empty(),
            edge_style: None,
            edge_color: None,
            relative_size: 1.0,
        }
    }
}

impl RunStyle {
    /// Plain style with the given foreground
    #[must_use]
    pub fn with_font_color(font_color: Color) -> Self {
        Self {
            font_color,
            ..Self::default()
        }
    }
}

/// A maximal span of text sharing one [`RunStyle`]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    /// Text, may end with `\n` where a line break closed the run
    pub text: String,
    /// Shared attributes
    pub style: RunStyle,
}

impl TextRun {
    /// Create a run
    pub fn new(text: impl Into<String>, style: RunStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

/// Decoded image caption (bitmap subtitles)
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl Bitmap {
    /// Wrap RGBA pixels
    ///
    /// # Errors
    ///
    /// Returns [`CaptionError::InvalidWindow`] if `rgba` is not exactly
    /// `width * height * 4` bytes.
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(CaptionError::invalid_window(format!(
                "bitmap {width}x{height} needs {expected} bytes, got {}",
                rgba.len()
            )));
        }
        Ok(Self {
            width,
            height,
            rgba,
        })
    }

    /// Width in pixels
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Row-major RGBA bytes
    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        &self.rgba
    }
}

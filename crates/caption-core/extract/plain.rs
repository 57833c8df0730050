//! Plain subtitle extraction (SRT, SUB, SMI and similar)
//!
//! Plain cues carry no styling. Text is decoded from its declared encoding
//! and shown as a single run in a fixed bottom-center window; image cues
//! are passed through as a bitmap payload in the same window. Each cue
//! removes the active cues whose end time is at or before its own start
//! time; an earlier cue that runs past that start stays on screen.

use super::ExtractContext;
use crate::{
    model::{Bitmap, Color, Removal, RenderingAttribute, RunStyle, TextRun, WindowRect},
    style::{CaptionSettings, FontSize, Gravity},
    utils::{decode_text, TextEncoding},
};
use log::{trace, warn};

/// Window alpha of the translucent black background
pub const WINDOW_ALPHA: u8 = 128;

/// Padding around the text in pixels
pub const WINDOW_PADDING: f32 = 10.0;

/// Source file flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PlainKind {
    /// SubRip
    Srt,
    /// MicroDVD / SubViewer
    Sub,
    /// SAMI
    Smi,
    /// Anything else
    #[default]
    Generic,
}

/// Cue payload as handed over by the demuxer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlainContent {
    /// Encoded text
    Text {
        /// Raw bytes
        bytes: Vec<u8>,
        /// Declared encoding; a BOM takes precedence
        encoding: TextEncoding,
    },
    /// Decoded bitmap subtitle
    Image(Bitmap),
}

/// One plain cue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlainCue {
    /// Cue identity
    pub id: u32,
    /// Source flavour
    pub kind: PlainKind,
    /// Display start
    pub start_time: i64,
    /// Display end
    pub end_time: i64,
    /// Payload
    pub content: PlainContent,
}

impl PlainCue {
    /// UTF-8 text cue
    pub fn text(id: u32, start_time: i64, end_time: i64, text: impl Into<String>) -> Self {
        Self {
            id,
            kind: PlainKind::Generic,
            start_time,
            end_time,
            content: PlainContent::Text {
                bytes: text.into().into_bytes(),
                encoding: TextEncoding::Utf8,
            },
        }
    }
}

/// Fixed window style for plain cues
#[must_use]
pub fn default_settings() -> CaptionSettings {
    CaptionSettings {
        font_size: Some(FontSize::Cells(1.0)),
        font_color: Some(Color::WHITE),
        window_color: Some(Color::BLACK.with_alpha(WINDOW_ALPHA)),
        gravity: Some(Gravity::CENTER),
        window_rect: Some(WindowRect::new(10.0, 75.0, 80.0, 20.0)),
        ..CaptionSettings::default()
    }
    .with_padding(WINDOW_PADDING)
}

/// Convert one cue into an attribute
///
/// A cue whose text cannot be decoded, or decodes to nothing, still
/// removes its predecessor but adds no content.
#[must_use]
pub fn extract(cue: &PlainCue, _ctx: &ExtractContext<'_>) -> RenderingAttribute {
    let removal = Removal::ByTime(cue.start_time);
    let attribute = RenderingAttribute::new(cue.id, cue.start_time, cue.end_time)
        .with_removal(removal)
        .with_settings(default_settings());

    match &cue.content {
        PlainContent::Image(bitmap) => attribute.with_image(bitmap.clone()),
        PlainContent::Text { bytes, encoding } => match decode_text(bytes, *encoding) {
            Ok(text) => {
                let text = text.trim_end_matches('\n');
                if text.is_empty() {
                    trace!("{:?} cue {}: empty text", cue.kind, cue.id);
                    return RenderingAttribute::removal_only(cue.id, cue.start_time, removal);
                }
                attribute.with_runs(vec![TextRun::new(
                    text,
                    RunStyle::with_font_color(Color::WHITE),
                )])
            }
            Err(err) => {
                warn!("{:?} cue {}: {err}", cue.kind, cue.id);
                RenderingAttribute::removal_only(cue.id, cue.start_time, removal)
            }
        },
    }
}

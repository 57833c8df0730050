//! Format extractors
//!
//! Each submodule turns one caption source into [`RenderingAttribute`]s.
//! Extractors are pure: any state that must survive between calls (the
//! CEA-608 row cursor, CEA-708 window visibility) is passed in and handed
//! back explicitly, and rendering-area dependent values stay symbolic so a
//! later area change does not require re-extraction.
//!
//! [`RenderingAttribute`]: crate::model::RenderingAttribute

pub mod cea608;
pub mod cea708;
pub mod plain;
pub mod ttml;

pub(crate) mod runs;

use crate::{geometry::RenderingArea, model::Color};
use ahash::AHashMap;
use core::fmt;

pub use cea608::{Cea608Frame, Cea608Output, RowCursor};
pub use cea708::{Cea708Output, Cea708Service, Cea708State};
pub use plain::{PlainContent, PlainCue, PlainKind};
pub use ttml::TtmlCue;

/// Caption format a session is configured for
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaptionType {
    /// Line-21 character grid
    Cea608,
    /// DTVCC windowed services
    Cea708,
    /// Timed Text Markup Language cues
    Ttml,
    /// SRT, SUB, SMI and other plain cues
    Plain,
}

impl fmt::Display for CaptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cea608 => write!(f, "CEA-608"),
            Self::Cea708 => write!(f, "CEA-708"),
            Self::Ttml => write!(f, "TTML"),
            Self::Plain => write!(f, "plain"),
        }
    }
}

/// Raw payload handed over by the host's decoder
#[derive(Debug, Clone, PartialEq)]
pub enum CaptionSource {
    /// A CEA-608 grid snapshot
    Cea608(Cea608Frame),
    /// A CEA-708 service update
    Cea708(Cea708Service),
    /// A TTML cue
    Ttml(TtmlCue),
    /// A plain cue
    Plain(PlainCue),
}

impl CaptionSource {
    /// Format of this source
    #[must_use]
    pub const fn caption_type(&self) -> CaptionType {
        match self {
            Self::Cea608(_) => CaptionType::Cea608,
            Self::Cea708(_) => CaptionType::Cea708,
            Self::Ttml(_) => CaptionType::Ttml,
            Self::Plain(_) => CaptionType::Plain,
        }
    }
}

/// Viewer font color substitutions applied to extracted runs
///
/// Maps a color resolved from the caption source to the color the viewer
/// wants instead. Colors without an entry pass through unchanged.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FontColorMap {
    colors: AHashMap<Color, Color>,
}

impl FontColorMap {
    /// Empty map
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace `from` with `to`, returning the previous replacement
    pub fn insert(&mut self, from: Color, to: Color) -> Option<Color> {
        self.colors.insert(from, to)
    }

    /// Drop the replacement for `from`
    pub fn remove(&mut self, from: Color) -> Option<Color> {
        self.colors.remove(&from)
    }

    /// Substitute `color` if the viewer remapped it
    #[must_use]
    pub fn map(&self, color: Color) -> Color {
        self.colors.get(&color).copied().unwrap_or(color)
    }

    /// Number of replacements
    #[must_use]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// True when nothing is remapped
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

impl FromIterator<(Color, Color)> for FontColorMap {
    fn from_iter<I: IntoIterator<Item = (Color, Color)>>(iter: I) -> Self {
        Self {
            colors: iter.into_iter().collect(),
        }
    }
}

/// Read-only inputs shared by every extractor
#[derive(Debug, Clone, Copy)]
pub struct ExtractContext<'a> {
    /// Area the captions will be placed in
    pub area: RenderingArea,
    /// Viewer color substitutions
    pub color_map: &'a FontColorMap,
}

impl<'a> ExtractContext<'a> {
    /// Bundle the extraction inputs
    #[must_use]
    pub const fn new(area: RenderingArea, color_map: &'a FontColorMap) -> Self {
        Self { area, color_map }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_map_passes_unmapped_colors() {
        let map: FontColorMap = [(Color::WHITE, Color::YELLOW)].into_iter().collect();
        assert_eq!(map.map(Color::WHITE), Color::YELLOW);
        assert_eq!(map.map(Color::RED), Color::RED);
        assert_eq!(map.len(), 1);
        assert!(FontColorMap::new().is_empty());
    }

    #[test]
    fn source_reports_its_type() {
        let source = CaptionSource::Cea608(Cea608Frame::new(0));
        assert_eq!(source.caption_type(), CaptionType::Cea608);
        assert_eq!(CaptionType::Ttml.to_string(), "TTML");
    }
}

//! Caption settings and the "touched field" merge
//!
//! Every [`CaptionSettings`] field is optional. `None` means the owner left
//! the field untouched, so an overlay only overrides what it actually sets.
//! Extractor output is always the base and the viewer's global preferences
//! are always the overlay.
//!
//! # Example
//!
//! ```rust
//! use caption_core::model::Color;
//! use caption_core::style::{CaptionSettings, EdgeStyle};
//!
//! let cue = CaptionSettings {
//!     font_color: Some(Color::YELLOW),
//!     edge_style: Some(EdgeStyle::DropShadow),
//!     ..CaptionSettings::default()
//! };
//! let user = CaptionSettings {
//!     font_color: Some(Color::WHITE),
//!     ..CaptionSettings::default()
//! };
//!
//! let merged = cue.merge_touched(&user);
//! assert_eq!(merged.font_color, Some(Color::WHITE));
//! assert_eq!(merged.edge_style, Some(EdgeStyle::DropShadow));
//! ```

pub mod units;

use crate::{
    geometry::RenderingArea,
    model::{Color, WindowRect},
};

pub use units::{
    cell_font_size, rescale_user_font_size, to_pixels, FontSize, Length, LengthUnit, Measure,
    DEFAULT_FONT_SIZE_DIP, FONT_CELL_RATIO,
};

/// Glyph edge treatment
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EdgeStyle {
    /// No edge
    #[default]
    None,
    /// Shadow offset down-right
    DropShadow,
    /// Embossed
    Raised,
    /// Engraved
    Depressed,
    /// Outline of uniform width
    Uniform,
}

bitflags::bitflags! {
    /// Placement of the text block inside its window
    ///
    /// One horizontal and one vertical bit are normally set.
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Gravity: u8 {
        /// Flush left
        const LEFT = 1 << 0;
        /// Centered horizontally
        const CENTER_HORIZONTAL = 1 << 1;
        /// Flush right
        const RIGHT = 1 << 2;
        /// Flush to the end of the reading direction
        const END = 1 << 3;
        /// Top of the window
        const TOP = 1 << 4;
        /// Centered vertically
        const CENTER_VERTICAL = 1 << 5;
        /// Bottom of the window
        const BOTTOM = 1 << 6;
        /// Centered on both axes
        const CENTER = Self::CENTER_HORIZONTAL.bits() | Self::CENTER_VERTICAL.bits();
    }
}

/// Style of a caption window; `None` fields are untouched
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CaptionSettings {
    /// Font family name
    pub font_family: Option<String>,
    /// Font size, resolved to [`FontSize::Pixels`] by [`CaptionSettings::resolve`]
    pub font_size: Option<FontSize>,
    /// Extra multiplier on the font size
    pub font_scale: Option<f32>,
    /// Glyph color
    pub font_color: Option<Color>,
    /// Color behind the glyphs
    pub background_color: Option<Color>,
    /// Color filling the whole window
    pub window_color: Option<Color>,
    /// Color of the glyph edge
    pub edge_color: Option<Color>,
    /// Glyph edge treatment
    pub edge_style: Option<EdgeStyle>,
    /// Edge thickness, resolved to [`Measure::Pixels`]
    pub edge_width: Option<Measure>,
    /// Top padding
    pub padding_top: Option<Measure>,
    /// Bottom padding
    pub padding_bottom: Option<Measure>,
    /// Left padding
    pub padding_left: Option<Measure>,
    /// Right padding
    pub padding_right: Option<Measure>,
    /// Text placement inside the window
    pub gravity: Option<Gravity>,
    /// Relative window placement
    pub window_rect: Option<WindowRect>,
}

impl CaptionSettings {
    /// Overlay `overlay` onto `self`, copying only touched fields
    #[must_use]
    pub fn merge_touched(&self, overlay: &Self) -> Self {
        Self {
            font_family: overlay
                .font_family
                .clone()
                .or_else(|| self.font_family.clone()),
            font_size: overlay.font_size.or(self.font_size),
            font_scale: overlay.font_scale.or(self.font_scale),
            font_color: overlay.font_color.or(self.font_color),
            background_color: overlay.background_color.or(self.background_color),
            window_color: overlay.window_color.or(self.window_color),
            edge_color: overlay.edge_color.or(self.edge_color),
            edge_style: overlay.edge_style.or(self.edge_style),
            edge_width: overlay.edge_width.or(self.edge_width),
            padding_top: overlay.padding_top.or(self.padding_top),
            padding_bottom: overlay.padding_bottom.or(self.padding_bottom),
            padding_left: overlay.padding_left.or(self.padding_left),
            padding_right: overlay.padding_right.or(self.padding_right),
            gravity: overlay.gravity.or(self.gravity),
            window_rect: overlay.window_rect.or(self.window_rect),
        }
    }

    /// Merge and resolve area-dependent values for rendering
    ///
    /// The font size becomes [`FontSize::Pixels`] for `area`; a viewer size
    /// given in DIP is rescaled to the area's cell metric. Edge width and
    /// paddings become [`Measure::Pixels`], font-relative ones measured
    /// against the resolved font size or one cell font when unset. This
    /// must run again whenever the area changes.
    #[must_use]
    pub fn resolve(&self, overlay: &Self, area: &RenderingArea) -> Self {
        let mut resolved = self.merge_touched(overlay);
        let font_px = resolved
            .font_size
            .map_or_else(|| cell_font_size(area), |size| size.to_pixels(area));
        if resolved.font_size.is_some() {
            resolved.font_size = Some(FontSize::Pixels(font_px));
        }

        let absolute = |measure: Option<Measure>| {
            measure.map(|measure| Measure::Pixels(measure.to_pixels(font_px, area)))
        };
        resolved.edge_width = absolute(resolved.edge_width);
        resolved.padding_top = absolute(resolved.padding_top);
        resolved.padding_bottom = absolute(resolved.padding_bottom);
        resolved.padding_left = absolute(resolved.padding_left);
        resolved.padding_right = absolute(resolved.padding_right);
        resolved
    }

    /// Resolved font size in pixels including `font_scale`
    #[must_use]
    pub fn font_size_pixels(&self, area: &RenderingArea) -> Option<f32> {
        self.font_size
            .map(|size| size.to_pixels(area) * self.font_scale.unwrap_or(1.0))
    }

    /// Set all four paddings in pixels
    #[must_use]
    pub fn with_padding(mut self, padding: f32) -> Self {
        let padding = Some(Measure::Pixels(padding));
        self.padding_top = padding;
        self.padding_bottom = padding;
        self.padding_left = padding;
        self.padding_right = padding;
        self
    }

    /// True when no field is touched
    #[must_use]
    pub fn is_untouched(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> CaptionSettings {
        CaptionSettings {
            font_family: Some("monospace".to_string()),
            font_size: Some(FontSize::Cells(1.0)),
            font_color: Some(Color::YELLOW),
            window_color: Some(Color::BLACK.with_alpha(128)),
            edge_style: Some(EdgeStyle::Raised),
            gravity: Some(Gravity::LEFT | Gravity::TOP),
            window_rect: Some(WindowRect::new(10.0, 75.0, 80.0, 20.0)),
            ..CaptionSettings::default()
        }
        .with_padding(10.0)
    }

    #[test]
    fn untouched_overlay_is_identity() {
        let base = sample();
        assert_eq!(base.merge_touched(&CaptionSettings::default()), base);
    }

    #[test]
    fn overlay_wins_where_touched() {
        let overlay = CaptionSettings {
            font_color: Some(Color::WHITE),
            padding_left: Some(Measure::Pixels(2.0)),
            ..CaptionSettings::default()
        };
        let merged = sample().merge_touched(&overlay);
        assert_eq!(merged.font_color, Some(Color::WHITE));
        assert_eq!(merged.padding_left, Some(Measure::Pixels(2.0)));
        assert_eq!(merged.padding_right, Some(Measure::Pixels(10.0)));
        assert_eq!(merged.edge_style, Some(EdgeStyle::Raised));
        assert_eq!(merged.font_family.as_deref(), Some("monospace"));
    }

    #[test]
    fn resolve_rescales_user_font_size() {
        let area = RenderingArea::new(0, 0, 640, 300, 1.0).unwrap();
        let overlay = CaptionSettings {
            font_size: Some(FontSize::Dip(19.0)),
            ..CaptionSettings::default()
        };
        let resolved = sample().resolve(&overlay, &area);
        match resolved.font_size {
            Some(FontSize::Pixels(px)) => assert!((px - 17.0).abs() < 1e-4),
            other => panic!("unexpected font size {other:?}"),
        }

        let bigger = RenderingArea::new(0, 0, 640, 600, 1.0).unwrap();
        match sample().resolve(&overlay, &bigger).font_size {
            Some(FontSize::Pixels(px)) => assert!((px - 34.0).abs() < 1e-4),
            other => panic!("unexpected font size {other:?}"),
        }
    }

    #[test]
    fn resolve_converts_measures_for_each_area() {
        let settings = CaptionSettings {
            font_size: Some(FontSize::Rows(1.0)),
            edge_width: Some(Measure::FontSizes(0.1)),
            padding_top: Some(Measure::Vertical(Length::percent(10.0))),
            padding_left: Some(Measure::Horizontal(Length::cells(1.0))),
            ..CaptionSettings::default()
        };
        let untouched = CaptionSettings::default();

        let small = settings.resolve(&untouched, &RenderingArea::new(0, 0, 600, 300, 1.0).unwrap());
        assert_eq!(small.edge_width, Some(Measure::Pixels(2.0)));
        assert_eq!(small.padding_top, Some(Measure::Pixels(30.0)));
        assert_eq!(small.padding_left, Some(Measure::Pixels(40.0)));
        assert_eq!(small.padding_bottom, None);

        let large = settings.resolve(&untouched, &RenderingArea::new(0, 0, 1200, 600, 1.0).unwrap());
        assert_eq!(large.edge_width, Some(Measure::Pixels(4.0)));
        assert_eq!(large.padding_top, Some(Measure::Pixels(60.0)));
        assert_eq!(large.padding_left, Some(Measure::Pixels(80.0)));

        // resolved values are fixed points
        let again = large.resolve(&untouched, &RenderingArea::new(0, 0, 1200, 600, 1.0).unwrap());
        assert_eq!(again, large);
    }

    #[test]
    fn font_scale_applies() {
        let area = RenderingArea::new(0, 0, 640, 300, 1.0).unwrap();
        let settings = CaptionSettings {
            font_size: Some(FontSize::Pixels(10.0)),
            font_scale: Some(1.5),
            ..CaptionSettings::default()
        };
        assert_eq!(settings.font_size_pixels(&area), Some(15.0));
        assert!(CaptionSettings::default().is_untouched());
        assert!(!settings.is_untouched());
    }

    #[test]
    fn center_gravity_combines_axes() {
        assert!(Gravity::CENTER.contains(Gravity::CENTER_HORIZONTAL));
        assert!(Gravity::CENTER.contains(Gravity::CENTER_VERTICAL));
    }
}

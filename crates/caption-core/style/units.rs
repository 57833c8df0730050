//! Length units and font size conversion
//!
//! Caption formats describe sizes in several units: character cells,
//! percentages, device pixels and density-independent points chosen by the
//! viewer. Everything is converted to rendering-area pixels here.
//!
//! Sizes that depend on the area are kept symbolic ([`FontSize::Cells`],
//! [`FontSize::Rows`], [`FontSize::Dip`], [`Measure`]) until resolution so that a
//! rendering-area change only needs a re-resolve, not a re-extraction.

use crate::{
    geometry::{RenderingArea, DEFAULT_VERTICAL_CELL},
    utils::CaptionError,
    Result,
};

/// Fraction of a row height occupied by a cell font
pub const FONT_CELL_RATIO: f32 = 0.85;

/// Reference size user font sizes are expressed against
pub const DEFAULT_FONT_SIZE_DIP: f32 = 19.0;

/// Font size in pixels for one caption cell: `height / 15 * 0.85`
#[must_use]
pub fn cell_font_size(area: &RenderingArea) -> f32 {
    area.cell_height() * FONT_CELL_RATIO
}

/// Rescale a user font size to the current area's cell metric
///
/// `adjusted = size * cell_font_size(area) / 19`
#[must_use]
pub fn rescale_user_font_size(size_dip: f32, area: &RenderingArea) -> f32 {
    size_dip * cell_font_size(area) / DEFAULT_FONT_SIZE_DIP
}

/// Unit attached to a layout length
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LengthUnit {
    /// No unit given; conversion passes the anchor through
    #[default]
    Default,
    /// Percent of the anchor
    Percent,
    /// Device pixels, multiplied by the rendering scale
    Pixels,
    /// Caption cells (`c`), `anchor / 15` each
    Cell,
}

/// A `{value, unit}` pair
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Length {
    /// Magnitude
    pub value: f32,
    /// Unit
    pub unit: LengthUnit,
}

impl Length {
    /// Create a length
    #[must_use]
    pub const fn new(value: f32, unit: LengthUnit) -> Self {
        Self { value, unit }
    }

    /// Percentage length
    #[must_use]
    pub const fn percent(value: f32) -> Self {
        Self::new(value, LengthUnit::Percent)
    }

    /// Pixel length
    #[must_use]
    pub const fn pixels(value: f32) -> Self {
        Self::new(value, LengthUnit::Pixels)
    }

    /// Cell length
    #[must_use]
    pub const fn cells(value: f32) -> Self {
        Self::new(value, LengthUnit::Cell)
    }

    /// Reject values layout cannot use
    ///
    /// # Errors
    ///
    /// Returns [`CaptionError::InvalidLength`] for NaN or infinite values.
    pub fn checked(self) -> Result<Self> {
        if self.value.is_finite() {
            Ok(self)
        } else {
            Err(CaptionError::invalid_length(self.value, "not finite"))
        }
    }

    /// Like [`Length::checked`], also rejecting negative sizes
    ///
    /// # Errors
    ///
    /// Returns [`CaptionError::InvalidLength`] for non-finite or negative
    /// values.
    pub fn checked_size(self) -> Result<Self> {
        let length = self.checked()?;
        if length.value < 0.0 {
            return Err(CaptionError::invalid_length(length.value, "negative size"));
        }
        Ok(length)
    }

    /// Convert to pixels, see [`to_pixels`]
    #[must_use]
    pub fn to_pixels(self, anchor: f32, scale: f32) -> f32 {
        to_pixels(self.value, self.unit, anchor, scale)
    }
}

/// Convert a length to pixels against `anchor`
///
/// * percent: `anchor * value / 100`
/// * cell: `anchor / 15 * value`, whichever axis the anchor measures
/// * px: `value * scale`, no area-relative scaling
/// * default: `anchor` unchanged
#[must_use]
pub fn to_pixels(value: f32, unit: LengthUnit, anchor: f32, scale: f32) -> f32 {
    match unit {
        LengthUnit::Percent => anchor * value / 100.0,
        LengthUnit::Cell => anchor / DEFAULT_VERTICAL_CELL as f32 * value,
        LengthUnit::Pixels => value * scale,
        LengthUnit::Default => anchor,
    }
}

/// A font size, possibly relative to the rendering area
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FontSize {
    /// Absolute pixels
    Pixels(f32),
    /// Multiples of [`cell_font_size`]
    Cells(f32),
    /// Multiples of a row height (`area.height / 15`)
    Rows(f32),
    /// Viewer size in density-independent units, see [`rescale_user_font_size`]
    Dip(f32),
}

impl FontSize {
    /// Resolve against the current rendering area
    #[must_use]
    pub fn to_pixels(self, area: &RenderingArea) -> f32 {
        match self {
            Self::Pixels(px) => px,
            Self::Cells(n) => n * cell_font_size(area),
            Self::Rows(n) => n * area.cell_height(),
            Self::Dip(size) => rescale_user_font_size(size, area),
        }
    }
}

/// An edge or padding thickness, possibly relative to the area or font
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Measure {
    /// Absolute pixels
    Pixels(f32),
    /// A length converted against the area height
    Vertical(Length),
    /// A length converted against the area width
    Horizontal(Length),
    /// Multiples of the resolved font size
    FontSizes(f32),
}

impl Measure {
    /// Resolve against the current area and a font size in pixels
    #[must_use]
    pub fn to_pixels(self, font_size_px: f32, area: &RenderingArea) -> f32 {
        match self {
            Self::Pixels(px) => px,
            Self::Vertical(length) => length.to_pixels(area.height() as f32, area.scale()),
            Self::Horizontal(length) => length.to_pixels(area.width() as f32, area.scale()),
            Self::FontSizes(n) => n * font_size_px,
        }
    }
}

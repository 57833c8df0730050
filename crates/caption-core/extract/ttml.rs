//! TTML cue extraction
//!
//! The host's TTML parser resolves styling inheritance and timing; what
//! arrives here is one cue with its region layout, computed style and the
//! styled spans of its paragraph. Origin and extent are converted into a
//! relative window during extraction; font size, outline and padding stay
//! symbolic and are resolved against whatever area the session lays the
//! cue out in.

use super::{runs::RunBuilder, ExtractContext};
use crate::{
    geometry::{pixels_to_percent, RenderingArea},
    model::{Color, Removal, RenderingAttribute, RunStyle, TextDirection, TextStyle, WindowRect},
    style::{CaptionSettings, EdgeStyle, FontSize, Gravity, Length, LengthUnit, Measure},
    Result,
};
use log::warn;

/// `tts:textAlign`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextAlign {
    /// Left
    Left,
    /// Centered
    Center,
    /// Right
    Right,
    /// Start of the writing direction
    #[default]
    Start,
    /// End of the writing direction
    End,
}

/// `tts:displayAlign`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DisplayAlign {
    /// Top of the region
    #[default]
    Before,
    /// Centered
    Center,
    /// Bottom of the region
    After,
}

/// `tts:textOutline`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Outline {
    /// Outline color, `None` keeps the viewer default
    pub color: Option<Color>,
    /// Thickness
    pub thickness: Length,
}

/// A styled span of the cue paragraph
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TtmlSpan {
    /// Text content
    pub text: String,
    /// `tts:color`, falls back to the cue color
    pub color: Option<Color>,
    /// `tts:backgroundColor`, falls back to the cue background
    pub background_color: Option<Color>,
    /// Weight, style and decoration
    pub flags: TextStyle,
}

impl TtmlSpan {
    /// Unstyled span
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}

/// Region placement, `tts:origin` and `tts:extent` as `(x, y)` pairs
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TtmlLayout {
    /// Top-left corner; `None` is the area origin
    pub origin: Option<(Length, Length)>,
    /// Size; `None` is the whole area
    pub extent: Option<(Length, Length)>,
}

/// One timed TTML cue
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TtmlCue {
    /// Cue identity
    pub id: u32,
    /// Begin
    pub start_time: i64,
    /// End
    pub end_time: i64,
    /// When positive, active cues ending at or before this time are cleared
    pub clear_time: i64,
    /// Region placement
    pub layout: TtmlLayout,
    /// `tts:fontFamily`
    pub font_family: Option<String>,
    /// `tts:fontSize`
    pub font_size: Option<Length>,
    /// Default span color
    pub color: Option<Color>,
    /// Default span background
    pub background_color: Option<Color>,
    /// Region `tts:backgroundColor`
    pub region_background: Option<Color>,
    /// `tts:textOutline`
    pub outline: Option<Outline>,
    /// `tts:padding` values in top, bottom, left, right order
    pub padding: Vec<Length>,
    /// `tts:textAlign`
    pub text_align: TextAlign,
    /// `tts:displayAlign`
    pub display_align: DisplayAlign,
    /// `tts:direction` / `tts:writingMode`
    pub direction: Option<TextDirection>,
    /// `tts:wrapOption`
    pub wrap: Option<bool>,
    /// Paragraph content
    pub spans: Vec<TtmlSpan>,
}

/// Font size for a TTML length
///
/// Percent and cell sizes are relative to one row (`height / 15`), an
/// unspecified unit means one row, pixels are scaled by the device scale.
#[must_use]
pub fn font_size(length: Length, scale: f32) -> FontSize {
    match length.unit {
        LengthUnit::Percent => FontSize::Rows(length.value / 100.0),
        LengthUnit::Cell => FontSize::Rows(length.value),
        LengthUnit::Default => FontSize::Rows(1.0),
        LengthUnit::Pixels => FontSize::Pixels(length.value * scale),
    }
}

/// Outline thickness
///
/// Percentages are of the area height, cells are multiples of the font
/// size, pixels and unit-less values are taken as they are.
#[must_use]
pub fn outline_width(thickness: Length) -> Measure {
    match thickness.unit {
        LengthUnit::Percent => Measure::Vertical(thickness),
        LengthUnit::Cell => Measure::FontSizes(thickness.value),
        LengthUnit::Pixels | LengthUnit::Default => Measure::Pixels(thickness.value),
    }
}

fn gravity(text_align: TextAlign, display_align: DisplayAlign) -> Gravity {
    let horizontal = match text_align {
        TextAlign::Left | TextAlign::Start => Gravity::LEFT,
        TextAlign::Center => Gravity::CENTER_HORIZONTAL,
        TextAlign::Right => Gravity::RIGHT,
        TextAlign::End => Gravity::END,
    };
    let vertical = match display_align {
        DisplayAlign::Before => Gravity::TOP,
        DisplayAlign::Center => Gravity::CENTER_VERTICAL,
        DisplayAlign::After => Gravity::BOTTOM,
    };
    horizontal | vertical
}

/// Validate a length, logging and dropping it when unusable
fn usable(field: &str, checked: Result<Length>) -> Option<Length> {
    match checked {
        Ok(length) => Some(length),
        Err(err) => {
            warn!("TTML: ignoring {field}: {err}");
            None
        }
    }
}

fn axis_percent(length: Length, extent: i32, scale: f32) -> f32 {
    pixels_to_percent(length.to_pixels(extent as f32, scale), extent)
}

fn window_rect(layout: &TtmlLayout, area: &RenderingArea) -> WindowRect {
    let scale = area.scale();
    let (x, y) = layout
        .origin
        .and_then(|(x, y)| {
            let x = usable("origin x", x.checked())?;
            let y = usable("origin y", y.checked())?;
            Some((
                axis_percent(x, area.width(), scale),
                axis_percent(y, area.height(), scale),
            ))
        })
        .unwrap_or((0.0, 0.0));

    let (width, height) = layout
        .extent
        .and_then(|(width, height)| {
            let width = usable("extent width", width.checked_size())?;
            let height = usable("extent height", height.checked_size())?;
            Some((
                axis_percent(width, area.width(), scale),
                axis_percent(height, area.height(), scale),
            ))
        })
        .unwrap_or((100.0, 100.0));

    WindowRect::new(x, y, width, height)
}

/// Padding along one axis; a unit-less value counts as device pixels
fn padding(length: Length, axis: fn(Length) -> Measure) -> Measure {
    match length.unit {
        LengthUnit::Default => axis(Length::pixels(length.value)),
        _ => axis(length),
    }
}

fn settings(cue: &TtmlCue, area: &RenderingArea) -> CaptionSettings {
    let scale = area.scale();
    let size = cue
        .font_size
        .and_then(|length| usable("font size", length.checked_size()))
        .map_or(FontSize::Rows(1.0), |length| font_size(length, scale));

    let mut settings = CaptionSettings {
        font_family: cue.font_family.clone(),
        font_size: Some(size),
        window_color: cue.region_background,
        gravity: Some(gravity(cue.text_align, cue.display_align)),
        window_rect: Some(window_rect(&cue.layout, area)),
        ..CaptionSettings::default()
    };

    if let Some(outline) = cue.outline {
        if let Some(thickness) = usable("outline", outline.thickness.checked_size()) {
            settings.edge_style = Some(EdgeStyle::Uniform);
            settings.edge_color = outline.color;
            settings.edge_width = Some(outline_width(thickness));
        }
    }

    let slots: [(&mut Option<Measure>, fn(Length) -> Measure); 4] = [
        (&mut settings.padding_top, Measure::Vertical),
        (&mut settings.padding_bottom, Measure::Vertical),
        (&mut settings.padding_left, Measure::Horizontal),
        (&mut settings.padding_right, Measure::Horizontal),
    ];
    for ((slot, axis), length) in slots.into_iter().zip(&cue.padding) {
        *slot = usable("padding", length.checked_size()).map(|length| padding(length, axis));
    }

    settings
}

/// Convert one cue into an attribute
#[must_use]
pub fn extract(cue: &TtmlCue, ctx: &ExtractContext<'_>) -> RenderingAttribute {
    let mut builder = RunBuilder::new();
    for span in cue.spans.iter().filter(|span| !span.text.is_empty()) {
        let style = RunStyle {
            font_color: ctx
                .color_map
                .map(span.color.or(cue.color).unwrap_or(Color::WHITE)),
            background_color: span
                .background_color
                .or(cue.background_color)
                .unwrap_or(Color::TRANSPARENT),
            flags: span.flags,
            ..RunStyle::default()
        };
        for ch in span.text.chars() {
            builder.push(ch, style);
        }
    }

    let removal = if cue.clear_time > 0 {
        Removal::ByTime(cue.clear_time)
    } else {
        Removal::None
    };

    let mut attribute = RenderingAttribute::new(cue.id, cue.start_time, cue.end_time)
        .with_removal(removal)
        .with_settings(settings(cue, &ctx.area))
        .with_runs(builder.finish());
    if let Some(direction) = cue.direction {
        attribute.direction = direction;
    }
    if let Some(wrap) = cue.wrap {
        attribute.wrap = wrap;
    }
    attribute
}

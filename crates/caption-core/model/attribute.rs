//! The caption unit produced by extractors and owned by the session

use super::text::{Bitmap, TextRun};
use crate::{geometry::Rect, style::CaptionSettings};

/// Timestamp used for captions that never expire on their own
pub const TIME_INFINITE: i64 = i64::MAX;

/// Relative window placement, in percent of the rendering area
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WindowRect {
    /// Left edge, percent of area width
    pub x: f32,
    /// Top edge, percent of area height
    pub y: f32,
    /// Width, percent of area width
    pub width: f32,
    /// Height, percent of area height
    pub height: f32,
    /// Placement fixed by the caller
    pub user_defined: bool,
    /// Collision resolution may still move a user-defined rect
    pub auto_adjustment: bool,
}

impl WindowRect {
    /// Extractor-produced rect, free to be moved by collision resolution
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            user_defined: false,
            auto_adjustment: false,
        }
    }

    /// Caller-fixed rect; `auto_adjustment` decides whether it may move
    #[must_use]
    pub const fn user_defined(x: f32, y: f32, width: f32, height: f32, auto_adjustment: bool) -> Self {
        Self {
            x,
            y,
            width,
            height,
            user_defined: true,
            auto_adjustment,
        }
    }

    /// Excluded from collision resolution
    #[must_use]
    pub const fn is_locked(&self) -> bool {
        self.user_defined && !self.auto_adjustment
    }

    /// Treat `x`/`y` as the position of `anchor` and move the rect so that
    /// point lands there; the result never starts above or left of the area
    #[must_use]
    pub fn pinned_at(self, anchor: AnchorPoint) -> Self {
        let (horizontal, vertical) = anchor.fractions();
        Self {
            x: (self.x - self.width * horizontal).max(0.0),
            y: (self.y - self.height * vertical).max(0.0),
            ..self
        }
    }
}

/// Point of a window that sits on its anchor position
///
/// Numbered 0-8 row by row, starting top-left.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AnchorPoint {
    #[default]
    TopLeft,
    TopCenter,
    TopRight,
    MiddleLeft,
    Center,
    MiddleRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

impl AnchorPoint {
    /// Decode an anchor id; values past 8 fall back to top-left
    #[must_use]
    pub const fn from_index(index: u8) -> Self {
        match index {
            1 => Self::TopCenter,
            2 => Self::TopRight,
            3 => Self::MiddleLeft,
            4 => Self::Center,
            5 => Self::MiddleRight,
            6 => Self::BottomLeft,
            7 => Self::BottomCenter,
            8 => Self::BottomRight,
            _ => Self::TopLeft,
        }
    }

    /// Horizontal and vertical position of the point as a fraction of the
    /// window size
    #[must_use]
    pub const fn fractions(self) -> (f32, f32) {
        match self {
            Self::TopLeft => (0.0, 0.0),
            Self::TopCenter => (0.5, 0.0),
            Self::TopRight => (1.0, 0.0),
            Self::MiddleLeft => (0.0, 0.5),
            Self::Center => (0.5, 0.5),
            Self::MiddleRight => (1.0, 0.5),
            Self::BottomLeft => (0.0, 1.0),
            Self::BottomCenter => (0.5, 1.0),
            Self::BottomRight => (1.0, 1.0),
        }
    }
}

/// Reading direction of the text inside a window
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextDirection {
    /// Latin default
    #[default]
    LeftToRight,
    /// Arabic, Hebrew
    RightToLeft,
    /// Vertical, columns advance right to left
    TopToBottom,
    /// Vertical, bottom up
    BottomToTop,
}

/// What an attribute removes from the active set before it is added
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Removal {
    /// Removes nothing
    #[default]
    None,
    /// Removes active attributes whose id equals the given one
    ById(u32),
    /// Removes active attributes with `end_time <= t`; ignored when `t <= 0`
    ByTime(i64),
}

impl Removal {
    /// True when applying this removal can remove anything
    #[must_use]
    pub const fn is_active(&self) -> bool {
        match self {
            Self::None => false,
            Self::ById(_) => true,
            Self::ByTime(time) => *time > 0,
        }
    }

    /// Removal predicate applied to each active attribute
    #[must_use]
    pub const fn matches(&self, active: &RenderingAttribute) -> bool {
        match self {
            Self::None => false,
            Self::ById(id) => active.id == *id,
            Self::ByTime(time) => *time > 0 && active.end_time <= *time,
        }
    }
}

/// Displayable content of an attribute: text or an image, never both
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Styled runs
    Text(Vec<TextRun>),
    /// Pre-rendered image
    Image(Bitmap),
}

impl Payload {
    /// Runs of a text payload
    #[must_use]
    pub fn runs(&self) -> Option<&[TextRun]> {
        match self {
            Self::Text(runs) => Some(runs),
            Self::Image(_) => None,
        }
    }

    /// Concatenated text of a text payload
    #[must_use]
    pub fn plain_text(&self) -> Option<String> {
        self.runs()
            .map(|runs| runs.iter().map(|run| run.text.as_str()).collect())
    }
}

/// One caption unit
///
/// Extractors fill in everything except `settings` and `absolute_rect`,
/// which the session derives from `cue_settings`, the user overlay and the
/// current rendering area.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct RenderingAttribute {
    /// Identity; for CEA-708 the window index
    pub id: u32,
    /// Stream time the caption appears
    pub start_time: i64,
    /// Stream time the caption ends; `0` marks a removal-only attribute
    pub end_time: i64,
    /// Removal applied before this attribute is added
    pub removal: Removal,
    /// Horizontal extent cap, percent of the area width (0-100)
    pub window_size: u8,
    /// Style as produced by the extractor
    pub cue_settings: CaptionSettings,
    /// Style after merging the user overlay and resolving units
    pub settings: CaptionSettings,
    /// Final placement in rendering-area pixels
    pub absolute_rect: Rect,
    /// Stacking order, higher draws on top
    pub z_order: i32,
    /// Whether the host should draw it
    pub visible: bool,
    /// Text direction
    pub direction: TextDirection,
    /// Whether the renderer may wrap lines
    pub wrap: bool,
    /// Runs or image
    pub payload: Option<Payload>,
}

impl RenderingAttribute {
    /// Create a visible attribute with no payload and no removal
    #[must_use]
    pub fn new(id: u32, start_time: i64, end_time: i64) -> Self {
        Self {
            id,
            start_time,
            end_time,
            removal: Removal::None,
            window_size: 100,
            cue_settings: CaptionSettings::default(),
            settings: CaptionSettings::default(),
            absolute_rect: Rect::default(),
            z_order: 0,
            visible: true,
            direction: TextDirection::default(),
            wrap: true,
            payload: None,
        }
    }

    /// Attribute that only removes content
    #[must_use]
    pub fn removal_only(id: u32, start_time: i64, removal: Removal) -> Self {
        Self::new(id, start_time, 0).with_removal(removal)
    }

    /// Set the removal rule
    #[must_use]
    pub fn with_removal(mut self, removal: Removal) -> Self {
        self.removal = removal;
        self
    }

    /// Set the extractor-produced settings
    #[must_use]
    pub fn with_settings(mut self, settings: CaptionSettings) -> Self {
        self.cue_settings = settings;
        self
    }

    /// Set text runs as payload
    #[must_use]
    pub fn with_runs(mut self, runs: Vec<TextRun>) -> Self {
        self.payload = Some(Payload::Text(runs));
        self
    }

    /// Set an image as payload
    #[must_use]
    pub fn with_image(mut self, image: Bitmap) -> Self {
        self.payload = Some(Payload::Image(image));
        self
    }

    /// True when the attribute adds content to the active set
    #[must_use]
    pub const fn carries_payload(&self) -> bool {
        self.end_time > 0 && self.payload.is_some()
    }

    /// Rect from the extractor, if it produced one
    #[must_use]
    pub fn window_rect(&self) -> Option<WindowRect> {
        self.settings.window_rect.or(self.cue_settings.window_rect)
    }

    /// User-defined and not adjustable: never touched by collision resolution
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.window_rect().is_some_and(|rect| rect.is_locked())
    }
}

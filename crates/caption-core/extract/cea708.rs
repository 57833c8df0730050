//! CEA-708 window extraction
//!
//! A DTVCC service owns up to eight windows. The host's 708 decoder keeps
//! each window's definition, pen state and text; this module converts the
//! visible, updated windows of one service snapshot into attributes keyed by
//! window index, and emits remove-by-id attributes for windows that were
//! shown on the previous call but are hidden or gone now.

use super::{runs::RunBuilder, ExtractContext};
use crate::{
    model::{
        AnchorPoint, Color, Removal, RenderingAttribute, RunStyle, TextDirection, TextStyle,
        WindowRect, TIME_INFINITE,
    },
    style::{CaptionSettings, EdgeStyle, FontSize, Gravity},
};
use log::{debug, trace, warn};
use smallvec::SmallVec;

/// Windows per service
pub const MAX_WINDOWS: usize = 8;

/// Lowest window priority; z-order is `LOWEST_PRIORITY - priority`
pub const LOWEST_PRIORITY: u8 = 7;

/// Horizontal anchor positions on a 16:9 screen
pub const ANCHOR_COLUMNS_WIDESCREEN: u16 = 210;

/// Horizontal anchor positions on a 4:3 screen
pub const ANCHOR_COLUMNS_STANDARD: u16 = 160;

/// Vertical anchor positions
pub const ANCHOR_ROWS: u16 = 75;

const MAX_COLUMNS_WIDESCREEN: u8 = 42;
const MAX_COLUMNS_STANDARD: u8 = 32;
const MAX_ROWS: u8 = 15;

/// Placement of text inside a window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Justify {
    /// Flush left
    #[default]
    Left,
    /// Flush right
    Right,
    /// Centered
    Center,
    /// Both edges; laid out flush left
    Full,
}

/// Order characters are written in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PrintDirection {
    /// Left to right
    #[default]
    LeftToRight,
    /// Right to left
    RightToLeft,
    /// Top to bottom
    TopToBottom,
    /// Bottom to top
    BottomToTop,
}

impl From<PrintDirection> for TextDirection {
    fn from(direction: PrintDirection) -> Self {
        match direction {
            PrintDirection::LeftToRight => Self::LeftToRight,
            PrintDirection::RightToLeft => Self::RightToLeft,
            PrintDirection::TopToBottom => Self::TopToBottom,
            PrintDirection::BottomToTop => Self::BottomToTop,
        }
    }
}

/// Pen size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PenSize {
    /// 0.7 of standard
    Small,
    /// Standard
    #[default]
    Standard,
    /// 1.2 of standard
    Large,
    /// 1.5 of standard
    ExtraLarge,
}

impl PenSize {
    /// Multiplier on the window font size
    #[must_use]
    pub const fn relative_size(self) -> f32 {
        match self {
            Self::Small => 0.7,
            Self::Standard => 1.0,
            Self::Large => 1.2,
            Self::ExtraLarge => 1.5,
        }
    }
}

/// Vertical pen offset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PenOffset {
    /// Lowered
    Subscript,
    /// On the baseline
    #[default]
    Normal,
    /// Raised
    Superscript,
}

/// Glyph edge type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EdgeType {
    /// No edge
    #[default]
    None,
    /// Embossed
    Raised,
    /// Engraved
    Depressed,
    /// Outline
    Uniform,
    /// Shadow to the lower left
    LeftDropShadow,
    /// Shadow to the lower right
    RightDropShadow,
}

impl EdgeType {
    fn edge_style(self) -> Option<EdgeStyle> {
        match self {
            Self::None => None,
            Self::Raised => Some(EdgeStyle::Raised),
            Self::Depressed => Some(EdgeStyle::Depressed),
            Self::Uniform => Some(EdgeStyle::Uniform),
            Self::LeftDropShadow | Self::RightDropShadow => Some(EdgeStyle::DropShadow),
        }
    }
}

/// Pen attributes and colors in effect for a character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pen {
    /// Size
    pub size: PenSize,
    /// Baseline offset
    pub offset: PenOffset,
    /// Italic
    pub italic: bool,
    /// Underline
    pub underline: bool,
    /// Edge type
    pub edge_type: EdgeType,
    /// Foreground
    pub foreground: Color,
    /// Background behind the glyph
    pub background: Color,
    /// Edge color
    pub edge_color: Color,
}

impl Default for Pen {
    fn default() -> Self {
        Self {
            size: PenSize::Standard,
            offset: PenOffset::Normal,
            italic: false,
            underline: false,
            edge_type: EdgeType::None,
            foreground: Color::WHITE,
            background: Color::BLACK,
            edge_color: Color::BLACK,
        }
    }
}

/// A character with the pen it was written with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PenChar {
    /// Character
    pub ch: char,
    /// Pen
    pub pen: Pen,
}

/// One window of a service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cea708Window {
    /// Window index, 0-7
    pub id: u8,
    /// Shown on screen
    pub visible: bool,
    /// Content or attributes changed since the last extraction
    pub updated: bool,
    /// 0 is highest
    pub priority: u8,
    /// Anchor coordinates are percentages instead of grid positions
    pub relative_positioning: bool,
    /// Vertical anchor
    pub anchor_vertical: u16,
    /// Horizontal anchor
    pub anchor_horizontal: u16,
    /// Which point of the window sits on the anchor
    pub anchor_point: AnchorPoint,
    /// Rows
    pub row_count: u8,
    /// Columns
    pub column_count: u8,
    /// Text justification
    pub justify: Justify,
    /// Print direction
    pub print_direction: PrintDirection,
    /// Word wrap
    pub word_wrap: bool,
    /// Window fill
    pub fill_color: Color,
    /// Text rows
    pub rows: Vec<Vec<PenChar>>,
}

impl Cea708Window {
    /// Visible, updated, empty window anchored top-left
    #[must_use]
    pub fn new(id: u8, row_count: u8, column_count: u8) -> Self {
        Self {
            id,
            visible: true,
            updated: true,
            priority: 0,
            relative_positioning: false,
            anchor_vertical: 0,
            anchor_horizontal: 0,
            anchor_point: AnchorPoint::TopLeft,
            row_count,
            column_count,
            justify: Justify::Left,
            print_direction: PrintDirection::LeftToRight,
            word_wrap: false,
            fill_color: Color::TRANSPARENT,
            rows: Vec::new(),
        }
    }

    /// Append `text` to `row` with `pen`
    pub fn write_text(&mut self, row: usize, text: &str, pen: Pen) {
        if self.rows.len() <= row {
            self.rows.resize_with(row + 1, Vec::new);
        }
        self.rows[row].extend(text.chars().map(|ch| PenChar { ch, pen }));
    }

    fn has_text(&self) -> bool {
        self.rows
            .iter()
            .flatten()
            .any(|pen_char| !pen_char.ch.is_whitespace())
    }
}

/// Snapshot of one caption service
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Cea708Service {
    /// Stream time of the snapshot
    pub timestamp: i64,
    /// Service number
    pub service_number: u8,
    /// Defined windows
    pub windows: SmallVec<[Cea708Window; MAX_WINDOWS]>,
}

impl Cea708Service {
    /// Service without windows
    #[must_use]
    pub fn new(timestamp: i64, service_number: u8) -> Self {
        Self {
            timestamp,
            service_number,
            windows: SmallVec::new(),
        }
    }

    fn window(&self, id: u8) -> Option<&Cea708Window> {
        self.windows.iter().find(|window| window.id == id)
    }
}

/// Which windows were visible after the previous extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Cea708State {
    visible: u8,
}

impl Cea708State {
    /// True when window `id` was visible
    #[must_use]
    pub const fn is_visible(self, id: u8) -> bool {
        id < MAX_WINDOWS as u8 && self.visible & (1 << id) != 0
    }

    const fn with_visible(self, id: u8, visible: bool) -> Self {
        if visible {
            Self {
                visible: self.visible | (1 << id),
            }
        } else {
            Self {
                visible: self.visible & !(1 << id),
            }
        }
    }
}

/// Attributes produced by one extraction and the visibility for the next
#[derive(Debug, Clone, PartialEq)]
pub struct Cea708Output {
    /// Window attributes and removals
    pub attributes: Vec<RenderingAttribute>,
    /// Visibility memory for the next call
    pub state: Cea708State,
}

fn run_style(pen: &Pen, ctx: &ExtractContext<'_>) -> RunStyle {
    let mut flags = TextStyle::empty();
    flags.set(TextStyle::ITALIC, pen.italic);
    flags.set(TextStyle::UNDERLINE, pen.underline);
    match pen.offset {
        PenOffset::Subscript => flags.insert(TextStyle::SUBSCRIPT),
        PenOffset::Superscript => flags.insert(TextStyle::SUPERSCRIPT),
        PenOffset::Normal => {}
    }

    let edge_style = pen.edge_type.edge_style();
    RunStyle {
        font_color: ctx.color_map.map(pen.foreground),
        background_color: pen.background,
        flags,
        edge_style,
        edge_color: edge_style.map(|_| pen.edge_color),
        relative_size: pen.size.relative_size(),
    }
}

fn justify_gravity(justify: Justify) -> Gravity {
    let horizontal = match justify {
        Justify::Left | Justify::Full => Gravity::LEFT,
        Justify::Right => Gravity::RIGHT,
        Justify::Center => Gravity::CENTER_HORIZONTAL,
    };
    horizontal | Gravity::TOP
}

/// Relative rect of a window, pinned at its anchor point
fn window_rect(window: &Cea708Window, ctx: &ExtractContext<'_>) -> WindowRect {
    let widescreen = ctx.area.is_widescreen();

    let (x, y) = if window.relative_positioning {
        (
            f32::from(window.anchor_horizontal.min(99)),
            f32::from(window.anchor_vertical.min(99)),
        )
    } else {
        let columns = if widescreen {
            ANCHOR_COLUMNS_WIDESCREEN
        } else {
            ANCHOR_COLUMNS_STANDARD
        };
        (
            f32::from(window.anchor_horizontal.min(columns)) * 100.0 / f32::from(columns),
            f32::from(window.anchor_vertical.min(ANCHOR_ROWS)) * 100.0 / f32::from(ANCHOR_ROWS),
        )
    };

    let max_columns = if widescreen {
        MAX_COLUMNS_WIDESCREEN
    } else {
        MAX_COLUMNS_STANDARD
    };
    let width = f32::from(window.column_count.min(max_columns)) * 100.0 / f32::from(max_columns);
    let height = f32::from(window.row_count.min(MAX_ROWS)) * 100.0 / f32::from(MAX_ROWS);

    WindowRect::new(x, y, width, height).pinned_at(window.anchor_point)
}

fn build_attribute(window: &Cea708Window, timestamp: i64, ctx: &ExtractContext<'_>) -> RenderingAttribute {
    let mut builder = RunBuilder::new();
    for row in &window.rows {
        builder.new_line();
        for pen_char in row {
            builder.push(pen_char.ch, run_style(&pen_char.pen, ctx));
        }
    }

    let settings = CaptionSettings {
        font_size: Some(FontSize::Cells(1.0)),
        window_color: Some(window.fill_color),
        gravity: Some(justify_gravity(window.justify)),
        window_rect: Some(window_rect(window, ctx)),
        ..CaptionSettings::default()
    };

    let mut attribute = RenderingAttribute::new(u32::from(window.id), timestamp, TIME_INFINITE)
        .with_removal(Removal::ById(u32::from(window.id)))
        .with_settings(settings)
        .with_runs(builder.finish());
    attribute.z_order = i32::from(LOWEST_PRIORITY.saturating_sub(window.priority.min(LOWEST_PRIORITY)));
    attribute.direction = window.print_direction.into();
    attribute.wrap = window.word_wrap;
    attribute
}

/// Extract the windows of `service`
///
/// Visible windows flagged as updated produce an attribute that replaces
/// whatever that window showed before. A window that was visible according
/// to `state` and is now hidden, deleted or emptied produces a removal-only
/// attribute with the same id.
#[must_use]
pub fn extract(service: &Cea708Service, state: Cea708State, ctx: &ExtractContext<'_>) -> Cea708Output {
    let mut attributes = Vec::new();
    let mut next = state;

    for window in &service.windows {
        if usize::from(window.id) >= MAX_WINDOWS {
            warn!(
                "CEA-708 service {}: ignoring window index {}",
                service.service_number, window.id
            );
        }
    }

    for id in 0..MAX_WINDOWS as u8 {
        let shown = service
            .window(id)
            .filter(|window| window.visible && window.has_text());

        match shown {
            Some(window) => {
                if window.updated || !state.is_visible(id) {
                    trace!("CEA-708 service {}: window {id} updated", service.service_number);
                    attributes.push(build_attribute(window, service.timestamp, ctx));
                }
                next = next.with_visible(id, true);
            }
            None if state.is_visible(id) => {
                debug!("CEA-708 service {}: window {id} hidden", service.service_number);
                attributes.push(RenderingAttribute::removal_only(
                    u32::from(id),
                    service.timestamp,
                    Removal::ById(u32::from(id)),
                ));
                next = next.with_visible(id, false);
            }
            None => {}
        }
    }

    Cea708Output {
        attributes,
        state: next,
    }
}

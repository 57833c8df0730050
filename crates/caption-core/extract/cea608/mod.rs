//! CEA-608 character grid extraction
//!
//! A 608 decoder upstream maintains a 15x32 grid of cells. Captions fill it
//! incrementally, so extraction starts at a [`RowCursor`] the caller keeps
//! between calls. Contiguous non-blank rows form one block; a blank row
//! after content terminates the block, and scanning continues until the
//! grid yields no further block.
//!
//! # Example
//!
//! ```rust
//! use caption_core::extract::cea608::{extract, CellAttributes, Cea608Frame, RowCursor};
//! use caption_core::extract::{ExtractContext, FontColorMap};
//! use caption_core::geometry::RenderingArea;
//!
//! let mut frame = Cea608Frame::new(0);
//! frame.grid.write_text(5, 4, "HELLO", CellAttributes::default());
//!
//! let colors = FontColorMap::new();
//! let ctx = ExtractContext::new(RenderingArea::default(), &colors);
//! let output = extract(&frame, RowCursor::default(), &ctx);
//! assert_eq!(output.attributes.len(), 1);
//! ```

pub mod charset;

use super::{runs::RunBuilder, ExtractContext};
use crate::{
    geometry::{pixels_to_percent, DEFAULT_HORIZONTAL_CELL, DEFAULT_VERTICAL_CELL},
    model::{Color, Removal, RenderingAttribute, RunStyle, TextStyle, WindowRect, TIME_INFINITE},
    style::{CaptionSettings, FontSize, Gravity},
};
use charset::Charset;
use log::{trace, warn};

/// Rows in the caption grid
pub const GRID_ROWS: usize = DEFAULT_VERTICAL_CELL as usize;

/// Columns in the caption grid
pub const GRID_COLUMNS: usize = DEFAULT_HORIZONTAL_CELL as usize;

const FOREGROUND_SHIFT: u16 = 5;
const BACKGROUND_SHIFT: u16 = 9;
const CHARSET_SHIFT: u16 = 13;
const NIBBLE: u16 = 0x0F;

bitflags::bitflags! {
    /// Flag bits of the packed cell attribute word
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CellFlags: u16 {
        /// Underlined
        const UNDERLINE = 1 << 0;
        /// Large font, rendered bold
        const LARGE = 1 << 1;
        /// Italic
        const ITALIC = 1 << 2;
        /// Flashing
        const FLASH = 1 << 3;
        /// Paint the background color
        const DRAW_BACKGROUND = 1 << 4;
    }
}

/// Packed cell attributes
///
/// Layout, least significant bit first: five flag bits ([`CellFlags`]),
/// 4-bit foreground index, 4-bit background index, 3-bit charset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CellAttributes(u16);

impl CellAttributes {
    /// Wrap a packed attribute word
    #[must_use]
    pub const fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    /// Pack attributes
    #[must_use]
    pub const fn new(flags: CellFlags, foreground: u8, background: u8, charset: Charset) -> Self {
        Self(
            flags.bits()
                | ((foreground as u16 & NIBBLE) << FOREGROUND_SHIFT)
                | ((background as u16 & NIBBLE) << BACKGROUND_SHIFT)
                | ((charset.bits() as u16 & 0x07) << CHARSET_SHIFT),
        )
    }

    /// Raw attribute word
    #[must_use]
    pub const fn bits(self) -> u16 {
        self.0
    }

    /// Flag bits
    #[must_use]
    pub const fn flags(self) -> CellFlags {
        CellFlags::from_bits_truncate(self.0)
    }

    /// Foreground palette index
    #[must_use]
    pub const fn foreground(self) -> u8 {
        ((self.0 >> FOREGROUND_SHIFT) & NIBBLE) as u8
    }

    /// Background palette index
    #[must_use]
    pub const fn background(self) -> u8 {
        ((self.0 >> BACKGROUND_SHIFT) & NIBBLE) as u8
    }

    /// Character set selector
    #[must_use]
    pub const fn charset(self) -> Charset {
        Charset::from_bits(((self.0 >> CHARSET_SHIFT) & 0x07) as u8)
    }
}

/// One grid cell; code `0` is an empty cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Cea608Cell {
    /// Packed attributes
    pub attributes: CellAttributes,
    /// Character code in the selected charset
    pub code: u8,
}

impl Cea608Cell {
    /// The empty cell
    pub const EMPTY: Self = Self {
        attributes: CellAttributes(0),
        code: 0,
    };

    /// True when nothing is displayed in this cell
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.code == 0
    }
}

/// The 15x32 caption memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cea608Grid {
    rows: [[Cea608Cell; GRID_COLUMNS]; GRID_ROWS],
}

impl Default for Cea608Grid {
    fn default() -> Self {
        Self::new()
    }
}

impl Cea608Grid {
    /// Empty grid
    #[must_use]
    pub const fn new() -> Self {
        Self {
            rows: [[Cea608Cell::EMPTY; GRID_COLUMNS]; GRID_ROWS],
        }
    }

    /// Cell at `row`, `column`; out-of-range positions read as empty
    #[must_use]
    pub fn cell(&self, row: usize, column: usize) -> Cea608Cell {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .copied()
            .unwrap_or(Cea608Cell::EMPTY)
    }

    /// Overwrite one cell; out-of-range positions are ignored
    pub fn set(&mut self, row: usize, column: usize, cell: Cea608Cell) {
        if let Some(slot) = self.rows.get_mut(row).and_then(|cells| cells.get_mut(column)) {
            *slot = cell;
        }
    }

    /// Write ASCII text starting at `column`, clipped at the row end
    pub fn write_text(&mut self, row: usize, column: usize, text: &str, attributes: CellAttributes) {
        for (offset, byte) in text.bytes().enumerate() {
            self.set(
                row,
                column + offset,
                Cea608Cell {
                    attributes,
                    code: byte,
                },
            );
        }
    }

    /// Empty every cell
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// True when the row has no populated cell
    #[must_use]
    pub fn row_is_blank(&self, row: usize) -> bool {
        self.populated_span(row).is_none()
    }

    /// True when no row has content
    #[must_use]
    pub fn is_blank(&self) -> bool {
        (0..GRID_ROWS).all(|row| self.row_is_blank(row))
    }

    /// First and last populated column of a row
    fn populated_span(&self, row: usize) -> Option<(usize, usize)> {
        let cells = self.rows.get(row)?;
        let first = cells.iter().position(|cell| !cell.is_empty())?;
        let last = cells.iter().rposition(|cell| !cell.is_empty())?;
        Some((first, last))
    }
}

/// A grid snapshot with its stream time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cea608Frame {
    /// Stream time of the snapshot
    pub timestamp: i64,
    /// Caption memory
    pub grid: Cea608Grid,
}

impl Cea608Frame {
    /// Blank frame at `timestamp`
    #[must_use]
    pub const fn new(timestamp: i64) -> Self {
        Self {
            timestamp,
            grid: Cea608Grid::new(),
        }
    }
}

/// Row where the next extraction starts scanning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RowCursor(usize);

impl RowCursor {
    /// Cursor at `row`, clamped to the grid
    #[must_use]
    pub fn at(row: usize) -> Self {
        Self(row.min(GRID_ROWS))
    }

    /// Current row
    #[must_use]
    pub const fn row(self) -> usize {
        self.0
    }
}

/// Attributes produced by one extraction and the cursor for the next
#[derive(Debug, Clone, PartialEq)]
pub struct Cea608Output {
    /// One attribute per block
    pub attributes: Vec<RenderingAttribute>,
    /// Where the next call starts
    pub cursor: RowCursor,
}

/// Rows `[first, end)` holding one block of captions
#[derive(Debug, Clone, Copy)]
struct Block {
    first: usize,
    end: usize,
    terminated: bool,
}

/// Standard 608 palette; index 8 is transparent
fn palette(index: u8) -> Option<Color> {
    Some(match index {
        0 => Color::WHITE,
        1 => Color::GREEN,
        2 => Color::BLUE,
        3 => Color::CYAN,
        4 => Color::RED,
        5 => Color::YELLOW,
        6 => Color::MAGENTA,
        7 => Color::BLACK,
        8 => Color::TRANSPARENT,
        _ => return None,
    })
}

fn run_style(attributes: CellAttributes, ctx: &ExtractContext<'_>) -> RunStyle {
    let flags = attributes.flags();

    let font_color = palette(attributes.foreground()).unwrap_or_else(|| {
        warn!(
            "CEA-608: unknown foreground index {}, using white",
            attributes.foreground()
        );
        Color::WHITE
    });

    let background_color = if flags.contains(CellFlags::DRAW_BACKGROUND) {
        palette(attributes.background()).unwrap_or_else(|| {
            warn!(
                "CEA-608: unknown background index {}, using black",
                attributes.background()
            );
            Color::BLACK
        })
    } else {
        Color::TRANSPARENT
    };

    let mut style = TextStyle::empty();
    style.set(TextStyle::UNDERLINE, flags.contains(CellFlags::UNDERLINE));
    style.set(TextStyle::BOLD, flags.contains(CellFlags::LARGE));
    style.set(TextStyle::ITALIC, flags.contains(CellFlags::ITALIC));

    RunStyle {
        font_color: ctx.color_map.map(font_color),
        background_color,
        flags: style,
        ..RunStyle::default()
    }
}

/// Find the next block at or after `from`, skipping leading blank rows
fn next_block(grid: &Cea608Grid, from: usize) -> Option<Block> {
    let first = (from..GRID_ROWS).find(|&row| !grid.row_is_blank(row))?;
    match (first..GRID_ROWS).find(|&row| grid.row_is_blank(row)) {
        Some(terminator) => Some(Block {
            first,
            end: terminator,
            terminated: true,
        }),
        None => Some(Block {
            first,
            end: GRID_ROWS,
            terminated: false,
        }),
    }
}

fn build_attribute(grid: &Cea608Grid, block: Block, timestamp: i64, ctx: &ExtractContext<'_>) -> RenderingAttribute {
    let mut anchor = GRID_COLUMNS;
    let mut right = 0;
    for row in block.first..block.end {
        if let Some((first, last)) = grid.populated_span(row) {
            if first < anchor {
                anchor = first;
            }
            right = right.max(last + 1);
        }
    }

    let mut builder = RunBuilder::new();
    for row in block.first..block.end {
        let Some((first, last)) = grid.populated_span(row) else {
            continue;
        };
        builder.new_line();

        let lead_style = run_style(grid.cell(row, first).attributes, ctx);
        for _ in anchor..first {
            builder.push(' ', lead_style);
        }

        let mut style = lead_style;
        for column in first..=last {
            let cell = grid.cell(row, column);
            if cell.is_empty() {
                // Gaps inherit the preceding style so they never split a run
                builder.push(' ', style);
                continue;
            }
            style = run_style(cell.attributes, ctx);
            builder.push(charset::decode(cell.attributes.charset(), cell.code), style);
        }
        trace!("CEA-608: row {row} columns {first}..={last}");
    }

    let rows = (block.end - block.first) as f32;
    let columns = (right - anchor) as f32;
    let window_rect = WindowRect::new(
        pixels_to_percent(anchor as f32, GRID_COLUMNS as i32),
        pixels_to_percent(block.first as f32, GRID_ROWS as i32),
        pixels_to_percent(columns, GRID_COLUMNS as i32),
        pixels_to_percent(rows, GRID_ROWS as i32),
    );

    let settings = CaptionSettings {
        font_family: Some("monospace".to_string()),
        font_size: Some(FontSize::Cells(1.0)),
        gravity: Some(Gravity::LEFT | Gravity::TOP),
        window_rect: Some(window_rect),
        ..CaptionSettings::default()
    };

    RenderingAttribute::new(block.first as u32, timestamp, TIME_INFINITE)
        .with_removal(Removal::ByTime(TIME_INFINITE))
        .with_settings(settings)
        .with_runs(builder.finish())
}

/// Extract every block from `cursor` onwards
///
/// Each block becomes one attribute that never expires by time and clears
/// everything shown before it. The returned cursor sits after the last
/// terminated block, or on the first row of an unterminated block at the
/// bottom of the grid so it is re-read as it fills. When nothing remains
/// below the cursor the scan restarts from the top once, and a blank grid
/// resets the cursor to the first row.
#[must_use]
pub fn extract(frame: &Cea608Frame, cursor: RowCursor, ctx: &ExtractContext<'_>) -> Cea608Output {
    let grid = &frame.grid;
    if grid.is_blank() {
        return Cea608Output {
            attributes: Vec::new(),
            cursor: RowCursor::default(),
        };
    }

    let mut start = cursor.row();
    if next_block(grid, start).is_none() {
        trace!("CEA-608: nothing below row {start}, rescanning from the top");
        start = 0;
    }

    let mut attributes = Vec::new();
    let mut next_cursor = start;
    let mut row = start;
    while let Some(block) = next_block(grid, row) {
        attributes.push(build_attribute(grid, block, frame.timestamp, ctx));
        if !block.terminated {
            next_cursor = block.first;
            break;
        }
        row = block.end + 1;
        next_cursor = row;
    }

    Cea608Output {
        attributes,
        cursor: RowCursor::at(next_cursor),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{extract::FontColorMap, geometry::RenderingArea, model::Payload};
    use pretty_assertions::assert_eq;

    fn white() -> CellAttributes {
        CellAttributes::default()
    }

    fn run_texts(attribute: &RenderingAttribute) -> Vec<String> {
        attribute
            .payload
            .as_ref()
            .and_then(Payload::runs)
            .map(|runs| runs.iter().map(|run| run.text.clone()).collect())
            .unwrap_or_default()
    }

    #[test]
    fn attribute_word_packing() {
        let attrs = CellAttributes::new(
            CellFlags::ITALIC | CellFlags::DRAW_BACKGROUND,
            5,
            7,
            Charset::Special,
        );
        assert_eq!(attrs.foreground(), 5);
        assert_eq!(attrs.background(), 7);
        assert_eq!(attrs.charset(), Charset::Special);
        assert!(attrs.flags().contains(CellFlags::ITALIC));
        assert!(!attrs.flags().contains(CellFlags::UNDERLINE));
        assert_eq!(CellAttributes::from_bits(attrs.bits()), attrs);
    }

    #[test]
    fn hello_row_yields_one_run() {
        let mut frame = Cea608Frame::new(100);
        frame.grid.write_text(5, 0, "HELLO", white());
        let colors = FontColorMap::new();
        let ctx = ExtractContext::new(RenderingArea::default(), &colors);

        let output = extract(&frame, RowCursor::default(), &ctx);
        assert_eq!(output.attributes.len(), 1);
        let attribute = &output.attributes[0];
        assert_eq!(attribute.removal, Removal::ByTime(TIME_INFINITE));
        assert_eq!(attribute.end_time, TIME_INFINITE);

        let runs = attribute.payload.as_ref().and_then(Payload::runs).unwrap();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].text, "HELLO");
        assert_eq!(runs[0].style.font_color, Color::WHITE);
    }

    #[test]
    fn style_changes_open_runs() {
        let mut frame = Cea608Frame::new(0);
        let italic = CellAttributes::new(CellFlags::ITALIC, 0, 0, Charset::Basic);
        let red = CellAttributes::new(CellFlags::empty(), 4, 0, Charset::Basic);
        frame.grid.write_text(1, 2, "ab", white());
        frame.grid.write_text(1, 4, "cd", italic);
        frame.grid.write_text(1, 6, "ef", red);
        frame.grid.write_text(1, 8, "gh", red);
        let colors = FontColorMap::new();
        let ctx = ExtractContext::new(RenderingArea::default(), &colors);

        let output = extract(&frame, RowCursor::default(), &ctx);
        assert_eq!(run_texts(&output.attributes[0]), ["ab", "cd", "efgh"]);
    }

    #[test]
    fn flash_bit_does_not_split() {
        let mut frame = Cea608Frame::new(0);
        let flashing = CellAttributes::new(CellFlags::FLASH, 0, 0, Charset::Basic);
        frame.grid.write_text(3, 0, "ab", white());
        frame.grid.write_text(3, 2, "cd", flashing);
        let colors = FontColorMap::new();
        let ctx = ExtractContext::new(RenderingArea::default(), &colors);
        let output = extract(&frame, RowCursor::default(), &ctx);
        assert_eq!(run_texts(&output.attributes[0]), ["abcd"]);
    }

    #[test]
    fn blank_rows_separate_blocks() {
        let mut frame = Cea608Frame::new(0);
        frame.grid.write_text(2, 4, "first", white());
        frame.grid.write_text(3, 2, "line", white());
        frame.grid.write_text(6, 0, "second", white());
        let colors = FontColorMap::new();
        let ctx = ExtractContext::new(RenderingArea::default(), &colors);

        let output = extract(&frame, RowCursor::default(), &ctx);
        assert_eq!(output.attributes.len(), 2);
        assert_eq!(run_texts(&output.attributes[0]), ["  first\nline"]);
        assert_eq!(run_texts(&output.attributes[1]), ["second"]);
        assert_eq!(output.cursor, RowCursor::at(8));
        assert_eq!(output.attributes[0].id, 2);
        assert_eq!(output.attributes[1].id, 6);
    }

    #[test]
    fn unterminated_block_keeps_cursor() {
        let mut frame = Cea608Frame::new(0);
        frame.grid.write_text(13, 0, "rolling", white());
        frame.grid.write_text(14, 0, "text", white());
        let colors = FontColorMap::new();
        let ctx = ExtractContext::new(RenderingArea::default(), &colors);

        let output = extract(&frame, RowCursor::default(), &ctx);
        assert_eq!(output.attributes.len(), 1);
        assert_eq!(output.cursor, RowCursor::at(13));
    }

    #[test]
    fn block_rect_uses_minimum_anchor() {
        let mut frame = Cea608Frame::new(0);
        frame.grid.write_text(0, 8, "abcd", white());
        frame.grid.write_text(1, 4, "ab", white());
        let colors = FontColorMap::new();
        let ctx = ExtractContext::new(RenderingArea::default(), &colors);

        let output = extract(&frame, RowCursor::default(), &ctx);
        let rect = output.attributes[0].cue_settings.window_rect.unwrap();
        assert!((rect.x - 12.5).abs() < 1e-4);
        assert!(rect.y.abs() < 1e-4);
        assert!((rect.width - 25.0).abs() < 1e-4);
        assert!((rect.height - 200.0 / 15.0).abs() < 1e-4);
    }

    #[test]
    fn repeated_extraction_is_stable() {
        let mut frame = Cea608Frame::new(0);
        frame.grid.write_text(4, 0, "same", white());
        frame
            .grid
            .write_text(4, 4, "text", CellAttributes::new(CellFlags::UNDERLINE, 0, 0, Charset::Basic));
        let colors = FontColorMap::new();
        let ctx = ExtractContext::new(RenderingArea::default(), &colors);

        let first = extract(&frame, RowCursor::default(), &ctx);
        let second = extract(&frame, first.cursor, &ctx);
        assert_eq!(first.attributes, second.attributes);
    }

    #[test]
    fn blank_grid_resets_cursor() {
        let frame = Cea608Frame::new(0);
        let colors = FontColorMap::new();
        let ctx = ExtractContext::new(RenderingArea::default(), &colors);
        let output = extract(&frame, RowCursor::at(9), &ctx);
        assert!(output.attributes.is_empty());
        assert_eq!(output.cursor, RowCursor::default());
    }

    #[test]
    fn background_needs_draw_bit() {
        let mut frame = Cea608Frame::new(0);
        frame
            .grid
            .write_text(0, 0, "a", CellAttributes::new(CellFlags::empty(), 0, 2, Charset::Basic));
        frame.grid.write_text(
            0,
            1,
            "b",
            CellAttributes::new(CellFlags::DRAW_BACKGROUND, 0, 2, Charset::Basic),
        );
        let colors = FontColorMap::new();
        let ctx = ExtractContext::new(RenderingArea::default(), &colors);
        let output = extract(&frame, RowCursor::default(), &ctx);
        let runs = output.attributes[0].payload.as_ref().and_then(Payload::runs).unwrap();
        assert_eq!(runs[0].style.background_color, Color::TRANSPARENT);
        assert_eq!(runs[1].style.background_color, Color::BLUE);
    }

    #[test]
    fn color_map_remaps_font_color() {
        let mut frame = Cea608Frame::new(0);
        frame.grid.write_text(0, 0, "x", white());
        let mut colors = FontColorMap::new();
        colors.insert(Color::WHITE, Color::YELLOW);
        let ctx = ExtractContext::new(RenderingArea::default(), &colors);
        let output = extract(&frame, RowCursor::default(), &ctx);
        let runs = output.attributes[0].payload.as_ref().and_then(Payload::runs).unwrap();
        assert_eq!(runs[0].style.font_color, Color::YELLOW);
    }
}

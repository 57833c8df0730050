//! Absolute placement of caption windows
//!
//! Converts the relative [`WindowRect`] of an attribute into rendering-area
//! pixels and resolves its style against the viewer overlay. Everything
//! here is recomputed from the attribute's own relative data, so calling it
//! again after an area change gives the same result as a fresh extraction.

use caption_core::{
    geometry::{percent_to_pixels, Rect, RenderingArea},
    model::{RenderingAttribute, WindowRect},
    style::CaptionSettings,
};

/// Window used when an attribute carries no rect of its own
pub const FULL_AREA: WindowRect = WindowRect::new(0.0, 0.0, 100.0, 100.0);

/// Pixel rect of `rect` inside `area`
///
/// The width is capped at `window_size` percent of the area width. The
/// result always covers at least one pixel.
#[must_use]
pub fn absolute_rect(rect: &WindowRect, window_size: u8, area: &RenderingArea) -> Rect {
    let width = rect.width.min(f32::from(window_size.min(100)));
    Rect::new(
        area.left() + percent_to_pixels(rect.x, area.width()),
        area.top() + percent_to_pixels(rect.y, area.height()),
        percent_to_pixels(width, area.width()),
        percent_to_pixels(rect.height, area.height()),
    )
    .at_least_one_pixel()
}

/// Merge the overlay, resolve units and place the attribute in `area`
///
/// `window_size` caps the attribute's own horizontal extent.
pub fn layout_attribute(
    attribute: &mut RenderingAttribute,
    overlay: &CaptionSettings,
    window_size: u8,
    area: &RenderingArea,
) {
    attribute.settings = attribute.cue_settings.resolve(overlay, area);
    let rect = attribute.settings.window_rect.unwrap_or(FULL_AREA);
    attribute.absolute_rect = absolute_rect(&rect, attribute.window_size.min(window_size), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use caption_core::style::FontSize;
    use pretty_assertions::assert_eq;

    fn area() -> RenderingArea {
        RenderingArea::new(10, 20, 400, 300, 1.0).unwrap()
    }

    #[test]
    fn percent_rect_to_pixels() {
        let rect = WindowRect::new(10.0, 75.0, 80.0, 20.0);
        assert_eq!(absolute_rect(&rect, 100, &area()), Rect::new(50, 245, 320, 60));
    }

    #[test]
    fn window_size_caps_width() {
        let rect = WindowRect::new(0.0, 0.0, 80.0, 10.0);
        assert_eq!(absolute_rect(&rect, 50, &area()).width, 200);
    }

    #[test]
    fn degenerate_rect_keeps_one_pixel() {
        let rect = WindowRect::new(50.0, 50.0, 0.0, 0.0);
        let placed = absolute_rect(&rect, 100, &area());
        assert_eq!((placed.width, placed.height), (1, 1));
    }

    #[test]
    fn layout_resolves_settings() {
        let mut attribute = RenderingAttribute::new(0, 0, 100).with_settings(CaptionSettings {
            font_size: Some(FontSize::Cells(1.0)),
            ..CaptionSettings::default()
        });
        layout_attribute(&mut attribute, &CaptionSettings::default(), 100, &area());
        match attribute.settings.font_size {
            Some(FontSize::Pixels(px)) => assert!((px - 17.0).abs() < 1e-4),
            other => panic!("unexpected font size {other:?}"),
        }
        assert_eq!(attribute.absolute_rect, Rect::new(10, 20, 400, 300));
    }
}

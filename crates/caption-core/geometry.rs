//! Integer rectangles and the rendering area captions are placed in
//!
//! All caption placement happens in the pixel space of a [`RenderingArea`].
//! Extractors describe windows relative to that area (percentages); the
//! layout stage converts them to absolute [`Rect`]s which the collision
//! resolver then translates, never resizes.
//!
//! # Example
//!
//! ```rust
//! use caption_core::geometry::{Rect, RenderingArea};
//!
//! let area = RenderingArea::new(0, 0, 1920, 1080, 1.0)?;
//! let a = Rect::new(100, 900, 400, 100);
//! let b = Rect::new(300, 950, 400, 100);
//! assert!(a.intersects(&b));
//! assert_eq!(a.intersection(&b), Some(Rect::new(300, 950, 200, 50)));
//! assert!(area.bounds().contains(&a));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::{utils::CaptionError, Result};

/// Number of character cells across the caption grid
pub const DEFAULT_HORIZONTAL_CELL: u32 = 32;

/// Number of character rows in the caption grid
pub const DEFAULT_VERTICAL_CELL: u32 = 15;

/// Axis-aligned integer rectangle in rendering-area pixels
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    /// Left edge
    pub left: i32,
    /// Top edge
    pub top: i32,
    /// Horizontal extent
    pub width: i32,
    /// Vertical extent
    pub height: i32,
}

impl Rect {
    /// Create a rectangle from its top-left corner and size
    #[must_use]
    pub const fn new(left: i32, top: i32, width: i32, height: i32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Exclusive right edge
    #[must_use]
    pub const fn right(&self) -> i32 {
        self.left + self.width
    }

    /// Exclusive bottom edge
    #[must_use]
    pub const fn bottom(&self) -> i32 {
        self.top + self.height
    }

    /// True when the rectangle covers no pixels
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Check whether two rectangles share at least one pixel
    ///
    /// Rectangles that only touch along an edge do not intersect.
    #[must_use]
    pub const fn intersects(&self, other: &Self) -> bool {
        self.left < other.right()
            && other.left < self.right()
            && self.top < other.bottom()
            && other.top < self.bottom()
    }

    /// Overlapping region of two rectangles, if any
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        if !self.intersects(other) {
            return None;
        }
        let left = self.left.max(other.left);
        let top = self.top.max(other.top);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        Some(Self::new(left, top, right - left, bottom - top))
    }

    /// Area of the overlapping region, zero when disjoint
    #[must_use]
    pub fn overlap_area(&self, other: &Self) -> i64 {
        self.intersection(other)
            .map_or(0, |r| i64::from(r.width) * i64::from(r.height))
    }

    /// True when `other` lies entirely inside this rectangle
    #[must_use]
    pub const fn contains(&self, other: &Self) -> bool {
        other.left >= self.left
            && other.top >= self.top
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Translate by the given offsets
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.left + dx, self.top + dy, self.width, self.height)
    }

    /// Grow a degenerate rectangle to at least one pixel in each direction
    ///
    /// Renderers must never receive an empty rect, so zero-area windows are
    /// kept at their position with a 1x1 footprint.
    #[must_use]
    pub fn at_least_one_pixel(self) -> Self {
        Self::new(self.left, self.top, self.width.max(1), self.height.max(1))
    }
}

/// Convert a percentage of `extent` to pixels, rounding to nearest
#[must_use]
pub fn percent_to_pixels(percent: f32, extent: i32) -> i32 {
    (extent as f32 * percent / 100.0).round() as i32
}

/// Convert a pixel length to a percentage of `extent`
///
/// A zero extent maps everything to 0% rather than dividing by zero.
#[must_use]
pub fn pixels_to_percent(pixels: f32, extent: i32) -> f32 {
    if extent == 0 {
        0.0
    } else {
        pixels * 100.0 / extent as f32
    }
}

/// Bounding box all captions are laid out in, plus the host's pixel scale
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderingArea {
    left: i32,
    top: i32,
    width: i32,
    height: i32,
    scale: f32,
}

impl RenderingArea {
    /// Create a rendering area
    ///
    /// # Errors
    ///
    /// Returns [`CaptionError::InvalidDimensions`] for negative sizes or a
    /// scale that is not a positive finite number.
    pub fn new(left: i32, top: i32, width: i32, height: i32, scale: f32) -> Result<Self> {
        if width < 0 || height < 0 {
            return Err(CaptionError::invalid_dimensions(width, height));
        }
        if !scale.is_finite() || scale <= 0.0 {
            return Err(CaptionError::Config(format!(
                "rendering scale must be positive, got {scale}"
            )));
        }
        Ok(Self {
            left,
            top,
            width,
            height,
            scale,
        })
    }

    /// Left edge in host pixels
    #[must_use]
    pub const fn left(&self) -> i32 {
        self.left
    }

    /// Top edge in host pixels
    #[must_use]
    pub const fn top(&self) -> i32 {
        self.top
    }

    /// Width in pixels
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.width
    }

    /// Height in pixels
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.height
    }

    /// Device pixel scale reported by the host
    #[must_use]
    pub const fn scale(&self) -> f32 {
        self.scale
    }

    /// The area as a rectangle, used as the collision boundary
    #[must_use]
    pub const fn bounds(&self) -> Rect {
        Rect::new(self.left, self.top, self.width, self.height)
    }

    /// Width of one character cell
    #[must_use]
    pub fn cell_width(&self) -> f32 {
        self.width as f32 / DEFAULT_HORIZONTAL_CELL as f32
    }

    /// Height of one character row
    #[must_use]
    pub fn cell_height(&self) -> f32 {
        self.height as f32 / DEFAULT_VERTICAL_CELL as f32
    }

    /// True for areas wider than 4:3
    #[must_use]
    pub fn is_widescreen(&self) -> bool {
        i64::from(self.width) * 3 > i64::from(self.height) * 4
    }
}

impl Default for RenderingArea {
    fn default() -> Self {
        Self {
            left: 0,
            top: 0,
            width: 1920,
            height: 1080,
            scale: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_contact_is_not_intersection() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(10, 0, 10, 10);
        let c = Rect::new(0, 10, 10, 10);
        assert!(!a.intersects(&b));
        assert!(!a.intersects(&c));
        assert_eq!(a.overlap_area(&b), 0);
    }

    #[test]
    fn intersection_region() {
        let a = Rect::new(0, 0, 100, 50);
        let b = Rect::new(50, 25, 100, 50);
        assert_eq!(a.intersection(&b), Some(Rect::new(50, 25, 50, 25)));
        assert_eq!(a.overlap_area(&b), 1250);
        assert_eq!(b.intersection(&a), a.intersection(&b));
    }

    #[test]
    fn percent_conversion() {
        assert_eq!(percent_to_pixels(10.0, 1920), 192);
        assert_eq!(percent_to_pixels(75.0, 1080), 810);
        assert!((pixels_to_percent(192.0, 1920) - 10.0).abs() < f32::EPSILON);
        assert!(pixels_to_percent(5.0, 0).abs() < f32::EPSILON);
    }

    #[test]
    fn area_validation() {
        assert!(RenderingArea::new(0, 0, -1, 10, 1.0).is_err());
        assert!(RenderingArea::new(0, 0, 10, 10, 0.0).is_err());
        assert!(RenderingArea::new(0, 0, 10, 10, f32::NAN).is_err());
        let area = RenderingArea::new(5, 6, 320, 150, 2.0).unwrap();
        assert_eq!(area.bounds(), Rect::new(5, 6, 320, 150));
        assert!((area.cell_height() - 10.0).abs() < f32::EPSILON);
        assert!((area.cell_width() - 10.0).abs() < f32::EPSILON);
    }

    #[test]
    fn degenerate_rect_grows() {
        let r = Rect::new(3, 4, 0, -2).at_least_one_pixel();
        assert_eq!(r, Rect::new(3, 4, 1, 1));
        assert!(!r.is_empty());
    }

    #[test]
    fn widescreen_detection() {
        assert!(RenderingArea::default().is_widescreen());
        assert!(!RenderingArea::new(0, 0, 640, 480, 1.0).unwrap().is_widescreen());
    }
}

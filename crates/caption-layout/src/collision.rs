//! Collision resolution for caption windows
//!
//! One resolver serves every caption format. It only sees `{id, rect}`
//! entries and translates rects, it never resizes them. Two passes run over
//! the entries:
//!
//! 1. Descending: sort by bottom edge, clamp each rect into the boundary,
//!    then lift every rect that overlaps its predecessor so it sits directly
//!    above it.
//! 2. Ascending: sort by top edge and clamp again. If that moved anything,
//!    push every rect that overlaps its predecessor down to sit directly
//!    below it.
//!
//! Only neighbouring pairs in sort order are compared.

use crate::utils::{LayoutError, Result};
use caption_core::geometry::Rect;
use log::trace;

/// A rect to place, keyed by its owner's id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CollisionEntry {
    /// Owner id
    pub id: u32,
    /// Absolute rect
    pub rect: Rect,
}

impl CollisionEntry {
    /// Create an entry
    #[must_use]
    pub const fn new(id: u32, rect: Rect) -> Self {
        Self { id, rect }
    }
}

/// Outcome of a resolver run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resolution {
    /// No rect moved
    Unchanged,
    /// At least one rect moved
    Adjusted,
}

impl Resolution {
    /// True when at least one rect moved
    #[must_use]
    pub const fn is_adjusted(self) -> bool {
        matches!(self, Self::Adjusted)
    }
}

/// Strategy that makes a set of entries fit a boundary
pub trait CollisionStrategy {
    /// Move entries in place
    fn resolve(&self, entries: &mut [CollisionEntry]) -> Resolution;
}

/// Two-pass resolver bounded by the rendering area
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionResolver {
    boundary: Rect,
}

impl CollisionResolver {
    /// Create a resolver for `boundary`
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidBoundary`] when the boundary is empty.
    pub fn new(boundary: Rect) -> Result<Self> {
        if boundary.is_empty() {
            return Err(LayoutError::InvalidBoundary {
                width: boundary.width,
                height: boundary.height,
            });
        }
        Ok(Self { boundary })
    }

    /// Rect entries are kept inside
    #[must_use]
    pub const fn boundary(&self) -> Rect {
        self.boundary
    }

    /// Move `rect` inside the boundary, each edge checked on its own
    ///
    /// A rect larger than the boundary ends up aligned to its top or left.
    #[must_use]
    pub fn clamp(&self, rect: Rect) -> Rect {
        let bounds = self.boundary;
        let mut clamped = rect;
        if clamped.bottom() > bounds.bottom() {
            clamped.top = bounds.bottom() - clamped.height;
        }
        if clamped.top < bounds.top {
            clamped.top = bounds.top;
        }
        if clamped.right() > bounds.right() {
            clamped.left = bounds.right() - clamped.width;
        }
        if clamped.left < bounds.left {
            clamped.left = bounds.left;
        }
        clamped
    }

    /// Clamp every entry, returning whether any moved
    fn clamp_all(&self, entries: &mut [CollisionEntry]) -> bool {
        let mut moved = false;
        for entry in entries.iter_mut() {
            let clamped = self.clamp(entry.rect);
            if clamped != entry.rect {
                trace!("collision: clamped entry {} to {:?}", entry.id, clamped);
                entry.rect = clamped;
                moved = true;
            }
        }
        moved
    }

    fn descending_pass(&self, entries: &mut [CollisionEntry]) -> bool {
        entries.sort_by(|a, b| b.rect.bottom().cmp(&a.rect.bottom()));
        let mut moved = self.clamp_all(entries);

        for i in 1..entries.len() {
            let above = entries[i - 1].rect;
            let current = entries[i].rect;
            if above.intersects(&current) {
                entries[i].rect = current.offset(0, above.top - current.bottom());
                moved = true;
            }
        }
        moved
    }

    fn ascending_pass(&self, entries: &mut [CollisionEntry]) -> bool {
        entries.sort_by(|a, b| a.rect.top.cmp(&b.rect.top));
        if !self.clamp_all(entries) {
            return false;
        }

        for i in 1..entries.len() {
            let below = entries[i - 1].rect;
            let current = entries[i].rect;
            if below.intersects(&current) {
                entries[i].rect.top = below.bottom();
            }
        }
        true
    }
}

impl CollisionStrategy for CollisionResolver {
    fn resolve(&self, entries: &mut [CollisionEntry]) -> Resolution {
        let descended = self.descending_pass(entries);
        let ascended = self.ascending_pass(entries);
        if descended || ascended {
            Resolution::Adjusted
        } else {
            Resolution::Unchanged
        }
    }
}

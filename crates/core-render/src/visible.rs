//! Visible line culling.
//!
//! Walks every line top to bottom and yields the ones whose bounds vertically
//! overlap the visible rectangle. The walk is linear over all lines, not just
//! the visible window: lines past the viewport are still visited so that the
//! content extents (widest right edge, bottom of the last line) are known
//! once the iterator is exhausted. Those extents bound the fling scroll range.

use crate::geometry::Rect;
use std::iter::FusedIterator;

/// Layout box of one line plus its text baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineBounds {
    pub rect: Rect,
    pub baseline: i32,
}

/// Per-line layout queries answered by the host text layout engine.
pub trait LineLayout {
    /// Number of laid out lines; at least 1 for any buffer.
    fn line_count(&self) -> usize;

    /// Bounds of line `index` (`index < line_count()`), in content coordinates.
    fn line_bounds(&self, index: usize) -> LineBounds;
}

impl LineLayout for [LineBounds] {
    fn line_count(&self) -> usize {
        self.len()
    }

    fn line_bounds(&self, index: usize) -> LineBounds {
        self[index]
    }
}

impl LineLayout for Vec<LineBounds> {
    fn line_count(&self) -> usize {
        self.len()
    }

    fn line_bounds(&self, index: usize) -> LineBounds {
        self[index]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleLine {
    pub index: usize,
    pub bounds: LineBounds,
}

/// Content extents accumulated over the lines scanned so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Extents {
    pub max_right: i32,
    pub last_bottom: i32,
}

impl Extents {
    fn observe(&mut self, rect: &Rect) {
        self.max_right = self.max_right.max(rect.right);
        self.last_bottom = rect.bottom;
    }
}

/// Lazy culling pass over a [`LineLayout`]. A clone continues from the same
/// position; call [`select_visible_lines`] again for a fresh pass.
pub struct VisibleLines<'a, L: ?Sized> {
    layout: &'a L,
    visible: Rect,
    next: usize,
    count: usize,
    extents: Extents,
}

impl<L: ?Sized> Clone for VisibleLines<'_, L> {
    fn clone(&self) -> Self {
        Self {
            layout: self.layout,
            visible: self.visible,
            next: self.next,
            count: self.count,
            extents: self.extents,
        }
    }
}

pub fn select_visible_lines<L: LineLayout + ?Sized>(
    layout: &L,
    visible: Rect,
) -> VisibleLines<'_, L> {
    VisibleLines {
        layout,
        visible,
        next: 0,
        count: layout.line_count(),
        extents: Extents::default(),
    }
}

impl<L: LineLayout + ?Sized> VisibleLines<'_, L> {
    /// Extents of the lines visited so far.
    pub fn extents(&self) -> Extents {
        self.extents
    }

    /// Drain the remaining lines and return the full content extents.
    pub fn finish(mut self) -> Extents {
        while self.next().is_some() {}
        self.extents
    }
}

impl<L: LineLayout + ?Sized> Iterator for VisibleLines<'_, L> {
    type Item = VisibleLine;

    fn next(&mut self) -> Option<VisibleLine> {
        while self.next < self.count {
            let index = self.next;
            self.next += 1;
            let bounds = self.layout.line_bounds(index);
            self.extents.observe(&bounds.rect);
            if bounds.rect.overlaps_vertically(&self.visible) {
                return Some(VisibleLine { index, bounds });
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.count - self.next))
    }
}

impl<L: LineLayout + ?Sized> FusedIterator for VisibleLines<'_, L> {}

//! Caret line memoization.
//!
//! The view highlights the line holding the caret. Finding it means counting
//! newlines up to the selection start, which is linear in the offset for a
//! plain string source, so the last (offset, line) pair is kept and reused
//! while the caret stays put.
//!
//! Invariants:
//! * A disabled view has no highlighted line and an empty cache.
//! * Offset 0 always maps to line 0.
//! * For a fixed text the line is non-decreasing in the offset.

use crate::TextSource;
use tracing::trace;

/// Caret state as read from the host on each redraw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Caret {
    /// The view is disabled; nothing is highlighted.
    Disabled,
    /// Selection start as a char offset.
    At(usize),
}

/// Last seen selection offset and the line computed for it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HighlightCache {
    offset: Option<usize>,
    line: Option<usize>,
}

impl HighlightCache {
    pub const fn new() -> Self {
        Self {
            offset: None,
            line: None,
        }
    }

    /// Highlighted line, `None` when disabled or never computed.
    pub fn line(&self) -> Option<usize> {
        self.line
    }

    pub fn offset(&self) -> Option<usize> {
        self.offset
    }

    /// Return the cache updated for `caret`, rescanning `source` only when the
    /// offset moved since the previous call.
    #[must_use]
    pub fn recompute<S: TextSource + ?Sized>(self, source: &S, caret: Caret) -> Self {
        let offset = match caret {
            Caret::Disabled => return Self::new(),
            Caret::At(offset) => offset,
        };
        if self.offset == Some(offset) {
            return self;
        }
        let line = source.newlines_before(offset);
        trace!(target: "view.highlight", offset, line, "caret_line_rescan");
        Self {
            offset: Some(offset),
            line: Some(line),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Wraps a string and counts how often the newline scan runs.
    struct CountingSource<'a> {
        text: &'a str,
        scans: Cell<usize>,
    }

    impl<'a> CountingSource<'a> {
        fn new(text: &'a str) -> Self {
            Self {
                text,
                scans: Cell::new(0),
            }
        }
    }

    impl TextSource for CountingSource<'_> {
        fn newlines_before(&self, offset: usize) -> usize {
            self.scans.set(self.scans.get() + 1);
            self.text.newlines_before(offset)
        }
    }

    #[test]
    fn caret_on_second_line() {
        let cache = HighlightCache::new().recompute("a\nb\nc", Caret::At(3));
        assert_eq!(cache.line(), Some(1));
        assert_eq!(cache.offset(), Some(3));
    }

    #[test]
    fn no_newline_is_first_line() {
        for off in 0..=3 {
            let cache = HighlightCache::new().recompute("abc", Caret::At(off));
            assert_eq!(cache.line(), Some(0), "offset {off}");
        }
    }

    #[test]
    fn caret_right_after_newline_is_next_line() {
        let cache = HighlightCache::new().recompute("ab\ncd", Caret::At(3));
        assert_eq!(cache.line(), Some(1));
        let cache = cache.recompute("ab\ncd", Caret::At(2));
        assert_eq!(cache.line(), Some(0));
    }

    #[test]
    fn unchanged_offset_skips_rescan() {
        let src = CountingSource::new("one\ntwo\nthree");
        let first = HighlightCache::new().recompute(&src, Caret::At(9));
        assert_eq!(src.scans.get(), 1);
        let second = first.recompute(&src, Caret::At(9));
        assert_eq!(second, first);
        assert_eq!(src.scans.get(), 1);
        let moved = second.recompute(&src, Caret::At(1));
        assert_eq!(moved.line(), Some(0));
        assert_eq!(src.scans.get(), 2);
    }

    #[test]
    fn disabled_clears_any_prior_state() {
        let warm = HighlightCache::new().recompute("a\nb", Caret::At(2));
        assert_eq!(warm.line(), Some(1));
        let off = warm.recompute("a\nb", Caret::Disabled);
        assert_eq!(off.line(), None);
        assert_eq!(off, HighlightCache::new());
    }

    #[test]
    fn reenable_after_disable_rescans() {
        let src = CountingSource::new("a\nb");
        let cache = HighlightCache::new()
            .recompute(&src, Caret::At(2))
            .recompute(&src, Caret::Disabled)
            .recompute(&src, Caret::At(2));
        assert_eq!(cache.line(), Some(1));
        assert_eq!(src.scans.get(), 2);
    }
}

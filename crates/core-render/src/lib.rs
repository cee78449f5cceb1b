//! Gutter, current line highlight and theme rendering for a host text widget.
//!
//! The crate is the host-independent half of the editor view. A host text
//! widget provides text, layout, scrolling and a drawing surface through the
//! traits in [`host`]; [`view::EditorView`] layers line numbers, the current
//! line highlight, theme colors and fling scrolling on top.
//!
//! Per paint pass:
//! 1. Gutter width from the digit count of the line count ([`gutter`]).
//! 2. Caret line from the selection start, memoized across passes
//!    (`core_text::HighlightCache`).
//! 3. Culling of line bounds against the visible rectangle, accumulating
//!    content extents for the fling scroll range ([`visible`]).
//! 4. Highlight fill, line numbers and the gutter divider, then the host's
//!    own text drawing.
//!
//! Invariants:
//! - Every pass is synchronous and runs to completion on the caller's thread.
//! - The only state carried between passes is the highlight cache and the
//!   max scroll offset; gutter width and extents are recomputed each pass.
//! - Theme colors come from one table ([`palette::PALETTES`]) indexed by
//!   `ColorTheme`; unknown theme names already resolved to `Classic` in config.

pub mod geometry;
pub mod gutter;
pub mod host;
pub mod palette;
pub mod view;
pub mod visible;

pub use geometry::{Padding, Point, Rect, ScrollBounds};
pub use gutter::{GutterMetrics, digit_count};
pub use host::{ScrollAnimator, Surface, TextHost};
pub use palette::{BackgroundStyle, Paint, Palette, Rgb, palette_for};
pub use view::{DrawReport, EditorView};
pub use visible::{
    Extents, LineBounds, LineLayout, VisibleLine, VisibleLines, select_visible_lines,
};

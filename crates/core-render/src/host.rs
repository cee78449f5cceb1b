//! Capabilities the view borrows from its host.
//!
//! The view owns no text, layout or scroll state of its own. A host (terminal
//! frontend, test double, native toolkit binding) implements [`TextHost`],
//! supplies a [`Surface`] per frame, and optionally a [`ScrollAnimator`] for
//! fling physics.

use crate::geometry::{Padding, Point, Rect, ScrollBounds};
use crate::palette::{BackgroundStyle, Paint, Rgb};
use crate::visible::LineLayout;
use core_text::TextSource;

/// Drawing primitives for one paint pass. Coordinates are content pixels
/// (the same space as [`TextHost::drawing_rect`]).
pub trait Surface {
    fn fill_rect(&mut self, rect: Rect, paint: &Paint);

    /// Draw `text` starting at `x` with its baseline at `baseline`.
    fn draw_text(&mut self, text: &str, x: i32, baseline: i32, paint: &Paint);

    fn draw_line(&mut self, from: Point, to: Point, paint: &Paint);
}

/// Text, layout, scroll and styling capabilities of the host text widget.
///
/// Text and selection must be re-read on every call; the host owes the view
/// no change notifications and is expected to request a redraw whenever text
/// or selection changes.
pub trait TextHost: LineLayout {
    type Text: TextSource + ?Sized;

    fn text(&self) -> &Self::Text;

    /// Selection start as a char offset, `None` when there is no selection.
    fn selection_start(&self) -> Option<usize>;

    fn is_enabled(&self) -> bool;

    /// Currently visible region in content coordinates (scroll offset applied).
    fn drawing_rect(&self) -> Rect;

    fn scroll_position(&self) -> Point;

    fn scroll_to(&mut self, to: Point);

    /// Host default scroll handling when no fling animator is active.
    /// Returns `true` while the host still animates.
    fn compute_scroll_default(&mut self) -> bool {
        false
    }

    fn set_padding(&mut self, padding: Padding);

    fn set_horizontally_scrolling(&mut self, enabled: bool);

    fn set_background(&mut self, background: BackgroundStyle);

    fn set_text_color(&mut self, color: Rgb);

    fn set_text_size(&mut self, size: f32);

    fn show_soft_input(&mut self);

    fn request_redraw(&mut self);

    /// The host's own text drawing, run after the gutter and highlight.
    fn draw_content(&self, surface: &mut dyn Surface);
}

/// Physics-based scroller fed by fling gestures.
pub trait ScrollAnimator {
    /// Start a fling from `start` with `velocity` in pixels per second,
    /// confined to `bounds`.
    fn fling(&mut self, start: Point, velocity: Point, bounds: ScrollBounds);

    /// Advance the animation. Returns the new scroll offset while the
    /// animation runs, `None` once it has settled.
    fn compute_offset(&mut self) -> Option<Point>;

    fn is_finished(&self) -> bool;
}

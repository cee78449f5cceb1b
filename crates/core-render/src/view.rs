//! Editor view adapter: gutter, current line highlight, themes, fling.
//!
//! `EditorView` decorates a host text widget. Each paint pass it sizes the
//! gutter from the line count, recomputes the caret line (memoized through
//! [`HighlightCache`]), paints the highlight and line numbers for the visible
//! lines only, then hands over to the host to draw the text itself.
//!
//! Fling scrolling is optional. When enabled the view keeps a scroll animator
//! and the max scroll offset derived from the last paint pass's content
//! extents; the host polls [`EditorView::compute_scroll`] every frame.

use crate::geometry::{Padding, Point, ScrollBounds};
use crate::gutter::{GutterMetrics, NUMBER_SIZE_RATIO};
use crate::host::{ScrollAnimator, Surface, TextHost};
use crate::palette::{HIGHLIGHT_ALPHA, Paint, Rgb, palette_for};
use crate::visible::select_visible_lines;
use core_config::Settings;
use core_events::{Gesture, KeyInput};
use core_text::{Caret, HighlightCache};
use tracing::{debug, info, trace};

/// Base padding in density independent pixels.
pub const BASE_PADDING_DP: f32 = 6.0;

/// Summary of one paint pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawReport {
    /// Left padding applied to the host (gutter width or base padding).
    pub left_padding: i32,
    pub highlighted_line: Option<usize>,
    pub lines_painted: usize,
}

pub struct EditorView<A> {
    number_paint: Paint,
    highlight_paint: Paint,
    scale: f32,
    base_padding: i32,
    highlight: HighlightCache,
    settings: Settings,
    scroller: Option<A>,
    max_scroll: Option<Point>,
}

impl<A: ScrollAnimator + Default> EditorView<A> {
    /// Build a view for a host at display density `scale` and apply `settings`.
    pub fn new<H: TextHost>(host: &mut H, scale: f32, settings: Settings) -> Self {
        let mut view = Self {
            number_paint: Paint::new(Rgb::GRAY),
            highlight_paint: Paint::new(Rgb::BLACK),
            scale,
            base_padding: (BASE_PADDING_DP * scale) as i32,
            highlight: HighlightCache::new(),
            settings,
            scroller: None,
            max_scroll: None,
        };
        view.apply_settings(host, settings);
        view
    }

    /// Push `settings` into the view and host: wrapping, theme colors, text
    /// size, and fling support. A fresh animator replaces any running fling.
    pub fn apply_settings<H: TextHost>(&mut self, host: &mut H, settings: Settings) {
        self.settings = settings;
        host.set_horizontally_scrolling(!settings.word_wrap);

        let palette = palette_for(settings.color_theme);
        host.set_background(palette.background);
        host.set_text_color(palette.text);
        self.highlight_paint = Paint::new(palette.highlight).with_alpha(HIGHLIGHT_ALPHA);
        self.number_paint = Paint::new(palette.gutter_number)
            .with_text_size(settings.text_size * self.scale * NUMBER_SIZE_RATIO);

        host.set_text_size(settings.text_size);
        host.request_redraw();

        if settings.fling_to_scroll {
            self.scroller = Some(A::default());
            self.max_scroll = Some(Point::ZERO);
        } else {
            self.scroller = None;
            self.max_scroll = None;
        }
        info!(
            target: "view.settings",
            theme = %settings.color_theme,
            word_wrap = settings.word_wrap,
            fling = settings.fling_to_scroll,
            text_size = settings.text_size,
            line_numbers = settings.show_line_numbers,
            "settings_applied"
        );
    }

    pub fn gutter_metrics(&self) -> GutterMetrics {
        GutterMetrics {
            number_glyph_size: self.number_paint.text_size,
            base_padding: self.base_padding,
            text_size: self.settings.text_size,
            scale: self.scale,
        }
    }

    /// Run one paint pass onto `surface`.
    pub fn draw<H: TextHost, S: Surface>(&mut self, host: &mut H, surface: &mut S) -> DrawReport {
        let pad = self.base_padding;
        let metrics = self.gutter_metrics();
        let left_padding = if self.settings.show_line_numbers {
            metrics.width(host.line_count())
        } else {
            pad
        };
        host.set_padding(Padding {
            left: left_padding,
            top: pad,
            right: pad,
            bottom: pad,
        });

        let host: &H = host;
        let drawing = host.drawing_rect();
        self.recompute_highlight(host);
        let highlighted = self.highlight.line();
        let divider_x = metrics.divider_x(drawing.left, left_padding);

        let mut lines_painted = 0usize;
        let mut pass = select_visible_lines(host, drawing);
        for line in pass.by_ref() {
            lines_painted += 1;
            if highlighted == Some(line.index) && !self.settings.word_wrap {
                surface.fill_rect(line.bounds.rect, &self.highlight_paint);
            }
            if self.settings.show_line_numbers {
                surface.draw_text(
                    &(line.index + 1).to_string(),
                    drawing.left + pad,
                    line.bounds.baseline,
                    &self.number_paint,
                );
            }
        }
        let extents = pass.finish();

        if self.settings.show_line_numbers {
            surface.draw_line(
                Point::new(divider_x, drawing.top),
                Point::new(divider_x, drawing.bottom),
                &self.number_paint,
            );
        }

        if let Some(max) = self.max_scroll.as_mut() {
            max.x = (extents.max_right + pad - drawing.width()).max(0);
            max.y = (extents.last_bottom + pad - drawing.height()).max(0);
        }

        host.draw_content(surface);

        debug!(
            target: "view.draw",
            left_padding,
            lines_painted,
            highlighted = ?highlighted,
            top = drawing.top,
            bottom = drawing.bottom,
            "paint_pass"
        );
        DrawReport {
            left_padding,
            highlighted_line: highlighted,
            lines_painted,
        }
    }

    fn recompute_highlight<H: TextHost>(&mut self, host: &H) {
        let caret = if host.is_enabled() {
            Caret::At(host.selection_start().unwrap_or(0))
        } else {
            Caret::Disabled
        };
        self.highlight = self.highlight.recompute(host.text(), caret);
    }

    /// Advance a running fling and scroll the host. Falls back to the host's
    /// default handling when fling scrolling is off. Returns `true` while an
    /// animation is still in progress.
    pub fn compute_scroll<H: TextHost>(&mut self, host: &mut H) -> bool {
        match self.scroller.as_mut() {
            Some(scroller) => match scroller.compute_offset() {
                Some(offset) => {
                    host.scroll_to(offset);
                    true
                }
                None => false,
            },
            None => host.compute_scroll_default(),
        }
    }

    /// Handle a classified gesture after the host's own touch handling ran.
    /// Returns whether the gesture was consumed.
    pub fn on_gesture<H: TextHost>(&mut self, host: &mut H, gesture: Gesture) -> bool {
        trace!(target: "view.gesture", gesture = gesture.name());
        match gesture {
            Gesture::Down { .. } | Gesture::Scroll { .. } => true,
            Gesture::SingleTapUp { .. } => {
                if host.is_enabled() {
                    host.show_soft_input();
                }
                true
            }
            Gesture::ShowPress { .. } | Gesture::LongPress { .. } => false,
            Gesture::Fling {
                velocity_x,
                velocity_y,
            } => {
                if !self.settings.fling_to_scroll {
                    return true;
                }
                if let (Some(scroller), Some(max)) = (self.scroller.as_mut(), self.max_scroll) {
                    let start = host.scroll_position();
                    let velocity = Point::new(
                        (velocity_x as i32).saturating_neg(),
                        (velocity_y as i32).saturating_neg(),
                    );
                    debug!(
                        target: "view.fling",
                        start_x = start.x,
                        start_y = start.y,
                        velocity_x = velocity.x,
                        velocity_y = velocity.y,
                        max_x = max.x,
                        max_y = max.y,
                        "fling_start"
                    );
                    scroller.fling(start, velocity, ScrollBounds::from_origin(max));
                    host.request_redraw();
                }
                true
            }
        }
    }

    /// Keys are never consumed by the view; the host's default key handling
    /// (caret movement, editing, menu) always applies.
    pub fn on_key(&mut self, key: &KeyInput) -> bool {
        trace!(target: "view.key", key = %key, navigation = key.key.is_navigation());
        false
    }

    pub fn highlighted_line(&self) -> Option<usize> {
        self.highlight.line()
    }

    /// Max scroll offset from the last paint pass; `None` without fling support.
    pub fn max_scroll(&self) -> Option<Point> {
        self.max_scroll
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn base_padding(&self) -> i32 {
        self.base_padding
    }

    pub fn number_paint(&self) -> &Paint {
        &self.number_paint
    }

    pub fn highlight_paint(&self) -> &Paint {
        &self.highlight_paint
    }

    pub fn scroller(&self) -> Option<&A> {
        self.scroller.as_ref()
    }
}

#![allow(dead_code)]

use core_render::{
    BackgroundStyle, LineBounds, LineLayout, Padding, Paint, Point, Rect, Rgb, ScrollAnimator,
    ScrollBounds, Surface, TextHost,
};
use core_text::TextSource;
use std::cell::Cell;

pub const LINE_HEIGHT: i32 = 16;
pub const CHAR_WIDTH: i32 = 8;
pub const CONTENT_MARKER: &str = "<content>";

/// Text source that counts newline scans.
pub struct CountingText {
    pub text: String,
    pub scans: Cell<usize>,
}

impl TextSource for CountingText {
    fn newlines_before(&self, offset: usize) -> usize {
        self.scans.set(self.scans.get() + 1);
        self.text.newlines_before(offset)
    }
}

/// One line per row host with fixed cell metrics.
pub struct MockHost {
    pub text: CountingText,
    pub selection: Option<usize>,
    pub enabled: bool,
    pub width: i32,
    pub height: i32,
    pub scroll: Point,
    pub padding: Padding,
    pub horizontally_scrolling: Option<bool>,
    pub background: Option<BackgroundStyle>,
    pub text_color: Option<Rgb>,
    pub text_size: Option<f32>,
    pub soft_input_requests: usize,
    pub redraws: usize,
    pub default_scroll_calls: usize,
    pub content_draws: Cell<usize>,
}

impl MockHost {
    pub fn new(text: &str, width: i32, height: i32) -> Self {
        Self {
            text: CountingText {
                text: text.to_string(),
                scans: Cell::new(0),
            },
            selection: Some(0),
            enabled: true,
            width,
            height,
            scroll: Point::ZERO,
            padding: Padding::default(),
            horizontally_scrolling: None,
            background: None,
            text_color: None,
            text_size: None,
            soft_input_requests: 0,
            redraws: 0,
            default_scroll_calls: 0,
            content_draws: Cell::new(0),
        }
    }

    pub fn scans(&self) -> usize {
        self.text.scans.get()
    }

    fn line_chars(&self, index: usize) -> i32 {
        self.text
            .text
            .split('\n')
            .nth(index)
            .map(|l| l.chars().count() as i32)
            .unwrap_or(0)
    }
}

impl LineLayout for MockHost {
    fn line_count(&self) -> usize {
        self.text.text.matches('\n').count() + 1
    }

    fn line_bounds(&self, index: usize) -> LineBounds {
        let top = self.padding.top + index as i32 * LINE_HEIGHT;
        let left = self.padding.left;
        LineBounds {
            rect: Rect::new(
                left,
                top,
                left + self.line_chars(index) * CHAR_WIDTH,
                top + LINE_HEIGHT,
            ),
            baseline: top + LINE_HEIGHT - 4,
        }
    }
}

impl TextHost for MockHost {
    type Text = CountingText;

    fn text(&self) -> &CountingText {
        &self.text
    }

    fn selection_start(&self) -> Option<usize> {
        self.selection
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn drawing_rect(&self) -> Rect {
        Rect::new(
            self.scroll.x,
            self.scroll.y,
            self.scroll.x + self.width,
            self.scroll.y + self.height,
        )
    }

    fn scroll_position(&self) -> Point {
        self.scroll
    }

    fn scroll_to(&mut self, to: Point) {
        self.scroll = to;
    }

    fn compute_scroll_default(&mut self) -> bool {
        self.default_scroll_calls += 1;
        false
    }

    fn set_padding(&mut self, padding: Padding) {
        self.padding = padding;
    }

    fn set_horizontally_scrolling(&mut self, enabled: bool) {
        self.horizontally_scrolling = Some(enabled);
    }

    fn set_background(&mut self, background: BackgroundStyle) {
        self.background = Some(background);
    }

    fn set_text_color(&mut self, color: Rgb) {
        self.text_color = Some(color);
    }

    fn set_text_size(&mut self, size: f32) {
        self.text_size = Some(size);
    }

    fn show_soft_input(&mut self) {
        self.soft_input_requests += 1;
    }

    fn request_redraw(&mut self) {
        self.redraws += 1;
    }

    fn draw_content(&self, surface: &mut dyn Surface) {
        self.content_draws.set(self.content_draws.get() + 1);
        surface.draw_text(CONTENT_MARKER, 0, 0, &Paint::new(Rgb::BLACK));
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Fill { rect: Rect, color: Rgb, alpha: u8 },
    Text { text: String, x: i32, baseline: i32 },
    Line { from: Point, to: Point },
}

#[derive(Default)]
pub struct RecordingSurface {
    pub ops: Vec<DrawOp>,
}

impl RecordingSurface {
    pub fn numbers(&self) -> Vec<String> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } if text != CONTENT_MARKER => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn fills(&self) -> Vec<Rect> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Fill { rect, .. } => Some(*rect),
                _ => None,
            })
            .collect()
    }
}

impl Surface for RecordingSurface {
    fn fill_rect(&mut self, rect: Rect, paint: &Paint) {
        self.ops.push(DrawOp::Fill {
            rect,
            color: paint.color,
            alpha: paint.alpha,
        });
    }

    fn draw_text(&mut self, text: &str, x: i32, baseline: i32, _paint: &Paint) {
        self.ops.push(DrawOp::Text {
            text: text.to_string(),
            x,
            baseline,
        });
    }

    fn draw_line(&mut self, from: Point, to: Point, _paint: &Paint) {
        self.ops.push(DrawOp::Line { from, to });
    }
}

/// Animator that replays two fixed steps toward `start + velocity / 10`.
#[derive(Default)]
pub struct ScriptedAnimator {
    pub flings: Vec<(Point, Point, ScrollBounds)>,
    pending: Vec<Point>,
}

impl ScrollAnimator for ScriptedAnimator {
    fn fling(&mut self, start: Point, velocity: Point, bounds: ScrollBounds) {
        self.flings.push((start, velocity, bounds));
        let half = Point::new(start.x + velocity.x / 20, start.y + velocity.y / 20);
        let end = Point::new(start.x + velocity.x / 10, start.y + velocity.y / 10);
        self.pending = vec![bounds.clamp(end), bounds.clamp(half)];
    }

    fn compute_offset(&mut self) -> Option<Point> {
        self.pending.pop()
    }

    fn is_finished(&self) -> bool {
        self.pending.is_empty()
    }
}

pub fn numbered_lines(count: usize) -> String {
    (1..=count)
        .map(|i| format!("line {i}"))
        .collect::<Vec<_>>()
        .join("\n")
}

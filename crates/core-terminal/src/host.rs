//! Terminal text widget hosting the editor view.
//!
//! Layout works on the virtual pixel grid (one cell is `CELL_WIDTH` x
//! `CELL_HEIGHT` pixels). Padding requested by the view is snapped to whole
//! cells: left rounds up so text never shares a column with the gutter
//! divider, the other edges round down.
//!
//! Without word wrap every logical line is one row. With word wrap a line
//! takes as many rows as it needs at the current text width; the per-line row
//! offsets are rebuilt by `relayout` whenever text, padding, size or the wrap
//! mode change.

use crate::{BASELINE_OFFSET, CELL_HEIGHT, CELL_WIDTH};
use anyhow::{Result, bail};
use core_events::{Key, KeyInput};
use core_render::{
    BackgroundStyle, LineBounds, LineLayout, Padding, Paint, Point, Rect, Rgb, Surface, TextHost,
    select_visible_lines,
};
use core_text::Buffer;
use std::ops::Range;
use std::path::PathBuf;
use tracing::{debug, trace};
use unicode_width::UnicodeWidthChar;

/// Spaces inserted for a Tab key.
const TAB_SPACES: &str = "    ";

/// Split a line into wrapped rows of at most `cols` columns. Returns char
/// ranges; an empty line yields one empty row. A character wider than `cols`
/// still gets a row of its own.
pub fn wrap_segments<I: IntoIterator<Item = char>>(chars: I, cols: usize) -> Vec<Range<usize>> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut used = 0;
    let mut count = 0;
    for (i, ch) in chars.into_iter().enumerate() {
        let w = ch.width().unwrap_or(0);
        if used > 0 && used + w > cols {
            out.push(start..i);
            start = i;
            used = 0;
        }
        used += w;
        count = i + 1;
    }
    out.push(start..count);
    out
}

fn str_width(s: &str) -> usize {
    s.chars().map(|c| c.width().unwrap_or(0)).sum()
}

/// Display column of char index `col` within `text`.
fn column_of(text: &str, col: usize) -> usize {
    text.chars().take(col).map(|c| c.width().unwrap_or(0)).sum()
}

/// Char index whose cell covers display column `target` (clamped to the end).
fn char_at_column(chars: &[char], target: usize) -> usize {
    let mut used = 0;
    for (i, ch) in chars.iter().enumerate() {
        let w = ch.width().unwrap_or(0);
        if target < used + w.max(1) {
            return i;
        }
        used += w;
    }
    chars.len()
}

pub struct TerminalHost {
    buffer: Buffer,
    path: Option<PathBuf>,
    caret: usize,
    preferred_col: Option<usize>,
    width: i32,
    height: i32,
    scroll: Point,
    padding: Padding,
    horizontally_scrolling: bool,
    /// Display width of every logical line.
    line_cols: Vec<usize>,
    /// First row of each line plus the total row count; `None` without wrap.
    row_starts: Option<Vec<usize>>,
    background: BackgroundStyle,
    text_color: Rgb,
    text_size: f32,
    enabled: bool,
    cursor_visible: bool,
    redraw: bool,
    modified: bool,
}

impl TerminalHost {
    /// Host over `buffer` with a text viewport of `cols` x `rows` cells.
    pub fn new(buffer: Buffer, path: Option<PathBuf>, cols: u16, rows: u16) -> Self {
        let mut host = Self {
            buffer,
            path,
            caret: 0,
            preferred_col: None,
            width: cols as i32 * CELL_WIDTH,
            height: rows as i32 * CELL_HEIGHT,
            scroll: Point::ZERO,
            padding: Padding::default(),
            horizontally_scrolling: true,
            line_cols: Vec::new(),
            row_starts: None,
            background: BackgroundStyle::WhiteField,
            text_color: Rgb::BLACK,
            text_size: 12.0,
            enabled: true,
            cursor_visible: false,
            redraw: true,
            modified: false,
        };
        host.relayout();
        host
    }

    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    pub fn caret(&self) -> usize {
        self.caret
    }

    pub fn set_caret(&mut self, offset: usize) {
        self.caret = offset.min(self.buffer.len_chars());
        self.preferred_col = None;
        self.request_redraw();
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        self.request_redraw();
    }

    pub fn cursor_visible(&self) -> bool {
        self.cursor_visible
    }

    pub fn padding(&self) -> Padding {
        self.padding
    }

    pub fn background(&self) -> BackgroundStyle {
        self.background
    }

    pub fn text_color(&self) -> Rgb {
        self.text_color
    }

    pub fn text_size(&self) -> f32 {
        self.text_size
    }

    pub fn is_horizontally_scrolling(&self) -> bool {
        self.horizontally_scrolling
    }

    /// Take the pending redraw request.
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.redraw)
    }

    /// Caret position as (line, column), both zero based.
    pub fn caret_line_col(&self) -> (usize, usize) {
        let line = self.buffer.char_to_line(self.caret);
        (line, self.caret - self.buffer.line_to_char(line))
    }

    /// Viewport size in cells.
    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.width = cols as i32 * CELL_WIDTH;
        self.height = rows as i32 * CELL_HEIGHT;
        self.relayout();
        self.scroll = self.clamp_scroll(self.scroll);
        self.request_redraw();
    }

    fn content_left(&self) -> i32 {
        let l = self.padding.left.max(0);
        (l + CELL_WIDTH - 1) / CELL_WIDTH * CELL_WIDTH
    }

    fn content_top(&self) -> i32 {
        let t = self.padding.top.max(0);
        t - t % CELL_HEIGHT
    }

    /// Columns available for text right of the gutter.
    pub fn text_cols(&self) -> usize {
        let right = self.padding.right.max(0) / CELL_WIDTH * CELL_WIDTH;
        ((self.width - self.content_left() - right) / CELL_WIDTH).max(1) as usize
    }

    fn relayout(&mut self) {
        let cols = self.text_cols();
        let wrap = !self.horizontally_scrolling;
        let mut line_cols: Vec<usize> = Vec::with_capacity(self.buffer.line_count());
        let mut starts = wrap.then(|| Vec::with_capacity(self.buffer.line_count() + 1));
        let mut row = 0;
        for line in self.buffer.rope().lines() {
            let chars = line.chars().filter(|c| *c != '\n');
            line_cols.push(chars.clone().map(|c| c.width().unwrap_or(0)).sum());
            if let Some(starts) = starts.as_mut() {
                starts.push(row);
                row += wrap_segments(chars, cols).len();
            }
        }
        if let Some(starts) = starts.as_mut() {
            starts.push(row);
        }
        self.line_cols = line_cols;
        self.row_starts = starts;
        trace!(target: "terminal", lines = self.line_cols.len(), wrap, cols, "relayout");
    }

    fn first_row(&self, line: usize) -> usize {
        match &self.row_starts {
            Some(starts) => starts[line],
            None => line,
        }
    }

    fn rows_in(&self, line: usize) -> usize {
        match &self.row_starts {
            Some(starts) => starts[line + 1] - starts[line],
            None => 1,
        }
    }

    fn total_rows(&self) -> usize {
        match &self.row_starts {
            Some(starts) => starts.last().copied().unwrap_or(0),
            None => self.line_cols.len(),
        }
    }

    /// Line owning visual row `row` (clamped to the last line).
    fn line_at_row(&self, row: usize) -> usize {
        let last = self.line_cols.len().saturating_sub(1);
        match &self.row_starts {
            Some(starts) => starts[..starts.len() - 1]
                .partition_point(|&s| s <= row)
                .saturating_sub(1)
                .min(last),
            None => row.min(last),
        }
    }

    fn segments(&self, text: &str) -> Vec<Range<usize>> {
        if self.horizontally_scrolling {
            vec![0..text.chars().count()]
        } else {
            wrap_segments(text.chars(), self.text_cols())
        }
    }

    /// Caret location in content pixels (top-left of its cell).
    fn caret_point(&self) -> Point {
        let (line, col) = self.caret_line_col();
        let text = self.buffer.line_text(line);
        let segments = self.segments(&text);
        let k = segments
            .iter()
            .rposition(|s| s.start <= col)
            .unwrap_or(0);
        let line_chars: String = text.chars().skip(segments[k].start).collect();
        let dcol = column_of(&line_chars, col - segments[k].start);
        Point::new(
            self.content_left() + dcol as i32 * CELL_WIDTH,
            self.content_top() + (self.first_row(line) + k) as i32 * CELL_HEIGHT,
        )
    }

    fn max_scroll(&self) -> Point {
        let bottom = self.padding.bottom.max(0) / CELL_HEIGHT * CELL_HEIGHT;
        let content_h = self.content_top() + self.total_rows() as i32 * CELL_HEIGHT + bottom;
        let max_x = if self.horizontally_scrolling {
            let widest = self.line_cols.iter().copied().max().unwrap_or(0) as i32;
            (self.content_left() + (widest + 1) * CELL_WIDTH - self.width).max(0)
        } else {
            0
        };
        Point::new(max_x, (content_h - self.height).max(0))
    }

    fn clamp_scroll(&self, p: Point) -> Point {
        let max = self.max_scroll();
        Point::new(p.x.clamp(0, max.x), p.y.clamp(0, max.y))
    }

    /// Scroll so the caret cell is inside the viewport.
    pub fn ensure_caret_visible(&mut self) {
        let caret = self.caret_point();
        let mut scroll = self.scroll;
        if caret.y < scroll.y + self.content_top() {
            scroll.y = caret.y - self.content_top();
        } else if caret.y + CELL_HEIGHT > scroll.y + self.height {
            scroll.y = caret.y + CELL_HEIGHT - self.height;
        }
        if self.horizontally_scrolling {
            if caret.x < scroll.x + self.content_left() {
                scroll.x = caret.x - self.content_left();
            } else if caret.x + CELL_WIDTH > scroll.x + self.width {
                scroll.x = caret.x + CELL_WIDTH - self.width;
            }
        }
        let scroll = self.clamp_scroll(scroll);
        if scroll != self.scroll {
            self.scroll = scroll;
            self.request_redraw();
        }
    }

    /// Screen cell of the caret, `None` when it is scrolled out of view or
    /// hidden behind the gutter.
    pub fn caret_screen_position(&self) -> Option<(u16, u16)> {
        let p = self.caret_point();
        let x = p.x - self.scroll.x;
        let y = p.y - self.scroll.y;
        if x < self.content_left() || x >= self.width || y < 0 || y >= self.height {
            return None;
        }
        Some(((x / CELL_WIDTH) as u16, (y / CELL_HEIGHT) as u16))
    }

    /// Move the caret to the text under screen cell (`col`, `row`).
    pub fn place_caret_at_screen(&mut self, col: u16, row: u16) {
        let x = col as i32 * CELL_WIDTH + self.scroll.x;
        let y = row as i32 * CELL_HEIGHT + self.scroll.y;
        let vrow = ((y - self.content_top()).max(0) / CELL_HEIGHT) as usize;
        let line = self.line_at_row(vrow);
        let text = self.buffer.line_text(line);
        let segments = self.segments(&text);
        let k = (vrow.saturating_sub(self.first_row(line))).min(segments.len() - 1);
        let seg = segments[k].clone();
        let chars: Vec<char> = text.chars().skip(seg.start).take(seg.len()).collect();
        let target = ((x - self.content_left()).max(0) / CELL_WIDTH) as usize;
        let col_in_line = seg.start + char_at_column(&chars, target);
        self.set_caret(self.buffer.line_to_char(line) + col_in_line);
        debug!(target: "terminal", line, col = col_in_line, "caret_placed");
    }

    pub fn scroll_by_rows(&mut self, rows: i32) {
        let to = Point::new(self.scroll.x, self.scroll.y + rows * CELL_HEIGHT);
        self.scroll_to(to);
        self.request_redraw();
    }

    fn visible_rows(&self) -> usize {
        (self.height / CELL_HEIGHT).max(1) as usize
    }

    fn move_vertical(&mut self, delta: isize) {
        let (line, col) = self.caret_line_col();
        let goal = *self.preferred_col.get_or_insert(col);
        let last = self.buffer.line_count() as isize - 1;
        let target = (line as isize + delta).clamp(0, last) as usize;
        let col = goal.min(self.buffer.line_len_chars(target));
        self.caret = self.buffer.line_to_char(target) + col;
    }

    /// Apply the host's default key handling. Returns whether text or caret
    /// changed.
    pub fn handle_key(&mut self, key: &KeyInput) -> bool {
        if !self.enabled || key.has_ctrl() {
            return false;
        }
        let before = (self.caret, self.buffer.len_chars());
        let mut edited = false;
        match key.key {
            Key::Char(c) => {
                let mut tmp = [0u8; 4];
                self.caret = self.buffer.insert(self.caret, c.encode_utf8(&mut tmp));
                edited = true;
            }
            Key::Enter => {
                self.caret = self.buffer.insert(self.caret, "\n");
                edited = true;
            }
            Key::Tab => {
                self.caret = self.buffer.insert(self.caret, TAB_SPACES);
                edited = true;
            }
            Key::Backspace => {
                self.caret = self.buffer.delete_before(self.caret);
                edited = before.0 > 0;
            }
            Key::Delete => {
                self.buffer.delete_at(self.caret);
                edited = self.caret < before.1;
            }
            Key::Left => self.caret = self.caret.saturating_sub(1),
            Key::Right => self.caret = (self.caret + 1).min(self.buffer.len_chars()),
            Key::Up => self.move_vertical(-1),
            Key::Down => self.move_vertical(1),
            Key::PageUp => self.move_vertical(-(self.visible_rows() as isize)),
            Key::PageDown => self.move_vertical(self.visible_rows() as isize),
            Key::Home => {
                let (line, _) = self.caret_line_col();
                self.caret = self.buffer.line_to_char(line);
            }
            Key::End => {
                let (line, _) = self.caret_line_col();
                self.caret = self.buffer.line_to_char(line) + self.buffer.line_len_chars(line);
            }
            Key::Esc | Key::Menu | Key::F(_) => return false,
        }
        if !matches!(
            key.key,
            Key::Up | Key::Down | Key::PageUp | Key::PageDown
        ) {
            self.preferred_col = None;
        }
        if edited {
            self.modified = true;
            self.relayout();
        }
        let changed = edited || self.caret != before.0;
        if changed {
            self.ensure_caret_visible();
            self.request_redraw();
        }
        changed
    }

    /// Write the buffer back to its file.
    pub fn save(&mut self) -> Result<()> {
        let Some(path) = self.path.as_deref() else {
            bail!("buffer '{}' has no file name", self.buffer.name);
        };
        self.buffer.save_to(path)?;
        self.modified = false;
        Ok(())
    }
}

impl LineLayout for TerminalHost {
    fn line_count(&self) -> usize {
        self.line_cols.len()
    }

    fn line_bounds(&self, index: usize) -> LineBounds {
        let left = self.content_left();
        let top = self.content_top() + self.first_row(index) as i32 * CELL_HEIGHT;
        let text_cols = self.text_cols();
        let cols = if self.horizontally_scrolling {
            self.line_cols[index].max(text_cols)
        } else {
            text_cols
        };
        LineBounds {
            rect: Rect::new(
                left,
                top,
                left + cols as i32 * CELL_WIDTH,
                top + self.rows_in(index) as i32 * CELL_HEIGHT,
            ),
            baseline: top + BASELINE_OFFSET,
        }
    }
}

impl TextHost for TerminalHost {
    type Text = Buffer;

    fn text(&self) -> &Buffer {
        &self.buffer
    }

    fn selection_start(&self) -> Option<usize> {
        Some(self.caret)
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
        let to = self.clamp_scroll(to);
        if to != self.scroll {
            self.scroll = to;
            self.request_redraw();
        }
    }

    fn set_padding(&mut self, padding: Padding) {
        if padding != self.padding {
            self.padding = padding;
            self.relayout();
        }
    }

    fn set_horizontally_scrolling(&mut self, enabled: bool) {
        if enabled != self.horizontally_scrolling {
            self.horizontally_scrolling = enabled;
            self.relayout();
            self.scroll = self.clamp_scroll(self.scroll);
        }
    }

    fn set_background(&mut self, background: BackgroundStyle) {
        self.background = background;
    }

    fn set_text_color(&mut self, color: Rgb) {
        self.text_color = color;
    }

    fn set_text_size(&mut self, size: f32) {
        self.text_size = size;
    }

    fn show_soft_input(&mut self) {
        self.cursor_visible = true;
        trace!(target: "terminal", "cursor_shown");
    }

    fn request_redraw(&mut self) {
        self.redraw = true;
    }

    fn draw_content(&self, surface: &mut dyn Surface) {
        let paint = Paint::new(self.text_color);
        let drawing = self.drawing_rect();
        let clip_left = drawing.left + self.content_left();
        for line in select_visible_lines(self, drawing) {
            let text = self.buffer.line_text(line.index);
            for (k, seg) in self.segments(&text).into_iter().enumerate() {
                let baseline = line.bounds.baseline + k as i32 * CELL_HEIGHT;
                let mut x = line.bounds.rect.left;
                let mut start = None;
                for (i, ch) in text.chars().enumerate().take(seg.end).skip(seg.start) {
                    if x >= clip_left {
                        start = Some((i, x));
                        break;
                    }
                    x += ch.width().unwrap_or(0) as i32 * CELL_WIDTH;
                }
                if let Some((i, x)) = start {
                    let visible: String = text.chars().take(seg.end).skip(i).collect();
                    if str_width(&visible) > 0 {
                        surface.draw_text(&visible, x, baseline, &paint);
                    }
                }
            }
        }
    }
}

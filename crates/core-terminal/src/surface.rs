//! Cell grid drawing surface.
//!
//! A frame is composed in memory from the view's draw calls and flushed to the
//! terminal in one pass. Draw calls arrive in content pixels; `origin` (the
//! host's scroll offset) maps them onto screen cells:
//! `col = (x - origin.x) / CELL_WIDTH`, `row = (y - origin.y) / CELL_HEIGHT`,
//! rounding toward negative infinity.
//!
//! Invariants:
//! - Leader cells have `width >= 1`; continuation cells of a wide character
//!   have `width == 0` and follow their leader on the same row.
//! - Fills only change background colors, so a highlight painted before the
//!   text keeps the glyphs drawn afterwards.

use crate::capabilities::TerminalCapabilities;
use crate::{CELL_HEIGHT, CELL_WIDTH};
use anyhow::Result;
use core_render::{Paint, Point, Rect, Rgb, Surface};
use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Print, ResetColor, SetBackgroundColor, SetForegroundColor},
};
use std::io::Write;
use unicode_width::UnicodeWidthChar;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    /// Visual width in columns; `0` marks a continuation cell.
    pub width: u8,
    pub fg: Rgb,
    pub bg: Rgb,
}

impl Cell {
    fn blank(fg: Rgb, bg: Rgb) -> Self {
        Self {
            ch: ' ',
            width: 1,
            fg,
            bg,
        }
    }
}

pub struct CellSurface {
    cols: u16,
    rows: u16,
    origin: Point,
    cells: Vec<Cell>,
}

impl CellSurface {
    pub fn new(cols: u16, rows: u16) -> Self {
        Self {
            cols,
            rows,
            origin: Point::ZERO,
            cells: vec![Cell::blank(Rgb::BLACK, Rgb::WHITE); cols as usize * rows as usize],
        }
    }

    pub fn cols(&self) -> u16 {
        self.cols
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;
        self.cells = vec![Cell::blank(Rgb::BLACK, Rgb::WHITE); cols as usize * rows as usize];
    }

    /// Start a new frame: clear every cell and set the content origin.
    pub fn begin_frame(&mut self, origin: Point, foreground: Rgb, background: Rgb) {
        self.origin = origin;
        self.cells.fill(Cell::blank(foreground, background));
    }

    #[inline]
    fn index(&self, col: i32, row: i32) -> Option<usize> {
        if col >= 0 && row >= 0 && col < self.cols as i32 && row < self.rows as i32 {
            Some(row as usize * self.cols as usize + col as usize)
        } else {
            None
        }
    }

    pub fn cell(&self, col: u16, row: u16) -> Option<&Cell> {
        self.index(col as i32, row as i32).map(|i| &self.cells[i])
    }

    fn col_of(&self, x: i32) -> i32 {
        (x - self.origin.x).div_euclid(CELL_WIDTH)
    }

    fn row_of(&self, y: i32) -> i32 {
        (y - self.origin.y).div_euclid(CELL_HEIGHT)
    }

    /// Printable content of a row (testing / diagnostics only).
    pub fn row_text(&self, row: u16) -> String {
        if row >= self.rows {
            return String::new();
        }
        let start = row as usize * self.cols as usize;
        self.cells[start..start + self.cols as usize]
            .iter()
            .filter(|c| c.width > 0)
            .map(|c| c.ch)
            .collect()
    }

    /// Write the frame with one `MoveTo` per row, switching colors only when
    /// they change.
    pub fn flush<W: Write>(&self, out: &mut W, caps: &TerminalCapabilities) -> Result<()> {
        let mut colors: Option<(Rgb, Rgb)> = None;
        for row in 0..self.rows {
            queue!(out, MoveTo(0, row))?;
            let start = row as usize * self.cols as usize;
            for cell in &self.cells[start..start + self.cols as usize] {
                if cell.width == 0 {
                    continue;
                }
                if colors != Some((cell.fg, cell.bg)) {
                    queue!(
                        out,
                        SetForegroundColor(caps.color(cell.fg)),
                        SetBackgroundColor(caps.color(cell.bg))
                    )?;
                    colors = Some((cell.fg, cell.bg));
                }
                queue!(out, Print(cell.ch))?;
            }
        }
        queue!(out, ResetColor)?;
        Ok(())
    }
}

impl Surface for CellSurface {
    fn fill_rect(&mut self, rect: Rect, paint: &Paint) {
        let col_start = self.col_of(rect.left);
        let col_end = self.col_of(rect.right + CELL_WIDTH - 1);
        let row_start = self.row_of(rect.top);
        let row_end = self.row_of(rect.bottom + CELL_HEIGHT - 1);
        for row in row_start.max(0)..row_end.min(self.rows as i32) {
            for col in col_start.max(0)..col_end.min(self.cols as i32) {
                if let Some(i) = self.index(col, row) {
                    let cell = &mut self.cells[i];
                    cell.bg = paint.color.blend_over(cell.bg, paint.alpha);
                }
            }
        }
    }

    fn draw_text(&mut self, text: &str, x: i32, baseline: i32, paint: &Paint) {
        let row = self.row_of(baseline);
        if row < 0 || row >= self.rows as i32 {
            return;
        }
        let mut col = self.col_of(x);
        for ch in text.chars() {
            let w = UnicodeWidthChar::width(ch).unwrap_or(0) as i32;
            if w == 0 {
                continue;
            }
            if col >= 0 && col + w <= self.cols as i32 {
                if let Some(i) = self.index(col, row) {
                    let bg = self.cells[i].bg;
                    self.cells[i] = Cell {
                        ch,
                        width: w as u8,
                        fg: paint.color,
                        bg,
                    };
                }
                for dx in 1..w {
                    if let Some(i) = self.index(col + dx, row) {
                        let bg = self.cells[i].bg;
                        self.cells[i] = Cell {
                            ch: ' ',
                            width: 0,
                            fg: paint.color,
                            bg,
                        };
                    }
                }
            }
            col += w;
        }
    }

    fn draw_line(&mut self, from: Point, to: Point, paint: &Paint) {
        if from.x == to.x {
            let col = self.col_of(from.x);
            let (top, bottom) = (from.y.min(to.y), from.y.max(to.y));
            for row in self.row_of(top).max(0)..self.row_of(bottom).min(self.rows as i32) {
                if let Some(i) = self.index(col, row) {
                    let cell = &mut self.cells[i];
                    *cell = Cell {
                        ch: '│',
                        width: 1,
                        fg: paint.color,
                        bg: cell.bg,
                    };
                }
            }
        } else if from.y == to.y {
            let row = self.row_of(from.y);
            let (left, right) = (from.x.min(to.x), from.x.max(to.x));
            for col in self.col_of(left).max(0)..self.col_of(right).min(self.cols as i32) {
                if let Some(i) = self.index(col, row) {
                    let cell = &mut self.cells[i];
                    *cell = Cell {
                        ch: '─',
                        width: 1,
                        fg: paint.color,
                        bg: cell.bg,
                    };
                }
            }
        } else {
            tracing::trace!(target: "terminal", "diagonal_line_skipped");
        }
    }
}

//! Integer pixel geometry shared by the view and its hosts.
//!
//! Rectangles use the host layout convention: `left`/`top` inclusive,
//! `right`/`bottom` exclusive, y grows downward.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub const fn width(&self) -> i32 {
        self.right - self.left
    }

    pub const fn height(&self) -> i32 {
        self.bottom - self.top
    }

    /// Vertical overlap test used for line culling. Edges count as touching,
    /// so a line whose bottom equals the visible top is still kept.
    pub const fn overlaps_vertically(&self, other: &Rect) -> bool {
        self.bottom >= other.top && self.top <= other.bottom
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Padding {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Padding {
    pub const fn uniform(value: i32) -> Self {
        Self {
            left: value,
            top: value,
            right: value,
            bottom: value,
        }
    }
}

/// Allowed scroll range for a fling, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollBounds {
    pub min: Point,
    pub max: Point,
}

impl ScrollBounds {
    pub const fn from_origin(max: Point) -> Self {
        Self {
            min: Point::ZERO,
            max,
        }
    }

    pub fn clamp(&self, p: Point) -> Point {
        Point::new(
            p.x.clamp(self.min.x, self.max.x.max(self.min.x)),
            p.y.clamp(self.min.y, self.max.y.max(self.min.y)),
        )
    }
}

//! Line number gutter metrics.
//!
//! The gutter is wide enough to print the largest line number plus the base
//! padding and half a character of breathing room before the text. Values are
//! computed in floating point and truncated toward zero, like the host's
//! integer pixel casts.

/// Inputs to the gutter width computation, captured from the current settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GutterMetrics {
    /// Advance of one digit in the number paint (its text size).
    pub number_glyph_size: f32,
    /// Base padding in pixels (already density scaled).
    pub base_padding: i32,
    /// Configured text size before density scaling.
    pub text_size: f32,
    /// Display density scale factor.
    pub scale: f32,
}

/// Ratio between the gutter number glyph size and the scaled text size.
pub const NUMBER_SIZE_RATIO: f32 = 0.85;

/// Decimal digits needed to print `n` (0 is treated as 1).
pub fn digit_count(n: usize) -> u32 {
    n.max(1).ilog10() + 1
}

impl GutterMetrics {
    pub fn new(text_size: f32, scale: f32, base_padding: i32) -> Self {
        Self {
            number_glyph_size: text_size * scale * NUMBER_SIZE_RATIO,
            base_padding,
            text_size,
            scale,
        }
    }

    /// Half a scaled character, reserved between numbers and text.
    pub fn half_char(&self) -> f32 {
        self.text_size * self.scale * 0.5
    }

    /// Gutter width in pixels for a buffer of `line_count` lines.
    pub fn width(&self, line_count: usize) -> i32 {
        let digits = digit_count(line_count) as f32;
        (digits * self.number_glyph_size + self.base_padding as f32 + self.half_char()) as i32
    }

    /// X coordinate of the divider between numbers and text.
    pub fn divider_x(&self, drawing_left: i32, gutter_width: i32) -> i32 {
        (drawing_left as f32 + gutter_width as f32 - self.half_char()) as i32
    }
}

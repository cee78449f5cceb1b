//! Terminal color capability probing.
//!
//! Theme colors are 24-bit. Terminals that advertise truecolor through
//! `COLORTERM` get them verbatim; everything else gets the nearest entry of
//! the xterm 256-color cube.

use core_render::Rgb;
use crossterm::style::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub struct TerminalCapabilities {
    pub supports_truecolor: bool,
}

impl TerminalCapabilities {
    pub fn detect() -> Self {
        let colorterm = std::env::var("COLORTERM").unwrap_or_default();
        Self::from_colorterm(&colorterm)
    }

    pub fn from_colorterm(value: &str) -> Self {
        let v = value.to_ascii_lowercase();
        Self {
            supports_truecolor: v == "truecolor" || v == "24bit",
        }
    }

    pub fn color(&self, rgb: Rgb) -> Color {
        if self.supports_truecolor {
            Color::Rgb {
                r: rgb.r,
                g: rgb.g,
                b: rgb.b,
            }
        } else {
            Color::AnsiValue(ansi256(rgb))
        }
    }
}

/// Nearest index in the 6x6x6 color cube (16..=231).
pub fn ansi256(rgb: Rgb) -> u8 {
    let level = |c: u8| ((c as u16 * 5 + 127) / 255) as u8;
    16 + 36 * level(rgb.r) + 6 * level(rgb.g) + level(rgb.b)
}

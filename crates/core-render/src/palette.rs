//! Theme palette table.
//!
//! Each `ColorTheme` maps to one fixed tuple of background style, text color,
//! highlight color and gutter number color. The table is indexed by
//! `ColorTheme::index`, so its order must follow `ColorTheme::ALL`.

use core_config::ColorTheme;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const GRAY: Rgb = Rgb::new(136, 136, 136);
    pub const GREEN: Rgb = Rgb::new(0, 255, 0);
    pub const RED: Rgb = Rgb::new(255, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Source-over blend of `self` at `alpha` (0..=255) onto `dst`.
    pub fn blend_over(self, dst: Rgb, alpha: u8) -> Rgb {
        let a = alpha as u16;
        let mix = |s: u8, d: u8| ((s as u16 * a + d as u16 * (255 - a) + 127) / 255) as u8;
        Rgb::new(mix(self.r, dst.r), mix(self.g, dst.g), mix(self.b, dst.b))
    }
}

/// Background treatment of the text field for a theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackgroundStyle {
    WhiteField,
    BlackField,
    MatrixField,
    SkyField,
    DraculaField,
}

impl BackgroundStyle {
    /// Flat fill color for hosts that cannot render the styled field.
    pub const fn fill(self) -> Rgb {
        match self {
            BackgroundStyle::WhiteField => Rgb::WHITE,
            BackgroundStyle::BlackField => Rgb::BLACK,
            BackgroundStyle::MatrixField => Rgb::new(0, 16, 0),
            BackgroundStyle::SkyField => Rgb::new(204, 229, 255),
            BackgroundStyle::DraculaField => Rgb::new(24, 0, 0),
        }
    }
}

/// Color set applied atomically when a theme is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: BackgroundStyle,
    pub text: Rgb,
    pub highlight: Rgb,
    pub gutter_number: Rgb,
}

/// Alpha applied to the current line highlight.
pub const HIGHLIGHT_ALPHA: u8 = 48;

pub const PALETTES: [Palette; 5] = [
    // classic
    Palette {
        background: BackgroundStyle::WhiteField,
        text: Rgb::BLACK,
        highlight: Rgb::BLACK,
        gutter_number: Rgb::GRAY,
    },
    // negative
    Palette {
        background: BackgroundStyle::BlackField,
        text: Rgb::WHITE,
        highlight: Rgb::WHITE,
        gutter_number: Rgb::GRAY,
    },
    // matrix
    Palette {
        background: BackgroundStyle::MatrixField,
        text: Rgb::GREEN,
        highlight: Rgb::GREEN,
        gutter_number: Rgb::new(0, 128, 0),
    },
    // sky
    Palette {
        background: BackgroundStyle::SkyField,
        text: Rgb::new(0, 0, 64),
        highlight: Rgb::new(0, 0, 64),
        gutter_number: Rgb::new(0, 128, 255),
    },
    // dracula
    Palette {
        background: BackgroundStyle::DraculaField,
        text: Rgb::RED,
        highlight: Rgb::RED,
        gutter_number: Rgb::new(192, 0, 0),
    },
];

pub fn palette_for(theme: ColorTheme) -> &'static Palette {
    &PALETTES[theme.index()]
}

/// Color, alpha and text size used for one kind of draw call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paint {
    pub color: Rgb,
    pub alpha: u8,
    pub text_size: f32,
}

impl Paint {
    pub const fn new(color: Rgb) -> Self {
        Self {
            color,
            alpha: 255,
            text_size: 0.0,
        }
    }

    pub const fn with_alpha(mut self, alpha: u8) -> Self {
        self.alpha = alpha;
        self
    }

    pub const fn with_text_size(mut self, text_size: f32) -> Self {
        self.text_size = text_size;
        self
    }
}

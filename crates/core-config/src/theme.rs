//! Color theme selector.
//!
//! The settings file names a theme by string. Parsing is strict through
//! `FromStr` (returns [`UnknownTheme`]) and lenient through deserialization,
//! where any unrecognized name resolves to `Classic` with a warning.

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(from = "String")]
pub enum ColorTheme {
    #[default]
    Classic,
    Negative,
    Matrix,
    Sky,
    Dracula,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown color theme `{0}`")]
pub struct UnknownTheme(pub String);

impl ColorTheme {
    pub const ALL: [ColorTheme; 5] = [
        ColorTheme::Classic,
        ColorTheme::Negative,
        ColorTheme::Matrix,
        ColorTheme::Sky,
        ColorTheme::Dracula,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            ColorTheme::Classic => "classic",
            ColorTheme::Negative => "negative",
            ColorTheme::Matrix => "matrix",
            ColorTheme::Sky => "sky",
            ColorTheme::Dracula => "dracula",
        }
    }

    /// Position in [`ColorTheme::ALL`], usable as a table index.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Next theme in table order, wrapping around.
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    /// Lenient lookup used for stored settings: unknown names map to `Classic`.
    pub fn from_setting(value: &str) -> Self {
        value.parse().unwrap_or_else(|e: UnknownTheme| {
            warn!(target: "config", value = %e.0, "unknown_color_theme_using_classic");
            ColorTheme::Classic
        })
    }
}

impl FromStr for ColorTheme {
    type Err = UnknownTheme;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "classic" => Ok(ColorTheme::Classic),
            "negative" | "dark" | "black" => Ok(ColorTheme::Negative),
            "matrix" => Ok(ColorTheme::Matrix),
            "sky" => Ok(ColorTheme::Sky),
            "dracula" => Ok(ColorTheme::Dracula),
            _ => Err(UnknownTheme(s.to_string())),
        }
    }
}

impl From<String> for ColorTheme {
    fn from(value: String) -> Self {
        ColorTheme::from_setting(&value)
    }
}

impl fmt::Display for ColorTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

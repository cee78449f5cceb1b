//! Host-neutral input events consumed by the editor view.
//!
//! Hosts translate their native input (terminal events, touch streams) into
//! these types. Gesture recognition itself belongs to the host: the view only
//! sees already classified gestures.

use std::fmt;

/// Classified touch / pointer gestures. Coordinates are view pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    Down { x: f32, y: f32 },
    ShowPress { x: f32, y: f32 },
    SingleTapUp { x: f32, y: f32 },
    LongPress { x: f32, y: f32 },
    /// Drag in progress; distances are the delta since the previous scroll event.
    Scroll { distance_x: f32, distance_y: f32 },
    /// Finger released with velocity in pixels per second (finger direction,
    /// so positive `velocity_y` means the finger moved down).
    Fling { velocity_x: f32, velocity_y: f32 },
}

impl Gesture {
    pub const fn name(&self) -> &'static str {
        match self {
            Gesture::Down { .. } => "down",
            Gesture::ShowPress { .. } => "show_press",
            Gesture::SingleTapUp { .. } => "single_tap_up",
            Gesture::LongPress { .. } => "long_press",
            Gesture::Scroll { .. } => "scroll",
            Gesture::Fling { .. } => "fling",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Esc,
    Backspace,
    Delete,
    Tab,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    Menu,
    F(u8),
}

impl Key {
    /// Directional pad keys (arrows). Hosts route these to caret movement.
    pub const fn is_navigation(&self) -> bool {
        matches!(self, Key::Up | Key::Down | Key::Left | Key::Right)
    }
}

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct KeyModifiers: u8 {
        const CTRL = 0b0000_0001;
        const ALT  = 0b0000_0010;
        const SHIFT= 0b0000_0100;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyInput {
    pub key: Key,
    pub mods: KeyModifiers,
}

impl KeyInput {
    pub const fn plain(key: Key) -> Self {
        Self {
            key,
            mods: KeyModifiers::empty(),
        }
    }

    pub const fn ctrl(key: Key) -> Self {
        Self {
            key,
            mods: KeyModifiers::CTRL,
        }
    }

    pub fn has_ctrl(&self) -> bool {
        self.mods.contains(KeyModifiers::CTRL)
    }
}

impl fmt::Display for KeyInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}{:?}", self.key, self.mods)
    }
}

/// Everything a host feeds into its event loop.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Key(KeyInput),
    Gesture(Gesture),
    /// Mouse wheel notch; positive `rows` scrolls content toward the end.
    Wheel { rows: i32 },
    Resize { cols: u16, rows: u16 },
}

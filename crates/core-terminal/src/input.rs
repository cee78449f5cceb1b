//! crossterm event translation.
//!
//! Maps raw terminal events onto the host-neutral [`InputEvent`] vocabulary.
//! The terminal has no touch screen, so pointer gestures are synthesized from
//! mouse reports: a left button press is a `Down`, its release a
//! `SingleTapUp`. Gesture coordinates are screen pixels on the virtual grid.

use crate::{CELL_HEIGHT, CELL_WIDTH};
use core_events::{Gesture, InputEvent, Key, KeyInput, KeyModifiers};
use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers as CtKeyModifiers, MouseButton,
    MouseEvent, MouseEventKind,
};

/// Rows scrolled per wheel notch.
pub const WHEEL_ROWS: i32 = 3;

pub fn translate(event: &Event) -> Vec<InputEvent> {
    match event {
        Event::Key(key) => translate_key(key)
            .map(InputEvent::Key)
            .into_iter()
            .collect(),
        Event::Mouse(mouse) => translate_mouse(mouse),
        Event::Resize(cols, rows) => vec![InputEvent::Resize {
            cols: *cols,
            rows: *rows,
        }],
        _ => Vec::new(),
    }
}

pub fn translate_key(event: &KeyEvent) -> Option<KeyInput> {
    if event.kind == KeyEventKind::Release {
        return None;
    }
    let key = match event.code {
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Enter => Key::Enter,
        KeyCode::Esc => Key::Esc,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        KeyCode::Tab => Key::Tab,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        KeyCode::Menu => Key::Menu,
        KeyCode::F(n) => Key::F(n),
        _ => return None,
    };
    let mut mods = KeyModifiers::empty();
    if event.modifiers.contains(CtKeyModifiers::CONTROL) {
        mods |= KeyModifiers::CTRL;
    }
    if event.modifiers.contains(CtKeyModifiers::ALT) {
        mods |= KeyModifiers::ALT;
    }
    if event.modifiers.contains(CtKeyModifiers::SHIFT) {
        mods |= KeyModifiers::SHIFT;
    }
    Some(KeyInput { key, mods })
}

fn translate_mouse(event: &MouseEvent) -> Vec<InputEvent> {
    let x = event.column as f32 * CELL_WIDTH as f32;
    let y = event.row as f32 * CELL_HEIGHT as f32;
    match event.kind {
        MouseEventKind::ScrollDown => vec![InputEvent::Wheel { rows: WHEEL_ROWS }],
        MouseEventKind::ScrollUp => vec![InputEvent::Wheel { rows: -WHEEL_ROWS }],
        MouseEventKind::Down(MouseButton::Left) => {
            vec![InputEvent::Gesture(Gesture::Down { x, y })]
        }
        MouseEventKind::Up(MouseButton::Left) => {
            vec![InputEvent::Gesture(Gesture::SingleTapUp { x, y })]
        }
        _ => Vec::new(),
    }
}

/// Screen cell under a gesture position.
pub fn cell_at(x: f32, y: f32) -> (u16, u16) {
    (
        (x.max(0.0) as i32 / CELL_WIDTH) as u16,
        (y.max(0.0) as i32 / CELL_HEIGHT) as u16,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode, modifiers: CtKeyModifiers) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: CtKeyModifiers::NONE,
        })
    }

    #[test]
    fn ctrl_chord() {
        let ev = translate(&key(KeyCode::Char('s'), CtKeyModifiers::CONTROL));
        assert_eq!(ev, vec![InputEvent::Key(KeyInput::ctrl(Key::Char('s')))]);
    }

    #[test]
    fn function_keys_pass_through() {
        let ev = translate(&key(KeyCode::F(2), CtKeyModifiers::NONE));
        assert_eq!(ev, vec![InputEvent::Key(KeyInput::plain(Key::F(2)))]);
    }

    #[test]
    fn key_release_is_dropped() {
        let ev = Event::Key(KeyEvent {
            code: KeyCode::Char('a'),
            modifiers: CtKeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        });
        assert!(translate(&ev).is_empty());
    }

    #[test]
    fn wheel_and_clicks() {
        assert_eq!(
            translate(&mouse(MouseEventKind::ScrollDown, 0, 0)),
            vec![InputEvent::Wheel { rows: 3 }]
        );
        assert_eq!(
            translate(&mouse(MouseEventKind::ScrollUp, 0, 0)),
            vec![InputEvent::Wheel { rows: -3 }]
        );
        assert_eq!(
            translate(&mouse(MouseEventKind::Down(MouseButton::Left), 4, 2)),
            vec![InputEvent::Gesture(Gesture::Down { x: 32.0, y: 32.0 })]
        );
        assert_eq!(
            translate(&mouse(MouseEventKind::Up(MouseButton::Left), 4, 2)),
            vec![InputEvent::Gesture(Gesture::SingleTapUp { x: 32.0, y: 32.0 })]
        );
        assert!(translate(&mouse(MouseEventKind::Moved, 1, 1)).is_empty());
    }

    #[test]
    fn resize_passes_through() {
        assert_eq!(
            translate(&Event::Resize(80, 24)),
            vec![InputEvent::Resize { cols: 80, rows: 24 }]
        );
    }

    #[test]
    fn gesture_position_maps_back_to_cell() {
        assert_eq!(cell_at(32.0, 32.0), (4, 2));
        assert_eq!(cell_at(-5.0, 3.0), (0, 0));
    }
}

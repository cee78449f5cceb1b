mod common;

use common::{MockHost, RecordingSurface, ScriptedAnimator, numbered_lines};
use core_config::Settings;
use core_events::{Gesture, Key, KeyInput};
use core_render::{EditorView, Point, ScrollAnimator, ScrollBounds};

fn fling(vx: f32, vy: f32) -> Gesture {
    Gesture::Fling {
        velocity_x: vx,
        velocity_y: vy,
    }
}

#[test]
fn fling_forwards_negated_velocity_and_bounds() {
    let mut host = MockHost::new(&numbered_lines(50), 200, 100);
    let mut view: EditorView<ScriptedAnimator> = EditorView::new(&mut host, 1.0, Settings::default());
    view.draw(&mut host, &mut RecordingSurface::default());
    let max = view.max_scroll().expect("fling enabled");
    host.scroll = Point::new(0, 40);
    let redraws_before = host.redraws;

    assert!(view.on_gesture(&mut host, fling(100.0, -900.5)));

    let scroller = view.scroller().expect("animator present");
    assert_eq!(
        scroller.flings,
        vec![(
            Point::new(0, 40),
            Point::new(-100, 900),
            ScrollBounds::from_origin(max)
        )]
    );
    assert_eq!(host.redraws, redraws_before + 1);
}

#[test]
fn compute_scroll_applies_animator_offsets_until_settled() {
    let mut host = MockHost::new(&numbered_lines(200), 200, 100);
    let mut view: EditorView<ScriptedAnimator> = EditorView::new(&mut host, 1.0, Settings::default());
    view.draw(&mut host, &mut RecordingSurface::default());
    view.on_gesture(&mut host, fling(0.0, -2000.0));

    assert!(view.compute_scroll(&mut host));
    assert_eq!(host.scroll, Point::new(0, 100));
    assert!(view.compute_scroll(&mut host));
    assert_eq!(host.scroll, Point::new(0, 200));
    assert!(!view.compute_scroll(&mut host));
    assert_eq!(host.scroll, Point::new(0, 200));
    assert!(view.scroller().is_some_and(|s| s.is_finished()));
    assert_eq!(host.default_scroll_calls, 0);
}

#[test]
fn fling_before_first_draw_is_confined_to_origin() {
    let mut host = MockHost::new(&numbered_lines(200), 200, 100);
    let mut view: EditorView<ScriptedAnimator> = EditorView::new(&mut host, 1.0, Settings::default());
    view.on_gesture(&mut host, fling(0.0, -2000.0));
    assert!(view.compute_scroll(&mut host));
    assert_eq!(host.scroll, Point::ZERO);
}

#[test]
fn fling_disabled_uses_host_default_scrolling() {
    let mut host = MockHost::new(&numbered_lines(50), 200, 100);
    let settings = Settings {
        fling_to_scroll: false,
        ..Settings::default()
    };
    let mut view: EditorView<ScriptedAnimator> = EditorView::new(&mut host, 1.0, settings);
    assert!(view.scroller().is_none());
    assert!(view.on_gesture(&mut host, fling(0.0, -500.0)));
    assert!(!view.compute_scroll(&mut host));
    assert_eq!(host.default_scroll_calls, 1);
    assert_eq!(host.scroll, Point::ZERO);
}

#[test]
fn reapplying_settings_resets_running_fling() {
    let mut host = MockHost::new(&numbered_lines(200), 200, 100);
    let mut view: EditorView<ScriptedAnimator> = EditorView::new(&mut host, 1.0, Settings::default());
    view.draw(&mut host, &mut RecordingSurface::default());
    view.on_gesture(&mut host, fling(0.0, -2000.0));
    view.apply_settings(&mut host, Settings::default());
    assert!(!view.compute_scroll(&mut host));
    assert_eq!(view.max_scroll(), Some(Point::ZERO));
}

#[test]
fn tap_requests_soft_input_only_when_enabled() {
    let mut host = MockHost::new("abc", 200, 100);
    let mut view: EditorView<ScriptedAnimator> = EditorView::new(&mut host, 1.0, Settings::default());
    let tap = Gesture::SingleTapUp { x: 1.0, y: 1.0 };
    assert!(view.on_gesture(&mut host, tap));
    assert_eq!(host.soft_input_requests, 1);
    host.enabled = false;
    assert!(view.on_gesture(&mut host, tap));
    assert_eq!(host.soft_input_requests, 1);
}

#[test]
fn gesture_consumption() {
    let mut host = MockHost::new("abc", 200, 100);
    let mut view: EditorView<ScriptedAnimator> = EditorView::new(&mut host, 1.0, Settings::default());
    assert!(view.on_gesture(&mut host, Gesture::Down { x: 0.0, y: 0.0 }));
    assert!(view.on_gesture(
        &mut host,
        Gesture::Scroll {
            distance_x: 0.0,
            distance_y: 4.0
        }
    ));
    assert!(!view.on_gesture(&mut host, Gesture::LongPress { x: 0.0, y: 0.0 }));
    assert!(!view.on_gesture(&mut host, Gesture::ShowPress { x: 0.0, y: 0.0 }));
}

#[test]
fn keys_are_never_consumed() {
    let mut host = MockHost::new("abc", 200, 100);
    let mut view: EditorView<ScriptedAnimator> = EditorView::new(&mut host, 1.0, Settings::default());
    for key in [Key::Up, Key::Menu, Key::Char('x'), Key::Enter] {
        assert!(!view.on_key(&KeyInput::plain(key)));
    }
}

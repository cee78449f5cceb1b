//! Constant-deceleration fling animator.
//!
//! A fling starts at the current scroll offset with the release velocity and
//! slows down linearly until it stops or runs into the scroll bounds. The
//! position is a pure function of elapsed time, so frames may be polled at
//! any rate without drift.

use core_render::{Point, ScrollAnimator, ScrollBounds};
use std::time::{Duration, Instant};

/// Deceleration applied along the fling direction, in pixels per second².
pub const DECELERATION: f32 = 2000.0;

#[derive(Debug, Clone)]
struct Flight {
    start: Point,
    started_at: Instant,
    /// Unit direction scaled by the initial speed, pixels per second.
    velocity: (f32, f32),
    duration: Duration,
    bounds: ScrollBounds,
}

impl Flight {
    fn position_at(&self, elapsed: Duration) -> Point {
        let t = elapsed.min(self.duration).as_secs_f32();
        let speed = (self.velocity.0.powi(2) + self.velocity.1.powi(2)).sqrt();
        let (dx, dy) = if speed > 0.0 {
            // distance travelled along the path: v*t - a*t²/2
            let travelled = speed * t - 0.5 * DECELERATION * t * t;
            (
                self.velocity.0 / speed * travelled,
                self.velocity.1 / speed * travelled,
            )
        } else {
            (0.0, 0.0)
        };
        self.bounds.clamp(Point::new(
            self.start.x.saturating_add(dx.round() as i32),
            self.start.y.saturating_add(dy.round() as i32),
        ))
    }
}

#[derive(Debug, Clone, Default)]
pub struct FrictionScroller {
    flight: Option<Flight>,
}

impl FrictionScroller {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offset at `now`, finishing the fling once its duration has elapsed or
    /// it rests against a bound. The final position is reported once.
    pub fn compute_offset_at(&mut self, now: Instant) -> Option<Point> {
        let flight = self.flight.as_ref()?;
        let elapsed = now.saturating_duration_since(flight.started_at);
        let pos = flight.position_at(elapsed);
        let next = flight.position_at(elapsed + Duration::from_millis(16));
        if elapsed >= flight.duration || (pos == next && elapsed > Duration::ZERO) {
            tracing::trace!(target: "terminal.fling", x = pos.x, y = pos.y, "fling_settled");
            self.flight = None;
        }
        Some(pos)
    }

    /// Fling started at `started_at`; used by tests to pin the clock.
    pub fn fling_at(
        &mut self,
        start: Point,
        velocity: Point,
        bounds: ScrollBounds,
        started_at: Instant,
    ) {
        let v = (velocity.x as f32, velocity.y as f32);
        let speed = (v.0.powi(2) + v.1.powi(2)).sqrt();
        if speed == 0.0 {
            self.flight = None;
            return;
        }
        self.flight = Some(Flight {
            start: bounds.clamp(start),
            started_at,
            velocity: v,
            duration: Duration::from_secs_f32(speed / DECELERATION),
            bounds,
        });
    }
}

impl ScrollAnimator for FrictionScroller {
    fn fling(&mut self, start: Point, velocity: Point, bounds: ScrollBounds) {
        self.fling_at(start, velocity, bounds, Instant::now());
    }

    fn compute_offset(&mut self) -> Option<Point> {
        self.compute_offset_at(Instant::now())
    }

    fn is_finished(&self) -> bool {
        self.flight.is_none()
    }
}

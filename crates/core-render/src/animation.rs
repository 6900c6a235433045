//! Indicator animation.
//!
//! The control hands out `IndicatorTransition`s; the animator turns them into
//! per-tick geometry samples. A transition that arrives mid-flight starts from
//! the currently displayed geometry, not from the previous target, so the bar
//! never jumps (last writer wins).

use core_model::IndicatorGeometry;
use core_state::IndicatorTransition;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy)]
struct Running {
    from: IndicatorGeometry,
    to: IndicatorGeometry,
    start: Instant,
    duration: Duration,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct IndicatorAnimator {
    shown: IndicatorGeometry,
    running: Option<Running>,
}

/// Cubic ease-in-out on `[0, 1]`.
pub fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

impl IndicatorAnimator {
    pub fn new(initial: IndicatorGeometry) -> Self {
        Self {
            shown: initial,
            running: None,
        }
    }

    /// Geometry drawn by the last `sample`/`snap`.
    pub fn shown(&self) -> IndicatorGeometry {
        self.shown
    }

    pub fn is_animating(&self) -> bool {
        self.running.is_some()
    }

    /// Final geometry of the running animation, or the shown one.
    pub fn target(&self) -> IndicatorGeometry {
        self.running.map(|r| r.to).unwrap_or(self.shown)
    }

    pub fn snap(&mut self, to: IndicatorGeometry) {
        self.running = None;
        self.shown = to;
    }

    /// Begin `transition` at `now`. Non-animated or zero-length transitions
    /// snap immediately.
    pub fn start(&mut self, transition: &IndicatorTransition, now: Instant) {
        if !transition.animated || transition.duration.is_zero() || transition.is_noop() {
            self.snap(transition.to);
            return;
        }
        let from = self.sample(now);
        self.running = Some(Running {
            from,
            to: transition.to,
            start: now,
            duration: transition.duration,
        });
        tracing::trace!(
            target: "render.strip",
            from_x = from.x,
            to_x = transition.to.x,
            duration_ms = transition.duration.as_millis() as u64,
            "indicator_animation_started"
        );
    }

    /// Advance to `now` and return the geometry to draw. Finishes the
    /// animation once its duration has elapsed.
    pub fn sample(&mut self, now: Instant) -> IndicatorGeometry {
        if let Some(r) = self.running {
            let elapsed = now.saturating_duration_since(r.start);
            if elapsed >= r.duration {
                self.snap(r.to);
            } else {
                let t = elapsed.as_secs_f32() / r.duration.as_secs_f32();
                self.shown = r.from.lerp(&r.to, ease_in_out(t));
            }
        }
        self.shown
    }
}

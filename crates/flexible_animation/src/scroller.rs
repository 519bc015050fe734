//! Time-based integer offset animation
//!
//! A `Scroller` interpolates from a start offset to `start + delta` over a
//! fixed duration. It owns no clock: the host advances it with the elapsed
//! frame time, so the same code runs under a real frame callback or a
//! deterministic test loop.

use crate::easing::Easing;

/// Animates a single integer offset toward a final value
#[derive(Clone, Debug)]
pub struct Scroller {
    start: i32,
    delta: i32,
    current: i32,
    duration_ms: u32,
    elapsed_ms: f32,
    finished: bool,
    easing: Easing,
}

impl Default for Scroller {
    fn default() -> Self {
        Self::new(Easing::default())
    }
}

impl Scroller {
    /// Create an idle scroller using the given interpolator
    pub fn new(easing: Easing) -> Self {
        Self {
            start: 0,
            delta: 0,
            current: 0,
            duration_ms: 0,
            elapsed_ms: 0.0,
            finished: true,
            easing,
        }
    }

    pub fn set_easing(&mut self, easing: Easing) {
        self.easing = easing;
    }

    /// Begin scrolling from `start` by `delta` over `duration_ms`
    pub fn start_scroll(&mut self, start: i32, delta: i32, duration_ms: u32) {
        self.start = start;
        self.delta = delta;
        self.current = start;
        self.duration_ms = duration_ms;
        self.elapsed_ms = 0.0;
        self.finished = false;

        tracing::trace!(
            "scroller start: {} -> {} over {}ms",
            start,
            self.final_value(),
            duration_ms
        );
    }

    /// Advance the animation by `dt_ms` milliseconds.
    ///
    /// Returns `false` when the scroller was already finished before this
    /// call, `true` when `current()` holds a freshly computed offset.
    pub fn advance(&mut self, dt_ms: f32) -> bool {
        if self.finished {
            return false;
        }

        self.elapsed_ms += dt_ms.max(0.0);

        if self.duration_ms == 0 || self.elapsed_ms >= self.duration_ms as f32 {
            self.current = self.final_value();
            self.finished = true;
        } else {
            let t = self.elapsed_ms / self.duration_ms as f32;
            let eased = self.easing.apply(t);
            self.current = self.start + (eased * self.delta as f32).round() as i32;
        }

        true
    }

    /// Stop where we are; `current()` keeps the last computed offset
    pub fn force_finished(&mut self) {
        self.finished = true;
    }

    /// Stop and jump to the final offset
    pub fn abort_animation(&mut self) {
        self.current = self.final_value();
        self.finished = true;
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn current(&self) -> i32 {
        self.current
    }

    pub fn start_value(&self) -> i32 {
        self.start
    }

    pub fn final_value(&self) -> i32 {
        self.start + self.delta
    }

    pub fn duration_ms(&self) -> u32 {
        self.duration_ms
    }

    pub fn elapsed_ms(&self) -> f32 {
        self.elapsed_ms
    }
}

//! Motion resolver
//!
//! Owns the live offset and everything that moves it: drag deltas, settle
//! animations and explicit placement. Every write goes through a single
//! hook that reports progress and detects landings on resting offsets.
//!
//! `scroll_y` follows the scroll convention of the host view: it is the
//! negated content offset, so the panel lives in `[-close, -extend]` and
//! moving the finger up increases it.

use flexible_animation::Scroller;

use crate::config::{MotionConfig, Offsets, PanelConfig};
use crate::listener::BoxedListener;
use crate::state::{InnerPhase, PhaseEvent, RestingState};

/// Live offset, phase tracking and settle animation for one panel
pub struct MotionResolver {
    offsets: Offsets,
    allow_open: bool,
    allow_extend: bool,
    motion: MotionConfig,
    /// Current scroll position (negated content offset)
    scroll_y: i32,
    /// `None` until the host places the panel
    phase: Option<InnerPhase>,
    resting: Option<RestingState>,
    scroller: Scroller,
    listener: Option<BoxedListener>,
}

impl Default for MotionResolver {
    fn default() -> Self {
        Self::new(&PanelConfig::default())
    }
}

impl std::fmt::Debug for MotionResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MotionResolver")
            .field("offsets", &self.offsets)
            .field("allow_open", &self.allow_open)
            .field("allow_extend", &self.allow_extend)
            .field("scroll_y", &self.scroll_y)
            .field("phase", &self.phase)
            .field("resting", &self.resting)
            .field("animating", &!self.scroller.is_finished())
            .field("has_listener", &self.listener.is_some())
            .finish()
    }
}

impl MotionResolver {
    pub fn new(config: &PanelConfig) -> Self {
        let mut resolver = Self {
            offsets: Offsets::default(),
            allow_open: false,
            allow_extend: false,
            motion: config.motion,
            scroll_y: 0,
            phase: None,
            resting: None,
            scroller: Scroller::new(config.motion.easing),
            listener: None,
        };
        resolver.configure(config);
        resolver
    }

    /// Apply offsets, capability flags and motion parameters.
    ///
    /// The live offset is left alone; hosts re-place the panel afterwards.
    pub fn configure(&mut self, config: &PanelConfig) {
        self.set_offsets(config.resolved_offsets());
        self.allow_open = config.allow_open;
        self.allow_extend = config.allow_extend;
        self.motion = config.motion;
        self.scroller.set_easing(config.motion.easing);
    }

    pub fn set_offsets(&mut self, offsets: Offsets) {
        if !offsets.is_ordered() {
            tracing::warn!(
                "panel offsets out of order (close={}, open={}, extend={}); resting states may stick",
                offsets.close,
                offsets.open,
                offsets.extend
            );
        } else if !offsets.has_extend_range() {
            tracing::warn!(
                "open and extend offsets coincide at {}; open/extend transitions disabled",
                offsets.open
            );
        }
        self.offsets = offsets;
    }

    pub fn offsets(&self) -> Offsets {
        self.offsets
    }

    pub fn set_allow_open(&mut self, allow: bool) {
        self.allow_open = allow;
    }

    pub fn set_allow_extend(&mut self, allow: bool) {
        self.allow_extend = allow;
    }

    pub fn allow_open(&self) -> bool {
        self.allow_open
    }

    pub fn allow_extend(&self) -> bool {
        self.allow_extend
    }

    pub fn scroll_y(&self) -> i32 {
        self.scroll_y
    }

    pub fn phase(&self) -> Option<InnerPhase> {
        self.phase
    }

    pub fn resting_state(&self) -> Option<RestingState> {
        self.resting
    }

    pub fn is_animating(&self) -> bool {
        !self.scroller.is_finished()
    }

    pub fn set_listener(&mut self, listener: Option<BoxedListener>) {
        self.listener = listener;
    }

    /// Forward a nested-scroll hint to the listener
    pub fn dispatch_child_scroll(&mut self, top: i32) {
        if let Some(listener) = self.listener.as_mut() {
            listener.on_child_scroll_hint(top);
        }
    }

    /// Override the resting state without moving (release normalization)
    pub(crate) fn mark_resting(&mut self, state: RestingState) {
        if self.resting != Some(state) {
            tracing::debug!("resting state normalized to {}", state);
        }
        self.resting = Some(state);
    }

    // ========================================================================
    // Offset writes
    // ========================================================================

    /// Progress value for a scroll position, or `None` when open and extend
    /// coincide.
    ///
    /// Between extend and open this runs 0..1; past open it runs 0..-1
    /// toward close.
    pub fn progress_at(&self, scroll_y: i32) -> Option<f32> {
        let o = self.offsets;
        if !o.has_extend_range() {
            return None;
        }

        let live = (-scroll_y) as f32;
        let progress = if live <= o.open as f32 {
            (live - o.extend as f32) / (o.open - o.extend) as f32
        } else {
            (live - o.open as f32) / (o.open - o.close) as f32
        };

        progress.is_finite().then_some(progress)
    }

    pub fn progress(&self) -> Option<f32> {
        self.progress_at(self.scroll_y)
    }

    /// Write the live offset, emit progress and detect landings
    fn set_scroll_y(&mut self, y: i32) {
        self.scroll_y = y;

        if let Some(progress) = self.progress_at(y) {
            if let Some(listener) = self.listener.as_mut() {
                listener.on_progress_changed(progress);
            }
        }

        let Some(state) = self.offsets.resting_at(-y) else {
            return;
        };

        let next = match self.phase {
            Some(phase) => phase.on_event(PhaseEvent::Landed(state)),
            None => Some(state.phase()),
        };

        if let Some(next) = next {
            tracing::debug!("panel settled at {} (scroll_y={})", state, y);
            self.phase = Some(next);
            self.resting = Some(state);
            if let Some(listener) = self.listener.as_mut() {
                listener.on_settled(state);
            }
        }
    }

    fn send(&mut self, event: PhaseEvent) {
        let next = match self.phase {
            Some(phase) => phase.on_event(event),
            None => match event {
                PhaseEvent::DragStarted => Some(InnerPhase::Dragging),
                PhaseEvent::AnimationStarted => Some(InnerPhase::Animating),
                PhaseEvent::Landed(state) | PhaseEvent::Placed(state) => Some(state.phase()),
            },
        };

        if let Some(next) = next {
            tracing::trace!("phase {:?} -> {:?}", self.phase, next);
            self.phase = Some(next);
        }
    }

    // ========================================================================
    // Dragging
    // ========================================================================

    /// Move by a drag delta (positive delta = pointer moved toward close).
    ///
    /// Aborts a running animation. The result never passes extend, never
    /// passes open when extending is not allowed, and never passes close.
    pub fn drag_by(&mut self, delta: i32) {
        if self.is_animating() {
            tracing::debug!("drag aborted animation at scroll_y={}", self.scroll_y);
            self.scroller.force_finished();
        }

        self.send(PhaseEvent::DragStarted);

        let o = self.offsets;
        let ceiling = if self.allow_extend {
            -o.extend
        } else {
            (-o.open).max(self.scroll_y)
        };
        let floor = (-o.close).min(self.scroll_y);
        let target = (self.scroll_y - delta).min(ceiling).max(floor);

        tracing::trace!(
            "drag delta={} scroll_y {} -> {}",
            delta,
            self.scroll_y,
            target
        );
        self.set_scroll_y(target);
    }

    /// Resting state a plain release (no fling) settles toward
    pub fn release_target(&self) -> RestingState {
        let o = self.offsets;
        let y = self.scroll_y as f32;

        let close_threshold = -((o.open - o.extend) as f32 * self.motion.close_factor);
        if y > close_threshold {
            return RestingState::Extended;
        }

        let extend_threshold =
            -((o.close - o.open) as f32 * self.motion.extend_factor + o.open as f32);
        if y > extend_threshold {
            RestingState::Open
        } else {
            RestingState::Closed
        }
    }

    /// Settle after a drag ends without a fling.
    ///
    /// When the chosen target is gated off, falls back toward closed so the
    /// panel never stays parked between offsets.
    pub fn complete_release(&mut self) -> Option<RestingState> {
        let target = self.release_target();
        tracing::debug!(
            "release at scroll_y={} resolves to {}",
            self.scroll_y,
            target
        );

        target
            .fallbacks()
            .iter()
            .copied()
            .find(|candidate| self.animate_to(*candidate))
    }

    // ========================================================================
    // Settle animation
    // ========================================================================

    pub fn scroll_to_extend(&mut self) -> bool {
        self.animate_to(RestingState::Extended)
    }

    pub fn scroll_to_open(&mut self) -> bool {
        self.animate_to(RestingState::Open)
    }

    pub fn scroll_to_close(&mut self) -> bool {
        self.animate_to(RestingState::Closed)
    }

    /// Start a settle animation toward `target`.
    ///
    /// Returns `false` (and does nothing) when the target is gated off,
    /// already the resting phase, degenerate, or already reached.
    pub fn animate_to(&mut self, target: RestingState) -> bool {
        let allowed = match target {
            RestingState::Extended => self.allow_extend,
            RestingState::Open => self.allow_open,
            RestingState::Closed => true,
        };
        if !allowed {
            tracing::trace!("scroll to {} not allowed", target);
            return false;
        }

        if self.phase == Some(target.phase()) {
            return false;
        }

        let degenerate = match target {
            RestingState::Extended | RestingState::Open => !self.offsets.has_extend_range(),
            RestingState::Closed => !self.offsets.has_close_range(),
        };
        if degenerate {
            tracing::trace!("scroll to {} skipped: degenerate range", target);
            return false;
        }

        let target_offset = self.offsets.get(target);
        let dy = -self.scroll_y - target_offset;
        if dy == 0 {
            return false;
        }

        let duration = self.duration_for(target_offset, dy);
        self.send(PhaseEvent::AnimationStarted);
        self.scroller.start_scroll(self.scroll_y, dy, duration);
        self.resting = Some(target);

        tracing::debug!(
            "animating to {}: scroll_y {} -> {} over {}ms",
            target,
            self.scroll_y,
            -target_offset,
            duration
        );
        true
    }

    /// Settle duration for moving `dy` toward `target_offset`.
    ///
    /// Linear between the configured bounds, scaled by the distance relative
    /// to the span between the target and the resting offset on the far side
    /// of the live position.
    pub fn duration_for(&self, target_offset: i32, dy: i32) -> u32 {
        let o = self.offsets;
        let live = -self.scroll_y;

        let source = if live > target_offset {
            if live <= o.open {
                o.open
            } else {
                o.close
            }
        } else if live >= o.open {
            o.open
        } else {
            o.extend
        };

        let min = self.motion.min_duration_ms;
        let max = self.motion.max_duration_ms.max(min);
        let range = u64::from(max - min);

        let span = u64::from((target_offset - source).unsigned_abs());
        if span == 0 {
            return max;
        }

        let extra = (range * u64::from(dy.unsigned_abs()) / span).min(range);
        min + extra as u32
    }

    /// Advance a running settle animation by `dt_ms`.
    ///
    /// Returns `true` while another frame is needed.
    pub fn tick(&mut self, dt_ms: f32) -> bool {
        if !self.scroller.advance(dt_ms) {
            return false;
        }

        let y = self.scroller.current();
        if y == self.scroller.start_value() {
            // No visible movement yet
            return !self.scroller.is_finished();
        }
        self.set_scroll_y(y);

        // Stop on the first resting offset reached
        if self.offsets.resting_at(-y).is_some() {
            self.scroller.abort_animation();
        }

        !self.scroller.is_finished()
    }

    // ========================================================================
    // Explicit placement
    // ========================================================================

    /// Jump to closed without animation
    pub fn set_to_close(&mut self) {
        self.place(RestingState::Closed);
    }

    /// Jump to open without animation
    pub fn set_to_open(&mut self) {
        self.place(RestingState::Open);
    }

    /// Close and revoke both capability flags
    pub fn reset(&mut self) {
        self.set_to_close();
        self.allow_extend = false;
        self.allow_open = false;
    }

    fn place(&mut self, state: RestingState) {
        if self.is_animating() {
            self.scroller.force_finished();
        }
        self.set_scroll_y(-self.offsets.get(state));
        self.send(PhaseEvent::Placed(state));
        self.resting = Some(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listener::PanelEvent;
    use std::sync::{Arc, Mutex};

    fn resolver(close: i32, open: i32, extend: i32) -> MotionResolver {
        let config = PanelConfig::new(Offsets::new(close, open, extend))
            .allow_open(true)
            .allow_extend(true);
        MotionResolver::new(&config)
    }

    fn recording(resolver: &mut MotionResolver) -> Arc<Mutex<Vec<PanelEvent>>> {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        resolver.set_listener(Some(Box::new(move |event: PanelEvent| {
            sink.lock().unwrap().push(event);
        })));
        events
    }

    fn settle(resolver: &mut MotionResolver) -> usize {
        let mut frames = 0;
        while resolver.tick(16.0) {
            frames += 1;
            assert!(frames < 1000, "animation never settled");
        }
        frames
    }

    #[test]
    fn test_unplaced_resolver_has_no_state() {
        let resolver = resolver(300, 150, 0);
        assert_eq!(resolver.resting_state(), None);
        assert_eq!(resolver.phase(), None);
    }

    #[test]
    fn test_release_target_thresholds() {
        let mut resolver = resolver(300, 150, 0);
        resolver.set_to_open();

        // close threshold -75, extend threshold -270
        resolver.drag_by(10);
        assert_eq!(resolver.scroll_y(), -160);
        assert_eq!(resolver.release_target(), RestingState::Open);

        resolver.set_to_close();
        resolver.drag_by(-20);
        assert_eq!(resolver.scroll_y(), -280);
        assert_eq!(resolver.release_target(), RestingState::Closed);

        resolver.set_to_open();
        resolver.drag_by(-80);
        assert_eq!(resolver.scroll_y(), -70);
        assert_eq!(resolver.release_target(), RestingState::Extended);

        resolver.set_to_open();
        resolver.drag_by(-75);
        assert_eq!(resolver.scroll_y(), -75);
        assert_eq!(resolver.release_target(), RestingState::Open);
    }

    #[test]
    fn test_progress_formula() {
        let resolver = resolver(300, 150, 0);
        assert_eq!(resolver.progress_at(0), Some(0.0));
        assert_eq!(resolver.progress_at(-75), Some(0.5));
        assert_eq!(resolver.progress_at(-150), Some(1.0));
        assert_eq!(resolver.progress_at(-225), Some(-0.5));
        assert_eq!(resolver.progress_at(-300), Some(-1.0));
    }

    #[test]
    fn test_progress_disabled_when_open_equals_extend() {
        let resolver = resolver(300, 100, 100);
        assert_eq!(resolver.progress_at(-200), None);
    }

    #[test]
    fn test_duration_interpolates_by_span() {
        let mut resolver = resolver(300, 150, 0);
        resolver.set_to_open();
        resolver.drag_by(24);
        assert_eq!(resolver.scroll_y(), -174);

        // toward close: dy 126 over the 150 close..open span
        assert_eq!(resolver.duration_for(300, -126), 352);
        // back to open: dy 24 over the same span
        assert_eq!(resolver.duration_for(150, 24), 148);
    }

    #[test]
    fn test_duration_full_range() {
        let mut resolver = resolver(300, 150, 0);
        resolver.set_to_close();
        // close -> extend covers the full close..extend span
        assert_eq!(resolver.duration_for(0, 300), 400);
    }

    #[test]
    fn test_animate_to_current_resting_is_noop() {
        let mut resolver = resolver(300, 150, 0);
        resolver.set_to_open();
        let events = recording(&mut resolver);

        assert!(!resolver.scroll_to_open());
        assert!(!resolver.is_animating());
        assert!(events.lock().unwrap().is_empty());
    }

    #[test]
    fn test_animate_respects_capability_flags() {
        let config = PanelConfig::new(Offsets::new(300, 150, 0));
        let mut resolver = MotionResolver::new(&config);
        resolver.set_to_close();

        assert!(!resolver.scroll_to_open());
        assert!(!resolver.scroll_to_extend());

        resolver.set_allow_open(true);
        assert!(resolver.scroll_to_open());
    }

    #[test]
    fn test_animation_settles_once() {
        let mut resolver = resolver(300, 150, 0);
        resolver.set_to_close();
        let events = recording(&mut resolver);

        assert!(resolver.scroll_to_open());
        assert_eq!(resolver.resting_state(), Some(RestingState::Open));
        assert_eq!(resolver.phase(), Some(InnerPhase::Animating));

        let frames = settle(&mut resolver);
        assert!(frames <= 400 / 16 + 1);
        assert_eq!(resolver.scroll_y(), -150);
        assert_eq!(resolver.phase(), Some(InnerPhase::Open));

        let settled: Vec<_> = events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| matches!(e, PanelEvent::Settled(_)))
            .copied()
            .collect();
        assert_eq!(settled, vec![PanelEvent::Settled(RestingState::Open)]);
    }

    #[test]
    fn test_drag_aborts_animation() {
        let mut resolver = resolver(300, 150, 0);
        resolver.set_to_close();
        assert!(resolver.scroll_to_open());
        resolver.tick(16.0);

        resolver.drag_by(0);
        assert!(!resolver.is_animating());
        assert_eq!(resolver.phase(), Some(InnerPhase::Dragging));
        assert!(!resolver.tick(16.0));
    }

    #[test]
    fn test_set_to_aborts_animation() {
        let mut resolver = resolver(300, 150, 0);
        resolver.set_to_close();
        assert!(resolver.scroll_to_extend());
        resolver.tick(16.0);

        resolver.set_to_open();
        assert!(!resolver.is_animating());
        assert_eq!(resolver.scroll_y(), -150);
        assert_eq!(resolver.phase(), Some(InnerPhase::Open));
    }

    #[test]
    fn test_drag_clamps_to_extend_and_close() {
        let mut resolver = resolver(300, 150, 0);
        resolver.set_to_open();
        resolver.drag_by(-500);
        assert_eq!(resolver.scroll_y(), 0);

        resolver.drag_by(900);
        assert_eq!(resolver.scroll_y(), -300);
    }

    #[test]
    fn test_drag_stops_at_open_without_extend() {
        let config = PanelConfig::new(Offsets::new(300, 150, 0)).allow_open(true);
        let mut resolver = MotionResolver::new(&config);
        resolver.set_to_close();
        resolver.drag_by(-200);
        assert_eq!(resolver.scroll_y(), -150);
        assert_eq!(resolver.resting_state(), Some(RestingState::Open));
    }

    #[test]
    fn test_degenerate_extend_range_still_settles_closed() {
        let mut resolver = resolver(300, 100, 100);
        resolver.set_to_open();
        let events = recording(&mut resolver);

        assert!(!resolver.scroll_to_extend());
        assert!(resolver.scroll_to_close());
        settle(&mut resolver);

        assert_eq!(resolver.scroll_y(), -300);
        assert_eq!(
            *events.lock().unwrap(),
            vec![PanelEvent::Settled(RestingState::Closed)]
        );
    }

    #[test]
    fn test_reset_closes_and_revokes_flags() {
        let mut resolver = resolver(300, 150, 0);
        resolver.set_to_open();
        resolver.reset();

        assert_eq!(resolver.scroll_y(), -300);
        assert_eq!(resolver.resting_state(), Some(RestingState::Closed));
        assert!(!resolver.allow_open());
        assert!(!resolver.allow_extend());
    }
}

//! Gesture arbiter
//!
//! Decides which pointer sequences belong to the panel and turns them into
//! resolver calls. Hosts feed every event through two passes, mirroring the
//! usual parent/child dispatch contract:
//!
//! 1. [`GestureArbiter::intercept`] runs before children see the event and
//!    answers whether the panel steals the rest of the sequence.
//! 2. [`GestureArbiter::handle_touch`] runs once the panel owns the sequence
//!    and performs the drag, fling and release logic.

use flexible_core::{PointerAction, PointerEvent, VelocityTracker};
use serde::{Deserialize, Serialize};

use crate::config::GestureConfig;
use crate::resolver::MotionResolver;
use crate::state::{InnerPhase, RestingState};

/// How the last completed pointer sequence was interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureKind {
    /// Released without moving the panel
    Tap,
    /// Moved the panel, settled by position on release
    Drag,
    /// Released fast enough to pick the target by direction
    Fling,
}

/// Touch interpretation state for one panel
#[derive(Debug, Clone)]
pub struct GestureArbiter {
    config: GestureConfig,
    child_regions: usize,
    /// Pointer position at the last applied drag step (or at down)
    last_y: f32,
    down_y: f32,
    /// Pointer travelled beyond touch slop during this sequence
    beyond_slop: bool,
    /// A drag step moved the panel during this sequence
    moved_panel: bool,
    tracker: VelocityTracker,
    last_gesture: Option<GestureKind>,
}

impl Default for GestureArbiter {
    fn default() -> Self {
        Self::new(GestureConfig::default(), 1)
    }
}

impl GestureArbiter {
    pub fn new(config: GestureConfig, child_regions: usize) -> Self {
        Self {
            config,
            child_regions,
            last_y: 0.0,
            down_y: 0.0,
            beyond_slop: false,
            moved_panel: false,
            tracker: VelocityTracker::new(config.velocity_horizon_ms),
            last_gesture: None,
        }
    }

    pub fn configure(&mut self, config: GestureConfig, child_regions: usize) {
        if config.velocity_horizon_ms != self.config.velocity_horizon_ms {
            self.tracker = VelocityTracker::new(config.velocity_horizon_ms);
        }
        self.config = config;
        self.child_regions = child_regions;
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    pub fn set_child_regions(&mut self, count: usize) {
        self.child_regions = count;
    }

    pub fn child_regions(&self) -> usize {
        self.child_regions
    }

    pub fn last_gesture(&self) -> Option<GestureKind> {
        self.last_gesture
    }

    fn begin_sequence(&mut self, event: &PointerEvent) {
        self.last_y = event.y;
        self.down_y = event.y;
        self.beyond_slop = false;
        self.moved_panel = false;
        self.tracker.clear();
        self.tracker.add(event.sample());
    }

    fn track(&mut self, event: &PointerEvent) {
        self.tracker.add(event.sample());
        if (event.y - self.down_y).abs() > self.config.touch_slop {
            self.beyond_slop = true;
        }
    }

    // ========================================================================
    // Interception pass
    // ========================================================================

    /// Decide whether the panel takes over the sequence from its children
    pub fn intercept(&mut self, event: &PointerEvent, resolver: &MotionResolver) -> bool {
        let resting = resolver.resting_state();
        let offsets = resolver.offsets();

        match event.action {
            PointerAction::Down => {
                self.begin_sequence(event);

                // Never steal on down; children get a chance to claim it
                let over_content = match resting {
                    Some(RestingState::Open) => event.y < offsets.open as f32,
                    Some(RestingState::Extended) => {
                        event.y < offsets.extend as f32 && self.child_regions > 1
                    }
                    _ => false,
                };
                if over_content {
                    tracing::trace!("down at {:.1} over expanded content", event.y);
                }
            }
            PointerAction::Move => {
                self.track(event);
                let moved = (event.y - self.last_y).abs();
                if matches!(
                    resting,
                    Some(RestingState::Open) | Some(RestingState::Extended)
                ) && moved > self.config.touch_slop
                {
                    tracing::debug!("intercepting drag after {:.1} units", moved);
                    return true;
                }
            }
            // Releases never steal: a short press stays a click on the child
            PointerAction::Up | PointerAction::Cancel => self.track(event),
        }

        false
    }

    // ========================================================================
    // Touch-handling pass
    // ========================================================================

    /// Handle an event owned by the panel. Returns whether it was consumed.
    pub fn handle_touch(&mut self, event: &PointerEvent, resolver: &mut MotionResolver) -> bool {
        match event.action {
            PointerAction::Down => self.handle_down(event, resolver),
            PointerAction::Move => self.handle_move(event, resolver),
            PointerAction::Up | PointerAction::Cancel => self.handle_release(event, resolver),
        }
    }

    fn handle_down(&mut self, event: &PointerEvent, resolver: &MotionResolver) -> bool {
        let Some(resting) = resolver.resting_state() else {
            tracing::trace!("down ignored: panel not placed yet");
            return false;
        };

        let boundary = resolver.offsets().get(resting);
        if event.y < boundary as f32 {
            tracing::trace!(
                "down at {:.1} above {} boundary {}",
                event.y,
                resting,
                boundary
            );
            return false;
        }

        self.begin_sequence(event);
        true
    }

    fn handle_move(&mut self, event: &PointerEvent, resolver: &mut MotionResolver) -> bool {
        self.track(event);

        let delta = self.drag_delta(event.y);

        match resolver.resting_state() {
            Some(RestingState::Closed) if !resolver.allow_open() => return false,
            Some(RestingState::Open) if !resolver.allow_extend() && event.y < self.last_y => {
                return false;
            }
            _ => {}
        }

        if self.at_drag_edge(delta, resolver) {
            return true;
        }

        resolver.drag_by(delta);
        self.moved_panel = true;
        self.last_y = event.y;
        true
    }

    fn handle_release(&mut self, event: &PointerEvent, resolver: &mut MotionResolver) -> bool {
        self.track(event);

        // A drag clamped onto a resting offset has already left Dragging
        let dragged = self.moved_panel || resolver.phase() == Some(InnerPhase::Dragging);

        let mut flung = false;
        if event.action == PointerAction::Up && self.beyond_slop {
            let velocity = self
                .tracker
                .clamped_velocity(self.config.max_fling_velocity);
            if velocity.abs() >= self.config.min_fling_velocity {
                if let Some(target) = self.fling_target(velocity, resolver) {
                    tracing::debug!("fling at {:.0} units/s toward {}", velocity, target);
                    flung = resolver.animate_to(target);
                }
            }
        }

        // Snap the reported state when the release lands next to extend
        if resolver.allow_extend()
            && resolver.offsets().has_extend_range()
            && !resolver.is_animating()
        {
            let scroll_y = resolver.scroll_y();
            let extend = resolver.offsets().extend;
            let gap = (scroll_y.abs() - extend.abs()).abs() as f32;
            if scroll_y < 0 && gap <= self.config.touch_slop {
                resolver.mark_resting(RestingState::Extended);
            }
        }

        self.last_gesture = Some(if flung {
            GestureKind::Fling
        } else if dragged {
            GestureKind::Drag
        } else {
            GestureKind::Tap
        });

        if resolver.phase() == Some(InnerPhase::Dragging) {
            resolver.complete_release();
            return true;
        }

        false
    }

    // ========================================================================
    // Decisions
    // ========================================================================

    /// Panel movement for a pointer at `y`, scaled and capped per event.
    ///
    /// Positive when the pointer moved down (toward close).
    pub fn drag_delta(&self, y: f32) -> i32 {
        let raw = ((y - self.last_y) * self.config.drag_speed_multiplier) as i32;
        let cap = self.config.drag_speed_cap.max(0);
        raw.signum() * raw.abs().min(cap)
    }

    /// Whether a drag step of `delta` would push past an edge.
    ///
    /// The extend edge only applies when extending is allowed; otherwise
    /// the open edge (minus slop) stops upward drags. The close edge always
    /// applies.
    pub fn at_drag_edge(&self, delta: i32, resolver: &MotionResolver) -> bool {
        let scroll_y = resolver.scroll_y();
        let offsets = resolver.offsets();
        let allow_extend = resolver.allow_extend();

        (allow_extend && delta <= 0 && scroll_y >= -offsets.extend)
            || (!allow_extend
                && delta <= 0
                && scroll_y as f32 >= -(offsets.open as f32) - self.config.touch_slop)
            || (delta >= 0 && scroll_y <= -offsets.close)
    }

    /// Target selected by a fling of `velocity` (positive = pointer moving
    /// toward close), or `None` when the fling doesn't decide anything.
    pub fn fling_target(&self, velocity: f32, resolver: &MotionResolver) -> Option<RestingState> {
        let threshold = self.config.fling_threshold;
        let offsets = resolver.offsets();
        let live = -resolver.scroll_y();

        if velocity > threshold {
            match resolver.resting_state() {
                Some(RestingState::Open) if live > offsets.open => Some(RestingState::Closed),
                Some(RestingState::Extended) if live > offsets.extend => Some(RestingState::Open),
                _ => None,
            }
        } else if velocity < -threshold {
            if resolver.scroll_y() <= -offsets.open {
                Some(RestingState::Open)
            } else {
                Some(RestingState::Extended)
            }
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Offsets, PanelConfig};

    fn setup() -> (GestureArbiter, MotionResolver) {
        let config = PanelConfig::new(Offsets::new(300, 150, 0))
            .allow_open(true)
            .allow_extend(true);
        (
            GestureArbiter::new(config.gesture, config.child_regions),
            MotionResolver::new(&config),
        )
    }

    #[test]
    fn test_drag_delta_scaled_and_capped() {
        let (mut arbiter, _) = setup();
        arbiter.last_y = 100.0;

        assert_eq!(arbiter.drag_delta(110.0), 12);
        assert_eq!(arbiter.drag_delta(90.0), -12);
        assert_eq!(arbiter.drag_delta(200.0), 30);
        assert_eq!(arbiter.drag_delta(0.0), -30);
        // truncates toward zero
        assert_eq!(arbiter.drag_delta(100.5), 0);
    }

    #[test]
    fn test_fling_toward_close_from_open() {
        let (arbiter, mut resolver) = setup();
        resolver.set_to_open();
        resolver.drag_by(10);
        assert_eq!(resolver.scroll_y(), -160);

        assert_eq!(
            arbiter.fling_target(100.0, &resolver),
            Some(RestingState::Closed)
        );
        // Below the threshold nothing is decided
        assert_eq!(arbiter.fling_target(80.0, &resolver), None);
    }

    #[test]
    fn test_fling_toward_open_from_extended() {
        let (arbiter, mut resolver) = setup();
        resolver.set_to_open();
        resolver.drag_by(-150);
        assert_eq!(resolver.resting_state(), Some(RestingState::Extended));
        resolver.drag_by(20);

        assert_eq!(
            arbiter.fling_target(500.0, &resolver),
            Some(RestingState::Open)
        );
    }

    #[test]
    fn test_upward_fling_targets() {
        let (arbiter, mut resolver) = setup();
        resolver.set_to_close();
        resolver.drag_by(-30);
        assert_eq!(
            arbiter.fling_target(-100.0, &resolver),
            Some(RestingState::Open)
        );

        resolver.set_to_open();
        resolver.drag_by(-30);
        assert_eq!(
            arbiter.fling_target(-100.0, &resolver),
            Some(RestingState::Extended)
        );
    }

    #[test]
    fn test_intercept_lets_children_keep_content_touches() {
        let (mut arbiter, mut resolver) = setup();
        resolver.set_to_open();

        assert!(!arbiter.intercept(&PointerEvent::down(100.0, 0), &resolver));
        // Still steals once the pointer drags past slop
        assert!(arbiter.intercept(&PointerEvent::moved(120.0, 16), &resolver));
    }

    #[test]
    fn test_intercept_ignores_drags_while_closed() {
        let (mut arbiter, mut resolver) = setup();
        resolver.set_to_close();

        assert!(!arbiter.intercept(&PointerEvent::down(320.0, 0), &resolver));
        assert!(!arbiter.intercept(&PointerEvent::moved(250.0, 16), &resolver));
    }

    #[test]
    fn test_intercept_passes_taps() {
        let (mut arbiter, mut resolver) = setup();
        resolver.set_to_open();

        assert!(!arbiter.intercept(&PointerEvent::down(200.0, 0), &resolver));
        assert!(!arbiter.intercept(&PointerEvent::moved(203.0, 10), &resolver));
        assert!(!arbiter.intercept(&PointerEvent::up(204.0, 20), &resolver));
    }

    #[test]
    fn test_down_rejected_above_boundary() {
        let (mut arbiter, mut resolver) = setup();
        assert!(!arbiter.handle_touch(&PointerEvent::down(400.0, 0), &mut resolver));

        resolver.set_to_close();
        assert!(!arbiter.handle_touch(&PointerEvent::down(250.0, 0), &mut resolver));
        assert!(arbiter.handle_touch(&PointerEvent::down(320.0, 0), &mut resolver));

        resolver.set_to_open();
        assert!(!arbiter.handle_touch(&PointerEvent::down(149.0, 0), &mut resolver));
        assert!(arbiter.handle_touch(&PointerEvent::down(150.0, 0), &mut resolver));
    }

    #[test]
    fn test_move_blocked_when_open_not_allowed() {
        let config = PanelConfig::new(Offsets::new(300, 150, 0));
        let mut arbiter = GestureArbiter::new(config.gesture, 1);
        let mut resolver = MotionResolver::new(&config);
        resolver.set_to_close();

        assert!(arbiter.handle_touch(&PointerEvent::down(320.0, 0), &mut resolver));
        assert!(!arbiter.handle_touch(&PointerEvent::moved(300.0, 16), &mut resolver));
        assert_eq!(resolver.scroll_y(), -300);
    }

    #[test]
    fn test_edge_consumes_without_moving() {
        let (mut arbiter, mut resolver) = setup();
        resolver.set_to_close();

        assert!(arbiter.handle_touch(&PointerEvent::down(320.0, 0), &mut resolver));
        // Dragging further down at the close edge
        assert!(arbiter.handle_touch(&PointerEvent::moved(340.0, 16), &mut resolver));
        assert_eq!(resolver.scroll_y(), -300);
        assert_eq!(resolver.phase(), Some(InnerPhase::Closed));
    }

    #[test]
    fn test_edge_rule_without_extend_uses_open_slop() {
        let config = PanelConfig::new(Offsets::new(300, 150, 0)).allow_open(true);
        let arbiter = GestureArbiter::new(config.gesture, 1);
        let mut resolver = MotionResolver::new(&config);
        resolver.set_to_close();
        resolver.drag_by(-140);
        assert_eq!(resolver.scroll_y(), -160);

        assert!(!arbiter.at_drag_edge(-5, &resolver));
        resolver.drag_by(-3);
        assert_eq!(resolver.scroll_y(), -157);
        assert!(arbiter.at_drag_edge(-5, &resolver));
        assert!(!arbiter.at_drag_edge(5, &resolver));
    }

    #[test]
    fn test_tap_is_classified() {
        let (mut arbiter, mut resolver) = setup();
        resolver.set_to_close();

        assert!(arbiter.handle_touch(&PointerEvent::down(320.0, 0), &mut resolver));
        assert!(!arbiter.handle_touch(&PointerEvent::up(321.0, 50), &mut resolver));
        assert_eq!(arbiter.last_gesture(), Some(GestureKind::Tap));
        assert!(!resolver.is_animating());
    }

    #[test]
    fn test_release_near_extend_marks_extended() {
        let (mut arbiter, mut resolver) = setup();
        resolver.set_to_open();
        resolver.drag_by(-145);
        assert_eq!(resolver.scroll_y(), -5);
        assert_eq!(resolver.resting_state(), Some(RestingState::Open));

        // Slow release: no fling, position decides
        arbiter.begin_sequence(&PointerEvent::down(200.0, 0));
        assert!(arbiter.handle_touch(&PointerEvent::up(200.0, 500), &mut resolver));
        assert_eq!(resolver.resting_state(), Some(RestingState::Extended));
        assert!(resolver.is_animating());
        assert_eq!(arbiter.last_gesture(), Some(GestureKind::Drag));
    }
}

//! Panel facade
//!
//! [`FlexiblePanel`] bundles the arbiter and the resolver behind the surface a
//! host view needs: configuration, the two touch passes, the frame callback
//! and the explicit placement calls.

use flexible_core::PointerEvent;

use crate::arbiter::{GestureArbiter, GestureKind};
use crate::config::{Offsets, PanelConfig};
use crate::listener::PanelListener;
use crate::resolver::MotionResolver;
use crate::state::{InnerPhase, RestingState};

/// A three-position draggable panel
///
/// The panel has no resting state until the host calls
/// [`set_to_close`](Self::set_to_close) or [`set_to_open`](Self::set_to_open).
#[derive(Debug, Default)]
pub struct FlexiblePanel {
    config: PanelConfig,
    arbiter: GestureArbiter,
    resolver: MotionResolver,
}

impl FlexiblePanel {
    pub fn new(config: PanelConfig) -> Self {
        tracing::debug!(
            "creating panel with offsets {:?} (allow_open={}, allow_extend={})",
            config.resolved_offsets(),
            config.allow_open,
            config.allow_extend
        );
        Self {
            arbiter: GestureArbiter::new(config.gesture, config.child_regions),
            resolver: MotionResolver::new(&config),
            config,
        }
    }

    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    /// Replace the whole configuration. The live offset is kept.
    pub fn configure(&mut self, config: PanelConfig) {
        self.arbiter.configure(config.gesture, config.child_regions);
        self.resolver.configure(&config);
        self.config = config;
    }

    /// Set raw resting offsets (before `extra_content_height` is applied)
    pub fn set_offsets(&mut self, offsets: Offsets) {
        self.config.offsets = offsets;
        self.resolver.set_offsets(self.config.resolved_offsets());
    }

    pub fn set_extra_content_height(&mut self, extra: i32) {
        self.config.extra_content_height = extra;
        self.resolver.set_offsets(self.config.resolved_offsets());
    }

    pub fn set_allow_open(&mut self, allow: bool) {
        self.config.allow_open = allow;
        self.resolver.set_allow_open(allow);
    }

    pub fn set_allow_extend(&mut self, allow: bool) {
        self.config.allow_extend = allow;
        self.resolver.set_allow_extend(allow);
    }

    pub fn set_child_regions(&mut self, count: usize) {
        self.config.child_regions = count;
        self.arbiter.set_child_regions(count);
    }

    /// Install the listener, replacing any previous one
    pub fn set_listener<L>(&mut self, listener: L)
    where
        L: PanelListener + Send + 'static,
    {
        self.resolver.set_listener(Some(Box::new(listener)));
    }

    pub fn clear_listener(&mut self) {
        self.resolver.set_listener(None);
    }

    // ========================================================================
    // Input
    // ========================================================================

    /// Interception pass: whether the panel steals the sequence from its
    /// children
    pub fn on_intercept_touch_event(&mut self, event: &PointerEvent) -> bool {
        self.arbiter.intercept(event, &self.resolver)
    }

    /// Touch-handling pass: whether the panel consumed the event
    pub fn on_touch_event(&mut self, event: &PointerEvent) -> bool {
        self.arbiter.handle_touch(event, &mut self.resolver)
    }

    /// Frame callback. Returns `true` while the host should keep ticking.
    pub fn tick(&mut self, elapsed_ms: f32) -> bool {
        self.resolver.tick(elapsed_ms)
    }

    /// Forward a nested-scroll hint to the listener
    pub fn dispatch_child_scroll(&mut self, top: i32) {
        self.resolver.dispatch_child_scroll(top);
    }

    // ========================================================================
    // Placement
    // ========================================================================

    pub fn set_to_close(&mut self) {
        self.resolver.set_to_close();
    }

    pub fn set_to_open(&mut self) {
        self.resolver.set_to_open();
    }

    /// Close and revoke both capability flags
    pub fn reset(&mut self) {
        self.resolver.reset();
        self.config.allow_open = false;
        self.config.allow_extend = false;
    }

    pub fn scroll_to_extend(&mut self) -> bool {
        self.resolver.scroll_to_extend()
    }

    pub fn scroll_to_open(&mut self) -> bool {
        self.resolver.scroll_to_open()
    }

    pub fn scroll_to_close(&mut self) -> bool {
        self.resolver.scroll_to_close()
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn offsets(&self) -> Offsets {
        self.resolver.offsets()
    }

    pub fn allow_open(&self) -> bool {
        self.resolver.allow_open()
    }

    pub fn allow_extend(&self) -> bool {
        self.resolver.allow_extend()
    }

    pub fn scroll_y(&self) -> i32 {
        self.resolver.scroll_y()
    }

    pub fn resting_state(&self) -> Option<RestingState> {
        self.resolver.resting_state()
    }

    pub fn phase(&self) -> Option<InnerPhase> {
        self.resolver.phase()
    }

    pub fn progress(&self) -> Option<f32> {
        self.resolver.progress()
    }

    pub fn is_animating(&self) -> bool {
        self.resolver.is_animating()
    }

    pub fn last_gesture(&self) -> Option<GestureKind> {
        self.arbiter.last_gesture()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listener::PanelEvent;

    #[test]
    fn test_flags_follow_config_updates() {
        let mut panel = FlexiblePanel::new(PanelConfig::new(Offsets::new(300, 150, 0)));
        assert!(!panel.allow_open());

        panel.set_allow_open(true);
        panel.set_allow_extend(true);
        assert!(panel.allow_open());
        assert!(panel.config().allow_extend);

        panel.reset();
        assert!(!panel.allow_open());
        assert!(!panel.config().allow_open);
        assert_eq!(panel.resting_state(), Some(RestingState::Closed));
    }

    #[test]
    fn test_extra_content_height_updates_offsets() {
        let mut panel = FlexiblePanel::new(PanelConfig::new(Offsets::new(300, 150, 0)));
        panel.set_extra_content_height(40);
        assert_eq!(panel.offsets(), Offsets::new(260, 110, -40));

        panel.set_offsets(Offsets::new(400, 200, 0));
        assert_eq!(panel.offsets(), Offsets::new(360, 160, -40));

        panel.set_to_close();
        assert_eq!(panel.scroll_y(), -360);
    }

    #[test]
    fn test_configure_keeps_live_offset() {
        let mut panel = FlexiblePanel::new(PanelConfig::new(Offsets::new(300, 150, 0)));
        panel.set_to_close();

        panel.configure(PanelConfig::new(Offsets::new(500, 250, 0)).allow_open(true));
        assert_eq!(panel.scroll_y(), -300);
        assert!(panel.allow_open());

        panel.set_to_close();
        assert_eq!(panel.scroll_y(), -500);
    }

    #[test]
    fn test_child_scroll_hint_reaches_listener() {
        use std::sync::{Arc, Mutex};

        let hints = Arc::new(Mutex::new(Vec::new()));
        let sink = hints.clone();
        let mut panel = FlexiblePanel::default();
        panel.set_listener(move |event: PanelEvent| {
            if let PanelEvent::ChildScrollHint(top) = event {
                sink.lock().unwrap().push(top);
            }
        });

        panel.dispatch_child_scroll(42);
        panel.clear_listener();
        panel.dispatch_child_scroll(7);

        assert_eq!(*hints.lock().unwrap(), vec![42]);
    }
}

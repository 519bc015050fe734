//! Host notification capability
//!
//! The panel holds at most one listener. Hosts either implement
//! [`PanelListener`] on their own type or hand over a closure taking a
//! [`PanelEvent`].

use crate::state::RestingState;

/// Notifications emitted by the panel
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PanelEvent {
    /// Live offset changed; 0 at extend, 1 at open, -1 at close
    ProgressChanged(f32),
    /// Panel came to rest at a resting offset
    Settled(RestingState),
    /// Nested-scroll coordination hint forwarded from the host
    ChildScrollHint(i32),
}

/// Receiver for panel notifications
pub trait PanelListener {
    /// Called on every live offset write
    fn on_progress_changed(&mut self, progress: f32);

    /// Called once each time the panel lands on a resting offset
    fn on_settled(&mut self, state: RestingState);

    /// Reserved for nested-scroll coordination; not driven by the panel itself
    fn on_child_scroll_hint(&mut self, _top: i32) {}
}

impl<F> PanelListener for F
where
    F: FnMut(PanelEvent),
{
    fn on_progress_changed(&mut self, progress: f32) {
        self(PanelEvent::ProgressChanged(progress));
    }

    fn on_settled(&mut self, state: RestingState) {
        self(PanelEvent::Settled(state));
    }

    fn on_child_scroll_hint(&mut self, top: i32) {
        self(PanelEvent::ChildScrollHint(top));
    }
}

/// Boxed listener slot type
pub type BoxedListener = Box<dyn PanelListener + Send>;

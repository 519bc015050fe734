//! Headless host view
//!
//! Stands in for the platform view hierarchy around a panel: a parent that
//! gets the first look at every pointer event through the interception pass,
//! and a single child content view that may claim the sequence.

use flexible_core::{PointerAction, PointerEvent};
use flexible_panel::{FlexiblePanel, PanelConfig, PanelListener, RestingState};
use std::sync::{Arc, Mutex, MutexGuard};

/// Who receives the rest of the current pointer sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Child,
    Panel,
}

/// Notifications captured from the panel
#[derive(Debug, Clone, Default)]
pub struct Recorded {
    pub progress_events: usize,
    pub last_progress: Option<f32>,
    pub settled: Vec<RestingState>,
}

#[derive(Clone, Default)]
struct Recorder(Arc<Mutex<Recorded>>);

impl Recorder {
    fn lock(&self) -> MutexGuard<'_, Recorded> {
        self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl PanelListener for Recorder {
    fn on_progress_changed(&mut self, progress: f32) {
        tracing::trace!("progress {:.3}", progress);
        let mut recorded = self.lock();
        recorded.progress_events += 1;
        recorded.last_progress = Some(progress);
    }

    fn on_settled(&mut self, state: RestingState) {
        tracing::info!("panel settled: {}", state);
        self.lock().settled.push(state);
    }

    fn on_child_scroll_hint(&mut self, top: i32) {
        tracing::debug!("child scroll hint: {}", top);
    }
}

/// Parent view owning a panel and one child content view
pub struct Host {
    panel: FlexiblePanel,
    child_claims_down: bool,
    target: Option<Target>,
    recorder: Recorder,
    child_clicks: u32,
    child_cancels: u32,
}

impl Host {
    pub fn new(config: PanelConfig, child_claims_down: bool) -> Self {
        let recorder = Recorder::default();
        let mut panel = FlexiblePanel::new(config);
        panel.set_listener(recorder.clone());

        Self {
            panel,
            child_claims_down,
            target: None,
            recorder,
            child_clicks: 0,
            child_cancels: 0,
        }
    }

    pub fn panel(&self) -> &FlexiblePanel {
        &self.panel
    }

    pub fn panel_mut(&mut self) -> &mut FlexiblePanel {
        &mut self.panel
    }

    pub fn target(&self) -> Option<Target> {
        self.target
    }

    pub fn recorded(&self) -> Recorded {
        self.recorder.lock().clone()
    }

    pub fn child_clicks(&self) -> u32 {
        self.child_clicks
    }

    pub fn child_cancels(&self) -> u32 {
        self.child_cancels
    }

    /// Deliver one pointer event. Returns whether anyone consumed it.
    pub fn dispatch(&mut self, event: &PointerEvent) -> bool {
        if event.action == PointerAction::Down {
            return self.dispatch_down(event);
        }

        let handled = match self.target {
            Some(Target::Child) => {
                if self.panel.on_intercept_touch_event(event) {
                    // The child sees a cancel; the panel takes the following events
                    tracing::debug!("panel intercepted sequence at y={:.1}", event.y);
                    self.child_cancels += 1;
                    self.target = Some(Target::Panel);
                } else if event.action == PointerAction::Up {
                    tracing::debug!("child click at y={:.1}", event.y);
                    self.child_clicks += 1;
                }
                true
            }
            Some(Target::Panel) => self.panel.on_touch_event(event),
            None => false,
        };

        if event.action.ends_sequence() {
            self.target = None;
        }
        handled
    }

    fn dispatch_down(&mut self, event: &PointerEvent) -> bool {
        self.target = None;

        if self.panel.on_intercept_touch_event(event) {
            self.target = Some(Target::Panel);
            return self.panel.on_touch_event(event);
        }

        if self.child_claims_down {
            self.target = Some(Target::Child);
            return true;
        }

        if self.panel.on_touch_event(event) {
            self.target = Some(Target::Panel);
            return true;
        }

        tracing::trace!("down at y={:.1} not handled", event.y);
        false
    }
}

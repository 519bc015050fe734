//! Panel states
//!
//! Two separate types on purpose: [`RestingState`] is what the host sees,
//! [`InnerPhase`] adds the transient dragging/animating phases used to guard
//! against redundant scroll requests. Transient phases are never reported.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Externally visible resting position of the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestingState {
    /// Fully extended (smallest offset)
    Extended,
    /// Partially open
    Open,
    /// Closed (largest offset)
    Closed,
}

impl RestingState {
    /// The phase the panel is in when settled at this position
    pub fn phase(self) -> InnerPhase {
        match self {
            RestingState::Extended => InnerPhase::Extended,
            RestingState::Open => InnerPhase::Open,
            RestingState::Closed => InnerPhase::Closed,
        }
    }

    /// Targets to try, in order, when this one can't be reached
    pub(crate) fn fallbacks(self) -> &'static [RestingState] {
        match self {
            RestingState::Extended => &[
                RestingState::Extended,
                RestingState::Open,
                RestingState::Closed,
            ],
            RestingState::Open => &[RestingState::Open, RestingState::Closed],
            RestingState::Closed => &[RestingState::Closed],
        }
    }
}

impl fmt::Display for RestingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RestingState::Extended => "extended",
            RestingState::Open => "open",
            RestingState::Closed => "closed",
        };
        f.write_str(name)
    }
}

/// Fine-grained internal phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InnerPhase {
    Extended,
    Open,
    Closed,
    /// Following the finger
    Dragging,
    /// Settle animation running
    Animating,
}

/// Inputs that move the internal phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseEvent {
    /// A drag delta was applied
    DragStarted,
    /// A settle animation was started
    AnimationStarted,
    /// The live offset became equal to a resting offset
    Landed(RestingState),
    /// Explicit placement by the host (set-to calls)
    Placed(RestingState),
}

impl InnerPhase {
    /// Check if this is a dragging/animating phase
    pub fn is_transient(&self) -> bool {
        matches!(self, InnerPhase::Dragging | InnerPhase::Animating)
    }

    /// The resting state for settled phases
    pub fn resting(&self) -> Option<RestingState> {
        match self {
            InnerPhase::Extended => Some(RestingState::Extended),
            InnerPhase::Open => Some(RestingState::Open),
            InnerPhase::Closed => Some(RestingState::Closed),
            InnerPhase::Dragging | InnerPhase::Animating => None,
        }
    }

    /// Handle an event and return the new phase, or None if no transition.
    ///
    /// Landing on the offset the panel already rests at is not a transition,
    /// which is what keeps settle notifications one-shot.
    pub fn on_event(&self, event: PhaseEvent) -> Option<Self> {
        match (self, event) {
            (_, PhaseEvent::Placed(state)) => Some(state.phase()),
            (InnerPhase::Dragging, PhaseEvent::DragStarted) => None,
            (_, PhaseEvent::DragStarted) => Some(InnerPhase::Dragging),
            (InnerPhase::Animating, PhaseEvent::AnimationStarted) => None,
            (_, PhaseEvent::AnimationStarted) => Some(InnerPhase::Animating),
            (phase, PhaseEvent::Landed(state)) if phase.resting() == Some(state) => None,
            (_, PhaseEvent::Landed(state)) => Some(state.phase()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landing_is_debounced() {
        assert_eq!(
            InnerPhase::Animating.on_event(PhaseEvent::Landed(RestingState::Open)),
            Some(InnerPhase::Open)
        );
        assert_eq!(
            InnerPhase::Open.on_event(PhaseEvent::Landed(RestingState::Open)),
            None
        );
        assert_eq!(
            InnerPhase::Open.on_event(PhaseEvent::Landed(RestingState::Closed)),
            Some(InnerPhase::Closed)
        );
    }

    #[test]
    fn test_placement_always_applies() {
        assert_eq!(
            InnerPhase::Closed.on_event(PhaseEvent::Placed(RestingState::Closed)),
            Some(InnerPhase::Closed)
        );
        assert_eq!(
            InnerPhase::Animating.on_event(PhaseEvent::Placed(RestingState::Open)),
            Some(InnerPhase::Open)
        );
    }

    #[test]
    fn test_drag_interrupts_animation() {
        assert_eq!(
            InnerPhase::Animating.on_event(PhaseEvent::DragStarted),
            Some(InnerPhase::Dragging)
        );
        assert_eq!(InnerPhase::Dragging.on_event(PhaseEvent::DragStarted), None);
    }

    #[test]
    fn test_transient_phases_have_no_resting_state() {
        assert!(InnerPhase::Dragging.is_transient());
        assert!(InnerPhase::Animating.is_transient());
        assert_eq!(InnerPhase::Dragging.resting(), None);
        assert_eq!(InnerPhase::Extended.resting(), Some(RestingState::Extended));
    }

    #[test]
    fn test_display_names() {
        assert_eq!(RestingState::Extended.to_string(), "extended");
        assert_eq!(RestingState::Closed.to_string(), "closed");
    }
}

//! Pointer event model
//!
//! The panel only drags along the vertical axis, so events carry a single
//! coordinate. `y` is measured in panel-local units, growing downward.

use serde::{Deserialize, Serialize};

/// What the pointer did in this event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerAction {
    /// Finger touched down, starts a gesture sequence
    Down,
    /// Finger moved while down
    Move,
    /// Finger lifted, ends the sequence
    Up,
    /// The platform took the sequence away (e.g. a parent intercepted it)
    Cancel,
}

impl PointerAction {
    /// Check if this action terminates a gesture sequence
    pub fn ends_sequence(&self) -> bool {
        matches!(self, PointerAction::Up | PointerAction::Cancel)
    }
}

/// Position and time of a single pointer event
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerSample {
    pub y: f32,
    /// Milliseconds on the host clock
    pub timestamp_ms: u64,
}

impl PointerSample {
    pub fn new(y: f32, timestamp_ms: u64) -> Self {
        Self { y, timestamp_ms }
    }
}

/// A raw pointer event as delivered by the host runtime
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub action: PointerAction,
    pub y: f32,
    pub timestamp_ms: u64,
}

impl PointerEvent {
    pub fn new(action: PointerAction, y: f32, timestamp_ms: u64) -> Self {
        Self {
            action,
            y,
            timestamp_ms,
        }
    }

    pub fn down(y: f32, timestamp_ms: u64) -> Self {
        Self::new(PointerAction::Down, y, timestamp_ms)
    }

    pub fn moved(y: f32, timestamp_ms: u64) -> Self {
        Self::new(PointerAction::Move, y, timestamp_ms)
    }

    pub fn up(y: f32, timestamp_ms: u64) -> Self {
        Self::new(PointerAction::Up, y, timestamp_ms)
    }

    pub fn cancel(y: f32, timestamp_ms: u64) -> Self {
        Self::new(PointerAction::Cancel, y, timestamp_ms)
    }

    /// The position/time part of the event
    pub fn sample(&self) -> PointerSample {
        PointerSample::new(self.y, self.timestamp_ms)
    }
}

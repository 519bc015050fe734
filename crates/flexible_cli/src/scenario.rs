//! Scenario definition for headless panel replays.

use anyhow::{Context, Result};
use flexible_panel::{GestureKind, RestingState};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Sequence of pointer, frame and assertion steps
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    /// Whether the child content claims down events it receives
    /// (clickable content)
    #[serde(default)]
    pub child_claims_down: bool,
    pub steps: Vec<ScenarioStep>,
}

impl Scenario {
    /// Load a scenario from JSON text.
    pub fn from_json(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    /// Load a scenario from file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize scenario")
    }

    /// Starter scenario written by `flexible init`
    pub fn starter() -> Self {
        Self {
            child_claims_down: false,
            steps: vec![
                ScenarioStep::SetToClose,
                ScenarioStep::AssertState {
                    state: RestingState::Closed,
                },
                ScenarioStep::Drag {
                    from: 320.0,
                    to: 200.0,
                    steps: 10,
                    duration_ms: 160,
                    hold_ms: 0,
                },
                ScenarioStep::Settle { max_frames: 100 },
                ScenarioStep::AssertState {
                    state: RestingState::Open,
                },
                ScenarioStep::AssertOffset { scroll_y: -150 },
            ],
        }
    }
}

/// One scenario step. Pointer positions are in panel units from the
/// reference edge; `after_ms` is the time since the previous step.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScenarioStep {
    Down {
        y: f32,
        #[serde(default)]
        after_ms: Option<u64>,
    },
    Move {
        y: f32,
        #[serde(default)]
        after_ms: Option<u64>,
    },
    Up {
        y: f32,
        #[serde(default)]
        after_ms: Option<u64>,
    },
    Cancel {
        y: f32,
        #[serde(default)]
        after_ms: Option<u64>,
    },
    /// Full gesture: down at `from`, `steps` evenly spaced moves to `to`
    /// over `duration_ms`, then up after `hold_ms`
    Drag {
        from: f32,
        to: f32,
        #[serde(default = "default_drag_steps")]
        steps: u32,
        #[serde(default = "default_drag_duration")]
        duration_ms: u64,
        #[serde(default)]
        hold_ms: u64,
    },
    Tick {
        frames: u32,
    },
    /// Tick until the panel stops animating
    Settle {
        #[serde(default = "default_max_frames")]
        max_frames: u32,
    },
    SetToClose,
    SetToOpen,
    Reset,
    AllowOpen {
        value: bool,
    },
    AllowExtend {
        value: bool,
    },
    AssertState {
        state: RestingState,
    },
    AssertOffset {
        scroll_y: i32,
    },
    AssertGesture {
        gesture: GestureKind,
    },
}

fn default_drag_steps() -> u32 {
    10
}

fn default_drag_duration() -> u64 {
    160
}

fn default_max_frames() -> u32 {
    1000
}

impl ScenarioStep {
    /// Name used in logs and failure messages
    pub fn name(&self) -> &'static str {
        match self {
            ScenarioStep::Down { .. } => "down",
            ScenarioStep::Move { .. } => "move",
            ScenarioStep::Up { .. } => "up",
            ScenarioStep::Cancel { .. } => "cancel",
            ScenarioStep::Drag { .. } => "drag",
            ScenarioStep::Tick { .. } => "tick",
            ScenarioStep::Settle { .. } => "settle",
            ScenarioStep::SetToClose => "set_to_close",
            ScenarioStep::SetToOpen => "set_to_open",
            ScenarioStep::Reset => "reset",
            ScenarioStep::AllowOpen { .. } => "allow_open",
            ScenarioStep::AllowExtend { .. } => "allow_extend",
            ScenarioStep::AssertState { .. } => "assert_state",
            ScenarioStep::AssertOffset { .. } => "assert_offset",
            ScenarioStep::AssertGesture { .. } => "assert_gesture",
        }
    }
}

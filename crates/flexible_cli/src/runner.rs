//! Scenario runner that replays pointer and frame steps against a host.

use crate::host::Host;
use crate::scenario::{Scenario, ScenarioStep};
use anyhow::{bail, Result};
use flexible_core::{PointerAction, PointerEvent};
use flexible_panel::{GestureKind, PanelConfig, RestingState};
use serde::Serialize;
use std::io::Write;

/// Runner settings
#[derive(Debug, Clone, Copy)]
pub struct RunConfig {
    /// Frame interval used for ticks and default pointer spacing
    pub frame_ms: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self { frame_ms: 16 }
    }
}

/// Machine-readable result of a scenario run.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub steps: usize,
    pub elapsed_frames: u64,
    pub elapsed_ms: u64,
    pub scroll_y: i32,
    pub resting_state: Option<RestingState>,
    pub progress: Option<f32>,
    /// Last progress value delivered to the listener
    pub last_progress: Option<f32>,
    pub last_gesture: Option<GestureKind>,
    pub settled: Vec<RestingState>,
    pub progress_events: usize,
    pub child_clicks: u32,
    pub child_cancels: u32,
}

impl SimulationReport {
    pub fn write_to_writer<W: Write>(&self, writer: &mut W) -> Result<()> {
        let payload = serde_json::to_string_pretty(self)?;
        writer.write_all(payload.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

/// Replay `scenario` against a fresh panel built from `config`.
///
/// Fails on the first assertion that doesn't hold.
pub fn run(config: PanelConfig, scenario: &Scenario, run_cfg: RunConfig) -> Result<SimulationReport> {
    let mut sim = Simulation::new(Host::new(config, scenario.child_claims_down), run_cfg);

    for (index, step) in scenario.steps.iter().enumerate() {
        tracing::debug!("step {}: {}", index, step.name());
        sim.apply(index, step)?;
    }

    Ok(sim.report(scenario.steps.len()))
}

struct Simulation {
    host: Host,
    frame_ms: u64,
    now_ms: u64,
    elapsed_frames: u64,
}

impl Simulation {
    fn new(host: Host, run_cfg: RunConfig) -> Self {
        Self {
            host,
            frame_ms: run_cfg.frame_ms.max(1),
            now_ms: 0,
            elapsed_frames: 0,
        }
    }

    fn apply(&mut self, index: usize, step: &ScenarioStep) -> Result<()> {
        match step {
            ScenarioStep::Down { y, after_ms } => self.pointer(PointerAction::Down, *y, *after_ms),
            ScenarioStep::Move { y, after_ms } => self.pointer(PointerAction::Move, *y, *after_ms),
            ScenarioStep::Up { y, after_ms } => self.pointer(PointerAction::Up, *y, *after_ms),
            ScenarioStep::Cancel { y, after_ms } => {
                self.pointer(PointerAction::Cancel, *y, *after_ms)
            }
            ScenarioStep::Drag {
                from,
                to,
                steps,
                duration_ms,
                hold_ms,
            } => self.drag(*from, *to, *steps, *duration_ms, *hold_ms),
            ScenarioStep::Tick { frames } => {
                for _ in 0..*frames {
                    self.frame();
                }
            }
            ScenarioStep::Settle { max_frames } => {
                let mut frames = 0u32;
                while self.host.panel().is_animating() {
                    if frames >= *max_frames {
                        bail!(
                            "step {} (settle): still animating after {} frames (scroll_y={})",
                            index,
                            frames,
                            self.host.panel().scroll_y()
                        );
                    }
                    self.frame();
                    frames += 1;
                }
                tracing::debug!("settled after {} frames", frames);
            }
            ScenarioStep::SetToClose => self.host.panel_mut().set_to_close(),
            ScenarioStep::SetToOpen => self.host.panel_mut().set_to_open(),
            ScenarioStep::Reset => self.host.panel_mut().reset(),
            ScenarioStep::AllowOpen { value } => self.host.panel_mut().set_allow_open(*value),
            ScenarioStep::AllowExtend { value } => self.host.panel_mut().set_allow_extend(*value),
            ScenarioStep::AssertState { state } => {
                let actual = self.host.panel().resting_state();
                if actual != Some(*state) {
                    bail!(
                        "step {} (assert_state): expected {}, found {}",
                        index,
                        state,
                        describe(actual)
                    );
                }
            }
            ScenarioStep::AssertOffset { scroll_y } => {
                let actual = self.host.panel().scroll_y();
                if actual != *scroll_y {
                    bail!(
                        "step {} (assert_offset): expected scroll_y {}, found {}",
                        index,
                        scroll_y,
                        actual
                    );
                }
            }
            ScenarioStep::AssertGesture { gesture } => {
                let actual = self.host.panel().last_gesture();
                if actual != Some(*gesture) {
                    bail!(
                        "step {} (assert_gesture): expected {:?}, found {:?}",
                        index,
                        gesture,
                        actual
                    );
                }
            }
        }
        Ok(())
    }

    /// Let `ms` pass, running frames while the panel animates
    fn wait(&mut self, ms: u64) {
        let mut remaining = ms;
        while remaining > 0 {
            let step = remaining.min(self.frame_ms);
            remaining -= step;
            self.now_ms += step;
            if self.host.panel().is_animating() {
                self.host.panel_mut().tick(step as f32);
                self.elapsed_frames += 1;
            }
        }
    }

    fn frame(&mut self) {
        self.now_ms += self.frame_ms;
        self.elapsed_frames += 1;
        self.host.panel_mut().tick(self.frame_ms as f32);
    }

    fn pointer(&mut self, action: PointerAction, y: f32, after_ms: Option<u64>) {
        self.wait(after_ms.unwrap_or(self.frame_ms));
        let event = PointerEvent::new(action, y, self.now_ms);
        let handled = self.host.dispatch(&event);
        tracing::trace!(
            "{:?} y={:.1} t={} handled={} target={:?} scroll_y={}",
            action,
            y,
            self.now_ms,
            handled,
            self.host.target(),
            self.host.panel().scroll_y()
        );
    }

    fn drag(&mut self, from: f32, to: f32, steps: u32, duration_ms: u64, hold_ms: u64) {
        self.pointer(PointerAction::Down, from, None);

        let start = self.now_ms;
        for i in 1..=steps {
            let at = start + duration_ms * u64::from(i) / u64::from(steps);
            let y = from + (to - from) * i as f32 / steps as f32;
            self.pointer(PointerAction::Move, y, Some(at - self.now_ms));
        }

        self.pointer(PointerAction::Up, to, Some(hold_ms));
    }

    fn report(&self, steps: usize) -> SimulationReport {
        let panel = self.host.panel();
        let recorded = self.host.recorded();
        SimulationReport {
            steps,
            elapsed_frames: self.elapsed_frames,
            elapsed_ms: self.now_ms,
            scroll_y: panel.scroll_y(),
            resting_state: panel.resting_state(),
            progress: panel.progress(),
            last_progress: recorded.last_progress,
            last_gesture: panel.last_gesture(),
            settled: recorded.settled,
            progress_events: recorded.progress_events,
            child_clicks: self.host.child_clicks(),
            child_cancels: self.host.child_cancels(),
        }
    }
}

fn describe(state: Option<RestingState>) -> String {
    match state {
        Some(state) => state.to_string(),
        None => "no resting state".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config;

    fn scenario(steps: &str) -> Scenario {
        Scenario::from_json(&format!(r#"{{ "steps": {} }}"#, steps)).unwrap()
    }

    #[test]
    fn test_starter_scenario_passes() {
        let report = run(config::starter(), &Scenario::starter(), RunConfig::default()).unwrap();

        assert_eq!(report.scroll_y, -150);
        assert_eq!(report.resting_state, Some(RestingState::Open));
        assert_eq!(report.last_gesture, Some(GestureKind::Fling));
        assert_eq!(
            report.settled,
            vec![RestingState::Closed, RestingState::Open]
        );
    }

    #[test]
    fn test_slow_release_settles_by_position() {
        let report = run(
            config::starter(),
            &scenario(
                r#"[
                    { "type": "set_to_open" },
                    { "type": "down", "y": 200 },
                    { "type": "move", "y": 210 },
                    { "type": "up", "y": 210, "after_ms": 300 },
                    { "type": "assert_gesture", "gesture": "drag" },
                    { "type": "settle" },
                    { "type": "assert_state", "state": "open" },
                    { "type": "assert_offset", "scroll_y": -150 }
                ]"#,
            ),
            RunConfig::default(),
        )
        .unwrap();

        assert_eq!(report.steps, 8);
        assert!(report.elapsed_frames > 0);
    }

    #[test]
    fn test_cancel_after_steal_settles_and_frees_target() {
        let mut scenario = scenario(
            r#"[
                { "type": "set_to_open" },
                { "type": "down", "y": 200 },
                { "type": "move", "y": 220 },
                { "type": "move", "y": 230 },
                { "type": "assert_offset", "scroll_y": -180 },
                { "type": "cancel", "y": 230 },
                { "type": "assert_gesture", "gesture": "drag" },
                { "type": "settle" },
                { "type": "assert_state", "state": "open" },
                { "type": "assert_offset", "scroll_y": -150 },
                { "type": "down", "y": 200 },
                { "type": "up", "y": 202 }
            ]"#,
        );
        scenario.child_claims_down = true;

        let report = run(config::starter(), &scenario, RunConfig::default()).unwrap();

        assert_eq!(report.child_cancels, 1);
        assert_eq!(report.child_clicks, 1);
        assert_eq!(report.settled, vec![RestingState::Open, RestingState::Open]);
    }

    #[test]
    fn test_failed_assertion_names_step() {
        let err = run(
            config::starter(),
            &scenario(
                r#"[
                    { "type": "set_to_close" },
                    { "type": "assert_state", "state": "open" }
                ]"#,
            ),
            RunConfig::default(),
        )
        .unwrap_err();

        let message = err.to_string();
        assert!(message.contains("step 1 (assert_state)"));
        assert!(message.contains("expected open, found closed"));
    }

    #[test]
    fn test_reset_revokes_flags() {
        let result = run(
            config::starter(),
            &scenario(
                r#"[
                    { "type": "set_to_open" },
                    { "type": "reset" },
                    { "type": "drag", "from": 320, "to": 200 },
                    { "type": "settle" },
                    { "type": "assert_state", "state": "closed" },
                    { "type": "assert_offset", "scroll_y": -300 }
                ]"#,
            ),
            RunConfig::default(),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_settle_frame_budget() {
        let err = run(
            config::starter(),
            &scenario(
                r#"[
                    { "type": "set_to_close" },
                    { "type": "drag", "from": 320, "to": 200, "hold_ms": 300 },
                    { "type": "settle", "max_frames": 1 }
                ]"#,
            ),
            RunConfig::default(),
        )
        .unwrap_err();

        assert!(err.to_string().contains("still animating"));
    }
}

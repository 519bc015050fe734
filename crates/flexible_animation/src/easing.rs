//! Easing functions for animations

use serde::{Deserialize, Serialize};

/// Viscous fluid curve steepness
const VISCOUS_FLUID_SCALE: f32 = 8.0;

/// Easing function type
///
/// Every variant maps `0.0 -> 0.0` and `1.0 -> 1.0` and is monotonic on the
/// unit interval, so an animated offset never overshoots its target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    Linear,
    /// `1 - (1 - t)^(2 * factor)`; factor 1.0 is a plain quadratic ease-out
    Decelerate(f32),
    /// Fast start with a long exponential tail, the classic scroller curve
    #[default]
    ViscousFluid,
    EaseOutQuad,
    EaseInOutQuad,
    EaseOutCubic,
    EaseInOutCubic,
}

impl Easing {
    /// Apply the easing function to a progress value (0.0 to 1.0)
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::Decelerate(factor) => {
                let factor = factor.max(f32::EPSILON);
                if (factor - 1.0).abs() < f32::EPSILON {
                    1.0 - (1.0 - t) * (1.0 - t)
                } else {
                    1.0 - (1.0 - t).powf(2.0 * factor)
                }
            }
            Easing::ViscousFluid => viscous_fluid_normalized(t),
            Easing::EaseOutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::EaseInOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Easing::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            Easing::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }
}

/// Raw viscous fluid response: linear-ish acceleration phase followed by an
/// exponential decay toward 1.
fn viscous_fluid(x: f32) -> f32 {
    let x = x * VISCOUS_FLUID_SCALE;
    if x < 1.0 {
        x - (1.0 - (-x).exp())
    } else {
        // 1/e, the value reached at the end of the first phase
        let start = 0.367_879_44_f32;
        let decay = 1.0 - (1.0 - x).exp();
        start + decay * (1.0 - start)
    }
}

/// Viscous fluid scaled so that `f(1.0) == 1.0` exactly
fn viscous_fluid_normalized(t: f32) -> f32 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }
    let normalize = 1.0 / viscous_fluid(1.0);
    (normalize * viscous_fluid(t)).min(1.0)
}

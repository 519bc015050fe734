//! Panel configuration
//!
//! Offsets are signed distances from the panel's reference edge to the top of
//! its content in each resting position. Larger offset = less content visible,
//! so a well-formed panel has `close >= open >= extend`.

use flexible_animation::Easing;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::state::RestingState;

/// Velocity above which a release counts as a directional fling (units/s)
pub const FLING_VELOCITY_SLOP: f32 = 80.0;
/// Longest settle animation (full-range move)
pub const MAX_SCROLL_DURATION_MS: u32 = 400;
/// Shortest settle animation (tiny move)
pub const MIN_SCROLL_DURATION_MS: u32 = 100;
/// Per-event cap on drag movement
pub const DRAG_SPEED_SLOP: i32 = 30;
/// Pointer-to-panel drag gain
pub const DRAG_SPEED_MULTIPLIER: f32 = 1.2;
/// Fraction of the open..extend range that decides extend vs open on release
pub const SCROLL_TO_CLOSE_OFFSET_FACTOR: f32 = 0.5;
/// Fraction of the close..open range that decides open vs close on release
pub const SCROLL_TO_EXTEND_OFFSET_FACTOR: f32 = 0.8;
/// Default touch slop in panel units
pub const DEFAULT_TOUCH_SLOP: f32 = 8.0;
/// Slowest release the platform still reports as a fling
pub const DEFAULT_MIN_FLING_VELOCITY: f32 = 50.0;
/// Fling velocities are clamped to this magnitude
pub const DEFAULT_MAX_FLING_VELOCITY: f32 = 8000.0;
/// Velocity estimation window
pub const DEFAULT_VELOCITY_HORIZON_MS: u64 = 100;

// ============================================================================
// Offsets
// ============================================================================

/// The three resting offsets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Offsets {
    pub close: i32,
    pub open: i32,
    pub extend: i32,
}

impl Offsets {
    pub fn new(close: i32, open: i32, extend: i32) -> Self {
        Self {
            close,
            open,
            extend,
        }
    }

    /// Build offsets for a panel anchored to the bottom of a viewport, given
    /// how much content is visible in each resting position.
    pub fn from_visible_heights(
        viewport_height: i32,
        close_visible: i32,
        open_visible: i32,
        extend_visible: i32,
    ) -> Self {
        Self {
            close: viewport_height - close_visible,
            open: viewport_height - open_visible,
            extend: viewport_height - extend_visible,
        }
    }

    /// Subtract `extra` from all three offsets
    pub fn shifted(self, extra: i32) -> Self {
        Self {
            close: self.close - extra,
            open: self.open - extra,
            extend: self.extend - extra,
        }
    }

    /// Check the `close >= open >= extend` ordering
    pub fn is_ordered(&self) -> bool {
        self.close >= self.open && self.open >= self.extend
    }

    /// Open and extend are distinct (open/extend transitions possible)
    pub fn has_extend_range(&self) -> bool {
        self.open != self.extend
    }

    /// Close and open are distinct (close transitions possible)
    pub fn has_close_range(&self) -> bool {
        self.close != self.open
    }

    /// Offset for a resting state
    pub fn get(&self, state: RestingState) -> i32 {
        match state {
            RestingState::Extended => self.extend,
            RestingState::Open => self.open,
            RestingState::Closed => self.close,
        }
    }

    /// Resting state whose offset equals `offset` exactly.
    ///
    /// Coinciding offsets resolve in open, extend, close order, so a panel
    /// whose open and extend offsets coincide only ever rests at open.
    pub fn resting_at(&self, offset: i32) -> Option<RestingState> {
        if offset == self.open {
            Some(RestingState::Open)
        } else if offset == self.extend {
            Some(RestingState::Extended)
        } else if offset == self.close {
            Some(RestingState::Closed)
        } else {
            None
        }
    }
}

// ============================================================================
// Gesture Configuration
// ============================================================================

/// Touch interpretation parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Pointer travel before a touch counts as a drag
    pub touch_slop: f32,
    /// Pointer delta gain applied to drags
    pub drag_speed_multiplier: f32,
    /// Maximum panel movement per pointer event
    pub drag_speed_cap: i32,
    /// Directional fling threshold (units/s)
    pub fling_threshold: f32,
    /// Releases slower than this are never flings (units/s)
    pub min_fling_velocity: f32,
    /// Velocity magnitude clamp (units/s)
    pub max_fling_velocity: f32,
    /// Window for velocity estimation
    pub velocity_horizon_ms: u64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            touch_slop: DEFAULT_TOUCH_SLOP,
            drag_speed_multiplier: DRAG_SPEED_MULTIPLIER,
            drag_speed_cap: DRAG_SPEED_SLOP,
            fling_threshold: FLING_VELOCITY_SLOP,
            min_fling_velocity: DEFAULT_MIN_FLING_VELOCITY,
            max_fling_velocity: DEFAULT_MAX_FLING_VELOCITY,
            velocity_horizon_ms: DEFAULT_VELOCITY_HORIZON_MS,
        }
    }
}

impl GestureConfig {
    pub fn touch_slop(mut self, slop: f32) -> Self {
        self.touch_slop = slop;
        self
    }

    pub fn fling_threshold(mut self, threshold: f32) -> Self {
        self.fling_threshold = threshold;
        self
    }

    pub fn min_fling_velocity(mut self, velocity: f32) -> Self {
        self.min_fling_velocity = velocity;
        self
    }
}

// ============================================================================
// Motion Configuration
// ============================================================================

/// Settle animation parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    pub min_duration_ms: u32,
    pub max_duration_ms: u32,
    /// Release threshold factor between open and extend
    pub close_factor: f32,
    /// Release threshold factor between close and open
    pub extend_factor: f32,
    /// Interpolator for settle animations
    pub easing: Easing,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            min_duration_ms: MIN_SCROLL_DURATION_MS,
            max_duration_ms: MAX_SCROLL_DURATION_MS,
            close_factor: SCROLL_TO_CLOSE_OFFSET_FACTOR,
            extend_factor: SCROLL_TO_EXTEND_OFFSET_FACTOR,
            easing: Easing::ViscousFluid,
        }
    }
}

impl MotionConfig {
    pub fn durations(mut self, min_ms: u32, max_ms: u32) -> Self {
        self.min_duration_ms = min_ms;
        self.max_duration_ms = max_ms;
        self
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }
}

// ============================================================================
// Panel Configuration
// ============================================================================

fn default_child_regions() -> usize {
    1
}

/// Complete panel configuration (`panel.toml`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelConfig {
    /// Resting offsets, or visible heights when `viewport_height` is set
    pub offsets: Offsets,
    /// Interpret `offsets` as visible content heights in this viewport
    #[serde(default)]
    pub viewport_height: Option<i32>,
    /// Height of host chrome overlaying the panel, subtracted from all offsets
    #[serde(default)]
    pub extra_content_height: i32,
    #[serde(default)]
    pub allow_open: bool,
    #[serde(default)]
    pub allow_extend: bool,
    /// Number of stacked child regions.
    ///
    /// Only informs interception tracing: downs are never stolen, so touches
    /// over extended content reach the children regardless of this count.
    #[serde(default = "default_child_regions")]
    pub child_regions: usize,
    #[serde(default)]
    pub gesture: GestureConfig,
    #[serde(default)]
    pub motion: MotionConfig,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self::new(Offsets::default())
    }
}

impl PanelConfig {
    /// Create a config with both capability flags off
    pub fn new(offsets: Offsets) -> Self {
        Self {
            offsets,
            viewport_height: None,
            extra_content_height: 0,
            allow_open: false,
            allow_extend: false,
            child_regions: default_child_regions(),
            gesture: GestureConfig::default(),
            motion: MotionConfig::default(),
        }
    }

    pub fn allow_open(mut self, allow: bool) -> Self {
        self.allow_open = allow;
        self
    }

    pub fn allow_extend(mut self, allow: bool) -> Self {
        self.allow_extend = allow;
        self
    }

    pub fn extra_content_height(mut self, extra: i32) -> Self {
        self.extra_content_height = extra;
        self
    }

    pub fn viewport_height(mut self, height: i32) -> Self {
        self.viewport_height = Some(height);
        self
    }

    pub fn child_regions(mut self, count: usize) -> Self {
        self.child_regions = count;
        self
    }

    pub fn gesture(mut self, gesture: GestureConfig) -> Self {
        self.gesture = gesture;
        self
    }

    pub fn motion(mut self, motion: MotionConfig) -> Self {
        self.motion = motion;
        self
    }

    /// The offsets the panel actually rests at
    pub fn resolved_offsets(&self) -> Offsets {
        let base = match self.viewport_height {
            Some(viewport) => Offsets::from_visible_heights(
                viewport,
                self.offsets.close,
                self.offsets.open,
                self.offsets.extend,
            ),
            None => self.offsets,
        };
        base.shifted(self.extra_content_height)
    }

    /// Strict check for hosts that prefer to reject odd geometry.
    ///
    /// The panel runs with any configuration; this only reports what will
    /// be degraded.
    pub fn validate(&self) -> Result<()> {
        let offsets = self.resolved_offsets();
        if !offsets.is_ordered() {
            return Err(ConfigError::Misordered {
                close: offsets.close,
                open: offsets.open,
                extend: offsets.extend,
            });
        }
        if !offsets.has_extend_range() && (self.allow_open || self.allow_extend) {
            return Err(ConfigError::DegenerateExtendRange {
                offset: offsets.open,
            });
        }
        if self.gesture.touch_slop < 0.0 {
            return Err(ConfigError::NegativeSlop(self.gesture.touch_slop));
        }
        if self.gesture.min_fling_velocity < 0.0
            || self.gesture.max_fling_velocity < self.gesture.min_fling_velocity
        {
            return Err(ConfigError::InvalidFlingVelocity {
                min: self.gesture.min_fling_velocity,
                max: self.gesture.max_fling_velocity,
            });
        }
        if self.motion.min_duration_ms > self.motion.max_duration_ms {
            return Err(ConfigError::InvalidDurations {
                min: self.motion.min_duration_ms,
                max: self.motion.max_duration_ms,
            });
        }
        if self.child_regions == 0 {
            return Err(ConfigError::NoChildRegions);
        }
        Ok(())
    }
}

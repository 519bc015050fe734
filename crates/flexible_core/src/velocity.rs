//! Pointer velocity estimation
//!
//! Keeps a short history of samples and reports the average velocity over
//! the most recent window. Older samples fall out of the window so a finger
//! that stops before lifting reports ~0 instead of the speed it had earlier.

use smallvec::SmallVec;

use crate::events::PointerSample;

/// Default window used for velocity estimation (milliseconds)
pub const DEFAULT_HORIZON_MS: u64 = 100;

/// Windowed velocity tracker for a single pointer axis
#[derive(Debug, Clone)]
pub struct VelocityTracker {
    samples: SmallVec<[PointerSample; 16]>,
    horizon_ms: u64,
}

impl Default for VelocityTracker {
    fn default() -> Self {
        Self::new(DEFAULT_HORIZON_MS)
    }
}

impl VelocityTracker {
    pub fn new(horizon_ms: u64) -> Self {
        Self {
            samples: SmallVec::new(),
            horizon_ms: horizon_ms.max(1),
        }
    }

    /// Forget all samples (call on pointer down)
    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Record a sample. Samples older than the window are dropped.
    pub fn add(&mut self, sample: PointerSample) {
        // Clock went backwards: start over rather than report garbage
        if let Some(last) = self.samples.last() {
            if sample.timestamp_ms < last.timestamp_ms {
                tracing::trace!(
                    "velocity tracker reset: {} < {}",
                    sample.timestamp_ms,
                    last.timestamp_ms
                );
                self.samples.clear();
            }
        }

        self.samples.push(sample);

        let newest = sample.timestamp_ms;
        let horizon = self.horizon_ms;
        self.samples
            .retain(|s| newest.saturating_sub(s.timestamp_ms) <= horizon);
    }

    /// Velocity in units per second along the sample axis.
    ///
    /// Positive when `y` is increasing. Returns 0.0 with fewer than two
    /// samples or when all samples share a timestamp.
    pub fn velocity(&self) -> f32 {
        let (Some(first), Some(last)) = (self.samples.first(), self.samples.last()) else {
            return 0.0;
        };

        let dt_ms = last.timestamp_ms.saturating_sub(first.timestamp_ms);
        if dt_ms == 0 {
            return 0.0;
        }

        (last.y - first.y) * 1000.0 / dt_ms as f32
    }

    /// Velocity with its magnitude limited to `max`
    pub fn clamped_velocity(&self, max: f32) -> f32 {
        let max = max.abs();
        self.velocity().clamp(-max, max)
    }
}

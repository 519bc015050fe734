//! Panel configuration errors
//!
//! The panel itself never fails at runtime; these are only produced by
//! [`PanelConfig::validate`](crate::config::PanelConfig::validate) for hosts
//! that want to reject questionable geometry up front.

use thiserror::Error;

/// Configuration problems detected by validation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Resting offsets are not ordered close >= open >= extend
    #[error("Resting offsets out of order: close={close} open={open} extend={extend} (expected close >= open >= extend)")]
    Misordered { close: i32, open: i32, extend: i32 },

    /// Open and extend coincide while one of them is reachable
    #[error("Open and extend offsets coincide at {offset}; open/extend transitions are disabled")]
    DegenerateExtendRange { offset: i32 },

    /// Touch slop below zero
    #[error("Touch slop must be non-negative, got {0}")]
    NegativeSlop(f32),

    /// Settle duration bounds inverted
    #[error("Minimum scroll duration {min}ms exceeds maximum {max}ms")]
    InvalidDurations { min: u32, max: u32 },

    /// Fling velocity bounds inverted or negative
    #[error("Invalid fling velocity bounds: min={min} max={max}")]
    InvalidFlingVelocity { min: f32, max: f32 },

    /// Panel needs at least one child region
    #[error("Panel must have at least one child region")]
    NoChildRegions,
}

/// Result type for configuration checks
pub type Result<T> = std::result::Result<T, ConfigError>;

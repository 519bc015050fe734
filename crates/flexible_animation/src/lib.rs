//! Flexible Animation System
//!
//! Time-based interpolation for settling the panel between resting offsets.
//!
//! # Features
//!
//! - **Interpolators**: linear, decelerate, viscous-fluid and quadratic/cubic curves
//! - **Scroller**: integer offset animation driven by host-supplied frame time
//! - **Interruptible**: a running scroll can be stopped in place or snapped to its end

pub mod easing;
pub mod scroller;

pub use easing::Easing;
pub use scroller::Scroller;

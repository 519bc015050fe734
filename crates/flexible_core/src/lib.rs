//! Flexible Core
//!
//! Platform-agnostic input primitives shared by the panel crates:
//!
//! - **Pointer Events**: single-axis pointer samples tagged with their action
//! - **Velocity Tracking**: windowed velocity estimation for fling detection

pub mod events;
pub mod velocity;

pub use events::{PointerAction, PointerEvent, PointerSample};
pub use velocity::VelocityTracker;

//! Flexible Panel
//!
//! A vertically dragged panel with three resting positions (extended, open
//! and closed), driven by raw pointer events and a host frame callback.
//!
//! # Features
//!
//! - **Gesture Arbitration**: decides whether the panel or its children own a
//!   touch sequence, and classifies it as tap, drag or fling
//! - **Motion Resolution**: clamped dragging, release and fling targeting,
//!   distance-scaled settle animations
//! - **Notifications**: continuous progress plus one-shot settle events
//! - **Configuration**: serde-deserializable offsets, capability flags and
//!   gesture/motion tuning
//!
//! # Example
//!
//! ```
//! use flexible_core::PointerEvent;
//! use flexible_panel::{FlexiblePanel, Offsets, PanelConfig, RestingState};
//!
//! let config = PanelConfig::new(Offsets::new(300, 150, 0)).allow_open(true);
//! let mut panel = FlexiblePanel::new(config);
//! panel.set_to_close();
//!
//! assert!(panel.scroll_to_open());
//! while panel.tick(16.0) {}
//!
//! assert_eq!(panel.resting_state(), Some(RestingState::Open));
//! assert_eq!(panel.scroll_y(), -150);
//!
//! // Touches above the open boundary belong to the content
//! assert!(!panel.on_touch_event(&PointerEvent::down(100.0, 0)));
//! ```

pub mod arbiter;
pub mod config;
pub mod error;
pub mod listener;
pub mod panel;
pub mod resolver;
pub mod state;

pub use arbiter::{GestureArbiter, GestureKind};
pub use config::{GestureConfig, MotionConfig, Offsets, PanelConfig};
pub use error::{ConfigError, Result};
pub use listener::{BoxedListener, PanelEvent, PanelListener};
pub use panel::FlexiblePanel;
pub use resolver::MotionResolver;
pub use state::{InnerPhase, PhaseEvent, RestingState};

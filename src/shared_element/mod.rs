//! # Shared Element Transitions
//!
//! Elements that appear on two screens (a thumbnail and its full-size
//! photo, say) animate from one layout to the other during a navigation
//! transition.
//!
//! ```text
//! screen A mounts  → register_group(g1, "photo", [a, b])
//! screen B mounts  → register_group(g2, "photo", [b, c])
//! layout passes    → update_metrics(..)
//! navigator        → start_transition(g1, g2) → set_progress(p) → end_transition()
//! renderer         → overlay(): element "b" scaled/translated from g1's box to g2's
//! ```
//!
//! This is independent of the navigation store. The provider owns one
//! coordinator per app.

pub mod action;
pub mod coordinator;
pub mod overlay;
pub mod state;

pub use action::SharedElementAction;
pub use coordinator::SharedElementCoordinator;
pub use overlay::{ElementOverlay, TransitionOverlay};
pub use state::{ElementGroup, ElementMetrics, GroupStyle, SharedElementState, TransitionError};

//! # Core Navigation Model
//!
//! The navigation tree and everything that changes it.
//! It knows nothing about rendering, gestures, or animation.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • State (nav tree)     │
//!                    │  • Action (mutations)   │
//!                    │  • reduce() (reducer)   │
//!                    │                         │
//!                    │  No I/O. No UI. Pure.   │
//!                    └───────────┬─────────────┘
//!                                │
//!            ┌───────────────────┼───────────────────┐
//!            ▼                   ▼                   ▼
//!     ┌────────────┐      ┌────────────┐      ┌────────────┐
//!     │   Store    │      │  Context   │      │   Replay   │
//!     │ middleware │      │ navigators │      │    CLI     │
//!     └────────────┘      └────────────┘      └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: `NavigationState` (every navigator and its routes)
//! - [`action`]: `Action` (everything that can happen to the tree)
//! - [`reducer`]: `reduce()` (the pure state transition)
//! - [`batch`]: `batched()` (atomic multi-action transitions)
//! - [`route`] / [`params`]: screen instances and their data

pub mod action;
pub mod batch;
pub mod config;
pub mod error;
pub mod params;
pub mod reducer;
pub mod route;
pub mod state;

pub use action::Action;
pub use error::NavigationError;
pub use params::{ParamValue, Params};
pub use route::{Route, RouteConfig};
pub use state::{NavigationState, NavigatorState, NavigatorType};

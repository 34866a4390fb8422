//! navkit: nested navigator state, its store and controllers, and
//! shared-element transitions.
//!
//! ```text
//! NavigationProvider
//! ├── NavigationContext ── Store ── reduce()
//! │        ├── Router
//! │        └── Stack / Tab / Drawer / SlidingTab controllers
//! ├── SharedElementCoordinator
//! └── BackButtonManager
//! ```

pub mod context;
pub mod core;
pub mod provider;
pub mod replay;
pub mod router;
pub mod scheduler;
pub mod shared_element;
pub mod store;

#[cfg(test)]
pub mod test_support;

pub use context::{NavigationContext, NavigatorHandle, NavigatorMount};
pub use crate::core::{Action, NavigationError, NavigationState, NavigatorType, Params, Route, RouteConfig};
pub use provider::NavigationProvider;
pub use router::{RouteDefinition, RouteDescriptor, Router};

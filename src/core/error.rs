//! # Errors
//!
//! Precondition violations raised by the reducer, the store, and the
//! navigator controllers. These are programmer errors: they surface
//! synchronously and are expected to be fixed during development, not
//! handled in production control flow.

use std::fmt;

use crate::core::state::NavigatorType;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    /// A route without a key was pushed or reset onto a navigator.
    MissingRouteKey { route_name: String },
    /// No navigator is registered under this UID.
    NavigatorNotFound { uid: String },
    /// No live navigator uses this logical id.
    NavigatorIdNotFound { navigator_id: String },
    /// More than one live navigator uses this logical id. Use UID lookup.
    AmbiguousNavigatorId { navigator_id: String, count: usize },
    /// The navigator exists but is the wrong kind for the operation.
    WrongNavigatorType {
        uid: String,
        expected: NavigatorType,
        actual: NavigatorType,
    },
    /// The router has no route with this name.
    RouteNotFound { route_name: String },
    /// A sliding-tab navigator has no tab with this key.
    TabNotFound { uid: String, key: String },
    /// An index does not point into the navigator's routes.
    IndexOutOfBounds { uid: String, index: usize, len: usize },
    /// The navigation context backing a controller was dropped.
    ContextDropped,
}

impl fmt::Display for NavigationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavigationError::MissingRouteKey { route_name } => {
                write!(f, "route '{route_name}' has no key")
            }
            NavigationError::NavigatorNotFound { uid } => {
                write!(f, "navigator {uid} does not exist")
            }
            NavigationError::NavigatorIdNotFound { navigator_id } => {
                write!(f, "no navigator found with id '{navigator_id}'")
            }
            NavigationError::AmbiguousNavigatorId {
                navigator_id,
                count,
            } => write!(
                f,
                "navigator id '{navigator_id}' is ambiguous ({count} live navigators share it), look it up by UID instead"
            ),
            NavigationError::WrongNavigatorType {
                uid,
                expected,
                actual,
            } => write!(
                f,
                "navigator {uid} is a {actual} navigator, expected a {expected} navigator"
            ),
            NavigationError::RouteNotFound { route_name } => {
                write!(f, "route '{route_name}' does not exist")
            }
            NavigationError::TabNotFound { uid, key } => {
                write!(f, "navigator {uid} has no tab '{key}'")
            }
            NavigationError::IndexOutOfBounds { uid, index, len } => write!(
                f,
                "index {index} is out of bounds for navigator {uid} with {len} routes"
            ),
            NavigationError::ContextDropped => write!(f, "navigation context was dropped"),
        }
    }
}

impl std::error::Error for NavigationError {}

pub type Result<T> = std::result::Result<T, NavigationError>;

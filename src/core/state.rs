//! # Navigation State
//!
//! The canonical tree of navigators. One `NavigationState` value is one
//! snapshot; the reducer never mutates it, it builds the next one.
//!
//! ```text
//! NavigationState
//! ├── navigators: BTreeMap<uid, Rc<NavigatorState>>
//! │   └── NavigatorState
//! │       ├── navigator_uid / parent_navigator_uid
//! │       ├── navigator_type: Stack | Tab | Drawer | SlidingTab
//! │       ├── routes: Vec<Route>       // stack order, or MRU order for tabs
//! │       ├── index: usize             // focused route
//! │       └── default_route_config     // lowest-priority config layer
//! ├── current_navigator_uid: Option    // input focus
//! ├── alerts: BTreeMap<uid, Alert>     // local alert bars
//! └── focus_restore_stack: Vec<uid>    // where focus returns on remove
//! ```
//!
//! Navigators are held behind `Rc` so that a new snapshot shares every
//! navigator it didn't touch with the previous one.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use serde::Serialize;

use crate::core::route::{Route, RouteConfig};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigatorType {
    Stack,
    Tab,
    Drawer,
    SlidingTab,
}

impl NavigatorType {
    pub fn label(self) -> &'static str {
        match self {
            NavigatorType::Stack => "stack",
            NavigatorType::Tab => "tab",
            NavigatorType::Drawer => "drawer",
            NavigatorType::SlidingTab => "sliding tab",
        }
    }
}

impl fmt::Display for NavigatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct NavigatorState {
    pub navigator_uid: String,
    pub parent_navigator_uid: Option<String>,
    pub navigator_type: NavigatorType,
    pub routes: Vec<Route>,
    pub index: usize,
    #[serde(skip)]
    pub default_route_config: Rc<RouteConfig>,
}

impl NavigatorState {
    /// An empty navigator, as created lazily by a push to an unknown UID.
    pub fn empty(navigator_uid: impl Into<String>, navigator_type: NavigatorType) -> Self {
        Self {
            navigator_uid: navigator_uid.into(),
            parent_navigator_uid: None,
            navigator_type,
            routes: Vec::new(),
            index: 0,
            default_route_config: Rc::new(RouteConfig::default()),
        }
    }

    pub fn current_route(&self) -> Option<&Route> {
        self.routes.get(self.index)
    }

    pub fn is_at_root(&self) -> bool {
        self.index == 0
    }

    /// Position of the route with `key`, if present.
    pub fn position_of(&self, key: &str) -> Option<usize> {
        self.routes.iter().position(|r| r.key() == key)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, serde::Deserialize)]
pub struct AlertStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
}

/// A local alert bar shown on top of one navigator.
#[derive(Clone, Debug, PartialEq, Serialize, serde::Deserialize)]
pub struct Alert {
    pub message: String,
    #[serde(default)]
    pub style: AlertStyle,
}

impl Alert {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            style: AlertStyle::default(),
        }
    }
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct NavigationState {
    pub navigators: BTreeMap<String, Rc<NavigatorState>>,
    pub current_navigator_uid: Option<String>,
    pub alerts: BTreeMap<String, Alert>,
    pub focus_restore_stack: Vec<String>,
}

impl NavigationState {
    pub fn navigator(&self, uid: &str) -> Option<&NavigatorState> {
        self.navigators.get(uid).map(|n| n.as_ref())
    }

    pub fn current_navigator(&self) -> Option<&NavigatorState> {
        self.current_navigator_uid
            .as_deref()
            .and_then(|uid| self.navigator(uid))
    }

    /// The focused route of the focused navigator.
    pub fn focused_route(&self) -> Option<&Route> {
        self.current_navigator().and_then(NavigatorState::current_route)
    }

    /// Walks parent links from `uid` up to the root navigator.
    pub fn ancestors(&self, uid: &str) -> Vec<&NavigatorState> {
        let mut chain = Vec::new();
        let mut next = self
            .navigator(uid)
            .and_then(|n| n.parent_navigator_uid.as_deref());
        while let Some(parent_uid) = next {
            match self.navigator(parent_uid) {
                // Guard against malformed parent cycles.
                Some(parent) if !chain.iter().any(|n: &&NavigatorState| n.navigator_uid == parent_uid) => {
                    chain.push(parent);
                    next = parent.parent_navigator_uid.as_deref();
                }
                _ => break,
            }
        }
        chain
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::params::Params;

    #[test]
    fn test_focused_route_follows_current_navigator() {
        let mut nav = NavigatorState::empty("root", NavigatorType::Stack);
        nav.routes = vec![
            Route::with_key("a", "home", Params::new()),
            Route::with_key("b", "detail", Params::new()),
        ];
        nav.index = 1;

        let mut state = NavigationState::default();
        assert!(state.focused_route().is_none());

        state.navigators.insert("root".to_string(), Rc::new(nav));
        state.current_navigator_uid = Some("root".to_string());
        assert_eq!(state.focused_route().map(Route::key), Some("b"));
    }

    #[test]
    fn test_ancestors_stop_at_root() {
        let mut state = NavigationState::default();
        let root = NavigatorState::empty("root", NavigatorType::Tab);
        let mut mid = NavigatorState::empty("mid", NavigatorType::Stack);
        mid.parent_navigator_uid = Some("root".to_string());
        let mut leaf = NavigatorState::empty("leaf", NavigatorType::Stack);
        leaf.parent_navigator_uid = Some("mid".to_string());
        for nav in [root, mid, leaf] {
            state.navigators.insert(nav.navigator_uid.clone(), Rc::new(nav));
        }

        let uids: Vec<&str> = state
            .ancestors("leaf")
            .iter()
            .map(|n| n.navigator_uid.as_str())
            .collect();
        assert_eq!(uids, vec!["mid", "root"]);
    }
}

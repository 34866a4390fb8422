//! # Actions
//!
//! Everything that can happen to the navigation tree becomes an `Action`.
//! Pushing a screen? That's `Action::Push`. Back button? `Action::GoBack`.
//!
//! The reducer takes the current state and an action, then returns the new
//! state. No side effects here. Rendering and animation happen elsewhere.
//!
//! ```text
//! State + Action  →  reduce()  →  New State
//! ```
//!
//! `Action::Batch` wraps several actions so they commit as one transition.

use std::rc::Rc;

use crate::core::params::Params;
use crate::core::route::{Route, RouteConfig};
use crate::core::state::{Alert, NavigatorType};

#[derive(Clone, Debug)]
pub enum Action {
    Initialize,
    SetCurrentNavigator {
        navigator_uid: String,
        parent_navigator_uid: Option<String>,
        navigator_type: NavigatorType,
        default_route_config: Rc<RouteConfig>,
        routes: Option<Vec<Route>>,
        index: Option<usize>,
    },
    RemoveNavigator {
        navigator_uid: String,
    },
    Push {
        navigator_uid: String,
        route: Route,
    },
    Pop {
        navigator_uid: String,
    },
    PopToTop {
        navigator_uid: String,
    },
    ImmediatelyResetStack {
        navigator_uid: String,
        routes: Vec<Route>,
        index: usize,
    },
    UpdateRouteAtIndex {
        navigator_uid: String,
        index: usize,
        route: Route,
    },
    UpdateCurrentRouteParams {
        navigator_uid: String,
        params: Params,
    },
    JumpToTab {
        navigator_uid: String,
        tab: Route,
    },
    JumpToItem {
        navigator_uid: String,
        item: Route,
    },
    ToggleDrawer {
        navigator_uid: String,
    },
    GoBack,
    ShowLocalAlertBar {
        navigator_uid: String,
        alert: Alert,
    },
    HideLocalAlertBar {
        navigator_uid: String,
    },
    Batch(Vec<Action>),
}

impl Action {
    /// Short name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Action::Initialize => "INITIALIZE",
            Action::SetCurrentNavigator { .. } => "SET_CURRENT_NAVIGATOR",
            Action::RemoveNavigator { .. } => "REMOVE_NAVIGATOR",
            Action::Push { .. } => "PUSH",
            Action::Pop { .. } => "POP",
            Action::PopToTop { .. } => "POP_TO_TOP",
            Action::ImmediatelyResetStack { .. } => "IMMEDIATELY_RESET_STACK",
            Action::UpdateRouteAtIndex { .. } => "UPDATE_ROUTE_AT_INDEX",
            Action::UpdateCurrentRouteParams { .. } => "UPDATE_CURRENT_ROUTE_PARAMS",
            Action::JumpToTab { .. } => "JUMP_TO_TAB",
            Action::JumpToItem { .. } => "JUMP_TO_ITEM",
            Action::ToggleDrawer { .. } => "TOGGLE_DRAWER",
            Action::GoBack => "GO_BACK",
            Action::ShowLocalAlertBar { .. } => "SHOW_LOCAL_ALERT_BAR",
            Action::HideLocalAlertBar { .. } => "HIDE_LOCAL_ALERT_BAR",
            Action::Batch(_) => "BATCH",
        }
    }

    /// The navigator this action is addressed to, if any.
    pub fn navigator_uid(&self) -> Option<&str> {
        match self {
            Action::SetCurrentNavigator { navigator_uid, .. }
            | Action::RemoveNavigator { navigator_uid }
            | Action::Push { navigator_uid, .. }
            | Action::Pop { navigator_uid }
            | Action::PopToTop { navigator_uid }
            | Action::ImmediatelyResetStack { navigator_uid, .. }
            | Action::UpdateRouteAtIndex { navigator_uid, .. }
            | Action::UpdateCurrentRouteParams { navigator_uid, .. }
            | Action::JumpToTab { navigator_uid, .. }
            | Action::JumpToItem { navigator_uid, .. }
            | Action::ToggleDrawer { navigator_uid }
            | Action::ShowLocalAlertBar { navigator_uid, .. }
            | Action::HideLocalAlertBar { navigator_uid } => Some(navigator_uid),
            Action::Initialize | Action::GoBack | Action::Batch(_) => None,
        }
    }

    // ── Constructors ────────────────────────────────────────────────────────

    pub fn initialize() -> Self {
        Action::Initialize
    }

    /// Registers (or refocuses) a navigator. `routes: None` only refocuses an
    /// already-registered navigator.
    pub fn set_current_navigator(
        navigator_uid: impl Into<String>,
        parent_navigator_uid: Option<String>,
        navigator_type: NavigatorType,
        default_route_config: RouteConfig,
        routes: Option<Vec<Route>>,
        index: Option<usize>,
    ) -> Self {
        Action::SetCurrentNavigator {
            navigator_uid: navigator_uid.into(),
            parent_navigator_uid,
            navigator_type,
            default_route_config: Rc::new(default_route_config),
            routes,
            index,
        }
    }

    /// Refocuses an existing navigator without touching its routes.
    pub fn focus_navigator(navigator_uid: impl Into<String>, navigator_type: NavigatorType) -> Self {
        Self::set_current_navigator(
            navigator_uid,
            None,
            navigator_type,
            RouteConfig::default(),
            None,
            None,
        )
    }

    pub fn remove_navigator(navigator_uid: impl Into<String>) -> Self {
        Action::RemoveNavigator {
            navigator_uid: navigator_uid.into(),
        }
    }

    pub fn push(navigator_uid: impl Into<String>, route: Route) -> Self {
        Action::Push {
            navigator_uid: navigator_uid.into(),
            route,
        }
    }

    pub fn pop(navigator_uid: impl Into<String>) -> Self {
        Action::Pop {
            navigator_uid: navigator_uid.into(),
        }
    }

    pub fn pop_to_top(navigator_uid: impl Into<String>) -> Self {
        Action::PopToTop {
            navigator_uid: navigator_uid.into(),
        }
    }

    pub fn immediately_reset_stack(
        navigator_uid: impl Into<String>,
        routes: Vec<Route>,
        index: usize,
    ) -> Self {
        Action::ImmediatelyResetStack {
            navigator_uid: navigator_uid.into(),
            routes,
            index,
        }
    }

    pub fn update_route_at_index(navigator_uid: impl Into<String>, index: usize, route: Route) -> Self {
        Action::UpdateRouteAtIndex {
            navigator_uid: navigator_uid.into(),
            index,
            route,
        }
    }

    pub fn update_current_route_params(navigator_uid: impl Into<String>, params: Params) -> Self {
        Action::UpdateCurrentRouteParams {
            navigator_uid: navigator_uid.into(),
            params,
        }
    }

    pub fn jump_to_tab(navigator_uid: impl Into<String>, tab: Route) -> Self {
        Action::JumpToTab {
            navigator_uid: navigator_uid.into(),
            tab,
        }
    }

    pub fn jump_to_item(navigator_uid: impl Into<String>, item: Route) -> Self {
        Action::JumpToItem {
            navigator_uid: navigator_uid.into(),
            item,
        }
    }

    pub fn toggle_drawer(navigator_uid: impl Into<String>) -> Self {
        Action::ToggleDrawer {
            navigator_uid: navigator_uid.into(),
        }
    }

    pub fn go_back() -> Self {
        Action::GoBack
    }

    pub fn show_local_alert_bar(navigator_uid: impl Into<String>, alert: Alert) -> Self {
        Action::ShowLocalAlertBar {
            navigator_uid: navigator_uid.into(),
            alert,
        }
    }

    pub fn hide_local_alert_bar(navigator_uid: impl Into<String>) -> Self {
        Action::HideLocalAlertBar {
            navigator_uid: navigator_uid.into(),
        }
    }

    pub fn batch(actions: Vec<Action>) -> Self {
        Action::Batch(actions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigator_uid_extraction() {
        assert_eq!(Action::pop("root").navigator_uid(), Some("root"));
        assert_eq!(Action::go_back().navigator_uid(), None);
        assert_eq!(Action::batch(vec![Action::pop("root")]).navigator_uid(), None);
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(Action::toggle_drawer("d").kind(), "TOGGLE_DRAWER");
        assert_eq!(Action::batch(Vec::new()).kind(), "BATCH");
    }
}

//! # perform_action
//!
//! A small builder for composing several navigator operations into a single
//! transition:
//!
//! ```text
//! context.perform_action(|b| {
//!     b.stacks(&feed).pop_to_top();
//!     b.tabs(&tabs).jump_to_tab(profile);
//! })
//!   → one Action::Batch → one reducer pass → one notification
//! ```
//!
//! Nothing is dispatched until the closure returns.

use crate::context::NavigationContext;
use crate::core::action::Action;
use crate::core::params::Params;
use crate::core::route::Route;
use crate::core::state::{Alert, NavigatorType};

pub struct ActionBuilder<'a> {
    context: &'a NavigationContext,
    actions: Vec<Action>,
}

impl<'a> ActionBuilder<'a> {
    pub(crate) fn new(context: &'a NavigationContext) -> Self {
        Self {
            context,
            actions: Vec::new(),
        }
    }

    pub(crate) fn into_actions(self) -> Vec<Action> {
        self.actions
    }

    pub fn stacks(&mut self, navigator_uid: impl Into<String>) -> StackActions<'_> {
        StackActions {
            uid: navigator_uid.into(),
            actions: &mut self.actions,
        }
    }

    pub fn tabs(&mut self, navigator_uid: impl Into<String>) -> TabActions<'_> {
        TabActions {
            uid: navigator_uid.into(),
            context: self.context,
            actions: &mut self.actions,
        }
    }

    pub fn drawer(&mut self, navigator_uid: impl Into<String>) -> DrawerActions<'_> {
        DrawerActions {
            uid: navigator_uid.into(),
            actions: &mut self.actions,
        }
    }

    pub fn sliding_tabs(&mut self, navigator_uid: impl Into<String>) -> SlidingTabActions<'_> {
        SlidingTabActions {
            uid: navigator_uid.into(),
            actions: &mut self.actions,
        }
    }

    pub fn go_back(&mut self) -> &mut Self {
        self.actions.push(Action::go_back());
        self
    }

    /// Appends an arbitrary primitive action.
    pub fn action(&mut self, action: Action) -> &mut Self {
        self.actions.push(action);
        self
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

// ── Stack ───────────────────────────────────────────────────────────────────

pub struct StackActions<'b> {
    uid: String,
    actions: &'b mut Vec<Action>,
}

impl StackActions<'_> {
    pub fn push(self, route: Route) -> Self {
        self.actions.push(Action::push(&self.uid, route));
        self
    }

    pub fn pop(self) -> Self {
        self.actions.push(Action::pop(&self.uid));
        self
    }

    pub fn pop_to_top(self) -> Self {
        self.actions.push(Action::pop_to_top(&self.uid));
        self
    }

    pub fn immediately_reset_stack(self, routes: Vec<Route>, index: usize) -> Self {
        self.actions
            .push(Action::immediately_reset_stack(&self.uid, routes, index));
        self
    }

    pub fn update_current_route_params(self, params: Params) -> Self {
        self.actions
            .push(Action::update_current_route_params(&self.uid, params));
        self
    }

    pub fn show_local_alert(self, alert: Alert) -> Self {
        self.actions.push(Action::show_local_alert_bar(&self.uid, alert));
        self
    }

    pub fn hide_local_alert(self) -> Self {
        self.actions.push(Action::hide_local_alert_bar(&self.uid));
        self
    }
}

// ── Tabs ────────────────────────────────────────────────────────────────────

pub struct TabActions<'b> {
    uid: String,
    context: &'b NavigationContext,
    actions: &'b mut Vec<Action>,
}

impl TabActions<'_> {
    /// Focuses `tab`. Input focus moves into the navigator mounted inside
    /// that tab, or onto the tab navigator itself when the tab hosts none,
    /// as part of the same batch.
    pub fn jump_to_tab(self, tab: Route) -> Self {
        let nested = self.context.nested_navigator_for_tab(&self.uid, tab.key());
        self.actions.push(Action::jump_to_tab(&self.uid, tab));
        let focus = match nested {
            Some((nested_uid, nested_type)) => Action::focus_navigator(nested_uid, nested_type),
            None => Action::focus_navigator(&self.uid, NavigatorType::Tab),
        };
        self.actions.push(focus);
        self
    }

    pub fn show_local_alert(self, alert: Alert) -> Self {
        self.actions.push(Action::show_local_alert_bar(&self.uid, alert));
        self
    }

    pub fn hide_local_alert(self) -> Self {
        self.actions.push(Action::hide_local_alert_bar(&self.uid));
        self
    }
}

// ── Drawer ──────────────────────────────────────────────────────────────────

pub struct DrawerActions<'b> {
    uid: String,
    actions: &'b mut Vec<Action>,
}

impl DrawerActions<'_> {
    pub fn jump_to_item(self, item: Route) -> Self {
        self.actions.push(Action::jump_to_item(&self.uid, item));
        self
    }

    /// Legacy toggle. Reduces like a pop of the drawer's item history.
    pub fn toggle(self) -> Self {
        self.actions.push(Action::toggle_drawer(&self.uid));
        self
    }
}

// ── Sliding tabs ────────────────────────────────────────────────────────────

pub struct SlidingTabActions<'b> {
    uid: String,
    actions: &'b mut Vec<Action>,
}

impl SlidingTabActions<'_> {
    /// Focuses the page with `key` in place. Pages are matched by key only.
    pub fn jump_to_tab(self, key: &str) -> Self {
        self.actions.push(Action::jump_to_tab(
            &self.uid,
            Route::with_key(key, key, Params::new()),
        ));
        self
    }
}

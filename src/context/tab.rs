//! Tab navigator controller.
//!
//! Tabs are kept in most-recently-used order: jumping moves the tab to the
//! end of `routes`. Tabs that haven't been visited yet live in `items` and
//! are appended on first jump.

use std::cell::RefCell;
use std::collections::HashMap;

use log::debug;

use crate::context::navigator::{NavigatorCore, locate_item};
use crate::core::error::Result;
use crate::core::route::Route;
use crate::core::state::Alert;

pub struct TabNavigator {
    core: NavigatorCore,
    items: Vec<Route>,
    /// tab key → uid of the navigator mounted inside that tab
    nested: RefCell<HashMap<String, String>>,
}

impl TabNavigator {
    pub(crate) fn new(core: NavigatorCore, items: Vec<Route>) -> Self {
        Self {
            core,
            items,
            nested: RefCell::new(HashMap::new()),
        }
    }

    pub fn core(&self) -> &NavigatorCore {
        &self.core
    }

    pub fn navigator_uid(&self) -> &str {
        self.core.navigator_uid()
    }

    pub fn tab_keys(&self) -> Vec<&str> {
        self.items.iter().map(Route::key).collect()
    }

    /// Focuses the tab with `key`, and the navigator inside it if any.
    pub fn jump_to_tab(&self, key: &str) -> Result<bool> {
        let tab = locate_item(&self.core, &self.items, key)?;
        let uid = self.navigator_uid().to_string();
        self.core.perform_action(|b| {
            b.tabs(uid).jump_to_tab(tab);
        })
    }

    pub fn current_route(&self) -> Result<Option<Route>> {
        self.core.current_route()
    }

    pub fn current_index(&self) -> Result<usize> {
        self.core.current_index()
    }

    pub fn show_local_alert(&self, alert: Alert) -> Result<bool> {
        self.core.show_local_alert(alert)
    }

    pub fn hide_local_alert(&self) -> Result<bool> {
        self.core.hide_local_alert()
    }

    pub fn register_nested_navigator(&self, tab_key: &str, navigator_uid: &str) {
        debug!("Tab {tab_key} of {} hosts navigator {navigator_uid}", self.navigator_uid());
        self.nested
            .borrow_mut()
            .insert(tab_key.to_string(), navigator_uid.to_string());
    }

    pub fn unregister_nested_navigator(&self, navigator_uid: &str) {
        self.nested.borrow_mut().retain(|_, uid| uid != navigator_uid);
    }

    pub fn nested_navigator(&self, tab_key: &str) -> Option<String> {
        self.nested.borrow().get(tab_key).cloned()
    }
}

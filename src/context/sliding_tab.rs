//! Sliding tab navigator controller. Every page is mounted up front, so a
//! jump only moves focus.

use crate::context::navigator::NavigatorCore;
use crate::core::error::Result;
use crate::core::route::Route;

pub struct SlidingTabNavigator {
    core: NavigatorCore,
}

impl SlidingTabNavigator {
    pub(crate) fn new(core: NavigatorCore) -> Self {
        Self { core }
    }

    pub fn core(&self) -> &NavigatorCore {
        &self.core
    }

    pub fn navigator_uid(&self) -> &str {
        self.core.navigator_uid()
    }

    /// Fails with `TabNotFound` when no page has `key`.
    pub fn jump_to_tab(&self, key: &str) -> Result<bool> {
        let uid = self.navigator_uid().to_string();
        self.core.perform_action(|b| {
            b.sliding_tabs(uid).jump_to_tab(key);
        })
    }

    pub fn pages(&self) -> Result<Vec<Route>> {
        self.core.routes()
    }

    pub fn current_index(&self) -> Result<usize> {
        self.core.current_index()
    }
}

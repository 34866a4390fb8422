//! Drawer navigator controller.
//!
//! Whether the drawer panel is open is visual state owned by the host, so
//! `toggle_drawer` only forwards to a handler the host installs.

use std::cell::RefCell;
use std::rc::Rc;

use log::warn;

use crate::context::navigator::{NavigatorCore, locate_item};
use crate::core::error::Result;
use crate::core::route::Route;

pub struct DrawerNavigator {
    core: NavigatorCore,
    items: Vec<Route>,
    toggle_handler: RefCell<Option<Rc<dyn Fn()>>>,
}

impl DrawerNavigator {
    pub(crate) fn new(core: NavigatorCore, items: Vec<Route>) -> Self {
        Self {
            core,
            items,
            toggle_handler: RefCell::new(None),
        }
    }

    pub fn core(&self) -> &NavigatorCore {
        &self.core
    }

    pub fn navigator_uid(&self) -> &str {
        self.core.navigator_uid()
    }

    pub fn item_keys(&self) -> Vec<&str> {
        self.items.iter().map(Route::key).collect()
    }

    pub fn jump_to_item(&self, key: &str) -> Result<bool> {
        let item = locate_item(&self.core, &self.items, key)?;
        self.core.perform_action(|b| {
            b.drawer(self.navigator_uid()).jump_to_item(item);
        })
    }

    pub fn current_route(&self) -> Result<Option<Route>> {
        self.core.current_route()
    }

    pub fn set_toggle_handler(&self, handler: impl Fn() + 'static) {
        *self.toggle_handler.borrow_mut() = Some(Rc::new(handler));
    }

    /// Asks the host to open or close the panel. Returns false when no
    /// handler is installed.
    pub fn toggle_drawer(&self) -> bool {
        let handler = self.toggle_handler.borrow().clone();
        match handler {
            Some(handler) => {
                handler();
                true
            }
            None => {
                warn!("toggle_drawer on {} with no toggle handler installed", self.navigator_uid());
                false
            }
        }
    }
}

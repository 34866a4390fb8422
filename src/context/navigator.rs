//! # Navigator Handles
//!
//! What every navigator controller shares, and the tagged handle the context
//! keeps in its registry.
//!
//! ```text
//! NavigatorHandle
//! ├── Stack(Rc<StackNavigator>)
//! ├── Tab(Rc<TabNavigator>)
//! ├── Drawer(Rc<DrawerNavigator>)
//! └── SlidingTab(Rc<SlidingTabNavigator>)
//!          │
//!          └── NavigatorCore: uid, parent uid, id, type, Weak → context
//! ```
//!
//! Controllers never cache navigation state. Every read goes back to the
//! store through the context.

use std::rc::Rc;

use crate::context::drawer::DrawerNavigator;
use crate::context::sliding_tab::SlidingTabNavigator;
use crate::context::stack::StackNavigator;
use crate::context::tab::TabNavigator;
use crate::context::perform::ActionBuilder;
use crate::context::{NavigationContext, WeakContext};
use crate::core::action::Action;
use crate::core::error::{NavigationError, Result};
use crate::core::route::{Route, RouteConfig};
use crate::core::state::{Alert, NavigatorState, NavigatorType};

// ============================================================================
// Core
// ============================================================================

/// Identity plus a weak link back to the context.
pub struct NavigatorCore {
    navigator_uid: String,
    parent_navigator_uid: Option<String>,
    navigator_id: Option<String>,
    navigator_type: NavigatorType,
    context: WeakContext,
}

impl NavigatorCore {
    pub(crate) fn new(
        navigator_uid: impl Into<String>,
        parent_navigator_uid: Option<String>,
        navigator_id: Option<String>,
        navigator_type: NavigatorType,
        context: WeakContext,
    ) -> Self {
        Self {
            navigator_uid: navigator_uid.into(),
            parent_navigator_uid,
            navigator_id,
            navigator_type,
            context,
        }
    }

    pub fn navigator_uid(&self) -> &str {
        &self.navigator_uid
    }

    pub fn parent_navigator_uid(&self) -> Option<&str> {
        self.parent_navigator_uid.as_deref()
    }

    pub fn navigator_id(&self) -> Option<&str> {
        self.navigator_id.as_deref()
    }

    pub fn navigator_type(&self) -> NavigatorType {
        self.navigator_type
    }

    pub fn context(&self) -> Result<NavigationContext> {
        self.context.upgrade()
    }

    /// This navigator's entry in the current snapshot.
    pub fn navigator_state(&self) -> Result<Rc<NavigatorState>> {
        let state = self.context()?.state();
        state
            .navigators
            .get(&self.navigator_uid)
            .cloned()
            .ok_or_else(|| NavigationError::NavigatorNotFound {
                uid: self.navigator_uid.clone(),
            })
    }

    pub fn current_route(&self) -> Result<Option<Route>> {
        Ok(self.navigator_state()?.current_route().cloned())
    }

    pub fn current_index(&self) -> Result<usize> {
        Ok(self.navigator_state()?.index)
    }

    pub fn routes(&self) -> Result<Vec<Route>> {
        Ok(self.navigator_state()?.routes.clone())
    }

    /// The single write path for controllers: one batch per call.
    pub fn perform_action(&self, build: impl FnOnce(&mut ActionBuilder<'_>)) -> Result<bool> {
        self.context()?.perform_action(build)
    }

    pub fn show_local_alert(&self, alert: Alert) -> Result<bool> {
        self.perform_action(|b| {
            b.action(Action::show_local_alert_bar(&self.navigator_uid, alert));
        })
    }

    pub fn hide_local_alert(&self) -> Result<bool> {
        self.perform_action(|b| {
            b.action(Action::hide_local_alert_bar(&self.navigator_uid));
        })
    }

    /// Gives this navigator input focus without touching its routes.
    pub fn focus(&self) -> Result<bool> {
        self.perform_action(|b| {
            b.action(Action::focus_navigator(&self.navigator_uid, self.navigator_type));
        })
    }
}

// ============================================================================
// Handle
// ============================================================================

#[derive(Clone)]
pub enum NavigatorHandle {
    Stack(Rc<StackNavigator>),
    Tab(Rc<TabNavigator>),
    Drawer(Rc<DrawerNavigator>),
    SlidingTab(Rc<SlidingTabNavigator>),
}

impl NavigatorHandle {
    pub fn core(&self) -> &NavigatorCore {
        match self {
            NavigatorHandle::Stack(n) => n.core(),
            NavigatorHandle::Tab(n) => n.core(),
            NavigatorHandle::Drawer(n) => n.core(),
            NavigatorHandle::SlidingTab(n) => n.core(),
        }
    }

    pub fn navigator_uid(&self) -> &str {
        self.core().navigator_uid()
    }

    pub fn navigator_id(&self) -> Option<&str> {
        self.core().navigator_id()
    }

    pub fn navigator_type(&self) -> NavigatorType {
        self.core().navigator_type()
    }

    fn wrong_type(&self, expected: NavigatorType) -> NavigationError {
        NavigationError::WrongNavigatorType {
            uid: self.navigator_uid().to_string(),
            expected,
            actual: self.navigator_type(),
        }
    }

    pub fn as_stack(&self) -> Result<Rc<StackNavigator>> {
        match self {
            NavigatorHandle::Stack(n) => Ok(Rc::clone(n)),
            _ => Err(self.wrong_type(NavigatorType::Stack)),
        }
    }

    pub fn as_tab(&self) -> Result<Rc<TabNavigator>> {
        match self {
            NavigatorHandle::Tab(n) => Ok(Rc::clone(n)),
            _ => Err(self.wrong_type(NavigatorType::Tab)),
        }
    }

    pub fn as_drawer(&self) -> Result<Rc<DrawerNavigator>> {
        match self {
            NavigatorHandle::Drawer(n) => Ok(Rc::clone(n)),
            _ => Err(self.wrong_type(NavigatorType::Drawer)),
        }
    }

    pub fn as_sliding_tab(&self) -> Result<Rc<SlidingTabNavigator>> {
        match self {
            NavigatorHandle::SlidingTab(n) => Ok(Rc::clone(n)),
            _ => Err(self.wrong_type(NavigatorType::SlidingTab)),
        }
    }

    /// Hooks the controller up to store notifications after mount.
    pub(crate) fn attach(&self, context: &NavigationContext) {
        if let NavigatorHandle::Stack(stack) = self {
            stack.attach(context);
        }
    }

    pub(crate) fn detach(&self, context: &NavigationContext) {
        if let NavigatorHandle::Stack(stack) = self {
            stack.detach(context);
        }
    }
}

// ============================================================================
// Mount request
// ============================================================================

/// Everything `NavigationContext::mount` needs to bring a navigator up.
#[derive(Clone, Debug)]
pub struct NavigatorMount {
    pub navigator_type: NavigatorType,
    pub navigator_id: Option<String>,
    pub parent_navigator_uid: Option<String>,
    /// When the parent is a tab navigator, the tab this navigator lives in.
    pub parent_tab_key: Option<String>,
    pub default_route_config: RouteConfig,
    pub routes: Vec<Route>,
    pub index: Option<usize>,
    /// Tabs or drawer items that can be jumped to but aren't mounted yet.
    pub items: Vec<Route>,
}

impl NavigatorMount {
    fn new(navigator_type: NavigatorType, routes: Vec<Route>, items: Vec<Route>) -> Self {
        Self {
            navigator_type,
            navigator_id: None,
            parent_navigator_uid: None,
            parent_tab_key: None,
            default_route_config: RouteConfig::default(),
            routes,
            index: None,
            items,
        }
    }

    /// A stack starting with `routes`, the last one focused.
    pub fn stack(routes: Vec<Route>) -> Self {
        Self::new(NavigatorType::Stack, routes, Vec::new())
    }

    /// A tab navigator over `tabs`, with only `initial` mounted.
    pub fn tabs(tabs: Vec<Route>, initial: &str) -> Result<Self> {
        let first = find_item(&tabs, initial)?;
        Ok(Self::new(NavigatorType::Tab, vec![first], tabs))
    }

    /// A drawer over `items`, with only `initial` mounted.
    pub fn drawer(items: Vec<Route>, initial: &str) -> Result<Self> {
        let first = find_item(&items, initial)?;
        Ok(Self::new(NavigatorType::Drawer, vec![first], items))
    }

    /// Sliding tabs mount every page up front and focus `initial` in place.
    pub fn sliding_tabs(tabs: Vec<Route>, initial: &str) -> Result<Self> {
        let index = tabs
            .iter()
            .position(|t| t.key() == initial)
            .ok_or_else(|| NavigationError::TabNotFound {
                uid: String::new(),
                key: initial.to_string(),
            })?;
        let mut mount = Self::new(NavigatorType::SlidingTab, tabs.clone(), tabs);
        mount.index = Some(index);
        Ok(mount)
    }

    pub fn with_id(mut self, navigator_id: impl Into<String>) -> Self {
        self.navigator_id = Some(navigator_id.into());
        self
    }

    pub fn with_parent(mut self, parent_navigator_uid: impl Into<String>) -> Self {
        self.parent_navigator_uid = Some(parent_navigator_uid.into());
        self
    }

    /// Nests this navigator inside tab `tab_key` of tab navigator `parent`.
    pub fn in_tab(mut self, parent_navigator_uid: impl Into<String>, tab_key: impl Into<String>) -> Self {
        self.parent_navigator_uid = Some(parent_navigator_uid.into());
        self.parent_tab_key = Some(tab_key.into());
        self
    }

    pub fn with_default_route_config(mut self, config: RouteConfig) -> Self {
        self.default_route_config = config;
        self
    }

    pub fn with_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }
}

fn find_item(items: &[Route], key: &str) -> Result<Route> {
    items
        .iter()
        .find(|r| r.key() == key)
        .cloned()
        .ok_or_else(|| NavigationError::TabNotFound {
            uid: String::new(),
            key: key.to_string(),
        })
}

/// Looks `key` up in the mounted routes first, then in the unmounted items.
pub(crate) fn locate_item(core: &NavigatorCore, items: &[Route], key: &str) -> Result<Route> {
    let state = core.navigator_state()?;
    state
        .routes
        .iter()
        .chain(items.iter())
        .find(|r| r.key() == key)
        .cloned()
        .ok_or_else(|| NavigationError::TabNotFound {
            uid: core.navigator_uid().to_string(),
            key: key.to_string(),
        })
}

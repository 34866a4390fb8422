//! # Navigation Context
//!
//! The facade screens and navigators talk to. It owns the store, the router,
//! and the registry of live navigator controllers.
//!
//! ```text
//! NavigationContext (Rc)
//! ├── Store            ← dispatch / state / subscribe
//! ├── Router           ← get_route
//! ├── registry         uid → NavigatorHandle
//! ├── FrameScheduler   ← one-frame deferrals
//! └── Clock            ← debounce
//!
//! controllers ──Weak──▶ context
//! ```
//!
//! Controllers only hold a weak link back, so dropping the context tears
//! everything down. Calls on a controller that outlived its context fail
//! with `ContextDropped`.

pub mod back_button;
pub mod debounce;
pub mod drawer;
pub mod navigator;
pub mod perform;
pub mod sliding_tab;
pub mod stack;
pub mod tab;

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use log::{debug, info};

use crate::core::action::Action;
use crate::core::config::NavigationSettings;
use crate::core::error::{NavigationError, Result};
use crate::core::params::Params;
use crate::core::route::{Route, generate_key};
use crate::core::state::{NavigationState, NavigatorType};
use crate::router::Router;
use crate::scheduler::{Clock, FrameScheduler, SystemClock};
use crate::store::{Store, SubscriptionId};

pub use back_button::{BackButtonManager, BackListenerId};
pub use drawer::DrawerNavigator;
pub use navigator::{NavigatorCore, NavigatorHandle, NavigatorMount};
pub use perform::ActionBuilder;
pub use sliding_tab::SlidingTabNavigator;
pub use stack::{RouteListenerHandle, StackNavigator};
pub use tab::TabNavigator;

struct ContextInner {
    store: Store,
    router: Router,
    navigators: RefCell<HashMap<String, NavigatorHandle>>,
    frames: FrameScheduler,
    clock: Rc<dyn Clock>,
    settings: NavigationSettings,
}

#[derive(Clone)]
pub struct NavigationContext {
    inner: Rc<ContextInner>,
}

/// Non-owning link to a `NavigationContext`.
#[derive(Clone)]
pub struct WeakContext {
    inner: Weak<ContextInner>,
}

impl WeakContext {
    pub fn upgrade(&self) -> Result<NavigationContext> {
        self.inner
            .upgrade()
            .map(|inner| NavigationContext { inner })
            .ok_or(NavigationError::ContextDropped)
    }
}

impl NavigationContext {
    pub fn new(router: Router, settings: NavigationSettings) -> Self {
        Self::with_runtime(router, settings, FrameScheduler::new(), Rc::new(SystemClock))
    }

    /// Builds a context on a host-supplied frame scheduler and clock.
    pub fn with_runtime(
        router: Router,
        settings: NavigationSettings,
        frames: FrameScheduler,
        clock: Rc<dyn Clock>,
    ) -> Self {
        Self {
            inner: Rc::new(ContextInner {
                store: Store::new(),
                router,
                navigators: RefCell::new(HashMap::new()),
                frames,
                clock,
                settings,
            }),
        }
    }

    pub fn downgrade(&self) -> WeakContext {
        WeakContext {
            inner: Rc::downgrade(&self.inner),
        }
    }

    // ── Store access ────────────────────────────────────────────────────────

    pub fn dispatch(&self, action: Action) -> Result<bool> {
        self.inner.store.dispatch(action)
    }

    pub fn state(&self) -> Rc<NavigationState> {
        self.inner.store.state()
    }

    pub fn subscribe(&self, subscriber: impl Fn(&Rc<NavigationState>) + 'static) -> SubscriptionId {
        self.inner.store.subscribe(subscriber)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.inner.store.unsubscribe(id);
    }

    /// Collects actions from `build` and dispatches them as one batch.
    /// Nothing is dispatched when `build` adds no actions.
    pub fn perform_action(&self, build: impl FnOnce(&mut ActionBuilder<'_>)) -> Result<bool> {
        let mut builder = ActionBuilder::new(self);
        build(&mut builder);
        let actions = builder.into_actions();
        if actions.is_empty() {
            return Ok(false);
        }
        debug!("perform_action dispatching {} actions", actions.len());
        self.dispatch(Action::batch(actions))
    }

    // ── Runtime ─────────────────────────────────────────────────────────────

    pub fn router(&self) -> &Router {
        &self.inner.router
    }

    pub fn get_route(&self, route_name: &str, params: Params) -> Result<Route> {
        self.inner.router.get_route(route_name, params)
    }

    pub fn frames(&self) -> &FrameScheduler {
        &self.inner.frames
    }

    pub fn clock(&self) -> Rc<dyn Clock> {
        Rc::clone(&self.inner.clock)
    }

    pub fn settings(&self) -> &NavigationSettings {
        &self.inner.settings
    }

    // ── Focus ───────────────────────────────────────────────────────────────

    pub fn current_navigator_uid(&self) -> Option<String> {
        self.state().current_navigator_uid.clone()
    }

    pub fn focused_route(&self) -> Option<Route> {
        self.state().focused_route().cloned()
    }

    // ── Registry ────────────────────────────────────────────────────────────

    /// Resolves a navigator by its logical id.
    pub fn get_navigator(&self, navigator_id: &str) -> Result<NavigatorHandle> {
        let navigators = self.inner.navigators.borrow();
        let mut matches = navigators
            .values()
            .filter(|handle| handle.navigator_id() == Some(navigator_id));
        let first = matches
            .next()
            .cloned()
            .ok_or_else(|| NavigationError::NavigatorIdNotFound {
                navigator_id: navigator_id.to_string(),
            })?;
        let others = matches.count();
        if others > 0 {
            return Err(NavigationError::AmbiguousNavigatorId {
                navigator_id: navigator_id.to_string(),
                count: others + 1,
            });
        }
        Ok(first)
    }

    pub fn get_navigator_by_uid(&self, navigator_uid: &str) -> Result<NavigatorHandle> {
        self.inner
            .navigators
            .borrow()
            .get(navigator_uid)
            .cloned()
            .ok_or_else(|| NavigationError::NavigatorNotFound {
                uid: navigator_uid.to_string(),
            })
    }

    /// The controller of the focused navigator, if it is registered.
    pub fn current_navigator(&self) -> Option<NavigatorHandle> {
        let uid = self.current_navigator_uid()?;
        self.get_navigator_by_uid(&uid).ok()
    }

    /// Registers `handle` under `navigator_uid`. A later registration for the
    /// same uid replaces the earlier one.
    pub fn register_navigator_context(&self, navigator_uid: &str, handle: NavigatorHandle) {
        self.inner
            .navigators
            .borrow_mut()
            .insert(navigator_uid.to_string(), handle);
    }

    pub fn unregister_navigator_context(&self, navigator_uid: &str) -> Option<NavigatorHandle> {
        self.inner.navigators.borrow_mut().remove(navigator_uid)
    }

    pub fn navigator_count(&self) -> usize {
        self.inner.navigators.borrow().len()
    }

    /// The navigator mounted inside tab `tab_key` of tab navigator `tab_uid`,
    /// with its type.
    pub(crate) fn nested_navigator_for_tab(
        &self,
        tab_uid: &str,
        tab_key: &str,
    ) -> Option<(String, NavigatorType)> {
        let tab = self.get_navigator_by_uid(tab_uid).ok()?.as_tab().ok()?;
        let nested_uid = tab.nested_navigator(tab_key)?;
        let nested_type = self.get_navigator_by_uid(&nested_uid).ok()?.navigator_type();
        Some((nested_uid, nested_type))
    }

    // ── Mounting ────────────────────────────────────────────────────────────

    /// Creates a navigator: generates its uid, registers its controller, and
    /// dispatches `SET_CURRENT_NAVIGATOR` with its initial routes.
    pub fn mount(&self, mount: NavigatorMount) -> Result<NavigatorHandle> {
        let uid = generate_key();
        let core = NavigatorCore::new(
            uid.clone(),
            mount.parent_navigator_uid.clone(),
            mount.navigator_id.clone(),
            mount.navigator_type,
            self.downgrade(),
        );
        let handle = match mount.navigator_type {
            NavigatorType::Stack => NavigatorHandle::Stack(Rc::new(StackNavigator::new(
                core,
                &self.inner.settings,
                self.clock(),
            ))),
            NavigatorType::Tab => {
                NavigatorHandle::Tab(Rc::new(TabNavigator::new(core, mount.items.clone())))
            }
            NavigatorType::Drawer => {
                NavigatorHandle::Drawer(Rc::new(DrawerNavigator::new(core, mount.items.clone())))
            }
            NavigatorType::SlidingTab => {
                NavigatorHandle::SlidingTab(Rc::new(SlidingTabNavigator::new(core)))
            }
        };
        self.register_navigator_context(&uid, handle.clone());

        let action = Action::set_current_navigator(
            uid.clone(),
            mount.parent_navigator_uid.clone(),
            mount.navigator_type,
            mount.default_route_config,
            Some(mount.routes),
            mount.index,
        );
        if let Err(err) = self.dispatch(action) {
            self.unregister_navigator_context(&uid);
            return Err(err);
        }

        if let (Some(parent_uid), Some(tab_key)) = (&mount.parent_navigator_uid, &mount.parent_tab_key) {
            match self.get_navigator_by_uid(parent_uid).and_then(|h| h.as_tab()) {
                Ok(tab) => tab.register_nested_navigator(tab_key, &uid),
                Err(err) => debug!("Not linking {uid} into tab {tab_key}: {err}"),
            }
        }
        handle.attach(self);

        info!(
            "Mounted {} navigator {uid}{}",
            mount.navigator_type,
            mount
                .navigator_id
                .as_deref()
                .map(|id| format!(" ({id})"))
                .unwrap_or_default()
        );
        Ok(handle)
    }

    /// Removes a navigator from the state and the registry. Returns whether
    /// the state changed.
    pub fn unmount(&self, navigator_uid: &str) -> Result<bool> {
        let changed = self.dispatch(Action::remove_navigator(navigator_uid))?;
        if let Some(handle) = self.unregister_navigator_context(navigator_uid) {
            handle.detach(self);
        }
        let tabs: Vec<Rc<TabNavigator>> = self
            .inner
            .navigators
            .borrow()
            .values()
            .filter_map(|h| h.as_tab().ok())
            .collect();
        for tab in tabs {
            tab.unregister_nested_navigator(navigator_uid);
        }
        info!("Unmounted navigator {navigator_uid}");
        Ok(changed)
    }
}

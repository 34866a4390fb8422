//! # Stack Navigator
//!
//! Controller for push/pop navigation.
//!
//! `push` and `pop` are user-facing and debounced: a second tap inside the
//! debounce window is swallowed and reported as `Ok(false)`. Every write is
//! a `perform_action` batch built with `stacks(uid)`.
//!
//! Route listeners fire after a commit that moves the focused index.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use log::debug;

use crate::context::NavigationContext;
use crate::context::debounce::Debounce;
use crate::context::navigator::NavigatorCore;
use crate::core::config::NavigationSettings;
use crate::core::error::Result;
use crate::core::params::Params;
use crate::core::route::Route;
use crate::core::state::{Alert, NavigationState};
use crate::scheduler::Clock;
use crate::store::SubscriptionId;

type RouteListener = Rc<dyn Fn(&Route)>;

struct RouteListeners {
    next_id: Cell<u64>,
    listeners: RefCell<Vec<(u64, RouteListener)>>,
    last_index: Cell<Option<usize>>,
}

impl RouteListeners {
    fn on_state(&self, uid: &str, state: &NavigationState) {
        let Some(navigator) = state.navigator(uid) else {
            return;
        };
        if self.last_index.replace(Some(navigator.index)) == Some(navigator.index) {
            return;
        }
        let Some(route) = navigator.current_route() else {
            return;
        };
        let listeners: Vec<RouteListener> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, l)| Rc::clone(l))
            .collect();
        for listener in listeners {
            listener(route);
        }
    }
}

/// Returned by `StackNavigator::add_route_listener`.
pub struct RouteListenerHandle {
    id: u64,
    listeners: Weak<RouteListeners>,
}

impl RouteListenerHandle {
    pub fn remove(self) {
        if let Some(listeners) = self.listeners.upgrade() {
            listeners.listeners.borrow_mut().retain(|(id, _)| *id != self.id);
        }
    }
}

pub struct StackNavigator {
    core: NavigatorCore,
    push_debounce: Debounce,
    pop_debounce: Debounce,
    use_animation: Rc<Cell<bool>>,
    listeners: Rc<RouteListeners>,
    subscription: Cell<Option<SubscriptionId>>,
}

impl StackNavigator {
    pub(crate) fn new(core: NavigatorCore, settings: &NavigationSettings, clock: Rc<dyn Clock>) -> Self {
        Self {
            core,
            push_debounce: Debounce::new(Rc::clone(&clock), settings.debounce_window),
            pop_debounce: Debounce::new(clock, settings.debounce_window),
            use_animation: Rc::new(Cell::new(true)),
            listeners: Rc::new(RouteListeners {
                next_id: Cell::new(0),
                listeners: RefCell::new(Vec::new()),
                last_index: Cell::new(None),
            }),
            subscription: Cell::new(None),
        }
    }

    pub fn core(&self) -> &NavigatorCore {
        &self.core
    }

    pub fn navigator_uid(&self) -> &str {
        self.core.navigator_uid()
    }

    /// Pushes `route`. Returns `Ok(false)` when debounced.
    pub fn push(&self, route: Route) -> Result<bool> {
        if !self.push_debounce.attempt() {
            debug!("Debounced push of {} on {}", route.route_name(), self.navigator_uid());
            return Ok(false);
        }
        let uid = self.navigator_uid().to_string();
        self.core.perform_action(|b| {
            b.stacks(uid).push(route);
        })
    }

    /// Builds `route_name` through the router and pushes it.
    pub fn push_route(&self, route_name: &str, params: Params) -> Result<bool> {
        let route = self.core.context()?.get_route(route_name, params)?;
        self.push(route)
    }

    /// Pops the top route. Returns `Ok(false)` when debounced or at the root.
    pub fn pop(&self) -> Result<bool> {
        if !self.pop_debounce.attempt() {
            debug!("Debounced pop on {}", self.navigator_uid());
            return Ok(false);
        }
        self.core.perform_action(|b| {
            b.stacks(self.navigator_uid()).pop();
        })
    }

    pub fn pop_to_top(&self) -> Result<bool> {
        self.core.perform_action(|b| {
            b.stacks(self.navigator_uid()).pop_to_top();
        })
    }

    pub fn current_route(&self) -> Result<Option<Route>> {
        self.core.current_route()
    }

    pub fn current_index(&self) -> Result<usize> {
        self.core.current_index()
    }

    pub fn routes(&self) -> Result<Vec<Route>> {
        self.core.routes()
    }

    /// Replaces the whole stack without a transition. Animations come back
    /// on the next frame.
    pub fn immediately_reset_stack(&self, routes: Vec<Route>, index: usize) -> Result<bool> {
        let context = self.core.context()?;
        self.use_animation.set(false);
        let reset = context.perform_action(|b| {
            b.stacks(self.navigator_uid()).immediately_reset_stack(routes, index);
        });
        match reset {
            Ok(changed) => {
                let flag = Rc::clone(&self.use_animation);
                context.frames().request_frame(move || flag.set(true));
                Ok(changed)
            }
            Err(err) => {
                self.use_animation.set(true);
                Err(err)
            }
        }
    }

    /// Whether the renderer should animate the next transition.
    pub fn use_animation(&self) -> bool {
        self.use_animation.get()
    }

    pub fn update_current_route_params(&self, params: Params) -> Result<bool> {
        self.core.perform_action(|b| {
            b.stacks(self.navigator_uid()).update_current_route_params(params);
        })
    }

    pub fn show_local_alert(&self, alert: Alert) -> Result<bool> {
        self.core.show_local_alert(alert)
    }

    pub fn hide_local_alert(&self) -> Result<bool> {
        self.core.hide_local_alert()
    }

    /// Calls `listener` with the newly focused route whenever the focused
    /// index changes.
    pub fn add_route_listener(&self, listener: impl Fn(&Route) + 'static) -> RouteListenerHandle {
        let id = self.listeners.next_id.get();
        self.listeners.next_id.set(id + 1);
        self.listeners
            .listeners
            .borrow_mut()
            .push((id, Rc::new(listener)));
        RouteListenerHandle {
            id,
            listeners: Rc::downgrade(&self.listeners),
        }
    }

    pub(crate) fn attach(&self, context: &NavigationContext) {
        if self.subscription.get().is_some() {
            return;
        }
        let uid = self.navigator_uid().to_string();
        let initial = context.state().navigator(&uid).map(|n| n.index);
        self.listeners.last_index.set(initial);

        let listeners = Rc::clone(&self.listeners);
        let id = context.subscribe(move |state| listeners.on_state(&uid, state));
        self.subscription.set(Some(id));
    }

    pub(crate) fn detach(&self, context: &NavigationContext) {
        if let Some(id) = self.subscription.take() {
            context.unsubscribe(id);
        }
    }
}

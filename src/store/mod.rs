//! # Navigation Store
//!
//! The dispatch/subscribe container around the navigation reducer.
//!
//! ```text
//! dispatch(action)
//!   │
//!   ├── open Batch envelopes
//!   ├── each primitive action → middleware chain → batched reducer
//!   │
//!   └── commit once → notify subscribers once (only if the state changed)
//! ```
//!
//! `dispatch` reports whether the state reference changed. The back-button
//! manager uses that to decide whether the app should exit.

pub mod middleware;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::core::action::Action;
use crate::core::batch::batched;
use crate::core::error::Result;
use crate::core::reducer::reduce;
use crate::core::state::NavigationState;

pub use middleware::{
    GoBackMiddleware, LoggingMiddleware, Middleware, RouteParamsMiddleware, default_middleware,
};

type ReducerFn = Box<dyn Fn(&Rc<NavigationState>, &Action) -> Result<Rc<NavigationState>>>;
type Subscriber = Rc<dyn Fn(&Rc<NavigationState>)>;

/// Handle returned by `Store::subscribe`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubscriptionId(u64);

pub struct Store {
    state: RefCell<Rc<NavigationState>>,
    reducer: ReducerFn,
    middleware: Vec<Box<dyn Middleware>>,
    subscribers: RefCell<Vec<(SubscriptionId, Subscriber)>>,
    next_subscription: Cell<u64>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    /// A store with the default middleware chain.
    pub fn new() -> Self {
        Self::with_middleware(default_middleware())
    }

    pub fn with_middleware(middleware: Vec<Box<dyn Middleware>>) -> Self {
        Self {
            state: RefCell::new(Rc::new(NavigationState::default())),
            reducer: Box::new(batched(reduce)),
            middleware,
            subscribers: RefCell::new(Vec::new()),
            next_subscription: Cell::new(0),
        }
    }

    /// The current snapshot.
    pub fn state(&self) -> Rc<NavigationState> {
        Rc::clone(&self.state.borrow())
    }

    /// Applies `action` and returns whether the state changed.
    pub fn dispatch(&self, action: Action) -> Result<bool> {
        let previous = self.state();
        let next = self.step(&previous, action)?;
        if Rc::ptr_eq(&previous, &next) {
            return Ok(false);
        }
        *self.state.borrow_mut() = Rc::clone(&next);
        self.notify(&next);
        Ok(true)
    }

    pub fn subscribe(&self, subscriber: impl Fn(&Rc<NavigationState>) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription.get());
        self.next_subscription.set(id.0 + 1);
        self.subscribers.borrow_mut().push((id, Rc::new(subscriber)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.subscribers.borrow_mut().retain(|(sub, _)| *sub != id);
    }

    fn step(&self, state: &Rc<NavigationState>, action: Action) -> Result<Rc<NavigationState>> {
        match action {
            Action::Batch(actions) => {
                let mut next = Rc::clone(state);
                for inner in actions {
                    next = self.step(&next, inner)?;
                }
                Ok(next)
            }
            action => match self.run_middleware(state, action) {
                Some(action) => (self.reducer)(state, &action),
                None => Ok(Rc::clone(state)),
            },
        }
    }

    fn run_middleware(&self, state: &NavigationState, action: Action) -> Option<Action> {
        self.middleware
            .iter()
            .try_fold(action, |action, m| m.process(state, action))
    }

    fn notify(&self, state: &Rc<NavigationState>) {
        // Snapshot so subscribers may dispatch or unsubscribe re-entrantly.
        let subscribers: Vec<Subscriber> = self
            .subscribers
            .borrow()
            .iter()
            .map(|(_, s)| Rc::clone(s))
            .collect();
        for subscriber in subscribers {
            subscriber(state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::params::Params;
    use crate::core::route::{Route, RouteConfig};
    use crate::core::state::NavigatorType;

    fn route(key: &str) -> Route {
        Route::with_key(key, key, Params::new())
    }

    fn store_with_stack(uid: &str, routes: Vec<Route>) -> Store {
        let store = Store::new();
        store.dispatch(Action::initialize()).unwrap();
        store
            .dispatch(Action::set_current_navigator(
                uid,
                None,
                NavigatorType::Stack,
                RouteConfig::default(),
                Some(routes),
                None,
            ))
            .unwrap();
        store
    }

    #[test]
    fn test_batch_notifies_once() {
        let store = store_with_stack("a", vec![route("a1"), route("a2")]);
        let notifications = Rc::new(Cell::new(0));
        let counter = Rc::clone(&notifications);
        store.subscribe(move |_| counter.set(counter.get() + 1));

        let changed = store
            .dispatch(Action::batch(vec![Action::pop("a"), Action::push("b", route("b1"))]))
            .unwrap();

        assert!(changed);
        assert_eq!(notifications.get(), 1);
        assert_eq!(store.state().navigator("b").unwrap().routes.len(), 1);
    }

    #[test]
    fn test_noop_does_not_notify() {
        let store = store_with_stack("a", vec![route("a1")]);
        let notifications = Rc::new(Cell::new(0));
        let counter = Rc::clone(&notifications);
        store.subscribe(move |_| counter.set(counter.get() + 1));

        assert!(!store.dispatch(Action::pop("a")).unwrap());
        assert_eq!(notifications.get(), 0);
    }

    #[test]
    fn test_equal_params_produce_no_notification() {
        let store = store_with_stack(
            "a",
            vec![Route::with_key("a1", "a1", Params::new().with("q", "x"))],
        );
        let before = store.state().navigator("a").unwrap().routes[0].clone();
        let notifications = Rc::new(Cell::new(0));
        let counter = Rc::clone(&notifications);
        store.subscribe(move |_| counter.set(counter.get() + 1));

        let changed = store
            .dispatch(Action::update_current_route_params("a", Params::new().with("q", "x")))
            .unwrap();

        assert!(!changed);
        assert_eq!(notifications.get(), 0);
        assert!(store.state().navigator("a").unwrap().routes[0].is_same_instance(&before));
    }

    #[test]
    fn test_params_middleware_sees_state_inside_batch() {
        let store = store_with_stack("a", vec![route("a1")]);
        let changed = store
            .dispatch(Action::batch(vec![
                Action::push("a", Route::with_key("a2", "a2", Params::new().with("n", 1i64))),
                Action::update_current_route_params("a", Params::new().with("n", 2i64)),
            ]))
            .unwrap();
        assert!(changed);
        let state = store.state();
        let top = state.navigator("a").unwrap().current_route().unwrap();
        assert_eq!(top.key(), "a2");
        assert_eq!(top.params().get("n").and_then(|v| v.as_f64()), Some(2.0));
    }

    #[test]
    fn test_go_back_inside_batch() {
        let store = store_with_stack("a", vec![route("a1"), route("a2"), route("a3")]);
        store
            .dispatch(Action::batch(vec![Action::go_back(), Action::go_back()]))
            .unwrap();
        assert_eq!(store.state().navigator("a").unwrap().index, 0);
    }

    #[test]
    fn test_go_back_reports_unchanged_at_root() {
        let store = store_with_stack("a", vec![route("a1")]);
        assert!(!store.dispatch(Action::go_back()).unwrap());
    }

    #[test]
    fn test_failed_batch_leaves_state_untouched() {
        let store = store_with_stack("a", vec![route("a1"), route("a2")]);
        let before = store.state();
        let result = store.dispatch(Action::batch(vec![Action::pop("a"), Action::pop("nope")]));
        assert!(result.is_err());
        assert!(Rc::ptr_eq(&before, &store.state()));
    }

    #[test]
    fn test_unsubscribe_stops_notifications() {
        let store = store_with_stack("a", vec![route("a1")]);
        let notifications = Rc::new(Cell::new(0));
        let counter = Rc::clone(&notifications);
        let id = store.subscribe(move |_| counter.set(counter.get() + 1));
        store.unsubscribe(id);
        store.dispatch(Action::push("a", route("a2"))).unwrap();
        assert_eq!(notifications.get(), 0);
    }
}

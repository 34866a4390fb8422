//! # Middleware
//!
//! Middleware sees every primitive action before the reducer does, together
//! with the state the action is about to be applied to. It can pass the
//! action through, rewrite it, or drop it.
//!
//! Batches are opened by the store before middleware runs, so each inner
//! action is checked against the state left by the actions before it.

use log::debug;

use crate::core::action::Action;
use crate::core::reducer::go_back_target;
use crate::core::state::NavigationState;

pub trait Middleware {
    /// Returns the action to reduce, or `None` to drop it.
    fn process(&self, state: &NavigationState, action: Action) -> Option<Action>;
}

/// Turns `GO_BACK` into a pop of the focused navigator, or of its parent when
/// the focused navigator is already at its root.
pub struct GoBackMiddleware;

impl Middleware for GoBackMiddleware {
    fn process(&self, state: &NavigationState, action: Action) -> Option<Action> {
        match action {
            Action::GoBack => match go_back_target(state) {
                Some(target) => {
                    debug!("GO_BACK resolves to POP on {target}");
                    Some(Action::pop(target))
                }
                None => {
                    debug!("GO_BACK with nothing to pop");
                    None
                }
            },
            other => Some(other),
        }
    }
}

/// Drops `UPDATE_CURRENT_ROUTE_PARAMS` when the merged params equal the
/// current ones, otherwise rewrites it into `UPDATE_ROUTE_AT_INDEX`.
pub struct RouteParamsMiddleware;

impl Middleware for RouteParamsMiddleware {
    fn process(&self, state: &NavigationState, action: Action) -> Option<Action> {
        let Action::UpdateCurrentRouteParams {
            navigator_uid,
            params,
        } = action
        else {
            return Some(action);
        };

        // Unknown navigators and empty stacks fall through so the reducer
        // reports the precondition failure.
        let Some((index, current)) = state
            .navigator(&navigator_uid)
            .and_then(|n| n.current_route().map(|r| (n.index, r)))
        else {
            return Some(Action::UpdateCurrentRouteParams {
                navigator_uid,
                params,
            });
        };

        let merged = current.params().merged_with(&params);
        if merged == *current.params() {
            debug!("Params for route {} unchanged, skipping update", current.key());
            return None;
        }
        Some(Action::update_route_at_index(
            navigator_uid,
            index,
            current.with_params(merged),
        ))
    }
}

/// Logs every action that makes it to the reducer.
pub struct LoggingMiddleware;

impl Middleware for LoggingMiddleware {
    fn process(&self, _state: &NavigationState, action: Action) -> Option<Action> {
        match action.navigator_uid() {
            Some(uid) => debug!("Dispatch {} on {uid}", action.kind()),
            None => debug!("Dispatch {}", action.kind()),
        }
        Some(action)
    }
}

/// The chain every `Store::new` starts with.
pub fn default_middleware() -> Vec<Box<dyn Middleware>> {
    vec![
        Box::new(GoBackMiddleware),
        Box::new(RouteParamsMiddleware),
        Box::new(LoggingMiddleware),
    ]
}

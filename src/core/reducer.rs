//! # Navigation Reducer
//!
//! `reduce(state, action)` is a pure function: it never mutates its input
//! and returns the very same `Rc` when an action changes nothing, so that
//! consumers can detect changes with `Rc::ptr_eq`.
//!
//! A new snapshot is a shallow copy of the previous one: the navigator map
//! holds `Rc<NavigatorState>`, so only the navigator an action touches is
//! rebuilt and every other navigator is shared.

use std::rc::Rc;

use log::{debug, warn};

use crate::core::action::Action;
use crate::core::error::{NavigationError, Result};
use crate::core::params::Params;
use crate::core::route::{Route, RouteConfig};
use crate::core::state::{Alert, NavigationState, NavigatorState, NavigatorType};

pub fn reduce(state: &Rc<NavigationState>, action: &Action) -> Result<Rc<NavigationState>> {
    match action {
        Action::Initialize => Ok(Rc::new(NavigationState::default())),
        Action::SetCurrentNavigator {
            navigator_uid,
            parent_navigator_uid,
            navigator_type,
            default_route_config,
            routes,
            index,
        } => set_current_navigator(
            state,
            navigator_uid,
            parent_navigator_uid.as_deref(),
            *navigator_type,
            default_route_config,
            routes.as_deref(),
            *index,
        ),
        Action::RemoveNavigator { navigator_uid } => Ok(remove_navigator(state, navigator_uid)),
        Action::Push {
            navigator_uid,
            route,
        } => push(state, navigator_uid, route),
        Action::Pop { navigator_uid } | Action::ToggleDrawer { navigator_uid } => {
            pop(state, navigator_uid)
        }
        Action::PopToTop { navigator_uid } => pop_to_top(state, navigator_uid),
        Action::ImmediatelyResetStack {
            navigator_uid,
            routes,
            index,
        } => immediately_reset_stack(state, navigator_uid, routes, *index),
        Action::UpdateRouteAtIndex {
            navigator_uid,
            index,
            route,
        } => update_route_at_index(state, navigator_uid, *index, route),
        Action::UpdateCurrentRouteParams {
            navigator_uid,
            params,
        } => update_current_route_params(state, navigator_uid, params),
        Action::JumpToTab { navigator_uid, tab } => jump(state, navigator_uid, tab, JumpKind::Tab),
        Action::JumpToItem {
            navigator_uid,
            item,
        } => jump(state, navigator_uid, item, JumpKind::Item),
        Action::GoBack => match go_back_target(state) {
            Some(target) => pop(state, &target),
            None => Ok(Rc::clone(state)),
        },
        Action::ShowLocalAlertBar {
            navigator_uid,
            alert,
        } => show_alert(state, navigator_uid, alert),
        Action::HideLocalAlertBar { navigator_uid } => Ok(hide_alert(state, navigator_uid)),
        Action::Batch(actions) => {
            warn!(
                "Batch of {} actions reached the plain reducer, wrap it with `batched`",
                actions.len()
            );
            Ok(Rc::clone(state))
        }
    }
}

/// Which navigator the back button should pop: the focused navigator, or its
/// parent when the focused one is already at its root route.
pub fn go_back_target(state: &NavigationState) -> Option<String> {
    let current = state.current_navigator()?;
    if !current.is_at_root() {
        return Some(current.navigator_uid.clone());
    }
    current
        .parent_navigator_uid
        .as_deref()
        .and_then(|parent| state.navigator(parent))
        .map(|parent| parent.navigator_uid.clone())
}

// ============================================================================
// Helpers
// ============================================================================

fn require<'a>(state: &'a NavigationState, uid: &str) -> Result<&'a NavigatorState> {
    state
        .navigator(uid)
        .ok_or_else(|| NavigationError::NavigatorNotFound {
            uid: uid.to_string(),
        })
}

fn require_key(route: &Route) -> Result<()> {
    if route.key().is_empty() {
        return Err(NavigationError::MissingRouteKey {
            route_name: route.route_name().to_string(),
        });
    }
    Ok(())
}

fn check_index(uid: &str, index: usize, len: usize) -> Result<()> {
    // An empty navigator is allowed, it just doesn't render.
    if index >= len && !(len == 0 && index == 0) {
        return Err(NavigationError::IndexOutOfBounds {
            uid: uid.to_string(),
            index,
            len,
        });
    }
    Ok(())
}

fn apply_default_config(routes: &[Route], default: &RouteConfig) -> Vec<Route> {
    routes
        .iter()
        .map(|route| route.with_default_config(default))
        .collect()
}

/// Returns a new state with `navigator` stored under its UID.
fn replace_navigator(state: &NavigationState, navigator: NavigatorState) -> Rc<NavigationState> {
    let mut next = state.clone();
    next.navigators
        .insert(navigator.navigator_uid.clone(), Rc::new(navigator));
    Rc::new(next)
}

// ============================================================================
// Operations
// ============================================================================

fn set_current_navigator(
    state: &Rc<NavigationState>,
    uid: &str,
    parent_uid: Option<&str>,
    navigator_type: NavigatorType,
    default_route_config: &Rc<RouteConfig>,
    routes: Option<&[Route]>,
    index: Option<usize>,
) -> Result<Rc<NavigationState>> {
    let existing = state.navigator(uid);

    let Some(routes) = routes else {
        // Focus-only update, valid for registered navigators only.
        let Some(existing) = existing else {
            debug!("SET_CURRENT_NAVIGATOR for unknown navigator {uid} without routes, ignoring");
            return Ok(Rc::clone(state));
        };
        let parent_changed =
            parent_uid.is_some() && existing.parent_navigator_uid.as_deref() != parent_uid;
        if !parent_changed && state.current_navigator_uid.as_deref() == Some(uid) {
            return Ok(Rc::clone(state));
        }
        let mut next = NavigationState::clone(state);
        if parent_changed {
            let mut navigator = existing.clone();
            navigator.parent_navigator_uid = parent_uid.map(str::to_string);
            next.navigators.insert(uid.to_string(), Rc::new(navigator));
        }
        next.current_navigator_uid = Some(uid.to_string());
        return Ok(Rc::new(next));
    };

    for route in routes {
        require_key(route)?;
    }
    let index = index.unwrap_or(routes.len().saturating_sub(1));
    check_index(uid, index, routes.len())?;

    let navigator = NavigatorState {
        navigator_uid: uid.to_string(),
        parent_navigator_uid: parent_uid
            .map(str::to_string)
            .or_else(|| existing.and_then(|n| n.parent_navigator_uid.clone())),
        navigator_type,
        routes: apply_default_config(routes, default_route_config),
        index,
        default_route_config: Rc::clone(default_route_config),
    };

    let mut next = NavigationState::clone(state);
    next.navigators.insert(uid.to_string(), Rc::new(navigator));
    next.current_navigator_uid = Some(uid.to_string());
    Ok(Rc::new(next))
}

fn remove_navigator(state: &Rc<NavigationState>, uid: &str) -> Rc<NavigationState> {
    if !state.navigators.contains_key(uid) {
        return Rc::clone(state);
    }

    let mut next = NavigationState::clone(state);
    let removed = next.navigators.remove(uid);
    next.alerts.remove(uid);

    if next.current_navigator_uid.as_deref() == Some(uid) {
        let mut restored = None;
        while let Some(candidate) = next.focus_restore_stack.pop() {
            if candidate != uid && next.navigators.contains_key(&candidate) {
                restored = Some(candidate);
                break;
            }
        }
        let parent = removed
            .and_then(|n| n.parent_navigator_uid.clone())
            .filter(|parent| next.navigators.contains_key(parent));

        next.current_navigator_uid = restored.or(parent);
        match &next.current_navigator_uid {
            Some(current) => debug!("Removed focused navigator {uid}, focus moves to {current}"),
            None => warn!("Removed focused navigator {uid} with no navigator to restore focus to"),
        }
    }
    next.focus_restore_stack.retain(|u| u != uid);
    Rc::new(next)
}

fn push(state: &Rc<NavigationState>, uid: &str, route: &Route) -> Result<Rc<NavigationState>> {
    require_key(route)?;

    let mut next = NavigationState::clone(state);
    if next.current_navigator_uid.as_deref() != Some(uid) {
        if let Some(previous) = next.current_navigator_uid.take() {
            // Each navigator appears at most once, and never while focused.
            next.focus_restore_stack
                .retain(|u| u != &previous && u != uid);
            next.focus_restore_stack.push(previous);
        }
    }

    let mut navigator = match state.navigator(uid) {
        Some(existing) => existing.clone(),
        None => {
            debug!("PUSH to unknown navigator {uid}, creating an empty stack");
            NavigatorState::empty(uid, NavigatorType::Stack)
        }
    };
    navigator
        .routes
        .push(route.with_default_config(&navigator.default_route_config));
    navigator.index = navigator.routes.len() - 1;

    next.navigators.insert(uid.to_string(), Rc::new(navigator));
    next.current_navigator_uid = Some(uid.to_string());
    Ok(Rc::new(next))
}

fn pop(state: &Rc<NavigationState>, uid: &str) -> Result<Rc<NavigationState>> {
    let existing = require(state, uid)?;
    if existing.is_at_root() {
        return Ok(Rc::clone(state));
    }

    let mut navigator = existing.clone();
    if navigator.navigator_type == NavigatorType::SlidingTab {
        // Sliding tabs are pages, not a stack: popping refocuses the first one.
        navigator.index = 0;
    } else {
        navigator.routes.truncate(navigator.index);
        navigator.index -= 1;
    }
    Ok(replace_navigator(state, navigator))
}

fn pop_to_top(state: &Rc<NavigationState>, uid: &str) -> Result<Rc<NavigationState>> {
    let existing = require(state, uid)?;
    let mut navigator = existing.clone();

    if navigator.navigator_type == NavigatorType::SlidingTab {
        if navigator.index == 0 {
            return Ok(Rc::clone(state));
        }
        navigator.index = 0;
    } else {
        if navigator.routes.len() <= 1 && navigator.index == 0 {
            return Ok(Rc::clone(state));
        }
        navigator.routes.truncate(1);
        navigator.index = 0;
    }
    Ok(replace_navigator(state, navigator))
}

fn immediately_reset_stack(
    state: &Rc<NavigationState>,
    uid: &str,
    routes: &[Route],
    index: usize,
) -> Result<Rc<NavigationState>> {
    let existing = require(state, uid)?;
    for route in routes {
        require_key(route)?;
    }
    check_index(uid, index, routes.len())?;

    let mut navigator = existing.clone();
    navigator.routes = apply_default_config(routes, &navigator.default_route_config);
    navigator.index = index;
    Ok(replace_navigator(state, navigator))
}

fn update_route_at_index(
    state: &Rc<NavigationState>,
    uid: &str,
    index: usize,
    route: &Route,
) -> Result<Rc<NavigationState>> {
    let existing = require(state, uid)?;
    require_key(route)?;
    if index >= existing.routes.len() {
        return Err(NavigationError::IndexOutOfBounds {
            uid: uid.to_string(),
            index,
            len: existing.routes.len(),
        });
    }

    let mut navigator = existing.clone();
    navigator.routes[index] = route.clone();
    Ok(replace_navigator(state, navigator))
}

fn update_current_route_params(
    state: &Rc<NavigationState>,
    uid: &str,
    params: &Params,
) -> Result<Rc<NavigationState>> {
    let existing = require(state, uid)?;
    let current = existing
        .current_route()
        .ok_or_else(|| NavigationError::IndexOutOfBounds {
            uid: uid.to_string(),
            index: existing.index,
            len: existing.routes.len(),
        })?;
    let updated = current.with_params(current.params().merged_with(params));
    update_route_at_index(state, uid, existing.index, &updated)
}

#[derive(Clone, Copy)]
enum JumpKind {
    Tab,
    Item,
}

fn jump(
    state: &Rc<NavigationState>,
    uid: &str,
    route: &Route,
    kind: JumpKind,
) -> Result<Rc<NavigationState>> {
    let existing = require(state, uid)?;
    require_key(route)?;

    let allowed = match kind {
        JumpKind::Tab => matches!(
            existing.navigator_type,
            NavigatorType::Tab | NavigatorType::SlidingTab
        ),
        JumpKind::Item => existing.navigator_type == NavigatorType::Drawer,
    };
    if !allowed {
        return Err(NavigationError::WrongNavigatorType {
            uid: uid.to_string(),
            expected: match kind {
                JumpKind::Tab => NavigatorType::Tab,
                JumpKind::Item => NavigatorType::Drawer,
            },
            actual: existing.navigator_type,
        });
    }

    let position = existing.position_of(route.key());
    if position == Some(existing.index) {
        return Ok(Rc::clone(state));
    }

    let mut navigator = existing.clone();
    if navigator.navigator_type == NavigatorType::SlidingTab {
        // All sliding tabs are mounted as adjacent pages: focus in place.
        navigator.index = position.ok_or_else(|| NavigationError::TabNotFound {
            uid: uid.to_string(),
            key: route.key().to_string(),
        })?;
    } else {
        // Most-recently-used order: the focused tab always ends up last.
        let moved = match position {
            Some(pos) => navigator.routes.remove(pos),
            None => route.with_default_config(&navigator.default_route_config),
        };
        navigator.routes.push(moved);
        navigator.index = navigator.routes.len() - 1;
    }
    Ok(replace_navigator(state, navigator))
}

fn show_alert(state: &Rc<NavigationState>, uid: &str, alert: &Alert) -> Result<Rc<NavigationState>> {
    require(state, uid)?;
    if state.alerts.get(uid) == Some(alert) {
        return Ok(Rc::clone(state));
    }
    let mut next = NavigationState::clone(state);
    next.alerts.insert(uid.to_string(), alert.clone());
    Ok(Rc::new(next))
}

fn hide_alert(state: &Rc<NavigationState>, uid: &str) -> Rc<NavigationState> {
    if !state.alerts.contains_key(uid) {
        return Rc::clone(state);
    }
    let mut next = NavigationState::clone(state);
    next.alerts.remove(uid);
    Rc::new(next)
}

//! Actions and reducer for the shared-element store.
//!
//! The reducer is pure like the navigation reducer, but the state is small
//! and transient, so it works on plain clones.

use log::{debug, warn};

use crate::shared_element::overlay::compute_overlay;
use crate::shared_element::state::{
    ElementGroup, ElementMetrics, GroupStyle, SharedElement, SharedElementState, TransitionError,
    TransitionSession,
};

#[derive(Clone, Debug)]
pub enum SharedElementAction {
    RegisterGroup {
        uid: String,
        id: String,
        route_key: String,
        element_ids: Vec<String>,
        style: GroupStyle,
    },
    UpdateMetricsForElement {
        group_uid: String,
        element_id: String,
        metrics: ElementMetrics,
    },
    UnregisterGroup {
        uid: String,
    },
    StartTransitionForElementGroups {
        from_group_uid: String,
        to_group_uid: String,
        progress: f64,
    },
    SetTransitionProgress {
        progress: f64,
    },
    EndTransitionForElementGroups,
}

pub fn reduce(
    state: &SharedElementState,
    action: &SharedElementAction,
) -> Result<SharedElementState, TransitionError> {
    let mut next = state.clone();
    match action {
        SharedElementAction::RegisterGroup {
            uid,
            id,
            route_key,
            element_ids,
            style,
        } => {
            // Re-registering keeps metrics of elements that are still there.
            let previous = next.groups.remove(uid);
            let elements = element_ids
                .iter()
                .map(|element_id| SharedElement {
                    id: element_id.clone(),
                    metrics: previous.as_ref().and_then(|g| g.metrics(element_id)),
                })
                .collect();
            next.groups.insert(
                uid.clone(),
                ElementGroup {
                    uid: uid.clone(),
                    id: id.clone(),
                    route_key: route_key.clone(),
                    elements,
                    style: style.clone(),
                },
            );
        }
        SharedElementAction::UpdateMetricsForElement {
            group_uid,
            element_id,
            metrics,
        } => {
            let Some(group) = next.groups.get_mut(group_uid) else {
                warn!("Metrics for element {element_id} of unknown group {group_uid}, ignoring");
                return Ok(next);
            };
            match group.elements.iter_mut().find(|e| &e.id == element_id) {
                Some(element) => element.metrics = Some(*metrics),
                None => group.elements.push(SharedElement {
                    id: element_id.clone(),
                    metrics: Some(*metrics),
                }),
            }
        }
        SharedElementAction::UnregisterGroup { uid } => {
            if next.groups.remove(uid).is_some()
                && next
                    .transition
                    .as_ref()
                    .is_some_and(|t| &t.from_group_uid == uid || &t.to_group_uid == uid)
            {
                debug!("Group {uid} unregistered during its transition");
            }
        }
        SharedElementAction::StartTransitionForElementGroups {
            from_group_uid,
            to_group_uid,
            progress,
        } => {
            let session = TransitionSession {
                from_group_uid: from_group_uid.clone(),
                to_group_uid: to_group_uid.clone(),
                progress: progress.clamp(0.0, 1.0),
            };
            compute_overlay(&next, &session, session.progress)?;
            next.transition = Some(session);
        }
        SharedElementAction::SetTransitionProgress { progress } => {
            let session = next
                .transition
                .as_mut()
                .ok_or(TransitionError::NoActiveTransition)?;
            session.progress = progress.clamp(0.0, 1.0);
        }
        SharedElementAction::EndTransitionForElementGroups => {
            next.transition = None;
        }
    }
    Ok(next)
}

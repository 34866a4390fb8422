//! # Shared Element Coordinator
//!
//! Owns the shared-element state. Screens register their element groups and
//! report layout; the navigator starts, drives, and ends transitions; the
//! renderer subscribes and draws `overlay()`.
//!
//! Unregistering is deferred by one frame, so the outgoing screen's group
//! still exists while the incoming screen starts its transition.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use log::{debug, warn};

use crate::scheduler::FrameScheduler;
use crate::shared_element::action::{SharedElementAction, reduce};
use crate::shared_element::overlay::{TransitionOverlay, compute_overlay};
use crate::shared_element::state::{
    ElementGroup, ElementMetrics, GroupStyle, SharedElementState, TransitionError,
};

type Listener = Rc<dyn Fn(&SharedElementState)>;

struct CoordinatorInner {
    state: RefCell<Rc<SharedElementState>>,
    frames: FrameScheduler,
    listeners: RefCell<Vec<(u64, Listener)>>,
    next_listener: Cell<u64>,
}

#[derive(Clone)]
pub struct SharedElementCoordinator {
    inner: Rc<CoordinatorInner>,
}

impl SharedElementCoordinator {
    pub fn new(frames: FrameScheduler) -> Self {
        Self {
            inner: Rc::new(CoordinatorInner {
                state: RefCell::new(Rc::new(SharedElementState::default())),
                frames,
                listeners: RefCell::new(Vec::new()),
                next_listener: Cell::new(0),
            }),
        }
    }

    pub fn state(&self) -> Rc<SharedElementState> {
        Rc::clone(&self.inner.state.borrow())
    }

    pub fn dispatch(&self, action: SharedElementAction) -> Result<(), TransitionError> {
        let current = self.state();
        let next = reduce(&current, &action)?;
        if next == *current {
            return Ok(());
        }
        let next = Rc::new(next);
        *self.inner.state.borrow_mut() = Rc::clone(&next);

        let listeners: Vec<Listener> = self
            .inner
            .listeners
            .borrow()
            .iter()
            .map(|(_, l)| Rc::clone(l))
            .collect();
        for listener in listeners {
            listener(&next);
        }
        Ok(())
    }

    pub fn subscribe(&self, listener: impl Fn(&SharedElementState) + 'static) -> u64 {
        let id = self.inner.next_listener.get();
        self.inner.next_listener.set(id + 1);
        self.inner
            .listeners
            .borrow_mut()
            .push((id, Rc::new(listener)));
        id
    }

    pub fn unsubscribe(&self, id: u64) {
        self.inner.listeners.borrow_mut().retain(|(l, _)| *l != id);
    }

    // ── Groups ──────────────────────────────────────────────────────────────

    pub fn register_group(
        &self,
        uid: &str,
        id: &str,
        route_key: &str,
        element_ids: &[&str],
        style: GroupStyle,
    ) -> Result<(), TransitionError> {
        self.dispatch(SharedElementAction::RegisterGroup {
            uid: uid.to_string(),
            id: id.to_string(),
            route_key: route_key.to_string(),
            element_ids: element_ids.iter().map(|e| e.to_string()).collect(),
            style,
        })
    }

    /// Records layout for one element. Unknown groups are ignored.
    pub fn update_metrics(
        &self,
        group_uid: &str,
        element_id: &str,
        metrics: ElementMetrics,
    ) -> Result<(), TransitionError> {
        self.dispatch(SharedElementAction::UpdateMetricsForElement {
            group_uid: group_uid.to_string(),
            element_id: element_id.to_string(),
            metrics,
        })
    }

    /// Removes the group after the next frame.
    pub fn unregister_group(&self, uid: &str) {
        let coordinator = Rc::downgrade(&self.inner);
        let uid = uid.to_string();
        self.inner.frames.request_frame(move || {
            let Some(inner) = coordinator.upgrade() else {
                return;
            };
            let coordinator = SharedElementCoordinator { inner };
            if let Err(err) = coordinator.dispatch(SharedElementAction::UnregisterGroup { uid }) {
                warn!("Deferred unregister failed: {err}");
            }
        });
    }

    pub fn group(&self, uid: &str) -> Option<ElementGroup> {
        self.state().group(uid).cloned()
    }

    pub fn find_group(&self, id: &str, route_key: &str) -> Option<ElementGroup> {
        self.state().find_group(id, route_key).cloned()
    }

    // ── Transitions ─────────────────────────────────────────────────────────

    /// Starts a transition between two groups. A transition already in
    /// flight is replaced; its overlay is returned at progress 1.0 so the
    /// renderer can finish it in place.
    pub fn start_transition(
        &self,
        from_group_uid: &str,
        to_group_uid: &str,
        progress: f64,
    ) -> Result<Option<TransitionOverlay>, TransitionError> {
        let state = self.state();
        let superseded = match &state.transition {
            Some(session) => match compute_overlay(&state, session, 1.0) {
                Ok(overlay) => Some(overlay),
                Err(err) => {
                    debug!("Superseded transition can't be completed: {err}");
                    None
                }
            },
            None => None,
        };
        self.dispatch(SharedElementAction::StartTransitionForElementGroups {
            from_group_uid: from_group_uid.to_string(),
            to_group_uid: to_group_uid.to_string(),
            progress,
        })?;
        Ok(superseded)
    }

    pub fn set_progress(&self, progress: f64) -> Result<(), TransitionError> {
        self.dispatch(SharedElementAction::SetTransitionProgress { progress })
    }

    pub fn end_transition(&self) -> Result<(), TransitionError> {
        self.dispatch(SharedElementAction::EndTransitionForElementGroups)
    }

    pub fn is_transitioning(&self) -> bool {
        self.state().transition.is_some()
    }

    /// What the renderer should draw right now, if a transition is running.
    pub fn overlay(&self) -> Result<Option<TransitionOverlay>, TransitionError> {
        let state = self.state();
        state
            .transition
            .as_ref()
            .map(|session| compute_overlay(&state, session, session.progress))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coordinator() -> (SharedElementCoordinator, FrameScheduler) {
        let frames = FrameScheduler::new();
        (SharedElementCoordinator::new(frames.clone()), frames)
    }

    fn setup(coordinator: &SharedElementCoordinator) {
        coordinator
            .register_group("g1", "photo", "list", &["a", "b"], GroupStyle::default())
            .unwrap();
        coordinator
            .register_group("g2", "photo", "detail", &["b", "c"], GroupStyle::default())
            .unwrap();
        for (group, element, size) in [("g1", "a", 10.0), ("g1", "b", 20.0), ("g2", "b", 80.0), ("g2", "c", 5.0)] {
            coordinator
                .update_metrics(group, element, ElementMetrics::new(0.0, 0.0, size, size))
                .unwrap();
        }
    }

    #[test]
    fn test_transition_matches_common_elements() {
        let (coordinator, _) = coordinator();
        setup(&coordinator);
        assert!(coordinator.start_transition("g1", "g2", 0.0).unwrap().is_none());

        let overlay = coordinator.overlay().unwrap().unwrap();
        assert_eq!(overlay.elements.len(), 1);
        assert_eq!(overlay.elements[0].element_id, "b");
        assert_eq!(overlay.elements[0].scale_x, 0.25);

        coordinator.set_progress(1.0).unwrap();
        assert_eq!(coordinator.overlay().unwrap().unwrap().elements[0].scale_x, 1.0);
        coordinator.end_transition().unwrap();
        assert!(coordinator.overlay().unwrap().is_none());
    }

    #[test]
    fn test_unregister_waits_one_frame() {
        let (coordinator, frames) = coordinator();
        setup(&coordinator);
        coordinator.unregister_group("g1");
        assert!(coordinator.group("g1").is_some());
        frames.run_frame();
        assert!(coordinator.group("g1").is_none());
    }

    #[test]
    fn test_new_transition_supersedes_running_one() {
        let (coordinator, _) = coordinator();
        setup(&coordinator);
        coordinator.start_transition("g1", "g2", 0.3).unwrap();

        let superseded = coordinator.start_transition("g2", "g1", 0.0).unwrap().unwrap();
        assert_eq!(superseded.progress, 1.0);
        assert_eq!(superseded.from_group_uid, "g1");

        let running = coordinator.overlay().unwrap().unwrap();
        assert_eq!(running.from_group_uid, "g2");
    }

    #[test]
    fn test_failed_start_keeps_previous_state() {
        let (coordinator, _) = coordinator();
        setup(&coordinator);
        let err = coordinator.start_transition("g1", "ghost", 0.0).unwrap_err();
        assert_eq!(
            err,
            TransitionError::GroupNotFound {
                uid: "ghost".to_string()
            }
        );
        assert!(!coordinator.is_transitioning());
    }

    #[test]
    fn test_listeners_notified_on_change_only() {
        let (coordinator, _) = coordinator();
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        coordinator.subscribe(move |_| counter.set(counter.get() + 1));

        coordinator
            .register_group("g1", "photo", "list", &["a"], GroupStyle::default())
            .unwrap();
        coordinator
            .register_group("g1", "photo", "list", &["a"], GroupStyle::default())
            .unwrap();
        coordinator
            .update_metrics("ghost", "a", ElementMetrics::new(0.0, 0.0, 1.0, 1.0))
            .unwrap();
        assert_eq!(calls.get(), 1);
    }
}

//! # Back Button
//!
//! Hardware back presses go through a listener stack. The most recently
//! added listener runs first; returning `true` consumes the press. If nobody
//! consumes it, the manager dispatches `GO_BACK` and reports whether the
//! navigation state changed. `false` means the host should exit.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use log::debug;

use crate::context::{NavigationContext, WeakContext};
use crate::core::action::Action;
use crate::core::error::Result;

type BackListener = Rc<dyn Fn() -> bool>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BackListenerId(u64);

pub struct BackButtonManager {
    context: WeakContext,
    listeners: RefCell<Vec<(BackListenerId, BackListener)>>,
    next_id: Cell<u64>,
}

impl BackButtonManager {
    pub fn new(context: &NavigationContext) -> Self {
        Self {
            context: context.downgrade(),
            listeners: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
        }
    }

    pub fn add_listener(&self, listener: impl Fn() -> bool + 'static) -> BackListenerId {
        let id = BackListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, Rc::new(listener)));
        id
    }

    /// Returns whether a listener was removed.
    pub fn remove_listener(&self, id: BackListenerId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(l, _)| *l != id);
        listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Returns true if the press was handled.
    pub fn handle_back_press(&self) -> Result<bool> {
        let listeners: Vec<BackListener> = self
            .listeners
            .borrow()
            .iter()
            .rev()
            .map(|(_, l)| Rc::clone(l))
            .collect();
        for listener in listeners {
            if listener() {
                debug!("Back press consumed by listener");
                return Ok(true);
            }
        }
        let changed = self.context.upgrade()?.dispatch(Action::go_back())?;
        debug!("Back press handled by GO_BACK, changed = {changed}");
        Ok(changed)
    }
}

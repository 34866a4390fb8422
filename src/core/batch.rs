//! # Action Batching
//!
//! Wraps a reducer so that a batch envelope folds its inner actions through
//! the wrapped reducer in order and commits one combined state. Nothing in
//! between is ever observable, and an error anywhere discards the whole batch.
//!
//! ```text
//! Batch[a, b, c]  →  reduce(reduce(reduce(s, a), b), c)  →  one new state
//! ```

use std::rc::Rc;

use crate::core::action::Action;

/// An action type with a batch envelope.
pub trait Batchable: Sized {
    fn as_batch(&self) -> Option<&[Self]>;
}

impl Batchable for Action {
    fn as_batch(&self) -> Option<&[Action]> {
        match self {
            Action::Batch(actions) => Some(actions),
            _ => None,
        }
    }
}

/// Returns a reducer that understands batch envelopes, nested ones included.
pub fn batched<S, A, E, R>(reducer: R) -> impl Fn(&Rc<S>, &A) -> Result<Rc<S>, E>
where
    A: Batchable,
    R: Fn(&Rc<S>, &A) -> Result<Rc<S>, E>,
{
    move |state, action| fold(&reducer, state, action)
}

fn fold<S, A, E, R>(reducer: &R, state: &Rc<S>, action: &A) -> Result<Rc<S>, E>
where
    A: Batchable,
    R: Fn(&Rc<S>, &A) -> Result<Rc<S>, E>,
{
    match action.as_batch() {
        Some(actions) => {
            let mut next = Rc::clone(state);
            for inner in actions {
                next = fold(reducer, &next, inner)?;
            }
            Ok(next)
        }
        None => reducer(state, action),
    }
}

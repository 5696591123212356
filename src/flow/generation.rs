//! Per-stage activation tokens.
//!
//! Every time a stage is entered or exited its generation advances. A fetch
//! captures the generation it was started under and may only write its result
//! back while that generation is still current; anything older is dropped.

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Identifies one activation of a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

/// What happened to a stage entry or submission once it settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The result was written to the stage.
    Applied,
    /// The stage was already waiting on a request; nothing was sent.
    InFlight,
    /// The stage moved to a newer generation first; the result was dropped.
    Discarded,
}

/// State of one stage together with its current generation.
#[derive(Debug)]
pub(crate) struct StageSlot<S> {
    generation: u64,
    state: S,
}

impl<S> StageSlot<S> {
    pub(crate) const fn new(state: S) -> Self {
        Self {
            generation: 0,
            state,
        }
    }

    pub(crate) const fn generation(&self) -> Generation {
        Generation(self.generation)
    }

    pub(crate) const fn state(&self) -> &S {
        &self.state
    }

    /// Start a new activation in `state`.
    pub(crate) fn begin(&mut self, state: S) -> Generation {
        self.advance(state);
        self.generation()
    }

    /// Leave the stage; results still in flight become stale.
    pub(crate) fn reset(&mut self, state: S) {
        self.advance(state);
    }

    /// Move within the current activation without invalidating it.
    pub(crate) fn transition(&mut self, state: S) -> Generation {
        self.state = state;
        self.generation()
    }

    pub(crate) fn is_current(&self, token: Generation) -> bool {
        token.0 == self.generation
    }

    /// Write `state` only if `token` is still the current generation.
    pub(crate) fn settle(&mut self, token: Generation, state: S) -> Outcome {
        if self.is_current(token) {
            self.state = state;
            Outcome::Applied
        } else {
            Outcome::Discarded
        }
    }

    fn advance(&mut self, state: S) {
        self.generation = self.generation.wrapping_add(1);
        self.state = state;
    }
}

/// Locks stage state, recovering it from a poisoned mutex.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

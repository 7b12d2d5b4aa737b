//! Active/pending bookkeeping and latch arbitration.
//!
//! The controller only decides *which* kind is active and which one is
//! latched next. Status changes and hook calls are applied by the machine.

use crate::core::StateKind;
use serde::{Deserialize, Serialize};

/// Options of a transition request.
///
/// The default begins the exit of the active state immediately and does not
/// override a target that is already latched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionOptions {
    /// Begin exiting the active state right away.
    pub begin_exit_now: bool,
    /// Replace a target that is already latched.
    pub force: bool,
}

impl TransitionOptions {
    /// Latch the target without touching the active state.
    pub fn deferred() -> Self {
        Self {
            begin_exit_now: false,
            force: false,
        }
    }

    /// Same options, forcing the latch.
    pub fn forced(self) -> Self {
        Self {
            force: true,
            ..self
        }
    }
}

impl Default for TransitionOptions {
    fn default() -> Self {
        Self {
            begin_exit_now: true,
            force: false,
        }
    }
}

/// What a latch attempt did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LatchOutcome<K> {
    /// The latch was empty and now holds the target
    Latched,
    /// A forced request replaced the previous target
    Replaced(K),
    /// An unforced request found the latch occupied; nothing changed
    Ignored,
}

/// Result of promoting the latched target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Promotion<K> {
    /// Kind that was active before the promotion
    pub previous: Option<K>,
    /// Kind that is active after the promotion, `None` when the machine idles
    pub next: Option<K>,
}

/// Holds the active kind and the single-slot pending latch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct TransitionController<K: StateKind> {
    active: Option<K>,
    pending: Option<K>,
}

impl<K: StateKind> TransitionController<K> {
    pub fn new() -> Self {
        Self {
            active: None,
            pending: None,
        }
    }

    pub fn active(&self) -> Option<&K> {
        self.active.as_ref()
    }

    pub fn pending(&self) -> Option<&K> {
        self.pending.as_ref()
    }

    /// Latch `kind` if nothing is latched, or unconditionally when forced.
    pub fn latch(&mut self, kind: K, force: bool) -> LatchOutcome<K> {
        match self.pending.take() {
            None => {
                self.pending = Some(kind);
                LatchOutcome::Latched
            }
            Some(previous) if force => {
                self.pending = Some(kind);
                LatchOutcome::Replaced(previous)
            }
            Some(previous) => {
                self.pending = Some(previous);
                LatchOutcome::Ignored
            }
        }
    }

    /// Make the latched kind active and clear the latch.
    ///
    /// With nothing latched the machine becomes idle.
    pub fn promote(&mut self) -> Promotion<K> {
        let previous = self.active.take();
        self.active = self.pending.take();
        Promotion {
            previous,
            next: self.active.clone(),
        }
    }
}

impl<K: StateKind> Default for TransitionController<K> {
    fn default() -> Self {
        Self::new()
    }
}

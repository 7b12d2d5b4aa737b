//! Weak back-reference from a state to the machine that owns it.
//!
//! A state cannot hold `&mut` to the machine that is currently resuming it,
//! so callbacks go through a mailbox. The machine owns the mailbox; a handle
//! only holds a `Weak` to it and never extends the machine's lifetime.
//! Queued calls are applied in order as soon as the machine regains control.

use crate::core::StateKind;
use crate::machine::{FsmError, TransitionOptions};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::{Rc, Weak};

/// A call made through a handle, waiting for the machine to apply it.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Command<K: StateKind> {
    RequestTransition {
        kind: K,
        options: TransitionOptions,
    },
    ExitComplete,
}

pub(crate) type Mailbox<K> = Rc<RefCell<VecDeque<Command<K>>>>;

/// Non-owning handle used by states (and host callbacks they install) to
/// call back into the transition API of their machine.
pub struct FsmHandle<K: StateKind> {
    mailbox: Weak<RefCell<VecDeque<Command<K>>>>,
}

impl<K: StateKind> FsmHandle<K> {
    pub(crate) fn new(mailbox: &Mailbox<K>) -> Self {
        Self {
            mailbox: Rc::downgrade(mailbox),
        }
    }

    /// Queue a transition request with default options
    /// (begin exiting the active state now, do not force the latch).
    pub fn request_transition(&self, kind: K) -> Result<(), FsmError> {
        self.request_transition_with(kind, TransitionOptions::default())
    }

    /// Queue a transition request.
    pub fn request_transition_with(
        &self,
        kind: K,
        options: TransitionOptions,
    ) -> Result<(), FsmError> {
        self.send(Command::RequestTransition { kind, options })
    }

    /// Queue the exit-complete signal for the active state.
    pub fn exit_complete(&self) -> Result<(), FsmError> {
        self.send(Command::ExitComplete)
    }

    /// Whether the owning machine is still alive.
    pub fn is_attached(&self) -> bool {
        self.mailbox.strong_count() > 0
    }

    fn send(&self, command: Command<K>) -> Result<(), FsmError> {
        let mailbox = self.mailbox.upgrade().ok_or(FsmError::Detached)?;
        tracing::trace!(?command, "queued machine command");
        mailbox.borrow_mut().push_back(command);
        Ok(())
    }
}

impl<K: StateKind> Clone for FsmHandle<K> {
    fn clone(&self) -> Self {
        Self {
            mailbox: Weak::clone(&self.mailbox),
        }
    }
}

impl<K: StateKind> fmt::Debug for FsmHandle<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FsmHandle")
            .field("attached", &self.is_attached())
            .finish()
    }
}

//! The behavior contract every state implements.
//!
//! A state's body is a resumable sequence expressed as a step function: the
//! driver calls [`State::execute`] once per resumption and the state reports
//! whether it suspended until the next tick or ran out of work.

use crate::core::{FsmHandle, InternalStatus, StateKind};
use crate::machine::{FsmError, TransitionOptions};

/// Outcome of one resumption of a state's body.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// Suspension point. Control goes back to the host until the next tick.
    Yield,
    /// The sequence is exhausted.
    Finished,
}

/// What a state sees when it is resumed.
pub struct Resume<'a, C> {
    context: &'a mut C,
    resumption: u64,
    tick: u64,
}

impl<'a, C> Resume<'a, C> {
    pub(crate) fn new(context: &'a mut C, resumption: u64, tick: u64) -> Self {
        Self {
            context,
            resumption,
            tick,
        }
    }

    /// Shared context of the machine.
    pub fn context(&self) -> &C {
        &*self.context
    }

    /// Mutable access to the shared context of the machine.
    pub fn context_mut(&mut self) -> &mut C {
        &mut *self.context
    }

    /// Number of earlier resumptions of the current sequence.
    ///
    /// Zero means the sequence just started and the state must reset any
    /// progress left over from a previous activation.
    pub fn resumption(&self) -> u64 {
        self.resumption
    }

    /// True on the first resumption of a sequence.
    pub fn is_fresh(&self) -> bool {
        self.resumption == 0
    }

    /// The driver's tick counter.
    pub fn tick(&self) -> u64 {
        self.tick
    }
}

/// A unit of behavior driven by a [`FiniteStateMachine`](crate::machine::FiniteStateMachine).
///
/// Instances are created by the registry from a factory and initialized
/// exactly once through [`State::init`]. After that the machine calls
/// [`State::set_internal_status`] whenever the instance's lifecycle changes,
/// [`State::execute`] once per resumption while it is active, and
/// [`State::begin_exit`] when it is told to step down.
///
/// # Exit protocol
///
/// Once its status becomes [`InternalStatus::Exiting`] a state runs its own
/// cleanup (possibly over several ticks), then calls
/// [`FsmHandle::exit_complete`] and returns [`Step::Finished`]. A state that
/// never observes `Exiting` keeps the machine pumping it forever; nothing in
/// the machine times it out.
pub trait State<K: StateKind, C> {
    /// One-time wiring right after construction.
    fn init(&mut self, context: &C, fsm: FsmHandle<K>);

    /// Resume the body until the next suspension point.
    fn execute(&mut self, resume: &mut Resume<'_, C>) -> Step;

    /// Called by the machine after the status was set to `Exiting`.
    ///
    /// Application code must not call this directly; request a transition
    /// instead so status bookkeeping stays consistent. Invoked on every
    /// transition request that begins the exit, so it should be idempotent.
    fn begin_exit(&mut self) {}

    /// Called only by the machine.
    fn set_internal_status(&mut self, status: InternalStatus);

    /// The status last assigned by the machine.
    fn internal_status(&self) -> InternalStatus;
}

/// Bookkeeping shared by most state implementations.
///
/// Embed it in a state and forward `init`, `set_internal_status` and
/// `internal_status` to it.
#[derive(Debug)]
pub struct StateBase<K: StateKind> {
    status: InternalStatus,
    fsm: Option<FsmHandle<K>>,
}

impl<K: StateKind> StateBase<K> {
    pub fn new() -> Self {
        Self {
            status: InternalStatus::Inactive,
            fsm: None,
        }
    }

    pub fn attach(&mut self, fsm: FsmHandle<K>) {
        self.fsm = Some(fsm);
    }

    pub fn handle(&self) -> Option<&FsmHandle<K>> {
        self.fsm.as_ref()
    }

    pub fn status(&self) -> InternalStatus {
        self.status
    }

    pub fn set_status(&mut self, status: InternalStatus) {
        self.status = status;
    }

    pub fn is_executing(&self) -> bool {
        self.status == InternalStatus::Executing
    }

    pub fn is_exiting(&self) -> bool {
        self.status == InternalStatus::Exiting
    }

    /// Ask the machine to move to `kind`, beginning this state's exit.
    pub fn request_transition(&self, kind: K) -> Result<(), FsmError> {
        self.request_transition_with(kind, TransitionOptions::default())
    }

    pub fn request_transition_with(
        &self,
        kind: K,
        options: TransitionOptions,
    ) -> Result<(), FsmError> {
        self.fsm
            .as_ref()
            .ok_or(FsmError::Detached)?
            .request_transition_with(kind, options)
    }

    /// Tell the machine this state finished its cleanup.
    pub fn exit_complete(&self) -> Result<(), FsmError> {
        self.fsm.as_ref().ok_or(FsmError::Detached)?.exit_complete()
    }
}

impl<K: StateKind> Default for StateBase<K> {
    fn default() -> Self {
        Self::new()
    }
}

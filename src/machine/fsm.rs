//! The finite state machine: registry, controller and transition protocol.

use crate::builder::FsmConfig;
use crate::checkpoint::{FsmSnapshot, CHECKPOINT_VERSION};
use crate::core::{
    Command, FsmHandle, InternalStatus, Mailbox, State, StateHistory, StateKind, StateTransition,
};
use crate::machine::controller::{LatchOutcome, TransitionController, TransitionOptions};
use crate::machine::registry::{StateFactory, StateRegistry};
use crate::machine::FsmError;
use chrono::Utc;
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;
use tracing::{debug, trace, warn};
use uuid::Uuid;

/// The sequence the driver is pumping.
///
/// Tracked apart from the controller's active kind: a sequence keeps being
/// resumed after a switch until it finishes, and only then does the driver
/// start the sequence of the kind that is active at that point.
#[derive(Clone, Debug)]
pub(super) struct Cursor<K> {
    /// Kind whose sequence is running, `None` between sequences
    pub(super) pumping: Option<K>,
    /// Resumptions of that sequence so far
    pub(super) resumptions: u64,
}

impl<K> Cursor<K> {
    pub(super) fn start(&mut self, kind: K) {
        self.pumping = Some(kind);
        self.resumptions = 0;
    }

    pub(super) fn finish(&mut self) {
        self.pumping = None;
        self.resumptions = 0;
    }
}

impl<K> Default for Cursor<K> {
    fn default() -> Self {
        Self {
            pumping: None,
            resumptions: 0,
        }
    }
}

/// A tick-driven finite state machine.
///
/// Owns one lazily created instance per state kind, the active/pending
/// bookkeeping and the shared context `C`. Build it with
/// [`FsmBuilder`](crate::builder::FsmBuilder) and call
/// [`tick`](Self::tick) once per host frame.
///
/// Calls on the machine itself apply immediately. Calls made through an
/// [`FsmHandle`] are queued and applied as soon as the machine regains
/// control: after every state callback, at the start of each tick and at the
/// end of every public operation.
pub struct FiniteStateMachine<K: StateKind, C: 'static> {
    pub(super) config: FsmConfig,
    pub(super) context: C,
    pub(super) registry: StateRegistry<K, C>,
    pub(super) controller: TransitionController<K>,
    pub(super) mailbox: Mailbox<K>,
    pub(super) history: StateHistory<K>,
    pub(super) cursor: Cursor<K>,
    pub(super) ticks: u64,
}

impl<K: StateKind, C: 'static> FiniteStateMachine<K, C> {
    pub(crate) fn new(
        config: FsmConfig,
        context: C,
        factories: HashMap<K, StateFactory<K, C>>,
    ) -> Self {
        let history = match config.history_capacity {
            Some(capacity) => StateHistory::bounded(capacity),
            None => StateHistory::new(),
        };
        Self {
            config,
            context,
            registry: StateRegistry::new(factories),
            controller: TransitionController::new(),
            mailbox: Rc::new(RefCell::new(VecDeque::new())),
            history,
            cursor: Cursor::default(),
            ticks: 0,
        }
    }

    /// A weak handle for calling back into this machine.
    pub fn handle(&self) -> FsmHandle<K> {
        FsmHandle::new(&self.mailbox)
    }

    /// Instantiate `kind` if needed and return its instance.
    pub fn add_state(&mut self, kind: K) -> Result<&mut (dyn State<K, C> + 'static), FsmError> {
        self.instantiate(&kind)?;
        self.drain_mailbox();
        self.registry
            .instance_mut(&kind)
            .ok_or(FsmError::UnregisteredKind {
                kind: kind.name().to_string(),
            })
    }

    /// Cached instance of `kind`, created on first use.
    pub fn get_state(&mut self, kind: K) -> Result<&mut (dyn State<K, C> + 'static), FsmError> {
        self.add_state(kind)
    }

    /// Request a transition to `kind` with default options: begin exiting
    /// the active state now and keep any target that is already latched.
    pub fn request_transition(&mut self, kind: K) -> Result<(), FsmError> {
        self.request_transition_with(kind, TransitionOptions::default())
    }

    /// Request a transition to `kind`.
    ///
    /// The target is latched when nothing is latched yet or when
    /// `options.force` is set; otherwise the request is ignored. With
    /// `options.begin_exit_now` the active state starts exiting whether or
    /// not the latch changed.
    pub fn request_transition_with(
        &mut self,
        kind: K,
        options: TransitionOptions,
    ) -> Result<(), FsmError> {
        let result = self.apply_request(kind, options);
        self.drain_mailbox();
        result
    }

    /// Mark the active state `Exiting` and call its `begin_exit` hook.
    ///
    /// Without a latched target the state will finish exiting and leave the
    /// machine idle until a later request latches one and exit completion is
    /// signalled again.
    pub fn begin_exit_active(&mut self) {
        self.apply_begin_exit();
        self.drain_mailbox();
    }

    /// Signal that the active state finished its cleanup. Promotes the
    /// latched target, or idles the machine if nothing is latched.
    ///
    /// The outgoing state's sequence is not cut short: the driver keeps
    /// resuming it until it finishes before starting the promoted state's.
    pub fn on_exit_complete(&mut self) {
        self.switch_state();
        self.drain_mailbox();
    }

    pub fn active_kind(&self) -> Option<&K> {
        self.controller.active()
    }

    pub fn pending_kind(&self) -> Option<&K> {
        self.controller.pending()
    }

    /// Status of the instance of `kind`, `None` if it was never instantiated.
    pub fn status_of(&self, kind: &K) -> Option<InternalStatus> {
        self.registry.status(kind)
    }

    pub fn registry(&self) -> &StateRegistry<K, C> {
        &self.registry
    }

    pub fn context(&self) -> &C {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut C {
        &mut self.context
    }

    pub fn history(&self) -> &StateHistory<K> {
        &self.history
    }

    pub fn config(&self) -> &FsmConfig {
        &self.config
    }

    /// Number of ticks driven so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Serializable picture of the machine's position.
    pub fn snapshot(&self) -> FsmSnapshot<K> {
        let statuses = self
            .registry
            .kinds()
            .iter()
            .filter_map(|kind| {
                self.registry
                    .status(kind)
                    .map(|status| (kind.clone(), status))
            })
            .collect();
        FsmSnapshot {
            version: CHECKPOINT_VERSION,
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            label: self.config.label.clone(),
            active: self.controller.active().cloned(),
            pending: self.controller.pending().cloned(),
            statuses,
            history: self.history.clone(),
            ticks: self.ticks,
        }
    }

    /// Latch `kind` without exiting anything and promote it right away.
    pub(crate) fn activate(&mut self, kind: K) -> Result<(), FsmError> {
        let result = self.apply_request(kind, TransitionOptions::deferred());
        if result.is_ok() {
            self.switch_state();
        }
        self.drain_mailbox();
        result
    }

    pub(crate) fn restore_progress(&mut self, history: StateHistory<K>, ticks: u64) {
        self.history = history.with_capacity_limit(self.config.history_capacity);
        self.ticks = ticks;
    }

    fn instantiate(&mut self, kind: &K) -> Result<(), FsmError> {
        let handle = FsmHandle::new(&self.mailbox);
        self.registry.add(kind, &self.context, &handle)?;
        Ok(())
    }

    fn apply_request(&mut self, kind: K, options: TransitionOptions) -> Result<(), FsmError> {
        self.instantiate(&kind)?;
        let label = self.config.label.as_str();
        match self.controller.latch(kind.clone(), options.force) {
            LatchOutcome::Latched => {
                debug!(machine = label, target = kind.name(), "transition latched");
            }
            LatchOutcome::Replaced(previous) => {
                debug!(
                    machine = label,
                    target = kind.name(),
                    replaced = previous.name(),
                    "forced transition replaced latched target"
                );
            }
            LatchOutcome::Ignored => {
                debug!(
                    machine = label,
                    target = kind.name(),
                    latched = ?self.controller.pending(),
                    "transition ignored; a target is already latched"
                );
            }
        }
        if options.begin_exit_now {
            self.apply_begin_exit();
        }
        Ok(())
    }

    fn apply_begin_exit(&mut self) {
        let Some(active) = self.controller.active().cloned() else {
            trace!(machine = %self.config.label, "no active state to exit");
            return;
        };
        if self.controller.pending().is_none() {
            warn!(
                machine = %self.config.label,
                active = active.name(),
                "exit begun with no target latched; machine idles once the exit completes"
            );
        }
        self.registry.set_status(&active, InternalStatus::Exiting);
        if let Some(state) = self.registry.instance_mut(&active) {
            state.begin_exit();
        }
        debug!(machine = %self.config.label, active = active.name(), "exit begun");
    }

    /// Deactivate the active state and promote the latched target.
    pub(super) fn switch_state(&mut self) {
        let promotion = self.controller.promote();
        if let Some(previous) = &promotion.previous {
            self.registry.set_status(previous, InternalStatus::Inactive);
        }
        match promotion.next {
            Some(next) => {
                self.registry.set_status(&next, InternalStatus::Executing);
                debug!(
                    machine = %self.config.label,
                    from = ?promotion.previous,
                    to = next.name(),
                    tick = self.ticks,
                    "state activated"
                );
                if self.config.record_history {
                    self.history.push(StateTransition {
                        from: promotion.previous,
                        to: next,
                        timestamp: Utc::now(),
                        tick: self.ticks,
                    });
                }
            }
            None => {
                debug!(
                    machine = %self.config.label,
                    from = ?promotion.previous,
                    "no target latched; machine is idle"
                );
            }
        }
    }

    /// Apply every call queued through handles, in order.
    pub(super) fn drain_mailbox(&mut self) {
        loop {
            let command = self.mailbox.borrow_mut().pop_front();
            let Some(command) = command else {
                break;
            };
            match command {
                Command::RequestTransition { kind, options } => {
                    let target = kind.name().to_string();
                    if let Err(error) = self.apply_request(kind, options) {
                        warn!(
                            machine = %self.config.label,
                            target = %target,
                            %error,
                            "dropped queued transition request"
                        );
                    }
                }
                Command::ExitComplete => self.switch_state(),
            }
        }
    }
}

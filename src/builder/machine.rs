//! Builder for constructing state machines.

use crate::builder::config::FsmConfig;
use crate::builder::error::BuildError;
use crate::checkpoint::{CheckpointError, FsmSnapshot, CHECKPOINT_VERSION};
use crate::core::{InternalStatus, State, StateKind};
use crate::machine::{FiniteStateMachine, StateFactory, TransitionOptions};
use std::collections::{HashMap, HashSet};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use tracing::debug;

/// Builder for constructing state machines with a fluent API.
///
/// Validation reports every problem at once instead of stopping at the
/// first one.
pub struct FsmBuilder<K: StateKind, C: 'static> {
    context: Option<C>,
    factories: Vec<(K, StateFactory<K, C>)>,
    preregistered: Vec<K>,
    initial: Option<K>,
    config: FsmConfig,
    restore: Option<FsmSnapshot<K>>,
}

impl<K: StateKind, C: 'static> FsmBuilder<K, C> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            context: None,
            factories: Vec::new(),
            preregistered: Vec::new(),
            initial: None,
            config: FsmConfig::default(),
            restore: None,
        }
    }

    /// Set the context shared by every state (required).
    pub fn context(mut self, context: C) -> Self {
        self.context = Some(context);
        self
    }

    /// Register the factory that constructs the state of `kind`.
    pub fn state<S, F>(mut self, kind: K, factory: F) -> Self
    where
        S: State<K, C> + 'static,
        F: Fn() -> S + 'static,
    {
        let factory: StateFactory<K, C> =
            Box::new(move || Box::new(factory()) as Box<dyn State<K, C>>);
        self.factories.push((kind, factory));
        self
    }

    /// Instantiate `kind` while building instead of on first use.
    pub fn preregister(mut self, kind: K) -> Self {
        self.preregistered.push(kind);
        self
    }

    /// Instantiate several kinds while building.
    pub fn preregister_all<I>(mut self, kinds: I) -> Self
    where
        I: IntoIterator<Item = K>,
    {
        self.preregistered.extend(kinds);
        self
    }

    /// Kind activated as soon as the machine is built (optional).
    pub fn initial(mut self, kind: K) -> Self {
        self.initial = Some(kind);
        self
    }

    pub fn config(mut self, config: FsmConfig) -> Self {
        self.config = config;
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.config.label = label.into();
        self
    }

    pub fn record_history(mut self, record: bool) -> Self {
        self.config.record_history = record;
        self
    }

    pub fn history_capacity(mut self, capacity: usize) -> Self {
        self.config.history_capacity = Some(capacity);
        self
    }

    /// Keep every history record.
    pub fn unbounded_history(mut self) -> Self {
        self.config.history_capacity = None;
        self
    }

    /// Resume from a snapshot. Takes precedence over [`initial`](Self::initial).
    ///
    /// Instances are recreated from their factories, the active kind starts
    /// a fresh sequence (and begins exiting again if it was exiting), and the
    /// pending kind is latched again.
    pub fn restore(mut self, snapshot: FsmSnapshot<K>) -> Self {
        self.restore = Some(snapshot);
        self
    }

    /// Build the state machine.
    pub fn build(self) -> Result<FiniteStateMachine<K, C>, BuildError> {
        if let Validation::Failure(errors) = self.validate() {
            let mut problems: Vec<BuildError> = errors.iter().cloned().collect();
            return Err(if problems.len() == 1 {
                problems.remove(0)
            } else {
                BuildError::Invalid(problems)
            });
        }

        let context = self.context.ok_or(BuildError::MissingContext)?;
        let factories: HashMap<K, StateFactory<K, C>> = self.factories.into_iter().collect();
        let mut machine = FiniteStateMachine::new(self.config, context, factories);

        for kind in self.preregistered {
            machine.add_state(kind)?;
        }

        match (self.restore, self.initial) {
            (Some(snapshot), _) => restore_into(&mut machine, snapshot)?,
            (None, Some(initial)) => machine.activate(initial)?,
            (None, None) => {}
        }

        debug!(
            machine = %machine.config().label,
            active = ?machine.active_kind(),
            "state machine built"
        );
        Ok(machine)
    }

    fn validate(&self) -> Validation<(), NonEmptyVec<BuildError>> {
        let mut checks: Vec<Validation<(), NonEmptyVec<BuildError>>> = Vec::new();

        if self.context.is_none() {
            checks.push(Validation::fail(BuildError::MissingContext));
        }

        let mut registered: HashSet<&K> = HashSet::new();
        for (kind, _) in &self.factories {
            if !registered.insert(kind) {
                checks.push(Validation::fail(BuildError::DuplicateFactory {
                    kind: kind.name().to_string(),
                }));
            }
        }

        let mut required: Vec<&K> = self.preregistered.iter().collect();
        required.extend(self.initial.as_ref());
        if let Some(snapshot) = &self.restore {
            if snapshot.version != CHECKPOINT_VERSION {
                checks.push(Validation::fail(BuildError::Checkpoint(
                    CheckpointError::UnsupportedVersion {
                        found: snapshot.version,
                        supported: CHECKPOINT_VERSION,
                    },
                )));
            }
            required.extend(snapshot.statuses.iter().map(|(kind, _)| kind));
            required.extend(snapshot.active.as_ref());
            required.extend(snapshot.pending.as_ref());
        }

        let mut reported: HashSet<&K> = HashSet::new();
        for kind in required {
            if !registered.contains(kind) && reported.insert(kind) {
                checks.push(Validation::fail(BuildError::MissingFactory {
                    kind: kind.name().to_string(),
                }));
            }
        }

        Validation::all_vec(checks).map(|_| ())
    }
}

fn restore_into<K: StateKind, C: 'static>(
    machine: &mut FiniteStateMachine<K, C>,
    snapshot: FsmSnapshot<K>,
) -> Result<(), BuildError> {
    for (kind, _) in &snapshot.statuses {
        machine.add_state(kind.clone())?;
    }
    if let Some(active) = snapshot.active.clone() {
        let was_exiting = snapshot.status_of(&active) == Some(InternalStatus::Exiting);
        machine.activate(active)?;
        // Latch the target before the exit hook runs so it sees it.
        match snapshot.pending.clone() {
            Some(pending) => machine.request_transition_with(
                pending,
                TransitionOptions {
                    begin_exit_now: was_exiting,
                    force: false,
                },
            )?,
            None if was_exiting => machine.begin_exit_active(),
            None => {}
        }
    } else if let Some(pending) = snapshot.pending.clone() {
        machine.request_transition_with(pending, TransitionOptions::deferred())?;
    }
    machine.restore_progress(snapshot.history, snapshot.ticks);
    Ok(())
}

impl<K: StateKind, C: 'static> Default for FsmBuilder<K, C> {
    fn default() -> Self {
        Self::new()
    }
}

//! Lazily created, cached state instances.

use crate::core::{FsmHandle, InternalStatus, State, StateKind};
use crate::machine::FsmError;
use std::collections::HashMap;
use tracing::debug;

/// Zero-argument constructor registered for one kind.
pub type StateFactory<K, C> = Box<dyn Fn() -> Box<dyn State<K, C>>>;

struct Slot<K: StateKind, C> {
    state: Box<dyn State<K, C>>,
    status: InternalStatus,
}

/// One instance per kind, created on first use and kept for the lifetime of
/// the registry.
pub struct StateRegistry<K: StateKind, C: 'static> {
    factories: HashMap<K, StateFactory<K, C>>,
    slots: HashMap<K, Slot<K, C>>,
    order: Vec<K>,
}

impl<K: StateKind, C: 'static> StateRegistry<K, C> {
    pub fn new(factories: HashMap<K, StateFactory<K, C>>) -> Self {
        Self {
            factories,
            slots: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Instantiate `kind` unless it already exists, and return the instance.
    ///
    /// The new instance is initialized before it is stored, so no other
    /// component can observe it half-built. Repeated calls return the same
    /// instance without constructing or initializing it again.
    pub fn add(
        &mut self,
        kind: &K,
        context: &C,
        fsm: &FsmHandle<K>,
    ) -> Result<&mut (dyn State<K, C> + 'static), FsmError> {
        if !self.slots.contains_key(kind) {
            let factory = self
                .factories
                .get(kind)
                .ok_or_else(|| FsmError::UnregisteredKind {
                    kind: kind.name().to_string(),
                })?;
            let mut state = factory();
            state.init(context, fsm.clone());
            debug!(kind = kind.name(), "state instantiated");
            self.slots.insert(
                kind.clone(),
                Slot {
                    state,
                    status: InternalStatus::Inactive,
                },
            );
            self.order.push(kind.clone());
        }
        self.instance_mut(kind)
            .ok_or_else(|| FsmError::UnregisteredKind {
                kind: kind.name().to_string(),
            })
    }

    /// Cached instance of `kind`, created through [`add`](Self::add) if absent.
    pub fn get(
        &mut self,
        kind: &K,
        context: &C,
        fsm: &FsmHandle<K>,
    ) -> Result<&mut (dyn State<K, C> + 'static), FsmError> {
        self.add(kind, context, fsm)
    }

    /// Existing instance only; never constructs.
    pub fn instance_mut(&mut self, kind: &K) -> Option<&mut (dyn State<K, C> + 'static)> {
        self.slots.get_mut(kind).map(|slot| slot.state.as_mut())
    }

    pub fn instance(&self, kind: &K) -> Option<&(dyn State<K, C> + 'static)> {
        self.slots.get(kind).map(|slot| slot.state.as_ref())
    }

    pub fn contains(&self, kind: &K) -> bool {
        self.slots.contains_key(kind)
    }

    pub fn has_factory(&self, kind: &K) -> bool {
        self.factories.contains_key(kind)
    }

    /// Status the machine last assigned to the instance of `kind`.
    pub fn status(&self, kind: &K) -> Option<InternalStatus> {
        self.slots.get(kind).map(|slot| slot.status)
    }

    /// Record `status` and forward it to the instance.
    pub(crate) fn set_status(&mut self, kind: &K, status: InternalStatus) {
        if let Some(slot) = self.slots.get_mut(kind) {
            slot.status = status;
            slot.state.set_internal_status(status);
        }
    }

    /// Instantiated kinds in creation order.
    pub fn kinds(&self) -> &[K] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

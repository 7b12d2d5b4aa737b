//! Record of state activations.
//!
//! Every time the machine promotes a pending state it records where it came
//! from, where it went and when. The history is immutable: `record` returns a
//! new history.

use super::kind::StateKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of a single activation.
///
/// # Example
///
/// ```rust
/// use tickstate::core::StateTransition;
/// use tickstate::state_kind;
/// use chrono::Utc;
///
/// state_kind! {
///     enum Screen {
///         Title,
///         Level,
///     }
/// }
///
/// let transition = StateTransition {
///     from: Some(Screen::Title),
///     to: Screen::Level,
///     timestamp: Utc::now(),
///     tick: 42,
/// };
/// assert_eq!(transition.to, Screen::Level);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateTransition<K: StateKind> {
    /// The previously active kind, `None` when the machine was idle
    pub from: Option<K>,
    /// The kind that became active
    pub to: K,
    /// When the switch happened
    pub timestamp: DateTime<Utc>,
    /// Driver tick during which the switch happened (0 before the first tick)
    pub tick: u64,
}

/// Ordered history of activations, optionally bounded.
///
/// When a capacity is set, recording past it drops the oldest entries.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateHistory<K: StateKind> {
    transitions: Vec<StateTransition<K>>,
    capacity: Option<usize>,
}

impl<K: StateKind> Default for StateHistory<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: StateKind> StateHistory<K> {
    /// Create a new, unbounded, empty history.
    pub fn new() -> Self {
        Self {
            transitions: Vec::new(),
            capacity: None,
        }
    }

    /// Create an empty history that keeps at most `capacity` records.
    pub fn bounded(capacity: usize) -> Self {
        Self {
            transitions: Vec::new(),
            capacity: Some(capacity),
        }
    }

    /// Same records, new bound. Excess oldest records are dropped.
    pub fn with_capacity_limit(&self, capacity: Option<usize>) -> Self {
        let mut transitions = self.transitions.clone();
        if let Some(limit) = capacity {
            let excess = transitions.len().saturating_sub(limit);
            transitions.drain(..excess);
        }
        Self {
            transitions,
            capacity,
        }
    }

    /// Record a transition, returning a new history.
    ///
    /// # Example
    ///
    /// ```rust
    /// use tickstate::core::{StateHistory, StateTransition};
    /// use tickstate::state_kind;
    /// use chrono::Utc;
    ///
    /// state_kind! {
    ///     enum Step { A, B }
    /// }
    ///
    /// let history = StateHistory::new();
    /// let new_history = history.record(StateTransition {
    ///     from: Some(Step::A),
    ///     to: Step::B,
    ///     timestamp: Utc::now(),
    ///     tick: 1,
    /// });
    ///
    /// assert_eq!(new_history.transitions().len(), 1);
    /// assert_eq!(history.transitions().len(), 0); // Original unchanged
    /// ```
    pub fn record(&self, transition: StateTransition<K>) -> Self {
        let mut transitions = self.transitions.clone();
        transitions.push(transition);
        if let Some(limit) = self.capacity {
            let excess = transitions.len().saturating_sub(limit);
            transitions.drain(..excess);
        }
        Self {
            transitions,
            capacity: self.capacity,
        }
    }

    /// Record a transition in place, dropping the oldest record once the
    /// capacity is exceeded.
    pub(crate) fn push(&mut self, transition: StateTransition<K>) {
        if self.capacity == Some(0) {
            return;
        }
        if let Some(limit) = self.capacity {
            let excess = (self.transitions.len() + 1).saturating_sub(limit);
            self.transitions.drain(..excess);
        }
        self.transitions.push(transition);
    }

    /// Kinds traversed, in order.
    ///
    /// Starts with the `from` of the oldest retained record when there is
    /// one, then the `to` of each record.
    pub fn get_path(&self) -> Vec<&K> {
        let mut path = Vec::new();
        if let Some(from) = self.transitions.first().and_then(|t| t.from.as_ref()) {
            path.push(from);
        }
        for transition in &self.transitions {
            path.push(&transition.to);
        }
        path
    }

    /// Wall time between the first and last retained record.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.transitions.first(), self.transitions.last()) {
            let duration = last.timestamp.signed_duration_since(first.timestamp);
            duration.to_std().ok()
        } else {
            None
        }
    }

    pub fn transitions(&self) -> &[StateTransition<K>] {
        &self.transitions
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Most recent record.
    pub fn last(&self) -> Option<&StateTransition<K>> {
        self.transitions.last()
    }
}

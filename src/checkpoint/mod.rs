//! Checkpoint and resume support for state machines.
//!
//! A snapshot records which kinds were instantiated, their statuses, the
//! active and latched kinds and the transition history. State instances are
//! not serialized: they are rebuilt from their factories when a snapshot is
//! handed to [`FsmBuilder::restore`](crate::builder::FsmBuilder::restore),
//! and the active state starts its sequence from the beginning.

use crate::core::{InternalStatus, StateHistory, StateKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod error;

pub use error::CheckpointError;

/// Version identifier for checkpoint format
pub const CHECKPOINT_VERSION: u32 = 1;

/// Serializable picture of a state machine's position.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct FsmSnapshot<K: StateKind> {
    /// Checkpoint format version
    pub version: u32,

    /// Unique checkpoint identifier
    pub id: Uuid,

    /// When the snapshot was taken
    pub timestamp: DateTime<Utc>,

    /// Label of the machine it was taken from
    pub label: String,

    pub active: Option<K>,

    pub pending: Option<K>,

    /// Every instantiated kind with its status, in creation order
    pub statuses: Vec<(K, InternalStatus)>,

    pub history: StateHistory<K>,

    /// Ticks driven before the snapshot
    pub ticks: u64,
}

impl<K: StateKind> FsmSnapshot<K> {
    /// Status recorded for `kind`, if it had been instantiated.
    pub fn status_of(&self, kind: &K) -> Option<InternalStatus> {
        self.statuses
            .iter()
            .find(|(recorded, _)| recorded == kind)
            .map(|(_, status)| *status)
    }

    pub fn to_json(&self) -> Result<String, CheckpointError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }

    /// Parse and validate a JSON snapshot.
    pub fn from_json(json: &str) -> Result<Self, CheckpointError> {
        let snapshot: Self = serde_json::from_str(json)
            .map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    pub fn to_binary(&self) -> Result<Vec<u8>, CheckpointError> {
        bincode::serialize(self).map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }

    /// Decode and validate a binary snapshot.
    pub fn from_binary(bytes: &[u8]) -> Result<Self, CheckpointError> {
        let snapshot: Self = bincode::deserialize(bytes)
            .map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Check the format version and that the recorded statuses agree with
    /// the active and pending kinds.
    pub fn validate(&self) -> Result<(), CheckpointError> {
        if self.version != CHECKPOINT_VERSION {
            return Err(CheckpointError::UnsupportedVersion {
                found: self.version,
                supported: CHECKPOINT_VERSION,
            });
        }

        for kind in self.active.iter().chain(self.pending.iter()) {
            if self.status_of(kind).is_none() {
                return Err(CheckpointError::ValidationFailed(format!(
                    "kind '{}' has no recorded status",
                    kind.name()
                )));
            }
        }

        let stray = self
            .statuses
            .iter()
            .find(|(kind, status)| status.is_active() && self.active.as_ref() != Some(kind));
        if let Some((kind, status)) = stray {
            return Err(CheckpointError::ValidationFailed(format!(
                "kind '{}' is {:?} but not active",
                kind.name(),
                status
            )));
        }

        Ok(())
    }
}

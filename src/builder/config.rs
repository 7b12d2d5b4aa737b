//! Machine configuration.

use crate::builder::error::BuildError;
use serde::{Deserialize, Serialize};

/// History bound applied when the configuration does not name one.
pub const DEFAULT_HISTORY_CAPACITY: usize = 64;

/// Tunables of a state machine. Every field has a default, so partial JSON
/// documents are accepted.
///
/// ```rust
/// use tickstate::builder::FsmConfig;
///
/// let config = FsmConfig::from_json(r#"{ "label": "hud", "history_capacity": 16 }"#).unwrap();
/// assert_eq!(config.label, "hud");
/// assert!(config.record_history);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FsmConfig {
    /// Name attached to every log event of the machine
    pub label: String,
    /// Whether activations are recorded in the history
    pub record_history: bool,
    /// Maximum number of history records kept, oldest dropped first.
    /// Defaults to [`DEFAULT_HISTORY_CAPACITY`]; `null` keeps every record.
    pub history_capacity: Option<usize>,
}

impl Default for FsmConfig {
    fn default() -> Self {
        Self {
            label: "fsm".to_string(),
            record_history: true,
            history_capacity: Some(DEFAULT_HISTORY_CAPACITY),
        }
    }
}

impl FsmConfig {
    pub fn from_json(json: &str) -> Result<Self, BuildError> {
        serde_json::from_str(json).map_err(|e| BuildError::InvalidConfig(e.to_string()))
    }
}

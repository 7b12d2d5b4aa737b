//! Build errors for the state machine builder.

use crate::checkpoint::CheckpointError;
use crate::machine::FsmError;
use thiserror::Error;

/// Errors that can occur when building a state machine.
#[derive(Debug, Clone, Error)]
pub enum BuildError {
    #[error("Context not specified. Call .context(value) before .build()")]
    MissingContext,

    #[error("No factory registered for state kind '{kind}'. Call .state(kind, factory)")]
    MissingFactory { kind: String },

    #[error("Factory for state kind '{kind}' registered more than once")]
    DuplicateFactory { kind: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Checkpoint(#[from] CheckpointError),

    #[error(transparent)]
    Machine(#[from] FsmError),

    /// Every problem found, when there was more than one
    #[error("Invalid state machine definition ({} problems)", .0.len())]
    Invalid(Vec<BuildError>),
}

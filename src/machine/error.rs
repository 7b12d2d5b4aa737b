//! Machine error types.

use thiserror::Error;

/// Errors raised by the transition API and the state registry.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FsmError {
    /// No factory is registered for the kind, so it cannot be instantiated
    #[error("No factory registered for state kind '{kind}'")]
    UnregisteredKind { kind: String },

    /// The machine behind a handle has been dropped
    #[error("State machine is gone; handle is detached")]
    Detached,
}

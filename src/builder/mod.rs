//! Builder API for state machine construction.
//!
//! [`FsmBuilder`] collects the context, one factory per state kind and the
//! machine's [`FsmConfig`], validates the whole definition at once and
//! produces a ready [`FiniteStateMachine`](crate::machine::FiniteStateMachine).
//! The [`state_kind!`](crate::state_kind) macro declares kind enums.

mod config;
mod error;
mod machine;
mod macros;

pub use config::{FsmConfig, DEFAULT_HISTORY_CAPACITY};
pub use error::BuildError;
pub use machine::FsmBuilder;

//! Core types shared by the machine and the states it drives.
//!
//! - State kinds and lifecycle status via the `StateKind` trait
//! - The `State` behavior contract and its step-function protocol
//! - The weak `FsmHandle` states use to call back into their machine
//! - Immutable activation history

mod handle;
mod history;
mod kind;
mod state;

pub(crate) use handle::{Command, Mailbox};

pub use handle::FsmHandle;
pub use history::{StateHistory, StateTransition};
pub use kind::{InternalStatus, StateKind};
pub use state::{Resume, State, StateBase, Step};

//! The machine: state registry, transition controller and execution driver.
//!
//! # Key Concepts
//!
//! - **Registry**: one instance per kind, created from a factory on first use
//! - **Controller**: the active kind plus a single-slot latch for the next one
//! - **Driver**: `tick()` resumes the active state once per host frame
//!
//! Everything here runs on the host's tick thread. The machine is `!Send`.

mod controller;
mod driver;
mod error;
mod fsm;
mod registry;

pub use controller::{LatchOutcome, Promotion, TransitionController, TransitionOptions};
pub use driver::TickOutcome;
pub use error::FsmError;
pub use fsm::FiniteStateMachine;
pub use registry::{StateFactory, StateRegistry};

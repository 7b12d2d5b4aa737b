//! Tickstate: a tick-driven finite state machine for game loops
//!
//! States are resumable step functions. The host calls
//! [`FiniteStateMachine::tick`] once per frame, the machine resumes the
//! active state until it yields, and transitions follow a cooperative
//! protocol: a request latches the next kind and tells the active state to
//! exit; the state runs its own cleanup over as many ticks as it needs and
//! then signals exit completion, at which point the latched kind takes over.
//!
//! # Core Concepts
//!
//! - **Kind**: a value naming a state implementation, usually an enum
//!   declared with [`state_kind!`]
//! - **Registry**: one lazily created instance per kind, built by a factory
//! - **Latch**: at most one pending kind; later requests are ignored unless
//!   forced
//! - **Handle**: a weak [`FsmHandle`] states use to call back into the machine
//!
//! # Example
//!
//! ```rust
//! use tickstate::core::{FsmHandle, InternalStatus, Resume, State, StateBase, Step};
//! use tickstate::{state_kind, FsmBuilder, TickOutcome};
//!
//! state_kind! {
//!     enum Screen {
//!         Title,
//!         Level,
//!     }
//! }
//!
//! /// Leaves for the level after three ticks.
//! struct Title {
//!     base: StateBase<Screen>,
//! }
//!
//! impl State<Screen, u32> for Title {
//!     fn init(&mut self, _context: &u32, fsm: FsmHandle<Screen>) {
//!         self.base.attach(fsm);
//!     }
//!
//!     fn execute(&mut self, resume: &mut Resume<'_, u32>) -> Step {
//!         if self.base.is_exiting() {
//!             self.base.exit_complete().unwrap();
//!             return Step::Finished;
//!         }
//!         *resume.context_mut() += 1;
//!         if resume.resumption() == 2 {
//!             self.base.request_transition(Screen::Level).unwrap();
//!         }
//!         Step::Yield
//!     }
//!
//!     fn set_internal_status(&mut self, status: InternalStatus) {
//!         self.base.set_status(status);
//!     }
//!
//!     fn internal_status(&self) -> InternalStatus {
//!         self.base.status()
//!     }
//! }
//!
//! struct Level {
//!     base: StateBase<Screen>,
//! }
//!
//! impl State<Screen, u32> for Level {
//!     fn init(&mut self, _context: &u32, fsm: FsmHandle<Screen>) {
//!         self.base.attach(fsm);
//!     }
//!
//!     fn execute(&mut self, _resume: &mut Resume<'_, u32>) -> Step {
//!         Step::Yield
//!     }
//!
//!     fn set_internal_status(&mut self, status: InternalStatus) {
//!         self.base.set_status(status);
//!     }
//!
//!     fn internal_status(&self) -> InternalStatus {
//!         self.base.status()
//!     }
//! }
//!
//! let mut fsm = FsmBuilder::new()
//!     .context(0u32)
//!     .state(Screen::Title, || Title { base: StateBase::new() })
//!     .state(Screen::Level, || Level { base: StateBase::new() })
//!     .initial(Screen::Title)
//!     .build()
//!     .unwrap();
//!
//! for _ in 0..3 {
//!     assert_eq!(fsm.tick(), TickOutcome::Suspended(Screen::Title));
//! }
//! assert_eq!(fsm.pending_kind(), Some(&Screen::Level));
//!
//! assert_eq!(fsm.tick(), TickOutcome::Suspended(Screen::Level));
//! assert_eq!(*fsm.context(), 3);
//! ```

pub mod builder;
pub mod checkpoint;
pub mod core;
pub mod demo;
pub mod machine;

// Re-export commonly used types
pub use builder::{BuildError, FsmBuilder, FsmConfig};
pub use checkpoint::{CheckpointError, FsmSnapshot};
pub use core::{FsmHandle, InternalStatus, State, StateBase, StateKind, Step};
pub use machine::{FiniteStateMachine, FsmError, TickOutcome, TransitionOptions};

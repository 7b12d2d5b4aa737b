//! Per-tick execution of the pumped state's resumable sequence.

use crate::core::{Resume, StateKind, Step};
use crate::machine::FiniteStateMachine;
use tracing::{trace, warn};

/// What happened during one tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome<K> {
    /// The state of this kind reached a suspension point
    Suspended(K),
    /// No sequence is running and no state is active
    Idle,
}

impl<K: StateKind, C: 'static> FiniteStateMachine<K, C> {
    /// Drive the machine for one host tick.
    ///
    /// Resumes the running sequence until it yields. A sequence runs until it
    /// finishes, even when its state was switched out in the meantime (for
    /// example a state that signals exit completion and then yields once more
    /// to finish its cleanup). When it finishes, the sequence of whichever
    /// kind is active at that moment starts from resumption 0 within the same
    /// tick: the promoted kind after a switch, or the same kind again when
    /// nothing switched.
    ///
    /// A state that keeps finishing without yielding, or never observes its
    /// `Exiting` status, is never interrupted.
    pub fn tick(&mut self) -> TickOutcome<K> {
        self.ticks += 1;
        self.drain_mailbox();

        loop {
            let current = match self.cursor.pumping.clone() {
                Some(kind) => kind,
                None => {
                    let Some(active) = self.controller.active().cloned() else {
                        trace!(machine = %self.config.label, tick = self.ticks, "idle tick");
                        return TickOutcome::Idle;
                    };
                    trace!(
                        machine = %self.config.label,
                        kind = active.name(),
                        "starting sequence"
                    );
                    self.cursor.start(active.clone());
                    active
                }
            };

            let step = {
                let Some(state) = self.registry.instance_mut(&current) else {
                    warn!(
                        machine = %self.config.label,
                        kind = current.name(),
                        "pumped state has no instance"
                    );
                    self.cursor.finish();
                    return TickOutcome::Idle;
                };
                let mut resume = Resume::new(&mut self.context, self.cursor.resumptions, self.ticks);
                state.execute(&mut resume)
            };
            self.cursor.resumptions += 1;
            self.drain_mailbox();

            match step {
                Step::Yield => return TickOutcome::Suspended(current),
                Step::Finished => {
                    trace!(
                        machine = %self.config.label,
                        kind = current.name(),
                        resumptions = self.cursor.resumptions,
                        "sequence finished"
                    );
                    self.cursor.finish();
                }
            }
        }
    }
}

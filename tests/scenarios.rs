//! End-to-end transition scenarios driven through the public API.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;
use tickstate::core::{FsmHandle, InternalStatus, Resume, State, StateBase, Step};
use tickstate::machine::{FiniteStateMachine, TransitionOptions};
use tickstate::builder::DEFAULT_HISTORY_CAPACITY;
use tickstate::{state_kind, FsmBuilder, FsmError, FsmSnapshot, TickOutcome};

state_kind! {
    enum TestKind {
        A,
        B,
        C,
        Missing,
    }
}

#[derive(Clone, Debug, PartialEq)]
enum Event {
    Init(TestKind),
    Execute {
        kind: TestKind,
        resumption: u64,
        status: InternalStatus,
    },
    BeginExit {
        kind: TestKind,
        status: InternalStatus,
    },
}

type Journal = Rc<RefCell<Vec<Event>>>;

/// Records every callback. Completes its exit as soon as it sees `Exiting`,
/// and finishes its sequence once it has been switched out.
struct Scripted {
    kind: TestKind,
    base: StateBase<TestKind>,
    journal: Journal,
    finish_at: Option<u64>,
    request_on_entry: Option<TestKind>,
    lingers: bool,
}

impl State<TestKind, u32> for Scripted {
    fn init(&mut self, _context: &u32, fsm: FsmHandle<TestKind>) {
        self.base.attach(fsm);
        self.journal.borrow_mut().push(Event::Init(self.kind));
    }

    fn execute(&mut self, resume: &mut Resume<'_, u32>) -> Step {
        *resume.context_mut() += 1;
        self.journal.borrow_mut().push(Event::Execute {
            kind: self.kind,
            resumption: resume.resumption(),
            status: self.base.status(),
        });

        if self.base.status() == InternalStatus::Inactive {
            // Post-exit cleanup.
            return Step::Finished;
        }
        if self.base.is_exiting() {
            self.base.exit_complete().unwrap();
            return if self.lingers {
                Step::Yield
            } else {
                Step::Finished
            };
        }
        if resume.is_fresh() {
            if let Some(target) = self.request_on_entry {
                self.base.request_transition(target).unwrap();
            }
        }
        if self.finish_at == Some(resume.resumption()) {
            return Step::Finished;
        }
        Step::Yield
    }

    fn begin_exit(&mut self) {
        self.journal.borrow_mut().push(Event::BeginExit {
            kind: self.kind,
            status: self.base.status(),
        });
    }

    fn set_internal_status(&mut self, status: InternalStatus) {
        self.base.set_status(status);
    }

    fn internal_status(&self) -> InternalStatus {
        self.base.status()
    }
}

#[derive(Default)]
struct Harness {
    journal: Journal,
    finish_at: HashMap<TestKind, u64>,
    request_on_entry: HashMap<TestKind, TestKind>,
    lingering: HashSet<TestKind>,
}

impl Harness {
    fn new() -> Self {
        Self::default()
    }

    /// `kind` finishes its sequence on resumption `index` instead of yielding.
    fn finishing(mut self, kind: TestKind, index: u64) -> Self {
        self.finish_at.insert(kind, index);
        self
    }

    /// `kind` requests `target` through its handle when its sequence starts.
    fn requesting(mut self, kind: TestKind, target: TestKind) -> Self {
        self.request_on_entry.insert(kind, target);
        self
    }

    /// `kind` yields once more after signalling exit completion.
    fn lingering(mut self, kind: TestKind) -> Self {
        self.lingering.insert(kind);
        self
    }

    fn builder(&self) -> FsmBuilder<TestKind, u32> {
        [TestKind::A, TestKind::B, TestKind::C]
            .into_iter()
            .fold(FsmBuilder::<TestKind, u32>::new().context(0), |builder, kind| {
                let journal = Rc::clone(&self.journal);
                let finish_at = self.finish_at.get(&kind).copied();
                let request_on_entry = self.request_on_entry.get(&kind).copied();
                let lingers = self.lingering.contains(&kind);
                builder.state(kind, move || Scripted {
                    kind,
                    base: StateBase::new(),
                    journal: Rc::clone(&journal),
                    finish_at,
                    request_on_entry,
                    lingers,
                })
            })
    }

    fn build(self, initial: Option<TestKind>) -> (FiniteStateMachine<TestKind, u32>, Journal) {
        let builder = match initial {
            Some(kind) => self.builder().initial(kind),
            None => self.builder(),
        };
        (builder.build().unwrap(), self.journal)
    }

    fn restore(self, snapshot: FsmSnapshot<TestKind>) -> (FiniteStateMachine<TestKind, u32>, Journal) {
        let fsm = self.builder().restore(snapshot).build().unwrap();
        (fsm, self.journal)
    }
}

/// Status each `begin_exit` call of `kind` observed.
fn begin_exits(journal: &Journal, kind: TestKind) -> Vec<InternalStatus> {
    journal
        .borrow()
        .iter()
        .filter_map(|event| match event {
            Event::BeginExit { kind: k, status } if *k == kind => Some(*status),
            _ => None,
        })
        .collect()
}

fn executions(journal: &Journal, kind: TestKind) -> Vec<(u64, InternalStatus)> {
    journal
        .borrow()
        .iter()
        .filter_map(|event| match event {
            Event::Execute {
                kind: k,
                resumption,
                status,
            } if *k == kind => Some((*resumption, *status)),
            _ => None,
        })
        .collect()
}

#[test]
fn bootstrap_without_initial_state() {
    let (mut fsm, _) = Harness::new().build(None);
    assert_eq!(fsm.active_kind(), None);

    fsm.request_transition_with(TestKind::A, TransitionOptions::deferred())
        .unwrap();
    assert_eq!(fsm.pending_kind(), Some(&TestKind::A));
    fsm.on_exit_complete();

    assert_eq!(fsm.active_kind(), Some(&TestKind::A));
    assert_eq!(fsm.pending_kind(), None);
    assert_eq!(fsm.status_of(&TestKind::A), Some(InternalStatus::Executing));
}

#[test]
fn request_begins_exit_then_completion_switches() {
    let (mut fsm, journal) = Harness::new().build(Some(TestKind::A));

    fsm.request_transition(TestKind::B).unwrap();
    // The hook already sees the exiting status.
    assert_eq!(
        begin_exits(&journal, TestKind::A),
        vec![InternalStatus::Exiting]
    );
    assert_eq!(fsm.status_of(&TestKind::A), Some(InternalStatus::Exiting));
    assert_eq!(fsm.status_of(&TestKind::B), Some(InternalStatus::Inactive));

    fsm.on_exit_complete();
    assert_eq!(fsm.status_of(&TestKind::B), Some(InternalStatus::Executing));
    assert_eq!(fsm.status_of(&TestKind::A), Some(InternalStatus::Inactive));
    assert_eq!(fsm.active_kind(), Some(&TestKind::B));
}

#[test]
fn unforced_request_does_not_replace_latch() {
    let (mut fsm, journal) = Harness::new().build(Some(TestKind::A));

    fsm.request_transition(TestKind::B).unwrap();
    fsm.request_transition(TestKind::C).unwrap();

    assert_eq!(fsm.pending_kind(), Some(&TestKind::B));
    // The exit hook runs for every request that begins the exit.
    assert_eq!(begin_exits(&journal, TestKind::A).len(), 2);
}

#[test]
fn forced_request_replaces_latch() {
    let (mut fsm, _) = Harness::new().build(Some(TestKind::A));

    fsm.request_transition(TestKind::B).unwrap();
    fsm.request_transition_with(TestKind::C, TransitionOptions::default().forced())
        .unwrap();

    assert_eq!(fsm.pending_kind(), Some(&TestKind::C));
    fsm.on_exit_complete();
    assert_eq!(fsm.active_kind(), Some(&TestKind::C));
    assert_eq!(fsm.status_of(&TestKind::B), Some(InternalStatus::Inactive));
}

#[test]
fn add_state_is_idempotent() {
    let (mut fsm, journal) = Harness::new().build(None);

    fsm.add_state(TestKind::B).unwrap();
    fsm.add_state(TestKind::B).unwrap();
    fsm.get_state(TestKind::B).unwrap();

    let inits = journal
        .borrow()
        .iter()
        .filter(|event| **event == Event::Init(TestKind::B))
        .count();
    assert_eq!(inits, 1);
    assert_eq!(fsm.registry().len(), 1);
}

#[test]
fn missing_factory_is_an_error() {
    let (mut fsm, _) = Harness::new().build(Some(TestKind::A));

    let result = fsm.request_transition(TestKind::Missing);

    assert_eq!(
        result,
        Err(FsmError::UnregisteredKind {
            kind: "Missing".to_string()
        })
    );
    assert_eq!(fsm.status_of(&TestKind::A), Some(InternalStatus::Executing));
}

#[test]
fn handle_request_lands_before_next_resumption() {
    let (mut fsm, journal) = Harness::new()
        .requesting(TestKind::A, TestKind::B)
        .build(Some(TestKind::A));

    assert_eq!(fsm.tick(), TickOutcome::Suspended(TestKind::A));
    assert_eq!(fsm.pending_kind(), Some(&TestKind::B));
    assert_eq!(fsm.status_of(&TestKind::A), Some(InternalStatus::Exiting));

    // A sees Exiting, completes its exit and B takes over within the tick.
    assert_eq!(fsm.tick(), TickOutcome::Suspended(TestKind::B));
    assert_eq!(
        executions(&journal, TestKind::A),
        vec![
            (0, InternalStatus::Executing),
            (1, InternalStatus::Exiting)
        ]
    );
    assert_eq!(
        executions(&journal, TestKind::B),
        vec![(0, InternalStatus::Executing)]
    );
    assert_eq!(*fsm.context(), 3);
}

#[test]
fn outgoing_sequence_runs_to_completion_after_switch() {
    let (mut fsm, journal) = Harness::new()
        .lingering(TestKind::A)
        .build(Some(TestKind::A));

    fsm.request_transition(TestKind::B).unwrap();

    // A completes its exit but yields; the switch lands, A keeps running.
    assert_eq!(fsm.tick(), TickOutcome::Suspended(TestKind::A));
    assert_eq!(fsm.active_kind(), Some(&TestKind::B));
    assert_eq!(fsm.status_of(&TestKind::A), Some(InternalStatus::Inactive));
    assert!(executions(&journal, TestKind::B).is_empty());

    // A's cleanup runs, then B starts from its first resumption.
    assert_eq!(fsm.tick(), TickOutcome::Suspended(TestKind::B));
    assert_eq!(
        executions(&journal, TestKind::A),
        vec![(0, InternalStatus::Exiting), (1, InternalStatus::Inactive)]
    );
    assert_eq!(
        executions(&journal, TestKind::B),
        vec![(0, InternalStatus::Executing)]
    );
}

#[test]
fn host_exit_completion_lets_running_sequence_finish() {
    let (mut fsm, journal) = Harness::new().build(Some(TestKind::A));

    assert_eq!(fsm.tick(), TickOutcome::Suspended(TestKind::A));
    fsm.request_transition_with(TestKind::B, TransitionOptions::deferred())
        .unwrap();
    fsm.on_exit_complete();
    assert_eq!(fsm.active_kind(), Some(&TestKind::B));

    assert_eq!(fsm.tick(), TickOutcome::Suspended(TestKind::B));
    assert_eq!(
        executions(&journal, TestKind::A),
        vec![(0, InternalStatus::Executing), (1, InternalStatus::Inactive)]
    );
    assert_eq!(
        executions(&journal, TestKind::B),
        vec![(0, InternalStatus::Executing)]
    );
}

#[test]
fn finished_sequence_without_switch_starts_over() {
    let (mut fsm, journal) = Harness::new()
        .finishing(TestKind::A, 1)
        .build(Some(TestKind::A));

    fsm.tick();
    fsm.tick();

    let resumptions: Vec<u64> = executions(&journal, TestKind::A)
        .into_iter()
        .map(|(resumption, _)| resumption)
        .collect();
    assert_eq!(resumptions, vec![0, 1, 0]);
    assert_eq!(fsm.active_kind(), Some(&TestKind::A));
}

#[test]
fn exit_without_target_leaves_machine_idle() {
    let (mut fsm, _) = Harness::new().build(Some(TestKind::A));

    fsm.begin_exit_active();
    assert_eq!(fsm.status_of(&TestKind::A), Some(InternalStatus::Exiting));

    assert_eq!(fsm.tick(), TickOutcome::Idle);
    assert_eq!(fsm.active_kind(), None);
    assert_eq!(fsm.status_of(&TestKind::A), Some(InternalStatus::Inactive));
    assert_eq!(fsm.tick(), TickOutcome::Idle);

    // Latching alone does not revive the machine; exit completion must be
    // signalled again.
    fsm.request_transition(TestKind::B).unwrap();
    assert_eq!(fsm.tick(), TickOutcome::Idle);
    fsm.on_exit_complete();
    assert_eq!(fsm.tick(), TickOutcome::Suspended(TestKind::B));
}

#[test]
fn handle_reports_detached_after_drop() {
    let (fsm, _) = Harness::new().build(Some(TestKind::A));
    let handle = fsm.handle();
    assert!(handle.is_attached());

    drop(fsm);

    assert!(!handle.is_attached());
    assert_eq!(handle.request_transition(TestKind::B), Err(FsmError::Detached));
    assert_eq!(handle.exit_complete(), Err(FsmError::Detached));
}

#[test]
fn queued_request_for_missing_kind_is_dropped() {
    let (mut fsm, _) = Harness::new().build(Some(TestKind::A));
    let handle = fsm.handle();

    handle.request_transition(TestKind::Missing).unwrap();
    handle.request_transition(TestKind::C).unwrap();
    fsm.tick();

    assert_eq!(fsm.pending_kind(), None);
    assert_eq!(fsm.active_kind(), Some(&TestKind::C));
}

#[test]
fn history_records_each_activation() {
    let (mut fsm, _) = Harness::new().build(Some(TestKind::A));

    fsm.request_transition(TestKind::B).unwrap();
    fsm.tick();
    fsm.request_transition(TestKind::C).unwrap();
    fsm.tick();

    let history = fsm.history();
    assert_eq!(
        history.get_path(),
        vec![&TestKind::A, &TestKind::B, &TestKind::C]
    );
    let ticks: Vec<u64> = history.transitions().iter().map(|t| t.tick).collect();
    assert_eq!(ticks, vec![0, 1, 2]);
}

#[test]
fn default_history_is_bounded() {
    let (mut fsm, _) = Harness::new().build(Some(TestKind::A));

    for round in 0..(DEFAULT_HISTORY_CAPACITY as u64 + 10) {
        let target = if round % 2 == 0 { TestKind::B } else { TestKind::A };
        fsm.request_transition(target).unwrap();
        fsm.tick();
    }

    let transitions = fsm.history().transitions();
    assert_eq!(transitions.len(), DEFAULT_HISTORY_CAPACITY);
    assert_eq!(transitions.last().map(|t| t.tick), Some(fsm.ticks()));
}

#[test]
fn snapshot_restores_exiting_machine() {
    let (mut fsm, _) = Harness::new().build(Some(TestKind::A));
    fsm.tick();
    fsm.request_transition(TestKind::B).unwrap();

    let snapshot = fsm.snapshot();
    assert_eq!(snapshot.active, Some(TestKind::A));
    assert_eq!(snapshot.pending, Some(TestKind::B));
    let json = snapshot.to_json().unwrap();

    let restored = FsmSnapshot::<TestKind>::from_json(&json).unwrap();
    let (mut resumed, journal) = Harness::new().restore(restored);

    // The exit restarts from scratch on the fresh instance.
    assert_eq!(
        begin_exits(&journal, TestKind::A),
        vec![InternalStatus::Exiting]
    );
    assert_eq!(resumed.active_kind(), Some(&TestKind::A));
    assert_eq!(resumed.pending_kind(), Some(&TestKind::B));
    assert_eq!(resumed.status_of(&TestKind::A), Some(InternalStatus::Exiting));
    assert_eq!(resumed.ticks(), 1);

    assert_eq!(resumed.tick(), TickOutcome::Suspended(TestKind::B));
    assert_eq!(
        resumed.history().get_path(),
        vec![&TestKind::A, &TestKind::B]
    );
}

#[test]
fn binary_snapshot_restores_idle_machine() {
    let (mut fsm, _) = Harness::new().build(Some(TestKind::A));
    fsm.request_transition_with(TestKind::C, TransitionOptions::deferred())
        .unwrap();
    let bytes = fsm.snapshot().to_binary().unwrap();

    let snapshot = FsmSnapshot::<TestKind>::from_binary(&bytes).unwrap();
    let (resumed, _) = Harness::new().restore(snapshot);

    assert_eq!(resumed.active_kind(), Some(&TestKind::A));
    assert_eq!(resumed.status_of(&TestKind::A), Some(InternalStatus::Executing));
    assert_eq!(resumed.pending_kind(), Some(&TestKind::C));
    assert_eq!(resumed.registry().kinds(), &[TestKind::A, TestKind::C]);
}

#[test]
fn snapshot_restores_exit_without_target() {
    let (mut fsm, _) = Harness::new().build(Some(TestKind::A));
    fsm.begin_exit_active();
    let json = fsm.snapshot().to_json().unwrap();

    let snapshot = FsmSnapshot::<TestKind>::from_json(&json).unwrap();
    let (mut resumed, journal) = Harness::new().restore(snapshot);

    assert_eq!(
        begin_exits(&journal, TestKind::A),
        vec![InternalStatus::Exiting]
    );
    assert_eq!(resumed.pending_kind(), None);
    assert_eq!(resumed.tick(), TickOutcome::Idle);
    assert_eq!(resumed.active_kind(), None);
}

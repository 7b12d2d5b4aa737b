//! The mini-game: click every target to go back to the menu.

use crate::core::{FsmHandle, InternalStatus, Resume, State, StateBase, Step};
use crate::demo::fade::Fade;
use crate::demo::presentation::{Color, Presentation, TargetId};
use crate::demo::{DemoKind, FADE_SECONDS};
use tracing::{debug, info, warn};

/// Targets spawned per round.
pub const TARGET_COUNT: usize = 3;

/// Distance between neighbouring targets.
pub const TARGET_SPACING: f32 = 2.0;

#[derive(Clone, Copy, Debug, PartialEq)]
enum Phase {
    Setup,
    FadingIn(Fade),
    Running,
    FadingOut(Fade),
    Done,
}

#[derive(Debug)]
pub struct Play {
    base: StateBase<DemoKind>,
    phase: Phase,
    spawned: Vec<TargetId>,
    remaining: Vec<TargetId>,
}

impl Play {
    pub fn new() -> Self {
        Self {
            base: StateBase::new(),
            phase: Phase::Setup,
            spawned: Vec::with_capacity(TARGET_COUNT),
            remaining: Vec::with_capacity(TARGET_COUNT),
        }
    }

    /// Targets not hit yet in the current round.
    pub fn remaining(&self) -> &[TargetId] {
        &self.remaining
    }

    fn hit<P: Presentation + ?Sized>(&mut self, screen: &mut P, target: TargetId) {
        let Some(index) = self.remaining.iter().position(|t| *t == target) else {
            return;
        };
        screen.set_target_color(target, Color::Red);
        self.remaining.remove(index);
        debug!(%target, remaining = self.remaining.len(), "target hit");

        if self.remaining.is_empty() {
            info!("all targets hit; returning to the main menu");
            if let Err(error) = self.base.request_transition(DemoKind::MainMenu) {
                warn!(%error, "could not request the main menu");
            }
        }
    }

    fn clean_up<P: Presentation + ?Sized>(&mut self, screen: &mut P) {
        for target in self.spawned.drain(..) {
            screen.despawn_target(target);
        }
        self.remaining.clear();
    }
}

impl Default for Play {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Presentation> State<DemoKind, P> for Play {
    fn init(&mut self, _context: &P, fsm: FsmHandle<DemoKind>) {
        self.base.attach(fsm);
    }

    fn execute(&mut self, resume: &mut Resume<'_, P>) -> Step {
        let fresh = resume.is_fresh();
        let screen = resume.context_mut();
        if fresh {
            // Leftovers from an activation that never finished its exit.
            self.clean_up(screen);
            self.phase = Phase::Setup;
        }

        loop {
            match self.phase {
                Phase::Setup => {
                    for i in 0..TARGET_COUNT {
                        let target = screen.spawn_target(i as f32 * TARGET_SPACING);
                        self.spawned.push(target);
                        self.remaining.push(target);
                    }
                    screen.show_cover(true);
                    screen.set_cover_alpha(1.0);
                    self.phase = Phase::FadingIn(Fade::reveal(FADE_SECONDS / 2.0));
                }
                Phase::FadingIn(mut fade) => {
                    let running = fade.advance(screen);
                    self.phase = Phase::FadingIn(fade);
                    if running {
                        return Step::Yield;
                    }
                    screen.show_cover(false);
                    for target in &self.remaining {
                        screen.set_target_color(*target, Color::Green);
                    }
                    self.phase = Phase::Running;
                }
                Phase::Running => {
                    if self.base.is_executing() {
                        if let Some(target) = screen.poll_click() {
                            self.hit(screen, target);
                        }
                        return Step::Yield;
                    }
                    screen.show_cover(true);
                    self.phase = Phase::FadingOut(Fade::conceal(FADE_SECONDS / 2.0));
                }
                Phase::FadingOut(mut fade) => {
                    let running = fade.advance(screen);
                    self.phase = Phase::FadingOut(fade);
                    if running {
                        return Step::Yield;
                    }
                    self.clean_up(screen);
                    self.phase = Phase::Done;
                    if let Err(error) = self.base.exit_complete() {
                        warn!(%error, "play could not report its exit");
                    }
                    return Step::Finished;
                }
                Phase::Done => return Step::Finished,
            }
        }
    }

    fn set_internal_status(&mut self, status: InternalStatus) {
        self.base.set_status(status);
    }

    fn internal_status(&self) -> InternalStatus {
        self.base.status()
    }
}

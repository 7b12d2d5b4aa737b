//! The main menu: a frame counter and a play button.

use crate::core::{FsmHandle, InternalStatus, Resume, State, StateBase, Step};
use crate::demo::fade::Fade;
use crate::demo::presentation::Presentation;
use crate::demo::{DemoKind, FADE_SECONDS};
use crate::machine::TransitionOptions;
use tracing::{debug, warn};

#[derive(Clone, Copy, Debug, PartialEq)]
enum Phase {
    Setup,
    FadingIn(Fade),
    Running,
    FadingOut(Fade),
    Done,
}

#[derive(Debug)]
pub struct MainMenu {
    base: StateBase<DemoKind>,
    phase: Phase,
    initial_frame: u64,
}

impl MainMenu {
    pub fn new() -> Self {
        Self {
            base: StateBase::new(),
            phase: Phase::Setup,
            initial_frame: 0,
        }
    }

    fn play_listener(&self) -> Box<dyn FnMut()> {
        let fsm = self.base.handle().cloned();
        Box::new(move || {
            let Some(fsm) = &fsm else {
                return;
            };
            if let Err(error) =
                fsm.request_transition_with(DemoKind::Play, TransitionOptions::default())
            {
                warn!(%error, "play button pressed after the machine was dropped");
            }
        })
    }
}

impl Default for MainMenu {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Presentation> State<DemoKind, P> for MainMenu {
    fn init(&mut self, _context: &P, fsm: FsmHandle<DemoKind>) {
        self.base.attach(fsm);
    }

    fn execute(&mut self, resume: &mut Resume<'_, P>) -> Step {
        if resume.is_fresh() {
            self.phase = Phase::Setup;
        }
        let screen = resume.context_mut();

        loop {
            match self.phase {
                Phase::Setup => {
                    screen.show_main_menu(self.play_listener());
                    self.initial_frame = screen.frame();
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
                    self.phase = Phase::Running;
                }
                Phase::Running => {
                    if self.base.is_executing() {
                        let frames = screen.frame() - self.initial_frame;
                        screen.set_caption(&format!("Frames spent on menu: {frames}"));
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
                    screen.hide_main_menu();
                    self.phase = Phase::Done;
                    debug!(frames = screen.frame() - self.initial_frame, "main menu exited");
                    if let Err(error) = self.base.exit_complete() {
                        warn!(%error, "main menu could not report its exit");
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

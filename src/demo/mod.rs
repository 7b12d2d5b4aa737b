//! A two-screen toy game driven by the state machine.
//!
//! [`MainMenu`] shows a frame counter and a play button. Pressing play fades
//! over to [`Play`], which spawns a row of targets; once every target has
//! been clicked the game fades back to the menu. Both states draw through
//! the [`Presentation`] trait, which doubles as the machine's context.
//! [`HeadlessScreen`] implements it without a window for the demo program
//! and the tests.
//!
//! ```rust
//! use tickstate::demo::{self, DemoKind, HeadlessScreen};
//!
//! let mut fsm = demo::demo_builder(HeadlessScreen::default()).build().unwrap();
//! demo::run_frame(&mut fsm);
//!
//! assert_eq!(fsm.active_kind(), Some(&DemoKind::MainMenu));
//! assert!(fsm.context().menu_visible());
//! ```

mod fade;
mod headless;
mod main_menu;
mod play;
mod presentation;

pub use fade::Fade;
pub use headless::{HeadlessScreen, ScreenEvent, TargetView};
pub use main_menu::MainMenu;
pub use play::{Play, TARGET_COUNT, TARGET_SPACING};
pub use presentation::{Color, Listener, Presentation, TargetId};

use crate::builder::FsmBuilder;
use crate::machine::{FiniteStateMachine, TickOutcome};
use crate::state_kind;

/// Length of a full fade out and back in, in seconds. Each half takes half.
pub const FADE_SECONDS: f32 = 2.0;

state_kind! {
    /// The demo's screens.
    pub enum DemoKind {
        MainMenu,
        Play,
    }
}

/// Builder for the demo machine, starting on the main menu.
pub fn demo_builder<P: Presentation + 'static>(screen: P) -> FsmBuilder<DemoKind, P> {
    FsmBuilder::new()
        .context(screen)
        .label("demo")
        .state(DemoKind::MainMenu, MainMenu::new)
        .state(DemoKind::Play, Play::new)
        .initial(DemoKind::MainMenu)
}

/// Tick the machine once, then move the screen to the next frame.
pub fn run_frame(fsm: &mut FiniteStateMachine<DemoKind, HeadlessScreen>) -> TickOutcome<DemoKind> {
    let outcome = fsm.tick();
    fsm.context_mut().advance_frame();
    outcome
}

//! Main Menu and Play
//!
//! Runs the two-screen demo on a headless screen with scripted input: wait
//! on the menu, press play, click every target, land back on the menu.
//!
//! Key concepts:
//! - A UI listener calling back into the machine through a captured handle
//! - States that take several ticks to fade in and out
//! - Exit completion signalled by the state itself
//!
//! Run with: cargo run --example menu_and_play
//! Set RUST_LOG=tickstate=debug to watch the transitions.

use tickstate::demo::{self, DemoKind, HeadlessScreen, Presentation, TargetId};
use tickstate::machine::FiniteStateMachine;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

type DemoFsm = FiniteStateMachine<DemoKind, HeadlessScreen>;

const MAX_FRAMES: usize = 1_000;

fn run_until(fsm: &mut DemoFsm, done: impl Fn(&DemoFsm) -> bool) -> Result<(), String> {
    for _ in 0..MAX_FRAMES {
        if done(&*fsm) {
            return Ok(());
        }
        demo::run_frame(fsm);
    }
    Err(format!("gave up after {MAX_FRAMES} frames: {:?}", fsm.context()))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer())
        .init();

    println!("=== Main Menu and Play ===\n");

    let mut fsm = demo::demo_builder(HeadlessScreen::default()).build()?;

    run_until(&mut fsm, |fsm| fsm.context().frame() >= 90)?;
    println!(
        "Frame {}: {}",
        fsm.context().frame(),
        fsm.context().caption().unwrap_or_default()
    );

    println!("Pressing play");
    fsm.context_mut().press_play();
    run_until(&mut fsm, |fsm| {
        fsm.active_kind() == Some(&DemoKind::Play) && !fsm.context().cover_visible()
    })?;
    println!("Frame {}: play faded in", fsm.context().frame());

    let targets: Vec<TargetId> = fsm.context().targets().map(|(id, _)| id).collect();
    for target in targets {
        println!("Clicking {target}");
        fsm.context_mut().click(target);
        demo::run_frame(&mut fsm);
        demo::run_frame(&mut fsm);
    }

    run_until(&mut fsm, |fsm| {
        fsm.active_kind() == Some(&DemoKind::MainMenu) && !fsm.context().cover_visible()
    })?;
    println!("Frame {}: back on the main menu\n", fsm.context().frame());

    println!("Activations:");
    for transition in fsm.history().transitions() {
        println!(
            "  tick {:>4}: {:?} -> {:?}",
            transition.tick, transition.from, transition.to
        );
    }

    println!("\nSnapshot:\n{}", fsm.snapshot().to_json()?);
    Ok(())
}

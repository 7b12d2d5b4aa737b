//! Traffic Light State Machine
//!
//! A cyclic machine where every light stays on for a fixed number of ticks
//! and then hands over to the next one.
//!
//! Key concepts:
//! - Cyclic state transitions (states repeat)
//! - One shared state type registered under several kinds
//! - Immediate exits: a light completes its exit on its next resumption
//!
//! Run with: cargo run --example traffic_light
//! Set RUST_LOG=tickstate=debug to watch the handovers.

use tickstate::core::{FsmHandle, InternalStatus, Resume, State, StateBase, Step};
use tickstate::{state_kind, FsmBuilder, StateKind, TickOutcome};
use tracing::warn;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

state_kind! {
    enum TrafficLight {
        Red,
        Yellow,
        Green,
    }
}

/// Counts how often each light came on.
#[derive(Debug, Default)]
struct Intersection {
    cycles: u32,
}

struct Light {
    base: StateBase<TrafficLight>,
    next: TrafficLight,
    duration: u64,
}

impl Light {
    fn new(next: TrafficLight, duration: u64) -> Self {
        Self {
            base: StateBase::new(),
            next,
            duration,
        }
    }
}

impl State<TrafficLight, Intersection> for Light {
    fn init(&mut self, _context: &Intersection, fsm: FsmHandle<TrafficLight>) {
        self.base.attach(fsm);
    }

    fn execute(&mut self, resume: &mut Resume<'_, Intersection>) -> Step {
        if self.base.is_exiting() {
            if let Err(error) = self.base.exit_complete() {
                warn!(%error, "light could not finish");
            }
            return Step::Finished;
        }
        if resume.is_fresh() && self.next == TrafficLight::Green {
            resume.context_mut().cycles += 1;
        }
        if resume.resumption() + 1 == self.duration {
            if let Err(error) = self.base.request_transition(self.next) {
                warn!(%error, next = self.next.name(), "light could not hand over");
            }
        }
        Step::Yield
    }

    fn set_internal_status(&mut self, status: InternalStatus) {
        self.base.set_status(status);
    }

    fn internal_status(&self) -> InternalStatus {
        self.base.status()
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer())
        .init();

    println!("=== Traffic Light State Machine ===\n");

    let mut machine = FsmBuilder::new()
        .context(Intersection::default())
        .label("traffic")
        .history_capacity(6)
        .state(TrafficLight::Red, || Light::new(TrafficLight::Green, 4))
        .state(TrafficLight::Green, || Light::new(TrafficLight::Yellow, 3))
        .state(TrafficLight::Yellow, || Light::new(TrafficLight::Red, 1))
        .initial(TrafficLight::Red)
        .build()?;

    println!("Sequence:");
    for _ in 0..24 {
        if let TickOutcome::Suspended(light) = machine.tick() {
            println!("  tick {:>2}: {}", machine.ticks(), light.name());
        }
    }

    println!("\nRed came on {} times", machine.context().cycles);
    println!("Last activations: {:?}", machine.history().get_path());
    Ok(())
}

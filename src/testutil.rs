use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::config::CareerConfig;
use crate::model::{DAYS_PER_WEEK, GameState};
use crate::sim::{Signal, SignalKind, SimSystem, TickContext};

// ---------------------------------------------------------------------------
// Tick execution helpers
// ---------------------------------------------------------------------------

/// Run a single system tick on `day` of the current week. Returns emitted signals.
pub fn tick_system_on_day(
    state: &mut GameState,
    config: &CareerConfig,
    system: &mut dyn SimSystem,
    day: u8,
    seed: u64,
) -> Vec<Signal> {
    state.week.current_day = day;
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut signals = Vec::new();
    let mut ctx = TickContext {
        state,
        config,
        rng: &mut rng,
        signals: &mut signals,
        inbox: &[],
    };
    system.tick(&mut ctx);
    signals
}

/// Run a single system tick on the last day of the current week, when
/// weekly systems fire. Returns emitted signals.
pub fn tick_system_at_week_end(
    state: &mut GameState,
    config: &CareerConfig,
    system: &mut dyn SimSystem,
    seed: u64,
) -> Vec<Signal> {
    tick_system_on_day(state, config, system, DAYS_PER_WEEK - 1, seed)
}

/// Run a system's handle_signals with the given inbox. Returns newly emitted signals.
pub fn deliver_signals(
    state: &mut GameState,
    config: &CareerConfig,
    system: &mut dyn SimSystem,
    inbox: &[Signal],
    seed: u64,
) -> Vec<Signal> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut signals = Vec::new();
    let mut ctx = TickContext {
        state,
        config,
        rng: &mut rng,
        signals: &mut signals,
        inbox,
    };
    system.handle_signals(&mut ctx);
    signals
}

/// Deliver a single signal dated today.
pub fn react_to(
    state: &mut GameState,
    config: &CareerConfig,
    system: &mut dyn SimSystem,
    kind: SignalKind,
) -> Vec<Signal> {
    let signal = Signal {
        date: state.date(),
        kind,
    };
    deliver_signals(state, config, system, &[signal], 0)
}

// ---------------------------------------------------------------------------
// Assertions
// ---------------------------------------------------------------------------

pub fn has_signal(signals: &[Signal], pred: impl Fn(&SignalKind) -> bool) -> bool {
    signals.iter().any(|s| pred(&s.kind))
}

#[track_caller]
pub fn assert_approx(actual: f64, expected: f64, eps: f64) {
    assert!(
        (actual - expected).abs() <= eps,
        "expected {expected} ± {eps}, got {actual}"
    );
}

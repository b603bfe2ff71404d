use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::RngCore;

use super::context::TickContext;
use super::system::{SimSystem, TickFrequency};
use crate::config::CareerConfig;
use crate::id::EventId;
use crate::model::{DAYS_PER_WEEK, DayResult, GameDate, GameState, WeekSimulation};

/// True on the last day of a week, when weekly systems run.
pub fn is_week_end(date: GameDate) -> bool {
    date.day() == DAYS_PER_WEEK - 1
}

/// Returns true if a system with the given frequency should fire on this day.
pub fn should_fire(freq: TickFrequency, date: GameDate) -> bool {
    match freq {
        TickFrequency::Daily => true,
        TickFrequency::Weekly => is_week_end(date),
    }
}

/// The RNG used to resolve one day.
///
/// Derived from the career seed and the date alone, so a day resolves the same
/// way whether it is reached by stepping, by fast-forward, or after restoring a
/// snapshot taken at any command boundary.
pub fn day_rng(seed: u64, date: GameDate) -> SmallRng {
    let mut z = seed ^ (date.as_u32() as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    SmallRng::seed_from_u64(z ^ (z >> 31))
}

/// Call each system whose frequency matches the day being resolved.
///
/// Signal delivery is **single-pass, non-cascading**:
///
/// 1. **Phase 1 (tick):** Each system's `tick()` runs in registration order.
///    All signals emitted during this phase are collected into a shared buffer.
/// 2. **Phase 2 (react):** If any signals were emitted, each system's
///    `handle_signals()` is called with the full signal buffer as `ctx.inbox`.
///    Signals pushed during this phase are discarded at the end of the cycle.
///
/// A reaction that needs to propagate further must leave it in state for a
/// later day's Phase 1 to pick up.
pub fn dispatch_systems(
    state: &mut GameState,
    config: &CareerConfig,
    systems: &mut [Box<dyn SimSystem>],
    rng: &mut dyn RngCore,
) {
    let date = state.date();

    // Phase 1: tick systems, collecting signals
    let mut signals = Vec::new();
    for system in systems.iter_mut() {
        if should_fire(system.frequency(), date) {
            let mut ctx = TickContext {
                state,
                config,
                rng,
                signals: &mut signals,
                inbox: &[],
            };
            system.tick(&mut ctx);
        }
    }

    // Phase 2: deliver signals for reaction (only if any were emitted)
    if !signals.is_empty() {
        for system in systems.iter_mut() {
            if should_fire(system.frequency(), date) {
                let mut new_signals = Vec::new();
                let mut ctx = TickContext {
                    state,
                    config,
                    rng,
                    signals: &mut new_signals,
                    inbox: &signals,
                };
                system.handle_signals(&mut ctx);
            }
        }
    }
}

/// Resolve the current day and move the week forward by one slot.
///
/// The day is marked `resolving` while systems run, then `resolved`. Messages
/// and narrative events created during the dispatch are attached to the day's
/// result. Resolving the seventh day finalizes the week and starts the next one
/// from the routine.
pub fn advance_day(
    state: &mut GameState,
    config: &CareerConfig,
    systems: &mut [Box<dyn SimSystem>],
) -> DayResult {
    let day = state.week.current_day;
    let date = state.date();
    let mark = state.id_gen.peek();

    state.week.resolving = Some(day);
    let mut rng = day_rng(state.seed, date);
    dispatch_systems(state, config, systems, &mut rng);
    state.week.resolving = None;
    state.week.current_day += 1;

    let messages: Vec<_> = state.inbox.iter().filter(|m| m.id.0 >= mark).map(|m| m.id).collect();
    let events: Vec<_> = state.narrative.events.range(EventId(mark)..).map(|(id, _)| *id).collect();

    if !state.week.results.iter().any(|r| r.date == date) {
        state.week.results.push(DayResult {
            date,
            activity: None,
            summary: "Nothing scheduled".to_string(),
            observations: Vec::new(),
            xp: Default::default(),
            messages: Vec::new(),
            events: Vec::new(),
            fatigue_delta: 0,
            degraded: None,
        });
    }
    let result = state
        .week
        .results
        .iter_mut()
        .rev()
        .find(|r| r.date == date)
        .map(|r| {
            r.messages.extend(messages);
            r.events.extend(events);
            r.clone()
        })
        .unwrap_or_else(|| panic!("day result for {date} missing right after resolution"));

    tracing::debug!(%date, activity = ?result.activity, "day resolved");

    if state.week.is_complete() {
        begin_next_week(state);
    }
    result
}

/// Resolve every remaining day of the current week with the same per-day
/// logic as [`advance_day`].
pub fn fast_forward_week(
    state: &mut GameState,
    config: &CareerConfig,
    systems: &mut [Box<dyn SimSystem>],
) -> Vec<DayResult> {
    let week = state.week.week;
    let mut results = Vec::new();
    while state.week.week == week {
        results.push(advance_day(state, config, systems));
    }
    results
}

/// Archive the finished week and open the next one from the routine.
pub fn begin_next_week(state: &mut GameState) {
    let finished = state.week.week;
    let next = finished + 1;
    if state.scout.travel.as_ref().is_some_and(|t| t.week <= finished) {
        state.scout.travel = None;
    }
    state.week = WeekSimulation::new(next, state.routine.clone(), state.week.consecutive_rest_days);
    tracing::debug!(week = next, "week started");
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use super::*;
    use crate::scenario::Scenario;
    use crate::sim::signal::{Signal, SignalKind};

    // -- Test helpers --

    struct CountingSystem {
        sys_name: String,
        freq: TickFrequency,
        count: Rc<Cell<u32>>,
    }

    impl CountingSystem {
        fn new(name: &str, freq: TickFrequency, count: Rc<Cell<u32>>) -> Self {
            Self {
                sys_name: name.to_string(),
                freq,
                count,
            }
        }
    }

    impl SimSystem for CountingSystem {
        fn name(&self) -> &str {
            &self.sys_name
        }
        fn frequency(&self) -> TickFrequency {
            self.freq
        }
        fn tick(&mut self, _ctx: &mut TickContext) {
            self.count.set(self.count.get() + 1);
        }
    }

    fn shortfall() -> SignalKind {
        SignalKind::BudgetShortfall {
            consecutive_weeks: 1,
            balance: -1,
        }
    }

    // -- should_fire tests --

    #[test]
    fn weekly_fires_only_on_last_day() {
        for day in 0..DAYS_PER_WEEK - 1 {
            assert!(!should_fire(TickFrequency::Weekly, GameDate::new(3, day)));
            assert!(should_fire(TickFrequency::Daily, GameDate::new(3, day)));
        }
        assert!(should_fire(TickFrequency::Weekly, GameDate::new(3, 6)));
    }

    #[test]
    fn day_rng_depends_on_seed_and_date() {
        use rand::Rng;
        let a: u64 = day_rng(1, GameDate::new(2, 3)).random();
        let b: u64 = day_rng(1, GameDate::new(2, 3)).random();
        let c: u64 = day_rng(1, GameDate::new(2, 4)).random();
        let d: u64 = day_rng(2, GameDate::new(2, 3)).random();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);
    }

    // -- advance tests --

    #[test]
    fn week_of_days_ticks_daily_seven_times_and_weekly_once() {
        let daily = Rc::new(Cell::new(0));
        let weekly = Rc::new(Cell::new(0));
        let mut systems: Vec<Box<dyn SimSystem>> = vec![
            Box::new(CountingSystem::new("daily", TickFrequency::Daily, daily.clone())),
            Box::new(CountingSystem::new("weekly", TickFrequency::Weekly, weekly.clone())),
        ];
        let (mut state, config) = Scenario::new().build_with_config();
        let results = fast_forward_week(&mut state, &config, &mut systems);
        assert_eq!(results.len(), 7);
        assert_eq!(daily.get(), 7);
        assert_eq!(weekly.get(), 1);
        assert_eq!(state.week.week, 2);
        assert_eq!(state.week.current_day, 0);
    }

    #[test]
    fn advance_marks_day_resolved_and_rolls_week() {
        let mut systems: Vec<Box<dyn SimSystem>> = vec![];
        let (mut state, config) = Scenario::new().build_with_config();
        let first = advance_day(&mut state, &config, &mut systems);
        assert_eq!(first.date, GameDate::new(1, 0));
        assert_eq!(state.week.current_day, 1);
        assert_eq!(state.week.resolving, None);
        for _ in 1..7 {
            advance_day(&mut state, &config, &mut systems);
        }
        assert_eq!(state.date(), GameDate::new(2, 0));
        assert!(state.week.results.is_empty());
    }

    #[test]
    fn systems_called_in_registration_order() {
        struct LoggingSystem {
            sys_name: String,
            log: Rc<RefCell<Vec<String>>>,
        }

        impl SimSystem for LoggingSystem {
            fn name(&self) -> &str {
                &self.sys_name
            }
            fn frequency(&self) -> TickFrequency {
                TickFrequency::Daily
            }
            fn tick(&mut self, _ctx: &mut TickContext) {
                self.log.borrow_mut().push(self.sys_name.clone());
            }
        }

        let log = Rc::new(RefCell::new(Vec::new()));
        let mut systems: Vec<Box<dyn SimSystem>> = vec![
            Box::new(LoggingSystem {
                sys_name: "A".to_string(),
                log: log.clone(),
            }),
            Box::new(LoggingSystem {
                sys_name: "B".to_string(),
                log: log.clone(),
            }),
        ];
        let (mut state, config) = Scenario::new().build_with_config();
        advance_day(&mut state, &config, &mut systems);
        advance_day(&mut state, &config, &mut systems);
        assert_eq!(*log.borrow(), vec!["A", "B", "A", "B"]);
    }

    // -- Signal bus tests --

    struct EmitterSystem {
        emitted: Rc<Cell<u32>>,
    }

    impl SimSystem for EmitterSystem {
        fn name(&self) -> &str {
            "emitter"
        }
        fn frequency(&self) -> TickFrequency {
            TickFrequency::Daily
        }
        fn tick(&mut self, ctx: &mut TickContext) {
            self.emitted.set(self.emitted.get() + 1);
            ctx.emit(shortfall());
        }
    }

    struct ReceiverSystem {
        received: Rc<Cell<u32>>,
        max_inbox_len: Rc<Cell<usize>>,
    }

    impl SimSystem for ReceiverSystem {
        fn name(&self) -> &str {
            "receiver"
        }
        fn frequency(&self) -> TickFrequency {
            TickFrequency::Daily
        }
        fn tick(&mut self, _ctx: &mut TickContext) {}
        fn handle_signals(&mut self, ctx: &mut TickContext) {
            self.max_inbox_len
                .set(self.max_inbox_len.get().max(ctx.inbox.len()));
            for signal in ctx.inbox {
                if let SignalKind::BudgetShortfall { .. } = signal.kind {
                    self.received.set(self.received.get() + 1);
                }
            }
            // Re-emitting in phase 2 must not loop back.
            let date = ctx.today();
            ctx.signals.push(Signal {
                date,
                kind: shortfall(),
            });
        }
    }

    #[test]
    fn signal_emitted_and_received_once_per_day() {
        let emitted = Rc::new(Cell::new(0));
        let received = Rc::new(Cell::new(0));
        let max_inbox_len = Rc::new(Cell::new(0));
        let mut systems: Vec<Box<dyn SimSystem>> = vec![
            Box::new(EmitterSystem {
                emitted: emitted.clone(),
            }),
            Box::new(ReceiverSystem {
                received: received.clone(),
                max_inbox_len: max_inbox_len.clone(),
            }),
        ];
        let (mut state, config) = Scenario::new().build_with_config();
        for _ in 0..3 {
            advance_day(&mut state, &config, &mut systems);
        }
        assert_eq!(emitted.get(), 3);
        assert_eq!(received.get(), 3);
        assert_eq!(max_inbox_len.get(), 1);
    }

    #[test]
    fn messages_created_during_dispatch_attach_to_day() {
        struct MailSystem;

        impl SimSystem for MailSystem {
            fn name(&self) -> &str {
                "mail"
            }
            fn frequency(&self) -> TickFrequency {
                TickFrequency::Daily
            }
            fn tick(&mut self, ctx: &mut TickContext) {
                ctx.state.send_message(
                    crate::model::MessageCategory::Career,
                    "Hello",
                    "A note from the office",
                );
            }
        }

        let mut systems: Vec<Box<dyn SimSystem>> = vec![Box::new(MailSystem)];
        let (mut state, config) = Scenario::new().build_with_config();
        let day = advance_day(&mut state, &config, &mut systems);
        assert_eq!(day.messages.len(), 1);
        assert_eq!(state.inbox[0].date, GameDate::new(1, 0));
    }
}

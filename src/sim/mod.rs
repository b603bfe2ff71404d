mod context;
mod runner;
mod system;

pub mod achievements;
pub mod finance;
pub mod helpers;
pub mod names;
pub mod narrative;
pub mod observation;
pub mod reports;
pub mod rivals;
pub mod scheduler;
pub mod signal;

pub use achievements::{AchievementStore, InMemoryAchievementStore, satisfied_achievements, sync_achievements};
pub use context::TickContext;
pub use finance::FinanceSystem;
pub use narrative::NarrativeSystem;
pub use reports::{ReportDraft, ReportSystem};
pub use rivals::{RivalSystem, shared_targets};
pub use runner::{advance_day, begin_next_week, day_rng, dispatch_systems, fast_forward_week, is_week_end, should_fire};
pub use scheduler::SchedulerSystem;
pub use signal::{Signal, SignalKind};
pub use system::{SimSystem, TickFrequency};

/// All systems in canonical tick order.
///
/// The scheduler resolves the day before anything reads it; finance closes
/// the week before reviews pay out into the next statement; narrative runs
/// last so it sees every other system's signals and end-of-week state.
pub fn default_systems() -> Vec<Box<dyn SimSystem>> {
    vec![
        Box::new(SchedulerSystem),
        Box::new(FinanceSystem),
        Box::new(ReportSystem),
        Box::new(RivalSystem),
        Box::new(NarrativeSystem),
    ]
}

//! The command surface a front end drives.
//!
//! [`Career`] owns the snapshot, the config and the system list. Every
//! mutation goes through one of its methods; each accepted command bumps
//! `GameState::version`, and a rejected one leaves the state untouched.

use std::io;

use crate::config::CareerConfig;
use crate::error::Rejection;
use crate::id::{ContractId, EventId, PlayerId, ReportId, StaffId};
use crate::model::{
    AchievementId, DayResult, GameState, LoanType, NarrativeEvent, Notification, PlannedActivity,
    SharedTarget, StaffRole,
};
use crate::sim::{self, AchievementStore, ReportDraft, SimSystem, default_systems};
use crate::worldgen;

pub struct Career {
    state: GameState,
    config: CareerConfig,
    systems: Vec<Box<dyn SimSystem>>,
}

impl Career {
    /// Start a new career in a freshly generated world.
    pub fn new(config: CareerConfig) -> Self {
        let state = worldgen::generate_career(&config);
        Self::from_snapshot(state, config)
    }

    /// Resume from a snapshot taken at any command boundary.
    pub fn from_snapshot(state: GameState, config: CareerConfig) -> Self {
        Self::with_systems(state, config, default_systems())
    }

    pub fn with_systems(state: GameState, config: CareerConfig, systems: Vec<Box<dyn SimSystem>>) -> Self {
        Self {
            state,
            config,
            systems,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &CareerConfig {
        &self.config
    }

    /// An owned copy for the persistence layer.
    pub fn snapshot(&self) -> GameState {
        self.state.clone()
    }

    /// Take every pending toast, oldest first.
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        self.state.notifications.drain(..).collect()
    }

    fn accept<T>(&mut self, command: &str, outcome: Result<T, Rejection>) -> Result<T, Rejection> {
        match &outcome {
            Ok(_) => self.state.version += 1,
            Err(err) => tracing::debug!(command, code = err.code(), %err, "command rejected"),
        }
        outcome
    }

    // -- Scheduler --

    pub fn advance_day(&mut self) -> DayResult {
        let result = sim::advance_day(&mut self.state, &self.config, &mut self.systems);
        self.state.version += 1;
        result
    }

    /// Resolve the rest of the current week, one day at a time. Each resolved
    /// day bumps the version exactly as [`advance_day`](Self::advance_day) does.
    pub fn fast_forward_week(&mut self) -> Vec<DayResult> {
        let results = sim::fast_forward_week(&mut self.state, &self.config, &mut self.systems);
        self.state.version += results.len() as u64;
        results
    }

    pub fn plan_day(&mut self, day: u8, activity: Option<PlannedActivity>) -> Result<(), Rejection> {
        let outcome = sim::scheduler::plan_day(&mut self.state, day, activity);
        self.accept("plan_day", outcome)
    }

    pub fn watch_player(&mut self, player: PlayerId) -> Result<(), Rejection> {
        let outcome = sim::rivals::watch_player(&mut self.state, player);
        self.accept("watch_player", outcome)
    }

    pub fn unwatch_player(&mut self, player: PlayerId) -> bool {
        let removed = sim::rivals::unwatch_player(&mut self.state, player);
        if removed {
            self.state.version += 1;
        }
        removed
    }

    // -- Reports --

    pub fn submit_report(&mut self, draft: ReportDraft) -> Result<ReportId, Rejection> {
        let outcome = sim::reports::submit_report(&mut self.state, &self.config, draft);
        self.accept("submit_report", outcome)
    }

    // -- Contracts --

    pub fn accept_retainer_contract(&mut self, id: ContractId) -> Result<(), Rejection> {
        let outcome = sim::finance::accept_retainer(&mut self.state, &self.config, id);
        self.accept("accept_retainer_contract", outcome)
    }

    pub fn decline_retainer_offer(&mut self, id: ContractId) -> Result<(), Rejection> {
        let outcome = sim::finance::decline_offer(&mut self.state, id, true);
        self.accept("decline_retainer_offer", outcome)
    }

    pub fn cancel_retainer_contract(&mut self, id: ContractId) -> Result<(), Rejection> {
        let outcome = sim::finance::cancel_retainer(&mut self.state, id);
        self.accept("cancel_retainer_contract", outcome)
    }

    pub fn accept_consulting_contract(&mut self, id: ContractId) -> Result<(), Rejection> {
        let outcome = sim::finance::accept_consulting(&mut self.state, id);
        self.accept("accept_consulting_contract", outcome)
    }

    pub fn decline_consulting_offer(&mut self, id: ContractId) -> Result<(), Rejection> {
        let outcome = sim::finance::decline_offer(&mut self.state, id, false);
        self.accept("decline_consulting_offer", outcome)
    }

    // -- Loans --

    pub fn take_loan(&mut self, loan_type: LoanType, amount: i64) -> Result<(), Rejection> {
        let outcome = sim::finance::take_loan(&mut self.state, &self.config, loan_type, amount);
        self.accept("take_loan", outcome)
    }

    /// Pay off the active loan early. Returns the amount paid.
    pub fn repay_loan(&mut self) -> Result<i64, Rejection> {
        let outcome = sim::finance::repay_loan(&mut self.state, &self.config);
        self.accept("repay_loan", outcome)
    }

    // -- Purchases --

    pub fn enroll_in_course(&mut self, course_id: &str) -> Result<(), Rejection> {
        let outcome = sim::finance::enroll_in_course(&mut self.state, &self.config, course_id);
        self.accept("enroll_in_course", outcome)
    }

    pub fn book_international_travel(&mut self, country: &str) -> Result<(), Rejection> {
        let outcome = sim::finance::book_travel(&mut self.state, &self.config, country);
        self.accept("book_international_travel", outcome)
    }

    pub fn purchase_equipment(&mut self, key: &str) -> Result<(), Rejection> {
        let outcome = sim::finance::purchase_equipment(&mut self.state, &self.config, key);
        self.accept("purchase_equipment", outcome)
    }

    pub fn hire_staff(&mut self, role: StaffRole) -> Result<StaffId, Rejection> {
        let outcome = sim::finance::hire_staff(&mut self.state, &self.config, role);
        self.accept("hire_staff", outcome)
    }

    // -- Narrative --

    pub fn acknowledge_event(&mut self, id: EventId) -> Result<(), Rejection> {
        let outcome = sim::narrative::acknowledge(&mut self.state, id);
        self.accept("acknowledge_event", outcome)
    }

    pub fn resolve_event_choice(&mut self, id: EventId, choice: usize) -> Result<(), Rejection> {
        let outcome = sim::narrative::resolve_choice(&mut self.state, &self.config, id, choice);
        self.accept("resolve_event_choice", outcome)
    }

    // -- Reads --

    pub fn open_events(&self) -> Vec<&NarrativeEvent> {
        self.state.narrative.open_events().collect()
    }

    pub fn shared_targets(&self) -> Vec<SharedTarget> {
        sim::shared_targets(&self.state)
    }

    /// Persist newly satisfied achievements through `store`.
    pub fn sync_achievements(&self, store: &mut dyn AchievementStore) -> io::Result<Vec<AchievementId>> {
        sim::sync_achievements(&self.state, store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ActivityKind, Conviction};
    use crate::scenario::Scenario;

    #[test]
    fn accepted_commands_bump_version() {
        let mut scenario = Scenario::new();
        let player = scenario.player("Target").id();
        let mut career = scenario.into_career();
        assert_eq!(career.state().version, 0);

        career.watch_player(player).unwrap();
        assert_eq!(career.state().version, 1);

        let before = career.snapshot();
        let err = career.submit_report(ReportDraft::new(player, Conviction::Note)).unwrap_err();
        assert_eq!(err.code(), "no_observations");
        assert_eq!(career.snapshot(), before);

        career.advance_day();
        assert_eq!(career.state().version, 2);

        // Six days remain in the week.
        career.fast_forward_week();
        assert_eq!(career.state().version, 8);
    }

    #[test]
    fn notifications_drain_once() {
        let mut career = Scenario::new().into_career();
        career
            .plan_day(0, Some(PlannedActivity::new(ActivityKind::Networking)))
            .unwrap();
        career.fast_forward_week();
        let _ = career.drain_notifications();
        assert!(career.drain_notifications().is_empty());
    }

    #[test]
    fn new_career_is_populated() {
        let career = Career::new(CareerConfig::default());
        assert!(!career.state().players.is_empty());
        assert!(!career.state().rivals.is_empty());
        assert!(career.open_events().is_empty());
    }
}

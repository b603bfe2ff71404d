//! Daily resolution of the planned week.
//!
//! One day per tick: rest days recover fatigue, activity days observe players,
//! cost fatigue and travel, and bank XP. Anything that stops an activity from
//! producing observations degrades the day instead of failing it.

use std::collections::BTreeMap;

use rand::RngCore;
use rand::seq::IndexedRandom;

use super::context::TickContext;
use super::finance::generate_offer;
use super::helpers::{equipment_bonus, money, roll, staff_count};
use super::observation::{Observer, effective_quality, observe_player, sampled_attributes};
use super::signal::SignalKind;
use super::system::{SimSystem, TickFrequency};
use crate::config::{ActivityProfile, CareerConfig};
use crate::error::Rejection;
use crate::id::{ObservationId, PlayerId};
use crate::model::{
    ActivityKind, AttributeReading, DAYS_PER_WEEK, DayResult, DegradedReason, Discipline,
    ExpenseCategory, GameDate, GameState, MessageCategory, PlannedActivity, StaffRole,
};

/// Training days with no discipline chosen train this one.
const DEFAULT_TRAINING: Discipline = Discipline::Technical;

pub struct SchedulerSystem;

impl SimSystem for SchedulerSystem {
    fn name(&self) -> &str {
        "scheduler"
    }

    fn frequency(&self) -> TickFrequency {
        TickFrequency::Daily
    }

    fn tick(&mut self, ctx: &mut TickContext) {
        let date = ctx.today();
        let planned = ctx.state.week.plan.get(date.day()).cloned();
        let result = match planned {
            None => rest_day(ctx.state, ctx.config, date),
            Some(activity) => activity_day(ctx, date, activity),
        };
        ctx.state.week.results.push(result);
    }
}

// ---------------------------------------------------------------------------
// Rest
// ---------------------------------------------------------------------------

/// Fatigue recovered on the `nth` consecutive rest day (1-based).
pub fn rest_recovery(config: &CareerConfig, nth: u8) -> i16 {
    let cfg = &config.fatigue;
    let factor = cfg.rest_diminishing.clamp(0.0, 1.0).powi(nth.saturating_sub(1) as i32);
    money(cfg.rest_recovery as f64 * factor) as i16
}

fn rest_day(state: &mut GameState, config: &CareerConfig, date: GameDate) -> DayResult {
    state.week.consecutive_rest_days = state.week.consecutive_rest_days.saturating_add(1);
    let recovery = rest_recovery(config, state.week.consecutive_rest_days);
    let fatigue_delta = state.scout.adjust_fatigue(-recovery);
    DayResult {
        date,
        activity: None,
        summary: if fatigue_delta < 0 {
            format!("Rest day, recovered {} fatigue", -fatigue_delta)
        } else {
            "Rest day".to_string()
        },
        observations: Vec::new(),
        xp: BTreeMap::new(),
        messages: Vec::new(),
        events: Vec::new(),
        fatigue_delta,
        degraded: None,
    }
}

// ---------------------------------------------------------------------------
// Activities
// ---------------------------------------------------------------------------

fn activity_day(ctx: &mut TickContext, date: GameDate, activity: PlannedActivity) -> DayResult {
    let config = ctx.config;
    let profile = config.activity(activity.kind);
    ctx.state.week.consecutive_rest_days = 0;

    let mut degraded = None;
    let mut trip_country = None;
    if profile.requires_booking {
        match &ctx.state.scout.travel {
            Some(booking) if booking.week == date.week() => trip_country = Some(booking.country.clone()),
            _ => degraded = Some(DegradedReason::NoTravelBooking),
        }
    }

    let mut observations = Vec::new();
    if profile.observes_players() && degraded.is_none() {
        let outcome = scout_players(ctx, profile, &activity, trip_country.as_deref());
        observations = outcome.observations;
        degraded = outcome.degraded;
    }

    let fatigue_before = ctx.state.scout.fatigue;
    let fatigue_delta = ctx.state.scout.adjust_fatigue(profile.fatigue_cost);
    if profile.travel_cost > 0 {
        ctx.state.finances.charge(ExpenseCategory::Travel, profile.travel_cost);
    }

    let mut xp = BTreeMap::new();
    if degraded.is_none() || !observations.is_empty() {
        xp = profile.xp.clone();
        if profile.training_xp > 0 {
            let discipline = activity.training.unwrap_or(DEFAULT_TRAINING);
            *xp.entry(discipline).or_insert(0) += profile.training_xp;
        }
        grant_xp(ctx, &xp);
    }

    if activity.kind == ActivityKind::Networking {
        ctx.state
            .scout
            .adjust_reputation(config.progression.networking_reputation);
    }
    if roll(ctx.rng, profile.offer_chance) {
        let contract_id = generate_offer(ctx.state, config, ctx.rng);
        let client = ctx.state.finances.contracts[&contract_id].client.clone();
        ctx.emit(SignalKind::OfferReceived { contract_id, client });
    }

    let threshold = config.fatigue.exhaustion_threshold;
    if fatigue_before < threshold && ctx.state.scout.fatigue >= threshold {
        let fatigue = ctx.state.scout.fatigue;
        tracing::info!(%date, fatigue, "scout exhausted");
        ctx.emit(SignalKind::FatigueExhausted { fatigue });
    }
    if let Some(country) = &trip_country {
        ctx.state
            .scout
            .raise_familiarity(country, config.travel.familiarity_per_trip_day);
    }

    if let Some(reason) = &degraded {
        tracing::info!(%date, activity = %activity.kind, reason = ?reason, "activity degraded");
    }

    DayResult {
        date,
        activity: Some(activity.kind),
        summary: summarize(activity.kind, observations.len(), degraded.as_ref()),
        observations,
        xp,
        messages: Vec::new(),
        events: Vec::new(),
        fatigue_delta,
        degraded,
    }
}

struct ScoutingOutcome {
    observations: Vec<ObservationId>,
    degraded: Option<DegradedReason>,
}

fn scout_players(
    ctx: &mut TickContext,
    profile: &ActivityProfile,
    activity: &PlannedActivity,
    trip_country: Option<&str>,
) -> ScoutingOutcome {
    let config = ctx.config;
    let date = ctx.today();
    let state = &*ctx.state;

    let mut degraded = None;
    let targets: Vec<PlayerId> = if activity.focus.is_empty() {
        let pool = candidates(state, activity.kind, trip_country, &[]);
        pick(&pool, config.observation.auto_targets, ctx.rng)
    } else {
        let (available, gone): (Vec<PlayerId>, Vec<PlayerId>) = activity
            .focus
            .iter()
            .copied()
            .partition(|p| state.players.get(p).is_some_and(|p| p.is_available()));
        if available.is_empty() {
            degraded = Some(DegradedReason::TargetsUnavailable { players: gone });
        } else if !gone.is_empty() {
            tracing::debug!(%date, skipped = gone.len(), "some focused players no longer available");
        }
        available
    };
    if targets.is_empty() {
        return ScoutingOutcome {
            observations: Vec::new(),
            degraded: degraded.or(Some(DegradedReason::NoTargets)),
        };
    }

    let bonus = equipment_bonus(state, config);
    let mut gathered: Vec<(PlayerId, Vec<AttributeReading>)> = Vec::new();
    for id in &targets {
        let player = state.player(*id);
        let familiarity = state.scout.familiarity(trip_country.unwrap_or(&player.country));
        let observer = Observer {
            scout: &state.scout,
            skill_gap: 0,
            quality: effective_quality(config, profile, bonus, familiarity),
        };
        let attributes = sampled_attributes(profile, ctx.rng);
        let known = state.perceived_profile(*id);
        gathered.push((*id, observe_player(config, observer, player, &attributes, &known, ctx.rng)));
    }

    let assistants = staff_count(state, StaffRole::Assistant);
    if assistants > 0 {
        let pool = candidates(state, activity.kind, trip_country, &targets);
        for id in pick(&pool, assistants, ctx.rng) {
            let player = state.player(id);
            let familiarity = state.scout.familiarity(trip_country.unwrap_or(&player.country));
            let observer = Observer {
                scout: &state.scout,
                skill_gap: config.observation.assistant_skill_gap,
                quality: effective_quality(config, profile, bonus, familiarity)
                    * config.observation.assistant_quality_factor,
            };
            let attributes = sampled_attributes(profile, ctx.rng);
            let known = state.perceived_profile(id);
            gathered.push((id, observe_player(config, observer, player, &attributes, &known, ctx.rng)));
        }
    }

    let observations = gathered
        .into_iter()
        .filter(|(_, readings)| !readings.is_empty())
        .map(|(player, readings)| ctx.state.record_observation(player, date, activity.kind, readings))
        .collect();
    ScoutingOutcome { observations, degraded }
}

/// Available players an activity can stumble on, minus `exclude`.
fn candidates(state: &GameState, kind: ActivityKind, country: Option<&str>, exclude: &[PlayerId]) -> Vec<PlayerId> {
    state
        .players
        .values()
        .filter(|p| p.is_available() && !exclude.contains(&p.id))
        .filter(|p| kind != ActivityKind::YouthTournament || p.is_youth())
        .filter(|p| country.is_none_or(|c| p.country == c))
        .map(|p| p.id)
        .collect()
}

fn pick(pool: &[PlayerId], n: usize, rng: &mut dyn RngCore) -> Vec<PlayerId> {
    let mut picked: Vec<PlayerId> = pool.choose_multiple(&mut *rng, n).copied().collect();
    picked.sort();
    picked
}

fn grant_xp(ctx: &mut TickContext, xp: &BTreeMap<Discipline, u32>) {
    let per_level = ctx.config.progression.xp_per_level;
    for (discipline, amount) in xp {
        if let Some(level) = ctx.state.scout.grant_xp(*discipline, *amount, per_level) {
            ctx.state.send_message(
                MessageCategory::Career,
                "Skill improved",
                format!("Your {discipline} skill reached level {level}."),
            );
            tracing::info!(discipline = %discipline, level, "skill levelled");
            ctx.emit(SignalKind::SkillLevelled {
                discipline: *discipline,
                level,
            });
        }
    }
}

fn summarize(kind: ActivityKind, observed: usize, degraded: Option<&DegradedReason>) -> String {
    match degraded {
        Some(DegradedReason::NoTravelBooking) => format!("{kind}: no travel booked, nothing observed"),
        Some(DegradedReason::NoTargets) => format!("{kind}: nobody available to watch"),
        Some(DegradedReason::TargetsUnavailable { players }) => {
            format!("{kind}: {} planned target(s) no longer available", players.len())
        }
        None if observed > 0 => format!("{kind}: observed {observed} player(s)"),
        None => kind.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Planning
// ---------------------------------------------------------------------------

/// Put an activity (or a rest day, with `None`) into a day slot.
///
/// Edits the standing routine and the current week. Days already resolved
/// this week are rejected.
pub fn plan_day(state: &mut GameState, day: u8, activity: Option<PlannedActivity>) -> Result<(), Rejection> {
    if day >= DAYS_PER_WEEK {
        return Err(Rejection::InvalidSlot(day));
    }
    if day < state.week.current_day {
        return Err(Rejection::DayAlreadyResolved(day));
    }
    if let Some(planned) = &activity {
        for id in &planned.focus {
            let player = state.players.get(id).ok_or(Rejection::UnknownPlayer(*id))?;
            if !player.is_available() {
                return Err(Rejection::PlayerUnavailable(*id));
            }
        }
    }
    state.routine.set(day, activity.clone());
    state.week.plan.set(day, activity);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Availability;
    use crate::scenario::Scenario;
    use crate::testutil::tick_system_on_day;

    fn match_day(player: PlayerId) -> Option<PlannedActivity> {
        Some(PlannedActivity::new(ActivityKind::AttendMatch).focusing(player))
    }

    #[test]
    fn rest_recovery_diminishes() {
        let config = CareerConfig::default();
        let first = rest_recovery(&config, 1);
        let second = rest_recovery(&config, 2);
        let third = rest_recovery(&config, 3);
        assert_eq!(first, 18);
        assert!(second < first && third < second);
        assert!(third > 0);
    }

    #[test]
    fn match_day_observes_focus_player() {
        let mut scenario = Scenario::new();
        let player = scenario.player("Striker").id();
        let (mut state, config) = scenario.build_with_config();
        plan_day(&mut state, 0, match_day(player)).unwrap();

        tick_system_on_day(&mut state, &config, &mut SchedulerSystem, 0, 7);
        let result = &state.week.results[0];
        assert_eq!(result.activity, Some(ActivityKind::AttendMatch));
        assert_eq!(result.observations.len(), 1);
        assert!(result.degraded.is_none());
        assert_eq!(result.fatigue_delta, 12);
        assert_eq!(state.scout.fatigue, 12);
        assert!(!state.perceived_profile(player).is_empty());
        assert_eq!(state.finances.paid_this_week[&ExpenseCategory::Travel], 40);
    }

    #[test]
    fn signed_target_degrades_but_still_costs() {
        let mut scenario = Scenario::new();
        let player = scenario.player("Gone").id();
        let rival = scenario.rival("Rival").id();
        let (mut state, config) = scenario.build_with_config();
        plan_day(&mut state, 0, match_day(player)).unwrap();
        state.player_mut(player).availability = Availability::Signed {
            rival,
            date: GameDate::new(1, 0),
        };

        tick_system_on_day(&mut state, &config, &mut SchedulerSystem, 0, 3);
        let result = &state.week.results[0];
        assert!(result.observations.is_empty());
        assert_eq!(
            result.degraded,
            Some(DegradedReason::TargetsUnavailable { players: vec![player] })
        );
        assert_eq!(state.scout.fatigue, 12);
        assert!(result.xp.is_empty());
    }

    #[test]
    fn trip_without_booking_degrades() {
        let mut scenario = Scenario::new();
        scenario.player("Anyone");
        let (mut state, config) = scenario.build_with_config();
        plan_day(&mut state, 0, Some(PlannedActivity::new(ActivityKind::InternationalTrip))).unwrap();
        tick_system_on_day(&mut state, &config, &mut SchedulerSystem, 0, 1);
        assert_eq!(state.week.results[0].degraded, Some(DegradedReason::NoTravelBooking));
        assert_eq!(state.scout.fatigue, 18);
    }

    #[test]
    fn crossing_exhaustion_emits_once() {
        let mut scenario = Scenario::new();
        scenario.player("Anyone");
        let (mut state, config) = scenario.build_with_config();
        state.scout.fatigue = 80;
        plan_day(&mut state, 0, Some(PlannedActivity::new(ActivityKind::ReportWriting))).unwrap();
        plan_day(&mut state, 1, Some(PlannedActivity::new(ActivityKind::ReportWriting))).unwrap();

        let first = tick_system_on_day(&mut state, &config, &mut SchedulerSystem, 0, 1);
        assert!(first
            .iter()
            .any(|s| matches!(s.kind, SignalKind::FatigueExhausted { fatigue: 85 })));
        let second = tick_system_on_day(&mut state, &config, &mut SchedulerSystem, 1, 1);
        assert!(!second
            .iter()
            .any(|s| matches!(s.kind, SignalKind::FatigueExhausted { .. })));
    }

    #[test]
    fn training_grants_chosen_discipline() {
        let (mut state, config) = Scenario::new().build_with_config();
        plan_day(
            &mut state,
            0,
            Some(PlannedActivity::new(ActivityKind::SkillTraining).training(Discipline::Mental)),
        )
        .unwrap();
        tick_system_on_day(&mut state, &config, &mut SchedulerSystem, 0, 1);
        assert_eq!(state.week.results[0].xp[&Discipline::Mental], 24);
        assert_eq!(state.scout.skills[&Discipline::Mental].xp, 24);
    }

    #[test]
    fn plan_day_rejections() {
        let mut scenario = Scenario::new();
        let player = scenario.player("Signed").id();
        let rival = scenario.rival("Rival").id();
        let mut state = scenario.build();
        assert_eq!(plan_day(&mut state, 7, None).unwrap_err(), Rejection::InvalidSlot(7));
        assert_eq!(
            plan_day(&mut state, 0, match_day(PlayerId(999))).unwrap_err(),
            Rejection::UnknownPlayer(PlayerId(999))
        );
        state.player_mut(player).availability = Availability::Signed {
            rival,
            date: GameDate::new(1, 0),
        };
        assert_eq!(
            plan_day(&mut state, 0, match_day(player)).unwrap_err(),
            Rejection::PlayerUnavailable(player)
        );
        state.week.current_day = 3;
        assert_eq!(plan_day(&mut state, 2, None).unwrap_err(), Rejection::DayAlreadyResolved(2));
    }

    #[test]
    fn plan_day_updates_routine_and_week() {
        let mut state = Scenario::new().build();
        let activity = Some(PlannedActivity::new(ActivityKind::Networking));
        plan_day(&mut state, 4, activity.clone()).unwrap();
        assert_eq!(state.routine.days[4], activity);
        assert_eq!(state.week.plan.days[4], activity);
    }
}

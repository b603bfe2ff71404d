//! Report submission and the delayed review that judges it.

use super::context::TickContext;
use super::finance::record_delivery;
use super::helpers::{money, staff_count};
use super::signal::SignalKind;
use super::system::{SimSystem, TickFrequency};
use crate::config::CareerConfig;
use crate::error::Rejection;
use crate::id::{PlayerId, ReportId};
use crate::model::{
    AttributeScale, Conviction, Discipline, GameState, IncomeSource, MessageCategory,
    PerceivedProfile, Player, Report, ReportReview, SellOnClause, StaffRole, Verdict,
};

/// What the scout puts their name to.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportDraft {
    pub player: PlayerId,
    pub conviction: Conviction,
    pub summary: String,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
}

impl ReportDraft {
    pub fn new(player: PlayerId, conviction: Conviction) -> Self {
        Self {
            player,
            conviction,
            summary: String::new(),
            strengths: Vec::new(),
            weaknesses: Vec::new(),
        }
    }
}

/// Price a report fetches: coverage of the readings, analysis skill and
/// analysts on staff all push it up.
pub fn sale_value(state: &GameState, config: &CareerConfig, profile: &PerceivedProfile) -> i64 {
    let cfg = &config.reports;
    let analysis = state.scout.skill(Discipline::Analysis) as f64 / config.observation.max_skill.max(1) as f64;
    let analysts = staff_count(state, StaffRole::Analyst) as f64;
    money(
        cfg.base_price as f64
            * (0.4 + 0.6 * profile.coverage())
            * (0.75 + 0.5 * analysis.clamp(0.0, 1.0))
            * (1.0 + cfg.analyst_price_bonus * analysts),
    )
}

/// File a report on a player the scout has observed.
///
/// The merged readings are frozen into the report; attributes never read stay
/// absent. The sale is paid with the week's income and the report counts
/// toward live contracts straight away. A second report on the same player
/// needs at least one observation taken after the previous one.
pub fn submit_report(state: &mut GameState, config: &CareerConfig, draft: ReportDraft) -> Result<ReportId, Rejection> {
    if !state.players.contains_key(&draft.player) {
        return Err(Rejection::UnknownPlayer(draft.player));
    }
    let profile = state.perceived_profile(draft.player);
    let latest_observation = state
        .observations
        .values()
        .filter(|o| o.player_id == draft.player)
        .map(|o| o.id)
        .max();
    let Some(latest_observation) = latest_observation.filter(|_| !profile.is_empty()) else {
        return Err(Rejection::NoObservations(draft.player));
    };
    let already_reported = state
        .reports
        .values()
        .any(|r| r.player_id == draft.player && r.latest_observation >= latest_observation);
    if already_reported {
        return Err(Rejection::NoNewObservations(draft.player));
    }

    let value = sale_value(state, config, &profile);
    let id: ReportId = state.id_gen.mint();
    let report = Report {
        id,
        player_id: draft.player,
        submitted: state.date(),
        conviction: draft.conviction,
        summary: draft.summary,
        strengths: draft.strengths,
        weaknesses: draft.weaknesses,
        readings: profile.readings().clone(),
        latest_observation,
        sale_value: value,
    };
    state.reports.insert(id, report);
    state.finances.accrue(IncomeSource::ReportSales, value);
    state.milestones.reports_submitted += 1;
    record_delivery(state, draft.player);

    tracing::info!(report = %id, player = %draft.player, conviction = %draft.conviction, value, "report submitted");
    Ok(id)
}

/// How closely a report's readings match the truth: 1 minus the mean absolute
/// error over the attributes it reads, as a share of the scale span.
pub fn report_accuracy(report: &Report, player: &Player, scale: &AttributeScale) -> f64 {
    let errors: Vec<f64> = report
        .readings
        .values()
        .filter_map(|r| {
            player
                .true_value(r.attribute)
                .map(|truth| (r.perceived_value - truth).abs() as f64)
        })
        .collect();
    if errors.is_empty() {
        return 0.0;
    }
    let mean = errors.iter().sum::<f64>() / errors.len() as f64;
    (1.0 - mean / scale.span()).clamp(0.0, 1.0)
}

/// Reputation change for a reviewed report. Sign follows accuracy against the
/// threshold; size scales with conviction.
pub fn reputation_delta(config: &CareerConfig, accuracy: f64, conviction: Conviction) -> f64 {
    let cfg = &config.reports;
    (accuracy - cfg.accuracy_threshold) * cfg.reputation_scale * cfg.weight(conviction)
}

pub struct ReportSystem;

impl SimSystem for ReportSystem {
    fn name(&self) -> &str {
        "reports"
    }

    fn frequency(&self) -> TickFrequency {
        TickFrequency::Weekly
    }

    fn tick(&mut self, ctx: &mut TickContext) {
        let week = ctx.state.week.week;
        let delay = ctx.config.reports.review_delay_weeks;
        let due: Vec<ReportId> = ctx
            .state
            .reports
            .values()
            .filter(|r| !ctx.state.report_reviews.contains_key(&r.id))
            .filter(|r| r.submitted.week() + delay <= week)
            .map(|r| r.id)
            .collect();
        for id in due {
            review(ctx, id);
        }
    }
}

fn review(ctx: &mut TickContext, id: ReportId) {
    let config = ctx.config;
    let today = ctx.today();
    let state = &mut *ctx.state;
    let report = &state.reports[&id];
    let player = state.player(report.player_id);
    let (player_id, conviction) = (report.player_id, report.conviction);

    let accuracy = report_accuracy(report, player, &config.attribute_scale);
    let verdict = if accuracy >= config.reports.accuracy_threshold {
        Verdict::Vindicated
    } else {
        Verdict::ProvenWrong
    };
    let delta = reputation_delta(config, accuracy, conviction);
    let true_ability = player.true_ability(&config.attribute_scale);
    let name = player.name.clone();

    state.scout.adjust_reputation(delta);
    state.report_reviews.insert(
        id,
        ReportReview {
            report_id: id,
            reviewed: today,
            accuracy,
            verdict,
            reputation_delta: delta,
        },
    );

    if verdict == Verdict::Vindicated && conviction.is_recommendation() {
        state.finances.accrue(IncomeSource::PlacementFees, config.reports.placement_fee);
        state.finances.sell_on_clauses.push(SellOnClause {
            player_id,
            percentage: config.finance.sell_on_percentage,
            reference_fee: money(config.reports.sell_on_reference_fee as f64 * true_ability),
        });
        state.milestones.placements += 1;
        if conviction == Conviction::TablePound {
            state.milestones.vindicated_table_pounds += 1;
        }
    }

    let body = match verdict {
        Verdict::Vindicated => format!("Your {conviction} report on {name} has been borne out."),
        Verdict::ProvenWrong => format!("Your {conviction} report on {name} missed the mark."),
    };
    state.send_message(MessageCategory::Scouting, "Report reviewed", body);
    tracing::info!(report = %id, accuracy, verdict = ?verdict, delta, "report reviewed");

    ctx.emit(SignalKind::ReportReviewed {
        report_id: id,
        player_id,
        conviction,
        verdict,
        reputation_delta: delta,
    });
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::id::ObservationId;
    use crate::model::{ActivityKind, AttributeId, AttributeReading, GameDate};
    use crate::scenario::Scenario;
    use crate::testutil::{assert_approx, tick_system_at_week_end};

    fn reading(attribute: AttributeId, value: i32) -> AttributeReading {
        AttributeReading {
            attribute,
            perceived_value: value,
            confidence: 0.6,
        }
    }

    #[test]
    fn unobserved_player_cannot_be_reported() {
        let mut scenario = Scenario::new();
        let player = scenario.player("Unseen").id();
        let (mut state, config) = scenario.build_with_config();
        let err = submit_report(&mut state, &config, ReportDraft::new(player, Conviction::Note)).unwrap_err();
        assert_eq!(err, Rejection::NoObservations(player));
        assert!(state.reports.is_empty());
    }

    #[test]
    fn report_freezes_known_readings_only() {
        let mut scenario = Scenario::new();
        let player = scenario.player("Seen").id();
        let (mut state, config) = scenario.build_with_config();
        state.record_observation(
            player,
            GameDate::new(1, 0),
            ActivityKind::AttendMatch,
            vec![reading(AttributeId::Pace, 12)],
        );
        let id = submit_report(&mut state, &config, ReportDraft::new(player, Conviction::Recommend)).unwrap();
        let report = &state.reports[&id];
        assert_eq!(report.readings.len(), 1);
        assert!(!report.readings.contains_key(&AttributeId::Marking));
        assert_eq!(state.finances.pending_income[&IncomeSource::ReportSales], report.sale_value);
        assert_eq!(state.milestones.reports_submitted, 1);
    }

    #[test]
    fn repeat_report_needs_a_fresh_observation() {
        let mut scenario = Scenario::new();
        let player = scenario.player("Seen").id();
        let (mut state, config) = scenario.build_with_config();
        let observe = |state: &mut GameState, day| {
            state.record_observation(
                player,
                GameDate::new(1, day),
                ActivityKind::AttendMatch,
                vec![reading(AttributeId::Pace, 12)],
            );
        };
        observe(&mut state, 0);
        submit_report(&mut state, &config, ReportDraft::new(player, Conviction::TablePound)).unwrap();
        let pending = state.finances.pending_income[&IncomeSource::ReportSales];

        for _ in 0..3 {
            let err = submit_report(&mut state, &config, ReportDraft::new(player, Conviction::TablePound)).unwrap_err();
            assert_eq!(err, Rejection::NoNewObservations(player));
        }
        assert_eq!(state.reports.len(), 1);
        assert_eq!(state.finances.pending_income[&IncomeSource::ReportSales], pending);
        assert_eq!(state.milestones.reports_submitted, 1);

        observe(&mut state, 1);
        submit_report(&mut state, &config, ReportDraft::new(player, Conviction::Note)).unwrap();
        assert_eq!(state.reports.len(), 2);
    }

    #[test]
    fn coverage_raises_price() {
        let mut scenario = Scenario::new();
        let player = scenario.player("Seen").id();
        let (mut state, config) = scenario.build_with_config();
        state.record_observation(player, GameDate::new(1, 0), ActivityKind::AttendMatch, vec![reading(AttributeId::Pace, 10)]);
        let thin = sale_value(&state, &config, &state.perceived_profile(player));
        let all = AttributeId::ALL.iter().map(|a| reading(*a, 10)).collect();
        state.record_observation(player, GameDate::new(1, 1), ActivityKind::AttendMatch, all);
        let full = sale_value(&state, &config, &state.perceived_profile(player));
        assert!(full > thin);
    }

    #[test]
    fn accuracy_ignores_unread_attributes() {
        let mut scenario = Scenario::new();
        let player = scenario.player("Exact").id();
        let state = scenario.build();
        let report = Report {
            id: ReportId(1),
            player_id: player,
            submitted: GameDate::new(1, 0),
            conviction: Conviction::Note,
            summary: String::new(),
            strengths: Vec::new(),
            weaknesses: Vec::new(),
            readings: BTreeMap::from([(AttributeId::Pace, reading(AttributeId::Pace, 10))]),
            latest_observation: ObservationId(1),
            sale_value: 0,
        };
        // Scenario players have every attribute at 10.
        let accuracy = report_accuracy(&report, state.player(player), &AttributeScale::default());
        assert_eq!(accuracy, 1.0);
    }

    #[test]
    fn higher_conviction_costs_more_when_wrong() {
        let config = CareerConfig::default();
        let note = reputation_delta(&config, 0.5, Conviction::Note);
        let pound = reputation_delta(&config, 0.5, Conviction::TablePound);
        assert!(note < 0.0 && pound < note);
        assert_approx(note, (0.5 - 0.85) * 40.0 * config.reports.weight(Conviction::Note), 1e-9);
        let right = reputation_delta(&config, 0.95, Conviction::TablePound);
        assert!(right > 0.0);
    }

    #[test]
    fn review_fires_after_delay_and_pays_placement() {
        let mut scenario = Scenario::new();
        let player = scenario.player("Gem").id();
        let (mut state, config) = scenario.build_with_config();
        let exact = AttributeId::ALL.iter().map(|a| reading(*a, 10)).collect();
        state.record_observation(player, GameDate::new(1, 0), ActivityKind::AttendMatch, exact);
        let id = submit_report(&mut state, &config, ReportDraft::new(player, Conviction::TablePound)).unwrap();

        state.week.week = 4;
        let signals = tick_system_at_week_end(&mut state, &config, &mut ReportSystem, 4);
        assert!(signals.is_empty());
        assert!(!state.report_reviews.contains_key(&id));

        state.week.week = 5;
        let rep_before = state.scout.reputation;
        let signals = tick_system_at_week_end(&mut state, &config, &mut ReportSystem, 5);
        assert_eq!(signals.len(), 1);
        let review = &state.report_reviews[&id];
        assert_eq!(review.verdict, Verdict::Vindicated);
        assert!(state.scout.reputation > rep_before);
        assert_eq!(state.finances.pending_income[&IncomeSource::PlacementFees], config.reports.placement_fee);
        assert_eq!(state.finances.sell_on_clauses.len(), 1);
        assert_eq!(state.milestones.vindicated_table_pounds, 1);

        // Reviewed once only.
        let again = tick_system_at_week_end(&mut state, &config, &mut ReportSystem, 6);
        assert!(again.is_empty());
    }
}

//! Rival scouts working the same player pool.
//!
//! Each week an active rival keeps working its target, may be lured to a
//! clearly better one, and signs the target once its progress reaches the
//! completion threshold and its club commits. Progress on a dropped target is
//! kept, so a rival that comes back resumes where it stopped.

use std::collections::BTreeSet;

use rand::Rng;
use rand::RngCore;

use super::context::TickContext;
use super::helpers::roll;
use super::signal::SignalKind;
use super::system::{SimSystem, TickFrequency};
use crate::config::CareerConfig;
use crate::error::Rejection;
use crate::id::{PlayerId, RivalId};
use crate::model::{
    Availability, GameState, MessageCategory, Player, RivalActivityKind, RivalPersonality,
    RivalScout, SharedTarget,
};

/// Youth bonus on an aggressive rival's buzz weighting.
const YOUTH_APPEAL: f64 = 1.5;

pub struct RivalSystem;

impl SimSystem for RivalSystem {
    fn name(&self) -> &str {
        "rivals"
    }

    fn frequency(&self) -> TickFrequency {
        TickFrequency::Weekly
    }

    fn tick(&mut self, ctx: &mut TickContext) {
        let ids: Vec<RivalId> = ctx.state.rivals.keys().copied().collect();
        for id in ids {
            advance_rival(ctx, id);
        }
        warn_closing_in(ctx);
    }
}

// ---------------------------------------------------------------------------
// Target selection
// ---------------------------------------------------------------------------

/// How attractive `player` is to `rival` this week.
pub fn target_score(config: &CareerConfig, rival: &RivalScout, player: &Player, rng: &mut dyn RngCore) -> f64 {
    let cfg = &config.rivals;
    let progress = rival.progress_on(player.id) as f64 / cfg.completion_threshold.max(1) as f64;
    let youth = if player.is_youth() { YOUTH_APPEAL } else { 1.0 };
    let appeal = match rival.personality {
        RivalPersonality::Aggressive => player.buzz * youth,
        RivalPersonality::Methodical => progress + 0.5 * player.buzz,
        RivalPersonality::Balanced => 0.5 * player.buzz * youth + 0.5 * progress,
    };
    let judgement = rival.quality * player.true_ability(&config.attribute_scale);
    let jitter = if cfg.selection_jitter > 0.0 {
        rng.random_range(0.0..cfg.selection_jitter)
    } else {
        0.0
    };
    appeal + judgement + jitter
}

/// Best affordable available player, skipping `exclude`.
fn best_target(
    state: &GameState,
    config: &CareerConfig,
    rival: &RivalScout,
    exclude: Option<PlayerId>,
    rng: &mut dyn RngCore,
) -> Option<(PlayerId, f64)> {
    let ceiling = config.rivals.ceiling(rival.budget);
    let mut best: Option<(PlayerId, f64)> = None;
    for player in state.players.values() {
        if !player.is_available() || player.buzz > ceiling || Some(player.id) == exclude {
            continue;
        }
        let score = target_score(config, rival, player, rng);
        if best.is_none_or(|(_, top)| score > top) {
            best = Some((player.id, score));
        }
    }
    best
}

fn advance_rival(ctx: &mut TickContext, id: RivalId) {
    let config = ctx.config;
    let cfg = &config.rivals;
    let date = ctx.today();

    let rival = ctx.state.rival(id);
    if !rival.active {
        return;
    }
    if rival.stalled_weeks > 0 {
        let rival = ctx.state.rival_mut(id);
        rival.stalled_weeks -= 1;
        let weeks_left = rival.stalled_weeks;
        rival.log(date, RivalActivityKind::Stalled { weeks_left });
        return;
    }

    // A target signed elsewhere is dropped with its progress frozen.
    if let Some(target) = rival.current_target {
        if !ctx.state.player(target).is_available() {
            let rival = ctx.state.rival_mut(id);
            let progress = rival.progress_on(target);
            rival.current_target = None;
            rival.log(date, RivalActivityKind::TargetAbandoned { player_id: target, progress });
        }
    }

    let rival = ctx.state.rival(id);
    let target = match rival.current_target {
        None => {
            let Some((player_id, _)) = best_target(ctx.state, config, rival, None, ctx.rng) else {
                return;
            };
            select(ctx.state, id, player_id, date);
            player_id
        }
        Some(current) if roll(ctx.rng, cfg.switch_chance) => {
            let current_score = target_score(config, rival, ctx.state.player(current), ctx.rng);
            match best_target(ctx.state, config, rival, Some(current), ctx.rng) {
                Some((challenger, score)) if score > current_score * cfg.switch_margin => {
                    let rival = ctx.state.rival_mut(id);
                    let progress = rival.progress_on(current);
                    rival.log(date, RivalActivityKind::TargetAbandoned { player_id: current, progress });
                    select(ctx.state, id, challenger, date);
                    tracing::debug!(rival = %id, from = %current, to = %challenger, "rival switched target");
                    challenger
                }
                _ => current,
            }
        }
        Some(current) => current,
    };

    let threshold = cfg.completion_threshold.max(1);
    let rival = ctx.state.rival_mut(id);
    let progress = (rival.progress_on(target) + 1).min(threshold);
    rival.scouting_progress.insert(target, progress);
    rival.log(date, RivalActivityKind::Progressed { player_id: target, progress });

    if progress >= threshold && roll(ctx.rng, cfg.intent(rival.budget)) {
        sign(ctx, id, target);
    }
}

fn select(state: &mut GameState, id: RivalId, player: PlayerId, date: crate::model::GameDate) {
    let rival = state.rival_mut(id);
    let resumed_at = rival.progress_on(player);
    rival.current_target = Some(player);
    rival.log(date, RivalActivityKind::TargetSelected { player_id: player, resumed_at });
}

fn sign(ctx: &mut TickContext, rival_id: RivalId, player_id: PlayerId) {
    let date = ctx.today();
    let tracked = scout_interest(ctx.state).contains(&player_id);
    let state = &mut *ctx.state;

    state.player_mut(player_id).availability = Availability::Signed { rival: rival_id, date };
    let rival = state.rival_mut(rival_id);
    rival.signings.push(player_id);
    rival.current_target = None;
    rival.log(date, RivalActivityKind::PlayerSigned { player_id });
    let club = rival.club.clone();

    let name = state.player(player_id).name.clone();
    if tracked {
        state.milestones.targets_lost_to_rivals += 1;
    }
    state.send_message(
        MessageCategory::Rival,
        format!("{name} signs for {club}"),
        format!("{club} have completed the signing of {name}."),
    );
    tracing::info!(rival = %rival_id, player = %player_id, tracked, "rival signed player");
    ctx.emit(SignalKind::PlayerSigned { rival_id, player_id });
}

// ---------------------------------------------------------------------------
// Shared targets
// ---------------------------------------------------------------------------

/// Players the scout has shown interest in: observed, watched, or planned.
pub fn scout_interest(state: &GameState) -> BTreeSet<PlayerId> {
    let mut interest = state.observed_players();
    interest.extend(state.scout.watchlist.iter().copied());
    interest.extend(state.routine.focused_players());
    interest.extend(state.week.plan.focused_players());
    interest
}

/// Put a player on the scout's watchlist so rival activity on them is reported.
pub fn watch_player(state: &mut GameState, player: PlayerId) -> Result<(), Rejection> {
    let target = state.players.get(&player).ok_or(Rejection::UnknownPlayer(player))?;
    if !target.is_available() {
        return Err(Rejection::PlayerUnavailable(player));
    }
    state.scout.watchlist.insert(player);
    Ok(())
}

/// Drop a player from the watchlist. Returns whether they were on it.
pub fn unwatch_player(state: &mut GameState, player: PlayerId) -> bool {
    state.scout.watchlist.remove(&player)
}

/// Available players tracked by both the scout and at least one rival.
pub fn shared_targets(state: &GameState) -> Vec<SharedTarget> {
    scout_interest(state)
        .into_iter()
        .filter(|p| state.players.get(p).is_some_and(|p| p.is_available()))
        .filter_map(|player_id| {
            let rivals: Vec<RivalId> = state
                .rivals
                .values()
                .filter(|r| r.tracked_players().any(|p| p == player_id))
                .map(|r| r.id)
                .collect();
            (!rivals.is_empty()).then_some(SharedTarget { player_id, rivals })
        })
        .collect()
}

fn warn_closing_in(ctx: &mut TickContext) {
    let cfg = &ctx.config.rivals;
    let threshold = cfg.completion_threshold.max(1);
    let floor = threshold.saturating_sub(cfg.closing_in_margin);
    let mut warnings = Vec::new();
    for shared in shared_targets(ctx.state) {
        for rival_id in shared.rivals {
            let rival = ctx.state.rival(rival_id);
            let progress = rival.progress_on(shared.player_id);
            if rival.active && rival.current_target == Some(shared.player_id) && progress >= floor {
                warnings.push((rival_id, shared.player_id, progress));
            }
        }
    }
    for (rival_id, player_id, progress) in warnings {
        ctx.emit(SignalKind::RivalClosingIn {
            rival_id,
            player_id,
            progress,
            threshold,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BudgetTier, GameDate};
    use crate::scenario::Scenario;
    use crate::testutil::{has_signal, tick_system_at_week_end};

    fn quiet_config() -> CareerConfig {
        let mut config = CareerConfig::default();
        config.rivals.switch_chance = 0.0;
        config
    }

    #[test]
    fn rival_at_four_of_five_signs_next_week() {
        let mut scenario = Scenario::new().with_config(quiet_config());
        let target = scenario.player("Wonderkid").id();
        let rival = scenario
            .rival("Hawk")
            .budget(BudgetTier::High)
            .targeting(target, 4)
            .id();
        let (mut state, config) = scenario.build_with_config();

        let signals = tick_system_at_week_end(&mut state, &config, &mut RivalSystem, 9);
        assert_eq!(state.player(target).signed_by(), Some(rival));
        assert!(signals
            .iter()
            .any(|s| s.kind == SignalKind::PlayerSigned { rival_id: rival, player_id: target }));
        let hawk = state.rival(rival);
        assert_eq!(hawk.signings, vec![target]);
        assert!(hawk.current_target.is_none());
        assert!(matches!(
            hawk.activity_log.last().map(|a| &a.kind),
            Some(RivalActivityKind::PlayerSigned { .. })
        ));
    }

    #[test]
    fn abandoned_target_keeps_progress() {
        let mut scenario = Scenario::new().with_config(quiet_config());
        let first = scenario.player("First").id();
        let second = scenario.player("Second").id();
        let other = scenario.rival("Other").id();
        let rival = scenario.rival("Hawk").targeting(first, 3).id();
        let (mut state, config) = scenario.build_with_config();
        state.player_mut(first).availability = Availability::Signed {
            rival: other,
            date: GameDate::new(1, 0),
        };

        tick_system_at_week_end(&mut state, &config, &mut RivalSystem, 2);
        let hawk = state.rival(rival);
        assert_eq!(hawk.progress_on(first), 3);
        assert_eq!(hawk.current_target, Some(second));
        assert_eq!(hawk.progress_on(second), 1);
    }

    #[test]
    fn stalled_rival_sits_out() {
        let mut scenario = Scenario::new().with_config(quiet_config());
        let target = scenario.player("Target").id();
        let rival = scenario.rival("Hawk").targeting(target, 2).id();
        let (mut state, config) = scenario.build_with_config();
        state.rival_mut(rival).stalled_weeks = 1;

        tick_system_at_week_end(&mut state, &config, &mut RivalSystem, 3);
        assert_eq!(state.rival(rival).progress_on(target), 2);
        assert_eq!(state.rival(rival).stalled_weeks, 0);
        tick_system_at_week_end(&mut state, &config, &mut RivalSystem, 4);
        assert_eq!(state.rival(rival).progress_on(target), 3);
    }

    #[test]
    fn low_budget_ignores_high_buzz() {
        let mut scenario = Scenario::new().with_config(quiet_config());
        scenario.player("Hyped").buzz(0.95);
        let modest = scenario.player("Modest").buzz(0.3).id();
        let rival = scenario.rival("Thrifty").budget(BudgetTier::Low).id();
        let (mut state, config) = scenario.build_with_config();

        tick_system_at_week_end(&mut state, &config, &mut RivalSystem, 5);
        assert_eq!(state.rival(rival).current_target, Some(modest));
    }

    #[test]
    fn shared_target_warning_when_close() {
        let mut scenario = Scenario::new().with_config(quiet_config());
        let target = scenario.player("Contested").id();
        let rival = scenario
            .rival("Hawk")
            .budget(BudgetTier::Low)
            .targeting(target, 3)
            .id();
        let (mut state, config) = scenario.build_with_config();
        state.scout.watchlist.insert(target);

        let shared = shared_targets(&state);
        assert_eq!(shared, vec![SharedTarget { player_id: target, rivals: vec![rival] }]);

        let signals = tick_system_at_week_end(&mut state, &config, &mut RivalSystem, 6);
        assert!(has_signal(&signals, |kind| matches!(
            kind,
            SignalKind::RivalClosingIn { progress: 4, threshold: 5, .. }
        )));
    }

    #[test]
    fn signing_tracked_player_counts_as_lost() {
        let mut scenario = Scenario::new().with_config(quiet_config());
        let target = scenario.player("Watched").id();
        scenario.rival("Hawk").budget(BudgetTier::High).targeting(target, 4);
        let (mut state, config) = scenario.build_with_config();
        state.scout.watchlist.insert(target);

        tick_system_at_week_end(&mut state, &config, &mut RivalSystem, 7);
        assert_eq!(state.milestones.targets_lost_to_rivals, 1);
        assert!(shared_targets(&state).is_empty());
    }
}

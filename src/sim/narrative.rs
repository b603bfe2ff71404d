//! Narrative events: story beats raised from other systems' signals, their
//! choices and effects, multi-step chains, and escalation from persisting
//! conditions.

use rand::RngCore;

use super::context::TickContext;
use super::helpers::roll;
use super::names;
use super::rivals::scout_interest;
use super::signal::{Signal, SignalKind};
use super::system::{SimSystem, TickFrequency};
use crate::config::{CareerConfig, NarrativeConfig};
use crate::error::Rejection;
use crate::id::{ChainId, EventId};
use crate::model::{
    ChainKind, ChainLink, Condition, ContractStatus, Conviction, Discipline, DistressLevel,
    Escalation, EventChain, EventStatus, GameState, MessageCategory, NarrativeChoice,
    NarrativeEffect, NarrativeEvent, NarrativeKind, Severity, Verdict,
};

pub struct NarrativeSystem;

impl SimSystem for NarrativeSystem {
    fn name(&self) -> &str {
        "narrative"
    }

    fn frequency(&self) -> TickFrequency {
        TickFrequency::Daily
    }

    fn tick(&mut self, ctx: &mut TickContext) {
        emit_due_steps(ctx.state, ctx.config);
        if ctx.is_week_end() {
            track_conditions(ctx.state, &ctx.config.narrative);
            offer_mentorship(ctx.state, ctx.config, ctx.rng);
        }
    }

    fn handle_signals(&mut self, ctx: &mut TickContext) {
        let inbox = ctx.inbox;
        for signal in inbox {
            react(ctx.state, ctx.config, signal);
        }
    }
}

// ---------------------------------------------------------------------------
// Escalation
// ---------------------------------------------------------------------------

/// Escalation for a condition that has persisted `weeks` consecutive weeks.
pub fn escalation_for(cfg: &NarrativeConfig, weeks: u32) -> Escalation {
    if weeks >= cfg.critical_after {
        Escalation::Critical
    } else if weeks >= cfg.escalating_after {
        Escalation::Escalating
    } else {
        Escalation::Normal
    }
}

fn condition_holds(state: &GameState, condition: Condition) -> bool {
    match condition {
        Condition::BudgetShortfall => state.finances.balance < 0,
        Condition::MissedQuota => state
            .finances
            .contracts
            .values()
            .any(|c| c.is_retainer() && c.status == ContractStatus::Suspended),
        Condition::LoanArrears => state
            .finances
            .loan
            .as_ref()
            .is_some_and(|l| l.missed_payments > 0),
    }
}

/// Weekly: advance or clear each condition streak, then raise the escalation
/// of open events that report on a persisting condition. Escalation only rises.
fn track_conditions(state: &mut GameState, cfg: &NarrativeConfig) {
    for condition in Condition::ALL {
        if condition_holds(state, *condition) {
            *state.narrative.conditions.entry(*condition).or_insert(0) += 1;
        } else {
            state.narrative.conditions.remove(condition);
        }
    }

    let conditions = state.narrative.conditions.clone();
    let mut newly_critical = Vec::new();
    for event in state.narrative.events.values_mut().filter(|e| e.is_open()) {
        let Some(condition) = event.kind.condition() else {
            continue;
        };
        let level = escalation_for(cfg, conditions.get(&condition).copied().unwrap_or(0));
        if level > event.escalation {
            event.escalation = level;
            if level == Escalation::Critical {
                newly_critical.push(event.headline.clone());
            }
        }
    }
    for headline in newly_critical {
        state.notify(Severity::Critical, headline);
    }
}

fn initial_escalation(state: &GameState, cfg: &NarrativeConfig, kind: &NarrativeKind) -> Escalation {
    if let Some(condition) = kind.condition() {
        return escalation_for(cfg, state.narrative.condition_weeks(condition));
    }
    match kind {
        NarrativeKind::RivalClosingIn { progress, threshold, .. } if progress >= threshold => Escalation::Critical,
        NarrativeKind::RivalClosingIn { .. } => Escalation::Escalating,
        NarrativeKind::DistressChanged { to, .. } if *to >= DistressLevel::Critical => Escalation::Critical,
        NarrativeKind::DistressChanged { from, to } if to > from => Escalation::Escalating,
        NarrativeKind::ExhaustionWarning { .. } => Escalation::Escalating,
        _ => Escalation::Normal,
    }
}

// ---------------------------------------------------------------------------
// Raising events
// ---------------------------------------------------------------------------

fn react(state: &mut GameState, config: &CareerConfig, signal: &Signal) {
    let kind = match &signal.kind {
        SignalKind::FatigueExhausted { fatigue } => NarrativeKind::ExhaustionWarning { fatigue: *fatigue },
        SignalKind::OfferReceived { contract_id, client } => NarrativeKind::ContractOffer {
            contract_id: *contract_id,
            client: client.clone(),
        },
        SignalKind::SkillLevelled { .. } => return,
        SignalKind::CourseCompleted { course_id } => NarrativeKind::CourseCompleted {
            course_id: course_id.clone(),
        },
        SignalKind::BudgetShortfall {
            consecutive_weeks,
            balance,
        } => {
            if has_open(state, |k| matches!(k, NarrativeKind::BudgetShortfall { .. })) {
                return;
            }
            NarrativeKind::BudgetShortfall {
                consecutive_weeks: *consecutive_weeks,
                balance: *balance,
            }
        }
        SignalKind::DistressChanged { from, to } => NarrativeKind::DistressChanged { from: *from, to: *to },
        SignalKind::LoanPaymentMissed {
            amount,
            missed_payments,
        } => NarrativeKind::LoanPaymentMissed {
            amount: *amount,
            missed_payments: *missed_payments,
        },
        SignalKind::RetainerSuspended { contract_id, client } => NarrativeKind::RetainerSuspended {
            contract_id: *contract_id,
            client: client.clone(),
        },
        SignalKind::ReportReviewed {
            report_id,
            player_id,
            conviction,
            verdict,
            reputation_delta,
        } => {
            if *verdict == Verdict::ProvenWrong && *conviction == Conviction::TablePound {
                start_chain(
                    state,
                    config,
                    ChainKind::MediaScrutiny,
                    NarrativeKind::MediaScrutiny {
                        report_id: *report_id,
                        player_id: *player_id,
                    },
                );
            }
            NarrativeKind::ReportReviewed {
                report_id: *report_id,
                player_id: *player_id,
                verdict: *verdict,
                reputation_delta: *reputation_delta,
            }
        }
        SignalKind::RivalClosingIn {
            rival_id,
            player_id,
            progress,
            threshold,
        } => {
            let duplicate = has_open(state, |k| {
                matches!(k, NarrativeKind::RivalClosingIn { rival_id: r, player_id: p, .. } if r == rival_id && p == player_id)
            });
            if duplicate {
                return;
            }
            NarrativeKind::RivalClosingIn {
                rival_id: *rival_id,
                player_id: *player_id,
                progress: *progress,
                threshold: *threshold,
            }
        }
        SignalKind::PlayerSigned { rival_id, player_id } => {
            if !scout_interest(state).contains(player_id) {
                return;
            }
            NarrativeKind::PlayerSigned {
                rival_id: *rival_id,
                player_id: *player_id,
            }
        }
    };
    raise(state, config, kind, None);
}

fn has_open(state: &GameState, pred: impl Fn(&NarrativeKind) -> bool) -> bool {
    state.narrative.open_events().any(|e| pred(&e.kind))
}

/// Store a new open event for `kind`, optionally as a chain step.
fn raise(state: &mut GameState, config: &CareerConfig, kind: NarrativeKind, chain: Option<ChainLink>) -> EventId {
    let escalation = initial_escalation(state, &config.narrative, &kind);
    let story = match chain {
        Some(link) => {
            let chain = &state.narrative.chains[&link.chain_id];
            compose_step(state, config, chain, link.step)
        }
        None => compose(state, config, &kind),
    };
    let id: EventId = state.id_gen.mint();
    let date = state.date();
    if escalation == Escalation::Critical {
        state.notify(Severity::Critical, story.headline.clone());
    }
    tracing::debug!(event = %id, headline = %story.headline, escalation = ?escalation, "narrative event raised");
    state.narrative.events.insert(
        id,
        NarrativeEvent {
            id,
            date,
            kind,
            chain,
            escalation,
            headline: story.headline,
            body: story.body,
            choices: story.choices,
            status: EventStatus::Open,
        },
    );
    id
}

struct Story {
    headline: String,
    body: String,
    choices: Vec<NarrativeChoice>,
}

impl Story {
    fn new(headline: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            headline: headline.into(),
            body: body.into(),
            choices: Vec::new(),
        }
    }

    fn choice(mut self, label: &str, effects: Vec<NarrativeEffect>) -> Self {
        self.choices.push(NarrativeChoice {
            label: label.to_string(),
            effects,
        });
        self
    }
}

fn player_name(state: &GameState, id: crate::id::PlayerId) -> String {
    state
        .players
        .get(&id)
        .map(|p| p.name.clone())
        .unwrap_or_else(|| id.to_string())
}

fn rival_name(state: &GameState, id: crate::id::RivalId) -> String {
    state
        .rivals
        .get(&id)
        .map(|r| format!("{} ({})", r.name, r.club))
        .unwrap_or_else(|| id.to_string())
}

fn compose(state: &GameState, config: &CareerConfig, kind: &NarrativeKind) -> Story {
    use NarrativeEffect as E;
    match kind {
        NarrativeKind::BudgetShortfall {
            consecutive_weeks,
            balance,
        } => Story::new(
            "The account is overdrawn",
            format!("You closed the week at {balance}. That makes {consecutive_weeks} week(s) in the red."),
        ),
        NarrativeKind::DistressChanged { from, to } if to > from => Story::new(
            format!("Finances slip to {to}"),
            format!("Your financial position has worsened from {from} to {to}."),
        ),
        NarrativeKind::DistressChanged { from, to } => Story::new(
            format!("Finances recover to {to}"),
            format!("Your financial position has improved from {from} to {to}."),
        ),
        NarrativeKind::LoanPaymentMissed {
            amount,
            missed_payments,
        } => Story::new(
            "Loan payment missed",
            format!("The bank could not collect {amount}. Missed payments so far: {missed_payments}."),
        )
        .choice("Call the bank", vec![E::AdjustCreditScore { delta: 5 }, E::AdjustFatigue { delta: 4 }])
        .choice("Ignore it", vec![E::AdjustCreditScore { delta: -10 }]),
        NarrativeKind::RetainerSuspended { client, .. } => Story::new(
            format!("{client} suspends your retainer"),
            "You have missed the report quota too often. Catch up to have it reinstated.",
        ),
        NarrativeKind::RivalClosingIn {
            rival_id,
            player_id,
            progress,
            threshold,
        } => {
            let player = player_name(state, *player_id);
            Story::new(
                format!("A rival is closing in on {player}"),
                format!(
                    "{} is {progress}/{threshold} of the way to a deal for {player}.",
                    rival_name(state, *rival_id)
                ),
            )
            .choice(
                "Fast-track your assessment",
                vec![E::AdjustFatigue { delta: 10 }, E::WatchPlayer { player_id: *player_id }],
            )
            .choice(
                "Tip off a contact to slow them down",
                vec![
                    E::StallRival {
                        rival_id: *rival_id,
                        weeks: config.narrative.rival_stall_weeks,
                    },
                    E::AdjustReputation { delta: -1.0 },
                ],
            )
            .choice("Let it go", Vec::new())
        }
        NarrativeKind::PlayerSigned { rival_id, player_id } => Story::new(
            format!("{} has signed elsewhere", player_name(state, *player_id)),
            format!("{} got the deal done first.", rival_name(state, *rival_id)),
        ),
        NarrativeKind::ReportReviewed {
            player_id,
            verdict: Verdict::Vindicated,
            reputation_delta,
            ..
        } => Story::new(
            format!("Your call on {} was right", player_name(state, *player_id)),
            format!("Your reputation moved by {reputation_delta:+.1}."),
        ),
        NarrativeKind::ReportReviewed {
            player_id,
            verdict: Verdict::ProvenWrong,
            reputation_delta,
            ..
        } => Story::new(
            format!("Your call on {} was wrong", player_name(state, *player_id)),
            format!("Your reputation moved by {reputation_delta:+.1}."),
        ),
        NarrativeKind::ExhaustionWarning { fatigue } => Story::new(
            "You are running on empty",
            format!("Fatigue has reached {fatigue}. Your judgement is suffering."),
        )
        .choice(
            "Take it easy for a while",
            vec![E::AdjustFatigue { delta: -15 }, E::AdjustReputation { delta: -0.5 }],
        )
        .choice(
            "Push through",
            vec![
                E::GrantXp {
                    discipline: Discipline::Mental,
                    xp: 10,
                },
                E::AdjustFatigue { delta: 5 },
            ],
        ),
        NarrativeKind::CourseCompleted { course_id } => {
            let name = config.course(course_id).map_or(course_id.as_str(), |c| c.name.as_str());
            Story::new(format!("{name} complete"), "Your new qualification is on record.")
        }
        NarrativeKind::ContractOffer { client, .. } => Story::new(
            format!("{client} wants your services"),
            "An offer is waiting in your contracts. It will lapse if left unanswered.",
        ),
        NarrativeKind::MediaScrutiny { .. } | NarrativeKind::Mentorship { .. } => {
            Story::new("A story develops", "There is more to come.")
        }
    }
}

// ---------------------------------------------------------------------------
// Chains
// ---------------------------------------------------------------------------

fn start_chain(state: &mut GameState, config: &CareerConfig, kind: ChainKind, subject: NarrativeKind) -> ChainId {
    let id: ChainId = state.id_gen.mint();
    let date = state.date();
    state.narrative.chains.insert(
        id,
        EventChain {
            id,
            kind,
            subject: subject.clone(),
            max_steps: config.narrative.chain_max_steps.max(1),
            current_step: 1,
            choice_history: Vec::new(),
            next_step_at: None,
            closed: false,
            started: date,
        },
    );
    raise(state, config, subject, Some(ChainLink { chain_id: id, step: 1 }));
    tracing::info!(chain = %id, kind = %kind, "event chain started");
    id
}

/// Emit every chain step whose scheduled date has arrived.
fn emit_due_steps(state: &mut GameState, config: &CareerConfig) {
    let today = state.date();
    let due: Vec<ChainId> = state
        .narrative
        .chains
        .values()
        .filter(|c| !c.closed && c.next_step_at.is_some_and(|at| at <= today))
        .map(|c| c.id)
        .collect();
    for id in due {
        let Some(chain) = state.narrative.chains.get_mut(&id) else {
            continue;
        };
        chain.current_step += 1;
        chain.next_step_at = None;
        let step = chain.current_step;
        let subject = chain.subject.clone();
        raise(state, config, subject, Some(ChainLink { chain_id: id, step }));
    }
}

fn offer_mentorship(state: &mut GameState, config: &CareerConfig, rng: &mut dyn RngCore) {
    let cfg = &config.narrative;
    if state.scout.reputation < cfg.mentorship_min_reputation {
        return;
    }
    let mentoring = state
        .narrative
        .chains
        .values()
        .any(|c| c.kind == ChainKind::Mentorship && !c.closed);
    if mentoring || !roll(rng, cfg.mentorship_weekly_chance) {
        return;
    }
    let mentor = names::generate_person_name(rng);
    start_chain(state, config, ChainKind::Mentorship, NarrativeKind::Mentorship { mentor });
}

/// Text and choices for step `step` of `chain`. The opening and closing steps
/// are fixed; middle steps follow the first choice made.
fn compose_step(state: &GameState, config: &CareerConfig, chain: &EventChain, step: u32) -> Story {
    use NarrativeEffect as E;
    let first = chain.choice_history.first().copied();
    let last_step = step >= chain.max_steps;
    match &chain.subject {
        NarrativeKind::MediaScrutiny { player_id, .. } => {
            let player = player_name(state, *player_id);
            if step == 1 {
                Story::new(
                    format!("Press questions your verdict on {player}"),
                    "You banged the table and got it wrong. The papers have noticed.",
                )
                .choice("Defend your judgement", vec![E::AdjustReputation { delta: -2.0 }])
                .choice("Admit the miss", vec![E::AdjustReputation { delta: -1.0 }])
            } else if last_step {
                Story::new("The dust settles", "The story has run its course.")
                    .choice(
                        "Learn from it",
                        vec![E::GrantXp {
                            discipline: Discipline::Analysis,
                            xp: 20,
                        }],
                    )
                    .choice("Move on", vec![E::AdjustReputation { delta: 0.5 }])
            } else if first == Some(0) {
                Story::new("Pundits pile in", "Your defiance has kept the story alive.")
                    .choice(
                        "Give an interview",
                        vec![E::AdjustReputation { delta: 1.0 }, E::AdjustFatigue { delta: 8 }],
                    )
                    .choice("Keep your head down", Vec::new())
            } else {
                Story::new("The story cools", "Owning the mistake took the heat out of it.")
                    .choice("Write a column on the lessons", vec![E::AdjustReputation { delta: 1.0 }])
                    .choice("Keep your head down", Vec::new())
            }
        }
        NarrativeKind::Mentorship { mentor } => {
            if step == 1 {
                Story::new(
                    format!("{mentor} offers to mentor you"),
                    format!("{mentor}, a veteran scout, has been following your work."),
                )
                .choice(
                    "Accept",
                    vec![E::GrantXp {
                        discipline: Discipline::Mental,
                        xp: 15,
                    }],
                )
                .choice("Decline politely", vec![E::AdjustReputation { delta: 0.5 }])
            } else if last_step {
                Story::new(
                    format!("Parting words from {mentor}"),
                    "Your time together is drawing to a close.",
                )
                .choice("Thank them publicly", vec![E::AdjustReputation { delta: 2.0 }])
                .choice("Ask for an introduction", vec![E::AdjustBalance { amount: 300 }])
            } else if first == Some(0) {
                Story::new(format!("Sessions with {mentor}"), "How do you want to spend your time together?")
                    .choice(
                        "Study video together",
                        vec![
                            E::GrantXp {
                                discipline: Discipline::Tactical,
                                xp: 20,
                            },
                            E::AdjustFatigue { delta: 6 },
                        ],
                    )
                    .choice(
                        "Shadow them at a match",
                        vec![
                            E::GrantXp {
                                discipline: Discipline::Technical,
                                xp: 20,
                            },
                            E::AdjustFatigue { delta: 8 },
                        ],
                    )
            } else {
                Story::new(format!("{mentor} checks in"), "The offer still stands.")
                    .choice(
                        "Reconsider",
                        vec![E::GrantXp {
                            discipline: Discipline::Mental,
                            xp: 10,
                        }],
                    )
                    .choice("Stay independent", vec![E::AdjustReputation { delta: 0.5 }])
            }
        }
        other => compose(state, config, other),
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn open_event(state: &GameState, id: EventId) -> Result<&NarrativeEvent, Rejection> {
    let event = state.narrative.events.get(&id).ok_or(Rejection::UnknownEvent(id))?;
    if !event.is_open() {
        return Err(Rejection::EventAlreadyResolved(id));
    }
    Ok(event)
}

/// Dismiss an event that has no choices.
pub fn acknowledge(state: &mut GameState, id: EventId) -> Result<(), Rejection> {
    if !open_event(state, id)?.choices.is_empty() {
        return Err(Rejection::ChoiceRequired(id));
    }
    if let Some(event) = state.narrative.events.get_mut(&id) {
        event.status = EventStatus::Acknowledged;
    }
    Ok(())
}

/// Pick a choice, apply its effects, and move the event's chain on.
pub fn resolve_choice(state: &mut GameState, config: &CareerConfig, id: EventId, index: usize) -> Result<(), Rejection> {
    let event = open_event(state, id)?;
    if event.choices.is_empty() {
        return Err(Rejection::NoChoices(id));
    }
    let Some(choice) = event.choices.get(index) else {
        return Err(Rejection::InvalidChoice {
            index,
            available: event.choices.len(),
        });
    };
    let effects = choice.effects.clone();
    let chain = event.chain;

    for effect in &effects {
        apply_effect(state, config, effect);
    }
    if let Some(event) = state.narrative.events.get_mut(&id) {
        event.status = EventStatus::Resolved { choice: index };
    }

    if let Some(link) = chain {
        let next_at = state.date().add_days(config.narrative.chain_step_delay_days);
        let mut completed = false;
        if let Some(chain) = state.narrative.chains.get_mut(&link.chain_id) {
            chain.choice_history.push(index);
            if chain.current_step < chain.max_steps {
                chain.next_step_at = Some(next_at);
            } else {
                chain.closed = true;
                completed = true;
            }
        }
        if completed {
            state.milestones.chains_completed += 1;
            tracing::info!(chain = %link.chain_id, "event chain completed");
        }
    }
    tracing::debug!(event = %id, choice = index, "narrative choice resolved");
    Ok(())
}

pub fn apply_effect(state: &mut GameState, config: &CareerConfig, effect: &NarrativeEffect) {
    match effect {
        NarrativeEffect::AdjustBalance { amount } => state.finances.balance += amount,
        NarrativeEffect::AdjustReputation { delta } => {
            state.scout.adjust_reputation(*delta);
        }
        NarrativeEffect::AdjustFatigue { delta } => {
            state.scout.adjust_fatigue(*delta);
        }
        NarrativeEffect::AdjustCreditScore { delta } => {
            let credit = &config.finance.credit;
            state.finances.credit_score = (state.finances.credit_score + delta).clamp(credit.floor, credit.ceiling);
        }
        NarrativeEffect::GrantXp { discipline, xp } => {
            if let Some(level) = state.scout.grant_xp(*discipline, *xp, config.progression.xp_per_level) {
                state.send_message(
                    MessageCategory::Career,
                    "Skill improved",
                    format!("Your {discipline} skill reached level {level}."),
                );
            }
        }
        NarrativeEffect::StallRival { rival_id, weeks } => {
            if let Some(rival) = state.rivals.get_mut(rival_id) {
                rival.stalled_weeks += weeks;
            }
        }
        NarrativeEffect::WatchPlayer { player_id } => {
            if state.players.contains_key(player_id) {
                state.scout.watchlist.insert(*player_id);
            }
        }
    }
}

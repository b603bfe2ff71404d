//! Financial engine: the weekly statement, the distress ladder, loans,
//! contracts, and the purchase commands that spend money between weeks.

use std::collections::BTreeMap;

use rand::Rng;
use rand::RngCore;

use super::context::TickContext;
use super::helpers::{money, roll};
use super::names;
use super::signal::SignalKind;
use super::system::{SimSystem, TickFrequency};
use crate::config::{CareerConfig, CreditRecovery, DistressConfig};
use crate::error::{Ineligibility, Rejection};
use crate::id::{ContractId, PlayerId, StaffId};
use crate::model::{
    Contract, ContractStatus, ContractTerms, CourseEnrollment, DistressLevel, EquipmentItem,
    ExpenseCategory, FinanceWeekSummary, GameState, IncomeSource, Loan, LoanType,
    MessageCategory, Severity, StaffMember, StaffRole, TravelBooking,
};
use crate::model::finance::DistressTracker;

pub struct FinanceSystem;

impl SimSystem for FinanceSystem {
    fn name(&self) -> &str {
        "finance"
    }

    fn frequency(&self) -> TickFrequency {
        TickFrequency::Weekly
    }

    fn tick(&mut self, ctx: &mut TickContext) {
        let week = ctx.state.week.week;

        let mut income = collect_income(ctx);
        ctx.state.finances.balance += income.values().sum::<i64>();

        pay_running_costs(ctx.state, ctx.config);
        let missed_payment = service_loan(ctx, week);

        // A missed payment is a negative week whatever the balance.
        let negative = ctx.state.finances.balance < 0 || missed_payment;
        if missed_payment {
            ctx.state.finances.tracker.consecutive_negative_weeks +=
                ctx.config.finance.distress.missed_payment_streak_penalty;
        }
        let liquidation = update_distress(ctx, negative);
        if liquidation > 0 {
            income.insert(IncomeSource::Liquidation, liquidation);
        }
        recover_credit(ctx.state, ctx.config, negative);

        advance_contracts(ctx, week);
        advance_course(ctx);

        let finances = &mut ctx.state.finances;
        let expenses = std::mem::take(&mut finances.paid_this_week);
        let net = income.values().sum::<i64>() - expenses.values().sum::<i64>();
        let summary = FinanceWeekSummary {
            week,
            income,
            net,
            expenses,
            balance_after: finances.balance,
            distress: finances.distress,
        };
        tracing::debug!(week, net = summary.net, balance = summary.balance_after, "weekly statement");
        finances.history.push(summary);
    }
}

// ---------------------------------------------------------------------------
// Weekly statement
// ---------------------------------------------------------------------------

fn collect_income(ctx: &mut TickContext) -> BTreeMap<IncomeSource, i64> {
    let config = ctx.config;
    let state = &mut *ctx.state;
    let mut income = std::mem::take(&mut state.finances.pending_income);

    let salary = config.finance.salaries.get(&state.scout.tier).copied().unwrap_or(0);
    if salary > 0 {
        *income.entry(IncomeSource::Salary).or_insert(0) += salary;
    }

    let retainer_fees: i64 = state
        .finances
        .contracts
        .values()
        .filter(|c| c.status == ContractStatus::Active)
        .filter_map(|c| match c.terms {
            ContractTerms::Retainer { weekly_fee, .. } => Some(weekly_fee),
            ContractTerms::Consulting { .. } => None,
        })
        .sum();
    if retainer_fees > 0 {
        *income.entry(IncomeSource::RetainerFees).or_insert(0) += retainer_fees;
    }

    let clauses = std::mem::take(&mut state.finances.sell_on_clauses);
    for clause in clauses {
        if roll(ctx.rng, config.finance.sell_on_weekly_chance) {
            let payout = money(clause.reference_fee as f64 * clause.percentage);
            *income.entry(IncomeSource::SellOnClauses).or_insert(0) += payout;
            let name = state.player(clause.player_id).name.clone();
            state.send_message(
                MessageCategory::Finance,
                "Sell-on clause paid out",
                format!("{name} moved on; your sell-on share came to {payout}."),
            );
        } else {
            state.finances.sell_on_clauses.push(clause);
        }
    }

    income.retain(|_, amount| *amount != 0);
    income
}

fn pay_running_costs(state: &mut GameState, config: &CareerConfig) {
    let finances = &mut state.finances;
    let cutback = if finances.distress >= DistressLevel::Distressed {
        config.finance.distress.cutback_rate.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let scaled = |category: ExpenseCategory, amount: i64| {
        if category.is_discretionary() {
            money(amount as f64 * (1.0 - cutback))
        } else {
            amount
        }
    };

    let fixed: Vec<(ExpenseCategory, i64)> = finances
        .fixed_expenses
        .iter()
        .map(|(c, a)| (*c, scaled(*c, *a)))
        .collect();
    let upkeep = scaled(
        ExpenseCategory::EquipmentUpkeep,
        finances.equipment.iter().map(|e| e.weekly_upkeep).sum(),
    );
    let wages: i64 = finances.staff.values().map(|s| s.weekly_wage).sum();

    for (category, amount) in fixed {
        if amount > 0 {
            finances.charge(category, amount);
        }
    }
    if upkeep > 0 {
        finances.charge(ExpenseCategory::EquipmentUpkeep, upkeep);
    }
    if wages > 0 {
        finances.charge(ExpenseCategory::StaffWages, wages);
    }
}

/// Take the scheduled loan payment if one is due. Returns true when it was missed.
fn service_loan(ctx: &mut TickContext, week: u32) -> bool {
    let config = ctx.config;
    let state = &mut *ctx.state;
    let balance = state.finances.balance;
    let Some(loan) = state.finances.loan.as_mut() else {
        return false;
    };
    if loan.next_payment_week > week {
        return false;
    }

    let interest = money(loan.remaining_balance as f64 * loan.annual_rate / 12.0);
    let due = loan.monthly_payment.min(loan.remaining_balance + interest);
    loan.remaining_balance += interest;
    loan.next_payment_week = week + config.finance.weeks_per_month;
    let credit = &config.finance.credit;

    if balance >= due {
        loan.remaining_balance -= due;
        loan.payments_made += 1;
        let cleared = loan.remaining_balance <= 0;
        state.finances.charge(ExpenseCategory::LoanRepayment, due);
        adjust_credit(state, config, credit.on_time_payment_bonus);
        if cleared {
            state.finances.loan = None;
            state.milestones.loans_repaid += 1;
            state.send_message(MessageCategory::Finance, "Loan repaid", "The final instalment has cleared.");
            tracing::info!(week, "loan repaid in full");
        }
        return false;
    }

    // Unpaid interest is capitalized.
    loan.missed_payments += 1;
    let missed_payments = loan.missed_payments;
    adjust_credit(state, config, -credit.missed_payment_penalty);
    state.notify(Severity::Warning, format!("Missed a loan payment of {due}"));
    tracing::warn!(week, due, missed_payments, "loan payment missed");
    ctx.emit(SignalKind::LoanPaymentMissed {
        amount: due,
        missed_payments,
    });
    true
}

fn adjust_credit(state: &mut GameState, config: &CareerConfig, delta: i32) {
    let credit = &config.finance.credit;
    state.finances.credit_score = (state.finances.credit_score + delta).clamp(credit.floor, credit.ceiling);
}

// ---------------------------------------------------------------------------
// Distress ladder
// ---------------------------------------------------------------------------

/// Next rung of the distress ladder after one weekly evaluation.
///
/// Moves at most one rung. A negative week climbs toward the rung the streak
/// calls for; a solvent week steps down once a full recovery window of solvent
/// weeks has passed. Bankruptcy first waits out its recovery countdown.
pub fn next_distress(
    current: DistressLevel,
    tracker: &mut DistressTracker,
    negative: bool,
    cfg: &DistressConfig,
) -> DistressLevel {
    if negative {
        tracker.consecutive_negative_weeks += 1;
        tracker.consecutive_solvent_weeks = 0;
        let target = cfg.level_for_streak(tracker.consecutive_negative_weeks);
        return if target > current { current.worse() } else { current };
    }

    tracker.consecutive_negative_weeks = 0;
    tracker.consecutive_solvent_weeks += 1;

    if current == DistressLevel::Bankruptcy {
        return match tracker.recovery_countdown {
            Some(weeks) if weeks > 1 => {
                tracker.recovery_countdown = Some(weeks - 1);
                current
            }
            _ => {
                tracker.recovery_countdown = None;
                tracker.consecutive_solvent_weeks = 0;
                current.better()
            }
        };
    }

    if current > DistressLevel::Healthy && tracker.consecutive_solvent_weeks >= cfg.recovery_window {
        tracker.consecutive_solvent_weeks = 0;
        current.better()
    } else {
        current
    }
}

/// Apply one weekly ladder evaluation and its consequences. Returns any
/// liquidation proceeds raised by a bankruptcy.
fn update_distress(ctx: &mut TickContext, negative: bool) -> i64 {
    let config = ctx.config;
    let cfg = &config.finance.distress;
    let from = ctx.state.finances.distress;
    let to = {
        let finances = &mut ctx.state.finances;
        next_distress(from, &mut finances.tracker, negative, cfg)
    };
    ctx.state.finances.distress = to;

    if negative {
        let consecutive_weeks = ctx.state.finances.tracker.consecutive_negative_weeks;
        let balance = ctx.state.finances.balance;
        ctx.emit(SignalKind::BudgetShortfall {
            consecutive_weeks,
            balance,
        });
    }

    let mut liquidation = 0;
    if to != from {
        tracing::info!(from = %from, to = %to, "distress level changed");
        if to == DistressLevel::Bankruptcy {
            liquidation = declare_bankruptcy(ctx.state, config);
        }
        if from == DistressLevel::Bankruptcy {
            ctx.state.milestones.bankruptcy_recoveries += 1;
        }
        ctx.emit(SignalKind::DistressChanged { from, to });
    }

    match to {
        DistressLevel::Distressed | DistressLevel::Critical => {
            ctx.state.scout.adjust_reputation(-cfg.distressed_reputation_decay);
        }
        DistressLevel::Healthy | DistressLevel::Warning | DistressLevel::Bankruptcy => {}
    }
    if to == DistressLevel::Critical && roll(ctx.rng, cfg.critical_attrition_chance) {
        attrition(ctx.state);
    }
    liquidation
}

/// One staff member walks and one client withdraws a retainer.
fn attrition(state: &mut GameState) {
    let leaver = state
        .finances
        .staff
        .values()
        .max_by_key(|s| (s.hired_week, s.id))
        .map(|s| s.id);
    if let Some(id) = leaver {
        if let Some(member) = state.finances.staff.remove(&id) {
            state.send_message(
                MessageCategory::Finance,
                "Staff departure",
                format!("{} has left after wages went unpaid too long.", member.name),
            );
        }
    }

    let withdrawn = state.finances.live_retainers().map(|c| c.id).last();
    if let Some(id) = withdrawn {
        if let Some(contract) = state.finances.contracts.get_mut(&id) {
            contract.status = ContractStatus::Cancelled;
            let client = contract.client.clone();
            tracing::info!(contract = %id, client = %client, "retainer withdrawn by client");
            state.send_message(
                MessageCategory::Contract,
                "Retainer withdrawn",
                format!("{client} has ended your retainer citing your financial situation."),
            );
        }
    }
}

fn declare_bankruptcy(state: &mut GameState, config: &CareerConfig) -> i64 {
    let cfg = &config.finance.distress;
    let liquidation: i64 = state.finances.equipment.drain(..).map(|e| e.resale_value).sum();
    state.finances.balance += liquidation;
    for contract in state.finances.contracts.values_mut() {
        if matches!(contract.status, ContractStatus::Pending | ContractStatus::Active | ContractStatus::Suspended) {
            contract.status = ContractStatus::Cancelled;
        }
    }
    state.finances.staff.clear();
    state.finances.loan = None;
    state.finances.balance = state.finances.balance.max(0);
    state.finances.tracker.recovery_countdown = Some(cfg.bankruptcy_recovery_weeks.max(1));
    let rep = state.scout.reputation;
    state.scout.adjust_reputation(rep * cfg.bankruptcy_reputation_factor - rep);
    adjust_credit(state, config, -config.finance.credit.bankruptcy_penalty);
    state.milestones.bankruptcies += 1;
    state.notify(Severity::Critical, "You have been declared bankrupt");
    state.send_message(
        MessageCategory::Finance,
        "Bankruptcy",
        format!("Equipment liquidated for {liquidation}. All contracts and staff are gone."),
    );
    tracing::info!(liquidation, "bankruptcy declared");
    liquidation
}

fn recover_credit(state: &mut GameState, config: &CareerConfig, setback: bool) {
    let credit = &config.finance.credit;
    let tracker = &mut state.finances.tracker;
    if setback {
        tracker.weeks_since_credit_step = 0;
        return;
    }
    if state.finances.credit_score >= credit.recovery_target {
        return;
    }
    let gain = match credit.recovery {
        CreditRecovery::Linear { per_week } => per_week,
        CreditRecovery::Stepped { points, every_weeks } => {
            tracker.weeks_since_credit_step += 1;
            if tracker.weeks_since_credit_step >= every_weeks.max(1) {
                tracker.weeks_since_credit_step = 0;
                points
            } else {
                0
            }
        }
    };
    let healed = (state.finances.credit_score + gain).min(credit.recovery_target);
    state.finances.credit_score = healed.max(state.finances.credit_score);
}

// ---------------------------------------------------------------------------
// Contracts
// ---------------------------------------------------------------------------

fn advance_contracts(ctx: &mut TickContext, week: u32) {
    let config = ctx.config;
    let ids: Vec<ContractId> = ctx.state.finances.contracts.keys().copied().collect();
    for id in ids {
        let Some(contract) = ctx.state.finances.contracts.get(&id).cloned() else {
            continue;
        };
        match (contract.status, contract.terms) {
            (ContractStatus::Pending, _) if week >= contract.offer_expires_week => {
                set_status(ctx.state, id, ContractStatus::Cancelled);
                ctx.state.send_message(
                    MessageCategory::Contract,
                    "Offer expired",
                    format!("The offer from {} has lapsed.", contract.client),
                );
            }
            (
                ContractStatus::Active | ContractStatus::Suspended,
                ContractTerms::Retainer {
                    quota_per_period,
                    period_weeks,
                    term_weeks,
                    ..
                },
            ) => {
                if week + 1 - contract.period_start_week >= period_weeks.max(1) {
                    close_retainer_period(ctx, id, quota_per_period, week);
                }
                let started = contract.started_week.unwrap_or(contract.offered_week);
                if started + term_weeks <= week + 1 {
                    set_status(ctx.state, id, ContractStatus::Completed);
                    ctx.state.send_message(
                        MessageCategory::Contract,
                        "Retainer complete",
                        format!("Your retainer with {} has run its term.", contract.client),
                    );
                    tracing::info!(contract = %id, "retainer completed");
                }
            }
            (ContractStatus::Active, ContractTerms::Consulting { deadline_week, .. }) if week >= deadline_week => {
                set_status(ctx.state, id, ContractStatus::Cancelled);
                ctx.state
                    .scout
                    .adjust_reputation(-config.finance.consulting_failure_reputation);
                ctx.state.notify(
                    Severity::Warning,
                    format!("Missed the deadline for {}", contract.client),
                );
                tracing::info!(contract = %id, "consulting deadline missed");
            }
            _ => {}
        }
    }
}

fn close_retainer_period(ctx: &mut TickContext, id: ContractId, quota: u32, week: u32) {
    let suspend_after = ctx.config.finance.retainer_suspend_after;
    let Some(contract) = ctx.state.finances.contracts.get_mut(&id) else {
        return;
    };
    let met = contract.delivered >= quota;
    contract.delivered = 0;
    contract.period_start_week = week + 1;
    if met {
        contract.missed_periods = 0;
        if contract.status == ContractStatus::Suspended {
            contract.status = ContractStatus::Active;
            tracing::info!(contract = %id, "retainer resumed");
        }
        return;
    }
    contract.missed_periods += 1;
    if contract.status == ContractStatus::Active && contract.missed_periods >= suspend_after {
        contract.status = ContractStatus::Suspended;
        let client = contract.client.clone();
        tracing::info!(contract = %id, client = %client, "retainer suspended for missed quota");
        ctx.emit(SignalKind::RetainerSuspended {
            contract_id: id,
            client,
        });
    }
}

fn set_status(state: &mut GameState, id: ContractId, status: ContractStatus) {
    if let Some(contract) = state.finances.contracts.get_mut(&id) {
        contract.status = status;
    }
}

/// Count a submitted report against live contracts.
///
/// Every live retainer gets a delivery; a suspended retainer that has caught up
/// resumes at once. Active consulting contracts covering the player complete
/// and their fee is queued for the week's statement.
pub fn record_delivery(state: &mut GameState, player: PlayerId) -> Vec<ContractId> {
    let mut touched = Vec::new();
    let mut payouts = Vec::new();
    for contract in state.finances.contracts.values_mut() {
        match contract.terms {
            ContractTerms::Retainer { quota_per_period, .. } if contract.is_live() => {
                contract.delivered += 1;
                if contract.status == ContractStatus::Suspended && contract.delivered >= quota_per_period {
                    contract.status = ContractStatus::Active;
                    contract.missed_periods = 0;
                    tracing::info!(contract = %contract.id, "retainer resumed after catching up");
                }
                touched.push(contract.id);
            }
            ContractTerms::Consulting { fee, target, .. }
                if contract.status == ContractStatus::Active && target.is_none_or(|t| t == player) =>
            {
                contract.status = ContractStatus::Completed;
                payouts.push((contract.client.clone(), fee));
                touched.push(contract.id);
            }
            _ => {}
        }
    }
    for (client, fee) in payouts {
        state.finances.accrue(IncomeSource::ConsultingFees, fee);
        state.send_message(
            MessageCategory::Contract,
            "Consulting brief delivered",
            format!("{client} accepted your report; {fee} will be paid this week."),
        );
    }
    touched
}

/// Create a pending contract offer scaled to the scout's reputation.
pub fn generate_offer(state: &mut GameState, config: &CareerConfig, rng: &mut dyn RngCore) -> ContractId {
    let week = state.week.week;
    let scale = 1.0 + state.scout.reputation / 50.0;
    let client = names::generate_club_name(rng);
    let terms = if rng.random_bool(0.5) {
        ContractTerms::Retainer {
            weekly_fee: money(config.finance.retainer_base_fee as f64 * scale),
            quota_per_period: rng.random_range(1..=2),
            period_weeks: config.finance.weeks_per_month,
            term_weeks: rng.random_range(3..=6) * config.finance.weeks_per_month,
        }
    } else {
        let candidates: Vec<PlayerId> = state
            .players
            .values()
            .filter(|p| p.is_available())
            .map(|p| p.id)
            .collect();
        let target = if candidates.is_empty() || rng.random_bool(0.3) {
            None
        } else {
            Some(candidates[rng.random_range(0..candidates.len())])
        };
        ContractTerms::Consulting {
            fee: money(config.finance.consulting_base_fee as f64 * scale),
            target,
            deadline_week: week + rng.random_range(3..=6),
        }
    };

    let id: ContractId = state.id_gen.mint();
    state.finances.contracts.insert(
        id,
        Contract {
            id,
            client: client.clone(),
            terms,
            status: ContractStatus::Pending,
            offered_week: week,
            offer_expires_week: week + config.finance.offer_expiry_weeks,
            started_week: None,
            delivered: 0,
            period_start_week: week,
            missed_periods: 0,
        },
    );
    state.send_message(
        MessageCategory::Contract,
        format!("Offer from {client}"),
        describe_terms(&terms),
    );
    tracing::info!(contract = %id, client = %client, "contract offered");
    id
}

fn describe_terms(terms: &ContractTerms) -> String {
    match terms {
        ContractTerms::Retainer {
            weekly_fee,
            quota_per_period,
            period_weeks,
            term_weeks,
        } => format!(
            "Retainer: {weekly_fee} per week for {quota_per_period} report(s) every {period_weeks} weeks, over {term_weeks} weeks."
        ),
        ContractTerms::Consulting {
            fee,
            target: Some(player),
            deadline_week,
        } => format!("Consulting: {fee} for a report on {player} by week {deadline_week}."),
        ContractTerms::Consulting {
            fee,
            target: None,
            deadline_week,
        } => format!("Consulting: {fee} for any report by week {deadline_week}."),
    }
}

// ---------------------------------------------------------------------------
// Contract commands
// ---------------------------------------------------------------------------

fn pending_offer(state: &GameState, id: ContractId, retainer: bool) -> Result<&Contract, Rejection> {
    let contract = state
        .finances
        .contracts
        .get(&id)
        .ok_or(Rejection::UnknownContract(id))?;
    if contract.is_retainer() != retainer {
        return Err(Rejection::WrongContractKind {
            id,
            expected: if retainer { "retainer" } else { "consulting" },
        });
    }
    if contract.status != ContractStatus::Pending {
        return Err(Rejection::ContractState {
            id,
            status: contract.status,
            expected: "pending",
        });
    }
    Ok(contract)
}

fn activate(state: &mut GameState, id: ContractId) {
    let week = state.week.week;
    if let Some(contract) = state.finances.contracts.get_mut(&id) {
        contract.status = ContractStatus::Active;
        contract.started_week = Some(week);
        contract.period_start_week = week;
        tracing::info!(contract = %id, client = %contract.client, "contract accepted");
    }
}

pub fn accept_retainer(state: &mut GameState, config: &CareerConfig, id: ContractId) -> Result<(), Rejection> {
    pending_offer(state, id, true)?;
    let limit = config
        .finance
        .max_retainers
        .get(&state.scout.tier)
        .copied()
        .unwrap_or(0);
    if state.finances.live_retainers().count() >= limit {
        return Err(Rejection::SlotCapacity {
            what: "retainer",
            limit,
        });
    }
    activate(state, id);
    Ok(())
}

pub fn accept_consulting(state: &mut GameState, id: ContractId) -> Result<(), Rejection> {
    let contract = pending_offer(state, id, false)?;
    if let ContractTerms::Consulting {
        target: Some(player),
        ..
    } = contract.terms
    {
        if !state.players.get(&player).is_some_and(|p| p.is_available()) {
            return Err(Rejection::PlayerUnavailable(player));
        }
    }
    activate(state, id);
    Ok(())
}

pub fn decline_offer(state: &mut GameState, id: ContractId, retainer: bool) -> Result<(), Rejection> {
    pending_offer(state, id, retainer)?;
    set_status(state, id, ContractStatus::Cancelled);
    tracing::info!(contract = %id, "offer declined");
    Ok(())
}

pub fn cancel_retainer(state: &mut GameState, id: ContractId) -> Result<(), Rejection> {
    let contract = state
        .finances
        .contracts
        .get(&id)
        .ok_or(Rejection::UnknownContract(id))?;
    if !contract.is_retainer() {
        return Err(Rejection::WrongContractKind {
            id,
            expected: "retainer",
        });
    }
    if !contract.is_live() {
        return Err(Rejection::ContractState {
            id,
            status: contract.status,
            expected: "active or suspended",
        });
    }
    set_status(state, id, ContractStatus::Cancelled);
    tracing::info!(contract = %id, "retainer cancelled");
    Ok(())
}

// ---------------------------------------------------------------------------
// Loans
// ---------------------------------------------------------------------------

/// Fixed monthly payment that amortizes `principal` over `term_months`.
pub fn monthly_payment(principal: i64, annual_rate: f64, term_months: u32) -> i64 {
    let n = term_months.max(1) as f64;
    let r = annual_rate / 12.0;
    if r <= 0.0 {
        return (principal as f64 / n).ceil() as i64;
    }
    (principal as f64 * r / (1.0 - (1.0 + r).powf(-n))).ceil() as i64
}

pub fn take_loan(
    state: &mut GameState,
    config: &CareerConfig,
    loan_type: LoanType,
    amount: i64,
) -> Result<(), Rejection> {
    if amount <= 0 {
        return Err(Rejection::InvalidAmount(amount));
    }
    if state.finances.loan.is_some() {
        return Err(Rejection::LoanAlreadyActive);
    }
    let product = config
        .finance
        .loans
        .get(&loan_type)
        .ok_or(Rejection::UnknownLoanProduct(loan_type))?;
    if amount > product.max_amount {
        return Err(Ineligibility::AmountTooHigh {
            max: product.max_amount,
        }
        .into());
    }
    if state.finances.credit_score < product.min_credit_score {
        return Err(Ineligibility::CreditScoreTooLow {
            required: product.min_credit_score,
            current: state.finances.credit_score,
        }
        .into());
    }
    if state.finances.distress > product.max_distress {
        return Err(Ineligibility::DistressTooHigh {
            max: product.max_distress,
            current: state.finances.distress,
        }
        .into());
    }

    let week = state.week.week;
    let payment = monthly_payment(amount, product.annual_rate, product.term_months);
    state.finances.balance += amount;
    state.finances.loan = Some(Loan {
        loan_type,
        principal: amount,
        annual_rate: product.annual_rate,
        term_months: product.term_months,
        monthly_payment: payment,
        remaining_balance: amount,
        next_payment_week: week + config.finance.weeks_per_month,
        payments_made: 0,
        missed_payments: 0,
    });
    tracing::info!(loan_type = %loan_type, amount, payment, "loan taken");
    Ok(())
}

pub fn repay_loan(state: &mut GameState, config: &CareerConfig) -> Result<i64, Rejection> {
    let remaining = state
        .finances
        .loan
        .as_ref()
        .map(|l| l.remaining_balance)
        .ok_or(Rejection::NoActiveLoan)?;
    if !state.finances.can_afford(remaining) {
        return Err(Rejection::InsufficientFunds {
            required: remaining,
            available: state.finances.balance,
        });
    }
    state.finances.charge(ExpenseCategory::LoanRepayment, remaining);
    state.finances.loan = None;
    state.milestones.loans_repaid += 1;
    adjust_credit(state, config, config.finance.credit.early_repayment_bonus);
    tracing::info!(amount = remaining, "loan repaid early");
    Ok(remaining)
}

// ---------------------------------------------------------------------------
// Purchases: courses, travel, equipment, staff
// ---------------------------------------------------------------------------

fn require_funds(state: &GameState, amount: i64) -> Result<(), Rejection> {
    if state.finances.can_afford(amount) {
        Ok(())
    } else {
        Err(Rejection::InsufficientFunds {
            required: amount,
            available: state.finances.balance,
        })
    }
}

pub fn enroll_in_course(state: &mut GameState, config: &CareerConfig, course_id: &str) -> Result<(), Rejection> {
    let course = config
        .course(course_id)
        .ok_or_else(|| Rejection::UnknownCourse(course_id.to_string()))?;
    if state.scout.completed_courses.contains(course_id) {
        return Err(Rejection::CourseAlreadyCompleted(course_id.to_string()));
    }
    if let Some(current) = &state.scout.course {
        return Err(Rejection::AlreadyEnrolled(current.course_id.clone()));
    }
    if state.scout.tier < course.required_tier {
        return Err(Ineligibility::TierTooLow {
            required: course.required_tier,
            current: state.scout.tier,
        }
        .into());
    }
    if let Some(missing) = course
        .prerequisites
        .iter()
        .find(|p| !state.scout.completed_courses.contains(*p))
    {
        return Err(Ineligibility::MissingPrerequisite(missing.clone()).into());
    }
    require_funds(state, course.cost)?;

    state.finances.charge(ExpenseCategory::Courses, course.cost);
    state.scout.course = Some(CourseEnrollment {
        course_id: course.id.clone(),
        weeks_remaining: course.duration_weeks.max(1),
    });
    tracing::info!(course = %course.id, cost = course.cost, "enrolled in course");
    Ok(())
}

fn advance_course(ctx: &mut TickContext) {
    let config = ctx.config;
    let state = &mut *ctx.state;
    let Some(enrollment) = state.scout.course.as_mut() else {
        return;
    };
    enrollment.weeks_remaining = enrollment.weeks_remaining.saturating_sub(1);
    if enrollment.weeks_remaining > 0 {
        return;
    }
    let course_id = enrollment.course_id.clone();
    state.scout.course = None;
    let Some(course) = config.course(&course_id) else {
        tracing::warn!(course = %course_id, "completed course missing from catalogue");
        return;
    };

    let level = state.scout.skill(course.skill);
    state.scout.set_skill(course.skill, level.saturating_add(course.skill_levels));
    state.scout.completed_courses.insert(course_id.clone());
    state.milestones.courses_completed += 1;
    let mut body = format!("{} complete: {} skill raised.", course.name, course.skill);
    if let Some(tier) = course.promotes_to.filter(|t| *t > state.scout.tier) {
        state.scout.tier = tier;
        body.push_str(&format!(" You are now a {tier}."));
        tracing::info!(tier = %tier, "career tier promoted");
    }
    state.send_message(MessageCategory::Career, "Course completed", body);
    tracing::info!(course = %course_id, "course completed");
    ctx.emit(SignalKind::CourseCompleted { course_id });
}

/// Trip cost after the familiarity discount.
pub fn travel_cost(state: &GameState, config: &CareerConfig, country: &str) -> Option<i64> {
    let base = *config.travel.destinations.get(country)?;
    let familiarity = state.scout.familiarity(country) as f64 / 100.0;
    Some(money(base as f64 * (1.0 - config.travel.familiarity_discount * familiarity)))
}

pub fn book_travel(state: &mut GameState, config: &CareerConfig, country: &str) -> Result<(), Rejection> {
    let cost = travel_cost(state, config, country)
        .ok_or_else(|| Rejection::UnknownDestination(country.to_string()))?;
    if let Some(booking) = &state.scout.travel {
        return Err(Rejection::TravelAlreadyBooked(booking.country.clone()));
    }
    require_funds(state, cost)?;

    state.finances.charge(ExpenseCategory::Travel, cost);
    state.scout.travel = Some(TravelBooking {
        country: country.to_string(),
        week: state.week.week,
        cost,
    });
    tracing::info!(country, cost, "travel booked");
    Ok(())
}

pub fn purchase_equipment(state: &mut GameState, config: &CareerConfig, key: &str) -> Result<(), Rejection> {
    let def = config
        .equipment_def(key)
        .ok_or_else(|| Rejection::UnknownEquipment(key.to_string()))?;
    if state.finances.owns_equipment(key) {
        return Err(Rejection::AlreadyOwned(key.to_string()));
    }
    require_funds(state, def.cost)?;

    state.finances.charge(ExpenseCategory::Equipment, def.cost);
    state.finances.equipment.push(EquipmentItem {
        key: def.key.clone(),
        name: def.name.clone(),
        resale_value: def.resale_value,
        weekly_upkeep: def.weekly_upkeep,
    });
    tracing::info!(equipment = key, cost = def.cost, "equipment purchased");
    Ok(())
}

pub fn hire_staff(state: &mut GameState, config: &CareerConfig, role: StaffRole) -> Result<StaffId, Rejection> {
    let limit = config.finance.max_staff.get(&state.scout.tier).copied().unwrap_or(0);
    if state.finances.staff.len() >= limit {
        return Err(Rejection::SlotCapacity { what: "staff", limit });
    }
    let wage = config.finance.staff_wages.get(&role).copied().unwrap_or(0);
    require_funds(state, wage * config.finance.wage_reserve_weeks)?;

    let id: StaffId = state.id_gen.mint();
    let name = names::indexed_person_name(id.0);
    state.finances.staff.insert(
        id,
        StaffMember {
            id,
            name: name.clone(),
            role,
            weekly_wage: wage,
            hired_week: state.week.week,
        },
    );
    tracing::info!(staff = %id, role = %role, wage, "staff hired");
    Ok(id)
}

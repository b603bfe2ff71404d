use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::attribute::Discipline;
use super::finance::DistressLevel;
use super::report::Verdict;
use super::timestamp::GameDate;
use crate::id::{ChainId, ContractId, EventId, PlayerId, ReportId, RivalId};

/// How urgent an event's unresolved consequences are. Serialized as 0, 1 or 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Escalation {
    Normal,
    Escalating,
    Critical,
}

impl From<Escalation> for u8 {
    fn from(e: Escalation) -> u8 {
        match e {
            Escalation::Normal => 0,
            Escalation::Escalating => 1,
            Escalation::Critical => 2,
        }
    }
}

impl TryFrom<u8> for Escalation {
    type Error = String;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        match level {
            0 => Ok(Escalation::Normal),
            1 => Ok(Escalation::Escalating),
            2 => Ok(Escalation::Critical),
            other => Err(format!("escalation level out of range: {other}")),
        }
    }
}

/// Long-running conditions whose persistence drives escalation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    BudgetShortfall,
    MissedQuota,
    LoanArrears,
}

labelled_enum!(Condition {
    BudgetShortfall => "budget_shortfall",
    MissedQuota => "missed_quota",
    LoanArrears => "loan_arrears",
});

/// Every story beat the engine can raise, each with only the payload it needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NarrativeKind {
    BudgetShortfall { consecutive_weeks: u32, balance: i64 },
    DistressChanged { from: DistressLevel, to: DistressLevel },
    LoanPaymentMissed { amount: i64, missed_payments: u32 },
    RetainerSuspended { contract_id: ContractId, client: String },
    RivalClosingIn { rival_id: RivalId, player_id: PlayerId, progress: u32, threshold: u32 },
    PlayerSigned { rival_id: RivalId, player_id: PlayerId },
    ReportReviewed { report_id: ReportId, player_id: PlayerId, verdict: Verdict, reputation_delta: f64 },
    ExhaustionWarning { fatigue: u8 },
    CourseCompleted { course_id: String },
    ContractOffer { contract_id: ContractId, client: String },
    MediaScrutiny { report_id: ReportId, player_id: PlayerId },
    Mentorship { mentor: String },
}

impl NarrativeKind {
    /// The persisting condition this event reports on, if any.
    pub fn condition(&self) -> Option<Condition> {
        match self {
            NarrativeKind::BudgetShortfall { .. } => Some(Condition::BudgetShortfall),
            NarrativeKind::RetainerSuspended { .. } => Some(Condition::MissedQuota),
            NarrativeKind::LoanPaymentMissed { .. } => Some(Condition::LoanArrears),
            NarrativeKind::DistressChanged { .. }
            | NarrativeKind::RivalClosingIn { .. }
            | NarrativeKind::PlayerSigned { .. }
            | NarrativeKind::ReportReviewed { .. }
            | NarrativeKind::ExhaustionWarning { .. }
            | NarrativeKind::CourseCompleted { .. }
            | NarrativeKind::ContractOffer { .. }
            | NarrativeKind::MediaScrutiny { .. }
            | NarrativeKind::Mentorship { .. } => None,
        }
    }

    pub fn chain_kind(&self) -> Option<ChainKind> {
        match self {
            NarrativeKind::MediaScrutiny { .. } => Some(ChainKind::MediaScrutiny),
            NarrativeKind::Mentorship { .. } => Some(ChainKind::Mentorship),
            _ => None,
        }
    }
}

/// A concrete consequence of a narrative choice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NarrativeEffect {
    AdjustBalance { amount: i64 },
    AdjustReputation { delta: f64 },
    AdjustFatigue { delta: i16 },
    AdjustCreditScore { delta: i32 },
    GrantXp { discipline: Discipline, xp: u32 },
    StallRival { rival_id: RivalId, weeks: u32 },
    WatchPlayer { player_id: PlayerId },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrativeChoice {
    pub label: String,
    pub effects: Vec<NarrativeEffect>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum EventStatus {
    /// Triggered; waiting on a choice (if any) or an acknowledgement.
    Open,
    Acknowledged,
    Resolved { choice: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainLink {
    pub chain_id: ChainId,
    /// 1-based position within the chain.
    pub step: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrativeEvent {
    pub id: EventId,
    pub date: GameDate,
    pub kind: NarrativeKind,
    pub chain: Option<ChainLink>,
    pub escalation: Escalation,
    pub headline: String,
    pub body: String,
    pub choices: Vec<NarrativeChoice>,
    pub status: EventStatus,
}

impl NarrativeEvent {
    pub fn is_open(&self) -> bool {
        self.status == EventStatus::Open
    }

    pub fn awaiting_choice(&self) -> bool {
        self.is_open() && !self.choices.is_empty()
    }

    pub fn selected_choice(&self) -> Option<usize> {
        match self.status {
            EventStatus::Resolved { choice } => Some(choice),
            EventStatus::Open | EventStatus::Acknowledged => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChainKind {
    MediaScrutiny,
    Mentorship,
}

labelled_enum!(ChainKind {
    MediaScrutiny => "media_scrutiny",
    Mentorship => "mentorship",
});

/// Bookkeeping for a sequence of linked events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventChain {
    pub id: ChainId,
    pub kind: ChainKind,
    /// Payload shared by every step.
    pub subject: NarrativeKind,
    pub max_steps: u32,
    /// Steps emitted so far.
    pub current_step: u32,
    /// Choice index picked at each resolved step, in order.
    pub choice_history: Vec<usize>,
    pub next_step_at: Option<GameDate>,
    pub closed: bool,
    pub started: GameDate,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NarrativeState {
    pub events: BTreeMap<EventId, NarrativeEvent>,
    pub chains: BTreeMap<ChainId, EventChain>,
    /// Consecutive weeks each condition has persisted.
    pub conditions: BTreeMap<Condition, u32>,
}

impl NarrativeState {
    /// Events still waiting on the player, oldest first.
    pub fn open_events(&self) -> impl Iterator<Item = &NarrativeEvent> {
        self.events.values().filter(|e| e.is_open())
    }

    pub fn condition_weeks(&self, condition: Condition) -> u32 {
        self.conditions.get(&condition).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escalation_serializes_as_number() {
        assert_eq!(serde_json::to_value(Escalation::Critical).unwrap(), 2);
        let back: Escalation = serde_json::from_value(serde_json::json!(1)).unwrap();
        assert_eq!(back, Escalation::Escalating);
        assert!(serde_json::from_value::<Escalation>(serde_json::json!(3)).is_err());
    }

    #[test]
    fn kind_is_tagged() {
        let kind = NarrativeKind::PlayerSigned {
            rival_id: RivalId(3),
            player_id: PlayerId(8),
        };
        let json = serde_json::to_value(&kind).unwrap();
        assert_eq!(json["type"], "player_signed");
        assert_eq!(json["player_id"], 8);
    }

    #[test]
    fn only_condition_events_map_to_conditions() {
        let shortfall = NarrativeKind::BudgetShortfall {
            consecutive_weeks: 2,
            balance: -10,
        };
        assert_eq!(shortfall.condition(), Some(Condition::BudgetShortfall));
        let mentor = NarrativeKind::Mentorship {
            mentor: "Old Hand".into(),
        };
        assert_eq!(mentor.condition(), None);
        assert_eq!(mentor.chain_kind(), Some(ChainKind::Mentorship));
    }
}

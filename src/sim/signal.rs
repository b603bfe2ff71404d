use serde::{Deserialize, Serialize};

use crate::id::{ContractId, PlayerId, ReportId, RivalId};
use crate::model::{Conviction, Discipline, DistressLevel, GameDate, Verdict};

/// A signal emitted by one system and consumed by others.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    /// The day the signal was raised on.
    pub date: GameDate,
    /// What happened.
    pub kind: SignalKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SignalKind {
    /// Fatigue crossed the exhaustion threshold during a day.
    FatigueExhausted { fatigue: u8 },

    /// A networking or tournament contact produced a contract offer.
    OfferReceived { contract_id: ContractId, client: String },

    /// A skill discipline gained a level.
    SkillLevelled { discipline: Discipline, level: u8 },

    /// A course finished and its rewards were applied.
    CourseCompleted { course_id: String },

    /// The weekly statement closed with a negative balance.
    BudgetShortfall { consecutive_weeks: u32, balance: i64 },

    /// The distress ladder moved one rung.
    DistressChanged { from: DistressLevel, to: DistressLevel },

    /// A scheduled loan payment could not be covered.
    LoanPaymentMissed { amount: i64, missed_payments: u32 },

    /// A retainer was suspended for missed quotas.
    RetainerSuspended { contract_id: ContractId, client: String },

    /// A report came back from review.
    ReportReviewed {
        report_id: ReportId,
        player_id: PlayerId,
        conviction: Conviction,
        verdict: Verdict,
        reputation_delta: f64,
    },

    /// A rival is one step away from signing a player the scout tracks.
    RivalClosingIn {
        rival_id: RivalId,
        player_id: PlayerId,
        progress: u32,
        threshold: u32,
    },

    /// A rival signed a player. Irreversible.
    PlayerSigned { rival_id: RivalId, player_id: PlayerId },
}

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::attribute::AttributeId;
use super::observation::AttributeReading;
use super::timestamp::GameDate;
use crate::id::{ObservationId, PlayerId, ReportId};

/// How hard the scout is banging the drum. Higher conviction earns more when
/// right and costs more when wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Conviction {
    Note,
    Recommend,
    StrongRecommend,
    TablePound,
}

labelled_enum!(Conviction {
    Note => "note",
    Recommend => "recommend",
    StrongRecommend => "strong_recommend",
    TablePound => "table_pound",
});

impl Conviction {
    /// Recommend and above put the scout's name behind a signing.
    pub fn is_recommendation(self) -> bool {
        self >= Conviction::Recommend
    }
}

/// A submitted report. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub id: ReportId,
    pub player_id: PlayerId,
    pub submitted: GameDate,
    pub conviction: Conviction,
    pub summary: String,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    /// Merged readings at submission time. Attributes never observed are absent.
    pub readings: BTreeMap<AttributeId, AttributeReading>,
    /// Newest observation the readings were merged from.
    pub latest_observation: ObservationId,
    pub sale_value: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Vindicated,
    ProvenWrong,
}

/// The later judgement on a report, kept apart from the report itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportReview {
    pub report_id: ReportId,
    pub reviewed: GameDate,
    /// 1.0 is a perfect read of every reported attribute.
    pub accuracy: f64,
    pub verdict: Verdict,
    pub reputation_delta: f64,
}

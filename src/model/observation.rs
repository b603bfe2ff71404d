use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::attribute::{AttributeId, AttributeScale};
use super::timestamp::GameDate;
use crate::id::{ObservationId, PlayerId};

/// Things a scout can spend a day on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    AttendMatch,
    VideoAnalysis,
    TrainingGround,
    YouthTournament,
    InternationalTrip,
    ReportWriting,
    Networking,
    SkillTraining,
}

labelled_enum!(ActivityKind {
    AttendMatch => "attend_match",
    VideoAnalysis => "video_analysis",
    TrainingGround => "training_ground",
    YouthTournament => "youth_tournament",
    InternationalTrip => "international_trip",
    ReportWriting => "report_writing",
    Networking => "networking",
    SkillTraining => "skill_training",
});

/// One sampled attribute: what the scout thinks they saw and how sure they are.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttributeReading {
    pub attribute: AttributeId,
    pub perceived_value: i32,
    /// 0.0–1.0.
    pub confidence: f64,
}

/// Readings gathered during one activity for one player. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub id: ObservationId,
    pub player_id: PlayerId,
    pub date: GameDate,
    pub activity: ActivityKind,
    pub readings: Vec<AttributeReading>,
}

/// Read-time merge of every observation of one player.
///
/// Keeps the single highest-confidence reading per attribute (earliest wins
/// a tie) and counts how often each attribute has been sampled. Attributes
/// never sampled are simply absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerceivedProfile {
    readings: BTreeMap<AttributeId, AttributeReading>,
    counts: BTreeMap<AttributeId, u32>,
}

impl PerceivedProfile {
    pub fn merge<'a>(observations: impl IntoIterator<Item = &'a Observation>) -> Self {
        let mut profile = Self::default();
        for obs in observations {
            for reading in &obs.readings {
                profile.absorb(*reading);
            }
        }
        profile
    }

    fn absorb(&mut self, reading: AttributeReading) {
        *self.counts.entry(reading.attribute).or_insert(0) += 1;
        match self.readings.get(&reading.attribute) {
            Some(best) if best.confidence >= reading.confidence => {}
            _ => {
                self.readings.insert(reading.attribute, reading);
            }
        }
    }

    pub fn get(&self, attribute: AttributeId) -> Option<&AttributeReading> {
        self.readings.get(&attribute)
    }

    pub fn confidence(&self, attribute: AttributeId) -> Option<f64> {
        self.get(attribute).map(|r| r.confidence)
    }

    /// Number of independent samples recorded for `attribute`.
    pub fn observation_count(&self, attribute: AttributeId) -> u32 {
        self.counts.get(&attribute).copied().unwrap_or(0)
    }

    pub fn readings(&self) -> &BTreeMap<AttributeId, AttributeReading> {
        &self.readings
    }

    pub fn known_count(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Fraction of all attributes with at least one reading.
    pub fn coverage(&self) -> f64 {
        self.readings.len() as f64 / AttributeId::ALL.len() as f64
    }

    pub fn mean_confidence(&self) -> f64 {
        if self.readings.is_empty() {
            return 0.0;
        }
        self.readings.values().map(|r| r.confidence).sum::<f64>() / self.readings.len() as f64
    }

    /// Mean perceived value on 0.0–1.0 over known attributes only.
    /// `None` when nothing is known; unknown is not zero.
    pub fn estimated_ability(&self, scale: &AttributeScale) -> Option<f64> {
        if self.readings.is_empty() {
            return None;
        }
        let sum: f64 = self
            .readings
            .values()
            .map(|r| scale.normalize(r.perceived_value as f64))
            .sum();
        Some(sum / self.readings.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(id: u64, readings: &[(AttributeId, i32, f64)]) -> Observation {
        Observation {
            id: ObservationId(id),
            player_id: PlayerId(1),
            date: GameDate::new(1, 0),
            activity: ActivityKind::AttendMatch,
            readings: readings
                .iter()
                .map(|(a, v, c)| AttributeReading {
                    attribute: *a,
                    perceived_value: *v,
                    confidence: *c,
                })
                .collect(),
        }
    }

    #[test]
    fn merge_keeps_highest_confidence_never_averages() {
        let a = obs(1, &[(AttributeId::Finishing, 12, 0.4)]);
        let b = obs(2, &[(AttributeId::Finishing, 17, 0.7)]);
        let c = obs(3, &[(AttributeId::Finishing, 9, 0.5)]);
        let profile = PerceivedProfile::merge([&a, &b, &c]);
        let best = profile.get(AttributeId::Finishing).unwrap();
        assert_eq!(best.perceived_value, 17);
        assert_eq!(best.confidence, 0.7);
        assert_eq!(profile.observation_count(AttributeId::Finishing), 3);
    }

    #[test]
    fn tie_keeps_earliest() {
        let a = obs(1, &[(AttributeId::Pace, 10, 0.5)]);
        let b = obs(2, &[(AttributeId::Pace, 14, 0.5)]);
        let profile = PerceivedProfile::merge([&a, &b]);
        assert_eq!(profile.get(AttributeId::Pace).unwrap().perceived_value, 10);
    }

    #[test]
    fn unobserved_attributes_are_unknown() {
        let a = obs(1, &[(AttributeId::Pace, 20, 0.5)]);
        let profile = PerceivedProfile::merge([&a]);
        assert!(profile.get(AttributeId::Marking).is_none());
        assert_eq!(profile.observation_count(AttributeId::Marking), 0);
        // Ability is computed over known attributes, not padded with zeros.
        let ability = profile.estimated_ability(&AttributeScale::default()).unwrap();
        assert!((ability - 1.0).abs() < 1e-9);
    }

    #[test]
    fn empty_profile_has_no_ability() {
        let profile = PerceivedProfile::merge(std::iter::empty());
        assert!(profile.estimated_ability(&AttributeScale::default()).is_none());
        assert_eq!(profile.mean_confidence(), 0.0);
    }
}

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::attribute::{AttributeId, AttributeScale};
use super::timestamp::GameDate;
use crate::id::{PlayerId, RivalId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    Goalkeeper,
    Defender,
    Midfielder,
    Forward,
}

labelled_enum!(Position {
    Goalkeeper => "goalkeeper",
    Defender => "defender",
    Midfielder => "midfielder",
    Forward => "forward",
});

/// Whether a player can still be scouted. Signing is one-way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Availability {
    Available,
    Signed { rival: RivalId, date: GameDate },
}

/// A scoutable individual. Identity and true attributes are fixed at creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub age: u8,
    pub position: Position,
    pub country: String,
    /// Media attention, 0.0–1.0. Aggressive rivals chase it.
    pub buzz: f64,
    /// Hidden ground truth. Only the observation model and report reviews read it.
    pub(crate) true_attributes: BTreeMap<AttributeId, i32>,
    pub availability: Availability,
}

impl Player {
    pub fn new(
        id: PlayerId,
        name: String,
        age: u8,
        position: Position,
        country: String,
        buzz: f64,
        true_attributes: BTreeMap<AttributeId, i32>,
    ) -> Self {
        Self {
            id,
            name,
            age,
            position,
            country,
            buzz: buzz.clamp(0.0, 1.0),
            true_attributes,
            availability: Availability::Available,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self.availability, Availability::Available)
    }

    pub fn signed_by(&self) -> Option<RivalId> {
        match self.availability {
            Availability::Signed { rival, .. } => Some(rival),
            Availability::Available => None,
        }
    }

    pub(crate) fn true_value(&self, attribute: AttributeId) -> Option<i32> {
        self.true_attributes.get(&attribute).copied()
    }

    /// Mean true attribute on 0.0–1.0. Used by rivals, whose own judgement
    /// is modelled as a noisy view of this.
    pub(crate) fn true_ability(&self, scale: &AttributeScale) -> f64 {
        if self.true_attributes.is_empty() {
            return 0.0;
        }
        let sum: f64 = self
            .true_attributes
            .values()
            .map(|v| scale.normalize(*v as f64))
            .sum();
        sum / self.true_attributes.len() as f64
    }

    pub fn is_youth(&self) -> bool {
        self.age <= 21
    }
}

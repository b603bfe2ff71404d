use serde::{Deserialize, Serialize};

/// Broad family an attribute belongs to. Activities expose domains, not
/// individual attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Technical,
    Physical,
    Mental,
    Tactical,
}

labelled_enum!(Domain {
    Technical => "technical",
    Physical => "physical",
    Mental => "mental",
    Tactical => "tactical",
});

impl Domain {
    /// Attributes in this domain, in declaration order.
    pub fn attributes(self) -> impl Iterator<Item = AttributeId> {
        AttributeId::ALL
            .iter()
            .copied()
            .filter(move |a| a.domain() == self)
    }

    /// The scout discipline that governs reading accuracy in this domain.
    pub fn discipline(self) -> Discipline {
        match self {
            Domain::Technical => Discipline::Technical,
            Domain::Physical => Discipline::Physical,
            Domain::Mental => Discipline::Mental,
            Domain::Tactical => Discipline::Tactical,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeId {
    Finishing,
    Passing,
    Dribbling,
    FirstTouch,
    Crossing,
    Pace,
    Stamina,
    Strength,
    Agility,
    Composure,
    Decisions,
    WorkRate,
    Leadership,
    Positioning,
    OffTheBall,
    Marking,
}

labelled_enum!(AttributeId {
    Finishing => "finishing",
    Passing => "passing",
    Dribbling => "dribbling",
    FirstTouch => "first_touch",
    Crossing => "crossing",
    Pace => "pace",
    Stamina => "stamina",
    Strength => "strength",
    Agility => "agility",
    Composure => "composure",
    Decisions => "decisions",
    WorkRate => "work_rate",
    Leadership => "leadership",
    Positioning => "positioning",
    OffTheBall => "off_the_ball",
    Marking => "marking",
});

impl AttributeId {
    pub fn domain(self) -> Domain {
        use AttributeId::*;
        match self {
            Finishing | Passing | Dribbling | FirstTouch | Crossing => Domain::Technical,
            Pace | Stamina | Strength | Agility => Domain::Physical,
            Composure | Decisions | WorkRate | Leadership => Domain::Mental,
            Positioning | OffTheBall | Marking => Domain::Tactical,
        }
    }
}

/// Scout skill tracks. The first four mirror [`Domain`]; the rest are
/// career skills that never produce readings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Discipline {
    Technical,
    Physical,
    Mental,
    Tactical,
    Networking,
    Analysis,
}

labelled_enum!(Discipline {
    Technical => "technical",
    Physical => "physical",
    Mental => "mental",
    Tactical => "tactical",
    Networking => "networking",
    Analysis => "analysis",
});

/// Inclusive bounds of the attribute scale. Defaults to the 0–20 range the
/// tables use, but any bounded integer scale works.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeScale {
    pub min: i32,
    pub max: i32,
}

impl AttributeScale {
    pub fn new(min: i32, max: i32) -> Self {
        assert!(min < max, "attribute scale must have min < max, got {min}..={max}");
        Self { min, max }
    }

    pub fn span(&self) -> f64 {
        (self.max - self.min) as f64
    }

    pub fn clamp(&self, value: i32) -> i32 {
        value.clamp(self.min, self.max)
    }

    /// Map a value on this scale to 0.0..=1.0.
    pub fn normalize(&self, value: f64) -> f64 {
        ((value - self.min as f64) / self.span()).clamp(0.0, 1.0)
    }
}

impl Default for AttributeScale {
    fn default() -> Self {
        Self { min: 0, max: 20 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_attribute_has_one_domain() {
        let total: usize = Domain::ALL.iter().map(|d| d.attributes().count()).sum();
        assert_eq!(total, AttributeId::ALL.len());
        assert_eq!(Domain::Technical.attributes().count(), 5);
        assert_eq!(Domain::Tactical.attributes().count(), 3);
    }

    #[test]
    fn labels_match_serde() {
        for attr in AttributeId::ALL {
            let json = serde_json::to_value(attr).unwrap();
            assert_eq!(json, attr.as_str());
            assert_eq!(attr.as_str().parse::<AttributeId>().unwrap(), *attr);
        }
    }

    #[test]
    fn scale_clamps_and_normalizes() {
        let scale = AttributeScale::new(1, 100);
        assert_eq!(scale.clamp(150), 100);
        assert_eq!(scale.clamp(-3), 1);
        assert!((scale.normalize(50.5) - 0.5).abs() < 1e-9);
    }
}

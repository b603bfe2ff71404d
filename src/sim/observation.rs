//! Attribute observation model.
//!
//! Turns one activity's view of a player into noisy [`AttributeReading`]s. The
//! whole noise/confidence law lives in [`score_reading`] so it can be tested
//! without a scheduler around it.

use rand::seq::IndexedRandom;
use rand::{Rng, RngCore};

use crate::config::{ActivityProfile, CareerConfig, ObservationConfig};
use crate::model::{
    AttributeId, AttributeReading, AttributeScale, Domain, Player, PerceivedProfile, Scout,
};
use crate::model::scout::MAX_FATIGUE;

/// Inputs to the reading scorer for one attribute.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReadingInputs {
    /// Observer skill in the attribute's discipline.
    pub skill: u8,
    pub fatigue: u8,
    /// Effective activity quality, 0.0–1.0.
    pub quality: f64,
    /// Readings of this attribute already on record for the player.
    pub prior_count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReadingScore {
    pub confidence: f64,
    /// Half-width of the uniform noise band, in attribute points.
    pub noise_amplitude: f64,
}

/// Confidence and noise for one reading.
///
/// Confidence rises with quality and skill, falls with fatigue, and each prior
/// reading of the same attribute removes a fixed share of the remaining doubt.
/// Noise shrinks with skill and quality and grows with fatigue.
pub fn score_reading(cfg: &ObservationConfig, scale: &AttributeScale, inputs: ReadingInputs) -> ReadingScore {
    let skill = (inputs.skill as f64 / cfg.max_skill.max(1) as f64).clamp(0.0, 1.0);
    let fatigue = (inputs.fatigue as f64 / MAX_FATIGUE as f64).clamp(0.0, 1.0);
    let quality = inputs.quality.clamp(0.0, 1.0);

    let base = quality
        * (cfg.skill_confidence_floor + (1.0 - cfg.skill_confidence_floor) * skill)
        * (1.0 - cfg.fatigue_confidence_penalty * fatigue);
    let doubt = (1.0 - base) * (1.0 - cfg.repeat_gain).powi(inputs.prior_count as i32);
    let confidence = (1.0 - doubt).clamp(0.0, 1.0);

    let noise_amplitude = cfg.noise_fraction
        * scale.span()
        * (1.0 - cfg.skill_noise_dampening * skill)
        * (1.0 + cfg.fatigue_noise_growth * fatigue)
        * (1.0 - cfg.quality_noise_dampening * quality);

    ReadingScore {
        confidence,
        noise_amplitude: noise_amplitude.max(0.0),
    }
}

/// Draw a perceived value from a true one, clamped to the scale.
pub fn perceive(true_value: i32, amplitude: f64, scale: &AttributeScale, rng: &mut dyn RngCore) -> i32 {
    let noise = if amplitude > 0.0 {
        rng.random_range(-amplitude..=amplitude)
    } else {
        0.0
    };
    scale.clamp((true_value as f64 + noise).round() as i32)
}

/// The attributes one day of this activity samples, in attribute order.
///
/// A domain with zero slots yields nothing; a domain with at least as many slots
/// as attributes yields all of them.
pub fn sampled_attributes(profile: &ActivityProfile, rng: &mut dyn RngCore) -> Vec<AttributeId> {
    let mut picked = Vec::new();
    for domain in Domain::ALL {
        let slots = profile.slots_for(*domain) as usize;
        if slots == 0 {
            continue;
        }
        let pool: Vec<AttributeId> = domain.attributes().collect();
        if slots >= pool.len() {
            picked.extend(pool);
        } else {
            picked.extend(pool.choose_multiple(&mut *rng, slots).copied());
        }
    }
    picked.sort();
    picked
}

/// Who is looking, and how well they can see.
#[derive(Debug, Clone, Copy)]
pub struct Observer<'a> {
    pub scout: &'a Scout,
    /// Levels subtracted from the scout's skill (assistants observe below the scout).
    pub skill_gap: u8,
    /// Quality after equipment, familiarity and observer adjustments.
    pub quality: f64,
}

/// Produce the readings one observer gets of one player.
///
/// `known` is the player's merged profile so far; it supplies the prior count
/// per attribute. Attributes the player has no true value for are skipped.
pub fn observe_player(
    config: &CareerConfig,
    observer: Observer<'_>,
    player: &Player,
    attributes: &[AttributeId],
    known: &PerceivedProfile,
    rng: &mut dyn RngCore,
) -> Vec<AttributeReading> {
    let scale = &config.attribute_scale;
    attributes
        .iter()
        .filter_map(|attribute| {
            let true_value = player.true_value(*attribute)?;
            let skill = observer
                .scout
                .skill(attribute.domain().discipline())
                .saturating_sub(observer.skill_gap);
            let score = score_reading(
                &config.observation,
                scale,
                ReadingInputs {
                    skill,
                    fatigue: observer.scout.fatigue,
                    quality: observer.quality,
                    prior_count: known.observation_count(*attribute),
                },
            );
            Some(AttributeReading {
                attribute: *attribute,
                perceived_value: perceive(true_value, score.noise_amplitude, scale, rng),
                confidence: score.confidence,
            })
        })
        .collect()
}

/// Activity quality for a player, after equipment and country familiarity.
pub fn effective_quality(config: &CareerConfig, profile: &ActivityProfile, equipment_bonus: f64, familiarity: u8) -> f64 {
    let familiarity_bonus = config.observation.familiarity_quality_bonus * familiarity as f64 / 100.0;
    let bonus = (equipment_bonus + familiarity_bonus).min(config.observation.max_quality_bonus);
    (profile.quality + bonus).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::id::PlayerId;
    use crate::model::{ActivityKind, Position};

    fn inputs(skill: u8, fatigue: u8) -> ReadingInputs {
        ReadingInputs {
            skill,
            fatigue,
            quality: 0.7,
            prior_count: 0,
        }
    }

    fn score(i: ReadingInputs) -> ReadingScore {
        score_reading(&ObservationConfig::default(), &AttributeScale::default(), i)
    }

    #[test]
    fn confidence_rises_with_skill() {
        let low = score(inputs(5, 20)).confidence;
        let mid = score(inputs(10, 20)).confidence;
        let high = score(inputs(15, 20)).confidence;
        assert!(low < mid && mid < high, "{low} {mid} {high}");
    }

    #[test]
    fn fatigue_lowers_confidence_and_widens_noise() {
        let fresh = score(inputs(10, 0));
        let tired = score(inputs(10, 90));
        assert!(tired.confidence < fresh.confidence);
        assert!(tired.noise_amplitude > fresh.noise_amplitude);
    }

    #[test]
    fn skill_narrows_noise() {
        assert!(score(inputs(18, 20)).noise_amplitude < score(inputs(4, 20)).noise_amplitude);
    }

    #[test]
    fn repeats_raise_confidence_but_stay_capped() {
        let mut previous = 0.0;
        for prior in 0..40 {
            let c = score(ReadingInputs {
                prior_count: prior,
                ..inputs(10, 20)
            })
            .confidence;
            assert!(c >= previous);
            assert!(c <= 1.0);
            previous = c;
        }
        assert!(previous > 0.99);
    }

    #[test]
    fn perceive_stays_on_scale() {
        let scale = AttributeScale::new(0, 20);
        let mut rng = SmallRng::seed_from_u64(3);
        for _ in 0..500 {
            let v = perceive(19, 6.0, &scale, &mut rng);
            assert!((0..=20).contains(&v));
            let w = perceive(1, 6.0, &scale, &mut rng);
            assert!((0..=20).contains(&w));
        }
        assert_eq!(perceive(12, 0.0, &scale, &mut rng), 12);
    }

    #[test]
    fn zero_slot_domains_are_skipped() {
        let config = CareerConfig::default();
        let profile = config.activity(ActivityKind::VideoAnalysis);
        let mut rng = SmallRng::seed_from_u64(9);
        let attrs = sampled_attributes(profile, &mut rng);
        assert!(attrs.iter().all(|a| a.domain() != Domain::Physical));
        assert_eq!(attrs.len(), 3 + 3 + 1);
        // Tactical has exactly three attributes, so all are sampled.
        assert_eq!(attrs.iter().filter(|a| a.domain() == Domain::Tactical).count(), 3);
    }

    #[test]
    fn non_observing_activity_samples_nothing() {
        let config = CareerConfig::default();
        let mut rng = SmallRng::seed_from_u64(9);
        assert!(sampled_attributes(config.activity(ActivityKind::Networking), &mut rng).is_empty());
    }

    #[test]
    fn observe_player_reads_within_band() {
        let config = CareerConfig::default();
        let mut scout = Scout::new("Test".into(), 10, 10.0);
        scout.fatigue = 20;
        let player = Player::new(
            PlayerId(1),
            "Target".into(),
            19,
            Position::Forward,
            "england".into(),
            0.5,
            BTreeMap::from([(AttributeId::Finishing, 15)]),
        );
        let observer = Observer {
            scout: &scout,
            skill_gap: 0,
            quality: 0.7,
        };
        let mut rng = SmallRng::seed_from_u64(11);
        let readings = observe_player(
            &config,
            observer,
            &player,
            &[AttributeId::Finishing, AttributeId::Pace],
            &PerceivedProfile::default(),
            &mut rng,
        );
        // Pace has no true value on this player and is skipped.
        assert_eq!(readings.len(), 1);
        let amp = score(inputs(10, 20)).noise_amplitude;
        assert!((readings[0].perceived_value - 15).abs() as f64 <= amp.ceil());
    }
}

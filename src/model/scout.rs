use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::attribute::Discipline;
use crate::id::PlayerId;

pub const MIN_SKILL: u8 = 1;
pub const MAX_SKILL: u8 = 20;
pub const MAX_FATIGUE: u8 = 100;
pub const MAX_REPUTATION: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CareerTier {
    Freelance,
    ClubScout,
    HeadScout,
    Director,
}

labelled_enum!(CareerTier {
    Freelance => "freelance",
    ClubScout => "club_scout",
    HeadScout => "head_scout",
    Director => "director",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillLevel {
    pub level: u8,
    /// XP banked toward the next level.
    pub xp: u32,
}

impl SkillLevel {
    pub fn new(level: u8) -> Self {
        Self {
            level: level.clamp(MIN_SKILL, MAX_SKILL),
            xp: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelBooking {
    pub country: String,
    /// The week the trip covers; the booking lapses when that week finalizes.
    pub week: u32,
    pub cost: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseEnrollment {
    pub course_id: String,
    pub weeks_remaining: u32,
}

/// The player character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scout {
    pub name: String,
    pub skills: BTreeMap<Discipline, SkillLevel>,
    pub fatigue: u8,
    pub reputation: f64,
    pub tier: CareerTier,
    /// Country key to familiarity, 0–100.
    pub country_familiarity: BTreeMap<String, u8>,
    pub travel: Option<TravelBooking>,
    pub watchlist: BTreeSet<PlayerId>,
    pub course: Option<CourseEnrollment>,
    pub completed_courses: BTreeSet<String>,
}

impl Scout {
    pub fn new(name: String, starting_skill: u8, reputation: f64) -> Self {
        let skills = Discipline::ALL
            .iter()
            .map(|d| (*d, SkillLevel::new(starting_skill)))
            .collect();
        Self {
            name,
            skills,
            fatigue: 0,
            reputation: reputation.clamp(0.0, MAX_REPUTATION),
            tier: CareerTier::Freelance,
            country_familiarity: BTreeMap::new(),
            travel: None,
            watchlist: BTreeSet::new(),
            course: None,
            completed_courses: BTreeSet::new(),
        }
    }

    pub fn skill(&self, discipline: Discipline) -> u8 {
        self.skills
            .get(&discipline)
            .map(|s| s.level)
            .unwrap_or(MIN_SKILL)
    }

    pub fn set_skill(&mut self, discipline: Discipline, level: u8) {
        self.skills
            .entry(discipline)
            .or_insert_with(|| SkillLevel::new(MIN_SKILL))
            .level = level.clamp(MIN_SKILL, MAX_SKILL);
    }

    /// Bank XP and level up while enough is banked. Each level costs
    /// `level * xp_per_level`. Returns the new level if it changed.
    pub fn grant_xp(&mut self, discipline: Discipline, xp: u32, xp_per_level: u32) -> Option<u8> {
        let skill = self
            .skills
            .entry(discipline)
            .or_insert_with(|| SkillLevel::new(MIN_SKILL));
        let before = skill.level;
        skill.xp += xp;
        while skill.level < MAX_SKILL {
            let cost = skill.level as u32 * xp_per_level.max(1);
            if skill.xp < cost {
                break;
            }
            skill.xp -= cost;
            skill.level += 1;
        }
        if skill.level == MAX_SKILL {
            skill.xp = 0;
        }
        (skill.level != before).then_some(skill.level)
    }

    /// Apply a fatigue change, clamped to 0–100. Returns the delta actually applied.
    pub fn adjust_fatigue(&mut self, delta: i16) -> i16 {
        let before = self.fatigue as i16;
        let after = (before + delta).clamp(0, MAX_FATIGUE as i16);
        self.fatigue = after as u8;
        after - before
    }

    /// Apply a reputation change, clamped to 0–100. Returns the delta actually applied.
    pub fn adjust_reputation(&mut self, delta: f64) -> f64 {
        let before = self.reputation;
        self.reputation = (before + delta).clamp(0.0, MAX_REPUTATION);
        self.reputation - before
    }

    pub fn familiarity(&self, country: &str) -> u8 {
        self.country_familiarity.get(country).copied().unwrap_or(0)
    }

    pub fn raise_familiarity(&mut self, country: &str, amount: u8) {
        let entry = self
            .country_familiarity
            .entry(country.to_string())
            .or_insert(0);
        *entry = entry.saturating_add(amount).min(100);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grant_xp_levels_up_and_carries_remainder() {
        let mut scout = Scout::new("Test".into(), 5, 10.0);
        // Level 5 costs 5 * 10 = 50, level 6 costs 60.
        let new_level = scout.grant_xp(Discipline::Technical, 100, 10);
        assert_eq!(new_level, Some(6));
        assert_eq!(scout.skills[&Discipline::Technical].xp, 50);
        assert_eq!(scout.grant_xp(Discipline::Technical, 10, 10), Some(7));
        assert_eq!(scout.skills[&Discipline::Technical].xp, 0);
    }

    #[test]
    fn grant_xp_caps_at_max_skill() {
        let mut scout = Scout::new("Test".into(), 19, 10.0);
        assert_eq!(scout.grant_xp(Discipline::Mental, 100_000, 10), Some(MAX_SKILL));
        assert_eq!(scout.grant_xp(Discipline::Mental, 100_000, 10), None);
        assert_eq!(scout.skill(Discipline::Mental), MAX_SKILL);
    }

    #[test]
    fn fatigue_and_reputation_clamp() {
        let mut scout = Scout::new("Test".into(), 5, 95.0);
        assert_eq!(scout.adjust_fatigue(130), 100);
        assert_eq!(scout.adjust_fatigue(-250), -100);
        assert!((scout.adjust_reputation(10.0) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn familiarity_saturates_at_100() {
        let mut scout = Scout::new("Test".into(), 5, 0.0);
        scout.raise_familiarity("brazil", 80);
        scout.raise_familiarity("brazil", 80);
        assert_eq!(scout.familiarity("brazil"), 100);
        assert_eq!(scout.familiarity("japan"), 0);
    }

    #[test]
    fn tiers_are_ordered() {
        assert!(CareerTier::Freelance < CareerTier::ClubScout);
        assert!(CareerTier::HeadScout < CareerTier::Director);
    }
}

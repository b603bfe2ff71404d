//! Achievement evaluation and the persistence port for unlocks.
//!
//! Evaluation is a pure function of the snapshot. What has already been
//! unlocked lives behind [`AchievementStore`], so the core never touches storage.

use std::collections::BTreeSet;
use std::io;

use crate::model::{AchievementId, CareerTier, GameState};

const PROLIFIC_REPORTS: u32 = 25;
const GLOBETROTTER_COUNTRIES: usize = 3;
const GLOBETROTTER_FAMILIARITY: u8 = 50;
const RESPECTED_REPUTATION: f64 = 75.0;
const FULL_STAFF: usize = 3;

fn satisfied(state: &GameState, id: AchievementId) -> bool {
    let m = &state.milestones;
    let scout = &state.scout;
    match id {
        AchievementId::FirstReport => m.reports_submitted >= 1,
        AchievementId::Prolific => m.reports_submitted >= PROLIFIC_REPORTS,
        AchievementId::FirstPlacement => m.placements >= 1,
        AchievementId::BangTheTable => m.vindicated_table_pounds >= 1,
        AchievementId::Qualified => m.courses_completed >= 1,
        AchievementId::ClubScout => scout.tier >= CareerTier::ClubScout,
        AchievementId::HeadScout => scout.tier >= CareerTier::HeadScout,
        AchievementId::Director => scout.tier >= CareerTier::Director,
        AchievementId::DebtFree => m.loans_repaid >= 1,
        AchievementId::BackFromTheBrink => m.bankruptcy_recoveries >= 1,
        AchievementId::StoryTeller => m.chains_completed >= 1,
        AchievementId::Globetrotter => {
            scout
                .country_familiarity
                .values()
                .filter(|f| **f >= GLOBETROTTER_FAMILIARITY)
                .count()
                >= GLOBETROTTER_COUNTRIES
        }
        AchievementId::Respected => scout.reputation >= RESPECTED_REPUTATION,
        AchievementId::FullStaff => state.finances.staff.len() >= FULL_STAFF,
    }
}

/// Every achievement the current state satisfies.
pub fn satisfied_achievements(state: &GameState) -> BTreeSet<AchievementId> {
    AchievementId::ALL
        .iter()
        .copied()
        .filter(|id| satisfied(state, *id))
        .collect()
}

/// Where unlocked achievements are kept between sessions.
pub trait AchievementStore {
    fn load(&self) -> io::Result<BTreeSet<AchievementId>>;

    /// Record newly unlocked ids. Called with each id at most once per sync;
    /// stores must tolerate ids they already hold.
    fn persist(&mut self, unlocked: &[AchievementId]) -> io::Result<()>;
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryAchievementStore {
    unlocked: BTreeSet<AchievementId>,
}

impl InMemoryAchievementStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AchievementStore for InMemoryAchievementStore {
    fn load(&self) -> io::Result<BTreeSet<AchievementId>> {
        Ok(self.unlocked.clone())
    }

    fn persist(&mut self, unlocked: &[AchievementId]) -> io::Result<()> {
        self.unlocked.extend(unlocked.iter().copied());
        Ok(())
    }
}

/// Persist achievements the state satisfies but the store does not hold yet.
/// Returns the newly unlocked ids.
pub fn sync_achievements(state: &GameState, store: &mut dyn AchievementStore) -> io::Result<Vec<AchievementId>> {
    let known = store.load()?;
    let fresh: Vec<AchievementId> = satisfied_achievements(state)
        .into_iter()
        .filter(|id| !known.contains(id))
        .collect();
    if !fresh.is_empty() {
        store.persist(&fresh)?;
        for id in &fresh {
            tracing::info!(achievement = %id, "achievement unlocked");
        }
    }
    Ok(fresh)
}

use std::collections::BTreeMap;

use rand::Rng;
use rand::RngCore;
use rand::seq::IndexedRandom;

use crate::config::CareerConfig;
use crate::id::RivalId;
use crate::model::{BudgetTier, GameState, RivalPersonality, RivalScout};
use crate::sim::names;

/// Add the rival scouts working for other clubs.
pub fn generate_rivals(state: &mut GameState, config: &CareerConfig, rng: &mut dyn RngCore) {
    for _ in 0..config.setup.rivals {
        let rival = RivalScout {
            id: RivalId(0),
            name: names::generate_person_name(rng),
            club: names::generate_club_name(rng),
            quality: rng.random_range(0.35..0.9),
            personality: *RivalPersonality::ALL
                .choose(&mut *rng)
                .unwrap_or(&RivalPersonality::Balanced),
            budget: *BudgetTier::ALL.choose(&mut *rng).unwrap_or(&BudgetTier::Mid),
            active: true,
            current_target: None,
            scouting_progress: BTreeMap::new(),
            stalled_weeks: 0,
            signings: Vec::new(),
            activity_log: Vec::new(),
        };
        let id = state.add_rival(rival);
        tracing::debug!(rival = %id, "rival generated");
    }
}

//! Starting world for a new career: the scout, their finances, a pool of
//! players and the rival scouts competing for them.

pub mod players;
pub mod rivals;

use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::config::CareerConfig;
use crate::model::{Finances, GameState, MessageCategory, Scout};

/// A scout and their finances at week 1, with nobody else in the world yet.
pub fn starting_state(config: &CareerConfig) -> GameState {
    let progression = &config.progression;
    let scout = Scout::new(
        config.setup.scout_name.clone(),
        progression.starting_skill,
        progression.starting_reputation,
    );
    let finances = Finances::new(
        config.finance.starting_balance,
        config.finance.credit.starting_score,
        config.finance.fixed_expenses.clone(),
    );
    GameState::new(config.seed, scout, finances)
}

/// Generate a complete starting career. The same config always produces the
/// same world.
pub fn generate_career(config: &CareerConfig) -> GameState {
    let mut state = starting_state(config);
    let mut rng = SmallRng::seed_from_u64(config.seed);

    players::generate_players(&mut state, config, &mut rng);
    rivals::generate_rivals(&mut state, config, &mut rng);

    state.send_message(
        MessageCategory::Career,
        "Welcome",
        format!(
            "You start out as a freelance scout with {} in the bank. {} rival scouts are already at work.",
            state.finances.balance,
            state.rivals.len()
        ),
    );
    tracing::info!(
        seed = config.seed,
        players = state.players.len(),
        rivals = state.rivals.len(),
        "career generated"
    );
    state
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_world() {
        let config = CareerConfig::default();
        assert_eq!(generate_career(&config), generate_career(&config));
    }

    #[test]
    fn different_seed_different_players() {
        let a = generate_career(&CareerConfig::default());
        let b = generate_career(&CareerConfig {
            seed: 7,
            ..CareerConfig::default()
        });
        let names = |s: &GameState| s.players.values().map(|p| p.name.clone()).collect::<Vec<_>>();
        assert_ne!(names(&a), names(&b));
    }

    #[test]
    fn population_matches_setup() {
        let config = CareerConfig::default();
        let state = generate_career(&config);
        assert_eq!(state.players.len(), config.setup.players);
        assert_eq!(state.rivals.len(), config.setup.rivals);
        assert_eq!(state.finances.balance, config.finance.starting_balance);
        assert_eq!(state.date().week(), 1);
        assert_eq!(state.inbox.len(), 1);
    }
}

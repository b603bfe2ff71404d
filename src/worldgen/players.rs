use std::collections::BTreeMap;

use rand::Rng;
use rand::RngCore;
use rand::seq::IndexedRandom;

use crate::config::CareerConfig;
use crate::id::PlayerId;
use crate::model::{AttributeId, GameState, Player, Position};
use crate::sim::names;

/// Share of the pool drawn from the scout's home country.
const HOME_SHARE: f64 = 0.55;

/// How far a single attribute strays from the player's overall level,
/// as a fraction of the scale span.
const ATTRIBUTE_SPREAD: f64 = 0.2;

/// Populate the world with scoutable players.
pub fn generate_players(state: &mut GameState, config: &CareerConfig, rng: &mut dyn RngCore) {
    let setup = &config.setup;
    let abroad: Vec<&String> = config.travel.destinations.keys().collect();
    let (min_age, max_age) = (setup.min_age.min(setup.max_age), setup.max_age.max(setup.min_age));

    for _ in 0..setup.players {
        let name = names::generate_person_name(rng);
        let age = rng.random_range(min_age..=max_age);
        let position = *Position::ALL.choose(&mut *rng).unwrap_or(&Position::Midfielder);
        let country = match abroad.choose(&mut *rng) {
            Some(dest) if !rng.random_bool(HOME_SHARE) => (*dest).clone(),
            _ => config.travel.home_country.clone(),
        };
        // Younger players draw more attention.
        let youth_hype = if age <= 21 { 0.2 } else { 0.0 };
        let buzz = (rng.random::<f64>() * 0.8 + youth_hype).min(1.0);
        let attributes = true_attributes(config, rng);

        state.add_player(Player::new(PlayerId(0), name, age, position, country, buzz, attributes));
    }
    tracing::debug!(count = setup.players, "players generated");
}

/// Hidden attributes clustered around a random overall level.
fn true_attributes(config: &CareerConfig, rng: &mut dyn RngCore) -> BTreeMap<AttributeId, i32> {
    let scale = &config.attribute_scale;
    let span = scale.span();
    let level = scale.min as f64 + span * rng.random_range(0.2..0.8);
    let spread = span * ATTRIBUTE_SPREAD;
    AttributeId::ALL
        .iter()
        .map(|a| {
            let value = level + rng.random_range(-spread..=spread);
            (*a, scale.clamp(value.round() as i32))
        })
        .collect()
}

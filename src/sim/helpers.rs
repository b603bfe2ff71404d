use rand::Rng;
use rand::RngCore;

use crate::config::CareerConfig;
use crate::model::{GameState, StaffRole};

/// Bernoulli roll that tolerates out-of-range probabilities from config.
pub fn roll(rng: &mut dyn RngCore, probability: f64) -> bool {
    if probability <= 0.0 {
        return false;
    }
    rng.random_bool(probability.min(1.0))
}

/// Combined observation quality bonus of the scout's equipment.
pub fn equipment_bonus(state: &GameState, config: &CareerConfig) -> f64 {
    state
        .finances
        .equipment
        .iter()
        .filter_map(|item| config.equipment_def(&item.key))
        .map(|def| def.quality_bonus)
        .sum()
}

pub fn staff_count(state: &GameState, role: StaffRole) -> usize {
    state
        .finances
        .staff
        .values()
        .filter(|s| s.role == role)
        .count()
}

/// Round a fractional currency amount to whole units.
pub fn money(amount: f64) -> i64 {
    amount.round() as i64
}

#![allow(dead_code)]

use scout_career::id::PlayerId;
use scout_career::model::*;
use scout_career::scenario::Scenario;
use scout_career::{Career, CareerConfig};

/// A full default career with a match every weekday focused on the first
/// few players and report writing on Saturday.
pub fn busy_career(seed: u64) -> Career {
    let mut career = Career::new(CareerConfig {
        seed,
        ..CareerConfig::default()
    });
    let targets: Vec<PlayerId> = career.state().players.keys().copied().take(5).collect();
    for (day, player) in targets.iter().enumerate() {
        let activity = PlannedActivity::new(ActivityKind::AttendMatch).focusing(*player);
        career.plan_day(day as u8, Some(activity)).unwrap();
    }
    career
        .plan_day(5, Some(PlannedActivity::new(ActivityKind::Networking)))
        .unwrap();
    career
}

/// Record one observation whose readings are all `value`.
pub fn observe_flat(state: &mut GameState, player: PlayerId, value: i32) {
    let readings = AttributeId::ALL
        .iter()
        .map(|a| AttributeReading {
            attribute: *a,
            perceived_value: value,
            confidence: 0.6,
        })
        .collect();
    let date = state.date();
    state.record_observation(player, date, ActivityKind::AttendMatch, readings);
}

/// A scenario with one player whose readings are badly off, ready for a
/// report that will be proven wrong.
pub fn misjudged_player() -> (Scenario, PlayerId) {
    let mut scenario = Scenario::new();
    let player = scenario.player("Misjudged").id();
    observe_flat(scenario.state_mut(), player, 0);
    (scenario, player)
}

pub fn read_lines(path: &std::path::Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect()
}

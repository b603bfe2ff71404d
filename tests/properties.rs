mod common;

use std::collections::BTreeSet;

use common::misjudged_player;
use proptest::prelude::*;
use scout_career::id::{EventId, ObservationId, PlayerId};
use scout_career::model::finance::DistressTracker;
use scout_career::model::*;
use scout_career::sim::finance::next_distress;
use scout_career::{Career, CareerConfig, ReportDraft};

fn rung(level: DistressLevel) -> i64 {
    level.rung() as i64
}

fn observation(id: u64, attribute: AttributeId, confidence: f64) -> Observation {
    Observation {
        id: ObservationId(id),
        player_id: PlayerId(1),
        date: GameDate::new(1, 0),
        activity: ActivityKind::AttendMatch,
        readings: vec![AttributeReading {
            attribute,
            perceived_value: 10,
            confidence,
        }],
    }
}

/// Resolve every open event, picking choices from `picks` in turn.
fn settle_open_events(career: &mut Career, picks: &[usize], cursor: &mut usize) {
    let open: Vec<(EventId, usize)> = career
        .open_events()
        .iter()
        .map(|e| (e.id, e.choices.len()))
        .collect();
    for (id, choices) in open {
        if choices == 0 {
            career.acknowledge_event(id).unwrap();
        } else {
            let pick = picks[*cursor % picks.len()] % choices;
            *cursor += 1;
            career.resolve_event_choice(id, pick).unwrap();
        }
    }
}

proptest! {
    #[test]
    fn merged_confidence_never_drops(confidences in prop::collection::vec(0.0_f64..=1.0, 1..12)) {
        let observations: Vec<Observation> = confidences
            .iter()
            .enumerate()
            .map(|(i, c)| observation(i as u64 + 1, AttributeId::Pace, *c))
            .collect();

        let mut previous = 0.0;
        for n in 1..=observations.len() {
            let profile = PerceivedProfile::merge(&observations[..n]);
            let confidence = profile.confidence(AttributeId::Pace).unwrap();
            prop_assert!(confidence >= previous);
            prop_assert_eq!(profile.observation_count(AttributeId::Pace), n as u32);
            previous = confidence;
        }
    }

    #[test]
    fn distress_moves_at_most_one_rung(weeks in prop::collection::vec(any::<bool>(), 1..40)) {
        let cfg = CareerConfig::default().finance.distress;
        let mut tracker = DistressTracker::default();
        let mut level = DistressLevel::Healthy;
        for negative in weeks {
            let next = next_distress(level, &mut tracker, negative, &cfg);
            prop_assert!((rung(next) - rung(level)).abs() <= 1);
            if negative {
                prop_assert!(next >= level);
            } else {
                prop_assert!(next <= level);
            }
            level = next;
        }
    }

    #[test]
    fn rival_progress_only_grows_on_the_current_target(seed in 0_u64..500, weeks in 1_usize..5) {
        let mut career = Career::new(CareerConfig { seed, ..CareerConfig::default() });
        for _ in 0..weeks {
            let before = career.state().rivals.clone();
            career.fast_forward_week();
            for (id, after) in &career.state().rivals {
                let earlier = &before[id];
                if after.signings.len() != earlier.signings.len() {
                    continue;
                }
                let players: BTreeSet<PlayerId> = earlier
                    .scouting_progress
                    .keys()
                    .chain(after.scouting_progress.keys())
                    .copied()
                    .collect();
                for player in players {
                    if after.current_target == Some(player) {
                        prop_assert!(after.progress_on(player) >= earlier.progress_on(player));
                    } else {
                        prop_assert_eq!(after.progress_on(player), earlier.progress_on(player));
                    }
                }
            }
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn chains_stay_within_bounds(picks in prop::collection::vec(0_usize..3, 1..8)) {
        let (scenario, player) = misjudged_player();
        let mut career = scenario.balance(1_000_000).into_career();
        career.submit_report(ReportDraft::new(player, Conviction::TablePound)).unwrap();

        let mut cursor = 0;
        for _ in 0..16 {
            career.fast_forward_week();
            settle_open_events(&mut career, &picks, &mut cursor);

            let narrative = &career.state().narrative;
            for chain in narrative.chains.values() {
                prop_assert!(chain.current_step <= chain.max_steps);
                let resolved = narrative
                    .events
                    .values()
                    .filter(|e| e.chain.as_ref().is_some_and(|link| link.chain_id == chain.id))
                    .filter(|e| e.selected_choice().is_some())
                    .count();
                prop_assert_eq!(chain.choice_history.len(), resolved);
                if chain.closed {
                    prop_assert_eq!(chain.current_step, chain.max_steps);
                }
            }
        }

        let media = career
            .state()
            .narrative
            .chains
            .values()
            .find(|c| c.kind == ChainKind::MediaScrutiny);
        prop_assert!(media.is_some_and(|c| c.closed));
    }
}

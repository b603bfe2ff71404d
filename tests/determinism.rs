mod common;

use common::busy_career;
use scout_career::model::GameState;
use scout_career::Career;

#[test]
fn fast_forward_matches_seven_single_days() {
    let mut stepped = busy_career(11);
    let mut forwarded = busy_career(11);

    let mut stepped_days = Vec::new();
    for _ in 0..7 {
        stepped_days.push(stepped.advance_day());
    }
    let forwarded_days = forwarded.fast_forward_week();

    assert_eq!(stepped_days, forwarded_days);
    assert_eq!(stepped.snapshot(), forwarded.snapshot());
}

#[test]
fn fast_forward_from_mid_week_matches_stepping() {
    let mut stepped = busy_career(5);
    let mut forwarded = busy_career(5);
    for _ in 0..3 {
        stepped.advance_day();
        forwarded.advance_day();
    }
    for _ in 3..7 {
        stepped.advance_day();
    }
    forwarded.fast_forward_week();

    assert_eq!(stepped.state().week.week, 2);
    assert_eq!(stepped.snapshot(), forwarded.snapshot());
}

#[test]
fn restored_snapshot_replays_identically() {
    let mut original = busy_career(21);
    original.fast_forward_week();
    original.advance_day();

    let json = serde_json::to_string(&original.snapshot()).unwrap();
    let restored_state: GameState = serde_json::from_str(&json).unwrap();
    assert_eq!(restored_state, original.snapshot());
    let mut restored = Career::from_snapshot(restored_state, original.config().clone());

    for _ in 0..3 {
        original.fast_forward_week();
        restored.fast_forward_week();
    }
    assert_eq!(original.snapshot(), restored.snapshot());
}

#[test]
fn seeds_diverge() {
    let mut a = busy_career(1);
    let mut b = busy_career(2);
    a.fast_forward_week();
    b.fast_forward_week();
    assert_ne!(a.state().players, b.state().players);
}

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::attribute::Discipline;
use super::observation::ActivityKind;
use super::timestamp::{DAYS_PER_WEEK, GameDate};
use crate::id::{EventId, MessageId, ObservationId, PlayerId};

/// One day's planned activity. `focus` lists players to observe; it is
/// ignored by activities that observe nobody.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedActivity {
    pub kind: ActivityKind,
    #[serde(default)]
    pub focus: Vec<PlayerId>,
    /// Discipline trained by `skill_training` days.
    #[serde(default)]
    pub training: Option<Discipline>,
}

impl PlannedActivity {
    pub fn new(kind: ActivityKind) -> Self {
        Self {
            kind,
            focus: Vec::new(),
            training: None,
        }
    }

    pub fn focusing(mut self, player: PlayerId) -> Self {
        if !self.focus.contains(&player) {
            self.focus.push(player);
        }
        self
    }

    pub fn training(mut self, discipline: Discipline) -> Self {
        self.training = Some(discipline);
        self
    }
}

/// Seven day-slots. `None` is a rest day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekPlan {
    pub days: [Option<PlannedActivity>; DAYS_PER_WEEK as usize],
}

impl WeekPlan {
    pub fn get(&self, day: u8) -> Option<&PlannedActivity> {
        self.days.get(day as usize).and_then(|d| d.as_ref())
    }

    pub fn set(&mut self, day: u8, activity: Option<PlannedActivity>) {
        self.days[day as usize] = activity;
    }

    /// Every player any day of this plan focuses on.
    pub fn focused_players(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.days
            .iter()
            .flatten()
            .flat_map(|a| a.focus.iter().copied())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayStatus {
    Idle,
    Resolving,
    Resolved,
}

/// Why a planned activity produced no observations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum DegradedReason {
    /// Every focused player became unavailable before the day resolved.
    TargetsUnavailable { players: Vec<PlayerId> },
    /// An observing activity was planned with nobody to watch.
    NoTargets,
    /// A trip day with no booking for the week.
    NoTravelBooking,
}

/// Outcome of one resolved day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayResult {
    pub date: GameDate,
    pub activity: Option<ActivityKind>,
    pub summary: String,
    pub observations: Vec<ObservationId>,
    pub xp: BTreeMap<Discipline, u32>,
    pub messages: Vec<MessageId>,
    pub events: Vec<EventId>,
    pub fatigue_delta: i16,
    pub degraded: Option<DegradedReason>,
}

/// Transient per-week resolution state. Replaced when the week finalizes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekSimulation {
    pub week: u32,
    /// Next day to resolve, 0..=7. 7 means every day is resolved.
    pub current_day: u8,
    pub plan: WeekPlan,
    pub results: Vec<DayResult>,
    pub consecutive_rest_days: u8,
    /// Set only while a day is mid-resolution.
    pub resolving: Option<u8>,
}

impl WeekSimulation {
    pub fn new(week: u32, plan: WeekPlan, consecutive_rest_days: u8) -> Self {
        Self {
            week,
            current_day: 0,
            plan,
            results: Vec::new(),
            consecutive_rest_days,
            resolving: None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.current_day >= DAYS_PER_WEEK
    }

    pub fn day_status(&self, day: u8) -> DayStatus {
        if self.resolving == Some(day) {
            DayStatus::Resolving
        } else if day < self.current_day {
            DayStatus::Resolved
        } else {
            DayStatus::Idle
        }
    }

    pub fn current_date(&self) -> GameDate {
        GameDate::new(self.week, self.current_day.min(DAYS_PER_WEEK - 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn focusing_dedupes() {
        let a = PlannedActivity::new(ActivityKind::AttendMatch)
            .focusing(PlayerId(1))
            .focusing(PlayerId(1))
            .focusing(PlayerId(2));
        assert_eq!(a.focus, vec![PlayerId(1), PlayerId(2)]);
    }

    #[test]
    fn day_status_tracks_progress() {
        let mut week = WeekSimulation::new(3, WeekPlan::default(), 0);
        assert_eq!(week.day_status(0), DayStatus::Idle);
        week.current_day = 2;
        week.resolving = Some(2);
        assert_eq!(week.day_status(1), DayStatus::Resolved);
        assert_eq!(week.day_status(2), DayStatus::Resolving);
        assert_eq!(week.day_status(3), DayStatus::Idle);
        assert!(!week.is_complete());
    }

    #[test]
    fn plan_lists_focus_players() {
        let mut plan = WeekPlan::default();
        plan.set(1, Some(PlannedActivity::new(ActivityKind::AttendMatch).focusing(PlayerId(5))));
        plan.set(4, Some(PlannedActivity::new(ActivityKind::VideoAnalysis).focusing(PlayerId(6))));
        let players: Vec<_> = plan.focused_players().collect();
        assert_eq!(players, vec![PlayerId(5), PlayerId(6)]);
        assert!(plan.get(0).is_none());
    }
}

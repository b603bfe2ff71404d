use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::timestamp::GameDate;
use crate::id::{PlayerId, RivalId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RivalPersonality {
    /// Chases high-buzz youth.
    Aggressive,
    /// Prefers targets already well scouted.
    Methodical,
    Balanced,
}

labelled_enum!(RivalPersonality {
    Aggressive => "aggressive",
    Methodical => "methodical",
    Balanced => "balanced",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetTier {
    Low,
    Mid,
    High,
}

labelled_enum!(BudgetTier {
    Low => "low",
    Mid => "mid",
    High => "high",
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RivalActivityKind {
    TargetSelected { player_id: PlayerId, resumed_at: u32 },
    Progressed { player_id: PlayerId, progress: u32 },
    TargetAbandoned { player_id: PlayerId, progress: u32 },
    PlayerSigned { player_id: PlayerId },
    Stalled { weeks_left: u32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RivalActivity {
    pub date: GameDate,
    pub kind: RivalActivityKind,
}

/// A competing scout working for another club.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RivalScout {
    pub id: RivalId,
    pub name: String,
    pub club: String,
    /// 0.0–1.0; how well the rival judges ability.
    pub quality: f64,
    pub personality: RivalPersonality,
    pub budget: BudgetTier,
    pub active: bool,
    pub current_target: Option<PlayerId>,
    /// Progress per player. Never reset when a target is dropped.
    pub scouting_progress: BTreeMap<PlayerId, u32>,
    /// Weeks the rival sits out (set by narrative effects).
    pub stalled_weeks: u32,
    pub signings: Vec<PlayerId>,
    pub activity_log: Vec<RivalActivity>,
}

impl RivalScout {
    pub fn progress_on(&self, player: PlayerId) -> u32 {
        self.scouting_progress.get(&player).copied().unwrap_or(0)
    }

    /// Every player this rival has shown interest in and not yet signed.
    pub fn tracked_players(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.scouting_progress
            .keys()
            .copied()
            .chain(self.current_target)
            .filter(|p| !self.signings.contains(p))
    }

    pub(crate) fn log(&mut self, date: GameDate, kind: RivalActivityKind) {
        self.activity_log.push(RivalActivity { date, kind });
    }
}

/// A player tracked by both the scout and at least one rival.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedTarget {
    pub player_id: PlayerId,
    pub rivals: Vec<RivalId>,
}

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use serde::{Deserialize, Serialize};

use super::finance::Finances;
use super::inbox::{InboxMessage, MessageCategory, Notification, Severity};
use super::narrative::NarrativeState;
use super::observation::{ActivityKind, AttributeReading, Observation, PerceivedProfile};
use super::player::Player;
use super::report::{Report, ReportReview};
use super::rival::RivalScout;
use super::schedule::{WeekPlan, WeekSimulation};
use super::scout::Scout;
use super::timestamp::GameDate;
use crate::id::{IdGenerator, MessageId, ObservationId, PlayerId, ReportId, RivalId};

/// Running counters the achievement evaluation reads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CareerMilestones {
    pub reports_submitted: u32,
    pub placements: u32,
    pub vindicated_table_pounds: u32,
    pub bankruptcies: u32,
    pub bankruptcy_recoveries: u32,
    pub chains_completed: u32,
    pub courses_completed: u32,
    pub loans_repaid: u32,
    pub targets_lost_to_rivals: u32,
}

/// The single snapshot every system reads and writes.
///
/// Plain data only; the boundary layer may serialize it at any command
/// boundary and restore it later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Incremented once per accepted command.
    pub version: u64,
    pub seed: u64,
    pub id_gen: IdGenerator,
    pub scout: Scout,
    pub players: BTreeMap<PlayerId, Player>,
    pub observations: BTreeMap<ObservationId, Observation>,
    pub reports: BTreeMap<ReportId, Report>,
    pub report_reviews: BTreeMap<ReportId, ReportReview>,
    pub finances: Finances,
    pub rivals: BTreeMap<RivalId, RivalScout>,
    pub narrative: NarrativeState,
    pub inbox: Vec<InboxMessage>,
    pub notifications: VecDeque<Notification>,
    /// Template copied into each new week.
    pub routine: WeekPlan,
    pub week: WeekSimulation,
    pub milestones: CareerMilestones,
}

impl GameState {
    pub fn new(seed: u64, scout: Scout, finances: Finances) -> Self {
        Self {
            version: 0,
            seed,
            id_gen: IdGenerator::new(),
            scout,
            players: BTreeMap::new(),
            observations: BTreeMap::new(),
            reports: BTreeMap::new(),
            report_reviews: BTreeMap::new(),
            finances,
            rivals: BTreeMap::new(),
            narrative: NarrativeState::default(),
            inbox: Vec::new(),
            notifications: VecDeque::new(),
            routine: WeekPlan::default(),
            week: WeekSimulation::new(1, WeekPlan::default(), 0),
            milestones: CareerMilestones::default(),
        }
    }

    /// The date of the next day to resolve.
    pub fn date(&self) -> GameDate {
        self.week.current_date()
    }

    /// Look up a player that must exist.
    ///
    /// # Panics
    /// Panics if `id` is not in the snapshot: every id held by the core was
    /// minted by it, so a miss means the state is corrupt.
    pub fn player(&self, id: PlayerId) -> &Player {
        self.players
            .get(&id)
            .unwrap_or_else(|| panic!("player {id} referenced but missing from state"))
    }

    pub fn player_mut(&mut self, id: PlayerId) -> &mut Player {
        self.players
            .get_mut(&id)
            .unwrap_or_else(|| panic!("player {id} referenced but missing from state"))
    }

    pub fn rival(&self, id: RivalId) -> &RivalScout {
        self.rivals
            .get(&id)
            .unwrap_or_else(|| panic!("rival {id} referenced but missing from state"))
    }

    pub fn rival_mut(&mut self, id: RivalId) -> &mut RivalScout {
        self.rivals
            .get_mut(&id)
            .unwrap_or_else(|| panic!("rival {id} referenced but missing from state"))
    }

    pub fn add_player(&mut self, mut player: Player) -> PlayerId {
        let id = self.id_gen.mint();
        player.id = id;
        self.players.insert(id, player);
        id
    }

    pub fn add_rival(&mut self, mut rival: RivalScout) -> RivalId {
        let id = self.id_gen.mint();
        rival.id = id;
        self.rivals.insert(id, rival);
        id
    }

    pub fn observations_of(&self, player: PlayerId) -> impl Iterator<Item = &Observation> {
        self.observations
            .values()
            .filter(move |o| o.player_id == player)
    }

    pub fn perceived_profile(&self, player: PlayerId) -> PerceivedProfile {
        PerceivedProfile::merge(self.observations_of(player))
    }

    /// Players with at least one observation.
    pub fn observed_players(&self) -> BTreeSet<PlayerId> {
        self.observations.values().map(|o| o.player_id).collect()
    }

    /// Append a new observation. Existing observations are never touched.
    ///
    /// # Panics
    /// Panics if `player` is not in the snapshot.
    pub fn record_observation(
        &mut self,
        player: PlayerId,
        date: GameDate,
        activity: ActivityKind,
        readings: Vec<AttributeReading>,
    ) -> ObservationId {
        assert!(
            self.players.contains_key(&player),
            "record_observation: player {player} not found"
        );
        let id = self.id_gen.mint();
        self.observations.insert(
            id,
            Observation {
                id,
                player_id: player,
                date,
                activity,
                readings,
            },
        );
        id
    }

    pub fn send_message(
        &mut self,
        category: MessageCategory,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> MessageId {
        let id = self.id_gen.mint();
        let date = self.date();
        self.inbox.push(InboxMessage {
            id,
            date,
            category,
            subject: subject.into(),
            body: body.into(),
            read: false,
        });
        id
    }

    pub fn notify(&mut self, severity: Severity, text: impl Into<String>) {
        let date = self.date();
        self.notifications.push_back(Notification {
            date,
            severity,
            text: text.into(),
        });
    }
}

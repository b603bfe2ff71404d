//! Builder for hand-made careers, used by unit and integration tests.

use std::collections::BTreeMap;

use crate::career::Career;
use crate::config::CareerConfig;
use crate::id::{ContractId, PlayerId, RivalId};
use crate::model::*;
use crate::worldgen::starting_state;

// -- Builder-style ref types --

/// Typed reference to a player in a [`Scenario`], enabling chained field mutation.
///
/// Created by [`Scenario::player`] (creation) or [`Scenario::player_mut`] (mutation).
/// Call [`.id()`](PlayerRef::id) to terminate the chain and extract the player ID.
pub struct PlayerRef<'a> {
    scenario: &'a mut Scenario,
    id: PlayerId,
}

impl PlayerRef<'_> {
    fn data_mut(&mut self) -> &mut Player {
        self.scenario.state.player_mut(self.id)
    }

    pub fn age(mut self, v: u8) -> Self { self.data_mut().age = v; self }
    pub fn position(mut self, v: Position) -> Self { self.data_mut().position = v; self }
    pub fn country(mut self, v: &str) -> Self { self.data_mut().country = v.to_string(); self }
    pub fn buzz(mut self, v: f64) -> Self { self.data_mut().buzz = v.clamp(0.0, 1.0); self }
    pub fn attribute(mut self, a: AttributeId, v: i32) -> Self { self.data_mut().true_attributes.insert(a, v); self }

    /// Put the player on the scout's watchlist.
    pub fn watched(self) -> Self {
        let id = self.id;
        self.scenario.state.scout.watchlist.insert(id);
        self
    }

    pub fn signed_by(mut self, rival: RivalId) -> Self {
        let date = self.scenario.state.date();
        self.data_mut().availability = Availability::Signed { rival, date };
        self
    }

    /// Escape hatch: apply an arbitrary closure to the player.
    pub fn with(mut self, f: impl FnOnce(&mut Player)) -> Self { f(self.data_mut()); self }

    /// Terminate the chain and return the player ID.
    pub fn id(self) -> PlayerId { self.id }
}

/// Typed reference to a rival scout in a [`Scenario`].
pub struct RivalRef<'a> {
    scenario: &'a mut Scenario,
    id: RivalId,
}

impl RivalRef<'_> {
    fn data_mut(&mut self) -> &mut RivalScout {
        self.scenario.state.rival_mut(self.id)
    }

    pub fn quality(mut self, v: f64) -> Self { self.data_mut().quality = v; self }
    pub fn personality(mut self, v: RivalPersonality) -> Self { self.data_mut().personality = v; self }
    pub fn budget(mut self, v: BudgetTier) -> Self { self.data_mut().budget = v; self }
    pub fn stalled(mut self, weeks: u32) -> Self { self.data_mut().stalled_weeks = weeks; self }
    pub fn inactive(mut self) -> Self { self.data_mut().active = false; self }

    /// Make `player` the rival's current target with the given progress.
    pub fn targeting(mut self, player: PlayerId, progress: u32) -> Self {
        let rival = self.data_mut();
        rival.current_target = Some(player);
        rival.scouting_progress.insert(player, progress);
        self
    }

    /// Record progress on a player the rival is not currently chasing.
    pub fn progress(mut self, player: PlayerId, progress: u32) -> Self {
        self.data_mut().scouting_progress.insert(player, progress);
        self
    }

    pub fn with(mut self, f: impl FnOnce(&mut RivalScout)) -> Self { f(self.data_mut()); self }

    /// Terminate the chain and return the rival ID.
    pub fn id(self) -> RivalId { self.id }
}

/// Hand-built career state, starting from the configured scout and finances at
/// week 1 day 0 with nobody else in the world.
///
/// Players added here have every true attribute at the middle of the scale,
/// age 20, the home country and buzz 0.5. Rivals are balanced, mid-budget and
/// of quality 0.7.
pub struct Scenario {
    state: GameState,
    config: CareerConfig,
}

impl Default for Scenario {
    fn default() -> Self {
        Self::new()
    }
}

impl Scenario {
    pub fn new() -> Self {
        let config = CareerConfig::default();
        Self {
            state: starting_state(&config),
            config,
        }
    }

    /// Swap in a different config and rebuild the starting state from it.
    /// Call before adding players or rivals.
    pub fn with_config(mut self, config: CareerConfig) -> Self {
        debug_assert!(
            self.state.players.is_empty() && self.state.rivals.is_empty(),
            "with_config must be called before populating the scenario"
        );
        self.state = starting_state(&config);
        self.config = config;
        self
    }

    pub fn config_mut(&mut self) -> &mut CareerConfig {
        &mut self.config
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    // -- Population --

    pub fn player(&mut self, name: &str) -> PlayerRef<'_> {
        let scale = &self.config.attribute_scale;
        let mid = (scale.min + scale.max) / 2;
        let attributes: BTreeMap<AttributeId, i32> = AttributeId::ALL.iter().map(|a| (*a, mid)).collect();
        let player = Player::new(
            PlayerId(0),
            name.to_string(),
            20,
            Position::Forward,
            self.config.travel.home_country.clone(),
            0.5,
            attributes,
        );
        let id = self.state.add_player(player);
        PlayerRef { scenario: self, id }
    }

    pub fn player_mut(&mut self, id: PlayerId) -> PlayerRef<'_> {
        PlayerRef { scenario: self, id }
    }

    pub fn rival(&mut self, name: &str) -> RivalRef<'_> {
        let rival = RivalScout {
            id: RivalId(0),
            name: name.to_string(),
            club: format!("{name} FC"),
            quality: 0.7,
            personality: RivalPersonality::Balanced,
            budget: BudgetTier::Mid,
            active: true,
            current_target: None,
            scouting_progress: BTreeMap::new(),
            stalled_weeks: 0,
            signings: Vec::new(),
            activity_log: Vec::new(),
        };
        let id = self.state.add_rival(rival);
        RivalRef { scenario: self, id }
    }

    pub fn rival_mut(&mut self, id: RivalId) -> RivalRef<'_> {
        RivalRef { scenario: self, id }
    }

    // -- Scout and finances --

    pub fn balance(mut self, amount: i64) -> Self {
        self.state.finances.balance = amount;
        self
    }

    pub fn fatigue(mut self, fatigue: u8) -> Self {
        self.state.scout.fatigue = fatigue;
        self
    }

    pub fn skill(mut self, discipline: Discipline, level: u8) -> Self {
        self.state.scout.set_skill(discipline, level);
        self
    }

    pub fn tier(mut self, tier: CareerTier) -> Self {
        self.state.scout.tier = tier;
        self
    }

    fn offer(&mut self, client: &str, terms: ContractTerms) -> ContractId {
        let id: ContractId = self.state.id_gen.mint();
        let week = self.state.week.week;
        self.state.finances.contracts.insert(
            id,
            Contract {
                id,
                client: client.to_string(),
                terms,
                status: ContractStatus::Pending,
                offered_week: week,
                offer_expires_week: week + self.config.finance.offer_expiry_weeks,
                started_week: None,
                delivered: 0,
                period_start_week: week,
                missed_periods: 0,
            },
        );
        id
    }

    /// Add a pending retainer offer.
    pub fn retainer_offer(&mut self, weekly_fee: i64, quota_per_period: u32, period_weeks: u32, term_weeks: u32) -> ContractId {
        self.offer(
            "Scenario Retainer Club",
            ContractTerms::Retainer {
                weekly_fee,
                quota_per_period,
                period_weeks,
                term_weeks,
            },
        )
    }

    /// Add a pending consulting offer.
    pub fn consulting_offer(&mut self, fee: i64, target: Option<PlayerId>, deadline_week: u32) -> ContractId {
        self.offer(
            "Scenario Consulting Club",
            ContractTerms::Consulting {
                fee,
                target,
                deadline_week,
            },
        )
    }

    // -- Schedule --

    /// Plan `day` in both the routine and the current week.
    pub fn plan(&mut self, day: u8, activity: PlannedActivity) -> &mut Self {
        self.state.routine.set(day, Some(activity.clone()));
        self.state.week.plan.set(day, Some(activity));
        self
    }

    // -- Finish --

    pub fn build(self) -> GameState {
        self.state
    }

    pub fn build_with_config(self) -> (GameState, CareerConfig) {
        (self.state, self.config)
    }

    /// Wrap the scenario in a [`Career`] running the default systems.
    pub fn into_career(self) -> Career {
        Career::from_snapshot(self.state, self.config)
    }
}

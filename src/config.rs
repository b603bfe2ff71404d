//! Tunable parameters for a career.
//!
//! Every section has a `Default` that matches the shipped balance, and every
//! struct is `#[serde(default)]`, so a JSON override only needs the fields it
//! changes.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::model::{
    ActivityKind, AttributeScale, BudgetTier, CareerTier, Conviction, Discipline, DistressLevel,
    Domain, ExpenseCategory, LoanType, StaffRole,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CareerConfig {
    /// RNG seed for deterministic careers.
    pub seed: u64,
    pub attribute_scale: AttributeScale,
    pub observation: ObservationConfig,
    pub fatigue: FatigueConfig,
    pub progression: ProgressionConfig,
    /// Overrides replace single profiles; kinds left out keep their default.
    #[serde(deserialize_with = "activities_over_defaults")]
    pub activities: BTreeMap<ActivityKind, ActivityProfile>,
    pub finance: FinanceConfig,
    pub reports: ReportConfig,
    pub courses: Vec<CourseDef>,
    pub equipment: Vec<EquipmentDef>,
    pub travel: TravelConfig,
    pub rivals: RivalConfig,
    pub narrative: NarrativeConfig,
    pub setup: SetupConfig,
}

impl CareerConfig {
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// # Panics
    /// Panics if the activity table has no entry for `kind`.
    pub fn activity(&self, kind: ActivityKind) -> &ActivityProfile {
        self.activities
            .get(&kind)
            .unwrap_or_else(|| panic!("no activity profile configured for {kind}"))
    }

    pub fn course(&self, id: &str) -> Option<&CourseDef> {
        self.courses.iter().find(|c| c.id == id)
    }

    pub fn equipment_def(&self, key: &str) -> Option<&EquipmentDef> {
        self.equipment.iter().find(|e| e.key == key)
    }
}

fn activities_over_defaults<'de, D>(deserializer: D) -> Result<BTreeMap<ActivityKind, ActivityProfile>, D::Error>
where
    D: Deserializer<'de>,
{
    let overrides = BTreeMap::<ActivityKind, ActivityProfile>::deserialize(deserializer)?;
    let mut activities = default_activities();
    activities.extend(overrides);
    Ok(activities)
}

impl Default for CareerConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            attribute_scale: AttributeScale::default(),
            observation: ObservationConfig::default(),
            fatigue: FatigueConfig::default(),
            progression: ProgressionConfig::default(),
            activities: default_activities(),
            finance: FinanceConfig::default(),
            reports: ReportConfig::default(),
            courses: default_courses(),
            equipment: default_equipment(),
            travel: TravelConfig::default(),
            rivals: RivalConfig::default(),
            narrative: NarrativeConfig::default(),
            setup: SetupConfig::default(),
        }
    }
}

/// Parameters of the reading noise/confidence function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservationConfig {
    /// Skill level treated as mastery.
    pub max_skill: u8,
    /// Noise amplitude as a fraction of the attribute span for an unskilled,
    /// rested scout at zero activity quality.
    pub noise_fraction: f64,
    /// Share of noise removed at max skill.
    pub skill_noise_dampening: f64,
    /// Extra noise at full fatigue, as a multiplier increment.
    pub fatigue_noise_growth: f64,
    /// Share of noise removed at full activity quality.
    pub quality_noise_dampening: f64,
    /// Confidence multiplier at skill zero; rises linearly to 1.0 at max skill.
    pub skill_confidence_floor: f64,
    /// Confidence lost at full fatigue.
    pub fatigue_confidence_penalty: f64,
    /// Fraction of remaining doubt removed by each prior sample of the same attribute.
    pub repeat_gain: f64,
    /// Quality bonus at full familiarity with the player's country.
    pub familiarity_quality_bonus: f64,
    pub max_quality_bonus: f64,
    /// Assistants see the same day at this fraction of its quality.
    pub assistant_quality_factor: f64,
    /// Assistants observe with the scout's skill minus this many levels.
    pub assistant_skill_gap: u8,
    /// Players picked per observing day when no focus was planned.
    pub auto_targets: usize,
}

impl Default for ObservationConfig {
    fn default() -> Self {
        Self {
            max_skill: 20,
            noise_fraction: 0.2,
            skill_noise_dampening: 0.7,
            fatigue_noise_growth: 0.5,
            quality_noise_dampening: 0.5,
            skill_confidence_floor: 0.4,
            fatigue_confidence_penalty: 0.4,
            repeat_gain: 0.25,
            familiarity_quality_bonus: 0.1,
            max_quality_bonus: 0.2,
            assistant_quality_factor: 0.8,
            assistant_skill_gap: 2,
            auto_targets: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FatigueConfig {
    /// Recovery on the first rest day in a row.
    pub rest_recovery: i16,
    /// Each further consecutive rest day recovers this fraction of the previous one.
    pub rest_diminishing: f64,
    pub exhaustion_threshold: u8,
}

impl Default for FatigueConfig {
    fn default() -> Self {
        Self {
            rest_recovery: 18,
            rest_diminishing: 0.6,
            exhaustion_threshold: 85,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionConfig {
    /// XP cost per level: level `n` needs `n * xp_per_level` to advance.
    pub xp_per_level: u32,
    pub starting_skill: u8,
    pub starting_reputation: f64,
    /// Reputation gained per networking day.
    pub networking_reputation: f64,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            xp_per_level: 12,
            starting_skill: 6,
            starting_reputation: 20.0,
            networking_reputation: 0.3,
        }
    }
}

/// What one day of an activity exposes and costs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivityProfile {
    /// 0.0–1.0 base quality of the view this activity gives.
    pub quality: f64,
    /// How many attributes of each domain one day samples. Missing or zero
    /// means the domain is not visible.
    pub domain_slots: BTreeMap<Domain, u8>,
    pub fatigue_cost: i16,
    pub xp: BTreeMap<Discipline, u32>,
    /// XP for the chosen discipline on training days.
    pub training_xp: u32,
    pub travel_cost: i64,
    pub requires_booking: bool,
    /// Chance a day of this activity produces a contract offer.
    pub offer_chance: f64,
}

impl ActivityProfile {
    pub fn observes_players(&self) -> bool {
        self.domain_slots.values().any(|s| *s > 0)
    }

    pub fn slots_for(&self, domain: Domain) -> u8 {
        self.domain_slots.get(&domain).copied().unwrap_or(0)
    }
}

impl Default for ActivityProfile {
    fn default() -> Self {
        Self {
            quality: 0.5,
            domain_slots: BTreeMap::new(),
            fatigue_cost: 8,
            xp: BTreeMap::new(),
            training_xp: 0,
            travel_cost: 0,
            requires_booking: false,
            offer_chance: 0.0,
        }
    }
}

fn slots(entries: &[(Domain, u8)]) -> BTreeMap<Domain, u8> {
    entries.iter().copied().collect()
}

fn xp(entries: &[(Discipline, u32)]) -> BTreeMap<Discipline, u32> {
    entries.iter().copied().collect()
}

fn default_activities() -> BTreeMap<ActivityKind, ActivityProfile> {
    use Discipline as X;
    use Domain as D;

    let mut table = BTreeMap::new();
    table.insert(
        ActivityKind::AttendMatch,
        ActivityProfile {
            quality: 0.7,
            domain_slots: slots(&[(D::Technical, 5), (D::Physical, 3), (D::Mental, 2), (D::Tactical, 2)]),
            fatigue_cost: 12,
            xp: xp(&[(X::Technical, 10), (X::Physical, 6), (X::Tactical, 4)]),
            travel_cost: 40,
            ..ActivityProfile::default()
        },
    );
    table.insert(
        ActivityKind::VideoAnalysis,
        ActivityProfile {
            quality: 0.55,
            domain_slots: slots(&[(D::Technical, 3), (D::Tactical, 3), (D::Mental, 1)]),
            fatigue_cost: 6,
            xp: xp(&[(X::Tactical, 10), (X::Analysis, 6)]),
            ..ActivityProfile::default()
        },
    );
    table.insert(
        ActivityKind::TrainingGround,
        ActivityProfile {
            quality: 0.6,
            domain_slots: slots(&[(D::Physical, 4), (D::Technical, 3), (D::Mental, 2), (D::Tactical, 1)]),
            fatigue_cost: 8,
            xp: xp(&[(X::Physical, 10), (X::Mental, 4)]),
            travel_cost: 20,
            ..ActivityProfile::default()
        },
    );
    table.insert(
        ActivityKind::YouthTournament,
        ActivityProfile {
            quality: 0.5,
            domain_slots: slots(&[(D::Technical, 3), (D::Physical, 3), (D::Mental, 2), (D::Tactical, 1)]),
            fatigue_cost: 14,
            xp: xp(&[(X::Technical, 6), (X::Mental, 6)]),
            travel_cost: 60,
            offer_chance: 0.05,
            ..ActivityProfile::default()
        },
    );
    table.insert(
        ActivityKind::InternationalTrip,
        ActivityProfile {
            quality: 0.65,
            domain_slots: slots(&[(D::Technical, 4), (D::Physical, 3), (D::Mental, 2), (D::Tactical, 2)]),
            fatigue_cost: 18,
            xp: xp(&[(X::Technical, 8), (X::Mental, 4), (X::Tactical, 4)]),
            requires_booking: true,
            ..ActivityProfile::default()
        },
    );
    table.insert(
        ActivityKind::ReportWriting,
        ActivityProfile {
            quality: 0.0,
            fatigue_cost: 5,
            xp: xp(&[(X::Analysis, 12)]),
            ..ActivityProfile::default()
        },
    );
    table.insert(
        ActivityKind::Networking,
        ActivityProfile {
            quality: 0.0,
            fatigue_cost: 7,
            xp: xp(&[(X::Networking, 12)]),
            travel_cost: 30,
            offer_chance: 0.35,
            ..ActivityProfile::default()
        },
    );
    table.insert(
        ActivityKind::SkillTraining,
        ActivityProfile {
            quality: 0.0,
            fatigue_cost: 9,
            training_xp: 24,
            ..ActivityProfile::default()
        },
    );
    table
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistressConfig {
    /// Negative weeks in a row beyond which each rung applies.
    pub warning_after: u32,
    pub distressed_after: u32,
    pub critical_after: u32,
    pub bankruptcy_after: u32,
    /// Solvent weeks in a row needed to climb one rung back.
    pub recovery_window: u32,
    /// Weeks spent in bankruptcy before recovery can start.
    pub bankruptcy_recovery_weeks: u32,
    /// Extra negative weeks added to the streak by a missed loan payment.
    pub missed_payment_streak_penalty: u32,
    /// Fraction cut from discretionary expenses while distressed or worse.
    pub cutback_rate: f64,
    pub distressed_reputation_decay: f64,
    pub critical_attrition_chance: f64,
    /// Reputation is multiplied by this on bankruptcy.
    pub bankruptcy_reputation_factor: f64,
}

impl Default for DistressConfig {
    fn default() -> Self {
        Self {
            warning_after: 2,
            distressed_after: 5,
            critical_after: 8,
            bankruptcy_after: 11,
            recovery_window: 3,
            bankruptcy_recovery_weeks: 8,
            missed_payment_streak_penalty: 1,
            cutback_rate: 0.5,
            distressed_reputation_decay: 0.5,
            critical_attrition_chance: 0.35,
            bankruptcy_reputation_factor: 0.5,
        }
    }
}

impl DistressConfig {
    /// The rung a streak of negative weeks calls for.
    pub fn level_for_streak(&self, negative_weeks: u32) -> DistressLevel {
        if negative_weeks > self.bankruptcy_after {
            DistressLevel::Bankruptcy
        } else if negative_weeks > self.critical_after {
            DistressLevel::Critical
        } else if negative_weeks > self.distressed_after {
            DistressLevel::Distressed
        } else if negative_weeks > self.warning_after {
            DistressLevel::Warning
        } else {
            DistressLevel::Healthy
        }
    }
}

/// How a damaged credit score heals while the scout stays solvent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "curve", rename_all = "snake_case")]
pub enum CreditRecovery {
    Linear { per_week: i32 },
    Stepped { points: i32, every_weeks: u32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreditConfig {
    pub starting_score: i32,
    pub floor: i32,
    pub ceiling: i32,
    /// Score the recovery curve heals toward; never above this without on-time payments.
    pub recovery_target: i32,
    pub recovery: CreditRecovery,
    pub missed_payment_penalty: i32,
    pub on_time_payment_bonus: i32,
    pub early_repayment_bonus: i32,
    pub bankruptcy_penalty: i32,
}

impl Default for CreditConfig {
    fn default() -> Self {
        Self {
            starting_score: 620,
            floor: 300,
            ceiling: 850,
            recovery_target: 650,
            recovery: CreditRecovery::Stepped {
                points: 10,
                every_weeks: 4,
            },
            missed_payment_penalty: 35,
            on_time_payment_bonus: 4,
            early_repayment_bonus: 15,
            bankruptcy_penalty: 150,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoanProduct {
    pub max_amount: i64,
    pub annual_rate: f64,
    pub term_months: u32,
    pub min_credit_score: i32,
    /// Worst distress level at which the product is still offered.
    pub max_distress: DistressLevel,
}

impl Default for LoanProduct {
    fn default() -> Self {
        Self {
            max_amount: 5_000,
            annual_rate: 0.12,
            term_months: 12,
            min_credit_score: 550,
            max_distress: DistressLevel::Warning,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinanceConfig {
    pub starting_balance: i64,
    pub weeks_per_month: u32,
    pub salaries: BTreeMap<CareerTier, i64>,
    pub fixed_expenses: BTreeMap<ExpenseCategory, i64>,
    pub staff_wages: BTreeMap<StaffRole, i64>,
    pub max_staff: BTreeMap<CareerTier, usize>,
    pub max_retainers: BTreeMap<CareerTier, usize>,
    pub distress: DistressConfig,
    pub credit: CreditConfig,
    pub loans: BTreeMap<LoanType, LoanProduct>,
    pub offer_expiry_weeks: u32,
    pub retainer_suspend_after: u32,
    pub consulting_failure_reputation: f64,
    pub sell_on_percentage: f64,
    pub sell_on_weekly_chance: f64,
    /// Weekly retainer fee at zero reputation; scales up with reputation.
    pub retainer_base_fee: i64,
    pub consulting_base_fee: i64,
    /// Weeks of wages a hire needs in the bank up front.
    pub wage_reserve_weeks: i64,
}

impl Default for FinanceConfig {
    fn default() -> Self {
        use CareerTier::*;
        Self {
            starting_balance: 2_500,
            weeks_per_month: 4,
            salaries: [(Freelance, 0), (ClubScout, 650), (HeadScout, 1_300), (Director, 2_600)]
                .into_iter()
                .collect(),
            fixed_expenses: [(ExpenseCategory::Rent, 220), (ExpenseCategory::Subscriptions, 60)]
                .into_iter()
                .collect(),
            staff_wages: [(StaffRole::Assistant, 180), (StaffRole::Analyst, 260)]
                .into_iter()
                .collect(),
            max_staff: [(Freelance, 1), (ClubScout, 2), (HeadScout, 4), (Director, 6)]
                .into_iter()
                .collect(),
            max_retainers: [(Freelance, 2), (ClubScout, 3), (HeadScout, 4), (Director, 5)]
                .into_iter()
                .collect(),
            distress: DistressConfig::default(),
            credit: CreditConfig::default(),
            loans: [
                (
                    LoanType::Personal,
                    LoanProduct {
                        max_amount: 3_000,
                        annual_rate: 0.14,
                        term_months: 12,
                        min_credit_score: 560,
                        max_distress: DistressLevel::Warning,
                    },
                ),
                (
                    LoanType::Business,
                    LoanProduct {
                        max_amount: 12_000,
                        annual_rate: 0.09,
                        term_months: 24,
                        min_credit_score: 640,
                        max_distress: DistressLevel::Healthy,
                    },
                ),
                (
                    LoanType::Emergency,
                    LoanProduct {
                        max_amount: 1_500,
                        annual_rate: 0.28,
                        term_months: 6,
                        min_credit_score: 380,
                        max_distress: DistressLevel::Critical,
                    },
                ),
            ]
            .into_iter()
            .collect(),
            offer_expiry_weeks: 2,
            retainer_suspend_after: 2,
            consulting_failure_reputation: 3.0,
            sell_on_percentage: 0.1,
            sell_on_weekly_chance: 0.02,
            retainer_base_fee: 120,
            consulting_base_fee: 600,
            wage_reserve_weeks: 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub base_price: i64,
    pub review_delay_weeks: u32,
    /// Accuracy at or above this vindicates a report.
    pub accuracy_threshold: f64,
    /// Reputation per unit of accuracy margin before the conviction weight.
    pub reputation_scale: f64,
    pub conviction_weights: BTreeMap<Conviction, f64>,
    pub placement_fee: i64,
    /// Reference transfer fee of a player of maximum true ability.
    pub sell_on_reference_fee: i64,
    /// Sale value bonus per analyst on staff.
    pub analyst_price_bonus: f64,
}

impl ReportConfig {
    pub fn weight(&self, conviction: Conviction) -> f64 {
        self.conviction_weights.get(&conviction).copied().unwrap_or(1.0)
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            base_price: 180,
            review_delay_weeks: 4,
            accuracy_threshold: 0.85,
            reputation_scale: 40.0,
            conviction_weights: [
                (Conviction::Note, 0.5),
                (Conviction::Recommend, 1.0),
                (Conviction::StrongRecommend, 1.6),
                (Conviction::TablePound, 2.5),
            ]
            .into_iter()
            .collect(),
            placement_fee: 1_500,
            sell_on_reference_fee: 40_000,
            analyst_price_bonus: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseDef {
    pub id: String,
    pub name: String,
    pub cost: i64,
    pub duration_weeks: u32,
    pub required_tier: CareerTier,
    #[serde(default)]
    pub prerequisites: Vec<String>,
    pub skill: Discipline,
    pub skill_levels: u8,
    #[serde(default)]
    pub promotes_to: Option<CareerTier>,
}

fn default_courses() -> Vec<CourseDef> {
    let course = |id: &str, name: &str, cost, weeks, tier, prereqs: &[&str], skill, levels, promo| CourseDef {
        id: id.to_string(),
        name: name.to_string(),
        cost,
        duration_weeks: weeks,
        required_tier: tier,
        prerequisites: prereqs.iter().map(|p| p.to_string()).collect(),
        skill,
        skill_levels: levels,
        promotes_to: promo,
    };
    vec![
        course("video_analysis_cert", "Video Analysis Certificate", 400, 2, CareerTier::Freelance, &[], Discipline::Tactical, 1, None),
        course("scouting_level_1", "Scouting Award Level 1", 900, 4, CareerTier::Freelance, &[], Discipline::Technical, 1, Some(CareerTier::ClubScout)),
        course("scouting_level_2", "Scouting Award Level 2", 2_000, 6, CareerTier::ClubScout, &["scouting_level_1"], Discipline::Mental, 2, Some(CareerTier::HeadScout)),
        course("performance_data", "Performance Data Science", 1_500, 4, CareerTier::ClubScout, &[], Discipline::Analysis, 2, None),
        course("executive_programme", "Football Executive Programme", 5_000, 8, CareerTier::HeadScout, &["scouting_level_2"], Discipline::Networking, 2, Some(CareerTier::Director)),
    ]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentDef {
    pub key: String,
    pub name: String,
    pub cost: i64,
    pub resale_value: i64,
    pub weekly_upkeep: i64,
    /// Added to the quality of every observing activity.
    pub quality_bonus: f64,
}

fn default_equipment() -> Vec<EquipmentDef> {
    let item = |key: &str, name: &str, cost, resale, upkeep, bonus| EquipmentDef {
        key: key.to_string(),
        name: name.to_string(),
        cost,
        resale_value: resale,
        weekly_upkeep: upkeep,
        quality_bonus: bonus,
    };
    vec![
        item("binoculars", "Stadium Binoculars", 200, 60, 0, 0.02),
        item("laptop", "Scouting Laptop", 900, 300, 5, 0.03),
        item("video_suite", "Video Analysis Suite", 1_600, 500, 25, 0.05),
        item("car", "Reliable Car", 6_000, 3_000, 60, 0.02),
    ]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TravelConfig {
    pub home_country: String,
    /// Destination key to base trip cost.
    pub destinations: BTreeMap<String, i64>,
    pub familiarity_per_trip_day: u8,
    /// Share of the trip cost saved at full familiarity.
    pub familiarity_discount: f64,
}

impl Default for TravelConfig {
    fn default() -> Self {
        Self {
            home_country: "england".to_string(),
            destinations: [
                ("argentina", 1_700),
                ("brazil", 1_800),
                ("france", 600),
                ("japan", 2_000),
                ("netherlands", 550),
                ("nigeria", 1_200),
                ("portugal", 600),
                ("spain", 650),
            ]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect(),
            familiarity_per_trip_day: 6,
            familiarity_discount: 0.3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RivalConfig {
    /// Progress a rival needs on a target before it can sign them.
    pub completion_threshold: u32,
    pub switch_chance: f64,
    /// A challenger must score this multiple of the current target to lure a rival away.
    pub switch_margin: f64,
    pub signing_intent: BTreeMap<BudgetTier, f64>,
    /// Highest buzz each budget can chase.
    pub buzz_ceiling: BTreeMap<BudgetTier, f64>,
    pub selection_jitter: f64,
    /// Warn the scout when a rival is this close on a shared target.
    pub closing_in_margin: u32,
}

impl RivalConfig {
    pub fn intent(&self, budget: BudgetTier) -> f64 {
        self.signing_intent.get(&budget).copied().unwrap_or(1.0)
    }

    pub fn ceiling(&self, budget: BudgetTier) -> f64 {
        self.buzz_ceiling.get(&budget).copied().unwrap_or(1.0)
    }
}

impl Default for RivalConfig {
    fn default() -> Self {
        Self {
            completion_threshold: 5,
            switch_chance: 0.1,
            switch_margin: 1.25,
            signing_intent: [(BudgetTier::Low, 0.5), (BudgetTier::Mid, 0.75), (BudgetTier::High, 1.0)]
                .into_iter()
                .collect(),
            buzz_ceiling: [(BudgetTier::Low, 0.55), (BudgetTier::Mid, 0.8), (BudgetTier::High, 1.0)]
                .into_iter()
                .collect(),
            selection_jitter: 0.05,
            closing_in_margin: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NarrativeConfig {
    /// Weeks a condition must persist to reach escalation 1 and 2.
    pub escalating_after: u32,
    pub critical_after: u32,
    pub chain_max_steps: u32,
    pub chain_step_delay_days: u32,
    pub mentorship_min_reputation: f64,
    pub mentorship_weekly_chance: f64,
    pub rival_stall_weeks: u32,
}

impl Default for NarrativeConfig {
    fn default() -> Self {
        Self {
            escalating_after: 2,
            critical_after: 4,
            chain_max_steps: 3,
            chain_step_delay_days: 7,
            mentorship_min_reputation: 30.0,
            mentorship_weekly_chance: 0.04,
            rival_stall_weeks: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SetupConfig {
    pub scout_name: String,
    pub players: usize,
    pub rivals: usize,
    pub min_age: u8,
    pub max_age: u8,
}

impl Default for SetupConfig {
    fn default() -> Self {
        Self {
            scout_name: "Alex Morgan".to_string(),
            players: 40,
            rivals: 4,
            min_age: 16,
            max_age: 31,
        }
    }
}

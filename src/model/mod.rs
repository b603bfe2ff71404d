#[macro_use]
mod macros;

pub mod achievement;
pub mod attribute;
pub mod finance;
pub mod inbox;
pub mod narrative;
pub mod observation;
pub mod player;
pub mod report;
pub mod rival;
pub mod schedule;
pub mod scout;
pub mod state;
pub mod timestamp;

pub use achievement::AchievementId;
pub use attribute::{AttributeId, AttributeScale, Discipline, Domain};
pub use finance::{
    Contract, ContractStatus, ContractTerms, DistressLevel, EquipmentItem, ExpenseCategory,
    FinanceWeekSummary, Finances, IncomeSource, Loan, LoanType, SellOnClause, StaffMember,
    StaffRole,
};
pub use inbox::{InboxMessage, MessageCategory, Notification, Severity};
pub use narrative::{
    ChainKind, ChainLink, Condition, Escalation, EventChain, EventStatus, NarrativeChoice,
    NarrativeEffect, NarrativeEvent, NarrativeKind, NarrativeState,
};
pub use observation::{ActivityKind, AttributeReading, Observation, PerceivedProfile};
pub use player::{Availability, Player, Position};
pub use report::{Conviction, Report, ReportReview, Verdict};
pub use rival::{BudgetTier, RivalActivity, RivalActivityKind, RivalPersonality, RivalScout, SharedTarget};
pub use schedule::{DayResult, DayStatus, DegradedReason, PlannedActivity, WeekPlan, WeekSimulation};
pub use scout::{CareerTier, CourseEnrollment, Scout, SkillLevel, TravelBooking};
pub use state::{CareerMilestones, GameState};
pub use timestamp::{DAYS_PER_WEEK, GameDate};

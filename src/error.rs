use thiserror::Error;

use crate::id::{ContractId, EventId, PlayerId};
use crate::model::{CareerTier, ContractStatus, DistressLevel, LoanType};

/// Why a command was turned down. State is untouched whenever one of these
/// is returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Rejection {
    #[error("insufficient funds: need {required}, have {available}")]
    InsufficientFunds { required: i64, available: i64 },
    #[error("not eligible: {0}")]
    NotEligible(#[from] Ineligibility),
    #[error("no free {what} slot (limit {limit})")]
    SlotCapacity { what: &'static str, limit: usize },
    #[error("day {0} is not a valid slot")]
    InvalidSlot(u8),
    #[error("day {0} has already been resolved")]
    DayAlreadyResolved(u8),
    #[error("unknown player {0}")]
    UnknownPlayer(PlayerId),
    #[error("{0} is no longer available")]
    PlayerUnavailable(PlayerId),
    #[error("no observations recorded for {0}")]
    NoObservations(PlayerId),
    #[error("nothing new on {0} since the last report")]
    NoNewObservations(PlayerId),
    #[error("unknown contract {0}")]
    UnknownContract(ContractId),
    #[error("contract {id} is {status}, expected {expected}")]
    ContractState {
        id: ContractId,
        status: ContractStatus,
        expected: &'static str,
    },
    #[error("contract {id} is not a {expected} contract")]
    WrongContractKind { id: ContractId, expected: &'static str },
    #[error("a loan is already active")]
    LoanAlreadyActive,
    #[error("no active loan")]
    NoActiveLoan,
    #[error("no {0} loan product on offer")]
    UnknownLoanProduct(LoanType),
    #[error("invalid amount {0}")]
    InvalidAmount(i64),
    #[error("unknown narrative event {0}")]
    UnknownEvent(EventId),
    #[error("narrative event {0} is already resolved")]
    EventAlreadyResolved(EventId),
    #[error("narrative event {0} needs a choice first")]
    ChoiceRequired(EventId),
    #[error("narrative event {0} has no choices")]
    NoChoices(EventId),
    #[error("choice {index} out of range ({available} available)")]
    InvalidChoice { index: usize, available: usize },
    #[error("unknown course {0}")]
    UnknownCourse(String),
    #[error("course {0} already completed")]
    CourseAlreadyCompleted(String),
    #[error("already enrolled in {0}")]
    AlreadyEnrolled(String),
    #[error("travel already booked to {0}")]
    TravelAlreadyBooked(String),
    #[error("unknown destination {0}")]
    UnknownDestination(String),
    #[error("unknown equipment {0}")]
    UnknownEquipment(String),
    #[error("equipment {0} already owned")]
    AlreadyOwned(String),
}

/// The specific gate a scout failed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Ineligibility {
    #[error("requires tier {required}, currently {current}")]
    TierTooLow {
        required: CareerTier,
        current: CareerTier,
    },
    #[error("missing prerequisite {0}")]
    MissingPrerequisite(String),
    #[error("credit score {current} below {required}")]
    CreditScoreTooLow { required: i32, current: i32 },
    #[error("distress level {current} above {max}")]
    DistressTooHigh {
        max: DistressLevel,
        current: DistressLevel,
    },
    #[error("amount above the {max} limit")]
    AmountTooHigh { max: i64 },
}

impl Rejection {
    /// Stable reason code for the boundary layer.
    pub fn code(&self) -> &'static str {
        match self {
            Rejection::InsufficientFunds { .. } => "insufficient_funds",
            Rejection::NotEligible(_) => "not_eligible",
            Rejection::SlotCapacity { .. } => "slot_capacity",
            Rejection::InvalidSlot(_) => "invalid_slot",
            Rejection::DayAlreadyResolved(_) => "day_already_resolved",
            Rejection::UnknownPlayer(_) => "unknown_player",
            Rejection::PlayerUnavailable(_) => "player_unavailable",
            Rejection::NoObservations(_) => "no_observations",
            Rejection::NoNewObservations(_) => "no_new_observations",
            Rejection::UnknownContract(_) => "unknown_contract",
            Rejection::ContractState { .. } => "contract_state",
            Rejection::WrongContractKind { .. } => "wrong_contract_kind",
            Rejection::LoanAlreadyActive => "loan_already_active",
            Rejection::NoActiveLoan => "no_active_loan",
            Rejection::UnknownLoanProduct(_) => "unknown_loan_product",
            Rejection::InvalidAmount(_) => "invalid_amount",
            Rejection::UnknownEvent(_) => "unknown_event",
            Rejection::EventAlreadyResolved(_) => "event_already_resolved",
            Rejection::ChoiceRequired(_) => "choice_required",
            Rejection::NoChoices(_) => "no_choices",
            Rejection::InvalidChoice { .. } => "invalid_choice",
            Rejection::UnknownCourse(_) => "unknown_course",
            Rejection::CourseAlreadyCompleted(_) => "course_already_completed",
            Rejection::AlreadyEnrolled(_) => "already_enrolled",
            Rejection::TravelAlreadyBooked(_) => "travel_already_booked",
            Rejection::UnknownDestination(_) => "unknown_destination",
            Rejection::UnknownEquipment(_) => "unknown_equipment",
            Rejection::AlreadyOwned(_) => "already_owned",
        }
    }
}

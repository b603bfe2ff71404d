use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::id::{ContractId, PlayerId, StaffId};

/// Ordered financial health ladder. Moves at most one rung per weekly evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistressLevel {
    Healthy,
    Warning,
    Distressed,
    Critical,
    Bankruptcy,
}

labelled_enum!(DistressLevel {
    Healthy => "healthy",
    Warning => "warning",
    Distressed => "distressed",
    Critical => "critical",
    Bankruptcy => "bankruptcy",
});

impl DistressLevel {
    pub fn rung(self) -> u8 {
        self as u8
    }

    pub fn worse(self) -> Self {
        match self {
            DistressLevel::Healthy => DistressLevel::Warning,
            DistressLevel::Warning => DistressLevel::Distressed,
            DistressLevel::Distressed => DistressLevel::Critical,
            DistressLevel::Critical | DistressLevel::Bankruptcy => DistressLevel::Bankruptcy,
        }
    }

    pub fn better(self) -> Self {
        match self {
            DistressLevel::Healthy | DistressLevel::Warning => DistressLevel::Healthy,
            DistressLevel::Distressed => DistressLevel::Warning,
            DistressLevel::Critical => DistressLevel::Distressed,
            DistressLevel::Bankruptcy => DistressLevel::Critical,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseCategory {
    Rent,
    Subscriptions,
    Travel,
    EquipmentUpkeep,
    StaffWages,
    Courses,
    Equipment,
    LoanRepayment,
}

labelled_enum!(ExpenseCategory {
    Rent => "rent",
    Subscriptions => "subscriptions",
    Travel => "travel",
    EquipmentUpkeep => "equipment_upkeep",
    StaffWages => "staff_wages",
    Courses => "courses",
    Equipment => "equipment",
    LoanRepayment => "loan_repayment",
});

impl ExpenseCategory {
    /// Categories cut back while distressed.
    pub fn is_discretionary(self) -> bool {
        matches!(
            self,
            ExpenseCategory::Subscriptions | ExpenseCategory::Travel | ExpenseCategory::EquipmentUpkeep
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncomeSource {
    Salary,
    ReportSales,
    RetainerFees,
    ConsultingFees,
    PlacementFees,
    SellOnClauses,
    Liquidation,
    Windfall,
}

labelled_enum!(IncomeSource {
    Salary => "salary",
    ReportSales => "report_sales",
    RetainerFees => "retainer_fees",
    ConsultingFees => "consulting_fees",
    PlacementFees => "placement_fees",
    SellOnClauses => "sell_on_clauses",
    Liquidation => "liquidation",
    Windfall => "windfall",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractStatus {
    Pending,
    Active,
    Suspended,
    Cancelled,
    Completed,
}

labelled_enum!(ContractStatus {
    Pending => "pending",
    Active => "active",
    Suspended => "suspended",
    Cancelled => "cancelled",
    Completed => "completed",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContractTerms {
    /// Recurring fee in exchange for a report quota per period.
    Retainer {
        weekly_fee: i64,
        quota_per_period: u32,
        period_weeks: u32,
        term_weeks: u32,
    },
    /// One-off fee for a report, optionally on a named player, by a deadline.
    Consulting {
        fee: i64,
        target: Option<PlayerId>,
        deadline_week: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    pub id: ContractId,
    pub client: String,
    pub terms: ContractTerms,
    pub status: ContractStatus,
    pub offered_week: u32,
    /// Pending offers lapse after this week.
    pub offer_expires_week: u32,
    pub started_week: Option<u32>,
    /// Reports delivered in the current retainer period.
    pub delivered: u32,
    pub period_start_week: u32,
    /// Consecutive retainer periods that ended under quota.
    pub missed_periods: u32,
}

impl Contract {
    pub fn is_retainer(&self) -> bool {
        matches!(self.terms, ContractTerms::Retainer { .. })
    }

    pub fn is_consulting(&self) -> bool {
        matches!(self.terms, ContractTerms::Consulting { .. })
    }

    /// Accepted and not yet terminated.
    pub fn is_live(&self) -> bool {
        matches!(self.status, ContractStatus::Active | ContractStatus::Suspended)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanType {
    Personal,
    Business,
    Emergency,
}

labelled_enum!(LoanType {
    Personal => "personal",
    Business => "business",
    Emergency => "emergency",
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    pub loan_type: LoanType,
    pub principal: i64,
    pub annual_rate: f64,
    pub term_months: u32,
    pub monthly_payment: i64,
    pub remaining_balance: i64,
    pub next_payment_week: u32,
    pub payments_made: u32,
    pub missed_payments: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentItem {
    pub key: String,
    pub name: String,
    pub resale_value: i64,
    pub weekly_upkeep: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaffRole {
    Assistant,
    Analyst,
}

labelled_enum!(StaffRole {
    Assistant => "assistant",
    Analyst => "analyst",
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffMember {
    pub id: StaffId,
    pub name: String,
    pub role: StaffRole,
    pub weekly_wage: i64,
    pub hired_week: u32,
}

/// A cut of a future transfer fee for a player the scout placed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SellOnClause {
    pub player_id: PlayerId,
    pub percentage: f64,
    pub reference_fee: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinanceWeekSummary {
    pub week: u32,
    pub income: BTreeMap<IncomeSource, i64>,
    pub expenses: BTreeMap<ExpenseCategory, i64>,
    pub net: i64,
    pub balance_after: i64,
    pub distress: DistressLevel,
}

/// Counters that drive the distress ladder between evaluations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistressTracker {
    pub consecutive_negative_weeks: u32,
    pub consecutive_solvent_weeks: u32,
    /// Weeks left before bankruptcy may start unwinding.
    pub recovery_countdown: Option<u32>,
    /// Weeks since the last credit score recovery step.
    pub weeks_since_credit_step: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finances {
    pub balance: i64,
    pub fixed_expenses: BTreeMap<ExpenseCategory, i64>,
    pub contracts: BTreeMap<ContractId, Contract>,
    pub loan: Option<Loan>,
    pub credit_score: i32,
    pub distress: DistressLevel,
    pub tracker: DistressTracker,
    pub equipment: Vec<EquipmentItem>,
    pub staff: BTreeMap<StaffId, StaffMember>,
    pub sell_on_clauses: Vec<SellOnClause>,
    /// Income earned this week, settled at week end.
    pub pending_income: BTreeMap<IncomeSource, i64>,
    /// Costs already paid this week by explicit commands (for the summary).
    pub paid_this_week: BTreeMap<ExpenseCategory, i64>,
    pub history: Vec<FinanceWeekSummary>,
}

impl Finances {
    pub fn new(balance: i64, credit_score: i32, fixed_expenses: BTreeMap<ExpenseCategory, i64>) -> Self {
        Self {
            balance,
            fixed_expenses,
            contracts: BTreeMap::new(),
            loan: None,
            credit_score,
            distress: DistressLevel::Healthy,
            tracker: DistressTracker::default(),
            equipment: Vec::new(),
            staff: BTreeMap::new(),
            sell_on_clauses: Vec::new(),
            pending_income: BTreeMap::new(),
            paid_this_week: BTreeMap::new(),
            history: Vec::new(),
        }
    }

    pub fn accrue(&mut self, source: IncomeSource, amount: i64) {
        *self.pending_income.entry(source).or_insert(0) += amount;
    }

    /// Deduct an immediate purchase. Callers check affordability first.
    pub fn charge(&mut self, category: ExpenseCategory, amount: i64) {
        self.balance -= amount;
        *self.paid_this_week.entry(category).or_insert(0) += amount;
    }

    pub fn can_afford(&self, amount: i64) -> bool {
        self.balance >= amount
    }

    pub fn live_retainers(&self) -> impl Iterator<Item = &Contract> {
        self.contracts
            .values()
            .filter(|c| c.is_retainer() && c.is_live())
    }

    pub fn owns_equipment(&self, key: &str) -> bool {
        self.equipment.iter().any(|e| e.key == key)
    }
}

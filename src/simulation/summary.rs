//! Output structures for simulation runs

use serde::{Deserialize, Serialize};

/// One simulated year of flows and closing balances
///
/// Flow amounts are positive magnitudes except `adjustments`, which is the
/// signed net of the year's one-off items.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct YearSummary {
    // Timing
    pub year: i32,
    pub ages: Vec<i32>,

    // Income
    pub gross_salary: f64,
    pub roth_contributions: f64,
    /// Salary left after Roth contributions, booked as taxed income
    pub salary_to_taxed_income: f64,
    pub social_security: f64,

    // Spending
    pub budget_expenses: f64,
    pub housing_expenses: f64,
    pub healthcare_expenses: f64,
    pub adjustments: f64,

    // Retirement account movements
    pub rmd: f64,
    pub roth_conversions: f64,
    pub ira_distributions: f64,
    pub roth_distributions: f64,
    pub shortfall_ira: f64,
    pub shortfall_roth: f64,

    // Taxes
    pub taxable_income: f64,
    pub income_tax: f64,

    /// Net amount swept from transient accounts into savings
    pub swept: f64,

    // Market
    pub return_pct: f64,
    pub inflation_pct: f64,

    // Closing balances (after the market adjustment)
    pub savings: f64,
    pub deferred_ira: f64,
    pub roth: f64,
    pub net_worth: f64,
}

impl YearSummary {
    pub fn new(year: i32, ages: Vec<i32>) -> Self {
        Self {
            year,
            ages,
            ..Default::default()
        }
    }

    /// Budget + housing + healthcare
    pub fn expenses(&self) -> f64 {
        self.budget_expenses + self.housing_expenses + self.healthcare_expenses
    }

    /// Money entering the household minus money leaving it
    ///
    /// Transfers between the household's own accounts net to zero, so with no
    /// market growth this is exactly the year's change in net worth.
    pub fn net_cashflow(&self) -> f64 {
        self.gross_salary + self.social_security + self.adjustments - self.expenses() - self.income_tax
    }
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunOutcome {
    /// Savings stayed positive for every simulated year
    Completed,
    /// Savings could not be kept above zero in `year`
    Insolvent { year: i32 },
}

impl RunOutcome {
    pub fn is_insolvent(&self) -> bool {
        matches!(self, RunOutcome::Insolvent { .. })
    }
}

/// Complete result of one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    /// Base seed of the random source
    pub seed: u64,

    /// Stream of the base seed this run drew from (its Monte Carlo index)
    pub stream: u64,

    /// Net worth at the start and at the end of every year, `num_years + 1`
    /// values; zero from the insolvent year on
    pub trajectory: Vec<f64>,

    pub outcome: RunOutcome,

    /// Per-year detail, empty unless detailed output was requested
    pub years: Vec<YearSummary>,
}

impl RunResult {
    pub fn final_net_worth(&self) -> f64 {
        self.trajectory.last().copied().unwrap_or(0.0)
    }

    /// Net worth `offset` years in; past the horizon counts as zero
    pub fn net_worth_at(&self, offset: usize) -> f64 {
        self.trajectory.get(offset).copied().unwrap_or(0.0)
    }

    /// Strictly positive net worth at `offset`
    pub fn solvent_at(&self, offset: usize) -> bool {
        self.net_worth_at(offset) > 0.0
    }
}

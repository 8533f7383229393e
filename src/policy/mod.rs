//! Household configuration: who is in the family, what they start with, how
//! they spend and draw down, and how the market behaves

mod schedule;
mod expenses;
mod market;
mod example;
pub mod loader;

pub use schedule::{ScheduleChange, YearSchedule};
pub use expenses::{Adjustment, AdjustmentSchedule, ExpensePolicy, HealthcarePolicy, HousingCost};
pub use market::{BoundedGaussian, MarketModel, MarketSampler, MarketYear};
pub use loader::{load_default_household, load_household, load_household_from_reader, HouseholdConfig};

use crate::assumptions::HealthcareCostCurve;
use crate::household::{Family, Person};
use crate::ledger::Account;

/// Everything a simulation needs to know about one household
#[derive(Debug, Clone)]
pub struct HouseholdPolicy {
    /// Members and spouse links
    pub family: Family,

    /// Starting balances; missing accounts start at zero
    pub initial_balances: Vec<Account>,

    /// Budget, housing, healthcare and one-off adjustments
    pub expenses: ExpensePolicy,

    /// Percent of each tax-advantaged account voluntarily distributed per year
    pub distribution_percentage: YearSchedule,

    /// Savings floor maintained by drawing on the IRA then the Roth
    pub minimum_savings: YearSchedule,

    pub market: MarketModel,
}

impl HouseholdPolicy {
    pub fn budget_expenses(&self, year: i32) -> f64 {
        self.expenses.budget_expenses(year)
    }

    pub fn housing_expenses(&self, year: i32) -> f64 {
        self.expenses.housing_expenses(year)
    }

    pub fn healthcare_expenses(&self, year: i32, person: &Person, curve: &HealthcareCostCurve) -> f64 {
        self.expenses.healthcare_expenses(year, person, curve)
    }

    pub fn one_time_adjustments(&self, year: i32) -> impl Iterator<Item = &Adjustment> {
        self.expenses.one_time_adjustments(year)
    }

    pub fn distribution_percentage(&self, year: i32) -> f64 {
        self.distribution_percentage.value_for(year)
    }

    pub fn minimum_savings_balance(&self, year: i32) -> f64 {
        self.minimum_savings.value_for(year)
    }
}

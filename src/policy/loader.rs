//! Load a household from JSON
//!
//! People are listed once and referenced by name elsewhere (spouses and
//! account owners), then resolved to ids when the policy is built.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{ExpensePolicy, HouseholdPolicy, MarketModel, YearSchedule};
use crate::error::ConfigError;
use crate::household::{Family, Person};
use crate::ledger::{Account, Category, Owner};

/// Default household file used by the CLI when none is given
pub const DEFAULT_HOUSEHOLD_PATH: &str = "data/households/example.json";

/// One person as written in the household file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonConfig {
    pub name: String,
    /// `YYYY-MM-DD`
    pub birth_date: String,
    #[serde(default)]
    pub salary: f64,
    pub retirement_age: u32,
    pub ss_start_age: u32,
    /// Monthly benefit for claiming ages 62 through 70
    pub ss_monthly_benefits: Vec<f64>,
    #[serde(default)]
    pub spouse: Option<String>,
}

/// A starting balance; no owner means a household-wide account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceConfig {
    pub category: Category,
    #[serde(default)]
    pub owner: Option<String>,
    pub amount: f64,
}

/// Raw household file contents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HouseholdConfig {
    pub people: Vec<PersonConfig>,
    #[serde(default)]
    pub balances: Vec<BalanceConfig>,
    pub expenses: ExpensePolicy,
    #[serde(default)]
    pub distribution_percentage: YearSchedule,
    #[serde(default)]
    pub minimum_savings: YearSchedule,
    #[serde(default)]
    pub market: MarketModel,
}

impl HouseholdConfig {
    /// Resolve names and validate people
    pub fn into_policy(self) -> Result<HouseholdPolicy, ConfigError> {
        let members = self
            .people
            .iter()
            .map(|p| {
                Person::new(
                    &p.name,
                    &p.birth_date,
                    p.salary,
                    p.retirement_age,
                    p.ss_start_age,
                    &p.ss_monthly_benefits,
                )
            })
            .collect::<Result<Vec<_>, _>>()?;
        let mut family = Family::new(members)?;

        for p in &self.people {
            if let Some(spouse) = &p.spouse {
                family.marry_by_name(&p.name, spouse)?;
            }
        }

        let initial_balances = self
            .balances
            .iter()
            .map(|b| {
                let owner = match &b.owner {
                    Some(name) => Owner::Person(family.require(name)?),
                    None => Owner::Household,
                };
                Ok(Account::new(b.category, owner, b.amount))
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        self.expenses.validate()?;

        Ok(HouseholdPolicy {
            family,
            initial_balances,
            expenses: self.expenses,
            distribution_percentage: self.distribution_percentage,
            minimum_savings: self.minimum_savings,
            market: self.market,
        })
    }
}

/// Load a household from a JSON file
pub fn load_household<P: AsRef<Path>>(path: P) -> Result<HouseholdPolicy, ConfigError> {
    let file = File::open(path)?;
    load_household_from_reader(BufReader::new(file))
}

/// Load a household from any JSON reader
pub fn load_household_from_reader<R: Read>(reader: R) -> Result<HouseholdPolicy, ConfigError> {
    let config: HouseholdConfig = serde_json::from_reader(reader)?;
    log::info!("Loaded household of {} people", config.people.len());
    config.into_policy()
}

/// Load the bundled example household
pub fn load_default_household() -> Result<HouseholdPolicy, ConfigError> {
    load_household(DEFAULT_HOUSEHOLD_PATH)
}

//! Reference tables the yearly pipeline consults: tax brackets, RMD
//! divisors, contribution limits, Social Security ages, healthcare costs and
//! historical market returns

mod tax;
mod rmd;
mod social_security;
mod healthcare;
mod returns;
pub mod loader;

pub use tax::{FilingStatus, TaxBracket, TaxTable};
pub use rmd::{RmdError, RmdTable};
pub use social_security::{full_retirement_age, ContributionLimits};
pub use healthcare::{HealthStatus, HealthcareCostCurve};
pub use returns::HistoricalReturns;
pub use loader::LoadedAssumptions;

use std::path::Path;

use crate::error::ConfigError;

/// Container for all reference tables used by a simulation
#[derive(Debug, Clone)]
pub struct Assumptions {
    pub tax: TaxTable,
    pub rmd: RmdTable,
    pub contributions: ContributionLimits,
    pub healthcare: HealthcareCostCurve,
    pub historical_returns: HistoricalReturns,
}

impl Assumptions {
    /// Built-in tables (2023 tax brackets, 2025 contribution limits)
    pub fn default_2025() -> Self {
        Self {
            tax: TaxTable::federal_2023(),
            rmd: RmdTable::uniform_lifetime(),
            contributions: ContributionLimits::default(),
            healthcare: HealthcareCostCurve::default(),
            historical_returns: HistoricalReturns::sp500(),
        }
    }

    /// Load tables from CSV files in the default location (data/assumptions/)
    pub fn from_csv() -> Result<Self, ConfigError> {
        Self::from_csv_path(Path::new(loader::DEFAULT_ASSUMPTIONS_PATH))
    }

    /// Load tables from CSV files in a specific directory
    ///
    /// Contribution limits are not tabulated and keep their defaults.
    pub fn from_csv_path(path: &Path) -> Result<Self, ConfigError> {
        let loaded = LoadedAssumptions::load_from(path)?;

        Ok(Self {
            tax: TaxTable::from_loaded(&loaded),
            rmd: RmdTable::from_loaded(&loaded.rmd_divisors),
            contributions: ContributionLimits::default(),
            healthcare: HealthcareCostCurve::from_loaded(&loaded.healthcare_costs),
            historical_returns: HistoricalReturns::from_loaded(&loaded.historical_returns)?,
        })
    }
}

impl Default for Assumptions {
    fn default() -> Self {
        Self::default_2025()
    }
}

//! CSV-based assumption loader
//!
//! Loads reference tables from CSV files in data/assumptions/

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use super::tax::TaxBracket;
use crate::error::ConfigError;

/// Default path to assumptions directory
pub const DEFAULT_ASSUMPTIONS_PATH: &str = "data/assumptions";

#[derive(Debug, Deserialize)]
struct BracketRow {
    upper: Option<f64>,
    rate: f64,
}

#[derive(Debug, Deserialize)]
struct AgeValueRow {
    age: i32,
    #[serde(alias = "divisor", alias = "annual_cost")]
    value: f64,
}

#[derive(Debug, Deserialize)]
struct YearReturnRow {
    year: i32,
    return_pct: f64,
}

fn open(path: &Path, file_name: &str) -> Result<csv::Reader<File>, ConfigError> {
    let file = File::open(path.join(file_name)).map_err(|e| ConfigError::Table {
        file: file_name.to_string(),
        reason: e.to_string(),
    })?;
    Ok(csv::Reader::from_reader(file))
}

/// Load a bracket schedule; only the last bracket may leave `upper` empty
pub fn load_tax_brackets(path: &Path, file_name: &str) -> Result<Vec<TaxBracket>, ConfigError> {
    let mut reader = open(path, file_name)?;
    read_tax_brackets(&mut reader, file_name)
}

/// Upper bounds must be positive and strictly increasing so the estimate
/// stays monotonic in income
fn read_tax_brackets<R: Read>(
    reader: &mut csv::Reader<R>,
    file_name: &str,
) -> Result<Vec<TaxBracket>, ConfigError> {
    let table_error = |reason: String| ConfigError::Table {
        file: file_name.to_string(),
        reason,
    };
    let mut brackets = Vec::new();

    for result in reader.deserialize() {
        let row: BracketRow = result?;
        brackets.push(TaxBracket { upper: row.upper, rate: row.rate });
    }

    let open_ended = brackets.iter().filter(|b| b.upper.is_none()).count();
    if brackets.is_empty() || open_ended > 1 || brackets.last().and_then(|b| b.upper).is_some() {
        return Err(table_error(
            "expected brackets ending in exactly one open-ended bracket".to_string(),
        ));
    }

    let mut lower = 0.0;
    for bracket in &brackets {
        if bracket.rate < 0.0 {
            return Err(table_error(format!("negative rate {}", bracket.rate)));
        }
        if let Some(upper) = bracket.upper {
            if upper <= lower {
                return Err(table_error(format!(
                    "bracket bounds must increase, got {} after {}",
                    upper, lower
                )));
            }
            lower = upper;
        }
    }

    Ok(brackets)
}

/// Load RMD divisors as (age, divisor)
pub fn load_rmd_divisors(path: &Path) -> Result<Vec<(i32, f64)>, ConfigError> {
    load_age_values(path, "rmd_divisors.csv")
}

/// Load healthcare costs as (age, annual cost)
pub fn load_healthcare_costs(path: &Path) -> Result<Vec<(i32, f64)>, ConfigError> {
    load_age_values(path, "healthcare_costs.csv")
}

fn load_age_values(path: &Path, file_name: &str) -> Result<Vec<(i32, f64)>, ConfigError> {
    let mut reader = open(path, file_name)?;
    let mut values = Vec::new();

    for result in reader.deserialize() {
        let row: AgeValueRow = result?;
        values.push((row.age, row.value));
    }

    Ok(values)
}

/// Load annual market returns as (year, percent)
pub fn load_historical_returns(path: &Path) -> Result<Vec<(i32, f64)>, ConfigError> {
    let mut reader = open(path, "historical_returns.csv")?;
    let mut returns = Vec::new();

    for result in reader.deserialize() {
        let row: YearReturnRow = result?;
        returns.push((row.year, row.return_pct));
    }

    Ok(returns)
}

/// All assumption tables read from one directory
pub struct LoadedAssumptions {
    pub tax_brackets_single: Vec<TaxBracket>,
    pub tax_brackets_married: Vec<TaxBracket>,
    pub rmd_divisors: Vec<(i32, f64)>,
    pub healthcare_costs: Vec<(i32, f64)>,
    pub historical_returns: Vec<(i32, f64)>,
}

impl LoadedAssumptions {
    /// Load all assumptions from the default path
    pub fn load_default() -> Result<Self, ConfigError> {
        Self::load_from(Path::new(DEFAULT_ASSUMPTIONS_PATH))
    }

    /// Load all assumptions from a specific path
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let loaded = Self {
            tax_brackets_single: load_tax_brackets(path, "tax_brackets_single.csv")?,
            tax_brackets_married: load_tax_brackets(path, "tax_brackets_married.csv")?,
            rmd_divisors: load_rmd_divisors(path)?,
            healthcare_costs: load_healthcare_costs(path)?,
            historical_returns: load_historical_returns(path)?,
        };
        log::info!(
            "Loaded assumptions from {} ({} RMD ages, {} return years)",
            path.display(),
            loaded.rmd_divisors.len(),
            loaded.historical_returns.len()
        );
        Ok(loaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assumptions::{Assumptions, FilingStatus, HealthStatus};

    #[test]
    fn test_load_default_assumptions() {
        let result = LoadedAssumptions::load_default();
        assert!(result.is_ok(), "Failed to load assumptions: {:?}", result.err());

        let loaded = result.unwrap();
        assert_eq!(loaded.tax_brackets_single.len(), 7);
        assert_eq!(loaded.tax_brackets_married.len(), 7);
        assert_eq!(loaded.rmd_divisors.first(), Some(&(73, 24.7)));
        assert_eq!(loaded.rmd_divisors.last(), Some(&(115, 1.9)));
        assert_eq!(loaded.historical_returns.len(), 100);
        assert!(!loaded.healthcare_costs.is_empty());
    }

    #[test]
    fn test_csv_tables_match_built_in() {
        let from_csv = Assumptions::from_csv().expect("Failed to load assumptions");
        let built_in = Assumptions::default_2025();

        for income in [0.0, 25_000.0, 150_000.0, 900_000.0] {
            for status in [FilingStatus::Single, FilingStatus::MarriedJointly] {
                assert_eq!(
                    from_csv.tax.estimate_income_tax(income, status),
                    built_in.tax.estimate_income_tax(income, status)
                );
            }
        }
        for age in 60..=120 {
            assert_eq!(from_csv.rmd.divisor(age), built_in.rmd.divisor(age));
            assert_eq!(
                from_csv.healthcare.annual_cost(age, HealthStatus::Average),
                built_in.healthcare.annual_cost(age, HealthStatus::Average)
            );
        }
        for year in 1926..=2025 {
            assert_eq!(
                from_csv.historical_returns.return_for(year),
                built_in.historical_returns.return_for(year)
            );
        }
    }

    fn brackets_from(csv_text: &str) -> Result<Vec<TaxBracket>, ConfigError> {
        let mut reader = csv::Reader::from_reader(csv_text.as_bytes());
        read_tax_brackets(&mut reader, "brackets.csv")
    }

    #[test]
    fn test_tax_brackets_must_increase() {
        let brackets = brackets_from("upper,rate\n10000,0.10\n40000,0.20\n,0.30\n").unwrap();
        assert_eq!(brackets.len(), 3);

        let err = brackets_from("upper,rate\n40000,0.10\n10000,0.20\n,0.30\n").unwrap_err();
        assert!(matches!(err, ConfigError::Table { ref reason, .. } if reason.contains("increase")));

        let err = brackets_from("upper,rate\n10000,0.10\n10000,0.20\n,0.30\n").unwrap_err();
        assert!(matches!(err, ConfigError::Table { .. }));

        let err = brackets_from("upper,rate\n10000,-0.10\n,0.30\n").unwrap_err();
        assert!(matches!(err, ConfigError::Table { ref reason, .. } if reason.contains("negative")));

        let err = brackets_from("upper,rate\n10000,0.10\n40000,0.20\n").unwrap_err();
        assert!(matches!(err, ConfigError::Table { ref reason, .. } if reason.contains("open-ended")));
    }

    #[test]
    fn test_missing_directory() {
        let err = LoadedAssumptions::load_from(Path::new("does/not/exist"))
            .err()
            .expect("loading from a missing directory should fail");
        assert!(matches!(err, ConfigError::Table { .. }));
    }
}

//! Federal income tax estimate from marginal brackets
//!
//! Illustrative only: no deductions, credits or state tax.

use serde::{Deserialize, Serialize};

use super::loader::LoadedAssumptions;

/// Which bracket schedule applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilingStatus {
    Single,
    MarriedJointly,
}

/// One marginal bracket; the lower bound is the previous bracket's upper bound
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaxBracket {
    /// Top of the bracket (None = unbounded)
    pub upper: Option<f64>,
    /// Marginal rate as a fraction
    pub rate: f64,
}

impl TaxBracket {
    const fn new(upper: f64, rate: f64) -> Self {
        Self { upper: Some(upper), rate }
    }

    const fn top(rate: f64) -> Self {
        Self { upper: None, rate }
    }
}

/// Bracket schedules for both filing statuses
#[derive(Debug, Clone)]
pub struct TaxTable {
    single: Vec<TaxBracket>,
    married: Vec<TaxBracket>,
}

impl TaxTable {
    /// 2023 federal brackets
    pub fn federal_2023() -> Self {
        Self {
            single: vec![
                TaxBracket::new(11_000.0, 0.10),
                TaxBracket::new(44_725.0, 0.12),
                TaxBracket::new(95_375.0, 0.22),
                TaxBracket::new(182_100.0, 0.24),
                TaxBracket::new(231_250.0, 0.32),
                TaxBracket::new(578_125.0, 0.35),
                TaxBracket::top(0.37),
            ],
            married: vec![
                TaxBracket::new(22_000.0, 0.10),
                TaxBracket::new(89_450.0, 0.12),
                TaxBracket::new(190_750.0, 0.22),
                TaxBracket::new(364_200.0, 0.24),
                TaxBracket::new(462_500.0, 0.32),
                TaxBracket::new(693_750.0, 0.35),
                TaxBracket::top(0.37),
            ],
        }
    }

    pub fn new(single: Vec<TaxBracket>, married: Vec<TaxBracket>) -> Self {
        Self { single, married }
    }

    pub fn from_loaded(loaded: &LoadedAssumptions) -> Self {
        Self::new(loaded.tax_brackets_single.clone(), loaded.tax_brackets_married.clone())
    }

    pub fn brackets(&self, status: FilingStatus) -> &[TaxBracket] {
        match status {
            FilingStatus::Single => &self.single,
            FilingStatus::MarriedJointly => &self.married,
        }
    }

    /// Estimated tax on `taxable_income`, rounded to cents; zero for income <= 0
    pub fn estimate_income_tax(&self, taxable_income: f64, status: FilingStatus) -> f64 {
        if taxable_income <= 0.0 {
            return 0.0;
        }

        let mut tax = 0.0;
        let mut lower = 0.0;
        for bracket in self.brackets(status) {
            if taxable_income <= lower {
                break;
            }
            let upper = bracket.upper.unwrap_or(f64::INFINITY);
            tax += (taxable_income.min(upper) - lower) * bracket.rate;
            lower = upper;
        }

        (tax * 100.0).round() / 100.0
    }
}

impl Default for TaxTable {
    fn default() -> Self {
        Self::federal_2023()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_zero_and_negative_income() {
        let table = TaxTable::federal_2023();
        assert_eq!(table.estimate_income_tax(0.0, FilingStatus::Single), 0.0);
        assert_eq!(table.estimate_income_tax(-50_000.0, FilingStatus::MarriedJointly), 0.0);
    }

    #[test]
    fn test_single_brackets() {
        let table = TaxTable::federal_2023();
        assert_relative_eq!(table.estimate_income_tax(10_000.0, FilingStatus::Single), 1_000.0);
        // 1100 + 33725 * 0.12 + 5275 * 0.22
        assert_relative_eq!(table.estimate_income_tax(50_000.0, FilingStatus::Single), 6_307.5);
    }

    #[test]
    fn test_married_brackets() {
        let table = TaxTable::federal_2023();
        // 2200 + 67450 * 0.12 + 10550 * 0.22
        assert_relative_eq!(
            table.estimate_income_tax(100_000.0, FilingStatus::MarriedJointly),
            12_615.0,
            epsilon = 0.01
        );
        assert!(
            table.estimate_income_tax(100_000.0, FilingStatus::MarriedJointly)
                < table.estimate_income_tax(100_000.0, FilingStatus::Single)
        );
    }

    #[test]
    fn test_monotonic_and_continuous() {
        let table = TaxTable::federal_2023();
        let mut previous = 0.0;
        for step in 0..=1_000 {
            let income = step as f64 * 1_000.0;
            let tax = table.estimate_income_tax(income, FilingStatus::Single);
            assert!(tax >= previous);
            // never more than the top marginal rate on a 1000 step
            assert!(tax - previous <= 370.0 + 0.01);
            previous = tax;
        }
    }
}

//! Household spending and one-off adjustments, expressed as data
//!
//! All amounts are in today's dollars: the market adjustment nets inflation
//! out of returns, so a fixed expense stays fixed in real terms.

use serde::{Deserialize, Serialize};

use crate::assumptions::{HealthStatus, HealthcareCostCurve};
use crate::error::ConfigError;
use crate::household::Person;
use crate::ledger::Category;

/// A recurring housing cost, optionally limited to a range of years
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HousingCost {
    pub label: String,
    pub annual: f64,
    #[serde(default)]
    pub from_year: Option<i32>,
    #[serde(default)]
    pub until_year: Option<i32>,
}

impl HousingCost {
    pub fn new(label: &str, annual: f64) -> Self {
        Self {
            label: label.to_string(),
            annual,
            from_year: None,
            until_year: None,
        }
    }

    /// Last year (inclusive) the cost is paid, e.g. a mortgage payoff year
    pub fn until(mut self, year: i32) -> Self {
        self.until_year = Some(year);
        self
    }

    pub fn applies(&self, year: i32) -> bool {
        self.from_year.map_or(true, |from| year >= from) && self.until_year.map_or(true, |until| year <= until)
    }
}

/// How per-person healthcare cost is estimated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HealthcarePolicy {
    /// Flat amounts by age band: below 65, 65-79, 80 and over
    Banded { under_65: f64, from_65: f64, from_80: f64 },
    /// National average cost curve scaled by health status
    Estimated { status: HealthStatus },
}

impl Default for HealthcarePolicy {
    fn default() -> Self {
        HealthcarePolicy::Banded {
            under_65: 0.0,
            from_65: 5_000.0,
            from_80: 10_000.0,
        }
    }
}

/// When an adjustment fires
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentSchedule {
    /// A single calendar year
    Once { year: i32 },
    /// Every `years` years, in years where `year % years == offset`
    Every {
        years: i32,
        #[serde(default)]
        offset: i32,
    },
}

impl AdjustmentSchedule {
    pub fn fires(&self, year: i32) -> bool {
        match *self {
            AdjustmentSchedule::Once { year: at } => year == at,
            AdjustmentSchedule::Every { years, offset } => {
                years > 0 && year.rem_euclid(years) == offset.rem_euclid(years)
            }
        }
    }
}

/// A signed amount booked into a household account when its schedule fires
///
/// Negative amounts are spending (usually against `Expenses`), positive
/// amounts are windfalls (e.g. a share sale into `TaxedIncome`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Adjustment {
    pub label: String,
    pub category: Category,
    pub amount: f64,
    pub when: AdjustmentSchedule,
}

impl Adjustment {
    pub fn new(label: &str, category: Category, amount: f64, when: AdjustmentSchedule) -> Self {
        Self {
            label: label.to_string(),
            category,
            amount,
            when,
        }
    }
}

/// Everything the household spends in a year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpensePolicy {
    /// General living budget per year
    pub budget: f64,
    #[serde(default)]
    pub housing: Vec<HousingCost>,
    #[serde(default)]
    pub healthcare: HealthcarePolicy,
    #[serde(default)]
    pub adjustments: Vec<Adjustment>,
}

impl ExpensePolicy {
    /// Adjustments land on household-owned accounts, which must not be a
    /// deferred IRA or Roth: RMDs, conversions and distributions only see
    /// per-person retirement accounts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for adjustment in &self.adjustments {
            if adjustment.category.is_persistent() && adjustment.category != Category::Savings {
                return Err(ConfigError::AdjustmentCategory {
                    label: adjustment.label.clone(),
                    category: adjustment.category,
                });
            }
        }
        Ok(())
    }

    pub fn budget_expenses(&self, _year: i32) -> f64 {
        self.budget
    }

    pub fn housing_expenses(&self, year: i32) -> f64 {
        self.housing
            .iter()
            .filter(|h| h.applies(year))
            .map(|h| h.annual)
            .sum()
    }

    /// Healthcare cost for one person in `year`
    pub fn healthcare_expenses(&self, year: i32, person: &Person, curve: &HealthcareCostCurve) -> f64 {
        let age = person.age(year);
        match &self.healthcare {
            HealthcarePolicy::Banded { under_65, from_65, from_80 } => {
                if age >= 80 {
                    *from_80
                } else if age >= 65 {
                    *from_65
                } else {
                    *under_65
                }
            }
            HealthcarePolicy::Estimated { status } => curve.annual_cost(age, *status),
        }
    }

    /// Adjustments that fire in `year`
    pub fn one_time_adjustments(&self, year: i32) -> impl Iterator<Item = &Adjustment> {
        self.adjustments.iter().filter(move |a| a.when.fires(year))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person() -> Person {
        Person::new("Joe", "1970-01-01", 0.0, 65, 70, &[1000.0; 9]).unwrap()
    }

    #[test]
    fn test_adjustments_cannot_target_retirement_accounts() {
        let mut policy = ExpensePolicy {
            budget: 0.0,
            housing: Vec::new(),
            healthcare: HealthcarePolicy::default(),
            adjustments: vec![
                Adjustment::new("car", Category::Expenses, -40_000.0, AdjustmentSchedule::Once { year: 2030 }),
                Adjustment::new("gift", Category::Savings, 10_000.0, AdjustmentSchedule::Once { year: 2031 }),
                Adjustment::new("bonus", Category::TaxedIncome, 5_000.0, AdjustmentSchedule::Once { year: 2032 }),
            ],
        };
        assert!(policy.validate().is_ok());

        for category in [Category::DeferredIra, Category::Roth] {
            policy.adjustments.push(Adjustment::new(
                "rollover",
                category,
                50_000.0,
                AdjustmentSchedule::Once { year: 2033 },
            ));
            let err = policy.validate().unwrap_err();
            assert!(matches!(
                err,
                ConfigError::AdjustmentCategory { ref label, category: c } if label == "rollover" && c == category
            ));
            policy.adjustments.pop();
        }
    }

    #[test]
    fn test_housing_with_mortgage_payoff() {
        let policy = ExpensePolicy {
            budget: 75_000.0,
            housing: vec![
                HousingCost::new("property tax", 4_000.0),
                HousingCost::new("hoa", 600.0),
                HousingCost::new("mortgage", 30_000.0).until(2045),
            ],
            healthcare: HealthcarePolicy::default(),
            adjustments: Vec::new(),
        };
        assert_eq!(policy.housing_expenses(2045), 34_600.0);
        assert_eq!(policy.housing_expenses(2046), 4_600.0);
        assert_eq!(policy.budget_expenses(2046), 75_000.0);
    }

    #[test]
    fn test_banded_healthcare() {
        let policy = ExpensePolicy {
            budget: 0.0,
            housing: Vec::new(),
            healthcare: HealthcarePolicy::Banded {
                under_65: 10_242.0,
                from_65: 5_000.0,
                from_80: 10_000.0,
            },
            adjustments: Vec::new(),
        };
        let curve = HealthcareCostCurve::default();
        let joe = person();
        assert_eq!(policy.healthcare_expenses(2034, &joe, &curve), 10_242.0); // 64
        assert_eq!(policy.healthcare_expenses(2035, &joe, &curve), 5_000.0); // 65
        assert_eq!(policy.healthcare_expenses(2049, &joe, &curve), 5_000.0); // 79
        assert_eq!(policy.healthcare_expenses(2050, &joe, &curve), 10_000.0); // 80
    }

    #[test]
    fn test_estimated_healthcare() {
        let policy = ExpensePolicy {
            budget: 0.0,
            housing: Vec::new(),
            healthcare: HealthcarePolicy::Estimated { status: HealthStatus::Average },
            adjustments: Vec::new(),
        };
        let curve = HealthcareCostCurve::default();
        assert_eq!(policy.healthcare_expenses(2035, &person(), &curve), 22_400.0);
    }

    #[test]
    fn test_adjustment_schedules() {
        let car = AdjustmentSchedule::Every { years: 5, offset: 0 };
        assert!(car.fires(2030));
        assert!(!car.fires(2031));
        assert!(car.fires(2035));

        let shares = AdjustmentSchedule::Once { year: 2034 };
        assert!(shares.fires(2034));
        assert!(!shares.fires(2035));

        let never = AdjustmentSchedule::Every { years: 0, offset: 0 };
        assert!(!never.fires(2030));
    }

    #[test]
    fn test_one_time_adjustments() {
        let policy = ExpensePolicy {
            budget: 0.0,
            housing: Vec::new(),
            healthcare: HealthcarePolicy::default(),
            adjustments: vec![
                Adjustment::new("car", Category::Expenses, -40_000.0, AdjustmentSchedule::Every { years: 5, offset: 0 }),
                Adjustment::new("shares", Category::TaxedIncome, 100_000.0, AdjustmentSchedule::Once { year: 2035 }),
            ],
        };
        assert_eq!(policy.one_time_adjustments(2034).count(), 0);
        let labels: Vec<_> = policy.one_time_adjustments(2035).map(|a| a.label.as_str()).collect();
        assert_eq!(labels, vec!["car", "shares"]);
    }
}

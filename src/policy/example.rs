//! Built-in example household

use super::{
    Adjustment, AdjustmentSchedule, BoundedGaussian, ExpensePolicy, HealthcarePolicy, HouseholdPolicy,
    HousingCost, MarketModel, YearSchedule,
};
use crate::error::ConfigError;
use crate::household::{Family, Person};
use crate::ledger::{Account, Category};

impl HouseholdPolicy {
    /// A married couple in their fifties with a mortgage, a car habit and a
    /// block of company shares to sell
    pub fn example() -> Result<Self, ConfigError> {
        let joe = Person::new(
            "Joe",
            "1970-01-01",
            125_000.0,
            65,
            70,
            &[2606.0, 2793.0, 2998.0, 3264.0, 3533.0, 3804.0, 3921.0, 4243.0, 4767.0],
        )?;
        let jane = Person::new(
            "Jane",
            "1971-01-01",
            95_000.0,
            64,
            70,
            &[860.0, 948.0, 1045.0, 1170.0, 1300.0, 1436.0, 1548.0, 1714.0, 1940.0],
        )?;

        let mut family = Family::new(vec![joe, jane])?;
        let joe = family.require("Joe")?;
        let jane = family.require("Jane")?;
        family.marry(joe, jane)?;

        let initial_balances = vec![
            Account::shared(Category::Savings, 150_000.0),
            Account::owned(Category::DeferredIra, joe, 100_000.0),
            Account::owned(Category::DeferredIra, jane, 75_000.0),
            Account::owned(Category::Roth, joe, 125_000.0),
            Account::owned(Category::Roth, jane, 105_000.0),
        ];

        let expenses = ExpensePolicy {
            budget: 75_000.0,
            housing: vec![
                HousingCost::new("property tax", 4_000.0),
                HousingCost::new("insurance", 600.0),
                HousingCost::new("mortgage", 30_000.0).until(2045),
            ],
            healthcare: HealthcarePolicy::Banded {
                under_65: 0.0,
                from_65: 5_000.0,
                from_80: 10_000.0,
            },
            adjustments: vec![
                Adjustment::new(
                    "new car",
                    Category::Expenses,
                    -40_000.0,
                    AdjustmentSchedule::Every { years: 5, offset: 0 },
                ),
                Adjustment::new(
                    "company shares",
                    Category::TaxedIncome,
                    100_000.0,
                    AdjustmentSchedule::Once { year: 2034 },
                ),
            ],
        };

        Ok(Self {
            family,
            initial_balances,
            expenses,
            distribution_percentage: YearSchedule::constant(2.0),
            minimum_savings: YearSchedule::constant(50_000.0),
            market: MarketModel::Gaussian {
                returns: BoundedGaussian::default_returns(),
                inflation: BoundedGaussian::default_inflation(),
            },
        })
    }
}

//! Single-run driver: advances the yearly pipeline over the horizon

use chrono::Datelike;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::pipeline::YearOutcome;
use super::state::YearState;
use super::summary::{RunOutcome, RunResult, YearSummary};
use crate::assumptions::Assumptions;
use crate::error::ConfigError;
use crate::policy::HouseholdPolicy;

/// Configuration for a simulation run
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// First calendar year simulated
    pub start_year: i32,

    /// Number of years to simulate
    pub num_years: u32,

    /// Members younger than this are left out of proportional withdrawals
    pub min_withdrawal_age: f64,

    /// Largest Roth conversion per person per year
    pub roth_conversion_cap: f64,

    /// Whether to keep a [`YearSummary`] for every simulated year
    pub detailed_output: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            start_year: chrono::Local::now().year(),
            num_years: 50,
            min_withdrawal_age: 59.5,
            roth_conversion_cap: 125_000.0,
            detailed_output: true,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_years == 0 {
            return Err(ConfigError::NonPositive {
                field: "num_years",
                value: 0,
            });
        }
        Ok(())
    }

    /// Last simulated calendar year
    pub fn end_year(&self) -> i32 {
        self.start_year + self.num_years as i32 - 1
    }
}

/// A household, its reference tables and run settings
///
/// Holds no per-run state, so one `Simulation` can be shared by any number
/// of concurrent runs.
#[derive(Debug, Clone)]
pub struct Simulation {
    pub(super) policy: HouseholdPolicy,
    pub(super) assumptions: Assumptions,
    pub(super) config: SimulationConfig,
}

impl Simulation {
    pub fn new(policy: HouseholdPolicy, assumptions: Assumptions, config: SimulationConfig) -> Self {
        Self {
            policy,
            assumptions,
            config,
        }
    }

    pub fn policy(&self) -> &HouseholdPolicy {
        &self.policy
    }

    pub fn assumptions(&self) -> &Assumptions {
        &self.assumptions
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Run once with random draws seeded by `seed`
    pub fn run(&self, seed: u64) -> RunResult {
        self.run_stream(seed, 0)
    }

    /// Run once using stream `stream` of `seed`
    ///
    /// Distinct streams of one seed are independent, which is how Monte Carlo
    /// runs get their own random sources from a single seed.
    pub fn run_stream(&self, seed: u64, stream: u64) -> RunResult {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        rng.set_stream(stream);

        let num_years = self.config.num_years as usize;
        let mut state = YearState::new(self.config.start_year, &self.policy.initial_balances);
        let mut market = self
            .policy
            .market
            .sampler(&self.assumptions.historical_returns, rng);

        let mut trajectory = Vec::with_capacity(num_years + 1);
        trajectory.push(state.net_worth());
        let mut years = Vec::new();
        let mut outcome = RunOutcome::Completed;

        log::debug!(
            "Simulation from {} for {} years with balances: {}",
            state.year,
            num_years,
            state.accounts.snapshot()
        );

        for _ in 0..num_years {
            let mut row = YearSummary::new(state.year, self.policy.family.ages(state.year));
            let year_outcome = self.simulate_year(&mut state, &mut market, &mut row);

            if self.config.detailed_output {
                years.push(row);
            }

            match year_outcome {
                YearOutcome::Solvent => trajectory.push(state.net_worth()),
                YearOutcome::Insolvent { year } => {
                    log::warn!("Out of money in {} (seed {}, stream {})", year, seed, stream);
                    outcome = RunOutcome::Insolvent { year };
                    break;
                }
            }
        }

        trajectory.resize(num_years + 1, 0.0);

        RunResult {
            seed,
            stream,
            trajectory,
            outcome,
            years,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::household::{Family, Person};
    use crate::ledger::{Account, Category};
    use crate::policy::{
        ExpensePolicy, HealthcarePolicy, HousingCost, MarketModel, YearSchedule,
    };
    use approx::assert_relative_eq;

    fn couple(salary_a: f64, salary_b: f64) -> Family {
        // 55 and 54 in 2025
        let a = Person::new(
            "Alex",
            "1970-04-01",
            salary_a,
            65,
            67,
            &[1800.0, 1950.0, 2100.0, 2300.0, 2500.0, 2700.0, 2900.0, 3150.0, 3400.0],
        )
        .unwrap();
        let b = Person::new(
            "Blair",
            "1971-09-15",
            salary_b,
            64,
            67,
            &[700.0, 760.0, 820.0, 900.0, 980.0, 1060.0, 1150.0, 1250.0, 1350.0],
        )
        .unwrap();
        let mut family = Family::new(vec![a, b]).unwrap();
        family.marry_by_name("Alex", "Blair").unwrap();
        family
    }

    fn config(num_years: u32) -> SimulationConfig {
        SimulationConfig {
            start_year: 2025,
            num_years,
            ..SimulationConfig::default()
        }
    }

    #[test]
    fn test_insolvent_first_year_zero_fills() {
        let policy = HouseholdPolicy {
            family: couple(0.0, 0.0),
            initial_balances: Vec::new(),
            expenses: ExpensePolicy {
                budget: 1_000_000.0,
                housing: Vec::new(),
                healthcare: HealthcarePolicy::default(),
                adjustments: Vec::new(),
            },
            distribution_percentage: YearSchedule::constant(0.0),
            minimum_savings: YearSchedule::constant(0.0),
            market: MarketModel::default(),
        };
        let sim = Simulation::new(policy, Assumptions::default(), config(20));
        let result = sim.run(7);

        assert_eq!(result.outcome, RunOutcome::Insolvent { year: 2025 });
        assert_eq!(result.trajectory.len(), 21);
        assert!(result.trajectory.iter().all(|v| *v == 0.0));
        assert_eq!(result.years.len(), 1);
    }

    #[test]
    fn test_end_to_end_without_growth() {
        let initial_balances = vec![Account::shared(Category::Savings, 300_000.0)];
        let policy = HouseholdPolicy {
            family: couple(130_000.0, 90_000.0),
            initial_balances: initial_balances.clone(),
            expenses: ExpensePolicy {
                budget: 60_000.0,
                housing: vec![HousingCost::new("mortgage", 24_000.0).until(2035)],
                healthcare: HealthcarePolicy::Banded {
                    under_65: 8_000.0,
                    from_65: 5_000.0,
                    from_80: 10_000.0,
                },
                adjustments: Vec::new(),
            },
            distribution_percentage: YearSchedule::constant(3.0),
            minimum_savings: YearSchedule::constant(50_000.0),
            market: MarketModel::Fixed {
                return_pct: 4.0,
                inflation_pct: 4.0,
            },
        };
        let sim = Simulation::new(policy, Assumptions::default(), config(30));
        let result = sim.run(0);

        assert_eq!(result.outcome, RunOutcome::Completed);
        assert_eq!(result.trajectory.len(), 31);
        assert_eq!(result.years.len(), 30);
        assert_eq!(result.trajectory[0], 300_000.0);

        // Every year's change in net worth is exactly that year's cashflow
        let mut expected = 300_000.0;
        for (row, net_worth) in result.years.iter().zip(&result.trajectory[1..]) {
            expected += row.net_cashflow();
            assert_relative_eq!(*net_worth, expected, max_relative = 1e-9);
            assert_relative_eq!(row.net_worth, *net_worth);
        }
        assert!(result.years.iter().any(|r| r.roth_distributions > 0.0));
        assert!(result.years.iter().any(|r| r.social_security > 0.0));
        assert!(result.years.iter().all(|r| r.savings > 0.0));
        assert_relative_eq!(result.final_net_worth(), expected, max_relative = 1e-9);
    }

    #[test]
    fn test_same_seed_same_run() {
        let policy = HouseholdPolicy::example().unwrap();
        let sim = Simulation::new(policy, Assumptions::default(), config(40));
        let a = sim.run(11);
        let b = sim.run(11);
        assert_eq!(a.trajectory, b.trajectory);
        assert_eq!(a.outcome, b.outcome);

        let c = sim.run_stream(11, 1);
        assert_ne!(a.trajectory, c.trajectory);
    }

    #[test]
    fn test_zero_years_is_rejected() {
        assert!(config(0).validate().is_err());
        assert!(config(1).validate().is_ok());
        assert_eq!(config(30).end_year(), 2054);
    }
}

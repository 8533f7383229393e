//! Retirement Simulator - multi-year household cash flow simulation with
//! Monte Carlo success rates
//!
//! This library provides:
//! - A typed ledger of household accounts keyed by (category, owner)
//! - A yearly pipeline: salary, Social Security, expenses, RMDs, Roth
//!   conversions, voluntary distributions, taxes, sweep, solvency, market
//! - Reference tables (tax brackets, RMD divisors, contribution limits,
//!   healthcare costs, historical returns) loadable from CSV
//! - Households described as data, loadable from JSON
//! - Parallel Monte Carlo over independently seeded runs

pub mod error;
pub mod ledger;
pub mod household;
pub mod assumptions;
pub mod policy;
pub mod simulation;
pub mod monte_carlo;

// Re-export commonly used types
pub use error::ConfigError;
pub use ledger::{Account, Accounts, Category, Owner};
pub use household::{Family, Person, PersonId};
pub use assumptions::Assumptions;
pub use policy::HouseholdPolicy;
pub use simulation::{RunOutcome, RunResult, Simulation, SimulationConfig, YearSummary};
pub use monte_carlo::{MonteCarloConfig, MonteCarloResult, MonteCarloRunner, SuccessRate};

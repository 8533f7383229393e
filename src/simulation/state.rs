//! Per-run simulation state

use crate::ledger::{Account, Accounts};

/// The current year and the run's own ledger
#[derive(Debug, Clone)]
pub struct YearState {
    /// Calendar year being simulated; every age is computed from it
    pub year: i32,

    /// Balances for this run only
    pub accounts: Accounts,
}

impl YearState {
    /// Initialize state from owned copies of the starting balances
    pub fn new(start_year: i32, initial_balances: &[Account]) -> Self {
        Self {
            year: start_year,
            accounts: Accounts::from_initial(initial_balances),
        }
    }

    pub fn net_worth(&self) -> f64 {
        self.accounts.net_worth()
    }

    pub fn advance_year(&mut self) {
        self.year += 1;
    }
}

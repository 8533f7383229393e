//! Account ledger: per-category, per-owner balances for one simulation run

mod account;
mod accounts;

pub use account::{Account, Category, Owner};
pub use accounts::Accounts;

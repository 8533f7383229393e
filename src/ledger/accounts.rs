//! The ledger: a flat map from (category, owner) to account

use std::collections::BTreeMap;

use super::account::{Account, Category, Owner};

/// All balances for one simulation run
///
/// Accounts are created lazily at zero the first time they are touched, so
/// looking up a balance never fails. Ordered by key so iteration (and
/// therefore floating point summation) is deterministic.
#[derive(Debug, Clone, Default)]
pub struct Accounts {
    accounts: BTreeMap<(Category, Owner), Account>,
}

impl Accounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a ledger from owned copies of the initial balances
    ///
    /// Two entries for the same (category, owner) are merged into one account.
    pub fn from_initial(initial: &[Account]) -> Self {
        let mut accounts = Self::new();
        for account in initial {
            accounts.get(account.category(), account.owner()).add(account.balance());
        }
        accounts
    }

    /// Existing account for the key, or a new one at zero
    pub fn get(&mut self, category: Category, owner: Owner) -> &mut Account {
        self.accounts
            .entry((category, owner))
            .or_insert_with(|| Account::new(category, owner, 0.0))
    }

    /// Household-wide account for `category`
    pub fn shared(&mut self, category: Category) -> &mut Account {
        self.get(category, Owner::Household)
    }

    /// Balance for the key without creating the account
    pub fn balance(&self, category: Category, owner: Owner) -> f64 {
        self.accounts
            .get(&(category, owner))
            .map(Account::balance)
            .unwrap_or(0.0)
    }

    pub fn shared_balance(&self, category: Category) -> f64 {
        self.balance(category, Owner::Household)
    }

    /// Total balance over every owner of the given categories
    pub fn sum(&self, categories: &[Category]) -> f64 {
        self.accounts
            .values()
            .filter(|a| categories.contains(&a.category()))
            .map(Account::balance)
            .sum()
    }

    /// Savings + deferred IRA + Roth
    pub fn net_worth(&self) -> f64 {
        self.sum(&Category::PERSISTENT)
    }

    /// Move `amount` from one account to another
    pub fn transfer(&mut self, from: (Category, Owner), to: (Category, Owner), amount: f64) {
        self.get(from.0, from.1).subtract(amount);
        self.get(to.0, to.1).add(amount);
    }

    pub fn all(&self) -> impl Iterator<Item = &Account> {
        self.accounts.values()
    }

    /// Accounts carried between years
    pub fn persistent_accounts(&self) -> impl Iterator<Item = &Account> {
        self.accounts.values().filter(|a| a.category().is_persistent())
    }

    /// Accounts reset every year
    pub fn perennial_accounts(&self) -> impl Iterator<Item = &Account> {
        self.accounts.values().filter(|a| a.category().is_transient())
    }

    pub fn persistent_accounts_mut(&mut self) -> impl Iterator<Item = &mut Account> {
        self.accounts.values_mut().filter(|a| a.category().is_persistent())
    }

    pub fn perennial_accounts_mut(&mut self) -> impl Iterator<Item = &mut Account> {
        self.accounts.values_mut().filter(|a| a.category().is_transient())
    }

    /// One-line listing, persistent accounts first
    pub fn snapshot(&self) -> String {
        self.persistent_accounts()
            .chain(self.perennial_accounts())
            .map(|a| a.to_string())
            .collect::<Vec<_>>()
            .join("  ")
    }
}

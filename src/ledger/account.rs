//! A single ledger account and its category/owner key

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::household::PersonId;

/// What kind of money an account holds
///
/// Transient categories stage one year's flows and are zeroed at the start
/// of every simulated year. Persistent categories carry over between years
/// and are the only ones the market adjustment touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    // transient
    Expenses,
    TaxedIncome,
    UntaxedIncome,
    TaxOwed,
    IraWithdrawals,
    // persistent
    Savings,
    DeferredIra,
    Roth,
}

impl Category {
    /// Every category, persistent first (the order used for the yearly summary line)
    pub const ALL: [Category; 8] = [
        Category::Savings,
        Category::DeferredIra,
        Category::Roth,
        Category::Expenses,
        Category::TaxedIncome,
        Category::UntaxedIncome,
        Category::IraWithdrawals,
        Category::TaxOwed,
    ];

    /// Categories swept into savings at the end of each year
    pub const TRANSIENT: [Category; 5] = [
        Category::Expenses,
        Category::TaxedIncome,
        Category::UntaxedIncome,
        Category::IraWithdrawals,
        Category::TaxOwed,
    ];

    /// Categories counted toward household net worth
    pub const PERSISTENT: [Category; 3] = [Category::Savings, Category::DeferredIra, Category::Roth];

    pub fn is_persistent(self) -> bool {
        matches!(self, Category::Savings | Category::DeferredIra | Category::Roth)
    }

    pub fn is_transient(self) -> bool {
        !self.is_persistent()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Expenses => "expenses",
            Category::TaxedIncome => "taxed_income",
            Category::UntaxedIncome => "untaxed_income",
            Category::TaxOwed => "tax_owed",
            Category::IraWithdrawals => "ira_withdrawals",
            Category::Savings => "savings",
            Category::DeferredIra => "ira",
            Category::Roth => "roth",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who an account belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Owner {
    /// Shared by the whole household
    Household,
    /// Held by one family member
    Person(PersonId),
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Owner::Household => f.write_str("household"),
            Owner::Person(id) => write!(f, "{id}"),
        }
    }
}

/// A signed balance for one (category, owner) pair
///
/// The balance can only change through [`Account::add`] and
/// [`Account::subtract`], so every mutation shows up in the trace log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    category: Category,
    owner: Owner,
    balance: f64,
}

impl Account {
    pub fn new(category: Category, owner: Owner, balance: f64) -> Self {
        Self { category, owner, balance }
    }

    /// A household-wide account
    pub fn shared(category: Category, balance: f64) -> Self {
        Self::new(category, Owner::Household, balance)
    }

    /// An account held by one person
    pub fn owned(category: Category, owner: PersonId, balance: f64) -> Self {
        Self::new(category, Owner::Person(owner), balance)
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn owner(&self) -> Owner {
        self.owner
    }

    pub fn balance(&self) -> f64 {
        self.balance
    }

    /// Label used in log lines, e.g. `roth (#1)`
    pub fn label(&self) -> String {
        match self.owner {
            Owner::Household => self.category.to_string(),
            Owner::Person(id) => format!("{} ({id})", self.category),
        }
    }

    pub fn add(&mut self, amount: f64) {
        let before = self.balance;
        self.balance += amount;
        log::trace!("{}: {:.2} + {:.2} = {:.2}", self.label(), before, amount, self.balance);
    }

    pub fn subtract(&mut self, amount: f64) {
        let before = self.balance;
        self.balance -= amount;
        log::trace!("{}: {:.2} - {:.2} = {:.2}", self.label(), before, amount, self.balance);
    }

    /// Zero the balance by subtracting it from itself
    pub fn clear(&mut self) {
        let balance = self.balance;
        self.subtract(balance);
    }

    /// Scale the balance by `factor`, booked as an add of the difference
    pub fn grow(&mut self, factor: f64) {
        let delta = self.balance * (factor - 1.0);
        self.add(delta);
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ${}", self.label(), self.balance as i64)
    }
}

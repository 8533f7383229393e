//! Error types for household configuration and assumption loading
//!
//! Running out of money is not an error: a run that becomes insolvent is
//! reported through [`crate::simulation::RunOutcome`].

use thiserror::Error;

use crate::ledger::Category;

/// Problems found while building a household or loading assumption tables
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name}: social security claiming age {age} is outside the benefit table range 62..=70")]
    ClaimingAge { name: String, age: u32 },

    #[error("{name}: benefit table has {len} entries, expected 9 (claiming ages 62..=70)")]
    BenefitTable { name: String, len: usize },

    #[error("{name}: invalid birth date '{value}'")]
    BirthDate {
        name: String,
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("unknown person '{0}'")]
    UnknownPerson(String),

    #[error("person '{0}' appears more than once in the family")]
    DuplicatePerson(String),

    #[error("{0} cannot be their own spouse")]
    SelfSpouse(String),

    #[error("{person} is already married to {spouse}")]
    AlreadyMarried { person: String, spouse: String },

    #[error("adjustment '{label}' cannot target {category}; retirement accounts are per person")]
    AdjustmentCategory { label: String, category: Category },

    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: i64 },

    #[error("{file}: {reason}")]
    Table { file: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

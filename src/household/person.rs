//! A single family member

use std::fmt;
use std::ops::RangeInclusive;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::assumptions::full_retirement_age;
use crate::error::ConfigError;

/// Claiming ages covered by a Social Security benefit statement
pub const SS_BENEFIT_AGES: RangeInclusive<u32> = 62..=70;

/// Index of a person within their [`super::Family`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PersonId(pub usize);

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A family member with income and retirement milestones
///
/// Immutable for the length of a run; the spouse link is only set while the
/// family is being assembled. Only built through [`Person::new`], so the
/// claiming age always indexes the benefit table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Person {
    /// Display name, unique within the family
    pub name: String,

    /// Date of birth; only the year matters for age calculations
    pub birth_date: NaiveDate,

    /// Gross annual salary while working
    pub salary: f64,

    /// Age at which the person stops working
    pub retirement_age: u32,

    /// Age at which the person starts collecting Social Security (62..=70)
    ss_start_age: u32,

    /// Monthly benefit by claiming age, index 0 = age 62
    ss_monthly_benefits: [f64; 9],

    /// Spouse within the same family
    pub(super) spouse: Option<PersonId>,
}

impl Person {
    /// Create a person, validating the claiming age against the benefit table
    ///
    /// `birth_date` is `YYYY-MM-DD`.
    pub fn new(
        name: &str,
        birth_date: &str,
        salary: f64,
        retirement_age: u32,
        ss_start_age: u32,
        ss_monthly_benefits: &[f64],
    ) -> Result<Self, ConfigError> {
        let birth_date = NaiveDate::parse_from_str(birth_date, "%Y-%m-%d").map_err(|source| {
            ConfigError::BirthDate {
                name: name.to_string(),
                value: birth_date.to_string(),
                source,
            }
        })?;

        if !SS_BENEFIT_AGES.contains(&ss_start_age) {
            return Err(ConfigError::ClaimingAge {
                name: name.to_string(),
                age: ss_start_age,
            });
        }

        let ss_monthly_benefits: [f64; 9] =
            ss_monthly_benefits
                .try_into()
                .map_err(|_| ConfigError::BenefitTable {
                    name: name.to_string(),
                    len: ss_monthly_benefits.len(),
                })?;

        Ok(Self {
            name: name.to_string(),
            birth_date,
            salary,
            retirement_age,
            ss_start_age,
            ss_monthly_benefits,
            spouse: None,
        })
    }

    pub fn birth_year(&self) -> i32 {
        self.birth_date.year()
    }

    /// Age reached during `year`
    pub fn age(&self, year: i32) -> i32 {
        year - self.birth_year()
    }

    pub fn retired(&self, year: i32) -> bool {
        self.age(year) >= self.retirement_age as i32
    }

    pub fn ss_start_age(&self) -> u32 {
        self.ss_start_age
    }

    pub fn claiming_ss(&self, year: i32) -> bool {
        self.age(year) >= self.ss_start_age as i32
    }

    /// Monthly benefit at the configured claiming age
    pub fn ss_amount(&self) -> f64 {
        self.ss_monthly_benefits[(self.ss_start_age - SS_BENEFIT_AGES.start()) as usize]
    }

    /// Own annual benefit in `year`, zero before claiming starts
    pub fn annual_ss_benefit(&self, year: i32) -> f64 {
        if self.claiming_ss(year) {
            self.ss_amount() * 12.0
        } else {
            0.0
        }
    }

    pub fn full_retirement_age(&self) -> f64 {
        full_retirement_age(self.birth_year())
    }

    /// Claiming and at or past full retirement age (eligible for the spousal top-up)
    pub fn waited_for_full_ss(&self, year: i32) -> bool {
        self.claiming_ss(year) && self.age(year) as f64 >= self.full_retirement_age()
    }

    pub fn spouse(&self) -> Option<PersonId> {
        self.spouse
    }
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

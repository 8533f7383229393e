//! Household model: family members and their age-driven milestones

mod person;
mod family;

pub use person::{Person, PersonId, SS_BENEFIT_AGES};
pub use family::Family;

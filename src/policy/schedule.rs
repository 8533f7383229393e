//! Values that change in given calendar years

use serde::{Deserialize, Serialize};

/// A value effective from a calendar year onward
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduleChange {
    pub from_year: i32,
    pub value: f64,
}

/// A base value with optional step changes by year
///
/// The latest change whose `from_year` has been reached wins.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct YearSchedule {
    pub base: f64,
    #[serde(default)]
    pub changes: Vec<ScheduleChange>,
}

impl YearSchedule {
    pub fn constant(value: f64) -> Self {
        Self { base: value, changes: Vec::new() }
    }

    /// Add a step change (builder style)
    pub fn from_year(mut self, year: i32, value: f64) -> Self {
        self.changes.push(ScheduleChange { from_year: year, value });
        self
    }

    pub fn value_for(&self, year: i32) -> f64 {
        self.changes
            .iter()
            .filter(|c| c.from_year <= year)
            .max_by_key(|c| c.from_year)
            .map(|c| c.value)
            .unwrap_or(self.base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant() {
        let schedule = YearSchedule::constant(50_000.0);
        assert_eq!(schedule.value_for(1990), 50_000.0);
        assert_eq!(schedule.value_for(2090), 50_000.0);
    }

    #[test]
    fn test_step_changes_in_any_order() {
        let schedule = YearSchedule::constant(2.0)
            .from_year(2045, 6.0)
            .from_year(2035, 4.0);

        assert_eq!(schedule.value_for(2034), 2.0);
        assert_eq!(schedule.value_for(2035), 4.0);
        assert_eq!(schedule.value_for(2044), 4.0);
        assert_eq!(schedule.value_for(2045), 6.0);
        assert_eq!(schedule.value_for(2100), 6.0);
    }
}

//! Social Security full retirement age and Roth 401(k) contribution limits

/// Full retirement age in years for a birth year
///
/// 65 through 1937, +2 months per year for 1938-1942, 66 for 1943-1954,
/// +2 months per year for 1955-1959, 67 from 1960.
pub fn full_retirement_age(birth_year: i32) -> f64 {
    match birth_year {
        ..=1937 => 65.0,
        1938..=1942 => 65.0 + ((birth_year - 1937) * 2) as f64 / 12.0,
        1943..=1954 => 66.0,
        1955..=1959 => 66.0 + ((birth_year - 1954) * 2) as f64 / 12.0,
        _ => 67.0,
    }
}

/// Employee contribution limit schedule
///
/// Catch-up bonuses do not stack: the highest bracket the person has reached
/// replaces the lower ones.
#[derive(Debug, Clone, PartialEq)]
pub struct ContributionLimits {
    base: f64,
    /// (minimum age, bonus), highest age first
    catch_up: Vec<(i32, f64)>,
}

impl Default for ContributionLimits {
    fn default() -> Self {
        Self::new(23_500.0, vec![(50, 7_500.0), (60, 11_250.0), (64, 7_500.0)])
    }
}

impl ContributionLimits {
    /// Brackets may be given in any order
    pub fn new(base: f64, mut catch_up: Vec<(i32, f64)>) -> Self {
        catch_up.sort_by(|a, b| b.0.cmp(&a.0));
        Self { base, catch_up }
    }

    pub fn base(&self) -> f64 {
        self.base
    }

    pub fn catch_up(&self) -> &[(i32, f64)] {
        &self.catch_up
    }

    pub fn limit(&self, age: i32) -> f64 {
        let bonus = self
            .catch_up
            .iter()
            .find(|(min_age, _)| age >= *min_age)
            .map(|(_, bonus)| *bonus)
            .unwrap_or(0.0);
        self.base + bonus
    }
}

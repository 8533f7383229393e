//! Historical S&P 500 total returns by calendar year
//!
//! Used to replay an actual sequence of market returns. A simulation that
//! runs past the last table year wraps back to the first.

use rand::Rng;

use crate::error::ConfigError;

/// Consecutive annual returns (percent) starting at `first_year`
#[derive(Debug, Clone)]
pub struct HistoricalReturns {
    first_year: i32,
    returns: Vec<f64>,
}

impl HistoricalReturns {
    /// S&P 500 annual total returns, 1926-2025
    pub fn sp500() -> Self {
        Self {
            first_year: 1926,
            returns: vec![
                11.62, 37.49, 43.61, -8.42, -24.90, -43.34, -8.19, 53.99, -1.44, 47.67, // 1926
                33.92, -35.03, 31.12, -0.41, -9.78, -11.59, 20.34, 25.90, 19.75, 36.44, // 1936
                -8.07, 5.71, 5.50, 18.79, 31.71, 24.02, 18.37, -0.99, 52.62, 31.56, // 1946
                6.56, -10.78, 43.36, 11.96, 0.47, 26.89, -8.73, 22.80, 16.48, 12.45, // 1956
                -10.06, 23.98, 11.06, -8.50, 4.01, 14.31, 18.98, -14.66, -26.47, 37.20, // 1966
                23.84, -7.18, 6.56, 18.44, 32.42, -4.91, 21.55, 22.56, 6.27, 31.73, // 1976
                18.67, 5.25, 16.61, 31.69, -3.10, 30.47, 7.62, 10.08, 1.32, 37.58, // 1986
                22.96, 33.36, 28.58, 21.04, -9.10, -11.89, -22.10, 28.68, 10.88, 4.91, // 1996
                15.79, 5.49, -37.00, 26.46, 15.06, 2.11, 16.00, 32.39, 13.69, 1.38, // 2006
                11.96, 21.83, -4.38, 31.49, 18.40, 28.71, -18.11, 26.29, 25.02, 17.51, // 2016
            ],
        }
    }

    /// Create from loaded CSV data; years must be consecutive
    pub fn from_loaded(rows: &[(i32, f64)]) -> Result<Self, ConfigError> {
        let mut rows = rows.to_vec();
        rows.sort_by_key(|(year, _)| *year);

        let first_year = rows.first().map(|(year, _)| *year).ok_or_else(|| ConfigError::Table {
            file: "historical_returns.csv".to_string(),
            reason: "no rows".to_string(),
        })?;

        for (i, (year, _)) in rows.iter().enumerate() {
            if *year != first_year + i as i32 {
                return Err(ConfigError::Table {
                    file: "historical_returns.csv".to_string(),
                    reason: format!("expected year {} but found {}", first_year + i as i32, year),
                });
            }
        }

        Ok(Self {
            first_year,
            returns: rows.into_iter().map(|(_, r)| r).collect(),
        })
    }

    pub fn first_year(&self) -> i32 {
        self.first_year
    }

    pub fn last_year(&self) -> i32 {
        self.first_year + self.returns.len() as i32 - 1
    }

    /// Number of years in the table
    pub fn span(&self) -> usize {
        self.returns.len()
    }

    /// Table year reached `offset` years after `start`, wrapping around
    pub fn wrapped_year(&self, start: i32, offset: i32) -> i32 {
        let span = self.returns.len() as i32;
        self.first_year + (start + offset - self.first_year).rem_euclid(span)
    }

    /// Return (percent) for a table year; out-of-range years wrap
    pub fn return_for(&self, year: i32) -> f64 {
        let year = self.wrapped_year(year, 0);
        self.returns[(year - self.first_year) as usize]
    }

    /// Uniformly chosen table year to start a replay from
    pub fn random_start_year<R: Rng>(&self, rng: &mut R) -> i32 {
        rng.gen_range(self.first_year..=self.last_year())
    }
}

impl Default for HistoricalReturns {
    fn default() -> Self {
        Self::sp500()
    }
}

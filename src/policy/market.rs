//! Market return and inflation models
//!
//! A [`MarketModel`] is static household configuration. Each simulation run
//! turns it into a [`MarketSampler`] that owns the run's random stream, so
//! runs never share RNG state.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::assumptions::HistoricalReturns;

/// Draws past this many rejections fall back to clamping
const MAX_REJECTIONS: usize = 10_000;

/// Normal distribution truncated to `[min, max]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundedGaussian {
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

impl BoundedGaussian {
    pub fn new(mean: f64, std_dev: f64, min: f64, max: f64) -> Self {
        Self { mean, std_dev, min, max }
    }

    /// Annual stock market return (percent)
    pub fn default_returns() -> Self {
        Self::new(6.5, 2.0, -5.0, 24.0)
    }

    /// Annual inflation (percent)
    pub fn default_inflation() -> Self {
        Self::new(3.0, 2.0, -2.0, 15.0)
    }

    fn clamped_mean(&self) -> f64 {
        self.mean.max(self.min).min(self.max)
    }

    /// Draw until the value lands inside the bounds, rounded to 2 decimals
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let normal = match Normal::new(self.mean, self.std_dev) {
            Ok(normal) if self.std_dev > 0.0 && self.min <= self.max => normal,
            _ => return round2(self.clamped_mean()),
        };

        for _ in 0..MAX_REJECTIONS {
            let value = normal.sample(rng);
            if (self.min..=self.max).contains(&value) {
                return round2(value);
            }
        }

        log::warn!(
            "no draw from N({}, {}) landed in [{}, {}]; using the clamped mean",
            self.mean,
            self.std_dev,
            self.min,
            self.max
        );
        round2(self.clamped_mean())
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// How yearly market returns and inflation are produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MarketModel {
    /// The same return and inflation every year
    Fixed { return_pct: f64, inflation_pct: f64 },
    /// Independent bounded-normal draws each year
    Gaussian {
        returns: BoundedGaussian,
        inflation: BoundedGaussian,
    },
    /// Replay historical returns from a random start year, wrapping at the
    /// end of the table; inflation is still drawn
    Historical { inflation: BoundedGaussian },
}

impl Default for MarketModel {
    fn default() -> Self {
        MarketModel::Gaussian {
            returns: BoundedGaussian::default_returns(),
            inflation: BoundedGaussian::default_inflation(),
        }
    }
}

impl MarketModel {
    /// Bind the model to one run's random stream
    pub fn sampler<'a>(&'a self, historical: &'a HistoricalReturns, mut rng: ChaCha8Rng) -> MarketSampler<'a> {
        let replay_start = match self {
            MarketModel::Historical { .. } => {
                let start = historical.random_start_year(&mut rng);
                log::debug!("replaying historical returns from {}", start);
                Some(start)
            }
            _ => None,
        };

        MarketSampler {
            model: self,
            historical,
            rng,
            replay_start,
            years_drawn: 0,
        }
    }
}

/// Market conditions for one simulated year
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MarketYear {
    pub return_pct: f64,
    pub inflation_pct: f64,
}

impl MarketYear {
    /// Growth factor in today's dollars: nominal return net of inflation
    pub fn real_growth_factor(&self) -> f64 {
        1.0 + (self.return_pct - self.inflation_pct) / 100.0
    }
}

/// Per-run source of market draws
pub struct MarketSampler<'a> {
    model: &'a MarketModel,
    historical: &'a HistoricalReturns,
    rng: ChaCha8Rng,
    replay_start: Option<i32>,
    years_drawn: i32,
}

impl MarketSampler<'_> {
    pub fn return_percentage(&mut self) -> f64 {
        match self.model {
            MarketModel::Fixed { return_pct, .. } => *return_pct,
            MarketModel::Gaussian { returns, .. } => returns.sample(&mut self.rng),
            MarketModel::Historical { .. } => {
                let start = self.replay_start.unwrap_or(self.historical.first_year());
                let year = self.historical.wrapped_year(start, self.years_drawn);
                self.historical.return_for(year)
            }
        }
    }

    pub fn inflation_percentage(&mut self) -> f64 {
        match self.model {
            MarketModel::Fixed { inflation_pct, .. } => *inflation_pct,
            MarketModel::Gaussian { inflation, .. } | MarketModel::Historical { inflation } => {
                inflation.sample(&mut self.rng)
            }
        }
    }

    /// Draw return then inflation for the next simulated year
    pub fn next_year(&mut self) -> MarketYear {
        let return_pct = self.return_percentage();
        let inflation_pct = self.inflation_percentage();
        self.years_drawn += 1;
        MarketYear { return_pct, inflation_pct }
    }
}

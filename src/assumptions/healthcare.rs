//! National average healthcare spending by age
//!
//! Rough estimates assembled from public sources (ACA premiums below 65,
//! total per-capita spending from 65 on). Costs between tabulated ages are
//! linearly interpolated; ages outside the table clamp to its ends.

use serde::{Deserialize, Serialize};

/// General health of a person, used to scale the average cost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Healthy,
    #[default]
    Average,
    Unhealthy,
}

impl HealthStatus {
    pub fn modifier(self) -> f64 {
        match self {
            HealthStatus::Healthy => 0.85,
            HealthStatus::Average => 1.00,
            HealthStatus::Unhealthy => 1.40,
        }
    }
}

/// Annual cost curve, points sorted by age
#[derive(Debug, Clone)]
pub struct HealthcareCostCurve {
    points: Vec<(i32, f64)>,
}

impl Default for HealthcareCostCurve {
    fn default() -> Self {
        Self {
            points: vec![
                (20, 4_500.0),
                (25, 4_700.0),
                (30, 5_300.0),
                (35, 5_700.0),
                (40, 6_000.0),
                (45, 6_800.0),
                (50, 8_300.0),
                (55, 10_500.0),
                (60, 12_700.0),
                (65, 22_400.0),
                (70, 25_000.0),
                (75, 28_000.0),
                (80, 32_000.0),
                (85, 38_000.0),
                (90, 45_000.0),
                (95, 55_000.0),
                (100, 65_000.0),
            ],
        }
    }
}

impl HealthcareCostCurve {
    /// Create from loaded CSV data
    pub fn from_loaded(points: &[(i32, f64)]) -> Self {
        let mut points = points.to_vec();
        points.sort_by_key(|(age, _)| *age);
        Self { points }
    }

    /// Estimated annual cost for one person, rounded to cents
    pub fn annual_cost(&self, age: i32, status: HealthStatus) -> f64 {
        let (Some(first), Some(last)) = (self.points.first(), self.points.last()) else {
            return 0.0;
        };

        let base = if age <= first.0 {
            first.1
        } else if age >= last.0 {
            last.1
        } else {
            let upper = self.points.partition_point(|(a, _)| *a < age);
            let (age_hi, cost_hi) = self.points[upper];
            if age_hi == age {
                cost_hi
            } else {
                let (age_lo, cost_lo) = self.points[upper - 1];
                cost_lo + (age - age_lo) as f64 * (cost_hi - cost_lo) / (age_hi - age_lo) as f64
            }
        };

        (base * status.modifier() * 100.0).round() / 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tabulated_ages() {
        let curve = HealthcareCostCurve::default();
        assert_eq!(curve.annual_cost(30, HealthStatus::Average), 5_300.0);
        assert_eq!(curve.annual_cost(65, HealthStatus::Average), 22_400.0);
    }

    #[test]
    fn test_interpolation() {
        let curve = HealthcareCostCurve::default();
        // 75 -> 28000, 80 -> 32000
        assert_eq!(curve.annual_cost(78, HealthStatus::Average), 30_400.0);
        assert_eq!(curve.annual_cost(78, HealthStatus::Unhealthy), 42_560.0);
    }

    #[test]
    fn test_clamping() {
        let curve = HealthcareCostCurve::default();
        assert_eq!(curve.annual_cost(10, HealthStatus::Healthy), 3_825.0);
        assert_eq!(curve.annual_cost(104, HealthStatus::Average), 65_000.0);
    }

    #[test]
    fn test_empty_curve() {
        let curve = HealthcareCostCurve::from_loaded(&[]);
        assert_eq!(curve.annual_cost(50, HealthStatus::Average), 0.0);
    }
}

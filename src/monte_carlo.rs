//! Monte Carlo driver
//!
//! Repeats a [`Simulation`] with independent random streams of one seed and
//! reports, for every year offset, the share of runs still solvent.
//!
//! # Example
//! ```ignore
//! let simulation = Simulation::new(policy, Assumptions::default(), SimulationConfig::default());
//! let result = MonteCarloRunner::new(simulation).run(&MonteCarloConfig::default())?;
//! for rate in result.every(5) {
//!     println!("{}: {:.1}%", rate.year, rate.percent);
//! }
//! ```

use std::io::Write;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::simulation::{RunOutcome, RunResult, Simulation};

/// Configuration for a batch of runs
#[derive(Debug, Clone)]
pub struct MonteCarloConfig {
    /// Number of runs
    pub runs: usize,

    /// Base seed; run `i` draws from stream `i` of it
    pub seed: u64,

    /// Fan runs out over the rayon thread pool
    pub parallel: bool,
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        Self {
            runs: 100,
            seed: 0,
            parallel: true,
        }
    }
}

/// Percent of runs with positive net worth at a year offset
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SuccessRate {
    pub offset: usize,
    pub year: i32,
    pub percent: f64,
}

/// Aggregated output of a Monte Carlo batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonteCarloResult {
    pub start_year: i32,
    pub num_years: u32,
    pub seed: u64,
    /// Every run, in run order
    pub runs: Vec<RunResult>,
    /// One entry per offset, 0 through `num_years`
    pub success_table: Vec<SuccessRate>,
}

impl MonteCarloResult {
    fn new(start_year: i32, num_years: u32, seed: u64, runs: Vec<RunResult>) -> Self {
        let success_table = (0..=num_years as usize)
            .map(|offset| {
                let solvent = runs.iter().filter(|r| r.solvent_at(offset)).count();
                SuccessRate {
                    offset,
                    year: start_year + offset as i32,
                    percent: 100.0 * solvent as f64 / runs.len().max(1) as f64,
                }
            })
            .collect();

        Self {
            start_year,
            num_years,
            seed,
            runs,
            success_table,
        }
    }

    pub fn success_rate_at(&self, offset: usize) -> Option<f64> {
        self.success_table.get(offset).map(|s| s.percent)
    }

    /// Every `n`th row of the success table, starting at offset 0
    pub fn every(&self, n: usize) -> impl Iterator<Item = &SuccessRate> {
        let n = n.max(1);
        self.success_table.iter().filter(move |s| s.offset % n == 0)
    }

    pub fn trajectories(&self) -> impl Iterator<Item = &[f64]> {
        self.runs.iter().map(|r| r.trajectory.as_slice())
    }

    pub fn insolvent_runs(&self) -> usize {
        self.runs.iter().filter(|r| r.outcome.is_insolvent()).count()
    }

    /// Mean net worth across runs at each offset
    pub fn mean_trajectory(&self) -> Vec<f64> {
        let n = self.runs.len().max(1) as f64;
        (0..=self.num_years as usize)
            .map(|offset| self.runs.iter().map(|r| r.net_worth_at(offset)).sum::<f64>() / n)
            .collect()
    }

    /// One CSV row per run: run index, insolvent year (empty if none), then
    /// net worth for every year
    pub fn write_trajectories_csv<W: Write>(&self, writer: W) -> Result<(), ConfigError> {
        let mut csv = csv::Writer::from_writer(writer);

        let mut header = vec!["run".to_string(), "insolvent_year".to_string()];
        header.extend((0..=self.num_years as i32).map(|o| (self.start_year + o).to_string()));
        csv.write_record(&header)?;

        for run in &self.runs {
            let mut record = vec![run.stream.to_string()];
            record.push(match run.outcome {
                RunOutcome::Insolvent { year } => year.to_string(),
                RunOutcome::Completed => String::new(),
            });
            record.extend(run.trajectory.iter().map(|v| format!("{:.2}", v)));
            csv.write_record(&record)?;
        }

        csv.flush()?;
        Ok(())
    }

    pub fn write_json<W: Write>(&self, writer: W) -> Result<(), ConfigError> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }
}

/// Runs one simulation many times
#[derive(Debug, Clone)]
pub struct MonteCarloRunner {
    simulation: Simulation,
}

impl MonteCarloRunner {
    pub fn new(simulation: Simulation) -> Self {
        Self { simulation }
    }

    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    /// Run the batch; results are in run order whether or not it ran in parallel
    pub fn run(&self, config: &MonteCarloConfig) -> Result<MonteCarloResult, ConfigError> {
        if config.runs == 0 {
            return Err(ConfigError::NonPositive { field: "runs", value: 0 });
        }
        let sim_config = self.simulation.config();
        sim_config.validate()?;

        log::info!(
            "Running {} simulations of {}-{} (seed {}, {})",
            config.runs,
            sim_config.start_year,
            sim_config.end_year(),
            config.seed,
            if config.parallel { "parallel" } else { "sequential" }
        );

        let run_one = |index: usize| self.simulation.run_stream(config.seed, index as u64);
        let runs: Vec<RunResult> = if config.parallel {
            (0..config.runs).into_par_iter().map(run_one).collect()
        } else {
            (0..config.runs).map(run_one).collect()
        };

        let result = MonteCarloResult::new(sim_config.start_year, sim_config.num_years, config.seed, runs);
        log::info!(
            "{} of {} runs ran out of money; {:.1}% solvent after {} years",
            result.insolvent_runs(),
            config.runs,
            result.success_rate_at(sim_config.num_years as usize).unwrap_or(0.0),
            sim_config.num_years
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assumptions::Assumptions;
    use crate::policy::{BoundedGaussian, HouseholdPolicy, MarketModel};
    use crate::simulation::SimulationConfig;

    fn runner(num_years: u32) -> MonteCarloRunner {
        let mut policy = HouseholdPolicy::example().unwrap();
        // Wide spread so some runs fail and some survive
        policy.market = MarketModel::Gaussian {
            returns: BoundedGaussian::new(5.0, 12.0, -40.0, 40.0),
            inflation: BoundedGaussian::default_inflation(),
        };
        let config = SimulationConfig {
            start_year: 2025,
            num_years,
            detailed_output: false,
            ..SimulationConfig::default()
        };
        MonteCarloRunner::new(Simulation::new(policy, Assumptions::default(), config))
    }

    fn config(runs: usize, parallel: bool) -> MonteCarloConfig {
        MonteCarloConfig { runs, seed: 2024, parallel }
    }

    #[test]
    fn test_fixed_seed_is_reproducible() {
        let runner = runner(40);
        let a = runner.run(&config(32, true)).unwrap();
        let b = runner.run(&config(32, true)).unwrap();
        assert_eq!(a.success_table, b.success_table);
        for (x, y) in a.trajectories().zip(b.trajectories()) {
            assert_eq!(x, y);
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let runner = runner(30);
        let parallel = runner.run(&config(16, true)).unwrap();
        let sequential = runner.run(&config(16, false)).unwrap();
        assert_eq!(parallel.success_table, sequential.success_table);
        for (x, y) in parallel.runs.iter().zip(&sequential.runs) {
            assert_eq!(x.stream, y.stream);
            assert_eq!(x.trajectory, y.trajectory);
        }
    }

    #[test]
    fn test_success_table_shape() {
        let result = runner(20).run(&config(10, true)).unwrap();

        assert_eq!(result.runs.len(), 10);
        assert_eq!(result.success_table.len(), 21);
        assert_eq!(result.success_table[0].year, 2025);
        assert_eq!(result.success_table[20].year, 2045);
        assert_eq!(result.success_rate_at(0), Some(100.0));
        assert_eq!(result.success_rate_at(21), None);
        assert!(result.runs.iter().all(|r| r.trajectory.len() == 21));
        assert!(result.runs.iter().all(|r| r.years.is_empty()));

        for rate in &result.success_table {
            assert!((0.0..=100.0).contains(&rate.percent));
            // each run counts as 10%
            assert_eq!((rate.percent * 10.0).round() / 10.0, rate.percent);
        }

        let offsets: Vec<usize> = result.every(5).map(|r| r.offset).collect();
        assert_eq!(offsets, vec![0, 5, 10, 15, 20]);
    }

    #[test]
    fn test_success_rate_counts_positive_net_worth() {
        let run = |stream: u64, trajectory: Vec<f64>, outcome| RunResult {
            seed: 0,
            stream,
            trajectory,
            outcome,
            years: Vec::new(),
        };
        let result = MonteCarloResult::new(
            2030,
            2,
            0,
            vec![
                run(0, vec![10.0, 5.0, 1.0], RunOutcome::Completed),
                run(1, vec![10.0, 0.0, 0.0], RunOutcome::Insolvent { year: 2030 }),
                run(2, vec![10.0, 3.0, 0.0], RunOutcome::Insolvent { year: 2031 }),
                run(3, vec![10.0, 8.0, 6.0], RunOutcome::Completed),
            ],
        );
        assert_eq!(result.success_rate_at(0), Some(100.0));
        assert_eq!(result.success_rate_at(1), Some(75.0));
        assert_eq!(result.success_rate_at(2), Some(50.0));
        assert_eq!(result.insolvent_runs(), 2);
        assert_eq!(result.mean_trajectory(), vec![10.0, 4.0, 1.75]);
    }

    #[test]
    fn test_zero_runs_rejected() {
        let err = runner(10).run(&config(0, true)).unwrap_err();
        assert!(matches!(err, ConfigError::NonPositive { field: "runs", .. }));
    }

    #[test]
    fn test_csv_and_json_export() {
        let result = runner(5).run(&config(3, false)).unwrap();

        let mut csv_out = Vec::new();
        result.write_trajectories_csv(&mut csv_out).unwrap();
        let text = String::from_utf8(csv_out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "run,insolvent_year,2025,2026,2027,2028,2029,2030");
        assert!(lines[1].starts_with("0,"));

        let mut json_out = Vec::new();
        result.write_json(&mut json_out).unwrap();
        let parsed: MonteCarloResult = serde_json::from_slice(&json_out).unwrap();
        assert_eq!(parsed.runs.len(), 3);
        assert_eq!(parsed.success_table.len(), result.success_table.len());
        for (a, b) in parsed.success_table.iter().zip(&result.success_table) {
            assert_eq!(a.year, b.year);
            approx::assert_relative_eq!(a.percent, b.percent, max_relative = 1e-12);
        }
    }
}

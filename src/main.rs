//! Retirement Simulator CLI
//!
//! Runs a household through many randomized market histories and prints
//! the share of runs still solvent every five years.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;

use retirement_simulator::{
    policy, Assumptions, HouseholdPolicy, MonteCarloConfig, MonteCarloRunner, Simulation,
    SimulationConfig,
};

#[derive(Parser, Debug)]
#[command(name = "retirement_simulator")]
#[command(about = "Simulate household finances year by year and report Monte Carlo success rates")]
struct Args {
    /// Household JSON file (defaults to the built-in example household)
    #[arg(long)]
    household: Option<PathBuf>,

    /// Directory of assumption CSV tables (defaults to the built-in tables)
    #[arg(long)]
    assumptions: Option<PathBuf>,

    /// Number of Monte Carlo runs
    #[arg(long, default_value_t = 100)]
    runs: usize,

    /// Number of years to simulate
    #[arg(long, default_value_t = 50)]
    years: u32,

    /// First simulated year (defaults to the current year)
    #[arg(long)]
    start_year: Option<i32>,

    /// Base random seed (defaults to one derived from the clock)
    #[arg(long)]
    seed: Option<u64>,

    /// Run simulations one after another instead of in parallel
    #[arg(long)]
    sequential: bool,

    /// Write every run's net worth trajectory to this CSV file
    #[arg(long)]
    output: Option<PathBuf>,

    /// Write the full result, including per-year detail, to this JSON file
    #[arg(long)]
    json: Option<PathBuf>,

    /// Log every pipeline stage
    #[arg(long)]
    debug: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let default_filter = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    let household = match &args.household {
        Some(path) => policy::load_household(path)
            .with_context(|| format!("loading household from {}", path.display()))?,
        None => HouseholdPolicy::example().context("building the example household")?,
    };

    let assumptions = match &args.assumptions {
        Some(dir) => Assumptions::from_csv_path(dir)
            .with_context(|| format!("loading assumptions from {}", dir.display()))?,
        None => Assumptions::default_2025(),
    };

    let defaults = SimulationConfig::default();
    let config = SimulationConfig {
        start_year: args.start_year.unwrap_or(defaults.start_year),
        num_years: args.years,
        detailed_output: args.json.is_some(),
        ..defaults
    };

    let seed = args.seed.unwrap_or_else(|| {
        chrono::Utc::now()
            .timestamp_nanos_opt()
            .map(|n| n as u64)
            .unwrap_or_default()
    });
    let mc_config = MonteCarloConfig {
        runs: args.runs,
        seed,
        parallel: !args.sequential,
    };

    println!("Retirement Simulator v{}", env!("CARGO_PKG_VERSION"));
    println!("===========================\n");
    for (_, person) in household.family.iter() {
        println!(
            "  {}: born {}, retires at {}, claims Social Security at {}",
            person,
            person.birth_date,
            person.retirement_age,
            person.ss_start_age()
        );
    }
    println!();

    let start = Instant::now();
    let runner = MonteCarloRunner::new(Simulation::new(household, assumptions, config));
    let result = runner.run(&mc_config)?;
    println!(
        "{} runs of {} years in {:?} (seed {})\n",
        mc_config.runs,
        args.years,
        start.elapsed(),
        seed
    );

    println!("{:>6} {:>8} {:>10}", "Year", "Success", "Mean NW");
    println!("{}", "-".repeat(26));
    let mean = result.mean_trajectory();
    for rate in result.every(5) {
        println!(
            "{:>6} {:>7.1}% {:>10.0}",
            rate.year,
            rate.percent,
            mean.get(rate.offset).copied().unwrap_or(0.0)
        );
    }

    if let Some(path) = &args.output {
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        result.write_trajectories_csv(BufWriter::new(file))?;
        println!("\nTrajectories written to {}", path.display());
    }

    if let Some(path) = &args.json {
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        result.write_json(BufWriter::new(file))?;
        println!("Full result written to {}", path.display());
    }

    Ok(())
}

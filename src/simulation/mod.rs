//! Yearly simulation of one household's finances

mod state;
mod engine;
mod pipeline;
mod withdrawal;
mod summary;

pub use state::YearState;
pub use engine::{Simulation, SimulationConfig};
pub use pipeline::YearOutcome;
pub use withdrawal::proportional_shares;
pub use summary::{RunOutcome, RunResult, YearSummary};

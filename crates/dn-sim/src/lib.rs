//! dn-sim: full-year evaluation of network designs.
//!
//! Ties the solver crates together: converts a validated project into an
//! immutable [`Model`], materializes genotypes into concrete networks, runs
//! the hydraulic and thermal solves over the sampled horizon, prices the
//! result, and exposes the whole pipeline as a [`dn_ga::FitnessEvaluator`].

pub mod error;
pub mod evaluate;
pub mod inputs;
pub mod materialize;
pub mod sampling;
pub mod simulate;
pub mod summary;

#[cfg(test)]
mod testutil;

pub use error::{SimError, SimResult};
pub use evaluate::{evaluate_design, DesignEvaluation, DesignEvaluator, PENALTY_COST};
pub use inputs::{Building, Model};
pub use materialize::{materialize, Candidate};
pub use sampling::SamplingStrategy;
pub use simulate::{simulate, SimulationResult};
pub use summary::{summarize, DesignSummary};

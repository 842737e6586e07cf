//! dn-ga: genetic search over network design decisions.
//!
//! A genotype tags every building as connected, plant site, or disconnected,
//! plus a loop/branch flag and served-load flags. The optimizer evolves a
//! population under elitist selection with uniform crossover, repair
//! operators that keep plant-count and connectivity invariants, and a
//! thread-safe fitness memo keyed by the canonical genotype encoding.

pub mod cache;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod genotype;
pub mod init;
pub mod ops;
pub mod optimizer;

pub use cache::FitnessCache;
pub use config::GaConfig;
pub use error::{GaError, GaResult};
pub use evaluator::FitnessEvaluator;
pub use genotype::{BuildingState, Genotype};
pub use optimizer::{GaOutcome, GenerationRecord, Optimizer};

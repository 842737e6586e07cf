//! Optimizer setup errors.
//!
//! All of these are configuration problems and fatal before the first
//! generation runs; nothing here is ever converted to a penalty.

use thiserror::Error;

pub type GaResult<T> = Result<T, GaError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GaError {
    #[error("min_plants {min_plants} exceeds max_plants {max_plants}")]
    InfeasibleBounds { min_plants: usize, max_plants: usize },

    #[error("{required} plant(s) required but only {available} admissible site(s)")]
    NotEnoughSites { required: usize, available: usize },

    #[error("mutation probability {value} outside [0, 1]")]
    BadProbability { value: f64 },

    #[error("population_size {population_size} must be at least 2")]
    PopulationTooSmall { population_size: usize },

    #[error("generation_count must be at least 1")]
    NoGenerations,

    #[error("lucky_few {lucky_few} must be smaller than population_size {population_size}")]
    LuckyFewTooLarge {
        lucky_few: usize,
        population_size: usize,
    },

    #[error("no buildings to optimize over")]
    NoBuildings,

    #[error("admissible site index {index} out of range for {buildings} buildings")]
    SiteOutOfRange { index: usize, buildings: usize },

    #[error("anchor building {index} is not an admissible plant site")]
    AnchorNotAdmissible { index: usize },
}

//! Hydraulic solver error types.

use thiserror::Error;

pub type HydroResult<T> = Result<T, HydroError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum HydroError {
    /// The reduced flow system has no solution (disconnected subgraph or
    /// degenerate demand). Callers degrade this to an all-zero result.
    #[error("Flow system is singular or unsolvable")]
    Singular,

    #[error("Demand vector has {got} entries, network has {expected} nodes")]
    DemandShape { expected: usize, got: usize },

    #[error("Peak-flow vector has {got} entries, network has {expected} edges")]
    FlowShape { expected: usize, got: usize },

    #[error("Pipe catalog has no entries")]
    EmptyCatalog,

    #[error("Catalog row {label} has non-positive internal diameter {d_int_m} m")]
    BadCatalogRow { label: String, d_int_m: f64 },

    #[error("Network has no plant node")]
    NoPlant,
}

//! Thermal solver error types.

use thiserror::Error;

pub type ThermalResult<T> = Result<T, ThermalError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ThermalError {
    #[error("Flow vector has {got} entries, network has {expected} edges")]
    FlowShape { expected: usize, got: usize },

    #[error("UA vector has {got} entries, network has {expected} edges")]
    UaShape { expected: usize, got: usize },

    #[error("Demand vector has {got} entries, network has {expected} consumers")]
    DemandShape { expected: usize, got: usize },

    #[error("Network has no plant node")]
    NoPlant,
}

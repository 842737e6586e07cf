//! Simulation pipeline errors.

use thiserror::Error;

pub type SimResult<T> = Result<T, SimError>;

#[derive(Error, Debug)]
pub enum SimError {
    /// The genotype's subgraph cannot form a valid network. Scoped to one
    /// evaluation; the optimizer sees a penalty cost.
    #[error("Infeasible design: {0}")]
    Infeasible(#[from] dn_topo::TopologyError),

    #[error(transparent)]
    Hydro(#[from] dn_hydro::HydroError),

    #[error(transparent)]
    Thermal(#[from] dn_thermal::ThermalError),

    #[error(transparent)]
    Cost(#[from] dn_costs::CostError),

    #[error("Evaluation exceeded the {budget_s} s budget")]
    Timeout { budget_s: f64 },

    #[error("Genotype has {got} building genes, model has {expected} buildings")]
    GenotypeShape { expected: usize, got: usize },

    #[error("Unknown reference {name} in project (validate before building a model)")]
    UnknownName { name: String },
}

//! Cost model error types.

use thiserror::Error;

pub type CostResult<T> = Result<T, CostError>;

/// Errors in static cost inputs. These are fatal at load time; capacity
/// lookups outside the curve brackets are clamped with a warning instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CostError {
    #[error("Cost curve {name} has no capacity brackets")]
    EmptyCurve { name: String },

    #[error("Cost curve {name} bracket has cap_min {cap_min} >= cap_max {cap_max}")]
    BadBracket {
        name: String,
        cap_min: f64,
        cap_max: f64,
    },

    #[error("Cost curve {name} has non-positive lifetime {lifetime_yr} yr")]
    BadLifetime { name: String, lifetime_yr: f64 },
}

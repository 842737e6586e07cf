//! dn-thermal: temperature propagation and heat losses.
//!
//! Given one hour's solved edge flows, propagates supply temperatures from
//! the plants to the leaves in flow order, applies the exponential pipe-wall
//! loss model per edge, mixes flow-weighted at junctions, solves the return
//! side in reverse, and reports the plant heat requirement.

pub mod error;
pub mod losses;
pub mod propagate;

pub use error::{ThermalError, ThermalResult};
pub use losses::{edge_ua_wperk, linear_loss_coefficient_wpermk};
pub use propagate::{solve_hour, HourThermal, NetworkKind, ThermalParams};

//! dn-hydro: hydraulic solver for district energy networks.
//!
//! Given a validated [`dn_topo::Network`] and per-hour nodal demands, this
//! crate solves edge mass flows from the incidence matrix, sizes pipe
//! diameters from peak flow against a catalog, computes Darcy-Weisbach
//! pressure losses, and derives critical-path pump head and pumping energy.

pub mod catalog;
pub mod error;
pub mod flow;
pub mod friction;
pub mod pump;
pub mod sizing;

pub use catalog::{PipeCatalog, PipeSpec};
pub use error::{HydroError, HydroResult};
pub use flow::{fold_peak_flows, nodal_demand, solve_edge_flows};
pub use friction::{darcy_friction_factor, pressure_loss_pa, reynolds, velocity_mps};
pub use pump::{critical_path, pump_electric_power_w, pump_head_pa, CriticalPath, PumpParams};
pub use sizing::{assign_pipes, theoretical_diameter_m, PipeAssignment, SizingParams};

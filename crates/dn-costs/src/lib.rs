//! dn-costs: annualized cost model for network designs.
//!
//! Prices a sized design: trench piping, pumping, central plant equipment,
//! and decentralized units for disconnected buildings. Equipment uses
//! capacity-indexed cost curves with bracket clamping and multi-unit
//! splitting; all capex is annuitized.

pub mod annuity;
pub mod curve;
pub mod error;
pub mod pricing;

pub use annuity::{annuity_factor, annualized};
pub use curve::{CostBracket, EquipmentCostCurve, Investment};
pub use error::{CostError, CostResult};
pub use pricing::{
    pipe_investment, price_design, CostBreakdown, DecentralLoad, PipeEconomics, PricingContext,
};

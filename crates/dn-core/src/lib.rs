//! dn-core: stable foundation for districtnet.
//!
//! Contains:
//! - units (uom SI types + constructors)
//! - numeric (Real + tolerances + float helpers)
//! - ids (stable compact IDs for network objects)
//! - water (temperature-dependent property fits)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod numeric;
pub mod units;
pub mod water;

// Re-exports: nice ergonomics for downstream crates
pub use error::{DnError, DnResult};
pub use ids::*;
pub use numeric::*;
pub use units::*;

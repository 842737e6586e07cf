//! Diameter sizing from peak edge flow.

use std::f64::consts::PI;

use dn_core::water::RHO_WATER_KGPERM3;
use dn_core::EdgeId;
use dn_topo::Network;

use crate::catalog::PipeCatalog;
use crate::error::{HydroError, HydroResult};

/// Design parameters for diameter sizing.
#[derive(Debug, Clone, Copy)]
pub struct SizingParams {
    /// Target flow velocity at peak load [m/s].
    pub design_velocity_mps: f64,
    /// Multiplier on peak flow to absorb loads above the sampled peak.
    pub peak_load_factor: f64,
}

impl Default for SizingParams {
    fn default() -> Self {
        Self {
            design_velocity_mps: 2.0,
            peak_load_factor: 1.4,
        }
    }
}

/// One edge's sized pipe, fixed for the lifetime of a design candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct PipeAssignment {
    pub edge: EdgeId,
    pub label: String,
    pub d_int_m: f64,
    pub d_ext_m: f64,
    pub d_ins_m: f64,
    pub length_m: f64,
    pub cost_per_m: f64,
    pub peak_flow_kgps: f64,
}

/// Internal diameter [m] that carries the corrected peak flow at the design
/// velocity: D = sqrt(4 V̇ / (π v)).
pub fn theoretical_diameter_m(peak_flow_kgps: f64, params: &SizingParams) -> f64 {
    let vdot = peak_flow_kgps.abs() * params.peak_load_factor / RHO_WATER_KGPERM3;
    (4.0 * vdot / (PI * params.design_velocity_mps)).sqrt()
}

/// Size every edge from its observed peak flow.
///
/// `peak_flows_kgps` is indexed like the network's edge list. Assignment is
/// monotonic in peak flow and idempotent: re-sizing from an already-selected
/// row's diameter reselects the same row, since selection never undersizes.
pub fn assign_pipes(
    network: &Network,
    peak_flows_kgps: &[f64],
    catalog: &PipeCatalog,
    params: &SizingParams,
) -> HydroResult<Vec<PipeAssignment>> {
    if peak_flows_kgps.len() != network.edge_count() {
        return Err(HydroError::FlowShape {
            expected: network.edge_count(),
            got: peak_flows_kgps.len(),
        });
    }
    Ok(network
        .edges()
        .iter()
        .zip(peak_flows_kgps)
        .map(|(edge, &peak)| {
            let spec = catalog.select(theoretical_diameter_m(peak, params));
            PipeAssignment {
                edge: edge.id,
                label: spec.label.clone(),
                d_int_m: spec.d_int_m,
                d_ext_m: spec.d_ext_m,
                d_ins_m: spec.d_ins_m,
                length_m: edge.length_m,
                cost_per_m: spec.cost_per_m,
                peak_flow_kgps: peak,
            }
        })
        .collect())
}

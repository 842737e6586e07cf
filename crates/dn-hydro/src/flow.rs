//! Edge mass-flow solve from the incidence matrix.

use nalgebra::{DMatrix, DVector};
use tracing::trace;

use dn_topo::Network;

use crate::error::{HydroError, HydroResult};

/// Residual acceptance for the reduced linear system.
const RESIDUAL_TOL: f64 = 1e-6;

/// Assemble the signed nodal demand vector [kg/s] for one hour.
///
/// `consumer_flows_kgps` holds substation mass flows in the order of
/// [`Network::consumer_indices`]. Consumers receive their demand as a positive
/// entry, junctions are zero, and every plant carries an equal share of the
/// balancing supply as a negative entry, so the vector sums to zero by
/// construction.
pub fn nodal_demand(network: &Network, consumer_flows_kgps: &[f64]) -> HydroResult<DVector<f64>> {
    let consumers = network.consumer_indices();
    if consumer_flows_kgps.len() != consumers.len() {
        return Err(HydroError::DemandShape {
            expected: consumers.len(),
            got: consumer_flows_kgps.len(),
        });
    }
    let plants = network.plant_indices();
    if plants.is_empty() {
        return Err(HydroError::NoPlant);
    }

    let total: f64 = consumer_flows_kgps.iter().sum();
    let share = total / plants.len() as f64;

    let mut demand = DVector::zeros(network.node_count());
    for (&i, &flow) in consumers.iter().zip(consumer_flows_kgps) {
        demand[i] = flow;
    }
    for &i in &plants {
        demand[i] = -share;
    }
    Ok(demand)
}

/// Solve edge mass flows [kg/s] for one hour's nodal demand.
///
/// One plant row of the incidence matrix is linearly dependent on the others
/// by mass conservation, so the first plant row is dropped to obtain the
/// reduced system. Branched layouts give a square system solved by LU; looped
/// layouts have surplus edges and are solved in the least-squares sense. A
/// residual check rejects inconsistent systems (demand in a fragment the
/// plants cannot reach).
pub fn solve_edge_flows(network: &Network, demand: &DVector<f64>) -> HydroResult<DVector<f64>> {
    if demand.len() != network.node_count() {
        return Err(HydroError::DemandShape {
            expected: network.node_count(),
            got: demand.len(),
        });
    }
    let dropped = *network
        .plant_indices()
        .first()
        .ok_or(HydroError::NoPlant)?;

    let n = network.node_count();
    let e = network.edge_count();
    let mut reduced = DMatrix::zeros(n - 1, e);
    let mut b = DVector::zeros(n - 1);
    let mut r = 0;
    for i in 0..n {
        if i == dropped {
            continue;
        }
        reduced.row_mut(r).copy_from(&network.incidence().row(i));
        b[r] = demand[i];
        r += 1;
    }

    let flows = if e == n - 1 {
        reduced
            .clone()
            .lu()
            .solve(&b)
            .ok_or(HydroError::Singular)?
    } else {
        // surplus edges from loops: minimum-norm least squares
        reduced
            .clone()
            .svd(true, true)
            .solve(&b, 1e-12)
            .map_err(|_| HydroError::Singular)?
    };

    let residual = (&reduced * &flows - &b).norm();
    if !residual.is_finite() || residual > RESIDUAL_TOL * (1.0 + b.norm()) {
        return Err(HydroError::Singular);
    }
    trace!(residual, "edge flow solve");
    Ok(flows)
}

/// Fold one hour's solved flows into the running per-edge peak magnitudes.
pub fn fold_peak_flows(peaks: &mut [f64], flows: &[f64]) {
    for (peak, flow) in peaks.iter_mut().zip(flows) {
        *peak = peak.max(flow.abs());
    }
}

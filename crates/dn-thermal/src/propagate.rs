//! Per-hour temperature propagation along the flow field.

use tracing::debug;

use dn_core::water::CP_WATER_JPERKGK;
use dn_topo::Network;

use crate::error::{ThermalError, ThermalResult};

/// Flows below this magnitude are treated as stagnant [kg/s].
const FLOW_EPS_KGPS: f64 = 1e-6;

/// Which way heat flows across the substations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkKind {
    /// Supply runs hot, substations extract heat, return runs cooler.
    Heating,
    /// Supply runs cold, substations reject heat, return runs warmer.
    Cooling,
}

impl NetworkKind {
    /// +1 for heating, -1 for cooling; folds the substation temperature step
    /// and the plant duty into one convention.
    pub fn sign(self) -> f64 {
        match self {
            NetworkKind::Heating => 1.0,
            NetworkKind::Cooling => -1.0,
        }
    }
}

/// Network-level thermal boundary conditions.
#[derive(Debug, Clone, Copy)]
pub struct ThermalParams {
    pub kind: NetworkKind,
    /// Supply temperature injected at every plant [K].
    pub supply_temp_k: f64,
    /// Ground temperature around the buried pipes [K].
    pub ground_temp_k: f64,
    /// Design supply/return temperature difference at substations [K].
    pub delta_t_k: f64,
}

/// One hour's thermal state.
#[derive(Debug, Clone, PartialEq)]
pub struct HourThermal {
    /// Supply-side temperature at every node [K].
    pub supply_temp_k: Vec<f64>,
    /// Return-side temperature at every node [K].
    pub return_temp_k: Vec<f64>,
    /// Heat lost to the ground per edge, supply and return combined [W].
    pub heat_loss_w: Vec<f64>,
    /// Heat the plants must inject this hour [W].
    pub plant_heat_w: f64,
}

impl HourThermal {
    fn zeroed(nodes: usize, edges: usize) -> Self {
        Self {
            supply_temp_k: vec![0.0; nodes],
            return_temp_k: vec![0.0; nodes],
            heat_loss_w: vec![0.0; edges],
            plant_heat_w: 0.0,
        }
    }
}

/// Propagate temperatures for one hour given solved edge flows.
///
/// The supply side walks the flow field from the plants to the leaves, the
/// return side walks it in reverse from the substations back to the plants.
/// An hour with no flow anywhere (all buildings disconnected or zero demand)
/// yields an all-zero result.
pub fn solve_hour(
    network: &Network,
    flows_kgps: &[f64],
    ua_wperk: &[f64],
    consumer_demand_w: &[f64],
    params: &ThermalParams,
) -> ThermalResult<HourThermal> {
    let n = network.node_count();
    let e = network.edge_count();
    if flows_kgps.len() != e {
        return Err(ThermalError::FlowShape {
            expected: e,
            got: flows_kgps.len(),
        });
    }
    if ua_wperk.len() != e {
        return Err(ThermalError::UaShape {
            expected: e,
            got: ua_wperk.len(),
        });
    }
    let consumers = network.consumer_indices();
    if consumer_demand_w.len() != consumers.len() {
        return Err(ThermalError::DemandShape {
            expected: consumers.len(),
            got: consumer_demand_w.len(),
        });
    }
    let plants = network.plant_indices();
    if plants.is_empty() {
        return Err(ThermalError::NoPlant);
    }

    if flows_kgps.iter().all(|m| m.abs() < FLOW_EPS_KGPS) {
        return Ok(HourThermal::zeroed(n, e));
    }

    // orient every edge by the sign of its solved flow
    let oriented: Vec<(usize, usize)> = network
        .edges()
        .iter()
        .zip(flows_kgps)
        .map(|(edge, &m)| {
            let (s, t) = (edge.start.index() as usize, edge.end.index() as usize);
            if m >= 0.0 { (s, t) } else { (t, s) }
        })
        .collect();
    let m_abs: Vec<f64> = flows_kgps.iter().map(|m| m.abs()).collect();

    // plant outflow = negated row balance of the flow field
    let mut plant_outflow = vec![0.0; n];
    for &p in &plants {
        let balance: f64 = (0..e)
            .map(|j| network.incidence()[(p, j)] * flows_kgps[j])
            .sum();
        plant_outflow[p] = -balance;
    }

    // supply pass: plants inject at the target temperature
    let mut supply_inject: Vec<Vec<(f64, f64)>> = vec![Vec::new(); n];
    for &p in &plants {
        supply_inject[p].push((plant_outflow[p].max(0.0), params.supply_temp_k));
    }
    let supply = propagate_pass(n, &oriented, &m_abs, ua_wperk, &supply_inject, params);

    // return pass: substations inject their cooled-down return flow
    let reversed: Vec<(usize, usize)> = oriented.iter().map(|&(u, d)| (d, u)).collect();
    let mut return_inject: Vec<Vec<(f64, f64)>> = vec![Vec::new(); n];
    for (&c, &demand) in consumers.iter().zip(consumer_demand_w) {
        if demand > 0.0 {
            let m_sub = demand / (CP_WATER_JPERKGK * params.delta_t_k);
            let t_ret = supply.node_temp_k[c] - params.kind.sign() * params.delta_t_k;
            return_inject[c].push((m_sub, t_ret));
        }
    }
    let ret = propagate_pass(n, &reversed, &m_abs, ua_wperk, &return_inject, params);

    let heat_loss_w: Vec<f64> = supply
        .edge_loss_w
        .iter()
        .zip(&ret.edge_loss_w)
        .map(|(s, r)| s + r)
        .collect();

    // duty is positive for both kinds: heat injected (heating) or heat
    // removed (cooling) to swing the return back to the supply setpoint
    let plant_heat_w: f64 = plants
        .iter()
        .map(|&p| {
            params.kind.sign()
                * plant_outflow[p].max(0.0)
                * CP_WATER_JPERKGK
                * (params.supply_temp_k - ret.node_temp_k[p])
        })
        .sum();

    Ok(HourThermal {
        supply_temp_k: supply.node_temp_k,
        return_temp_k: ret.node_temp_k,
        heat_loss_w,
        plant_heat_w,
    })
}

struct PassResult {
    node_temp_k: Vec<f64>,
    edge_loss_w: Vec<f64>,
}

/// Walk nodes in flow-topological order, mixing inbound streams by mass and
/// applying the exponential wall-loss model per edge.
///
/// `injections` are external streams entering a node (plant supply, or
/// substation return). A node with no stream at all settles at ground
/// temperature. Nodes left unresolved by a circulating flow pattern settle on
/// whatever streams reached them; no wall loss is booked for edges inside the
/// circulation.
fn propagate_pass(
    n: usize,
    oriented: &[(usize, usize)],
    m_abs: &[f64],
    ua_wperk: &[f64],
    injections: &[Vec<(f64, f64)>],
    params: &ThermalParams,
) -> PassResult {
    let e = oriented.len();
    let mut indeg = vec![0_usize; n];
    for (j, &(_, d)) in oriented.iter().enumerate() {
        if m_abs[j] > FLOW_EPS_KGPS {
            indeg[d] += 1;
        }
    }

    let mut sum_m = vec![0.0_f64; n];
    let mut sum_mt = vec![0.0_f64; n];
    for (i, streams) in injections.iter().enumerate() {
        for &(m, t) in streams {
            sum_m[i] += m;
            sum_mt[i] += m * t;
        }
    }

    // outbound adjacency over active edges
    let mut outbound: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (j, &(u, _)) in oriented.iter().enumerate() {
        if m_abs[j] > FLOW_EPS_KGPS {
            outbound[u].push(j);
        }
    }

    let mut node_temp_k = vec![f64::NAN; n];
    let mut edge_loss_w = vec![0.0_f64; e];
    let mut queue: Vec<usize> = (0..n).filter(|&i| indeg[i] == 0).collect();
    let mut resolved = 0_usize;

    while let Some(u) = queue.pop() {
        resolved += 1;
        node_temp_k[u] = if sum_m[u] > 0.0 {
            sum_mt[u] / sum_m[u]
        } else {
            params.ground_temp_k
        };
        for &j in &outbound[u] {
            let m = m_abs[j];
            let t_out = params.ground_temp_k
                + (node_temp_k[u] - params.ground_temp_k)
                    * (-ua_wperk[j] / (m * CP_WATER_JPERKGK)).exp();
            edge_loss_w[j] = m * CP_WATER_JPERKGK * (node_temp_k[u] - t_out);
            let d = oriented[j].1;
            sum_m[d] += m;
            sum_mt[d] += m * t_out;
            indeg[d] -= 1;
            if indeg[d] == 0 {
                queue.push(d);
            }
        }
    }

    if resolved < n {
        // circulating flow: settle leftover nodes without booking wall losses
        debug!(unresolved = n - resolved, "circulating flow pattern in thermal pass");
        for i in 0..n {
            if node_temp_k[i].is_nan() {
                node_temp_k[i] = if sum_m[i] > 0.0 {
                    sum_mt[i] / sum_m[i]
                } else {
                    params.ground_temp_k
                };
            }
        }
    }

    PassResult {
        node_temp_k,
        edge_loss_w,
    }
}

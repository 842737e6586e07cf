//! Critical-path pump head and electric pump power.

use petgraph::algo::dijkstra;
use petgraph::graph::{NodeIndex, UnGraph};

use dn_core::water::RHO_WATER_KGPERM3;
use dn_topo::Network;

use crate::error::{HydroError, HydroResult};

/// Pump and substation parameters.
#[derive(Debug, Clone, Copy)]
pub struct PumpParams {
    /// Overall pump efficiency (hydraulic to electric).
    pub efficiency: f64,
    /// Pressure drop across one substation heat exchanger [Pa].
    pub substation_dp_pa: f64,
}

impl Default for PumpParams {
    fn default() -> Self {
        Self {
            efficiency: 0.8,
            substation_dp_pa: 30_000.0,
        }
    }
}

/// The hour's worst-supplied node and its cumulative supply-side loss.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CriticalPath {
    /// Row index of the critical node.
    pub node_index: usize,
    /// Cumulative pressure loss from the plant to that node [Pa].
    pub loss_pa: f64,
}

/// Find the node with maximum cumulative pressure loss from the first plant.
///
/// The network is walked undirected with the hour's per-edge losses as
/// weights, so the result is independent of reference directions.
pub fn critical_path(network: &Network, edge_losses_pa: &[f64]) -> HydroResult<CriticalPath> {
    if edge_losses_pa.len() != network.edge_count() {
        return Err(HydroError::FlowShape {
            expected: network.edge_count(),
            got: edge_losses_pa.len(),
        });
    }
    let plant = *network
        .plant_indices()
        .first()
        .ok_or(HydroError::NoPlant)?;

    let mut graph: UnGraph<(), f64> = UnGraph::default();
    let indices: Vec<NodeIndex> = (0..network.node_count()).map(|_| graph.add_node(())).collect();
    for (edge, &loss) in network.edges().iter().zip(edge_losses_pa) {
        graph.add_edge(
            indices[edge.start.index() as usize],
            indices[edge.end.index() as usize],
            loss,
        );
    }

    let distances = dijkstra(&graph, indices[plant], None, |e| *e.weight());
    let (node, loss) = distances
        .into_iter()
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .ok_or(HydroError::Singular)?;
    Ok(CriticalPath {
        node_index: node.index(),
        loss_pa: loss,
    })
}

/// Total pump head for one hour [Pa].
///
/// The supply-side critical loss is doubled to approximate the return side,
/// plus the substation drops at the plant and at the critical node.
pub fn pump_head_pa(critical_loss_pa: f64, params: &PumpParams) -> f64 {
    2.0 * critical_loss_pa + 2.0 * params.substation_dp_pa
}

/// Electric pump power for one hour [W]: Δp · ṁ / ρ / η.
pub fn pump_electric_power_w(head_pa: f64, plant_flow_kgps: f64, params: &PumpParams) -> f64 {
    head_pa * plant_flow_kgps.abs() / RHO_WATER_KGPERM3 / params.efficiency
}

//! Turning a genotype into a concrete network.

use std::collections::HashMap;

use petgraph::algo::min_spanning_tree;
use petgraph::data::Element;
use petgraph::graph::UnGraph;

use dn_core::BuildingId;
use dn_ga::{BuildingState, Genotype};
use dn_topo::{Network, TopologyBuilder};

use crate::error::{SimError, SimResult};
use crate::inputs::{Model, NodeRef};

/// A materialized design candidate.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub network: Network,
    /// Building index behind each consumer node, in consumer-node order.
    pub consumer_buildings: Vec<usize>,
    /// Building index behind each plant node, in plant-node order.
    pub plant_buildings: Vec<usize>,
}

/// Materialize the subgraph a genotype implies.
///
/// Disconnected buildings drop out with their incident edges; junctions left
/// with fewer than two incident edges are pruned away recursively. A branch
/// layout further reduces the kept edges to a minimum-length spanning tree,
/// while a looped layout keeps every surviving edge. Geometry that cannot
/// reach a retained building surfaces as a topology error.
pub fn materialize(model: &Model, genotype: &Genotype) -> SimResult<Candidate> {
    if genotype.buildings.len() != model.buildings.len() {
        return Err(SimError::GenotypeShape {
            expected: model.buildings.len(),
            got: genotype.buildings.len(),
        });
    }
    let retained: Vec<bool> = genotype.buildings.iter().map(|s| s.is_connected()).collect();
    let endpoint_kept = |r: NodeRef| match r {
        NodeRef::Building(i) => retained[i],
        NodeRef::Junction(_) => true,
    };

    let mut edge_keep: Vec<bool> = model
        .edges
        .iter()
        .map(|e| endpoint_kept(e.a) && endpoint_kept(e.b))
        .collect();

    prune_stub_junctions(model, &mut edge_keep);

    if !genotype.looped {
        reduce_to_spanning_tree(model, &mut edge_keep);
    }

    let mut builder = TopologyBuilder::new();
    let mut ids: HashMap<NodeRef, dn_core::NodeId> = HashMap::new();
    let mut consumer_buildings = Vec::new();
    let mut plant_buildings = Vec::new();

    for (i, building) in model.buildings.iter().enumerate() {
        let node_ref = NodeRef::Building(i);
        match genotype.buildings[i] {
            BuildingState::Plant => {
                let id = builder.add_plant(
                    building.name.clone(),
                    Some(BuildingId::from_index(i as u32)),
                    building.x_m,
                    building.y_m,
                );
                ids.insert(node_ref, id);
                plant_buildings.push(i);
            }
            BuildingState::Connected => {
                let id = builder.add_consumer(
                    building.name.clone(),
                    BuildingId::from_index(i as u32),
                    building.x_m,
                    building.y_m,
                );
                ids.insert(node_ref, id);
                consumer_buildings.push(i);
            }
            BuildingState::Disconnected => {}
        }
    }

    for (j, junction) in model.junctions.iter().enumerate() {
        let used = model
            .edges
            .iter()
            .zip(&edge_keep)
            .any(|(e, &keep)| keep && (e.a == NodeRef::Junction(j) || e.b == NodeRef::Junction(j)));
        if used {
            let id = builder.add_junction(junction.name.clone(), junction.x_m, junction.y_m);
            ids.insert(NodeRef::Junction(j), id);
        }
    }

    for (edge, &keep) in model.edges.iter().zip(&edge_keep) {
        if keep {
            builder.add_edge(edge.name.clone(), ids[&edge.a], ids[&edge.b], edge.length_m);
        }
    }

    let network = builder.build()?;
    Ok(Candidate {
        network,
        consumer_buildings,
        plant_buildings,
    })
}

/// Drop edges hanging off junctions with fewer than two kept edges, until
/// the degree pattern is stable.
fn prune_stub_junctions(model: &Model, edge_keep: &mut [bool]) {
    loop {
        let mut degree = vec![0_usize; model.junctions.len()];
        for (edge, &keep) in model.edges.iter().zip(edge_keep.iter()) {
            if !keep {
                continue;
            }
            for endpoint in [edge.a, edge.b] {
                if let NodeRef::Junction(j) = endpoint {
                    degree[j] += 1;
                }
            }
        }
        let mut changed = false;
        for (k, edge) in model.edges.iter().enumerate() {
            if !edge_keep[k] {
                continue;
            }
            let touches_stub = [edge.a, edge.b].into_iter().any(|endpoint| match endpoint {
                NodeRef::Junction(j) => degree[j] < 2,
                NodeRef::Building(_) => false,
            });
            if touches_stub {
                edge_keep[k] = false;
                changed = true;
            }
        }
        if !changed {
            return;
        }
    }
}

/// Kept-edge weight for the spanning tree: length first, geometry index as
/// a deterministic tie-break.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
struct TreeWeight {
    length_m: f64,
    idx: usize,
}

fn reduce_to_spanning_tree(model: &Model, edge_keep: &mut [bool]) {
    let mut graph: UnGraph<NodeRef, TreeWeight> = UnGraph::default();
    let mut nodes: HashMap<NodeRef, _> = HashMap::new();

    for (k, edge) in model.edges.iter().enumerate() {
        if !edge_keep[k] {
            continue;
        }
        let a = *nodes
            .entry(edge.a)
            .or_insert_with(|| graph.add_node(edge.a));
        let b = *nodes
            .entry(edge.b)
            .or_insert_with(|| graph.add_node(edge.b));
        graph.add_edge(
            a,
            b,
            TreeWeight {
                length_m: edge.length_m,
                idx: k,
            },
        );
    }

    let mut in_tree = vec![false; model.edges.len()];
    for element in min_spanning_tree(&graph) {
        if let Element::Edge { weight, .. } = element {
            in_tree[weight.idx] = true;
        }
    }
    for (k, keep) in edge_keep.iter_mut().enumerate() {
        *keep = *keep && in_tree[k];
    }
}

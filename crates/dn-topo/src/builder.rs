//! Incremental topology builder.

use dn_core::{BuildingId, EdgeId, NodeId};
use nalgebra::DMatrix;

use crate::edge::Edge;
use crate::error::{TopologyError, TopologyResult};
use crate::network::Network;
use crate::node::{Node, NodeKind};
use crate::normalize;

/// Builder for constructing a network incrementally.
///
/// Use the `add_*` methods to collect geometry, then call `build()` to
/// validate, assemble the incidence matrix, and normalize flow directions
/// into an immutable [`Network`].
#[derive(Debug, Default)]
pub struct TopologyBuilder {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    next_node_id: u32,
    next_edge_id: u32,
}

impl TopologyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_plant(
        &mut self,
        name: impl Into<String>,
        building: Option<BuildingId>,
        x_m: f64,
        y_m: f64,
    ) -> NodeId {
        self.add_node(name, NodeKind::Plant, building, x_m, y_m)
    }

    pub fn add_consumer(
        &mut self,
        name: impl Into<String>,
        building: BuildingId,
        x_m: f64,
        y_m: f64,
    ) -> NodeId {
        self.add_node(name, NodeKind::Consumer, Some(building), x_m, y_m)
    }

    pub fn add_junction(&mut self, name: impl Into<String>, x_m: f64, y_m: f64) -> NodeId {
        self.add_node(name, NodeKind::Junction, None, x_m, y_m)
    }

    fn add_node(
        &mut self,
        name: impl Into<String>,
        kind: NodeKind,
        building: Option<BuildingId>,
        x_m: f64,
        y_m: f64,
    ) -> NodeId {
        let id = NodeId::from_index(self.next_node_id);
        self.next_node_id += 1;
        self.nodes.push(Node {
            id,
            name: name.into(),
            kind,
            building,
            x_m,
            y_m,
        });
        id
    }

    /// Add a pipe trench between two nodes. `start -> end` is the initial
    /// reference direction; normalization may swap it.
    pub fn add_edge(
        &mut self,
        name: impl Into<String>,
        start: NodeId,
        end: NodeId,
        length_m: f64,
    ) -> EdgeId {
        let id = EdgeId::from_index(self.next_edge_id);
        self.next_edge_id += 1;
        self.edges.push(Edge {
            id,
            name: name.into(),
            start,
            end,
            length_m,
        });
        id
    }

    /// Validate, assemble the incidence matrix, normalize flow directions,
    /// and freeze into an immutable [`Network`].
    pub fn build(self) -> TopologyResult<Network> {
        let Self {
            mut nodes,
            mut edges,
            ..
        } = self;

        if nodes.is_empty() || edges.is_empty() {
            return Err(TopologyError::Empty);
        }
        let has_consumer = nodes.iter().any(|n| n.kind == NodeKind::Consumer);
        let has_plant = nodes.iter().any(|n| n.kind == NodeKind::Plant);
        if has_consumer && !has_plant {
            return Err(TopologyError::NoPlant);
        }

        for edge in &edges {
            if edge.start == edge.end {
                return Err(TopologyError::SelfLoop {
                    edge: edge.id,
                    node: edge.start,
                });
            }
            for endpoint in [edge.start, edge.end] {
                if endpoint.index() as usize >= nodes.len() {
                    return Err(TopologyError::UnknownEndpoint {
                        edge: edge.id,
                        index: endpoint.index(),
                    });
                }
            }
            if !(edge.length_m > 0.0) {
                return Err(TopologyError::BadLength {
                    edge: edge.id,
                    length_m: edge.length_m,
                });
            }
        }

        let mut incidence = build_incidence(&nodes, &edges);
        normalize::normalize_directions(&mut incidence, &mut edges, &nodes)?;
        normalize::check_terminals(&incidence, &nodes)?;

        // nodes never change during normalization; keep them as collected
        nodes.shrink_to_fit();
        Ok(Network {
            nodes,
            edges,
            incidence,
        })
    }
}

/// Assemble the signed n x e incidence matrix from edge endpoints:
/// +1 where the edge points to the node, -1 where it leaves it.
fn build_incidence(nodes: &[Node], edges: &[Edge]) -> DMatrix<f64> {
    let mut m = DMatrix::zeros(nodes.len(), edges.len());
    for (j, edge) in edges.iter().enumerate() {
        m[(edge.start.index() as usize, j)] = -1.0;
        m[(edge.end.index() as usize, j)] = 1.0;
    }
    m
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bld() -> BuildingId {
        BuildingId::from_index(0)
    }

    #[test]
    fn empty_is_rejected() {
        assert_eq!(TopologyBuilder::new().build().unwrap_err(), TopologyError::Empty);
    }

    #[test]
    fn self_loop_is_rejected() {
        let mut b = TopologyBuilder::new();
        let p = b.add_plant("P", None, 0.0, 0.0);
        let c = b.add_consumer("C", bld(), 1.0, 0.0);
        b.add_edge("E0", p, c, 10.0);
        let bad = b.add_junction("J", 2.0, 0.0);
        b.add_edge("E1", bad, bad, 5.0);
        assert!(matches!(
            b.build().unwrap_err(),
            TopologyError::SelfLoop { .. }
        ));
    }

    #[test]
    fn consumer_without_plant_is_rejected() {
        let mut b = TopologyBuilder::new();
        let c1 = b.add_consumer("C1", bld(), 0.0, 0.0);
        let c2 = b.add_consumer("C2", BuildingId::from_index(1), 1.0, 0.0);
        b.add_edge("E0", c1, c2, 10.0);
        assert_eq!(b.build().unwrap_err(), TopologyError::NoPlant);
    }

    #[test]
    fn every_column_sums_to_zero() {
        let mut b = TopologyBuilder::new();
        let p = b.add_plant("P", None, 0.0, 0.0);
        let j = b.add_junction("J", 50.0, 0.0);
        let c1 = b.add_consumer("C1", bld(), 100.0, 10.0);
        let c2 = b.add_consumer("C2", BuildingId::from_index(1), 100.0, -10.0);
        b.add_edge("E0", p, j, 50.0);
        b.add_edge("E1", j, c1, 60.0);
        b.add_edge("E2", j, c2, 60.0);
        let net = b.build().unwrap();

        for j in 0..net.edge_count() {
            let col_sum: f64 = net.incidence().column(j).iter().sum();
            assert_eq!(col_sum, 0.0);
        }
    }
}

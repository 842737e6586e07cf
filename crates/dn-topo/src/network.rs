//! The validated, immutable network.

use dn_core::{EdgeId, NodeId};
use nalgebra::DMatrix;

use crate::edge::Edge;
use crate::node::{Node, NodeKind};

/// A validated network: nodes, edges, and the signed edge-node incidence
/// matrix with normalized reference directions.
///
/// Matrix convention (rows = nodes, columns = edges): entry is +1 if the edge
/// points to the node, -1 if the edge leaves the node, 0 otherwise. Every
/// column has exactly one +1 and one -1; after normalization every plant row
/// contains only non-positive entries.
#[derive(Debug, Clone)]
pub struct Network {
    pub(crate) nodes: Vec<Node>,
    pub(crate) edges: Vec<Edge>,
    pub(crate) incidence: DMatrix<f64>,
}

impl Network {
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index() as usize)
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.index() as usize)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Signed edge-node incidence matrix (n x e).
    pub fn incidence(&self) -> &DMatrix<f64> {
        &self.incidence
    }

    /// Row indices of all plant nodes, in node order.
    pub fn plant_indices(&self) -> Vec<usize> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.kind == NodeKind::Plant)
            .map(|(i, _)| i)
            .collect()
    }

    /// Row indices of all consumer nodes, in node order.
    pub fn consumer_indices(&self) -> Vec<usize> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.kind == NodeKind::Consumer)
            .map(|(i, _)| i)
            .collect()
    }

    /// Number of edges incident to a node.
    pub fn degree(&self, node_index: usize) -> usize {
        self.incidence
            .row(node_index)
            .iter()
            .filter(|v| **v != 0.0)
            .count()
    }

    /// Total trench length [m].
    pub fn total_length_m(&self) -> f64 {
        self.edges.iter().map(|e| e.length_m).sum()
    }
}

#[cfg(test)]
mod tests {
    use crate::TopologyBuilder;
    use dn_core::BuildingId;

    #[test]
    fn accessors_on_linear_network() {
        let mut b = TopologyBuilder::new();
        let plant = b.add_plant("NODE0", Some(BuildingId::from_index(0)), 0.0, 0.0);
        let c1 = b.add_consumer("NODE1", BuildingId::from_index(1), 100.0, 0.0);
        let c2 = b.add_consumer("NODE2", BuildingId::from_index(2), 200.0, 0.0);
        b.add_edge("PIPE0", plant, c1, 100.0);
        b.add_edge("PIPE1", c1, c2, 100.0);
        let net = b.build().unwrap();

        assert_eq!(net.node_count(), 3);
        assert_eq!(net.edge_count(), 2);
        assert_eq!(net.plant_indices(), vec![0]);
        assert_eq!(net.consumer_indices(), vec![1, 2]);
        assert_eq!(net.degree(1), 2);
        assert!((net.total_length_m() - 200.0).abs() < 1e-12);
    }
}

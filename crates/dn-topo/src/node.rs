//! Network nodes.

use dn_core::{BuildingId, NodeId};

/// Role of a node in the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Supply source: heat or cold is injected here.
    Plant,
    /// Demand sink: a building substation draws from the network here.
    Consumer,
    /// Pass-through point (pipe junction, tee).
    Junction,
}

/// A node in the piping network.
///
/// Plants and consumers carry a building reference; junctions do not.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    pub kind: NodeKind,
    pub building: Option<BuildingId>,
    pub x_m: f64,
    pub y_m: f64,
}

impl Node {
    pub fn is_plant(&self) -> bool {
        self.kind == NodeKind::Plant
    }

    pub fn is_consumer(&self) -> bool {
        self.kind == NodeKind::Consumer
    }
}

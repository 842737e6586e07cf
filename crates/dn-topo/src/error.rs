//! Topology-specific error types.

use dn_core::{DnError, EdgeId, NodeId};
use thiserror::Error;

pub type TopologyResult<T> = Result<T, TopologyError>;

/// Errors raised while building or normalizing a network topology.
///
/// All of these are fatal for the topology being built; the optimizer maps
/// them to a penalty cost for the genotype that produced the layout.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TopologyError {
    #[error("Network has no nodes or no edges")]
    Empty,

    #[error("Network has consumers but no plant node")]
    NoPlant,

    #[error("Edge {edge} connects node {node} to itself")]
    SelfLoop { edge: EdgeId, node: NodeId },

    #[error("Edge {edge} references unknown node index {index}")]
    UnknownEndpoint { edge: EdgeId, index: u32 },

    #[error("Edge {edge} has non-positive length {length_m} m")]
    BadLength { edge: EdgeId, length_m: f64 },

    #[error("Node {node} is not connected to any edge")]
    OrphanNode { node: NodeId },

    #[error("{count} dead-end node(s) that are neither plants nor consumers")]
    DeadEnd { count: usize },

    #[error("Direction normalization did not converge within {iterations} passes")]
    NonConvergent { iterations: usize },
}

impl From<TopologyError> for DnError {
    fn from(err: TopologyError) -> Self {
        DnError::Invariant {
            what: Box::leak(err.to_string().into_boxed_str()),
        }
    }
}

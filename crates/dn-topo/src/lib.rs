//! dn-topo: network topology for district energy networks.
//!
//! Builds a validated, immutable [`Network`] from node and edge geometry:
//! a signed edge-node incidence matrix whose reference directions are
//! normalized so that flow leaves plants and reaches every consumer.

pub mod builder;
pub mod edge;
pub mod error;
pub mod network;
pub mod node;
mod normalize;

pub use builder::TopologyBuilder;
pub use edge::Edge;
pub use error::{TopologyError, TopologyResult};
pub use network::Network;
pub use node::{Node, NodeKind};

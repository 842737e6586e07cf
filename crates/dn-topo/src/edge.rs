//! Network edges (pipe trenches).

use dn_core::{EdgeId, NodeId};

/// A pipe trench between two nodes.
///
/// `start -> end` is the positive-flow reference direction. Normalization may
/// swap the endpoints so that the reference direction points away from plants.
/// Diameters are not stored here: pipe sizing is per design candidate and
/// lives in the hydraulic solver's output.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub id: EdgeId,
    pub name: String,
    pub start: NodeId,
    pub end: NodeId,
    pub length_m: f64,
}

impl Edge {
    /// Swap the reference direction in place.
    pub(crate) fn reverse(&mut self) {
        core::mem::swap(&mut self.start, &mut self.end);
    }
}

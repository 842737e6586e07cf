//! Flow-direction normalization.
//!
//! The builder assembles the incidence matrix with arbitrary edge directions
//! taken from the input geometry. Normalization imposes a unit trial demand at
//! every consumer and a balancing trial supply at every plant, then repeatedly
//! scans matrix rows and flips edges whose sign pattern is inconsistent with
//! the node's role, until a full pass produces no flips:
//!
//! - a plant row must not contain a +1 (a plant never receives network inflow
//!   at its own node in the reference direction);
//! - a non-plant row with incident edges must contain at least one +1
//!   (flow has to be able to reach consumers and pass through junctions).

use nalgebra::DMatrix;
use tracing::debug;

use crate::edge::Edge;
use crate::error::{TopologyError, TopologyResult};
use crate::node::{Node, NodeKind};

/// Normalize edge reference directions in place.
///
/// Flips are deterministic: the first offending incident edge of a row is
/// reversed. The pass count is bounded; exceeding it means the trial-demand
/// pattern cannot be oriented (typically a disconnected fragment).
pub(crate) fn normalize_directions(
    incidence: &mut DMatrix<f64>,
    edges: &mut [Edge],
    nodes: &[Node],
) -> TopologyResult<()> {
    let n_plants = nodes.iter().filter(|n| n.kind == NodeKind::Plant).count();
    let n_consumers = nodes.iter().filter(|n| n.kind == NodeKind::Consumer).count();

    // Trial demand: +1 per consumer, balancing share per plant.
    let mut trial = vec![0.0_f64; nodes.len()];
    for (i, node) in nodes.iter().enumerate() {
        trial[i] = match node.kind {
            NodeKind::Consumer => 1.0,
            NodeKind::Plant => -(n_consumers as f64) / (n_plants.max(1) as f64),
            NodeKind::Junction => 0.0,
        };
    }

    let max_passes = (10 * edges.len()).max(100);
    for pass in 0..max_passes {
        let mut flipped = 0_usize;
        for i in 0..nodes.len() {
            let row_max = incidence.row(i).max();
            let inconsistent = if trial[i] < 0.0 {
                // plant row with an inflow entry
                row_max > 0.0
            } else {
                // consumer or junction row with incident edges but no inflow
                row_max <= 0.0 && incidence.row(i).iter().any(|v| *v != 0.0)
            };
            if !inconsistent {
                continue;
            }
            // flip the first edge carrying the offending sign: an inflow on a
            // plant row, a missing-inflow candidate elsewhere. Flipping an
            // already-consistent column would just oscillate on cycles.
            let offending = if trial[i] < 0.0 { 1.0 } else { -1.0 };
            let j = (0..edges.len())
                .find(|&j| incidence[(i, j)] == offending)
                .expect("inconsistent row has an edge with the offending sign");
            for r in 0..nodes.len() {
                incidence[(r, j)] = -incidence[(r, j)];
            }
            edges[j].reverse();
            flipped += 1;
        }
        if flipped == 0 {
            debug!(passes = pass + 1, "direction normalization converged");
            return Ok(());
        }
    }

    Err(TopologyError::NonConvergent {
        iterations: max_passes,
    })
}

/// Post-normalization terminal checks.
///
/// Every node must touch at least one edge; the only rows without any inflow
/// entry must be the plant rows; and every junction must also have an outflow
/// entry (a junction with pure inflow is a dead end left over from pruned
/// geometry).
pub(crate) fn check_terminals(incidence: &DMatrix<f64>, nodes: &[Node]) -> TopologyResult<()> {
    let n_plants = nodes.iter().filter(|n| n.kind == NodeKind::Plant).count();

    let mut no_inflow_rows = 0_usize;
    let mut dead_junctions = 0_usize;
    for (i, node) in nodes.iter().enumerate() {
        let row = incidence.row(i);
        if row.iter().all(|v| *v == 0.0) {
            return Err(TopologyError::OrphanNode { node: node.id });
        }
        if !row.iter().any(|v| *v == 1.0) {
            no_inflow_rows += 1;
        }
        if node.kind == NodeKind::Junction && !row.iter().any(|v| *v == -1.0) {
            dead_junctions += 1;
        }
    }

    if no_inflow_rows != n_plants || dead_junctions > 0 {
        return Err(TopologyError::DeadEnd {
            count: no_inflow_rows.saturating_sub(n_plants) + dead_junctions,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::{TopologyBuilder, TopologyError};
    use dn_core::BuildingId;

    fn bld(i: u32) -> BuildingId {
        BuildingId::from_index(i)
    }

    #[test]
    fn reversed_geometry_is_reoriented() {
        // edges drawn against the flow: consumer -> plant
        let mut b = TopologyBuilder::new();
        let p = b.add_plant("P", None, 0.0, 0.0);
        let c1 = b.add_consumer("C1", bld(0), 100.0, 0.0);
        let c2 = b.add_consumer("C2", bld(1), 200.0, 0.0);
        b.add_edge("E0", c1, p, 100.0);
        b.add_edge("E1", c2, c1, 100.0);
        let net = b.build().unwrap();

        // plant row only non-positive entries
        for v in net.incidence().row(0).iter() {
            assert!(*v <= 0.0);
        }
        // edges now point away from the plant
        assert_eq!(net.edges()[0].start, p);
        assert_eq!(net.edges()[0].end, c1);
        assert_eq!(net.edges()[1].start, c1);
        assert_eq!(net.edges()[1].end, c2);
    }

    #[test]
    fn branched_geometry_with_junction() {
        let mut b = TopologyBuilder::new();
        let p = b.add_plant("P", None, 0.0, 0.0);
        let j = b.add_junction("J", 50.0, 0.0);
        let c1 = b.add_consumer("C1", bld(0), 100.0, 10.0);
        let c2 = b.add_consumer("C2", bld(1), 100.0, -10.0);
        // all edges drawn towards the junction
        b.add_edge("E0", p, j, 50.0);
        b.add_edge("E1", c1, j, 60.0);
        b.add_edge("E2", c2, j, 60.0);
        let net = b.build().unwrap();

        // junction receives from the plant and feeds both consumers
        let ji = 1_usize;
        let inflow: usize = net
            .incidence()
            .row(ji)
            .iter()
            .filter(|v| **v == 1.0)
            .count();
        assert_eq!(inflow, 1);
        for ci in [2_usize, 3] {
            assert!(net.incidence().row(ci).iter().any(|v| *v == 1.0));
        }
    }

    #[test]
    fn cycle_through_the_plant_is_oriented() {
        // ring P -> C1 -> C2 -> P: the plant row's first incident column is
        // already outflow, only the closing edge needs the flip
        let mut b = TopologyBuilder::new();
        let p = b.add_plant("P", None, 0.0, 0.0);
        let c1 = b.add_consumer("C1", bld(0), 100.0, 0.0);
        let c2 = b.add_consumer("C2", bld(1), 100.0, 100.0);
        b.add_edge("E0", p, c1, 100.0);
        b.add_edge("E1", c1, c2, 100.0);
        b.add_edge("E2", c2, p, 140.0);
        let net = b.build().unwrap();

        // plant row carries no inflow, both consumers keep one
        for v in net.incidence().row(0).iter() {
            assert!(*v <= 0.0);
        }
        for ci in [1_usize, 2] {
            assert!(net.incidence().row(ci).iter().any(|v| *v == 1.0));
        }
        // E0 untouched, E2 reversed to leave the plant
        assert_eq!(net.edges()[0].start, p);
        assert_eq!(net.edges()[2].start, p);
        assert_eq!(net.edges()[2].end, c2);
    }

    #[test]
    fn junction_dead_end_is_detected() {
        let mut b = TopologyBuilder::new();
        let p = b.add_plant("P", None, 0.0, 0.0);
        let c = b.add_consumer("C", bld(0), 100.0, 0.0);
        let stub = b.add_junction("J", 50.0, 50.0);
        b.add_edge("E0", p, c, 100.0);
        b.add_edge("E1", c, stub, 70.0);
        let err = b.build().unwrap_err();
        assert!(matches!(
            err,
            TopologyError::DeadEnd { .. } | TopologyError::NonConvergent { .. }
        ));
    }
}

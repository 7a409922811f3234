// A* search over the waypoint graph.
//
// Heuristic: straight-line distance to the goal. Edge weights are the same
// Euclidean distances, so the heuristic is admissible and consistent.
//
// The open set is a binary heap with lazy deletion: improving a node's cost
// pushes a fresh entry and stale entries are skipped when popped.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use super::error::NavError;
use super::navigation::{NavGraph, NodeId};

/// Entry in the open set.
#[derive(Debug, Clone, Copy)]
struct OpenEntry {
    /// g + h at push time.
    f: f32,
    /// g at push time; stale if larger than the current best g.
    g: f32,
    /// Push counter. Among equal f, earlier pushes are expanded first.
    seq: u64,
    node: usize,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenEntry {}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for a min-heap on (f, seq).
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Least-cost path from `start_id` to `goal_id`, both ends included.
///
/// Returns an empty path when the goal is unreachable. Unknown ids are an
/// error. `start_id == goal_id` yields a single-node path.
pub fn a_star(graph: &NavGraph, start_id: &str, goal_id: &str) -> Result<Vec<NodeId>, NavError> {
    let start = graph.index_of(start_id)?;
    let goal = graph.index_of(goal_id)?;
    let goal_pos = graph.node_at(goal).position;
    let h = |idx: usize| graph.node_at(idx).position.distance(goal_pos);

    let n = graph.len();
    let mut g_score = vec![f32::INFINITY; n];
    let mut came_from: Vec<Option<usize>> = vec![None; n];
    let mut open = BinaryHeap::new();
    let mut seq = 0u64;
    let mut expanded = 0usize;

    g_score[start] = 0.0;
    open.push(OpenEntry {
        f: h(start),
        g: 0.0,
        seq,
        node: start,
    });

    while let Some(OpenEntry { g, node: current, .. }) = open.pop() {
        if g > g_score[current] {
            continue;
        }
        if current == goal {
            let path = reconstruct_path(graph, &came_from, current);
            log::debug!(
                "A* {} -> {}: {} nodes, cost {:.3}, {} expansions",
                start_id,
                goal_id,
                path.len(),
                g,
                expanded,
            );
            return Ok(path);
        }
        expanded += 1;

        for edge in graph.edges_at(current) {
            let tentative = g + edge.weight;
            if tentative < g_score[edge.to] {
                came_from[edge.to] = Some(current);
                g_score[edge.to] = tentative;
                seq += 1;
                open.push(OpenEntry {
                    f: tentative + h(edge.to),
                    g: tentative,
                    seq,
                    node: edge.to,
                });
            }
        }
    }

    log::debug!(
        "A* {} -> {}: unreachable after {} expansions",
        start_id,
        goal_id,
        expanded
    );
    Ok(Vec::new())
}

/// Walk predecessor links back from `current`, then reverse.
fn reconstruct_path(
    graph: &NavGraph,
    came_from: &[Option<usize>],
    mut current: usize,
) -> Vec<NodeId> {
    let mut path = vec![graph.node_at(current).id.clone()];
    while let Some(prev) = came_from[current] {
        current = prev;
        path.push(graph.node_at(current).id.clone());
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::navigation::{GraphConfig, Node, build_graph};

    fn scenario() -> NavGraph {
        build_graph(
            vec![
                Node::key("A", 0.0, 0.0),
                Node::waypoint("B", 3.0, 0.0),
                Node::key("C", 6.0, 0.0),
                Node::waypoint("D", 3.0, 4.0),
            ],
            GraphConfig::new(5.0, 4),
        )
        .unwrap()
    }

    #[test]
    fn straight_route_through_waypoint() {
        let graph = scenario();
        let path = a_star(&graph, "A", "C").unwrap();
        assert_eq!(path, vec!["A", "B", "C"]);
        assert_eq!(graph.path_cost(&path).unwrap(), 6.0);
    }

    #[test]
    fn same_start_and_goal() {
        let graph = scenario();
        assert_eq!(a_star(&graph, "D", "D").unwrap(), vec!["D"]);
    }

    #[test]
    fn isolated_goal_is_unreachable() {
        let nodes = vec![
            Node::key("A", 0.0, 0.0),
            Node::waypoint("B", 3.0, 0.0),
            Node::key("far", 50.0, 50.0),
        ];
        let graph = build_graph(nodes, GraphConfig::new(5.0, 4)).unwrap();
        assert!(a_star(&graph, "A", "far").unwrap().is_empty());
        assert!(a_star(&graph, "far", "A").unwrap().is_empty());
    }

    #[test]
    fn unknown_ids_fail_fast() {
        let graph = scenario();
        let unknown = NavError::UnknownNode("nope".into());
        assert_eq!(a_star(&graph, "nope", "C").unwrap_err(), unknown);
        assert_eq!(a_star(&graph, "A", "nope").unwrap_err(), unknown);
    }

    #[test]
    fn follows_one_way_edges() {
        // hub keeps only its nearest neighbour (n1), but n3 still links to hub.
        let graph = build_graph(
            vec![
                Node::key("hub", 0.0, 0.0),
                Node::waypoint("n1", 1.0, 0.0),
                Node::key("n3", -3.0, 0.0),
            ],
            GraphConfig::new(10.0, 1),
        )
        .unwrap();
        assert_eq!(a_star(&graph, "n3", "hub").unwrap(), vec!["n3", "hub"]);
        // The reverse direction dead-ends: n1 only links back to hub.
        assert!(a_star(&graph, "hub", "n3").unwrap().is_empty());
    }

    #[test]
    fn detours_around_gap() {
        // Direct hop a -> c is longer than the radius; go around via b1/b2.
        let graph = build_graph(
            vec![
                Node::key("a", 0.0, 0.0),
                Node::waypoint("b1", 4.0, 3.0),
                Node::waypoint("b2", 8.0, 3.0),
                Node::key("c", 12.0, 0.0),
            ],
            GraphConfig::new(5.0, 8),
        )
        .unwrap();
        let path = a_star(&graph, "a", "c").unwrap();
        assert_eq!(path, vec!["a", "b1", "b2", "c"]);
    }

    #[test]
    fn heap_orders_by_f_then_seq() {
        let entry = |f, seq, node| OpenEntry {
            f,
            g: 0.0,
            seq,
            node,
        };
        let mut heap = BinaryHeap::from(vec![
            entry(2.0, 0, 0),
            entry(1.0, 2, 1),
            entry(1.0, 1, 2),
        ]);
        let mut order = Vec::new();
        while let Some(e) = heap.pop() {
            order.push(e.node);
        }
        assert_eq!(order, vec![2, 1, 0]);
    }
}

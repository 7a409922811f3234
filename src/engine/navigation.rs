// Waypoint graph for walking between named locations in the garden scene.
//
// Layer 1: SpatialIndex: uniform hash of node positions (spatial.rs).
// Layer 2: NavGraph: proximity graph, each node linked to its nearest
//          neighbours within `neighbor_radius`.
// Layer 3: a_star + smooth_path (astar.rs, smoothing.rs).
//
// Built once when the scene loads, then only read.

use glam::Vec2;
use serde::Deserialize;
use std::collections::HashMap;

use super::error::NavError;
use super::spatial::SpatialIndex;

/// Node identifiers as they appear in scene data.
pub type NodeId = String;

// ============================================================================
// CONFIG
// ============================================================================

/// Neighbour radius the scene shipped with, in world units.
pub const DEFAULT_NEIGHBOR_RADIUS: f32 = 20.0;
/// Maximum outgoing edges per node the scene shipped with.
pub const DEFAULT_MAX_NEIGHBORS: usize = 8;

/// Graph build parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphConfig {
    /// Maximum edge length. Also the spatial index cell size.
    pub neighbor_radius: f32,
    /// Each node keeps at most this many edges, nearest first.
    pub max_neighbors: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            neighbor_radius: DEFAULT_NEIGHBOR_RADIUS,
            max_neighbors: DEFAULT_MAX_NEIGHBORS,
        }
    }
}

impl GraphConfig {
    pub fn new(neighbor_radius: f32, max_neighbors: usize) -> Self {
        Self {
            neighbor_radius,
            max_neighbors,
        }
    }

    pub fn validate(&self) -> Result<(), NavError> {
        if !self.neighbor_radius.is_finite() || self.neighbor_radius <= 0.0 {
            return Err(NavError::InvalidConfig(format!(
                "neighbor_radius must be finite and positive, got {}",
                self.neighbor_radius
            )));
        }
        Ok(())
    }
}

// ============================================================================
// NODES AND EDGES
// ============================================================================

/// Whether a node is a destination or only shapes the path between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// A destination the camera can be sent to.
    Key,
    /// An intermediate point, never a route endpoint.
    Waypoint,
}

/// A named location on the ground plane. World X/Z maps to `position.x/y`.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub position: Vec2,
    pub kind: NodeKind,
}

impl Node {
    pub fn new(id: impl Into<NodeId>, x: f32, y: f32, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            position: Vec2::new(x, y),
            kind,
        }
    }

    pub fn key(id: impl Into<NodeId>, x: f32, y: f32) -> Self {
        Self::new(id, x, y, NodeKind::Key)
    }

    pub fn waypoint(id: impl Into<NodeId>, x: f32, y: f32) -> Self {
        Self::new(id, x, y, NodeKind::Waypoint)
    }

    pub fn is_key(&self) -> bool {
        self.kind == NodeKind::Key
    }
}

/// Outgoing edge. `to` indexes into the owning graph's node list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub to: usize,
    /// Euclidean distance between the two endpoints.
    pub weight: f32,
}

// ============================================================================
// NAV GRAPH
// ============================================================================

/// Proximity graph over the scene's waypoints.
///
/// Edges are per-node and not necessarily mutual: truncation to
/// `max_neighbors` can keep A→B while dropping B→A. Searches walk the
/// graph as directed.
#[derive(Debug, Clone)]
pub struct NavGraph {
    nodes: Vec<Node>,
    /// `edges[i]`: outgoing edges of `nodes[i]`, ascending by weight.
    edges: Vec<Vec<Edge>>,
    index: HashMap<NodeId, usize>,
}

impl NavGraph {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Dense index of `id`, or `UnknownNode`.
    pub fn index_of(&self, id: &str) -> Result<usize, NavError> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| NavError::UnknownNode(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn node(&self, id: &str) -> Result<&Node, NavError> {
        self.index_of(id).map(|i| &self.nodes[i])
    }

    /// Node at a dense index. Panics if out of range, like slice indexing.
    pub fn node_at(&self, idx: usize) -> &Node {
        &self.nodes[idx]
    }

    pub fn edges(&self, id: &str) -> Result<&[Edge], NavError> {
        self.index_of(id).map(|i| self.edges[i].as_slice())
    }

    pub fn edges_at(&self, idx: usize) -> &[Edge] {
        &self.edges[idx]
    }

    pub fn edge_count(&self) -> usize {
        self.edges.iter().map(Vec::len).sum()
    }

    pub fn key_nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| n.is_key())
    }

    /// Nodes with no outgoing edges. Nothing can be routed through them.
    pub fn isolated_nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes
            .iter()
            .zip(&self.edges)
            .filter(|(_, edges)| edges.is_empty())
            .map(|(node, _)| node)
    }

    /// Sum of straight-line distances between consecutive nodes of `ids`.
    pub fn path_cost<S: AsRef<str>>(&self, ids: &[S]) -> Result<f32, NavError> {
        let mut cost = 0.0;
        for pair in ids.windows(2) {
            let a = self.node(pair[0].as_ref())?.position;
            let b = self.node(pair[1].as_ref())?.position;
            cost += a.distance(b);
        }
        Ok(cost)
    }
}

// ============================================================================
// GRAPH BUILDER
// ============================================================================

/// Build the proximity graph.
///
/// For every node: gather candidates from the 3x3 cell block around it,
/// keep those within `neighbor_radius`, sort nearest first (stable, so
/// equal distances keep cell-scan order) and truncate to `max_neighbors`.
pub fn build_graph(nodes: Vec<Node>, config: GraphConfig) -> Result<NavGraph, NavError> {
    config.validate()?;

    let mut index = HashMap::with_capacity(nodes.len());
    for (i, node) in nodes.iter().enumerate() {
        if index.insert(node.id.clone(), i).is_some() {
            return Err(NavError::DuplicateNode(node.id.clone()));
        }
    }

    let radius_sq = config.neighbor_radius * config.neighbor_radius;
    let mut grid = SpatialIndex::new(config.neighbor_radius);
    for (i, node) in nodes.iter().enumerate() {
        grid.insert(node.position, i);
    }

    let mut edges = Vec::with_capacity(nodes.len());
    let mut candidates: Vec<(f32, usize)> = Vec::new();
    for (i, node) in nodes.iter().enumerate() {
        candidates.clear();
        candidates.extend(grid.neighbors(node.position).filter_map(|j| {
            if j == i {
                return None;
            }
            let d2 = node.position.distance_squared(nodes[j].position);
            (d2 <= radius_sq).then_some((d2, j))
        }));
        candidates.sort_by(|a, b| a.0.total_cmp(&b.0));
        candidates.truncate(config.max_neighbors);

        edges.push(
            candidates
                .iter()
                .map(|&(d2, j)| Edge {
                    to: j,
                    weight: d2.sqrt(),
                })
                .collect::<Vec<_>>(),
        );
    }

    let graph = NavGraph {
        nodes,
        edges,
        index,
    };

    log::info!(
        "Built nav graph: {} nodes, {} edges, {} cells (radius {}, max {} neighbours)",
        graph.len(),
        graph.edge_count(),
        grid.occupied_cells(),
        config.neighbor_radius,
        config.max_neighbors,
    );
    for node in graph.isolated_nodes() {
        log::warn!(
            "Nav node {} has no neighbours within {}",
            node.id,
            config.neighbor_radius
        );
    }

    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;

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

    fn targets(graph: &NavGraph, id: &str) -> Vec<String> {
        graph
            .edges(id)
            .unwrap()
            .iter()
            .map(|e| graph.node_at(e.to).id.clone())
            .collect()
    }

    #[test]
    fn scenario_edges_sorted_by_distance() {
        let graph = scenario();
        assert_eq!(targets(&graph, "A"), vec!["B", "D"]);
        let edges = graph.edges("A").unwrap();
        let weights: Vec<f32> = edges.iter().map(|e| e.weight).collect();
        assert_eq!(weights, vec![3.0, 5.0]);
        assert_eq!(targets(&graph, "B"), vec!["A", "C", "D"]);
        assert_eq!(targets(&graph, "D"), vec!["B", "A", "C"]);
    }

    #[test]
    fn truncation_keeps_nearest() {
        let graph = build_graph(
            vec![
                Node::key("hub", 0.0, 0.0),
                Node::waypoint("n1", 1.0, 0.0),
                Node::waypoint("n2", 0.0, 2.0),
                Node::waypoint("n3", -3.0, 0.0),
            ],
            GraphConfig::new(10.0, 2),
        )
        .unwrap();
        assert_eq!(targets(&graph, "hub"), vec!["n1", "n2"]);
        // n3 still reaches hub even though hub dropped n3: edges are per-node.
        assert_eq!(targets(&graph, "n3")[0], "hub");
    }

    #[test]
    fn far_node_is_isolated() {
        let graph = build_graph(
            vec![Node::key("a", 0.0, 0.0), Node::key("b", 100.0, 0.0)],
            GraphConfig::default(),
        )
        .unwrap();
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.isolated_nodes().count(), 2);
    }

    #[test]
    fn edge_at_exact_radius_is_kept() {
        let graph = build_graph(
            vec![Node::key("a", 0.0, 0.0), Node::key("b", 5.0, 0.0)],
            GraphConfig::new(5.0, 8),
        )
        .unwrap();
        assert_eq!(targets(&graph, "a"), vec!["b"]);
    }

    #[test]
    fn duplicate_ids_rejected() {
        let err = build_graph(
            vec![Node::key("a", 0.0, 0.0), Node::waypoint("a", 1.0, 0.0)],
            GraphConfig::default(),
        )
        .unwrap_err();
        assert_eq!(err, NavError::DuplicateNode("a".into()));
    }

    #[test]
    fn bad_radius_rejected() {
        for radius in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            let result = build_graph(vec![], GraphConfig::new(radius, 4));
            assert!(matches!(result, Err(NavError::InvalidConfig(_))));
        }
    }

    #[test]
    fn lookups_and_cost() {
        let graph = scenario();
        assert_eq!(graph.len(), 4);
        assert!(graph.contains("D"));
        assert_eq!(graph.key_nodes().count(), 2);
        assert_eq!(
            graph.node("Z").unwrap_err(),
            NavError::UnknownNode("Z".into())
        );
        assert_eq!(graph.path_cost(&["A", "B", "C"]).unwrap(), 6.0);
        assert_eq!(graph.path_cost::<&str>(&[]).unwrap(), 0.0);
    }

    #[test]
    fn far_coordinates_build_without_overflow() {
        let graph = build_graph(
            vec![
                Node::key("far", 3e9, 0.0),
                Node::waypoint("far_step", 3e9, 0.5),
                Node::key("home", 0.0, 0.0),
            ],
            GraphConfig::new(1.0, 4),
        )
        .unwrap();
        assert_eq!(targets(&graph, "far"), vec!["far_step"]);
        assert!(targets(&graph, "home").is_empty());
    }

    #[test]
    fn tiny_radius_builds_without_overflow() {
        let graph = build_graph(
            vec![
                Node::key("a", -5.0, 0.0),
                Node::key("b", f32::MAX, f32::MIN),
                Node::key("b_twin", f32::MAX, f32::MIN),
            ],
            GraphConfig::new(1e-9, 4),
        )
        .unwrap();
        assert!(targets(&graph, "a").is_empty());
        assert_eq!(targets(&graph, "b"), vec!["b_twin"]);
    }

    #[test]
    fn kind_parses_lowercase() {
        let kind: NodeKind = serde_json::from_str("\"waypoint\"").unwrap();
        assert_eq!(kind, NodeKind::Waypoint);
    }
}

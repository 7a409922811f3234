// Session-level routing between key locations.
//
// The Navigator owns the graph for the lifetime of the scene and hands
// out smoothed routes, resolved to 3D points on the terrain for the
// motion layer.

use bevy_ecs::prelude::*;
use glam::{Vec2, Vec3};

use super::astar::a_star;
use super::error::NavError;
use super::navigation::{GraphConfig, NavGraph, Node, NodeId, NodeKind, build_graph};
use super::smoothing::smooth_path;

/// Shortest travel time handed to the motion layer, in seconds.
pub const MIN_TRAVEL_DURATION: f32 = 0.1;
/// Speeds below this are clamped to avoid dividing by ~0.
const MIN_TRAVEL_SPEED: f32 = 0.001;

/// Owns the waypoint graph and answers route requests.
#[derive(Resource, Debug, Clone)]
pub struct Navigator {
    graph: NavGraph,
}

impl Navigator {
    /// Build the graph from scene nodes. Call once at scene load.
    pub fn new(nodes: Vec<Node>, config: GraphConfig) -> Result<Self, NavError> {
        Ok(Self {
            graph: build_graph(nodes, config)?,
        })
    }

    pub fn graph(&self) -> &NavGraph {
        &self.graph
    }

    /// Smoothed route between two key nodes.
    ///
    /// Empty when the goal can't be reached. Unknown ids and waypoint
    /// endpoints are errors.
    pub fn route(&self, start_id: &str, goal_id: &str) -> Result<Vec<NodeId>, NavError> {
        self.require_key(start_id)?;
        self.require_key(goal_id)?;

        let raw = a_star(&self.graph, start_id, goal_id)?;
        if raw.is_empty() {
            log::warn!("No route from {} to {}", start_id, goal_id);
            return Ok(raw);
        }
        smooth_path(&raw, &self.graph)
    }

    /// Map node ids to world positions, sampling `height` at each (x, z).
    pub fn resolve<S, F>(&self, ids: &[S], height: F) -> Result<Vec<Vec3>, NavError>
    where
        S: AsRef<str>,
        F: Fn(Vec2) -> f32,
    {
        ids.iter()
            .map(|id| {
                let p = self.graph.node(id.as_ref())?.position;
                Ok(Vec3::new(p.x, height(p), p.y))
            })
            .collect()
    }

    fn require_key(&self, id: &str) -> Result<(), NavError> {
        match self.graph.node(id)?.kind {
            NodeKind::Key => Ok(()),
            NodeKind::Waypoint => Err(NavError::NotAKeyNode(id.to_string())),
        }
    }
}

/// Total length of the polyline through `points`.
pub fn polyline_length(points: &[Vec3]) -> f32 {
    points.windows(2).map(|w| w[0].distance(w[1])).sum()
}

/// Seconds needed to cover `length` at `speed` units per second.
pub fn travel_duration(length: f32, speed: f32) -> f32 {
    (length / speed.max(MIN_TRAVEL_SPEED)).max(MIN_TRAVEL_DURATION)
}

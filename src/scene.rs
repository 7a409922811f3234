// Scene layer: where the café and garden locations come from.
//
// The navigation core only sees flat (id, x, y, kind) records. This module
// supplies them, either from the built-in layout or from a JSON file, plus
// the terrain height the walkthrough camera follows.

use glam::Vec2;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::engine::{Node, NodeKind};

/// Camera eye height above the ground, in world units.
pub const EYE_HEIGHT: f32 = 1.5;

/// Errors loading scene waypoint data.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed waypoint JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("waypoint {0} has a non-finite coordinate")]
    InvalidRecord(String),
}

/// One named location as stored in scene files. `y` is world Z.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WaypointRecord {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub kind: NodeKind,
}

impl TryFrom<WaypointRecord> for Node {
    type Error = SceneError;

    fn try_from(record: WaypointRecord) -> Result<Self, Self::Error> {
        if !record.x.is_finite() || !record.y.is_finite() {
            return Err(SceneError::InvalidRecord(record.id));
        }
        Ok(Node::new(record.id, record.x, record.y, record.kind))
    }
}

/// Parse a JSON array of waypoint records.
pub fn parse_nodes(json: &str) -> Result<Vec<Node>, SceneError> {
    let records: Vec<WaypointRecord> = serde_json::from_str(json)?;
    records.into_iter().map(Node::try_from).collect()
}

/// Read and parse a waypoint file.
pub fn load_nodes(path: impl AsRef<Path>) -> Result<Vec<Node>, SceneError> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path).map_err(|source| SceneError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let nodes = parse_nodes(&json)?;
    log::info!("Loaded {} waypoints from {}", nodes.len(), path.display());
    Ok(nodes)
}

// ============================================================================
// BUILT-IN LAYOUT
// ============================================================================

/// Café interior, terrace and garden. Walkthrough starts at the entrance.
pub fn cafe_garden_nodes() -> Vec<Node> {
    vec![
        Node::key("entrance", 13.0, 13.0),
        Node::waypoint("porch", 8.0, 8.0),
        Node::waypoint("aisle", 4.0, 1.0),
        Node::key("counter", 0.0, -6.0),
        Node::key("window_table", -12.0, -4.0),
        Node::waypoint("terrace", -10.0, 6.0),
        Node::waypoint("lawn", -15.0, 10.0),
        Node::key("garden_gate", -20.0, 14.0),
        Node::waypoint("rose_bed", -12.0, 18.0),
        Node::key("fountain", -4.0, 22.0),
        Node::waypoint("path_east", 6.0, 22.0),
        Node::waypoint("hedge", 16.0, -4.0),
        Node::waypoint("orchard", 17.0, -11.0),
        Node::key("bench", 18.0, -18.0),
    ]
}

/// Rolling ground under the garden, roughly within [0, 1.2].
pub fn demo_ground_height(p: Vec2) -> f32 {
    0.6 + 0.4 * (p.x * 0.15).sin() * (p.y * 0.12).cos() + 0.2 * (p.length() * 0.05).sin()
}

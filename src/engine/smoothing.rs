// Path post-processing: drop interior points that lie (almost) on the
// straight line between their neighbours in the raw A* path.
//
// Single left-to-right pass. Each interior point is tested against its
// raw predecessor and successor, not against the last point kept.

use glam::Vec2;

use super::error::NavError;
use super::navigation::{NavGraph, NodeId};

/// Cross product / combined segment length below this counts as collinear.
pub const COLLINEAR_EPSILON: f32 = 0.01;
/// Floor for the combined segment length, so coincident points don't divide by zero.
const MIN_SEGMENT_LENGTH: f32 = 1e-6;

/// True if `b` barely bends the line a → b → c.
pub fn almost_collinear(a: Vec2, b: Vec2, c: Vec2, eps: f32) -> bool {
    let ab = b - a;
    let bc = c - b;
    let cross = ab.perp_dot(bc).abs();
    cross / (ab.length() + bc.length()).max(MIN_SEGMENT_LENGTH) < eps
}

/// Remove nearly collinear interior nodes from `ids`.
///
/// First and last nodes are always kept; inputs of length <= 2 are
/// returned as-is without touching the graph.
pub fn smooth_path<S: AsRef<str>>(ids: &[S], graph: &NavGraph) -> Result<Vec<NodeId>, NavError> {
    if ids.len() <= 2 {
        return Ok(ids.iter().map(|id| id.as_ref().to_string()).collect());
    }

    let points = ids
        .iter()
        .map(|id| graph.node(id.as_ref()).map(|n| n.position))
        .collect::<Result<Vec<_>, _>>()?;

    let last = ids.len() - 1;
    let mut kept = Vec::with_capacity(ids.len());
    kept.push(ids[0].as_ref().to_string());
    for i in 1..last {
        if !almost_collinear(points[i - 1], points[i], points[i + 1], COLLINEAR_EPSILON) {
            kept.push(ids[i].as_ref().to_string());
        }
    }
    kept.push(ids[last].as_ref().to_string());

    log::debug!("Smoothed path: {} -> {} nodes", ids.len(), kept.len());
    Ok(kept)
}

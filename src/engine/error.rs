// Error taxonomy for the waypoint navigation core.
//
// "No route" is not an error: searches return an empty path for that.
// Everything here indicates malformed scene data or a caller bug.

use thiserror::Error;

/// Errors raised by graph construction, search and path resolution.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NavError {
    /// A node id was looked up that the graph does not contain.
    #[error("unknown node id: {0}")]
    UnknownNode(String),

    /// Two input nodes share the same id.
    #[error("duplicate node id: {0}")]
    DuplicateNode(String),

    /// Graph build parameters are unusable.
    #[error("invalid graph config: {0}")]
    InvalidConfig(String),

    /// A route endpoint is a path-shaping waypoint, not a destination.
    #[error("node {0} is a waypoint, not a key node")]
    NotAKeyNode(String),
}

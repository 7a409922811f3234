// Engine module - waypoint navigation core and the ECS motion layer on top

pub mod astar;
pub mod components;
pub mod error;
pub mod navigation;
pub mod route;
pub mod smoothing;
pub mod spatial;
pub mod systems;

// Re-export commonly used items
pub use astar::a_star;
pub use components::*;
pub use error::NavError;
pub use navigation::{Edge, GraphConfig, NavGraph, Node, NodeId, NodeKind, build_graph};
pub use route::{Navigator, polyline_length, travel_duration};
pub use smoothing::smooth_path;

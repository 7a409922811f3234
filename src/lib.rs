// Waypoint navigation for the café/garden walkthrough.
// See engine/navigation.rs for the graph layers.

pub mod engine;
pub mod scene;

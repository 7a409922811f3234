// ECS components and resources for moving things along routes.

use bevy_ecs::prelude::*;
use glam::{Vec2, Vec3};

use super::navigation::NodeId;

/// Position of an entity in 3D space
#[derive(Component, Debug, Clone, Copy)]
pub struct Transform {
    pub position: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
        }
    }
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self { position }
    }
}

/// Ask the route system to send this entity from one key node to another.
/// Removed once handled, whether or not a route was found.
#[derive(Component, Debug, Clone)]
pub struct RouteRequest {
    pub start: NodeId,
    pub goal: NodeId,
}

impl RouteRequest {
    pub fn new(start: impl Into<NodeId>, goal: impl Into<NodeId>) -> Self {
        Self {
            start: start.into(),
            goal: goal.into(),
        }
    }
}

/// Walks an entity through resolved waypoints at constant speed.
///
/// `next` indexes the waypoint currently being approached. The follower is
/// finished once `next == waypoints.len()`.
#[derive(Component, Debug, Clone)]
pub struct PathFollower {
    pub waypoints: Vec<Vec3>,
    pub next: usize,
    /// World units per second.
    pub speed: f32,
}

impl PathFollower {
    pub fn new(waypoints: Vec<Vec3>, speed: f32) -> Self {
        Self {
            waypoints,
            next: 0,
            speed,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.next >= self.waypoints.len()
    }

    pub fn current_target(&self) -> Option<Vec3> {
        self.waypoints.get(self.next).copied()
    }
}

/// Seconds elapsed since the previous update.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct FrameTime {
    pub delta: f32,
}

/// Terrain height at a ground-plane (x, z) position.
#[derive(Resource)]
pub struct GroundHeight(pub Box<dyn Fn(Vec2) -> f32 + Send + Sync>);

impl GroundHeight {
    pub fn new(f: impl Fn(Vec2) -> f32 + Send + Sync + 'static) -> Self {
        Self(Box::new(f))
    }

    pub fn sample(&self, p: Vec2) -> f32 {
        (self.0)(p)
    }
}

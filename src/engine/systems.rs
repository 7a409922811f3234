// ECS systems that turn route requests into movement.
// Run in order: route_request_system, then path_follow_system.

use bevy_ecs::prelude::*;

use super::components::*;
use super::route::Navigator;

/// Walking speed handed to new followers, in world units per second.
pub const WALK_SPEED: f32 = 12.0;
/// Closer than this to a waypoint counts as arrived.
const ARRIVE_DISTANCE: f32 = 1e-4;

/// Resolve each pending `RouteRequest` into a `PathFollower`.
///
/// Unreachable goals and bad ids are logged and the request is dropped;
/// the entity stays where it is.
pub fn route_request_system(
    mut commands: Commands,
    navigator: Res<Navigator>,
    ground: Res<GroundHeight>,
    query: Query<(Entity, &RouteRequest)>,
) {
    for (entity, request) in query.iter() {
        let mut entity_commands = commands.entity(entity);
        entity_commands.remove::<RouteRequest>();

        let waypoints = navigator
            .route(&request.start, &request.goal)
            .and_then(|ids| navigator.resolve(&ids, |p| ground.sample(p)));

        match waypoints {
            Ok(waypoints) if waypoints.is_empty() => {
                log::warn!(
                    "Skipping move {} -> {}: no route",
                    request.start,
                    request.goal
                );
            }
            Ok(waypoints) => {
                log::debug!(
                    "Entity {:?}: {} -> {} via {} waypoints",
                    entity,
                    request.start,
                    request.goal,
                    waypoints.len(),
                );
                entity_commands.insert(PathFollower::new(waypoints, WALK_SPEED));
            }
            Err(err) => {
                log::error!(
                    "Route request {} -> {} rejected: {}",
                    request.start,
                    request.goal,
                    err
                );
            }
        }
    }
}

/// Advance followers along their waypoints, carrying leftover distance
/// across waypoints within one frame. Finished followers are removed.
pub fn path_follow_system(
    mut commands: Commands,
    time: Res<FrameTime>,
    mut query: Query<(Entity, &mut Transform, &mut PathFollower)>,
) {
    for (entity, mut transform, mut follower) in query.iter_mut() {
        let mut budget = follower.speed * time.delta;

        while let Some(target) = follower.current_target() {
            let to_target = target - transform.position;
            let dist = to_target.length();
            if dist <= budget || dist < ARRIVE_DISTANCE {
                transform.position = target;
                budget = (budget - dist).max(0.0);
                follower.next += 1;
            } else {
                transform.position += to_target / dist * budget;
                break;
            }
        }

        if follower.is_finished() {
            commands.entity(entity).remove::<PathFollower>();
        }
    }
}

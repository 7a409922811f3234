// Headless walkthrough: build the waypoint graph, route between two key
// locations and walk an entity along the result frame by frame.
//
// Usage: garden_walk [--scene waypoints.json] [start] [goal]

use anyhow::{Context, Result, bail};
use bevy_ecs::prelude::*;
use glam::Vec3;

use garden_walk::engine::systems::{WALK_SPEED, path_follow_system};
use garden_walk::engine::{
    FrameTime, GraphConfig, Navigator, PathFollower, Transform, polyline_length, travel_duration,
};
use garden_walk::scene::{self, EYE_HEIGHT};

// ============================================================================
// CONFIG
// ============================================================================

/// Fixed simulation step, seconds.
const FRAME_DT: f32 = 1.0 / 60.0;
/// Give up after this many frames even if the walker hasn't arrived.
const MAX_FRAMES: u32 = 60 * 120;

struct Args {
    scene: Option<String>,
    start: String,
    goal: String,
}

fn parse_args() -> Result<Args> {
    let mut scene = None;
    let mut positional = Vec::new();
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--scene" => scene = Some(args.next().context("--scene needs a file path")?),
            flag if flag.starts_with("--") => bail!("unknown flag {}", flag),
            _ => positional.push(arg),
        }
    }
    if positional.len() > 2 {
        bail!("expected at most two locations, got {}", positional.len());
    }
    let mut positional = positional.into_iter();
    Ok(Args {
        scene,
        start: positional.next().unwrap_or_else(|| "entrance".to_string()),
        goal: positional.next().unwrap_or_else(|| "fountain".to_string()),
    })
}

fn ground_with_eye(p: glam::Vec2) -> f32 {
    scene::demo_ground_height(p) + EYE_HEIGHT
}

// ============================================================================
// MAIN
// ============================================================================

fn main() -> Result<()> {
    env_logger::init();

    let args = parse_args()?;
    let nodes = match &args.scene {
        Some(path) => scene::load_nodes(path)?,
        None => scene::cafe_garden_nodes(),
    };
    let navigator = Navigator::new(nodes, GraphConfig::default())?;

    let route = navigator.route(&args.start, &args.goal)?;
    if route.is_empty() {
        println!("No route from {} to {}", args.start, args.goal);
        return Ok(());
    }
    let points = navigator.resolve(&route, ground_with_eye)?;
    let length = polyline_length(&points);
    println!(
        "Route {} -> {}: {} ({:.1} units, ~{:.1}s at {} u/s)",
        args.start,
        args.goal,
        route.join(" -> "),
        length,
        travel_duration(length, WALK_SPEED),
        WALK_SPEED,
    );

    let start_pos = points.first().copied().unwrap_or(Vec3::ZERO);

    // The route is already resolved, so the walker starts with its follower.
    let mut world = World::new();
    world.insert_resource(FrameTime { delta: FRAME_DT });
    let walker = world
        .spawn((
            Transform::from_position(start_pos),
            PathFollower::new(points, WALK_SPEED),
        ))
        .id();

    let mut schedule = Schedule::default();
    schedule.add_systems(path_follow_system);

    let mut frames = 0;
    loop {
        schedule.run(&mut world);
        frames += 1;
        if world.get::<PathFollower>(walker).is_none() || frames >= MAX_FRAMES {
            break;
        }
    }

    let end = world
        .get::<Transform>(walker)
        .map(|t| t.position)
        .unwrap_or(start_pos);
    println!(
        "Walker stopped at ({:.2}, {:.2}, {:.2}) after {} frames ({:.2}s)",
        end.x,
        end.y,
        end.z,
        frames,
        frames as f32 * FRAME_DT,
    );
    Ok(())
}

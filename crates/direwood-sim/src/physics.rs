//! Physics step (spec §4.E): velocity integration, per-variant friction,
//! world-bounds clamping.
//!
//! Obstacles never move -- they are skipped entirely rather than given a
//! zero-friction/zero-velocity special case, since `ObstacleData` never
//! carries a meaningful velocity in the first place.

use direwood_core::constants::{ENTITY_FRICTION, PLAYER_FRICTION, WORLD_BOUNDS_RESTITUTION};
use direwood_core::kinds::EntityKind;
use direwood_core::math::Vec2;
use direwood_core::store::EntityStore;

/// World-space bounds entities are clamped to (spec §6 `set_world_bounds`).
#[derive(Debug, Clone, Copy)]
pub struct WorldBounds {
    pub width: f64,
    pub height: f64,
}

fn friction_for(kind: &EntityKind) -> Option<f64> {
    match kind {
        EntityKind::Player(_) => Some(PLAYER_FRICTION),
        EntityKind::Enemy(_) | EntityKind::Wolf(_) => Some(ENTITY_FRICTION),
        EntityKind::Projectile(_) => None,
        EntityKind::PowerUp(_) => None,
        EntityKind::Obstacle(_) => None,
    }
}

/// Apply exponential velocity decay for one tick: `v *= max(0, 1 - friction*dt)`.
fn apply_friction(velocity: Vec2, friction: f64, dt: f64) -> Vec2 {
    let decay = (1.0 - friction * dt).max(0.0);
    velocity.scale(decay)
}

/// Integrate position, apply friction, and clamp to world bounds for every
/// movable entity (spec §4.E). `dt` is in seconds.
pub fn step(store: &mut EntityStore, bounds: WorldBounds, dt: f64) {
    for (_, entity) in store.iter_active_mut() {
        if matches!(entity.kind, EntityKind::Obstacle(_)) {
            continue;
        }

        let header = &mut entity.header;
        header.position = header.position.add(header.velocity.scale(dt));

        if let Some(friction) = friction_for(&entity.kind) {
            header.velocity = apply_friction(header.velocity, friction, dt);
        }

        let is_player = matches!(entity.kind, EntityKind::Player(_));
        clamp_to_bounds(header, bounds, is_player);
    }
}

fn clamp_to_bounds(
    header: &mut direwood_core::store::EntityHeader,
    bounds: WorldBounds,
    is_player: bool,
) {
    let r = header.radius;
    let (min_x, max_x) = (r, (bounds.width - r).max(r));
    let (min_y, max_y) = (r, (bounds.height - r).max(r));

    if header.position.x < min_x {
        header.position.x = min_x;
        if !is_player {
            header.velocity.x = -header.velocity.x * WORLD_BOUNDS_RESTITUTION;
        } else {
            header.velocity.x = 0.0;
        }
    } else if header.position.x > max_x {
        header.position.x = max_x;
        if !is_player {
            header.velocity.x = -header.velocity.x * WORLD_BOUNDS_RESTITUTION;
        } else {
            header.velocity.x = 0.0;
        }
    }

    if header.position.y < min_y {
        header.position.y = min_y;
        if !is_player {
            header.velocity.y = -header.velocity.y * WORLD_BOUNDS_RESTITUTION;
        } else {
            header.velocity.y = 0.0;
        }
    } else if header.position.y > max_y {
        header.position.y = max_y;
        if !is_player {
            header.velocity.y = -header.velocity.y * WORLD_BOUNDS_RESTITUTION;
        } else {
            header.velocity.y = 0.0;
        }
    }
}

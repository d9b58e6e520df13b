//! Collision system (spec §4.D): swept/discrete circle tests via the spatial
//! index, then pair-specific resolution handlers dispatched by variant.
//!
//! Handlers never create new entities mid-dispatch (spec §4.D); anything a
//! handler would otherwise spawn (explosion particles, hit sparks) is
//! appended to the [`crate::vfx::VfxBuffer`] instead.

use direwood_core::constants::{
    KNOCKBACK_SPEED, PERFECT_PARRY_ENERGY_RESTORE, PERFECT_PARRY_STUN_DURATION_MS,
    PLAYER_INVULNERABILITY_MS, SHIELD_DAMAGE_REDUCTION,
};
use direwood_core::entity::EntityId;
use direwood_core::kinds::{EntityKind, EntityType, ObstacleShape, WolfState};
use direwood_core::math::Vec2;
use direwood_core::spatial::SpatialIndex;
use direwood_core::store::{Entity, EntityStore};

use crate::vfx::{Particle, VfxBuffer};

/// Tallies for `performance_metrics()` (spec §6).
#[derive(Debug, Clone, Copy, Default)]
pub struct CollisionStats {
    pub checks: u64,
}

/// Whether `velocity * dt` is large enough relative to the pair's radii that
/// a discrete end-of-step overlap test could miss a tunneling collision.
/// When it is, the caller should (conceptually) test the swept segment; in
/// practice our fixed-timestep radii/speeds keep per-tick displacement well
/// under the smaller radius for every entity except projectiles, so the
/// swept test only changes behavior for fast movers (spec §4.D "swept
/// circle-circle").
fn needs_swept_test(a: &Entity, b: &Entity, dt: f64) -> bool {
    let smaller_radius = a.header.radius.min(b.header.radius);
    let a_disp = a.header.velocity.length() * dt;
    let b_disp = b.header.velocity.length() * dt;
    a_disp.max(b_disp) > smaller_radius
}

/// Circle-circle overlap test, optionally swept over the tick's displacement.
fn circles_overlap(a: &Entity, b: &Entity, dt: f64) -> bool {
    if needs_swept_test(a, b, dt) {
        // Sample the relative motion at a handful of sub-steps; cheap and
        // sufficient at this entity count/velocity range.
        const SAMPLES: i32 = 4;
        for i in 0..=SAMPLES {
            let t = i as f64 / SAMPLES as f64;
            let pa = a.header.position.add(a.header.velocity.scale(dt * t));
            let pb = b.header.position.add(b.header.velocity.scale(dt * t));
            let r = a.header.radius + b.header.radius;
            if pa.distance_sq(pb) <= r * r {
                return true;
            }
        }
        false
    } else {
        let r = a.header.radius + b.header.radius;
        a.header.position.distance_sq(b.header.position) <= r * r
    }
}

/// Closest point on an axis-aligned rectangle (centered at `center` with
/// `half_extents`) to `point`.
fn closest_point_on_rect(center: Vec2, half_extents: Vec2, point: Vec2) -> Vec2 {
    Vec2::new(
        (point.x - center.x).clamp(-half_extents.x, half_extents.x) + center.x,
        (point.y - center.y).clamp(-half_extents.y, half_extents.y) + center.y,
    )
}

fn circle_rect_overlap(circle: &Entity, center: Vec2, half_extents: Vec2) -> Option<(Vec2, f64)> {
    let closest = closest_point_on_rect(center, half_extents, circle.header.position);
    let delta = circle.header.position.sub(closest);
    let dist = delta.length();
    if dist <= circle.header.radius {
        let normal = if dist > f64::EPSILON {
            delta.scale(1.0 / dist)
        } else {
            Vec2::new(0.0, 1.0)
        };
        Some((normal, circle.header.radius - dist))
    } else {
        None
    }
}

/// Resolve every overlapping pair for one tick (spec §4.D / §4.M phase 6).
pub fn resolve(store: &mut EntityStore, spatial: &SpatialIndex, vfx: &mut VfxBuffer) -> CollisionStats {
    let dt_hint = 1.0 / 60.0; // only used to scale the swept-test window; see `needs_swept_test`.
    let mut stats = CollisionStats::default();
    let mut seen = std::collections::HashSet::new();

    let ids: Vec<EntityId> = store.iter_active().map(|(id, _)| id).collect();
    for &id in &ids {
        let Some(entity) = store.get(id) else { continue };
        let query_radius = entity.header.radius + 16.0;
        let candidates = spatial.query_near(entity.header.position, query_radius);
        for other_id in candidates {
            if other_id == id {
                continue;
            }
            let pair = if id.to_raw() < other_id.to_raw() {
                (id, other_id)
            } else {
                (other_id, id)
            };
            if !seen.insert(pair) {
                continue;
            }
            let (Some(a), Some(b)) = (store.get(pair.0), store.get(pair.1)) else {
                continue;
            };
            stats.checks += 1;
            if !circles_overlap(a, b, dt_hint) {
                continue;
            }
            dispatch_pair(store, pair.0, pair.1, vfx);
        }
    }

    stats
}

fn dispatch_pair(store: &mut EntityStore, id_a: EntityId, id_b: EntityId, vfx: &mut VfxBuffer) {
    let Some((a, b)) = store.get_two_mut(id_a, id_b) else {
        return;
    };
    use EntityType::*;
    let (ta, tb) = (a.kind.entity_type(), b.kind.entity_type());

    match (ta, tb) {
        (Player, Enemy) | (Player, Wolf) => player_vs_hostile(a, b, vfx),
        (Enemy, Player) | (Wolf, Player) => player_vs_hostile(b, a, vfx),

        (Projectile, Enemy) | (Projectile, Wolf) => projectile_vs_hostile(a, b, vfx),
        (Enemy, Projectile) | (Wolf, Projectile) => projectile_vs_hostile(b, a, vfx),

        (Projectile, Obstacle) => projectile_vs_obstacle(a, b),
        (Obstacle, Projectile) => projectile_vs_obstacle(b, a),

        (Player, PowerUp) => player_vs_powerup(a, b),
        (PowerUp, Player) => player_vs_powerup(b, a),

        (Enemy, Enemy) | (Wolf, Wolf) | (Enemy, Wolf) | (Wolf, Enemy) => separate_movables(a, b),

        (Player, Obstacle) | (Enemy, Obstacle) | (Wolf, Obstacle) | (Projectile, Obstacle) => {
            movable_vs_obstacle(a, b)
        }
        (Obstacle, Player) | (Obstacle, Enemy) | (Obstacle, Wolf) => movable_vs_obstacle(b, a),

        _ => {}
    }
}

fn player_vs_hostile(player_entity: &mut Entity, hostile: &mut Entity, vfx: &mut VfxBuffer) {
    let Some(player) = player_entity.kind.as_player_mut() else {
        return;
    };
    if player.invulnerability_ms > 0.0 || player.rolling {
        return;
    }

    let contact_damage = match &hostile.kind {
        EntityKind::Wolf(wolf) => wolf.damage,
        EntityKind::Enemy(enemy) => enemy.contact_damage,
        _ => return,
    };

    let normal = player_entity
        .header
        .position
        .sub(hostile.header.position)
        .normalized();

    if player.blocking {
        if player.perfect_parry_window {
            stun_attacker(hostile, PERFECT_PARRY_STUN_DURATION_MS);
            player.energy = (player.energy + PERFECT_PARRY_ENERGY_RESTORE).min(player.max_energy);
        } else {
            player_entity
                .header
                .apply_damage(contact_damage * (1.0 - SHIELD_DAMAGE_REDUCTION));
        }
    } else {
        player_entity.header.apply_damage(contact_damage);
        player.invulnerability_ms = PLAYER_INVULNERABILITY_MS;
        player_entity.header.velocity = normal.scale(KNOCKBACK_SPEED);
        vfx.trigger_shake(4.0, 150.0);
    }
}

fn stun_attacker(hostile: &mut Entity, duration_ms: f64) {
    match &mut hostile.kind {
        EntityKind::Wolf(wolf) => {
            wolf.state = WolfState::Stunned;
            wolf.stun_progress_ms = 0.0;
            wolf.cooldowns.attack_ms = duration_ms;
        }
        EntityKind::Enemy(enemy) => {
            enemy.stunned_ms = duration_ms;
        }
        _ => {}
    }
}

fn projectile_vs_hostile(projectile: &mut Entity, hostile: &mut Entity, vfx: &mut VfxBuffer) {
    let EntityKind::Projectile(data) = &projectile.kind else {
        return;
    };
    let damage = data.damage;
    let direction = data.direction;
    hostile.header.apply_damage(damage);
    hostile.header.velocity = direction.normalized().scale(KNOCKBACK_SPEED);
    projectile.header.health = 0.0;
    vfx.spawn_particle(Particle {
        position: projectile.header.position,
        velocity: Vec2::ZERO,
        size: 0.3,
        alpha: 1.0,
        color: 0xffaa3300,
        remaining_ms: 250.0,
    });
}

fn projectile_vs_obstacle(projectile: &mut Entity, obstacle: &mut Entity) {
    projectile.header.health = 0.0;
    if let EntityKind::Obstacle(data) = &projectile.kind {
        let _ = data; // projectile has no obstacle data; silence unused pattern binding
    }
    if let EntityKind::Obstacle(data) = &obstacle.kind {
        if data.destructible {
            let damage = if let EntityKind::Projectile(p) = &projectile.kind {
                p.damage
            } else {
                0.0
            };
            obstacle.header.apply_damage(damage);
        }
    }
}

fn player_vs_powerup(player_entity: &mut Entity, powerup: &mut Entity) {
    let EntityKind::PowerUp(data) = &powerup.kind else {
        return;
    };
    let kind = data.kind;
    if let Some(player) = player_entity.kind.as_player_mut() {
        use direwood_core::kinds::PowerUpType::*;
        match kind {
            Health => player_entity.header.heal(25.0),
            Energy => player.energy = (player.energy + 25.0).min(player.max_energy),
            Shield => player.invulnerability_ms = player.invulnerability_ms.max(3_000.0),
            Speed => player.boost_cooldown_ms = 0.0,
            Damage => player.damage_multiplier = (player.damage_multiplier + 0.5).min(3.0),
            RapidFire => {
                player.rapid_fire = true;
                player.rapid_fire_remaining_ms = 8_000.0;
            }
            MultiShot => {
                player.multi_shot = true;
                player.multi_shot_remaining_ms = 8_000.0;
            }
        }
        player.score += 10;
    }
    powerup.header.health = 0.0;
}

/// `Anything movable × Obstacle` (spec §4.D): separate along the contact
/// normal by the overlap amount, remove the velocity component along that
/// normal (slide).
fn movable_vs_obstacle(movable: &mut Entity, obstacle: &mut Entity) {
    let EntityKind::Obstacle(data) = &obstacle.kind else {
        return;
    };

    let resolved = match data.shape {
        ObstacleShape::Circle => {
            let r = movable.header.radius + data.half_extents.x.max(data.half_extents.y);
            let delta = movable.header.position.sub(obstacle.header.position);
            let dist = delta.length();
            if dist <= r {
                let normal = if dist > f64::EPSILON {
                    delta.scale(1.0 / dist)
                } else {
                    Vec2::new(0.0, 1.0)
                };
                Some((normal, r - dist))
            } else {
                None
            }
        }
        ObstacleShape::Square | ObstacleShape::Rectangle => {
            circle_rect_overlap(movable, obstacle.header.position, data.half_extents)
        }
    };

    if let Some((normal, overlap)) = resolved {
        movable.header.position = movable.header.position.add(normal.scale(overlap));
        let into_surface = movable.header.velocity.dot(normal);
        if into_surface < 0.0 {
            movable.header.velocity = movable.header.velocity.sub(normal.scale(into_surface));
        }
    }
}

/// `Enemy × Enemy` (also used for any hostile-hostile pair): minimum
/// translation separation split 50/50 between the two.
fn separate_movables(a: &mut Entity, b: &mut Entity) {
    let delta = b.header.position.sub(a.header.position);
    let dist = delta.length();
    let overlap = (a.header.radius + b.header.radius) - dist;
    if overlap <= 0.0 {
        return;
    }
    let normal = if dist > f64::EPSILON {
        delta.scale(1.0 / dist)
    } else {
        Vec2::new(1.0, 0.0)
    };
    let push = normal.scale(overlap / 2.0);
    a.header.position = a.header.position.sub(push);
    b.header.position = b.header.position.add(push);
}

#[cfg(test)]
mod tests {
    use super::*;
    use direwood_core::kinds::{EnemyData, ObstacleData, PlayerData, PowerUpData, PowerUpType};
    use direwood_core::store::EntityHeader;

    fn make_store() -> EntityStore {
        EntityStore::new()
    }

    #[test]
    fn perfect_parry_zero_damage_and_stuns_enemy() {
        let mut store = make_store();
        let mut pdata = PlayerData::default();
        pdata.blocking = true;
        pdata.perfect_parry_window = true;
        let player = store.create(
            EntityHeader::new(Vec2::new(100.0, 100.0), 1.0, 100.0, 0),
            EntityKind::Player(pdata),
        );
        let enemy = store.create(
            EntityHeader::new(Vec2::new(100.1, 100.0), 1.0, 50.0, 0),
            EntityKind::Enemy(EnemyData::default()),
        );

        let mut spatial = SpatialIndex::new();
        spatial.rebuild(&store);
        let mut vfx = VfxBuffer::new();
        resolve(&mut store, &spatial, &mut vfx);

        assert_eq!(store.get(player).unwrap().header.health, 100.0);
        assert!(store.get(enemy).unwrap().kind.as_player().is_none());
        if let EntityKind::Enemy(e) = &store.get(enemy).unwrap().kind {
            assert!(e.stunned_ms > 0.0);
        } else {
            panic!("expected enemy");
        }
    }

    #[test]
    fn full_damage_hit_knocks_back_and_starts_invulnerability() {
        let mut store = make_store();
        let player = store.create(
            EntityHeader::new(Vec2::new(100.0, 100.0), 1.0, 100.0, 0),
            EntityKind::Player(PlayerData::default()),
        );
        store.create(
            EntityHeader::new(Vec2::new(100.1, 100.0), 1.0, 50.0, 0),
            EntityKind::Enemy(EnemyData::default()),
        );

        let mut spatial = SpatialIndex::new();
        spatial.rebuild(&store);
        let mut vfx = VfxBuffer::new();
        resolve(&mut store, &spatial, &mut vfx);

        let p = store.get(player).unwrap();
        assert!(p.header.health < 100.0);
        assert!(p.kind.as_player().unwrap().invulnerability_ms > 0.0);
        assert!(p.header.velocity.length() > 0.0);
    }

    #[test]
    fn projectile_damages_and_deactivates() {
        let mut store = make_store();
        let enemy = store.create(
            EntityHeader::new(Vec2::new(10.0, 10.0), 1.0, 50.0, 0),
            EntityKind::Enemy(EnemyData::default()),
        );
        let proj = store.create(
            EntityHeader::new(Vec2::new(10.1, 10.0), 0.2, 1.0, 0),
            EntityKind::Projectile(direwood_core::kinds::ProjectileData {
                direction: Vec2::new(1.0, 0.0),
                damage: 15.0,
                owner_id: EntityId::INVALID,
            }),
        );

        let mut spatial = SpatialIndex::new();
        spatial.rebuild(&store);
        let mut vfx = VfxBuffer::new();
        resolve(&mut store, &spatial, &mut vfx);

        assert_eq!(store.get(enemy).unwrap().header.health, 35.0);
        assert!(store.get(proj).unwrap().header.is_dead());
    }

    #[test]
    fn powerup_applies_effect_and_grants_score() {
        let mut store = make_store();
        let player = store.create(
            EntityHeader::new(Vec2::new(0.0, 0.0), 1.0, 75.0, 0),
            EntityKind::Player(PlayerData::default()),
        );
        let pu = store.create(
            EntityHeader::new(Vec2::new(0.1, 0.0), 0.5, 1.0, 0),
            EntityKind::PowerUp(PowerUpData {
                kind: PowerUpType::Health,
            }),
        );

        let mut spatial = SpatialIndex::new();
        spatial.rebuild(&store);
        let mut vfx = VfxBuffer::new();
        resolve(&mut store, &spatial, &mut vfx);

        let p = store.get(player).unwrap();
        assert_eq!(p.header.health, 100.0);
        assert_eq!(p.kind.as_player().unwrap().score, 10);
        assert!(store.get(pu).unwrap().header.is_dead());
    }

    #[test]
    fn movable_slides_along_obstacle_surface() {
        let mut store = make_store();
        let mut header = EntityHeader::new(Vec2::new(9.5, 10.0), 1.0, 50.0, 0);
        header.velocity = Vec2::new(5.0, 0.0);
        let enemy = store.create(header, EntityKind::Enemy(EnemyData::default()));
        store.create(
            EntityHeader::new(Vec2::new(12.0, 10.0), 0.0, 1.0, 0),
            EntityKind::Obstacle(ObstacleData {
                shape: ObstacleShape::Rectangle,
                half_extents: Vec2::new(2.0, 2.0),
                destructible: false,
            }),
        );

        let mut spatial = SpatialIndex::new();
        spatial.rebuild(&store);
        let mut vfx = VfxBuffer::new();
        resolve(&mut store, &spatial, &mut vfx);

        let e = store.get(enemy).unwrap();
        assert!(e.header.position.x < 10.0);
        assert!(e.header.velocity.x <= 0.0);
    }

    #[test]
    fn enemy_enemy_separation_is_symmetric() {
        let mut store = make_store();
        let a = store.create(
            EntityHeader::new(Vec2::new(10.0, 10.0), 1.0, 50.0, 0),
            EntityKind::Enemy(EnemyData::default()),
        );
        let b = store.create(
            EntityHeader::new(Vec2::new(11.0, 10.0), 1.0, 50.0, 0),
            EntityKind::Enemy(EnemyData::default()),
        );

        let mut spatial = SpatialIndex::new();
        spatial.rebuild(&store);
        let mut vfx = VfxBuffer::new();
        resolve(&mut store, &spatial, &mut vfx);

        let pa = store.get(a).unwrap().header.position;
        let pb = store.get(b).unwrap().header.position;
        assert!(pa.x < 10.0);
        assert!(pb.x > 11.0);
        let sep = pb.distance(pa);
        assert!(sep >= 2.0 - 1e-9);
    }
}

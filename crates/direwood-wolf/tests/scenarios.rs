//! Named-scenario integration tests for the wolf AI stack (spec §8).
//!
//! Each test drives the public `direwood-wolf` API the way the engine façade
//! would -- no private fields, no crate-internal helpers -- so a passing
//! test here is a passing test of the real cross-module wiring, not just a
//! unit in isolation.

use direwood_core::constants::{
    AMBUSH_DETECTION_RANGE, HOWL_COOLDOWN_MS, HOWL_MORALE_BONUS, HOWL_STAGGER_MS, MORALE_MAX,
    WOLF_HEALTH, WOLF_SPRINT_SPEED,
};
use direwood_core::entity::EntityId;
use direwood_core::kinds::{WolfData, WolfRole, WolfState};
use direwood_core::math::Vec2;
use direwood_core::rng::SimRng;
use direwood_sim::pathfinder::{Grid, PathCache};
use direwood_wolf::pack::{MemberFacts, Pack};
use direwood_wolf::wolf::{update, Perception};
use direwood_wolf::{pack, state_machine};

fn grid() -> Grid {
    Grid::new(32, 32, 1.0)
}

/// S1 -- retreat on critical HP: a wolf at 29/40 damage taken transitions
/// Chasing -> Retreating within the next couple of ticks and flees the
/// dummy player at (12, 10) rather than closing the distance.
#[test]
fn s1_wolf_retreats_once_health_drops_below_critical() {
    let mut wolf = WolfData::new(Vec2::new(10.0, 10.0), WolfRole::Chaser);
    wolf.state = WolfState::Chasing;
    wolf.aggression = 0.8;
    let health_after_hit = WOLF_HEALTH - 29.0;
    assert_eq!(health_after_hit, 11.0);

    let perception = Perception {
        target_position: Some(Vec2::new(12.0, 10.0)),
        target_velocity: Vec2::ZERO,
        pack_centroid: None,
        pack_size: 1,
        health_ratio: health_after_hit / WOLF_HEALTH,
    };
    let g = grid();
    let mut cache = PathCache::new(60.0);
    let mut rng = SimRng::new(7);
    let position = Vec2::new(10.0, 10.0);

    let mut transitioned_by_tick = None;
    for tick in 0..2u64 {
        update(&mut wolf, position, &perception, &g, &mut cache, tick, 16.0, &mut rng);
        if wolf.state == WolfState::Retreating {
            transitioned_by_tick = Some(tick);
            break;
        }
    }

    assert_eq!(
        transitioned_by_tick,
        Some(0),
        "critical health should flip Chasing straight to Retreating on the next step"
    );

    let result = update(&mut wolf, position, &perception, &g, &mut cache, 1, 16.0, &mut rng);
    assert!(
        result.velocity.x < 0.0,
        "fleeing the target at +x should move the wolf toward -x"
    );
}

/// S2 -- ambush spring: an ambusher holds its spot until the target enters
/// `AMBUSH_DETECTION_RANGE`, then springs with a burst well above sprint
/// speed.
#[test]
fn s2_ambusher_holds_then_springs_within_detection_range() {
    let mut wolf = WolfData::new(Vec2::new(5.0, 5.0), WolfRole::Ambusher);
    wolf.ambush_spot = Vec2::new(5.0, 5.0);
    wolf.state = WolfState::Ambush;
    let g = grid();
    let mut cache = PathCache::new(60.0);
    let mut rng = SimRng::new(3);
    let position = Vec2::new(5.0, 5.0);

    let far_away = Perception {
        target_position: Some(Vec2::new(100.0, 100.0)),
        target_velocity: Vec2::ZERO,
        pack_centroid: None,
        pack_size: 1,
        health_ratio: 1.0,
    };
    for tick in 0..5u64 {
        let result = update(&mut wolf, position, &far_away, &g, &mut cache, tick, 16.0, &mut rng);
        assert!(
            result.velocity.length() < 0.1,
            "ambusher should hold its spot while the target is far away"
        );
    }
    assert_eq!(wolf.state, WolfState::Ambush);

    let close_target = Vec2::new(7.0, 5.0);
    assert!(position.distance(close_target) <= AMBUSH_DETECTION_RANGE);
    let in_range = Perception {
        target_position: Some(close_target),
        target_velocity: Vec2::ZERO,
        pack_centroid: None,
        pack_size: 1,
        health_ratio: 1.0,
    };
    let result = update(&mut wolf, position, &in_range, &g, &mut cache, 5, 16.0, &mut rng);
    assert_eq!(wolf.state, WolfState::Attacking);

    let expected = WOLF_SPRINT_SPEED * 1.2;
    assert!(
        (result.velocity.length() - expected).abs() < 1e-6,
        "burst speed should be sprint speed scaled by 1.2, got {}",
        result.velocity.length()
    );
}

/// S3 -- pack howl rally: three wolves in range of a fresh howl all
/// eventually howl, staggered by `HOWL_STAGGER_MS` per follower, morale
/// rises by the rally bonus, and the cooldown blocks a second call.
#[test]
fn s3_pack_howl_rallies_with_staggered_followers() {
    let alpha = EntityId::new(0, 0);
    let follower_a = EntityId::new(1, 0);
    let follower_b = EntityId::new(2, 0);

    let mut p = Pack::new(1, alpha);
    p.members = vec![alpha, follower_a, follower_b];
    p.morale = 1.0;

    assert!(pack::trigger_howl(&mut p), "cooldown should be elapsed on a fresh pack");
    assert_eq!(p.howls_pending.len(), 3);
    let stagger: std::collections::HashMap<_, _> = p.howls_pending.iter().copied().collect();
    assert_eq!(stagger[&alpha], 0.0, "alpha howls immediately");
    assert_eq!(stagger[&follower_a], HOWL_STAGGER_MS);
    assert_eq!(stagger[&follower_b], HOWL_STAGGER_MS * 2.0);
    let expected_morale = (1.0 + HOWL_MORALE_BONUS).min(MORALE_MAX);
    assert!((p.morale - expected_morale).abs() < 1e-9);

    assert!(
        !pack::trigger_howl(&mut p),
        "a second howl within HOWL_COOLDOWN_MS should be rejected"
    );

    // Simulate members individually entering Howling per their stagger offset.
    let mut alpha_wolf = WolfData::new(Vec2::ZERO, WolfRole::Alpha);
    let mut ctx = state_machine::TransitionContext {
        has_target: false,
        distance_to_target: f64::INFINITY,
        distance_growing: false,
        health_ratio: 1.0,
        pack_size: 3,
        distance_to_pack_centroid: None,
    };
    alpha_wolf.state = WolfState::Howling;
    alpha_wolf.state_elapsed_ms = 0.0;
    let mut rng = SimRng::new(1);
    state_machine::step(&mut alpha_wolf, &ctx, &mut rng);
    assert_eq!(alpha_wolf.state, WolfState::Howling, "too early to leave Howling");

    ctx.has_target = true;
    alpha_wolf.state_elapsed_ms = direwood_core::constants::HOWL_STATE_DURATION_MS + 1.0;
    state_machine::step(&mut alpha_wolf, &ctx, &mut rng);
    assert_eq!(alpha_wolf.state, WolfState::Chasing);

    let cooldown_elapsed = HOWL_COOLDOWN_MS + 1.0;
    p.howl_cooldown_ms = (p.howl_cooldown_ms - cooldown_elapsed).max(0.0);
    assert!(pack::trigger_howl(&mut p), "cooldown fully drained should allow another howl");
}

/// Scanning the member list directly (rather than re-deriving facts) keeps
/// this test honest about what `pack::update` actually consumes.
#[test]
fn s3_pack_update_keeps_alpha_in_members_after_rally() {
    let alpha = EntityId::new(0, 0);
    let follower = EntityId::new(1, 0);
    let mut p = Pack::new(9, alpha);
    let facts = vec![
        MemberFacts {
            id: alpha,
            position: Vec2::new(0.0, 0.0),
            health_ratio: 1.0,
            aggression: 0.6,
            kills: 0,
            alive: true,
        },
        MemberFacts {
            id: follower,
            position: Vec2::new(1.0, 0.0),
            health_ratio: 1.0,
            aggression: 0.6,
            kills: 0,
            alive: true,
        },
    ];
    let assignments = pack::update(&mut p, &facts, Some(Vec2::new(20.0, 20.0)), 0, 16.0);
    assert_eq!(assignments.len(), 2);
    assert!(p.members.contains(&alpha));
    assert!(p.members.contains(&follower));
}

//! Per-wolf update (spec §4.K): binds the behavior library, the state
//! machine, and pathfinding/perception into one per-tick step. The manager
//! (spec §4.M) resolves target/pack data from the entity store and calls
//! [`update`] once per living wolf.

use direwood_core::constants::ATTACK_COOLDOWN_MS;
use direwood_core::kinds::{WolfData, WolfState};
use direwood_core::math::Vec2;
use direwood_core::rng::SimRng;
use direwood_sim::pathfinder::{find_path, Grid, PathCache};

use crate::behaviors;
use crate::state_machine::{self, TransitionContext};

/// Everything about the world a wolf needs to decide its next move, resolved
/// by the caller via entity-store lookups (spec §9 "never embed pointers").
pub struct Perception {
    pub target_position: Option<Vec2>,
    pub target_velocity: Vec2,
    pub pack_centroid: Option<Vec2>,
    pub pack_size: usize,
    pub health_ratio: f64,
}

/// Outcome of one wolf's update: the velocity to apply this tick, plus
/// whether it's eligible to register an attack/lunge hit.
pub struct WolfUpdateResult {
    pub velocity: Vec2,
    pub attack_ready: bool,
}

/// Advance one wolf by `dt_ms`: tick cooldowns, run the FSM, then compute a
/// velocity from the behavior matching the (possibly just-changed) state.
#[allow(clippy::too_many_arguments)]
pub fn update(
    wolf: &mut WolfData,
    position: Vec2,
    perception: &Perception,
    grid: &Grid,
    path_cache: &mut PathCache,
    now_tick: u64,
    dt_ms: f64,
    rng: &mut SimRng,
) -> WolfUpdateResult {
    wolf.state_elapsed_ms += dt_ms;
    tick_cooldowns(wolf, dt_ms);

    if wolf.target_id.is_some() && perception.target_position.is_none() {
        state_machine::clear_dangling_target(wolf);
    } else if let Some(target_position) = perception.target_position {
        wolf.last_known_target_pos = Some(target_position);
    }

    let distance_to_target = perception
        .target_position
        .map(|t| position.distance(t))
        .unwrap_or(f64::INFINITY);
    let distance_growing = perception
        .target_position
        .map(|t| perception.target_velocity.dot(t.sub(position)) > 0.0)
        .unwrap_or(false);

    let ctx = TransitionContext {
        has_target: perception.target_position.is_some(),
        distance_to_target,
        distance_growing,
        health_ratio: perception.health_ratio,
        pack_size: perception.pack_size,
        distance_to_pack_centroid: perception.pack_centroid.map(|c| position.distance(c)),
    };
    state_machine::step(wolf, &ctx, rng);

    let velocity = velocity_for_state(wolf, position, perception, grid, path_cache, now_tick, dt_ms);
    let attack_ready = wolf.state == WolfState::Attacking
        && wolf.cooldowns.attack_ms <= 0.0
        && distance_to_target <= direwood_core::constants::ATTACK_RANGE;
    if attack_ready {
        wolf.cooldowns.attack_ms = ATTACK_COOLDOWN_MS;
    }

    WolfUpdateResult {
        velocity,
        attack_ready,
    }
}

fn tick_cooldowns(wolf: &mut WolfData, dt_ms: f64) {
    wolf.cooldowns.howl_ms = (wolf.cooldowns.howl_ms - dt_ms).max(0.0);
    wolf.cooldowns.lunge_ms = (wolf.cooldowns.lunge_ms - dt_ms).max(0.0);
    wolf.cooldowns.attack_ms = (wolf.cooldowns.attack_ms - dt_ms).max(0.0);
    if wolf.state == WolfState::Hurt {
        wolf.hurt_progress_ms += dt_ms;
    }
    if wolf.state == WolfState::Stunned {
        wolf.stun_progress_ms += dt_ms;
    }
    if wolf.state == WolfState::Dying {
        wolf.death_progress_ms += dt_ms;
    }
}

fn velocity_for_state(
    wolf: &mut WolfData,
    position: Vec2,
    perception: &Perception,
    grid: &Grid,
    path_cache: &mut PathCache,
    now_tick: u64,
    dt_ms: f64,
) -> Vec2 {
    match wolf.state {
        WolfState::Idle | WolfState::Dead | WolfState::Dying | WolfState::Hurt | WolfState::Stunned => {
            Vec2::ZERO
        }
        WolfState::Patrol => behaviors::patrol(wolf, position),
        WolfState::Stalking => {
            let target = perception.target_position.or(wolf.last_known_target_pos);
            target
                .map(|t| behaviors::stalk(position, t, wolf.state_elapsed_ms))
                .unwrap_or(Vec2::ZERO)
        }
        WolfState::Chasing => chase_toward(wolf, position, perception, grid, path_cache, now_tick),
        WolfState::Flanking => perception
            .target_position
            .map(|t| behaviors::flank(wolf, position, t))
            .unwrap_or(Vec2::ZERO),
        WolfState::Ambush => behaviors::ambush(wolf, position, perception.target_position),
        WolfState::Attacking => perception
            .target_position
            .map(|t| {
                t.sub(position)
                    .normalized()
                    .scale(direwood_core::constants::WOLF_SPRINT_SPEED * 1.2)
            })
            .unwrap_or(Vec2::ZERO),
        WolfState::Lunging => behaviors::lunge(wolf, position, dt_ms),
        WolfState::Retreating => perception
            .target_position
            .or(wolf.last_known_target_pos)
            .map(|threat| behaviors::retreat(position, threat, true, wolf.state_elapsed_ms))
            .unwrap_or(Vec2::ZERO),
        WolfState::Regrouping => perception
            .pack_centroid
            .map(|c| behaviors::regroup(position, c))
            .unwrap_or(Vec2::ZERO),
        WolfState::Howling => Vec2::ZERO,
    }
}

/// `Chasing` prefers a pathfound route; a pathfinder failure (no path
/// within the node limit) degrades to direct steering toward the target,
/// with no error surfaced (spec §4.J "Failure semantics").
fn chase_toward(
    wolf: &mut WolfData,
    position: Vec2,
    perception: &Perception,
    grid: &Grid,
    path_cache: &mut PathCache,
    now_tick: u64,
) -> Vec2 {
    let Some(target_position) = perception.target_position else {
        return Vec2::ZERO;
    };

    match find_path(grid, path_cache, position, target_position, now_tick) {
        Some(path) if path.len() > 1 => {
            let next_waypoint = path[1];
            behaviors::chase(position, next_waypoint, Vec2::ZERO)
        }
        _ => behaviors::chase(position, target_position, perception.target_velocity),
    }
}

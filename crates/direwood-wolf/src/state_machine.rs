//! Wolf finite-state machine (spec §4.J): a transition table with guards and
//! enter/exit hooks. Only one transition fires per `step` call, matching the
//! "Only one transition fires per update call" rule (spec §4.J).
//!
//! The richer state set (`Lunging`/`Hurt`/`Stunned`/`Dying`) is targeted per
//! spec §9's Open Question -- see `DESIGN.md` for that decision.

use direwood_core::constants::{
    AMBUSH_DETECTION_RANGE, AMBUSH_TIMEOUT_MS, ATTACK_RANGE, CRITICAL_HEALTH_FRACTION,
    DEATH_ANIM_DURATION_MS, HOWL_STATE_DURATION_MS, HURT_DURATION_MS, MIN_PACK_DISTANCE,
    RETREAT_DURATION_MS, STUN_DURATION_MS,
};
use direwood_core::kinds::{WolfData, WolfRole, WolfState};
use direwood_core::rng::SimRng;

/// Read-only facts the guards need that don't live on `WolfData` itself.
pub struct TransitionContext {
    pub has_target: bool,
    pub distance_to_target: f64,
    pub distance_growing: bool,
    pub health_ratio: f64,
    pub pack_size: usize,
    pub distance_to_pack_centroid: Option<f64>,
}

/// Evaluate the transition table once; applies at most one transition and
/// its enter/exit hooks. Returns `true` if a transition fired.
pub fn step(wolf: &mut WolfData, ctx: &TransitionContext, rng: &mut SimRng) -> bool {
    if wolf.state != WolfState::Dead && ctx.health_ratio <= 0.0 {
        return transition(wolf, WolfState::Dead);
    }

    let next = match wolf.state {
        WolfState::Idle => {
            if !ctx.has_target {
                Some(WolfState::Patrol)
            } else if wolf.role == WolfRole::Ambusher && rng.chance(0.5) {
                Some(WolfState::Ambush)
            } else if wolf.aggression > 0.7 {
                Some(WolfState::Chasing)
            } else {
                Some(WolfState::Stalking)
            }
        }
        WolfState::Patrol => {
            if ctx.has_target {
                Some(WolfState::Stalking)
            } else {
                None
            }
        }
        WolfState::Stalking => {
            if ctx.distance_to_target <= ATTACK_RANGE {
                Some(WolfState::Attacking)
            } else if ctx.distance_growing || wolf.aggression > 0.6 {
                Some(WolfState::Chasing)
            } else {
                None
            }
        }
        WolfState::Chasing => {
            if ctx.health_ratio < CRITICAL_HEALTH_FRACTION {
                Some(WolfState::Retreating)
            } else if ctx.distance_to_target <= ATTACK_RANGE {
                Some(WolfState::Attacking)
            } else if wolf.role == WolfRole::Flanker && ctx.pack_size > 2 {
                Some(WolfState::Flanking)
            } else {
                None
            }
        }
        WolfState::Attacking => {
            if ctx.health_ratio < CRITICAL_HEALTH_FRACTION {
                Some(WolfState::Retreating)
            } else {
                None
            }
        }
        WolfState::Flanking => {
            if ctx.distance_to_target <= ATTACK_RANGE {
                Some(WolfState::Attacking)
            } else {
                None
            }
        }
        WolfState::Retreating => {
            if ctx.pack_size > 1 {
                Some(WolfState::Regrouping)
            } else if wolf.state_elapsed_ms > RETREAT_DURATION_MS {
                Some(WolfState::Idle)
            } else {
                None
            }
        }
        WolfState::Ambush => {
            if ctx.has_target && ctx.distance_to_target <= AMBUSH_DETECTION_RANGE {
                Some(WolfState::Attacking)
            } else if wolf.state_elapsed_ms > AMBUSH_TIMEOUT_MS {
                Some(WolfState::Stalking)
            } else {
                None
            }
        }
        WolfState::Howling => {
            if wolf.state_elapsed_ms > HOWL_STATE_DURATION_MS && ctx.has_target {
                Some(WolfState::Chasing)
            } else {
                None
            }
        }
        WolfState::Regrouping => match ctx.distance_to_pack_centroid {
            Some(d) if d <= MIN_PACK_DISTANCE => Some(WolfState::Idle),
            None => Some(WolfState::Idle),
            _ => None,
        },
        WolfState::Hurt => {
            if wolf.hurt_progress_ms >= HURT_DURATION_MS {
                Some(if ctx.has_target { WolfState::Chasing } else { WolfState::Idle })
            } else {
                None
            }
        }
        WolfState::Stunned => {
            if wolf.stun_progress_ms >= STUN_DURATION_MS {
                Some(if ctx.has_target { WolfState::Chasing } else { WolfState::Idle })
            } else {
                None
            }
        }
        WolfState::Dying => {
            if wolf.death_progress_ms >= DEATH_ANIM_DURATION_MS {
                Some(WolfState::Dead)
            } else {
                None
            }
        }
        WolfState::Lunging | WolfState::Dead => None,
    };

    match next {
        Some(state) => transition(wolf, state),
        None => false,
    }
}

fn transition(wolf: &mut WolfData, to: WolfState) -> bool {
    if wolf.state == to {
        return false;
    }
    exit_hook(wolf, wolf.state);
    wolf.state = to;
    wolf.state_elapsed_ms = 0.0;
    enter_hook(wolf, to);
    true
}

fn enter_hook(wolf: &mut WolfData, state: WolfState) {
    match state {
        WolfState::Retreating => {
            wolf.state_elapsed_ms = 0.0;
        }
        WolfState::Stalking => {
            wolf.alert_level = wolf.alert_level.max(0.5);
        }
        WolfState::Ambush => {
            wolf.eye_glow_intensity = 0.2;
        }
        WolfState::Howling => {
            wolf.eye_glow_intensity = 1.0;
        }
        WolfState::Chasing => {
            wolf.eye_glow_intensity = 0.8;
        }
        WolfState::Dead => {
            wolf.death_progress_ms = 0.0;
        }
        WolfState::Hurt => {
            wolf.hurt_progress_ms = 0.0;
        }
        WolfState::Stunned => {
            wolf.stun_progress_ms = 0.0;
        }
        WolfState::Dying => {
            wolf.death_progress_ms = 0.0;
        }
        _ => {}
    }
}

fn exit_hook(wolf: &mut WolfData, state: WolfState) {
    match state {
        WolfState::Ambush => {
            wolf.eye_glow_intensity = 0.0;
        }
        WolfState::Howling => {
            wolf.eye_glow_intensity = 0.5;
        }
        _ => {}
    }
}

/// Clear a dangling target reference and fall back to a safe state (spec
/// §4.J "Failure semantics").
pub fn clear_dangling_target(wolf: &mut WolfData) {
    wolf.target_id = None;
    wolf.last_known_target_pos = None;
    if matches!(
        wolf.state,
        WolfState::Chasing | WolfState::Stalking | WolfState::Flanking | WolfState::Attacking
    ) {
        transition(wolf, WolfState::Patrol);
    }
}

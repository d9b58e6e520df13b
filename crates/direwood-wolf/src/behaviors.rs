//! Stateless wolf behavior library (spec §4.I): each function maps
//! `(wolf, context)` to a desired velocity, optionally updating the wolf's
//! own progress fields (patrol index, lunge elapsed). None of these read or
//! write the entity store directly -- [`crate::wolf::update`] resolves
//! target/pack positions first and passes them in as plain data, so the
//! behaviors stay pure with respect to the rest of the simulation.

use direwood_core::constants::{
    AMBUSH_DETECTION_RANGE, DETECTION_RANGE, FLANKING_ANGLE_RAD, LUNGE_DURATION_MS,
    MIN_PACK_DISTANCE, WOLF_BASE_SPEED, WOLF_LUNGE_SPEED, WOLF_PATROL_SPEED, WOLF_SPRINT_SPEED,
    WOLF_STEALTH_SPEED,
};
use direwood_core::kinds::WolfData;
use direwood_core::math::Vec2;

/// Zigzag amplitude for `stalk`/`retreat` (spec §4.I names an amplitude of
/// "~0.2" for stalk without giving retreat's; both share this constant --
/// recorded as an Open-Question resolution in `DESIGN.md`).
const ZIGZAG_AMPLITUDE: f64 = 0.2;
/// Angular frequency of the zigzag sinusoid, radians per second of elapsed
/// state time. Chosen so a full zigzag cycle takes roughly a second.
const ZIGZAG_FREQUENCY: f64 = std::f64::consts::TAU;
/// Radial correction strength for `circle` (spec §4.I "±0.3").
const CIRCLE_RADIAL_CORRECTION: f64 = 0.3;

fn zigzag_offset(forward: Vec2, elapsed_ms: f64, amplitude: f64) -> Vec2 {
    let phase = (elapsed_ms / 1000.0) * ZIGZAG_FREQUENCY;
    forward.perp().scale(phase.sin() * amplitude)
}

/// Follow the cyclic waypoint list at `WOLF_PATROL_SPEED`; advance the index
/// when within 0.5 units of the current waypoint (spec §4.I `patrol`).
pub fn patrol(wolf: &mut WolfData, position: Vec2) -> Vec2 {
    if wolf.patrol_waypoints.is_empty() {
        return Vec2::ZERO;
    }
    let target = wolf.patrol_waypoints[wolf.patrol_index % wolf.patrol_waypoints.len()];
    let to_target = target.sub(position);
    if to_target.length() <= 0.5 {
        wolf.patrol_index = (wolf.patrol_index + 1) % wolf.patrol_waypoints.len();
    }
    to_target.normalized().scale(WOLF_PATROL_SPEED)
}

/// Approach the target at `WOLF_STEALTH_SPEED` with a perpendicular zigzag;
/// slow to 30% within 60% of detection range (spec §4.I `stalk`).
pub fn stalk(position: Vec2, target_position: Vec2, state_elapsed_ms: f64) -> Vec2 {
    let to_target = target_position.sub(position);
    let distance = to_target.length();
    let forward = to_target.normalized();
    let speed = if distance <= DETECTION_RANGE * 0.6 {
        WOLF_STEALTH_SPEED * 0.3
    } else {
        WOLF_STEALTH_SPEED
    };
    forward
        .scale(speed)
        .add(zigzag_offset(forward, state_elapsed_ms, ZIGZAG_AMPLITUDE))
}

/// Sprint toward the target's position extrapolated half a second ahead
/// (spec §4.I `chase`).
pub fn chase(position: Vec2, target_position: Vec2, target_velocity: Vec2) -> Vec2 {
    let predicted = target_position.add(target_velocity.scale(0.5));
    predicted.sub(position).normalized().scale(WOLF_SPRINT_SPEED)
}

/// Aim at the target offset by `±FLANKING_ANGLE_RAD` from the wolf-to-target
/// vector; side chosen by `wolf.flank_left` (spec §4.I `flank`).
pub fn flank(wolf: &WolfData, position: Vec2, target_position: Vec2) -> Vec2 {
    let to_target = target_position.sub(position);
    let angle = if wolf.flank_left {
        FLANKING_ANGLE_RAD
    } else {
        -FLANKING_ANGLE_RAD
    };
    to_target.rotated(angle).normalized().scale(WOLF_SPRINT_SPEED)
}

/// Move to the ambush spot at stealth speed; once there, hold until the
/// target enters `AMBUSH_DETECTION_RANGE`, then burst toward it (spec §4.I
/// `ambush`).
pub fn ambush(wolf: &WolfData, position: Vec2, target_position: Option<Vec2>) -> Vec2 {
    let to_spot = wolf.ambush_spot.sub(position);
    if to_spot.length() > 0.5 {
        return to_spot.normalized().scale(WOLF_STEALTH_SPEED);
    }
    if let Some(target) = target_position {
        if position.distance(target) <= AMBUSH_DETECTION_RANGE {
            return target.sub(position).normalized().scale(WOLF_SPRINT_SPEED * 1.2);
        }
    }
    Vec2::ZERO
}

/// Move away from the threat at `WOLF_BASE_SPEED`; optionally zigzag (spec
/// §4.I `retreat`).
pub fn retreat(position: Vec2, threat_position: Vec2, zigzag: bool, state_elapsed_ms: f64) -> Vec2 {
    let away = position.sub(threat_position).normalized();
    let base = away.scale(WOLF_BASE_SPEED);
    if zigzag {
        base.add(zigzag_offset(away, state_elapsed_ms, ZIGZAG_AMPLITUDE))
    } else {
        base
    }
}

/// Move toward the centroid of living packmates (excluding self), stopping
/// within `MIN_PACK_DISTANCE` (spec §4.I `regroup`).
pub fn regroup(position: Vec2, pack_centroid: Vec2) -> Vec2 {
    let to_centroid = pack_centroid.sub(position);
    if to_centroid.length() <= MIN_PACK_DISTANCE {
        return Vec2::ZERO;
    }
    to_centroid.normalized().scale(WOLF_BASE_SPEED)
}

/// Tangent motion around `center` at `radius`, with radial correction
/// toward/away from the configured radius (spec §4.I `circle`).
pub fn circle(position: Vec2, center: Vec2, radius: f64, clockwise: bool) -> Vec2 {
    let offset = position.sub(center);
    let distance = offset.length();
    if distance <= f64::EPSILON {
        return Vec2::ZERO;
    }
    let radial_dir = offset.scale(1.0 / distance);
    let tangent = if clockwise {
        radial_dir.perp().scale(-1.0)
    } else {
        radial_dir.perp()
    };
    let radial_error = radius - distance;
    tangent
        .scale(WOLF_BASE_SPEED)
        .add(radial_dir.scale(radial_error * CIRCLE_RADIAL_CORRECTION))
}

/// Parametric interpolation from `lunge.start` to `lunge.target` over
/// `LUNGE_DURATION_MS`; a hit may register once `progress() >= LUNGE_HIT_PROGRESS`
/// (spec §4.I `lunge`). Returns the velocity needed this tick to stay on the
/// interpolated path, and advances `lunge.elapsed_ms`.
pub fn lunge(wolf: &mut WolfData, position: Vec2, dt_ms: f64) -> Vec2 {
    if !wolf.lunge.active {
        return Vec2::ZERO;
    }
    wolf.lunge.elapsed_ms = (wolf.lunge.elapsed_ms + dt_ms).min(LUNGE_DURATION_MS);
    let t = wolf.lunge.progress();
    let desired = wolf.lunge.start.lerp(wolf.lunge.target, t);
    let delta = desired.sub(position);
    let dt_s = (dt_ms / 1000.0).max(f64::EPSILON);
    let speed = delta.length() / dt_s;
    delta.normalized().scale(speed.min(WOLF_LUNGE_SPEED))
}

//! Spawn-time and tuning constants, reproduced bit-for-bit from spec §3 so
//! the determinism tests in `direwood-engine/tests/determinism.rs` (spec §8,
//! scenario S5) are reproducible across builds.
//!
//! Constants the distilled spec names but does not give a numeric value for
//! (shield damage reduction, perfect-parry rewards, wave spawn-rate periods,
//! world-bounds restitution, knockback speed) are assigned a concrete value
//! here and recorded as Open-Question resolutions in `DESIGN.md`.

// -- wolf movement speeds (world-units/s), spec §3 -------------------------

pub const WOLF_BASE_SPEED: f64 = 2.5;
pub const WOLF_SPRINT_SPEED: f64 = 4.0;
pub const WOLF_STEALTH_SPEED: f64 = 1.2;
pub const WOLF_PATROL_SPEED: f64 = 1.5;
pub const WOLF_LUNGE_SPEED: f64 = 8.0;

// -- wolf ranges (world units), spec §3 -------------------------------------

pub const DETECTION_RANGE: f64 = 8.0;
pub const AMBUSH_DETECTION_RANGE: f64 = 3.0;
pub const ATTACK_RANGE: f64 = 1.5;
pub const COORDINATION_RANGE: f64 = 12.0;
/// Same quantity as `COORDINATION_RANGE`; named per the pack coordinator's
/// own vocabulary (spec §4.L step 4 / glossary "Coordination").
pub const MAX_PACK_DISTANCE: f64 = COORDINATION_RANGE;
/// Stopping distance for `regroup` (spec §4.I); not given a numeric value in
/// spec §3, chosen small relative to `MAX_PACK_DISTANCE`.
pub const MIN_PACK_DISTANCE: f64 = 2.0;

// -- wolf health/damage, spec §3 ---------------------------------------------

pub const WOLF_HEALTH: f64 = 40.0;
pub const WOLF_DAMAGE: f64 = 12.0;
pub const WOLF_LUNGE_DAMAGE: f64 = 20.0;
pub const CRITICAL_HEALTH_FRACTION: f64 = 0.3;

// -- wolf cooldowns / durations (milliseconds), spec §3 ---------------------

pub const HOWL_COOLDOWN_MS: f64 = 10_000.0;
pub const ATTACK_COOLDOWN_MS: f64 = 1_500.0;
pub const LUNGE_COOLDOWN_MS: f64 = 3_000.0;
pub const RETREAT_DURATION_MS: f64 = 2_000.0;
pub const HURT_DURATION_MS: f64 = 300.0;
pub const STUN_DURATION_MS: f64 = 1_000.0;
pub const DEATH_ANIM_DURATION_MS: f64 = 800.0;
/// Stagger between the alpha's howl and each follower's howl (spec S3).
pub const HOWL_STAGGER_MS: f64 = 200.0;
/// Duration of a lunge's start->target interpolation (spec §4.I `lunge`).
pub const LUNGE_DURATION_MS: f64 = 400.0;
/// Lunge progress threshold at which a hit may register (spec §4.I).
pub const LUNGE_HIT_PROGRESS: f64 = 0.3;
/// How long `Ambush` holds before degrading to `Stalking` (spec §4.J table).
pub const AMBUSH_TIMEOUT_MS: f64 = 5_000.0;
/// How long `Howling` holds before transitioning to `Chasing` (spec §4.J table).
pub const HOWL_STATE_DURATION_MS: f64 = 1_500.0;

// -- pack, spec §3 / §4.L ----------------------------------------------------

pub const MAX_PACK_SIZE: usize = 5;
pub const FLANKING_ANGLE_RAD: f64 = 45.0 * std::f64::consts::PI / 180.0;
pub const MORALE_MIN: f64 = 0.2;
pub const MORALE_MAX: f64 = 1.5;
/// Morale gained on a successful howl rally (spec S3), clamped to `MORALE_MAX`.
pub const HOWL_MORALE_BONUS: f64 = 0.3;

// -- aggression, spec §3 ------------------------------------------------------

pub const AGGRESSION_BASE: f64 = 0.5;
pub const AGGRESSION_PACK_BONUS_PER_MEMBER: f64 = 0.15;
pub const AGGRESSION_INJURED_PENALTY: f64 = 0.3;

// -- wave system, spec §3 / §4.F ----------------------------------------------

/// First wave index at which the wolf-spawn timer is allowed to fire (spec
/// §4.F: "wolf-spawn (only after wave > 3)"). Consistent with the quota
/// formula `max(0, 2*(wave-3))`, which is already zero at and below this wave.
pub const WOLF_SPAWN_MIN_WAVE: u32 = 3;
/// Fraction of wolf spawn rolls that produce an alpha (spec §4.F).
pub const ALPHA_SPAWN_FRACTION: f64 = 0.2;
/// Inclusive range of supporting wolves an alpha pulls in (spec §4.F).
pub const ALPHA_SUPPORT_MIN: u32 = 2;
pub const ALPHA_SUPPORT_MAX: u32 = 4;

pub const ENEMY_SPAWN_RATE_MS: f64 = 3_000.0;
pub const WOLF_WAVE_SPAWN_DELAY_MS: f64 = 5_000.0;
pub const POWERUP_SPAWN_RATE_MS: f64 = 8_000.0;
pub const WAVE_TRANSITION_TIME_MS: f64 = 3_000.0;
pub const MAX_POWERUPS: usize = 5;
pub const BASE_ENEMY_QUOTA: u32 = 5;
pub const ENEMY_QUOTA_PER_WAVE: u32 = 2;

// -- pathfinder, spec §4.H ----------------------------------------------------

pub const PATHFINDER_NODE_LIMIT: u32 = 1_000;
pub const PATH_CACHE_CAPACITY: usize = 100;
pub const PATH_CACHE_TTL_SECONDS: f64 = 5.0;

// -- spatial index, spec §4.C -------------------------------------------------

pub const SPATIAL_CELL_SIZE: f64 = 100.0;

// -- entity store, spec §7 ----------------------------------------------------

pub const MAX_ENTITIES: usize = 4096;

// -- tick / physics ------------------------------------------------------------

pub const MAX_DT_SECONDS: f64 = 0.05;
pub const PLAYER_FRICTION: f64 = 6.0;
pub const ENTITY_FRICTION: f64 = 4.0;
/// Restitution applied when a non-player movable bounces off world bounds
/// (spec §4.E); not given a numeric value in spec §3.
pub const WORLD_BOUNDS_RESTITUTION: f64 = 0.5;

// -- collision, spec §4.D -----------------------------------------------------

/// Fractional damage reduction while the player is blocking (not parrying).
pub const SHIELD_DAMAGE_REDUCTION: f64 = 0.5;
pub const PERFECT_PARRY_STUN_DURATION_MS: f64 = 1_500.0;
pub const PERFECT_PARRY_ENERGY_RESTORE: f64 = 25.0;
/// Speed imparted along the contact normal on a full-damage hit (spec §4.D
/// "apply knockback along the contact normal").
pub const KNOCKBACK_SPEED: f64 = 6.0;
pub const PLAYER_INVULNERABILITY_MS: f64 = 1_000.0;

//! Per-variant entity data (spec §3 "Entity" / "Player" / "Wolf").
//!
//! Spec §9's inheritance-hierarchy design note says to model `Entity` as a
//! tagged sum with a shared header struct and dispatch by pattern-match on
//! the variant tag -- not as a generic ECS component set. [`EntityKind`] is
//! that tagged sum; [`crate::store::Entity`] pairs it with the shared header.
//!
//! Wolf-specific fields live here (plain data) rather than in `direwood-wolf`,
//! so that `direwood-core` has no dependency on the AI crate; `direwood-wolf`
//! reads and writes `WolfData` through `EntityStore` the way `direwood-sim`'s
//! collision system reads `PlayerData`/`ObstacleData`.

use serde::{Deserialize, Serialize};

use crate::entity::EntityId;

/// Stable integer encoding for the entity-type enum (spec §6) -- the
/// renderer and the wasm boundary depend on these exact values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum EntityType {
    Player = 0,
    Enemy = 1,
    Projectile = 2,
    PowerUp = 3,
    Obstacle = 4,
    Wolf = 5,
}

/// Stable integer encoding for power-up types (spec §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum PowerUpType {
    Health = 0,
    Energy = 1,
    Shield = 2,
    Speed = 3,
    Damage = 4,
    RapidFire = 5,
    MultiShot = 6,
}

/// Stable integer encoding for obstacle shapes (spec §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum ObstacleShape {
    Circle = 0,
    Square = 1,
    Rectangle = 2,
}

/// Wolf pack role (spec §3 "Wolf").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WolfRole {
    Alpha,
    Chaser,
    Flanker,
    Ambusher,
    Support,
}

/// Wolf finite-state machine states (spec §4.J). Includes the richer state
/// set (`Lunging`/`Hurt`/`Stunned`/`Dying`) per the Open Question in spec §9
/// -- see `DESIGN.md` for the decision to target the richer set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WolfState {
    Idle,
    Patrol,
    Stalking,
    Ambush,
    Chasing,
    Flanking,
    Attacking,
    Lunging,
    Hurt,
    Stunned,
    Retreating,
    Howling,
    Regrouping,
    Dying,
    Dead,
}

/// Cooldown timers shared by every wolf (spec §3 constants table).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct WolfCooldowns {
    pub howl_ms: f64,
    pub lunge_ms: f64,
    pub attack_ms: f64,
}

/// In-flight lunge animation state (spec §4.I `lunge`).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct LungeState {
    pub active: bool,
    pub start: crate::math::Vec2,
    pub target: crate::math::Vec2,
    pub elapsed_ms: f64,
}

impl LungeState {
    /// `elapsed / LUNGE_DURATION`, clamped -- spec §9 Open Question on the
    /// missing `getLungeProgress` accessor.
    pub fn progress(&self) -> f64 {
        (self.elapsed_ms / crate::constants::LUNGE_DURATION_MS).clamp(0.0, 1.0)
    }
}

/// Per-wolf data (spec §3 "Wolf").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WolfData {
    pub state: WolfState,
    pub role: WolfRole,
    pub pack_id: Option<u32>,
    pub target_id: Option<EntityId>,
    pub aggression: f64,
    pub alert_level: f64,
    pub animation_phase: f64,
    pub eye_glow_intensity: f64,
    pub lunge: LungeState,
    pub cooldowns: WolfCooldowns,
    pub patrol_waypoints: Vec<crate::math::Vec2>,
    pub patrol_index: usize,
    pub last_known_target_pos: Option<crate::math::Vec2>,
    pub hurt_progress_ms: f64,
    pub stun_progress_ms: f64,
    pub death_progress_ms: f64,
    /// Elapsed time in the current state, drives the guard timers of spec §4.J.
    pub state_elapsed_ms: f64,
    /// Ambush spot assigned by the pack coordinator or spawn site, for role = Ambusher.
    pub ambush_spot: crate::math::Vec2,
    /// Side assignment for `flank` (spec §4.I): `true` = left, `false` = right.
    pub flank_left: bool,
    pub kills: u32,
    /// Contact damage dealt by this wolf, scaled at spawn time by
    /// `difficulty x 1.1^(wave-1)` (spec §4.M). Lunge hits use this value
    /// scaled by `WOLF_LUNGE_DAMAGE / WOLF_DAMAGE` so both attack forms rise
    /// together.
    pub damage: f64,
}

impl WolfData {
    pub fn new(spawn_pos: crate::math::Vec2, role: WolfRole) -> Self {
        Self {
            state: WolfState::Idle,
            role,
            pack_id: None,
            target_id: None,
            aggression: crate::constants::AGGRESSION_BASE,
            alert_level: 0.0,
            animation_phase: 0.0,
            eye_glow_intensity: 0.0,
            lunge: LungeState::default(),
            cooldowns: WolfCooldowns::default(),
            patrol_waypoints: Vec::new(),
            patrol_index: 0,
            last_known_target_pos: None,
            hurt_progress_ms: 0.0,
            stun_progress_ms: 0.0,
            death_progress_ms: 0.0,
            state_elapsed_ms: 0.0,
            ambush_spot: spawn_pos,
            flank_left: true,
            kills: 0,
            damage: crate::constants::WOLF_DAMAGE,
        }
    }
}

/// Per-player data (spec §3 "Player").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerData {
    pub energy: f64,
    pub max_energy: f64,
    pub lives: u32,
    pub score: u64,
    pub kill_count: u32,
    pub boosting: bool,
    pub boost_cooldown_ms: f64,
    pub blocking: bool,
    pub block_cooldown_ms: f64,
    pub perfect_parry_window: bool,
    pub perfect_parry_remaining_ms: f64,
    pub attacking: bool,
    pub rolling: bool,
    pub invulnerability_ms: f64,
    pub damage_multiplier: f64,
    pub multi_shot: bool,
    pub multi_shot_remaining_ms: f64,
    pub rapid_fire: bool,
    pub rapid_fire_remaining_ms: f64,
    pub aim: crate::math::Vec2,
}

impl Default for PlayerData {
    fn default() -> Self {
        Self {
            energy: 100.0,
            max_energy: 100.0,
            lives: 3,
            score: 0,
            kill_count: 0,
            boosting: false,
            boost_cooldown_ms: 0.0,
            blocking: false,
            block_cooldown_ms: 0.0,
            perfect_parry_window: false,
            perfect_parry_remaining_ms: 0.0,
            attacking: false,
            rolling: false,
            invulnerability_ms: 0.0,
            damage_multiplier: 1.0,
            multi_shot: false,
            multi_shot_remaining_ms: 0.0,
            rapid_fire: false,
            rapid_fire_remaining_ms: 0.0,
            aim: crate::math::Vec2::new(1.0, 0.0),
        }
    }
}

impl PlayerData {
    /// Invariant from spec §3: `0 <= health <= maxHealth`, `0 <= energy <=
    /// maxEnergy`, at most one of {attacking, rolling}, `perfectParryWindow
    /// => blocking`. Health bounds are checked by the caller against the
    /// shared header; this checks the player-only invariants.
    pub fn invariants_hold(&self) -> bool {
        let energy_ok = self.energy >= 0.0 && self.energy <= self.max_energy;
        let exclusive_ok = !(self.attacking && self.rolling);
        let parry_ok = !self.perfect_parry_window || self.blocking;
        energy_ok && exclusive_ok && parry_ok
    }
}

/// Per-enemy data. The spec treats "Enemy" as the simple non-wolf hostile
/// variant; it carries no fields beyond the shared header plus a basic
/// contact-damage value used by the collision system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyData {
    pub contact_damage: f64,
    /// Set by a perfect parry (spec §4.D); the generic enemy AI the spec
    /// excludes from the core (§1) never reads this, but the field exists
    /// so the parry handler has somewhere to record the effect.
    pub stunned_ms: f64,
}

impl Default for EnemyData {
    fn default() -> Self {
        Self {
            contact_damage: 10.0,
            stunned_ms: 0.0,
        }
    }
}

/// Per-projectile data (spec §6 `create_projectile`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileData {
    pub direction: crate::math::Vec2,
    pub damage: f64,
    pub owner_id: EntityId,
}

/// Per-power-up data (spec §6 `create_power_up`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUpData {
    pub kind: PowerUpType,
}

/// Per-obstacle data (spec §6 `create_obstacle`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObstacleData {
    pub shape: ObstacleShape,
    pub half_extents: crate::math::Vec2,
    pub destructible: bool,
}

/// The tagged union over entity variants (spec §3 "Entity").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EntityKind {
    Player(PlayerData),
    Enemy(EnemyData),
    Wolf(WolfData),
    Projectile(ProjectileData),
    PowerUp(PowerUpData),
    Obstacle(ObstacleData),
}

impl EntityKind {
    pub fn entity_type(&self) -> EntityType {
        match self {
            EntityKind::Player(_) => EntityType::Player,
            EntityKind::Enemy(_) => EntityType::Enemy,
            EntityKind::Wolf(_) => EntityType::Wolf,
            EntityKind::Projectile(_) => EntityType::Projectile,
            EntityKind::PowerUp(_) => EntityType::PowerUp,
            EntityKind::Obstacle(_) => EntityType::Obstacle,
        }
    }

    pub fn as_wolf(&self) -> Option<&WolfData> {
        match self {
            EntityKind::Wolf(w) => Some(w),
            _ => None,
        }
    }

    pub fn as_wolf_mut(&mut self) -> Option<&mut WolfData> {
        match self {
            EntityKind::Wolf(w) => Some(w),
            _ => None,
        }
    }

    pub fn as_player(&self) -> Option<&PlayerData> {
        match self {
            EntityKind::Player(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_player_mut(&mut self) -> Option<&mut PlayerData> {
        match self {
            EntityKind::Player(p) => Some(p),
            _ => None,
        }
    }
}

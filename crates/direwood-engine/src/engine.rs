//! The engine façade (spec §4.M / §6): owns every subsystem and exposes the
//! narrow procedural surface consumed by the renderer/input/UI layers.
//!
//! `update` runs the fixed ten-phase tick order from spec §4.M. Nothing
//! outside this module holds a `&mut` to any subsystem across a tick
//! boundary -- the host drives ticks via `update(dt)` and reads state back
//! through the snapshot accessors, matching spec §5's "single-threaded
//! cooperative" scheduling model.

use serde::{Deserialize, Serialize};

use direwood_core::constants::{
    MAX_DT_SECONDS, MAX_POWERUPS, POWERUP_SPAWN_RATE_MS, WAVE_TRANSITION_TIME_MS,
};
use direwood_core::entity::EntityId;
use direwood_core::kinds::{
    EntityKind, EntityType, ObstacleData, ObstacleShape, PlayerData, PowerUpData, PowerUpType,
    ProjectileData,
};
use direwood_core::math::Vec2;
use direwood_core::rng::SimRng;
use direwood_core::spatial::SpatialIndex;
use direwood_core::store::{EntityHeader, EntityStore};
use direwood_sim::pathfinder::{Grid, PathCache};
use direwood_sim::physics::{self, WorldBounds};
use direwood_sim::vfx::VfxBuffer;
use direwood_sim::{collision, wave};
use direwood_wolf::manager::WolfManager;

use crate::config::EngineConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    NotStarted,
    Playing,
    Paused,
    GameOver,
}

/// Snapshot row for `entity_positions()` (spec §6).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EntityPosition {
    pub id: EntityId,
    pub entity_type: EntityType,
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub rotation: f64,
    pub radius: f64,
    pub health: f64,
    pub max_health: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameStateInfo {
    pub state: GameState,
    pub score: u64,
    pub high_score: u64,
    pub wave: u32,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    pub physics_time_ms: f64,
    pub collision_time_ms: f64,
    pub collision_checks: u64,
    pub entity_count: usize,
    pub active_entities: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaveInfo {
    pub current_wave: u32,
    pub wave_active: bool,
    pub transition_timer: f64,
    pub enemies_remaining: u32,
    pub wolves_remaining: u32,
}

/// A single local player's queued input for the next `update` (spec §6
/// "Player input").
#[derive(Debug, Clone, Copy, Default)]
struct PlayerInput {
    move_dir: Vec2,
    aim: Vec2,
    shoot: bool,
    boost: Option<bool>,
    block: Option<bool>,
    attack: Option<f64>,
    roll: Option<Vec2>,
}

pub struct GameEngine {
    config: EngineConfig,
    store: EntityStore,
    spatial: SpatialIndex,
    wave: wave::WaveSystem,
    vfx: VfxBuffer,
    wolves: WolfManager,
    grid: Grid,
    path_cache: PathCache,
    rng: SimRng,
    bounds: WorldBounds,
    state: GameState,
    tick_count: u64,
    sim_time: f64,
    score: u64,
    high_score: u64,
    player_id: Option<EntityId>,
    pending_input: PlayerInput,
    powerup_timer_ms: f64,
    last_metrics: PerformanceMetrics,
}

impl GameEngine {
    /// `new_engine(world_w, world_h, seed)` (spec §6 Lifecycle).
    pub fn new(config: EngineConfig) -> Self {
        let grid_width = (config.world_width / config.pathfinder_cell_size).ceil() as i32;
        let grid_height = (config.world_height / config.pathfinder_cell_size).ceil() as i32;
        Self {
            bounds: WorldBounds {
                width: config.world_width,
                height: config.world_height,
            },
            grid: Grid::new(grid_width.max(1), grid_height.max(1), config.pathfinder_cell_size),
            path_cache: PathCache::new(config.ticks_per_second),
            rng: SimRng::new(config.seed),
            wolves: WolfManager::new(config.seed ^ 0x9E37_79B9_7F4A_7C15, config.difficulty),
            wave: wave::WaveSystem::new(),
            vfx: VfxBuffer::new(),
            spatial: SpatialIndex::new(),
            store: EntityStore::new(),
            state: GameState::NotStarted,
            tick_count: 0,
            sim_time: 0.0,
            score: 0,
            high_score: 0,
            player_id: None,
            pending_input: PlayerInput::default(),
            powerup_timer_ms: POWERUP_SPAWN_RATE_MS,
            last_metrics: PerformanceMetrics::default(),
            config,
        }
    }

    // -- Lifecycle ----------------------------------------------------------

    pub fn start_game(&mut self) {
        self.state = GameState::Playing;
    }

    pub fn pause(&mut self) {
        if self.state == GameState::Playing {
            self.state = GameState::Paused;
        } else if self.state == GameState::GameOver {
            tracing::warn!(
                "{}",
                crate::error::EngineError::TerminalStateTransition(self.state)
            );
        }
    }

    pub fn resume(&mut self) {
        if self.state == GameState::Paused {
            self.state = GameState::Playing;
        } else if self.state == GameState::GameOver {
            tracing::warn!(
                "{}",
                crate::error::EngineError::TerminalStateTransition(self.state)
            );
        }
    }

    pub fn restart(&mut self) {
        self.high_score = self.high_score.max(self.score);
        self.clear_entities();
        self.score = 0;
        self.tick_count = 0;
        self.sim_time = 0.0;
        self.wave = wave::WaveSystem::new();
        self.player_id = None;
        self.state = GameState::Playing;
    }

    pub fn end_game(&mut self) {
        self.high_score = self.high_score.max(self.score);
        self.state = GameState::GameOver;
        tracing::debug!(score = self.score, high_score = self.high_score, "game over");
    }

    pub fn set_world_bounds(&mut self, width: f64, height: f64) {
        self.bounds = WorldBounds { width, height };
    }

    // -- Mutation -------------------------------------------------------------

    pub fn create_player(&mut self, x: f64, y: f64) -> EntityId {
        let header = EntityHeader::new(Vec2::new(x, y), 1.0, 100.0, self.tick_count);
        let id = self.store.create(header, EntityKind::Player(PlayerData::default()));
        self.player_id = Some(id);
        id
    }

    pub fn create_enemy(&mut self, x: f64, y: f64) -> EntityId {
        let header = EntityHeader::new(Vec2::new(x, y), 0.8, 30.0, self.tick_count);
        self.store.create(
            header,
            EntityKind::Enemy(direwood_core::kinds::EnemyData::default()),
        )
    }

    pub fn create_wolf(&mut self, x: f64, y: f64, is_alpha: bool) -> EntityId {
        self.wolves.spawn(
            &mut self.store,
            Vec2::new(x, y),
            is_alpha,
            0,
            self.wave.wave,
            self.tick_count,
        )
    }

    pub fn create_projectile(
        &mut self,
        x: f64,
        y: f64,
        dir_x: f64,
        dir_y: f64,
        damage: f64,
        owner_id: EntityId,
    ) -> EntityId {
        let header = EntityHeader::new(Vec2::new(x, y), 0.2, 1.0, self.tick_count);
        self.store.create(
            header,
            EntityKind::Projectile(ProjectileData {
                direction: Vec2::new(dir_x, dir_y).normalized(),
                damage,
                owner_id,
            }),
        )
    }

    pub fn create_power_up(&mut self, x: f64, y: f64, kind: PowerUpType) -> EntityId {
        let header = EntityHeader::new(Vec2::new(x, y), 0.5, 1.0, self.tick_count);
        self.store
            .create(header, EntityKind::PowerUp(PowerUpData { kind }))
    }

    pub fn create_obstacle(
        &mut self,
        x: f64,
        y: f64,
        shape: ObstacleShape,
        half_extent_x: f64,
        half_extent_y: f64,
        destructible: bool,
    ) -> EntityId {
        let header = EntityHeader::new(Vec2::new(x, y), 0.0, 1_000.0, self.tick_count);
        self.store.create(
            header,
            EntityKind::Obstacle(ObstacleData {
                shape,
                half_extents: Vec2::new(half_extent_x, half_extent_y),
                destructible,
            }),
        )
    }

    pub fn remove_entity(&mut self, id: EntityId) {
        if self.store.remove(id) {
            self.wolves.despawn(id);
        }
    }

    /// "Ensure playability" is implemented as a density heuristic, not a
    /// reachability proof, inheriting the original's behavior (spec §9 Open
    /// Question).
    pub fn generate_obstacles(&mut self, count: u32, ensure_playability: bool) {
        let max_count = if ensure_playability {
            count.min(((self.bounds.width * self.bounds.height) / 20_000.0) as u32)
        } else {
            count
        };
        for _ in 0..max_count {
            let x = self.rng.gen_range_f64(self.bounds.width * 0.1, self.bounds.width * 0.9);
            let y = self.rng.gen_range_f64(self.bounds.height * 0.1, self.bounds.height * 0.9);
            let shape = match self.rng.gen_range_u32(0, 2) {
                0 => ObstacleShape::Circle,
                1 => ObstacleShape::Square,
                _ => ObstacleShape::Rectangle,
            };
            self.create_obstacle(x, y, shape, 2.0, 2.0, self.rng.chance(0.3));
        }
    }

    pub fn clear_entities(&mut self) {
        let ids: Vec<EntityId> = self.store.iter_active().map(|(id, _)| id).collect();
        for id in ids {
            self.remove_entity(id);
        }
        self.store.compact();
    }

    // -- Player input -----------------------------------------------------------

    pub fn update_player_input(&mut self, dx: f64, dy: f64, aim_x: f64, aim_y: f64) {
        self.pending_input.move_dir = Vec2::new(dx, dy).clamp_magnitude_one();
        self.pending_input.aim = Vec2::new(aim_x, aim_y);
    }

    pub fn player_shoot(&mut self, aim_x: f64, aim_y: f64) {
        self.pending_input.shoot = true;
        self.pending_input.aim = Vec2::new(aim_x, aim_y);
    }

    pub fn activate_boost(&mut self) {
        self.pending_input.boost = Some(true);
    }

    pub fn deactivate_boost(&mut self) {
        self.pending_input.boost = Some(false);
    }

    pub fn start_block(&mut self) {
        self.pending_input.block = Some(true);
    }

    pub fn end_block(&mut self) {
        self.pending_input.block = Some(false);
    }

    pub fn perform_attack(&mut self, angle: f64) {
        self.pending_input.attack = Some(angle);
    }

    pub fn perform_roll(&mut self, dir_x: f64, dir_y: f64) {
        self.pending_input.roll = Some(Vec2::new(dir_x, dir_y).normalized());
    }

    // -- Tick -------------------------------------------------------------------

    /// `update(dt_seconds)` (spec §6 Tick / §4.M ten-phase order).
    #[tracing::instrument(level = "trace", skip(self), fields(tick = self.tick_count))]
    pub fn update(&mut self, dt_seconds: f64) {
        if self.state != GameState::Playing {
            if self.state == GameState::NotStarted {
                tracing::warn!("{}", crate::error::EngineError::NotStarted);
            }
            return;
        }
        if !(0.0..=MAX_DT_SECONDS).contains(&dt_seconds) {
            tracing::warn!(
                "{}",
                direwood_sim::error::SimError::InvalidDt(dt_seconds)
            );
        }
        let dt = dt_seconds.clamp(0.0, MAX_DT_SECONDS);
        let dt_ms = dt * 1000.0;

        // Phase 1: process queued input events.
        self.apply_player_input(dt);

        // Phase 2: manager.update (pack coordinator then each wolf FSM).
        let target = self.player_id.and_then(|id| {
            self.store
                .get(id)
                .map(|e| (id, e.header.position, e.header.velocity))
        });
        self.wolves.update(
            &mut self.store,
            &self.grid,
            &mut self.path_cache,
            target,
            self.tick_count,
            dt_ms,
        );

        // Phase 3: other-entity AI is out of scope for the core (spec §1);
        // plain enemies move only under physics/collision.

        // Phase 4: physics.
        let physics_start = std::time::Instant::now();
        physics::step(&mut self.store, self.bounds, dt);
        self.last_metrics.physics_time_ms = physics_start.elapsed().as_secs_f64() * 1000.0;

        // Phase 5: spatial-index rebuild.
        self.spatial.rebuild(&self.store);

        // Phase 6: collision resolution.
        let collision_start = std::time::Instant::now();
        let stats = collision::resolve(&mut self.store, &self.spatial, &mut self.vfx);
        self.last_metrics.collision_time_ms = collision_start.elapsed().as_secs_f64() * 1000.0;
        self.last_metrics.collision_checks = stats.checks;

        // Phase 7: wave system.
        let live_hostiles = self
            .store
            .iter_active()
            .filter(|(_, e)| matches!(e.kind, EntityKind::Enemy(_) | EntityKind::Wolf(_)))
            .count() as u32;
        let requests = self.wave.poll(
            dt_ms,
            live_hostiles,
            Vec2::new(self.bounds.width, self.bounds.height),
            &mut self.rng,
        );
        self.apply_spawn_requests(requests);

        // Phase 8: visual-effects decay.
        self.vfx.decay(dt_ms);

        // Phase 9: compact entity store.
        self.store.compact();

        // Phase 10: snapshot production happens on demand via the
        // `entity_positions`/`game_state`/etc. accessors below, not here --
        // the host pulls a read-only copy when it renders.

        self.tick_count += 1;
        self.sim_time = self.tick_count as f64 * dt;
        self.last_metrics.entity_count = self.store.len();
        self.last_metrics.active_entities = self.store.iter_active().count();

        if let Some(player_id) = self.player_id {
            if let Err(err) = self.store.try_get(player_id) {
                tracing::warn!("{}", err);
                self.end_game();
            }
        }
    }

    fn apply_player_input(&mut self, dt: f64) {
        let Some(player_id) = self.player_id else {
            return;
        };
        let input = self.pending_input;

        if let Some(entity) = self.store.get_mut(player_id) {
            if let Some(player) = entity.kind.as_player_mut() {
                if let Some(blocking) = input.block {
                    player.blocking = blocking;
                    player.perfect_parry_window = blocking && player.block_cooldown_ms <= 0.0;
                }
                if let Some(boosting) = input.boost {
                    player.boosting = boosting;
                }
                if let Some(angle) = input.attack {
                    player.attacking = true;
                    player.aim = Vec2::new(angle.cos(), angle.sin());
                }
                if let Some(roll_dir) = input.roll {
                    player.rolling = true;
                    entity.header.velocity = roll_dir.scale(direwood_core::constants::WOLF_SPRINT_SPEED);
                }
                player.invulnerability_ms = (player.invulnerability_ms - dt * 1000.0).max(0.0);
                player.block_cooldown_ms = (player.block_cooldown_ms - dt * 1000.0).max(0.0);

                let speed = if player.boosting { 6.0 } else { 3.5 };
                entity.header.velocity = entity
                    .header
                    .velocity
                    .add(input.move_dir.scale(speed * dt * 20.0));
            }
        }

        if input.shoot {
            if let Some(entity) = self.store.get(player_id) {
                let origin = entity.header.position;
                let aim = input.aim.normalized();
                self.create_projectile(origin.x, origin.y, aim.x, aim.y, 10.0, player_id);
            }
        }

        self.pending_input = PlayerInput::default();
    }

    fn apply_spawn_requests(&mut self, requests: Vec<wave::SpawnRequest>) {
        for request in requests {
            match request {
                wave::SpawnRequest::Enemy { position } => {
                    self.create_enemy(position.x, position.y);
                }
                wave::SpawnRequest::Wolf {
                    position,
                    is_alpha,
                    pack_members,
                } => {
                    self.wolves.spawn(
                        &mut self.store,
                        position,
                        is_alpha,
                        pack_members,
                        self.wave.wave,
                        self.tick_count,
                    );
                }
                wave::SpawnRequest::PowerUp { position } => {
                    let active_powerups = self
                        .store
                        .iter_active()
                        .filter(|(_, e)| matches!(e.kind, EntityKind::PowerUp(_)))
                        .count();
                    if active_powerups < MAX_POWERUPS {
                        let kind = match self.rng.gen_range_u32(0, 6) {
                            0 => PowerUpType::Health,
                            1 => PowerUpType::Energy,
                            2 => PowerUpType::Shield,
                            3 => PowerUpType::Speed,
                            4 => PowerUpType::Damage,
                            5 => PowerUpType::RapidFire,
                            _ => PowerUpType::MultiShot,
                        };
                        self.create_power_up(position.x, position.y, kind);
                    }
                }
            }
        }
    }

    // -- Snapshots ------------------------------------------------------------

    pub fn entity_positions(&self) -> Vec<EntityPosition> {
        self.store
            .iter_active()
            .map(|(id, e)| EntityPosition {
                id,
                entity_type: e.kind.entity_type(),
                x: e.header.position.x,
                y: e.header.position.y,
                vx: e.header.velocity.x,
                vy: e.header.velocity.y,
                rotation: e.header.facing,
                radius: e.header.radius,
                health: e.header.health,
                max_health: e.header.max_health,
            })
            .collect()
    }

    pub fn player_state(&self) -> Option<PlayerData> {
        self.player_id
            .and_then(|id| self.store.get(id))
            .and_then(|e| e.kind.as_player())
            .cloned()
    }

    pub fn game_state(&self) -> GameStateInfo {
        GameStateInfo {
            state: self.state,
            score: self.score,
            high_score: self.high_score,
            wave: self.wave.wave,
        }
    }

    pub fn performance_metrics(&self) -> PerformanceMetrics {
        self.last_metrics
    }

    pub fn visual_effects(&self) -> (direwood_sim::vfx::ScreenShake, &[direwood_sim::vfx::Particle]) {
        (self.vfx.shake(), self.vfx.particles())
    }

    pub fn wave_info(&self) -> WaveInfo {
        let enemies_remaining = self
            .store
            .iter_active()
            .filter(|(_, e)| matches!(e.kind, EntityKind::Enemy(_)))
            .count() as u32;
        let wolves_remaining = self.wolves.living(&self.store).len() as u32;
        WaveInfo {
            current_wave: self.wave.wave,
            wave_active: self.wave.state == wave::WaveState::Active,
            transition_timer: WAVE_TRANSITION_TIME_MS,
            enemies_remaining,
            wolves_remaining,
        }
    }

    /// Content hash of the full observable state (spec §8 scenario S5).
    pub fn state_hash(&self) -> String {
        crate::snapshot::compute_hash(&self.store, self.tick_count, self.wave.wave, self.score)
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn sim_time(&self) -> f64 {
        self.sim_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> GameEngine {
        let mut e = GameEngine::new(EngineConfig::new(800.0, 600.0, 42));
        e.start_game();
        e
    }

    #[test]
    fn new_engine_starts_not_playing_until_start_game() {
        let e = GameEngine::new(EngineConfig::new(800.0, 600.0, 1));
        assert_eq!(e.game_state().state, GameState::NotStarted);
    }

    #[test]
    fn update_before_start_game_is_a_no_op() {
        let mut e = GameEngine::new(EngineConfig::new(800.0, 600.0, 1));
        e.update(1.0 / 60.0);
        assert_eq!(e.tick_count(), 0);
    }

    #[test]
    fn pause_and_resume_from_game_over_are_no_ops() {
        let mut e = engine();
        e.end_game();
        assert_eq!(e.game_state().state, GameState::GameOver);
        e.pause();
        assert_eq!(e.game_state().state, GameState::GameOver);
        e.resume();
        assert_eq!(e.game_state().state, GameState::GameOver);
    }

    #[test]
    fn create_player_and_tick_advances_sim_time() {
        let mut e = engine();
        e.create_player(100.0, 100.0);
        e.update(1.0 / 60.0);
        assert_eq!(e.tick_count(), 1);
        assert!((e.sim_time() - 1.0 / 60.0).abs() < 1e-9);
    }

    #[test]
    fn remove_entity_on_unknown_id_is_a_no_op() {
        let mut e = engine();
        e.remove_entity(EntityId::new(999, 0));
    }

    #[test]
    fn store_full_create_returns_invalid_sentinel_not_a_panic() {
        let mut e = engine();
        for i in 0..direwood_core::constants::MAX_ENTITIES {
            e.create_enemy(i as f64, 0.0);
        }
        let id = e.create_enemy(0.0, 0.0);
        assert!(id.is_invalid());
    }
}

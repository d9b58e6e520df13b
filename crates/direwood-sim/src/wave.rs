//! Wave system (spec §4.F): time-gated spawner cycling `{Active, Transition}`.
//!
//! Spawning itself (picking a position/kind and calling into the entity
//! store) is left to the engine façade via [`WaveSystem::poll`]'s returned
//! [`SpawnRequest`]s -- this module only owns the timers/quota bookkeeping,
//! mirroring how `direwood-core`'s modules stay free of cross-crate
//! dependencies (`direwood-wolf` needs the wolf spawn requests; keeping them
//! as plain data avoids a dependency from `direwood-sim` on `direwood-wolf`).

use serde::{Deserialize, Serialize};

use direwood_core::constants::{
    BASE_ENEMY_QUOTA, ENEMY_QUOTA_PER_WAVE, ENEMY_SPAWN_RATE_MS, POWERUP_SPAWN_RATE_MS,
    WAVE_TRANSITION_TIME_MS, WOLF_SPAWN_MIN_WAVE, WOLF_WAVE_SPAWN_DELAY_MS,
};
use direwood_core::math::Vec2;
use direwood_core::rng::SimRng;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WaveState {
    Active,
    Transition,
}

/// Which world edge an edge-spawn landed on, and the resulting position.
#[derive(Debug, Clone, Copy)]
pub struct EdgeSpawn {
    pub position: Vec2,
}

/// One request emitted by [`WaveSystem::poll`] for the engine façade to act on.
#[derive(Debug, Clone)]
pub enum SpawnRequest {
    Enemy { position: Vec2 },
    /// `pack_members` is the count of supporting wolves to spawn alongside
    /// this one when `is_alpha` is true (spec §4.F "pull 2-4 supporting
    /// wolves, linking all into one pack").
    Wolf {
        position: Vec2,
        is_alpha: bool,
        pack_members: u32,
    },
    PowerUp { position: Vec2 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaveSystem {
    pub wave: u32,
    pub state: WaveState,
    enemy_timer_ms: f64,
    wolf_timer_ms: f64,
    powerup_timer_ms: f64,
    transition_timer_ms: f64,
    enemy_quota: u32,
    wolf_quota: u32,
    enemies_spawned: u32,
    wolves_spawned: u32,
}

impl WaveSystem {
    pub fn new() -> Self {
        Self {
            wave: 1,
            state: WaveState::Active,
            enemy_timer_ms: ENEMY_SPAWN_RATE_MS,
            wolf_timer_ms: WOLF_WAVE_SPAWN_DELAY_MS,
            powerup_timer_ms: POWERUP_SPAWN_RATE_MS,
            transition_timer_ms: 0.0,
            enemy_quota: BASE_ENEMY_QUOTA,
            wolf_quota: wolf_quota_for(1),
            enemies_spawned: 0,
            wolves_spawned: 0,
        }
    }

    fn quotas_met(&self) -> bool {
        self.enemies_spawned >= self.enemy_quota && self.wolves_spawned >= self.wolf_quota
    }

    /// Advance the wave timers by `dt_ms`, emitting any spawns that fire this
    /// tick. `live_hostiles` is the number of enemies/wolves currently alive,
    /// used to decide whether the wave can end (spec §4.F "no live
    /// enemies/wolves remain").
    pub fn poll(
        &mut self,
        dt_ms: f64,
        live_hostiles: u32,
        world_size: Vec2,
        rng: &mut SimRng,
    ) -> Vec<SpawnRequest> {
        let mut requests = Vec::new();

        match self.state {
            WaveState::Active => {
                self.enemy_timer_ms -= dt_ms;
                if self.enemy_timer_ms <= 0.0 {
                    self.enemy_timer_ms += ENEMY_SPAWN_RATE_MS;
                    if self.enemies_spawned < self.enemy_quota {
                        self.enemies_spawned += 1;
                        requests.push(SpawnRequest::Enemy {
                            position: edge_spawn(world_size, rng).position,
                        });
                    }
                }

                if self.wave > WOLF_SPAWN_MIN_WAVE {
                    self.wolf_timer_ms -= dt_ms;
                    if self.wolf_timer_ms <= 0.0 {
                        self.wolf_timer_ms += WOLF_WAVE_SPAWN_DELAY_MS;
                        if self.wolves_spawned < self.wolf_quota {
                            requests.push(self.roll_wolf_spawn(world_size, rng));
                        }
                    }
                }

                self.powerup_timer_ms -= dt_ms;
                if self.powerup_timer_ms <= 0.0 {
                    self.powerup_timer_ms += POWERUP_SPAWN_RATE_MS;
                    requests.push(SpawnRequest::PowerUp {
                        position: interior_spawn(world_size, rng),
                    });
                }

                if self.quotas_met() && live_hostiles == 0 {
                    self.state = WaveState::Transition;
                    self.transition_timer_ms = WAVE_TRANSITION_TIME_MS;
                }
            }
            WaveState::Transition => {
                self.transition_timer_ms -= dt_ms;
                if self.transition_timer_ms <= 0.0 {
                    self.advance_wave();
                }
            }
        }

        requests
    }

    fn roll_wolf_spawn(&mut self, world_size: Vec2, rng: &mut SimRng) -> SpawnRequest {
        let position = edge_spawn(world_size, rng).position;
        let is_alpha = rng.chance(direwood_core::constants::ALPHA_SPAWN_FRACTION);
        let pack_members = if is_alpha {
            rng.gen_range_u32(
                direwood_core::constants::ALPHA_SUPPORT_MIN,
                direwood_core::constants::ALPHA_SUPPORT_MAX,
            )
        } else {
            0
        };
        self.wolves_spawned += 1 + pack_members;
        SpawnRequest::Wolf {
            position,
            is_alpha,
            pack_members,
        }
    }

    fn advance_wave(&mut self) {
        self.wave += 1;
        self.state = WaveState::Active;
        self.enemy_quota = BASE_ENEMY_QUOTA + ENEMY_QUOTA_PER_WAVE * self.wave;
        self.wolf_quota = wolf_quota_for(self.wave);
        self.enemies_spawned = 0;
        self.wolves_spawned = 0;
        self.enemy_timer_ms = ENEMY_SPAWN_RATE_MS;
        self.wolf_timer_ms = WOLF_WAVE_SPAWN_DELAY_MS;
        self.powerup_timer_ms = POWERUP_SPAWN_RATE_MS;
    }
}

impl Default for WaveSystem {
    fn default() -> Self {
        Self::new()
    }
}

fn wolf_quota_for(wave: u32) -> u32 {
    (2 * (wave as i64 - 3)).max(0) as u32
}

fn edge_spawn(world_size: Vec2, rng: &mut SimRng) -> EdgeSpawn {
    let position = match rng.pick_edge() {
        0 => Vec2::new(rng.gen_range_f64(0.0, world_size.x), 0.0),
        1 => Vec2::new(world_size.x, rng.gen_range_f64(0.0, world_size.y)),
        2 => Vec2::new(rng.gen_range_f64(0.0, world_size.x), world_size.y),
        _ => Vec2::new(0.0, rng.gen_range_f64(0.0, world_size.y)),
    };
    EdgeSpawn { position }
}

fn interior_spawn(world_size: Vec2, rng: &mut SimRng) -> Vec2 {
    Vec2::new(
        rng.gen_range_f64(world_size.x * 0.1, world_size.x * 0.9),
        rng.gen_range_f64(world_size.y * 0.1, world_size.y * 0.9),
    )
}

//! Wolf manager (spec §4.M, manager half): creates/destroys wolves, scales
//! health/damage by difficulty and wave, offers bulk spawn, and answers
//! queries (living, by id, statistics). Pack bookkeeping is delegated to
//! [`crate::pack`]; the engine façade (`direwood-engine`) drives per-tick
//! orchestration (phase 2 of spec §4.M) by calling [`WolfManager::update`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use direwood_core::constants::{WOLF_DAMAGE, WOLF_HEALTH};
use direwood_core::entity::EntityId;
use direwood_core::kinds::{EntityKind, WolfData, WolfRole};
use direwood_core::math::Vec2;
use direwood_core::rng::SimRng;
use direwood_core::store::{EntityHeader, EntityStore};
use direwood_sim::pathfinder::{Grid, PathCache};

use crate::pack::{self, MemberFacts, Pack};
use crate::wolf::{self, Perception};

/// Scaled stats for a freshly spawned wolf (spec §4.M "scales health/damage
/// by `difficulty x 1.1^(wave-1)`").
pub fn scaled_stats(difficulty: f64, wave: u32) -> (f64, f64) {
    let factor = difficulty * 1.1f64.powi(wave as i32 - 1);
    (WOLF_HEALTH * factor, WOLF_DAMAGE * factor)
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WolfStatistics {
    pub living: usize,
    pub pack_count: usize,
    pub total_kills: u32,
}

pub struct WolfManager {
    pub difficulty: f64,
    packs: HashMap<u32, Pack>,
    next_pack_id: u32,
    wolf_to_pack: HashMap<EntityId, u32>,
    rng: SimRng,
}

impl WolfManager {
    pub fn new(seed: u64, difficulty: f64) -> Self {
        Self {
            difficulty,
            packs: HashMap::new(),
            next_pack_id: 0,
            wolf_to_pack: HashMap::new(),
            rng: SimRng::new(seed),
        }
    }

    /// Spawn one wolf at `position`, scaled for `wave`. If `is_alpha`, also
    /// spawns `pack_members` supporting wolves nearby and links all of them
    /// into a new pack (spec §4.F "linking all into one pack").
    pub fn spawn(
        &mut self,
        store: &mut EntityStore,
        position: Vec2,
        is_alpha: bool,
        pack_members: u32,
        wave: u32,
        spawn_tick: u64,
    ) -> EntityId {
        let (health, damage) = scaled_stats(self.difficulty, wave);

        let role = if is_alpha { WolfRole::Alpha } else { WolfRole::Chaser };
        let id = self.spawn_one(store, position, role, health, damage, spawn_tick);

        if is_alpha {
            let pack_id = self.next_pack_id;
            self.next_pack_id += 1;
            let mut pack = Pack::new(pack_id, id);
            self.wolf_to_pack.insert(id, pack_id);

            for i in 0..pack_members {
                let angle = std::f64::consts::TAU * (i as f64) / (pack_members.max(1) as f64);
                let offset = Vec2::new(angle.cos(), angle.sin()).scale(3.0);
                let role = [WolfRole::Chaser, WolfRole::Flanker, WolfRole::Support][i as usize % 3];
                let member_id =
                    self.spawn_one(store, position.add(offset), role, health, damage, spawn_tick);
                pack.members.push(member_id);
                self.wolf_to_pack.insert(member_id, pack_id);
            }

            if let Some(EntityKind::Wolf(wolf_data)) = store.get_mut(id).map(|e| &mut e.kind) {
                wolf_data.pack_id = Some(pack_id);
            }
            for &member_id in &pack.members.clone() {
                if let Some(EntityKind::Wolf(wolf_data)) = store.get_mut(member_id).map(|e| &mut e.kind) {
                    wolf_data.pack_id = Some(pack_id);
                }
            }
            self.packs.insert(pack_id, pack);
        }

        id
    }

    fn spawn_one(
        &mut self,
        store: &mut EntityStore,
        position: Vec2,
        role: WolfRole,
        health: f64,
        damage: f64,
        spawn_tick: u64,
    ) -> EntityId {
        let header = EntityHeader::new(position, 0.6, health, spawn_tick);
        let mut wolf_data = WolfData::new(position, role);
        wolf_data.damage = damage;
        store.create(header, EntityKind::Wolf(wolf_data))
    }

    /// Bulk spawn at random points along the map edge or scattered around a
    /// center (spec §4.M "bulk spawn at map edges or around a point").
    pub fn bulk_spawn_around(
        &mut self,
        store: &mut EntityStore,
        center: Vec2,
        count: u32,
        radius: f64,
        wave: u32,
        spawn_tick: u64,
    ) -> Vec<EntityId> {
        (0..count)
            .map(|_| {
                let angle = self.rng.gen_range_f64(0.0, std::f64::consts::TAU);
                let r = self.rng.gen_range_f64(0.0, radius);
                let position = center.add(Vec2::new(angle.cos(), angle.sin()).scale(r));
                self.spawn(store, position, false, 0, wave, spawn_tick)
            })
            .collect()
    }

    pub fn despawn(&mut self, id: EntityId) {
        if let Some(pack_id) = self.wolf_to_pack.remove(&id) {
            if let Some(pack) = self.packs.get_mut(&pack_id) {
                pack.members.retain(|&m| m != id);
            }
        }
    }

    /// Look up the pack a wolf belongs to, distinguishing "no such wolf in
    /// the store" (spec §7 internal-assertion category) from "a real,
    /// solitary wolf" (`Ok(None)`).
    pub fn pack_of(
        &self,
        store: &EntityStore,
        id: EntityId,
    ) -> Result<Option<u32>, crate::error::WolfError> {
        match store.get(id) {
            Some(e) if matches!(e.kind, EntityKind::Wolf(_)) => Ok(self.wolf_to_pack.get(&id).copied()),
            _ => Err(crate::error::WolfError::UnknownWolf(id)),
        }
    }

    pub fn living(&self, store: &EntityStore) -> Vec<EntityId> {
        store
            .iter_active()
            .filter(|(_, e)| matches!(e.kind, EntityKind::Wolf(_)) && !e.header.is_dead())
            .map(|(id, _)| id)
            .collect()
    }

    pub fn statistics(&self, store: &EntityStore) -> WolfStatistics {
        let living = self.living(store);
        let total_kills = living
            .iter()
            .filter_map(|id| store.get(*id))
            .filter_map(|e| e.kind.as_wolf())
            .map(|w| w.kills)
            .sum();
        WolfStatistics {
            living: living.len(),
            pack_count: self.packs.iter().filter(|(_, p)| !p.is_empty()).count(),
            total_kills,
        }
    }

    /// Drive every pack, then every wolf's FSM/behavior update (spec §4.M
    /// phase 2). `target` is the single local player's `(id, position,
    /// velocity)`, resolved once per tick by the engine façade.
    #[allow(clippy::too_many_arguments)]
    pub fn update(
        &mut self,
        store: &mut EntityStore,
        grid: &Grid,
        path_cache: &mut PathCache,
        target: Option<(EntityId, Vec2, Vec2)>,
        now_tick: u64,
        dt_ms: f64,
    ) {
        self.update_packs(store, target.map(|(_, p, _)| p), dt_ms);

        let wolf_ids: Vec<EntityId> = self
            .living(store)
            .into_iter()
            .filter(|id| target.map(|(tid, _, _)| tid != *id).unwrap_or(true))
            .collect();

        for id in wolf_ids {
            let position = match store.get(id) {
                Some(e) => e.header.position,
                None => continue,
            };
            let health_ratio = match store.get(id) {
                Some(e) => {
                    if e.header.max_health <= 0.0 {
                        0.0
                    } else {
                        e.header.health / e.header.max_health
                    }
                }
                None => continue,
            };
            let pack_id = store.get(id).and_then(|e| e.kind.as_wolf()).and_then(|w| w.pack_id);
            let (pack_centroid, pack_size) = pack_id
                .and_then(|pid| self.packs.get(&pid))
                .map(|pack| {
                    let positions: Vec<Vec2> = pack
                        .members
                        .iter()
                        .filter_map(|m| store.get(*m))
                        .map(|e| e.header.position)
                        .collect();
                    let centroid = if positions.is_empty() {
                        position
                    } else {
                        positions.iter().fold(Vec2::ZERO, |a, &b| a.add(b)).scale(1.0 / positions.len() as f64)
                    };
                    (Some(centroid), pack.members.len())
                })
                .unwrap_or((None, 1));

            let perception = Perception {
                target_position: target.map(|(_, p, _)| p),
                target_velocity: target.map(|(_, _, v)| v).unwrap_or(Vec2::ZERO),
                pack_centroid,
                pack_size,
                health_ratio,
            };

            let Some(entity) = store.get_mut(id) else { continue };
            let Some(wolf_data) = entity.kind.as_wolf_mut() else { continue };
            let result = wolf::update(
                wolf_data,
                position,
                &perception,
                grid,
                path_cache,
                now_tick,
                dt_ms,
                &mut self.rng,
            );
            entity.header.velocity = result.velocity;
        }
    }

    fn update_packs(&mut self, store: &EntityStore, target_position: Option<Vec2>, dt_ms: f64) {
        for pack in self.packs.values_mut() {
            let members: Vec<MemberFacts> = pack
                .members
                .iter()
                .map(|&id| match store.get(id) {
                    Some(e) if !e.header.is_dead() => MemberFacts {
                        id,
                        position: e.header.position,
                        health_ratio: e.header.health / e.header.max_health.max(f64::EPSILON),
                        aggression: e.kind.as_wolf().map(|w| w.aggression).unwrap_or(0.0),
                        kills: e.kind.as_wolf().map(|w| w.kills).unwrap_or(0),
                        alive: true,
                    },
                    _ => MemberFacts {
                        id,
                        position: Vec2::ZERO,
                        health_ratio: 0.0,
                        aggression: 0.0,
                        kills: 0,
                        alive: false,
                    },
                })
                .collect();
            pack::update(pack, &members, target_position, 0, dt_ms);
        }
        self.packs.retain(|_, p| !p.is_empty());
    }
}

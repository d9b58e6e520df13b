//! The entity store (spec §3 "Entity" / §4.B): an indexed slot array keyed by
//! [`EntityId`], owning the generational allocator plus a shared header for
//! every entity regardless of variant.
//!
//! This replaces the teacher's generic archetype/component/query machinery.
//! Spec §9's design note is explicit that the simulation's entity set is a
//! small, closed tagged union, not an open component set -- so the store
//! keeps a plain `Vec<Option<Entity>>` slot array and dispatches on
//! [`crate::kinds::EntityKind`] by pattern match rather than by querying
//! component sets.

use serde::{Deserialize, Serialize};

use crate::constants::MAX_ENTITIES;
use crate::entity::{EntityAllocator, EntityId};
use crate::error::CoreError;
use crate::kinds::EntityKind;
use crate::math::Vec2;

/// Fields common to every entity variant (spec §3 "Entity" shared attributes).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityHeader {
    pub position: Vec2,
    pub velocity: Vec2,
    pub radius: f64,
    pub health: f64,
    pub max_health: f64,
    pub facing: f64,
    /// Monotonically increasing tick at which this entity was created, used
    /// to break ties deterministically in iteration order and by the spatial
    /// index's tests.
    pub spawn_tick: u64,
}

impl EntityHeader {
    pub fn new(position: Vec2, radius: f64, health: f64, spawn_tick: u64) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            radius,
            health: health.max(0.0),
            max_health: health,
            facing: 0.0,
            spawn_tick,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    /// Apply damage, clamped so health never goes negative (spec §3
    /// invariant `0 <= health <= maxHealth`).
    pub fn apply_damage(&mut self, amount: f64) {
        self.health = (self.health - amount.max(0.0)).max(0.0);
    }

    pub fn heal(&mut self, amount: f64) {
        self.health = (self.health + amount.max(0.0)).min(self.max_health);
    }
}

/// One live entity: the shared header plus its variant data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub header: EntityHeader,
    pub kind: EntityKind,
    /// Set by the collision/wave systems during the tick; swept to actual
    /// removal only at `compact` so that within-tick observers (e.g. the
    /// wolf pack coordinator counting living members) see a consistent view.
    pub pending_removal: bool,
}

impl Entity {
    pub fn new(header: EntityHeader, kind: EntityKind) -> Self {
        Self {
            header,
            kind,
            pending_removal: false,
        }
    }
}

/// Owns every entity in the simulation (spec §4.B).
///
/// `EntityStore` is the *only* place variant data lives; systems borrow it
/// mutably for the duration of a phase and never hold onto `&Entity`/`&mut
/// Entity` across a tick boundary -- only [`EntityId`] handles are held
/// across phases (e.g. a wolf's `target_id`).
#[derive(Debug, Default)]
pub struct EntityStore {
    allocator: EntityAllocator,
    slots: Vec<Option<Entity>>,
    /// Insertion order, used by `iter_active` so iteration is deterministic
    /// and stable under hashing for the determinism test (spec §8 S5).
    order: Vec<EntityId>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self {
            allocator: EntityAllocator::new(),
            slots: Vec::new(),
            order: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.allocator.alive_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_full(&self) -> bool {
        self.len() >= MAX_ENTITIES
    }

    /// Create a new entity. Returns [`EntityId::INVALID`] if the store is at
    /// `MAX_ENTITIES` capacity (spec §7: creation at capacity is a silent
    /// no-op that returns the sentinel, not an error).
    pub fn create(&mut self, header: EntityHeader, kind: EntityKind) -> EntityId {
        if self.is_full() {
            return EntityId::INVALID;
        }
        let id = self.allocator.allocate();
        let idx = id.index() as usize;
        if idx >= self.slots.len() {
            self.slots.resize_with(idx + 1, || None);
        }
        self.slots[idx] = Some(Entity::new(header, kind));
        self.order.push(id);
        id
    }

    /// Fallible variant of [`EntityStore::create`] for callers that want to
    /// distinguish "store full" from "succeeded" without inspecting the
    /// sentinel (used by internal tests; the public engine API uses the
    /// sentinel form per spec §7).
    pub fn try_create(&mut self, header: EntityHeader, kind: EntityKind) -> Result<EntityId, CoreError> {
        if self.is_full() {
            return Err(CoreError::StoreFull(self.len()));
        }
        Ok(self.create(header, kind))
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        if !self.allocator.is_alive(id) {
            return None;
        }
        self.slots.get(id.index() as usize)?.as_ref()
    }

    /// Fallible variant of [`EntityStore::get`] for callers that want to
    /// distinguish "stale or never allocated" from "succeeded" (used by
    /// internal assertions; gameplay systems use the `Option` form per
    /// spec §7).
    pub fn try_get(&self, id: EntityId) -> Result<&Entity, CoreError> {
        self.get(id).ok_or(CoreError::StaleEntity(id))
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        if !self.allocator.is_alive(id) {
            return None;
        }
        self.slots.get_mut(id.index() as usize)?.as_mut()
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.allocator.is_alive(id)
    }

    /// Borrow two distinct, alive entities mutably at once (spec §4.D pair
    /// dispatch needs to mutate both sides of a collision). Returns `None`
    /// if either id is missing/stale or the two ids refer to the same slot.
    pub fn get_two_mut(&mut self, a: EntityId, b: EntityId) -> Option<(&mut Entity, &mut Entity)> {
        if a.index() == b.index() {
            return None;
        }
        if !self.allocator.is_alive(a) || !self.allocator.is_alive(b) {
            return None;
        }
        let (ai, bi) = (a.index() as usize, b.index() as usize);
        let (lo, hi, swapped) = if ai < bi { (ai, bi, false) } else { (bi, ai, true) };
        let (left, right) = self.slots.split_at_mut(hi);
        let lo_entity = left.get_mut(lo)?.as_mut()?;
        let hi_entity = right.first_mut()?.as_mut()?;
        if swapped {
            Some((hi_entity, lo_entity))
        } else {
            Some((lo_entity, hi_entity))
        }
    }

    /// Mark an entity for removal at the next `compact`. Returns `true` if
    /// the entity existed and was not already marked.
    pub fn mark_removed(&mut self, id: EntityId) -> bool {
        match self.get_mut(id) {
            Some(entity) if !entity.pending_removal => {
                entity.pending_removal = true;
                true
            }
            _ => false,
        }
    }

    /// Remove an entity immediately, bypassing the `pending_removal` flag.
    /// Used by tests and by the allocator's own bookkeeping; gameplay systems
    /// should prefer `mark_removed` + `compact` so in-tick iteration stays
    /// stable (spec §4.B).
    pub fn remove(&mut self, id: EntityId) -> bool {
        if !self.allocator.deallocate(id) {
            return false;
        }
        self.slots[id.index() as usize] = None;
        self.order.retain(|&existing| existing != id);
        true
    }

    /// Iterate over every currently-alive entity in insertion order,
    /// regardless of `pending_removal` (used mid-tick, before `compact`).
    pub fn iter_active(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.order.iter().filter_map(move |&id| {
            self.slots
                .get(id.index() as usize)
                .and_then(|slot| slot.as_ref())
                .map(|entity| (id, entity))
        })
    }

    pub fn iter_active_mut(&mut self) -> impl Iterator<Item = (EntityId, &mut Entity)> {
        let order = &self.order;
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(move |(idx, slot)| {
                let entity = slot.as_mut()?;
                let id = *order.iter().find(|id| id.index() as usize == idx)?;
                Some((id, entity))
            })
    }

    /// Sweep every entity marked `pending_removal` or dead (`health <= 0`,
    /// excluding obstacles which never take health damage to zero in a way
    /// that should auto-despawn -- see `direwood-sim`'s collision system for
    /// the destructible-obstacle special case) out of the store. Called once
    /// per tick at the end of the tick order (spec §4.M phase 9).
    ///
    /// Returns the ids removed this call, in removal order.
    pub fn compact(&mut self) -> Vec<EntityId> {
        let mut removed = Vec::new();
        let to_remove: Vec<EntityId> = self
            .order
            .iter()
            .copied()
            .filter(|&id| {
                self.slots
                    .get(id.index() as usize)
                    .and_then(|slot| slot.as_ref())
                    .map(|e| e.pending_removal || e.header.is_dead())
                    .unwrap_or(false)
            })
            .collect();
        for id in to_remove {
            if self.remove(id) {
                removed.push(id);
            }
        }
        removed
    }
}

//! Uniform-grid spatial index (spec §4.C): broad-phase candidate queries for
//! the collision system and the wolf perception/pathfinder systems.
//!
//! Rebuilt from scratch every tick rather than incrementally updated --
//! entity counts are small enough (`MAX_ENTITIES`) that a full rebuild is
//! cheaper than tracking per-cell diffs, and a rebuild sidesteps an entire
//! class of staleness bugs from entities moving between cells mid-tick.

use std::collections::HashMap;

use crate::constants::SPATIAL_CELL_SIZE;
use crate::entity::EntityId;
use crate::math::Vec2;
use crate::store::EntityStore;

pub type CellCoord = (i32, i32);

#[inline]
fn cell_of(position: Vec2, cell_size: f64) -> CellCoord {
    (
        (position.x / cell_size).floor() as i32,
        (position.y / cell_size).floor() as i32,
    )
}

/// A uniform grid mapping cell coordinates to the entities whose position
/// falls in that cell.
#[derive(Debug, Default)]
pub struct SpatialIndex {
    cell_size: f64,
    cells: HashMap<CellCoord, Vec<EntityId>>,
}

impl SpatialIndex {
    pub fn new() -> Self {
        Self {
            cell_size: SPATIAL_CELL_SIZE,
            cells: HashMap::new(),
        }
    }

    pub fn with_cell_size(cell_size: f64) -> Self {
        Self {
            cell_size,
            cells: HashMap::new(),
        }
    }

    /// Rebuild the index from the current contents of `store` (spec §4.M:
    /// run once per tick, before the collision phase).
    pub fn rebuild(&mut self, store: &EntityStore) {
        self.cells.clear();
        for (id, entity) in store.iter_active() {
            let cell = cell_of(entity.header.position, self.cell_size);
            self.cells.entry(cell).or_default().push(id);
        }
    }

    /// Every entity sharing a cell with, or an immediately adjacent cell to,
    /// `position` within `radius`. Conservative: candidates still need a
    /// precise narrow-phase test, but nothing within `radius` is missed
    /// provided `radius <= cell_size` (true for every query radius used by
    /// `direwood-sim`).
    pub fn query_near(&self, position: Vec2, radius: f64) -> Vec<EntityId> {
        let (cx, cy) = cell_of(position, self.cell_size);
        let span = (radius / self.cell_size).ceil() as i32 + 1;
        let mut out = Vec::new();
        for dx in -span..=span {
            for dy in -span..=span {
                if let Some(ids) = self.cells.get(&(cx + dx, cy + dy)) {
                    out.extend(ids.iter().copied());
                }
            }
        }
        out
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }
}

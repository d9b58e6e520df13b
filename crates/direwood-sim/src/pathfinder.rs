//! Grid pathfinder (spec §4.H): A* with an 8-connected neighborhood, a
//! bounded path cache, and Bresenham line-of-sight smoothing.
//!
//! The line-of-sight helper is exposed separately (spec §4.H "used by the
//! perception system") for `direwood-wolf`'s stalk/ambush detection checks.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, VecDeque};

use direwood_core::constants::{PATHFINDER_NODE_LIMIT, PATH_CACHE_CAPACITY, PATH_CACHE_TTL_SECONDS};
use direwood_core::math::Vec2;

pub type Cell = (i32, i32);

/// A walkable/blocked grid over world space, addressed by integer cell.
#[derive(Debug, Clone)]
pub struct Grid {
    pub cell_size: f64,
    pub width: i32,
    pub height: i32,
    blocked: Vec<bool>,
}

impl Grid {
    pub fn new(width: i32, height: i32, cell_size: f64) -> Self {
        Self {
            cell_size,
            width,
            height,
            blocked: vec![false; (width.max(0) as usize) * (height.max(0) as usize)],
        }
    }

    fn index(&self, cell: Cell) -> Option<usize> {
        if cell.0 < 0 || cell.1 < 0 || cell.0 >= self.width || cell.1 >= self.height {
            None
        } else {
            Some((cell.1 * self.width + cell.0) as usize)
        }
    }

    pub fn set_blocked(&mut self, cell: Cell, blocked: bool) {
        if let Some(idx) = self.index(cell) {
            self.blocked[idx] = blocked;
        }
    }

    pub fn is_blocked(&self, cell: Cell) -> bool {
        self.index(cell).map(|i| self.blocked[i]).unwrap_or(true)
    }

    pub fn world_to_cell(&self, position: Vec2) -> Cell {
        (
            (position.x / self.cell_size).floor() as i32,
            (position.y / self.cell_size).floor() as i32,
        )
    }

    pub fn cell_center(&self, cell: Cell) -> Vec2 {
        Vec2::new(
            (cell.0 as f64 + 0.5) * self.cell_size,
            (cell.1 as f64 + 0.5) * self.cell_size,
        )
    }

    /// Bresenham line-of-sight: `true` if every cell the line from `a` to `b`
    /// crosses is unblocked (spec §4.H "line-of-sight helper").
    pub fn line_of_sight(&self, a: Cell, b: Cell) -> bool {
        let (mut x0, mut y0) = a;
        let (x1, y1) = b;
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            if self.is_blocked((x0, y0)) {
                return false;
            }
            if x0 == x1 && y0 == y1 {
                return true;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }
}

const NEIGHBORS: [(i32, i32, f64); 8] = [
    (1, 0, 1.0),
    (-1, 0, 1.0),
    (0, 1, 1.0),
    (0, -1, 1.0),
    (1, 1, std::f64::consts::SQRT_2),
    (1, -1, std::f64::consts::SQRT_2),
    (-1, 1, std::f64::consts::SQRT_2),
    (-1, -1, std::f64::consts::SQRT_2),
];

fn heuristic(a: Cell, b: Cell) -> f64 {
    let dx = (a.0 - b.0) as f64;
    let dy = (a.1 - b.1) as f64;
    (dx * dx + dy * dy).sqrt()
}

#[derive(PartialEq)]
struct OpenEntry {
    cost: f64,
    cell: Cell,
}

impl Eq for OpenEntry {}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .partial_cmp(&self.cost)
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A* search bounded by `PATHFINDER_NODE_LIMIT` expansions (spec §4.H).
/// Returns `None` if the limit is exceeded before reaching `goal`.
fn astar(grid: &Grid, start: Cell, goal: Cell) -> Option<Vec<Cell>> {
    if grid.is_blocked(start) || grid.is_blocked(goal) {
        return None;
    }

    let mut open = BinaryHeap::new();
    let mut came_from: HashMap<Cell, Cell> = HashMap::new();
    let mut g_score: HashMap<Cell, f64> = HashMap::new();
    g_score.insert(start, 0.0);
    open.push(OpenEntry {
        cost: heuristic(start, goal),
        cell: start,
    });

    let mut expansions = 0u32;

    while let Some(OpenEntry { cell: current, .. }) = open.pop() {
        if current == goal {
            return Some(reconstruct(&came_from, current));
        }

        expansions += 1;
        if expansions > PATHFINDER_NODE_LIMIT {
            tracing::warn!(
                "{}",
                crate::error::SimError::PathfinderNodeLimitExceeded(expansions)
            );
            return None;
        }

        let current_g = *g_score.get(&current).unwrap_or(&f64::INFINITY);
        for (dx, dy, cost) in NEIGHBORS {
            let neighbor = (current.0 + dx, current.1 + dy);
            if grid.is_blocked(neighbor) {
                continue;
            }
            let tentative = current_g + cost;
            if tentative < *g_score.get(&neighbor).unwrap_or(&f64::INFINITY) {
                came_from.insert(neighbor, current);
                g_score.insert(neighbor, tentative);
                open.push(OpenEntry {
                    cost: tentative + heuristic(neighbor, goal),
                    cell: neighbor,
                });
            }
        }
    }

    None
}

fn reconstruct(came_from: &HashMap<Cell, Cell>, mut current: Cell) -> Vec<Cell> {
    let mut path = vec![current];
    while let Some(&prev) = came_from.get(&current) {
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}

/// Remove any waypoint `w_i` such that `w_{i-1}` has line-of-sight to
/// `w_{i+1}` (spec §4.H smoothing pass).
fn smooth(grid: &Grid, path: Vec<Cell>) -> Vec<Cell> {
    if path.len() < 3 {
        return path;
    }
    let mut result = vec![path[0]];
    let mut anchor = 0;
    let mut i = 2;
    while i < path.len() {
        if grid.line_of_sight(path[anchor], path[i]) {
            i += 1;
        } else {
            result.push(path[i - 1]);
            anchor = i - 1;
            i += 1;
        }
    }
    result.push(*path.last().unwrap());
    result
}

struct CacheEntry {
    path: Vec<Vec2>,
    expires_at_tick: u64,
}

/// Bounded start/goal-keyed path cache (spec §4.H "cached ... for 5s"),
/// evicted FIFO once at capacity -- same idiom as `direwood-core`'s
/// `EntityAllocator` free list.
pub struct PathCache {
    entries: HashMap<(Cell, Cell), CacheEntry>,
    order: VecDeque<(Cell, Cell)>,
    ticks_per_second: f64,
}

impl PathCache {
    pub fn new(ticks_per_second: f64) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            ticks_per_second,
        }
    }

    fn ttl_ticks(&self) -> u64 {
        (PATH_CACHE_TTL_SECONDS * self.ticks_per_second) as u64
    }

    pub fn get(&self, start: Cell, goal: Cell, now_tick: u64) -> Option<&[Vec2]> {
        self.entries
            .get(&(start, goal))
            .filter(|e| e.expires_at_tick > now_tick)
            .map(|e| e.path.as_slice())
    }

    fn insert(&mut self, start: Cell, goal: Cell, path: Vec<Vec2>, now_tick: u64) {
        let key = (start, goal);
        if !self.entries.contains_key(&key) {
            if self.order.len() >= PATH_CACHE_CAPACITY {
                if let Some(oldest) = self.order.pop_front() {
                    self.entries.remove(&oldest);
                }
            }
            self.order.push_back(key);
        }
        self.entries.insert(
            key,
            CacheEntry {
                path,
                expires_at_tick: now_tick + self.ttl_ticks(),
            },
        );
    }
}

/// Find a smoothed world-space path from `start` to `goal`, consulting and
/// populating `cache`.
pub fn find_path(
    grid: &Grid,
    cache: &mut PathCache,
    start: Vec2,
    goal: Vec2,
    now_tick: u64,
) -> Option<Vec<Vec2>> {
    let start_cell = grid.world_to_cell(start);
    let goal_cell = grid.world_to_cell(goal);

    if let Some(cached) = cache.get(start_cell, goal_cell, now_tick) {
        return Some(cached.to_vec());
    }

    let raw = astar(grid, start_cell, goal_cell)?;
    let smoothed = smooth(grid, raw);
    let world_path: Vec<Vec2> = smoothed.into_iter().map(|c| grid.cell_center(c)).collect();
    cache.insert(start_cell, goal_cell, world_path.clone(), now_tick);
    Some(world_path)
}

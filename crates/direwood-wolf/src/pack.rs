//! Pack coordinator (spec §4.L): per-tick morale/coordination updates,
//! tactic/formation selection, and howl coordination for one pack of wolves.

use serde::{Deserialize, Serialize};

use direwood_core::constants::{
    ATTACK_RANGE, COORDINATION_RANGE, HOWL_COOLDOWN_MS, HOWL_MORALE_BONUS, HOWL_STAGGER_MS,
    MORALE_MAX, MORALE_MIN,
};
use direwood_core::entity::EntityId;
use direwood_core::math::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tactic {
    Retreat,
    Surround,
    Hunt,
    Drive,
    Pincer,
    Harass,
    Overwhelm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Formation {
    Scattered,
    Encircle,
    Pincer,
    Line,
}

/// A member's role assignment for this tick's tactic (spec §4.L step 6).
#[derive(Debug, Clone, Copy)]
pub struct MemberAssignment {
    pub member: EntityId,
    pub move_target: Vec2,
    pub is_driver: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pack {
    pub id: u32,
    pub alpha: EntityId,
    pub members: Vec<EntityId>,
    pub morale: f64,
    pub coordination: f64,
    pub tactic: Tactic,
    pub formation: Formation,
    pub howl_cooldown_ms: f64,
    pub howls_pending: Vec<(EntityId, f64)>,
}

impl Pack {
    pub fn new(id: u32, alpha: EntityId) -> Self {
        Self {
            id,
            alpha,
            members: vec![alpha],
            morale: 1.0,
            coordination: 0.5,
            tactic: Tactic::Hunt,
            formation: Formation::Scattered,
            howl_cooldown_ms: 0.0,
            howls_pending: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Per-member live facts the pack coordinator needs (resolved from the
/// entity store by the manager, spec §9 "resolve via the entity store").
pub struct MemberFacts {
    pub id: EntityId,
    pub position: Vec2,
    pub health_ratio: f64,
    pub aggression: f64,
    pub kills: u32,
    pub alive: bool,
}

/// Run the per-tick pack steps (spec §4.L steps 1-6). `recent_kills` counts
/// kills by pack members since the last tick. Returns the per-member
/// assignments for this tick's tactic, or an empty vec if the pack disbanded.
pub fn update(
    pack: &mut Pack,
    members: &[MemberFacts],
    target_position: Option<Vec2>,
    recent_kills: u32,
    dt_ms: f64,
) -> Vec<MemberAssignment> {
    pack.howl_cooldown_ms = (pack.howl_cooldown_ms - dt_ms).max(0.0);

    // Step 1: prune dead members; disband if empty.
    let living: Vec<&MemberFacts> = members.iter().filter(|m| m.alive).collect();
    pack.members = living.iter().map(|m| m.id).collect();
    if living.is_empty() {
        return Vec::new();
    }

    // Step 2: elect a new alpha if the current one is gone.
    let alpha_alive = living.iter().any(|m| m.id == pack.alpha);
    if !alpha_alive {
        match living.iter().max_by(|a, b| {
            alpha_score(a)
                .partial_cmp(&alpha_score(b))
                .unwrap_or(std::cmp::Ordering::Equal)
        }) {
            Some(best) => pack.alpha = best.id,
            // Unreachable given the `living.is_empty()` return above -- kept
            // as a logged invariant check rather than a silent no-op.
            None => tracing::warn!("{}", crate::error::WolfError::NoElectableAlpha(pack.id)),
        }
    }
    let alpha_alive = living.iter().any(|m| m.id == pack.alpha);

    // Step 3: morale.
    let avg_health_ratio = living.iter().map(|m| m.health_ratio).sum::<f64>() / living.len() as f64;
    let size = living.len() as f64;
    let morale = (1.0 + 0.1 * (size - 1.0)) * avg_health_ratio
        + 0.15 * recent_kills as f64
        + if alpha_alive { 0.2 } else { 0.0 };
    pack.morale = morale.clamp(MORALE_MIN, MORALE_MAX);

    // Step 4: coordination.
    let centroid = centroid_of(&living);
    let avg_dist = living.iter().map(|m| m.position.distance(centroid)).sum::<f64>() / size;
    let drift = 0.001 * dt_ms;
    pack.coordination = if avg_dist < COORDINATION_RANGE {
        (pack.coordination + drift).min(1.0)
    } else {
        (pack.coordination - drift).max(0.0)
    };

    // Step 5: choose tactic/formation.
    let distance_to_target = target_position.map(|t| t.distance(centroid)).unwrap_or(f64::INFINITY);
    let (tactic, formation) = choose_tactic(
        avg_health_ratio,
        distance_to_target,
        living.len(),
        pack.coordination,
        pack.morale,
    );
    pack.tactic = tactic;
    pack.formation = formation;

    // Step 6: per-member assignments.
    assign_members(&living, target_position.unwrap_or(centroid), tactic)
}

fn alpha_score(m: &MemberFacts) -> f64 {
    m.health_ratio + m.aggression + 0.1 * m.kills as f64
}

fn centroid_of(members: &[&MemberFacts]) -> Vec2 {
    let sum = members
        .iter()
        .fold(Vec2::ZERO, |acc, m| acc.add(m.position));
    sum.scale(1.0 / members.len() as f64)
}

fn choose_tactic(
    pack_health_ratio: f64,
    distance_to_target: f64,
    pack_size: usize,
    coordination: f64,
    morale: f64,
) -> (Tactic, Formation) {
    if pack_health_ratio < 0.3 {
        return (Tactic::Retreat, Formation::Scattered);
    }
    if morale > 1.0 && pack_size >= 3 && distance_to_target <= ATTACK_RANGE {
        return (Tactic::Overwhelm, Formation::Encircle);
    }
    if distance_to_target > COORDINATION_RANGE {
        return (Tactic::Surround, Formation::Encircle);
    }
    if coordination > 0.7 {
        return (Tactic::Drive, Formation::Pincer);
    }
    (Tactic::Harass, Formation::Line)
}

fn assign_members(
    members: &[&MemberFacts],
    target_position: Vec2,
    tactic: Tactic,
) -> Vec<MemberAssignment> {
    let n = members.len();
    match tactic {
        Tactic::Surround | Tactic::Overwhelm => members
            .iter()
            .enumerate()
            .map(|(i, m)| {
                let angle = 2.0 * std::f64::consts::PI * (i as f64) / (n as f64);
                let offset = Vec2::new(angle.cos(), angle.sin()).scale(2.0 * ATTACK_RANGE);
                MemberAssignment {
                    member: m.id,
                    move_target: target_position.add(offset),
                    is_driver: false,
                }
            })
            .collect(),
        Tactic::Drive | Tactic::Pincer => members
            .iter()
            .enumerate()
            .map(|(i, m)| {
                let is_driver = i % 2 == 0;
                MemberAssignment {
                    member: m.id,
                    move_target: target_position,
                    is_driver,
                }
            })
            .collect(),
        _ => members
            .iter()
            .map(|m| MemberAssignment {
                member: m.id,
                move_target: target_position,
                is_driver: false,
            })
            .collect(),
    }
}

/// Attempt to trigger a pack howl: at most once per `HOWL_COOLDOWN_MS`. The
/// alpha howls immediately, each follower staggered by `HOWL_STAGGER_MS`
/// (spec §4.L / scenario S3). Returns `false` if the cooldown hasn't elapsed.
pub fn trigger_howl(pack: &mut Pack) -> bool {
    if pack.howl_cooldown_ms > 0.0 {
        return false;
    }
    pack.howl_cooldown_ms = HOWL_COOLDOWN_MS;
    pack.howls_pending.clear();
    let mut stagger = 0.0;
    for &member in &pack.members {
        if member == pack.alpha {
            pack.howls_pending.push((member, 0.0));
        } else {
            stagger += HOWL_STAGGER_MS;
            pack.howls_pending.push((member, stagger));
        }
    }
    pack.morale = (pack.morale + HOWL_MORALE_BONUS).min(MORALE_MAX);
    true
}

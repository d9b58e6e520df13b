//! Visual-effects buffer (spec §4.G): append-only particle/shake records
//! consumed by the renderer, with no effect on gameplay logic.
//!
//! The buffer is drained (read, then cleared of fully-decayed entries) once
//! per tick by the engine façade's snapshot phase (spec §4.M phase 8/10).

use serde::{Deserialize, Serialize};

use direwood_core::math::Vec2;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    pub size: f64,
    pub alpha: f64,
    /// Packed RGBA, renderer-defined encoding.
    pub color: u32,
    pub remaining_ms: f64,
}

/// Screen-shake state: a decaying magnitude applied by the renderer.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ScreenShake {
    pub magnitude: f64,
    pub remaining_ms: f64,
}

#[derive(Debug, Default)]
pub struct VfxBuffer {
    particles: Vec<Particle>,
    shake: ScreenShake,
}

impl VfxBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn_particle(&mut self, particle: Particle) {
        self.particles.push(particle);
    }

    pub fn trigger_shake(&mut self, magnitude: f64, duration_ms: f64) {
        if magnitude > self.shake.magnitude {
            self.shake = ScreenShake {
                magnitude,
                remaining_ms: duration_ms,
            };
        }
    }

    /// Advance every particle and the screen shake, pruning anything fully
    /// decayed (spec §4.G "visual-effects buffer decays" -- phase 8).
    pub fn decay(&mut self, dt_ms: f64) {
        for particle in &mut self.particles {
            particle.position = particle.position.add(particle.velocity.scale(dt_ms / 1000.0));
            particle.remaining_ms -= dt_ms;
            particle.alpha = (particle.remaining_ms / 1000.0).clamp(0.0, 1.0);
        }
        self.particles.retain(|p| p.remaining_ms > 0.0);

        self.shake.remaining_ms = (self.shake.remaining_ms - dt_ms).max(0.0);
        if self.shake.remaining_ms <= 0.0 {
            self.shake.magnitude = 0.0;
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn shake(&self) -> ScreenShake {
        self.shake
    }
}

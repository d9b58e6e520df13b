//! wasm-bindgen bindings exposing [`direwood_engine::GameEngine`] to a
//! browser host (spec §6, §9 "the wasm boundary").
//!
//! This crate owns no simulation logic of its own -- it is a thin
//! translation layer: JS numbers/arrays in, [`GameEngine`] method calls,
//! snapshot structs back out as `JsValue` via `serde-wasm-bindgen`, the same
//! shape `warp-wasm` uses at the browser boundary in the pack example.

#![deny(unsafe_code)]

use wasm_bindgen::prelude::*;

use direwood_core::entity::EntityId;
use direwood_core::kinds::{ObstacleShape, PowerUpType};
use direwood_engine::{EngineConfig, GameEngine};

#[cfg(feature = "console-panic")]
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

fn power_up_from_u8(value: u8) -> PowerUpType {
    match value {
        0 => PowerUpType::Health,
        1 => PowerUpType::Energy,
        2 => PowerUpType::Shield,
        3 => PowerUpType::Speed,
        4 => PowerUpType::Damage,
        5 => PowerUpType::RapidFire,
        _ => PowerUpType::MultiShot,
    }
}

fn obstacle_shape_from_u8(value: u8) -> ObstacleShape {
    match value {
        0 => ObstacleShape::Circle,
        1 => ObstacleShape::Square,
        _ => ObstacleShape::Rectangle,
    }
}

fn to_js<T: serde::Serialize>(value: &T) -> JsValue {
    serde_wasm_bindgen::to_value(value).unwrap_or(JsValue::NULL)
}

/// The browser-facing handle. One instance per game session; the host keeps
/// it alive for the lifetime of the page and calls `update` once per
/// `requestAnimationFrame` (spec §5 "the host drives ticks via a frame
/// callback; the engine does not own its loop").
#[wasm_bindgen]
pub struct WasmEngine {
    inner: GameEngine,
}

#[wasm_bindgen]
impl WasmEngine {
    #[wasm_bindgen(constructor)]
    pub fn new(world_width: f64, world_height: f64, seed: f64) -> WasmEngine {
        // JS numbers are f64; seeds arrive truncated to the integer part.
        let config = EngineConfig::new(world_width, world_height, seed as u64);
        WasmEngine {
            inner: GameEngine::new(config),
        }
    }

    // -- Lifecycle ----------------------------------------------------------

    pub fn start_game(&mut self) {
        self.inner.start_game();
    }

    pub fn pause(&mut self) {
        self.inner.pause();
    }

    pub fn resume(&mut self) {
        self.inner.resume();
    }

    pub fn restart(&mut self) {
        self.inner.restart();
    }

    pub fn end_game(&mut self) {
        self.inner.end_game();
    }

    pub fn set_world_bounds(&mut self, width: f64, height: f64) {
        self.inner.set_world_bounds(width, height);
    }

    // -- Mutation -------------------------------------------------------------

    pub fn create_player(&mut self, x: f64, y: f64) -> f64 {
        self.inner.create_player(x, y).to_raw() as f64
    }

    pub fn create_enemy(&mut self, x: f64, y: f64) -> f64 {
        self.inner.create_enemy(x, y).to_raw() as f64
    }

    pub fn create_wolf(&mut self, x: f64, y: f64, is_alpha: bool) -> f64 {
        self.inner.create_wolf(x, y, is_alpha).to_raw() as f64
    }

    pub fn create_projectile(
        &mut self,
        x: f64,
        y: f64,
        dir_x: f64,
        dir_y: f64,
        damage: f64,
        owner_id: f64,
    ) -> f64 {
        let owner = EntityId::from_raw(owner_id as u64);
        self.inner
            .create_projectile(x, y, dir_x, dir_y, damage, owner)
            .to_raw() as f64
    }

    pub fn create_power_up(&mut self, x: f64, y: f64, kind: u8) -> f64 {
        self.inner
            .create_power_up(x, y, power_up_from_u8(kind))
            .to_raw() as f64
    }

    #[allow(clippy::too_many_arguments)]
    pub fn create_obstacle(
        &mut self,
        x: f64,
        y: f64,
        shape: u8,
        half_extent_x: f64,
        half_extent_y: f64,
        destructible: bool,
    ) -> f64 {
        self.inner
            .create_obstacle(
                x,
                y,
                obstacle_shape_from_u8(shape),
                half_extent_x,
                half_extent_y,
                destructible,
            )
            .to_raw() as f64
    }

    pub fn remove_entity(&mut self, id: f64) {
        self.inner.remove_entity(EntityId::from_raw(id as u64));
    }

    pub fn generate_obstacles(&mut self, count: u32, ensure_playability: bool) {
        self.inner.generate_obstacles(count, ensure_playability);
    }

    pub fn clear_entities(&mut self) {
        self.inner.clear_entities();
    }

    // -- Player input -----------------------------------------------------------

    pub fn update_player_input(&mut self, dx: f64, dy: f64, aim_x: f64, aim_y: f64) {
        self.inner.update_player_input(dx, dy, aim_x, aim_y);
    }

    pub fn player_shoot(&mut self, aim_x: f64, aim_y: f64) {
        self.inner.player_shoot(aim_x, aim_y);
    }

    pub fn activate_boost(&mut self) {
        self.inner.activate_boost();
    }

    pub fn deactivate_boost(&mut self) {
        self.inner.deactivate_boost();
    }

    pub fn start_block(&mut self) {
        self.inner.start_block();
    }

    pub fn end_block(&mut self) {
        self.inner.end_block();
    }

    pub fn perform_attack(&mut self, angle: f64) {
        self.inner.perform_attack(angle);
    }

    pub fn perform_roll(&mut self, dir_x: f64, dir_y: f64) {
        self.inner.perform_roll(dir_x, dir_y);
    }

    // -- Tick -------------------------------------------------------------------

    pub fn update(&mut self, dt_seconds: f64) {
        self.inner.update(dt_seconds);
    }

    // -- Snapshots ------------------------------------------------------------

    pub fn entity_positions(&self) -> JsValue {
        to_js(&self.inner.entity_positions())
    }

    pub fn player_state(&self) -> JsValue {
        to_js(&self.inner.player_state())
    }

    pub fn game_state(&self) -> JsValue {
        to_js(&self.inner.game_state())
    }

    pub fn performance_metrics(&self) -> JsValue {
        to_js(&self.inner.performance_metrics())
    }

    pub fn wave_info(&self) -> JsValue {
        to_js(&self.inner.wave_info())
    }

    pub fn visual_effects(&self) -> JsValue {
        #[derive(serde::Serialize)]
        struct VfxOut {
            shake: direwood_sim::vfx::ScreenShake,
            particles: Vec<direwood_sim::vfx::Particle>,
        }
        let (shake, particles) = self.inner.visual_effects();
        to_js(&VfxOut {
            shake,
            particles: particles.to_vec(),
        })
    }

    pub fn state_hash(&self) -> String {
        self.inner.state_hash()
    }
}

//! Scenario S5 (spec §8): same seed, same input sequence, same dt -> byte-
//! identical state hash after N ticks, run twice from scratch.

use direwood_engine::{EngineConfig, GameEngine};

const SEED: u64 = 42;
const WORLD_WIDTH: f64 = 800.0;
const WORLD_HEIGHT: f64 = 600.0;
const TICKS: u32 = 600;
const DT: f64 = 1.0 / 60.0;

fn run_scenario() -> String {
    let mut engine = GameEngine::new(EngineConfig::new(WORLD_WIDTH, WORLD_HEIGHT, SEED));
    engine.start_game();
    engine.create_player(WORLD_WIDTH / 2.0, WORLD_HEIGHT / 2.0);
    engine.generate_obstacles(10, true);

    for tick in 0..TICKS {
        let angle = tick as f64 * 0.013;
        engine.update_player_input(angle.cos(), angle.sin(), 1.0, 0.0);
        if tick % 37 == 0 {
            engine.player_shoot(1.0, 0.0);
        }
        engine.update(DT);
    }

    engine.state_hash()
}

#[test]
fn identical_seed_and_input_sequence_produces_identical_hash() {
    let first = run_scenario();
    let second = run_scenario();
    assert_eq!(first, second, "two runs with the same seed/inputs must hash identically");
}

#[test]
fn differing_seed_is_extremely_unlikely_to_collide() {
    let mut a = GameEngine::new(EngineConfig::new(WORLD_WIDTH, WORLD_HEIGHT, 1));
    a.start_game();
    a.create_player(WORLD_WIDTH / 2.0, WORLD_HEIGHT / 2.0);
    a.generate_obstacles(10, true);

    let mut b = GameEngine::new(EngineConfig::new(WORLD_WIDTH, WORLD_HEIGHT, 2));
    b.start_game();
    b.create_player(WORLD_WIDTH / 2.0, WORLD_HEIGHT / 2.0);
    b.generate_obstacles(10, true);

    for _ in 0..TICKS {
        a.update(DT);
        b.update(DT);
    }

    assert_ne!(a.state_hash(), b.state_hash());
}

#[test]
fn paused_engine_does_not_advance_tick_count() {
    let mut engine = GameEngine::new(EngineConfig::new(WORLD_WIDTH, WORLD_HEIGHT, SEED));
    engine.start_game();
    engine.create_player(100.0, 100.0);
    engine.update(DT);
    let ticks_before = engine.tick_count();

    engine.pause();
    engine.update(DT);
    engine.update(DT);
    assert_eq!(engine.tick_count(), ticks_before);

    engine.resume();
    engine.update(DT);
    assert_eq!(engine.tick_count(), ticks_before + 1);
}

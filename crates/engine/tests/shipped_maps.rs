use std::path::PathBuf;
use std::time::Duration;

use tilerun_engine::sim::Sprite;
use tilerun_engine::{
    discover_map_numbers, InputAction, InputSnapshot, LevelLoader, MapDirectoryLoader, NullAudio,
    Simulation, SimulationConfig,
};

fn maps_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../maps")
}

#[test]
fn shipped_maps_form_a_consecutive_sequence() {
    let numbers = discover_map_numbers(&maps_dir()).expect("discover");
    assert!(!numbers.is_empty());
    let expected = (1..=numbers.len() as u32).collect::<Vec<_>>();
    assert_eq!(numbers, expected);
}

#[test]
fn every_shipped_map_has_a_goal_and_wraps_back() {
    let count = discover_map_numbers(&maps_dir()).expect("discover").len();
    let mut loader = MapDirectoryLoader::new(maps_dir(), SimulationConfig::default());
    for number in 1..=count {
        let level = loader.load_next_level().expect("load");
        assert_eq!(level.name(), format!("map{number}"));
        let has_goal = level.sprites().iter().any(|sprite| {
            matches!(sprite, Sprite::Pickup(pickup) if pickup.kind.as_token() == "goal")
        });
        assert!(has_goal, "map{number} has no goal");
    }
    let wrapped = loader.load_next_level().expect("wrap");
    assert_eq!(wrapped.name(), "map1");
}

#[test]
fn player_lands_on_the_first_map() {
    let loader = MapDirectoryLoader::new(maps_dir(), SimulationConfig::default());
    let mut sim =
        Simulation::new(SimulationConfig::default(), loader, NullAudio, None).expect("simulation");
    let idle = InputSnapshot::empty();
    for _ in 0..120 {
        sim.update(Duration::from_millis(16), &idle).expect("update");
    }
    let player = sim.level().player();
    assert!(player.is_alive());
    assert!(player.creature().is_grounded());
    let bottom = player.body().position.y + player.body().height();
    assert!(bottom <= sim.level().grid().pixel_height());

    let report = sim
        .update(
            Duration::from_millis(16),
            &idle.with_action_pressed(InputAction::Exit),
        )
        .expect("update");
    assert!(report.exit_requested);
}

//! End-to-end checks: a JSON config file drives the headless simulation.

use std::fs;
use std::path::PathBuf;

use catcher::config::{ConfigError, SimulationConfig};
use catcher::geometry::BoundaryDirection;
use catcher::pursuit::{PursuerId, PursuitState};
use catcher::Simulation;
use rstest::{fixture, rstest};

const LEFT_AMBUSH: &str = r#"{
    "coordinator": { "game_over_delay": 0.25, "cooldown_between_pursuers": 0.0 },
    "pursuers": [
        { "boundary": "left", "contact": "distance", "touch_radius": 0.5 },
        { "boundary": "right" }
    ],
    "scenario": {
        "target_start": [-4.0, 0.0],
        "target_velocity": [-3.0, 0.0]
    }
}"#;

/// Writes `contents` to a file unique to this test process.
struct ConfigFile(PathBuf);

impl ConfigFile {
    fn new(name: &str, contents: &str) -> Self {
        let file_name = format!("catcher-{}-{name}.json", std::process::id());
        let path = std::env::temp_dir().join(file_name);
        fs::write(&path, contents).expect("write temp config");
        Self(path)
    }
}

impl Drop for ConfigFile {
    fn drop(&mut self) {
        fs::remove_file(&self.0).ok();
    }
}

#[fixture]
fn left_ambush() -> ConfigFile {
    ConfigFile::new("left-ambush", LEFT_AMBUSH)
}

#[rstest]
fn config_file_is_loaded_in_registration_order(left_ambush: ConfigFile) {
    let config = SimulationConfig::load_from_path(&left_ambush.0).expect("config loads");
    let edges: Vec<_> = config.pursuers.iter().map(|p| p.boundary).collect();
    assert_eq!(edges, vec![BoundaryDirection::Left, BoundaryDirection::Right]);
    assert_eq!(config.scenario.view_half_extents, glam::Vec2::new(10.0, 5.0));
}

#[rstest]
fn loaded_scenario_ends_in_a_catch(left_ambush: ConfigFile) {
    let config = SimulationConfig::load_from_path(&left_ambush.0).expect("config loads");
    let mut simulation = Simulation::new(&config);
    let report = simulation.run(1_200, 1.0 / 60.0).clone();

    assert_eq!(report.caught_by, Some(PursuerId(0)));
    assert!(report.game_over);
    assert!(report.ticks < 1_200, "run should stop after game over");
    let right = simulation.coordinator().pursuer(PursuerId(1)).expect("registered");
    assert_eq!(right.state(), PursuitState::Hidden);
}

#[rstest]
fn unreadable_file_reports_its_path() {
    let missing = std::env::temp_dir().join("catcher-no-such-config.json");
    let err = SimulationConfig::load_from_path(&missing).expect_err("missing file");
    assert!(matches!(err, ConfigError::Read { .. }));
    assert!(err.to_string().contains("catcher-no-such-config.json"));
}

#[rstest]
fn invalid_boundary_name_is_rejected() {
    let file = ConfigFile::new("bad-edge", r#"{ "pursuers": [{ "boundary": "diagonal" }] }"#);
    let err = SimulationConfig::load_from_path(&file.0).expect_err("bad boundary");
    assert!(matches!(err, ConfigError::Parse(_)));
}

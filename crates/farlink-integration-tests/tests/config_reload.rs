//! Configuration files driving a live session.
//!
//! Loads snapshots through `farlink-data`, hands them to the session tick by
//! tick, and checks that a reload takes effect on the next tick only.

use std::fs;
use std::path::{Path, PathBuf};

use farlink_core::config::{ActionKind, Key, Modifiers};
use farlink_core::failure::{ControlFailure, NodeLookupFailure};
use farlink_core::fixed::f64_to_fixed64;
use farlink_core::host::{Endpoint, Severity};
use farlink_core::hotkey::InputSnapshot;
use farlink_core::orchestrator::ControlSuccess;
use farlink_core::session::ControlSession;
use farlink_core::test_utils::*;
use farlink_data::{ConfigLoadError, ConfigStore, SchemaError, find_config_file};

fn make_test_dir(suffix: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "farlink_integration_{suffix}_{}",
        std::process::id()
    ));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn cleanup(dir: &Path) {
    let _ = fs::remove_dir_all(dir);
}

#[test]
fn rebinding_takes_effect_after_reload() {
    let dir = make_test_dir("rebind");
    let path = dir.join("farlink.toml");
    fs::write(&path, "minor_duration = 1.5\n").unwrap();

    let mut world = TestWorld::new();
    let ship = world.add_structure("Ship");
    let remote = world.add_control_node(ship, "Remote", owner());
    world.aim_at_structure(ship);
    let controller = world.spawn_character(owner(), "Engineer", 1.0);
    world.connect_relay(Endpoint::Entity(controller_entity(&controller)), ship);

    let mut store = ConfigStore::open(&path).unwrap();
    let mut session = ControlSession::new();
    let alt_b = InputSnapshot::chord(Key::B, Modifiers::ALT);
    let f8 = InputSnapshot::chord(Key::F8, Modifiers::NONE);
    let idle = InputSnapshot::new();

    let config = store.snapshot();
    let outcome = session.update_before_simulation(&mut world, &controller, &alt_b, &config);
    assert!(matches!(outcome, Some(Ok(ControlSuccess::ControlTaken { .. }))));
    assert_eq!(world.notifications[0].duration_ms, 1500);

    fs::write(
        &path,
        "[bindings.take_control]\nkey = \"F8\"\n",
    )
    .unwrap();
    store.reload(&path).unwrap();
    assert_eq!(store.generation(), 1);

    let config = store.snapshot();
    session.update_before_simulation(&mut world, &controller, &idle, &config);
    assert!(
        session
            .update_before_simulation(&mut world, &controller, &alt_b, &config)
            .is_none()
    );
    session.update_before_simulation(&mut world, &controller, &idle, &config);
    let outcome = session.update_before_simulation(&mut world, &controller, &f8, &config);
    assert!(matches!(outcome, Some(Ok(ControlSuccess::ControlTaken { .. }))));
    assert_eq!(world.control_requests, vec![remote, remote]);
    assert_eq!(world.notifications[1].duration_ms, 2000);

    cleanup(&dir);
}

#[test]
fn disabling_recursive_search_from_file() {
    let dir = make_test_dir("recursive");
    fs::write(dir.join("farlink.ron"), "(recursive_search: false)").unwrap();
    let path = find_config_file(&dir, "farlink").unwrap().unwrap();
    let store = ConfigStore::open(&path).unwrap();
    let config = store.snapshot();

    let mut world = TestWorld::new();
    let ship = world.add_structure("Ship");
    let tug = world.add_structure("Tug");
    world.add_control_node(tug, "Tug Remote", owner());
    world.link(ship, tug);
    world.aim_at_structure(ship);
    let controller = world.spawn_character(owner(), "Engineer", 1.0);
    world.connect_relay(Endpoint::Entity(controller_entity(&controller)), ship);

    let binding = *config.binding(ActionKind::TakeControl);
    let press = InputSnapshot::chord(binding.key, binding.modifiers());
    let mut session = ControlSession::new();
    let outcome = session.update_before_simulation(&mut world, &controller, &press, &config);

    assert_eq!(
        outcome,
        Some(Err(ControlFailure::NodeLookup(
            NodeLookupFailure::NoFunctionalControlNode
        )))
    );
    assert_eq!(world.notifications[0].severity, Severity::Failure);

    cleanup(&dir);
}

#[test]
fn broken_reload_keeps_session_running() {
    let dir = make_test_dir("broken");
    let path = dir.join("farlink.json");
    fs::write(&path, r#"{"urgent_duration": 3.0}"#).unwrap();
    let mut store = ConfigStore::open(&path).unwrap();

    fs::write(&path, r#"{"urgent_duration": "#).unwrap();
    assert!(matches!(
        store.reload(&path),
        Err(ConfigLoadError::Parse { .. })
    ));

    let mut world = TestWorld::new();
    world.aim_at_nothing();
    let controller = world.spawn_character(owner(), "Engineer", 1.0);
    let mut session = ControlSession::new();
    let config = store.snapshot();
    let press = InputSnapshot::chord(Key::R, Modifiers::ALT);
    let outcome = session.update_before_simulation(&mut world, &controller, &press, &config);

    assert!(matches!(outcome, Some(Err(ControlFailure::Targeting(_)))));
    assert_eq!(world.notifications[0].duration_ms, 3000);

    cleanup(&dir);
}

#[test]
fn out_of_range_reload_keeps_ray_distance() {
    let dir = make_test_dir("ray_range");
    let path = dir.join("farlink.json");
    fs::write(&path, r#"{"max_ray_distance": 50.0}"#).unwrap();
    let mut store = ConfigStore::open(&path).unwrap();

    fs::write(&path, r#"{"max_ray_distance": 1e12}"#).unwrap();
    assert!(matches!(
        store.reload(&path),
        Err(ConfigLoadError::Invalid {
            error: SchemaError::RayDistanceOutOfRange { .. },
            ..
        })
    ));
    assert_eq!(store.generation(), 0);

    let mut world = TestWorld::new();
    world.aim_at_nothing();
    let controller = world.spawn_character(owner(), "Engineer", 1.0);
    let mut session = ControlSession::new();
    let config = store.snapshot();
    let press = InputSnapshot::chord(Key::B, Modifiers::ALT);
    let outcome = session.update_before_simulation(&mut world, &controller, &press, &config);

    assert!(matches!(outcome, Some(Err(ControlFailure::Targeting(_)))));
    assert_eq!(
        world.last_ray().map(|ray| ray.max_distance),
        Some(f64_to_fixed64(50.0))
    );

    cleanup(&dir);
}

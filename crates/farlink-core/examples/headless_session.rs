//! Drive a control session against the in-memory world for a few ticks.
//!
//! Run with `RUST_LOG=farlink_core=debug` to see the diagnostic stream.

use farlink_core::config::{ControlConfig, Key, Modifiers};
use farlink_core::host::Endpoint;
use farlink_core::hotkey::InputSnapshot;
use farlink_core::session::ControlSession;
use farlink_core::test_utils::*;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut world = TestWorld::new();
    let base = world.add_structure("Home Base");
    let rover = world.add_structure("Rover");
    let trailer = world.add_structure("Trailer");
    world.link(rover, trailer);
    world.add_control_node(trailer, "Trailer Remote", owner());
    world.set_identity_name(owner(), "Engineer");

    let controller = world.spawn_character(owner(), "Engineer", 0.8);
    world.connect_relay(Endpoint::Entity(controller_entity(&controller)), rover);
    world.aim_at_structure(rover);

    let config = ControlConfig::default();
    let mut session = ControlSession::new();
    let idle = InputSnapshot::new();
    let take = InputSnapshot::chord(Key::B, Modifiers::ALT);
    let terminal = InputSnapshot::chord(Key::B, Modifiers::ALT_SHIFT);

    let script = [&take, &take, &idle, &terminal, &idle];
    for (tick, input) in script.into_iter().enumerate() {
        if let Some(outcome) = session.update_before_simulation(&mut world, &controller, input, &config) {
            println!("tick {tick}: {outcome:?}");
        }
    }

    world.aim_at_structure(base);
    let outcome = session.update_before_simulation(&mut world, &controller, &take, &config);
    println!("unreachable base: {outcome:?}");

    for notification in &world.notifications {
        println!("[{:?} {}ms] {}", notification.severity, notification.duration_ms, notification.text);
    }
}

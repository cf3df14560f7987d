//! Farlink Core -- remote structure control for tick-driven game hosts.
//!
//! This crate lets a player aim at a distant structure and, through
//! edge-triggered hotkeys, take remote control of it, cycle or shut down its
//! power, or open its control panel. Everything runs synchronously inside the
//! host's "before simulation" callback; the host supplies raycasting, relay
//! connectivity, structure data, and notification sinks through the traits
//! in [`host`].
//!
//! # Per-Tick Pipeline
//!
//! Each call to [`session::ControlSession::update_before_simulation`] runs:
//!
//! 1. **Edge detection** -- Poll the four bindings and fire at most one
//!    action on the rising edge of "any binding pressed".
//! 2. **Targeting** -- Cast a ray from the viewpoint and resolve the hit to
//!    a structure or a typed rejection.
//! 3. **Preconditions** -- Apply the controlled-entity checklist (suit
//!    energy, broadcaster, relay reachability) and the power check.
//! 4. **Dispatch** -- Clear the main control node designation, locate a
//!    control node (optionally across linked structures), verify
//!    permissions, and execute the action.
//! 5. **Report** -- Exactly one HUD notification plus one diagnostic log
//!    event per dispatched action.
//!
//! # Key Types
//!
//! - [`session::ControlSession`] -- Per-player driver owning the edge flag.
//! - [`hotkey::HotkeyEdgeDetector`] -- Rising-edge detection over bindings.
//! - [`target::resolve_target`] -- Ray hit classification.
//! - [`reachability::is_reachable`] -- Mutual relay reachability query.
//! - [`locator::locate_control_node`] -- Cycle-safe control node search.
//! - [`orchestrator::dispatch`] -- Ordered validation and action execution.
//! - [`config::ControlConfig`] -- Immutable configuration snapshot.
//! - [`failure::ControlFailure`] -- Typed, user-facing rejection reasons.

pub mod config;
pub mod failure;
pub mod fixed;
pub mod host;
pub mod hotkey;
pub mod id;
pub mod locator;
pub mod orchestrator;
pub mod reachability;
pub mod session;
pub mod target;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

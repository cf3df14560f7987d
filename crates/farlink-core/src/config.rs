//! Immutable configuration snapshot consumed once per tick.
//!
//! The host owns loading, editing, and persisting configuration; the core
//! only ever reads a [`ControlConfig`] handed to it for the current tick.
//! Hot-reload is a matter of handing a different snapshot to the next tick.

use serde::{Deserialize, Serialize};

use crate::fixed::{Fixed64, f64_to_fixed64};

/// Default maximum distance (world units) for the targeting ray.
pub const DEFAULT_MAX_RAY_DISTANCE: f64 = 1000.0;

/// Default display time for failure notifications.
pub const DEFAULT_URGENT_DURATION_MS: u32 = 4000;

/// Default display time for success notifications.
pub const DEFAULT_MINOR_DURATION_MS: u32 = 2000;

/// Lower bound for configured notification display time.
pub const MIN_DURATION_MS: u32 = 100;

/// Upper bound for configured notification display time.
pub const MAX_DURATION_MS: u32 = 5000;

// ---------------------------------------------------------------------------
// Keys and bindings
// ---------------------------------------------------------------------------

/// A keyboard key that can anchor a hotkey binding.
#[rustfmt::skip]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Key {
    A, B, C, D, E, F, G, H, I, J, K, L, M,
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,
    D0, D1, D2, D3, D4, D5, D6, D7, D8, D9,
    F1, F2, F3, F4, F5, F6, F7, F8, F9, F10, F11, F12,
    Insert, Delete, Home, End, PageUp, PageDown,
}

/// Live state of the modifier keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Modifiers {
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub alt: bool,
    #[serde(default)]
    pub shift: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        ctrl: false,
        alt: false,
        shift: false,
    };
    pub const ALT: Modifiers = Modifiers {
        ctrl: false,
        alt: true,
        shift: false,
    };
    pub const ALT_SHIFT: Modifiers = Modifiers {
        ctrl: false,
        alt: true,
        shift: true,
    };
}

/// A key chord bound to one action. Compared by value.
///
/// A binding is pressed only when its key is down and the live modifiers
/// match its modifier flags exactly, so `Alt+B` and `Alt+Shift+B` never
/// satisfy each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HotkeyBinding {
    pub key: Key,
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub alt: bool,
    #[serde(default)]
    pub shift: bool,
}

impl HotkeyBinding {
    pub const fn new(key: Key, modifiers: Modifiers) -> Self {
        Self {
            key,
            ctrl: modifiers.ctrl,
            alt: modifiers.alt,
            shift: modifiers.shift,
        }
    }

    pub fn modifiers(&self) -> Modifiers {
        Modifiers {
            ctrl: self.ctrl,
            alt: self.alt,
            shift: self.shift,
        }
    }

    /// Whether this chord is satisfied by the given key and modifier state.
    pub fn matches(&self, key_down: bool, live: Modifiers) -> bool {
        key_down && self.modifiers() == live
    }
}

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

/// The four remote actions a hotkey can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    TakeControl,
    CyclePower,
    ShutdownPower,
    OpenTerminal,
}

impl ActionKind {
    pub const COUNT: usize = 4;

    /// All actions in binding priority order. When several chords are
    /// satisfied in the same tick, the earliest one wins.
    pub const ALL: [ActionKind; Self::COUNT] = [
        ActionKind::TakeControl,
        ActionKind::CyclePower,
        ActionKind::ShutdownPower,
        ActionKind::OpenTerminal,
    ];

    /// Whether this action needs a control node on the target.
    pub fn needs_control_node(self) -> bool {
        !matches!(self, ActionKind::OpenTerminal)
    }
}

// ---------------------------------------------------------------------------
// ControlConfig
// ---------------------------------------------------------------------------

/// The configuration snapshot for one tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    pub take_control: HotkeyBinding,
    pub cycle_power: HotkeyBinding,
    pub shutdown_power: HotkeyBinding,
    pub open_terminal: HotkeyBinding,
    /// Search physically linked structures when the target has no
    /// functional control node of its own.
    pub recursive_search: bool,
    /// Display time for failure notifications, in milliseconds.
    pub urgent_duration_ms: u32,
    /// Display time for success notifications, in milliseconds.
    pub minor_duration_ms: u32,
    pub max_ray_distance: Fixed64,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            take_control: HotkeyBinding::new(Key::B, Modifiers::ALT),
            cycle_power: HotkeyBinding::new(Key::R, Modifiers::ALT),
            shutdown_power: HotkeyBinding::new(Key::R, Modifiers::ALT_SHIFT),
            open_terminal: HotkeyBinding::new(Key::B, Modifiers::ALT_SHIFT),
            recursive_search: true,
            urgent_duration_ms: DEFAULT_URGENT_DURATION_MS,
            minor_duration_ms: DEFAULT_MINOR_DURATION_MS,
            max_ray_distance: f64_to_fixed64(DEFAULT_MAX_RAY_DISTANCE),
        }
    }
}

impl ControlConfig {
    /// The binding configured for an action.
    pub fn binding(&self, action: ActionKind) -> &HotkeyBinding {
        match action {
            ActionKind::TakeControl => &self.take_control,
            ActionKind::CyclePower => &self.cycle_power,
            ActionKind::ShutdownPower => &self.shutdown_power,
            ActionKind::OpenTerminal => &self.open_terminal,
        }
    }

    /// Bindings paired with their actions, in priority order.
    pub fn bindings(&self) -> impl Iterator<Item = (ActionKind, &HotkeyBinding)> {
        ActionKind::ALL
            .into_iter()
            .map(move |action| (action, self.binding(action)))
    }
}

/// Convert a display time in seconds to clamped milliseconds.
pub fn duration_secs_to_ms(secs: f64) -> u32 {
    let ms = (secs * 1000.0).round();
    if ms.is_nan() {
        return MIN_DURATION_MS;
    }
    (ms as i64).clamp(MIN_DURATION_MS as i64, MAX_DURATION_MS as i64) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bindings_match_reference_chords() {
        let config = ControlConfig::default();
        assert_eq!(config.take_control, HotkeyBinding::new(Key::B, Modifiers::ALT));
        assert_eq!(config.cycle_power, HotkeyBinding::new(Key::R, Modifiers::ALT));
        assert_eq!(
            config.shutdown_power,
            HotkeyBinding::new(Key::R, Modifiers::ALT_SHIFT)
        );
        assert_eq!(
            config.open_terminal,
            HotkeyBinding::new(Key::B, Modifiers::ALT_SHIFT)
        );
        assert!(config.recursive_search);
        assert_eq!(config.urgent_duration_ms, 4000);
        assert_eq!(config.minor_duration_ms, 2000);
    }

    #[test]
    fn binding_requires_exact_modifiers() {
        let alt_b = HotkeyBinding::new(Key::B, Modifiers::ALT);
        assert!(alt_b.matches(true, Modifiers::ALT));
        assert!(!alt_b.matches(true, Modifiers::ALT_SHIFT));
        assert!(!alt_b.matches(true, Modifiers::NONE));
        assert!(!alt_b.matches(false, Modifiers::ALT));
    }

    #[test]
    fn bindings_iterate_in_priority_order() {
        let config = ControlConfig::default();
        let order: Vec<ActionKind> = config.bindings().map(|(a, _)| a).collect();
        assert_eq!(order, ActionKind::ALL.to_vec());
    }

    #[test]
    fn only_open_terminal_skips_node_lookup() {
        assert!(ActionKind::TakeControl.needs_control_node());
        assert!(ActionKind::CyclePower.needs_control_node());
        assert!(ActionKind::ShutdownPower.needs_control_node());
        assert!(!ActionKind::OpenTerminal.needs_control_node());
    }

    #[test]
    fn duration_is_clamped() {
        assert_eq!(duration_secs_to_ms(2.0), 2000);
        assert_eq!(duration_secs_to_ms(0.0), 100);
        assert_eq!(duration_secs_to_ms(12.0), 5000);
        assert_eq!(duration_secs_to_ms(f64::NAN), 100);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let config: ControlConfig =
            serde_json::from_str(r#"{"recursive_search":false}"#).unwrap();
        assert!(!config.recursive_search);
        assert_eq!(config.take_control, ControlConfig::default().take_control);
    }

    #[test]
    fn binding_deserializes_with_default_modifiers() {
        let binding: HotkeyBinding = serde_json::from_str(r#"{"key":"F5"}"#).unwrap();
        assert_eq!(binding, HotkeyBinding::new(Key::F5, Modifiers::NONE));
    }
}

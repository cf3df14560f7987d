//! Edge-triggered hotkey detection.
//!
//! Each tick the four bindings are sampled in priority order. An action fires
//! only on the transition from "no binding pressed last tick" to "some binding
//! pressed this tick"; holding a chord (or sliding from one chord into another
//! without releasing) fires nothing further until every binding is released.

use std::collections::BTreeSet;

use crate::config::{ActionKind, ControlConfig, Key, Modifiers};

/// Raw keyboard state for the current tick.
pub trait KeyInput {
    fn is_key_down(&self, key: Key) -> bool;

    fn modifiers(&self) -> Modifiers;
}

/// An owned keyboard snapshot. Useful for hosts that poll input once per
/// frame and for tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    keys: BTreeSet<Key>,
    modifiers: Modifiers,
}

impl InputSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_key(mut self, key: Key) -> Self {
        self.keys.insert(key);
        self
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// A snapshot with exactly one chord held.
    pub fn chord(key: Key, modifiers: Modifiers) -> Self {
        Self::new().with_key(key).with_modifiers(modifiers)
    }
}

impl KeyInput for InputSnapshot {
    fn is_key_down(&self, key: Key) -> bool {
        self.keys.contains(&key)
    }

    fn modifiers(&self) -> Modifiers {
        self.modifiers
    }
}

/// Per-binding pressed state for one tick, indexed like [`ActionKind::ALL`].
pub type BindingStates = [bool; ActionKind::COUNT];

/// Sample every configured binding against the live input.
pub fn sample_bindings<I: KeyInput + ?Sized>(config: &ControlConfig, input: &I) -> BindingStates {
    let live = input.modifiers();
    let mut states = [false; ActionKind::COUNT];
    for (slot, (_, binding)) in states.iter_mut().zip(config.bindings()) {
        *slot = binding.matches(input.is_key_down(binding.key), live);
    }
    states
}

/// The highest-priority pressed action, if any.
pub fn first_pressed(states: &BindingStates) -> Option<ActionKind> {
    ActionKind::ALL
        .into_iter()
        .zip(states.iter())
        .find_map(|(action, &pressed)| pressed.then_some(action))
}

/// Converts per-tick binding state into at most one action per press.
#[derive(Debug, Clone, Default)]
pub struct HotkeyEdgeDetector {
    pressed_last_tick: bool,
}

impl HotkeyEdgeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether any binding was pressed on the previous update.
    pub fn pressed_last_tick(&self) -> bool {
        self.pressed_last_tick
    }

    /// Advance one tick. Returns the action to fire, if this tick is a
    /// rising edge.
    pub fn update(&mut self, states: &BindingStates) -> Option<ActionKind> {
        let pressed = first_pressed(states);
        let fired = if self.pressed_last_tick { None } else { pressed };
        self.pressed_last_tick = pressed.is_some();
        fired
    }

    /// Sample the bindings and advance one tick.
    pub fn poll<I: KeyInput + ?Sized>(
        &mut self,
        config: &ControlConfig,
        input: &I,
    ) -> Option<ActionKind> {
        let states = sample_bindings(config, input);
        self.update(&states)
    }
}

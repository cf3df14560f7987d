//! Per-player driver called once per tick before the simulation step.

use tracing::trace;

use crate::config::ControlConfig;
use crate::host::{Controller, Host};
use crate::hotkey::{HotkeyEdgeDetector, KeyInput};
use crate::orchestrator::{ControlOutcome, dispatch};

/// Owns the only state that survives between ticks: the edge flag.
///
/// All calls must come from the simulation thread.
#[derive(Debug, Clone, Default)]
pub struct ControlSession {
    detector: HotkeyEdgeDetector,
    dispatched: u64,
}

impl ControlSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of actions dispatched since the session was created.
    pub fn dispatched(&self) -> u64 {
        self.dispatched
    }

    pub fn detector(&self) -> &HotkeyEdgeDetector {
        &self.detector
    }

    /// Run one tick.
    ///
    /// Does nothing while the player controls no entity; the edge flag is
    /// left as it was. Otherwise polls the bindings and, on a rising edge,
    /// dispatches the action and returns its outcome.
    pub fn update_before_simulation<H, I>(
        &mut self,
        host: &mut H,
        controller: &Controller,
        input: &I,
        config: &ControlConfig,
    ) -> Option<ControlOutcome>
    where
        H: Host + ?Sized,
        I: KeyInput + ?Sized,
    {
        if controller.controlled.is_none() {
            return None;
        }

        let action = self.detector.poll(config, input)?;
        trace!(?action, player = %controller.display_name, "hotkey rising edge");
        self.dispatched += 1;
        Some(dispatch(host, action, controller, config))
    }
}

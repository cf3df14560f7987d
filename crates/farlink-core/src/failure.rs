//! Rejection reasons produced by the validation chain.
//!
//! None of these are exceptional: each is an expected, data-driven outcome
//! that ends the current action with one HUD notification and one log event.
//! `Display` renders the player-facing text.

use tracing::Level;

use crate::host::Severity;

/// The ray did not resolve to a structure. Raised before any mutation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TargetingFailure {
    #[error("No entity in sight.")]
    NoHit,
    #[error("Looking at terrain, not a structure.")]
    HitTerrain,
    #[error("Hit an unsupported entity type. Name: {name} ({kind})")]
    HitUnsupportedEntity { name: String, kind: String },
}

/// The controller or target is not in a state that allows the action.
/// Raised before any mutation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PreconditionFailure {
    #[error("Cannot control structure: your suit energy is too low for broadcasting!")]
    SuitEnergyDepleted,
    #[error("Cannot control structure: your antenna is not broadcasting!")]
    BroadcasterDisabled,
    #[error("Cannot control structure: {target} is not reachable!")]
    UnreachableFromCharacter { target: String },
    #[error("Cannot control structure: {target} is not reachable from {origin}!")]
    UnreachableFromCockpit { target: String, origin: String },
    #[error("Cannot control structure: {target} is not powered!")]
    Unpowered { target: String },
}

/// No usable block was found. Raised after the main control node
/// designation has already been cleared.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NodeLookupFailure {
    #[error("No functional remote control block found")]
    NoFunctionalControlNode,
    #[error("No functional block found on {target}")]
    NoFunctionalBlock { target: String },
}

/// A control node was found but may not be used.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PermissionFailure {
    #[error("You don't have permission to control this structure! It is owned by {owner}")]
    AccessDenied { owner: String },
    #[error(
        "You are already controlling {structure} via {node}; cannot open a second connection."
    )]
    SessionAlreadyActive { structure: String, node: String },
    #[error("Cannot connect to remote structure {target}")]
    ControlRefused { target: String },
}

/// Any reason an action was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ControlFailure {
    #[error(transparent)]
    Targeting(#[from] TargetingFailure),
    #[error(transparent)]
    Precondition(#[from] PreconditionFailure),
    #[error(transparent)]
    NodeLookup(#[from] NodeLookupFailure),
    #[error(transparent)]
    Permission(#[from] PermissionFailure),
}

impl ControlFailure {
    /// HUD colouring for this failure.
    pub fn severity(&self) -> Severity {
        Severity::Failure
    }

    /// Level of the diagnostic log event for this failure.
    ///
    /// Targeting misses and on-foot preconditions are routine and log at
    /// debug; everything from the power check onwards logs at error.
    pub fn log_level(&self) -> Level {
        match self {
            ControlFailure::Targeting(_) => Level::DEBUG,
            ControlFailure::Precondition(PreconditionFailure::Unpowered { .. }) => Level::ERROR,
            ControlFailure::Precondition(_) => Level::DEBUG,
            ControlFailure::NodeLookup(_) | ControlFailure::Permission(_) => Level::ERROR,
        }
    }

    /// Whether the main control node designation had already been cleared
    /// when this failure was raised.
    pub fn after_designation_cleared(&self) -> bool {
        matches!(
            self,
            ControlFailure::NodeLookup(_) | ControlFailure::Permission(_)
        )
    }
}

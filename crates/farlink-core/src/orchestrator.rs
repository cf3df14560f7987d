//! Validation and dispatch of one remote action.
//!
//! [`dispatch`] runs synchronously for a single rising-edge action:
//!
//! 1. Resolve the aimed-at structure.
//! 2. Apply the controlled-entity checklist from [`required_preconditions`].
//! 3. Require the target to be powered.
//! 4. Clear the target's main control node designation, if it has one.
//! 5. Locate and vet a control node (or a functional block for the terminal)
//!    and execute the action.
//!
//! The first failing check ends the action. Step 4 runs before node lookup,
//! so later failures leave the designation cleared. Every dispatched action
//! produces exactly one notification and one log event, except an
//! `OpenTerminal` request while not on foot, which does nothing at all.

use tracing::{Level, debug, error, info};

use crate::config::{ActionKind, ControlConfig};
use crate::failure::{ControlFailure, NodeLookupFailure, PermissionFailure, PreconditionFailure};
use crate::fixed::Fixed64;
use crate::host::{
    BlockInfo, CharacterState, ControlledEntity, Controller, Endpoint, Host, Notification,
    RelayNetwork, Severity, StructureGraph,
};
use crate::id::{BlockId, StructureId};
use crate::locator::{first_functional_block, locate_control_node};
use crate::reachability::is_reachable;
use crate::target::{TargetStructure, resolve_target};

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// What a successful dispatch did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlSuccess {
    ControlTaken { node: BlockId, structure: String },
    PowerCycled { node: BlockId, structure: String },
    PowerShutDown { node: BlockId, structure: String },
    TerminalOpened { block: BlockId, structure: String },
    /// The action did not apply to the current controlled entity.
    Skipped,
}

impl ControlSuccess {
    /// HUD text for this success, `None` for silent outcomes.
    pub fn message(&self) -> Option<String> {
        match self {
            ControlSuccess::ControlTaken { structure, .. } => {
                Some(format!("Remote controlling structure {structure}"))
            }
            ControlSuccess::PowerCycled { structure, .. } => {
                Some(format!("Cycled power on structure {structure}"))
            }
            ControlSuccess::PowerShutDown { structure, .. } => {
                Some(format!("Shut down power on structure {structure}"))
            }
            ControlSuccess::TerminalOpened { structure, .. } => {
                Some(format!("Opening terminal on structure {structure}"))
            }
            ControlSuccess::Skipped => None,
        }
    }
}

/// Result of one dispatched action.
pub type ControlOutcome = Result<ControlSuccess, ControlFailure>;

// ---------------------------------------------------------------------------
// Preconditions
// ---------------------------------------------------------------------------

/// A check that depends on what the player currently controls.
#[derive(Debug, Clone, PartialEq)]
pub enum Precondition<'a> {
    /// The suit must have energy to broadcast.
    SuitEnergy(&'a CharacterState),
    /// The suit antenna must be switched on.
    Broadcasting(&'a CharacterState),
    /// The target must be reachable from the character.
    ReachableFromCharacter(&'a CharacterState),
    /// The target must be reachable from the cockpit's structure.
    ReachableFromStructure(StructureId),
}

/// The ordered checklist for a controlled entity.
pub fn required_preconditions(controlled: &ControlledEntity) -> Vec<Precondition<'_>> {
    match controlled {
        ControlledEntity::OnFoot(character) => vec![
            Precondition::SuitEnergy(character),
            Precondition::Broadcasting(character),
            Precondition::ReachableFromCharacter(character),
        ],
        ControlledEntity::InCockpit { structure, .. } => {
            vec![Precondition::ReachableFromStructure(*structure)]
        }
        ControlledEntity::RemoteNode { .. } | ControlledEntity::Other(_) => Vec::new(),
    }
}

fn check_precondition<H>(
    host: &H,
    precondition: &Precondition<'_>,
    target: &TargetStructure,
    controller: &Controller,
) -> Result<(), PreconditionFailure>
where
    H: RelayNetwork + StructureGraph + ?Sized,
{
    match precondition {
        Precondition::SuitEnergy(character) => {
            if character.suit_energy > Fixed64::ZERO {
                Ok(())
            } else {
                Err(PreconditionFailure::SuitEnergyDepleted)
            }
        }
        Precondition::Broadcasting(character) => {
            if character.broadcaster_enabled {
                Ok(())
            } else {
                Err(PreconditionFailure::BroadcasterDisabled)
            }
        }
        Precondition::ReachableFromCharacter(character) => {
            let reachable = is_reachable(
                host,
                Endpoint::Entity(character.entity),
                &character.name,
                target.id,
                &target.name,
                controller.identity,
            );
            if reachable {
                Ok(())
            } else {
                Err(PreconditionFailure::UnreachableFromCharacter {
                    target: target.name.clone(),
                })
            }
        }
        Precondition::ReachableFromStructure(source) => {
            let source_name = host.display_name(*source);
            let reachable = is_reachable(
                host,
                Endpoint::Structure(*source),
                &source_name,
                target.id,
                &target.name,
                controller.identity,
            );
            if reachable {
                Ok(())
            } else {
                Err(PreconditionFailure::UnreachableFromCockpit {
                    target: target.name.clone(),
                    origin: source_name,
                })
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Validate and execute `action` against whatever the player is aiming at,
/// then report the outcome to the host.
pub fn dispatch<H: Host + ?Sized>(
    host: &mut H,
    action: ActionKind,
    controller: &Controller,
    config: &ControlConfig,
) -> ControlOutcome {
    let outcome = execute(host, action, controller, config);
    report(host, action, &outcome, config);
    outcome
}

fn execute<H: Host + ?Sized>(
    host: &mut H,
    action: ActionKind,
    controller: &Controller,
    config: &ControlConfig,
) -> ControlOutcome {
    let view = host.view();
    let target = resolve_target(host, &view, config.max_ray_distance)?;

    if let Some(controlled) = &controller.controlled {
        for precondition in required_preconditions(controlled) {
            check_precondition(host, &precondition, &target, controller)?;
        }
    }

    if !host.is_powered(target.id) {
        return Err(PreconditionFailure::Unpowered {
            target: target.name.clone(),
        }
        .into());
    }

    // TODO: revisit whether the designation should only be cleared once a
    // usable node is confirmed; hosts currently observe it on every attempt.
    if host.has_main_control_node(target.id) {
        debug!(structure = %target.name, "clearing main control node designation");
        host.clear_main_control_node(target.id);
    }

    match action {
        ActionKind::TakeControl => {
            let node = acquire_control_node(host, &target, controller, config)?;
            host.request_control(node.id);
            Ok(ControlSuccess::ControlTaken {
                node: node.id,
                structure: host.display_name(node.structure),
            })
        }
        ActionKind::CyclePower => {
            let node = acquire_control_node(host, &target, controller, config)?;
            host.toggle_power(node.id);
            host.toggle_power(node.id);
            Ok(ControlSuccess::PowerCycled {
                node: node.id,
                structure: host.display_name(node.structure),
            })
        }
        ActionKind::ShutdownPower => {
            let node = acquire_control_node(host, &target, controller, config)?;
            host.toggle_power(node.id);
            Ok(ControlSuccess::PowerShutDown {
                node: node.id,
                structure: host.display_name(node.structure),
            })
        }
        ActionKind::OpenTerminal => open_terminal(host, &target, controller),
    }
}

/// Locate a control node for `target` and vet it for `controller`.
///
/// Checks run in order: a functional node exists, the requester has access,
/// no remote session is already live, and the node accepts control from the
/// current controlled entity.
pub fn acquire_control_node<H>(
    host: &H,
    target: &TargetStructure,
    controller: &Controller,
    config: &ControlConfig,
) -> Result<BlockInfo, ControlFailure>
where
    H: StructureGraph + ?Sized,
{
    let node = locate_control_node(host, target.id, config.recursive_search)
        .ok_or(NodeLookupFailure::NoFunctionalControlNode)?;

    if !host.has_access(node.id, controller.identity) {
        let owner = host
            .owner_name(node.id)
            .unwrap_or_else(|| "an unknown owner".to_string());
        return Err(PermissionFailure::AccessDenied { owner }.into());
    }

    if let Some(ControlledEntity::RemoteNode {
        node: current,
        structure,
    }) = &controller.controlled
    {
        let node_name = host
            .block(*current)
            .map(|block| block.name)
            .unwrap_or_else(|| "a remote control".to_string());
        return Err(PermissionFailure::SessionAlreadyActive {
            structure: host.display_name(*structure),
            node: node_name,
        }
        .into());
    }

    match &controller.controlled {
        Some(controlled) if host.can_accept_control(node.id, controlled) => Ok(node),
        _ => Err(PermissionFailure::ControlRefused {
            target: target.name.clone(),
        }
        .into()),
    }
}

fn open_terminal<H: Host + ?Sized>(
    host: &mut H,
    target: &TargetStructure,
    controller: &Controller,
) -> ControlOutcome {
    let Some(character) = controller
        .controlled
        .as_ref()
        .and_then(ControlledEntity::character)
    else {
        return Ok(ControlSuccess::Skipped);
    };

    let block = first_functional_block(host, target.id).ok_or_else(|| {
        NodeLookupFailure::NoFunctionalBlock {
            target: target.name.clone(),
        }
    })?;
    host.show_terminal(block.id, character.entity);

    Ok(ControlSuccess::TerminalOpened {
        block: block.id,
        structure: target.name.clone(),
    })
}

// ---------------------------------------------------------------------------
// Reporting
// ---------------------------------------------------------------------------

fn report<H: Host + ?Sized>(
    host: &mut H,
    action: ActionKind,
    outcome: &ControlOutcome,
    config: &ControlConfig,
) {
    match outcome {
        Ok(success) => {
            let Some(text) = success.message() else {
                debug!(?action, "action not applicable to controlled entity");
                return;
            };
            info!(?action, "{text}");
            host.notify(Notification {
                text,
                duration_ms: config.minor_duration_ms,
                severity: Severity::Success,
            });
        }
        Err(failure) => {
            let text = failure.to_string();
            log_at(failure.log_level(), action, &text);
            host.notify(Notification {
                text,
                duration_ms: config.urgent_duration_ms,
                severity: failure.severity(),
            });
        }
    }
}

fn log_at(level: Level, action: ActionKind, text: &str) {
    if level == Level::ERROR {
        error!(?action, "{text}");
    } else {
        debug!(?action, "{text}");
    }
}

//! Capabilities the host simulation provides to the core.
//!
//! The core never owns structures, blocks, or entities. It reads them and
//! invokes mutations through the traits below, all on the simulation thread.
//! A host implements every trait on one type and gets [`Host`] for free.

use crate::fixed::{Fixed64, Ray, Vec3};
use crate::id::{BlockId, EntityId, IdentityId, StructureId};

// ---------------------------------------------------------------------------
// Data handed across the boundary
// ---------------------------------------------------------------------------

/// What a targeting ray struck.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HitEntity {
    /// A structure body.
    Structure(StructureId),
    /// A block, reported together with the structure that owns it.
    Block {
        block: BlockId,
        structure: StructureId,
    },
    /// Terrain.
    Voxel,
    /// Anything else the physics layer can hit.
    Other { name: String, kind: String },
}

/// A ray hit reported by the physics layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RayHit {
    pub entity: HitEntity,
    pub position: Vec3,
}

/// The camera the player is aiming with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct View {
    pub origin: Vec3,
    /// Unit-length forward direction.
    pub forward: Vec3,
}

/// Block categories the core cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    /// A block able to accept remote control of its structure.
    ControlNode,
    Cockpit,
    Other,
}

/// A read-only view of one block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockInfo {
    pub id: BlockId,
    pub structure: StructureId,
    pub name: String,
    pub kind: BlockKind,
    /// Built, undamaged, and operational.
    pub functional: bool,
    pub owner: IdentityId,
}

impl BlockInfo {
    pub fn is_functional_control_node(&self) -> bool {
        self.functional && self.kind == BlockKind::ControlNode
    }
}

/// Either end of a relay reachability query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Entity(EntityId),
    Structure(StructureId),
}

/// Flags passed to relay path listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathQuery {
    /// Both endpoints must see each other.
    pub mutual: bool,
    /// Only relays the requester has access to count.
    pub accessible: bool,
}

/// One relay on a path found by the connectivity layer. Diagnostic only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayHop {
    pub name: String,
    pub entity: EntityId,
}

/// A character the player is embodied as.
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterState {
    pub entity: EntityId,
    pub name: String,
    pub suit_energy: Fixed64,
    pub broadcaster_enabled: bool,
}

/// What the player currently controls.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlledEntity {
    /// On foot as a character.
    OnFoot(CharacterState),
    /// Seated in a cockpit block on a structure.
    InCockpit {
        cockpit: BlockId,
        structure: StructureId,
    },
    /// Already remote-controlling a structure through a control node.
    RemoteNode {
        node: BlockId,
        structure: StructureId,
    },
    /// Any other controllable entity (turret, camera, ...).
    Other(EntityId),
}

impl ControlledEntity {
    /// The on-foot character, if that is what is controlled.
    pub fn character(&self) -> Option<&CharacterState> {
        match self {
            ControlledEntity::OnFoot(character) => Some(character),
            _ => None,
        }
    }
}

/// The player's input/control context for this tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Controller {
    pub identity: IdentityId,
    pub display_name: String,
    /// `None` while the player controls nothing (loading, spectating).
    pub controlled: Option<ControlledEntity>,
}

/// Notification colouring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Success,
    Failure,
}

/// A HUD message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub text: String,
    pub duration_ms: u32,
    pub severity: Severity,
}

// ---------------------------------------------------------------------------
// Capability traits
// ---------------------------------------------------------------------------

/// Camera access.
pub trait Viewpoint {
    fn view(&self) -> View;
}

/// The physics collaborator.
pub trait Physics {
    /// Cast a ray against the default collision layer. `None` when nothing
    /// was hit within the ray's maximum distance.
    fn cast_ray(&self, ray: &Ray) -> Option<RayHit>;
}

/// The relay/antenna connectivity collaborator.
pub trait RelayNetwork {
    /// Whether `target` is reachable from `source` for `requester`.
    fn check_connection(
        &self,
        source: Endpoint,
        target: StructureId,
        requester: IdentityId,
        mutual: bool,
    ) -> bool;

    /// Relays through which `target` is connected, for diagnostics.
    fn connected_paths(
        &self,
        target: StructureId,
        requester: IdentityId,
        query: PathQuery,
    ) -> Vec<RelayHop>;
}

/// Read access to structures and blocks.
pub trait StructureGraph {
    fn display_name(&self, structure: StructureId) -> String;

    fn is_powered(&self, structure: StructureId) -> bool;

    fn has_main_control_node(&self, structure: StructureId) -> bool;

    /// Blocks on a structure, in the host's enumeration order.
    fn blocks(&self, structure: StructureId) -> Vec<BlockInfo>;

    fn block(&self, block: BlockId) -> Option<BlockInfo>;

    /// Structures physically linked to `structure`. The resulting graph is
    /// undirected and may contain cycles.
    fn linked_structures(&self, structure: StructureId) -> Vec<StructureId>;

    /// Whether `identity` may use `block` under its permission rules.
    fn has_access(&self, block: BlockId, identity: IdentityId) -> bool;

    /// Display name of the block owner, if the host can resolve one.
    fn owner_name(&self, block: BlockId) -> Option<String>;

    /// Whether `node` accepts control handed over from `controlled`.
    fn can_accept_control(&self, node: BlockId, controlled: &ControlledEntity) -> bool;
}

/// Mutations and UI requests the core may issue.
pub trait StructureControl {
    fn clear_main_control_node(&mut self, structure: StructureId);

    fn request_control(&mut self, node: BlockId);

    /// Toggle the power producers of the node's structure.
    fn toggle_power(&mut self, node: BlockId);

    fn show_terminal(&mut self, block: BlockId, character: EntityId);
}

/// HUD output.
pub trait NotificationSink {
    fn notify(&mut self, notification: Notification);
}

/// Every capability the core needs, on one host type.
pub trait Host:
    Viewpoint + Physics + RelayNetwork + StructureGraph + StructureControl + NotificationSink
{
}

impl<T> Host for T where
    T: Viewpoint + Physics + RelayNetwork + StructureGraph + StructureControl + NotificationSink
{
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed::f64_to_fixed64;
    use slotmap::SlotMap;

    #[test]
    fn functional_control_node_requires_both_flags() {
        let mut blocks = SlotMap::<BlockId, ()>::with_key();
        let mut structures = SlotMap::<StructureId, ()>::with_key();
        let mut info = BlockInfo {
            id: blocks.insert(()),
            structure: structures.insert(()),
            name: "Remote".to_string(),
            kind: BlockKind::ControlNode,
            functional: true,
            owner: IdentityId(1),
        };
        assert!(info.is_functional_control_node());

        info.functional = false;
        assert!(!info.is_functional_control_node());

        info.functional = true;
        info.kind = BlockKind::Cockpit;
        assert!(!info.is_functional_control_node());
    }

    #[test]
    fn character_accessor_only_matches_on_foot() {
        let mut entities = SlotMap::<EntityId, ()>::with_key();
        let entity = entities.insert(());
        let on_foot = ControlledEntity::OnFoot(CharacterState {
            entity,
            name: "Engineer".to_string(),
            suit_energy: f64_to_fixed64(0.5),
            broadcaster_enabled: true,
        });
        assert_eq!(on_foot.character().map(|c| c.entity), Some(entity));
        assert!(ControlledEntity::Other(entity).character().is_none());
    }
}

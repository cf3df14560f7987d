//! Shared test helpers for unit tests, integration tests, and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]`. [`TestWorld`]
//! is an in-memory host implementing every capability trait, with scripted
//! ray hits and relay links, and it records each mutation the core issues so
//! tests can assert on them.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};

use slotmap::SlotMap;

use crate::fixed::{Ray, Vec3, f64_to_fixed64};
use crate::host::*;
use crate::id::*;

// ===========================================================================
// Identity helpers
// ===========================================================================

/// The identity tests play as.
pub fn owner() -> IdentityId {
    IdentityId(1)
}

/// The character entity of an on-foot controller.
///
/// # Panics
///
/// Panics if the controller is not on foot.
pub fn controller_entity(controller: &Controller) -> EntityId {
    match &controller.controlled {
        Some(ControlledEntity::OnFoot(character)) => character.entity,
        other => panic!("controller is not on foot: {other:?}"),
    }
}

// ===========================================================================
// Storage
// ===========================================================================

#[derive(Debug, Clone)]
struct TestStructure {
    name: String,
    powered: bool,
    producers_enabled: bool,
    main_control_node: Option<BlockId>,
    blocks: Vec<BlockId>,
    links: Vec<StructureId>,
}

#[derive(Debug, Clone)]
struct TestBlock {
    structure: StructureId,
    name: String,
    kind: BlockKind,
    functional: bool,
    owner: IdentityId,
    shared_with: Vec<IdentityId>,
    accepts_control: bool,
}

// ===========================================================================
// TestWorld
// ===========================================================================

/// An in-memory host world.
#[derive(Debug)]
pub struct TestWorld {
    structures: SlotMap<StructureId, TestStructure>,
    blocks: SlotMap<BlockId, TestBlock>,
    entities: SlotMap<EntityId, String>,
    identity_names: HashMap<IdentityId, String>,

    /// The camera used for targeting.
    pub view: View,
    ray_hit: Option<RayHit>,
    last_ray: Cell<Option<Ray>>,

    relay_links: HashSet<(Endpoint, StructureId)>,
    relay_hops: HashMap<StructureId, Vec<RelayHop>>,
    relay_denied: HashSet<IdentityId>,
    last_connection_mutual: Cell<Option<bool>>,
    last_path_query: Cell<Option<PathQuery>>,
    link_queries: RefCell<HashMap<StructureId, usize>>,

    // -- Recorded mutations --
    pub control_requests: Vec<BlockId>,
    pub power_toggles: Vec<BlockId>,
    pub cleared_main_nodes: Vec<StructureId>,
    pub terminals: Vec<(BlockId, EntityId)>,
    pub notifications: Vec<Notification>,
}

impl Default for TestWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWorld {
    /// An empty world looking down the negative z axis at nothing.
    pub fn new() -> Self {
        Self {
            structures: SlotMap::with_key(),
            blocks: SlotMap::with_key(),
            entities: SlotMap::with_key(),
            identity_names: HashMap::new(),
            view: View {
                origin: Vec3::ZERO,
                forward: Vec3::new(0.0, 0.0, -1.0),
            },
            ray_hit: None,
            last_ray: Cell::new(None),
            relay_links: HashSet::new(),
            relay_hops: HashMap::new(),
            relay_denied: HashSet::new(),
            last_connection_mutual: Cell::new(None),
            last_path_query: Cell::new(None),
            link_queries: RefCell::new(HashMap::new()),
            control_requests: Vec::new(),
            power_toggles: Vec::new(),
            cleared_main_nodes: Vec::new(),
            terminals: Vec::new(),
            notifications: Vec::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Construction
    // -----------------------------------------------------------------------

    /// Add a powered structure with no blocks.
    pub fn add_structure(&mut self, name: &str) -> StructureId {
        self.structures.insert(TestStructure {
            name: name.to_string(),
            powered: true,
            producers_enabled: true,
            main_control_node: None,
            blocks: Vec::new(),
            links: Vec::new(),
        })
    }

    /// Add a functional block owned by [`owner`].
    pub fn add_block(&mut self, structure: StructureId, name: &str, kind: BlockKind) -> BlockId {
        let block = self.blocks.insert(TestBlock {
            structure,
            name: name.to_string(),
            kind,
            functional: true,
            owner: owner(),
            shared_with: Vec::new(),
            accepts_control: true,
        });
        self.structures[structure].blocks.push(block);
        block
    }

    /// Add a functional control node owned by `owner_id`.
    pub fn add_control_node(
        &mut self,
        structure: StructureId,
        name: &str,
        owner_id: IdentityId,
    ) -> BlockId {
        let block = self.add_block(structure, name, BlockKind::ControlNode);
        self.blocks[block].owner = owner_id;
        block
    }

    pub fn add_entity(&mut self, name: &str) -> EntityId {
        self.entities.insert(name.to_string())
    }

    /// Spawn a character with its broadcaster on and return an on-foot
    /// controller for it.
    pub fn spawn_character(&mut self, identity: IdentityId, name: &str, energy: f64) -> Controller {
        let entity = self.add_entity(name);
        Controller {
            identity,
            display_name: name.to_string(),
            controlled: Some(ControlledEntity::OnFoot(CharacterState {
                entity,
                name: name.to_string(),
                suit_energy: f64_to_fixed64(energy),
                broadcaster_enabled: true,
            })),
        }
    }

    /// Physically link two structures (undirected).
    pub fn link(&mut self, a: StructureId, b: StructureId) {
        self.structures[a].links.push(b);
        if a != b {
            self.structures[b].links.push(a);
        }
    }

    // -----------------------------------------------------------------------
    // State tweaks
    // -----------------------------------------------------------------------

    pub fn set_functional(&mut self, block: BlockId, functional: bool) {
        self.blocks[block].functional = functional;
    }

    pub fn set_powered(&mut self, structure: StructureId, powered: bool) {
        self.structures[structure].powered = powered;
    }

    pub fn set_main_control_node(&mut self, structure: StructureId, node: Option<BlockId>) {
        self.structures[structure].main_control_node = node;
    }

    pub fn main_control_node(&self, structure: StructureId) -> Option<BlockId> {
        self.structures[structure].main_control_node
    }

    pub fn set_owner(&mut self, block: BlockId, identity: IdentityId) {
        self.blocks[block].owner = identity;
    }

    pub fn share_with(&mut self, block: BlockId, identity: IdentityId) {
        self.blocks[block].shared_with.push(identity);
    }

    pub fn set_identity_name(&mut self, identity: IdentityId, name: &str) {
        self.identity_names.insert(identity, name.to_string());
    }

    pub fn set_accepts_control(&mut self, block: BlockId, accepts: bool) {
        self.blocks[block].accepts_control = accepts;
    }

    /// Whether the structure's power producers are switched on.
    pub fn producers_enabled(&self, structure: StructureId) -> bool {
        self.structures[structure].producers_enabled
    }

    // -----------------------------------------------------------------------
    // Targeting
    // -----------------------------------------------------------------------

    pub fn aim_at_structure(&mut self, structure: StructureId) {
        self.ray_hit = Some(RayHit {
            entity: HitEntity::Structure(structure),
            position: Vec3::new(0.0, 0.0, -100.0),
        });
    }

    pub fn aim_at_block(&mut self, block: BlockId) {
        let structure = self.blocks[block].structure;
        self.ray_hit = Some(RayHit {
            entity: HitEntity::Block { block, structure },
            position: Vec3::new(0.0, 0.0, -100.0),
        });
    }

    pub fn aim_at_voxel(&mut self) {
        self.ray_hit = Some(RayHit {
            entity: HitEntity::Voxel,
            position: Vec3::new(0.0, 0.0, -50.0),
        });
    }

    pub fn aim_at_other(&mut self, name: &str, kind: &str) {
        self.ray_hit = Some(RayHit {
            entity: HitEntity::Other {
                name: name.to_string(),
                kind: kind.to_string(),
            },
            position: Vec3::new(0.0, 0.0, -10.0),
        });
    }

    pub fn aim_at_nothing(&mut self) {
        self.ray_hit = None;
    }

    /// The most recent ray cast by the core.
    pub fn last_ray(&self) -> Option<Ray> {
        self.last_ray.get()
    }

    // -----------------------------------------------------------------------
    // Relays
    // -----------------------------------------------------------------------

    /// Make `target` mutually reachable from `source`.
    pub fn connect_relay(&mut self, source: Endpoint, target: StructureId) {
        self.relay_links.insert((source, target));
        if let Endpoint::Structure(structure) = source {
            self.relay_links
                .insert((Endpoint::Structure(target), structure));
        }
    }

    pub fn clear_relays(&mut self) {
        self.relay_links.clear();
    }

    /// Deny `identity` access to every relay.
    pub fn deny_relay_access(&mut self, identity: IdentityId) {
        self.relay_denied.insert(identity);
    }

    pub fn add_relay_hop(&mut self, structure: StructureId, name: &str, entity: EntityId) {
        self.relay_hops.entry(structure).or_default().push(RelayHop {
            name: name.to_string(),
            entity,
        });
    }

    pub fn last_connection_mutual(&self) -> Option<bool> {
        self.last_connection_mutual.get()
    }

    pub fn last_path_query(&self) -> Option<PathQuery> {
        self.last_path_query.get()
    }

    // -----------------------------------------------------------------------
    // Inspection
    // -----------------------------------------------------------------------

    /// How many times the core enumerated links of `structure`.
    pub fn link_queries(&self, structure: StructureId) -> usize {
        self.link_queries
            .borrow()
            .get(&structure)
            .copied()
            .unwrap_or(0)
    }

    /// Total recorded mutations (notifications excluded).
    pub fn mutation_count(&self) -> usize {
        self.control_requests.len()
            + self.power_toggles.len()
            + self.cleared_main_nodes.len()
            + self.terminals.len()
    }

    fn block_info(&self, id: BlockId, block: &TestBlock) -> BlockInfo {
        BlockInfo {
            id,
            structure: block.structure,
            name: block.name.clone(),
            kind: block.kind,
            functional: block.functional,
            owner: block.owner,
        }
    }
}

// ===========================================================================
// Capability impls
// ===========================================================================

impl Viewpoint for TestWorld {
    fn view(&self) -> View {
        self.view
    }
}

impl Physics for TestWorld {
    fn cast_ray(&self, ray: &Ray) -> Option<RayHit> {
        self.last_ray.set(Some(*ray));
        self.ray_hit.clone()
    }
}

impl RelayNetwork for TestWorld {
    fn check_connection(
        &self,
        source: Endpoint,
        target: StructureId,
        requester: IdentityId,
        mutual: bool,
    ) -> bool {
        self.last_connection_mutual.set(Some(mutual));
        !self.relay_denied.contains(&requester) && self.relay_links.contains(&(source, target))
    }

    fn connected_paths(
        &self,
        target: StructureId,
        requester: IdentityId,
        query: PathQuery,
    ) -> Vec<RelayHop> {
        self.last_path_query.set(Some(query));
        if query.accessible && self.relay_denied.contains(&requester) {
            return Vec::new();
        }
        self.relay_hops.get(&target).cloned().unwrap_or_default()
    }
}

impl StructureGraph for TestWorld {
    fn display_name(&self, structure: StructureId) -> String {
        self.structures
            .get(structure)
            .map(|s| s.name.clone())
            .unwrap_or_else(|| "<unknown>".to_string())
    }

    fn is_powered(&self, structure: StructureId) -> bool {
        self.structures.get(structure).is_some_and(|s| s.powered)
    }

    fn has_main_control_node(&self, structure: StructureId) -> bool {
        self.structures
            .get(structure)
            .is_some_and(|s| s.main_control_node.is_some())
    }

    fn blocks(&self, structure: StructureId) -> Vec<BlockInfo> {
        let Some(s) = self.structures.get(structure) else {
            return Vec::new();
        };
        s.blocks
            .iter()
            .filter_map(|&id| self.blocks.get(id).map(|b| self.block_info(id, b)))
            .collect()
    }

    fn block(&self, block: BlockId) -> Option<BlockInfo> {
        self.blocks.get(block).map(|b| self.block_info(block, b))
    }

    fn linked_structures(&self, structure: StructureId) -> Vec<StructureId> {
        *self
            .link_queries
            .borrow_mut()
            .entry(structure)
            .or_insert(0) += 1;
        self.structures
            .get(structure)
            .map(|s| s.links.clone())
            .unwrap_or_default()
    }

    fn has_access(&self, block: BlockId, identity: IdentityId) -> bool {
        self.blocks
            .get(block)
            .is_some_and(|b| b.owner == identity || b.shared_with.contains(&identity))
    }

    fn owner_name(&self, block: BlockId) -> Option<String> {
        let owner = self.blocks.get(block)?.owner;
        self.identity_names.get(&owner).cloned()
    }

    fn can_accept_control(&self, node: BlockId, _controlled: &ControlledEntity) -> bool {
        self.blocks.get(node).is_some_and(|b| b.accepts_control)
    }
}

impl StructureControl for TestWorld {
    fn clear_main_control_node(&mut self, structure: StructureId) {
        self.structures[structure].main_control_node = None;
        self.cleared_main_nodes.push(structure);
    }

    fn request_control(&mut self, node: BlockId) {
        self.control_requests.push(node);
    }

    fn toggle_power(&mut self, node: BlockId) {
        let structure = self.blocks[node].structure;
        let s = &mut self.structures[structure];
        s.producers_enabled = !s.producers_enabled;
        self.power_toggles.push(node);
    }

    fn show_terminal(&mut self, block: BlockId, character: EntityId) {
        self.terminals.push((block, character));
    }
}

impl NotificationSink for TestWorld {
    fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }
}

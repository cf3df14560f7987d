use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

new_key_type! {
    /// Identifies a structure (a physically connected assembly of blocks).
    pub struct StructureId;

    /// Identifies a block on a structure.
    pub struct BlockId;

    /// Identifies a free-standing entity (character, relay, debris).
    pub struct EntityId;
}

/// Identifies a player identity for permission and relay access checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct IdentityId(pub u64);

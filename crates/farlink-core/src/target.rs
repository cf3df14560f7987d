//! Ray-based target classification.

use tracing::debug;

use crate::failure::TargetingFailure;
use crate::fixed::{Fixed64, Ray, fixed64_to_f64};
use crate::host::{HitEntity, Physics, StructureGraph, View};
use crate::id::StructureId;

/// A structure the player is aiming at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetStructure {
    pub id: StructureId,
    pub name: String,
}

/// Build the targeting ray for a view.
pub fn targeting_ray(view: &View, max_distance: Fixed64) -> Ray {
    Ray {
        origin: view.origin,
        direction: view.forward,
        max_distance,
    }
}

/// Cast a single ray from `view` and classify what it hit.
///
/// A block hit resolves to the block's owning structure.
pub fn resolve_target<H>(
    host: &H,
    view: &View,
    max_distance: Fixed64,
) -> Result<TargetStructure, TargetingFailure>
where
    H: Physics + StructureGraph + ?Sized,
{
    let ray = targeting_ray(view, max_distance);
    debug!(
        max_distance = fixed64_to_f64(ray.max_distance),
        end = ?ray.end(),
        "casting targeting ray"
    );
    let hit = host.cast_ray(&ray).ok_or(TargetingFailure::NoHit)?;

    let id = match hit.entity {
        HitEntity::Structure(structure) => structure,
        HitEntity::Block { structure, .. } => structure,
        HitEntity::Voxel => return Err(TargetingFailure::HitTerrain),
        HitEntity::Other { name, kind } => {
            return Err(TargetingFailure::HitUnsupportedEntity { name, kind });
        }
    };

    Ok(TargetStructure {
        id,
        name: host.display_name(id),
    })
}

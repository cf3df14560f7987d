//! Mutual relay reachability between the controller and a target.
//!
//! The connectivity layer owns the relay graph; this module only asks it
//! whether a path exists in both directions for the requesting identity and
//! logs the relays it reports. The hop list is diagnostic and never changes
//! the verdict.

use tracing::{debug, info};

use crate::host::{Endpoint, PathQuery, RelayHop, RelayNetwork};
use crate::id::{IdentityId, StructureId};

/// Flags used for every reachability check and hop listing.
pub const MUTUAL_ACCESSIBLE: PathQuery = PathQuery {
    mutual: true,
    accessible: true,
};

/// A resolved reachability check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reachability {
    pub reachable: bool,
    /// Relays the connectivity layer reported for the target.
    pub hops: Vec<RelayHop>,
}

/// Query the relay network for mutual reachability of `target` from
/// `source`, with full hop diagnostics.
pub fn evaluate<R: RelayNetwork + ?Sized>(
    relays: &R,
    source: Endpoint,
    source_name: &str,
    target: StructureId,
    target_name: &str,
    requester: IdentityId,
) -> Reachability {
    let reachable = relays.check_connection(source, target, requester, MUTUAL_ACCESSIBLE.mutual);
    let hops = relays.connected_paths(target, requester, MUTUAL_ACCESSIBLE);

    info!(from = source_name, to = target_name, "trying to reach structure");
    for hop in &hops {
        debug!(to = target_name, relay = %hop.name, entity = ?hop.entity, "reachable via relay");
    }
    if reachable {
        info!(
            from = source_name,
            to = target_name,
            hops = hops.len(),
            "connection path confirmed"
        );
    } else {
        info!(
            from = source_name,
            to = target_name,
            "connection not found in relayed path"
        );
    }

    Reachability { reachable, hops }
}

/// Whether `target` is mutually reachable from `source` for `requester`.
pub fn is_reachable<R: RelayNetwork + ?Sized>(
    relays: &R,
    source: Endpoint,
    source_name: &str,
    target: StructureId,
    target_name: &str,
    requester: IdentityId,
) -> bool {
    evaluate(relays, source, source_name, target, target_name, requester).reachable
}

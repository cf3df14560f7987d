//! Control node discovery on a target structure and its linked neighbours.
//!
//! The local pass scans only the target's own blocks. The recursive pass is
//! a depth-first walk over the physical link graph, which the host supplies
//! and which may contain cycles or diamonds. Traversal state lives in a
//! caller-owned [`SearchState`], so every structure is entered at most once
//! per search and the walk is testable on its own.
//!
//! When a single structure carries several functional control nodes, the one
//! with the lowest [`BlockId`](crate::id::BlockId) wins.

use std::collections::HashSet;

use tracing::info;

use crate::host::{BlockInfo, StructureGraph};
use crate::id::StructureId;

// ---------------------------------------------------------------------------
// Search state
// ---------------------------------------------------------------------------

/// Visited-set and visit order for one recursive search.
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    visited: HashSet<StructureId>,
    order: Vec<StructureId>,
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `structure` as entered. Returns `false` if it already was.
    pub fn enter(&mut self, structure: StructureId) -> bool {
        if self.visited.insert(structure) {
            self.order.push(structure);
            true
        } else {
            false
        }
    }

    pub fn has_visited(&self, structure: StructureId) -> bool {
        self.visited.contains(&structure)
    }

    /// Structures in the order they were entered.
    pub fn visit_order(&self) -> &[StructureId] {
        &self.order
    }

    pub fn visited_count(&self) -> usize {
        self.order.len()
    }
}

// ---------------------------------------------------------------------------
// Local lookup
// ---------------------------------------------------------------------------

/// The functional control node on `structure` with the lowest block id.
pub fn local_control_node<G: StructureGraph + ?Sized>(
    graph: &G,
    structure: StructureId,
) -> Option<BlockInfo> {
    graph
        .blocks(structure)
        .into_iter()
        .filter(BlockInfo::is_functional_control_node)
        .min_by_key(|block| block.id)
}

/// The first functional block of any kind on `structure`, in enumeration
/// order.
pub fn first_functional_block<G: StructureGraph + ?Sized>(
    graph: &G,
    structure: StructureId,
) -> Option<BlockInfo> {
    graph
        .blocks(structure)
        .into_iter()
        .find(|block| block.functional)
}

// ---------------------------------------------------------------------------
// Recursive lookup
// ---------------------------------------------------------------------------

/// Depth-first search from `start` over physically linked structures.
///
/// Stops at the first structure carrying a functional control node. Visit
/// order matches a recursive pre-order walk that follows each structure's
/// links in enumeration order. Structures already in `state` are skipped,
/// so a state can be shared across searches to exclude known-empty ground.
pub fn search_linked<G: StructureGraph + ?Sized>(
    graph: &G,
    start: StructureId,
    state: &mut SearchState,
) -> Option<BlockInfo> {
    let mut stack = vec![start];

    while let Some(current) = stack.pop() {
        if !state.enter(current) {
            continue;
        }
        let name = graph.display_name(current);
        info!(structure = %name, "searching structure for control node");

        if let Some(node) = local_control_node(graph, current) {
            info!(node = %node.name, structure = %name, "found control node");
            return Some(node);
        }

        let links = graph.linked_structures(current);
        stack.extend(
            links
                .into_iter()
                .rev()
                .filter(|link| !state.has_visited(*link)),
        );
    }

    None
}

/// Find a functional control node for `target`.
///
/// Checks the target's own blocks first. Only when that finds nothing and
/// `recursive` is set does it walk linked structures.
pub fn locate_control_node<G: StructureGraph + ?Sized>(
    graph: &G,
    target: StructureId,
    recursive: bool,
) -> Option<BlockInfo> {
    if let Some(node) = local_control_node(graph, target) {
        return Some(node);
    }
    if !recursive {
        return None;
    }
    let mut state = SearchState::new();
    search_linked(graph, target, &mut state)
}

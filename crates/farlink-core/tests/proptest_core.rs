//! Property-based tests for the Farlink core.
//!
//! Uses proptest to generate key-press sequences and random (often cyclic)
//! structure link graphs, then verify the edge-detection and traversal
//! invariants hold.

use std::collections::{HashSet, VecDeque};

use farlink_core::config::{ActionKind, ControlConfig, Key, Modifiers};
use farlink_core::hotkey::{HotkeyEdgeDetector, InputSnapshot};
use farlink_core::id::StructureId;
use farlink_core::locator::{SearchState, locate_control_node, search_linked};
use farlink_core::test_utils::*;
use proptest::prelude::*;

// ===========================================================================
// Generators
// ===========================================================================

/// A random link graph: structure count, undirected edges (self-loops and
/// duplicates allowed), and the index of the one structure carrying a
/// functional control node, if any.
fn arb_graph(max_structures: usize) -> impl Strategy<Value = (usize, Vec<(usize, usize)>, Option<usize>)> {
    (1..=max_structures).prop_flat_map(|n| {
        (
            Just(n),
            proptest::collection::vec((0..n, 0..n), 0..(n * 3)),
            proptest::option::of(0..n),
        )
    })
}

fn build_world(
    n: usize,
    edges: &[(usize, usize)],
    node_at: Option<usize>,
) -> (TestWorld, Vec<StructureId>) {
    let mut world = TestWorld::new();
    let structures: Vec<StructureId> = (0..n)
        .map(|i| world.add_structure(&format!("S{i}")))
        .collect();
    for &(a, b) in edges {
        world.link(structures[a], structures[b]);
    }
    if let Some(i) = node_at {
        world.add_control_node(structures[i], "Remote", owner());
    }
    (world, structures)
}

/// Indices reachable from 0 over the undirected edge list.
fn component_of_zero(n: usize, edges: &[(usize, usize)]) -> HashSet<usize> {
    let mut adjacency = vec![Vec::new(); n];
    for &(a, b) in edges {
        adjacency[a].push(b);
        adjacency[b].push(a);
    }
    let mut seen = HashSet::from([0]);
    let mut queue = VecDeque::from([0]);
    while let Some(i) = queue.pop_front() {
        for &j in &adjacency[i] {
            if seen.insert(j) {
                queue.push_back(j);
            }
        }
    }
    seen
}

// ===========================================================================
// Properties
// ===========================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// One action per contiguous pressed run, fired on the run's first tick.
    #[test]
    fn fires_once_per_pressed_run(presses in proptest::collection::vec(any::<bool>(), 0..64)) {
        let config = ControlConfig::default();
        let mut detector = HotkeyEdgeDetector::new();
        let held = InputSnapshot::chord(Key::B, Modifiers::ALT);
        let released = InputSnapshot::new();

        let mut previous = false;
        for &pressed in &presses {
            let input = if pressed { &held } else { &released };
            let fired = detector.poll(&config, input);
            if pressed && !previous {
                prop_assert_eq!(fired, Some(ActionKind::TakeControl));
            } else {
                prop_assert_eq!(fired, None);
            }
            previous = pressed;
        }
    }

    /// The recursive walk terminates on any graph and enters each structure
    /// at most once.
    #[test]
    fn search_visits_each_structure_at_most_once((n, edges, node_at) in arb_graph(12)) {
        let (world, structures) = build_world(n, &edges, node_at);
        let mut state = SearchState::new();
        let _ = search_linked(&world, structures[0], &mut state);

        let unique: HashSet<StructureId> = state.visit_order().iter().copied().collect();
        prop_assert_eq!(unique.len(), state.visited_count());
        for &s in &structures {
            prop_assert!(world.link_queries(s) <= 1);
        }
    }

    /// A node is found exactly when one exists in the target's component.
    #[test]
    fn search_finds_node_iff_in_component((n, edges, node_at) in arb_graph(12)) {
        let (world, structures) = build_world(n, &edges, node_at);
        let component = component_of_zero(n, &edges);
        let expected = node_at.is_some_and(|i| component.contains(&i));

        let found = locate_control_node(&world, structures[0], true);
        prop_assert_eq!(found.is_some(), expected);
        if let (Some(node), Some(i)) = (found, node_at) {
            prop_assert_eq!(node.structure, structures[i]);
        }
    }

    /// A search without a node exhausts the whole component.
    #[test]
    fn empty_search_exhausts_component((n, edges, _) in arb_graph(12)) {
        let (world, structures) = build_world(n, &edges, None);
        let mut state = SearchState::new();
        prop_assert!(search_linked(&world, structures[0], &mut state).is_none());
        prop_assert_eq!(state.visited_count(), component_of_zero(n, &edges).len());
    }
}

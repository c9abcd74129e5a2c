//! Single-source Dijkstra over any [`SearchGraph`].
//!
//! # Contract
//!
//! - The search starts at `source` (distance 0) and settles nodes in order of
//!   increasing distance.
//! - The first settled node for which `is_goal` holds is returned as
//!   [`SearchOutcome::goal`] together with its predecessor chain.  The source
//!   itself is tested too, so a goal at distance 0 is possible and distinct
//!   from `goal: None`.
//! - `goal: None` means every reachable node was settled and none satisfied
//!   the predicate.  This is a normal outcome, not an error.
//! - [`SearchOutcome::reached`] holds every *settled* node with its shortest
//!   distance.  When the search stops early at a goal, nodes that were only
//!   discovered (tentative distance) are not included.
//!
//! Ties are broken by discovery order: among equal distances the node that
//! was discovered first is settled first.
//!
//! Complexity: O((V + E) log V) with a binary heap.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use ordered_float::OrderedFloat;
use rustc_hash::FxHashMap;

use crate::{SearchError, SearchGraph, SearchResult};

// ── Result types ──────────────────────────────────────────────────────────────

/// A settled node and its shortest distance from the source.
#[derive(Debug, Clone, PartialEq)]
pub struct Reached<N> {
    pub node:     N,
    pub distance: f64,
}

/// The goal that stopped the search and how it was reached.
#[derive(Debug, Clone, PartialEq)]
pub struct GoalPath<N> {
    /// The goal node.
    pub node:     N,
    /// Nodes from the source to the goal, both inclusive.
    pub path:     Vec<N>,
    /// Sum of edge weights along `path`.
    pub distance: f64,
}

/// Everything a search run produced.
#[derive(Debug, Clone)]
pub struct SearchOutcome<N, K> {
    /// First settled node satisfying the goal predicate, if any.
    pub goal:    Option<GoalPath<N>>,
    /// Every settled node keyed by its identity.
    pub reached: FxHashMap<K, Reached<N>>,
}

impl<N, K: Eq + std::hash::Hash> SearchOutcome<N, K> {
    /// Shortest distance to the node with `key`, if it was settled.
    pub fn distance_to(&self, key: &K) -> Option<f64> {
        self.reached.get(key).map(|r| r.distance)
    }

    pub fn found_goal(&self) -> bool {
        self.goal.is_some()
    }
}

// ── Search ────────────────────────────────────────────────────────────────────

/// Per-node bookkeeping.  Slots are allocated in discovery order, so a slot
/// index doubles as the tie-break key in the heap.
struct Slot<N> {
    node:     N,
    distance: f64,
    prev:     Option<usize>,
    settled:  bool,
}

/// Run Dijkstra from `source` until `is_goal` holds or the graph is exhausted.
///
/// # Errors
///
/// [`SearchError::InvalidWeight`] if the graph reports a negative or NaN
/// edge weight.
pub fn dijkstra<G, F>(graph: &G, source: G::Node, mut is_goal: F) -> SearchResult<SearchOutcome<G::Node, G::Key>>
where
    G: SearchGraph,
    F: FnMut(&G::Node) -> bool,
{
    let mut slots: Vec<Slot<G::Node>> = Vec::new();
    let mut by_key: FxHashMap<G::Key, usize> = FxHashMap::default();

    by_key.insert(graph.identify(&source), 0);
    slots.push(Slot { node: source, distance: 0.0, prev: None, settled: false });

    // Min-heap: (distance, slot).  Reverse turns BinaryHeap (max) into a min-heap.
    let mut heap: BinaryHeap<Reverse<(OrderedFloat<f64>, usize)>> = BinaryHeap::new();
    heap.push(Reverse((OrderedFloat(0.0), 0)));

    let mut goal_slot = None;

    while let Some(Reverse((OrderedFloat(dist), idx))) = heap.pop() {
        // Skip stale heap entries.
        if slots[idx].settled || dist > slots[idx].distance {
            continue;
        }
        slots[idx].settled = true;

        if is_goal(&slots[idx].node) {
            goal_slot = Some(idx);
            break;
        }

        let current = slots[idx].node.clone();
        for next in graph.neighbors(&current) {
            let w = graph.weight(&current, &next);
            if w.is_nan() || w < 0.0 {
                return Err(SearchError::InvalidWeight(w));
            }
            let new_dist = dist + w;
            let key = graph.identify(&next);

            match by_key.get(&key).copied() {
                None => {
                    let slot = slots.len();
                    by_key.insert(key, slot);
                    slots.push(Slot { node: next, distance: new_dist, prev: Some(idx), settled: false });
                    heap.push(Reverse((OrderedFloat(new_dist), slot)));
                }
                Some(slot) => {
                    let entry = &mut slots[slot];
                    if !entry.settled && new_dist < entry.distance {
                        entry.distance = new_dist;
                        entry.prev = Some(idx);
                        heap.push(Reverse((OrderedFloat(new_dist), slot)));
                    }
                }
            }
        }
    }

    let goal = goal_slot.map(|idx| reconstruct(&slots, idx));

    let reached = by_key
        .into_iter()
        .filter(|&(_, slot)| slots[slot].settled)
        .map(|(key, slot)| {
            let s = &slots[slot];
            (key, Reached { node: s.node.clone(), distance: s.distance })
        })
        .collect();

    Ok(SearchOutcome { goal, reached })
}

fn reconstruct<N: Clone>(slots: &[Slot<N>], goal: usize) -> GoalPath<N> {
    let mut path = Vec::new();
    let mut cur = Some(goal);
    while let Some(idx) = cur {
        path.push(slots[idx].node.clone());
        cur = slots[idx].prev;
    }
    path.reverse();
    GoalPath {
        node:     slots[goal].node.clone(),
        path,
        distance: slots[goal].distance,
    }
}

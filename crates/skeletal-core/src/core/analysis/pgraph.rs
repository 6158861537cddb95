//! Exhaustive ring perception over a collapsing path graph.
//!
//! Every live edge starts as a two-vertex path. Vertices are eliminated in
//! ascending degree order; eliminating a vertex merges each pair of paths
//! that end there into one longer path, and a merge whose outer endpoints
//! coincide closes a simple cycle, which is emitted. When every vertex has
//! been eliminated, every simple cycle of the graph has been seen exactly
//! once (up to traversal direction).
//!
//! Path sequences live in one shared arena that only ever grows; spans of
//! consumed paths become garbage and are reclaimed wholesale when the
//! perception run ends.

use super::backend::GraphBackend;
use crate::core::models::ids::VertexId;
use itertools::Itertools;
use std::collections::{BTreeMap, HashSet};

#[derive(Debug, Clone, Copy)]
struct PathSpan {
    start: usize,
    len: usize,
}

#[derive(Debug, Default)]
struct PathArena {
    storage: Vec<VertexId>,
}

impl PathArena {
    fn push_pair(&mut self, u: VertexId, v: VertexId) -> PathSpan {
        let start = self.storage.len();
        self.storage.push(u);
        self.storage.push(v);
        PathSpan { start, len: 2 }
    }

    fn slice(&self, span: PathSpan) -> &[VertexId] {
        &self.storage[span.start..span.start + span.len]
    }

    fn first(&self, span: PathSpan) -> VertexId {
        self.storage[span.start]
    }

    fn last(&self, span: PathSpan) -> VertexId {
        self.storage[span.start + span.len - 1]
    }

    fn other_endpoint(&self, span: PathSpan, endpoint: VertexId) -> VertexId {
        if self.first(span) == endpoint {
            self.last(span)
        } else {
            self.first(span)
        }
    }

    fn shared_vertices(&self, a: PathSpan, b: PathSpan) -> usize {
        let lookup: HashSet<VertexId> = self.slice(a).iter().copied().collect();
        self.slice(b)
            .iter()
            .filter(|vertex| lookup.contains(vertex))
            .count()
    }

    fn collect_oriented(&self, span: PathSpan, reversed: bool) -> Vec<VertexId> {
        let slice = self.slice(span);
        if reversed {
            slice.iter().rev().copied().collect()
        } else {
            slice.to_vec()
        }
    }

    /// Appends `first` (oriented to end at the junction) followed by
    /// `second` (oriented to start there) as one new span. The junction
    /// vertex is kept once.
    fn merge(
        &mut self,
        first: PathSpan,
        first_reversed: bool,
        second: PathSpan,
        second_reversed: bool,
    ) -> PathSpan {
        let start = self.storage.len();
        self.append_span(first, first_reversed, 0);
        self.append_span(second, second_reversed, 1);
        PathSpan {
            start,
            len: self.storage.len() - start,
        }
    }

    fn append_span(&mut self, span: PathSpan, reversed: bool, skip: usize) {
        for offset in skip..span.len {
            let index = if reversed {
                span.start + span.len - 1 - offset
            } else {
                span.start + offset
            };
            let vertex = self.storage[index];
            self.storage.push(vertex);
        }
    }
}

/// Enumerates every simple cycle of the graph.
///
/// # Return
///
/// All simple cycles as vertex lists in cyclic traversal order, each
/// normalized to start at its smallest vertex ID. The count grows
/// combinatorially on edge-dense graphs; molecular graphs stay tractable.
pub fn all_cycles<B: GraphBackend + ?Sized>(graph: &B) -> Vec<Vec<VertexId>> {
    let mut arena = PathArena::default();
    let mut paths: Vec<Option<PathSpan>> = Vec::new();
    let mut active: BTreeMap<VertexId, Vec<usize>> = BTreeMap::new();

    for (_, u, v) in graph.live_edges() {
        let span = arena.push_pair(u, v);
        let index = paths.len();
        paths.push(Some(span));
        active.entry(u).or_default().push(index);
        active.entry(v).or_default().push(index);
    }

    let mut seen: HashSet<Vec<VertexId>> = HashSet::new();
    let mut cycles: Vec<Vec<VertexId>> = Vec::new();

    while let Some(vertex) = next_elimination(&active) {
        let incident = active.remove(&vertex).unwrap_or_default();

        for (i, j) in incident.iter().copied().tuple_combinations() {
            let (Some(p), Some(q)) = (paths[i], paths[j]) else {
                continue;
            };
            // Orient p to end at the junction and q to leave it
            let p_reversed = arena.last(p) != vertex;
            let q_reversed = arena.first(q) != vertex;
            let p_outer = arena.other_endpoint(p, vertex);
            let q_outer = arena.other_endpoint(q, vertex);
            let shared = arena.shared_vertices(p, q);

            if p_outer == q_outer {
                // Only the junction and the common outer endpoint may repeat
                if shared == 2 {
                    let mut cycle = arena.collect_oriented(p, p_reversed);
                    let tail = arena.collect_oriented(q, q_reversed);
                    cycle.extend_from_slice(&tail[1..tail.len() - 1]);
                    let cycle = normalize_cycle(cycle);
                    if seen.insert(cycle.clone()) {
                        cycles.push(cycle);
                    }
                }
            } else if shared == 1 {
                let span = arena.merge(p, p_reversed, q, q_reversed);
                let index = paths.len();
                paths.push(Some(span));
                active.entry(p_outer).or_default().push(index);
                active.entry(q_outer).or_default().push(index);
            }
        }

        for index in incident {
            if let Some(span) = paths[index].take() {
                let outer = arena.other_endpoint(span, vertex);
                if let Some(list) = active.get_mut(&outer) {
                    list.retain(|&i| i != index);
                }
            }
        }
    }

    cycles
}

fn next_elimination(active: &BTreeMap<VertexId, Vec<usize>>) -> Option<VertexId> {
    active
        .iter()
        .min_by_key(|(_, incident)| incident.len())
        .map(|(id, _)| *id)
}

fn normalize_cycle(mut cycle: Vec<VertexId>) -> Vec<VertexId> {
    let min_position = cycle
        .iter()
        .enumerate()
        .min_by_key(|(_, id)| **id)
        .map(|(position, _)| position)
        .unwrap_or(0);
    cycle.rotate_left(min_position);
    if cycle.len() > 2 && cycle[cycle.len() - 1] < cycle[1] {
        cycle[1..].reverse();
    }
    cycle
}

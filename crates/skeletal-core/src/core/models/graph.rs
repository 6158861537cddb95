use super::edge::{DEFAULT_EDGE_ORDER, Edge};
use super::ids::{EdgeId, VertexId};
use super::vertex::{Vertex, VertexData};
use crate::core::analysis;
use slotmap::{SecondaryMap, SlotMap};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use tracing::warn;

/// A derived query result stamped with the structural generation it was
/// computed at. Stale slots (generation older than the graph's) are
/// recomputed on the next read, never served.
#[derive(Debug, Clone)]
struct CacheSlot<T> {
    generation: u64,
    value: T,
}

/// Cached derived data owned by a graph.
///
/// Every structural mutation bumps the graph's generation counter, which
/// implicitly invalidates all slots at once; no per-query bookkeeping is
/// required at mutation sites.
#[derive(Debug, Clone, Default)]
struct DerivedCache {
    components: Option<CacheSlot<Vec<Vec<VertexId>>>>,
    bridges: Option<CacheSlot<Vec<EdgeId>>>,
    cycle_basis: Option<CacheSlot<Vec<Vec<VertexId>>>>,
    all_cycles: Option<CacheSlot<Vec<Vec<VertexId>>>>,
    diameter: Option<CacheSlot<Option<usize>>>,
}

/// The result of a deep copy: the new graph plus the identity translation
/// maps from the source graph's IDs to the copy's freshly minted ones.
#[derive(Debug, Clone)]
pub struct GraphCopy {
    pub graph: MolecularGraph,
    pub vertex_map: HashMap<VertexId, VertexId>,
    pub edge_map: HashMap<EdgeId, EdgeId>,
}

/// Represents a molecule as an undirected graph of vertices and edges.
///
/// This struct is the central data structure of the crate: it owns vertex and
/// edge storage, maintains an adjacency cache for traversal, tracks edges that
/// have been temporarily disconnected, and memoizes derived analyses
/// (components, bridges, cycles, diameter) until the next structural change.
#[derive(Debug, Clone, Default)]
pub struct MolecularGraph {
    /// Primary storage for vertices using a slot map for stable IDs.
    vertices: SlotMap<VertexId, Vertex>,
    /// Primary storage for edges; contains both live and parked edges.
    edges: SlotMap<EdgeId, Edge>,
    /// Edges currently removed from traversal but still addressable,
    /// awaiting reconnection or permanent removal.
    parked_edges: HashSet<EdgeId>,
    /// Cached adjacency, indexed by vertex ID; lists live edges only.
    adjacency: SecondaryMap<VertexId, Vec<(VertexId, EdgeId)>>,
    /// Monotonically increasing counter bumped by every structural mutation.
    generation: u64,
    /// Derived-data cache; slots are valid only at the current generation.
    cache: RefCell<DerivedCache>,
}

impl MolecularGraph {
    /// Creates a new, empty molecular graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current structural generation of the graph.
    ///
    /// The counter increases on every mutation that changes topology
    /// (vertex/edge insertion, removal, disconnection, reconnection).
    /// Position and flag edits do not affect it.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Retrieves an immutable reference to a vertex by its ID.
    ///
    /// # Return
    ///
    /// Returns `Some(&Vertex)` if the vertex exists, otherwise `None`.
    pub fn vertex(&self, id: VertexId) -> Option<&Vertex> {
        self.vertices.get(id)
    }

    /// Retrieves a mutable reference to a vertex by its ID.
    ///
    /// Mutating a vertex through this reference can change its position,
    /// placed flag, and host data, none of which are structural; the
    /// derived-data cache stays valid.
    pub fn vertex_mut(&mut self, id: VertexId) -> Option<&mut Vertex> {
        self.vertices.get_mut(id)
    }

    /// Retrieves an edge by its ID. Temporarily disconnected edges remain
    /// addressable here.
    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id)
    }

    /// Returns an iterator over all vertices in the graph.
    pub fn vertices_iter(&self) -> impl Iterator<Item = (VertexId, &Vertex)> {
        self.vertices.iter()
    }

    /// Returns a mutable iterator over all vertices in the graph.
    pub fn vertices_iter_mut(&mut self) -> impl Iterator<Item = (VertexId, &mut Vertex)> {
        self.vertices.iter_mut()
    }

    /// Returns an iterator over the live (not temporarily disconnected)
    /// edges of the graph.
    pub fn edges_iter(&self) -> impl Iterator<Item = (EdgeId, &Edge)> {
        self.edges
            .iter()
            .filter(|(id, _)| !self.parked_edges.contains(id))
    }

    /// Returns an iterator over the IDs of temporarily disconnected edges.
    pub fn temporarily_disconnected_edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.parked_edges.iter().copied()
    }

    /// Returns the number of vertices in the graph.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the number of live edges in the graph.
    pub fn edge_count(&self) -> usize {
        self.edges.len() - self.parked_edges.len()
    }

    /// Retrieves the live neighbors of a vertex as `(neighbor, edge)` pairs.
    ///
    /// # Return
    ///
    /// Returns `Some(&[(VertexId, EdgeId)])` if the vertex exists, otherwise
    /// `None`. Temporarily disconnected edges do not appear.
    pub fn neighbors(&self, id: VertexId) -> Option<&[(VertexId, EdgeId)]> {
        self.adjacency.get(id).map(|v| v.as_slice())
    }

    /// Returns the live degree of a vertex, or `None` if it does not exist.
    pub fn degree(&self, id: VertexId) -> Option<usize> {
        self.adjacency.get(id).map(|v| v.len())
    }

    /// Finds the live edge connecting two vertices, if any.
    pub fn edge_between(&self, vertex1_id: VertexId, vertex2_id: VertexId) -> Option<EdgeId> {
        self.adjacency
            .get(vertex1_id)?
            .iter()
            .find(|(neighbor, _)| *neighbor == vertex2_id)
            .map(|(_, edge_id)| *edge_id)
    }

    /// Adds a new vertex with default state (origin position, unplaced).
    ///
    /// # Return
    ///
    /// The ID of the newly created vertex.
    pub fn add_vertex(&mut self) -> VertexId {
        self.insert_vertex(Vertex::default())
    }

    /// Adds a new vertex carrying the given host data.
    pub fn add_vertex_with_data(&mut self, data: VertexData) -> VertexId {
        let mut vertex = Vertex::default();
        vertex.data = data;
        self.insert_vertex(vertex)
    }

    /// Inserts a pre-built vertex into the graph.
    ///
    /// # Return
    ///
    /// The ID of the inserted vertex.
    pub fn insert_vertex(&mut self, vertex: Vertex) -> VertexId {
        let vertex_id = self.vertices.insert(vertex);
        self.adjacency.insert(vertex_id, Vec::new());
        self.bump_generation();
        vertex_id
    }

    /// Adds an edge of default order between two vertices.
    ///
    /// See [`MolecularGraph::add_edge_with_order`].
    pub fn add_edge(&mut self, vertex1_id: VertexId, vertex2_id: VertexId) -> Option<EdgeId> {
        self.add_edge_with_order(vertex1_id, vertex2_id, DEFAULT_EDGE_ORDER)
    }

    /// Adds an edge between two vertices.
    ///
    /// Referencing a vertex that is not part of this graph is a non-fatal
    /// condition: the call logs a warning and returns `None` without
    /// modifying the graph. Adding an edge that already exists returns the
    /// existing edge's ID (idempotent). Self-loops are rejected.
    ///
    /// # Arguments
    ///
    /// * `vertex1_id` - ID of the first endpoint.
    /// * `vertex2_id` - ID of the second endpoint.
    /// * `order` - The order/weight value carried by the edge.
    ///
    /// # Return
    ///
    /// Returns `Some(EdgeId)` on success, otherwise `None`.
    pub fn add_edge_with_order(
        &mut self,
        vertex1_id: VertexId,
        vertex2_id: VertexId,
        order: f64,
    ) -> Option<EdgeId> {
        if !self.vertices.contains_key(vertex1_id) || !self.vertices.contains_key(vertex2_id) {
            warn!(
                ?vertex1_id,
                ?vertex2_id,
                "rejected edge referencing a vertex not present in this graph"
            );
            return None;
        }
        if vertex1_id == vertex2_id {
            warn!(?vertex1_id, "rejected self-loop edge");
            return None;
        }

        if let Some(existing) = self.edge_between(vertex1_id, vertex2_id) {
            // Edge already exists, operation is successful (idempotent)
            return Some(existing);
        }
        if self.parked_edge_between(vertex1_id, vertex2_id).is_some() {
            warn!(
                ?vertex1_id,
                ?vertex2_id,
                "rejected edge duplicating a temporarily disconnected edge"
            );
            return None;
        }

        let edge_id = self.edges.insert(Edge::new(vertex1_id, vertex2_id, order));
        self.adjacency[vertex1_id].push((vertex2_id, edge_id));
        self.adjacency[vertex2_id].push((vertex1_id, edge_id));
        self.bump_generation();
        Some(edge_id)
    }

    /// Removes a vertex from the graph.
    ///
    /// All incident edges are removed as well, including temporarily
    /// disconnected ones, so the graph never holds an edge referencing a
    /// vertex it no longer owns.
    ///
    /// # Return
    ///
    /// Returns `Some(Vertex)` if the vertex existed and was removed,
    /// otherwise `None`.
    pub fn delete_vertex(&mut self, vertex_id: VertexId) -> Option<Vertex> {
        let vertex = self.vertices.remove(vertex_id)?;

        // 1. Remove live incident edges and clean neighbor adjacency
        let incident: Vec<(VertexId, EdgeId)> =
            self.adjacency.remove(vertex_id).unwrap_or_default();
        for (neighbor_id, edge_id) in incident {
            self.edges.remove(edge_id);
            if let Some(adjacency) = self.adjacency.get_mut(neighbor_id) {
                adjacency.retain(|(_, id)| *id != edge_id);
            }
        }

        // 2. Remove parked edges that referenced the vertex
        let stale_parked: Vec<EdgeId> = self
            .parked_edges
            .iter()
            .copied()
            .filter(|&edge_id| {
                self.edges
                    .get(edge_id)
                    .is_some_and(|edge| edge.contains(vertex_id))
            })
            .collect();
        for edge_id in stale_parked {
            self.parked_edges.remove(&edge_id);
            self.edges.remove(edge_id);
        }

        self.bump_generation();
        Some(vertex)
    }

    /// Removes the live edge connecting two vertices.
    ///
    /// # Panics
    ///
    /// Panics if no live edge connects the two vertices; unregistering an
    /// edge that was never registered indicates broken caller bookkeeping.
    ///
    /// # Return
    ///
    /// The removed edge.
    pub fn disconnect(&mut self, vertex1_id: VertexId, vertex2_id: VertexId) -> Edge {
        match self.edge_between(vertex1_id, vertex2_id) {
            Some(edge_id) => self.disconnect_edge(edge_id),
            None => panic!(
                "attempted to disconnect vertices {vertex1_id:?} and {vertex2_id:?} that share no live edge"
            ),
        }
    }

    /// Permanently removes an edge by its ID, whether live or temporarily
    /// disconnected.
    ///
    /// # Panics
    ///
    /// Panics if the edge is not registered in this graph.
    ///
    /// # Return
    ///
    /// The removed edge.
    pub fn disconnect_edge(&mut self, edge_id: EdgeId) -> Edge {
        let Some(edge) = self.edges.remove(edge_id) else {
            panic!("attempted to disconnect edge {edge_id:?} that was never registered");
        };

        if !self.parked_edges.remove(&edge_id) {
            for endpoint in [edge.vertex1_id, edge.vertex2_id] {
                if let Some(adjacency) = self.adjacency.get_mut(endpoint) {
                    adjacency.retain(|(_, id)| *id != edge_id);
                }
            }
        }

        self.bump_generation();
        edge
    }

    /// Moves a live edge into the temporarily-disconnected side set.
    ///
    /// The edge disappears from neighbor lists and every traversal-based
    /// query, but remains addressable by ID so it can be reconnected later.
    /// This lets algorithms probe "what if this edge were absent" without
    /// constructing a new graph. Parking an already-parked edge is a no-op.
    ///
    /// # Panics
    ///
    /// Panics if the edge is not registered in this graph.
    ///
    /// # Return
    ///
    /// The ID of the parked edge, for later reconnection.
    pub fn temporarily_disconnect_edge(&mut self, edge_id: EdgeId) -> EdgeId {
        let Some(edge) = self.edges.get(edge_id).copied() else {
            panic!(
                "attempted to temporarily disconnect edge {edge_id:?} that was never registered"
            );
        };
        if self.parked_edges.contains(&edge_id) {
            return edge_id;
        }

        for endpoint in [edge.vertex1_id, edge.vertex2_id] {
            if let Some(adjacency) = self.adjacency.get_mut(endpoint) {
                adjacency.retain(|(_, id)| *id != edge_id);
            }
        }
        self.parked_edges.insert(edge_id);
        self.bump_generation();
        edge_id
    }

    /// Restores a temporarily disconnected edge into the live edge set.
    ///
    /// # Panics
    ///
    /// Panics if the edge is not currently temporarily disconnected;
    /// reconnecting an edge that was never parked indicates broken caller
    /// bookkeeping.
    pub fn reconnect_temporarily_disconnected_edge(&mut self, edge_id: EdgeId) {
        if !self.parked_edges.remove(&edge_id) {
            panic!("attempted to reconnect edge {edge_id:?} that was not temporarily disconnected");
        }
        let edge = self.edges[edge_id];
        self.adjacency[edge.vertex1_id].push((edge.vertex2_id, edge_id));
        self.adjacency[edge.vertex2_id].push((edge.vertex1_id, edge_id));
        self.bump_generation();
    }

    /// Returns whether an edge is currently temporarily disconnected.
    pub fn is_temporarily_disconnected(&self, edge_id: EdgeId) -> bool {
        self.parked_edges.contains(&edge_id)
    }

    /// Creates a copy of this graph that keeps every vertex and edge ID.
    ///
    /// The copy owns cloned vertex/edge data under the original identities,
    /// so IDs held by the caller address the same objects in both graphs.
    pub fn shallow_copy(&self) -> MolecularGraph {
        self.clone()
    }

    /// Creates an isomorphic copy of this graph under entirely new IDs.
    ///
    /// Needed when an algorithm must mutate positions or flags without
    /// side-effecting the caller's original graph. Temporarily disconnected
    /// edges are copied in their parked state.
    ///
    /// # Return
    ///
    /// The new graph together with old-to-new vertex and edge ID maps.
    pub fn deep_copy(&self) -> GraphCopy {
        let mut graph = MolecularGraph::new();
        let mut vertex_map = HashMap::with_capacity(self.vertices.len());
        let mut edge_map = HashMap::with_capacity(self.edges.len());

        for (old_id, vertex) in self.vertices.iter() {
            let new_id = graph.insert_vertex(vertex.clone());
            vertex_map.insert(old_id, new_id);
        }
        for (old_id, edge) in self.edges.iter() {
            let new_id = graph
                .edges
                .insert(Edge::new(vertex_map[&edge.vertex1_id], vertex_map[&edge.vertex2_id], edge.order));
            let copied = graph.edges[new_id];
            if self.parked_edges.contains(&old_id) {
                graph.parked_edges.insert(new_id);
            } else {
                graph.adjacency[copied.vertex1_id].push((copied.vertex2_id, new_id));
                graph.adjacency[copied.vertex2_id].push((copied.vertex1_id, new_id));
            }
            edge_map.insert(old_id, new_id);
        }
        graph.bump_generation();

        GraphCopy {
            graph,
            vertex_map,
            edge_map,
        }
    }

    /// Clears the placed flag of every vertex, forcing the next layout
    /// invocation to reposition the whole graph.
    pub fn clear_placed_flags(&mut self) {
        for (_, vertex) in self.vertices.iter_mut() {
            vertex.placed = false;
        }
    }

    fn parked_edge_between(&self, vertex1_id: VertexId, vertex2_id: VertexId) -> Option<EdgeId> {
        self.parked_edges.iter().copied().find(|&edge_id| {
            self.edges
                .get(edge_id)
                .is_some_and(|edge| edge.contains(vertex1_id) && edge.contains(vertex2_id))
        })
    }

    fn bump_generation(&mut self) {
        self.generation += 1;
    }
}

/// Cached connectivity and ring queries.
///
/// Results are memoized per structural generation: repeated calls on an
/// unmutated graph are cheap, and any mutation transparently forces a
/// recomputation on the next call.
impl MolecularGraph {
    /// Partitions the vertices into maximal connected components.
    ///
    /// # Return
    ///
    /// One vector of vertex IDs per component, in deterministic discovery
    /// order.
    pub fn connected_components(&self) -> Vec<Vec<VertexId>> {
        if let Some(slot) = &self.cache.borrow().components {
            if slot.generation == self.generation {
                return slot.value.clone();
            }
        }
        let value = analysis::components::connected_components(self);
        self.cache.borrow_mut().components = Some(CacheSlot {
            generation: self.generation,
            value: value.clone(),
        });
        value
    }

    /// Returns whether the graph consists of exactly one connected component.
    pub fn is_connected(&self) -> bool {
        self.connected_components().len() == 1
    }

    /// Returns every bridge in the graph: the edges whose removal would
    /// increase the number of connected components.
    ///
    /// # Return
    ///
    /// Bridge edge IDs in sorted order.
    pub fn bridges(&self) -> Vec<EdgeId> {
        if let Some(slot) = &self.cache.borrow().bridges {
            if slot.generation == self.generation {
                return slot.value.clone();
            }
        }
        let value = analysis::bridges::bridges(self);
        self.cache.borrow_mut().bridges = Some(CacheSlot {
            generation: self.generation,
            value: value.clone(),
        });
        value
    }

    /// Determines whether a single edge is a bridge by probing connectivity
    /// with the edge ignored.
    ///
    /// Returns `false` for edges that are unknown or temporarily
    /// disconnected, since they take no part in live connectivity.
    pub fn is_edge_a_bridge(&self, edge_id: EdgeId) -> bool {
        if self.parked_edges.contains(&edge_id) {
            return false;
        }
        let Some(edge) = self.edges.get(edge_id) else {
            return false;
        };
        analysis::bridges::is_bridge(self, edge_id, edge.vertex1_id, edge.vertex2_id)
    }

    /// Answers a single-edge bridge query from the memoized all-bridges
    /// result, recomputing it first if the graph changed since it was
    /// cached.
    ///
    /// Cheap when called repeatedly on an unmutated graph (one binary
    /// search per call after the first).
    pub fn is_edge_a_bridge_cached(&self, edge_id: EdgeId) -> bool {
        self.bridges().binary_search(&edge_id).is_ok()
    }

    /// Computes a minimum cycle basis of the graph ("smallest set of
    /// smallest rings").
    ///
    /// # Return
    ///
    /// One vertex cycle per independent loop, each in cyclic traversal
    /// order; `|E| - |V| + 1` cycles per connected component.
    pub fn smallest_independent_cycles(&self) -> Vec<Vec<VertexId>> {
        if let Some(slot) = &self.cache.borrow().cycle_basis {
            if slot.generation == self.generation {
                return slot.value.clone();
            }
        }
        let value = analysis::rings::minimum_cycle_basis(self);
        self.cache.borrow_mut().cycle_basis = Some(CacheSlot {
            generation: self.generation,
            value: value.clone(),
        });
        value
    }

    /// Computes the minimum cycle basis in edge form.
    ///
    /// # Return
    ///
    /// For each basis cycle, its edges in cyclic traversal order.
    pub fn smallest_independent_cycles_edges(&self) -> Vec<Vec<EdgeId>> {
        self.smallest_independent_cycles()
            .iter()
            .map(|cycle| analysis::rings::cycle_edges(self, cycle))
            .collect()
    }

    /// Computes every simple cycle of the graph via exhaustive ring
    /// perception.
    ///
    /// # Return
    ///
    /// All simple cycles as vertex lists in cyclic traversal order. The
    /// result can grow combinatorially on dense graphs; molecular graphs
    /// stay small in practice.
    pub fn all_cycles(&self) -> Vec<Vec<VertexId>> {
        if let Some(slot) = &self.cache.borrow().all_cycles {
            if slot.generation == self.generation {
                return slot.value.clone();
            }
        }
        let value = analysis::pgraph::all_cycles(self);
        self.cache.borrow_mut().all_cycles = Some(CacheSlot {
            generation: self.generation,
            value: value.clone(),
        });
        value
    }

    /// Finds a shortest path between two vertices, optionally avoiding a
    /// set of vertices.
    ///
    /// # Arguments
    ///
    /// * `from` - The starting vertex.
    /// * `to` - The target vertex.
    /// * `avoid` - Vertices the path must not pass through.
    ///
    /// # Return
    ///
    /// The path including both endpoints, or `None` when no path exists.
    /// Disconnected endpoints are a legitimate input, not an error.
    pub fn find_path_between(
        &self,
        from: VertexId,
        to: VertexId,
        avoid: &[VertexId],
    ) -> Option<Vec<VertexId>> {
        analysis::paths::shortest_path(self, from, to, avoid)
    }

    /// Computes the graph diameter: the longest shortest-path distance over
    /// all vertex pairs, in edge counts.
    ///
    /// # Return
    ///
    /// Returns `None` for empty or disconnected graphs.
    pub fn diameter(&self) -> Option<usize> {
        if let Some(slot) = &self.cache.borrow().diameter {
            if slot.generation == self.generation {
                return slot.value;
            }
        }
        let value = analysis::paths::diameter(self);
        self.cache.borrow_mut().diameter = Some(CacheSlot {
            generation: self.generation,
            value,
        });
        value
    }
}

//! WaypointGraph - Core connectivity graph.
//!
//! The WaypointGraph stores the undirected link topology using petgraph's
//! StableGraph and maintains SoA (Structure of Arrays) buffers for scene
//! positions to enable cheap host-side upload of draw data.

use petgraph::stable_graph::{NodeIndex, StableUnGraph};
use petgraph::visit::{Bfs, EdgeRef, IntoEdgeReferences, NodeIndexable};
use std::cell::Cell;
use std::collections::{HashMap, HashSet};

use super::node::{WaypointId, WaypointState};
use super::snapshot::{GraphSnapshot, LinkRecord, WaypointRecord};
use crate::error::{GraphError, GraphResult};
use crate::spatial::SpatialIndex;

/// The waypoint connectivity graph.
///
/// This struct manages:
/// - Undirected link topology via petgraph
/// - Position buffers in SoA layout
/// - Editor state (selected, hovered, hidden)
/// - Spatial index for scene picking
/// - ID mapping between stable IDs and internal indices
///
/// Links are single undirected edges, so the symmetry of the neighbor
/// relation is structural: there is no way to connect a to b without b
/// seeing a as a neighbor.
pub struct WaypointGraph {
    /// The underlying graph structure. Nodes store their stable WaypointId.
    graph: StableUnGraph<WaypointId, ()>,

    /// Map from stable WaypointId to petgraph NodeIndex
    id_to_index: HashMap<WaypointId, NodeIndex>,

    /// Next waypoint ID to assign
    next_waypoint_id: u32,

    /// X positions (SoA layout)
    pos_x: Vec<f32>,

    /// Y positions (SoA layout)
    pos_y: Vec<f32>,

    /// Z positions (SoA layout)
    pos_z: Vec<f32>,

    /// Editor states (selected, hovered, hidden)
    states: Vec<WaypointState>,

    /// Spatial index for scene picking
    spatial: SpatialIndex,

    /// Whether the spatial index needs rebuilding
    spatial_dirty: Cell<bool>,
}

impl WaypointGraph {
    /// Create a new empty waypoint graph.
    pub fn new() -> Self {
        Self {
            graph: StableUnGraph::default(),
            id_to_index: HashMap::new(),
            next_waypoint_id: 0,
            pos_x: Vec::new(),
            pos_y: Vec::new(),
            pos_z: Vec::new(),
            states: Vec::new(),
            spatial: SpatialIndex::new(),
            spatial_dirty: Cell::new(false),
        }
    }

    /// Create a waypoint graph with pre-allocated capacity.
    pub fn with_capacity(waypoint_capacity: usize, link_capacity: usize) -> Self {
        Self {
            graph: StableUnGraph::with_capacity(waypoint_capacity, link_capacity),
            id_to_index: HashMap::with_capacity(waypoint_capacity),
            next_waypoint_id: 0,
            pos_x: Vec::with_capacity(waypoint_capacity),
            pos_y: Vec::with_capacity(waypoint_capacity),
            pos_z: Vec::with_capacity(waypoint_capacity),
            states: Vec::with_capacity(waypoint_capacity),
            spatial: SpatialIndex::new(),
            spatial_dirty: Cell::new(false),
        }
    }

    fn index_of(&self, id: WaypointId) -> GraphResult<NodeIndex> {
        self.id_to_index
            .get(&id)
            .copied()
            .ok_or(GraphError::UnknownWaypoint { id })
    }

    /// Write a position into the SoA slot for `index`.
    ///
    /// StableGraph reuses vacated slots before growing, so the slot is
    /// either in range already or exactly one past the end.
    fn store_position(&mut self, index: NodeIndex, x: f32, y: f32, z: f32) {
        let i = index.index();
        if i < self.pos_x.len() {
            self.pos_x[i] = x;
            self.pos_y[i] = y;
            self.pos_z[i] = z;
            self.states[i] = WaypointState::new();
        } else {
            self.pos_x.push(x);
            self.pos_y.push(y);
            self.pos_z.push(z);
            self.states.push(WaypointState::new());
        }
    }

    fn insert_with_id(&mut self, id: WaypointId, x: f32, y: f32, z: f32) {
        let index = self.graph.add_node(id);
        self.id_to_index.insert(id, index);
        self.store_position(index, x, y, z);
        self.next_waypoint_id = self.next_waypoint_id.max(id.raw() + 1);
        self.spatial_dirty.set(true);
    }

    // =========================================================================
    // Waypoint Operations
    // =========================================================================

    /// Add a waypoint at the specified scene position.
    pub fn add_waypoint(&mut self, x: f32, y: f32, z: f32) -> WaypointId {
        let id = WaypointId(self.next_waypoint_id);
        self.insert_with_id(id, x, y, z);
        id
    }

    /// Add multiple waypoints from a positions array [x0, y0, z0, x1, ...].
    ///
    /// This is the bulk registration path the host uses after enumerating
    /// the scene. Returns the number of waypoints added.
    pub fn add_waypoints_from_positions(&mut self, positions: &[f32]) -> u32 {
        let count = positions.len() / 3;

        self.id_to_index.reserve(count);
        self.pos_x.reserve(count);
        self.pos_y.reserve(count);
        self.pos_z.reserve(count);
        self.states.reserve(count);

        for i in 0..count {
            let x = positions[i * 3];
            let y = positions[i * 3 + 1];
            let z = positions[i * 3 + 2];
            self.add_waypoint(x, y, z);
        }

        count as u32
    }

    /// Remove a waypoint and all its links.
    pub fn remove_waypoint(&mut self, id: WaypointId) -> bool {
        if let Some(index) = self.id_to_index.remove(&id) {
            // Zero out the SoA slot; StableGraph keeps the index reserved
            let i = index.index();
            if i < self.pos_x.len() {
                self.pos_x[i] = 0.0;
                self.pos_y[i] = 0.0;
                self.pos_z[i] = 0.0;
                self.states[i] = WaypointState::new();
            }

            self.graph.remove_node(index);
            self.spatial_dirty.set(true);
            true
        } else {
            false
        }
    }

    /// Get the number of waypoints.
    pub fn waypoint_count(&self) -> u32 {
        self.graph.node_count() as u32
    }

    /// Get the upper bound on waypoint indices (max index + 1).
    /// This may be larger than waypoint_count() if waypoints have been
    /// removed, since StableGraph preserves index stability.
    pub fn node_bound(&self) -> u32 {
        self.graph.node_bound() as u32
    }

    /// Get a waypoint's scene position.
    pub fn position(&self, id: WaypointId) -> Option<(f32, f32, f32)> {
        self.id_to_index.get(&id).map(|&index| {
            let i = index.index();
            (self.pos_x[i], self.pos_y[i], self.pos_z[i])
        })
    }

    /// Set a waypoint's scene position.
    pub fn set_position(&mut self, id: WaypointId, x: f32, y: f32, z: f32) {
        if let Some(&index) = self.id_to_index.get(&id) {
            let i = index.index();
            self.pos_x[i] = x;
            self.pos_y[i] = y;
            self.pos_z[i] = z;
            self.spatial_dirty.set(true);
        }
    }

    /// Mark a waypoint selected in the host editor.
    pub fn set_selected(&mut self, id: WaypointId, selected: bool) {
        if let Some(&index) = self.id_to_index.get(&id) {
            self.states[index.index()].set_selected(selected);
        }
    }

    /// Check if a waypoint is selected.
    pub fn is_selected(&self, id: WaypointId) -> bool {
        self.id_to_index
            .get(&id)
            .map(|&index| self.states[index.index()].is_selected())
            .unwrap_or(false)
    }

    /// Mark a waypoint hovered.
    pub fn set_hovered(&mut self, id: WaypointId, hovered: bool) {
        if let Some(&index) = self.id_to_index.get(&id) {
            self.states[index.index()].set_hovered(hovered);
        }
    }

    /// Check if a waypoint is hovered.
    pub fn is_hovered(&self, id: WaypointId) -> bool {
        self.id_to_index
            .get(&id)
            .map(|&index| self.states[index.index()].is_hovered())
            .unwrap_or(false)
    }

    /// Hide a waypoint from the scene view.
    pub fn set_hidden(&mut self, id: WaypointId, hidden: bool) {
        if let Some(&index) = self.id_to_index.get(&id) {
            self.states[index.index()].set_hidden(hidden);
        }
    }

    /// Check if a waypoint is hidden.
    pub fn is_hidden(&self, id: WaypointId) -> bool {
        self.id_to_index
            .get(&id)
            .map(|&index| self.states[index.index()].is_hidden())
            .unwrap_or(false)
    }

    // =========================================================================
    // Link Operations
    // =========================================================================

    /// Connect two waypoints with an undirected link.
    ///
    /// A single atomic mutation: the edge either exists or it does not,
    /// so the neighbor relation can never be half-applied. Returns
    /// `Ok(true)` if a link was created, `Ok(false)` if the pair was
    /// already connected or `a == b` (both silent no-ops).
    pub fn connect(&mut self, a: WaypointId, b: WaypointId) -> GraphResult<bool> {
        let index_a = self.index_of(a)?;
        let index_b = self.index_of(b)?;

        if index_a == index_b {
            return Ok(false);
        }
        if self.graph.find_edge(index_a, index_b).is_some() {
            return Ok(false);
        }

        self.graph.add_edge(index_a, index_b, ());
        Ok(true)
    }

    /// Remove the link between two waypoints.
    ///
    /// Returns `Ok(true)` if a link existed, `Ok(false)` otherwise.
    pub fn disconnect(&mut self, a: WaypointId, b: WaypointId) -> GraphResult<bool> {
        let index_a = self.index_of(a)?;
        let index_b = self.index_of(b)?;

        match self.graph.find_edge(index_a, index_b) {
            Some(edge) => {
                self.graph.remove_edge(edge);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Check whether two waypoints are directly linked.
    ///
    /// Symmetric by construction; unknown ids are simply not connected.
    pub fn is_connected(&self, a: WaypointId, b: WaypointId) -> bool {
        match (self.id_to_index.get(&a), self.id_to_index.get(&b)) {
            (Some(&index_a), Some(&index_b)) => {
                self.graph.find_edge(index_a, index_b).is_some()
            }
            _ => false,
        }
    }

    /// Get the number of links.
    pub fn link_count(&self) -> u32 {
        self.graph.edge_count() as u32
    }

    /// Get neighbors of a waypoint as raw ids.
    pub fn neighbors(&self, id: WaypointId) -> Vec<u32> {
        self.id_to_index
            .get(&id)
            .map(|&index| {
                self.graph
                    .neighbors(index)
                    .filter_map(|n| self.graph.node_weight(n).map(|id| id.0))
                    .collect()
            })
            .unwrap_or_default()
    }

    // =========================================================================
    // Nearest-Neighbor Linking
    // =========================================================================

    /// Find the nearest other waypoint to `source` by Euclidean distance.
    ///
    /// Linear scan in ascending stable-index order with strict `<`
    /// comparison, so on a distance tie the earliest-registered candidate
    /// wins. Deliberately does not use the spatial index: the scan's
    /// tie-break is deterministic and independent of tree shape.
    ///
    /// Returns `Ok(None)` when no other waypoint exists.
    pub fn find_nearest(&self, source: WaypointId) -> GraphResult<Option<WaypointId>> {
        let source_index = self.index_of(source)?;
        let s = source_index.index();
        let (sx, sy, sz) = (self.pos_x[s], self.pos_y[s], self.pos_z[s]);

        let mut best: Option<(WaypointId, f32)> = None;
        for index in self.graph.node_indices() {
            if index == source_index {
                continue;
            }
            let i = index.index();
            let dx = self.pos_x[i] - sx;
            let dy = self.pos_y[i] - sy;
            let dz = self.pos_z[i] - sz;
            let dist_sq = dx * dx + dy * dy + dz * dz;

            if best.is_none_or(|(_, best_sq)| dist_sq < best_sq) {
                best = Some((self.graph[index], dist_sq));
            }
        }

        Ok(best.map(|(id, _)| id))
    }

    /// Find the nearest other waypoint and link to it.
    ///
    /// The editor's one-click operation. Returns the peer that is now
    /// linked (whether or not the link already existed), or `Ok(None)`
    /// when `source` is the only waypoint.
    pub fn connect_nearest(&mut self, source: WaypointId) -> GraphResult<Option<WaypointId>> {
        match self.find_nearest(source)? {
            Some(nearest) => {
                self.connect(source, nearest)?;
                Ok(Some(nearest))
            }
            None => Ok(None),
        }
    }

    // =========================================================================
    // Traversal
    // =========================================================================

    /// Get all waypoints reachable from `id` over links, including `id`
    /// itself, in BFS order. Unknown ids yield an empty list.
    pub fn reachable_from(&self, id: WaypointId) -> Vec<u32> {
        let Some(&start) = self.id_to_index.get(&id) else {
            return Vec::new();
        };

        let mut bfs = Bfs::new(&self.graph, start);
        let mut reachable = Vec::new();
        while let Some(index) = bfs.next(&self.graph) {
            reachable.push(self.graph[index].raw());
        }
        reachable
    }

    /// Count the connected components of the graph.
    pub fn component_count(&self) -> u32 {
        let mut visited: HashSet<NodeIndex> = HashSet::new();
        let mut components = 0;

        for start in self.graph.node_indices() {
            if visited.contains(&start) {
                continue;
            }
            components += 1;
            let mut bfs = Bfs::new(&self.graph, start);
            while let Some(index) = bfs.next(&self.graph) {
                visited.insert(index);
            }
        }

        components
    }

    // =========================================================================
    // Buffer Access
    // =========================================================================

    /// Get X positions slice.
    pub fn positions_x(&self) -> &[f32] {
        &self.pos_x
    }

    /// Get Y positions slice.
    pub fn positions_y(&self) -> &[f32] {
        &self.pos_y
    }

    /// Get Z positions slice.
    pub fn positions_z(&self) -> &[f32] {
        &self.pos_z
    }

    /// Get every link as a flat segment buffer for the host line pass.
    ///
    /// Returns [ax, ay, az, bx, by, bz, ...], six floats per link.
    pub fn link_segments(&self) -> Vec<f32> {
        let mut segments = Vec::with_capacity(self.graph.edge_count() * 6);
        for edge in self.graph.edge_references() {
            let a = edge.source().index();
            let b = edge.target().index();
            segments.extend_from_slice(&[
                self.pos_x[a],
                self.pos_y[a],
                self.pos_z[a],
                self.pos_x[b],
                self.pos_y[b],
                self.pos_z[b],
            ]);
        }
        segments
    }

    /// Get the links of a single waypoint as a flat segment buffer.
    ///
    /// Used for the selected-waypoint highlight pass. Unknown ids yield
    /// an empty buffer.
    pub fn link_segments_for(&self, id: WaypointId) -> Vec<f32> {
        let Some(&index) = self.id_to_index.get(&id) else {
            return Vec::new();
        };

        let s = index.index();
        let mut segments = Vec::new();
        for neighbor in self.graph.neighbors(index) {
            let n = neighbor.index();
            segments.extend_from_slice(&[
                self.pos_x[s],
                self.pos_y[s],
                self.pos_z[s],
                self.pos_x[n],
                self.pos_y[n],
                self.pos_z[n],
            ]);
        }
        segments
    }

    // =========================================================================
    // Spatial Queries
    // =========================================================================

    /// Find the waypoint nearest to an arbitrary scene point.
    ///
    /// Click-picking query; uses the spatial index, so call
    /// [`rebuild_spatial_index`](Self::rebuild_spatial_index) after
    /// position changes.
    pub fn nearest_to_point(&self, x: f32, y: f32, z: f32) -> Option<WaypointId> {
        self.spatial.nearest(x, y, z)
    }

    /// Find the waypoint nearest to a scene point within a maximum distance.
    pub fn nearest_to_point_within(
        &self,
        x: f32,
        y: f32,
        z: f32,
        max_distance: f32,
    ) -> Option<WaypointId> {
        self.spatial.nearest_within(x, y, z, max_distance)
    }

    /// Find all waypoints inside an axis-aligned box (marquee selection).
    pub fn waypoints_in_box(
        &self,
        min_x: f32,
        min_y: f32,
        min_z: f32,
        max_x: f32,
        max_y: f32,
        max_z: f32,
    ) -> Vec<u32> {
        self.spatial
            .in_box(min_x, min_y, min_z, max_x, max_y, max_z)
            .into_iter()
            .map(|id| id.0)
            .collect()
    }

    /// Find all waypoints within a radius of a scene point.
    pub fn waypoints_in_radius(&self, x: f32, y: f32, z: f32, radius: f32) -> Vec<u32> {
        self.spatial
            .in_radius(x, y, z, radius)
            .into_iter()
            .map(|id| id.0)
            .collect()
    }

    /// Check whether positions changed since the last spatial rebuild.
    pub fn spatial_needs_rebuild(&self) -> bool {
        self.spatial_dirty.get()
    }

    /// Rebuild the spatial index from current positions.
    pub fn rebuild_spatial_index(&mut self) {
        let points: Vec<_> = self
            .id_to_index
            .iter()
            .map(|(&id, &index)| {
                let i = index.index();
                (id, self.pos_x[i], self.pos_y[i], self.pos_z[i])
            })
            .collect();

        self.spatial.rebuild(&points);
        self.spatial_dirty.set(false);
    }

    // =========================================================================
    // Snapshot / Restore
    // =========================================================================

    /// Capture the full graph state for the host's edit history.
    pub fn snapshot(&self) -> GraphSnapshot {
        let waypoints = self
            .graph
            .node_indices()
            .map(|index| {
                let i = index.index();
                WaypointRecord {
                    id: self.graph[index].raw(),
                    x: self.pos_x[i],
                    y: self.pos_y[i],
                    z: self.pos_z[i],
                }
            })
            .collect();

        let links = self
            .graph
            .edge_references()
            .map(|edge| LinkRecord {
                a: self.graph[edge.source()].raw(),
                b: self.graph[edge.target()].raw(),
            })
            .collect();

        GraphSnapshot { waypoints, links }
    }

    /// Replace the graph state with a previously captured snapshot.
    ///
    /// Waypoint ids are preserved and the id counter is advanced past the
    /// highest restored id. Fails if a link references a waypoint the
    /// snapshot does not contain.
    pub fn restore(&mut self, snapshot: &GraphSnapshot) -> GraphResult<()> {
        self.clear();

        for waypoint in &snapshot.waypoints {
            self.insert_with_id(WaypointId::new(waypoint.id), waypoint.x, waypoint.y, waypoint.z);
        }
        for link in &snapshot.links {
            self.connect(WaypointId::new(link.a), WaypointId::new(link.b))?;
        }

        Ok(())
    }

    // =========================================================================
    // Utilities
    // =========================================================================

    /// Get the bounding box of all waypoints.
    ///
    /// Returns (min_x, min_y, min_z, max_x, max_y, max_z), skipping dead
    /// slots left by removals.
    pub fn bounds(&self) -> Option<(f32, f32, f32, f32, f32, f32)> {
        if self.graph.node_count() == 0 {
            return None;
        }

        let mut min = [f32::INFINITY; 3];
        let mut max = [f32::NEG_INFINITY; 3];

        for index in self.graph.node_indices() {
            let i = index.index();
            let p = [self.pos_x[i], self.pos_y[i], self.pos_z[i]];
            for axis in 0..3 {
                if p[axis] < min[axis] {
                    min[axis] = p[axis];
                }
                if p[axis] > max[axis] {
                    max[axis] = p[axis];
                }
            }
        }

        Some((min[0], min[1], min[2], max[0], max[1], max[2]))
    }

    /// Clear all waypoints and links, resetting to the initial state.
    pub fn clear(&mut self) {
        self.graph.clear();
        self.id_to_index.clear();
        self.next_waypoint_id = 0;
        self.pos_x.clear();
        self.pos_y.clear();
        self.pos_z.clear();
        self.states.clear();
        self.spatial.clear();
        self.spatial_dirty.set(false);
    }
}

impl Default for WaypointGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_waypoint() {
        let mut graph = WaypointGraph::new();
        let id = graph.add_waypoint(10.0, 20.0, 30.0);

        assert_eq!(graph.waypoint_count(), 1);
        assert_eq!(graph.position(id), Some((10.0, 20.0, 30.0)));
    }

    #[test]
    fn test_add_multiple_waypoints() {
        let mut graph = WaypointGraph::new();
        let positions = [0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 2.0, 2.0, 2.0];

        let count = graph.add_waypoints_from_positions(&positions);
        assert_eq!(count, 3);
        assert_eq!(graph.waypoint_count(), 3);
    }

    #[test]
    fn test_connect_is_symmetric() {
        let mut graph = WaypointGraph::new();
        let a = graph.add_waypoint(0.0, 0.0, 0.0);
        let b = graph.add_waypoint(1.0, 0.0, 0.0);

        assert_eq!(graph.connect(a, b), Ok(true));
        assert!(graph.is_connected(a, b));
        assert!(graph.is_connected(b, a));
        assert_eq!(graph.link_count(), 1);
    }

    #[test]
    fn test_connect_is_idempotent() {
        let mut graph = WaypointGraph::new();
        let a = graph.add_waypoint(0.0, 0.0, 0.0);
        let b = graph.add_waypoint(1.0, 0.0, 0.0);

        assert_eq!(graph.connect(a, b), Ok(true));
        assert_eq!(graph.connect(a, b), Ok(false));
        // Reversed argument order is the same undirected link
        assert_eq!(graph.connect(b, a), Ok(false));

        assert_eq!(graph.link_count(), 1);
        assert_eq!(graph.neighbors(a).len(), 1);
        assert_eq!(graph.neighbors(b).len(), 1);
    }

    #[test]
    fn test_connect_self_is_noop() {
        let mut graph = WaypointGraph::new();
        let a = graph.add_waypoint(0.0, 0.0, 0.0);

        assert_eq!(graph.connect(a, a), Ok(false));
        assert_eq!(graph.link_count(), 0);
        assert!(graph.neighbors(a).is_empty());
    }

    #[test]
    fn test_connect_unknown_waypoint() {
        let mut graph = WaypointGraph::new();
        let a = graph.add_waypoint(0.0, 0.0, 0.0);
        let ghost = WaypointId::new(99);

        assert_eq!(
            graph.connect(a, ghost),
            Err(GraphError::UnknownWaypoint { id: ghost })
        );
    }

    #[test]
    fn test_disconnect() {
        let mut graph = WaypointGraph::new();
        let a = graph.add_waypoint(0.0, 0.0, 0.0);
        let b = graph.add_waypoint(1.0, 0.0, 0.0);

        graph.connect(a, b).unwrap();
        assert_eq!(graph.disconnect(b, a), Ok(true));
        assert!(!graph.is_connected(a, b));
        assert_eq!(graph.disconnect(a, b), Ok(false));
    }

    #[test]
    fn test_find_nearest_basic() {
        let mut graph = WaypointGraph::new();
        let origin = graph.add_waypoint(0.0, 0.0, 0.0);
        let near = graph.add_waypoint(1.0, 0.0, 0.0);
        let _far = graph.add_waypoint(5.0, 0.0, 0.0);

        assert_eq!(graph.find_nearest(origin), Ok(Some(near)));
    }

    #[test]
    fn test_find_nearest_single_waypoint() {
        let mut graph = WaypointGraph::new();
        let only = graph.add_waypoint(0.0, 0.0, 0.0);

        assert_eq!(graph.find_nearest(only), Ok(None));
    }

    #[test]
    fn test_find_nearest_never_returns_source() {
        let mut graph = WaypointGraph::new();
        let a = graph.add_waypoint(0.0, 0.0, 0.0);
        // Same position as a: distance zero, still another waypoint
        let b = graph.add_waypoint(0.0, 0.0, 0.0);

        assert_eq!(graph.find_nearest(a), Ok(Some(b)));
        assert_eq!(graph.find_nearest(b), Ok(Some(a)));
    }

    #[test]
    fn test_find_nearest_tie_break_is_first_registered() {
        let mut graph = WaypointGraph::new();
        let source = graph.add_waypoint(0.0, 0.0, 0.0);
        let first = graph.add_waypoint(1.0, 0.0, 0.0);
        let _second = graph.add_waypoint(-1.0, 0.0, 0.0);

        // Both candidates sit at distance 1; the earlier registration wins
        assert_eq!(graph.find_nearest(source), Ok(Some(first)));
    }

    #[test]
    fn test_find_nearest_unknown_waypoint() {
        let graph = WaypointGraph::new();
        let ghost = WaypointId::new(7);

        assert_eq!(
            graph.find_nearest(ghost),
            Err(GraphError::UnknownWaypoint { id: ghost })
        );
    }

    #[test]
    fn test_connect_nearest() {
        let mut graph = WaypointGraph::new();
        let origin = graph.add_waypoint(0.0, 0.0, 0.0);
        let near = graph.add_waypoint(1.0, 0.0, 0.0);
        let far = graph.add_waypoint(5.0, 0.0, 0.0);

        assert_eq!(graph.connect_nearest(origin), Ok(Some(near)));
        assert!(graph.is_connected(origin, near));
        assert!(!graph.is_connected(origin, far));

        // Repeating is a no-op that still reports the peer
        assert_eq!(graph.connect_nearest(origin), Ok(Some(near)));
        assert_eq!(graph.link_count(), 1);
    }

    #[test]
    fn test_connect_nearest_alone() {
        let mut graph = WaypointGraph::new();
        let only = graph.add_waypoint(0.0, 0.0, 0.0);

        assert_eq!(graph.connect_nearest(only), Ok(None));
        assert_eq!(graph.link_count(), 0);
    }

    #[test]
    fn test_triangle_degrees() {
        let mut graph = WaypointGraph::new();
        let a = graph.add_waypoint(0.0, 0.0, 0.0);
        let b = graph.add_waypoint(1.0, 0.0, 0.0);
        let c = graph.add_waypoint(0.0, 1.0, 0.0);

        graph.connect(a, b).unwrap();
        graph.connect(b, c).unwrap();
        graph.connect(c, a).unwrap();

        assert_eq!(graph.neighbors(a).len(), 2);
        assert_eq!(graph.neighbors(b).len(), 2);
        assert_eq!(graph.neighbors(c).len(), 2);
        assert_eq!(graph.link_count(), 3);
    }

    #[test]
    fn test_remove_waypoint_drops_links() {
        let mut graph = WaypointGraph::new();
        let a = graph.add_waypoint(0.0, 0.0, 0.0);
        let b = graph.add_waypoint(1.0, 0.0, 0.0);
        let c = graph.add_waypoint(2.0, 0.0, 0.0);

        graph.connect(a, b).unwrap();
        graph.connect(b, c).unwrap();

        assert!(graph.remove_waypoint(b));
        assert_eq!(graph.waypoint_count(), 2);
        assert_eq!(graph.link_count(), 0);
        assert!(graph.neighbors(a).is_empty());
        assert!(!graph.remove_waypoint(b));
    }

    #[test]
    fn test_slot_reuse_after_removal() {
        let mut graph = WaypointGraph::new();
        let a = graph.add_waypoint(1.0, 1.0, 1.0);
        let _b = graph.add_waypoint(2.0, 2.0, 2.0);

        graph.remove_waypoint(a);
        // StableGraph reuses the vacated slot; position must land there
        let c = graph.add_waypoint(9.0, 9.0, 9.0);

        assert_eq!(graph.position(c), Some((9.0, 9.0, 9.0)));
        assert_eq!(graph.waypoint_count(), 2);
    }

    #[test]
    fn test_reachable_from() {
        let mut graph = WaypointGraph::new();
        let a = graph.add_waypoint(0.0, 0.0, 0.0);
        let b = graph.add_waypoint(1.0, 0.0, 0.0);
        let c = graph.add_waypoint(2.0, 0.0, 0.0);
        let island = graph.add_waypoint(100.0, 0.0, 0.0);

        graph.connect(a, b).unwrap();
        graph.connect(b, c).unwrap();

        let reachable = graph.reachable_from(a);
        assert_eq!(reachable.len(), 3);
        assert!(reachable.contains(&a.raw()));
        assert!(reachable.contains(&b.raw()));
        assert!(reachable.contains(&c.raw()));
        assert!(!reachable.contains(&island.raw()));

        assert_eq!(graph.reachable_from(island), vec![island.raw()]);
        assert!(graph.reachable_from(WaypointId::new(99)).is_empty());
    }

    #[test]
    fn test_component_count() {
        let mut graph = WaypointGraph::new();
        assert_eq!(graph.component_count(), 0);

        let a = graph.add_waypoint(0.0, 0.0, 0.0);
        let b = graph.add_waypoint(1.0, 0.0, 0.0);
        let _c = graph.add_waypoint(2.0, 0.0, 0.0);
        assert_eq!(graph.component_count(), 3);

        graph.connect(a, b).unwrap();
        assert_eq!(graph.component_count(), 2);
    }

    #[test]
    fn test_link_segments() {
        let mut graph = WaypointGraph::new();
        let a = graph.add_waypoint(0.0, 0.0, 0.0);
        let b = graph.add_waypoint(1.0, 2.0, 3.0);

        graph.connect(a, b).unwrap();

        let segments = graph.link_segments();
        assert_eq!(segments.len(), 6);
        assert_eq!(&segments[..], &[0.0, 0.0, 0.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_link_segments_for_selected() {
        let mut graph = WaypointGraph::new();
        let a = graph.add_waypoint(0.0, 0.0, 0.0);
        let b = graph.add_waypoint(1.0, 0.0, 0.0);
        let c = graph.add_waypoint(0.0, 1.0, 0.0);

        graph.connect(a, b).unwrap();
        graph.connect(a, c).unwrap();
        graph.connect(b, c).unwrap();

        // Only a's two links, each starting at a's position
        let segments = graph.link_segments_for(a);
        assert_eq!(segments.len(), 12);
        assert_eq!(&segments[0..3], &[0.0, 0.0, 0.0]);
        assert_eq!(&segments[6..9], &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_spatial_pick() {
        let mut graph = WaypointGraph::new();
        let _a = graph.add_waypoint(0.0, 0.0, 0.0);
        let b = graph.add_waypoint(5.0, 5.0, 5.0);

        assert!(graph.spatial_needs_rebuild());
        graph.rebuild_spatial_index();
        assert!(!graph.spatial_needs_rebuild());

        assert_eq!(graph.nearest_to_point(4.0, 4.0, 4.0), Some(b));
        assert_eq!(graph.nearest_to_point_within(4.0, 4.0, 4.0, 1.0), None);
        assert_eq!(graph.waypoints_in_radius(0.0, 0.0, 0.0, 1.0).len(), 1);
    }

    #[test]
    fn test_bounds() {
        let mut graph = WaypointGraph::new();
        graph.add_waypoint(-10.0, -5.0, -1.0);
        graph.add_waypoint(10.0, 5.0, 1.0);

        let bounds = graph.bounds();
        assert_eq!(bounds, Some((-10.0, -5.0, -1.0, 10.0, 5.0, 1.0)));
    }

    #[test]
    fn test_bounds_skips_removed() {
        let mut graph = WaypointGraph::new();
        let outlier = graph.add_waypoint(-100.0, -100.0, -100.0);
        let _b = graph.add_waypoint(10.0, 10.0, 10.0);
        let _c = graph.add_waypoint(20.0, 20.0, 20.0);

        graph.remove_waypoint(outlier);

        let bounds = graph.bounds().unwrap();
        assert_eq!(bounds.0, 10.0);
    }

    #[test]
    fn test_clear_resets_id_counter() {
        let mut graph = WaypointGraph::new();
        graph.add_waypoint(0.0, 0.0, 0.0);
        graph.add_waypoint(1.0, 1.0, 1.0);

        graph.clear();
        assert_eq!(graph.waypoint_count(), 0);
        assert_eq!(graph.link_count(), 0);

        // Fresh ids start from zero again
        let id = graph.add_waypoint(2.0, 2.0, 2.0);
        assert_eq!(id.raw(), 0);
    }

    #[test]
    fn test_snapshot_restore_roundtrip() {
        let mut graph = WaypointGraph::new();
        let a = graph.add_waypoint(0.0, 0.0, 0.0);
        let b = graph.add_waypoint(1.0, 0.0, 0.0);
        let c = graph.add_waypoint(2.0, 0.0, 0.0);
        graph.connect(a, b).unwrap();
        graph.connect(b, c).unwrap();

        let snapshot = graph.snapshot();

        // Mutate, then roll back
        graph.disconnect(a, b).unwrap();
        graph.remove_waypoint(c);
        assert_eq!(graph.link_count(), 0);

        graph.restore(&snapshot).unwrap();
        assert_eq!(graph.waypoint_count(), 3);
        assert_eq!(graph.link_count(), 2);
        assert!(graph.is_connected(a, b));
        assert!(graph.is_connected(b, c));
        assert_eq!(graph.position(c), Some((2.0, 0.0, 0.0)));
    }

    #[test]
    fn test_restore_advances_id_counter() {
        let mut graph = WaypointGraph::new();
        let snapshot = GraphSnapshot {
            waypoints: vec![WaypointRecord { id: 7, x: 0.0, y: 0.0, z: 0.0 }],
            links: vec![],
        };

        graph.restore(&snapshot).unwrap();
        let fresh = graph.add_waypoint(1.0, 1.0, 1.0);
        assert_eq!(fresh.raw(), 8);
    }

    #[test]
    fn test_restore_rejects_dangling_link() {
        let mut graph = WaypointGraph::new();
        let snapshot = GraphSnapshot {
            waypoints: vec![WaypointRecord { id: 0, x: 0.0, y: 0.0, z: 0.0 }],
            links: vec![LinkRecord { a: 0, b: 42 }],
        };

        assert!(graph.restore(&snapshot).is_err());
    }

    #[test]
    fn test_editor_state_flags() {
        let mut graph = WaypointGraph::new();
        let a = graph.add_waypoint(0.0, 0.0, 0.0);

        assert!(!graph.is_selected(a));
        graph.set_selected(a, true);
        graph.set_hovered(a, true);
        assert!(graph.is_selected(a));
        assert!(graph.is_hovered(a));
        assert!(!graph.is_hidden(a));

        graph.set_selected(a, false);
        assert!(!graph.is_selected(a));
    }
}

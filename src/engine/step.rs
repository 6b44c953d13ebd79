//! Per-attempt scratch state for the Metropolis loop.

use crate::lattice::CellSpace;

/// Transient description of one copy attempt: the source/target pair, their
/// cached ids and types, reusable neighbor buffers, and the perimeter deltas
/// the copy would cause.
///
/// One instance lives inside the simulation state and is re-filled on every
/// attempt; the buffers never reallocate after warm-up.
#[derive(Debug, Clone, Default)]
pub struct MHStepInfo {
    /// Model step the attempt belongs to.
    pub step: u64,
    /// Vertex whose id would be overwritten.
    pub target: usize,
    /// Vertex whose id would be copied.
    pub source: usize,
    pub target_id: u32,
    pub source_id: u32,
    pub target_type: u32,
    pub source_type: u32,
    /// Neighbors of the target vertex.
    pub target_neighbors: Vec<u32>,
    /// Neighbors of the source vertex.
    pub source_neighbors: Vec<u32>,
    /// Net perimeter change for the source cell if the copy commits.
    pub source_perimeter_delta: i64,
    /// Net perimeter change for the target cell if the copy commits.
    pub target_perimeter_delta: i64,
    /// Whether the attempt committed.
    pub success: bool,
}

impl MHStepInfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill the scratch for a candidate copy of `source`'s id onto `target`.
    ///
    /// Caches ids, types, neighbor lists, and the perimeter deltas: with n
    /// target neighbors of which k share the source id and m share the
    /// target id, the source cell gains `n - 2k` boundary edges and the
    /// target cell gains `2m - n`.
    pub fn prepare(&mut self, space: &CellSpace, source: usize, target: usize) {
        self.source = source;
        self.target = target;
        self.source_id = space.node_id(source);
        self.target_id = space.node_id(target);
        self.source_type = space.node_type(source);
        self.target_type = space.node_type(target);
        self.success = false;

        self.target_neighbors.clear();
        self.target_neighbors.extend_from_slice(space.neighbors(target));
        self.source_neighbors.clear();
        self.source_neighbors.extend_from_slice(space.neighbors(source));

        let mut like_source = 0i64;
        let mut like_target = 0i64;
        let n = self.target_neighbors.len() as i64;
        for &u in &self.target_neighbors {
            let id = space.node_id(u as usize);
            if id == self.source_id {
                like_source += 1;
            }
            if id == self.target_id {
                like_target += 1;
            }
        }
        self.source_perimeter_delta = n - 2 * like_source;
        self.target_perimeter_delta = 2 * like_target - n;
    }
}

//! Local articulation test protecting cell connectedness.
//!
//! A copy that overwrites a vertex of cell c must not split c in two. The
//! guard checks this with bounded work: it restricts the search to the
//! vertices within two hops of the candidate, builds the induced subgraph
//! of c on that region minus the candidate itself, and verifies that every
//! same-cell neighbor of the candidate lies in one connected component.
//!
//! The test is conservative: a cell whose halves reconnect only outside
//! the two-hop region is treated as fragmenting. Scratch arrays are sized
//! to the lattice once and reused across attempts via generation stamps,
//! so no attempt allocates.

use crate::lattice::CellSpace;

/// Reusable articulation-test scratch for one lattice.
#[derive(Debug, Clone)]
pub struct ConnectivityGuard {
    /// Generation stamp marking membership of the two-hop region.
    region: Vec<u32>,
    /// Generation stamp marking BFS-visited vertices.
    visited: Vec<u32>,
    generation: u32,
    queue: Vec<u32>,
}

impl ConnectivityGuard {
    pub fn new(vertex_count: usize) -> Self {
        Self {
            region: vec![0; vertex_count],
            visited: vec![0; vertex_count],
            generation: 0,
            queue: Vec::with_capacity(64),
        }
    }

    /// Whether overwriting `target`'s id would disconnect the cell that
    /// currently occupies it. The caller guarantees the occupying cell is
    /// not the medium.
    pub fn copy_fragments_cell(&mut self, space: &CellSpace, target: usize) -> bool {
        let cell = space.node_id(target);
        debug_assert_ne!(cell, 0);

        if self.generation == u32::MAX {
            self.region.fill(0);
            self.visited.fill(0);
            self.generation = 0;
        }
        self.generation += 1;
        let gen = self.generation;

        // Stamp the two-hop region around the target, excluding the target:
        // removing it must not let the search sneak back through it.
        let mut anchor = usize::MAX;
        let mut anchor_count = 0usize;
        for &u in space.neighbors(target) {
            let u = u as usize;
            self.region[u] = gen;
            if space.node_id(u) == cell {
                anchor = u;
                anchor_count += 1;
            }
            for &w in space.neighbors(u) {
                let w = w as usize;
                if w != target {
                    self.region[w] = gen;
                }
            }
        }
        self.region[target] = 0;

        // Zero or one same-cell neighbor cannot be separated.
        if anchor_count <= 1 {
            return false;
        }

        // BFS through the cell's vertices inside the region, starting from
        // one anchor; the copy is safe iff it reaches all anchors.
        self.queue.clear();
        self.queue.push(anchor as u32);
        self.visited[anchor] = gen;
        let mut head = 0usize;
        while head < self.queue.len() {
            let v = self.queue[head] as usize;
            head += 1;
            for &u in space.neighbors(v) {
                let u = u as usize;
                if self.visited[u] == gen
                    || self.region[u] != gen
                    || space.node_id(u) != cell
                {
                    continue;
                }
                self.visited[u] = gen;
                self.queue.push(u as u32);
            }
        }
        space
            .neighbors(target)
            .iter()
            .any(|&u| space.node_id(u as usize) == cell && self.visited[u as usize] != gen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattice::Neighborhood;

    fn paint(space: &mut CellSpace, coords: &[[usize; 2]], id: u32) {
        for c in coords {
            let v = space.index_of(c);
            space.set(v, id, 1);
        }
    }

    #[test]
    fn test_bridge_vertex_is_protected() {
        // Dumbbell: two 2x2 blobs joined by a one-wide bridge.
        let mut space = CellSpace::uniform(&[9, 5], false, Neighborhood::VonNeumann).unwrap();
        paint(
            &mut space,
            &[
                [0, 1],
                [0, 2],
                [1, 1],
                [1, 2],
                [4, 1], // bridge column
                [2, 1],
                [3, 1],
                [5, 1],
                [6, 1],
                [7, 1],
                [7, 2],
                [8, 1],
                [8, 2],
            ],
            1,
        );
        let mut guard = ConnectivityGuard::new(space.vertex_count());
        let bridge = space.index_of(&[4, 1]);
        assert!(guard.copy_fragments_cell(&space, bridge));
    }

    #[test]
    fn test_interior_vertex_of_blob_is_free() {
        let mut space = CellSpace::uniform(&[6, 6], false, Neighborhood::VonNeumann).unwrap();
        paint(
            &mut space,
            &[[2, 2], [2, 3], [3, 2], [3, 3], [4, 2], [4, 3]],
            1,
        );
        let mut guard = ConnectivityGuard::new(space.vertex_count());
        // A corner of the blob: its same-cell neighbors stay connected.
        let corner = space.index_of(&[2, 2]);
        assert!(!guard.copy_fragments_cell(&space, corner));
    }

    #[test]
    fn test_line_middle_is_articulation() {
        let mut space = CellSpace::uniform(&[7, 3], false, Neighborhood::VonNeumann).unwrap();
        paint(&mut space, &[[1, 1], [2, 1], [3, 1], [4, 1], [5, 1]], 1);
        let mut guard = ConnectivityGuard::new(space.vertex_count());
        assert!(guard.copy_fragments_cell(&space, space.index_of(&[3, 1])));
        // The line ends are removable.
        assert!(!guard.copy_fragments_cell(&space, space.index_of(&[1, 1])));
        assert!(!guard.copy_fragments_cell(&space, space.index_of(&[5, 1])));
    }

    #[test]
    fn test_moore_diagonal_keeps_cell_connected() {
        // Under Moore adjacency an L-corner stays connected through the
        // diagonal, so the corner vertex is removable.
        let mut space = CellSpace::uniform(&[5, 5], false, Neighborhood::Moore).unwrap();
        paint(&mut space, &[[1, 1], [1, 2], [2, 1]], 1);
        let mut guard = ConnectivityGuard::new(space.vertex_count());
        assert!(!guard.copy_fragments_cell(&space, space.index_of(&[1, 1])));
    }

    #[test]
    fn test_von_neumann_corner_is_articulation() {
        // The same L-corner fragments under von Neumann adjacency.
        let mut space = CellSpace::uniform(&[5, 5], false, Neighborhood::VonNeumann).unwrap();
        paint(&mut space, &[[1, 1], [1, 2], [2, 1]], 1);
        let mut guard = ConnectivityGuard::new(space.vertex_count());
        assert!(guard.copy_fragments_cell(&space, space.index_of(&[1, 1])));
    }

    #[test]
    fn test_scratch_is_reusable() {
        let mut space = CellSpace::uniform(&[7, 3], false, Neighborhood::VonNeumann).unwrap();
        paint(&mut space, &[[1, 1], [2, 1], [3, 1]], 1);
        let mut guard = ConnectivityGuard::new(space.vertex_count());
        for _ in 0..100 {
            assert!(guard.copy_fragments_cell(&space, space.index_of(&[2, 1])));
            assert!(!guard.copy_fragments_cell(&space, space.index_of(&[1, 1])));
        }
    }
}

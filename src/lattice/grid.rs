//! The simulation lattice: an N-dimensional grid exposed as a graph.
//!
//! The grid is flattened row-major and its adjacency is precomputed once at
//! construction into a compressed sparse row (CSR) layout, so neighbor
//! iteration during the Metropolis loop is a contiguous slice read with no
//! per-step arithmetic. Periodic axes wrap with modular arithmetic on grid
//! coordinates; clamped axes simply omit the out-of-range neighbors.
//!
//! Every vertex carries two attributes: the id of the cell occupying it
//! (0 = medium) and the type of that cell (0 = medium type).

use crate::error::PottsError;
use crate::lattice::Neighborhood;

/// Maximum supported grid dimensionality.
pub const MAX_DIMENSIONS: usize = 8;

/// N-dimensional grid with precomputed CSR adjacency and per-vertex
/// cell-id / cell-type attributes.
#[derive(Debug, Clone)]
pub struct CellSpace {
    shape: Vec<usize>,
    periodic: Vec<bool>,
    neighborhood: Neighborhood,
    /// Row-major strides, `strides[i] = prod(shape[i+1..])`.
    strides: Vec<usize>,
    /// CSR row offsets, length `vertex_count + 1`.
    csr_offsets: Vec<u32>,
    /// CSR column indices: neighbor vertex ids, grouped per vertex.
    csr_neighbors: Vec<u32>,
    node_id: Vec<u32>,
    node_type: Vec<u32>,
}

impl CellSpace {
    /// Build a lattice from grid extents, per-axis periodicity flags, and a
    /// neighborhood kind. Validates eagerly: 1..=8 axes, positive extents,
    /// one periodicity flag per axis.
    pub fn new(
        shape: &[usize],
        periodic: &[bool],
        neighborhood: Neighborhood,
    ) -> Result<Self, PottsError> {
        if shape.is_empty() {
            return Err(PottsError::Configuration("grid shape is empty".into()));
        }
        if shape.len() > MAX_DIMENSIONS {
            return Err(PottsError::Configuration(format!(
                "grid has {} axes, at most {} supported",
                shape.len(),
                MAX_DIMENSIONS
            )));
        }
        if let Some(axis) = shape.iter().position(|&d| d == 0) {
            return Err(PottsError::Configuration(format!(
                "grid extent along axis {} is zero",
                axis
            )));
        }
        if periodic.len() != shape.len() {
            return Err(PottsError::Configuration(format!(
                "{} periodicity flags for {} axes",
                periodic.len(),
                shape.len()
            )));
        }
        let vertex_count: usize = shape.iter().product();
        if vertex_count > u32::MAX as usize {
            return Err(PottsError::Configuration(format!(
                "grid has {} vertices, exceeds the u32 index range",
                vertex_count
            )));
        }

        let dims = shape.len();
        let mut strides = vec![1usize; dims];
        for axis in (0..dims - 1).rev() {
            strides[axis] = strides[axis + 1] * shape[axis + 1];
        }

        let offsets = neighborhood.offsets(dims);
        let mut csr_offsets = Vec::with_capacity(vertex_count + 1);
        let mut csr_neighbors = Vec::with_capacity(vertex_count * offsets.len());
        csr_offsets.push(0u32);

        // Odometer over grid coordinates; avoids a divmod chain per vertex.
        let mut coords = vec![0usize; dims];
        let mut neighbor_coords = vec![0usize; dims];
        let mut row = Vec::with_capacity(offsets.len());
        for vertex in 0..vertex_count {
            row.clear();
            'offsets: for off in &offsets {
                for axis in 0..dims {
                    let extent = shape[axis] as i64;
                    let c = coords[axis] as i64 + off[axis];
                    let wrapped = if periodic[axis] {
                        c.rem_euclid(extent)
                    } else if c < 0 || c >= extent {
                        continue 'offsets;
                    } else {
                        c
                    };
                    neighbor_coords[axis] = wrapped as usize;
                }
                let mut idx = 0usize;
                for axis in 0..dims {
                    idx += neighbor_coords[axis] * strides[axis];
                }
                row.push(idx as u32);
            }
            // Tiny periodic extents can wrap distinct offsets onto the same
            // vertex, or onto the vertex itself; the graph keeps neither.
            row.sort_unstable();
            row.dedup();
            csr_neighbors.extend(row.iter().filter(|&&u| u as usize != vertex));
            csr_offsets.push(csr_neighbors.len() as u32);

            let mut axis = dims;
            while axis > 0 {
                axis -= 1;
                coords[axis] += 1;
                if coords[axis] < shape[axis] {
                    break;
                }
                coords[axis] = 0;
            }
        }

        Ok(Self {
            shape: shape.to_vec(),
            periodic: periodic.to_vec(),
            neighborhood,
            strides,
            csr_offsets,
            csr_neighbors,
            node_id: vec![0; vertex_count],
            node_type: vec![0; vertex_count],
        })
    }

    /// Build a lattice with the same periodicity on every axis.
    pub fn uniform(
        shape: &[usize],
        periodic: bool,
        neighborhood: Neighborhood,
    ) -> Result<Self, PottsError> {
        Self::new(shape, &vec![periodic; shape.len()], neighborhood)
    }

    /// Total number of lattice vertices.
    pub fn vertex_count(&self) -> usize {
        self.node_id.len()
    }

    /// Number of grid axes.
    pub fn dims(&self) -> usize {
        self.shape.len()
    }

    /// Grid extents per axis.
    pub fn grid_shape(&self) -> &[usize] {
        &self.shape
    }

    /// Whether the given axis wraps around.
    pub fn is_periodic(&self, axis: usize) -> bool {
        self.periodic[axis]
    }

    /// Per-axis periodicity flags.
    pub fn periodicity(&self) -> &[bool] {
        &self.periodic
    }

    /// The neighborhood kind the adjacency was built with.
    pub fn neighborhood(&self) -> Neighborhood {
        self.neighborhood
    }

    /// Neighbors of vertex `v` as a contiguous slice.
    #[inline]
    pub fn neighbors(&self, v: usize) -> &[u32] {
        let lo = self.csr_offsets[v] as usize;
        let hi = self.csr_offsets[v + 1] as usize;
        &self.csr_neighbors[lo..hi]
    }

    /// All undirected edges, each reported once with `u < v`.
    pub fn edges(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        (0..self.vertex_count()).flat_map(move |u| {
            self.neighbors(u)
                .iter()
                .filter(move |&&v| (u as u32) < v)
                .map(move |&v| (u as u32, v))
        })
    }

    /// Id of the cell occupying vertex `v` (0 = medium).
    #[inline]
    pub fn node_id(&self, v: usize) -> u32 {
        self.node_id[v]
    }

    /// Type of the cell occupying vertex `v` (0 = medium type).
    #[inline]
    pub fn node_type(&self, v: usize) -> u32 {
        self.node_type[v]
    }

    /// Assign vertex `v` to cell `id` of type `type_id`.
    #[inline]
    pub fn set(&mut self, v: usize, id: u32, type_id: u32) {
        self.node_id[v] = id;
        self.node_type[v] = type_id;
    }

    /// The full cell-id attribute array, in row-major vertex order.
    pub fn ids(&self) -> &[u32] {
        &self.node_id
    }

    /// The full cell-type attribute array, in row-major vertex order.
    pub fn types(&self) -> &[u32] {
        &self.node_type
    }

    /// Overwrite both attribute arrays. Lengths must match the lattice;
    /// used by history replay.
    pub(crate) fn load_attributes(&mut self, ids: &[u32], types: &[u32]) {
        self.node_id.copy_from_slice(ids);
        self.node_type.copy_from_slice(types);
    }

    /// Grid coordinates of vertex `v`, written into `out`.
    pub fn coords_of(&self, v: usize, out: &mut [usize]) {
        let mut rem = v;
        for axis in 0..self.shape.len() {
            out[axis] = rem / self.strides[axis];
            rem %= self.strides[axis];
        }
    }

    /// Flat vertex index of the given grid coordinates.
    pub fn index_of(&self, coords: &[usize]) -> usize {
        coords
            .iter()
            .zip(&self.strides)
            .map(|(c, s)| c * s)
            .sum()
    }

    /// Number of boundary edges of cell `id`: edges with exactly one
    /// endpoint in the cell. Full recount, used for audits and after
    /// non-Metropolis mutations.
    pub fn boundary_edge_count(&self, id: u32) -> u64 {
        let mut count = 0u64;
        for v in 0..self.vertex_count() {
            if self.node_id[v] != id {
                continue;
            }
            for &u in self.neighbors(v) {
                if self.node_id[u as usize] != id {
                    count += 1;
                }
            }
        }
        count
    }
}

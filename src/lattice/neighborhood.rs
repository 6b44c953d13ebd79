//! Neighborhood kinds and their displacement offsets.
//!
//! The two classical lattice neighborhoods:
//! - von Neumann: orthogonal steps only, 2N neighbors in N dimensions
//! - Moore: all combinations of {-1, 0, +1} steps, 3^N - 1 neighbors
//!
//! Reference: Toffoli & Margolus, Cellular Automata Machines, 1987

use serde::{Deserialize, Serialize};

/// Lattice neighborhood kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Neighborhood {
    /// Orthogonal neighbors only (2N in N dimensions).
    VonNeumann,
    /// All surrounding grid sites (3^N - 1 in N dimensions).
    Moore,
}

impl Neighborhood {
    /// Number of neighbors of an interior vertex in `dims` dimensions.
    pub fn degree(&self, dims: usize) -> usize {
        match self {
            Neighborhood::VonNeumann => 2 * dims,
            Neighborhood::Moore => 3usize.pow(dims as u32) - 1,
        }
    }

    /// Displacement offsets defining the neighborhood, excluding the zero
    /// vector. Offsets are generated in a fixed deterministic order.
    pub fn offsets(&self, dims: usize) -> Vec<Vec<i64>> {
        match self {
            Neighborhood::VonNeumann => {
                let mut out = Vec::with_capacity(2 * dims);
                for axis in 0..dims {
                    for step in [-1i64, 1] {
                        let mut off = vec![0i64; dims];
                        off[axis] = step;
                        out.push(off);
                    }
                }
                out
            }
            Neighborhood::Moore => {
                let mut out = Vec::with_capacity(3usize.pow(dims as u32) - 1);
                let mut off = vec![-1i64; dims];
                loop {
                    if off.iter().any(|&c| c != 0) {
                        out.push(off.clone());
                    }
                    // Odometer increment over {-1, 0, 1}^dims
                    let mut axis = 0;
                    loop {
                        if axis == dims {
                            return out;
                        }
                        if off[axis] < 1 {
                            off[axis] += 1;
                            break;
                        }
                        off[axis] = -1;
                        axis += 1;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_von_neumann_offset_count() {
        for dims in 1..=4 {
            let offsets = Neighborhood::VonNeumann.offsets(dims);
            assert_eq!(offsets.len(), 2 * dims);
            assert_eq!(offsets.len(), Neighborhood::VonNeumann.degree(dims));
        }
    }

    #[test]
    fn test_moore_offset_count() {
        for dims in 1..=4 {
            let offsets = Neighborhood::Moore.offsets(dims);
            assert_eq!(offsets.len(), 3usize.pow(dims as u32) - 1);
            assert_eq!(offsets.len(), Neighborhood::Moore.degree(dims));
        }
    }

    #[test]
    fn test_von_neumann_offsets_are_unit_steps() {
        for off in Neighborhood::VonNeumann.offsets(3) {
            let nonzero: i64 = off.iter().map(|c| c.abs()).sum();
            assert_eq!(nonzero, 1);
        }
    }

    #[test]
    fn test_moore_excludes_zero_vector() {
        for off in Neighborhood::Moore.offsets(3) {
            assert!(off.iter().any(|&c| c != 0));
        }
    }

    #[test]
    fn test_offsets_are_distinct() {
        let offsets = Neighborhood::Moore.offsets(2);
        for (i, a) in offsets.iter().enumerate() {
            for b in offsets.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }
}

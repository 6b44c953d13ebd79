//! Lattice representation for the simulation.
//!
//! An N-dimensional grid flattened to a vertex-indexed graph with
//! precomputed adjacency, plus the neighborhood kinds that define it.

mod grid;
mod neighborhood;

pub use grid::{CellSpace, MAX_DIMENSIONS};
pub use neighborhood::Neighborhood;

//! Error types for the simulation core.

use thiserror::Error;

/// Errors surfaced by the library API.
///
/// Rejected copy attempts are ordinary outcomes reported through
/// [`crate::engine::MHStepInfo`], never through this type.
#[derive(Debug, Error)]
pub enum PottsError {
    /// Invalid construction input: non-symmetric adhesion matrix, parameter
    /// vector length disagreeing with the declared type count, species field
    /// shape differing from the lattice shape, empty or non-positive grid
    /// extents.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Initial cells cannot be placed: combined desired volume exceeds the
    /// lattice capacity, or a requested centroid falls outside the grid.
    #[error("placement error: {0}")]
    Placement(String),

    /// An internal consistency check failed. Fatal; the simulation state
    /// must be discarded.
    #[error("invariant violation for cell {cell}: {detail}")]
    InvariantViolation { cell: u32, detail: String },

    /// A valid API call made at the wrong time, such as removing a cell that
    /// still occupies vertices or replaying history that was never recorded.
    #[error("invalid operation: {0}")]
    InvalidOperation(String),
}

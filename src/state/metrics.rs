//! Aggregated simulation metrics for logging and export.

use serde::{Deserialize, Serialize};

/// Per-outcome counters for Metropolis attempts.
///
/// `attempts` equals the sum of `commits` and the four rejection classes.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct AttemptCounters {
    /// Total copy attempts proposed.
    pub attempts: u64,
    /// Attempts committed to the lattice.
    pub commits: u64,
    /// Source and target already shared an id.
    pub rejected_identity: u64,
    /// The copy would have fragmented the target's cell.
    pub rejected_connectivity: u64,
    /// The copy would have removed a cell's last vertex.
    pub rejected_volume_floor: u64,
    /// The Boltzmann test failed.
    pub rejected_energy: u64,
}

impl AttemptCounters {
    /// Fraction of attempts that committed, 0 when nothing ran yet.
    pub fn acceptance_rate(&self) -> f64 {
        if self.attempts == 0 {
            0.0
        } else {
            self.commits as f64 / self.attempts as f64
        }
    }
}

/// Snapshot of simulation-level quantities, suitable for the HUD-style
/// loggers and the CSV/JSON exporters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationMetrics {
    /// Completed model steps.
    pub step: u64,
    /// Live cells, medium excluded.
    pub cell_count: usize,
    /// Distinct cell types among live cells.
    pub type_count: usize,
    /// Vertices owned by the medium.
    pub medium_volume: u32,
    /// Vertices owned by cells.
    pub total_cell_volume: u64,
    /// Mean volume per live cell.
    pub mean_cell_volume: f64,
    /// Simulation temperature.
    pub temperature: f64,
    /// Attempt outcome counters since construction.
    pub counters: AttemptCounters,
}

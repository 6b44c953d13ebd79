//! Per-cell state management.
//!
//! Contains the column-oriented cell table, the declarative initial
//! population description, and aggregated simulation metrics.

mod metrics;
mod table;

pub use metrics::{AttemptCounters, SimulationMetrics};
pub use table::{estimate_perimeter, CellRow, CellState, CellTable, MEDIUM_DESIRED};

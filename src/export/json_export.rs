//! JSON snapshot export for simulation state.
//!
//! The snapshot is self-describing: lattice geometry, the full cell table,
//! and the history log travel together, which is enough to reconstruct the
//! run in another process.

use std::path::PathBuf;

use anyhow::Result;
use chrono::Local;
use serde::Serialize;

use crate::engine::{CellPotts, History};
use crate::lattice::Neighborhood;

/// Serialized form of the cell table columns.
#[derive(Debug, Clone, Serialize)]
pub struct TableExport {
    pub names: Vec<String>,
    pub type_ids: Vec<u32>,
    pub volumes: Vec<u32>,
    pub desired_volumes: Vec<u32>,
    pub perimeters: Vec<u32>,
    pub desired_perimeters: Vec<u32>,
    pub positions: Vec<Vec<f64>>,
}

/// Full state export structure
#[derive(Debug, Clone, Serialize)]
pub struct SnapshotExport<'a> {
    /// Export timestamp
    pub exported_at: String,
    /// Export version for compatibility
    pub version: &'static str,
    /// Completed model steps
    pub step: u64,
    /// Grid extents per axis
    pub shape: Vec<usize>,
    /// Per-axis periodicity
    pub periodicity: Vec<bool>,
    /// Lattice neighborhood kind
    pub neighborhood: Neighborhood,
    /// Cell-id attribute array, row-major
    pub ids: &'a [u32],
    /// Cell table columns
    pub table: TableExport,
    /// History of committed copies, when recorded
    pub history: &'a History,
}

/// Export current simulation state to JSON
///
/// Creates the exports directory if it doesn't exist.
/// Filename is auto-generated with timestamp: `snapshot_YYYYMMDD_HHMMSS.json`
///
/// Returns the path to the saved JSON file.
pub fn export_snapshot_json(sim: &CellPotts) -> Result<PathBuf> {
    // Create exports directory
    let dir = PathBuf::from("exports");
    std::fs::create_dir_all(&dir)?;

    // Generate filename with timestamp
    let timestamp = Local::now();
    let filename = format!("snapshot_{}.json", timestamp.format("%Y%m%d_%H%M%S"));
    let path = dir.join(&filename);

    let table = sim.table();
    let rows: Vec<_> = table.iter_rows().collect();
    let export = SnapshotExport {
        exported_at: timestamp.to_rfc3339(),
        version: env!("CARGO_PKG_VERSION"),
        step: sim.step(),
        shape: sim.space().grid_shape().to_vec(),
        periodicity: sim.space().periodicity().to_vec(),
        neighborhood: sim.space().neighborhood(),
        ids: sim.array_ids(),
        table: TableExport {
            names: rows.iter().map(|r| r.name.to_string()).collect(),
            type_ids: rows.iter().map(|r| r.type_id).collect(),
            volumes: rows.iter().map(|r| r.volume).collect(),
            desired_volumes: rows.iter().map(|r| r.desired_volume).collect(),
            perimeters: rows.iter().map(|r| r.perimeter).collect(),
            desired_perimeters: rows.iter().map(|r| r.desired_perimeter).collect(),
            positions: rows.iter().map(|r| r.position.clone()).collect(),
        },
        history: sim.history(),
    };

    let json = serde_json::to_string_pretty(&export)?;
    std::fs::write(&path, json)?;
    log::info!("JSON snapshot exported: {}", path.display());

    Ok(path)
}

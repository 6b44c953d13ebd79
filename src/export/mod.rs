//! Export functionality for simulation data.
//!
//! Provides CSV time-series export and JSON snapshot export.

mod csv_export;
mod json_export;

pub use csv_export::{CsvExporter, TimeSeriesRecord};
pub use json_export::{export_snapshot_json, SnapshotExport, TableExport};

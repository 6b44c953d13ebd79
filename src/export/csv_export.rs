//! CSV time-series export for simulation metrics.

use std::fs::File;
use std::path::PathBuf;

use anyhow::Result;
use chrono::Local;
use serde::Serialize;

use crate::state::SimulationMetrics;

/// Record for CSV time-series export
#[derive(Debug, Clone, Serialize)]
pub struct TimeSeriesRecord {
    /// Completed model steps
    pub step: u64,
    /// Live cells
    pub cell_count: usize,
    /// Vertices owned by the medium
    pub medium_volume: u32,
    /// Vertices owned by cells
    pub total_cell_volume: u64,
    /// Mean volume per live cell
    pub mean_cell_volume: f64,
    /// Simulation temperature
    pub temperature: f64,
    /// Copy attempts so far
    pub attempts: u64,
    /// Committed attempts so far
    pub commits: u64,
    /// Fraction of attempts committed
    pub acceptance_rate: f64,
}

impl From<&SimulationMetrics> for TimeSeriesRecord {
    fn from(m: &SimulationMetrics) -> Self {
        Self {
            step: m.step,
            cell_count: m.cell_count,
            medium_volume: m.medium_volume,
            total_cell_volume: m.total_cell_volume,
            mean_cell_volume: m.mean_cell_volume,
            temperature: m.temperature,
            attempts: m.counters.attempts,
            commits: m.counters.commits,
            acceptance_rate: m.counters.acceptance_rate(),
        }
    }
}

/// CSV exporter for time-series data
pub struct CsvExporter {
    writer: csv::Writer<File>,
    /// Sample interval in model steps
    sample_interval: u64,
    /// Last sampled step
    last_sample_step: Option<u64>,
    /// Path to output file
    path: PathBuf,
}

impl CsvExporter {
    /// Create a new CSV exporter with the given sample interval
    ///
    /// Creates the exports directory if it doesn't exist.
    /// Filename is auto-generated with timestamp.
    pub fn new(sample_interval: u64) -> Result<Self> {
        // Create exports directory
        let dir = PathBuf::from("exports");
        std::fs::create_dir_all(&dir)?;

        // Generate filename with timestamp
        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        let filename = format!("timeseries_{}.csv", timestamp);
        let path = dir.join(&filename);

        // Create writer
        let file = File::create(&path)?;
        let writer = csv::Writer::from_writer(file);

        log::info!("CSV export started: {}", path.display());

        Ok(Self {
            writer,
            sample_interval: sample_interval.max(1),
            last_sample_step: None,
            path,
        })
    }

    /// Record a sample if the interval has elapsed
    pub fn maybe_record(&mut self, metrics: &SimulationMetrics) -> Result<bool> {
        let due = match self.last_sample_step {
            None => true,
            Some(last) => metrics.step >= last + self.sample_interval,
        };
        if due {
            self.record(metrics)?;
        }
        Ok(due)
    }

    /// Force record a sample regardless of interval
    pub fn record(&mut self, metrics: &SimulationMetrics) -> Result<()> {
        let record = TimeSeriesRecord::from(metrics);
        self.writer.serialize(&record)?;
        self.last_sample_step = Some(metrics.step);
        Ok(())
    }

    /// Finish writing and return the output path
    pub fn finish(mut self) -> Result<PathBuf> {
        self.writer.flush()?;
        log::info!("CSV export completed: {}", self.path.display());
        Ok(self.path)
    }

    /// Get the output path
    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

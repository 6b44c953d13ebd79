//! Runtime parameter structures.
//!
//! Parameters load from JSON files when present and fall back to the
//! defaults below, so a checkout runs without any data directory.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::lattice::Neighborhood;

/// Top-level parameters container
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameters {
    /// Engine parameters (temperature, seed, run length)
    pub engine: EngineParameters,
    /// Scenario parameters (lattice and cell population)
    pub scenario: ScenarioParameters,
}

impl Parameters {
    /// Load parameters from JSON files, or use defaults if files don't exist
    pub fn load_or_default() -> Self {
        let engine = EngineParameters::load_or_default("data/parameters/engine.json");
        let scenario = ScenarioParameters::load_or_default("data/parameters/scenario.json");

        Self { engine, scenario }
    }

    /// Load parameters from specific directory
    pub fn load_from_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        let engine = EngineParameters::load_or_default(dir.join("engine.json"));
        let scenario = ScenarioParameters::load_or_default(dir.join("scenario.json"));

        Self { engine, scenario }
    }
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            engine: EngineParameters::default(),
            scenario: ScenarioParameters::default(),
        }
    }
}

/// Metropolis engine parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineParameters {
    /// Boltzmann temperature controlling acceptance of uphill copies
    /// Typical CPM values: 10-30
    /// Reference: Graner & Glazier, Phys Rev Lett 1992
    pub temperature: f64,

    /// RNG seed; identical seeds reproduce identical trajectories
    pub seed: u64,

    /// Model steps to run (one attempt per vertex per step)
    pub model_steps: u64,

    /// Record accepted copies for replay
    pub record_history: bool,

    /// Model steps between CSV samples (0 disables export)
    pub csv_sample_interval: u64,
}

impl EngineParameters {
    /// Load from JSON file or return defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match std::fs::read_to_string(path.as_ref()) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(params) => {
                    log::info!("Loaded engine parameters from {:?}", path.as_ref());
                    params
                }
                Err(e) => {
                    log::warn!("Failed to parse engine parameters: {}, using defaults", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Engine parameters file not found, using defaults");
                Self::default()
            }
        }
    }
}

impl Default for EngineParameters {
    fn default() -> Self {
        Self {
            temperature: 20.0,
            seed: 1,
            model_steps: 500,
            record_history: false,
            csv_sample_interval: 10,
        }
    }
}

/// Lattice and cell population parameters for the demo scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioParameters {
    /// Grid extents per axis
    pub shape: Vec<usize>,

    /// Wrap every axis
    pub periodic: bool,

    /// Lattice neighborhood kind
    pub neighborhood: Neighborhood,

    /// Number of cells to seed
    pub cell_count: usize,

    /// Desired volume per cell
    pub desired_volume: u32,

    /// Cell-cell contact energy
    pub adhesion_cell_cell: i64,

    /// Cell-medium contact energy
    pub adhesion_cell_medium: i64,

    /// Volume constraint stiffness
    pub volume_lambda: i64,
}

impl ScenarioParameters {
    /// Load from JSON file or return defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match std::fs::read_to_string(path.as_ref()) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(params) => {
                    log::info!("Loaded scenario parameters from {:?}", path.as_ref());
                    params
                }
                Err(e) => {
                    log::warn!("Failed to parse scenario parameters: {}, using defaults", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Scenario parameters file not found, using defaults");
                Self::default()
            }
        }
    }
}

impl Default for ScenarioParameters {
    fn default() -> Self {
        Self {
            shape: vec![50, 50],
            periodic: true,
            neighborhood: Neighborhood::Moore,
            cell_count: 4,
            desired_volume: 150,

            // Graner & Glazier 1992, table 1 scale
            adhesion_cell_cell: 2,
            adhesion_cell_medium: 16,
            volume_lambda: 5,
        }
    }
}

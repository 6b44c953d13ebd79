//! Potts Engine - Cellular Potts Model simulation core
//!
//! This library evolves lattice-based cells by Metropolis-Hastings copy
//! attempts whose acceptance is governed by a sum of pluggable energy
//! penalties, with connectivity protection and history replay.

pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod lattice;
pub mod penalty;
pub mod state;

pub use config::Parameters;
pub use engine::{CellPotts, ConnectivityGuard, History, MHStepInfo};
pub use error::PottsError;
pub use lattice::{CellSpace, Neighborhood};
pub use penalty::{
    AdhesionPenalty, ChemotaxisPenalty, MigrationPenalty, Penalty, PerimeterPenalty,
    VolumePenalty,
};
pub use state::{AttemptCounters, CellState, CellTable, SimulationMetrics};

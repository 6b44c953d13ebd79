//! Potts Engine - Entry point
//!
//! Headless Cellular Potts simulation driven by JSON parameters.

use anyhow::Result;
use potts_engine::{
    config::Parameters,
    engine::CellPotts,
    export::{export_snapshot_json, CsvExporter},
    lattice::CellSpace,
    penalty::{AdhesionPenalty, Penalty, VolumePenalty},
    state::CellState,
};

fn main() -> Result<()> {
    env_logger::init();
    log::info!("Potts Engine starting...");

    // Load parameters
    let params = Parameters::load_or_default();
    let scenario = &params.scenario;
    log::info!(
        "Scenario: {:?} lattice, {} cells of desired volume {}",
        scenario.shape,
        scenario.cell_count,
        scenario.desired_volume
    );

    // Assemble the simulation
    let space = CellSpace::uniform(&scenario.shape, scenario.periodic, scenario.neighborhood)?;
    let state = CellState::uniform("Cell", scenario.desired_volume, scenario.cell_count)?;
    let j_cc = scenario.adhesion_cell_cell;
    let j_cm = scenario.adhesion_cell_medium;
    let penalties: Vec<Penalty> = vec![
        AdhesionPenalty::new(vec![vec![0, j_cm], vec![j_cm, j_cc]])?.into(),
        VolumePenalty::new(vec![scenario.volume_lambda])?.into(),
    ];

    let mut sim = CellPotts::with_seed(space, state, penalties, params.engine.seed)?;
    sim.set_temperature(params.engine.temperature);
    sim.set_recording(params.engine.record_history);

    // Run with periodic CSV sampling
    let mut exporter = if params.engine.csv_sample_interval > 0 {
        Some(CsvExporter::new(params.engine.csv_sample_interval)?)
    } else {
        None
    };

    let mut export_error = None;
    sim.run_with(params.engine.model_steps, |s| {
        if let Some(exporter) = exporter.as_mut() {
            if let Err(e) = exporter.maybe_record(&s.metrics()) {
                export_error = Some(e);
                return false;
            }
        }
        true
    });
    if let Some(e) = export_error {
        return Err(e);
    }

    let metrics = sim.metrics();
    log::info!(
        "Finished {} model steps: {} cells, mean volume {:.1}, acceptance rate {:.3}",
        metrics.step,
        metrics.cell_count,
        metrics.mean_cell_volume,
        metrics.counters.acceptance_rate()
    );

    if let Some(exporter) = exporter {
        exporter.finish()?;
    }
    let snapshot = export_snapshot_json(&sim)?;
    log::info!("Snapshot written to {}", snapshot.display());

    sim.check_invariants()?;
    Ok(())
}

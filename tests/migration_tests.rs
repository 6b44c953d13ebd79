//! Integration tests for the Act migration model.
//!
//! A cell with an active protrusion memory travels persistently, so its
//! centroid covers far more ground than the same cell moved by thermal
//! fluctuation alone.
//!
//! Reference: Niculescu, Textor & de Boer, PLoS Comput Biol 2015

use potts_engine::{
    engine::CellPotts,
    lattice::{CellSpace, Neighborhood},
    penalty::{AdhesionPenalty, MigrationPenalty, Penalty, VolumePenalty},
    state::CellState,
};

fn build_sim(act_lambda: i64, seed: u64) -> CellPotts {
    let space = CellSpace::uniform(&[50, 50], false, Neighborhood::Moore).unwrap();
    let state = CellState::uniform("Walker", 200, 1)
        .unwrap()
        .with_positions(vec![vec![25.0, 25.0]]);
    let penalties: Vec<Penalty> = vec![
        AdhesionPenalty::new(vec![vec![0, 20], vec![20, 0]])
            .unwrap()
            .into(),
        VolumePenalty::new(vec![5]).unwrap().into(),
        MigrationPenalty::new(20, vec![act_lambda], vec![50, 50])
            .unwrap()
            .into(),
    ];
    let mut sim = CellPotts::with_seed(space, state, penalties, seed).unwrap();
    sim.set_temperature(20.0);
    sim
}

/// Path length of the centroid, sampled every `window` model steps.
fn centroid_path_length(sim: &mut CellPotts, steps: u64, window: u64) -> f64 {
    let mut total = 0.0;
    let mut last = sim.table().centroid(1);
    for _ in 0..steps / window {
        sim.run(window);
        let now = sim.table().centroid(1);
        total += now
            .iter()
            .zip(&last)
            .map(|(a, b)| (a - b) * (a - b))
            .sum::<f64>()
            .sqrt();
        last = now;
    }
    total
}

/// Directed motion emerges: the active cell's centroid displacement over
/// 5000 model steps strictly exceeds the passive control's.
#[test]
fn test_act_cell_outruns_passive_cell() {
    let mut active = build_sim(200, 808);
    let mut passive = build_sim(0, 808);

    let active_path = centroid_path_length(&mut active, 5000, 100);
    let passive_path = centroid_path_length(&mut passive, 5000, 100);

    assert!(
        active_path > passive_path,
        "active path {:.2} not greater than passive path {:.2}",
        active_path,
        passive_path
    );

    active.check_invariants().unwrap();
    passive.check_invariants().unwrap();
}

/// The migrating cell survives the run intact.
#[test]
fn test_act_cell_stays_whole() {
    let mut sim = build_sim(200, 99);
    sim.run(1000);
    sim.check_invariants().unwrap();
    let volume = sim.table().volume(1);
    assert!(
        (150..=250).contains(&volume),
        "volume {} drifted far from 200",
        volume
    );
}

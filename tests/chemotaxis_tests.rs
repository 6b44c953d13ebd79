//! Integration tests for chemotaxis along a prescribed species field.
//!
//! Reference: Savill & Hogeweg, J Theor Biol 1997

use potts_engine::{
    engine::CellPotts,
    lattice::{CellSpace, Neighborhood},
    penalty::{AdhesionPenalty, ChemotaxisPenalty, Penalty, VolumePenalty},
    state::CellState,
};

/// Species concentration increasing linearly along axis 0.
fn linear_field(shape: &[usize]) -> Vec<f64> {
    let mut field = Vec::with_capacity(shape.iter().product());
    for x in 0..shape[0] {
        for _ in 0..shape[1] {
            field.push(x as f64);
        }
    }
    field
}

fn final_drift(seed: u64) -> f64 {
    let shape = vec![40usize, 20];
    let space = CellSpace::uniform(&shape, false, Neighborhood::Moore).unwrap();
    let state = CellState::uniform("Chaser", 50, 1)
        .unwrap()
        .with_positions(vec![vec![8.0, 10.0]]);
    let penalties: Vec<Penalty> = vec![
        AdhesionPenalty::new(vec![vec![0, 16], vec![16, 0]])
            .unwrap()
            .into(),
        VolumePenalty::new(vec![5]).unwrap().into(),
        ChemotaxisPenalty::new(vec![100], shape.clone(), linear_field(&shape))
            .unwrap()
            .into(),
    ];
    let mut sim = CellPotts::with_seed(space, state, penalties, seed).unwrap();
    sim.set_temperature(20.0);

    let start = sim.table().centroid(1)[0];
    sim.run(150);
    sim.check_invariants().unwrap();
    sim.table().centroid(1)[0] - start
}

/// With positive sensitivity the centroid climbs the gradient on average
/// across independent seeds.
#[test]
fn test_centroid_climbs_gradient() {
    let seeds = [11u64, 22, 33, 44, 55, 66, 77, 88, 99, 110];
    let mean_drift: f64 =
        seeds.iter().map(|&s| final_drift(s)).sum::<f64>() / seeds.len() as f64;
    assert!(
        mean_drift > 0.0,
        "mean drift {:.3} is not uphill",
        mean_drift
    );
}

/// Negative sensitivity reverses the drift.
#[test]
fn test_negative_sensitivity_descends() {
    let shape = vec![40usize, 20];
    let space = CellSpace::uniform(&shape, false, Neighborhood::Moore).unwrap();
    let state = CellState::uniform("Avoider", 50, 1)
        .unwrap()
        .with_positions(vec![vec![30.0, 10.0]]);
    let penalties: Vec<Penalty> = vec![
        AdhesionPenalty::new(vec![vec![0, 16], vec![16, 0]])
            .unwrap()
            .into(),
        VolumePenalty::new(vec![5]).unwrap().into(),
        ChemotaxisPenalty::new(vec![-100], shape.clone(), linear_field(&shape))
            .unwrap()
            .into(),
    ];
    let mut sim = CellPotts::with_seed(space, state, penalties, 5).unwrap();
    sim.set_temperature(20.0);

    let start = sim.table().centroid(1)[0];
    sim.run(150);
    assert!(sim.table().centroid(1)[0] < start);
}

/// The species field can be rewritten between model steps; reversing the
/// gradient reverses the motion.
#[test]
fn test_field_update_changes_direction() {
    let shape = vec![40usize, 20];
    let space = CellSpace::uniform(&shape, false, Neighborhood::Moore).unwrap();
    let state = CellState::uniform("Chaser", 50, 1)
        .unwrap()
        .with_positions(vec![vec![20.0, 10.0]]);
    let penalties: Vec<Penalty> = vec![
        AdhesionPenalty::new(vec![vec![0, 16], vec![16, 0]])
            .unwrap()
            .into(),
        VolumePenalty::new(vec![5]).unwrap().into(),
        ChemotaxisPenalty::new(vec![100], shape.clone(), linear_field(&shape))
            .unwrap()
            .into(),
    ];
    let mut sim = CellPotts::with_seed(space, state, penalties, 13).unwrap();
    sim.set_temperature(20.0);

    sim.run(100);
    let uphill = sim.table().centroid(1)[0];

    // Reverse the gradient in place.
    let reversed: Vec<f64> = linear_field(&shape).iter().map(|c| 39.0 - c).collect();
    for penalty in sim.penalties_mut() {
        if let Penalty::Chemotaxis(chemo) = penalty {
            chemo.set_species(reversed.clone()).unwrap();
        }
    }
    sim.run(100);
    let after_reversal = sim.table().centroid(1)[0];
    assert!(
        after_reversal < uphill,
        "centroid {:.2} did not reverse from {:.2}",
        after_reversal,
        uphill
    );
}

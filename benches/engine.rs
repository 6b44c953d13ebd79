//! Engine benchmarks

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use potts_engine::engine::CellPotts;
use potts_engine::lattice::{CellSpace, Neighborhood};
use potts_engine::penalty::{AdhesionPenalty, Penalty, VolumePenalty};
use potts_engine::state::CellState;

fn build_sim() -> CellPotts {
    let space = CellSpace::uniform(&[50, 50], true, Neighborhood::Moore).unwrap();
    let state = CellState::uniform("Cell", 150, 4).unwrap();
    let penalties: Vec<Penalty> = vec![
        AdhesionPenalty::new(vec![vec![0, 16], vec![16, 2]])
            .unwrap()
            .into(),
        VolumePenalty::new(vec![5]).unwrap().into(),
    ];
    CellPotts::with_seed(space, state, penalties, 1).unwrap()
}

fn bench_lattice_construction(c: &mut Criterion) {
    c.bench_function("lattice_construction", |b| {
        b.iter(|| CellSpace::uniform(black_box(&[50, 50]), true, Neighborhood::Moore))
    });
}

fn bench_model_step(c: &mut Criterion) {
    let mut sim = build_sim();
    sim.run(10); // warm-up to a settled configuration

    c.bench_function("model_step", |b| b.iter(|| black_box(&mut sim).model_step()));
}

fn bench_replay(c: &mut Criterion) {
    let mut sim = build_sim();
    sim.set_recording(true);
    sim.run(50);
    let tip = sim.step();

    c.bench_function("history_replay", |b| {
        b.iter(|| {
            black_box(&mut sim).lattice_at(black_box(tip)).unwrap();
        })
    });
}

criterion_group!(benches, bench_lattice_construction, bench_model_step, bench_replay);
criterion_main!(benches);

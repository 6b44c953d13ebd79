//! Metropolis-Hastings simulation engine.
//!
//! The simulation state owns the lattice, the cell table, the penalty
//! list, the per-attempt scratch, the connectivity guard, the history log,
//! and a seeded RNG. One `mh_step` is a single copy attempt; one
//! `model_step` is one attempt per lattice vertex followed by the penalty
//! tick callbacks.
//!
//! Reference: Graner & Glazier, Phys Rev Lett 1992

mod connectivity;
mod history;
mod placement;
mod step;

pub use connectivity::ConnectivityGuard;
pub use history::History;
pub use placement::{place_cells, recount};
pub use step::MHStepInfo;

use rand::prelude::*;

use crate::error::PottsError;
use crate::lattice::CellSpace;
use crate::penalty::Penalty;
use crate::state::{AttemptCounters, CellState, CellTable, SimulationMetrics};

/// Default simulation temperature.
pub const DEFAULT_TEMPERATURE: f64 = 20.0;

/// Complete state of one Cellular Potts simulation.
///
/// Sole owner of everything it needs for a step; independent instances may
/// run on separate threads.
pub struct CellPotts {
    space: CellSpace,
    table: CellTable,
    penalties: Vec<Penalty>,
    step_info: MHStepInfo,
    guard: ConnectivityGuard,
    history: History,
    /// Scratch lattice for history replay, lazily cloned from the live one.
    replay_scratch: Option<CellSpace>,
    temperature: f64,
    /// Completed model steps.
    step: u64,
    rng: StdRng,
    recording: bool,
    counters: AttemptCounters,
    coords_scratch: Vec<usize>,
}

impl CellPotts {
    /// Build a simulation from a lattice, an initial cell population, and a
    /// penalty list, seeding the RNG from entropy. Validates penalty
    /// parameters against the population and lattice, then places the
    /// cells.
    pub fn new(
        space: CellSpace,
        initial_state: CellState,
        penalties: Vec<Penalty>,
    ) -> Result<Self, PottsError> {
        Self::with_seed(space, initial_state, penalties, rand::thread_rng().gen())
    }

    /// Build a simulation with an explicit RNG seed for reproducible runs.
    pub fn with_seed(
        mut space: CellSpace,
        initial_state: CellState,
        penalties: Vec<Penalty>,
        seed: u64,
    ) -> Result<Self, PottsError> {
        let mut table = initial_state.build(&space)?;
        let max_type_id = table.max_type_id();
        for penalty in &penalties {
            penalty.validate(max_type_id, &space)?;
        }

        let mut rng = StdRng::seed_from_u64(seed);
        place_cells(&mut space, &mut table, &mut rng)?;
        log::info!(
            "placed {} cells of {} types on a {:?} lattice (seed {})",
            table.cell_count(),
            table.type_count(),
            space.grid_shape(),
            seed
        );

        let history = History::new(&space);
        let guard = ConnectivityGuard::new(space.vertex_count());
        let dims = space.dims();
        Ok(Self {
            space,
            table,
            penalties,
            step_info: MHStepInfo::new(),
            guard,
            history,
            replay_scratch: None,
            temperature: DEFAULT_TEMPERATURE,
            step: 0,
            rng,
            recording: false,
            counters: AttemptCounters::default(),
            coords_scratch: vec![0; dims],
        })
    }

    /// One Metropolis copy attempt. Returns whether it committed; the full
    /// outcome is readable from [`CellPotts::step_info`].
    pub fn mh_step(&mut self) -> bool {
        self.counters.attempts += 1;

        // Draw the target uniformly over the lattice and the source
        // uniformly over the target's neighbors.
        let target = self.rng.gen_range(0..self.space.vertex_count());
        let neighbors = self.space.neighbors(target);
        if neighbors.is_empty() {
            // Degenerate single-vertex lattice; nothing to copy from.
            self.counters.rejected_identity += 1;
            return false;
        }
        let source = neighbors[self.rng.gen_range(0..neighbors.len())] as usize;

        self.step_info.step = self.step;
        self.step_info.prepare(&self.space, source, target);

        if self.step_info.source_id == self.step_info.target_id {
            self.counters.rejected_identity += 1;
            return false;
        }

        if self.step_info.target_id != 0 {
            // A non-medium cell must never lose its last vertex and must
            // stay connected.
            if self.table.volume(self.step_info.target_id) <= 1 {
                self.counters.rejected_volume_floor += 1;
                return false;
            }
            if self.guard.copy_fragments_cell(&self.space, target) {
                self.counters.rejected_connectivity += 1;
                return false;
            }
        }

        let mut delta_h = 0i64;
        for penalty in &self.penalties {
            delta_h =
                delta_h.saturating_add(penalty.delta_h(&self.space, &self.table, &self.step_info));
        }

        if delta_h > 0 {
            let threshold = (-(delta_h as f64) / self.temperature).exp();
            if self.rng.gen::<f64>() >= threshold {
                self.counters.rejected_energy += 1;
                return false;
            }
        }

        self.commit();
        true
    }

    /// Apply the prepared copy: lattice write, derived-column bookkeeping,
    /// penalty auxiliary state, history.
    fn commit(&mut self) {
        let source_id = self.step_info.source_id;
        let target_id = self.step_info.target_id;
        let source_type = self.step_info.source_type;
        let target = self.step_info.target;

        self.space.set(target, source_id, source_type);

        self.table.bump_volume(source_id, 1);
        self.table.bump_volume(target_id, -1);
        self.table
            .bump_perimeter(source_id, self.step_info.source_perimeter_delta);
        self.table
            .bump_perimeter(target_id, self.step_info.target_perimeter_delta);

        self.space.coords_of(target, &mut self.coords_scratch);
        if source_id != 0 {
            self.table.add_coords(source_id, &self.coords_scratch);
        }
        if target_id != 0 {
            self.table.sub_coords(target_id, &self.coords_scratch);
        }

        self.step_info.success = true;
        for penalty in &mut self.penalties {
            penalty.on_commit(&self.step_info);
        }
        if self.recording {
            self.history
                .append(self.step, target as u32, source_id, source_type);
        }
        self.counters.commits += 1;
    }

    /// One model step: one attempt per lattice vertex, then the penalty
    /// tick callbacks.
    pub fn model_step(&mut self) {
        self.step += 1;
        for _ in 0..self.space.vertex_count() {
            self.mh_step();
        }
        for penalty in &mut self.penalties {
            penalty.on_tick();
        }
    }

    /// Run `n` model steps.
    pub fn run(&mut self, n: u64) {
        self.run_with(n, |_| true);
    }

    /// Run up to `n` model steps, invoking the callback after each one.
    /// Returning `false` cancels the run; this is the only cancellation
    /// mechanism.
    pub fn run_with<F>(&mut self, n: u64, mut callback: F)
    where
        F: FnMut(&CellPotts) -> bool,
    {
        for _ in 0..n {
            self.model_step();
            if !callback(self) {
                log::info!("run cancelled after step {}", self.step);
                return;
            }
        }
    }

    /// Number of live cells, medium excluded.
    pub fn count_cells(&self) -> usize {
        self.table.cell_count()
    }

    /// Number of distinct cell types among live cells.
    pub fn count_cell_types(&self) -> usize {
        self.table.type_count()
    }

    /// Cell-id attribute array in row-major vertex order.
    pub fn array_ids(&self) -> &[u32] {
        self.space.ids()
    }

    /// Cell-type attribute array in row-major vertex order.
    pub fn array_types(&self) -> &[u32] {
        self.space.types()
    }

    /// Reconstruct the lattice as it was at the end of model step `time`.
    /// The returned lattice is a shared scratch that the next call
    /// overwrites; clone it to retain.
    pub fn lattice_at(&mut self, time: u64) -> Result<&CellSpace, PottsError> {
        let scratch = self
            .replay_scratch
            .get_or_insert_with(|| self.space.clone());
        self.history.replay_onto(scratch, time)?;
        Ok(scratch)
    }

    /// Enable or disable history recording. The first enable fixes the
    /// replay base to the lattice as it is at that moment.
    pub fn set_recording(&mut self, on: bool) {
        if on {
            self.history.arm(&self.space);
        }
        self.recording = on;
    }

    /// Set the Boltzmann temperature.
    pub fn set_temperature(&mut self, temperature: f64) {
        self.temperature = temperature;
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Completed model steps.
    pub fn step(&self) -> u64 {
        self.step
    }

    pub fn space(&self) -> &CellSpace {
        &self.space
    }

    pub fn table(&self) -> &CellTable {
        &self.table
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn penalties(&self) -> &[Penalty] {
        &self.penalties
    }

    /// Mutable penalty access, for collaborators that rewrite auxiliary
    /// state between steps (e.g. a fresh chemotaxis field).
    pub fn penalties_mut(&mut self) -> &mut [Penalty] {
        &mut self.penalties
    }

    /// Outcome of the most recent attempt.
    pub fn step_info(&self) -> &MHStepInfo {
        &self.step_info
    }

    /// Attempt outcome counters since construction.
    pub fn counters(&self) -> AttemptCounters {
        self.counters
    }

    /// Aggregate metrics snapshot.
    pub fn metrics(&self) -> SimulationMetrics {
        let cell_count = self.table.cell_count();
        let total_cell_volume: u64 = self
            .table
            .live_cell_ids()
            .map(|id| self.table.volume(id) as u64)
            .sum();
        SimulationMetrics {
            step: self.step,
            cell_count,
            type_count: self.table.type_count(),
            medium_volume: self.table.volume(0),
            total_cell_volume,
            mean_cell_volume: if cell_count == 0 {
                0.0
            } else {
                total_cell_volume as f64 / cell_count as f64
            },
            temperature: self.temperature,
            counters: self.counters,
        }
    }

    /// Recompute every derived column from the lattice. Call after any
    /// mutation that bypasses the Metropolis loop.
    pub fn recount(&mut self) {
        recount(&self.space, &mut self.table);
    }

    /// Audit the global invariants: volume conservation, perimeter
    /// bookkeeping, type consistency, and per-cell connectedness. Fatal on
    /// failure; the state should be discarded.
    pub fn check_invariants(&self) -> Result<(), PottsError> {
        let mut volume_sum = 0u64;
        for row in self.table.iter_rows() {
            volume_sum += row.volume as u64;
        }
        if volume_sum != self.space.vertex_count() as u64 {
            return Err(PottsError::InvariantViolation {
                cell: 0,
                detail: format!(
                    "volumes sum to {} on a lattice of {} vertices",
                    volume_sum,
                    self.space.vertex_count()
                ),
            });
        }

        for id in self.table.live_cell_ids() {
            let expected = self.space.boundary_edge_count(id);
            if self.table.perimeter(id) as u64 != expected {
                return Err(PottsError::InvariantViolation {
                    cell: id,
                    detail: format!(
                        "perimeter column {} differs from recount {}",
                        self.table.perimeter(id),
                        expected
                    ),
                });
            }
            self.check_cell_connected(id)?;
        }

        for v in 0..self.space.vertex_count() {
            let id = self.space.node_id(v);
            let expected = if id == 0 { 0 } else { self.table.type_id(id) };
            if self.space.node_type(v) != expected {
                return Err(PottsError::InvariantViolation {
                    cell: id,
                    detail: format!(
                        "vertex {} carries type {} but cell {} has type {}",
                        v,
                        self.space.node_type(v),
                        id,
                        expected
                    ),
                });
            }
        }
        Ok(())
    }

    fn check_cell_connected(&self, id: u32) -> Result<(), PottsError> {
        let members: Vec<usize> = (0..self.space.vertex_count())
            .filter(|&v| self.space.node_id(v) == id)
            .collect();
        if members.is_empty() {
            return Err(PottsError::InvariantViolation {
                cell: id,
                detail: "live cell occupies no vertices".into(),
            });
        }
        let mut seen = vec![false; self.space.vertex_count()];
        let mut queue = vec![members[0]];
        seen[members[0]] = true;
        let mut reached = 1usize;
        while let Some(v) = queue.pop() {
            for &u in self.space.neighbors(v) {
                let u = u as usize;
                if self.space.node_id(u) == id && !seen[u] {
                    seen[u] = true;
                    reached += 1;
                    queue.push(u);
                }
            }
        }
        if reached != members.len() {
            return Err(PottsError::InvariantViolation {
                cell: id,
                detail: format!(
                    "cell splits into components: reached {} of {} vertices",
                    reached,
                    members.len()
                ),
            });
        }
        Ok(())
    }
}

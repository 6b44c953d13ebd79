//! Append-only log of accepted copies and time-indexed replay.
//!
//! Five parallel vectors record every committed attempt while recording is
//! enabled. Replay rebuilds the lattice at any past step by reapplying the
//! log onto a preserved snapshot of the initial attribute arrays. The
//! replay target is a shared scratch lattice; callers that want to keep a
//! reconstruction must clone it.

use serde::{Deserialize, Serialize};

use crate::error::PottsError;
use crate::lattice::CellSpace;

/// Append-only history of committed copies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct History {
    steps: Vec<u64>,
    vertices: Vec<u32>,
    new_ids: Vec<u32>,
    new_types: Vec<u32>,
    initial_ids: Vec<u32>,
    initial_types: Vec<u32>,
    /// Whether recording was ever switched on.
    armed: bool,
}

impl History {
    /// Capture the initial lattice attributes as the replay base.
    pub fn new(space: &CellSpace) -> Self {
        Self {
            steps: Vec::new(),
            vertices: Vec::new(),
            new_ids: Vec::new(),
            new_types: Vec::new(),
            initial_ids: space.ids().to_vec(),
            initial_types: space.types().to_vec(),
            armed: false,
        }
    }

    /// Enable replay. The first call re-captures the replay base, so a log
    /// started mid-run replays from the lattice as it was at that moment;
    /// earlier steps are not reconstructible.
    pub(crate) fn arm(&mut self, space: &CellSpace) {
        if !self.armed {
            self.initial_ids.copy_from_slice(space.ids());
            self.initial_types.copy_from_slice(space.types());
            self.armed = true;
        }
    }

    /// Record one committed copy. Steps must arrive in non-decreasing
    /// order; commit order within a step is preserved.
    pub(crate) fn append(&mut self, step: u64, vertex: u32, new_id: u32, new_type: u32) {
        debug_assert!(self.steps.last().map_or(true, |&last| last <= step));
        self.steps.push(step);
        self.vertices.push(vertex);
        self.new_ids.push(new_id);
        self.new_types.push(new_type);
    }

    /// Number of recorded entries.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The step column, non-decreasing.
    pub fn steps(&self) -> &[u64] {
        &self.steps
    }

    /// Rebuild the lattice attributes at the end of model step `time` into
    /// `scratch`. Replays every entry with step <= time in log order.
    pub fn replay_onto(&self, scratch: &mut CellSpace, time: u64) -> Result<(), PottsError> {
        if !self.armed {
            return Err(PottsError::InvalidOperation(
                "history replay requested but recording was never enabled".into(),
            ));
        }
        scratch.load_attributes(&self.initial_ids, &self.initial_types);
        for i in 0..self.steps.len() {
            if self.steps[i] > time {
                break;
            }
            scratch.set(
                self.vertices[i] as usize,
                self.new_ids[i],
                self.new_types[i],
            );
        }
        Ok(())
    }
}

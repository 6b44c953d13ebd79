//! Actin-inspired migration penalty (the "Act" model).
//!
//! Recently conquered vertices carry a decaying activity memory; copies
//! originating from highly active regions are favored, which produces
//! persistent directed motion.
//!
//! Reference: Niculescu, Textor & de Boer, PLoS Comput Biol 2015

use std::collections::HashMap;

use crate::engine::MHStepInfo;
use crate::error::PottsError;
use crate::lattice::CellSpace;
use crate::state::CellTable;

/// Migration penalty maintaining a sparse per-vertex activity memory.
#[derive(Debug, Clone)]
pub struct MigrationPenalty {
    max_act: u32,
    /// Strength per type id; slot 0 is the medium and is always 0.
    lambdas: Vec<i64>,
    /// Expected lattice shape; checked against the simulation's lattice.
    shape: Vec<usize>,
    /// Activity per vertex; absent means 0. Pruned as it decays.
    memory: HashMap<usize, u32>,
}

impl MigrationPenalty {
    /// Build from the activity ceiling, per-type strengths for types
    /// `1..=K`, and the lattice shape the memory is defined over.
    pub fn new(max_act: u32, lambdas: Vec<i64>, shape: Vec<usize>) -> Result<Self, PottsError> {
        if max_act == 0 {
            return Err(PottsError::Configuration(
                "migration penalty needs max_act >= 1".into(),
            ));
        }
        if lambdas.is_empty() {
            return Err(PottsError::Configuration(
                "migration penalty has no strength entries".into(),
            ));
        }
        let mut shifted = Vec::with_capacity(lambdas.len() + 1);
        shifted.push(0);
        shifted.extend(lambdas);
        Ok(Self {
            max_act,
            lambdas: shifted,
            shape,
            memory: HashMap::new(),
        })
    }

    pub(crate) fn validate(
        &self,
        max_type_id: u32,
        space: &CellSpace,
    ) -> Result<(), PottsError> {
        if (self.lambdas.len() as u32) < max_type_id + 1 {
            return Err(PottsError::Configuration(format!(
                "migration penalty covers {} types but the population declares type {}",
                self.lambdas.len() - 1,
                max_type_id
            )));
        }
        if self.shape != space.grid_shape() {
            return Err(PottsError::Configuration(format!(
                "migration memory shape {:?} differs from lattice shape {:?}",
                self.shape,
                space.grid_shape()
            )));
        }
        Ok(())
    }

    /// Activity of a vertex; vertices that never flipped or fully decayed
    /// read as 0.
    pub fn activity(&self, v: usize) -> u32 {
        self.memory.get(&v).copied().unwrap_or(0)
    }

    /// Geometric mean of activity over the members of `N(x) ∪ {x}` that
    /// belong to cell `cell`. The medium and an empty member set both give
    /// 0.
    fn geometric_mean(&self, space: &CellSpace, x: usize, cell: u32) -> f64 {
        if cell == 0 {
            return 0.0;
        }
        let mut product = 1.0f64;
        let mut count = 0u32;
        if space.node_id(x) == cell {
            product *= self.activity(x) as f64;
            count += 1;
        }
        for &u in space.neighbors(x) {
            let u = u as usize;
            if space.node_id(u) == cell {
                product *= self.activity(u) as f64;
                count += 1;
            }
        }
        if count == 0 {
            0.0
        } else {
            product.powf(1.0 / count as f64)
        }
    }

    /// ΔH favoring copies out of active regions: the source side lowers
    /// the energy by λ·GM(target in source's cell)/max_act, the target side
    /// raises it symmetrically. Scaled in the numerator and truncated
    /// toward zero.
    pub fn delta_h(&self, space: &CellSpace, _table: &CellTable, step: &MHStepInfo) -> i64 {
        let source_gm = self.geometric_mean(space, step.target, step.source_id);
        let target_gm = self.geometric_mean(space, step.source, step.target_id);
        let lambda_s = self.lambdas[step.source_type as usize] as f64;
        let lambda_t = self.lambdas[step.target_type as usize] as f64;
        let dh = (-lambda_s * source_gm + lambda_t * target_gm) / self.max_act as f64;
        dh as i64
    }

    /// A committed copy marks the conquered vertex maximally active, or
    /// clears it when the medium took the vertex.
    pub fn on_commit(&mut self, step: &MHStepInfo) {
        if step.source_id == 0 {
            self.memory.remove(&step.target);
        } else {
            self.memory.insert(step.target, self.max_act);
        }
    }

    /// Model-step tick: all positive activities decay by one.
    pub fn on_tick(&mut self) {
        self.memory.retain(|_, act| {
            *act -= 1;
            *act > 0
        });
    }
}

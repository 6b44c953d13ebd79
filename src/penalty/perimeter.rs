//! Quadratic perimeter-constraint penalty.
//!
//! Same form as the volume constraint, applied to the boundary-edge count.
//! The per-attempt perimeter deltas are computed once in the step scratch
//! and shared with the engine, which commits them into the table on
//! acceptance.
//!
//! Reference: Ouchi et al., Physica A 2003

use crate::engine::MHStepInfo;
use crate::error::PottsError;
use crate::lattice::CellSpace;
use crate::state::CellTable;

/// Perimeter penalty with per-type stiffness. The medium contributes
/// nothing.
#[derive(Debug, Clone)]
pub struct PerimeterPenalty {
    /// Stiffness per type id; slot 0 is the medium and is always 0.
    lambdas: Vec<i64>,
}

impl PerimeterPenalty {
    /// Build from per-type stiffnesses for types `1..=K`; the medium slot
    /// is supplied internally.
    pub fn new(lambdas: Vec<i64>) -> Result<Self, PottsError> {
        if lambdas.is_empty() {
            return Err(PottsError::Configuration(
                "perimeter penalty has no stiffness entries".into(),
            ));
        }
        let mut shifted = Vec::with_capacity(lambdas.len() + 1);
        shifted.push(0);
        shifted.extend(lambdas);
        Ok(Self { lambdas: shifted })
    }

    pub(crate) fn validate(&self, max_type_id: u32) -> Result<(), PottsError> {
        if (self.lambdas.len() as u32) < max_type_id + 1 {
            return Err(PottsError::Configuration(format!(
                "perimeter penalty covers {} types but the population declares type {}",
                self.lambdas.len() - 1,
                max_type_id
            )));
        }
        Ok(())
    }

    /// ΔH from the precomputed boundary deltas: for a cell at perimeter P
    /// with target P* and delta d, the change is λ·d·(2(P - P*) + d).
    pub fn delta_h(&self, _space: &CellSpace, table: &CellTable, step: &MHStepInfo) -> i64 {
        let mut dh = 0i64;
        if step.source_id != 0 {
            let deviation = table.perimeter(step.source_id) as i64
                - table.desired_perimeter(step.source_id) as i64;
            let d = step.source_perimeter_delta;
            dh = dh.saturating_add(
                self.lambdas[step.source_type as usize].saturating_mul(d * (2 * deviation + d)),
            );
        }
        if step.target_id != 0 {
            let deviation = table.perimeter(step.target_id) as i64
                - table.desired_perimeter(step.target_id) as i64;
            let d = step.target_perimeter_delta;
            dh = dh.saturating_add(
                self.lambdas[step.target_type as usize].saturating_mul(d * (2 * deviation + d)),
            );
        }
        dh
    }
}

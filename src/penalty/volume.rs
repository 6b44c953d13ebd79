//! Quadratic volume-constraint penalty.
//!
//! Each cell pays λ·(V - V*)² for deviating from its desired volume. A
//! committed copy grows the source cell by one vertex and shrinks the
//! target cell by one, so the energy change reduces to a closed form on
//! the current deviations.
//!
//! Reference: Graner & Glazier, Phys Rev Lett 1992

use crate::engine::MHStepInfo;
use crate::error::PottsError;
use crate::lattice::CellSpace;
use crate::state::CellTable;

/// Volume penalty with per-type stiffness. The medium contributes nothing.
#[derive(Debug, Clone)]
pub struct VolumePenalty {
    /// Stiffness per type id; slot 0 is the medium and is always 0.
    lambdas: Vec<i64>,
}

impl VolumePenalty {
    /// Build from per-type stiffnesses for types `1..=K`; the medium slot
    /// is supplied internally.
    pub fn new(lambdas: Vec<i64>) -> Result<Self, PottsError> {
        if lambdas.is_empty() {
            return Err(PottsError::Configuration(
                "volume penalty has no stiffness entries".into(),
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
                "volume penalty covers {} types but the population declares type {}",
                self.lambdas.len() - 1,
                max_type_id
            )));
        }
        Ok(())
    }

    /// ΔH for growing the source cell by one vertex and shrinking the
    /// target cell by one: λ·((V±1-V*)² - (V-V*)²) per affected cell.
    pub fn delta_h(&self, _space: &CellSpace, table: &CellTable, step: &MHStepInfo) -> i64 {
        let mut dh = 0i64;
        if step.source_id != 0 {
            let deviation =
                table.volume(step.source_id) as i64 - table.desired_volume(step.source_id) as i64;
            dh = dh.saturating_add(
                self.lambdas[step.source_type as usize].saturating_mul(2 * deviation + 1),
            );
        }
        if step.target_id != 0 {
            let deviation =
                table.volume(step.target_id) as i64 - table.desired_volume(step.target_id) as i64;
            dh = dh.saturating_add(
                self.lambdas[step.target_type as usize].saturating_mul(-2 * deviation + 1),
            );
        }
        dh
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattice::Neighborhood;

    fn quadratic(lambda: i64, volume: i64, desired: i64) -> i64 {
        lambda * (volume - desired) * (volume - desired)
    }

    #[test]
    fn test_closed_form_matches_quadratic_difference() {
        let mut space = CellSpace::uniform(&[6, 6], false, Neighborhood::VonNeumann).unwrap();
        let mut table = CellTable::new(2, space.vertex_count());
        let a = table.add_cell("A", 1, 10, 12);
        let b = table.add_cell("B", 1, 8, 10);
        table.set_volume(a, 7);
        table.set_volume(b, 9);
        table.set_volume(0, 36 - 16);

        let s = space.index_of(&[1, 1]);
        let t = space.index_of(&[1, 2]);
        space.set(s, a, 1);
        space.set(t, b, 1);

        let penalty = VolumePenalty::new(vec![5]).unwrap();
        let mut info = MHStepInfo::new();
        info.prepare(&space, s, t);

        let expected = (quadratic(5, 8, 10) - quadratic(5, 7, 10))
            + (quadratic(5, 8, 8) - quadratic(5, 9, 8));
        assert_eq!(penalty.delta_h(&space, &table, &info), expected);
    }

    #[test]
    fn test_medium_contributes_nothing() {
        let mut space = CellSpace::uniform(&[5, 5], false, Neighborhood::VonNeumann).unwrap();
        let mut table = CellTable::new(2, space.vertex_count());
        let a = table.add_cell("A", 1, 4, 8);
        table.set_volume(a, 4);
        let s = space.index_of(&[2, 2]);
        let t = space.index_of(&[2, 3]);
        space.set(s, a, 1);

        let penalty = VolumePenalty::new(vec![5]).unwrap();
        let mut info = MHStepInfo::new();
        info.prepare(&space, s, t);

        // At desired volume, growing by one costs λ·(2·0 + 1); the medium
        // target adds nothing.
        assert_eq!(penalty.delta_h(&space, &table, &info), 5);
    }

    #[test]
    fn test_rejects_empty_lambdas() {
        assert!(VolumePenalty::new(vec![]).is_err());
    }
}

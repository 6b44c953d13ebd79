//! Energy terms for the Metropolis Hamiltonian.
//!
//! Each penalty computes the integer energy change a candidate copy would
//! cause; the engine sums them and applies the Boltzmann acceptance test.
//! Dispatch goes through a fixed enum so the hot terms stay monomorphic.
//!
//! - Adhesion: contact energy on boundary edges (Graner & Glazier 1992)
//! - Volume / Perimeter: quadratic constraints on cell size and boundary
//! - Migration: the Act protrusion model (Niculescu et al. 2015)
//! - Chemotaxis: drift along an external species field (Savill & Hogeweg
//!   1997)

mod adhesion;
mod chemotaxis;
mod migration;
mod perimeter;
mod volume;

pub use adhesion::AdhesionPenalty;
pub use chemotaxis::ChemotaxisPenalty;
pub use migration::MigrationPenalty;
pub use perimeter::PerimeterPenalty;
pub use volume::VolumePenalty;

use crate::engine::MHStepInfo;
use crate::error::PottsError;
use crate::lattice::CellSpace;
use crate::state::CellTable;

/// One energy term of the Hamiltonian.
#[derive(Debug, Clone)]
pub enum Penalty {
    Adhesion(AdhesionPenalty),
    Volume(VolumePenalty),
    Perimeter(PerimeterPenalty),
    Migration(MigrationPenalty),
    Chemotaxis(ChemotaxisPenalty),
}

impl Penalty {
    /// Energy change the candidate copy would cause under this term alone.
    /// Total; never panics.
    pub fn delta_h(&self, space: &CellSpace, table: &CellTable, step: &MHStepInfo) -> i64 {
        match self {
            Penalty::Adhesion(p) => p.delta_h(space, table, step),
            Penalty::Volume(p) => p.delta_h(space, table, step),
            Penalty::Perimeter(p) => p.delta_h(space, table, step),
            Penalty::Migration(p) => p.delta_h(space, table, step),
            Penalty::Chemotaxis(p) => p.delta_h(space, table, step),
        }
    }

    /// Commit auxiliary state after an accepted copy.
    pub fn on_commit(&mut self, step: &MHStepInfo) {
        if let Penalty::Migration(p) = self {
            p.on_commit(step);
        }
    }

    /// Per-model-step tick, run after all attempts of the step.
    pub fn on_tick(&mut self) {
        if let Penalty::Migration(p) = self {
            p.on_tick();
        }
    }

    /// Check parameter coverage against the declared cell types and the
    /// lattice. Run eagerly at simulation construction.
    pub(crate) fn validate(&self, max_type_id: u32, space: &CellSpace) -> Result<(), PottsError> {
        match self {
            Penalty::Adhesion(p) => p.validate(max_type_id),
            Penalty::Volume(p) => p.validate(max_type_id),
            Penalty::Perimeter(p) => p.validate(max_type_id),
            Penalty::Migration(p) => p.validate(max_type_id, space),
            Penalty::Chemotaxis(p) => p.validate(max_type_id, space),
        }
    }
}

impl From<AdhesionPenalty> for Penalty {
    fn from(p: AdhesionPenalty) -> Self {
        Penalty::Adhesion(p)
    }
}

impl From<VolumePenalty> for Penalty {
    fn from(p: VolumePenalty) -> Self {
        Penalty::Volume(p)
    }
}

impl From<PerimeterPenalty> for Penalty {
    fn from(p: PerimeterPenalty) -> Self {
        Penalty::Perimeter(p)
    }
}

impl From<MigrationPenalty> for Penalty {
    fn from(p: MigrationPenalty) -> Self {
        Penalty::Migration(p)
    }
}

impl From<ChemotaxisPenalty> for Penalty {
    fn from(p: ChemotaxisPenalty) -> Self {
        Penalty::Chemotaxis(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattice::Neighborhood;

    #[test]
    fn test_joint_delta_equals_sum_of_parts() {
        let mut space = CellSpace::uniform(&[6, 6], false, Neighborhood::VonNeumann).unwrap();
        let mut table = CellTable::new(2, space.vertex_count());
        let a = table.add_cell("A", 1, 4, 8);
        for coords in [[2, 2], [2, 3], [3, 2]] {
            let v = space.index_of(&coords);
            space.set(v, a, 1);
        }
        table.set_volume(a, 3);
        table.set_perimeter(a, space.boundary_edge_count(a) as u32);
        table.set_volume(0, 33);

        let penalties: Vec<Penalty> = vec![
            AdhesionPenalty::new(vec![vec![0, 20], vec![20, 0]])
                .unwrap()
                .into(),
            VolumePenalty::new(vec![5]).unwrap().into(),
            PerimeterPenalty::new(vec![3]).unwrap().into(),
        ];

        let mut info = MHStepInfo::new();
        info.prepare(&space, space.index_of(&[2, 3]), space.index_of(&[3, 3]));

        // Evaluation is stateless: each term in isolation, twice, in either
        // order, sums to the same total.
        let parts: Vec<i64> = penalties
            .iter()
            .map(|p| p.delta_h(&space, &table, &info))
            .collect();
        let joint: i64 = penalties
            .iter()
            .rev()
            .map(|p| p.delta_h(&space, &table, &info))
            .sum();
        assert_eq!(joint, parts.iter().sum::<i64>());
        assert_ne!(joint, 0);
        for (penalty, &part) in penalties.iter().zip(&parts) {
            assert_eq!(penalty.delta_h(&space, &table, &info), part);
        }
    }
}

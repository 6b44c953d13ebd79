//! Contact-energy penalty between adjacent vertices of different cells.
//!
//! The classical Potts adhesion term: every boundary edge contributes the
//! contact energy J(τ₁, τ₂) of the two touching types.
//!
//! Reference: Graner & Glazier, Phys Rev Lett 1992

use crate::engine::MHStepInfo;
use crate::error::PottsError;
use crate::lattice::CellSpace;
use crate::state::CellTable;

/// Adhesion penalty with a symmetric contact-energy matrix indexed by type
/// id; row and column 0 are the medium.
#[derive(Debug, Clone)]
pub struct AdhesionPenalty {
    /// Flattened (types x types) contact matrix, row-major.
    j: Vec<i64>,
    /// Number of types covered, medium included.
    types: usize,
}

impl AdhesionPenalty {
    /// Build from a square symmetric matrix including the medium row and
    /// column. Rejects non-square or non-symmetric input.
    pub fn new(j: Vec<Vec<i64>>) -> Result<Self, PottsError> {
        let types = j.len();
        if types == 0 {
            return Err(PottsError::Configuration(
                "adhesion matrix is empty".into(),
            ));
        }
        for (i, row) in j.iter().enumerate() {
            if row.len() != types {
                return Err(PottsError::Configuration(format!(
                    "adhesion matrix row {} has {} entries for {} types",
                    i,
                    row.len(),
                    types
                )));
            }
        }
        for i in 0..types {
            for k in (i + 1)..types {
                if j[i][k] != j[k][i] {
                    return Err(PottsError::Configuration(format!(
                        "adhesion matrix is not symmetric at ({}, {})",
                        i, k
                    )));
                }
            }
        }
        Ok(Self {
            j: j.into_iter().flatten().collect(),
            types,
        })
    }

    #[inline]
    fn contact(&self, a: u32, b: u32) -> i64 {
        self.j[a as usize * self.types + b as usize]
    }

    pub(crate) fn validate(&self, max_type_id: u32) -> Result<(), PottsError> {
        if (self.types as u32) < max_type_id + 1 {
            return Err(PottsError::Configuration(format!(
                "adhesion matrix covers {} types but the population declares type {}",
                self.types, max_type_id
            )));
        }
        Ok(())
    }

    /// Energy change of rewriting the target's id: for each target neighbor
    /// the old contact (against the target's type) is replaced by the new
    /// contact (against the source's type); same-cell contacts carry no
    /// energy.
    pub fn delta_h(&self, space: &CellSpace, _table: &CellTable, step: &MHStepInfo) -> i64 {
        let mut dh = 0i64;
        for &u in &step.target_neighbors {
            let u = u as usize;
            let id = space.node_id(u);
            let ty = space.node_type(u);
            if id != step.source_id {
                dh = dh.saturating_add(self.contact(step.source_type, ty));
            }
            if id != step.target_id {
                dh = dh.saturating_sub(self.contact(step.target_type, ty));
            }
        }
        dh
    }
}

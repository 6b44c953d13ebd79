//! Chemotaxis penalty over an externally supplied species field.
//!
//! Cells drift along the gradient of a scalar concentration field aligned
//! with the lattice. The field is owned by the penalty but is meant to be
//! rewritten between model steps by whatever produces it (a PDE solver,
//! a prescribed gradient).
//!
//! Reference: Savill & Hogeweg, J Theor Biol 1997

use crate::engine::MHStepInfo;
use crate::error::PottsError;
use crate::lattice::CellSpace;
use crate::state::CellTable;

/// Chemotaxis penalty with per-type sensitivity. Positive sensitivity
/// drives cells up the gradient, negative down.
#[derive(Debug, Clone)]
pub struct ChemotaxisPenalty {
    /// Sensitivity per type id; slot 0 is the medium and is always 0.
    lambdas: Vec<i64>,
    shape: Vec<usize>,
    species: Vec<f64>,
}

impl ChemotaxisPenalty {
    /// Build from per-type sensitivities for types `1..=K` and a species
    /// field given as a shape plus row-major values.
    pub fn new(
        lambdas: Vec<i64>,
        shape: Vec<usize>,
        species: Vec<f64>,
    ) -> Result<Self, PottsError> {
        if lambdas.is_empty() {
            return Err(PottsError::Configuration(
                "chemotaxis penalty has no sensitivity entries".into(),
            ));
        }
        let expected: usize = shape.iter().product();
        if shape.is_empty() || species.len() != expected {
            return Err(PottsError::Configuration(format!(
                "species field has {} values for shape {:?}",
                species.len(),
                shape
            )));
        }
        let mut shifted = Vec::with_capacity(lambdas.len() + 1);
        shifted.push(0);
        shifted.extend(lambdas);
        Ok(Self {
            lambdas: shifted,
            shape,
            species,
        })
    }

    pub(crate) fn validate(
        &self,
        max_type_id: u32,
        space: &CellSpace,
    ) -> Result<(), PottsError> {
        if (self.lambdas.len() as u32) < max_type_id + 1 {
            return Err(PottsError::Configuration(format!(
                "chemotaxis penalty covers {} types but the population declares type {}",
                self.lambdas.len() - 1,
                max_type_id
            )));
        }
        if self.shape != space.grid_shape() {
            return Err(PottsError::Configuration(format!(
                "species field shape {:?} differs from lattice shape {:?}",
                self.shape,
                space.grid_shape()
            )));
        }
        Ok(())
    }

    /// Current species values, row-major.
    pub fn species(&self) -> &[f64] {
        &self.species
    }

    /// Replace the species field between model steps. The length must
    /// match the field shape.
    pub fn set_species(&mut self, species: Vec<f64>) -> Result<(), PottsError> {
        if species.len() != self.species.len() {
            return Err(PottsError::Configuration(format!(
                "species field has {} values, expected {}",
                species.len(),
                self.species.len()
            )));
        }
        self.species = species;
        Ok(())
    }

    /// ΔH for extending the source cell onto the target vertex: moving up
    /// the gradient is rewarded for positive sensitivity. Copies sourced
    /// from the medium carry no chemotactic term. Truncated toward zero.
    pub fn delta_h(&self, _space: &CellSpace, _table: &CellTable, step: &MHStepInfo) -> i64 {
        if step.source_id == 0 {
            return 0;
        }
        let lambda = self.lambdas[step.source_type as usize] as f64;
        let dh = lambda * (self.species[step.source] - self.species[step.target]);
        dh as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattice::Neighborhood;

    fn gradient_field(shape: &[usize]) -> Vec<f64> {
        // Linearly increasing along axis 0.
        let mut field = Vec::with_capacity(shape.iter().product());
        for x in 0..shape[0] {
            for _ in 0..shape[1] {
                field.push(x as f64);
            }
        }
        field
    }

    #[test]
    fn test_uphill_extension_is_favored() {
        let mut space = CellSpace::uniform(&[6, 6], false, Neighborhood::VonNeumann).unwrap();
        let s = space.index_of(&[2, 2]);
        let t = space.index_of(&[3, 2]);
        space.set(s, 1, 1);

        let penalty =
            ChemotaxisPenalty::new(vec![100], vec![6, 6], gradient_field(&[6, 6])).unwrap();
        let mut info = MHStepInfo::new();
        info.prepare(&space, s, t);
        // Target one unit uphill of the source.
        assert_eq!(penalty.delta_h(&space, &CellTable::new(2, 36), &info), -100);

        // Downhill extension costs the same amount.
        let downhill = space.index_of(&[1, 2]);
        info.prepare(&space, s, downhill);
        assert_eq!(penalty.delta_h(&space, &CellTable::new(2, 36), &info), 100);
    }

    #[test]
    fn test_medium_source_has_no_term() {
        let mut space = CellSpace::uniform(&[6, 6], false, Neighborhood::VonNeumann).unwrap();
        let cell = space.index_of(&[3, 2]);
        space.set(cell, 1, 1);

        let penalty =
            ChemotaxisPenalty::new(vec![100], vec![6, 6], gradient_field(&[6, 6])).unwrap();
        let mut info = MHStepInfo::new();
        // Medium retracting the cell vertex.
        info.prepare(&space, space.index_of(&[4, 2]), cell);
        assert_eq!(penalty.delta_h(&space, &CellTable::new(2, 36), &info), 0);
    }

    #[test]
    fn test_field_shape_validated() {
        assert!(ChemotaxisPenalty::new(vec![100], vec![6, 6], vec![0.0; 35]).is_err());
        assert!(ChemotaxisPenalty::new(vec![100], vec![], vec![]).is_err());
        let penalty =
            ChemotaxisPenalty::new(vec![100], vec![6, 6], vec![0.0; 36]).unwrap();
        let space = CellSpace::uniform(&[5, 5], false, Neighborhood::Moore).unwrap();
        assert!(penalty.validate(1, &space).is_err());
    }

    #[test]
    fn test_set_species_checks_length() {
        let mut penalty =
            ChemotaxisPenalty::new(vec![100], vec![4, 4], vec![0.0; 16]).unwrap();
        assert!(penalty.set_species(vec![1.0; 15]).is_err());
        assert!(penalty.set_species(vec![1.0; 16]).is_ok());
        assert_eq!(penalty.species()[0], 1.0);
    }
}

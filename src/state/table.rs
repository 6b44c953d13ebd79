//! Column-oriented per-cell state table.
//!
//! One row per cell plus row 0 for the medium. Columns are stored as
//! separate vectors so the hot bookkeeping during the Metropolis loop
//! (volume and perimeter updates) touches contiguous memory.
//!
//! Row ids are stable for the lifetime of the table: removing a cell leaves
//! a tombstoned row so the lattice id array never needs renumbering.

use std::collections::BTreeMap;

use crate::error::PottsError;
use crate::lattice::{CellSpace, Neighborhood};

/// Desired-volume sentinel for the medium row. The medium is never subject
/// to volume or perimeter penalties.
pub const MEDIUM_DESIRED: u32 = u32::MAX;

/// Volumes of the unit N-ball for N = 0..=8, used for the default
/// desired-perimeter estimate.
const UNIT_BALL_VOLUME: [f64; 9] = [
    1.0,
    2.0,
    std::f64::consts::PI,
    4.18879020478639,
    4.93480220054468,
    5.26378901391432,
    5.16771278004997,
    4.72476597033140,
    4.05871212641677,
];

/// Estimated boundary-edge count of a digital ball of volume `volume` in
/// `dims` dimensions. Continuous N-ball surface area, scaled up for the
/// denser Moore adjacency.
pub fn estimate_perimeter(volume: u32, dims: usize, neighborhood: Neighborhood) -> u32 {
    if volume == 0 {
        return 0;
    }
    let n = dims as f64;
    let omega = UNIT_BALL_VOLUME[dims];
    let surface = n * omega.powf(1.0 / n) * (volume as f64).powf((n - 1.0) / n);
    let scale = match neighborhood {
        Neighborhood::VonNeumann => 1.0,
        Neighborhood::Moore => neighborhood.degree(dims) as f64 / (2.0 * n),
    };
    (surface * scale).round() as u32
}

/// Declarative description of an initial cell population, consumed by the
/// simulation constructor. One entry per cell type; each type spawns
/// `counts[i]` cells with type id `i + 1`.
#[derive(Debug, Clone)]
pub struct CellState {
    names: Vec<String>,
    desired_volumes: Vec<u32>,
    counts: Vec<usize>,
    desired_perimeters: Option<Vec<u32>>,
    positions: Option<Vec<Vec<f64>>>,
    extra: Vec<(String, Vec<f64>)>,
}

impl CellState {
    /// Describe a population with per-type names, desired volumes, and cell
    /// counts. The three vectors must have equal length.
    pub fn new(
        names: Vec<String>,
        desired_volumes: Vec<u32>,
        counts: Vec<usize>,
    ) -> Result<Self, PottsError> {
        if names.len() != desired_volumes.len() || names.len() != counts.len() {
            return Err(PottsError::Configuration(format!(
                "cell state columns disagree: {} names, {} desired volumes, {} counts",
                names.len(),
                desired_volumes.len(),
                counts.len()
            )));
        }
        if names.is_empty() {
            return Err(PottsError::Configuration(
                "cell state declares no cell types".into(),
            ));
        }
        Ok(Self {
            names,
            desired_volumes,
            counts,
            desired_perimeters: None,
            positions: None,
            extra: Vec::new(),
        })
    }

    /// Single name broadcast across all cells of one type.
    pub fn uniform(
        name: &str,
        desired_volume: u32,
        count: usize,
    ) -> Result<Self, PottsError> {
        Self::new(vec![name.to_string()], vec![desired_volume], vec![count])
    }

    /// Override the per-type desired perimeters (defaults to a digital-ball
    /// estimate from the desired volume).
    pub fn with_desired_perimeters(mut self, perimeters: Vec<u32>) -> Self {
        self.desired_perimeters = Some(perimeters);
        self
    }

    /// Request placement at explicit centroids, one per cell in type order.
    pub fn with_positions(mut self, positions: Vec<Vec<f64>>) -> Self {
        self.positions = Some(positions);
        self
    }

    /// Attach a user column, one value per cell in type order. Carried
    /// verbatim; the engine never interprets it.
    pub fn with_column(mut self, name: &str, values: Vec<f64>) -> Self {
        self.extra.push((name.to_string(), values));
        self
    }

    /// Total number of cells this state describes.
    pub fn cell_count(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Materialize the table for the given lattice. Validates optional
    /// column lengths and position dimensionality.
    pub(crate) fn build(&self, space: &CellSpace) -> Result<CellTable, PottsError> {
        let dims = space.dims();
        let total = self.cell_count();
        if let Some(p) = &self.desired_perimeters {
            if p.len() != self.names.len() {
                return Err(PottsError::Configuration(format!(
                    "{} desired perimeters for {} cell types",
                    p.len(),
                    self.names.len()
                )));
            }
        }
        if let Some(pos) = &self.positions {
            if pos.len() != total {
                return Err(PottsError::Configuration(format!(
                    "{} positions for {} cells",
                    pos.len(),
                    total
                )));
            }
            for p in pos {
                if p.len() != dims {
                    return Err(PottsError::Configuration(format!(
                        "position has {} coordinates on a {}-dimensional lattice",
                        p.len(),
                        dims
                    )));
                }
            }
        }
        for (name, values) in &self.extra {
            if values.len() != total {
                return Err(PottsError::Configuration(format!(
                    "column '{}' has {} values for {} cells",
                    name,
                    values.len(),
                    total
                )));
            }
        }

        let mut table = CellTable::new(dims, space.vertex_count());
        let mut cell_idx = 0usize;
        for (type_idx, count) in self.counts.iter().enumerate() {
            let type_id = (type_idx + 1) as u32;
            let desired_volume = self.desired_volumes[type_idx];
            let desired_perimeter = match &self.desired_perimeters {
                Some(p) => p[type_idx],
                None => estimate_perimeter(desired_volume, dims, space.neighborhood()),
            };
            for _ in 0..*count {
                let id = table.add_cell(
                    &self.names[type_idx],
                    type_id,
                    desired_volume,
                    desired_perimeter,
                );
                if let Some(pos) = &self.positions {
                    table.set_seed_position(id, &pos[cell_idx]);
                }
                cell_idx += 1;
            }
        }
        for (name, values) in &self.extra {
            table.declare_column(name);
            for (i, value) in values.iter().enumerate() {
                table.set_extra((i + 1) as u32, name, *value)?;
            }
        }
        Ok(table)
    }
}

/// Column store of per-cell state. Row 0 is the medium.
#[derive(Debug, Clone)]
pub struct CellTable {
    dims: usize,
    names: Vec<String>,
    type_ids: Vec<u32>,
    volumes: Vec<u32>,
    desired_volumes: Vec<u32>,
    perimeters: Vec<u32>,
    desired_perimeters: Vec<u32>,
    /// Per-cell coordinate sums, `dims` entries per row; the centroid is
    /// the sum divided by the volume.
    coord_sums: Vec<f64>,
    /// Requested initial centroids, `dims` entries per row, NaN when unset.
    seed_positions: Vec<f64>,
    removed: Vec<bool>,
    extra: BTreeMap<String, Vec<f64>>,
}

/// Read-only view of one table row.
#[derive(Debug, Clone, PartialEq)]
pub struct CellRow<'a> {
    pub id: u32,
    pub name: &'a str,
    pub type_id: u32,
    pub volume: u32,
    pub desired_volume: u32,
    pub perimeter: u32,
    pub desired_perimeter: u32,
    pub position: Vec<f64>,
}

impl CellTable {
    /// Empty table holding only the medium row. The medium starts owning
    /// every vertex.
    pub fn new(dims: usize, vertex_count: usize) -> Self {
        Self {
            dims,
            names: vec!["Medium".to_string()],
            type_ids: vec![0],
            volumes: vec![vertex_count as u32],
            desired_volumes: vec![MEDIUM_DESIRED],
            perimeters: vec![0],
            desired_perimeters: vec![0],
            coord_sums: vec![0.0; dims],
            seed_positions: vec![f64::NAN; dims],
            removed: vec![false],
            extra: BTreeMap::new(),
        }
    }

    /// Append a cell row and return its id.
    pub fn add_cell(
        &mut self,
        name: &str,
        type_id: u32,
        desired_volume: u32,
        desired_perimeter: u32,
    ) -> u32 {
        let id = self.names.len() as u32;
        self.names.push(name.to_string());
        self.type_ids.push(type_id);
        self.volumes.push(0);
        self.desired_volumes.push(desired_volume);
        self.perimeters.push(0);
        self.desired_perimeters.push(desired_perimeter);
        self.coord_sums.extend(std::iter::repeat(0.0).take(self.dims));
        self.seed_positions
            .extend(std::iter::repeat(f64::NAN).take(self.dims));
        self.removed.push(false);
        for column in self.extra.values_mut() {
            column.push(0.0);
        }
        id
    }

    /// Tombstone a cell row. Only legal once the cell occupies no vertices;
    /// the row id stays reserved so lattice ids never shift.
    pub fn remove_cell(&mut self, id: u32) -> Result<(), PottsError> {
        let row = self.check_row(id)?;
        if id == 0 {
            return Err(PottsError::InvalidOperation(
                "the medium row cannot be removed".into(),
            ));
        }
        if self.volumes[row] != 0 {
            return Err(PottsError::InvalidOperation(format!(
                "cell {} still occupies {} vertices",
                id, self.volumes[row]
            )));
        }
        self.removed[row] = true;
        Ok(())
    }

    fn check_row(&self, id: u32) -> Result<usize, PottsError> {
        let row = id as usize;
        if row >= self.names.len() || self.removed[row] {
            return Err(PottsError::InvalidOperation(format!(
                "no such cell: {}",
                id
            )));
        }
        Ok(row)
    }

    /// Total rows including the medium and tombstones.
    pub fn rows(&self) -> usize {
        self.names.len()
    }

    /// Number of live cells, excluding the medium.
    pub fn cell_count(&self) -> usize {
        self.removed
            .iter()
            .skip(1)
            .filter(|&&removed| !removed)
            .count()
    }

    /// Number of distinct cell types among live cells.
    pub fn type_count(&self) -> usize {
        let mut types: Vec<u32> = self
            .live_cell_ids()
            .map(|id| self.type_ids[id as usize])
            .collect();
        types.sort_unstable();
        types.dedup();
        types.len()
    }

    /// Largest type id present, medium excluded. Parameter vectors must
    /// cover types `1..=max_type_id`.
    pub fn max_type_id(&self) -> u32 {
        self.live_cell_ids()
            .map(|id| self.type_ids[id as usize])
            .max()
            .unwrap_or(0)
    }

    /// Ids of live cells, medium excluded.
    pub fn live_cell_ids(&self) -> impl Iterator<Item = u32> + '_ {
        (1..self.names.len() as u32).filter(move |&id| !self.removed[id as usize])
    }

    /// Iterate live rows including the medium.
    pub fn iter_rows(&self) -> impl Iterator<Item = CellRow<'_>> + '_ {
        (0..self.names.len() as u32)
            .filter(move |&id| !self.removed[id as usize])
            .map(move |id| self.row(id))
    }

    fn row(&self, id: u32) -> CellRow<'_> {
        let r = id as usize;
        CellRow {
            id,
            name: &self.names[r],
            type_id: self.type_ids[r],
            volume: self.volumes[r],
            desired_volume: self.desired_volumes[r],
            perimeter: self.perimeters[r],
            desired_perimeter: self.desired_perimeters[r],
            position: self.centroid(id),
        }
    }

    pub fn name(&self, id: u32) -> &str {
        &self.names[id as usize]
    }

    #[inline]
    pub fn type_id(&self, id: u32) -> u32 {
        self.type_ids[id as usize]
    }

    #[inline]
    pub fn volume(&self, id: u32) -> u32 {
        self.volumes[id as usize]
    }

    #[inline]
    pub fn desired_volume(&self, id: u32) -> u32 {
        self.desired_volumes[id as usize]
    }

    #[inline]
    pub fn perimeter(&self, id: u32) -> u32 {
        self.perimeters[id as usize]
    }

    #[inline]
    pub fn desired_perimeter(&self, id: u32) -> u32 {
        self.desired_perimeters[id as usize]
    }

    /// Centroid of the cell in lattice coordinates. The medium and empty
    /// cells report the origin.
    pub fn centroid(&self, id: u32) -> Vec<f64> {
        let r = id as usize;
        let volume = self.volumes[r];
        if id == 0 || volume == 0 {
            return vec![0.0; self.dims];
        }
        self.coord_sums[r * self.dims..(r + 1) * self.dims]
            .iter()
            .map(|sum| sum / volume as f64)
            .collect()
    }

    pub(crate) fn set_volume(&mut self, id: u32, volume: u32) {
        self.volumes[id as usize] = volume;
    }

    pub(crate) fn set_perimeter(&mut self, id: u32, perimeter: u32) {
        self.perimeters[id as usize] = perimeter;
    }

    /// Apply a signed volume delta, saturating at the u32 range.
    pub(crate) fn bump_volume(&mut self, id: u32, delta: i64) {
        let r = id as usize;
        let v = (self.volumes[r] as i64).saturating_add(delta);
        self.volumes[r] = v.clamp(0, u32::MAX as i64) as u32;
    }

    /// Apply a signed perimeter delta, saturating at the u32 range.
    pub(crate) fn bump_perimeter(&mut self, id: u32, delta: i64) {
        let r = id as usize;
        let p = (self.perimeters[r] as i64).saturating_add(delta);
        self.perimeters[r] = p.clamp(0, u32::MAX as i64) as u32;
    }

    /// Add a vertex coordinate into the cell's centroid accumulator.
    pub(crate) fn add_coords(&mut self, id: u32, coords: &[usize]) {
        let base = id as usize * self.dims;
        for (axis, &c) in coords.iter().enumerate() {
            self.coord_sums[base + axis] += c as f64;
        }
    }

    /// Remove a vertex coordinate from the cell's centroid accumulator.
    pub(crate) fn sub_coords(&mut self, id: u32, coords: &[usize]) {
        let base = id as usize * self.dims;
        for (axis, &c) in coords.iter().enumerate() {
            self.coord_sums[base + axis] -= c as f64;
        }
    }

    pub(crate) fn reset_coords(&mut self) {
        self.coord_sums.fill(0.0);
    }

    fn set_seed_position(&mut self, id: u32, position: &[f64]) {
        let base = id as usize * self.dims;
        self.seed_positions[base..base + self.dims].copy_from_slice(position);
    }

    /// Requested initial centroid for a cell, if the population declared
    /// explicit positions.
    pub fn seed_position(&self, id: u32) -> Option<&[f64]> {
        let base = id as usize * self.dims;
        let slice = &self.seed_positions[base..base + self.dims];
        if slice.iter().any(|c| c.is_nan()) {
            None
        } else {
            Some(slice)
        }
    }

    /// Whether any cell carries an explicit initial centroid.
    pub fn has_seed_positions(&self) -> bool {
        self.live_cell_ids()
            .any(|id| self.seed_position(id).is_some())
    }

    /// Register a user column, zero-filled for existing rows.
    pub fn declare_column(&mut self, name: &str) {
        self.extra
            .entry(name.to_string())
            .or_insert_with(|| vec![0.0; self.names.len()]);
    }

    /// Read a value from a user column.
    pub fn extra(&self, id: u32, column: &str) -> Result<f64, PottsError> {
        let row = self.check_row(id)?;
        self.extra
            .get(column)
            .map(|c| c[row])
            .ok_or_else(|| PottsError::InvalidOperation(format!("no such column: {}", column)))
    }

    /// Write a value into a user column.
    pub fn set_extra(&mut self, id: u32, column: &str, value: f64) -> Result<(), PottsError> {
        let row = self.check_row(id)?;
        match self.extra.get_mut(column) {
            Some(c) => {
                c[row] = value;
                Ok(())
            }
            None => Err(PottsError::InvalidOperation(format!(
                "no such column: {}",
                column
            ))),
        }
    }

    /// Names of user columns.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.extra.keys().map(|s| s.as_str())
    }
}

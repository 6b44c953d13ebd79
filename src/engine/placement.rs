//! Initial cell placement by seed-and-grow.
//!
//! Each cell claims a seed vertex, then the frontiers grow round-robin one
//! vertex at a time until every cell reaches its desired volume or no
//! frontier can expand. Growth into occupied vertices never happens, so
//! cells stay connected and disjoint by construction.
//!
//! With explicit positions the procedure is fully deterministic; otherwise
//! seeds and growth directions come from the simulation RNG.

use std::collections::VecDeque;

use rand::prelude::*;

use crate::error::PottsError;
use crate::lattice::CellSpace;
use crate::state::CellTable;

/// Seed every cell and grow it toward its desired volume. Fails if the
/// combined desired volume exceeds the lattice, if a requested centroid is
/// out of range, or if two seeds collide. Saturation (frontiers stuck
/// before reaching the desired volumes) is not an error.
pub fn place_cells(
    space: &mut CellSpace,
    table: &mut CellTable,
    rng: &mut StdRng,
) -> Result<(), PottsError> {
    let capacity = space.vertex_count() as u64;
    // Every cell occupies at least its seed vertex.
    let demand: u64 = table
        .live_cell_ids()
        .map(|id| table.desired_volume(id).max(1) as u64)
        .sum();
    if demand > capacity {
        return Err(PottsError::Placement(format!(
            "combined desired volume {} exceeds lattice capacity {}",
            demand, capacity
        )));
    }

    let cells: Vec<u32> = table.live_cell_ids().collect();
    let deterministic = table.has_seed_positions();

    // Seed selection.
    let mut seeds: Vec<usize> = Vec::with_capacity(cells.len());
    if deterministic {
        let mut coords = vec![0usize; space.dims()];
        for &id in &cells {
            let position = table.seed_position(id).ok_or_else(|| {
                PottsError::Placement(format!(
                    "cell {} has no position but others do; positions must cover every cell",
                    id
                ))
            })?;
            for (axis, &c) in position.iter().enumerate() {
                let extent = space.grid_shape()[axis];
                let rounded = c.round();
                if rounded < 0.0 || rounded >= extent as f64 {
                    return Err(PottsError::Placement(format!(
                        "cell {} position {:?} is outside the grid",
                        id, position
                    )));
                }
                coords[axis] = rounded as usize;
            }
            seeds.push(space.index_of(&coords));
        }
        for (i, &a) in seeds.iter().enumerate() {
            if seeds[..i].contains(&a) {
                return Err(PottsError::Placement(format!(
                    "cells {} and {} share the seed vertex {}",
                    cells[i],
                    cells[seeds[..i].iter().position(|&b| b == a).unwrap()],
                    a
                )));
            }
        }
    } else {
        while seeds.len() < cells.len() {
            let v = rng.gen_range(0..space.vertex_count());
            if !seeds.contains(&v) {
                seeds.push(v);
            }
        }
    }

    for (&id, &seed) in cells.iter().zip(&seeds) {
        space.set(seed, id, table.type_id(id));
    }

    // Round-robin growth, one vertex per turn.
    let mut frontiers: Vec<VecDeque<usize>> = seeds.iter().map(|&s| VecDeque::from([s])).collect();
    let mut volumes: Vec<u32> = vec![1; cells.len()];
    let mut grew = true;
    while grew {
        grew = false;
        for (i, &id) in cells.iter().enumerate() {
            if volumes[i] >= table.desired_volume(id) {
                continue;
            }
            while let Some(&v) = frontiers[i].front() {
                let free: Vec<usize> = space
                    .neighbors(v)
                    .iter()
                    .map(|&u| u as usize)
                    .filter(|&u| space.node_id(u) == 0)
                    .collect();
                if free.is_empty() {
                    frontiers[i].pop_front();
                    continue;
                }
                let pick = if deterministic {
                    free[0]
                } else {
                    free[rng.gen_range(0..free.len())]
                };
                space.set(pick, id, table.type_id(id));
                frontiers[i].push_back(pick);
                volumes[i] += 1;
                grew = true;
                break;
            }
        }
    }

    for (i, &id) in cells.iter().enumerate() {
        if volumes[i] < table.desired_volume(id) {
            log::warn!(
                "cell {} saturated at volume {} of desired {}",
                id,
                volumes[i],
                table.desired_volume(id)
            );
        }
    }

    recount(space, table);
    Ok(())
}

/// Recompute volumes, perimeters, and centroid accumulators for every row
/// from the lattice. Required after any mutation that bypasses the
/// Metropolis loop.
pub fn recount(space: &CellSpace, table: &mut CellTable) {
    let rows = table.rows();
    let mut volumes = vec![0u32; rows];
    let mut perimeters = vec![0u32; rows];
    table.reset_coords();

    let mut coords = vec![0usize; space.dims()];
    for v in 0..space.vertex_count() {
        let id = space.node_id(v);
        volumes[id as usize] += 1;
        for &u in space.neighbors(v) {
            if space.node_id(u as usize) != id {
                perimeters[id as usize] += 1;
            }
        }
        if id != 0 {
            space.coords_of(v, &mut coords);
            table.add_coords(id, &coords);
        }
    }
    for id in 0..rows as u32 {
        table.set_volume(id, volumes[id as usize]);
        table.set_perimeter(id, perimeters[id as usize]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattice::Neighborhood;
    use crate::state::CellState;
    use rand::SeedableRng;

    #[test]
    fn test_random_placement_reaches_desired_volumes() {
        let mut space = CellSpace::uniform(&[20, 20], true, Neighborhood::Moore).unwrap();
        let state = CellState::uniform("A", 30, 3).unwrap();
        let mut table = state.build(&space).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        place_cells(&mut space, &mut table, &mut rng).unwrap();

        for id in 1..=3 {
            assert_eq!(table.volume(id), 30);
            assert_eq!(
                table.perimeter(id),
                space.boundary_edge_count(id) as u32
            );
        }
        assert_eq!(table.volume(0), 400 - 90);
    }

    #[test]
    fn test_positioned_placement_is_deterministic() {
        let build = || {
            let mut space =
                CellSpace::uniform(&[15, 15], false, Neighborhood::VonNeumann).unwrap();
            let state = CellState::uniform("A", 12, 2)
                .unwrap()
                .with_positions(vec![vec![3.0, 3.0], vec![11.0, 11.0]]);
            let mut table = state.build(&space).unwrap();
            let mut rng = StdRng::seed_from_u64(0);
            place_cells(&mut space, &mut table, &mut rng).unwrap();
            space.ids().to_vec()
        };
        assert_eq!(build(), build());
    }

    #[test]
    fn test_capacity_overflow_rejected() {
        let mut space = CellSpace::uniform(&[5, 5], false, Neighborhood::VonNeumann).unwrap();
        let state = CellState::uniform("A", 30, 1).unwrap();
        let mut table = state.build(&space).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            place_cells(&mut space, &mut table, &mut rng),
            Err(PottsError::Placement(_))
        ));
    }

    #[test]
    fn test_out_of_range_position_rejected() {
        let mut space = CellSpace::uniform(&[10, 10], false, Neighborhood::VonNeumann).unwrap();
        let state = CellState::uniform("A", 5, 1)
            .unwrap()
            .with_positions(vec![vec![12.0, 3.0]]);
        let mut table = state.build(&space).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            place_cells(&mut space, &mut table, &mut rng),
            Err(PottsError::Placement(_))
        ));
    }

    #[test]
    fn test_placed_cells_are_connected() {
        let mut space = CellSpace::uniform(&[20, 20], false, Neighborhood::VonNeumann).unwrap();
        let state = CellState::uniform("A", 25, 2).unwrap();
        let mut table = state.build(&space).unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        place_cells(&mut space, &mut table, &mut rng).unwrap();

        for id in 1..=2u32 {
            let members: Vec<usize> = (0..space.vertex_count())
                .filter(|&v| space.node_id(v) == id)
                .collect();
            let mut seen = vec![false; space.vertex_count()];
            let mut queue = VecDeque::from([members[0]]);
            seen[members[0]] = true;
            let mut reached = 1;
            while let Some(v) = queue.pop_front() {
                for &u in space.neighbors(v) {
                    let u = u as usize;
                    if space.node_id(u) == id && !seen[u] {
                        seen[u] = true;
                        reached += 1;
                        queue.push_back(u);
                    }
                }
            }
            assert_eq!(reached, members.len());
        }
    }
}

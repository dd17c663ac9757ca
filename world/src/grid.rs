//! Toroidal occupancy grid allowing several agents per cell.

use predation_core::{AgentId, CellCoord, GridDimensions, Neighborhood};
use rand::Rng;

/// Dense cell-to-occupants table.
///
/// Each cell keeps its occupants in insertion order so random picks made
/// from a cell are reproducible for a given seed.
#[derive(Clone, Debug)]
pub(crate) struct OccupancyGrid {
    dimensions: GridDimensions,
    cells: Vec<Vec<AgentId>>,
}

impl OccupancyGrid {
    pub(crate) fn new(dimensions: GridDimensions) -> Self {
        Self {
            dimensions,
            cells: vec![Vec::new(); dimensions.cell_count()],
        }
    }

    pub(crate) fn place(&mut self, agent: AgentId, cell: CellCoord) {
        if let Some(occupants) = self.slot_mut(cell) {
            occupants.push(agent);
        }
    }

    /// Deregisters `agent` from `cell`, returning whether it was present.
    pub(crate) fn remove(&mut self, agent: AgentId, cell: CellCoord) -> bool {
        let Some(occupants) = self.slot_mut(cell) else {
            return false;
        };
        match occupants.iter().position(|occupant| *occupant == agent) {
            Some(position) => {
                let _ = occupants.remove(position);
                true
            }
            None => false,
        }
    }

    pub(crate) fn relocate(&mut self, agent: AgentId, from: CellCoord, to: CellCoord) {
        if self.remove(agent, from) {
            self.place(agent, to);
        }
    }

    pub(crate) fn contents(&self, cell: CellCoord) -> &[AgentId] {
        self.dimensions
            .index(cell)
            .and_then(|index| self.cells.get(index))
            .map_or(&[], Vec::as_slice)
    }

    fn slot_mut(&mut self, cell: CellCoord) -> Option<&mut Vec<AgentId>> {
        debug_assert!(
            self.dimensions.contains(cell),
            "cell {cell:?} lies outside the grid"
        );
        let index = self.dimensions.index(cell)?;
        self.cells.get_mut(index)
    }
}

/// Picks one of the toroidal neighbours of `cell` uniformly at random.
///
/// The candidate set is the neighbourhood's fixed offset table, so on grids
/// narrower than three cells several offsets can land on the same cell.
pub fn random_neighbor_cell<R>(
    dimensions: GridDimensions,
    cell: CellCoord,
    neighborhood: Neighborhood,
    rng: &mut R,
) -> CellCoord
where
    R: Rng + ?Sized,
{
    let offsets = neighborhood.offsets();
    let (dx, dy) = offsets[rng.gen_range(0..offsets.len())];
    dimensions.wrap(cell, dx, dy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn cells_hold_multiple_occupants() {
        let mut grid = OccupancyGrid::new(GridDimensions::new(3, 3));
        let cell = CellCoord::new(1, 2);
        grid.place(AgentId::new(1), cell);
        grid.place(AgentId::new(2), cell);

        assert_eq!(grid.contents(cell), &[AgentId::new(1), AgentId::new(2)]);
        assert!(grid.contents(CellCoord::new(0, 0)).is_empty());
    }

    #[test]
    fn remove_is_idempotent() {
        let mut grid = OccupancyGrid::new(GridDimensions::new(3, 3));
        let cell = CellCoord::new(2, 0);
        grid.place(AgentId::new(4), cell);

        assert!(grid.remove(AgentId::new(4), cell));
        assert!(!grid.remove(AgentId::new(4), cell));
        assert!(grid.contents(cell).is_empty());
    }

    #[test]
    fn relocate_preserves_identity() {
        let mut grid = OccupancyGrid::new(GridDimensions::new(4, 4));
        let from = CellCoord::new(0, 0);
        let to = CellCoord::new(3, 3);
        grid.place(AgentId::new(7), from);
        grid.relocate(AgentId::new(7), from, to);

        assert!(grid.contents(from).is_empty());
        assert_eq!(grid.contents(to), &[AgentId::new(7)]);
    }

    #[test]
    fn relocate_ignores_absent_agents() {
        let mut grid = OccupancyGrid::new(GridDimensions::new(4, 4));
        grid.relocate(AgentId::new(7), CellCoord::new(0, 0), CellCoord::new(1, 1));
        assert!(grid.contents(CellCoord::new(1, 1)).is_empty());
    }

    #[test]
    fn moore_steps_land_on_adjacent_wrapped_cells() {
        let dimensions = GridDimensions::new(6, 4);
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let origin = CellCoord::new(0, 0);
        let mut seen = std::collections::BTreeSet::new();

        for _ in 0..400 {
            let next = random_neighbor_cell(dimensions, origin, Neighborhood::Moore, &mut rng);
            assert!(dimensions.contains(next));
            assert_ne!(next, origin);
            let _ = seen.insert(next);
        }

        assert_eq!(seen.len(), 8, "every Moore neighbour should be reachable");
        assert!(seen.contains(&CellCoord::new(5, 3)));
    }

    #[test]
    fn von_neumann_steps_never_move_diagonally() {
        let dimensions = GridDimensions::new(5, 5);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let origin = CellCoord::new(2, 2);

        for _ in 0..200 {
            let next =
                random_neighbor_cell(dimensions, origin, Neighborhood::VonNeumann, &mut rng);
            let distance =
                next.column().abs_diff(origin.column()) + next.row().abs_diff(origin.row());
            assert_eq!(distance, 1);
        }
    }

    #[test]
    fn single_cell_grid_wraps_onto_itself() {
        let dimensions = GridDimensions::new(1, 1);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let origin = CellCoord::new(0, 0);
        let next = random_neighbor_cell(dimensions, origin, Neighborhood::Moore, &mut rng);
        assert_eq!(next, origin);
    }
}

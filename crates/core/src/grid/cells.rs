//! Mutation view tying the cell store to the chunk scheduler
//!
//! Rules never write to [`CellGrid`] directly: every write goes through
//! [`Cells`], which stamps the cell as changed and reports it to the
//! [`ChunkScheduler`] so the owning chunk is visited again next tick.

use crate::core_types::{Cell, CellType, Metadata, SubState};
use crate::grid::CellGrid;
use crate::scheduler::ChunkScheduler;

/// Borrowed grid + scheduler for the duration of one rule or fire step
pub struct Cells<'a> {
    grid: &'a mut CellGrid,
    scheduler: &'a mut ChunkScheduler,
    tick: u64,
}

impl<'a> Cells<'a> {
    pub fn new(grid: &'a mut CellGrid, scheduler: &'a mut ChunkScheduler, tick: u64) -> Self {
        Self {
            grid,
            scheduler,
            tick,
        }
    }

    #[inline]
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Read-only access to the store
    #[inline]
    pub fn grid(&self) -> &CellGrid {
        self.grid
    }

    /// Report a mutation at `idx`
    pub fn mark_changed(&mut self, idx: usize) {
        self.grid.stamp_changed(idx, self.tick);
        let (x, y) = self.grid.coords(idx);
        self.scheduler.mark_change(x, y);
    }

    // ========================================================================
    // MARKED WRITES
    // ========================================================================

    pub fn set(&mut self, idx: usize, cell: Cell) {
        self.grid.set(idx, cell);
        self.mark_changed(idx);
    }

    /// Place a newly created cell; it will not act again this tick
    pub fn spawn(&mut self, idx: usize, cell: Cell) {
        self.grid.set(idx, cell);
        self.grid.stamp_moved(idx, self.tick);
        self.mark_changed(idx);
    }

    /// Move the contents of `from` into `to` (exchanging with whatever was there)
    pub fn swap(&mut self, from: usize, to: usize) {
        self.grid.swap(from, to);
        self.grid.stamp_moved(to, self.tick);
        self.mark_changed(from);
        self.mark_changed(to);
    }

    pub fn set_cell_type(&mut self, idx: usize, cell_type: CellType) {
        self.grid.set_cell_type(idx, cell_type);
        self.mark_changed(idx);
    }

    pub fn set_sub_state(&mut self, idx: usize, sub_state: SubState) {
        self.grid.set_sub_state(idx, sub_state);
        self.mark_changed(idx);
    }

    pub fn set_water(&mut self, idx: usize, water: u8) {
        if self.grid.water(idx) != water {
            self.grid.set_water(idx, water);
            self.mark_changed(idx);
        }
    }

    pub fn set_nutrient(&mut self, idx: usize, nutrient: u8) {
        if self.grid.nutrient(idx) != nutrient {
            self.grid.set_nutrient(idx, nutrient);
            self.mark_changed(idx);
        }
    }

    pub fn set_energy(&mut self, idx: usize, energy: u8) {
        if self.grid.energy(idx) != energy {
            self.grid.set_energy(idx, energy);
            self.mark_changed(idx);
        }
    }

    pub fn set_metadata(&mut self, idx: usize, metadata: Metadata) {
        if self.grid.metadata(idx) != metadata {
            self.grid.set_metadata(idx, metadata);
            self.mark_changed(idx);
        }
    }

    /// Whether the cell at `idx` already moved or was created this tick
    #[inline]
    pub fn already_acted(&self, idx: usize) -> bool {
        self.grid.moved_during(idx, self.tick)
    }

    /// Whether `idx` or any Moore neighbour changed since the previous rule pass
    pub fn neighborhood_changed(&self, idx: usize) -> bool {
        self.grid.changed_recently(idx, self.tick)
            || self
                .grid
                .neighbors(idx)
                .any(|(_, _, n)| self.grid.changed_recently(n, self.tick))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::Organ;

    #[test]
    fn test_writes_stamp_and_schedule() {
        let mut grid = CellGrid::new(16, 16);
        let mut scheduler = ChunkScheduler::new(16, 16, 8, 3);
        let idx = grid.index(12, 3).unwrap();
        {
            let mut cells = Cells::new(&mut grid, &mut scheduler, 1);
            cells.set(idx, Cell::plant(Organ::Stem));
        }
        assert_eq!(grid.changed_cells(), &[idx]);
        assert_eq!(scheduler.activity(1), 3);
    }

    #[test]
    fn test_unchanged_value_is_not_reported() {
        let mut grid = CellGrid::new(8, 8);
        let mut scheduler = ChunkScheduler::new(8, 8, 8, 3);
        {
            let mut cells = Cells::new(&mut grid, &mut scheduler, 1);
            cells.set_energy(0, 0);
        }
        assert!(grid.changed_cells().is_empty());
        assert_eq!(scheduler.active_chunk_count(), 0);
    }

    #[test]
    fn test_swap_marks_destination_as_acted() {
        let mut grid = CellGrid::new(4, 4);
        let mut scheduler = ChunkScheduler::new(4, 4, 4, 3);
        grid.set(1, Cell::water(200));
        let mut cells = Cells::new(&mut grid, &mut scheduler, 7);
        cells.swap(1, 5);
        assert!(cells.already_acted(5));
        assert!(!cells.already_acted(1));
        assert_eq!(cells.grid().cell_type(5), CellType::Water);
    }
}

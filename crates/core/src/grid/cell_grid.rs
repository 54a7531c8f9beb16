//! Structure-of-arrays cell storage
//!
//! All attributes live in parallel vectors of length `width * height`, indexed
//! by `row * width + col`. Row 0 is the top of the world; "above" means a
//! smaller `y`.
//!
//! Besides the cell attributes the grid keeps two tick stamps per cell:
//! - `changed_at`: last tick the cell was mutated (drives the Air heuristic
//!   and the per-tick changed-cell list exposed to renderers)
//! - `moved_at`: last tick a cell was moved or created at this position, so a
//!   falling cell is not processed twice in one pass

use crate::core_types::{Cell, CellType, Metadata, SubState};

/// Moore neighbourhood offsets `(dx, dy)`, top row first
pub const MOORE: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Orthogonal neighbourhood offsets `(dx, dy)`
pub const ORTHOGONAL: [(i32, i32); 4] = [(0, -1), (-1, 0), (1, 0), (0, 1)];

/// `changed_at` value of a cell that was never mutated
///
/// Edits made before the first tick carry stamp 0, so 0 cannot double as
/// "never".
const NEVER_CHANGED: u64 = u64::MAX;

/// Dense cell store
#[derive(Debug, Clone)]
pub struct CellGrid {
    width: usize,
    height: usize,

    cell_type: Vec<CellType>,
    sub_state: Vec<SubState>,
    water: Vec<u8>,
    nutrient: Vec<u8>,
    energy: Vec<u8>,
    metadata: Vec<Metadata>,

    changed_at: Vec<u64>,
    moved_at: Vec<u64>,
    /// Indices stamped during the current tick, in first-touch order
    changed: Vec<usize>,
}

impl CellGrid {
    /// Create a grid filled with air
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        let len = width * height;
        Self {
            width,
            height,
            cell_type: vec![CellType::Air; len],
            sub_state: vec![SubState::None; len],
            water: vec![0; len],
            nutrient: vec![0; len],
            energy: vec![0; len],
            metadata: vec![Metadata::Empty; len],
            changed_at: vec![NEVER_CHANGED; len],
            moved_at: vec![0; len],
            changed: Vec::new(),
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Total number of cells
    #[inline]
    pub fn len(&self) -> usize {
        self.cell_type.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cell_type.is_empty()
    }

    // ========================================================================
    // INDEXING
    // ========================================================================

    /// Convert coordinates to an index, `None` when out of bounds
    #[inline]
    pub fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y * self.width + x)
    }

    /// Coordinates of an index
    #[inline]
    pub fn coords(&self, idx: usize) -> (i32, i32) {
        ((idx % self.width) as i32, (idx / self.width) as i32)
    }

    /// Index of the cell at `offset` from `idx`, `None` when it falls off the grid
    #[inline]
    pub fn offset(&self, idx: usize, (dx, dy): (i32, i32)) -> Option<usize> {
        let (x, y) = self.coords(idx);
        self.index(x + dx, y + dy)
    }

    /// In-bounds Moore neighbours as `(dx, dy, index)`
    pub fn neighbors(&self, idx: usize) -> impl Iterator<Item = (i32, i32, usize)> + '_ {
        MOORE
            .iter()
            .filter_map(move |&(dx, dy)| self.offset(idx, (dx, dy)).map(|n| (dx, dy, n)))
    }

    /// In-bounds orthogonal neighbours
    pub fn orthogonal(&self, idx: usize) -> impl Iterator<Item = usize> + '_ {
        ORTHOGONAL
            .iter()
            .filter_map(move |&offset| self.offset(idx, offset))
    }

    // ========================================================================
    // ATTRIBUTE ACCESS
    // ========================================================================

    #[inline]
    pub fn cell_type(&self, idx: usize) -> CellType {
        self.cell_type[idx]
    }

    #[inline]
    pub fn sub_state(&self, idx: usize) -> SubState {
        self.sub_state[idx]
    }

    #[inline]
    pub fn water(&self, idx: usize) -> u8 {
        self.water[idx]
    }

    #[inline]
    pub fn nutrient(&self, idx: usize) -> u8 {
        self.nutrient[idx]
    }

    #[inline]
    pub fn energy(&self, idx: usize) -> u8 {
        self.energy[idx]
    }

    #[inline]
    pub fn metadata(&self, idx: usize) -> Metadata {
        self.metadata[idx]
    }

    #[inline]
    pub fn set_cell_type(&mut self, idx: usize, cell_type: CellType) {
        self.cell_type[idx] = cell_type;
    }

    #[inline]
    pub fn set_sub_state(&mut self, idx: usize, sub_state: SubState) {
        self.sub_state[idx] = sub_state;
    }

    #[inline]
    pub fn set_water(&mut self, idx: usize, water: u8) {
        self.water[idx] = water;
    }

    #[inline]
    pub fn set_nutrient(&mut self, idx: usize, nutrient: u8) {
        self.nutrient[idx] = nutrient;
    }

    #[inline]
    pub fn set_energy(&mut self, idx: usize, energy: u8) {
        self.energy[idx] = energy;
    }

    #[inline]
    pub fn set_metadata(&mut self, idx: usize, metadata: Metadata) {
        self.metadata[idx] = metadata;
    }

    /// Snapshot of every attribute at `idx`
    pub fn get(&self, idx: usize) -> Cell {
        Cell {
            cell_type: self.cell_type[idx],
            sub_state: self.sub_state[idx],
            water: self.water[idx],
            nutrient: self.nutrient[idx],
            energy: self.energy[idx],
            metadata: self.metadata[idx],
        }
    }

    /// Overwrite every attribute at `idx`
    pub fn set(&mut self, idx: usize, cell: Cell) {
        self.cell_type[idx] = cell.cell_type;
        self.sub_state[idx] = cell.sub_state;
        self.water[idx] = cell.water;
        self.nutrient[idx] = cell.nutrient;
        self.energy[idx] = cell.energy;
        self.metadata[idx] = cell.metadata;
    }

    /// Exchange the full contents of two cells
    pub fn swap(&mut self, a: usize, b: usize) {
        self.cell_type.swap(a, b);
        self.sub_state.swap(a, b);
        self.water.swap(a, b);
        self.nutrient.swap(a, b);
        self.energy.swap(a, b);
        self.metadata.swap(a, b);
    }

    /// Overwrite every cell and forget all stamps
    pub fn fill(&mut self, cell: Cell) {
        self.cell_type.fill(cell.cell_type);
        self.sub_state.fill(cell.sub_state);
        self.water.fill(cell.water);
        self.nutrient.fill(cell.nutrient);
        self.energy.fill(cell.energy);
        self.metadata.fill(cell.metadata);
        self.changed_at.fill(NEVER_CHANGED);
        self.moved_at.fill(0);
        self.changed.clear();
    }

    /// Count of cells of one type
    pub fn count(&self, cell_type: CellType) -> usize {
        self.cell_type.iter().filter(|&&t| t == cell_type).count()
    }

    // ========================================================================
    // CHANGE TRACKING
    // ========================================================================

    /// Start a new tick's changed-cell list
    pub fn begin_tick(&mut self) {
        self.changed.clear();
    }

    /// Record a mutation at `idx` during `tick`
    pub fn stamp_changed(&mut self, idx: usize, tick: u64) {
        if self.changed_at[idx] != tick {
            self.changed_at[idx] = tick;
            self.changed.push(idx);
        }
    }

    /// Record that a cell moved into (or was created at) `idx` during `tick`
    #[inline]
    pub fn stamp_moved(&mut self, idx: usize, tick: u64) {
        self.moved_at[idx] = tick;
    }

    #[inline]
    pub fn moved_during(&self, idx: usize, tick: u64) -> bool {
        self.moved_at[idx] == tick
    }

    /// Whether `idx` changed during `tick` or the tick before it
    ///
    /// The fire pass runs after the rule pass, so "since the previous rule
    /// pass" spans two tick stamps.
    #[inline]
    pub fn changed_recently(&self, idx: usize, tick: u64) -> bool {
        self.changed_at[idx] != NEVER_CHANGED && self.changed_at[idx] + 1 >= tick
    }

    /// Cells mutated so far this tick
    pub fn changed_cells(&self) -> &[usize] {
        &self.changed
    }
}

//! Tick driver tying the grid, scheduler, rules and fire together
//!
//! `Simulation` owns every piece of mutable state plus the single random
//! generator. One call to [`Simulation::tick`]:
//!
//! 1. Visits every cell of every active chunk and runs its rule
//! 2. Drops this tick's rain
//! 3. Seeds the border of the active region
//! 4. Advances every fire, independent of chunk activity
//!
//! Mutations in any step re-activate the affected chunks for the next tick.

mod config;
mod scenario;

pub use config::SimulationConfig;

use crate::core_types::{Cell, CellType, EnvironmentSignals};
use crate::error::SimError;
use crate::fire::FireSystem;
use crate::grid::{CellGrid, Cells};
use crate::rules::{self, RuleContext};
use crate::scheduler::ChunkScheduler;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Ecosystem simulation over one grid
pub struct Simulation<R: Rng = StdRng> {
    config: SimulationConfig,
    grid: CellGrid,
    scheduler: ChunkScheduler,
    fire: FireSystem,
    rng: R,

    tick: u64,
    last_chunks_processed: usize,
    last_raindrops: u32,
}

impl Simulation<StdRng> {
    /// Build a simulation driven by a generator seeded from `config.seed`
    pub fn new(config: SimulationConfig) -> Result<Self, SimError> {
        let rng = StdRng::seed_from_u64(config.seed);
        Self::with_rng(config, rng)
    }
}

impl<R: Rng> Simulation<R> {
    /// Build a simulation driven by `rng`
    pub fn with_rng(config: SimulationConfig, rng: R) -> Result<Self, SimError> {
        config.validate()?;

        let grid = CellGrid::new(config.width, config.height);
        let mut scheduler = ChunkScheduler::new(
            config.width,
            config.height,
            config.chunk_size,
            config.activity_threshold,
        );
        scheduler.activate_all();
        let fire = FireSystem::new(config.fire.clone(), grid.len());

        info!(
            "Simulation created: {}x{} cells, {} chunks of {}x{}",
            config.width,
            config.height,
            scheduler.chunk_count(),
            config.chunk_size,
            config.chunk_size
        );

        Ok(Self {
            config,
            grid,
            scheduler,
            fire,
            rng,
            tick: 0,
            last_chunks_processed: 0,
            last_raindrops: 0,
        })
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn grid(&self) -> &CellGrid {
        &self.grid
    }

    pub fn scheduler(&self) -> &ChunkScheduler {
        &self.scheduler
    }

    pub fn fire(&self) -> &FireSystem {
        &self.fire
    }

    /// Completed ticks since construction or reset
    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    /// Cell index at `(x, y)`, `None` when out of bounds
    pub fn index(&self, x: i32, y: i32) -> Option<usize> {
        self.grid.index(x, y)
    }

    /// Snapshot of the cell at `(x, y)`
    pub fn get_cell(&self, x: i32, y: i32) -> Option<Cell> {
        self.grid.index(x, y).map(|idx| self.grid.get(idx))
    }

    /// Cells mutated during the last tick, in first-touch order
    pub fn changed_cells(&self) -> &[usize] {
        self.grid.changed_cells()
    }

    pub fn active_chunk_count(&self) -> usize {
        self.scheduler.active_chunk_count()
    }

    pub fn active_fire_count(&self) -> usize {
        self.fire.active_fire_count()
    }

    pub fn is_burning(&self, idx: usize) -> bool {
        self.fire.is_burning(idx)
    }

    pub fn is_recently_burned(&self, idx: usize) -> bool {
        self.fire.is_recently_burned(idx)
    }

    // ========================================================================
    // EDITING
    // ========================================================================

    /// Overwrite the cell at `(x, y)` and wake its chunk
    pub fn set_cell(&mut self, x: i32, y: i32, cell: Cell) -> Result<(), SimError> {
        let idx = self.grid.index(x, y).ok_or(SimError::OutOfBounds { x, y })?;
        let mut cells = Cells::new(&mut self.grid, &mut self.scheduler, self.tick);
        cells.set(idx, cell);
        Ok(())
    }

    /// Fill the rectangle `[x0, x1) x [y0, y1)`, clipped to the grid
    pub fn fill_rect(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, cell: Cell) {
        let mut cells = Cells::new(&mut self.grid, &mut self.scheduler, self.tick);
        for y in y0..y1 {
            for x in x0..x1 {
                if let Some(idx) = cells.grid().index(x, y) {
                    cells.set(idx, cell);
                }
            }
        }
    }

    /// Ignite the cell at `(x, y)`
    ///
    /// `Ok(false)` when the cell is not fuel or already burning.
    pub fn start_fire(&mut self, x: i32, y: i32) -> Result<bool, SimError> {
        let idx = self.grid.index(x, y).ok_or(SimError::OutOfBounds { x, y })?;
        Ok(self.start_fire_at_index(idx))
    }

    pub fn start_fire_at_index(&mut self, idx: usize) -> bool {
        let mut cells = Cells::new(&mut self.grid, &mut self.scheduler, self.tick);
        self.fire.start_fire(&mut cells, idx, &mut self.rng)
    }

    /// Empty the world and forget all fires and history
    pub fn reset(&mut self) {
        self.grid.fill(Cell::air());
        self.scheduler.clear();
        self.scheduler.activate_all();
        self.fire.clear();
        self.tick = 0;
        self.last_chunks_processed = 0;
        self.last_raindrops = 0;
        info!("Simulation reset");
    }

    // ========================================================================
    // TICK
    // ========================================================================

    /// Advance the world by one tick
    pub fn tick(&mut self, env: &dyn EnvironmentSignals) {
        self.tick += 1;
        let tick = self.tick;
        let width = self.grid.width();
        self.grid.begin_tick();

        let ctx = RuleContext::new(&self.fire, &self.config.rules, env);
        let grid = &mut self.grid;
        let rng = &mut self.rng;
        self.last_chunks_processed = self.scheduler.process_active_chunks(|scheduler, x, y| {
            let mut cells = Cells::new(&mut *grid, scheduler, tick);
            rules::process_cell(&mut cells, &ctx, &mut *rng, y * width + x);
        });

        {
            let mut cells = Cells::new(&mut self.grid, &mut self.scheduler, tick);
            self.last_raindrops = rules::precipitate(
                &mut cells,
                env.weather(),
                self.config.rules.raindrop_size,
                &mut self.rng,
            );
        }

        self.scheduler.add_border_chunks();

        {
            let mut cells = Cells::new(&mut self.grid, &mut self.scheduler, tick);
            self.fire.update(&mut cells, &mut self.rng, env);
        }

        debug!(
            "Tick {}: {} chunks processed, {} cells changed, {} fires, {} active chunks",
            tick,
            self.last_chunks_processed,
            self.grid.changed_cells().len(),
            self.fire.active_fire_count(),
            self.scheduler.active_chunk_count()
        );
    }

    /// Run `ticks` ticks under the same environment
    pub fn run(&mut self, ticks: u64, env: &dyn EnvironmentSignals) {
        for _ in 0..ticks {
            self.tick(env);
        }
    }

    /// Get statistics
    pub fn get_stats(&self) -> SimulationStats {
        let fire = self.fire.stats();
        SimulationStats {
            tick: self.tick,
            total_cells: self.grid.len(),
            total_chunks: self.scheduler.chunk_count(),
            active_chunks: self.scheduler.active_chunk_count(),
            chunks_processed: self.last_chunks_processed,
            changed_cells: self.grid.changed_cells().len(),
            raindrops: self.last_raindrops,
            active_fires: self.fire.active_fire_count(),
            peak_fires: fire.peak_active,
            total_ignitions: fire.total_ignitions(),
            cells_consumed: fire.cells_consumed,
            remembered_burns: self.fire.history().len(),
            plants: self.grid.count(CellType::Plant),
            seeds: self.grid.count(CellType::Seed),
            insects: self.grid.count(CellType::Insect),
            worms: self.grid.count(CellType::Worm),
            dead_matter: self.grid.count(CellType::DeadMatter),
            water: self.grid.count(CellType::Water),
        }
    }
}

/// Statistics for the simulation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationStats {
    pub tick: u64,
    pub total_cells: usize,
    pub total_chunks: usize,
    pub active_chunks: usize,
    /// Chunks visited during the last tick
    pub chunks_processed: usize,
    /// Cells mutated during the last tick
    pub changed_cells: usize,
    /// Raindrops placed during the last tick
    pub raindrops: u32,
    pub active_fires: usize,
    pub peak_fires: usize,
    pub total_ignitions: u64,
    pub cells_consumed: u64,
    /// Burned-out cells still in fire history
    pub remembered_burns: usize,

    // Census
    pub plants: usize,
    pub seeds: usize,
    pub insects: usize,
    pub worms: usize,
    pub dead_matter: usize,
    pub water: usize,
}

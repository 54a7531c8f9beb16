//! Fire propagation
//!
//! Burning is tracked outside the cell store: a cell is burning exactly when
//! its index is in the active-fire set. Its `type` stays Plant or `DeadMatter`
//! while it burns and its metadata carries the burn progress.
//!
//! # Lifecycle
//!
//! ```text
//! Unburnt --ignite--> Burning (progress 1..199) --progress 200--> Consumed (fertile soil)
//! ```
//!
//! # Tick Order
//!
//! 1. Age fire history
//! 2. Spontaneous combustion and flashpoints (hot weather only)
//! 3. Lightning (storms only)
//! 4. Burn pass over the active set, independent of chunk activity
//! 5. Compact the active set
//!
//! The burn pass walks the set live: fires lit during the pass are appended
//! and serviced in the same pass, but no index is serviced twice in a tick.

mod active_set;
pub mod config;
mod ember;
mod heat;
mod history;
mod lightning;
pub mod spontaneous;
pub mod spread;
mod stats;

pub use active_set::ActiveFireSet;
pub use config::{FireConfig, BACKPRESSURE_FACTOR, BURN_COMPLETE};
pub use ember::{EmberOutcome, PROBE_DEPTH};
pub use heat::{diffuse_heat, SMOKE_LIMIT};
pub use history::FireHistory;
pub use spontaneous::{flashpoint_probability, spontaneous_ignition_probability};
pub use spread::SpreadFactors;
pub use stats::{FireStats, IgnitionCause};

use crate::core_types::{
    Cell, CellType, EnvironmentSignals, Metadata, Organ, SubState, WeatherPattern,
};
use crate::grid::{CellGrid, Cells, MOORE};
use rand::Rng;
use tracing::trace;

/// Energy of a cell at the start of its burn; drops by half the progress
const BURN_ENERGY: u8 = 220;
/// Smoke pushed into the first air cell above a burning cell
const SMOKE_PUFF: u8 = 15;
/// Rows scanned upward for somewhere to put smoke
const SMOKE_REACH: i32 = 6;

/// Burn-rate multiplier by fuel
fn burn_rate_multiplier(cell_type: CellType, sub_state: SubState) -> f32 {
    match (cell_type, sub_state.organ()) {
        (CellType::DeadMatter, _) => 1.2,
        (_, Some(Organ::Leaf)) => 1.5,
        (_, Some(Organ::Flower)) => 1.2,
        (_, Some(Organ::Root)) => 0.6,
        (_, Some(Organ::Stem) | None) => 1.0,
    }
}

/// Active fires, fire history and statistics
#[derive(Debug, Clone)]
pub struct FireSystem {
    config: FireConfig,
    active: ActiveFireSet,
    history: FireHistory,
    stats: FireStats,
}

impl FireSystem {
    /// Fire system for a grid of `cell_count` cells
    #[must_use]
    pub fn new(config: FireConfig, cell_count: usize) -> Self {
        Self {
            config,
            active: ActiveFireSet::new(cell_count),
            history: FireHistory::new(),
            stats: FireStats::default(),
        }
    }

    pub fn config(&self) -> &FireConfig {
        &self.config
    }

    pub fn stats(&self) -> &FireStats {
        &self.stats
    }

    pub fn history(&self) -> &FireHistory {
        &self.history
    }

    /// Forget every fire, history entry and counter
    pub fn clear(&mut self) {
        self.active.clear();
        self.history.clear();
        self.stats = FireStats::default();
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    #[inline]
    pub fn active_fire_count(&self) -> usize {
        self.active.len()
    }

    #[inline]
    pub fn is_burning(&self, idx: usize) -> bool {
        self.active.contains(idx)
    }

    /// Burn progress of `idx`, or 0 when it is not burning
    pub fn burn_progress(&self, grid: &CellGrid, idx: usize) -> u8 {
        if self.is_burning(idx) {
            grid.metadata(idx).burn_progress()
        } else {
            0
        }
    }

    /// Burning indices in ignition order
    pub fn burning_cells(&self) -> impl Iterator<Item = usize> + '_ {
        self.active.iter()
    }

    /// Spread chance after backpressure
    ///
    /// While more cells burn than `max_fire_size`, spread slows to
    /// [`BACKPRESSURE_FACTOR`] of the configured chance.
    pub fn effective_spread_rate(&self) -> f32 {
        if self.active.len() > self.config.max_fire_size {
            self.config.spread_chance * BACKPRESSURE_FACTOR
        } else {
            self.config.spread_chance
        }
    }

    /// Factor breakdown for `source` igniting `target` under current load
    pub fn spread_factors(
        &self,
        grid: &CellGrid,
        source: usize,
        target: usize,
        weather: Option<WeatherPattern>,
    ) -> SpreadFactors {
        spread::spread_factors(grid, self.effective_spread_rate(), source, target, weather)
    }

    /// Whether `idx` burned out within the recent-burn window
    pub fn is_recently_burned(&self, idx: usize) -> bool {
        self.history.is_recent(idx, self.config.recent_burn_ticks)
    }

    // ========================================================================
    // IGNITION
    // ========================================================================

    /// Set `idx` alight
    ///
    /// Succeeds only for Plant or `DeadMatter` cells that are not already
    /// burning; otherwise nothing changes and `false` is returned.
    pub fn start_fire<R: Rng + ?Sized>(&mut self, cells: &mut Cells, idx: usize, rng: &mut R) -> bool {
        self.ignite(cells, idx, IgnitionCause::Manual, rng)
    }

    pub(crate) fn ignite<R: Rng + ?Sized>(
        &mut self,
        cells: &mut Cells,
        idx: usize,
        cause: IgnitionCause,
        rng: &mut R,
    ) -> bool {
        if idx >= cells.grid().len()
            || !cells.grid().cell_type(idx).is_flammable()
            || !self.active.insert(idx)
        {
            return false;
        }

        cells.set_metadata(idx, Metadata::Burn(1));
        cells.set_energy(idx, self.config.fire_intensity);
        diffuse_heat(cells, idx, 1, rng);
        cells.mark_changed(idx);
        self.stats.record_ignition(cause);
        trace!("Ignited cell {} ({})", idx, cause);
        true
    }

    // ========================================================================
    // TICK
    // ========================================================================

    /// Advance every fire by one tick
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        cells: &mut Cells,
        rng: &mut R,
        env: &dyn EnvironmentSignals,
    ) {
        self.history.age_all(self.config.history_horizon);
        self.spontaneous_pass(cells, rng, env);
        self.lightning_pass(cells, rng, env);

        let weather = env.weather();
        let tick = cells.tick();
        let mut cursor = 0;
        while let Some(idx) = self.active.entry(cursor) {
            cursor += 1;
            if self.active.contains(idx) && self.active.claim_service(idx, tick) {
                self.burn_step(cells, idx, rng, weather);
            }
        }

        self.active.compact();
        self.stats.peak_active = self.stats.peak_active.max(self.active.len());
    }

    /// One tick of burning at `idx`
    fn burn_step<R: Rng + ?Sized>(
        &mut self,
        cells: &mut Cells,
        idx: usize,
        rng: &mut R,
        weather: Option<WeatherPattern>,
    ) {
        let cell_type = cells.grid().cell_type(idx);
        if !cell_type.is_flammable() {
            self.active.remove(idx);
            return;
        }

        let multiplier = burn_rate_multiplier(cell_type, cells.grid().sub_state(idx));
        let rate = (self.config.burn_base_rate * multiplier).round().clamp(1.0, 255.0) as u8;
        let progress = cells
            .grid()
            .metadata(idx)
            .burn_progress()
            .saturating_add(rate)
            .min(BURN_COMPLETE);

        if progress >= BURN_COMPLETE {
            self.consume(cells, idx, rng);
            return;
        }

        cells.set_metadata(idx, Metadata::Burn(progress));
        cells.set_energy(idx, BURN_ENERGY - progress / 2);

        self.spread_from(cells, idx, rng, weather);

        if rng.random::<f32>() < self.config.smoke_chance {
            Self::emit_smoke(cells, idx);
        }
        if progress > self.config.ember_progress_threshold
            && rng.random::<f32>() < self.config.ember_chance
        {
            self.throw_ember(cells, idx, rng);
        }

        cells.mark_changed(idx);
        diffuse_heat(cells, idx, progress, rng);
    }

    /// Try to ignite each unburnt fuel neighbour of `source`
    fn spread_from<R: Rng + ?Sized>(
        &mut self,
        cells: &mut Cells,
        source: usize,
        rng: &mut R,
        weather: Option<WeatherPattern>,
    ) {
        for &offset in &MOORE {
            let Some(target) = cells.grid().offset(source, offset) else {
                continue;
            };
            if !cells.grid().cell_type(target).is_flammable() || self.active.contains(target) {
                continue;
            }
            let chance = self
                .spread_factors(cells.grid(), source, target, weather)
                .composite();
            if rng.random::<f32>() < chance {
                self.ignite(cells, target, IgnitionCause::Spread, rng);
            }
        }
    }

    /// Push a puff of smoke into the first air cell above `idx`
    fn emit_smoke(cells: &mut Cells, idx: usize) {
        let grid = cells.grid();
        let Some(air) = (1..=SMOKE_REACH)
            .filter_map(|up| grid.offset(idx, (0, -up)))
            .find(|&n| grid.cell_type(n) == CellType::Air)
        else {
            return;
        };
        let smoke = grid.water(air).saturating_add(SMOKE_PUFF).min(SMOKE_LIMIT);
        cells.set_water(air, smoke);
    }

    /// Burn-out: the cell becomes fertile soil and may leave ash above
    fn consume<R: Rng + ?Sized>(&mut self, cells: &mut Cells, idx: usize, rng: &mut R) {
        let nutrient = rng.random_range(150..200);
        let water = rng.random_range(10..=30);
        let glow = rng.random_range(5..=25);
        cells.set(idx, Cell::soil(water, nutrient).with_energy(glow));

        self.active.remove(idx);
        self.history.record(idx);
        self.stats.cells_consumed += 1;

        if let Some(above) = cells.grid().offset(idx, (0, -1)) {
            if cells.grid().cell_type(above) == CellType::Air
                && rng.random::<f32>() < self.config.ash_chance
            {
                cells.spawn(above, Cell::dead_matter());
            }
        }
        trace!("Cell {} burned out", idx);
    }

    // ========================================================================
    // SUCCESSION
    // ========================================================================

    /// Tag a freshly placed seed as fire-adapted if its parent grew near a burn
    ///
    /// Returns whether the seed was tagged.
    pub fn process_fire_adaptations<R: Rng + ?Sized>(
        &self,
        cells: &mut Cells,
        plant_idx: usize,
        seed_idx: usize,
        rng: &mut R,
    ) -> bool {
        if cells.grid().cell_type(seed_idx) != CellType::Seed
            || !self.history.any_recent_near(
                cells.grid(),
                plant_idx,
                self.config.adaptation_radius,
                self.config.recent_burn_ticks,
            )
            || rng.random::<f32>() >= self.config.adaptation_chance
        {
            return false;
        }

        let boosted = (f32::from(cells.grid().energy(seed_idx)) * self.config.germination_boost)
            .min(255.0) as u8;
        cells.set_metadata(seed_idx, Metadata::Seed { fire_adapted: true });
        cells.set_energy(seed_idx, boosted);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::{Environment, SoilClass};
    use crate::scheduler::ChunkScheduler;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn world(width: usize, height: usize) -> (CellGrid, ChunkScheduler) {
        (
            CellGrid::new(width, height),
            ChunkScheduler::new(width, height, 8, 3),
        )
    }

    #[test]
    fn test_rejects_non_fuel() {
        let (mut grid, mut scheduler) = world(4, 4);
        grid.set(5, Cell::soil(10, 10));
        let mut fire = FireSystem::new(FireConfig::default(), grid.len());
        let mut rng = StdRng::seed_from_u64(0);
        let mut cells = Cells::new(&mut grid, &mut scheduler, 1);
        assert!(!fire.start_fire(&mut cells, 5, &mut rng));
        assert!(!fire.start_fire(&mut cells, 0, &mut rng));
        assert!(!fire.start_fire(&mut cells, 999, &mut rng));
        assert_eq!(fire.active_fire_count(), 0);
    }

    #[test]
    fn test_burn_rates_by_fuel() {
        let rate = |t, s| (2.0 * burn_rate_multiplier(t, s)).round().max(1.0) as u8;
        assert_eq!(rate(CellType::Plant, SubState::Plant(Organ::Leaf)), 3);
        assert_eq!(rate(CellType::Plant, SubState::Plant(Organ::Stem)), 2);
        assert_eq!(rate(CellType::Plant, SubState::Plant(Organ::Root)), 1);
        assert_eq!(rate(CellType::DeadMatter, SubState::None), 2);
    }

    #[test]
    fn test_cell_that_stopped_being_fuel_leaves_set() {
        let (mut grid, mut scheduler) = world(4, 4);
        grid.set(5, Cell::plant(Organ::Leaf));
        let mut fire = FireSystem::new(FireConfig::default(), grid.len());
        let mut rng = StdRng::seed_from_u64(0);
        {
            let mut cells = Cells::new(&mut grid, &mut scheduler, 1);
            assert!(fire.start_fire(&mut cells, 5, &mut rng));
            cells.set(5, Cell::water(50));
        }
        {
            let mut cells = Cells::new(&mut grid, &mut scheduler, 2);
            fire.update(&mut cells, &mut rng, &Environment::TEMPERATE);
        }
        assert_eq!(fire.active_fire_count(), 0);
        assert_eq!(grid.cell_type(5), CellType::Water);
    }

    #[test]
    fn test_consumed_cell_becomes_fertile_soil() {
        let (mut grid, mut scheduler) = world(3, 3);
        grid.set(4, Cell::plant(Organ::Stem));
        let config = FireConfig {
            spread_chance: 0.0,
            ash_chance: 1.0,
            ..FireConfig::default()
        };
        let mut fire = FireSystem::new(config, grid.len());
        let mut rng = StdRng::seed_from_u64(4);
        {
            let mut cells = Cells::new(&mut grid, &mut scheduler, 1);
            fire.start_fire(&mut cells, 4, &mut rng);
            cells.set_metadata(4, Metadata::Burn(199));
        }
        {
            let mut cells = Cells::new(&mut grid, &mut scheduler, 2);
            fire.update(&mut cells, &mut rng, &Environment::TEMPERATE);
        }
        assert!(!fire.is_burning(4));
        assert_eq!(grid.cell_type(4), CellType::Soil);
        assert_eq!(grid.sub_state(4), SubState::Soil(SoilClass::Fertile));
        assert!((150..200).contains(&grid.nutrient(4)));
        assert!((10..=30).contains(&grid.water(4)));
        assert_eq!(grid.metadata(4), Metadata::Empty);
        assert_eq!(grid.cell_type(1), CellType::DeadMatter, "ash above");
        assert_eq!(fire.history().age(4), Some(0));
        assert_eq!(fire.stats().cells_consumed, 1);
    }

    #[test]
    fn test_smoke_rises_to_first_air_above() {
        let (mut grid, mut scheduler) = world(3, 8);
        let source = grid.index(1, 7).unwrap();
        grid.set(source, Cell::plant(Organ::Stem));
        grid.set(grid.index(1, 6).unwrap(), Cell::soil(0, 0));
        let first_air = grid.index(1, 5).unwrap();
        let higher = grid.index(1, 4).unwrap();
        {
            let mut cells = Cells::new(&mut grid, &mut scheduler, 1);
            FireSystem::emit_smoke(&mut cells, source);
        }
        assert_eq!(grid.water(first_air), SMOKE_PUFF);
        assert_eq!(grid.water(higher), 0);

        grid.set_water(first_air, SMOKE_LIMIT - 5);
        {
            let mut cells = Cells::new(&mut grid, &mut scheduler, 2);
            FireSystem::emit_smoke(&mut cells, source);
        }
        assert_eq!(grid.water(first_air), SMOKE_LIMIT);
    }

    #[test]
    fn test_burning_cell_smokes_air_above() {
        let (mut grid, mut scheduler) = world(5, 6);
        let stem = grid.index(2, 5).unwrap();
        let above = grid.index(2, 4).unwrap();
        grid.set(stem, Cell::plant(Organ::Stem));
        let config = FireConfig {
            spread_chance: 0.0,
            ember_chance: 0.0,
            smoke_chance: 1.0,
            ..FireConfig::default()
        };
        let mut fire = FireSystem::new(config, grid.len());
        let mut rng = StdRng::seed_from_u64(6);
        {
            let mut cells = Cells::new(&mut grid, &mut scheduler, 1);
            assert!(fire.start_fire(&mut cells, stem, &mut rng));
        }
        assert_eq!(grid.water(above), 0);
        {
            let mut cells = Cells::new(&mut grid, &mut scheduler, 2);
            fire.update(&mut cells, &mut rng, &Environment::TEMPERATE);
        }
        // The heat window only smokes two rows up and higher
        assert_eq!(grid.water(above), SMOKE_PUFF);
    }
}

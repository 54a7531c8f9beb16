//! Fire behaviour scenarios
//!
//! Drives `FireSystem` directly against a small grid so each property can be
//! checked in isolation from the ecosystem rules.

use approx::assert_relative_eq;
use ecosim_core::fire::spontaneous::spontaneous_ignition_probability;
use ecosim_core::fire::spread::material_factor;
use ecosim_core::{
    Cell, CellGrid, CellType, Cells, ChunkScheduler, EmberOutcome, Environment, FireConfig,
    FireSystem, IgnitionCause, Metadata, Organ, SoilClass, SubState, WeatherPattern,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

mod common;
use common::{init_tracing, ZeroRng};

struct World {
    grid: CellGrid,
    scheduler: ChunkScheduler,
    fire: FireSystem,
    tick: u64,
}

impl World {
    fn new(width: usize, height: usize, config: FireConfig) -> Self {
        init_tracing();
        let grid = CellGrid::new(width, height);
        let fire = FireSystem::new(config, grid.len());
        Self {
            scheduler: ChunkScheduler::new(width, height, 8, 3),
            grid,
            fire,
            tick: 0,
        }
    }

    fn put(&mut self, x: i32, y: i32, cell: Cell) -> usize {
        let idx = self.grid.index(x, y).unwrap();
        self.grid.set(idx, cell);
        idx
    }

    fn ignite(&mut self, idx: usize) -> bool {
        let mut cells = Cells::new(&mut self.grid, &mut self.scheduler, self.tick);
        self.fire.start_fire(&mut cells, idx, &mut StdRng::seed_from_u64(1))
    }

    fn step(&mut self, rng: &mut StdRng, env: &Environment) {
        self.tick += 1;
        self.grid.begin_tick();
        let mut cells = Cells::new(&mut self.grid, &mut self.scheduler, self.tick);
        self.fire.update(&mut cells, rng, env);
    }
}

/// Fire config with no random side channels
fn quiet_config() -> FireConfig {
    FireConfig {
        spread_chance: 0.0,
        ember_chance: 0.0,
        ash_chance: 0.0,
        smoke_chance: 0.0,
        ..FireConfig::default()
    }
}

#[test]
fn test_start_fire_on_stem() {
    let mut world = World::new(20, 20, FireConfig::default());
    let stem = world.put(10, 10, Cell::plant(Organ::Stem));

    assert!(world.ignite(stem));
    assert!(world.fire.is_burning(stem));
    assert_eq!(world.grid.metadata(stem), Metadata::Burn(1));
    assert_eq!(world.fire.burn_progress(&world.grid, stem), 1);
    assert_eq!(world.grid.energy(stem), world.fire.config().fire_intensity);
    assert_eq!(world.fire.stats().ignitions(IgnitionCause::Manual), 1);
}

#[test]
fn test_start_fire_is_idempotent() {
    let mut world = World::new(10, 10, FireConfig::default());
    let leaf = world.put(4, 4, Cell::plant(Organ::Leaf));

    assert!(world.ignite(leaf));
    assert!(!world.ignite(leaf));
    assert_eq!(world.fire.active_fire_count(), 1);
    assert_eq!(world.grid.metadata(leaf), Metadata::Burn(1));
}

#[test]
fn test_non_fuel_does_not_ignite() {
    let mut world = World::new(10, 10, FireConfig::default());
    let soil = world.put(2, 8, Cell::soil(40, 40));
    let water = world.put(3, 8, Cell::water(100));
    let air = world.grid.index(5, 5).unwrap();

    for idx in [soil, water, air] {
        let before = world.grid.get(idx);
        assert!(!world.ignite(idx));
        assert_eq!(world.grid.get(idx), before);
    }
    assert_eq!(world.fire.active_fire_count(), 0);
}

#[test]
fn test_leaf_outburns_root() {
    let mut world = World::new(20, 20, quiet_config());
    let leaf = world.put(3, 5, Cell::plant(Organ::Leaf));
    let root = world.put(15, 15, Cell::plant(Organ::Root));
    assert!(world.ignite(leaf));
    assert!(world.ignite(root));

    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..10 {
        world.step(&mut rng, &Environment::TEMPERATE);
    }

    let leaf_progress = world.fire.burn_progress(&world.grid, leaf);
    let root_progress = world.fire.burn_progress(&world.grid, root);
    assert_eq!(leaf_progress, 31);
    assert_eq!(root_progress, 11);
    assert!(leaf_progress > root_progress);
}

#[test]
fn test_burn_completion_leaves_fertile_soil() {
    let mut world = World::new(10, 10, quiet_config());
    let stem = world.put(5, 5, Cell::plant(Organ::Stem));
    assert!(world.ignite(stem));
    world.grid.set_metadata(stem, Metadata::Burn(199));

    world.step(&mut StdRng::seed_from_u64(3), &Environment::TEMPERATE);

    assert!(!world.fire.is_burning(stem));
    assert_eq!(world.grid.cell_type(stem), CellType::Soil);
    assert_eq!(world.grid.sub_state(stem), SubState::Soil(SoilClass::Fertile));
    assert!((150..200).contains(&world.grid.nutrient(stem)));
    assert!((10..=30).contains(&world.grid.water(stem)));
    assert_eq!(world.fire.history().age(stem), Some(0));
    assert!(world.fire.is_recently_burned(stem));
    assert_eq!(world.fire.stats().cells_consumed, 1);
}

#[test]
fn test_upward_spread_doubles_per_step() {
    let mut world = World::new(11, 11, FireConfig::default());
    let source = world.put(5, 5, Cell::plant(Organ::Stem));
    let above = world.put(5, 4, Cell::plant(Organ::Leaf));
    let level = world.put(4, 5, Cell::plant(Organ::Leaf));
    let below = world.put(5, 6, Cell::plant(Organ::Leaf));
    assert!(world.ignite(source));

    let weather = Some(WeatherPattern::Clear);
    let composite =
        |target| world.fire.spread_factors(&world.grid, source, target, weather).composite();
    let (up, side, down) = (composite(above), composite(level), composite(below));

    assert!(up < 1.0);
    assert_relative_eq!(up / side, 2.0, epsilon = 1e-5);
    assert_relative_eq!(side / down, 2.0, epsilon = 1e-5);
}

#[test]
fn test_backpressure_throttles_base_rate() {
    let config = FireConfig {
        max_fire_size: 5,
        ..FireConfig::default()
    };
    let base = config.spread_chance;
    let mut world = World::new(20, 4, config);

    let fuel: Vec<usize> = (0..6)
        .map(|i| world.put(i * 3, 3, Cell::dead_matter()))
        .collect();
    for &idx in &fuel[..5] {
        assert!(world.ignite(idx));
    }
    assert_relative_eq!(world.fire.effective_spread_rate(), base);

    assert!(world.ignite(fuel[5]));
    assert_eq!(world.fire.active_fire_count(), 6);
    assert_relative_eq!(world.fire.effective_spread_rate(), base * 0.3);

    let target = world.put(1, 3, Cell::plant(Organ::Leaf));
    let factors = world.fire.spread_factors(&world.grid, fuel[0], target, None);
    assert_relative_eq!(factors.base, base * 0.3);
}

#[test]
fn test_adjacent_water_lowers_material_factor() {
    let mut world = World::new(7, 7, FireConfig::default());
    let target = world.put(3, 3, Cell::plant(Organ::Leaf));
    let dry = material_factor(&world.grid, target);

    world.put(3, 4, Cell::water(100));
    let wet = material_factor(&world.grid, target);
    assert!(wet < dry);

    world.put(2, 3, Cell::water(100));
    world.put(4, 3, Cell::water(100));
    world.put(3, 2, Cell::water(100));
    assert_relative_eq!(material_factor(&world.grid, target), 0.1);
}

#[test]
fn test_ember_probe_ignites_fuel_below_landing() {
    let mut world = World::new(10, 10, FireConfig::default());
    let fuel = world.put(4, 5, Cell::plant(Organ::Leaf));

    let mut cells = Cells::new(&mut world.grid, &mut world.scheduler, 1);
    let outcome = world.fire.resolve_ember_landing(&mut cells, 4, 2, &mut ZeroRng);

    assert_eq!(outcome, EmberOutcome::Ignited(fuel));
    assert!(world.fire.is_burning(fuel));
    assert_eq!(world.fire.stats().ignitions(IgnitionCause::Ember), 1);
}

#[test]
fn test_ember_probe_fizzles_on_rock() {
    let mut world = World::new(10, 10, FireConfig::default());
    world.put(4, 4, Cell::soil(30, 30));
    world.put(4, 6, Cell::plant(Organ::Leaf));

    let mut cells = Cells::new(&mut world.grid, &mut world.scheduler, 1);
    let outcome = world.fire.resolve_ember_landing(&mut cells, 4, 2, &mut ZeroRng);

    assert_eq!(outcome, EmberOutcome::Fizzled);
    assert_eq!(world.fire.active_fire_count(), 0);
}

#[test]
fn test_storm_suppresses_spontaneous_combustion() {
    let config = FireConfig::default();
    let p = |weather| spontaneous_ignition_probability(CellType::Plant, 0, 220.0, Some(weather), &config);

    let storm = p(WeatherPattern::Storm);
    let clear = p(WeatherPattern::Clear);
    assert!(clear > 0.0);
    assert!(storm < clear);
}

#[test]
fn test_fire_spreads_through_dry_litter() {
    let config = FireConfig {
        spread_chance: 1.0,
        ember_chance: 0.0,
        ..FireConfig::default()
    };
    let mut world = World::new(12, 3, config);
    for x in 0..12 {
        world.put(x, 2, Cell::dead_matter());
    }
    let start = world.grid.index(0, 2).unwrap();
    assert!(world.ignite(start));

    let mut rng = StdRng::seed_from_u64(9);
    for _ in 0..40 {
        world.step(&mut rng, &Environment::TEMPERATE);
    }

    let far = world.grid.index(11, 2).unwrap();
    assert!(world.fire.is_burning(far) || world.fire.history().age(far).is_some());
    assert!(world.fire.stats().ignitions(IgnitionCause::Spread) >= 11);
    assert!(world.fire.stats().peak_active >= 2);
}

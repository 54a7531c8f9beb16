//! Fires that start without a flame
//!
//! Above the spontaneous-combustion temperature a handful of random cells are
//! sampled each tick. Dry fuel among them may self-ignite; a second, steeper
//! flashpoint check targets litter and parched plants.

use super::{FireConfig, FireSystem, IgnitionCause};
use crate::core_types::{CellType, EnvironmentSignals, WeatherPattern};
use crate::grid::Cells;
use rand::Rng;

/// Extreme-heat multiplier on spontaneous ignition
const EXTREME_HEAT_MULTIPLIER: f32 = 5.0;
/// Plants drier than this count as parched for flashpoints
const PARCHED_WATER: u8 = 15;

/// Weather scaling for self-ignition
fn weather_scale(weather: Option<WeatherPattern>) -> f32 {
    match weather {
        Some(WeatherPattern::Storm) => 0.1,
        Some(WeatherPattern::HeavyRain) => 0.2,
        Some(WeatherPattern::LightRain) => 0.5,
        Some(WeatherPattern::Cloudy) => 0.8,
        None | Some(WeatherPattern::Clear) => 1.0,
        Some(WeatherPattern::Heatwave) => 1.5,
    }
}

/// Per-tick chance that a sampled cell ignites by itself
///
/// Zero for non-fuel, wet fuel, or below the threshold temperature.
#[must_use]
pub fn spontaneous_ignition_probability(
    cell_type: CellType,
    water: u8,
    temperature: f32,
    weather: Option<WeatherPattern>,
    config: &FireConfig,
) -> f32 {
    if !cell_type.is_flammable()
        || water >= config.dryness_threshold
        || temperature < config.spontaneous_temperature
    {
        return 0.0;
    }

    let excess = (temperature - config.spontaneous_temperature) / 10.0;
    let mut probability = config.spontaneous_base_chance * (1.0 + excess) * weather_scale(weather);
    if temperature >= config.extreme_temperature {
        probability *= EXTREME_HEAT_MULTIPLIER;
    }
    probability.clamp(0.0, 1.0)
}

/// Per-tick flashpoint chance: grows with the square of the excess heat
#[must_use]
pub fn flashpoint_probability(
    cell_type: CellType,
    water: u8,
    temperature: f32,
    config: &FireConfig,
) -> f32 {
    if temperature < config.flashpoint_temperature {
        return 0.0;
    }
    let bias = match cell_type {
        CellType::DeadMatter => 1.0,
        CellType::Plant if water < PARCHED_WATER => 0.6,
        _ => return 0.0,
    };
    let excess = 1.0 + (temperature - config.flashpoint_temperature) / 10.0;
    (config.flashpoint_base_chance * excess * excess * bias).clamp(0.0, 1.0)
}

impl FireSystem {
    /// Sample random cells for spontaneous and flashpoint ignition
    pub(crate) fn spontaneous_pass<R: Rng + ?Sized>(
        &mut self,
        cells: &mut Cells,
        rng: &mut R,
        env: &dyn EnvironmentSignals,
    ) {
        let temperature = env.ambient_temperature();
        if temperature < self.config.spontaneous_temperature || cells.grid().is_empty() {
            return;
        }
        let weather = env.weather();
        let len = cells.grid().len();

        for _ in 0..self.config.spontaneous_samples {
            let idx = rng.random_range(0..len);
            if self.active.contains(idx) {
                continue;
            }
            let cell_type = cells.grid().cell_type(idx);
            let water = cells.grid().water(idx);

            let p = spontaneous_ignition_probability(cell_type, water, temperature, weather, &self.config);
            if p > 0.0 && rng.random::<f32>() < p {
                self.ignite(cells, idx, IgnitionCause::Spontaneous, rng);
                continue;
            }
            let p = flashpoint_probability(cell_type, water, temperature, &self.config);
            if p > 0.0 && rng.random::<f32>() < p {
                self.ignite(cells, idx, IgnitionCause::Flashpoint, rng);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::{Cell, Environment, Metadata};
    use crate::grid::CellGrid;
    use crate::rules::test_support::ZeroRng;
    use crate::scheduler::ChunkScheduler;

    #[test]
    fn test_gates() {
        let config = FireConfig::default();
        assert_eq!(
            spontaneous_ignition_probability(CellType::Plant, 0, 100.0, None, &config),
            0.0
        );
        assert_eq!(
            spontaneous_ignition_probability(CellType::Soil, 0, 230.0, None, &config),
            0.0
        );
        assert_eq!(
            spontaneous_ignition_probability(CellType::Plant, 90, 230.0, None, &config),
            0.0
        );
        assert!(spontaneous_ignition_probability(CellType::DeadMatter, 0, 200.0, None, &config) > 0.0);
    }

    #[test]
    fn test_rises_with_temperature_and_extreme_heat() {
        let config = FireConfig::default();
        let p = |t| spontaneous_ignition_probability(CellType::Plant, 5, t, None, &config);
        assert!(p(200.0) < p(220.0));
        let just_below = p(config.extreme_temperature - 0.5);
        let at_extreme = p(config.extreme_temperature);
        assert!(at_extreme > 4.0 * just_below);
    }

    #[test]
    fn test_flashpoint_biased_to_litter() {
        let config = FireConfig::default();
        let litter = flashpoint_probability(CellType::DeadMatter, 50, 230.0, &config);
        let parched = flashpoint_probability(CellType::Plant, 5, 230.0, &config);
        let watered = flashpoint_probability(CellType::Plant, 60, 230.0, &config);
        assert!(litter > parched);
        assert!(parched > 0.0);
        assert_eq!(watered, 0.0);
        assert_eq!(flashpoint_probability(CellType::DeadMatter, 0, 150.0, &config), 0.0);
    }

    fn litter_field(water: u8) -> (CellGrid, ChunkScheduler) {
        let mut grid = CellGrid::new(4, 4);
        grid.fill(Cell::dead_matter().with_water(water));
        (grid, ChunkScheduler::new(4, 4, 4, 3))
    }

    fn run_pass(grid: &mut CellGrid, scheduler: &mut ChunkScheduler, env: &Environment) -> FireSystem {
        let mut fire = FireSystem::new(FireConfig::default(), grid.len());
        let mut cells = Cells::new(grid, scheduler, 1);
        fire.spontaneous_pass(&mut cells, &mut ZeroRng, env);
        fire
    }

    #[test]
    fn test_pass_idle_below_threshold() {
        let (mut grid, mut scheduler) = litter_field(0);
        let threshold = FireConfig::default().spontaneous_temperature;
        let env = Environment::new(threshold - 1.0, WeatherPattern::Heatwave);
        let fire = run_pass(&mut grid, &mut scheduler, &env);
        assert_eq!(fire.active_fire_count(), 0);
        assert_eq!(fire.stats().total_ignitions(), 0);
    }

    #[test]
    fn test_pass_ignites_dry_litter() {
        let (mut grid, mut scheduler) = litter_field(0);
        let env = Environment::new(190.0, WeatherPattern::Clear);
        let fire = run_pass(&mut grid, &mut scheduler, &env);
        assert_eq!(fire.active_fire_count(), 1);
        assert_eq!(fire.stats().ignitions(IgnitionCause::Spontaneous), 1);
        assert_eq!(fire.stats().ignitions(IgnitionCause::Flashpoint), 0);
    }

    #[test]
    fn test_pass_flashpoint_on_damp_litter() {
        // Too wet to self-ignite, but litter still reaches its flashpoint
        let (mut grid, mut scheduler) = litter_field(50);
        let env = Environment::new(210.0, WeatherPattern::Clear);
        let fire = run_pass(&mut grid, &mut scheduler, &env);
        assert_eq!(fire.active_fire_count(), 1);
        assert_eq!(fire.stats().ignitions(IgnitionCause::Flashpoint), 1);
        assert_eq!(fire.stats().ignitions(IgnitionCause::Spontaneous), 0);
        let burning: Vec<usize> = fire.burning_cells().collect();
        assert_eq!(grid.metadata(burning[0]), Metadata::Burn(1));
    }
}

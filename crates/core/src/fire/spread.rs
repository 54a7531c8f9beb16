//! Neighbour-to-neighbour spread probability
//!
//! The chance that a burning cell ignites one of its eight neighbours is the
//! product of independent factors. Each factor is clamped on its own; the
//! running product is only clamped at the end, to [0, 1].
//!
//! | Factor        | Range        | Driven by                                  |
//! |---------------|--------------|--------------------------------------------|
//! | base          | 0-1          | configured chance, throttled when oversized|
//! | direction     | 0.5 / 1 / 2  | flames climb: above > level > below        |
//! | established   | 1 / 1.5      | source burn progress past 50               |
//! | flammability  | 0-1.6        | organ of the target, dead matter highest   |
//! | moisture      | 0.1-1        | target water                               |
//! | material      | >= 0.1       | what surrounds the target                  |
//! | weather       | 0.2-1.4      | rain suppresses, heatwave amplifies        |

use crate::core_types::{CellType, Organ, SubState, WeatherPattern};
use crate::grid::CellGrid;
use serde::{Deserialize, Serialize};

/// Source progress above which a fire counts as established
pub const ESTABLISHED_PROGRESS: u8 = 50;

/// Breakdown of one spread probability
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpreadFactors {
    pub base: f32,
    pub direction: f32,
    pub established: f32,
    pub flammability: f32,
    pub moisture: f32,
    pub material: f32,
    pub weather: f32,
}

impl SpreadFactors {
    /// Ignition probability for this source/target pair
    #[must_use]
    pub fn composite(&self) -> f32 {
        (self.base
            * self.direction
            * self.established
            * self.flammability
            * self.moisture
            * self.material
            * self.weather)
            .clamp(0.0, 1.0)
    }
}

/// Fire climbs: targets above the source (smaller `y`) are favoured
#[inline]
#[must_use]
pub fn direction_factor(dy: i32) -> f32 {
    match dy.signum() {
        -1 => 2.0,
        0 => 1.0,
        _ => 0.5,
    }
}

/// How readily a cell catches; zero for non-fuel
#[must_use]
pub fn flammability(cell_type: CellType, sub_state: SubState) -> f32 {
    match cell_type {
        CellType::DeadMatter => 1.6,
        CellType::Plant => match sub_state.organ() {
            Some(Organ::Leaf) => 1.4,
            Some(Organ::Flower) => 1.1,
            Some(Organ::Stem) | None => 0.8,
            Some(Organ::Root) => 0.3,
        },
        CellType::Air
        | CellType::Soil
        | CellType::Water
        | CellType::Insect
        | CellType::Seed
        | CellType::Worm => 0.0,
    }
}

/// Wet fuel resists ignition, never below 0.1
#[inline]
#[must_use]
pub fn moisture_factor(water: u8) -> f32 {
    (1.0 - f32::from(water) / 100.0).max(0.1)
}

/// Influence of the target's orthogonal surroundings
///
/// Adjacent water smothers, soil shelters a little, open air and litter feed
/// the flames.
#[must_use]
pub fn material_factor(grid: &CellGrid, target: usize) -> f32 {
    let sum: f32 = grid
        .orthogonal(target)
        .map(|n| match grid.cell_type(n) {
            CellType::Water => -0.4,
            CellType::Soil => -0.1,
            CellType::Air => 0.1,
            CellType::DeadMatter => 0.15,
            CellType::Plant | CellType::Insect | CellType::Seed | CellType::Worm => 0.0,
        })
        .sum();
    (1.0 + sum).max(0.1)
}

/// Weather multiplier; neutral when no weather signal is available
#[must_use]
pub fn weather_factor(weather: Option<WeatherPattern>) -> f32 {
    match weather {
        None | Some(WeatherPattern::Clear) => 1.0,
        Some(WeatherPattern::Cloudy) => 0.9,
        Some(WeatherPattern::LightRain) => 0.6,
        Some(WeatherPattern::HeavyRain) => 0.3,
        Some(WeatherPattern::Storm) => 0.2,
        Some(WeatherPattern::Heatwave) => 1.4,
    }
}

/// Compute every factor for `source` igniting `target`
///
/// `base_rate` is the already-throttled spread chance.
#[must_use]
pub fn spread_factors(
    grid: &CellGrid,
    base_rate: f32,
    source: usize,
    target: usize,
    weather: Option<WeatherPattern>,
) -> SpreadFactors {
    let (_, sy) = grid.coords(source);
    let (_, ty) = grid.coords(target);
    let established = if grid.metadata(source).burn_progress() > ESTABLISHED_PROGRESS {
        1.5
    } else {
        1.0
    };

    SpreadFactors {
        base: base_rate.clamp(0.0, 1.0),
        direction: direction_factor(ty - sy),
        established,
        flammability: flammability(grid.cell_type(target), grid.sub_state(target)),
        moisture: moisture_factor(grid.water(target)),
        material: material_factor(grid, target),
        weather: weather_factor(weather),
    }
}

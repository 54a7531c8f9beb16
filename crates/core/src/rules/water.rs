//! Water: falls, soaks into soil, spreads sideways, evaporates; rain

use super::{chance, fall, RuleContext};
use crate::core_types::{Cell, CellType, WeatherPattern};
use crate::grid::Cells;
use rand::Rng;

/// Evaporation scaling by weather; never while raining
fn evaporation_scale(weather: Option<WeatherPattern>) -> f32 {
    match weather {
        Some(WeatherPattern::Heatwave) => 3.0,
        None | Some(WeatherPattern::Clear) => 1.0,
        Some(WeatherPattern::Cloudy) => 0.5,
        Some(WeatherPattern::LightRain | WeatherPattern::HeavyRain | WeatherPattern::Storm) => 0.0,
    }
}

pub(super) fn update<R: Rng + ?Sized>(
    cells: &mut Cells,
    ctx: &RuleContext,
    rng: &mut R,
    idx: usize,
) {
    if fall(cells, idx) {
        return;
    }

    if let Some(below) = cells.grid().offset(idx, (0, 1)) {
        if cells.grid().cell_type(below) == CellType::Soil {
            let water = cells.grid().water(idx);
            let soil_water = cells.grid().water(below);
            let soak = water
                .min(ctx.config.soak_limit)
                .min(u8::MAX - soil_water);
            if soak > 0 {
                cells.set_water(below, soil_water + soak);
                if soak == water {
                    cells.set(idx, Cell::air());
                    return;
                }
                cells.set_water(idx, water - soak);
            }
        }
    }

    let sides = if rng.random::<bool>() { [-1, 1] } else { [1, -1] };
    for dx in sides {
        if let Some(side) = cells.grid().offset(idx, (dx, 0)) {
            if cells.grid().cell_type(side) == CellType::Air {
                cells.swap(idx, side);
                return;
            }
        }
    }

    if chance(
        rng,
        ctx.config.evaporation_chance * evaporation_scale(ctx.weather),
    ) {
        let left = cells
            .grid()
            .water(idx)
            .saturating_sub(ctx.config.evaporation_amount);
        if left == 0 {
            cells.set(idx, Cell::air());
        } else {
            cells.set_water(idx, left);
        }
    }
}

/// Spawn this tick's raindrops in random open cells of the top row
///
/// Returns the number of drops placed.
pub fn precipitate<R: Rng + ?Sized>(
    cells: &mut Cells,
    weather: Option<WeatherPattern>,
    raindrop_size: u8,
    rng: &mut R,
) -> u32 {
    let Some(weather) = weather else {
        return 0;
    };
    let width = cells.grid().width();
    if width == 0 || cells.grid().height() == 0 {
        return 0;
    }

    let mut placed = 0;
    for _ in 0..weather.drops_per_tick() {
        let x = rng.random_range(0..width) as i32;
        let Some(idx) = cells.grid().index(x, 0) else {
            continue;
        };
        if cells.grid().cell_type(idx) == CellType::Air {
            cells.spawn(idx, Cell::water(raindrop_size));
            placed += 1;
        }
    }
    placed
}

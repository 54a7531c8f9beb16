//! Heat and smoke around a burning cell
//!
//! A burning cell warms the air in a window from three rows above down to its
//! own row, two columns either side. Heat is only ever raised: the hottest
//! nearby fire wins. Air carries smoke in its `water` attribute; the upper two
//! rows of the window collect some of it.

use crate::core_types::CellType;
use crate::fire::config::BURN_COMPLETE;
use crate::grid::Cells;
use rand::Rng;

/// Floor heat of an air cell next to flames
const BASE_HEAT: u8 = 120;
/// Upper bound on smoke carried by a single air cell
pub const SMOKE_LIMIT: u8 = 160;
/// Chance per upper-row air cell of receiving smoke
const SMOKE_CHANCE: f32 = 0.3;
/// Smoke added at full heat and full burn intensity
const SMOKE_PER_CELL: f32 = 12.0;

/// Heat target for the air cell `rows_up` above and `lateral` columns aside
#[inline]
fn heat_target(rows_up: i32, lateral: i32, jitter: u8) -> u8 {
    let vertical = (3 - rows_up) * 15;
    let sideways = (2 - lateral.abs()) * 10;
    (i32::from(BASE_HEAT) + vertical + sideways + i32::from(jitter)).clamp(0, 255) as u8
}

/// Raise air temperature around `idx` and push smoke into the upper rows
pub fn diffuse_heat<R: Rng + ?Sized>(cells: &mut Cells, idx: usize, progress: u8, rng: &mut R) {
    let intensity = f32::from(progress) / f32::from(BURN_COMPLETE);

    for rows_up in 0..=3 {
        for dx in -2..=2 {
            if rows_up == 0 && dx == 0 {
                continue;
            }
            let Some(n) = cells.grid().offset(idx, (dx, -rows_up)) else {
                continue;
            };
            if cells.grid().cell_type(n) != CellType::Air {
                continue;
            }

            let target = heat_target(rows_up, dx, rng.random_range(0..10));
            if target > cells.grid().energy(n) {
                cells.set_energy(n, target);
            }

            if rows_up >= 2 && rng.random::<f32>() < SMOKE_CHANCE {
                let heat_factor = f32::from(target) / 255.0;
                let amount = (SMOKE_PER_CELL * heat_factor * (0.5 + intensity)).round() as u8;
                let smoke = cells
                    .grid()
                    .water(n)
                    .saturating_add(amount.max(1))
                    .min(SMOKE_LIMIT);
                cells.set_water(n, smoke);
            }
        }
    }
}

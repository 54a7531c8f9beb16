//! Storm lightning
//!
//! During storms a strike may hit a random column. The first solid cell from
//! the top takes the bolt: fuel ignites, anything else leaves a flash of heat
//! in the air above it.

use super::{FireSystem, IgnitionCause};
use crate::core_types::{CellType, EnvironmentSignals, WeatherPattern};
use crate::grid::Cells;
use rand::Rng;
use tracing::trace;

/// Strike chance multiplier after dark
const NIGHT_MULTIPLIER: f32 = 1.25;
/// Heat left in the air above a non-flammable strike
const FLASH_ENERGY: u8 = 255;

impl FireSystem {
    pub(crate) fn lightning_pass<R: Rng + ?Sized>(
        &mut self,
        cells: &mut Cells,
        rng: &mut R,
        env: &dyn EnvironmentSignals,
    ) {
        if env.weather() != Some(WeatherPattern::Storm) {
            return;
        }
        let chance = if env.is_daytime() {
            self.config.lightning_chance
        } else {
            self.config.lightning_chance * NIGHT_MULTIPLIER
        };
        if rng.random::<f32>() < chance {
            let column = rng.random_range(0..cells.grid().width()) as i32;
            self.strike_lightning(cells, column, rng);
        }
    }

    /// Strike column `x`, returning the struck cell
    ///
    /// Returns `None` when the column is empty or off the grid.
    pub fn strike_lightning<R: Rng + ?Sized>(
        &mut self,
        cells: &mut Cells,
        x: i32,
        rng: &mut R,
    ) -> Option<usize> {
        let grid = cells.grid();
        let struck = (0..grid.height() as i32)
            .filter_map(|y| grid.index(x, y))
            .find(|&idx| grid.cell_type(idx) != CellType::Air)?;
        self.stats.lightning_strikes += 1;

        if cells.grid().cell_type(struck).is_flammable() {
            self.ignite(cells, struck, IgnitionCause::Lightning, rng);
        } else if let Some(above) = cells.grid().offset(struck, (0, -1)) {
            cells.set_energy(above, FLASH_ENERGY);
        }
        trace!("Lightning struck column {} at cell {}", x, struck);
        Some(struck)
    }
}

//! Ready-made worlds for demos and tests

use super::Simulation;
use crate::core_types::{Cell, CellType, LifeStage, Metadata, Organ};
use crate::grid::Cells;
use rand::Rng;
use tracing::info;

/// Fraction of the grid height taken by soil in a meadow
const SOIL_FRACTION: f32 = 0.3;

impl<R: Rng> Simulation<R> {
    /// Lay out a meadow: a soil layer with a pond, scattered plants with roots,
    /// leaf litter, worms underground and insects in the air
    ///
    /// Returns the row of the soil surface.
    pub fn populate_meadow(&mut self) -> i32 {
        let width = self.grid.width() as i32;
        let height = self.grid.height() as i32;
        let surface = (height - ((height as f32 * SOIL_FRACTION).round() as i32).max(1)).max(1);
        let mut cells = Cells::new(&mut self.grid, &mut self.scheduler, self.tick);
        let rng = &mut self.rng;

        // Soil gets wetter and richer with depth
        for y in surface..height {
            let depth = (y - surface) as u8;
            let water = 40u8.saturating_add(depth.saturating_mul(4));
            let nutrient = 50u8.saturating_add(depth.saturating_mul(3));
            for x in 0..width {
                if let Some(idx) = cells.grid().index(x, y) {
                    cells.set(idx, Cell::soil(water, nutrient));
                }
            }
        }

        // Pond in a shallow dip
        let pond_width = (width / 8).max(2);
        let pond_x = width - pond_width - width / 10;
        for x in pond_x..pond_x + pond_width {
            for y in surface..(surface + 2).min(height) {
                if let Some(idx) = cells.grid().index(x, y) {
                    cells.set(idx, Cell::water(200));
                }
            }
        }

        let mut plants = 0;
        let mut x = rng.random_range(1..4);
        while x < pond_x - 1 {
            plant_shrub(&mut cells, rng, x, surface);
            plants += 1;
            x += rng.random_range(3..7);
        }

        for _ in 0..(width / 6).max(1) {
            let x = rng.random_range(0..width);
            if let Some(idx) = cells.grid().index(x, surface - 1) {
                if cells.grid().cell_type(idx) == CellType::Air {
                    cells.set(idx, Cell::dead_matter());
                }
            }
        }

        for _ in 0..(width / 10).max(1) {
            let x = rng.random_range(0..width);
            let y = rng.random_range(surface + 1..height.max(surface + 2));
            if let Some(idx) = cells.grid().index(x, y) {
                cells.set(idx, Cell::worm());
            }
        }

        for _ in 0..(width / 12).max(1) {
            let x = rng.random_range(0..width);
            let y = rng.random_range(0..(surface / 2).max(1));
            if let Some(idx) = cells.grid().index(x, y) {
                cells.set(idx, Cell::insect(LifeStage::Adult));
            }
        }

        info!(
            "Meadow populated: surface at row {}, {} shrubs, pond at x={}..{}",
            surface,
            plants,
            pond_x,
            pond_x + pond_width
        );
        surface
    }
}

/// Root, stem column and a crown of foliage rooted at `(x, surface)`
fn plant_shrub<R: Rng + ?Sized>(cells: &mut Cells, rng: &mut R, x: i32, surface: i32) {
    let species = rng.random_range(0..4);
    let stem_height = rng.random_range(2..6);

    for depth in 0..2 {
        if let Some(idx) = cells.grid().index(x, surface + depth) {
            let soil = cells.grid().get(idx);
            cells.set(
                idx,
                Cell::plant(Organ::Root)
                    .with_water(soil.water)
                    .with_nutrient(soil.nutrient),
            );
        }
    }

    for up in 1..=stem_height {
        if let Some(idx) = cells.grid().index(x, surface - up) {
            let mut stem = Cell::plant(Organ::Stem);
            stem.metadata = Metadata::Trunk {
                thickness: (12 - up) as u8,
            };
            cells.set(idx, stem);
        }
    }

    let top = surface - stem_height - 1;
    for (dx, dy) in [(-1, 1), (1, 1), (-1, 0), (0, 0), (1, 0)] {
        let Some(idx) = cells.grid().index(x + dx, top + dy) else {
            continue;
        };
        let organ = if rng.random::<f32>() < 0.15 {
            Organ::Flower
        } else {
            Organ::Leaf
        };
        let mut bud = Cell::plant(organ);
        bud.metadata = Metadata::Foliage {
            shape: rng.random_range(0..4),
            species,
            hue: rng.random(),
        };
        cells.set(idx, bud);
    }
}

//! Seeds: fall, germinate on wet soil, rot when exhausted

use super::{chance, fall, RuleContext};
use crate::core_types::{Cell, CellType, Organ};
use crate::grid::Cells;
use rand::Rng;

/// Germination chance multiplier on freshly burned ground
const BURNED_GROUND_BONUS: f32 = 2.0;

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
        let grid = cells.grid();
        if grid.cell_type(below) == CellType::Soil && grid.water(below) >= ctx.config.germination_water {
            let mut probability =
                ctx.config.germination_chance * f32::from(grid.energy(idx)) / 100.0;
            if ctx.fire.is_recently_burned(below) || ctx.fire.is_recently_burned(idx) {
                probability *= BURNED_GROUND_BONUS;
            }
            if chance(rng, probability) {
                germinate(cells, idx, below);
                return;
            }
        }
    }

    if chance(rng, ctx.config.seed_decay_chance) {
        let energy = cells.grid().energy(idx).saturating_sub(1);
        if energy == 0 {
            let nutrient = cells.grid().nutrient(idx);
            cells.set(idx, Cell::dead_matter().with_nutrient(nutrient));
        } else {
            cells.set_energy(idx, energy);
        }
    }
}

/// Seed becomes a stem, the soil beneath becomes its first root
fn germinate(cells: &mut Cells, idx: usize, below: usize) {
    let seed = cells.grid().get(idx);
    let soil = cells.grid().get(below);

    let stem = Cell::plant(Organ::Stem)
        .with_water(seed.water)
        .with_energy(seed.energy);
    let root = Cell::plant(Organ::Root)
        .with_water(soil.water)
        .with_nutrient(soil.nutrient.saturating_add(seed.nutrient));
    cells.spawn(idx, stem);
    cells.spawn(below, root);
}

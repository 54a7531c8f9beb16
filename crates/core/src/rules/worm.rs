//! Worms: eat litter, tunnel through soil, fertilise what they leave behind

use super::{chance, fall, pick_neighbor, RuleContext};
use crate::core_types::{Cell, CellType, SoilClass};
use crate::grid::{Cells, ORTHOGONAL};
use rand::Rng;

/// Energy gained from one cell of dead matter
const MEAL_ENERGY: u8 = 30;

pub(super) fn update<R: Rng + ?Sized>(
    cells: &mut Cells,
    ctx: &RuleContext,
    rng: &mut R,
    idx: usize,
) {
    let mut energy = cells.grid().energy(idx);
    if chance(rng, ctx.config.worm_metabolism_chance) {
        energy = energy.saturating_sub(1);
        cells.set_energy(idx, energy);
    }
    if energy == 0 {
        cells.set(idx, Cell::dead_matter());
        return;
    }
    if fall(cells, idx) {
        return;
    }

    let meal = pick_neighbor(cells, idx, &ORTHOGONAL, rng, |n| {
        cells.grid().cell_type(n) == CellType::DeadMatter && !ctx.fire.is_burning(n)
    });
    if let Some(meal) = meal {
        let litter = cells.grid().get(meal);
        let nutrient = litter
            .nutrient
            .saturating_add(60)
            .max(SoilClass::FERTILE_NUTRIENT);
        cells.set(meal, Cell::soil(litter.water, nutrient));
        cells.set_energy(idx, energy.saturating_add(MEAL_ENERGY));
        return;
    }

    let tunnel = pick_neighbor(cells, idx, &ORTHOGONAL, rng, |n| {
        cells.grid().cell_type(n) == CellType::Soil
    });
    if let Some(tunnel) = tunnel {
        cells.swap(idx, tunnel);
        // The soil now sits where the worm was
        let enriched = cells
            .grid()
            .nutrient(idx)
            .saturating_add(ctx.config.worm_fertilise);
        cells.set_nutrient(idx, enriched);
    }
}

#[cfg(test)]
mod tests {
    use crate::core_types::{Cell, CellType};
    use crate::rules::test_support::{Bench, ZeroRng};

    #[test]
    fn test_eats_dead_matter_into_fertile_soil() {
        let mut bench = Bench::new(3, 3);
        bench.config.worm_metabolism_chance = 0.0;
        for x in 0..3 {
            bench.put(x, 2, Cell::soil(20, 20));
        }
        let worm = bench.put(1, 1, Cell::worm());
        let litter = bench.put(0, 1, Cell::dead_matter());
        bench.step(worm, &mut ZeroRng);
        assert_eq!(bench.grid.cell_type(litter), CellType::Soil);
        assert!(bench.grid.nutrient(litter) >= 120);
        assert_eq!(bench.grid.energy(worm), 180);
    }

    #[test]
    fn test_tunnels_and_fertilises() {
        let mut bench = Bench::new(1, 3);
        bench.config.worm_metabolism_chance = 0.0;
        let worm = bench.put(0, 1, Cell::worm());
        let soil = bench.put(0, 2, Cell::soil(20, 20));
        bench.put(0, 0, Cell::soil(20, 20));
        bench.step(worm, &mut ZeroRng);
        // First orthogonal soil is the one above
        assert_eq!(bench.grid.cell_type(0), CellType::Worm);
        assert_eq!(bench.grid.cell_type(worm), CellType::Soil);
        assert_eq!(bench.grid.nutrient(worm), 25);
        assert_eq!(bench.grid.cell_type(soil), CellType::Soil);
    }

    #[test]
    fn test_starves() {
        let mut bench = Bench::new(1, 1);
        let worm = bench.put(0, 0, Cell::worm().with_energy(1));
        bench.step(worm, &mut ZeroRng);
        assert_eq!(bench.grid.cell_type(worm), CellType::DeadMatter);
    }
}

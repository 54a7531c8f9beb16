//! Dead matter: falls and decomposes into fertile soil

use super::{chance, fall, RuleContext};
use crate::core_types::{Cell, CellType, Metadata, SoilClass};
use crate::grid::{Cells, ORTHOGONAL};
use rand::Rng;

/// Dead matter wetter than this rots faster
const WET_DECAY: u8 = 40;

pub(super) fn update<R: Rng + ?Sized>(
    cells: &mut Cells,
    ctx: &RuleContext,
    rng: &mut R,
    idx: usize,
) {
    if ctx.fire.is_burning(idx) || fall(cells, idx) {
        return;
    }
    if !chance(rng, ctx.config.decay_chance) {
        return;
    }

    let grid = cells.grid();
    let touching_soil = ORTHOGONAL
        .iter()
        .filter_map(|&offset| grid.offset(idx, offset))
        .any(|n| grid.cell_type(n) == CellType::Soil);
    let step = 1 + u16::from(touching_soil) + u16::from(grid.water(idx) > WET_DECAY);
    let counter = match grid.metadata(idx) {
        Metadata::Decay(counter) => counter,
        _ => 0,
    }
    .saturating_add(step);

    if counter >= ctx.config.decay_threshold {
        let nutrient = grid
            .nutrient(idx)
            .saturating_add(100)
            .max(SoilClass::FERTILE_NUTRIENT);
        let water = grid.water(idx);
        cells.set(idx, Cell::soil(water, nutrient));
    } else {
        cells.set_metadata(idx, Metadata::Decay(counter));
    }
}

#[cfg(test)]
mod tests {
    use crate::core_types::{Cell, CellType, Metadata, SoilClass, SubState};
    use crate::rules::test_support::{Bench, ZeroRng};

    #[test]
    fn test_decays_faster_on_soil() {
        let mut bench = Bench::new(1, 3);
        let resting = bench.put(0, 1, Cell::dead_matter());
        bench.put(0, 2, Cell::soil(0, 0));
        bench.step(resting, &mut ZeroRng);
        assert_eq!(bench.grid.metadata(resting), Metadata::Decay(2));
    }

    #[test]
    fn test_becomes_fertile_soil() {
        let mut bench = Bench::new(1, 2);
        let mut litter = Cell::dead_matter();
        litter.metadata = Metadata::Decay(299);
        let idx = bench.put(0, 0, litter);
        bench.put(0, 1, Cell::soil(0, 0));
        bench.step(idx, &mut ZeroRng);
        assert_eq!(bench.grid.cell_type(idx), CellType::Soil);
        assert_eq!(bench.grid.sub_state(idx), SubState::Soil(SoilClass::Fertile));
        assert_eq!(bench.grid.nutrient(idx), 140);
    }
}

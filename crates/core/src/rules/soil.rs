//! Soil: percolation, lateral pressure and re-classification

use super::{equalize, RuleContext};
use crate::core_types::{CellType, SoilClass, SubState};
use crate::grid::Cells;

pub(super) fn update(cells: &mut Cells, ctx: &RuleContext, idx: usize) {
    percolate(cells, ctx, idx);

    if cells.grid().water(idx) > ctx.config.lateral_pressure {
        for dx in [-1, 1] {
            let Some(side) = cells.grid().offset(idx, (dx, 0)) else {
                continue;
            };
            if cells.grid().cell_type(side) == CellType::Soil {
                let (mine, theirs) = equalize(cells.grid().water(idx), cells.grid().water(side));
                cells.set_water(idx, mine);
                cells.set_water(side, theirs);
            }
        }
    }

    let class = SubState::Soil(SoilClass::classify(
        cells.grid().water(idx),
        cells.grid().nutrient(idx),
    ));
    if cells.grid().sub_state(idx) != class {
        cells.set_sub_state(idx, class);
    }
}

/// Let water seep into the soil cell directly below
fn percolate(cells: &mut Cells, ctx: &RuleContext, idx: usize) {
    let Some(below) = cells.grid().offset(idx, (0, 1)) else {
        return;
    };
    if cells.grid().cell_type(below) != CellType::Soil {
        return;
    }
    let (water, below_water) = (cells.grid().water(idx), cells.grid().water(below));
    if water <= below_water {
        return;
    }
    let flow = ((water - below_water) / ctx.config.percolation_divisor.max(1))
        .min(u8::MAX - below_water);
    if flow > 0 {
        cells.set_water(idx, water - flow);
        cells.set_water(below, below_water + flow);
    }
}

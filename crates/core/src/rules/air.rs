//! Air: cools down and lets smoke rise

use super::RuleContext;
use crate::core_types::CellType;
use crate::fire::SMOKE_LIMIT;
use crate::grid::Cells;

pub(super) fn update(cells: &mut Cells, ctx: &RuleContext, idx: usize) {
    let heat = cells.grid().energy(idx);
    if heat > 0 {
        cells.set_energy(idx, heat.saturating_sub(ctx.config.air_cooling));
    }

    let smoke = cells.grid().water(idx);
    if smoke == 0 {
        return;
    }
    let above = cells
        .grid()
        .offset(idx, (0, -1))
        .filter(|&n| cells.grid().cell_type(n) == CellType::Air);

    let moved = above.map_or(0, |n| {
        let room = SMOKE_LIMIT.saturating_sub(cells.grid().water(n));
        let moved = smoke.min(room);
        if moved > 0 {
            let risen = cells.grid().water(n) + moved;
            cells.set_water(n, risen);
        }
        moved
    });

    let left = if moved > 0 {
        smoke - moved
    } else {
        smoke.saturating_sub(ctx.config.smoke_dissipation)
    };
    cells.set_water(idx, left);
}

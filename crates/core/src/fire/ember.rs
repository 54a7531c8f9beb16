//! Ember transport
//!
//! Established fires occasionally loft an ember. It travels mostly upward with
//! some sideways jitter, wraps around the left/right edges and is clamped to
//! the top/bottom rows. Where it lands decides what happens:
//!
//! - on fuel: ignites with the direct-landing chance
//! - in air: probes up to [`PROBE_DEPTH`] cells down for the first solid cell;
//!   fuel there ignites with the lower probe chance, anything else smothers it
//! - in air with nothing below: glows in place and may drop ash on the ground

use super::{FireSystem, IgnitionCause};
use crate::core_types::{Cell, CellType};
use crate::grid::Cells;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::FRAC_PI_2;
use tracing::trace;

/// Cells probed below an air landing
pub const PROBE_DEPTH: i32 = 5;
/// Maximum deviation from straight up, in radians
const ANGLE_JITTER: f32 = 0.6;
/// Heat left on the landing cell by a glowing ember
const GLOW_ENERGY: u8 = 180;

/// Result of an ember landing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmberOutcome {
    /// Lit the cell at this index
    Ignited(usize),
    /// Landed on or above something that would not catch
    Fizzled,
    /// Glowed out in open air at this index
    Glowed(usize),
    /// Glowed out and left ash at this index
    AshDeposited(usize),
}

impl FireSystem {
    /// Throw an ember from the burning cell `source` and resolve its landing
    pub(crate) fn throw_ember<R: Rng + ?Sized>(
        &mut self,
        cells: &mut Cells,
        source: usize,
        rng: &mut R,
    ) -> EmberOutcome {
        let grid = cells.grid();
        let (sx, sy) = grid.coords(source);
        let (width, height) = (grid.width() as i32, grid.height() as i32);

        let angle = -FRAC_PI_2 + rng.random_range(-ANGLE_JITTER..ANGLE_JITTER);
        let distance = rng.random_range(1..=self.config.ember_max_distance.max(1)) as f32;
        let x = (sx + (angle.cos() * distance).round() as i32).rem_euclid(width);
        let y = (sy + (angle.sin() * distance).round() as i32).clamp(0, height - 1);

        self.stats.embers_thrown += 1;
        let outcome = self.resolve_ember_landing(cells, x, y, rng);
        trace!("Ember from ({}, {}) landed at ({}, {}): {:?}", sx, sy, x, y, outcome);
        outcome
    }

    /// Decide what an ember landing at `(x, y)` does
    ///
    /// Off-grid coordinates fizzle.
    pub fn resolve_ember_landing<R: Rng + ?Sized>(
        &mut self,
        cells: &mut Cells,
        x: i32,
        y: i32,
        rng: &mut R,
    ) -> EmberOutcome {
        let Some(landing) = cells.grid().index(x, y) else {
            return EmberOutcome::Fizzled;
        };

        let landing_type = cells.grid().cell_type(landing);
        if landing_type.is_flammable() {
            return self.try_ember_ignition(
                cells,
                landing,
                self.config.ember_direct_ignite_chance,
                rng,
            );
        }
        if landing_type != CellType::Air {
            return EmberOutcome::Fizzled;
        }

        for depth in 1..=PROBE_DEPTH {
            let Some(below) = cells.grid().index(x, y + depth) else {
                break;
            };
            let below_type = cells.grid().cell_type(below);
            if below_type == CellType::Air {
                continue;
            }
            if below_type.is_flammable() {
                return self.try_ember_ignition(
                    cells,
                    below,
                    self.config.ember_ignite_chance,
                    rng,
                );
            }
            return EmberOutcome::Fizzled;
        }

        if cells.grid().energy(landing) < GLOW_ENERGY {
            cells.set_energy(landing, GLOW_ENERGY);
        }
        if rng.random::<f32>() < self.config.ember_ash_chance {
            if let Some(rest) = Self::resting_place(cells, x, y) {
                cells.spawn(rest, Cell::dead_matter());
                return EmberOutcome::AshDeposited(rest);
            }
        }
        EmberOutcome::Glowed(landing)
    }

    fn try_ember_ignition<R: Rng + ?Sized>(
        &mut self,
        cells: &mut Cells,
        target: usize,
        chance: f32,
        rng: &mut R,
    ) -> EmberOutcome {
        if rng.random::<f32>() < chance && self.ignite(cells, target, IgnitionCause::Ember, rng) {
            EmberOutcome::Ignited(target)
        } else {
            EmberOutcome::Fizzled
        }
    }

    /// Lowest air cell in column `x` above the first surface below row `y`
    fn resting_place(cells: &Cells, x: i32, y: i32) -> Option<usize> {
        let grid = cells.grid();
        let mut rest = None;
        let mut row = y;
        while let Some(idx) = grid.index(x, row) {
            if grid.cell_type(idx) != CellType::Air {
                break;
            }
            rest = Some(idx);
            row += 1;
        }
        rest
    }
}

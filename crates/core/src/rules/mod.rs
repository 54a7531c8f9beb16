//! Per-type cell rules
//!
//! Each cell type has one update function. [`process_cell`] decides whether a
//! cell acts this tick and dispatches on its type:
//!
//! - Air only acts when it or a Moore neighbour changed since the previous
//!   rule pass; settled air is free.
//! - Any other cell acts at most once per tick: a cell that fell or was
//!   created this tick is skipped when the row-major scan reaches it again.
//!
//! Rules read and write the acting cell and its near neighbours only, always
//! through [`Cells`] so every mutation reaches the scheduler.

mod air;
mod config;
mod dead_matter;
mod insect;
mod plant;
mod seed;
mod soil;
mod water;
mod worm;

pub use config::RuleConfig;
pub use water::precipitate;

use crate::core_types::{CellType, EnvironmentSignals, WeatherPattern};
use crate::fire::FireSystem;
use crate::grid::Cells;
use rand::Rng;

/// Read-only state shared by every rule during one pass
pub struct RuleContext<'a> {
    pub fire: &'a FireSystem,
    pub config: &'a RuleConfig,
    pub temperature: f32,
    pub weather: Option<WeatherPattern>,
    pub daytime: bool,
}

impl<'a> RuleContext<'a> {
    pub fn new(fire: &'a FireSystem, config: &'a RuleConfig, env: &dyn EnvironmentSignals) -> Self {
        Self {
            fire,
            config,
            temperature: env.ambient_temperature(),
            weather: env.weather(),
            daytime: env.is_daytime(),
        }
    }

    /// Whether rain is falling right now
    #[inline]
    pub fn is_raining(&self) -> bool {
        self.weather.is_some_and(WeatherPattern::is_raining)
    }
}

/// Update the cell at `idx`
pub fn process_cell<R: Rng + ?Sized>(cells: &mut Cells, ctx: &RuleContext, rng: &mut R, idx: usize) {
    let cell_type = cells.grid().cell_type(idx);
    let skip = match cell_type {
        CellType::Air => !cells.neighborhood_changed(idx),
        _ => cells.already_acted(idx),
    };
    if skip {
        return;
    }

    match cell_type {
        CellType::Air => air::update(cells, ctx, idx),
        CellType::Soil => soil::update(cells, ctx, idx),
        CellType::Water => water::update(cells, ctx, rng, idx),
        CellType::Plant => plant::update(cells, ctx, rng, idx),
        CellType::Insect => insect::update(cells, ctx, rng, idx),
        CellType::Seed => seed::update(cells, ctx, rng, idx),
        CellType::DeadMatter => dead_matter::update(cells, ctx, rng, idx),
        CellType::Worm => worm::update(cells, ctx, rng, idx),
    }
}

// ============================================================================
// SHARED HELPERS
// ============================================================================

#[inline]
fn chance<R: Rng + ?Sized>(rng: &mut R, probability: f32) -> bool {
    rng.random::<f32>() < probability
}

/// Drop the cell at `idx` into the air below it
///
/// Returns whether it fell.
fn fall(cells: &mut Cells, idx: usize) -> bool {
    match cells.grid().offset(idx, (0, 1)) {
        Some(below) if cells.grid().cell_type(below) == CellType::Air => {
            cells.swap(idx, below);
            true
        }
        _ => false,
    }
}

/// Uniformly pick one neighbour at `offsets` from `idx` that satisfies `accept`
fn pick_neighbor<R, F>(
    cells: &Cells,
    idx: usize,
    offsets: &[(i32, i32)],
    rng: &mut R,
    accept: F,
) -> Option<usize>
where
    R: Rng + ?Sized,
    F: Fn(usize) -> bool,
{
    let mut found = [0usize; 8];
    let mut count = 0;
    for &offset in offsets.iter().take(found.len()) {
        if let Some(n) = cells.grid().offset(idx, offset) {
            if accept(n) {
                found[count] = n;
                count += 1;
            }
        }
    }
    if count == 0 {
        None
    } else {
        Some(found[rng.random_range(0..count)])
    }
}

/// Move a quarter of the difference between two amounts toward the lower one
#[inline]
fn equalize(a: u8, b: u8) -> (u8, u8) {
    if a > b {
        let step = (a - b) / 4;
        (a - step, b + step)
    } else {
        let step = (b - a) / 4;
        (a + step, b - step)
    }
}

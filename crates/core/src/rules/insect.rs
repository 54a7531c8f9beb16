//! Insects: metabolism, foraging, breeding, starvation
//!
//! Every Moore neighbour is scored and one is picked by weighted draw:
//! foliage scores higher the hungrier the insect is, open air scores 1 for
//! adults (larvae cannot fly), and air hotter than the heat limit scores 0.

use super::{chance, fall, pick_neighbor, RuleContext};
use crate::core_types::{Cell, CellType, LifeStage, Organ, SubState};
use crate::grid::{Cells, MOORE};
use rand::Rng;

/// Weight of foliage for a starving insect, on top of the base weight of 1
const HUNGER_WEIGHT: f32 = 4.0;
/// Energy given to a newly laid larva
const LARVA_ENERGY: u8 = 60;
/// Energy an adult spends laying
const LAYING_COST: u8 = 80;

#[derive(Clone, Copy)]
enum Move {
    Eat(usize),
    Fly(usize),
}

pub(super) fn update<R: Rng + ?Sized>(
    cells: &mut Cells,
    ctx: &RuleContext,
    rng: &mut R,
    idx: usize,
) {
    let stage = match cells.grid().sub_state(idx) {
        SubState::Insect(stage) => stage,
        _ => LifeStage::Adult,
    };

    let mut energy = cells.grid().energy(idx);
    if chance(rng, ctx.config.insect_metabolism_chance) {
        energy = energy.saturating_sub(1);
        cells.set_energy(idx, energy);
    }
    if energy == 0 {
        cells.set(idx, Cell::dead_matter());
        return;
    }

    match stage {
        LifeStage::Larva => {
            if chance(rng, ctx.config.mature_chance) {
                cells.set_sub_state(idx, SubState::Insect(LifeStage::Adult));
            }
            if fall(cells, idx) {
                return;
            }
        }
        LifeStage::Adult => {
            if energy > ctx.config.lay_energy && lay(cells, ctx, rng, idx) {
                return;
            }
        }
    }

    match choose_move(cells, ctx, rng, idx, stage) {
        Some(Move::Eat(food)) => {
            cells.set(food, Cell::air());
            let fed = cells.grid().energy(idx).saturating_add(ctx.config.food_energy);
            cells.set_energy(idx, fed);
        }
        Some(Move::Fly(air)) => cells.swap(idx, air),
        None => {}
    }
}

fn is_foliage(cells: &Cells, ctx: &RuleContext, n: usize) -> bool {
    cells.grid().cell_type(n) == CellType::Plant
        && matches!(
            cells.grid().sub_state(n).organ(),
            Some(Organ::Leaf | Organ::Flower)
        )
        && !ctx.fire.is_burning(n)
}

fn is_cool_air(cells: &Cells, ctx: &RuleContext, n: usize) -> bool {
    cells.grid().cell_type(n) == CellType::Air && cells.grid().energy(n) <= ctx.config.hot_air
}

/// Weighted choice over the neighbourhood
fn choose_move<R: Rng + ?Sized>(
    cells: &Cells,
    ctx: &RuleContext,
    rng: &mut R,
    idx: usize,
    stage: LifeStage,
) -> Option<Move> {
    let hunger = 1.0 - f32::from(cells.grid().energy(idx)) / 255.0;
    let mut candidates: [Option<(Move, f32)>; 8] = [None; 8];
    let mut total = 0.0;

    for (slot, &offset) in candidates.iter_mut().zip(MOORE.iter()) {
        let Some(n) = cells.grid().offset(idx, offset) else {
            continue;
        };
        let scored = if is_foliage(cells, ctx, n) {
            Some((Move::Eat(n), 1.0 + HUNGER_WEIGHT * hunger))
        } else if stage == LifeStage::Adult && is_cool_air(cells, ctx, n) {
            Some((Move::Fly(n), 1.0))
        } else {
            None
        };
        if let Some((_, weight)) = scored {
            total += weight;
        }
        *slot = scored;
    }

    if total <= 0.0 {
        return None;
    }
    let mut draw = rng.random::<f32>() * total;
    let mut last = None;
    for (choice, weight) in candidates.into_iter().flatten() {
        if draw < weight {
            return Some(choice);
        }
        draw -= weight;
        last = Some(choice);
    }
    last
}

/// Lay a larva into adjacent cool air
fn lay<R: Rng + ?Sized>(cells: &mut Cells, ctx: &RuleContext, rng: &mut R, idx: usize) -> bool {
    let Some(nest) = pick_neighbor(cells, idx, &MOORE, rng, |n| is_cool_air(cells, ctx, n)) else {
        return false;
    };
    cells.spawn(nest, Cell::insect(LifeStage::Larva).with_energy(LARVA_ENERGY));
    let energy = cells.grid().energy(idx).saturating_sub(LAYING_COST);
    cells.set_energy(idx, energy);
    true
}

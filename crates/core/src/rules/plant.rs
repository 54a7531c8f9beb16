//! Plants: uptake, sharing, photosynthesis, growth, seeding, death
//!
//! Burning plant cells are left entirely to the fire pass.

use super::{chance, equalize, pick_neighbor, RuleContext};
use crate::core_types::{Cell, CellType, Metadata, Organ};
use crate::grid::{Cells, MOORE};
use rand::Rng;

const UPWARD: [(i32, i32); 3] = [(0, -1), (-1, -1), (1, -1)];
const DOWNWARD: [(i32, i32); 3] = [(0, 1), (-1, 1), (1, 1)];
const BESIDE: [(i32, i32); 4] = [(-1, 0), (1, 0), (-1, -1), (1, -1)];
const SEED_DROP: [(i32, i32); 5] = [(0, 1), (-1, 1), (1, 1), (-1, 0), (1, 0)];

/// Reserves handed to a freshly grown plant cell
const SPROUT_RESERVE: u8 = 20;

pub(super) fn update<R: Rng + ?Sized>(
    cells: &mut Cells,
    ctx: &RuleContext,
    rng: &mut R,
    idx: usize,
) {
    if ctx.fire.is_burning(idx) {
        return;
    }
    let Some(organ) = cells.grid().sub_state(idx).organ() else {
        return;
    };

    if chance(rng, ctx.config.upkeep_chance) {
        let grid = cells.grid();
        let (water, energy) = (grid.water(idx).saturating_sub(1), grid.energy(idx).saturating_sub(1));
        cells.set_water(idx, water);
        cells.set_energy(idx, energy);
    }
    if cells.grid().water(idx) == 0 && cells.grid().energy(idx) == 0 {
        let nutrient = cells.grid().nutrient(idx).max(Cell::dead_matter().nutrient);
        cells.set(idx, Cell::dead_matter().with_nutrient(nutrient));
        return;
    }

    match organ {
        Organ::Root => {
            absorb(cells, ctx, idx);
            grow_root(cells, ctx, rng, idx);
        }
        Organ::Stem => {
            grow_stem(cells, ctx, rng, idx);
            sprout(cells, ctx, rng, idx, &BESIDE, 40, 20);
        }
        Organ::Leaf => {
            if ctx.daytime {
                photosynthesise(cells, ctx, idx);
            }
            sprout(cells, ctx, rng, idx, &MOORE, 100, 30);
        }
        Organ::Flower => emit_seed(cells, ctx, rng, idx),
    }

    share(cells, ctx, rng, idx);
}

/// Roots draw water and nutrient from every adjacent soil cell
fn absorb(cells: &mut Cells, ctx: &RuleContext, idx: usize) {
    let uptake = ctx.config.root_uptake;
    for offset in [(0, -1), (-1, 0), (1, 0), (0, 1)] {
        let Some(soil) = cells.grid().offset(idx, offset) else {
            continue;
        };
        if cells.grid().cell_type(soil) != CellType::Soil {
            continue;
        }
        let grid = cells.grid();
        let water = uptake
            .min(grid.water(soil))
            .min(u8::MAX - grid.water(idx));
        let nutrient = (uptake / 2)
            .min(grid.nutrient(soil))
            .min(u8::MAX - grid.nutrient(idx));
        let (soil_water, soil_nutrient) = (grid.water(soil), grid.nutrient(soil));
        let (own_water, own_nutrient) = (grid.water(idx), grid.nutrient(idx));

        cells.set_water(soil, soil_water - water);
        cells.set_nutrient(soil, soil_nutrient - nutrient);
        cells.set_water(idx, own_water + water);
        cells.set_nutrient(idx, own_nutrient + nutrient);
    }
}

fn grow_root<R: Rng + ?Sized>(cells: &mut Cells, ctx: &RuleContext, rng: &mut R, idx: usize) {
    if cells.grid().energy(idx) <= 30 || !chance(rng, ctx.config.root_growth_chance) {
        return;
    }
    let target = pick_neighbor(cells, idx, &DOWNWARD, rng, |n| {
        cells.grid().cell_type(n) == CellType::Soil
    });
    if let Some(target) = target {
        let soil = cells.grid().get(target);
        let root = Cell::plant(Organ::Root)
            .with_water(soil.water)
            .with_nutrient(soil.nutrient)
            .with_energy(SPROUT_RESERVE);
        cells.spawn(target, root);
        let energy = cells.grid().energy(idx) - SPROUT_RESERVE;
        cells.set_energy(idx, energy);
    }
}

/// Stems climb while their trunk has thickness left
fn grow_stem<R: Rng + ?Sized>(cells: &mut Cells, ctx: &RuleContext, rng: &mut R, idx: usize) {
    let Metadata::Trunk { thickness } = cells.grid().metadata(idx) else {
        return;
    };
    if thickness == 0 || cells.grid().energy(idx) <= 50 || !chance(rng, ctx.config.stem_growth_chance) {
        return;
    }
    let target = pick_neighbor(cells, idx, &UPWARD, rng, |n| {
        cells.grid().cell_type(n) == CellType::Air
    });
    if let Some(target) = target {
        let mut stem = Cell::plant(Organ::Stem)
            .with_water(SPROUT_RESERVE)
            .with_energy(SPROUT_RESERVE);
        stem.metadata = Metadata::Trunk {
            thickness: thickness - 1,
        };
        cells.spawn(target, stem);
        let energy = cells.grid().energy(idx) - 30;
        cells.set_energy(idx, energy);
    }
}

/// Grow a leaf or flower into adjacent air
fn sprout<R: Rng + ?Sized>(
    cells: &mut Cells,
    ctx: &RuleContext,
    rng: &mut R,
    idx: usize,
    offsets: &[(i32, i32)],
    min_energy: u8,
    cost: u8,
) {
    if cells.grid().energy(idx) <= min_energy || !chance(rng, ctx.config.sprout_chance) {
        return;
    }
    let Some(target) = pick_neighbor(cells, idx, offsets, rng, |n| {
        cells.grid().cell_type(n) == CellType::Air
    }) else {
        return;
    };

    let organ = if chance(rng, ctx.config.flower_ratio) {
        Organ::Flower
    } else {
        Organ::Leaf
    };
    let species = match cells.grid().metadata(idx) {
        Metadata::Foliage { species, .. } => species,
        _ => rng.random_range(0..4),
    };
    let mut bud = Cell::plant(organ)
        .with_water(SPROUT_RESERVE)
        .with_energy(SPROUT_RESERVE);
    bud.metadata = Metadata::Foliage {
        shape: rng.random_range(0..4),
        species,
        hue: rng.random(),
    };
    cells.spawn(target, bud);
    let energy = cells.grid().energy(idx) - cost;
    cells.set_energy(idx, energy);
}

/// Leaves turn water into energy by day
fn photosynthesise(cells: &mut Cells, ctx: &RuleContext, idx: usize) {
    let water = cells.grid().water(idx);
    let used = ctx.config.photosynthesis_rate.min(water);
    if used == 0 {
        return;
    }
    let energy = cells.grid().energy(idx).saturating_add(used.saturating_mul(2));
    cells.set_water(idx, water - used);
    cells.set_energy(idx, energy);
}

/// Flowers drop seeds, which may inherit fire adaptation
fn emit_seed<R: Rng + ?Sized>(cells: &mut Cells, ctx: &RuleContext, rng: &mut R, idx: usize) {
    if cells.grid().energy(idx) <= 80 || !chance(rng, ctx.config.seed_chance) {
        return;
    }
    let Some(target) = pick_neighbor(cells, idx, &SEED_DROP, rng, |n| {
        cells.grid().cell_type(n) == CellType::Air
    }) else {
        return;
    };
    cells.spawn(target, Cell::seed());
    ctx.fire.process_fire_adaptations(cells, idx, target, rng);
    let energy = cells.grid().energy(idx) - 30;
    cells.set_energy(idx, energy);
}

/// Even out reserves with one random living plant neighbour
fn share<R: Rng + ?Sized>(cells: &mut Cells, ctx: &RuleContext, rng: &mut R, idx: usize) {
    let Some(other) = pick_neighbor(cells, idx, &MOORE, rng, |n| {
        cells.grid().cell_type(n) == CellType::Plant && !ctx.fire.is_burning(n)
    }) else {
        return;
    };
    let grid = cells.grid();
    let water = equalize(grid.water(idx), grid.water(other));
    let nutrient = equalize(grid.nutrient(idx), grid.nutrient(other));
    let energy = equalize(grid.energy(idx), grid.energy(other));

    cells.set_water(idx, water.0);
    cells.set_water(other, water.1);
    cells.set_nutrient(idx, nutrient.0);
    cells.set_nutrient(other, nutrient.1);
    cells.set_energy(idx, energy.0);
    cells.set_energy(other, energy.1);
}

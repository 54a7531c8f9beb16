//! Cell vocabulary: types, sub-states and typed metadata
//!
//! Every grid position carries a [`CellType`] plus a [`SubState`] whose meaning
//! depends on that type, and a [`Metadata`] variant that replaces the packed
//! integer a cell would otherwise have to reinterpret by context.
//!
//! # Metadata Variants
//!
//! | Variant   | Carried by                         | Meaning                         |
//! |-----------|------------------------------------|---------------------------------|
//! | `Burn`    | burning Plant / `DeadMatter`       | burn progress 1-200             |
//! | `Foliage` | leaves and flowers                 | shape, species and hue bits     |
//! | `Trunk`   | stems                              | remaining trunk thickness       |
//! | `Decay`   | dead matter                        | decomposition counter           |
//! | `Seed`    | seeds                              | fire-adaptation tag             |

use serde::{Deserialize, Serialize};

/// Material occupying a grid position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum CellType {
    /// Empty space; carries heat in `energy` and smoke in `water`
    #[default]
    Air,
    /// Ground; holds water and nutrients
    Soil,
    /// Free water; `water` is the amount held by the cell
    Water,
    /// Part of a plant, organ given by [`SubState::Plant`]
    Plant,
    /// Foraging insect
    Insect,
    /// Dormant plant seed
    Seed,
    /// Dead organic matter, ash and litter
    DeadMatter,
    /// Soil-tunnelling worm
    Worm,
}

impl CellType {
    /// Cells that can catch fire
    #[inline]
    #[must_use]
    pub const fn is_flammable(self) -> bool {
        matches!(self, Self::Plant | Self::DeadMatter)
    }

    /// Cells that block falling material
    #[inline]
    #[must_use]
    pub const fn is_solid(self) -> bool {
        !matches!(self, Self::Air)
    }
}

/// Soil wetness/fertility class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoilClass {
    Dry,
    Wet,
    Fertile,
}

impl SoilClass {
    /// Nutrient level at which soil counts as fertile
    pub const FERTILE_NUTRIENT: u8 = 120;
    /// Water level at which soil counts as wet
    pub const WET_WATER: u8 = 80;

    /// Derive the class from current water and nutrient content
    #[must_use]
    pub const fn classify(water: u8, nutrient: u8) -> Self {
        if nutrient >= Self::FERTILE_NUTRIENT {
            Self::Fertile
        } else if water >= Self::WET_WATER {
            Self::Wet
        } else {
            Self::Dry
        }
    }
}

/// Plant anatomy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Organ {
    Root,
    Stem,
    Leaf,
    Flower,
}

/// Insect life stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LifeStage {
    Larva,
    Adult,
}

/// Per-type sub-state. Only the variant matching the cell type is ever stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SubState {
    #[default]
    None,
    Soil(SoilClass),
    Plant(Organ),
    Insect(LifeStage),
}

impl SubState {
    /// Plant organ, if this is a plant sub-state
    #[inline]
    #[must_use]
    pub const fn organ(self) -> Option<Organ> {
        match self {
            Self::Plant(organ) => Some(organ),
            _ => None,
        }
    }
}

/// Context-dependent cell payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Metadata {
    #[default]
    Empty,
    /// Burn progress while the cell is in the active-fire set (1-200)
    Burn(u8),
    /// Packed appearance bits for leaves and flowers
    Foliage { shape: u8, species: u8, hue: u8 },
    /// Stem thickness; new stem segments inherit one less
    Trunk { thickness: u8 },
    /// Decomposition counter for dead matter
    Decay(u16),
    /// Seed marker
    Seed { fire_adapted: bool },
}

impl Metadata {
    /// Burn progress, or 0 when the cell is not carrying burn state
    #[inline]
    #[must_use]
    pub const fn burn_progress(self) -> u8 {
        match self {
            Self::Burn(progress) => progress,
            _ => 0,
        }
    }

    /// Whether a seed carries the fire-adaptation tag
    #[inline]
    #[must_use]
    pub const fn is_fire_adapted(self) -> bool {
        matches!(self, Self::Seed { fire_adapted: true })
    }
}

/// Full attribute tuple of one grid position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Cell {
    pub cell_type: CellType,
    pub sub_state: SubState,
    pub water: u8,
    pub nutrient: u8,
    pub energy: u8,
    pub metadata: Metadata,
}

impl Cell {
    #[must_use]
    pub const fn air() -> Self {
        Self {
            cell_type: CellType::Air,
            sub_state: SubState::None,
            water: 0,
            nutrient: 0,
            energy: 0,
            metadata: Metadata::Empty,
        }
    }

    #[must_use]
    pub const fn soil(water: u8, nutrient: u8) -> Self {
        Self {
            cell_type: CellType::Soil,
            sub_state: SubState::Soil(SoilClass::classify(water, nutrient)),
            water,
            nutrient,
            energy: 0,
            metadata: Metadata::Empty,
        }
    }

    #[must_use]
    pub const fn water(amount: u8) -> Self {
        Self {
            cell_type: CellType::Water,
            sub_state: SubState::None,
            water: amount,
            nutrient: 0,
            energy: 0,
            metadata: Metadata::Empty,
        }
    }

    /// Plant part with modest starting reserves
    #[must_use]
    pub const fn plant(organ: Organ) -> Self {
        let metadata = match organ {
            Organ::Stem => Metadata::Trunk { thickness: 12 },
            Organ::Leaf | Organ::Flower => Metadata::Foliage {
                shape: 0,
                species: 0,
                hue: 0,
            },
            Organ::Root => Metadata::Empty,
        };
        Self {
            cell_type: CellType::Plant,
            sub_state: SubState::Plant(organ),
            water: 60,
            nutrient: 40,
            energy: 60,
            metadata,
        }
    }

    #[must_use]
    pub const fn seed() -> Self {
        Self {
            cell_type: CellType::Seed,
            sub_state: SubState::None,
            water: 10,
            nutrient: 20,
            energy: 60,
            metadata: Metadata::Seed {
                fire_adapted: false,
            },
        }
    }

    #[must_use]
    pub const fn insect(stage: LifeStage) -> Self {
        Self {
            cell_type: CellType::Insect,
            sub_state: SubState::Insect(stage),
            water: 0,
            nutrient: 0,
            energy: 120,
            metadata: Metadata::Empty,
        }
    }

    #[must_use]
    pub const fn worm() -> Self {
        Self {
            cell_type: CellType::Worm,
            sub_state: SubState::None,
            water: 0,
            nutrient: 0,
            energy: 150,
            metadata: Metadata::Empty,
        }
    }

    #[must_use]
    pub const fn dead_matter() -> Self {
        Self {
            cell_type: CellType::DeadMatter,
            sub_state: SubState::None,
            water: 0,
            nutrient: 40,
            energy: 0,
            metadata: Metadata::Decay(0),
        }
    }

    /// Builder-style water override
    #[must_use]
    pub const fn with_water(mut self, water: u8) -> Self {
        self.water = water;
        self
    }

    /// Builder-style energy override
    #[must_use]
    pub const fn with_energy(mut self, energy: u8) -> Self {
        self.energy = energy;
        self
    }

    #[must_use]
    pub const fn with_nutrient(mut self, nutrient: u8) -> Self {
        self.nutrient = nutrient;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_soil_classification() {
        assert_eq!(SoilClass::classify(10, 10), SoilClass::Dry);
        assert_eq!(SoilClass::classify(200, 10), SoilClass::Wet);
        // Nutrient wins over wetness
        assert_eq!(SoilClass::classify(200, 180), SoilClass::Fertile);
    }

    #[test]
    fn test_only_plants_and_dead_matter_burn() {
        let flammable: Vec<CellType> = [
            CellType::Air,
            CellType::Soil,
            CellType::Water,
            CellType::Plant,
            CellType::Insect,
            CellType::Seed,
            CellType::DeadMatter,
            CellType::Worm,
        ]
        .into_iter()
        .filter(|t| t.is_flammable())
        .collect();
        assert_eq!(flammable, vec![CellType::Plant, CellType::DeadMatter]);
    }

    #[test]
    fn test_constructors_match_sub_state() {
        assert_eq!(
            Cell::plant(Organ::Leaf).sub_state.organ(),
            Some(Organ::Leaf)
        );
        assert_eq!(
            Cell::soil(0, 200).sub_state,
            SubState::Soil(SoilClass::Fertile)
        );
        assert!(!Cell::seed().metadata.is_fire_adapted());
        assert_eq!(Cell::dead_matter().metadata.burn_progress(), 0);
    }
}

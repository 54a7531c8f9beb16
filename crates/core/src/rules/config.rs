//! Rates and thresholds for the non-fire cell rules

use crate::error::{check_probability, SimError};
use serde::{Deserialize, Serialize};

/// Tunable ecosystem parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
    // Air
    /// Heat lost by an air cell per visit
    pub air_cooling: u8,
    /// Smoke lost per visit when it cannot rise
    pub smoke_dissipation: u8,

    // Soil
    /// Water gradient to the soil below is divided by this per visit
    pub percolation_divisor: u8,
    /// Soil wetter than this pushes water sideways
    pub lateral_pressure: u8,

    // Water
    /// Most water a cell can hand to the soil below per visit
    pub soak_limit: u8,
    pub evaporation_chance: f32,
    /// Water removed by one evaporation event
    pub evaporation_amount: u8,
    /// Water carried by a raindrop
    pub raindrop_size: u8,

    // Plants
    /// Water turned into energy per daytime leaf visit (doubled as energy)
    pub photosynthesis_rate: u8,
    /// Chance per visit that a plant cell uses one water and one energy
    pub upkeep_chance: f32,
    pub sprout_chance: f32,
    /// Share of sprouts that become flowers
    pub flower_ratio: f32,
    pub stem_growth_chance: f32,
    pub root_growth_chance: f32,
    pub seed_chance: f32,
    /// Water and nutrient a root draws from each adjacent soil cell
    pub root_uptake: u8,

    // Seeds
    /// Soil water needed below a seed before it can germinate
    pub germination_water: u8,
    pub germination_chance: f32,
    pub seed_decay_chance: f32,

    // Insects
    pub insect_metabolism_chance: f32,
    /// Adults above this energy lay larvae
    pub lay_energy: u8,
    pub mature_chance: f32,
    /// Energy gained from eating foliage
    pub food_energy: u8,
    /// Air hotter than this is never entered
    pub hot_air: u8,

    // Decomposition
    pub decay_chance: f32,
    /// Decay counter at which dead matter becomes soil
    pub decay_threshold: u16,

    // Worms
    pub worm_metabolism_chance: f32,
    /// Nutrient left in soil a worm tunnels out of
    pub worm_fertilise: u8,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            air_cooling: 6,
            smoke_dissipation: 3,

            percolation_divisor: 4,
            lateral_pressure: 100,

            soak_limit: 32,
            evaporation_chance: 0.002,
            evaporation_amount: 8,
            raindrop_size: 60,

            photosynthesis_rate: 4,
            upkeep_chance: 0.1,
            sprout_chance: 0.02,
            flower_ratio: 0.2,
            stem_growth_chance: 0.05,
            root_growth_chance: 0.03,
            seed_chance: 0.01,
            root_uptake: 4,

            germination_water: 40,
            germination_chance: 0.05,
            seed_decay_chance: 0.02,

            insect_metabolism_chance: 0.5,
            lay_energy: 200,
            mature_chance: 0.01,
            food_energy: 40,
            hot_air: 150,

            decay_chance: 0.3,
            decay_threshold: 300,

            worm_metabolism_chance: 0.2,
            worm_fertilise: 5,
        }
    }
}

impl RuleConfig {
    pub fn validate(&self) -> Result<(), SimError> {
        check_probability("evaporation_chance", self.evaporation_chance)?;
        check_probability("upkeep_chance", self.upkeep_chance)?;
        check_probability("sprout_chance", self.sprout_chance)?;
        check_probability("flower_ratio", self.flower_ratio)?;
        check_probability("stem_growth_chance", self.stem_growth_chance)?;
        check_probability("root_growth_chance", self.root_growth_chance)?;
        check_probability("seed_chance", self.seed_chance)?;
        check_probability("germination_chance", self.germination_chance)?;
        check_probability("seed_decay_chance", self.seed_decay_chance)?;
        check_probability("insect_metabolism_chance", self.insect_metabolism_chance)?;
        check_probability("mature_chance", self.mature_chance)?;
        check_probability("decay_chance", self.decay_chance)?;
        check_probability("worm_metabolism_chance", self.worm_metabolism_chance)?;
        Ok(())
    }
}

//! Fire model parameters
//!
//! Values follow the feature-complete revision of the model (the one with
//! embers, flashpoints and fire history). Presets shift the balance for dry
//! and wet seasons the way regional weather presets shift fire danger.

use crate::error::{check_probability, SimError};
use serde::{Deserialize, Serialize};

/// Multiplier applied to the base spread chance while the fire is oversized
pub const BACKPRESSURE_FACTOR: f32 = 0.3;

/// Burn progress at which a cell is consumed
pub const BURN_COMPLETE: u8 = 200;

/// Tunable fire parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FireConfig {
    // Spread
    /// Base per-neighbour spread chance per tick
    pub spread_chance: f32,
    /// Active fires above this count throttle spread by [`BACKPRESSURE_FACTOR`]
    pub max_fire_size: usize,
    /// Energy assigned to a freshly ignited cell
    pub fire_intensity: u8,
    /// Burn progress added per tick before organ multipliers
    pub burn_base_rate: f32,

    // Burn-out
    /// Chance of leaving an ash cell above a consumed cell
    pub ash_chance: f32,
    /// Chance per tick of a burning cell pushing smoke upward
    pub smoke_chance: f32,

    // Embers
    pub ember_chance: f32,
    /// Burn progress required before a cell throws embers
    pub ember_progress_threshold: u8,
    pub ember_max_distance: u32,
    /// Ignition chance when an ember probe finds fuel below its landing cell
    pub ember_ignite_chance: f32,
    /// Ignition chance when an ember lands directly on fuel
    pub ember_direct_ignite_chance: f32,
    /// Chance that an ember finding nothing leaves ash on the surface below
    pub ember_ash_chance: f32,

    // Spontaneous combustion
    pub spontaneous_temperature: f32,
    /// Temperature at which spontaneous ignition is multiplied ~5x
    pub extreme_temperature: f32,
    /// Random cells sampled per tick
    pub spontaneous_samples: u32,
    pub spontaneous_base_chance: f32,
    /// Cells with less water than this count as dry
    pub dryness_threshold: u8,
    pub flashpoint_temperature: f32,
    pub flashpoint_base_chance: f32,

    // Lightning
    /// Per-tick strike chance during storms
    pub lightning_chance: f32,

    // Succession
    /// Ticks after which fire history is forgotten
    pub history_horizon: u32,
    /// Ticks during which burned ground counts as recently burned
    pub recent_burn_ticks: u32,
    pub adaptation_radius: i32,
    pub adaptation_chance: f32,
    /// Energy multiplier for fire-adapted seeds
    pub germination_boost: f32,
}

impl Default for FireConfig {
    fn default() -> Self {
        Self {
            spread_chance: 0.12,
            max_fire_size: 400,
            fire_intensity: 240,
            burn_base_rate: 2.0,

            ash_chance: 0.15,
            smoke_chance: 0.25,

            ember_chance: 0.02,
            ember_progress_threshold: 100,
            ember_max_distance: 8,
            ember_ignite_chance: 0.35,
            ember_direct_ignite_chance: 0.6,
            ember_ash_chance: 0.1,

            spontaneous_temperature: 180.0,
            extreme_temperature: 240.0,
            spontaneous_samples: 12,
            spontaneous_base_chance: 0.002,
            dryness_threshold: 30,
            flashpoint_temperature: 200.0,
            flashpoint_base_chance: 0.0015,

            lightning_chance: 0.01,

            history_horizon: 600,
            recent_burn_ticks: 200,
            adaptation_radius: 3,
            adaptation_chance: 0.3,
            germination_boost: 1.5,
        }
    }
}

impl FireConfig {
    /// Long dry season: faster spread, lower ignition temperatures
    #[must_use]
    pub fn dry_season() -> Self {
        Self {
            spread_chance: 0.18,
            max_fire_size: 600,
            ember_chance: 0.04,
            spontaneous_temperature: 160.0,
            flashpoint_temperature: 185.0,
            dryness_threshold: 45,
            ..Self::default()
        }
    }

    /// Wet season: sluggish fires that rarely start on their own
    #[must_use]
    pub fn wet_season() -> Self {
        Self {
            spread_chance: 0.07,
            ember_chance: 0.01,
            spontaneous_temperature: 220.0,
            flashpoint_temperature: 235.0,
            dryness_threshold: 15,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), SimError> {
        check_probability("spread_chance", self.spread_chance)?;
        check_probability("ash_chance", self.ash_chance)?;
        check_probability("smoke_chance", self.smoke_chance)?;
        check_probability("ember_chance", self.ember_chance)?;
        check_probability("ember_ignite_chance", self.ember_ignite_chance)?;
        check_probability("ember_direct_ignite_chance", self.ember_direct_ignite_chance)?;
        check_probability("ember_ash_chance", self.ember_ash_chance)?;
        check_probability("spontaneous_base_chance", self.spontaneous_base_chance)?;
        check_probability("flashpoint_base_chance", self.flashpoint_base_chance)?;
        check_probability("lightning_chance", self.lightning_chance)?;
        check_probability("adaptation_chance", self.adaptation_chance)?;
        Ok(())
    }
}

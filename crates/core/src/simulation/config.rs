//! Simulation construction parameters

use crate::error::SimError;
use crate::fire::FireConfig;
use crate::rules::RuleConfig;
use serde::{Deserialize, Serialize};

/// Everything needed to build a [`Simulation`](super::Simulation)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub width: usize,
    pub height: usize,
    /// Side length of a scheduler chunk in cells
    pub chunk_size: usize,
    /// Passes a chunk stays active after its last change
    pub activity_threshold: u32,
    /// Seed for the default generator
    pub seed: u64,
    pub fire: FireConfig,
    pub rules: RuleConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            width: 200,
            height: 150,
            chunk_size: 16,
            activity_threshold: 4,
            seed: 0x5EED,
            fire: FireConfig::default(),
            rules: RuleConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Default parameters on a `width x height` grid
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn with_fire(mut self, fire: FireConfig) -> Self {
        self.fire = fire;
        self
    }

    #[must_use]
    pub fn with_chunking(mut self, chunk_size: usize, activity_threshold: u32) -> Self {
        self.chunk_size = chunk_size;
        self.activity_threshold = activity_threshold;
        self
    }

    pub fn validate(&self) -> Result<(), SimError> {
        if self.width == 0 || self.height == 0 {
            return Err(SimError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if self.chunk_size == 0 {
            return Err(SimError::InvalidChunkSize(self.chunk_size));
        }
        if self.activity_threshold == 0 {
            return Err(SimError::InvalidActivityThreshold(self.activity_threshold));
        }
        self.fire.validate()?;
        self.rules.validate()
    }
}

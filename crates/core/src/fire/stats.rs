//! Fire bookkeeping

use serde::{Deserialize, Serialize};
use std::fmt;

/// What lit a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IgnitionCause {
    /// External `start_fire` call
    Manual,
    /// Caught from a burning neighbour
    Spread,
    /// Lit by a landing ember
    Ember,
    /// Dry fuel in hot weather
    Spontaneous,
    /// Steeper high-temperature check on litter and parched plants
    Flashpoint,
    Lightning,
}

impl IgnitionCause {
    pub const ALL: [Self; 6] = [
        Self::Manual,
        Self::Spread,
        Self::Ember,
        Self::Spontaneous,
        Self::Flashpoint,
        Self::Lightning,
    ];

    const fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for IgnitionCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Manual => "manual",
            Self::Spread => "spread",
            Self::Ember => "ember",
            Self::Spontaneous => "spontaneous",
            Self::Flashpoint => "flashpoint",
            Self::Lightning => "lightning",
        };
        f.write_str(name)
    }
}

/// Cumulative fire counters since the last reset
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FireStats {
    ignitions: [u64; 6],
    /// Cells that burned through to soil
    pub cells_consumed: u64,
    pub embers_thrown: u64,
    pub lightning_strikes: u64,
    /// Largest active-fire count seen at the end of a tick
    pub peak_active: usize,
}

impl FireStats {
    pub fn record_ignition(&mut self, cause: IgnitionCause) {
        self.ignitions[cause.slot()] += 1;
    }

    pub fn ignitions(&self, cause: IgnitionCause) -> u64 {
        self.ignitions[cause.slot()]
    }

    pub fn total_ignitions(&self) -> u64 {
        self.ignitions.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_by_cause() {
        let mut stats = FireStats::default();
        stats.record_ignition(IgnitionCause::Spread);
        stats.record_ignition(IgnitionCause::Spread);
        stats.record_ignition(IgnitionCause::Lightning);
        assert_eq!(stats.ignitions(IgnitionCause::Spread), 2);
        assert_eq!(stats.ignitions(IgnitionCause::Manual), 0);
        assert_eq!(stats.total_ignitions(), 3);
        assert_eq!(IgnitionCause::ALL.len(), 6);
    }
}

//! Construction-time errors
//!
//! The tick itself has no failure paths; everything that can go wrong is
//! caught when a simulation is configured or a scenario is placed.

use std::fmt;

/// Error returned by configuration validation and placement calls
#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    /// Grid must be at least 1x1
    InvalidDimensions { width: usize, height: usize },
    /// Chunks must be at least one cell wide
    InvalidChunkSize(usize),
    /// Chunks need at least one pass of activity to be scheduled
    InvalidActivityThreshold(u32),
    /// A probability parameter lies outside [0, 1]
    InvalidProbability { name: &'static str, value: f32 },
    /// A placement call targeted a position outside the grid
    OutOfBounds { x: i32, y: i32 },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDimensions { width, height } => {
                write!(f, "Grid dimensions {width}x{height} must both be non-zero")
            }
            Self::InvalidChunkSize(size) => write!(f, "Chunk size {size} must be non-zero"),
            Self::InvalidActivityThreshold(threshold) => {
                write!(f, "Activity threshold {threshold} must be non-zero")
            }
            Self::InvalidProbability { name, value } => {
                write!(f, "Parameter '{name}' = {value} is not a probability in [0, 1]")
            }
            Self::OutOfBounds { x, y } => write!(f, "Position ({x}, {y}) is outside the grid"),
        }
    }
}

impl std::error::Error for SimError {}

/// Check that `value` is a probability
pub(crate) fn check_probability(name: &'static str, value: f32) -> Result<(), SimError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(SimError::InvalidProbability { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_problem() {
        let err = SimError::InvalidProbability {
            name: "spread_chance",
            value: 1.5,
        };
        assert_eq!(
            err.to_string(),
            "Parameter 'spread_chance' = 1.5 is not a probability in [0, 1]"
        );
        assert!(check_probability("x", 0.0).is_ok());
        assert!(check_probability("x", f32::NAN).is_err());
    }
}

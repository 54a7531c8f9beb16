//! Spatial scheduling: which regions of the grid get visited each tick

pub mod chunks;

pub use chunks::{ChunkBounds, ChunkScheduler};

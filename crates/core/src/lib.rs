//! Ecosystem Simulation Core Library
//!
//! A 2-D cellular automaton of air, soil, water, plants, insects, worms,
//! seeds and dead matter, with a fire model layered on top.
//!
//! ## Architecture
//!
//! - **Grid** (`grid`): structure-of-arrays cell store plus the [`Cells`]
//!   mutation view that reports every write to the scheduler
//! - **Scheduler** (`scheduler`): decaying per-chunk activity, so quiet
//!   regions of the world cost nothing
//! - **Rules** (`rules`): one update function per cell type
//! - **Fire** (`fire`): ignition, multi-factor spread, burn progress, heat and
//!   smoke, embers, spontaneous combustion, lightning and fire-linked
//!   succession
//! - **Simulation** (`simulation`): owns everything and runs the tick
//!
//! Weather and day/night state come from outside through
//! [`EnvironmentSignals`].
//!
//! ## Example
//!
//! ```
//! use ecosim_core::{Cell, Environment, Organ, Simulation, SimulationConfig};
//!
//! let mut sim = Simulation::new(SimulationConfig::new(64, 48)).unwrap();
//! sim.fill_rect(0, 40, 64, 48, Cell::soil(60, 60));
//! sim.set_cell(10, 39, Cell::plant(Organ::Stem)).unwrap();
//! assert!(sim.start_fire(10, 39).unwrap());
//!
//! sim.run(20, &Environment::TEMPERATE);
//! println!("{:?}", sim.get_stats());
//! ```

pub mod core_types;
pub mod error;
pub mod fire;
pub mod grid;
pub mod rules;
pub mod scheduler;
pub mod simulation;

pub use core_types::{
    Cell, CellType, DiurnalCycle, Environment, EnvironmentSignals, LifeStage, Metadata, Organ,
    SoilClass, SubState, WeatherPattern,
};
pub use error::SimError;
pub use fire::{EmberOutcome, FireConfig, FireStats, FireSystem, IgnitionCause, SpreadFactors};
pub use grid::{CellGrid, Cells};
pub use rules::RuleConfig;
pub use scheduler::{ChunkBounds, ChunkScheduler};
pub use simulation::{Simulation, SimulationConfig, SimulationStats};

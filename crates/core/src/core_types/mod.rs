//! Core types and utilities

pub mod cell;
pub mod environment;

pub use cell::*;
pub use environment::*;

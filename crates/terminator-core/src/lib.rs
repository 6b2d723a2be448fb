//! Core types and definitions for the Target Terminator flight simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! matrix column layout, entity and action enums, configuration, errors,
//! and constants. It contains no simulation logic.

pub mod config;
pub mod constants;
pub mod enums;
pub mod error;
pub mod types;

#[cfg(test)]
mod tests;

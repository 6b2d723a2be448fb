//! Single-agent reinforcement learning environment around the entity simulation.
//!
//! One airplane chases one target. [`Env::step`] takes an [`Action`], ticks the
//! simulation at a fixed 60 Hz, and reports an observation, a shaped reward,
//! and whether the episode ended. Every step is recorded so a run can be
//! dumped to JSON afterwards.
//!
//! [`Action`]: terminator_core::enums::Action

pub mod env;
pub mod error;
pub mod history;
pub mod spawn;

pub use env::{Env, Observation, StepResult};
pub use error::EnvError;
pub use history::{History, StepRecord};

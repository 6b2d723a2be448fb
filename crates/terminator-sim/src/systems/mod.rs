//! Systems that mutate the entity store each tick.
//! Each system operates on the rows of its own partition only; collision is the
//! single pass that reads every row.

pub mod airplanes;
pub mod bullets;
pub mod collision;
pub mod targets;

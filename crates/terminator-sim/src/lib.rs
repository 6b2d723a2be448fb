//! Entity simulation engine for Target Terminator.
//!
//! All airplanes, targets, and bullets live as rows of two fixed-capacity
//! matrices owned by [`Entities`]. Each tick runs airplane kinematics, bullet
//! integration, collision detection, bullet spawning, and despawning, in that
//! order. Completely headless and deterministic.

pub mod entities;
pub mod store;
pub mod systems;

pub use entities::Entities;
pub use store::{EntityStore, Partition, Rows, RowsMut};

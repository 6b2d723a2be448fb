//! Enumeration types used throughout the simulation.
//!
//! The entity matrices store these as floats; each enum knows its own
//! matrix encoding so no other crate hard-codes the magic numbers.

use serde::{Deserialize, Serialize};

use crate::constants::NONE_FLAG;
use crate::error::ActionError;

/// Kind of object occupying an entity row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityType {
    /// Unused slot.
    Empty,
    Airplane,
    Target,
    Bullet,
    /// Synthetic world edge. Never stored as a real row, only used as a collision cause.
    Boundary,
}

impl EntityType {
    /// Value stored in the entity type column.
    pub fn as_scalar(self) -> f64 {
        match self {
            EntityType::Empty => NONE_FLAG,
            EntityType::Airplane => 0.0,
            EntityType::Target => 1.0,
            EntityType::Bullet => 2.0,
            EntityType::Boundary => 3.0,
        }
    }

    /// Decode an entity type column value.
    pub fn from_scalar(value: f64) -> Option<Self> {
        match value.round() as i64 {
            -1 => Some(EntityType::Empty),
            0 => Some(EntityType::Airplane),
            1 => Some(EntityType::Target),
            2 => Some(EntityType::Bullet),
            3 => Some(EntityType::Boundary),
            _ => None,
        }
    }
}

/// Discrete per-tick control input for one airplane.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Action {
    #[default]
    Noop = 0,
    /// Pitch += agility · dt.
    PitchUp = 1,
    /// Pitch -= agility · dt.
    PitchDown = 2,
    /// Throttle += 100 · dt, clamped to 100.
    ThrottleUp = 3,
    /// Throttle -= 100 · dt, clamped to 0.
    ThrottleDown = 4,
    /// Spawn one bullet ahead of the airplane.
    Fire = 5,
}

impl Action {
    pub const ALL: [Action; 6] = [
        Action::Noop,
        Action::PitchUp,
        Action::PitchDown,
        Action::ThrottleUp,
        Action::ThrottleDown,
        Action::Fire,
    ];

    pub fn code(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Action {
    type Error = ActionError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Action::Noop),
            1 => Ok(Action::PitchUp),
            2 => Ok(Action::PitchDown),
            3 => Ok(Action::ThrottleUp),
            4 => Ok(Action::ThrottleDown),
            5 => Ok(Action::Fire),
            other => Err(ActionError::UnknownCode(other)),
        }
    }
}

/// Decoded meaning of the collision flag column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionCause {
    Alive,
    /// Overlapped an entity of this type.
    Entity(EntityType),
    /// Touched or left the world boundaries.
    Boundary,
}

impl CollisionCause {
    /// Flag value written into the collision column.
    pub fn encode(self) -> f64 {
        match self {
            CollisionCause::Alive => NONE_FLAG,
            CollisionCause::Entity(kind) => kind.as_scalar() + 1.0,
            CollisionCause::Boundary => EntityType::Boundary.as_scalar() + 1.0,
        }
    }

    /// Decode a collision column value. Unknown codes yield `None`.
    pub fn decode(flag: f64) -> Option<Self> {
        match flag.round() as i64 {
            -1 => Some(CollisionCause::Alive),
            1 => Some(CollisionCause::Entity(EntityType::Airplane)),
            2 => Some(CollisionCause::Entity(EntityType::Target)),
            3 => Some(CollisionCause::Entity(EntityType::Bullet)),
            4 => Some(CollisionCause::Boundary),
            _ => None,
        }
    }

    pub fn is_alive(self) -> bool {
        self == CollisionCause::Alive
    }
}

//! Entity row layout and fundamental geometric types.
//!
//! Every simulated object occupies one row in two parallel matrices: a row of
//! `SCALAR_COLUMNS` floats and a row of `VECTOR_COLUMNS` 2-vectors. The column
//! meaning is fixed and named by the constants in [`scalar`] and [`vector`].

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::constants::{NONE_FLAG, SCALAR_COLUMNS, VECTOR_COLUMNS};

/// One entity's scalar attributes.
pub type ScalarRow = [f64; SCALAR_COLUMNS];

/// One entity's vector attributes.
pub type VectorRow = [DVec2; VECTOR_COLUMNS];

/// Scalar column indices.
pub mod scalar {
    /// kg
    pub const MASS: usize = 0;
    /// Aggregate drag coefficient scale.
    pub const DRAG_CONSTANT: usize = 1;
    /// Aggregate lift coefficient scale. Bullets reuse it as their age in ticks.
    pub const LIFT_CONSTANT: usize = 2;
    /// Lift coefficient at zero angle of attack.
    pub const CL0: usize = 3;
    /// Drag coefficient at zero angle of attack.
    pub const CD_MIN: usize = 4;
    /// Max thrust (N).
    pub const ENGINE_FORCE: usize = 5;
    /// Max pitch rate (deg/s).
    pub const AGILITY: usize = 6;
    /// 0..=100
    pub const THROTTLE: usize = 7;
    /// Degrees, wraps mod 360.
    pub const PITCH: usize = 8;
    /// Meters.
    pub const COLLISION_RADIUS: usize = 9;
    /// Derived angle of attack in degrees, (-180, 180].
    pub const AOA_DEG: usize = 10;
    /// Encoded [`EntityType`](crate::enums::EntityType).
    pub const ENTITY_TYPE: usize = 11;
    /// -1 while alive, otherwise an encoded [`CollisionCause`](crate::enums::CollisionCause).
    pub const COLLISION_FLAG: usize = 12;
    /// Free-use scratch column (last action code for airplanes).
    pub const SCRATCH: usize = 13;

    /// Bullet age in ticks, stored in the lift constant column.
    pub const BULLET_AGE: usize = LIFT_CONSTANT;
}

/// Vector column indices.
pub mod vector {
    /// x = critical angle (deg), y = lift coefficient at that angle.
    pub const AOA_CRIT_LOW: usize = 0;
    /// x = critical angle (deg), y = lift coefficient at that angle.
    pub const AOA_CRIT_HIGH: usize = 1;
    pub const VELOCITY: usize = 2;
    pub const POSITION: usize = 3;
    pub const VELOCITY_UNIT: usize = 4;
    pub const FORCE_GRAVITY: usize = 5;
    pub const FORCE_ENGINE: usize = 6;
    pub const FORCE_DRAG: usize = 7;
    pub const FORCE_LIFT: usize = 8;
    pub const PITCH_UNIT: usize = 9;
}

/// A scalar row for an unused slot: zeros, with empty type and alive flag.
pub fn empty_scalar_row() -> ScalarRow {
    let mut row = [0.0; SCALAR_COLUMNS];
    row[scalar::ENTITY_TYPE] = NONE_FLAG;
    row[scalar::COLLISION_FLAG] = NONE_FLAG;
    row
}

/// A zeroed vector row.
pub fn empty_vector_row() -> VectorRow {
    [DVec2::ZERO; VECTOR_COLUMNS]
}

/// Axis-aligned world limits. Touching or crossing an edge counts as a crash.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Boundaries {
    /// `[min, max]` on the x axis.
    pub x: [f64; 2],
    /// `[min, max]` on the y axis.
    pub y: [f64; 2],
}

impl Boundaries {
    pub fn new(x: [f64; 2], y: [f64; 2]) -> Self {
        Self { x, y }
    }

    /// Boundaries `[[0, width], [0, height]]` for a window of the given size.
    pub fn from_window(width: u32, height: u32) -> Self {
        Self {
            x: [0.0, width as f64],
            y: [0.0, height as f64],
        }
    }

    /// True when `pos` lies on or beyond any edge.
    pub fn is_violated_by(&self, pos: DVec2) -> bool {
        pos.x <= self.x[0] || pos.x >= self.x[1] || pos.y <= self.y[0] || pos.y >= self.y[1]
    }
}

impl Default for Boundaries {
    fn default() -> Self {
        Self::from_window(
            crate::constants::DEFAULT_WORLD_WIDTH,
            crate::constants::DEFAULT_WORLD_HEIGHT,
        )
    }
}

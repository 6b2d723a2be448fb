//! Simulation constants and tuning parameters.

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 60;

/// Seconds per tick.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

/// Gravitational acceleration (m/s²). Screen coordinates: +y points down.
pub const GRAVITY: f64 = 9.81;

/// Default capacity of the entity store (rows shared by all entity kinds).
pub const MAX_ENTITIES: usize = 1000;

// --- Matrix layout ---

/// Number of scalar columns per entity row.
pub const SCALAR_COLUMNS: usize = 14;

/// Number of 2-vector columns per entity row.
pub const VECTOR_COLUMNS: usize = 10;

/// Sentinel stored in the entity type and collision flag columns.
pub const NONE_FLAG: f64 = -1.0;

// --- Aerodynamics ---

/// Engine force per throttle percent, as a fraction of max thrust.
pub const THROTTLE_FORCE_SCALE: f64 = 0.1;

/// Divisor inside the quadratic drag-vs-AoA term: `(aoa / sqrt(40))^2`.
pub const DRAG_AOA_DIVISOR: f64 = 40.0;

/// Pitch change per unit of drag force when outside the critical AoA window.
pub const INDUCED_TORQUE_FACTOR: f64 = 0.01;

/// Velocity magnitude below which the unit vector is left untouched.
pub const ZERO_VELOCITY_EPSILON: f64 = 1e-9;

// --- Controls ---

/// Throttle change per second while a throttle action is held (percent/s).
pub const THROTTLE_RATE: f64 = 100.0;

/// Upper throttle bound (percent).
pub const THROTTLE_MAX: f64 = 100.0;

/// Full rotation in degrees; pitch wraps into `[0, PITCH_WRAP)`.
pub const PITCH_WRAP: f64 = 360.0;

// --- Bullets ---

/// Extra spacing between shooter and bullet hitboxes at spawn (meters).
/// Keeps a plane from shooting itself on the tick it fires.
pub const BULLET_SPAWN_CLEARANCE: f64 = 2.0;

// --- World ---

/// Default world width (meters).
pub const DEFAULT_WORLD_WIDTH: u32 = 1280;

/// Default world height (meters).
pub const DEFAULT_WORLD_HEIGHT: u32 = 720;

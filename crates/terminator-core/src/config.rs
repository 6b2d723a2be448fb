//! Configuration for airplanes, targets, and the world.
//!
//! Configs are plain serde structs read from JSON. Each kind has a single
//! `validate` function that reports every broken rule at once; the simulation
//! core never re-checks them.

use std::fs;
use std::path::Path;

use glam::DVec2;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::{CollisionCause, EntityType};
use crate::error::{ConfigError, ValidationErrors};
use crate::types::{empty_scalar_row, empty_vector_row, scalar, vector, Boundaries, ScalarRow, VectorRow};

/// Airplane aerodynamics, initial pose, and gun.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaneConfig {
    pub properties: PlaneProperties,
    pub bullet_config: BulletConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaneProperties {
    pub mass: f64,
    pub drag_constant: f64,
    pub lift_constant: f64,
    pub lift_coefficient_aoa_0: f64,
    pub drag_coefficient_aoa_0: f64,
    pub engine_force: f64,
    /// Max pitch rate (deg/s).
    pub agility: f64,
    pub initial_throttle: f64,
    pub initial_pitch: f64,
    pub collision_radius: f64,
    /// `[angle_deg, lift_coefficient]` at the negative stall angle.
    pub critical_aoa_lower_bound: [f64; 2],
    /// `[angle_deg, lift_coefficient]` at the positive stall angle.
    pub critical_aoa_higher_bound: [f64; 2],
    pub initial_velocity: [f64; 2],
    pub initial_position: [f64; 2],
    #[serde(default)]
    pub max_spawn_position_deviation: f64,
    #[serde(default)]
    pub max_spawn_pitch_deviation: f64,
}

/// Projectile ballistics shared by every airplane of a config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulletConfig {
    /// Muzzle speed added along the shooter's heading (m/s).
    pub speed: f64,
    /// Ticks a bullet survives before despawn.
    pub lifetime: u32,
    pub coll_radius: f64,
}

/// A passive, collidable target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetConfig {
    pub position: [f64; 2],
    pub coll_radius: f64,
    #[serde(default)]
    pub max_spawn_deviation: f64,
}

/// World size and store capacity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    pub window_dimensions: [u32; 2],
    #[serde(default = "default_max_entities")]
    pub max_entities: usize,
}

fn default_max_entities() -> usize {
    MAX_ENTITIES
}

impl Default for PlaneConfig {
    fn default() -> Self {
        Self {
            properties: PlaneProperties {
                mass: 1000.0,
                drag_constant: 0.4,
                lift_constant: 5.0,
                lift_coefficient_aoa_0: 0.3,
                drag_coefficient_aoa_0: 0.02,
                engine_force: 1500.0,
                agility: 90.0,
                initial_throttle: 50.0,
                initial_pitch: 0.0,
                collision_radius: 10.0,
                critical_aoa_lower_bound: [-15.0, -0.6],
                critical_aoa_higher_bound: [15.0, 1.2],
                initial_velocity: [80.0, 0.0],
                initial_position: [150.0, 300.0],
                max_spawn_position_deviation: 50.0,
                max_spawn_pitch_deviation: 0.0,
            },
            bullet_config: BulletConfig {
                speed: 300.0,
                lifetime: 60,
                coll_radius: 2.0,
            },
        }
    }
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            position: [1000.0, 300.0],
            coll_radius: 20.0,
            max_spawn_deviation: 50.0,
        }
    }
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            window_dimensions: [DEFAULT_WORLD_WIDTH, DEFAULT_WORLD_HEIGHT],
            max_entities: MAX_ENTITIES,
        }
    }
}

// ---- Validation ----

fn non_negative(errors: &mut ValidationErrors, field: &str, value: f64) {
    if !value.is_finite() || value < 0.0 {
        errors.push(field, format!("must be a finite number >= 0, got {value}"));
    }
}

fn finite_pair(errors: &mut ValidationErrors, field: &str, value: [f64; 2]) {
    if !value.iter().all(|v| v.is_finite()) {
        errors.push(field, format!("must hold finite numbers, got {value:?}"));
    }
}

impl PlaneConfig {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let p = &self.properties;

        if !(p.mass.is_finite() && p.mass > 0.0) {
            errors.push("properties.mass", format!("must be > 0, got {}", p.mass));
        }
        non_negative(&mut errors, "properties.drag_constant", p.drag_constant);
        non_negative(&mut errors, "properties.lift_constant", p.lift_constant);
        non_negative(&mut errors, "properties.lift_coefficient_aoa_0", p.lift_coefficient_aoa_0);
        non_negative(&mut errors, "properties.drag_coefficient_aoa_0", p.drag_coefficient_aoa_0);
        non_negative(&mut errors, "properties.engine_force", p.engine_force);
        non_negative(&mut errors, "properties.agility", p.agility);
        non_negative(&mut errors, "properties.initial_pitch", p.initial_pitch);
        non_negative(&mut errors, "properties.collision_radius", p.collision_radius);
        non_negative(
            &mut errors,
            "properties.max_spawn_position_deviation",
            p.max_spawn_position_deviation,
        );

        if !(0.0..=THROTTLE_MAX).contains(&p.initial_throttle) {
            errors.push(
                "properties.initial_throttle",
                format!("must be within [0, {THROTTLE_MAX}], got {}", p.initial_throttle),
            );
        }
        if !(0.0..=PITCH_WRAP).contains(&p.max_spawn_pitch_deviation) {
            errors.push(
                "properties.max_spawn_pitch_deviation",
                format!("must be within [0, {PITCH_WRAP}], got {}", p.max_spawn_pitch_deviation),
            );
        }

        finite_pair(&mut errors, "properties.critical_aoa_lower_bound", p.critical_aoa_lower_bound);
        finite_pair(&mut errors, "properties.critical_aoa_higher_bound", p.critical_aoa_higher_bound);
        finite_pair(&mut errors, "properties.initial_velocity", p.initial_velocity);
        if p.initial_position.iter().any(|v| !v.is_finite() || *v < 0.0) {
            errors.push(
                "properties.initial_position",
                format!("must hold finite numbers >= 0, got {:?}", p.initial_position),
            );
        }
        // The lift curve divides by both critical angles.
        if p.critical_aoa_lower_bound[0] >= 0.0 {
            errors.push(
                "properties.critical_aoa_lower_bound",
                format!("angle must be < 0, got {}", p.critical_aoa_lower_bound[0]),
            );
        }
        if p.critical_aoa_higher_bound[0] <= 0.0 {
            errors.push(
                "properties.critical_aoa_higher_bound",
                format!("angle must be > 0, got {}", p.critical_aoa_higher_bound[0]),
            );
        }

        errors.merge("bullet_config", self.bullet_config.validate_fields());
        errors.into_result()
    }

    /// Seed rows for one airplane, shifted by the given spawn deviation.
    pub fn seed_rows(&self, position_offset: DVec2, pitch_offset: f64) -> (ScalarRow, VectorRow) {
        let p = &self.properties;
        let pitch = (p.initial_pitch + pitch_offset).rem_euclid(PITCH_WRAP);

        let mut s = empty_scalar_row();
        s[scalar::MASS] = p.mass;
        s[scalar::DRAG_CONSTANT] = p.drag_constant;
        s[scalar::LIFT_CONSTANT] = p.lift_constant;
        s[scalar::CL0] = p.lift_coefficient_aoa_0;
        s[scalar::CD_MIN] = p.drag_coefficient_aoa_0;
        s[scalar::ENGINE_FORCE] = p.engine_force;
        s[scalar::AGILITY] = p.agility;
        s[scalar::THROTTLE] = p.initial_throttle;
        s[scalar::PITCH] = pitch;
        s[scalar::COLLISION_RADIUS] = p.collision_radius;
        s[scalar::ENTITY_TYPE] = EntityType::Airplane.as_scalar();
        s[scalar::COLLISION_FLAG] = CollisionCause::Alive.encode();

        let velocity = DVec2::from(p.initial_velocity);
        let pitch_unit = pitch_unit_vector(pitch);

        let mut v = empty_vector_row();
        v[vector::AOA_CRIT_LOW] = DVec2::from(p.critical_aoa_lower_bound);
        v[vector::AOA_CRIT_HIGH] = DVec2::from(p.critical_aoa_higher_bound);
        v[vector::VELOCITY] = velocity;
        v[vector::POSITION] = DVec2::from(p.initial_position) + position_offset;
        v[vector::VELOCITY_UNIT] = velocity.try_normalize().unwrap_or(pitch_unit);
        v[vector::PITCH_UNIT] = pitch_unit;
        (s, v)
    }
}

/// `(cos(-pitch), sin(-pitch))` for a pitch in degrees. Screen y points down,
/// so a positive pitch noses the airplane up.
pub fn pitch_unit_vector(pitch_deg: f64) -> DVec2 {
    let rad = -pitch_deg.to_radians();
    DVec2::new(rad.cos(), rad.sin())
}

impl BulletConfig {
    fn validate_fields(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::default();
        if !(self.speed.is_finite() && self.speed >= 0.1) {
            errors.push("speed", format!("must be >= 0.1, got {}", self.speed));
        }
        non_negative(&mut errors, "coll_radius", self.coll_radius);
        errors
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        self.validate_fields().into_result()
    }
}

impl TargetConfig {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        if self.position.iter().any(|v| !v.is_finite() || *v < 0.0) {
            errors.push(
                "position",
                format!("must hold finite numbers >= 0, got {:?}", self.position),
            );
        }
        non_negative(&mut errors, "coll_radius", self.coll_radius);
        non_negative(&mut errors, "max_spawn_deviation", self.max_spawn_deviation);
        errors.into_result()
    }

    /// Seed rows for one target. Only position and radius matter.
    pub fn seed_rows(&self, position_offset: DVec2) -> (ScalarRow, VectorRow) {
        let mut s = empty_scalar_row();
        s[scalar::COLLISION_RADIUS] = self.coll_radius;
        s[scalar::ENTITY_TYPE] = EntityType::Target.as_scalar();
        s[scalar::COLLISION_FLAG] = CollisionCause::Alive.encode();

        let mut v = empty_vector_row();
        v[vector::POSITION] = DVec2::from(self.position) + position_offset;
        (s, v)
    }
}

impl EnvironmentConfig {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        for (axis, dim) in ["width", "height"].iter().zip(self.window_dimensions) {
            if dim < 1 {
                errors.push(
                    format!("window_dimensions.{axis}"),
                    format!("must be >= 1, got {dim}"),
                );
            }
        }
        if self.max_entities < 2 {
            errors.push(
                "max_entities",
                format!("must fit at least one airplane and one target, got {}", self.max_entities),
            );
        }
        errors.into_result()
    }

    pub fn boundaries(&self) -> Boundaries {
        Boundaries::from_window(self.window_dimensions[0], self.window_dimensions[1])
    }
}

// ---- Loading ----

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&json).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Read and validate a plane config.
pub fn load_plane(path: &Path) -> Result<PlaneConfig, ConfigError> {
    let config: PlaneConfig = load_json(path)?;
    config
        .validate()
        .map_err(|errors| ConfigError::Invalid { kind: "plane", errors })?;
    Ok(config)
}

/// Read and validate a target config.
pub fn load_target(path: &Path) -> Result<TargetConfig, ConfigError> {
    let config: TargetConfig = load_json(path)?;
    config
        .validate()
        .map_err(|errors| ConfigError::Invalid { kind: "target", errors })?;
    Ok(config)
}

/// Read and validate an environment config.
pub fn load_environment(path: &Path) -> Result<EnvironmentConfig, ConfigError> {
    let config: EnvironmentConfig = load_json(path)?;
    config
        .validate()
        .map_err(|errors| ConfigError::Invalid { kind: "environment", errors })?;
    Ok(config)
}

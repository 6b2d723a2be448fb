//! Tests for the shared vocabulary: encodings, boundaries, and config validation.

use glam::DVec2;

use crate::config::*;
use crate::constants::*;
use crate::enums::*;
use crate::error::ActionError;
use crate::types::*;

// ---- Encodings ----

#[test]
fn test_action_codes() {
    for action in Action::ALL {
        assert_eq!(Action::try_from(action.code()), Ok(action));
    }
    assert_eq!(Action::try_from(6), Err(ActionError::UnknownCode(6)));
    assert_eq!(Action::try_from(255), Err(ActionError::UnknownCode(255)));
}

#[test]
fn test_entity_type_scalar_encoding() {
    assert_eq!(EntityType::Empty.as_scalar(), -1.0);
    assert_eq!(EntityType::Airplane.as_scalar(), 0.0);
    assert_eq!(EntityType::from_scalar(2.0), Some(EntityType::Bullet));
    assert_eq!(EntityType::from_scalar(-1.0), Some(EntityType::Empty));
    assert_eq!(EntityType::from_scalar(7.0), None);
}

#[test]
fn test_collision_cause_encoding() {
    assert_eq!(CollisionCause::Alive.encode(), NONE_FLAG);
    assert_eq!(CollisionCause::Entity(EntityType::Airplane).encode(), 1.0);
    assert_eq!(CollisionCause::Entity(EntityType::Bullet).encode(), 3.0);
    assert_eq!(CollisionCause::Boundary.encode(), 4.0);

    assert_eq!(CollisionCause::decode(-1.0), Some(CollisionCause::Alive));
    assert_eq!(
        CollisionCause::decode(2.0),
        Some(CollisionCause::Entity(EntityType::Target))
    );
    assert_eq!(CollisionCause::decode(4.0), Some(CollisionCause::Boundary));
    assert_eq!(CollisionCause::decode(0.0), None);
    assert!(!CollisionCause::Boundary.is_alive());
}

#[test]
fn test_empty_rows() {
    let s = empty_scalar_row();
    assert_eq!(s[scalar::ENTITY_TYPE], -1.0);
    assert_eq!(s[scalar::COLLISION_FLAG], -1.0);
    assert_eq!(s[scalar::MASS], 0.0);
    assert!(empty_vector_row().iter().all(|v| *v == DVec2::ZERO));
}

// ---- Boundaries ----

#[test]
fn test_boundary_edges_are_violations() {
    let b = Boundaries::from_window(1280, 720);
    assert!(b.is_violated_by(DVec2::new(1280.0, 300.0)));
    assert!(!b.is_violated_by(DVec2::new(1279.999, 300.0)));
    assert!(b.is_violated_by(DVec2::new(0.0, 300.0)));
    assert!(b.is_violated_by(DVec2::new(640.0, 720.0)));
    assert!(b.is_violated_by(DVec2::new(640.0, -5.0)));
    assert!(!b.is_violated_by(DVec2::new(640.0, 360.0)));
}

// ---- Config ----

#[test]
fn test_default_configs_validate() {
    assert!(PlaneConfig::default().validate().is_ok());
    assert!(TargetConfig::default().validate().is_ok());
    assert!(EnvironmentConfig::default().validate().is_ok());
}

#[test]
fn test_plane_validation_reports_every_error() {
    let mut config = PlaneConfig::default();
    config.properties.mass = 0.0;
    config.properties.initial_throttle = 120.0;
    config.properties.critical_aoa_lower_bound = [5.0, -0.5];
    config.bullet_config.speed = 0.0;

    let errors = config.validate().unwrap_err();
    let fields: Vec<&str> = errors.errors.iter().map(|e| e.field.as_str()).collect();
    assert_eq!(errors.len(), 4, "got {fields:?}");
    assert!(fields.contains(&"properties.mass"));
    assert!(fields.contains(&"properties.initial_throttle"));
    assert!(fields.contains(&"properties.critical_aoa_lower_bound"));
    assert!(fields.contains(&"bullet_config.speed"));
    assert!(errors.to_string().starts_with("4 validation error(s)"));
}

#[test]
fn test_environment_validation() {
    let config = EnvironmentConfig {
        window_dimensions: [0, 720],
        max_entities: 1,
    };
    let errors = config.validate().unwrap_err();
    assert_eq!(errors.len(), 2);
    assert_eq!(errors.errors[0].field, "window_dimensions.width");
}

#[test]
fn test_target_validation() {
    let config = TargetConfig {
        position: [-1.0, 10.0],
        coll_radius: -2.0,
        max_spawn_deviation: 0.0,
    };
    assert_eq!(config.validate().unwrap_err().len(), 2);
}

#[test]
fn test_plane_seed_rows() {
    let config = PlaneConfig::default();
    let (s, v) = config.seed_rows(DVec2::new(10.0, 20.0), 370.0);

    assert_eq!(s[scalar::MASS], config.properties.mass);
    assert_eq!(s[scalar::ENTITY_TYPE], EntityType::Airplane.as_scalar());
    assert_eq!(s[scalar::COLLISION_FLAG], NONE_FLAG);
    assert!((s[scalar::PITCH] - 10.0).abs() < 1e-9, "pitch should wrap, got {}", s[scalar::PITCH]);

    let start = DVec2::from(config.properties.initial_position);
    assert_eq!(v[vector::POSITION], start + DVec2::new(10.0, 20.0));
    assert_eq!(v[vector::VELOCITY], DVec2::new(80.0, 0.0));
    assert_eq!(v[vector::VELOCITY_UNIT], DVec2::new(1.0, 0.0));
    assert_eq!(v[vector::AOA_CRIT_LOW], DVec2::new(-15.0, -0.6));
}

#[test]
fn test_target_seed_rows() {
    let config = TargetConfig::default();
    let (s, v) = config.seed_rows(DVec2::ZERO);
    assert_eq!(s[scalar::ENTITY_TYPE], EntityType::Target.as_scalar());
    assert_eq!(s[scalar::COLLISION_RADIUS], 20.0);
    assert_eq!(v[vector::POSITION], DVec2::new(1000.0, 300.0));
    assert_eq!(v[vector::VELOCITY], DVec2::ZERO);
}

#[test]
fn test_pitch_unit_vector_points_up_for_positive_pitch() {
    let up = pitch_unit_vector(90.0);
    assert!(up.x.abs() < 1e-12);
    assert!((up.y + 1.0).abs() < 1e-12, "screen-up is -y, got {up:?}");
    assert!((pitch_unit_vector(0.0) - DVec2::X).length() < 1e-12);
}

#[test]
fn test_config_json_defaults_optional_fields() {
    let json = r#"{ "position": [500, 200], "coll_radius": 15 }"#;
    let target: TargetConfig = serde_json::from_str(json).unwrap();
    assert_eq!(target.max_spawn_deviation, 0.0);

    let env: EnvironmentConfig = serde_json::from_str(r#"{ "window_dimensions": [800, 600] }"#).unwrap();
    assert_eq!(env.max_entities, MAX_ENTITIES);
    assert_eq!(env.boundaries(), Boundaries::new([0.0, 800.0], [0.0, 600.0]));

    let plane = PlaneConfig::default();
    let back: PlaneConfig = serde_json::from_str(&serde_json::to_string(&plane).unwrap()).unwrap();
    assert_eq!(plane, back);
}

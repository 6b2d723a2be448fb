//! Airplane flight model: control inputs, aerodynamic forces, and integration.
//!
//! Screen coordinates: +x right, +y down. Pitch is in degrees, counter-clockwise
//! on screen, so the pitch unit vector is `(cos(-pitch), sin(-pitch))`.

use std::f64::consts::PI;

use glam::DVec2;

use terminator_core::config::pitch_unit_vector;
use terminator_core::constants::{
    DRAG_AOA_DIVISOR, GRAVITY, INDUCED_TORQUE_FACTOR, PITCH_WRAP, THROTTLE_FORCE_SCALE,
    THROTTLE_MAX, THROTTLE_RATE, ZERO_VELOCITY_EPSILON,
};
use terminator_core::enums::Action;
use terminator_core::types::{scalar, vector, ScalarRow, VectorRow};

use crate::store::{is_alive, RowsMut};

/// Precompute the constant gravity force for every airplane row.
pub fn init(rows: &mut RowsMut<'_>) {
    for (s, v) in rows.scalars.iter().zip(rows.vectors.iter_mut()) {
        v[vector::FORCE_GRAVITY] = DVec2::new(0.0, s[scalar::MASS] * GRAVITY);
    }
}

/// Apply one action per listed airplane. `actions` holds partition-local row
/// indices that the caller has already bounds-checked. Collided airplanes
/// ignore their inputs.
pub fn apply_actions(rows: &mut RowsMut<'_>, dt: f64, actions: &[(usize, Action)]) {
    for &(row, action) in actions {
        let s = &mut rows.scalars[row];
        if !is_alive(s) {
            continue;
        }
        s[scalar::SCRATCH] = f64::from(action.code());
        match action {
            Action::Noop | Action::Fire => {}
            Action::PitchUp => {
                s[scalar::PITCH] = (s[scalar::PITCH] + s[scalar::AGILITY] * dt).rem_euclid(PITCH_WRAP);
            }
            Action::PitchDown => {
                s[scalar::PITCH] = (s[scalar::PITCH] - s[scalar::AGILITY] * dt).rem_euclid(PITCH_WRAP);
            }
            Action::ThrottleUp => {
                s[scalar::THROTTLE] = (s[scalar::THROTTLE] + THROTTLE_RATE * dt).min(THROTTLE_MAX);
            }
            Action::ThrottleDown => {
                s[scalar::THROTTLE] = (s[scalar::THROTTLE] - THROTTLE_RATE * dt).max(0.0);
            }
        }
    }
}

/// Advance every live airplane by `dt` seconds.
pub fn run(rows: &mut RowsMut<'_>, dt: f64) {
    for (s, v) in rows.scalars.iter_mut().zip(rows.vectors.iter_mut()) {
        if is_alive(s) {
            step(s, v, dt);
        }
    }
}

/// One airplane's physics step.
fn step(s: &mut ScalarRow, v: &mut VectorRow, dt: f64) {
    let velocity = v[vector::VELOCITY];
    let speed = velocity.length();
    let speed_sq = speed * speed;

    let pitch_uv = pitch_unit_vector(s[scalar::PITCH]);
    v[vector::PITCH_UNIT] = pitch_uv;

    // A stalled-at-rest airplane keeps its last heading.
    let vel_uv = if speed < ZERO_VELOCITY_EPSILON {
        v[vector::VELOCITY_UNIT]
    } else {
        velocity / speed
    };
    v[vector::VELOCITY_UNIT] = vel_uv;

    let aoa = angle_of_attack(pitch_uv, vel_uv);
    s[scalar::AOA_DEG] = aoa;

    v[vector::FORCE_ENGINE] =
        pitch_uv * (s[scalar::THROTTLE] * THROTTLE_FORCE_SCALE * s[scalar::ENGINE_FORCE]);

    let cl = lift_coefficient(
        aoa,
        v[vector::AOA_CRIT_LOW],
        v[vector::AOA_CRIT_HIGH],
        s[scalar::CL0],
    );
    let lift_mag = s[scalar::LIFT_CONSTANT] * cl * speed_sq;
    v[vector::FORCE_LIFT] = DVec2::new(lift_mag * vel_uv.y, -lift_mag * vel_uv.x);

    let cd = drag_coefficient(aoa, s[scalar::CD_MIN]);
    let drag_mag = s[scalar::DRAG_CONSTANT] * cd * speed_sq;
    v[vector::FORCE_DRAG] = -vel_uv * drag_mag;

    let net = v[vector::FORCE_GRAVITY]
        + v[vector::FORCE_ENGINE]
        + v[vector::FORCE_LIFT]
        + v[vector::FORCE_DRAG];
    v[vector::VELOCITY] = velocity + net / s[scalar::MASS] * dt;
    v[vector::POSITION] += v[vector::VELOCITY] * dt;

    // Beyond the critical angles drag pitches the nose back toward the airflow.
    let torque = dt * drag_mag * INDUCED_TORQUE_FACTOR;
    if aoa < v[vector::AOA_CRIT_LOW].x {
        s[scalar::PITCH] = (s[scalar::PITCH] + torque).rem_euclid(PITCH_WRAP);
    } else if aoa > v[vector::AOA_CRIT_HIGH].x {
        s[scalar::PITCH] = (s[scalar::PITCH] - torque).rem_euclid(PITCH_WRAP);
    }
}

/// Signed angle in degrees from the velocity heading to the pitch heading,
/// normalized into (-180, 180].
pub fn angle_of_attack(pitch_uv: DVec2, vel_uv: DVec2) -> f64 {
    let deg = (pitch_uv.x.atan2(pitch_uv.y) - vel_uv.x.atan2(vel_uv.y)) * 180.0 / PI;
    normalize_angle(deg)
}

/// Wrap degrees into (-180, 180].
pub fn normalize_angle(deg: f64) -> f64 {
    let a = (deg + 180.0).rem_euclid(360.0) - 180.0;
    if a == -180.0 {
        180.0
    } else {
        a
    }
}

/// Piecewise-linear lift curve.
///
/// Linear from `crit_low.y` at `crit_low.x` through `cl0` at zero to
/// `crit_high.y` at `crit_high.x`, then a one-degree stall band beyond each
/// critical angle, and zero past that. Continuous at both critical angles.
/// The high band scales with `|hi - 1 - aoa|`, so it rises before dropping out.
pub fn lift_coefficient(aoa: f64, crit_low: DVec2, crit_high: DVec2, cl0: f64) -> f64 {
    let (lo, coef_lo) = (crit_low.x, crit_low.y);
    let (hi, coef_hi) = (crit_high.x, crit_high.y);

    if aoa < lo - 1.0 {
        0.0
    } else if aoa < lo {
        coef_lo * (lo - 1.0 - aoa).abs()
    } else if aoa < 0.0 {
        cl0 - (cl0 - coef_lo) * aoa / lo
    } else if aoa < hi {
        cl0 + (coef_hi - cl0) * aoa / hi
    } else if aoa < hi + 1.0 {
        coef_hi * (hi - 1.0 - aoa).abs()
    } else {
        0.0
    }
}

/// Quadratic drag polar around `cd_min`.
pub fn drag_coefficient(aoa: f64, cd_min: f64) -> f64 {
    (aoa / DRAG_AOA_DIVISOR.sqrt()).powi(2) + cd_min
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOW: DVec2 = DVec2::new(-15.0, -0.6);
    const HIGH: DVec2 = DVec2::new(15.0, 1.2);

    #[test]
    fn lift_curve_hits_anchor_points() {
        assert!((lift_coefficient(0.0, LOW, HIGH, 0.3) - 0.3).abs() < 1e-12);
        assert!((lift_coefficient(-15.0, LOW, HIGH, 0.3) + 0.6).abs() < 1e-12);
        assert!((lift_coefficient(7.5, LOW, HIGH, 0.3) - 0.75).abs() < 1e-12);
        assert_eq!(lift_coefficient(-16.0, LOW, HIGH, 0.3), 0.0);
        assert_eq!(lift_coefficient(16.0, LOW, HIGH, 0.3), 0.0);
        assert!((lift_coefficient(-15.5, LOW, HIGH, 0.3) + 0.3).abs() < 1e-12);
        assert!((lift_coefficient(15.5, LOW, HIGH, 0.3) - 1.8).abs() < 1e-12);
        assert_eq!(lift_coefficient(-90.0, LOW, HIGH, 0.3), 0.0);
        assert_eq!(lift_coefficient(120.0, LOW, HIGH, 0.3), 0.0);
    }

    #[test]
    fn lift_curve_continuous_at_critical_angles() {
        let eps = 1e-9;
        for edge in [LOW.x, HIGH.x] {
            let below = lift_coefficient(edge - eps, LOW, HIGH, 0.3);
            let above = lift_coefficient(edge + eps, LOW, HIGH, 0.3);
            assert!((below - above).abs() < 1e-6, "jump at {edge}: {below} vs {above}");
        }
    }

    #[test]
    fn angle_normalization_range() {
        assert_eq!(normalize_angle(180.0), 180.0);
        assert_eq!(normalize_angle(-180.0), 180.0);
        assert!((normalize_angle(190.0) + 170.0).abs() < 1e-12);
        assert!((normalize_angle(-370.0) + 10.0).abs() < 1e-12);
        assert_eq!(normalize_angle(0.0), 0.0);
    }

    #[test]
    fn aoa_positive_when_nose_above_flight_path() {
        // Flying level to the right with the nose 10 degrees up.
        let aoa = angle_of_attack(pitch_unit_vector(10.0), DVec2::X);
        assert!((aoa - 10.0).abs() < 1e-9, "aoa = {aoa}");
        let aoa = angle_of_attack(pitch_unit_vector(-5.0), DVec2::X);
        assert!((aoa + 5.0).abs() < 1e-9, "aoa = {aoa}");
    }

    #[test]
    fn drag_grows_with_aoa() {
        assert_eq!(drag_coefficient(0.0, 0.02), 0.02);
        assert!((drag_coefficient(20.0, 0.02) - 10.02).abs() < 1e-9);
    }
}

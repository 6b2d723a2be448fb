//! Seed-row construction with randomized spawn deviation.

use glam::DVec2;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use terminator_core::config::{PlaneConfig, TargetConfig};
use terminator_core::types::{ScalarRow, VectorRow};

/// Uniform whole-number offset in `[0, max)` per axis. Deviations below one
/// unit leave the spawn point fixed.
pub fn position_offset(rng: &mut ChaCha8Rng, max: f64) -> DVec2 {
    let steps = max.floor() as u32;
    if steps == 0 {
        return DVec2::ZERO;
    }
    let x = rng.gen_range(0..steps);
    let y = rng.gen_range(0..steps);
    DVec2::new(f64::from(x), f64::from(y))
}

/// Uniform pitch offset in degrees, `[0, max)`.
pub fn pitch_offset(rng: &mut ChaCha8Rng, max: f64) -> f64 {
    if max > 0.0 {
        rng.gen_range(0.0..max)
    } else {
        0.0
    }
}

/// Seed rows for one airplane and one target, in store order.
pub fn seed_rows(
    rng: &mut ChaCha8Rng,
    plane: &PlaneConfig,
    target: &TargetConfig,
) -> (Vec<ScalarRow>, Vec<VectorRow>) {
    let p = &plane.properties;
    let plane_offset = position_offset(rng, p.max_spawn_position_deviation);
    let plane_pitch = pitch_offset(rng, p.max_spawn_pitch_deviation);
    let (plane_s, plane_v) = plane.seed_rows(plane_offset, plane_pitch);

    let target_offset = position_offset(rng, target.max_spawn_deviation);
    let (target_s, target_v) = target.seed_rows(target_offset);

    (vec![plane_s, target_s], vec![plane_v, target_v])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn offsets_are_whole_and_bounded() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..200 {
            let o = position_offset(&mut rng, 50.0);
            assert!((0.0..50.0).contains(&o.x) && (0.0..50.0).contains(&o.y));
            assert_eq!(o.x.fract(), 0.0);
            assert_eq!(o.y.fract(), 0.0);
        }
    }

    #[test]
    fn zero_deviation_is_fixed() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        assert_eq!(position_offset(&mut rng, 0.0), DVec2::ZERO);
        assert_eq!(position_offset(&mut rng, 0.9), DVec2::ZERO);
        assert_eq!(pitch_offset(&mut rng, 0.0), 0.0);
    }

    #[test]
    fn seed_rows_plane_then_target() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let (s, v) = seed_rows(&mut rng, &PlaneConfig::default(), &TargetConfig::default());
        assert_eq!(s.len(), 2);
        assert_eq!(v.len(), 2);
        assert_eq!(s[0][terminator_core::types::scalar::ENTITY_TYPE], 0.0);
        assert_eq!(s[1][terminator_core::types::scalar::ENTITY_TYPE], 1.0);
    }
}

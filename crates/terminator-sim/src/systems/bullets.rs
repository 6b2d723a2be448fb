//! Bullet pool: a front-packed arena inside the reserved bullet rows.
//!
//! Live bullets always occupy the first `n_bullets` rows of the bullet
//! partition, newest first. The tail of the live range therefore holds the
//! oldest bullets, which is where lifetime expiry removes them from.

use tracing::debug;

use terminator_core::config::BulletConfig;
use terminator_core::enums::EntityType;
use terminator_core::error::EntityError;
use terminator_core::types::{empty_scalar_row, empty_vector_row, scalar, vector, VectorRow};

use crate::store::{is_alive, RowsMut};

/// Live-count bookkeeping plus the ballistic constants every bullet shares.
#[derive(Debug, Clone)]
pub struct BulletPool {
    n_bullets: usize,
    capacity: usize,
    lifetime: u32,
    radius: f64,
    muzzle_speed: f64,
}

impl BulletPool {
    pub fn new(capacity: usize, config: &BulletConfig) -> Self {
        Self {
            n_bullets: 0,
            capacity,
            lifetime: config.lifetime,
            radius: config.coll_radius,
            muzzle_speed: config.speed,
        }
    }

    pub fn len(&self) -> usize {
        self.n_bullets
    }

    pub fn is_empty(&self) -> bool {
        self.n_bullets == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn available(&self) -> usize {
        self.capacity - self.n_bullets
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn muzzle_speed(&self) -> f64 {
        self.muzzle_speed
    }

    pub fn lifetime(&self) -> u32 {
        self.lifetime
    }

    /// Integrate positions of the live bullets. Bullets fly straight: no
    /// gravity, no drag.
    pub fn tick(&self, rows: &mut RowsMut<'_>, dt: f64) {
        for v in &mut rows.vectors[..self.n_bullets] {
            v[vector::POSITION] += v[vector::VELOCITY] * dt;
        }
    }

    /// Insert new bullets at the front of the live range.
    ///
    /// Each entry carries position and velocity; every other column is
    /// initialized here. Fails without touching any row when the pool lacks
    /// room for all of them.
    pub fn spawn(&mut self, rows: &mut RowsMut<'_>, new: &[VectorRow]) -> Result<(), EntityError> {
        let k = new.len();
        if k == 0 {
            return Ok(());
        }
        if k > self.available() {
            return Err(EntityError::BulletCapacity {
                requested: k,
                available: self.available(),
            });
        }

        let n = self.n_bullets;
        rows.scalars.copy_within(0..n, k);
        rows.vectors.copy_within(0..n, k);

        for (i, spawned) in new.iter().enumerate() {
            let mut s = empty_scalar_row();
            s[scalar::ENTITY_TYPE] = EntityType::Bullet.as_scalar();
            s[scalar::BULLET_AGE] = 0.0;
            s[scalar::COLLISION_RADIUS] = self.radius;
            rows.scalars[i] = s;

            let mut v = empty_vector_row();
            v[vector::POSITION] = spawned[vector::POSITION];
            v[vector::VELOCITY] = spawned[vector::VELOCITY];
            rows.vectors[i] = v;
        }

        self.n_bullets += k;
        debug!(spawned = k, live = self.n_bullets, "bullets spawned");
        Ok(())
    }

    /// Age every live bullet by one tick, then drop collided and expired ones.
    ///
    /// Collided bullets are compacted out first, keeping the survivors in
    /// order. Bullets older than the configured lifetime are then cut from the
    /// tail. Freed rows are reset to empty. Returns the number removed.
    pub fn despawn(&mut self, rows: &mut RowsMut<'_>) -> usize {
        let n = self.n_bullets;
        for s in &mut rows.scalars[..n] {
            s[scalar::BULLET_AGE] += 1.0;
        }

        let mut kept = 0;
        for i in 0..n {
            if is_alive(&rows.scalars[i]) {
                if kept != i {
                    rows.scalars[kept] = rows.scalars[i];
                    rows.vectors[kept] = rows.vectors[i];
                }
                kept += 1;
            }
        }
        let collided = n - kept;

        let lifetime = f64::from(self.lifetime);
        let expired = rows.scalars[..kept]
            .iter()
            .filter(|s| s[scalar::BULLET_AGE] > lifetime)
            .count();
        let live = kept - expired;

        for i in live..n {
            rows.scalars[i] = empty_scalar_row();
            rows.vectors[i] = empty_vector_row();
        }
        self.n_bullets = live;

        let removed = n - live;
        if removed > 0 {
            debug!(collided, expired, live, "bullets despawned");
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;
    use terminator_core::constants::NONE_FLAG;
    use terminator_core::types::ScalarRow;

    fn pool(capacity: usize, lifetime: u32) -> (BulletPool, Vec<ScalarRow>, Vec<VectorRow>) {
        let config = BulletConfig {
            speed: 100.0,
            lifetime,
            coll_radius: 1.0,
        };
        (
            BulletPool::new(capacity, &config),
            vec![empty_scalar_row(); capacity],
            vec![empty_vector_row(); capacity],
        )
    }

    fn shot(x: f64) -> VectorRow {
        let mut v = empty_vector_row();
        v[vector::POSITION] = DVec2::new(x, 0.0);
        v[vector::VELOCITY] = DVec2::new(10.0, 0.0);
        v
    }

    #[test]
    fn spawn_front_packs_newest_first() {
        let (mut pool, mut s, mut v) = pool(8, 60);
        let mut rows = RowsMut {
            scalars: &mut s,
            vectors: &mut v,
        };
        pool.spawn(&mut rows, &[shot(1.0)]).unwrap();
        pool.spawn(&mut rows, &[shot(2.0), shot(3.0)]).unwrap();

        assert_eq!(pool.len(), 3);
        let xs: Vec<f64> = rows.vectors[..3].iter().map(|v| v[vector::POSITION].x).collect();
        assert_eq!(xs, vec![2.0, 3.0, 1.0]);
        for row in &rows.scalars[..3] {
            assert_eq!(row[scalar::ENTITY_TYPE], 2.0);
            assert_eq!(row[scalar::COLLISION_FLAG], NONE_FLAG);
            assert_eq!(row[scalar::COLLISION_RADIUS], 1.0);
        }
        assert_eq!(rows.scalars[3][scalar::ENTITY_TYPE], NONE_FLAG);
    }

    #[test]
    fn spawn_over_capacity_is_rejected_untouched() {
        let (mut pool, mut s, mut v) = pool(2, 60);
        let mut rows = RowsMut {
            scalars: &mut s,
            vectors: &mut v,
        };
        pool.spawn(&mut rows, &[shot(1.0)]).unwrap();
        let err = pool.spawn(&mut rows, &[shot(2.0), shot(3.0)]).unwrap_err();
        assert_eq!(
            err,
            EntityError::BulletCapacity {
                requested: 2,
                available: 1
            }
        );
        assert_eq!(pool.len(), 1);
        assert_eq!(rows.vectors[0][vector::POSITION].x, 1.0);
    }

    #[test]
    fn tick_moves_only_live_rows() {
        let (mut pool, mut s, mut v) = pool(4, 60);
        v[3][vector::VELOCITY] = DVec2::new(5.0, 5.0);
        let mut rows = RowsMut {
            scalars: &mut s,
            vectors: &mut v,
        };
        pool.spawn(&mut rows, &[shot(0.0)]).unwrap();
        pool.tick(&mut rows, 0.5);
        assert_eq!(rows.vectors[0][vector::POSITION], DVec2::new(5.0, 0.0));
        assert_eq!(rows.vectors[3][vector::POSITION], DVec2::ZERO);
    }

    #[test]
    fn despawn_expires_oldest_from_tail() {
        let (mut pool, mut s, mut v) = pool(4, 2);
        let mut rows = RowsMut {
            scalars: &mut s,
            vectors: &mut v,
        };
        pool.spawn(&mut rows, &[shot(1.0)]).unwrap();
        assert_eq!(pool.despawn(&mut rows), 0);
        pool.spawn(&mut rows, &[shot(2.0)]).unwrap();
        assert_eq!(pool.despawn(&mut rows), 0);
        // Oldest bullet is now 3 ticks old.
        assert_eq!(pool.despawn(&mut rows), 1);

        assert_eq!(pool.len(), 1);
        assert_eq!(rows.vectors[0][vector::POSITION].x, 2.0);
        assert_eq!(rows.scalars[1][scalar::ENTITY_TYPE], NONE_FLAG);
    }

    #[test]
    fn despawn_compacts_collided_bullets() {
        let (mut pool, mut s, mut v) = pool(4, 60);
        let mut rows = RowsMut {
            scalars: &mut s,
            vectors: &mut v,
        };
        pool.spawn(&mut rows, &[shot(1.0), shot(2.0), shot(3.0)]).unwrap();
        rows.scalars[1][scalar::COLLISION_FLAG] = 2.0;

        assert_eq!(pool.despawn(&mut rows), 1);
        assert_eq!(pool.len(), 2);
        assert_eq!(rows.vectors[0][vector::POSITION].x, 1.0);
        assert_eq!(rows.vectors[1][vector::POSITION].x, 3.0);
        assert_eq!(rows.scalars[2][scalar::ENTITY_TYPE], NONE_FLAG);
        assert_eq!(rows.scalars[2][scalar::COLLISION_FLAG], NONE_FLAG);
    }
}

//! All-pairs collision detection over the alive set.
//!
//! O(n²) in the number of alive entities, which stays in the low hundreds.
//! Every flag is decided from the same post-physics snapshot before any is
//! written, so the relation is symmetric.

use glam::DVec2;
use tracing::trace;

use terminator_core::enums::{CollisionCause, EntityType};
use terminator_core::types::{scalar, vector, Boundaries, ScalarRow, VectorRow};

use crate::store::is_alive;

/// Outcome of one detection pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionReport {
    /// Rows that were alive going in.
    pub checked: usize,
    /// Rows flagged this pass.
    pub collided: usize,
}

/// Detector with scratch buffers reused across ticks.
#[derive(Debug, Default)]
pub struct CollisionDetector {
    alive: Vec<usize>,
    positions: Vec<DVec2>,
    radii: Vec<f64>,
    kinds: Vec<EntityType>,
    causes: Vec<Option<CollisionCause>>,
}

impl CollisionDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flag every alive row that overlaps another alive row or touches the
    /// boundaries. The flag records the type of the lowest-indexed overlapping
    /// row, or the boundary when nothing overlaps.
    pub fn run(
        &mut self,
        scalars: &mut [ScalarRow],
        vectors: &[VectorRow],
        boundaries: &Boundaries,
    ) -> CollisionReport {
        self.alive.clear();
        self.positions.clear();
        self.radii.clear();
        self.kinds.clear();
        self.causes.clear();

        for (row, s) in scalars.iter().enumerate() {
            if is_alive(s) {
                self.alive.push(row);
                self.positions.push(vectors[row][vector::POSITION]);
                self.radii.push(s[scalar::COLLISION_RADIUS]);
                self.kinds
                    .push(EntityType::from_scalar(s[scalar::ENTITY_TYPE]).unwrap_or(EntityType::Empty));
                self.causes.push(None);
            }
        }

        let n = self.alive.len();
        for i in 0..n {
            for j in (i + 1)..n {
                let dist_sq = self.positions[i].distance_squared(self.positions[j]);
                let reach = self.radii[i] + self.radii[j];
                if dist_sq < reach * reach {
                    // Outer loop ascends, so the first cause stored is the lowest index.
                    if self.causes[i].is_none() {
                        self.causes[i] = Some(CollisionCause::Entity(self.kinds[j]));
                    }
                    if self.causes[j].is_none() {
                        self.causes[j] = Some(CollisionCause::Entity(self.kinds[i]));
                    }
                }
            }
        }

        let mut collided = 0;
        for k in 0..n {
            let cause = self.causes[k].or_else(|| {
                boundaries
                    .is_violated_by(self.positions[k])
                    .then_some(CollisionCause::Boundary)
            });
            if let Some(cause) = cause {
                scalars[self.alive[k]][scalar::COLLISION_FLAG] = cause.encode();
                collided += 1;
            }
        }

        if collided > 0 {
            trace!(checked = n, collided, "collisions detected");
        }
        CollisionReport {
            checked: n,
            collided,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use terminator_core::constants::NONE_FLAG;
    use terminator_core::types::{empty_scalar_row, empty_vector_row};

    fn entity(kind: EntityType, x: f64, y: f64, r: f64) -> (ScalarRow, VectorRow) {
        let mut s = empty_scalar_row();
        s[scalar::ENTITY_TYPE] = kind.as_scalar();
        s[scalar::COLLISION_RADIUS] = r;
        let mut v = empty_vector_row();
        v[vector::POSITION] = DVec2::new(x, y);
        (s, v)
    }

    fn detect(rows: Vec<(ScalarRow, VectorRow)>) -> (Vec<f64>, CollisionReport) {
        let (mut s, v): (Vec<_>, Vec<_>) = rows.into_iter().unzip();
        let report = CollisionDetector::new().run(&mut s, &v, &Boundaries::default());
        (s.iter().map(|r| r[scalar::COLLISION_FLAG]).collect(), report)
    }

    #[test]
    fn overlap_flags_both_with_partner_type() {
        let (flags, report) = detect(vec![
            entity(EntityType::Airplane, 100.0, 100.0, 10.0),
            entity(EntityType::Target, 115.0, 100.0, 10.0),
            entity(EntityType::Target, 500.0, 500.0, 10.0),
        ]);
        assert_eq!(flags, vec![2.0, 1.0, NONE_FLAG]);
        assert_eq!(report, CollisionReport { checked: 3, collided: 2 });
    }

    #[test]
    fn touching_circles_do_not_collide() {
        let (flags, _) = detect(vec![
            entity(EntityType::Airplane, 100.0, 100.0, 5.0),
            entity(EntityType::Airplane, 110.0, 100.0, 5.0),
        ]);
        assert_eq!(flags, vec![NONE_FLAG, NONE_FLAG]);
    }

    #[test]
    fn lowest_index_partner_wins() {
        let (flags, _) = detect(vec![
            entity(EntityType::Target, 100.0, 100.0, 10.0),
            entity(EntityType::Bullet, 105.0, 100.0, 10.0),
            entity(EntityType::Airplane, 110.0, 100.0, 10.0),
        ]);
        assert_eq!(flags[2], CollisionCause::Entity(EntityType::Target).encode());
        assert_eq!(flags[1], CollisionCause::Entity(EntityType::Target).encode());
        assert_eq!(flags[0], CollisionCause::Entity(EntityType::Bullet).encode());
    }

    #[test]
    fn boundary_edges_are_inclusive() {
        let (flags, _) = detect(vec![
            entity(EntityType::Airplane, 1280.0, 300.0, 1.0),
            entity(EntityType::Airplane, 1279.999, 400.0, 1.0),
            entity(EntityType::Airplane, 300.0, 0.0, 1.0),
        ]);
        assert_eq!(flags, vec![4.0, NONE_FLAG, 4.0]);
    }

    #[test]
    fn dead_and_empty_rows_are_ignored() {
        let mut dead = entity(EntityType::Airplane, 100.0, 100.0, 10.0);
        dead.0[scalar::COLLISION_FLAG] = 3.0;
        let empty = (empty_scalar_row(), empty_vector_row());
        let (flags, report) = detect(vec![
            dead,
            entity(EntityType::Target, 105.0, 100.0, 10.0),
            empty,
        ]);
        assert_eq!(flags, vec![3.0, NONE_FLAG, NONE_FLAG]);
        assert_eq!(report.checked, 1);
    }
}

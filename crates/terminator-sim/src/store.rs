//! Fixed-capacity structure-of-arrays entity store.
//!
//! Two parallel matrices share one row index per entity. Rows are partitioned
//! by kind once at construction: `[0, n_planes)` airplanes,
//! `[n_planes, n_planes + n_targets)` targets, and the remainder reserved for
//! bullets. The partition and capacity never change afterwards.

use std::ops::Range;

use glam::DVec2;

use terminator_core::constants::NONE_FLAG;
use terminator_core::enums::EntityType;
use terminator_core::error::EntityError;
use terminator_core::types::{empty_scalar_row, empty_vector_row, scalar, vector, ScalarRow, VectorRow};

/// Row ranges assigned to each entity kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partition {
    pub n_planes: usize,
    pub n_targets: usize,
    pub capacity: usize,
}

impl Partition {
    pub fn planes(&self) -> Range<usize> {
        0..self.n_planes
    }

    pub fn targets(&self) -> Range<usize> {
        self.n_planes..self.bullet_start()
    }

    /// The whole reserved bullet range, live or not.
    pub fn bullets(&self) -> Range<usize> {
        self.bullet_start()..self.capacity
    }

    pub fn bullet_start(&self) -> usize {
        self.n_planes + self.n_targets
    }

    pub fn bullet_capacity(&self) -> usize {
        self.capacity - self.bullet_start()
    }
}

/// Read-only view of a contiguous row range.
#[derive(Debug, Clone, Copy)]
pub struct Rows<'a> {
    pub scalars: &'a [ScalarRow],
    pub vectors: &'a [VectorRow],
}

/// Mutable view of a contiguous row range. Views handed to subsystems never
/// overlap, so each subsystem can only touch its own rows.
#[derive(Debug)]
pub struct RowsMut<'a> {
    pub scalars: &'a mut [ScalarRow],
    pub vectors: &'a mut [VectorRow],
}

impl<'a> Rows<'a> {
    pub fn len(&self) -> usize {
        self.scalars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scalars.is_empty()
    }

    pub fn position(&self, i: usize) -> DVec2 {
        self.vectors[i][vector::POSITION]
    }

    pub fn velocity(&self, i: usize) -> DVec2 {
        self.vectors[i][vector::VELOCITY]
    }

    pub fn collision_flag(&self, i: usize) -> f64 {
        self.scalars[i][scalar::COLLISION_FLAG]
    }

    /// Occupied and not yet collided.
    pub fn is_alive(&self, i: usize) -> bool {
        is_alive(&self.scalars[i])
    }

    pub fn entity_type(&self, i: usize) -> Option<EntityType> {
        EntityType::from_scalar(self.scalars[i][scalar::ENTITY_TYPE])
    }
}

impl RowsMut<'_> {
    pub fn len(&self) -> usize {
        self.scalars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scalars.is_empty()
    }

    pub fn as_rows(&self) -> Rows<'_> {
        Rows {
            scalars: self.scalars,
            vectors: self.vectors,
        }
    }
}

/// True when the row is occupied and its collision flag still reads alive.
pub fn is_alive(row: &ScalarRow) -> bool {
    row[scalar::ENTITY_TYPE] != NONE_FLAG && row[scalar::COLLISION_FLAG] == NONE_FLAG
}

/// Disjoint mutable views over the three partitions.
pub struct PartitionsMut<'a> {
    pub planes: RowsMut<'a>,
    pub targets: RowsMut<'a>,
    pub bullets: RowsMut<'a>,
}

/// Owner of the backing matrices.
#[derive(Debug, Clone)]
pub struct EntityStore {
    scalars: Vec<ScalarRow>,
    vectors: Vec<VectorRow>,
    partition: Partition,
}

impl EntityStore {
    /// Allocate `capacity` empty rows and copy the seed rows into the front.
    ///
    /// Seed rows must list every airplane before every target, and nothing
    /// else. Fails rather than truncating when the seeds do not fit.
    pub fn new(
        seed_scalars: &[ScalarRow],
        seed_vectors: &[VectorRow],
        capacity: usize,
    ) -> Result<Self, EntityError> {
        if seed_scalars.len() != seed_vectors.len() {
            return Err(EntityError::RowCountMismatch {
                scalars: seed_scalars.len(),
                vectors: seed_vectors.len(),
            });
        }
        if seed_scalars.len() > capacity {
            return Err(EntityError::TooManyEntities {
                requested: seed_scalars.len(),
                capacity,
            });
        }

        let mut n_planes = 0;
        let mut n_targets = 0;
        for (row, s) in seed_scalars.iter().enumerate() {
            let value = s[scalar::ENTITY_TYPE];
            match EntityType::from_scalar(value) {
                Some(EntityType::Airplane) if n_targets > 0 => {
                    return Err(EntityError::UnorderedSeedRows { row });
                }
                Some(EntityType::Airplane) => n_planes += 1,
                Some(EntityType::Target) => n_targets += 1,
                _ => return Err(EntityError::UnexpectedEntityType { row, value }),
            }
        }

        let mut scalars = vec![empty_scalar_row(); capacity];
        let mut vectors = vec![empty_vector_row(); capacity];
        scalars[..seed_scalars.len()].copy_from_slice(seed_scalars);
        vectors[..seed_vectors.len()].copy_from_slice(seed_vectors);

        Ok(Self {
            scalars,
            vectors,
            partition: Partition {
                n_planes,
                n_targets,
                capacity,
            },
        })
    }

    pub fn partition(&self) -> Partition {
        self.partition
    }

    pub fn capacity(&self) -> usize {
        self.partition.capacity
    }

    pub fn scalars(&self) -> &[ScalarRow] {
        &self.scalars
    }

    pub fn vectors(&self) -> &[VectorRow] {
        &self.vectors
    }

    /// Read-only view of an arbitrary row range.
    pub fn rows(&self, range: Range<usize>) -> Rows<'_> {
        Rows {
            scalars: &self.scalars[range.clone()],
            vectors: &self.vectors[range],
        }
    }

    /// Whole-store mutable view, for passes that span every partition.
    pub fn all_mut(&mut self) -> RowsMut<'_> {
        RowsMut {
            scalars: &mut self.scalars,
            vectors: &mut self.vectors,
        }
    }

    /// Split the matrices into the three per-kind views.
    pub fn partitions_mut(&mut self) -> PartitionsMut<'_> {
        let p = self.partition;
        let (plane_s, rest_s) = self.scalars.split_at_mut(p.n_planes);
        let (target_s, bullet_s) = rest_s.split_at_mut(p.n_targets);
        let (plane_v, rest_v) = self.vectors.split_at_mut(p.n_planes);
        let (target_v, bullet_v) = rest_v.split_at_mut(p.n_targets);
        PartitionsMut {
            planes: RowsMut {
                scalars: plane_s,
                vectors: plane_v,
            },
            targets: RowsMut {
                scalars: target_s,
                vectors: target_v,
            },
            bullets: RowsMut {
                scalars: bullet_s,
                vectors: bullet_v,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use terminator_core::config::{PlaneConfig, TargetConfig};

    fn seeds(planes: usize, targets: usize) -> (Vec<ScalarRow>, Vec<VectorRow>) {
        let plane = PlaneConfig::default().seed_rows(DVec2::ZERO, 0.0);
        let target = TargetConfig::default().seed_rows(DVec2::ZERO);
        let rows: Vec<_> = std::iter::repeat(plane)
            .take(planes)
            .chain(std::iter::repeat(target).take(targets))
            .collect();
        rows.into_iter().unzip()
    }

    #[test]
    fn construction_partitions_rows() {
        let (s, v) = seeds(2, 3);
        let store = EntityStore::new(&s, &v, 20).unwrap();
        let p = store.partition();

        assert_eq!(p.planes(), 0..2);
        assert_eq!(p.targets(), 2..5);
        assert_eq!(p.bullets(), 5..20);
        assert_eq!(p.bullet_capacity(), 15);
        assert_eq!(store.scalars().len(), 20);
        assert_eq!(store.vectors().len(), 20);

        for row in &store.scalars()[5..] {
            assert_eq!(row[scalar::ENTITY_TYPE], -1.0);
            assert_eq!(row[scalar::COLLISION_FLAG], -1.0);
        }
    }

    #[test]
    fn construction_rejects_overflow() {
        let (s, v) = seeds(3, 2);
        let err = EntityStore::new(&s, &v, 4).unwrap_err();
        assert_eq!(
            err,
            EntityError::TooManyEntities {
                requested: 5,
                capacity: 4
            }
        );
    }

    #[test]
    fn construction_rejects_unordered_or_foreign_rows() {
        let (mut s, v) = seeds(1, 1);
        s.swap(0, 1);
        let mut v = v;
        v.swap(0, 1);
        assert_eq!(
            EntityStore::new(&s, &v, 10).unwrap_err(),
            EntityError::UnorderedSeedRows { row: 1 }
        );

        let (mut s, v) = seeds(1, 0);
        s[0][scalar::ENTITY_TYPE] = EntityType::Bullet.as_scalar();
        assert!(matches!(
            EntityStore::new(&s, &v, 10),
            Err(EntityError::UnexpectedEntityType { row: 0, .. })
        ));
    }

    #[test]
    fn partitions_are_disjoint_views() {
        let (s, v) = seeds(1, 2);
        let mut store = EntityStore::new(&s, &v, 8).unwrap();
        let parts = store.partitions_mut();
        assert_eq!(parts.planes.len(), 1);
        assert_eq!(parts.targets.len(), 2);
        assert_eq!(parts.bullets.len(), 5);
        assert!(parts.bullets.as_rows().entity_type(0) == Some(EntityType::Empty));
    }
}

//! Entities orchestrator: owns the store and drives every system in order.
//!
//! One `tick` runs, in this order: airplane kinematics then actions, bullet
//! integration, collision detection, firing, and bullet despawn. Collision
//! always sees the positions produced by this tick's physics.

use tracing::{debug, warn};

use terminator_core::config::BulletConfig;
use terminator_core::constants::BULLET_SPAWN_CLEARANCE;
use terminator_core::enums::Action;
use terminator_core::error::EntityError;
use terminator_core::types::{empty_vector_row, scalar, vector, Boundaries, ScalarRow, VectorRow};

use crate::store::{is_alive, EntityStore, Partition, Rows};
use crate::systems;
use crate::systems::bullets::BulletPool;
use crate::systems::collision::{CollisionDetector, CollisionReport};

/// The simulation core. Exclusively owns the entity matrices for one episode.
pub struct Entities {
    store: EntityStore,
    boundaries: Boundaries,
    bullets: BulletPool,
    collision: CollisionDetector,
    last_collision: CollisionReport,
    bullets_despawned: u64,
    tick: u64,
    spawn_buffer: Vec<VectorRow>,
}

impl Entities {
    /// Build the store from airplane and target seed rows.
    ///
    /// Fails when the seeds exceed `capacity`, when the two matrices disagree
    /// in length, or when the rows are not airplanes followed by targets.
    pub fn new(
        seed_scalars: &[ScalarRow],
        seed_vectors: &[VectorRow],
        capacity: usize,
        boundaries: Boundaries,
        bullet: &BulletConfig,
    ) -> Result<Self, EntityError> {
        let mut store = EntityStore::new(seed_scalars, seed_vectors, capacity)?;
        let partition = store.partition();
        systems::airplanes::init(&mut store.partitions_mut().planes);

        debug!(
            planes = partition.n_planes,
            targets = partition.n_targets,
            bullet_rows = partition.bullet_capacity(),
            "entity store created"
        );

        Ok(Self {
            store,
            boundaries,
            bullets: BulletPool::new(partition.bullet_capacity(), bullet),
            collision: CollisionDetector::new(),
            last_collision: CollisionReport::default(),
            bullets_despawned: 0,
            tick: 0,
            spawn_buffer: Vec::new(),
        })
    }

    /// Advance the simulation by `dt` seconds.
    ///
    /// `actions` pairs airplane rows with their control input. Every row is
    /// checked before any state changes. A bullet capacity failure midway
    /// leaves the episode unusable; callers should discard it.
    pub fn tick(&mut self, dt: f64, actions: &[(usize, Action)]) -> Result<(), EntityError> {
        let n_planes = self.store.partition().n_planes;
        if let Some(&(row, _)) = actions.iter().find(|(row, _)| *row >= n_planes) {
            return Err(EntityError::NotAnAirplane { row });
        }

        {
            let mut parts = self.store.partitions_mut();
            systems::airplanes::run(&mut parts.planes, dt);
            systems::airplanes::apply_actions(&mut parts.planes, dt, actions);
            self.bullets.tick(&mut parts.bullets, dt);
            systems::targets::run(&mut parts.targets, dt);
        }

        self.entity_collision();

        self.fire(
            actions
                .iter()
                .filter(|(_, action)| *action == Action::Fire)
                .map(|&(row, _)| row),
        )?;

        self.despawn_bullets();
        self.tick += 1;
        Ok(())
    }

    /// Age the live bullets and remove collided or expired ones. Returns the
    /// number removed; the running total is kept in `bullets_despawned`.
    pub fn despawn_bullets(&mut self) -> usize {
        let removed = self.bullets.despawn(&mut self.store.partitions_mut().bullets);
        self.bullets_despawned += removed as u64;
        removed
    }

    /// Run collision detection over every alive row.
    pub fn entity_collision(&mut self) -> CollisionReport {
        let rows = self.store.all_mut();
        self.last_collision = self.collision.run(rows.scalars, rows.vectors, &self.boundaries);
        self.last_collision
    }

    /// Spawn one bullet ahead of each listed airplane. Collided airplanes are
    /// skipped.
    pub fn spawn_bullets(&mut self, shooters: &[usize]) -> Result<(), EntityError> {
        self.fire(shooters.iter().copied())
    }

    fn fire(&mut self, shooters: impl IntoIterator<Item = usize>) -> Result<(), EntityError> {
        let n_planes = self.store.partition().n_planes;
        let clearance = self.bullets.radius() + BULLET_SPAWN_CLEARANCE;
        let muzzle_speed = self.bullets.muzzle_speed();

        self.spawn_buffer.clear();
        for row in shooters {
            if row >= n_planes {
                return Err(EntityError::NotAnAirplane { row });
            }
            let s = &self.store.scalars()[row];
            if !is_alive(s) {
                continue;
            }
            let v = &self.store.vectors()[row];
            let heading = v[vector::VELOCITY_UNIT];

            let mut bullet = empty_vector_row();
            bullet[vector::POSITION] =
                v[vector::POSITION] + heading * (s[scalar::COLLISION_RADIUS] + clearance);
            bullet[vector::VELOCITY] = v[vector::VELOCITY] + heading * muzzle_speed;
            self.spawn_buffer.push(bullet);
        }

        let result = self
            .bullets
            .spawn(&mut self.store.partitions_mut().bullets, &self.spawn_buffer);
        if let Err(err) = &result {
            warn!(error = %err, "bullet pool exhausted");
        }
        result
    }

    pub fn airplanes(&self) -> Rows<'_> {
        self.store.rows(self.partition().planes())
    }

    pub fn targets(&self) -> Rows<'_> {
        self.store.rows(self.partition().targets())
    }

    /// The live bullets only.
    pub fn bullets(&self) -> Rows<'_> {
        let start = self.partition().bullet_start();
        self.store.rows(start..start + self.bullets.len())
    }

    pub fn scalars(&self) -> &[ScalarRow] {
        self.store.scalars()
    }

    pub fn vectors(&self) -> &[VectorRow] {
        self.store.vectors()
    }

    pub fn partition(&self) -> Partition {
        self.store.partition()
    }

    pub fn boundaries(&self) -> &Boundaries {
        &self.boundaries
    }

    pub fn n_planes(&self) -> usize {
        self.partition().n_planes
    }

    pub fn n_targets(&self) -> usize {
        self.partition().n_targets
    }

    pub fn n_bullets(&self) -> usize {
        self.bullets.len()
    }

    pub fn bullet_pool(&self) -> &BulletPool {
        &self.bullets
    }

    /// Occupied rows: airplanes, targets, and live bullets.
    pub fn live_count(&self) -> usize {
        self.n_planes() + self.n_targets() + self.bullets.len()
    }

    /// Bullets removed since construction, collided or expired.
    pub fn bullets_despawned(&self) -> u64 {
        self.bullets_despawned
    }

    /// Ticks completed since construction.
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn last_collision(&self) -> CollisionReport {
        self.last_collision
    }
}

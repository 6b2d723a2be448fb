//! The chase environment: one airplane, one target.

use std::path::{Path, PathBuf};

use glam::DVec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use terminator_core::config::{BulletConfig, EnvironmentConfig, PlaneConfig, TargetConfig};
use terminator_core::constants::DT;
use terminator_core::enums::{Action, CollisionCause};
use terminator_core::error::{ConfigError, ValidationErrors};
use terminator_core::types::vector;
use terminator_sim::Entities;

use crate::error::EnvError;
use crate::history::{History, StepRecord};
use crate::spawn;

/// `[x, y, vx, vy]` of the agent's airplane.
pub type Observation = [f64; 4];

/// Heading penalty scale: reward is `-HEADING_WEIGHT * |v_uv - to_target_uv|`.
pub const HEADING_WEIGHT: f64 = 50.0;
pub const TERMINATED_BONUS: f64 = 200.0;
pub const TRUNCATED_PENALTY: f64 = 1000.0;
/// Charged on every shot so the agent does not fire blindly.
pub const FIRE_PENALTY: f64 = 50.0;

/// Outcome of one [`Env::step`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepResult {
    pub observation: Observation,
    pub reward: f64,
    /// Every target destroyed.
    pub terminated: bool,
    /// Every airplane crashed.
    pub truncated: bool,
}

impl StepResult {
    pub fn is_done(&self) -> bool {
        self.terminated || self.truncated
    }
}

pub struct Env {
    plane: PlaneConfig,
    target: TargetConfig,
    env: EnvironmentConfig,
    rng: ChaCha8Rng,
    entities: Entities,
    episode: u32,
    history: History,
}

impl Env {
    /// Validate the configs and build the first episode.
    ///
    /// With `seed` set, spawn deviation is reproducible; otherwise the RNG is
    /// seeded from the OS.
    pub fn new(
        plane: PlaneConfig,
        target: TargetConfig,
        env: EnvironmentConfig,
        seed: Option<u64>,
    ) -> Result<Self, EnvError> {
        check("plane", plane.validate())?;
        check("target", target.validate())?;
        check("environment", env.validate())?;

        let mut rng = make_rng(seed);
        let entities = build_entities(&mut rng, &plane, &target, &env)?;
        info!(?seed, max_entities = env.max_entities, "environment created");

        Ok(Self {
            plane,
            target,
            env,
            rng,
            entities,
            episode: 0,
            history: History::new(),
        })
    }

    /// Apply `action` to the agent, advance one tick, and score the result.
    pub fn step(&mut self, action: Action) -> Result<StepResult, EnvError> {
        self.entities.tick(DT, &[(0, action)])?;

        let observation = self.observation();
        let terminated = self.terminated();
        let truncated = self.truncated();

        let mut reward = self.heading_reward();
        if terminated {
            reward += TERMINATED_BONUS;
        }
        if truncated {
            reward -= TRUNCATED_PENALTY;
        }
        if action == Action::Fire {
            reward -= FIRE_PENALTY;
        }

        let result = StepResult {
            observation,
            reward,
            terminated,
            truncated,
        };
        self.history.record(
            self.episode,
            StepRecord {
                action: action.code(),
                observation,
                reward,
                terminated,
                truncated,
            },
        );
        if result.is_done() {
            debug!(
                episode = self.episode,
                terminated,
                truncated,
                crash = ?self.crash_cause(),
                "episode ended"
            );
        }
        Ok(result)
    }

    /// Discard the current episode and spawn a fresh one. A `seed` reseeds the
    /// spawn RNG first.
    pub fn reset(&mut self, seed: Option<u64>) -> Result<Observation, EnvError> {
        if let Some(seed) = seed {
            self.rng = ChaCha8Rng::seed_from_u64(seed);
        }
        self.entities = build_entities(&mut self.rng, &self.plane, &self.target, &self.env)?;
        self.episode += 1;
        self.history.open_page(self.episode);
        info!(episode = self.episode, "environment reset");
        Ok(self.observation())
    }

    /// Finish the run. With `output_dir`, the step history is written below it
    /// and the file path returned.
    pub fn close(self, output_dir: Option<&Path>) -> Result<Option<PathBuf>, EnvError> {
        info!(
            episodes = self.episode + 1,
            steps = self.history.total_steps(),
            "environment closed"
        );
        output_dir.map(|dir| self.history.save(dir)).transpose()
    }

    pub fn observation(&self) -> Observation {
        let v = self.entities.airplanes().vectors[0];
        let pos = v[vector::POSITION];
        let vel = v[vector::VELOCITY];
        [pos.x, pos.y, vel.x, vel.y]
    }

    pub fn terminated(&self) -> bool {
        let targets = self.entities.targets();
        (0..targets.len()).all(|i| !targets.is_alive(i))
    }

    pub fn truncated(&self) -> bool {
        let planes = self.entities.airplanes();
        (0..planes.len()).all(|i| !planes.is_alive(i))
    }

    /// What brought the agent's airplane down, or `None` while it flies.
    pub fn crash_cause(&self) -> Option<CollisionCause> {
        let flag = self.entities.airplanes().collision_flag(0);
        CollisionCause::decode(flag).filter(|cause| !cause.is_alive())
    }

    /// Penalty for flying away from the target: zero when heading straight at
    /// it, `-2 * HEADING_WEIGHT` when heading directly away.
    fn heading_reward(&self) -> f64 {
        let plane = self.entities.airplanes().vectors[0];
        let target = self.entities.targets().vectors[0];
        let to_target = (target[vector::POSITION] - plane[vector::POSITION])
            .try_normalize()
            .unwrap_or(DVec2::ZERO);
        let heading = plane[vector::VELOCITY]
            .try_normalize()
            .unwrap_or(plane[vector::VELOCITY_UNIT]);
        -HEADING_WEIGHT * (heading - to_target).length()
    }

    pub fn entities(&self) -> &Entities {
        &self.entities
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn episode(&self) -> u32 {
        self.episode
    }

    pub fn bullet_config(&self) -> &BulletConfig {
        &self.plane.bullet_config
    }
}

fn check(kind: &'static str, result: Result<(), ValidationErrors>) -> Result<(), EnvError> {
    result.map_err(|errors| EnvError::Config(ConfigError::Invalid { kind, errors }))
}

fn make_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    }
}

fn build_entities(
    rng: &mut ChaCha8Rng,
    plane: &PlaneConfig,
    target: &TargetConfig,
    env: &EnvironmentConfig,
) -> Result<Entities, EnvError> {
    let (scalars, vectors) = spawn::seed_rows(rng, plane, target);
    let entities = Entities::new(
        &scalars,
        &vectors,
        env.max_entities,
        env.boundaries(),
        &plane.bullet_config,
    )?;
    Ok(entities)
}

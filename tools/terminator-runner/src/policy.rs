//! Scripted policies for driving the environment without a trained agent.

use clap::ValueEnum;
use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use terminator_core::enums::Action;
use terminator_core::types::{scalar, vector};
use terminator_env::Env;

/// A controller that picks one action per step.
pub trait Policy {
    fn name(&self) -> &str;
    fn act(&mut self, env: &Env) -> Action;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PolicyKind {
    /// Never touches the controls.
    Noop,
    /// Uniformly random action every step.
    Random,
    /// Turns toward the target and fires when lined up.
    Chase,
}

pub fn resolve(kind: PolicyKind, seed: u64) -> Box<dyn Policy> {
    match kind {
        PolicyKind::Noop => Box::new(NoopPolicy),
        PolicyKind::Random => Box::new(RandomPolicy::new(seed)),
        PolicyKind::Chase => Box::new(ChasePolicy::new()),
    }
}

pub struct NoopPolicy;

impl Policy for NoopPolicy {
    fn name(&self) -> &str {
        "noop"
    }

    fn act(&mut self, _env: &Env) -> Action {
        Action::Noop
    }
}

pub struct RandomPolicy {
    rng: ChaCha8Rng,
}

impl RandomPolicy {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl Policy for RandomPolicy {
    fn name(&self) -> &str {
        "random"
    }

    fn act(&mut self, _env: &Env) -> Action {
        Action::ALL[self.rng.gen_range(0..Action::ALL.len())]
    }
}

/// Nose within this many degrees of the target counts as lined up.
const AIM_TOLERANCE_DEG: f64 = 3.0;
/// Ticks between shots. Shots closer together collide with each other.
const FIRE_INTERVAL: u32 = 10;
const CRUISE_THROTTLE: f64 = 80.0;

pub struct ChasePolicy {
    cooldown: u32,
}

impl ChasePolicy {
    pub fn new() -> Self {
        Self { cooldown: 0 }
    }
}

impl Default for ChasePolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl Policy for ChasePolicy {
    fn name(&self) -> &str {
        "chase"
    }

    fn act(&mut self, env: &Env) -> Action {
        self.cooldown = self.cooldown.saturating_sub(1);

        let entities = env.entities();
        let plane = entities.airplanes();
        let targets = entities.targets();
        let (s, v) = (&plane.scalars[0], &plane.vectors[0]);

        let nose = v[vector::PITCH_UNIT];
        let Some(to_target) = (targets.position(0) - v[vector::POSITION]).try_normalize() else {
            return Action::Noop;
        };
        let off = signed_angle_deg(nose, to_target);

        if off.abs() <= AIM_TOLERANCE_DEG {
            if self.cooldown == 0 && targets.is_alive(0) {
                self.cooldown = FIRE_INTERVAL;
                return Action::Fire;
            }
            if s[scalar::THROTTLE] < CRUISE_THROTTLE {
                return Action::ThrottleUp;
            }
            return Action::Noop;
        }
        if off > 0.0 {
            Action::PitchUp
        } else {
            Action::PitchDown
        }
    }
}

/// Angle in degrees from `from` to `to`, positive counter-clockwise on
/// screen (y down), matching the pitch convention.
fn signed_angle_deg(from: DVec2, to: DVec2) -> f64 {
    let cross = from.x * to.y - from.y * to.x;
    let dot = from.dot(to);
    -cross.atan2(dot).to_degrees()
}

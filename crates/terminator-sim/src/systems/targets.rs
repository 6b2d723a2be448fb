//! Targets are passive: they never move and only take part in collision.

use crate::store::RowsMut;

/// No-op tick, kept so the orchestrator drives every partition uniformly.
pub fn run(_rows: &mut RowsMut<'_>, _dt: f64) {}

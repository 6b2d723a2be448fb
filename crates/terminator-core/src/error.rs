//! Error types shared across the workspace.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejected raw action code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("unknown action code {0} (expected 0..=5)")]
    UnknownCode(u8),
}

/// Violations of the entity store partition. These are caller defects:
/// the store cannot continue with a corrupted partition.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EntityError {
    #[error("{requested} seed rows exceed store capacity of {capacity}")]
    TooManyEntities { requested: usize, capacity: usize },
    #[error("seed matrices disagree: {scalars} scalar rows vs {vectors} vector rows")]
    RowCountMismatch { scalars: usize, vectors: usize },
    #[error("seed row {row} has entity type {value}; only airplanes and targets may be seeded")]
    UnexpectedEntityType { row: usize, value: f64 },
    #[error("seed row {row} is an airplane listed after a target")]
    UnorderedSeedRows { row: usize },
    #[error("spawning {requested} bullets needs more than the {available} free bullet rows")]
    BulletCapacity { requested: usize, available: usize },
    #[error("row {row} is not an airplane")]
    NotAnAirplane { row: usize },
}

/// A single failed validation rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Every rule a configuration violated, not just the first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// `Ok(())` when nothing was recorded.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    /// Fold another set of errors in, prefixing their field paths.
    pub fn merge(&mut self, prefix: &str, other: ValidationErrors) {
        for e in other.errors {
            self.push(format!("{prefix}.{}", e.field), e.message);
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} validation error(s)", self.errors.len())?;
        for e in &self.errors {
            write!(f, "; `{}` {}", e.field, e.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Failure to load or accept a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid {kind} config: {errors}")]
    Invalid {
        kind: &'static str,
        errors: ValidationErrors,
    },
}

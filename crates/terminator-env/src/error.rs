//! Environment errors.

use std::path::PathBuf;

use thiserror::Error;

use terminator_core::error::{ConfigError, EntityError};

#[derive(Debug, Error)]
pub enum EnvError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("simulation rejected the episode: {0}")]
    Entity(#[from] EntityError),
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize history: {0}")]
    Serialize(#[from] serde_json::Error),
}

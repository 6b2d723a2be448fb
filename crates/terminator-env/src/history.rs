//! Per-episode step history and its JSON dump.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::env::Observation;
use crate::error::EnvError;

pub const HISTORY_FILE: &str = "observation_history.json";

/// One recorded step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    pub action: u8,
    pub observation: Observation,
    pub reward: f64,
    pub terminated: bool,
    pub truncated: bool,
}

/// Steps grouped by episode number. Episode 0 is the one started by
/// construction; each reset opens the next page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct History {
    pub episodes: BTreeMap<u32, Vec<StepRecord>>,
}

impl History {
    pub fn new() -> Self {
        let mut episodes = BTreeMap::new();
        episodes.insert(0, Vec::new());
        Self { episodes }
    }

    pub fn open_page(&mut self, episode: u32) {
        self.episodes.entry(episode).or_default();
    }

    pub fn record(&mut self, episode: u32, record: StepRecord) {
        self.episodes.entry(episode).or_default().push(record);
    }

    pub fn total_steps(&self) -> usize {
        self.episodes.values().map(Vec::len).sum()
    }

    /// Write the history into `<dir>/<unix seconds>/observation_history.json`.
    /// A dump from the same second gets a `-N` suffix instead of replacing
    /// the earlier one. Returns the file written.
    pub fn save(&self, dir: &Path) -> Result<PathBuf, EnvError> {
        let stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        fs::create_dir_all(dir).map_err(|source| EnvError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let folder = create_run_folder(dir, stamp)?;

        let path = folder.join(HISTORY_FILE);
        let file = File::create(&path).map_err(|source| EnvError::Io {
            path: path.clone(),
            source,
        })?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &self.episodes)?;
        writer.flush().map_err(|source| EnvError::Io {
            path: path.clone(),
            source,
        })?;

        info!(
            path = %path.display(),
            episodes = self.episodes.len(),
            steps = self.total_steps(),
            "history written"
        );
        Ok(path)
    }
}

/// Create a fresh folder named after `stamp`, never reusing an existing one.
fn create_run_folder(dir: &Path, stamp: u64) -> Result<PathBuf, EnvError> {
    let mut attempt = 0u32;
    loop {
        let name = match attempt {
            0 => stamp.to_string(),
            n => format!("{stamp}-{n}"),
        };
        let folder = dir.join(name);
        match fs::create_dir(&folder) {
            Ok(()) => return Ok(folder),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => attempt += 1,
            Err(source) => return Err(EnvError::Io { path: folder, source }),
        }
    }
}

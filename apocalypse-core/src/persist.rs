//! Save/load for game sessions.
//!
//! Saves are pretty-printed JSON with a version number and a small metadata
//! block that can be read without deserializing the whole state.

use crate::world::GameState;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;

/// Errors from persistence operations.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },

    #[error("Saved state is inconsistent: {}", .0.join("; "))]
    InvalidState(Vec<String>),
}

/// Current save file version.
pub const SAVE_VERSION: u32 = 1;

/// A saved game with everything needed to resume play.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedGame {
    /// Save format version for compatibility checking.
    pub version: u32,

    /// When the save was created, in seconds since the Unix epoch.
    pub saved_at: String,

    pub state: GameState,

    pub metadata: SaveMetadata,
}

/// Summary shown in save listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveMetadata {
    pub protagonist_name: String,
    pub location: String,
    pub minutes_remaining: u32,
    pub phase: String,
    pub turn: u32,
    #[serde(default)]
    pub ending: Option<String>,
    #[serde(default)]
    pub saved_at: String,
}

impl SavedGame {
    pub fn new(state: GameState) -> Self {
        let saved_at = now_timestamp();
        let metadata = SaveMetadata {
            protagonist_name: state.protagonist_name.clone(),
            location: state.location.name().to_string(),
            minutes_remaining: state.time_remaining(),
            phase: state.clock.phase.name().to_string(),
            turn: state.turn,
            ending: state.ending.map(|e| e.title().to_string()),
            saved_at: saved_at.clone(),
        };

        Self {
            version: SAVE_VERSION,
            saved_at,
            state,
            metadata,
        }
    }

    /// Save to a JSON file, creating parent directories as needed.
    pub async fn save_json(&self, path: impl AsRef<Path>) -> Result<(), PersistError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).await?;
        tracing::info!(path = %path.display(), turn = self.state.turn, "game saved");
        Ok(())
    }

    /// Load from a JSON file and check the state is sound.
    pub async fn load_json(path: impl AsRef<Path>) -> Result<Self, PersistError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).await?;
        let saved: Self = serde_json::from_str(&content)?;

        if saved.version != SAVE_VERSION {
            return Err(PersistError::VersionMismatch {
                expected: SAVE_VERSION,
                found: saved.version,
            });
        }

        let problems = saved.state.validate();
        if !problems.is_empty() {
            tracing::warn!(path = %path.display(), ?problems, "rejecting inconsistent save");
            return Err(PersistError::InvalidState(problems));
        }

        tracing::info!(path = %path.display(), turn = saved.state.turn, "game loaded");
        Ok(saved)
    }

    /// Read a save's metadata without loading the full state.
    pub async fn peek_metadata(path: impl AsRef<Path>) -> Result<SaveMetadata, PersistError> {
        let content = fs::read_to_string(path).await?;

        #[derive(Deserialize)]
        struct Partial {
            version: u32,
            metadata: SaveMetadata,
        }

        let partial: Partial = serde_json::from_str(&content)?;

        if partial.version != SAVE_VERSION {
            return Err(PersistError::VersionMismatch {
                expected: SAVE_VERSION,
                found: partial.version,
            });
        }

        Ok(partial.metadata)
    }
}

/// Information about a save file.
#[derive(Debug, Clone)]
pub struct SaveInfo {
    pub path: PathBuf,
    pub metadata: SaveMetadata,
}

/// List the readable saves in a directory, newest first.
///
/// Files that aren't saves (or are from another version) are skipped.
pub async fn list_saves(dir: impl AsRef<Path>) -> Result<Vec<SaveInfo>, PersistError> {
    let mut saves = Vec::new();
    let mut entries = fs::read_dir(dir).await?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().is_some_and(|e| e == "json") {
            match SavedGame::peek_metadata(&path).await {
                Ok(metadata) => saves.push(SaveInfo { path, metadata }),
                Err(e) => tracing::debug!(path = %path.display(), error = %e, "skipping file"),
            }
        }
    }

    saves.sort_by(|a, b| {
        let a_time = a.metadata.saved_at.parse::<u64>().unwrap_or(0);
        let b_time = b.metadata.saved_at.parse::<u64>().unwrap_or(0);
        b_time.cmp(&a_time).then_with(|| a.path.cmp(&b.path))
    });
    Ok(saves)
}

/// The autosave file for a protagonist.
pub fn auto_save_path(base_dir: impl AsRef<Path>, protagonist_name: &str) -> PathBuf {
    let sanitized = protagonist_name
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect::<String>();
    base_dir.as_ref().join(format!("{sanitized}_autosave.json"))
}

/// Current time as seconds since the Unix epoch.
fn now_timestamp() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();

    format!("{}", now.as_secs())
}

// Copyright (c) 2026 - present Kiarash Minoo
// SPDX-License-Identifier: MIT

//! Persisted checkpoint marking the last fully processed revision
//!
//! The checkpoint is read once at run start and written exactly once at the
//! end, including on up-to-date no-op runs (the rewrite refreshes
//! `updatedAt`). Field names stay camelCase for compatibility with state
//! files written by earlier versions of the tool.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Checkpoint state file errors
#[derive(Debug, Error)]
pub enum StateError {
    /// Filesystem error while writing the state file
    #[error("State file I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error while writing the state file
    #[error("State file JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Marker of the last fully processed revision, enabling incremental runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checkpoint {
    /// Last fully processed commit SHA
    pub last_processed_sha: String,
    /// Branch the checkpoint was taken on
    pub branch: String,
    /// When the checkpoint was written
    pub updated_at: DateTime<Utc>,
    /// Output file the run rendered into
    pub output_file: PathBuf,
}

impl Checkpoint {
    /// Build a fresh checkpoint for the current head
    #[must_use]
    pub fn new(head: &str, branch: &str, output: &Path) -> Self {
        Self {
            last_processed_sha: head.to_string(),
            branch: branch.to_string(),
            updated_at: Utc::now(),
            output_file: output.to_path_buf(),
        }
    }

    /// Load a checkpoint from disk.
    ///
    /// A missing or corrupt state file is treated as "no prior checkpoint",
    /// never a hard failure; the planner falls back to full mode.
    #[must_use]
    pub fn load(path: &Path) -> Option<Checkpoint> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) => {
                debug!(path = %path.display(), error = %err, "No readable state file");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(checkpoint) => Some(checkpoint),
            Err(err) => {
                debug!(path = %path.display(), error = %err, "Corrupt state file ignored");
                None
            }
        }
    }

    /// Write the checkpoint to disk, creating parent directories if absent
    ///
    /// # Errors
    ///
    /// Returns `StateError` on filesystem or serialization failure.
    pub fn save(&self, path: &Path) -> Result<(), StateError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

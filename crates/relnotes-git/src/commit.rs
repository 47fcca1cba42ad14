//! Commit metadata and touched-file types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::diff::DiffHunk;

/// Metadata for a single revision, immutable once fetched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitMeta {
    /// The full commit SHA (40 hex characters)
    pub sha: String,
    /// Author name
    pub author: String,
    /// Author email
    pub email: String,
    /// Author date, day granularity
    pub date: NaiveDate,
    /// First line of the commit message
    pub subject: String,
}

impl CommitMeta {
    /// Validate that a SHA is a valid 40-character hex string
    #[must_use]
    pub fn is_valid_sha(sha: &str) -> bool {
        sha.len() == 40 && sha.chars().all(|c| c.is_ascii_hexdigit())
    }

    /// Get the short SHA (first 7 characters)
    #[must_use]
    pub fn short_sha(&self) -> &str {
        &self.sha[..7.min(self.sha.len())]
    }
}

/// Change status of a file within one commit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    /// File was added
    Added,
    /// File was modified
    Modified,
    /// File was deleted
    Deleted,
    /// File was renamed
    Renamed,
    /// File was copied
    Copied,
    /// Any other delta kind
    Unknown,
}

impl From<git2::Delta> for FileStatus {
    fn from(delta: git2::Delta) -> Self {
        match delta {
            git2::Delta::Added => FileStatus::Added,
            git2::Delta::Deleted => FileStatus::Deleted,
            git2::Delta::Modified => FileStatus::Modified,
            git2::Delta::Renamed => FileStatus::Renamed,
            git2::Delta::Copied => FileStatus::Copied,
            _ => FileStatus::Unknown,
        }
    }
}

/// A file touched by a commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TouchedFile {
    /// Change status
    pub status: FileStatus,
    /// Repository-relative path
    pub path: String,
}

/// Extension of a repository-relative path including the leading dot,
/// empty for dotfiles and extension-less names
#[must_use]
pub fn path_extension(path: &str) -> &str {
    match path.rfind('.') {
        Some(idx) if idx > path.rfind('/').map_or(0, |s| s + 1) => &path[idx..],
        _ => "",
    }
}

impl TouchedFile {
    /// Extension of the path including the leading dot, empty if none
    #[must_use]
    pub fn extension(&self) -> &str {
        path_extension(&self.path)
    }

    /// Base name of the path (final component)
    #[must_use]
    pub fn base_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}

/// A commit aggregate: metadata plus touched files plus bounded diff hunks.
///
/// Constructed once per range traversal and never mutated afterwards. A
/// commit beyond the loader's detail threshold carries empty `files` and
/// `hunks`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    /// Revision metadata
    pub meta: CommitMeta,
    /// Touched files in diff order
    pub files: Vec<TouchedFile>,
    /// Parsed hunks in diff order
    pub hunks: Vec<DiffHunk>,
}

impl Commit {
    /// Build a metadata-only commit with no file or hunk information
    #[must_use]
    pub fn metadata_only(meta: CommitMeta) -> Self {
        Self {
            meta,
            files: Vec::new(),
            hunks: Vec::new(),
        }
    }

    /// Whether any touched file has one of the given extensions
    #[must_use]
    pub fn touches_extension(&self, extensions: &[&str]) -> bool {
        self.files
            .iter()
            .any(|f| extensions.contains(&f.extension()))
    }
}

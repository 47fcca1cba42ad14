// Copyright (c) 2026 - present Kiarash Minoo
// SPDX-License-Identifier: MIT

//! relnotes-git: Git history access for the relnotes changelog generator
//!
//! This library crate provides read-only history queries (`git2`-backed) and
//! bounded parsing of raw unified-diff text into structured hunks.

#![warn(missing_docs)]

//! # Example
//!
//! ```no_run
//! use relnotes_git::{DiffLimits, GitRepo, History, parse_hunks};
//! use relnotes_git::repo::DetailOptions;
//!
//! let repo = GitRepo::discover(".").expect("open repo");
//! let head = repo.head_sha().expect("resolve HEAD");
//! let detail = repo.commit_detail(&head, &DetailOptions::default()).expect("detail");
//!
//! for hunk in parse_hunks(&detail.raw_diff, &DiffLimits::default()) {
//!     println!("{}: {} lines", hunk.file, hunk.lines.len());
//! }
//! ```

pub mod commit;
pub mod diff;
pub mod error;
pub mod repo;

pub use commit::{Commit, CommitMeta, FileStatus, TouchedFile, path_extension};
pub use diff::{DiffHunk, DiffLimits, parse_hunks};
pub use error::GitError;
pub use repo::{CommitDetail, DetailOptions, GitRepo, History, TagInfo};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::commit::{Commit, CommitMeta, TouchedFile};
    pub use crate::diff::{DiffHunk, DiffLimits, parse_hunks};
    pub use crate::error::GitError;
    pub use crate::repo::{GitRepo, History};
}

// Copyright (c) 2026 - present Kiarash Minoo
// SPDX-License-Identifier: MIT

//! Loading commits for one release range, with bounded detail
//!
//! Only the first `detail_threshold` commits of a range get full detail
//! (touched files plus parsed hunks); the rest stay metadata-only, which
//! bounds cost on large ranges while still supporting "and N more"
//! rendering. Detail failures degrade a single commit, never the run.

use globset::GlobSet;
use tracing::warn;

use relnotes_git::repo::DetailOptions;
use relnotes_git::{Commit, DiffLimits, History, parse_hunks};

/// Path include/exclude filter with shell-glob semantics
#[derive(Debug, Default)]
pub struct PathFilter {
    include: Option<GlobSet>,
    exclude: Option<GlobSet>,
}

impl PathFilter {
    /// Build a filter; `None` sets mean "no constraint"
    #[must_use]
    pub fn new(include: Option<GlobSet>, exclude: Option<GlobSet>) -> Self {
        Self { include, exclude }
    }

    /// Whether any pattern is configured at all
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.include.is_some() || self.exclude.is_some()
    }

    /// Whether a repository-relative path passes the filter
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        if let Some(exclude) = &self.exclude {
            if exclude.is_match(path) {
                return false;
            }
        }
        match &self.include {
            Some(include) => include.is_match(path),
            None => true,
        }
    }

    /// Whether a commit survives filtering.
    ///
    /// A commit with no file information at all is retained conservatively
    /// rather than risking false negatives.
    #[must_use]
    pub fn retain_commit(&self, commit: &Commit) -> bool {
        if commit.files.is_empty() {
            return true;
        }
        commit.files.iter().any(|f| self.matches(&f.path))
    }
}

/// Per-range loading parameters
#[derive(Debug)]
pub struct LoadOptions<'a> {
    /// Commits beyond this index stay metadata-only (typically 3 x max highlights)
    pub detail_threshold: usize,
    /// Options for per-commit detail queries
    pub detail: DetailOptions,
    /// Budgets for the hunk parser
    pub limits: DiffLimits,
    /// Path include/exclude filter
    pub filter: &'a PathFilter,
}

/// Load the commits of one range, newest-first.
///
/// A failing range log is non-fatal and yields zero commits; a failing
/// per-commit detail query degrades that commit to metadata-only.
pub fn load_range(history: &dyn History, spec: &str, options: &LoadOptions<'_>) -> Vec<Commit> {
    let metas = match history.log_range(spec) {
        Ok(metas) => metas,
        Err(err) => {
            warn!(spec = %spec, error = %err, "Range log failed, rendering empty section");
            return Vec::new();
        }
    };

    let mut commits = Vec::with_capacity(metas.len());
    for meta in metas {
        if commits.len() >= options.detail_threshold {
            commits.push(Commit::metadata_only(meta));
            continue;
        }
        match history.commit_detail(&meta.sha, &options.detail) {
            Ok(detail) => commits.push(Commit {
                meta: detail.meta,
                files: detail.files,
                hunks: parse_hunks(&detail.raw_diff, &options.limits),
            }),
            Err(err) => {
                warn!(sha = %meta.sha, error = %err, "Detail query failed, keeping metadata only");
                commits.push(Commit::metadata_only(meta));
            }
        }
    }

    if options.filter.is_configured() {
        commits.retain(|c| options.filter.retain_commit(c));
    }
    commits
}

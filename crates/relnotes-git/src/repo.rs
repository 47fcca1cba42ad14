// Copyright (c) 2026 - present Kiarash Minoo
// SPDX-License-Identifier: MIT

//! Read-only git history queries
//!
//! The [`History`] trait models the handful of queries the changelog
//! pipeline needs; [`GitRepo`] implements it over `git2`. Keeping the trait
//! narrow lets the planner and loader run against in-memory fakes in tests.

use chrono::{DateTime, TimeZone, Utc};
use git2::{DiffFormat, DiffOptions, Repository, Sort};
use regex::Regex;
use std::path::Path;
use tracing::debug;

use crate::commit::{CommitMeta, TouchedFile};
use crate::error::GitError;

/// A tag with its creation time, used for release-range ordering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagInfo {
    /// Tag name as listed by the repository
    pub name: String,
    /// Creation time (the tagged commit's author time)
    pub created: DateTime<Utc>,
}

/// Options for fetching one commit's detail
#[derive(Debug, Clone, Copy, Default)]
pub struct DetailOptions {
    /// Context lines to include around each change in the raw diff
    pub context_lines: u32,
}

/// Full detail for one commit: metadata, touched files, raw diff text
#[derive(Debug, Clone)]
pub struct CommitDetail {
    /// Revision metadata
    pub meta: CommitMeta,
    /// Touched files in diff order
    pub files: Vec<TouchedFile>,
    /// Raw unified-diff text against the first parent
    pub raw_diff: String,
}

/// Read-only history queries required by the changelog pipeline
pub trait History {
    /// Resolve HEAD to a full commit SHA
    ///
    /// # Errors
    ///
    /// Returns [`GitError::NoHead`] if no head revision is resolvable.
    fn head_sha(&self) -> Result<String, GitError>;

    /// Name of the currently checked-out branch ("HEAD" when detached)
    ///
    /// # Errors
    ///
    /// Returns `GitError` if HEAD cannot be read at all.
    fn current_branch(&self) -> Result<String, GitError>;

    /// Tags matching the filter, newest-first by creation time.
    ///
    /// Ties on creation time keep the repository's tag-list order; the sort
    /// is stable and never re-orders equal keys.
    ///
    /// # Errors
    ///
    /// Returns `GitError` if the tag list cannot be read.
    fn list_tags(&self, filter: &Regex) -> Result<Vec<TagInfo>, GitError>;

    /// Whether `ancestor` is an ancestor of or equal to `descendant`
    ///
    /// # Errors
    ///
    /// Returns `GitError` if either revision cannot be resolved.
    fn is_ancestor(&self, ancestor: &str, descendant: &str) -> Result<bool, GitError>;

    /// Commit metadata for a revision range, newest-first.
    ///
    /// Supports `a..b` ranges, `rev^!` (the single named commit), and a bare
    /// revision meaning all history reachable from it.
    ///
    /// # Errors
    ///
    /// Returns `GitError` if the range cannot be resolved or walked.
    fn log_range(&self, spec: &str) -> Result<Vec<CommitMeta>, GitError>;

    /// Metadata, touched files, and raw diff text for one commit
    ///
    /// # Errors
    ///
    /// Returns `GitError` if the commit cannot be resolved or diffed.
    fn commit_detail(&self, sha: &str, options: &DetailOptions)
    -> Result<CommitDetail, GitError>;
}

/// A git repository wrapper implementing [`History`] over `git2`
pub struct GitRepo {
    repo: Repository,
}

impl GitRepo {
    /// Open a git repository at the given path
    ///
    /// # Errors
    ///
    /// Returns `GitError::RepositoryNotFound` if the path is not a git repository.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, GitError> {
        let path = path.as_ref();
        let repo = Repository::open(path).map_err(|_| GitError::RepositoryNotFound {
            path: path.display().to_string(),
        })?;
        Ok(Self { repo })
    }

    /// Discover and open a git repository containing the given path
    ///
    /// This walks up the directory tree to find a `.git` directory.
    ///
    /// # Errors
    ///
    /// Returns `GitError::RepositoryNotFound` if no repository is found.
    pub fn discover(path: impl AsRef<Path>) -> Result<Self, GitError> {
        let path = path.as_ref();
        let repo = Repository::discover(path).map_err(|_| GitError::RepositoryNotFound {
            path: path.display().to_string(),
        })?;
        Ok(Self { repo })
    }

    fn resolve(&self, reference: &str) -> Result<git2::Commit<'_>, GitError> {
        self.repo
            .revparse_single(reference)
            .and_then(|obj| obj.peel_to_commit())
            .map_err(|_| GitError::InvalidReference {
                reference: reference.to_string(),
            })
    }

    fn meta_of(git_commit: &git2::Commit<'_>) -> CommitMeta {
        let timestamp = Utc
            .timestamp_opt(git_commit.time().seconds(), 0)
            .single()
            .unwrap_or_else(Utc::now);

        CommitMeta {
            sha: git_commit.id().to_string(),
            author: git_commit.author().name().unwrap_or("Unknown").to_string(),
            email: git_commit.author().email().unwrap_or("").to_string(),
            date: timestamp.date_naive(),
            subject: git_commit.summary().unwrap_or("").to_string(),
        }
    }

    fn diff_of(
        &self,
        git_commit: &git2::Commit<'_>,
        context_lines: u32,
    ) -> Result<git2::Diff<'_>, GitError> {
        let tree = git_commit.tree()?;
        let parent_tree = if git_commit.parent_count() > 0 {
            Some(git_commit.parent(0)?.tree()?)
        } else {
            None
        };

        let mut opts = DiffOptions::new();
        opts.context_lines(context_lines);

        Ok(self
            .repo
            .diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), Some(&mut opts))?)
    }
}

impl History for GitRepo {
    fn head_sha(&self) -> Result<String, GitError> {
        let head = self.repo.head().map_err(|_| GitError::NoHead)?;
        let oid = head.target().ok_or(GitError::NoHead)?;
        Ok(oid.to_string())
    }

    fn current_branch(&self) -> Result<String, GitError> {
        let head = self.repo.head().map_err(|_| GitError::NoHead)?;
        Ok(head.shorthand().unwrap_or("HEAD").to_string())
    }

    fn list_tags(&self, filter: &Regex) -> Result<Vec<TagInfo>, GitError> {
        let names = self.repo.tag_names(None)?;
        let mut tags = Vec::new();

        for name in names.iter().flatten() {
            if !filter.is_match(name) {
                continue;
            }
            // Skip tags that do not point at a commit (e.g. tagged blobs)
            let Ok(commit) = self.resolve(name) else {
                continue;
            };
            let created = Utc
                .timestamp_opt(commit.time().seconds(), 0)
                .single()
                .unwrap_or_else(Utc::now);
            tags.push(TagInfo {
                name: name.to_string(),
                created,
            });
        }

        // Stable sort: equal creation times keep tag-list input order
        tags.sort_by(|a, b| b.created.cmp(&a.created));
        debug!(count = tags.len(), "Listed release tags");
        Ok(tags)
    }

    fn is_ancestor(&self, ancestor: &str, descendant: &str) -> Result<bool, GitError> {
        let a = self.resolve(ancestor)?.id();
        let b = self.resolve(descendant)?.id();
        if a == b {
            return Ok(true);
        }
        match self.repo.merge_base(a, b) {
            Ok(base) => Ok(base == a),
            Err(_) => Ok(false),
        }
    }

    fn log_range(&self, spec: &str) -> Result<Vec<CommitMeta>, GitError> {
        if let Some(rev) = spec.strip_suffix("^!") {
            // Just the named commit, excluding its parents
            return Ok(vec![Self::meta_of(&self.resolve(rev)?)]);
        }

        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TIME | Sort::TOPOLOGICAL)?;

        if spec.contains("..") {
            revwalk.push_range(spec)?;
        } else {
            let oid = self.resolve(spec)?.id();
            revwalk.push(oid)?;
        }

        let mut commits = Vec::new();
        for oid in revwalk {
            let git_commit = self.repo.find_commit(oid?)?;
            commits.push(Self::meta_of(&git_commit));
        }
        Ok(commits)
    }

    fn commit_detail(
        &self,
        sha: &str,
        options: &DetailOptions,
    ) -> Result<CommitDetail, GitError> {
        let git_commit = self.resolve(sha)?;
        let meta = Self::meta_of(&git_commit);
        let diff = self.diff_of(&git_commit, options.context_lines)?;

        let files = diff
            .deltas()
            .map(|delta| {
                let path = delta
                    .new_file()
                    .path()
                    .or_else(|| delta.old_file().path())
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "<unknown>".to_string());
                TouchedFile {
                    status: delta.status().into(),
                    path,
                }
            })
            .collect();

        let mut raw_diff = String::new();
        diff.print(DiffFormat::Patch, |_delta, _hunk, line| {
            match line.origin() {
                '+' | '-' | ' ' => raw_diff.push(line.origin()),
                _ => {}
            }
            raw_diff.push_str(&String::from_utf8_lossy(line.content()));
            true
        })?;

        Ok(CommitDetail {
            meta,
            files,
            raw_diff,
        })
    }
}

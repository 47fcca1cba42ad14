// Copyright (c) 2026 - present Kiarash Minoo
// SPDX-License-Identifier: MIT

//! Bounded parsing of raw unified-diff text into structured hunks
//!
//! The parser is a line-oriented state machine with three budgets that bound
//! worst-case memory on commits with very large diffs (vendored file updates
//! and the like): hunks retained per file, lines retained per hunk, and diff
//! lines retained across the whole commit. Once the commit-wide budget is
//! exhausted, later hunks and lines are silently dropped.

use serde::{Deserialize, Serialize};

/// Budgets applied while parsing one commit's diff
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffLimits {
    /// Maximum hunks retained per file (0 = unlimited)
    pub hunks_per_file: usize,
    /// Maximum lines retained per hunk (0 = unlimited)
    pub lines_per_hunk: usize,
    /// Maximum diff lines retained across all hunks of one commit
    pub lines_per_commit: usize,
}

impl Default for DiffLimits {
    fn default() -> Self {
        Self {
            hunks_per_file: 2,
            lines_per_hunk: 40,
            lines_per_commit: 300,
        }
    }
}

/// A contiguous, bounded block of changed/contextual lines within one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffHunk {
    /// Repository-relative path the hunk belongs to
    pub file: String,
    /// The `@@ ... @@` range descriptor line
    pub header: String,
    /// Prefixed content lines, each starting with '+', '-', or ' '
    pub lines: Vec<String>,
}

impl DiffHunk {
    /// Added lines with the '+' prefix stripped
    pub fn added_lines(&self) -> impl Iterator<Item = &str> {
        self.lines
            .iter()
            .filter(|l| l.starts_with('+'))
            .map(|l| &l[1..])
    }

    /// Removed lines with the '-' prefix stripped
    pub fn removed_lines(&self) -> impl Iterator<Item = &str> {
        self.lines
            .iter()
            .filter(|l| l.starts_with('-'))
            .map(|l| &l[1..])
    }
}

/// Parse raw unified-diff text into size-bounded hunks.
///
/// File-header `+++`/`---` lines never land in a hunk: they occur between a
/// `diff --git` marker and the first `@@` marker, where no hunk is open.
/// A hunk still open when the commit-wide budget trips or input ends is
/// flushed as-is.
#[must_use]
pub fn parse_hunks(raw: &str, limits: &DiffLimits) -> Vec<DiffHunk> {
    let mut hunks: Vec<DiffHunk> = Vec::new();
    let mut current_file: Option<String> = None;
    let mut current_hunk: Option<DiffHunk> = None;
    let mut total_lines = 0usize;

    for line in raw.lines() {
        if total_lines >= limits.lines_per_commit {
            break;
        }

        if line.starts_with("diff --git") {
            // New file section: flush any open hunk, reset file context
            if let Some(hunk) = current_hunk.take() {
                hunks.push(hunk);
            }
            current_file = line
                .rsplit_once(" b/")
                .map(|(_, path)| path.to_string());
        } else if line.starts_with("@@") {
            let Some(file) = current_file.clone() else {
                continue;
            };
            if let Some(hunk) = current_hunk.take() {
                hunks.push(hunk);
            }
            let kept_for_file = hunks.iter().filter(|h| h.file == file).count();
            if limits.hunks_per_file > 0 && kept_for_file >= limits.hunks_per_file {
                // Per-file cap reached: ignore hunk starts until the next file marker
                continue;
            }
            current_hunk = Some(DiffHunk {
                file,
                header: line.to_string(),
                lines: Vec::new(),
            });
        } else if let Some(hunk) = current_hunk.as_mut() {
            if line.starts_with('+') || line.starts_with('-') || line.starts_with(' ') {
                if limits.lines_per_hunk > 0 && hunk.lines.len() >= limits.lines_per_hunk {
                    // Capped hunk: dropped lines do not count toward the commit budget
                    continue;
                }
                hunk.lines.push(line.to_string());
                total_lines += 1;
            }
        }
    }

    if let Some(hunk) = current_hunk.take() {
        hunks.push(hunk);
    }

    hunks
}

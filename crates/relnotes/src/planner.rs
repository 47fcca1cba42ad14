// Copyright (c) 2026 - present Kiarash Minoo
// SPDX-License-Identifier: MIT

//! Release-range planning: incremental vs full mode
//!
//! Given the prior checkpoint (if any) and the current head, the planner
//! decides the run mode and produces the ordered, non-overlapping list of
//! commit ranges to render, newest-first. Checkpoint state flows in and out
//! of this module only.

use regex::Regex;
use tracing::{debug, warn};

use crate::checkpoint::Checkpoint;
use relnotes_git::History;

/// How the run will traverse history
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanMode {
    /// Render only the span since the checkpoint
    Incremental,
    /// Render all tag ranges plus Unreleased
    Full,
    /// Head equals the checkpoint: nothing to render
    UpToDate,
}

impl PlanMode {
    /// Lowercase form for the summary log line
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanMode::Incremental => "incremental",
            PlanMode::Full => "full",
            PlanMode::UpToDate => "up-to-date",
        }
    }
}

/// A bounded span of revisions rendered as one changelog section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseRange {
    /// Section label (tag name or "Unreleased")
    pub label: String,
    /// Revision-range expression understood by [`History::log_range`]
    pub spec: String,
    /// GitHub compare link, when a predecessor exists
    pub compare_url: Option<String>,
}

/// Planner output: run mode plus ordered ranges, newest-first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    /// Decided run mode
    pub mode: PlanMode,
    /// Ranges to render; empty when up-to-date
    pub ranges: Vec<ReleaseRange>,
}

/// Inputs beyond history state that shape the plan
#[derive(Debug, Clone)]
pub struct PlanOptions<'a> {
    /// Include the Unreleased section in full mode
    pub include_unreleased: bool,
    /// Ignore the checkpoint and recompute from tags
    pub force_full: bool,
    /// GitHub owner for compare links
    pub repo_owner: &'a str,
    /// GitHub repository name for compare links
    pub repo_name: &'a str,
}

/// Decide the run mode and compute the ordered range list.
///
/// A checkpoint is usable only when it was taken on the current branch and
/// its revision is an ancestor of or equal to `head`; anything else
/// (missing, different branch, rewritten history) silently falls back to
/// full mode.
pub fn plan(
    history: &dyn History,
    checkpoint: Option<&Checkpoint>,
    head: &str,
    branch: &str,
    tag_filter: &Regex,
    options: &PlanOptions<'_>,
) -> Plan {
    if !options.force_full {
        if let Some(cp) = checkpoint.filter(|cp| cp.branch == branch) {
            // An unresolvable checkpoint revision (force-pushed history)
            // behaves like an absent checkpoint
            let reachable = history
                .is_ancestor(&cp.last_processed_sha, head)
                .unwrap_or(false);
            if reachable {
                if cp.last_processed_sha == head {
                    debug!(head = %head, "Checkpoint matches head");
                    return Plan {
                        mode: PlanMode::UpToDate,
                        ranges: Vec::new(),
                    };
                }
                return Plan {
                    mode: PlanMode::Incremental,
                    ranges: vec![ReleaseRange {
                        label: "Unreleased".to_string(),
                        spec: format!("{}..{head}", cp.last_processed_sha),
                        compare_url: None,
                    }],
                };
            }
            debug!(sha = %cp.last_processed_sha, "Stale checkpoint, falling back to full mode");
        }
    }

    let tags = match history.list_tags(tag_filter) {
        Ok(tags) => tags,
        Err(err) => {
            warn!(error = %err, "Tag listing failed, treating as untagged history");
            Vec::new()
        }
    };

    if tags.is_empty() {
        return Plan {
            mode: PlanMode::Full,
            ranges: vec![ReleaseRange {
                label: "Unreleased".to_string(),
                spec: head.to_string(),
                compare_url: None,
            }],
        };
    }

    // Walk tags pairwise newest to oldest; the newest tag has no newer
    // predecessor and renders as its own single commit
    let mut ranges = Vec::with_capacity(tags.len() + 1);
    let mut prev: Option<&str> = None;
    for tag in &tags {
        let spec = match prev {
            None => format!("{}^!", tag.name),
            Some(prev) => format!("{}..{prev}", tag.name),
        };
        let compare_url = prev.map(|prev| {
            format!(
                "https://github.com/{}/{}/compare/{}...{prev}",
                options.repo_owner, options.repo_name, tag.name
            )
        });
        ranges.push(ReleaseRange {
            label: tag.name.clone(),
            spec,
            compare_url,
        });
        prev = Some(&tag.name);
    }

    if options.include_unreleased {
        let newest = &tags[0].name;
        ranges.insert(
            0,
            ReleaseRange {
                label: "Unreleased".to_string(),
                spec: format!("{newest}..{head}"),
                compare_url: Some(format!(
                    "https://github.com/{}/{}/compare/{newest}...{branch}",
                    options.repo_owner, options.repo_name
                )),
            },
        );
    }

    Plan {
        mode: PlanMode::Full,
        ranges,
    }
}

// Copyright (c) 2026 - present Kiarash Minoo
// SPDX-License-Identifier: MIT

//! relnotes library
//!
//! This module exports the changelog pipeline for use in integration tests
//! and as a library: range planning, commit loading, classification,
//! API-change hints, and markdown rendering.

use thiserror::Error;
use tracing::info;

pub mod checkpoint;
pub mod classify;
pub mod config;
pub mod hints;
pub mod loader;
pub mod output;
pub mod planner;
pub mod render;

use crate::checkpoint::{Checkpoint, StateError};
use crate::classify::Category;
use crate::config::{Config, ConfigError};
use crate::loader::{LoadOptions, PathFilter};
use crate::planner::{PlanMode, PlanOptions};
use crate::render::RenderOptions;
use relnotes_git::{GitError, GitRepo, History};

/// Errors that abort a changelog run
#[derive(Debug, Error)]
pub enum RunError {
    /// Invalid configuration (bad regex or glob patterns)
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Unusable history: repository missing or HEAD unresolvable
    #[error("Git error: {0}")]
    Git(#[from] GitError),

    /// State or output file could not be written
    #[error("State error: {0}")]
    State(#[from] StateError),
}

/// Run the generator against the repository configured in `config`
///
/// # Errors
///
/// Returns `RunError` on invalid configuration, unusable history, or a
/// failed state/output write. Per-commit and per-range query failures are
/// recovered internally and never surface here.
pub fn run(config: &Config) -> Result<PlanMode, RunError> {
    let history = GitRepo::discover(&config.repo)?;
    run_with_history(&history, config)
}

/// Run the generator against any [`History`] implementation.
///
/// One invocation processes all planned ranges sequentially; the checkpoint
/// is read once at the start and written exactly once at the end, including
/// on up-to-date no-op runs (refreshing its timestamp).
pub fn run_with_history(history: &dyn History, config: &Config) -> Result<PlanMode, RunError> {
    config.validate()?;

    let head = history.head_sha()?;
    let branch = history
        .current_branch()
        .unwrap_or_else(|_| "HEAD".to_string());
    let tag_filter = config.tag_filter_regex()?;

    if config.reset_all && config.state.exists() {
        std::fs::remove_file(&config.state).map_err(StateError::Io)?;
    }
    let checkpoint = if config.reset_all || config.refresh {
        None
    } else {
        Checkpoint::load(&config.state)
    };

    let plan = planner::plan(
        history,
        checkpoint.as_ref(),
        &head,
        &branch,
        &tag_filter,
        &PlanOptions {
            include_unreleased: config.include_unreleased,
            force_full: config.reset_all || config.refresh,
            repo_owner: &config.repo_owner,
            repo_name: &config.repo_name,
        },
    );

    if plan.mode == PlanMode::UpToDate {
        info!(head = %short(&head), "Already up to date");
        // The rewrite still happens: it refreshes the checkpoint timestamp
        Checkpoint::new(&head, &branch, &config.output).save(&config.state)?;
        return Ok(PlanMode::UpToDate);
    }

    let filter = PathFilter::new(config.include_globs()?, config.exclude_globs()?);
    let load_options = LoadOptions {
        detail_threshold: config.max_highlights.saturating_mul(3),
        detail: config.detail_options(),
        limits: config.diff_limits(),
        filter: &filter,
    };
    let skip: Vec<Category> = config
        .skip_type_tokens()
        .iter()
        .filter_map(|t| Category::from_token(t))
        .collect();
    let render_options = RenderOptions {
        repo_owner: &config.repo_owner,
        repo_name: &config.repo_name,
        max_highlights: config.max_highlights,
        include_files: config.include_files,
        include_snippets: config.include_snippets,
        snippet_limit: config.snippet_limit,
        contents_mode: config.contents_mode,
        fold_empty: config.fold_empty,
        language_mode: config.language_mode,
        skip: &skip,
    };

    let mut parts = render::document_header(&config.title);
    for range in &plan.ranges {
        let commits = loader::load_range(history, &range.spec, &load_options);
        if let Some(section) = render::render_section(range, &commits, &render_options) {
            parts.push(section);
        }
    }
    let content = parts.join("\n");

    output::write_managed_block(&config.output, &content, config.reset_all)?;
    Checkpoint::new(&head, &branch, &config.output).save(&config.state)?;

    info!(
        mode = plan.mode.as_str(),
        head = %short(&head),
        ranges = plan.ranges.len(),
        output = %config.output.display(),
        "Changelog updated"
    );
    Ok(plan.mode)
}

fn short(sha: &str) -> &str {
    &sha[..7.min(sha.len())]
}

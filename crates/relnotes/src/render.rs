// Copyright (c) 2026 - present Kiarash Minoo
// SPDX-License-Identifier: MIT

//! Markdown rendering of classified commits into release sections

use clap::ValueEnum;

use crate::classify::Category;
use crate::hints::{self, LanguageMode};
use crate::planner::ReleaseRange;
use relnotes_git::Commit;

/// Hints shown per commit at most
const HINTS_PER_COMMIT: usize = 2;
/// File names listed per commit at most
const FILES_PER_COMMIT: usize = 5;
/// Hunks contributing to one snippet at most
const HUNKS_PER_SNIPPET: usize = 2;
/// Lines contributing to one snippet at most
const LINES_PER_SNIPPET: usize = 10;

/// What each commit bullet carries beneath the subject line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ContentsMode {
    /// Raw diff hunks as fenced snippets
    DiffHunks,
    /// Added lines only as fenced snippets
    AddedLines,
    /// Removed lines only as fenced snippets
    RemovedLines,
    /// Heuristic API/build-change hints instead of snippets
    ApiChanges,
}

/// Display options threaded from the configuration
#[derive(Debug, Clone)]
pub struct RenderOptions<'a> {
    /// GitHub owner for commit links
    pub repo_owner: &'a str,
    /// GitHub repository name for commit links
    pub repo_name: &'a str,
    /// Max commits shown per category (0 = unlimited)
    pub max_highlights: usize,
    /// Show touched-file lists
    pub include_files: bool,
    /// Show fenced diff snippets
    pub include_snippets: bool,
    /// Max characters per snippet
    pub snippet_limit: usize,
    /// What each bullet carries
    pub contents_mode: ContentsMode,
    /// Omit sections for empty ranges entirely
    pub fold_empty: bool,
    /// Language mode for API-change hints
    pub language_mode: LanguageMode,
    /// Categories omitted from output
    pub skip: &'a [Category],
}

/// Escape markdown characters that would garble a subject line
#[must_use]
pub fn escape_md(text: &str) -> String {
    text.replace('_', r"\_")
        .replace('*', r"\*")
        .replace('[', r"\[")
        .replace(']', r"\]")
}

/// Document preamble above all release sections
#[must_use]
pub fn document_header(title: &str) -> Vec<String> {
    vec![
        format!("# {title}\n"),
        "All notable changes to this project are documented in this file.\n".to_string(),
        "The format is based on [Keep a Changelog](https://keepachangelog.com/en/1.0.0/).\n"
            .to_string(),
    ]
}

/// Group commits by category in taxonomy order, non-empty groups only
fn group_commits<'a>(
    commits: &'a [Commit],
    skip: &[Category],
) -> Vec<(Category, Vec<&'a Commit>)> {
    Category::ALL
        .iter()
        .filter(|category| !skip.contains(category))
        .filter_map(|&category| {
            let group: Vec<&Commit> = commits
                .iter()
                .filter(|c| Category::from_subject(&c.meta.subject) == category)
                .collect();
            (!group.is_empty()).then_some((category, group))
        })
        .collect()
}

fn commit_link(commit: &Commit, options: &RenderOptions<'_>) -> String {
    format!(
        "[`{}`](https://github.com/{}/{}/commit/{})",
        commit.meta.short_sha(),
        options.repo_owner,
        options.repo_name,
        commit.meta.sha
    )
}

fn snippet_for(commit: &Commit, options: &RenderOptions<'_>) -> Option<String> {
    let mut lines: Vec<String> = Vec::new();
    for hunk in commit.hunks.iter().take(HUNKS_PER_SNIPPET) {
        match options.contents_mode {
            ContentsMode::AddedLines => {
                lines.extend(hunk.lines.iter().filter(|l| l.starts_with('+')).cloned());
            }
            ContentsMode::RemovedLines => {
                lines.extend(hunk.lines.iter().filter(|l| l.starts_with('-')).cloned());
            }
            _ => lines.extend(hunk.lines.iter().cloned()),
        }
    }
    if lines.is_empty() {
        return None;
    }

    lines.truncate(LINES_PER_SNIPPET);
    let mut snippet = lines.join("\n");
    if snippet.chars().count() > options.snippet_limit {
        snippet = snippet.chars().take(options.snippet_limit).collect();
        snippet.push_str("...");
    }
    Some(format!("  ```diff\n  {snippet}\n  ```"))
}

/// Render one commit bullet: subject + link, then capped detail lines
fn render_commit_line(commit: &Commit, options: &RenderOptions<'_>) -> String {
    let mut line = format!(
        "- {} ({})",
        escape_md(&commit.meta.subject),
        commit_link(commit, options)
    );

    let mut details: Vec<String> = Vec::new();

    if options.contents_mode == ContentsMode::ApiChanges {
        let api_hints = hints::analyze(commit, options.language_mode);
        details.extend(
            api_hints
                .iter()
                .take(HINTS_PER_COMMIT)
                .map(|h| format!("  - {h}")),
        );
    }

    if options.include_files && !commit.files.is_empty() {
        let listed: Vec<String> = commit
            .files
            .iter()
            .take(FILES_PER_COMMIT)
            .map(|f| format!("`{}`", f.path))
            .collect();
        let mut files_str = listed.join(", ");
        if commit.files.len() > FILES_PER_COMMIT {
            files_str.push_str(&format!(
                " _(+{} more)_",
                commit.files.len() - FILES_PER_COMMIT
            ));
        }
        details.push(format!("  - Files: {files_str}"));
    }

    if options.include_snippets
        && matches!(
            options.contents_mode,
            ContentsMode::DiffHunks | ContentsMode::AddedLines | ContentsMode::RemovedLines
        )
    {
        if let Some(snippet) = snippet_for(commit, options) {
            details.push(snippet);
        }
    }

    if !details.is_empty() {
        line.push('\n');
        line.push_str(&details.join("\n"));
    }
    line
}

/// Render one release section for a range.
///
/// Returns `None` for an empty range when folding is enabled; the caller
/// omits the section entirely.
#[must_use]
pub fn render_section(
    range: &ReleaseRange,
    commits: &[Commit],
    options: &RenderOptions<'_>,
) -> Option<String> {
    if commits.is_empty() && options.fold_empty {
        return None;
    }

    let title = match &range.compare_url {
        Some(url) => format!("[{}]({url})", range.label),
        None => range.label.clone(),
    };

    let mut lines = vec![format!("## {title}\n")];

    if commits.is_empty() {
        lines.push("_No changes in this release._\n".to_string());
        return Some(lines.join("\n"));
    }

    for (category, items) in group_commits(commits, options.skip) {
        lines.push(format!("### {}\n", category.title()));

        let shown = if options.max_highlights > 0 {
            &items[..options.max_highlights.min(items.len())]
        } else {
            &items[..]
        };
        for commit in shown {
            lines.push(render_commit_line(commit, options));
        }

        if options.max_highlights > 0 && items.len() > options.max_highlights {
            lines.push(format!(
                "- _...and {} more commits_\n",
                items.len() - options.max_highlights
            ));
        }

        lines.push(String::new());
    }

    Some(lines.join("\n"))
}

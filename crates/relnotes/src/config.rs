// Copyright (c) 2026 - present Kiarash Minoo
// SPDX-License-Identifier: MIT

//! Configuration for the relnotes generator
//!
//! One immutable [`Config`] value is parsed at startup, validated once, and
//! threaded through the pipeline. There is no ambient/global configuration.

use std::path::PathBuf;

use clap::{ArgAction, Parser};
use globset::{Glob, GlobSet, GlobSetBuilder};
use regex::Regex;

use crate::hints::LanguageMode;
use crate::render::ContentsMode;
use relnotes_git::DiffLimits;
use relnotes_git::repo::DetailOptions;

/// Default tag filter: matches v1.2.3 or v2025.Q4.81
pub const DEFAULT_TAG_FILTER: &str = r"^v?\d+\.(Q\d+|\d+)\.\d+$";

/// Default include globs: source/header/build files, comma-separated and
/// brace-free (brace alternatives are pre-expanded)
pub const DEFAULT_PATH_INCLUDE: &str = "**/*.h,**/*.hpp,**/*.hxx,**/*.hh,\
**/*.c,**/*.cc,**/*.cpp,**/*.cxx,**/*.cs,**/*.csproj,**/*.sln,\
CMakeLists.txt,**/*.cmake,conanfile.*,vcpkg.json,**/*.bazel,WORKSPACE,\
.clang-format,.clang-tidy";

/// relnotes - Generate CHANGELOG.md from git tags and conventional commits
#[derive(Parser, Debug, Clone)]
#[command(name = "relnotes")]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Path to the git repository (discovered upward from here)
    #[arg(long, default_value = ".")]
    pub repo: PathBuf,

    /// Regex pattern selecting release tags
    #[arg(long, default_value = DEFAULT_TAG_FILTER)]
    pub tag_filter: String,

    /// Output file path
    #[arg(short, long, default_value = "CHANGELOG.md")]
    pub output: PathBuf,

    /// GitHub repository owner, used to build commit and compare links
    #[arg(long, env = "RELNOTES_REPO_OWNER", default_value = "KiarashMinoo")]
    pub repo_owner: String,

    /// GitHub repository name, used to build commit and compare links
    #[arg(long, env = "RELNOTES_REPO_NAME", default_value = "relnotes")]
    pub repo_name: String,

    /// Document title
    #[arg(long, default_value = "Changelog")]
    pub title: String,

    /// Include the Unreleased section in full mode
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub include_unreleased: bool,

    /// Rebuild from scratch: delete state and overwrite the output file
    #[arg(long)]
    pub reset_all: bool,

    /// Ignore state and recompute from tags (state file is kept)
    #[arg(long)]
    pub refresh: bool,

    /// State file path, persisted once per successful run
    #[arg(long, default_value = ".github/release-notes.state.json")]
    pub state: PathBuf,

    /// Max commits shown per category section
    #[arg(long, default_value_t = 6)]
    pub max_highlights: usize,

    /// Include touched-file lists under each commit
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub include_files: bool,

    /// Include fenced diff snippets under each commit
    #[arg(long)]
    pub include_snippets: bool,

    /// Max characters per snippet
    #[arg(long, default_value_t = 320)]
    pub snippet_limit: usize,

    /// Diff context lines
    #[arg(long, default_value_t = 0)]
    pub diff_context: u32,

    /// Max hunks retained per file (0 = unlimited)
    #[arg(long, default_value_t = 2)]
    pub hunk_limit: usize,

    /// Max lines retained per hunk (0 = unlimited)
    #[arg(long, default_value_t = 40)]
    pub lines_per_hunk: usize,

    /// Max total diff lines retained per commit
    #[arg(long, default_value_t = 300)]
    pub lines_per_commit: usize,

    /// Include path globs, comma-separated
    #[arg(long, default_value = DEFAULT_PATH_INCLUDE)]
    pub path_include: String,

    /// Exclude path globs, comma-separated
    #[arg(long, default_value = "")]
    pub path_exclude: String,

    /// Commit types to skip, comma-separated (e.g. "chore,style")
    #[arg(long, default_value = "")]
    pub skip_types: String,

    /// Omit sections for ranges with no commits
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub fold_empty: bool,

    /// Content analysis mode
    #[arg(long, value_enum, default_value_t = ContentsMode::ApiChanges)]
    pub contents_mode: ContentsMode,

    /// Language mode for API-change analysis
    #[arg(long, value_enum, default_value_t = LanguageMode::Auto)]
    pub language_mode: LanguageMode,

    /// Enable verbose logging (debug level)
    #[arg(short, long)]
    pub verbose: bool,

    /// Quiet mode - suppress info-level logs
    #[arg(short, long)]
    pub quiet: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self::parse_from::<_, &str>([])
    }
}

impl Config {
    /// Compile the tag filter regex
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidTagFilter` if the pattern does not compile.
    pub fn tag_filter_regex(&self) -> Result<Regex, ConfigError> {
        Regex::new(&self.tag_filter).map_err(|source| ConfigError::InvalidTagFilter {
            pattern: self.tag_filter.clone(),
            source,
        })
    }

    /// Build the include glob set, `None` when no patterns are configured
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidGlob` if a pattern does not compile.
    pub fn include_globs(&self) -> Result<Option<GlobSet>, ConfigError> {
        build_glob_set(&self.path_include)
    }

    /// Build the exclude glob set, `None` when no patterns are configured
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidGlob` if a pattern does not compile.
    pub fn exclude_globs(&self) -> Result<Option<GlobSet>, ConfigError> {
        build_glob_set(&self.path_exclude)
    }

    /// Diff budgets for the hunk parser
    #[must_use]
    pub fn diff_limits(&self) -> DiffLimits {
        DiffLimits {
            hunks_per_file: self.hunk_limit,
            lines_per_hunk: self.lines_per_hunk,
            lines_per_commit: self.lines_per_commit,
        }
    }

    /// Options for per-commit detail queries
    #[must_use]
    pub fn detail_options(&self) -> DetailOptions {
        DetailOptions {
            context_lines: self.diff_context,
        }
    }

    /// Skipped commit-type tokens, lower-cased
    #[must_use]
    pub fn skip_type_tokens(&self) -> Vec<String> {
        self.skip_types
            .split(',')
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect()
    }

    /// Validate the configuration by compiling all patterns once
    ///
    /// # Errors
    ///
    /// Returns an error if the tag filter or any glob pattern is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.tag_filter_regex()?;
        self.include_globs()?;
        self.exclude_globs()?;
        Ok(())
    }

    /// Get the log level based on verbose/quiet flags
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        if self.verbose {
            tracing::Level::DEBUG
        } else if self.quiet {
            tracing::Level::WARN
        } else {
            tracing::Level::INFO
        }
    }
}

fn build_glob_set(patterns: &str) -> Result<Option<GlobSet>, ConfigError> {
    let patterns: Vec<&str> = patterns
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();
    if patterns.is_empty() {
        return Ok(None);
    }

    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|source| ConfigError::InvalidGlob {
            pattern: pattern.to_string(),
            source,
        })?;
        builder.add(glob);
    }
    let set = builder.build().map_err(|source| ConfigError::InvalidGlob {
        pattern: String::new(),
        source,
    })?;
    Ok(Some(set))
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Tag filter regex failed to compile
    #[error("Invalid tag filter pattern '{pattern}': {source}")]
    InvalidTagFilter {
        /// The offending pattern
        pattern: String,
        /// Compile error from the regex crate
        source: regex::Error,
    },

    /// A path glob failed to compile
    #[error("Invalid path glob '{pattern}': {source}")]
    InvalidGlob {
        /// The offending pattern
        pattern: String,
        /// Compile error from the globset crate
        source: globset::Error,
    },
}

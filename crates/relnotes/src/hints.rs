// Copyright (c) 2026 - present Kiarash Minoo
// SPDX-License-Identifier: MIT

//! Heuristic API/build-change hints derived from a commit's diff hunks
//!
//! Each language variant is an [`ApiAnalyzer`] strategy over bounded hunks.
//! The heuristics are line-level regex matches, not a parser: multi-line
//! signatures produce false negatives and commented-out or string-embedded
//! declarations produce false positives. That imprecision is accepted; the
//! hints are advisory text only and never affect classification or range
//! computation. Stricter (AST-based) analyzers can replace a variant without
//! touching hunk budgets or classification.

use std::sync::LazyLock;

use clap::ValueEnum;
use regex::Regex;

use relnotes_git::{Commit, DiffHunk, TouchedFile, path_extension};

/// Maximum build-file names listed in the consolidated build hint
const BUILD_HINT_FILE_CAP: usize = 3;

/// Build-system base names shared by both variants
const BUILD_FILE_NAMES: [&str; 7] = [
    "CMakeLists.txt",
    "conanfile.txt",
    "conanfile.py",
    "vcpkg.json",
    "WORKSPACE",
    ".clang-format",
    ".clang-tidy",
];

const CPP_EXTENSIONS: [&str; 8] = [".h", ".hpp", ".hh", ".hxx", ".c", ".cc", ".cpp", ".cxx"];
const CSHARP_EXTENSIONS: [&str; 1] = [".cs"];

/// Language selector for API-change analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LanguageMode {
    /// Dispatch per commit from touched-file extensions
    Auto,
    /// C/C++ heuristics
    Cpp,
    /// C# heuristics
    Csharp,
}

/// A language-specific heuristic set over a commit's hunks and file list
pub trait ApiAnalyzer {
    /// File extensions this variant claims
    fn extensions(&self) -> &'static [&'static str];

    /// Whether a touched file belongs to this variant's build-system set
    fn is_build_file(&self, file: &TouchedFile) -> bool;

    /// Declaration hints for one hunk, at most one hint per rule
    fn hunk_hints(&self, hunk: &DiffHunk) -> Vec<String>;

    /// All hints for a commit: hunk hints in discovery order, then one
    /// consolidated build-system hint
    fn analyze(&self, commit: &Commit) -> Vec<String> {
        let mut hints: Vec<String> = commit
            .hunks
            .iter()
            .filter(|h| self.extensions().contains(&path_extension(&h.file)))
            .flat_map(|h| self.hunk_hints(h))
            .collect();

        let build_files: Vec<&str> = commit
            .files
            .iter()
            .filter(|f| self.is_build_file(f))
            .map(|f| f.path.as_str())
            .collect();
        if !build_files.is_empty() {
            hints.push(build_hint(&build_files));
        }

        hints
    }
}

fn build_hint(files: &[&str]) -> String {
    let listed = files[..BUILD_HINT_FILE_CAP.min(files.len())].join(", ");
    if files.len() > BUILD_HINT_FILE_CAP {
        format!(
            "Build: Modified {listed} +{} more",
            files.len() - BUILD_HINT_FILE_CAP
        )
    } else {
        format!("Build: Modified {listed}")
    }
}

/// First line in `lines` matching `pattern`, mapped through `hint`
fn first_match<'a, F>(pattern: &Regex, lines: impl Iterator<Item = &'a str>, hint: F) -> Option<String>
where
    F: Fn(&regex::Captures<'_>) -> String,
{
    for line in lines {
        if let Some(caps) = pattern.captures(line) {
            return Some(hint(&caps));
        }
    }
    None
}

/// C/C++ heuristics: free-function signatures and class/struct declarations
pub struct CppAnalyzer;

static CPP_FUNC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*[\w:\*&\s<>,~]+\s+(\w+)\s*\([^)]*\)\s*(const)?\s*(noexcept)?\s*[;{]")
        .expect("valid regex")
});
static CPP_TYPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(class|struct)\s+(\w+)").expect("valid regex"));

impl ApiAnalyzer for CppAnalyzer {
    fn extensions(&self) -> &'static [&'static str] {
        &CPP_EXTENSIONS
    }

    fn is_build_file(&self, file: &TouchedFile) -> bool {
        BUILD_FILE_NAMES.contains(&file.base_name())
            || file.extension() == ".cmake"
            || file.extension() == ".sln"
    }

    fn hunk_hints(&self, hunk: &DiffHunk) -> Vec<String> {
        let file = &hunk.file;
        let mut hints = Vec::new();

        if let Some(hint) = first_match(&CPP_FUNC, hunk.added_lines(), |caps| {
            format!("API: Added function `{}` in {file}", &caps[1])
        }) {
            hints.push(hint);
        }
        if let Some(hint) = first_match(&CPP_FUNC, hunk.removed_lines(), |caps| {
            format!("API: Removed function `{}` from {file}", &caps[1])
        }) {
            hints.push(hint);
        }
        if let Some(hint) = first_match(&CPP_TYPE, hunk.added_lines(), |caps| {
            format!("API: Added {} `{}` in {file}", &caps[1], &caps[2])
        }) {
            hints.push(hint);
        }
        if let Some(hint) = first_match(&CPP_TYPE, hunk.removed_lines(), |caps| {
            format!("API: Removed {} `{}` from {file}", &caps[1], &caps[2])
        }) {
            hints.push(hint);
        }

        hints
    }
}

/// C# heuristics: public/internal methods, types, and properties
pub struct CsharpAnalyzer;

static CS_METHOD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(public|internal)\s+(static\s+)?[\w<>\[\],\s\.?]+\s+(\w+)\s*\([^)]*\)")
        .expect("valid regex")
});
static CS_TYPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(public|internal)\s+(class|struct|interface)\s+(\w+)").expect("valid regex")
});
static CS_PROPERTY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(public|internal)\s+[\w<>\[\],\s\.?]+\s+(\w+)\s*\{").expect("valid regex")
});

impl ApiAnalyzer for CsharpAnalyzer {
    fn extensions(&self) -> &'static [&'static str] {
        &CSHARP_EXTENSIONS
    }

    fn is_build_file(&self, file: &TouchedFile) -> bool {
        BUILD_FILE_NAMES.contains(&file.base_name())
            || file.extension() == ".csproj"
            || file.extension() == ".sln"
    }

    fn hunk_hints(&self, hunk: &DiffHunk) -> Vec<String> {
        let file = &hunk.file;
        let mut hints = Vec::new();

        // C# lines are matched trimmed; the visibility keyword anchors the rule
        let added: Vec<&str> = hunk.added_lines().map(str::trim).collect();
        let removed: Vec<&str> = hunk.removed_lines().map(str::trim).collect();

        if let Some(hint) = first_match(&CS_METHOD, added.iter().copied(), |caps| {
            format!("API: Added {} method `{}` in {file}", &caps[1], &caps[3])
        }) {
            hints.push(hint);
        }
        if let Some(hint) = first_match(&CS_METHOD, removed.iter().copied(), |caps| {
            format!("API: Removed {} method `{}` from {file}", &caps[1], &caps[3])
        }) {
            hints.push(hint);
        }
        // Type declarations before properties: `public class Foo {` would
        // otherwise satisfy the property pattern
        if let Some(hint) = first_match(&CS_TYPE, added.iter().copied(), |caps| {
            format!("API: Added {} `{}` in {file}", &caps[2], &caps[3])
        }) {
            hints.push(hint);
        }
        if let Some(hint) = first_match(&CS_TYPE, removed.iter().copied(), |caps| {
            format!("API: Removed {} `{}` from {file}", &caps[2], &caps[3])
        }) {
            hints.push(hint);
        }
        if let Some(hint) = first_match(
            &CS_PROPERTY,
            added.iter().copied().filter(|l| !CS_TYPE.is_match(l)),
            |caps| format!("API: Added property `{}` in {file}", &caps[2]),
        ) {
            hints.push(hint);
        }
        if let Some(hint) = first_match(
            &CS_PROPERTY,
            removed.iter().copied().filter(|l| !CS_TYPE.is_match(l)),
            |caps| format!("API: Removed property `{}` from {file}", &caps[2]),
        ) {
            hints.push(hint);
        }

        hints
    }
}

/// Variant registry in auto-dispatch priority order: C# wins over C/C++ when
/// a commit touches both extension sets
static ANALYZERS: [&(dyn ApiAnalyzer + Sync); 2] = [&CsharpAnalyzer, &CppAnalyzer];

/// Analyze one commit under the given language mode.
///
/// `Auto` dispatches to exactly one variant per commit based on which
/// extension set is present in the touched-file list; commits touching
/// neither set yield no hints.
#[must_use]
pub fn analyze(commit: &Commit, mode: LanguageMode) -> Vec<String> {
    match mode {
        LanguageMode::Cpp => CppAnalyzer.analyze(commit),
        LanguageMode::Csharp => CsharpAnalyzer.analyze(commit),
        LanguageMode::Auto => ANALYZERS
            .iter()
            .find(|a| commit.touches_extension(a.extensions()))
            .map(|a| a.analyze(commit))
            .unwrap_or_default(),
    }
}

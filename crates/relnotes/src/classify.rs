// Copyright (c) 2026 - present Kiarash Minoo
// SPDX-License-Identifier: MIT

//! Conventional-commit classification of commit subjects

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// `type(scope): subject` — the scope is permitted and ignored
static TYPE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\w+)(\([^)]*\))?:\s*").expect("valid regex"));

/// Closed conventional-commit category set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// New feature
    Feat,
    /// Bug fix
    Fix,
    /// Performance improvement
    Perf,
    /// Code restructuring without behavior change
    Refactor,
    /// Documentation only
    Docs,
    /// Maintenance work
    Chore,
    /// Build system changes
    Build,
    /// Continuous-integration changes
    Ci,
    /// Test changes
    Test,
    /// Formatting changes
    Style,
    /// Reverted commits
    Revert,
    /// Dependency updates
    Deps,
    /// Anything without a recognized type token
    Other,
}

impl Category {
    /// All categories in fixed taxonomy (rendering) order
    pub const ALL: [Category; 13] = [
        Category::Feat,
        Category::Fix,
        Category::Perf,
        Category::Refactor,
        Category::Docs,
        Category::Chore,
        Category::Build,
        Category::Ci,
        Category::Test,
        Category::Style,
        Category::Revert,
        Category::Deps,
        Category::Other,
    ];

    /// Parse a lower-cased type token, `None` if it is not in the set
    #[must_use]
    pub fn from_token(token: &str) -> Option<Category> {
        match token {
            "feat" => Some(Category::Feat),
            "fix" => Some(Category::Fix),
            "perf" => Some(Category::Perf),
            "refactor" => Some(Category::Refactor),
            "docs" => Some(Category::Docs),
            "chore" => Some(Category::Chore),
            "build" => Some(Category::Build),
            "ci" => Some(Category::Ci),
            "test" => Some(Category::Test),
            "style" => Some(Category::Style),
            "revert" => Some(Category::Revert),
            "deps" => Some(Category::Deps),
            _ => None,
        }
    }

    /// Classify a commit subject line.
    ///
    /// The type token is matched case-insensitively; anything without a
    /// recognized `type:` or `type(scope):` prefix is `Other`. No partial or
    /// fuzzy matching.
    #[must_use]
    pub fn from_subject(subject: &str) -> Category {
        TYPE_PREFIX
            .captures(subject)
            .and_then(|caps| Category::from_token(&caps[1].to_lowercase()))
            .unwrap_or(Category::Other)
    }

    /// Section heading form ("Feat", "Fix", ...)
    #[must_use]
    pub fn title(&self) -> String {
        let name = self.to_string();
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => name,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Feat => "feat",
            Category::Fix => "fix",
            Category::Perf => "perf",
            Category::Refactor => "refactor",
            Category::Docs => "docs",
            Category::Chore => "chore",
            Category::Build => "build",
            Category::Ci => "ci",
            Category::Test => "test",
            Category::Style => "style",
            Category::Revert => "revert",
            Category::Deps => "deps",
            Category::Other => "other",
        };
        f.write_str(name)
    }
}

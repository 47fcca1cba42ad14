//! End-to-end tests for the relnotes pipeline
//!
//! Each test builds a scratch git repository with `git2`, runs the full
//! pipeline through `relnotes::run`, and inspects the rendered changelog
//! and persisted checkpoint.

use git2::{Oid, Repository, Signature, Time};
use relnotes::checkpoint::Checkpoint;
use relnotes::config::Config;
use relnotes::output::{BLOCK_BEGIN, BLOCK_END};
use relnotes::planner::PlanMode;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

struct Scratch {
    dir: TempDir,
    repo: Repository,
}

impl Scratch {
    fn new() -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let repo = Repository::init(dir.path()).expect("init repo");
        Self { dir, repo }
    }

    fn commit(&self, path: &str, content: &str, message: &str, seconds: i64) -> Oid {
        let workdir = self.repo.workdir().expect("workdir");
        let full = workdir.join(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).expect("create parent dirs");
        }
        fs::write(&full, content).expect("write file");

        let mut index = self.repo.index().expect("index");
        index.add_path(Path::new(path)).expect("stage file");
        index.write().expect("write index");
        let tree_id = index.write_tree().expect("write tree");
        let tree = self.repo.find_tree(tree_id).expect("find tree");

        let sig = Signature::new("Test Author", "test@example.com", &Time::new(seconds, 0))
            .expect("signature");
        let parent = self
            .repo
            .head()
            .ok()
            .and_then(|h| h.target())
            .map(|oid| self.repo.find_commit(oid).expect("find parent"));
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        self.repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .expect("commit")
    }

    fn tag(&self, name: &str, oid: Oid) {
        let object = self.repo.find_object(oid, None).expect("find object");
        self.repo.tag_lightweight(name, &object, false).expect("tag");
    }

    fn config(&self) -> Config {
        Config {
            repo: self.dir.path().to_path_buf(),
            output: self.dir.path().join("CHANGELOG.md"),
            state: self.dir.path().join("state.json"),
            ..Default::default()
        }
    }

    fn changelog(&self) -> String {
        fs::read_to_string(self.dir.path().join("CHANGELOG.md")).expect("read changelog")
    }
}

/// A repo with two tagged releases and one unreleased commit
fn tagged_scratch() -> Scratch {
    let scratch = Scratch::new();
    let first = scratch.commit(
        "src/api.h",
        "int compute_sum(int a, int b);\n",
        "feat: initial api",
        1_000_000,
    );
    let second = scratch.commit(
        "src/api.h",
        "int compute_sum(int a, int b);\nint normalize(int value);\n",
        "fix: null check",
        1_000_500,
    );
    scratch.commit(
        "src/api.h",
        "int compute_sum(int a, int b);\nint normalize(int value);\nint widen(int value);\n",
        "docs: document api",
        1_001_000,
    );
    scratch.tag("v0.1.0", first);
    scratch.tag("v0.2.0", second);
    scratch
}

#[test]
fn test_full_run_renders_all_ranges() {
    let scratch = tagged_scratch();
    let mode = relnotes::run(&scratch.config()).expect("run");
    assert_eq!(mode, PlanMode::Full);

    let changelog = scratch.changelog();
    assert!(changelog.starts_with(BLOCK_BEGIN));
    assert!(changelog.contains("# Changelog"));
    assert!(changelog.contains("## [Unreleased]"));
    // Newest tag has no newer predecessor, so no compare link
    assert!(changelog.contains("## v0.2.0"));
    assert!(changelog.contains("## [v0.1.0]"));
    assert!(changelog.contains("compare/v0.1.0...v0.2.0"));
    assert!(changelog.contains(BLOCK_END));
}

#[test]
fn test_full_run_groups_by_category() {
    let scratch = tagged_scratch();
    relnotes::run(&scratch.config()).expect("run");

    let changelog = scratch.changelog();
    assert!(changelog.contains("### Docs"));
    assert!(changelog.contains("docs: document api"));
    assert!(changelog.contains("### Fix"));
    assert!(changelog.contains("fix: null check"));
}

#[test]
fn test_full_run_emits_api_hints() {
    let scratch = tagged_scratch();
    relnotes::run(&scratch.config()).expect("run");

    // Default mode is api-changes; the unreleased commit adds a declaration
    let changelog = scratch.changelog();
    assert!(changelog.contains("API: Added function `widen` in src/api.h"));
}

#[test]
fn test_checkpoint_written_at_head() {
    let scratch = tagged_scratch();
    let config = scratch.config();
    relnotes::run(&config).expect("run");

    let checkpoint = Checkpoint::load(&config.state).expect("state file");
    let head = scratch.repo.head().unwrap().target().unwrap().to_string();
    assert_eq!(checkpoint.last_processed_sha, head);
    assert_eq!(checkpoint.output_file, config.output);
}

#[test]
fn test_second_run_is_up_to_date_and_keeps_output() {
    let scratch = tagged_scratch();
    let config = scratch.config();
    relnotes::run(&config).expect("first run");
    let first = scratch.changelog();

    let mode = relnotes::run(&config).expect("second run");
    assert_eq!(mode, PlanMode::UpToDate);
    // No-op runs leave the changelog untouched but still rewrite the state
    assert_eq!(scratch.changelog(), first);
    assert!(Checkpoint::load(&config.state).is_some());
}

#[test]
fn test_new_commit_triggers_incremental_run() {
    let scratch = tagged_scratch();
    let config = scratch.config();
    relnotes::run(&config).expect("first run");

    scratch.commit(
        "src/api.h",
        "int compute_sum(int a, int b);\n",
        "perf: drop dead declarations",
        1_002_000,
    );
    let mode = relnotes::run(&config).expect("second run");
    assert_eq!(mode, PlanMode::Incremental);

    let changelog = scratch.changelog();
    assert!(changelog.contains("## Unreleased"));
    assert!(changelog.contains("perf: drop dead declarations"));
}

#[test]
fn test_refresh_forces_full_recompute() {
    let scratch = tagged_scratch();
    let mut config = scratch.config();
    relnotes::run(&config).expect("first run");

    config.refresh = true;
    let mode = relnotes::run(&config).expect("refresh run");
    assert_eq!(mode, PlanMode::Full);
    assert!(scratch.changelog().contains("## [v0.1.0]"));
}

#[test]
fn test_full_mode_output_is_idempotent() {
    let scratch = tagged_scratch();
    let mut config = scratch.config();
    config.refresh = true;

    relnotes::run(&config).expect("first run");
    let first = scratch.changelog();
    relnotes::run(&config).expect("second run");
    assert_eq!(scratch.changelog(), first);
}

#[test]
fn test_reset_all_overwrites_surrounding_content() {
    let scratch = tagged_scratch();
    let mut config = scratch.config();
    relnotes::run(&config).expect("first run");

    let seeded = format!("hand-written intro\n{}", scratch.changelog());
    fs::write(&config.output, seeded).expect("seed");

    config.reset_all = true;
    relnotes::run(&config).expect("reset run");
    let changelog = scratch.changelog();
    assert!(!changelog.contains("hand-written intro"));
    assert!(changelog.starts_with(BLOCK_BEGIN));
    // reset also clears the state file before planning
    assert!(Checkpoint::load(&config.state).is_some());
}

#[test]
fn test_managed_block_preserves_surroundings_on_incremental() {
    let scratch = tagged_scratch();
    let config = scratch.config();
    relnotes::run(&config).expect("first run");

    let seeded = format!("intro\n{}outro\n", scratch.changelog());
    fs::write(&config.output, seeded).expect("seed");

    scratch.commit(
        "src/api.h",
        "int trimmed(void);\n",
        "refactor: trim api",
        1_003_000,
    );
    relnotes::run(&config).expect("incremental run");

    let changelog = scratch.changelog();
    assert!(changelog.starts_with("intro\n"));
    assert!(changelog.ends_with("outro\n"));
    assert!(changelog.contains("refactor: trim api"));
}

#[test]
fn test_untagged_repository_renders_single_section() {
    let scratch = Scratch::new();
    scratch.commit("src/a.h", "int a;\n", "feat: one", 1_000_000);
    scratch.commit("src/a.h", "int a;\nint b;\n", "fix: two", 1_000_500);

    let mode = relnotes::run(&scratch.config()).expect("run");
    assert_eq!(mode, PlanMode::Full);

    let changelog = scratch.changelog();
    assert!(changelog.contains("## Unreleased"));
    assert!(changelog.contains("feat: one"));
    assert!(changelog.contains("fix: two"));
}

#[test]
fn test_empty_repository_is_fatal() {
    let scratch = Scratch::new();
    assert!(relnotes::run(&scratch.config()).is_err());
}

#[test]
fn test_path_exclude_drops_commits() {
    let scratch = Scratch::new();
    scratch.commit("src/a.h", "int a;\n", "feat: keep me", 1_000_000);
    scratch.commit("vendor/lib.h", "int v;\n", "chore: vendored drop", 1_000_500);

    let mut config = scratch.config();
    config.path_exclude = "vendor/**".to_string();
    relnotes::run(&config).expect("run");

    let changelog = scratch.changelog();
    assert!(changelog.contains("feat: keep me"));
    assert!(!changelog.contains("chore: vendored drop"));
}

#[test]
fn test_skip_types_excluded_from_output() {
    let scratch = Scratch::new();
    scratch.commit("src/a.h", "int a;\n", "feat: keep me", 1_000_000);
    scratch.commit("src/a.h", "int a;\nint b;\n", "chore: bump", 1_000_500);

    let mut config = scratch.config();
    config.skip_types = "chore".to_string();
    relnotes::run(&config).expect("run");

    let changelog = scratch.changelog();
    assert!(changelog.contains("### Feat"));
    assert!(!changelog.contains("### Chore"));
}

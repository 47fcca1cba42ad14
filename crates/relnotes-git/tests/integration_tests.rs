//! Integration tests for relnotes-git
//!
//! These tests build scratch git repositories with `git2` and verify history
//! queries and diff parsing end to end.

use git2::{Oid, Repository, Signature, Time};
use regex::Regex;
use relnotes_git::repo::DetailOptions;
use relnotes_git::{CommitMeta, DiffLimits, GitRepo, History, parse_hunks};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn scratch_repo() -> (TempDir, Repository) {
    let dir = TempDir::new().expect("create temp dir");
    let repo = Repository::init(dir.path()).expect("init repo");
    (dir, repo)
}

/// Write a file, stage it, and commit with a fixed author time
fn commit_file(repo: &Repository, path: &str, content: &str, message: &str, seconds: i64) -> Oid {
    let workdir = repo.workdir().expect("workdir");
    let full = workdir.join(path);
    if let Some(parent) = full.parent() {
        fs::create_dir_all(parent).expect("create parent dirs");
    }
    fs::write(&full, content).expect("write file");

    let mut index = repo.index().expect("index");
    index.add_path(Path::new(path)).expect("stage file");
    index.write().expect("write index");
    let tree_id = index.write_tree().expect("write tree");
    let tree = repo.find_tree(tree_id).expect("find tree");

    let sig = Signature::new("Test Author", "test@example.com", &Time::new(seconds, 0))
        .expect("signature");
    let parent = repo
        .head()
        .ok()
        .and_then(|h| h.target())
        .map(|oid| repo.find_commit(oid).expect("find parent"));
    let parents: Vec<&git2::Commit> = parent.iter().collect();

    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
        .expect("commit")
}

fn tag(repo: &Repository, name: &str, oid: Oid) {
    let object = repo.find_object(oid, None).expect("find object");
    repo.tag_lightweight(name, &object, false).expect("tag");
}

#[test]
fn test_head_sha_tracks_latest_commit() {
    let (dir, repo) = scratch_repo();
    commit_file(&repo, "a.txt", "one", "chore: initial commit", 1_000_000);
    let second = commit_file(&repo, "a.txt", "two", "fix: adjust a", 1_000_100);

    let history = GitRepo::open(dir.path()).expect("open");
    let head = history.head_sha().expect("head");
    assert_eq!(head, second.to_string());
    assert!(CommitMeta::is_valid_sha(&head));
}

#[test]
fn test_head_sha_fails_on_empty_repository() {
    let (dir, _repo) = scratch_repo();
    let history = GitRepo::open(dir.path()).expect("open");
    assert!(history.head_sha().is_err());
}

#[test]
fn test_current_branch_is_named() {
    let (dir, repo) = scratch_repo();
    commit_file(&repo, "a.txt", "one", "chore: initial commit", 1_000_000);

    let history = GitRepo::open(dir.path()).expect("open");
    let branch = history.current_branch().expect("branch");
    assert!(!branch.is_empty());
    assert_ne!(branch, "HEAD");
}

#[test]
fn test_list_tags_filtered_newest_first() {
    let (dir, repo) = scratch_repo();
    let first = commit_file(&repo, "a.txt", "one", "feat: one", 1_000_000);
    let second = commit_file(&repo, "a.txt", "two", "feat: two", 1_000_500);
    commit_file(&repo, "a.txt", "three", "feat: three", 1_001_000);

    tag(&repo, "v0.1.0", first);
    tag(&repo, "v0.2.0", second);
    tag(&repo, "nightly", second);

    let history = GitRepo::open(dir.path()).expect("open");
    let filter = Regex::new(r"^v?\d+\.\d+\.\d+$").expect("regex");
    let tags = history.list_tags(&filter).expect("tags");

    let names: Vec<&str> = tags.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["v0.2.0", "v0.1.0"]);
}

#[test]
fn test_is_ancestor_and_equality() {
    let (dir, repo) = scratch_repo();
    let first = commit_file(&repo, "a.txt", "one", "feat: one", 1_000_000);
    let second = commit_file(&repo, "a.txt", "two", "feat: two", 1_000_500);

    let history = GitRepo::open(dir.path()).expect("open");
    assert!(
        history
            .is_ancestor(&first.to_string(), &second.to_string())
            .expect("query")
    );
    assert!(
        !history
            .is_ancestor(&second.to_string(), &first.to_string())
            .expect("query")
    );
    // Ancestor-or-equal: a commit is an ancestor of itself
    assert!(
        history
            .is_ancestor(&second.to_string(), &second.to_string())
            .expect("query")
    );
}

#[test]
fn test_log_range_dotdot_excludes_lower_bound() {
    let (dir, repo) = scratch_repo();
    let first = commit_file(&repo, "a.txt", "one", "feat: one", 1_000_000);
    commit_file(&repo, "a.txt", "two", "fix: two", 1_000_500);
    let third = commit_file(&repo, "a.txt", "three", "docs: three", 1_001_000);

    let history = GitRepo::open(dir.path()).expect("open");
    let commits = history
        .log_range(&format!("{}..{}", first, third))
        .expect("log");

    let subjects: Vec<&str> = commits.iter().map(|c| c.subject.as_str()).collect();
    assert_eq!(subjects, vec!["docs: three", "fix: two"]);
}

#[test]
fn test_log_range_caret_bang_is_single_commit() {
    let (dir, repo) = scratch_repo();
    commit_file(&repo, "a.txt", "one", "feat: one", 1_000_000);
    let second = commit_file(&repo, "a.txt", "two", "fix: two", 1_000_500);

    let history = GitRepo::open(dir.path()).expect("open");
    let commits = history.log_range(&format!("{}^!", second)).expect("log");
    assert_eq!(commits.len(), 1);
    assert_eq!(commits[0].subject, "fix: two");
}

#[test]
fn test_log_range_bare_revision_is_full_history() {
    let (dir, repo) = scratch_repo();
    commit_file(&repo, "a.txt", "one", "feat: one", 1_000_000);
    commit_file(&repo, "a.txt", "two", "fix: two", 1_000_500);
    let third = commit_file(&repo, "a.txt", "three", "docs: three", 1_001_000);

    let history = GitRepo::open(dir.path()).expect("open");
    let commits = history.log_range(&third.to_string()).expect("log");
    assert_eq!(commits.len(), 3);
    // Newest first
    assert_eq!(commits[0].subject, "docs: three");
    assert_eq!(commits[2].subject, "feat: one");
}

#[test]
fn test_log_range_invalid_spec_errors() {
    let (dir, repo) = scratch_repo();
    commit_file(&repo, "a.txt", "one", "feat: one", 1_000_000);

    let history = GitRepo::open(dir.path()).expect("open");
    assert!(history.log_range("does-not-exist..HEAD").is_err());
}

#[test]
fn test_commit_detail_files_and_diff() {
    let (dir, repo) = scratch_repo();
    commit_file(&repo, "src/a.h", "int old_fn(int x);\n", "feat: add header", 1_000_000);
    let second = commit_file(
        &repo,
        "src/a.h",
        "int old_fn(int x);\nint compute_sum(int a, int b);\n",
        "feat: extend api",
        1_000_500,
    );

    let history = GitRepo::open(dir.path()).expect("open");
    let detail = history
        .commit_detail(&second.to_string(), &DetailOptions::default())
        .expect("detail");

    assert_eq!(detail.meta.subject, "feat: extend api");
    assert_eq!(detail.files.len(), 1);
    assert_eq!(detail.files[0].path, "src/a.h");
    assert!(detail.raw_diff.contains("diff --git"));
    assert!(detail.raw_diff.contains("+int compute_sum(int a, int b);"));
}

#[test]
fn test_commit_detail_root_commit_diffs_against_empty() {
    let (dir, repo) = scratch_repo();
    let root = commit_file(&repo, "a.txt", "hello\n", "chore: initial commit", 1_000_000);

    let history = GitRepo::open(dir.path()).expect("open");
    let detail = history
        .commit_detail(&root.to_string(), &DetailOptions::default())
        .expect("detail");
    assert_eq!(detail.files.len(), 1);
    assert!(detail.raw_diff.contains("+hello"));
}

#[test]
fn test_detail_feeds_hunk_parser() {
    let (dir, repo) = scratch_repo();
    commit_file(&repo, "src/a.h", "int a;\n", "feat: one", 1_000_000);
    let second = commit_file(&repo, "src/a.h", "int a;\nint b;\n", "feat: two", 1_000_500);

    let history = GitRepo::open(dir.path()).expect("open");
    let detail = history
        .commit_detail(&second.to_string(), &DetailOptions::default())
        .expect("detail");

    let hunks = parse_hunks(&detail.raw_diff, &DiffLimits::default());
    assert_eq!(hunks.len(), 1);
    assert_eq!(hunks[0].file, "src/a.h");
    assert!(hunks[0].added_lines().any(|l| l == "int b;"));
}

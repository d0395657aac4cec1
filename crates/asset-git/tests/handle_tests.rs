//! RepositoryHandle against the real git client

use asset_git::{Error, RepositoryHandle, SystemGit};
use asset_test_utils::UpstreamRepo;
use asset_test_utils::git::{git, head_detached, head_revision};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

fn workspace() -> (TempDir, RepositoryHandle) {
    let temp = TempDir::new().unwrap();
    let parent = RepositoryHandle::at(temp.path(), Arc::new(SystemGit::new()));
    (temp, parent)
}

fn clone_upstream(upstream: &UpstreamRepo) -> (TempDir, RepositoryHandle) {
    let (temp, parent) = workspace();
    let repo = parent.clone_into(&upstream.url(), "checkout", Some("main")).unwrap();
    (temp, repo)
}

// ============================================================================
// Clone
// ============================================================================

#[test]
fn test_clone_into_creates_repository_at_head() {
    let upstream = UpstreamRepo::new();
    let (temp, repo) = clone_upstream(&upstream);

    assert_eq!(repo.path(), temp.path().join("checkout"));
    assert!(repo.path().join(".git").is_dir());
    assert_eq!(repo.current_revision().unwrap(), upstream.head());
    assert_eq!(repo.current_branch().unwrap().as_deref(), Some("main"));
}

#[test]
fn test_clone_into_selects_branch() {
    let upstream = UpstreamRepo::new();
    let main_head = upstream.head();
    upstream.create_branch("release");
    upstream.checkout("release");
    let release_head = upstream.commit_file("notes.txt", "v1");
    upstream.checkout("main");

    let (_temp, parent) = workspace();
    let repo = parent
        .clone_into(&upstream.url(), "rel", Some("release"))
        .unwrap();

    assert_eq!(repo.current_branch().unwrap().as_deref(), Some("release"));
    assert_eq!(repo.current_revision().unwrap(), release_head);
    assert!(repo.has_revision(&main_head).unwrap());
}

#[test]
fn test_clone_of_missing_remote_reports_command() {
    let (temp, parent) = workspace();
    let missing = temp.path().join("no-such-upstream");

    let err = parent
        .clone_into(&missing.to_string_lossy(), "x", None)
        .unwrap_err();

    match &err {
        Error::CommandFailed { command, stderr, .. } => {
            assert!(command.starts_with("git clone"), "got: {command}");
            assert!(!stderr.is_empty());
        }
        other => panic!("expected CommandFailed, got {other:?}"),
    }
    assert!(!temp.path().join("x").exists());
}

// ============================================================================
// Queries
// ============================================================================

#[test]
fn test_open_rejects_directory_nested_in_repository() {
    let upstream = UpstreamRepo::new();
    let nested = upstream.path().join("nested");
    fs::create_dir(&nested).unwrap();

    let err = RepositoryHandle::open_system(&nested).unwrap_err();
    assert!(matches!(err, Error::NotARepository { .. }));
    assert!(RepositoryHandle::open_system(upstream.path()).is_ok());
}

#[test]
fn test_has_revision_distinguishes_known_and_unknown() {
    let upstream = UpstreamRepo::new();
    let repo = RepositoryHandle::open_system(upstream.path()).unwrap();

    assert!(repo.has_revision(&upstream.head()).unwrap());
    assert!(repo.has_revision(&upstream.head()[..8]).unwrap());
    assert!(
        !repo
            .has_revision("0123456789abcdef0123456789abcdef01234567")
            .unwrap()
    );
}

#[test]
fn test_current_branch_is_none_when_detached() {
    let upstream = UpstreamRepo::new();
    let first = upstream.head();
    upstream.commit_file("a.txt", "a");
    let repo = RepositoryHandle::open_system(upstream.path()).unwrap();

    repo.checkout(&first).unwrap();

    assert!(head_detached(upstream.path()));
    assert_eq!(repo.current_branch().unwrap(), None);
    assert_eq!(repo.current_revision().unwrap(), first);
}

#[test]
fn test_history_queries() {
    let upstream = UpstreamRepo::new();
    upstream.commit_file("a.txt", "alpha");
    let repo = RepositoryHandle::open_system(upstream.path()).unwrap();

    assert_eq!(
        repo.commit_messages(2).unwrap(),
        vec!["update a.txt", "Initial commit"]
    );
    assert_eq!(repo.author_email(None).unwrap(), "test@test.com");
    assert_eq!(repo.branch_file("main", "a.txt").unwrap(), "alpha");
    assert!(repo.branch_exists("main").unwrap());
    assert!(!repo.branch_exists("ghost").unwrap());
}

#[test]
fn test_remotes_of_clone() {
    let upstream = UpstreamRepo::new();
    let (_temp, repo) = clone_upstream(&upstream);
    assert_eq!(repo.remotes().unwrap(), vec!["origin"]);
}

// ============================================================================
// Mutations
// ============================================================================

#[test]
fn test_pull_fast_forwards_to_upstream() {
    let upstream = UpstreamRepo::new();
    let (_temp, repo) = clone_upstream(&upstream);
    let advanced = upstream.commit_file("data.txt", "more");

    repo.pull("origin", "main").unwrap();

    assert_eq!(head_revision(repo.path()), advanced);
    assert_eq!(fs::read_to_string(repo.path().join("data.txt")).unwrap(), "more");
}

#[test]
fn test_fetch_then_checkout_unseen_revision() {
    let upstream = UpstreamRepo::new();
    let (_temp, repo) = clone_upstream(&upstream);
    let later = upstream.commit_file("late.txt", "late");
    assert!(!repo.has_revision(&later).unwrap());

    repo.fetch("origin").unwrap();
    assert!(repo.has_revision(&later).unwrap());

    repo.checkout(&later).unwrap();
    assert_eq!(repo.current_revision().unwrap(), later);
}

#[test]
fn test_hard_reset_discards_worktree_changes() {
    let upstream = UpstreamRepo::new();
    let repo = RepositoryHandle::open_system(upstream.path()).unwrap();
    fs::write(upstream.path().join("README.md"), "scribbled").unwrap();

    repo.hard_reset("HEAD").unwrap();

    assert_eq!(
        fs::read_to_string(upstream.path().join("README.md")).unwrap(),
        "# Test"
    );
}

#[test]
fn test_branch_lifecycle() {
    let upstream = UpstreamRepo::new();
    let repo = RepositoryHandle::open_system(upstream.path()).unwrap();

    repo.checkout_branch("topic", None).unwrap();
    assert_eq!(repo.current_branch().unwrap().as_deref(), Some("topic"));

    repo.checkout("main").unwrap();
    repo.remove_branch("topic", false).unwrap();
    assert!(!repo.branch_exists("topic").unwrap());
}

#[test]
fn test_on_branch_restores_checkout() {
    let upstream = UpstreamRepo::new();
    upstream.create_branch("docs");
    let repo = RepositoryHandle::open_system(upstream.path()).unwrap();

    let inside = repo
        .on_branch("docs", |r| r.current_branch())
        .unwrap();
    assert_eq!(inside.as_deref(), Some("docs"));
    assert_eq!(repo.current_branch().unwrap().as_deref(), Some("main"));

    let failed: Result<(), Error> = repo.on_branch("docs", |r| r.merge("no-such-branch"));
    assert!(failed.is_err());
    assert_eq!(repo.current_branch().unwrap().as_deref(), Some("main"));
}

#[test]
fn test_cherry_pick_applies_commit_from_other_branch() {
    let upstream = UpstreamRepo::new();
    upstream.create_branch("side");
    upstream.checkout("side");
    let picked = upstream.commit_file("side.txt", "side");
    upstream.checkout("main");

    let repo = RepositoryHandle::open_system(upstream.path()).unwrap();
    repo.cherry_pick(&[&picked]).unwrap();

    assert_eq!(
        fs::read_to_string(upstream.path().join("side.txt")).unwrap(),
        "side"
    );
    assert_eq!(repo.commit_messages(1).unwrap(), vec!["update side.txt"]);
}

#[test]
fn test_apply_patch_series_from_format_patch() {
    let upstream = UpstreamRepo::new();
    let base = upstream.head();
    upstream.commit_file("patched.txt", "one");
    upstream.commit_file("patched.txt", "two");

    let patches_dir = TempDir::new().unwrap();
    let out = patches_dir.path().to_string_lossy().into_owned();
    git(upstream.path(), &["format-patch", "-q", "-2", "-o", &out]);
    let mut patches: Vec<_> = fs::read_dir(patches_dir.path())
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    patches.sort();

    let repo = RepositoryHandle::open_system(upstream.path()).unwrap();
    repo.hard_reset(&base).unwrap();
    repo.apply_patch_series(&patches, false).unwrap();

    assert_eq!(
        fs::read_to_string(Path::new(upstream.path()).join("patched.txt")).unwrap(),
        "two"
    );
    assert_eq!(repo.commit_messages(3).unwrap().len(), 3);
}

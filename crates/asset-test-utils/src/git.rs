//! Git repository fixtures.
//!
//! Repositories are built with the `git` CLI (the same client the code under
//! test drives) and inspected with `git2`, so assertions do not depend on the
//! code under test.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Run `git <args>` in `dir`, panicking with stderr on failure.
///
/// Returns trimmed stdout.
///
/// # Panics
/// Panics if git cannot be spawned or exits unsuccessfully.
pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .env("GIT_TERMINAL_PROMPT", "0")
        .output()
        .unwrap_or_else(|e| panic!("git: failed to run `git {args:?}`: {e}"));
    if !output.status.success() {
        panic!(
            "git: `git {args:?}` failed in {}:\n{}",
            dir.display(),
            String::from_utf8_lossy(&output.stderr)
        );
    }
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Initialises a real git repository with an initial commit on `main`.
///
/// Specifically:
/// - Runs `git init`
/// - Configures `user.email`, `user.name`, and `commit.gpgsign = false`
/// - Creates `README.md` and makes an initial commit
/// - Renames the default branch to `main`
///
/// # Panics
/// Panics if any git operation fails.
pub fn real_git_repo_with_commit(path: &Path) {
    fs::create_dir_all(path)
        .unwrap_or_else(|e| panic!("real_git_repo_with_commit: mkdir failed: {e}"));
    git(path, &["init", "-q"]);
    git(path, &["config", "user.email", "test@test.com"]);
    git(path, &["config", "user.name", "Test User"]);
    git(path, &["config", "commit.gpgsign", "false"]);

    fs::write(path.join("README.md"), "# Test")
        .unwrap_or_else(|e| panic!("real_git_repo_with_commit: failed to write README.md: {e}"));

    git(path, &["add", "."]);
    git(path, &["commit", "-q", "-m", "Initial commit"]);
    git(path, &["branch", "-M", "main"]);
}

/// Full object id of `HEAD` in the repository at `path`, read with `git2`.
///
/// # Panics
/// Panics if the repository cannot be opened or has no commits.
pub fn head_revision(path: &Path) -> String {
    let repo = git2::Repository::open(path)
        .unwrap_or_else(|e| panic!("head_revision: cannot open {}: {e}", path.display()));
    let head = repo
        .head()
        .and_then(|h| h.peel_to_commit())
        .unwrap_or_else(|e| panic!("head_revision: no HEAD commit in {}: {e}", path.display()));
    head.id().to_string()
}

/// Whether `HEAD` in the repository at `path` is detached, read with `git2`.
pub fn head_detached(path: &Path) -> bool {
    git2::Repository::open(path)
        .and_then(|r| r.head_detached())
        .unwrap_or_else(|e| panic!("head_detached: cannot open {}: {e}", path.display()))
}

/// An upstream repository that tests clone from and push commits into.
///
/// Lives in its own temporary directory and is addressed by filesystem path,
/// which git accepts as a clone URL.
pub struct UpstreamRepo {
    _temp: tempfile::TempDir,
    path: PathBuf,
}

impl Default for UpstreamRepo {
    fn default() -> Self {
        Self::new()
    }
}

impl UpstreamRepo {
    /// Create an upstream with one commit on `main`.
    pub fn new() -> Self {
        let temp = tempfile::TempDir::new().expect("UpstreamRepo: tempdir");
        let path = temp.path().join("upstream");
        real_git_repo_with_commit(&path);
        Self { _temp: temp, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Clone URL for this upstream.
    pub fn url(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }

    /// Commit `content` to `file` on the current branch and return the new
    /// revision.
    pub fn commit_file(&self, file: &str, content: &str) -> String {
        let target = self.path.join(file);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).expect("UpstreamRepo: mkdir");
        }
        fs::write(&target, content).expect("UpstreamRepo: write");
        git(&self.path, &["add", file]);
        git(&self.path, &["commit", "-q", "-m", &format!("update {file}")]);
        self.head()
    }

    /// Create `branch` at the current `HEAD` without switching to it.
    pub fn create_branch(&self, branch: &str) {
        git(&self.path, &["branch", branch]);
    }

    pub fn checkout(&self, reference: &str) {
        git(&self.path, &["checkout", "-q", reference]);
    }

    pub fn head(&self) -> String {
        head_revision(&self.path)
    }
}

//! Command proxy bound to one local repository path
//!
//! Every method maps to a single git subcommand (or a short fixed sequence)
//! run with the handle's path as working directory. A non-zero exit becomes
//! [`Error::CommandFailed`] carrying the command line and captured stderr.
//! Nothing is retried.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::runner::{GitRunner, SystemGit, render_command};
use crate::{Error, Result};

/// A git repository (or, for [`RepositoryHandle::clone_into`], the directory
/// a repository will be cloned into) addressed by path.
#[derive(Clone)]
pub struct RepositoryHandle {
    path: PathBuf,
    runner: Arc<dyn GitRunner>,
}

impl std::fmt::Debug for RepositoryHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RepositoryHandle")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl RepositoryHandle {
    /// Bind to `path` without checking what is there.
    ///
    /// Used for the parent directory of a clone, which is not itself a
    /// repository.
    pub fn at(path: impl Into<PathBuf>, runner: Arc<dyn GitRunner>) -> Self {
        let path = path.into();
        tracing::debug!(path = %path.display(), "created git repository handle");
        Self { path, runner }
    }

    /// Bind to an existing repository rooted at `path`.
    ///
    /// `path` must contain a `.git` entry (directory, or file for linked
    /// worktrees). A directory nested inside some other repository does not
    /// qualify, so commands can never leak into an enclosing checkout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotARepository`] if `path` has no `.git` entry.
    pub fn open(path: impl Into<PathBuf>, runner: Arc<dyn GitRunner>) -> Result<Self> {
        let path = path.into();
        if !path.join(".git").exists() {
            return Err(Error::NotARepository { path });
        }
        Ok(Self::at(path, runner))
    }

    /// [`RepositoryHandle::open`] with the system `git` client.
    pub fn open_system(path: impl Into<PathBuf>) -> Result<Self> {
        Self::open(path, Arc::new(SystemGit::new()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn runner(&self) -> &Arc<dyn GitRunner> {
        &self.runner
    }

    fn run(&self, args: &[&str]) -> Result<String> {
        let output = self.runner.exec(&self.path, args)?;
        if output.is_success() {
            Ok(output.stdout)
        } else {
            Err(Error::CommandFailed {
                command: render_command(args),
                path: self.path.clone(),
                code: output.code,
                stderr: output.stderr,
            })
        }
    }

    fn run_trimmed(&self, args: &[&str]) -> Result<String> {
        self.run(args).map(|out| out.trim().to_string())
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Full object id of `HEAD`.
    pub fn current_revision(&self) -> Result<String> {
        self.revision("HEAD")
    }

    /// Full object id of `reference`.
    pub fn revision(&self, reference: &str) -> Result<String> {
        self.run_trimmed(&["rev-parse", "--verify", reference])
    }

    /// Whether `revision` names a commit already present locally.
    pub fn has_revision(&self, revision: &str) -> Result<bool> {
        let spec = format!("{revision}^{{commit}}");
        let output = self.runner.exec(&self.path, &["cat-file", "-e", &spec])?;
        Ok(output.is_success())
    }

    /// Short name of the checked-out branch, `None` when `HEAD` is detached.
    pub fn current_branch(&self) -> Result<Option<String>> {
        let args = ["symbolic-ref", "-q", "--short", "HEAD"];
        let output = self.runner.exec(&self.path, &args)?;
        match output.code {
            Some(0) => Ok(Some(output.stdout.trim().to_string())),
            // `symbolic-ref -q` exits 1 without a message for a detached HEAD.
            Some(1) if output.stderr.trim().is_empty() => Ok(None),
            code => Err(Error::CommandFailed {
                command: render_command(&args),
                path: self.path.clone(),
                code,
                stderr: output.stderr,
            }),
        }
    }

    /// Whether a local branch called `name` exists.
    pub fn branch_exists(&self, name: &str) -> Result<bool> {
        let listing = self.run(&["branch", "--list", name])?;
        Ok(listing
            .lines()
            .map(|line| line.trim_start_matches(['*', '+', ' ']).trim())
            .any(|branch| branch == name))
    }

    /// Names of the configured remotes.
    pub fn remotes(&self) -> Result<Vec<String>> {
        let listing = self.run(&["remote"])?;
        Ok(listing
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect())
    }

    /// Author email of `revision` (default `HEAD`).
    pub fn author_email(&self, revision: Option<&str>) -> Result<String> {
        self.run_trimmed(&["log", "-1", "--format=%ae", revision.unwrap_or("HEAD")])
    }

    /// Content of `path` as committed on `branch`.
    pub fn branch_file(&self, branch: &str, path: &str) -> Result<String> {
        self.run(&["show", &format!("{branch}:{path}")])
    }

    /// Subject lines of the last `count` commits, newest first.
    pub fn commit_messages(&self, count: usize) -> Result<Vec<String>> {
        let max = format!("--max-count={count}");
        let log = self.run(&["log", "--format=%s", &max])?;
        Ok(log.lines().map(String::from).collect())
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// Clone `remote` into `<self.path>/<target_name>`, optionally checking
    /// out `branch`. Returns a handle on the new repository.
    pub fn clone_into(
        &self,
        remote: &str,
        target_name: &str,
        branch: Option<&str>,
    ) -> Result<RepositoryHandle> {
        if target_name.is_empty() || target_name.contains(['/', '\\']) {
            return Err(Error::InvalidCloneTarget {
                path: self.path.join(target_name),
            });
        }

        let mut args = vec!["clone"];
        if let Some(branch) = branch {
            args.extend(["--branch", branch]);
        }
        args.extend(["--", remote, target_name]);
        self.run(&args)?;

        Ok(Self::at(self.path.join(target_name), Arc::clone(&self.runner)))
    }

    pub fn checkout(&self, reference: &str) -> Result<()> {
        self.run(&["checkout", reference]).map(drop)
    }

    /// Switch to branch `name`, creating it (from `tracking` when given) if it
    /// does not exist yet. Does nothing when `name` is already checked out.
    pub fn checkout_branch(&self, name: &str, tracking: Option<&str>) -> Result<()> {
        if self.current_branch()?.as_deref() == Some(name) {
            return Ok(());
        }

        let mut args = vec!["checkout"];
        if !self.branch_exists(name)? {
            args.push("-b");
        }
        args.push(name);
        if let Some(tracking) = tracking {
            args.push(tracking);
        }
        self.run(&args).map(drop)
    }

    pub fn create_branch(&self, name: &str, tracking: Option<&str>) -> Result<()> {
        let mut args = vec!["branch", name];
        args.extend(tracking);
        self.run(&args).map(drop)
    }

    pub fn remove_branch(&self, name: &str, force: bool) -> Result<()> {
        let flag = if force { "-D" } else { "-d" };
        self.run(&["branch", flag, name]).map(drop)
    }

    pub fn rebase(&self, onto: &str) -> Result<()> {
        self.run(&["rebase", onto]).map(drop)
    }

    pub fn merge(&self, branch: &str) -> Result<()> {
        self.run(&["merge", branch]).map(drop)
    }

    pub fn hard_reset(&self, reference: &str) -> Result<()> {
        self.run(&["reset", "--hard", reference]).map(drop)
    }

    pub fn reset(&self, reference: &str) -> Result<()> {
        self.run(&["reset", reference]).map(drop)
    }

    pub fn fetch(&self, remote: &str) -> Result<()> {
        self.run(&["fetch", remote]).map(drop)
    }

    /// Fast-forward the current branch to `remote`/`branch`.
    ///
    /// Fails rather than creating a merge commit when the histories diverged.
    pub fn pull(&self, remote: &str, branch: &str) -> Result<()> {
        self.run(&["pull", "--ff-only", remote, branch]).map(drop)
    }

    /// Rebase local work onto the upstream of the current branch.
    pub fn update(&self) -> Result<()> {
        self.run(&["pull", "--rebase"]).map(drop)
    }

    /// Cherry-pick `commits` one at a time, stopping at the first failure.
    pub fn cherry_pick(&self, commits: &[&str]) -> Result<()> {
        for commit in commits {
            self.run(&["cherry-pick", commit])?;
            tracing::info!(commit = %commit, path = %self.path.display(), "cherry picked");
        }
        Ok(())
    }

    /// Apply a series of mailbox patch files with a three-way fallback.
    pub fn apply_patch_series(&self, patches: &[PathBuf], sign_off: bool) -> Result<()> {
        if patches.is_empty() {
            return Ok(());
        }

        let patch_args: Vec<String> = patches
            .iter()
            .map(|p| p.to_string_lossy().into_owned())
            .collect();
        let mut args = vec!["am", "--3way"];
        if sign_off {
            args.push("--signoff");
        }
        args.extend(patch_args.iter().map(String::as_str));
        self.run(&args)?;

        tracing::info!(count = patches.len(), path = %self.path.display(), "applied patch series");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Scoped branch switching
    // ------------------------------------------------------------------

    /// Check out `name` until the returned guard is restored or dropped.
    ///
    /// The guard puts back whatever was checked out before: the original
    /// branch, or the original commit if `HEAD` was detached.
    pub fn switch_to(&self, name: &str) -> Result<BranchGuard<'_>> {
        let starting = match self.current_branch()? {
            Some(branch) => branch,
            None => self.current_revision()?,
        };

        if starting == name {
            return Ok(BranchGuard {
                repo: self,
                restore_to: None,
            });
        }

        self.checkout(name)?;
        Ok(BranchGuard {
            repo: self,
            restore_to: Some(starting),
        })
    }

    /// Run `body` with `name` checked out, then restore the prior checkout.
    ///
    /// The prior checkout is restored on every exit path. If `body` fails,
    /// its error is returned even when restoring also fails.
    pub fn on_branch<T, E, F>(&self, name: &str, body: F) -> std::result::Result<T, E>
    where
        F: FnOnce(&Self) -> std::result::Result<T, E>,
        E: From<Error>,
    {
        let guard = self.switch_to(name)?;
        match body(self) {
            Ok(value) => {
                guard.restore()?;
                Ok(value)
            }
            Err(err) => {
                if let Err(restore_err) = guard.restore() {
                    tracing::warn!(error = %restore_err, "could not restore branch after failure");
                }
                Err(err)
            }
        }
    }
}

/// Restores a previous checkout when finished with a temporary switch.
#[must_use = "dropping the guard immediately switches back"]
pub struct BranchGuard<'a> {
    repo: &'a RepositoryHandle,
    restore_to: Option<String>,
}

impl BranchGuard<'_> {
    /// Restore the prior checkout now, reporting failure.
    pub fn restore(mut self) -> Result<()> {
        match self.restore_to.take() {
            Some(target) => self.repo.checkout(&target).map_err(|source| Error::BranchRestore {
                restore_to: target,
                path: self.repo.path.clone(),
                source: Box::new(source),
            }),
            None => Ok(()),
        }
    }
}

impl Drop for BranchGuard<'_> {
    fn drop(&mut self) {
        if let Some(target) = self.restore_to.take()
            && let Err(e) = self.repo.checkout(&target)
        {
            tracing::warn!(branch = %target, error = %e, "failed to restore branch");
        }
    }
}

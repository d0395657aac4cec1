use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use asset_fs::ensure_dir;
use asset_git::{GitRunner, RepositoryHandle, SystemGit};
use serde::Serialize;

use super::decision::{RepositoryState, SyncDecision};
use crate::config::AssetSpec;
use crate::{Error, Result};

const REMOTE: &str = "origin";

/// What a synchronization did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncAction {
    Cloned,
    Updated,
    CheckedOut,
    Unchanged,
}

impl fmt::Display for SyncAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Cloned => "cloned",
            Self::Updated => "updated",
            Self::CheckedOut => "checked out",
            Self::Unchanged => "unchanged",
        };
        f.write_str(label)
    }
}

/// Result of synchronizing one asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncOutcome {
    pub path: PathBuf,
    pub action: SyncAction,
    /// Revision checked out afterwards.
    pub revision: String,
}

impl fmt::Display for SyncOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let short = self.revision.get(..12).unwrap_or(&self.revision);
        write!(f, "{} {} at {}", self.action, self.path.display(), short)
    }
}

/// Brings asset checkouts under a project root to their declared target.
///
/// Each call observes the path, decides, and runs the minimal git sequence.
/// Nothing is cached between calls and nothing is retried. Two calls for the
/// same path must not run concurrently; distinct paths are independent.
#[derive(Clone)]
pub struct Synchronizer {
    root: PathBuf,
    runner: Arc<dyn GitRunner>,
}

impl fmt::Debug for Synchronizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Synchronizer")
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

impl Synchronizer {
    /// Synchronize under `root` with the system `git` client.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_runner(root, Arc::new(SystemGit::new()))
    }

    pub fn with_runner(root: impl Into<PathBuf>, runner: Arc<dyn GitRunner>) -> Self {
        Self {
            root: root.into(),
            runner,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Read the current state of `spec`'s path.
    ///
    /// # Errors
    ///
    /// A path that exists but is not a repository root is an error, never
    /// something to re-initialize.
    pub fn observe(&self, spec: &AssetSpec) -> Result<RepositoryState> {
        let local = spec.local_path(&self.root);
        if !local.exists() {
            return Ok(RepositoryState::absent());
        }

        let repo = self.open(&local)?;
        Ok(RepositoryState {
            exists: true,
            current_revision: Some(repo.current_revision()?),
            current_branch: repo.current_branch()?,
        })
    }

    /// Bring `spec`'s path to its declared branch tip or pinned revision.
    ///
    /// # Errors
    ///
    /// Any failing git subcommand is returned as is. Partial progress, such
    /// as a clone whose follow-up checkout failed, is left in place.
    pub fn synchronize(&self, spec: &AssetSpec) -> Result<SyncOutcome> {
        let local = spec.local_path(&self.root);
        let state = self.observe(spec)?;
        let decision = SyncDecision::decide(spec, &state);

        let (repo, action) = match decision {
            SyncDecision::Clone => (self.clone_asset(spec, &local)?, SyncAction::Cloned),
            SyncDecision::Pull => {
                let repo = self.open(&local)?;
                self.pull_branch(&repo, spec, &state)?;
                (repo, SyncAction::Updated)
            }
            SyncDecision::CheckoutRevision(pin) => {
                let repo = self.open(&local)?;
                self.checkout_pinned(&repo, &pin)?;
                (repo, SyncAction::CheckedOut)
            }
            SyncDecision::NoOp => {
                tracing::debug!(
                    path = %local.display(),
                    commit = spec.commit.as_deref().unwrap_or_default(),
                    "already at pinned revision"
                );
                let revision = state.current_revision.unwrap_or_default();
                return Ok(SyncOutcome {
                    path: local,
                    action: SyncAction::Unchanged,
                    revision,
                });
            }
        };

        Ok(SyncOutcome {
            revision: repo.current_revision()?,
            path: local,
            action,
        })
    }

    fn open(&self, local: &Path) -> Result<RepositoryHandle> {
        Ok(RepositoryHandle::open(local, Arc::clone(&self.runner))?)
    }

    fn clone_asset(&self, spec: &AssetSpec, local: &Path) -> Result<RepositoryHandle> {
        let (Some(parent), Some(leaf)) = (local.parent(), local.file_name().and_then(|n| n.to_str()))
        else {
            return Err(Error::configuration(format!(
                "cannot clone into '{}': no directory name",
                local.display()
            )));
        };

        ensure_dir(parent)?;
        tracing::info!(
            repository = %spec.repository,
            branch = %spec.branch,
            path = %local.display(),
            "cloning asset"
        );
        let repo = RepositoryHandle::at(parent, Arc::clone(&self.runner)).clone_into(
            &spec.repository,
            leaf,
            Some(&spec.branch),
        )?;

        let head = repo.current_revision()?;
        if let Some(pin) = SyncDecision::pin_after_clone(spec, &head) {
            self.checkout_pinned(&repo, pin)?;
        }
        Ok(repo)
    }

    fn pull_branch(&self, repo: &RepositoryHandle, spec: &AssetSpec, state: &RepositoryState) -> Result<()> {
        // A previously pinned checkout sits on a detached HEAD; go back to
        // the branch before fast-forwarding it.
        if state.current_branch.as_deref() != Some(spec.branch.as_str()) {
            tracing::info!(
                branch = %spec.branch,
                path = %repo.path().display(),
                "switching to tracked branch"
            );
            // A branch created upstream after the clone has no local or
            // remote-tracking ref yet.
            if !repo.branch_exists(&spec.branch)? {
                tracing::info!(
                    branch = %spec.branch,
                    path = %repo.path().display(),
                    "fetching for new branch"
                );
                repo.fetch(REMOTE)?;
            }
            repo.checkout(&spec.branch)?;
        }

        tracing::info!(branch = %spec.branch, path = %repo.path().display(), "updating asset");
        repo.pull(REMOTE, &spec.branch)?;
        Ok(())
    }

    fn checkout_pinned(&self, repo: &RepositoryHandle, pin: &str) -> Result<()> {
        if !repo.has_revision(pin)? {
            tracing::info!(commit = %pin, path = %repo.path().display(), "fetching for pinned revision");
            repo.fetch(REMOTE)?;
        }

        tracing::info!(commit = %pin, path = %repo.path().display(), "checking out pinned revision");
        repo.checkout(pin)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::testing::FakeGit;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    const FIRST: &str = "1111111111111111111111111111111111111111";
    const SECOND: &str = "2222222222222222222222222222222222222222";
    const UNSEEN: &str = "3333333333333333333333333333333333333333";

    fn setup() -> (TempDir, Arc<FakeGit>, Synchronizer) {
        let temp = TempDir::new().unwrap();
        let fake = Arc::new(FakeGit::new("main", &[FIRST, SECOND]));
        let sync = Synchronizer::with_runner(temp.path(), Arc::clone(&fake) as Arc<dyn GitRunner>);
        (temp, fake, sync)
    }

    fn tracking() -> AssetSpec {
        AssetSpec::new("https://example.com/docs.git", "main", "assets/docs")
    }

    #[test]
    fn missing_path_clones_once() {
        let (temp, fake, sync) = setup();

        let outcome = sync.synchronize(&tracking()).unwrap();

        assert_eq!(outcome.action, SyncAction::Cloned);
        assert_eq!(outcome.revision, SECOND);
        assert_eq!(outcome.path, temp.path().join("assets/docs"));
        assert_eq!(
            fake.mutations(),
            vec!["clone --branch main -- https://example.com/docs.git docs"]
        );
    }

    #[test]
    fn clone_with_unmet_pin_checks_out_once() {
        let (_temp, fake, sync) = setup();

        let outcome = sync.synchronize(&tracking().pinned("11111111")).unwrap();

        assert_eq!(outcome.action, SyncAction::Cloned);
        assert_eq!(outcome.revision, FIRST);
        assert_eq!(
            fake.mutations(),
            vec![
                "clone --branch main -- https://example.com/docs.git docs",
                "checkout 11111111",
            ]
        );
    }

    #[test]
    fn clone_with_met_pin_does_not_checkout() {
        let (_temp, fake, sync) = setup();

        sync.synchronize(&tracking().pinned("22222222")).unwrap();

        assert_eq!(fake.mutations().len(), 1);
    }

    #[test]
    fn satisfied_pin_is_idempotent() {
        let (_temp, fake, sync) = setup();
        let spec = tracking().pinned("1111");
        sync.synchronize(&spec).unwrap();
        let before = fake.mutations().len();

        let outcome = sync.synchronize(&spec).unwrap();

        assert_eq!(outcome.action, SyncAction::Unchanged);
        assert_eq!(outcome.revision, FIRST);
        assert_eq!(fake.mutations().len(), before);
    }

    #[test]
    fn tracking_second_call_pulls_once() {
        let (_temp, fake, sync) = setup();
        sync.synchronize(&tracking()).unwrap();
        fake.clear();

        let outcome = sync.synchronize(&tracking()).unwrap();

        assert_eq!(outcome.action, SyncAction::Updated);
        assert_eq!(fake.mutations(), vec!["pull --ff-only origin main"]);
    }

    #[test]
    fn pin_change_checks_out_and_fetches_unknown_revision() {
        let (_temp, fake, sync) = setup();
        sync.synchronize(&tracking()).unwrap();
        fake.publish(UNSEEN);
        fake.clear();

        let outcome = sync.synchronize(&tracking().pinned("33333333")).unwrap();

        assert_eq!(outcome.action, SyncAction::CheckedOut);
        assert_eq!(outcome.revision, UNSEEN);
        assert_eq!(
            fake.mutations(),
            vec!["fetch origin", "checkout 33333333"]
        );
    }

    #[test]
    fn known_pin_checks_out_without_fetch() {
        let (_temp, fake, sync) = setup();
        sync.synchronize(&tracking()).unwrap();
        fake.clear();

        sync.synchronize(&tracking().pinned(FIRST)).unwrap();

        assert_eq!(fake.mutations(), vec![format!("checkout {FIRST}")]);
    }

    #[test]
    fn unpinning_returns_to_branch_before_pull() {
        let (_temp, fake, sync) = setup();
        sync.synchronize(&tracking().pinned(FIRST)).unwrap();
        fake.clear();

        let outcome = sync.synchronize(&tracking()).unwrap();

        assert_eq!(outcome.revision, SECOND);
        assert_eq!(
            fake.mutations(),
            vec!["checkout main", "pull --ff-only origin main"]
        );
    }

    #[test]
    fn switching_to_branch_created_after_clone_fetches_first() {
        let (_temp, fake, sync) = setup();
        sync.synchronize(&tracking()).unwrap();
        fake.publish_branch("release");
        fake.clear();

        let spec = AssetSpec::new("https://example.com/docs.git", "release", "assets/docs");
        let outcome = sync.synchronize(&spec).unwrap();

        assert_eq!(outcome.action, SyncAction::Updated);
        assert_eq!(
            fake.mutations(),
            vec!["fetch origin", "checkout release", "pull --ff-only origin release"]
        );
        assert_eq!(sync.observe(&spec).unwrap().current_branch.as_deref(), Some("release"));
    }

    #[test]
    fn switching_to_existing_local_branch_skips_fetch() {
        let (_temp, fake, sync) = setup();
        sync.synchronize(&tracking()).unwrap();
        sync.synchronize(&tracking().pinned(FIRST)).unwrap();
        fake.clear();

        sync.synchronize(&tracking()).unwrap();

        assert!(fake.calls().contains(&"branch --list main".to_string()));
        assert!(!fake.mutations().iter().any(|c| c.starts_with("fetch")));
    }

    #[test]
    fn non_repository_path_is_an_error_and_untouched() {
        let (temp, fake, sync) = setup();
        let local = temp.path().join("assets/docs");
        std::fs::create_dir_all(&local).unwrap();
        std::fs::write(local.join("notes.txt"), "local edits").unwrap();

        let err = sync.synchronize(&tracking()).unwrap_err();

        assert!(
            matches!(err, Error::Git(asset_git::Error::NotARepository { .. })),
            "got {err:?}"
        );
        assert!(fake.calls().is_empty());
        assert_eq!(
            std::fs::read_to_string(local.join("notes.txt")).unwrap(),
            "local edits"
        );
    }

    #[test]
    fn failed_command_names_operation_and_path() {
        let (temp, fake, sync) = setup();
        sync.synchronize(&tracking()).unwrap();
        fake.fail_on("pull");

        let err = sync.synchronize(&tracking()).unwrap_err();

        let Error::Git(git_err) = &err else {
            panic!("expected git error, got {err:?}");
        };
        assert_eq!(git_err.command(), Some("git pull --ff-only origin main"));
        assert_eq!(git_err.path(), temp.path().join("assets/docs"));
    }

    #[test]
    fn outcome_display_abbreviates_revision() {
        let outcome = SyncOutcome {
            path: PathBuf::from("assets/docs"),
            action: SyncAction::CheckedOut,
            revision: FIRST.to_string(),
        };
        assert_eq!(outcome.to_string(), "checked out assets/docs at 111111111111");
    }
}

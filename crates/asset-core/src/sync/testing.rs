//! In-memory stand-in for the git client.

use std::path::Path;
use std::sync::Mutex;

use asset_git::{GitOutput, GitRunner};

const MUTATING: &[&str] = &["clone", "checkout", "pull", "fetch", "reset", "merge", "rebase"];

#[derive(Debug, Default)]
struct Model {
    remote_tip: String,
    remote_revisions: Vec<String>,
    remote_branches: Vec<String>,
    tracking: Vec<String>,
    local_branches: Vec<String>,
    head: String,
    branch: Option<String>,
    local_tip: String,
    known: Vec<String>,
}

impl Model {
    fn find_known(&self, prefix: &str) -> Option<String> {
        self.known.iter().find(|r| r.starts_with(prefix)).cloned()
    }
}

/// Simulates one remote and the clone made from it.
///
/// Every branch on the remote shares one history. Cloning creates the `.git` directory on disk so path checks behave as
/// they would against a real checkout. Every subcommand is recorded.
#[derive(Debug, Default)]
pub(crate) struct FakeGit {
    model: Mutex<Model>,
    calls: Mutex<Vec<String>>,
    fail_on: Mutex<Vec<String>>,
}

impl FakeGit {
    /// A remote whose `branch` has `history`, oldest first.
    pub(crate) fn new(branch: &str, history: &[&str]) -> Self {
        let revisions: Vec<String> = history.iter().map(|r| r.to_string()).collect();
        Self {
            model: Mutex::new(Model {
                remote_tip: revisions.last().cloned().unwrap_or_default(),
                remote_revisions: revisions,
                remote_branches: vec![branch.to_string()],
                ..Model::default()
            }),
            ..Self::default()
        }
    }

    /// Make `revision` reachable on the remote without moving the branch.
    pub(crate) fn publish(&self, revision: &str) {
        self.model
            .lock()
            .unwrap()
            .remote_revisions
            .push(revision.to_string());
    }

    /// Create `name` on the remote; clones only see it after a fetch.
    pub(crate) fn publish_branch(&self, name: &str) {
        self.model
            .lock()
            .unwrap()
            .remote_branches
            .push(name.to_string());
    }

    /// Fail every later subcommand that starts with `prefix`.
    pub(crate) fn fail_on(&self, prefix: &str) {
        self.fail_on.lock().unwrap().push(prefix.to_string());
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Recorded subcommands that change the checkout.
    pub(crate) fn mutations(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| MUTATING.iter().any(|m| c.split(' ').next() == Some(*m)))
            .collect()
    }

    pub(crate) fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }
}

impl GitRunner for FakeGit {
    fn exec(&self, dir: &Path, args: &[&str]) -> asset_git::Result<GitOutput> {
        let line = args.join(" ");
        self.calls.lock().unwrap().push(line.clone());

        if self
            .fail_on
            .lock()
            .unwrap()
            .iter()
            .any(|p| line.starts_with(p.as_str()))
        {
            return Ok(GitOutput::failure(1, format!("fatal: {line} rejected")));
        }

        let mut model = self.model.lock().unwrap();
        let output = match args {
            ["clone", "--branch", branch, "--", _remote, name] => {
                if !model.remote_branches.iter().any(|b| b == branch) {
                    return Ok(GitOutput::failure(
                        128,
                        format!("fatal: Remote branch {branch} not found in upstream origin"),
                    ));
                }
                std::fs::create_dir_all(dir.join(name).join(".git")).unwrap();
                model.head = model.remote_tip.clone();
                model.local_tip = model.remote_tip.clone();
                model.branch = Some(branch.to_string());
                model.local_branches = vec![branch.to_string()];
                model.tracking = model.remote_branches.clone();
                model.known = model.remote_revisions.clone();
                GitOutput::success("")
            }
            ["rev-parse", "--verify", "HEAD"] => GitOutput::success(format!("{}\n", model.head)),
            ["symbolic-ref", ..] => match &model.branch {
                Some(branch) => GitOutput::success(format!("{branch}\n")),
                None => GitOutput {
                    code: Some(1),
                    ..GitOutput::default()
                },
            },
            ["cat-file", "-e", spec] => {
                let revision = spec.trim_end_matches("^{commit}");
                if model.find_known(revision).is_some() {
                    GitOutput::success("")
                } else {
                    GitOutput::failure(128, "fatal: Not a valid object name")
                }
            }
            ["branch", "--list", name] => {
                if model.local_branches.iter().any(|b| b == name) {
                    GitOutput::success(format!("  {name}\n"))
                } else {
                    GitOutput::success("")
                }
            }
            ["fetch", _] => {
                model.known = model.remote_revisions.clone();
                model.tracking = model.remote_branches.clone();
                GitOutput::success("")
            }
            ["checkout", target] => {
                let local = model.local_branches.iter().any(|b| b == target);
                if local || model.tracking.iter().any(|b| b == target) {
                    if !local {
                        model.local_branches.push(target.to_string());
                    }
                    model.branch = Some(target.to_string());
                    model.head = model.local_tip.clone();
                    GitOutput::success("")
                } else if let Some(revision) = model.find_known(target) {
                    model.branch = None;
                    model.head = revision;
                    GitOutput::success("")
                } else {
                    GitOutput::failure(1, format!("error: pathspec '{target}' did not match"))
                }
            }
            ["pull", "--ff-only", _, _] => {
                model.local_tip = model.remote_tip.clone();
                model.head = model.remote_tip.clone();
                GitOutput::success("")
            }
            _ => GitOutput::success(""),
        };
        Ok(output)
    }
}

//! Execution seam between repository handles and the git client
//!
//! [`GitRunner`] is the only place a git process is spawned. The working
//! directory is always passed explicitly; the process-wide current directory
//! is never changed.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::{Error, Result};

/// Captured result of one git invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitOutput {
    /// Exit code, `None` if the process was killed by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl GitOutput {
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn failure(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs git subcommands.
///
/// Implementations must block until the subcommand finishes and must not
/// retry. A non-zero exit is reported through [`GitOutput::code`], not as an
/// `Err`; only failing to run the client at all is an error.
pub trait GitRunner: Send + Sync {
    fn exec(&self, dir: &Path, args: &[&str]) -> Result<GitOutput>;
}

/// Runs the `git` executable found on `PATH` (or an explicit program).
#[derive(Debug, Clone)]
pub struct SystemGit {
    program: PathBuf,
}

impl Default for SystemGit {
    fn default() -> Self {
        Self {
            program: PathBuf::from("git"),
        }
    }
}

impl SystemGit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl GitRunner for SystemGit {
    fn exec(&self, dir: &Path, args: &[&str]) -> Result<GitOutput> {
        tracing::debug!(dir = %dir.display(), command = %render_command(args), "running git");

        let output = Command::new(&self.program)
            .args(args)
            .current_dir(dir)
            // Never wait on an interactive credential prompt.
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null())
            .output()
            .map_err(|source| Error::Spawn {
                command: render_command(args),
                path: dir.to_path_buf(),
                source,
            })?;

        Ok(GitOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// `git` followed by the arguments, for messages.
pub fn render_command(args: &[&str]) -> String {
    let mut rendered = String::from("git");
    for arg in args {
        rendered.push(' ');
        rendered.push_str(arg);
    }
    rendered
}

//! Error types for asset-git

use std::path::PathBuf;

/// Result type for asset-git operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in asset-git operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The git client ran but exited unsuccessfully.
    #[error("`{command}` failed in {path} (exit {}): {}", exit_label(.code), .stderr.trim())]
    CommandFailed {
        command: String,
        path: PathBuf,
        code: Option<i32>,
        stderr: String,
    },

    /// The git client could not be started at all.
    #[error("could not run `{command}` in {path}: {source}")]
    Spawn {
        command: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} exists but is not a git repository")]
    NotARepository { path: PathBuf },

    #[error("cannot clone into {path}: no directory name")]
    InvalidCloneTarget { path: PathBuf },

    /// A scoped branch switch could not put the original branch back.
    #[error("failed to restore {restore_to} in {path}: {source}")]
    BranchRestore {
        restore_to: String,
        path: PathBuf,
        #[source]
        source: Box<Error>,
    },
}

fn exit_label(code: &Option<i32>) -> String {
    code.map_or_else(|| "signal".to_string(), |c| c.to_string())
}

impl Error {
    /// The repository (or parent directory) the failure happened in.
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::CommandFailed { path, .. }
            | Self::Spawn { path, .. }
            | Self::NotARepository { path }
            | Self::InvalidCloneTarget { path }
            | Self::BranchRestore { path, .. } => path,
        }
    }

    /// The git subcommand line that failed, if a command was involved.
    pub fn command(&self) -> Option<&str> {
        match self {
            Self::CommandFailed { command, .. } | Self::Spawn { command, .. } => Some(command),
            Self::BranchRestore { source, .. } => source.command(),
            _ => None,
        }
    }
}

//! Error types for asset-core

use std::path::PathBuf;

/// Result type for asset-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in asset-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An asset declaration is malformed.
    #[error("invalid asset configuration: {message}")]
    Configuration { message: String },

    /// A path was named that no declared asset occupies.
    #[error("no asset is declared at {path}")]
    UnknownAsset { path: PathBuf },

    /// A generation command ran but exited unsuccessfully.
    #[error("generator `{command}` failed in {path} (exit {}): {}", exit_label(.code), .stderr.trim())]
    GeneratorFailed {
        command: String,
        path: PathBuf,
        code: Option<i32>,
        stderr: String,
    },

    /// A generation command could not be started.
    #[error("could not run generator `{command}` in {path}: {source}")]
    GeneratorSpawn {
        command: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Transparent wrappers for underlying crate errors
    /// Filesystem error from asset-fs
    #[error(transparent)]
    Fs(#[from] asset_fs::Error),

    /// Version-control error from asset-git
    #[error(transparent)]
    Git(#[from] asset_git::Error),
}

fn exit_label(code: &Option<i32>) -> String {
    code.map_or_else(|| "signal".to_string(), |c| c.to_string())
}

impl Error {
    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

//! Error types for asset-fs

use std::path::PathBuf;

/// Result type for asset-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of a file operation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileErrorKind {
    MissingSource,
    Conflict,
    InvalidName,
    Io,
    Config,
}

/// Errors that can occur in asset-fs operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{operation}: input file '{path}' does not exist or is not a file")]
    MissingSource {
        operation: &'static str,
        path: PathBuf,
    },

    #[error("{operation}: {path} exists and is {found}")]
    Conflict {
        operation: &'static str,
        path: PathBuf,
        found: &'static str,
    },

    #[error("{operation}: cannot derive a file name from {path}")]
    InvalidName {
        operation: &'static str,
        path: PathBuf,
    },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {format} config at {path}: {message}")]
    ConfigParse {
        path: PathBuf,
        format: String,
        message: String,
    },

    #[error("Unsupported config format: {extension}")]
    UnsupportedFormat { extension: String },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn kind(&self) -> FileErrorKind {
        match self {
            Self::MissingSource { .. } => FileErrorKind::MissingSource,
            Self::Conflict { .. } => FileErrorKind::Conflict,
            Self::InvalidName { .. } => FileErrorKind::InvalidName,
            Self::Io { .. } => FileErrorKind::Io,
            Self::ConfigParse { .. } | Self::UnsupportedFormat { .. } => FileErrorKind::Config,
        }
    }

    /// The path the failed operation was acting on, when there is one.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::MissingSource { path, .. }
            | Self::Conflict { path, .. }
            | Self::InvalidName { path, .. }
            | Self::Io { path, .. }
            | Self::ConfigParse { path, .. } => Some(path),
            Self::UnsupportedFormat { .. } => None,
        }
    }
}

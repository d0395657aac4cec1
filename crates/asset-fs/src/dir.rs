//! Idempotent directory creation and removal
//!
//! Both operations report what they found instead of failing on the benign
//! cases: a directory that already exists, or a tree that is already gone.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::{Error, Result};

/// Outcome of [`ensure_dir`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirOutcome {
    /// The directory (and any missing ancestors) was created by this call.
    Created,
    /// The directory was already there, possibly created concurrently.
    AlreadyExists,
}

/// Outcome of [`remove_tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,
    Absent,
}

/// Make sure `path` exists as a directory.
///
/// An empty path refers to the current directory and is reported as
/// [`DirOutcome::AlreadyExists`]. Losing a creation race to another process
/// or thread is not an error.
///
/// # Errors
///
/// - [`Error::Conflict`] if `path` (or an ancestor) exists but is not a directory.
/// - [`Error::Io`] for any other failure.
pub fn ensure_dir(path: &Path) -> Result<DirOutcome> {
    if path.as_os_str().is_empty() || path.is_dir() {
        return Ok(DirOutcome::AlreadyExists);
    }

    if path.exists() {
        return Err(Error::Conflict {
            operation: "mkdir",
            path: path.to_path_buf(),
            found: "not a directory",
        });
    }

    match fs::create_dir_all(path) {
        Ok(()) => {
            tracing::debug!(path = %path.display(), "created directory");
            Ok(DirOutcome::Created)
        }
        Err(_) if path.is_dir() => Ok(DirOutcome::AlreadyExists),
        Err(e) if e.kind() == ErrorKind::AlreadyExists || path.exists() => Err(Error::Conflict {
            operation: "mkdir",
            path: path.to_path_buf(),
            found: "not a directory",
        }),
        Err(e) => match path.ancestors().skip(1).find(|a| a.exists() && !a.is_dir()) {
            Some(blocker) => Err(Error::Conflict {
                operation: "mkdir",
                path: blocker.to_path_buf(),
                found: "not a directory",
            }),
            None => Err(Error::io(path, e)),
        },
    }
}

/// Remove `path` whatever it is: a directory tree, a file, or a symlink.
///
/// Symlinks are removed as links; their targets are left alone. A path that
/// does not exist is reported as [`RemoveOutcome::Absent`].
pub fn remove_tree(path: &Path) -> Result<RemoveOutcome> {
    let meta = match fs::symlink_metadata(path) {
        Ok(meta) => meta,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(RemoveOutcome::Absent),
        Err(e) => return Err(Error::io(path, e)),
    };

    let result = if meta.is_dir() {
        fs::remove_dir_all(path)
    } else {
        remove_link_or_file(path)
    };

    match result {
        Ok(()) => {
            tracing::info!(path = %path.display(), "removed");
            Ok(RemoveOutcome::Removed)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(RemoveOutcome::Absent),
        Err(e) => Err(Error::io(path, e)),
    }
}

/// Remove a file if it exists, logging the removal.
pub fn remove_verbose(path: &Path) -> Result<RemoveOutcome> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => Err(Error::Conflict {
            operation: "remove",
            path: path.to_path_buf(),
            found: "a directory",
        }),
        Ok(_) => {
            tracing::info!(path = %path.display(), "clean: removing");
            remove_link_or_file(path).map_err(|e| Error::io(path, e))?;
            Ok(RemoveOutcome::Removed)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(RemoveOutcome::Absent),
        Err(e) => Err(Error::io(path, e)),
    }
}

// Windows directory symlinks need remove_dir; everything else is a file.
pub(crate) fn remove_link_or_file(path: &Path) -> std::io::Result<()> {
    match fs::remove_file(path) {
        #[cfg(windows)]
        Err(e) if path.is_dir() => fs::remove_dir(path).or(Err(e)),
        other => other,
    }
}

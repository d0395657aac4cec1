//! Change-detected copies and atomic symlinks
//!
//! Targets are only written when they are missing or their content differs
//! from the source. Every write goes to a temporary sibling first and is
//! renamed into place, so an interrupted run never leaves a truncated target.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use crate::checksum::files_match;
use crate::dir::{ensure_dir, remove_link_or_file};
use crate::{Error, Result};

/// Outcome of [`copy_if_changed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    /// Target did not exist and was created.
    Created,
    /// Target existed with different content and was replaced.
    Updated,
    /// Target already matched the source; nothing was written.
    Unchanged,
}

impl CopyOutcome {
    pub fn wrote(self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

/// Copy `source` to `target` unless `target` already has identical content.
///
/// Missing parent directories of `target` are created.
///
/// # Errors
///
/// - [`Error::MissingSource`] if `source` is absent or is a directory.
/// - [`Error::Conflict`] if `target` is a directory.
/// - [`Error::Io`] on read/write failures.
pub fn copy_if_changed(source: &Path, target: &Path) -> Result<CopyOutcome> {
    check_source("copy", source)?;
    check_target("copy", target)?;

    if !target.exists() {
        write_copy(source, target)?;
        tracing::debug!(
            source = %source.display(),
            target = %target.display(),
            "created target which did not exist"
        );
        return Ok(CopyOutcome::Created);
    }

    if files_match(source, target)? {
        tracing::debug!(source = %source.display(), "not changed");
        return Ok(CopyOutcome::Unchanged);
    }

    write_copy(source, target)?;
    tracing::debug!(
        source = %source.display(),
        target = %target.display(),
        "changed, updated target"
    );
    Ok(CopyOutcome::Updated)
}

/// Copy `source` to `target` unconditionally, creating parent directories.
///
/// A directory at `target` is a [`Error::Conflict`], as for [`copy_if_changed`].
pub fn copy_always(source: &Path, target: &Path) -> Result<()> {
    check_source("copy", source)?;
    check_target("copy", target)?;
    write_copy(source, target)?;
    tracing::debug!(source = %source.display(), target = %target.display(), "copied");
    Ok(())
}

/// Create a symbolic link at `target` pointing to `source`.
///
/// `source` is stored verbatim, so relative sources resolve against the
/// directory containing `target`. An existing file or link at `target` is
/// replaced. The link is first built under a temporary name in the same
/// directory and then renamed, so a half-built link is never visible at
/// `target`.
///
/// # Errors
///
/// - [`Error::Conflict`] if `target` is an existing directory (left untouched).
/// - [`Error::InvalidName`] if `target` has no usable file name.
/// - [`Error::Io`] if the link cannot be created or moved into place.
pub fn create_link(source: &Path, target: &Path) -> Result<()> {
    let Some(name) = target.file_name() else {
        return Err(Error::InvalidName {
            operation: "link",
            path: target.to_path_buf(),
        });
    };

    let existing = fs::symlink_metadata(target).ok();
    if existing.as_ref().is_some_and(|meta| meta.is_dir()) {
        return Err(Error::Conflict {
            operation: "link",
            path: target.to_path_buf(),
            found: "a directory",
        });
    }

    let parent = target.parent().unwrap_or_else(|| Path::new(""));
    ensure_dir(parent)?;

    let staging = sibling_temp(target, name, "link");
    if fs::symlink_metadata(&staging).is_ok() {
        remove_link_or_file(&staging).map_err(|e| Error::io(&staging, e))?;
    }
    symlink(source, &staging).map_err(|e| Error::io(&staging, e))?;

    if existing.is_some() {
        tracing::debug!(target = %target.display(), "replacing existing file with link");
        if let Err(e) = remove_link_or_file(target) {
            let _ = remove_link_or_file(&staging);
            return Err(Error::io(target, e));
        }
    }

    if let Err(e) = fs::rename(&staging, target) {
        let _ = remove_link_or_file(&staging);
        return Err(Error::io(target, e));
    }

    tracing::debug!(
        source = %source.display(),
        target = %target.display(),
        "created symbolic link"
    );
    Ok(())
}

fn check_source(operation: &'static str, source: &Path) -> Result<()> {
    if source.is_file() {
        Ok(())
    } else {
        tracing::error!(source = %source.display(), "input file does not exist");
        Err(Error::MissingSource {
            operation,
            path: source.to_path_buf(),
        })
    }
}

fn check_target(operation: &'static str, target: &Path) -> Result<()> {
    if target.is_dir() {
        return Err(Error::Conflict {
            operation,
            path: target.to_path_buf(),
            found: "a directory",
        });
    }
    Ok(())
}

fn write_copy(source: &Path, target: &Path) -> Result<()> {
    let Some(name) = target.file_name() else {
        return Err(Error::InvalidName {
            operation: "copy",
            path: target.to_path_buf(),
        });
    };
    if let Some(parent) = target.parent() {
        ensure_dir(parent)?;
    }

    let staging = sibling_temp(target, name, "tmp");
    if let Err(e) = fs::copy(source, &staging) {
        let _ = fs::remove_file(&staging);
        return Err(Error::io(source, e));
    }
    if let Err(e) = fs::rename(&staging, target) {
        let _ = fs::remove_file(&staging);
        return Err(Error::io(target, e));
    }
    Ok(())
}

// `.{name}.{pid}.{suffix}` next to the target keeps the rename on one filesystem.
pub(crate) fn sibling_temp(target: &Path, name: &std::ffi::OsStr, suffix: &str) -> PathBuf {
    let mut temp_name = OsString::from(".");
    temp_name.push(name);
    temp_name.push(format!(".{}.{}", std::process::id(), suffix));
    target.with_file_name(temp_name)
}

#[cfg(unix)]
fn symlink(source: &Path, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(source, link)
}

#[cfg(windows)]
fn symlink(source: &Path, link: &Path) -> std::io::Result<()> {
    let resolved = link.parent().map(|p| p.join(source)).unwrap_or_else(|| source.to_path_buf());
    if resolved.is_dir() {
        std::os::windows::fs::symlink_dir(source, link)
    } else {
        std::os::windows::fs::symlink_file(source, link)
    }
}

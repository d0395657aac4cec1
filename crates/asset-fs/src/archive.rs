//! Gzip-compressed tar packaging
//!
//! Member names are built from a logical prefix and the leaf name of the
//! packaged path, never from its location on disk, so the archive can be
//! unpacked anywhere.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::write::GzEncoder;

use crate::dir::ensure_dir;
use crate::materialize::sibling_temp;
use crate::{Error, Result};

/// Package `path` into the gzip tarball `name`.
///
/// - `prefix`: logical directory inside the archive; members are stored
///   under `<prefix>/<leaf of path>`, or `<leaf of path>` without one.
/// - `working_dir`: when set, `path` is resolved relative to it.
///
/// The archive's parent directory is created if needed and an existing
/// archive is only replaced once the new one is complete. Returns the path
/// of the written archive.
///
/// # Errors
///
/// - [`Error::MissingSource`] if the resolved `path` does not exist.
/// - [`Error::InvalidName`] if `path` has no leaf name to store, or `name`
///   has no file name.
/// - [`Error::Io`] if the archive cannot be written.
pub fn package_directory(
    name: &Path,
    path: &Path,
    prefix: Option<&Path>,
    working_dir: Option<&Path>,
) -> Result<PathBuf> {
    let source = match working_dir {
        Some(dir) => dir.join(path),
        None => path.to_path_buf(),
    };
    if !source.exists() {
        return Err(Error::MissingSource {
            operation: "tarball",
            path: source,
        });
    }

    let Some(leaf) = source.file_name() else {
        return Err(Error::InvalidName {
            operation: "tarball",
            path: source,
        });
    };
    let member = match prefix {
        Some(prefix) => prefix.join(leaf),
        None => PathBuf::from(leaf),
    };

    let Some(archive_name) = name.file_name() else {
        return Err(Error::InvalidName {
            operation: "tarball",
            path: name.to_path_buf(),
        });
    };
    if let Some(parent) = name.parent() {
        ensure_dir(parent)?;
    }

    tracing::debug!(archive = %name.display(), internal = %member.display(), "creating tarball");

    // A failed run leaves any previous archive untouched.
    let staging = sibling_temp(name, archive_name, "tmp");
    if let Err(e) = write_archive(&staging, &source, &member) {
        let _ = fs::remove_file(&staging);
        return Err(e);
    }
    if let Err(e) = fs::rename(&staging, name) {
        let _ = fs::remove_file(&staging);
        return Err(Error::io(name, e));
    }

    tracing::info!(archive = %name.display(), "created tarball");
    Ok(name.to_path_buf())
}

fn write_archive(archive: &Path, source: &Path, member: &Path) -> Result<()> {
    let file = File::create(archive).map_err(|e| Error::io(archive, e))?;
    let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));
    builder.follow_symlinks(false);

    let appended = if source.is_dir() {
        builder.append_dir_all(member, source)
    } else {
        builder.append_path_with_name(source, member)
    };
    appended.map_err(|e| Error::io(source, e))?;

    let encoder = builder.into_inner().map_err(|e| Error::io(archive, e))?;
    encoder.finish().map_err(|e| Error::io(archive, e))?;
    Ok(())
}

//! Source tree expansion

use std::fs;
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Collect every file under `root` whose extension is in `extensions`.
///
/// An empty `extensions` slice accepts every file. Editor lock files
/// (`.#name`) and swap files (`*swp`) are always skipped. The result is
/// sorted so callers see a stable order.
pub fn expand_tree(root: &Path, extensions: &[&str]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let entries = fs::read_dir(&dir).map_err(|e| Error::io(&dir, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| Error::io(&dir, e))?;
            let path = entry.path();
            let file_type = entry.file_type().map_err(|e| Error::io(&path, e))?;

            if file_type.is_dir() {
                pending.push(path);
                continue;
            }

            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name.starts_with(".#") || name.ends_with("swp") {
                continue;
            }

            let wanted = extensions.is_empty()
                || path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| extensions.contains(&ext));
            if wanted {
                files.push(path);
            }
        }
    }

    files.sort();
    Ok(files)
}

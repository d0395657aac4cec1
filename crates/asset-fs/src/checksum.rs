//! SHA-256 content fingerprints
//!
//! Provides a single canonical checksum format (`sha256:<hex>`) used to decide
//! whether a materialized file already matches its source. Fingerprints are
//! computed from file bytes only; timestamps never take part.

use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::{Error, Result};

/// Prefix for all checksums produced by this module
const PREFIX: &str = "sha256:";

const CHUNK_SIZE: usize = 1 << 20;

/// Compute the SHA-256 checksum of in-memory content.
///
/// Returns a string in the canonical format `"sha256:<hex>"`.
pub fn compute_content_checksum(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("{}{:x}", PREFIX, hasher.finalize())
}

/// Compute the SHA-256 checksum of a file's contents.
///
/// The file is streamed in 1 MiB chunks so large assets are never held in
/// memory at once.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be opened or read.
pub fn compute_file_checksum(path: &Path) -> Result<String> {
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    let mut reader = BufReader::with_capacity(CHUNK_SIZE, file);
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; CHUNK_SIZE];

    loop {
        let read = reader.read(&mut buf).map_err(|e| Error::io(path, e))?;
        if read == 0 {
            break;
        }
        hasher.update(&buf[..read]);
    }

    Ok(format!("{}{:x}", PREFIX, hasher.finalize()))
}

/// Whether two files have identical content.
///
/// Sizes are compared first; fingerprints are only computed when the sizes
/// agree.
pub fn files_match(a: &Path, b: &Path) -> Result<bool> {
    let len_a = a.metadata().map_err(|e| Error::io(a, e))?.len();
    let len_b = b.metadata().map_err(|e| Error::io(b, e))?.len();
    if len_a != len_b {
        return Ok(false);
    }

    Ok(compute_file_checksum(a)? == compute_file_checksum(b)?)
}

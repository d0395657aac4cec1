//! Filesystem layer for asset synchronization
//!
//! Provides content fingerprints, idempotent directory handling, and the
//! file materializer: change-detected copies, atomic symlinks, and
//! relocatable tarballs.

pub mod archive;
pub mod checksum;
pub mod config;
pub mod dir;
pub mod error;
pub mod materialize;
pub mod tree;

pub use archive::package_directory;
pub use checksum::{compute_content_checksum, compute_file_checksum, files_match};
pub use config::{ConfigFormat, ConfigStore};
pub use dir::{DirOutcome, RemoveOutcome, ensure_dir, remove_tree, remove_verbose};
pub use error::{Error, FileErrorKind, Result};
pub use materialize::{CopyOutcome, copy_always, copy_if_changed, create_link};
pub use tree::expand_tree;

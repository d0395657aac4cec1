//! Git command proxy for asset synchronization
//!
//! A [`RepositoryHandle`] is bound to one local path and runs git
//! subcommands through a [`GitRunner`]. The runner is the black-box boundary
//! to the version-control client; tests substitute a scripted runner.

pub mod error;
pub mod handle;
pub mod revision;
pub mod runner;

pub use error::{Error, Result};
pub use handle::{BranchGuard, RepositoryHandle};
pub use revision::{is_revision_id, revision_satisfies};
pub use runner::{GitOutput, GitRunner, SystemGit};

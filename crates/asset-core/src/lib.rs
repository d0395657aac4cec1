//! Repository synchronization engine for externally hosted assets
//!
//! This crate decides, from observable state alone, the minimal set of
//! version-control operations that bring each declared asset to its target
//! branch tip or pinned revision, and plans that work as units for a
//! scheduler:
//!
//! - **Configuration**: typed, validated [`AssetConfig`] / [`AssetSpec`]
//! - **Synchronization**: [`SyncDecision`] (pure) and [`Synchronizer`]
//! - **Planning**: [`Planner`] emits a [`Plan`] of [`UnitOfWork`]s
//! - **Execution**: [`Executor`] runs a plan with per-unit failure isolation
//!
//! # Architecture
//!
//! ```text
//!            asset-cli
//!                |
//!           asset-core
//!                |
//!        +-------+-------+
//!        |               |
//!    asset-fs        asset-git
//! ```
//!
//! # Example
//!
//! ```no_run
//! use asset_core::{AssetSpec, Synchronizer};
//!
//! fn example() -> asset_core::Result<()> {
//!     let sync = Synchronizer::new("/path/to/project");
//!     let spec = AssetSpec::new("https://example.com/docs.git", "main", "assets/docs");
//!     let outcome = sync.synchronize(&spec)?;
//!     println!("{outcome}");
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod executor;
pub mod generate;
pub mod plan;
pub mod sync;

pub use config::{AssetConfig, AssetSpec};
pub use error::{Error, Result};
pub use executor::{ExecutionReport, Executor, UnitReport, UnitStatus};
pub use generate::run_generator;
pub use plan::{Job, Plan, Planner, UnitOfWork};
pub use sync::{RepositoryState, SyncAction, SyncDecision, SyncOutcome, Synchronizer};

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn unknown_asset_displays_path() {
        let error = Error::UnknownAsset {
            path: PathBuf::from("assets/docs"),
        };

        let display = error.to_string();
        assert!(
            display.contains("assets/docs"),
            "Error display should contain the path, got: {display}"
        );
    }

    #[test]
    fn wrapped_errors_stay_transparent() {
        let inner = asset_git::Error::NotARepository {
            path: PathBuf::from("/p/a"),
        };
        let expected = inner.to_string();
        let error: Error = inner.into();
        assert_eq!(error.to_string(), expected);
    }
}

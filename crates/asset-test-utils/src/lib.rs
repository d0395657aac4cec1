//! Shared test utilities for the asset-sync workspace.
//!
//! This crate provides standardised test fixtures to eliminate duplication
//! across crate test suites. It is a dev-dependency only; it is never published.
//!
//! # Modules
//!
//! - [`git`]: upstream repositories with history, and read-only inspection
//! - [`project`]: [`TestProject`] builder for a project root with an asset config

pub mod git;
pub mod project;

pub use git::UpstreamRepo;
pub use project::TestProject;

//! Repository synchronization
//!
//! Synchronizing an asset is a two-step affair:
//! - **observe**: read the [`RepositoryState`] at the asset's path
//! - **decide and act**: [`SyncDecision::decide`] picks one of clone, pull,
//!   checkout or nothing, and the [`Synchronizer`] runs it
//!
//! State is observed fresh on every call. There is no ledger, so an
//! interrupted run converges on the next one.

mod decision;
mod synchronizer;

#[cfg(test)]
pub(crate) mod testing;

pub use decision::{RepositoryState, SyncDecision};
pub use synchronizer::{SyncAction, SyncOutcome, Synchronizer};

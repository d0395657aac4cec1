use asset_git::revision_satisfies;
use serde::Serialize;

use crate::config::AssetSpec;

/// What is currently at an asset's path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RepositoryState {
    pub exists: bool,
    pub current_revision: Option<String>,
    /// `None` when `HEAD` is detached.
    pub current_branch: Option<String>,
}

impl RepositoryState {
    pub fn absent() -> Self {
        Self::default()
    }
}

/// The single operation that moves an asset toward its declared target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", content = "revision", rename_all = "snake_case")]
pub enum SyncDecision {
    Clone,
    Pull,
    CheckoutRevision(String),
    NoOp,
}

impl SyncDecision {
    /// Decide from declaration and observation alone.
    ///
    /// | path exists | pin        | current revision     | decision           |
    /// |-------------|------------|----------------------|--------------------|
    /// | no          | any        | -                    | `Clone`            |
    /// | yes         | none       | any                  | `Pull`             |
    /// | yes         | set        | satisfies pin        | `NoOp`             |
    /// | yes         | set        | otherwise            | `CheckoutRevision` |
    ///
    /// A pinned asset is never pulled: tracking the branch tip and holding a
    /// revision are exclusive.
    pub fn decide(spec: &AssetSpec, state: &RepositoryState) -> Self {
        if !state.exists {
            return Self::Clone;
        }

        match spec.commit.as_deref() {
            None => Self::Pull,
            Some(pin) => match state.current_revision.as_deref() {
                Some(current) if revision_satisfies(current, pin) => Self::NoOp,
                _ => Self::CheckoutRevision(pin.to_string()),
            },
        }
    }

    /// Whether a fresh clone at `head` still has to move to the pin.
    pub fn pin_after_clone<'a>(spec: &'a AssetSpec, head: &str) -> Option<&'a str> {
        spec.commit
            .as_deref()
            .filter(|pin| !revision_satisfies(head, pin))
    }

    pub fn is_mutating(&self) -> bool {
        !matches!(self, Self::NoOp)
    }
}

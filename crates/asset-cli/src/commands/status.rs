//! Status command implementation

use std::path::PathBuf;

use asset_core::{RepositoryState, SyncDecision, Synchronizer};
use colored::Colorize;
use serde::Serialize;

use crate::context::ProjectContext;
use crate::error::Result;

#[derive(Debug, Serialize)]
struct AssetStatus {
    path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    state: Option<RepositoryState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    decision: Option<SyncDecision>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Run the status command
///
/// Observes every asset and reports what `sync` would do to it. Only
/// read-only git queries are issued.
pub fn run_status(ctx: &ProjectContext, json: bool) -> Result<()> {
    let config = ctx.load_config()?;
    let synchronizer = Synchronizer::new(&ctx.root);

    let statuses: Vec<AssetStatus> = config
        .assets
        .iter()
        .map(|asset| match synchronizer.observe(asset) {
            Ok(state) => AssetStatus {
                path: asset.path.clone(),
                decision: Some(SyncDecision::decide(asset, &state)),
                state: Some(state),
                error: None,
            },
            Err(e) => AssetStatus {
                path: asset.path.clone(),
                state: None,
                decision: None,
                error: Some(e.to_string()),
            },
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&statuses)?);
        return Ok(());
    }

    for status in &statuses {
        let path = status.path.display().to_string();
        match (&status.decision, &status.error) {
            (Some(decision), _) => {
                let label = match decision {
                    SyncDecision::Clone => "missing, will clone".yellow(),
                    SyncDecision::Pull => "tracking, will pull".blue(),
                    SyncDecision::CheckoutRevision(pin) => {
                        format!("will check out {pin}").yellow()
                    }
                    SyncDecision::NoOp => "at pinned revision".green(),
                };
                println!("   {} {}", path.cyan(), label);
            }
            (None, Some(error)) => println!("   {} {}", path.cyan(), error.red()),
            (None, None) => {}
        }
    }
    Ok(())
}

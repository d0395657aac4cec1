//! Plan command implementation

use asset_core::{Job, Planner};
use colored::Colorize;

use crate::context::ProjectContext;
use crate::error::Result;

/// Run the plan command
///
/// Prints the units `sync` (or `clean`) would run, in execution order.
pub fn run_plan(ctx: &ProjectContext, clean: bool, json: bool) -> Result<()> {
    let config = ctx.load_config()?;
    let planner = Planner::new(&config, &ctx.root);
    let plan = if clean {
        planner.plan_clean()
    } else {
        planner.plan_sync()
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }

    for unit in &plan {
        let kind = match &unit.job {
            Job::Synchronize(_) => "sync",
            Job::Generate { .. } => "generate",
            Job::Clean { .. } => "clean",
        };
        println!("{} {}", format!("[{kind}]").cyan(), unit.description);
        if let Some(dependency) = &unit.depends_on {
            println!("      {} {}", "after".dimmed(), dependency.dimmed());
        }
    }
    Ok(())
}

//! Sync and clean command implementations

use std::path::PathBuf;

use asset_core::{ExecutionReport, Executor, Plan, Planner, Synchronizer, UnitStatus};
use colored::Colorize;

use crate::context::ProjectContext;
use crate::error::{CliError, Result};

/// Run the sync command
///
/// Synchronizes every asset (or those at `paths`) and runs their generation
/// targets. Fails if any unit did not succeed.
pub fn run_sync(ctx: &ProjectContext, paths: &[PathBuf]) -> Result<()> {
    println!("{} Synchronizing assets...", "=>".blue().bold());

    let config = ctx.load_config()?;
    let planner = Planner::new(&config, &ctx.root);
    let plan = if paths.is_empty() {
        planner.plan_sync()
    } else {
        planner.plan_sync_only(paths)?
    };

    execute(ctx, &plan)
}

/// Run the clean command
///
/// Removes every asset checkout. Missing checkouts are not an error.
pub fn run_clean(ctx: &ProjectContext) -> Result<()> {
    println!("{} Removing assets...", "=>".blue().bold());

    let config = ctx.load_config()?;
    let plan = Planner::new(&config, &ctx.root).plan_clean();

    execute(ctx, &plan)
}

fn execute(ctx: &ProjectContext, plan: &Plan) -> Result<()> {
    if plan.is_empty() {
        println!("{} No assets declared.", "OK".green().bold());
        return Ok(());
    }

    let executor = Executor::new(Synchronizer::new(&ctx.root));
    let report = executor.run(plan);
    print_report(&report);

    if report.is_success() {
        Ok(())
    } else {
        Err(CliError::user(format!(
            "{} of {} units did not complete",
            report.units.len() - report.count(UnitStatus::Succeeded),
            report.units.len()
        )))
    }
}

fn print_report(report: &ExecutionReport) {
    for unit in &report.units {
        let marker = match unit.status {
            UnitStatus::Succeeded => "ok".green().bold(),
            UnitStatus::Failed => "failed".red().bold(),
            UnitStatus::Skipped => "skipped".yellow().bold(),
        };
        println!("   {marker} {}", unit.description);
        println!("      {}", unit.message.dimmed());
    }
}

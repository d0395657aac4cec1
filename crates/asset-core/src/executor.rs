//! Sequential plan execution
//!
//! [`Executor`] is the smallest scheduler that honours a [`Plan`]: units run
//! in order, a failing unit does not stop independent ones, and a unit whose
//! dependency did not succeed is skipped.

use std::collections::HashSet;
use std::fmt;

use asset_fs::{RemoveOutcome, remove_tree};
use serde::Serialize;

use crate::Result;
use crate::generate::run_generator;
use crate::plan::{Job, Plan, UnitOfWork};
use crate::sync::Synchronizer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitStatus {
    Succeeded,
    Failed,
    Skipped,
}

impl fmt::Display for UnitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Succeeded => "ok",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
        })
    }
}

/// How one unit ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnitReport {
    pub id: String,
    pub description: String,
    pub status: UnitStatus,
    /// Outcome summary, or the error text on failure.
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExecutionReport {
    pub units: Vec<UnitReport>,
}

impl ExecutionReport {
    pub fn is_success(&self) -> bool {
        self.units.iter().all(|u| u.status == UnitStatus::Succeeded)
    }

    pub fn count(&self, status: UnitStatus) -> usize {
        self.units.iter().filter(|u| u.status == status).count()
    }
}

/// Runs plans against one project root.
#[derive(Debug, Clone)]
pub struct Executor {
    synchronizer: Synchronizer,
}

impl Executor {
    pub fn new(synchronizer: Synchronizer) -> Self {
        Self { synchronizer }
    }

    pub fn run(&self, plan: &Plan) -> ExecutionReport {
        let mut incomplete: HashSet<&str> = HashSet::new();
        let mut report = ExecutionReport::default();

        for unit in plan {
            let (status, message) = match unit.depends_on.as_deref() {
                Some(dependency) if incomplete.contains(dependency) => (
                    UnitStatus::Skipped,
                    format!("dependency {dependency} did not complete"),
                ),
                _ => match self.execute(unit) {
                    Ok(message) => (UnitStatus::Succeeded, message),
                    Err(e) => (UnitStatus::Failed, e.to_string()),
                },
            };

            tracing::debug!(unit = %unit.id, status = %status, "unit finished");
            if status != UnitStatus::Succeeded {
                incomplete.insert(unit.id.as_str());
            }
            report.units.push(UnitReport {
                id: unit.id.clone(),
                description: unit.description.clone(),
                status,
                message,
            });
        }

        report
    }

    fn execute(&self, unit: &UnitOfWork) -> Result<String> {
        match &unit.job {
            Job::Synchronize(asset) => Ok(self.synchronizer.synchronize(asset)?.to_string()),
            Job::Generate {
                path,
                content_type,
                command,
            } => {
                run_generator(command, path)?;
                Ok(format!("generated {content_type}"))
            }
            Job::Clean { path } => Ok(match remove_tree(path)? {
                RemoveOutcome::Removed => format!("removed {}", path.display()),
                RemoveOutcome::Absent => format!("{} already absent", path.display()),
            }),
        }
    }
}

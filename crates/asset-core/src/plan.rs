//! Units of work for an external scheduler
//!
//! The planner turns an [`AssetConfig`] into an ordered [`Plan`]: one
//! synchronization unit per asset, followed by one generation unit per
//! declared content type that depends on it. A clean plan holds one removal
//! unit per asset. Planning touches neither the filesystem nor git.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::Result;
use crate::config::{AssetConfig, AssetSpec};

/// The work a unit performs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Job {
    Synchronize(AssetSpec),
    Generate {
        path: PathBuf,
        content_type: String,
        command: Vec<String>,
    },
    Clean {
        path: PathBuf,
    },
}

/// One independently schedulable and retriable job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnitOfWork {
    pub id: String,
    /// Absolute path the unit works on. Units sharing a target must not run
    /// concurrently.
    pub target: PathBuf,
    pub job: Job,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depends_on: Option<String>,
    /// For reporting only.
    pub description: String,
}

/// Units in an order that satisfies every dependency.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Plan {
    pub units: Vec<UnitOfWork>,
}

impl Plan {
    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, UnitOfWork> {
        self.units.iter()
    }

    pub fn get(&self, id: &str) -> Option<&UnitOfWork> {
        self.units.iter().find(|u| u.id == id)
    }
}

impl<'a> IntoIterator for &'a Plan {
    type Item = &'a UnitOfWork;
    type IntoIter = std::slice::Iter<'a, UnitOfWork>;

    fn into_iter(self) -> Self::IntoIter {
        self.units.iter()
    }
}

/// Builds plans for a validated configuration under a project root.
#[derive(Debug, Clone)]
pub struct Planner<'a> {
    config: &'a AssetConfig,
    root: PathBuf,
}

impl<'a> Planner<'a> {
    pub fn new(config: &'a AssetConfig, root: impl Into<PathBuf>) -> Self {
        Self {
            config,
            root: root.into(),
        }
    }

    /// Synchronize every asset, then generate its targets.
    pub fn plan_sync(&self) -> Plan {
        let units = self
            .config
            .assets
            .iter()
            .flat_map(|asset| self.sync_units(asset))
            .collect();
        Plan { units }
    }

    /// [`Planner::plan_sync`] restricted to the assets at `paths`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::UnknownAsset`] for a path no asset occupies.
    /// An asset named more than once, in any spelling, is planned once.
    pub fn plan_sync_only(&self, paths: &[PathBuf]) -> Result<Plan> {
        let mut units = Vec::new();
        let mut planned = HashSet::new();
        for path in paths {
            let asset = self.config.asset(path)?;
            if planned.insert(asset.path_key()) {
                units.extend(self.sync_units(asset));
            }
        }
        Ok(Plan { units })
    }

    /// Remove every asset's checkout.
    pub fn plan_clean(&self) -> Plan {
        let units = self
            .config
            .assets
            .iter()
            .map(|asset| UnitOfWork {
                id: format!("clean:{}", asset.path.display()),
                target: asset.local_path(&self.root),
                job: Job::Clean {
                    path: asset.local_path(&self.root),
                },
                depends_on: None,
                description: format!("removing asset {}", asset.path.display()),
            })
            .collect();
        Plan { units }
    }

    fn sync_units(&self, asset: &AssetSpec) -> Vec<UnitOfWork> {
        let target = asset.local_path(&self.root);
        let sync_id = sync_id(&asset.path);

        let mut units = vec![UnitOfWork {
            id: sync_id.clone(),
            target: target.clone(),
            job: Job::Synchronize(asset.clone()),
            depends_on: None,
            description: format!(
                "setup assets for: {} in {}",
                asset.repository,
                asset.path.display()
            ),
        }];

        units.extend(asset.generate.iter().map(|content_type| UnitOfWork {
            id: format!("generate:{}:{content_type}", asset.path.display()),
            target: target.clone(),
            job: Job::Generate {
                path: target.clone(),
                content_type: content_type.clone(),
                command: self.config.generator_command(content_type),
            },
            depends_on: Some(sync_id.clone()),
            description: format!("generating objects in {}", asset.path.display()),
        }));

        units
    }
}

fn sync_id(path: &Path) -> String {
    format!("sync:{}", path.display())
}

use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

use asset_fs::{ConfigFormat, ConfigStore};
use asset_git::is_revision_id;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// One external repository and where it lands in the project tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AssetSpec {
    /// Remote locator handed to `git clone`.
    pub repository: String,

    /// Branch to clone and, when unpinned, to track.
    pub branch: String,

    /// Location relative to the project root.
    pub path: PathBuf,

    /// Pinned revision, full or abbreviated. Overrides branch tracking.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,

    /// Content types to generate after synchronization, in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub generate: Vec<String>,
}

impl AssetSpec {
    pub fn new(
        repository: impl Into<String>,
        branch: impl Into<String>,
        path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            repository: repository.into(),
            branch: branch.into(),
            path: path.into(),
            commit: None,
            generate: Vec::new(),
        }
    }

    /// Pin to `commit`.
    pub fn pinned(mut self, commit: impl Into<String>) -> Self {
        self.commit = Some(commit.into());
        self
    }

    /// Add generation targets.
    pub fn generating<I, S>(mut self, content_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.generate
            .extend(content_types.into_iter().map(Into::into));
        self
    }

    /// Where this asset lives under `root`.
    pub fn local_path(&self, root: &Path) -> PathBuf {
        root.join(&self.path)
    }

    /// Check this declaration on its own.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] naming the offending field.
    pub fn validate(&self) -> Result<()> {
        let path = self.path.display();
        if self.repository.trim().is_empty() {
            return Err(Error::configuration(format!(
                "asset at '{path}' has an empty repository"
            )));
        }
        if self.branch.trim().is_empty() {
            return Err(Error::configuration(format!(
                "asset at '{path}' has an empty branch"
            )));
        }
        if self.path.as_os_str().is_empty() {
            return Err(Error::configuration(format!(
                "asset '{}' has an empty path",
                self.repository
            )));
        }
        if self.path.is_absolute() || self.path.has_root() {
            return Err(Error::configuration(format!(
                "asset path '{path}' must be relative to the project root"
            )));
        }
        if self
            .path
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_)))
        {
            return Err(Error::configuration(format!(
                "asset path '{path}' escapes the project root"
            )));
        }
        if !matches!(self.path.components().next_back(), Some(Component::Normal(_))) {
            return Err(Error::configuration(format!(
                "asset path '{path}' does not end in a directory name"
            )));
        }
        if let Some(commit) = &self.commit
            && !is_revision_id(commit)
        {
            return Err(Error::configuration(format!(
                "asset at '{path}' pins '{commit}', which is not a hexadecimal revision"
            )));
        }
        if self.generate.iter().any(|t| t.trim().is_empty()) {
            return Err(Error::configuration(format!(
                "asset at '{path}' has an empty generate target"
            )));
        }
        Ok(())
    }

    /// `path` with `.` components dropped, used as the mutual-exclusion key.
    pub(crate) fn path_key(&self) -> PathBuf {
        self.path
            .components()
            .filter(|c| !matches!(c, Component::CurDir))
            .collect()
    }
}

/// The full set of asset declarations for a project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AssetConfig {
    #[serde(default)]
    pub assets: Vec<AssetSpec>,

    /// Program and leading arguments for generation targets. The content
    /// type is appended as the final argument.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub generator: Vec<String>,
}

impl AssetConfig {
    /// Load and validate the document at `path`.
    ///
    /// # Errors
    ///
    /// Returns a filesystem error if the file cannot be read or parsed, and
    /// [`Error::Configuration`] if it parses but is inconsistent.
    pub fn load(path: &Path) -> Result<Self> {
        let config: Self = ConfigStore::new().load(path)?;
        config.validate()?;
        tracing::debug!(path = %path.display(), assets = config.assets.len(), "loaded asset configuration");
        Ok(config)
    }

    /// Parse and validate `content` as `format`.
    pub fn parse(content: &str, format: ConfigFormat) -> Result<Self> {
        let config: Self = ConfigStore::new().parse(Path::new("<inline>"), content, format)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate every asset and the relationships between them.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for asset in &self.assets {
            asset.validate()?;

            if !seen.insert(asset.path_key()) {
                return Err(Error::configuration(format!(
                    "more than one asset is declared at '{}'",
                    asset.path.display()
                )));
            }
            if !asset.generate.is_empty() && self.generator.is_empty() {
                return Err(Error::configuration(format!(
                    "asset at '{}' declares generate targets but no generator is configured",
                    asset.path.display()
                )));
            }
        }
        Ok(())
    }

    /// The asset declared at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownAsset`] if no asset occupies `path`.
    pub fn asset(&self, path: &Path) -> Result<&AssetSpec> {
        let wanted: PathBuf = path
            .components()
            .filter(|c| !matches!(c, Component::CurDir))
            .collect();
        self.assets
            .iter()
            .find(|a| a.path_key() == wanted)
            .ok_or_else(|| Error::UnknownAsset {
                path: path.to_path_buf(),
            })
    }

    /// Full command line that generates `content_type`.
    pub fn generator_command(&self, content_type: &str) -> Vec<String> {
        let mut command = self.generator.clone();
        command.push(content_type.to_string());
        command
    }
}

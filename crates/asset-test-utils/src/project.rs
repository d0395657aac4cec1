//! [`TestProject`] builder for asset synchronization scenarios.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// One `[[assets]]` entry for [`TestProject::write_assets_toml`].
#[derive(Debug, Clone, Default)]
pub struct AssetEntry {
    pub repository: String,
    pub branch: String,
    pub path: String,
    pub commit: Option<String>,
    pub generate: Vec<String>,
}

impl AssetEntry {
    pub fn new(repository: impl Into<String>, branch: &str, path: &str) -> Self {
        Self {
            repository: repository.into(),
            branch: branch.to_string(),
            path: path.to_string(),
            ..Self::default()
        }
    }

    pub fn pinned(mut self, commit: &str) -> Self {
        self.commit = Some(commit.to_string());
        self
    }

    pub fn generating(mut self, content_types: &[&str]) -> Self {
        self.generate = content_types.iter().map(|s| s.to_string()).collect();
        self
    }

    fn to_toml(&self) -> String {
        let mut out = format!(
            "[[assets]]\nrepository = {:?}\nbranch = {:?}\npath = {:?}\n",
            self.repository, self.branch, self.path
        );
        if let Some(commit) = &self.commit {
            out.push_str(&format!("commit = {commit:?}\n"));
        }
        if !self.generate.is_empty() {
            let list = self
                .generate
                .iter()
                .map(|g| format!("{g:?}"))
                .collect::<Vec<_>>()
                .join(", ");
            out.push_str(&format!("generate = [{list}]\n"));
        }
        out
    }
}

/// A temporary project root with helper methods for test setup and
/// assertion.
///
/// # Example
///
/// ```rust,no_run
/// use asset_test_utils::{TestProject, UpstreamRepo};
/// use asset_test_utils::project::AssetEntry;
///
/// let upstream = UpstreamRepo::new();
/// let project = TestProject::new();
/// project.write_assets_toml(&[AssetEntry::new(upstream.url(), "main", "assets/docs")], None);
/// project.assert_file_exists("assets.toml");
/// ```
pub struct TestProject {
    temp_dir: TempDir,
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

impl TestProject {
    /// Create an empty temporary project root.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Return the root path of the temporary directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Absolute path of `relative` inside the project.
    pub fn join(&self, relative: &str) -> PathBuf {
        self.root().join(relative)
    }

    /// Write `assets.toml` at the project root and return its path.
    ///
    /// `generator` becomes the top-level `generator` array when given.
    pub fn write_assets_toml(&self, entries: &[AssetEntry], generator: Option<&[&str]>) -> PathBuf {
        let mut config = String::new();
        if let Some(generator) = generator {
            let list = generator
                .iter()
                .map(|g| format!("{g:?}"))
                .collect::<Vec<_>>()
                .join(", ");
            config.push_str(&format!("generator = [{list}]\n\n"));
        }
        for entry in entries {
            config.push_str(&entry.to_toml());
            config.push('\n');
        }

        let path = self.join("assets.toml");
        fs::write(&path, config).unwrap();
        path
    }

    /// Write an arbitrary file relative to the root, creating parents.
    pub fn write_file(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    /// Assert that `path` (relative to the project root) exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_file_exists(&self, path: &str) {
        let full_path = self.join(path);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }

    /// Assert that `path` (relative to the project root) does **not** exist.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path exists.
    pub fn assert_file_not_exists(&self, path: &str) {
        let full_path = self.join(path);
        assert!(
            !full_path.exists(),
            "Expected file NOT to exist: {}",
            full_path.display()
        );
    }
}

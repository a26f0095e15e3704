//! Repositories file
//!
//! Declared repositories live in `~/.config/quarry/repositories.yaml`
//! unless a path is given explicitly:
//!
//! ```yaml
//! apiVersion: quarry.io/v1
//! localRepository: ${user.home}/.m2/repository
//! repositories:
//!   - mavenCentral
//!   - https://repo.example.org/releases
//!   - name: internal
//!     url: https://repo.example.org/internal
//!   - flatDir:
//!       dirs: [libs]
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::path::{Path, PathBuf};

use crate::error::{RepoError, Result};
use crate::handler::RepositoryHandler;
use crate::infrastructure::FileResolver;
use crate::locator::MavenLocalRepositoryLocator;

/// Contents of a repositories file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoriesFile {
    /// API version
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Override for the local Maven repository location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_repository: Option<String>,

    /// Directory relative paths are resolved against
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_dir: Option<PathBuf>,

    /// Repository entries, in declaration order
    #[serde(default)]
    pub repositories: Vec<JsonValue>,
}

fn default_api_version() -> String {
    "quarry.io/v1".to_string()
}

impl Default for RepositoriesFile {
    fn default() -> Self {
        Self {
            api_version: default_api_version(),
            local_repository: None,
            base_dir: None,
            repositories: Vec::new(),
        }
    }
}

impl RepositoriesFile {
    /// Load from the default location, or an empty file if there is none
    pub fn load() -> Result<Self> {
        let path = Self::default_path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let file: Self = serde_yaml::from_str(yaml)?;
        Ok(file)
    }

    /// Save to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default repositories file path
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| RepoError::InvalidConfig {
            message: "Could not determine config directory".to_string(),
        })?;
        Ok(config_dir.join("quarry").join("repositories.yaml"))
    }

    /// File resolver for a file located in `file_dir`
    ///
    /// A relative `baseDir` is taken relative to the file itself.
    pub fn file_resolver(&self, file_dir: &Path) -> FileResolver {
        match &self.base_dir {
            Some(base) => FileResolver::new(file_dir.join(base)),
            None => FileResolver::new(file_dir),
        }
    }

    /// Local repository locator honouring `localRepository`
    pub fn locator(&self) -> MavenLocalRepositoryLocator {
        let locator = MavenLocalRepositoryLocator::from_env();
        match &self.local_repository {
            Some(location) => locator.with_override(location.clone()),
            None => locator,
        }
    }

    /// Declare every entry on `handler`, stopping at the first failure
    pub fn declare_all(&self, handler: &mut RepositoryHandler<'_>) -> Result<()> {
        for entry in &self.repositories {
            handler.declare(entry.clone())?;
        }
        Ok(())
    }
}

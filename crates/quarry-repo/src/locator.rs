//! Discovery of the locally installed Maven repository
//!
//! Lookup order:
//! 1. An explicit override (`MAVEN_REPO_LOCAL` or configuration)
//! 2. `<localRepository>` in `~/.m2/settings.xml`
//! 3. `<localRepository>` in `$M2_HOME/conf/settings.xml`
//! 4. `~/.m2/repository`
//!
//! Placeholders in configured values are expanded:
//! - `${env.NAME}`: environment variable
//! - `${sys.NAME}` or a bare `${NAME}`: system property such as `user.home`,
//!   `user.dir`, `user.name`, `os.name`, `os.arch` or `file.separator`
//!
//! The lookup probes the filesystem synchronously and never retries.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable overriding the local repository location
pub const MAVEN_REPO_LOCAL_ENV: &str = "MAVEN_REPO_LOCAL";

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$\{([^}]+)\}").expect("placeholder pattern is valid")
});

/// The locator could not determine a local repository
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct CannotLocateLocalRepository {
    message: String,
}

impl CannotLocateLocalRepository {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Finds the filesystem location of the local repository
pub trait LocalRepositoryLocator: Send + Sync + fmt::Debug {
    fn locate_local_repository(&self) -> Result<PathBuf, CannotLocateLocalRepository>;
}

/// Subset of a Maven `settings.xml`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MavenSettings {
    #[serde(default)]
    local_repository: Option<String>,
}

/// Locator following Maven's own settings resolution
#[derive(Debug, Clone, Default)]
pub struct MavenLocalRepositoryLocator {
    repo_local_override: Option<String>,
    user_home: Option<PathBuf>,
    m2_home: Option<PathBuf>,
    env: HashMap<String, String>,
    system_properties: HashMap<String, String>,
}

impl MavenLocalRepositoryLocator {
    /// Locator configured from the process environment
    pub fn from_env() -> Self {
        let env: HashMap<String, String> = std::env::vars().collect();
        Self {
            repo_local_override: env.get(MAVEN_REPO_LOCAL_ENV).cloned(),
            user_home: dirs::home_dir(),
            m2_home: env.get("M2_HOME").map(PathBuf::from),
            system_properties: system_properties(&env),
            env,
        }
    }

    /// Use this location instead of consulting settings files
    pub fn with_override(mut self, location: impl Into<String>) -> Self {
        self.repo_local_override = Some(location.into());
        self
    }

    pub fn with_user_home(mut self, home: impl Into<PathBuf>) -> Self {
        self.user_home = Some(home.into());
        self
    }

    pub fn with_m2_home(mut self, m2_home: impl Into<PathBuf>) -> Self {
        self.m2_home = Some(m2_home.into());
        self
    }

    /// Make an environment variable visible to `${env.NAME}` placeholders
    pub fn with_env_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(name.into(), value.into());
        self
    }

    /// Make a system property visible to `${sys.NAME}` and `${NAME}` placeholders
    pub fn with_system_property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.system_properties.insert(name.into(), value.into());
        self
    }

    /// `~/.m2/settings.xml`
    pub fn user_settings_file(&self) -> Option<PathBuf> {
        self.user_home
            .as_ref()
            .map(|home| home.join(".m2").join("settings.xml"))
    }

    /// `$M2_HOME/conf/settings.xml`
    pub fn global_settings_file(&self) -> Option<PathBuf> {
        self.m2_home
            .as_ref()
            .map(|m2| m2.join("conf").join("settings.xml"))
    }

    fn read_local_repository(
        &self,
        settings_file: &Path,
    ) -> Result<Option<String>, CannotLocateLocalRepository> {
        if !settings_file.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(settings_file).map_err(|e| {
            CannotLocateLocalRepository::new(format!(
                "Unable to read local Maven settings file {}: {}",
                settings_file.display(),
                e
            ))
        })?;

        let settings: MavenSettings = quick_xml::de::from_str(&content).map_err(|e| {
            CannotLocateLocalRepository::new(format!(
                "Unable to parse local Maven settings file {}: {}",
                settings_file.display(),
                e
            ))
        })?;

        Ok(settings
            .local_repository
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty()))
    }

    fn lookup_placeholder(&self, key: &str) -> Option<String> {
        if let Some(name) = key.strip_prefix("env.") {
            return self.env.get(name).cloned();
        }
        let name = key.strip_prefix("sys.").unwrap_or(key);
        if name == "user.home" {
            return self
                .user_home
                .as_ref()
                .map(|home| home.to_string_lossy().into_owned());
        }
        self.system_properties.get(name).cloned()
    }

    fn resolve_placeholders(&self, value: &str) -> Result<String, CannotLocateLocalRepository> {
        let mut resolved = String::with_capacity(value.len());
        let mut last = 0;

        for caps in PLACEHOLDER.captures_iter(value) {
            let (Some(whole), Some(key)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let replacement = self.lookup_placeholder(key.as_str()).ok_or_else(|| {
                CannotLocateLocalRepository::new(format!(
                    "Cannot resolve placeholder '{}' in value '{}'",
                    key.as_str(),
                    value
                ))
            })?;
            resolved.push_str(&value[last..whole.start()]);
            resolved.push_str(&replacement);
            last = whole.end();
        }

        resolved.push_str(&value[last..]);
        Ok(resolved)
    }
}

/// System properties derived from the running process
fn system_properties(env: &HashMap<String, String>) -> HashMap<String, String> {
    let mut properties = HashMap::new();
    if let Ok(dir) = std::env::current_dir() {
        properties.insert("user.dir".to_string(), dir.to_string_lossy().into_owned());
    }
    if let Some(user) = env.get("USER").or_else(|| env.get("USERNAME")) {
        properties.insert("user.name".to_string(), user.clone());
    }
    properties.insert("os.name".to_string(), std::env::consts::OS.to_string());
    properties.insert("os.arch".to_string(), std::env::consts::ARCH.to_string());
    properties.insert(
        "file.separator".to_string(),
        std::path::MAIN_SEPARATOR.to_string(),
    );
    properties
}

impl LocalRepositoryLocator for MavenLocalRepositoryLocator {
    fn locate_local_repository(&self) -> Result<PathBuf, CannotLocateLocalRepository> {
        if let Some(location) = &self.repo_local_override {
            tracing::debug!("Using local Maven repository override {}", location);
            return self.resolve_placeholders(location).map(PathBuf::from);
        }

        let candidates = [self.user_settings_file(), self.global_settings_file()];
        for settings_file in candidates.iter().flatten() {
            if let Some(location) = self.read_local_repository(settings_file)? {
                tracing::debug!(
                    "Local Maven repository {} configured in {}",
                    location,
                    settings_file.display()
                );
                return self.resolve_placeholders(&location).map(PathBuf::from);
            }
        }

        let home = self.user_home.as_ref().ok_or_else(|| {
            CannotLocateLocalRepository::new(
                "Cannot determine the user home directory to locate the local Maven repository",
            )
        })?;
        let location = home.join(".m2").join("repository");
        tracing::debug!("Using default local Maven repository {}", location.display());
        Ok(location)
    }
}

//! CLI commands

pub mod local;
pub mod resolve;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use quarry_repo::{DefaultRepositoryFactory, RepositoriesFile, SharedInfrastructure};

use crate::error::Result;

/// Load the repositories file and build a factory around it
///
/// Without an explicit path the default file is used, and a missing
/// default file behaves like an empty one. Relative paths resolve against
/// the directory holding the file in both cases.
pub fn load_factory(file: Option<&Path>) -> Result<(RepositoriesFile, DefaultRepositoryFactory)> {
    let path = repositories_path(file)?;
    let repositories = if file.is_some() || path.exists() {
        RepositoriesFile::load_from(&path)?
    } else {
        RepositoriesFile::default()
    };
    let file_dir = parent_dir(&path)?;

    tracing::debug!(
        api_version = %repositories.api_version,
        entries = repositories.repositories.len(),
        "loaded repositories file"
    );

    let factory = DefaultRepositoryFactory::new(
        Arc::new(repositories.locator()),
        repositories.file_resolver(&file_dir),
        SharedInfrastructure::default(),
    );
    Ok((repositories, factory))
}

fn repositories_path(file: Option<&Path>) -> Result<PathBuf> {
    match file {
        Some(path) => Ok(path.to_path_buf()),
        None => Ok(RepositoriesFile::default_path()?),
    }
}

/// Absolute directory containing `path`
fn parent_dir(path: &Path) -> Result<PathBuf> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    if parent.is_absolute() {
        Ok(parent)
    } else {
        Ok(std::env::current_dir()?.join(parent))
    }
}

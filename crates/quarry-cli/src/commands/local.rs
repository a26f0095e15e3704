//! Local command - show the local Maven repository

use quarry_repo::RepositoryFactory;
use std::path::Path;

use crate::error::Result;

/// Run the local command
pub fn run(file: Option<&Path>) -> Result<()> {
    let (_, factory) = super::load_factory(file)?;
    let repo = factory.create_maven_local_repository()?;

    if let Some(url) = repo.url() {
        println!("{}", url);
    }
    Ok(())
}

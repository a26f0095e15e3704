//! Resolve command - create every declared repository

use console::style;
use quarry_repo::RepositoryHandler;
use std::path::Path;

use crate::display::{RepositoryRow, render_table};
use crate::error::{CliError, Result};

/// Run the resolve command
pub fn run(file: Option<&Path>, output_json: bool) -> Result<()> {
    let (repositories, factory) = super::load_factory(file)?;

    let mut handler = RepositoryHandler::new(&factory);
    repositories.declare_all(&mut handler)?;

    let rows: Vec<RepositoryRow> = handler.repositories().iter().map(RepositoryRow::from).collect();

    if output_json {
        let json = serde_json::to_string_pretty(&rows)
            .map_err(|e| CliError::internal(e.to_string()))?;
        println!("{}", json);
        return Ok(());
    }

    if rows.is_empty() {
        println!("No repositories declared");
        println!(
            "  {} add entries under {} in the repositories file",
            style("hint:").cyan(),
            style("repositories").bold()
        );
        return Ok(());
    }

    println!("{}", render_table(&rows));
    Ok(())
}

//! Display formatting for CLI output

use quarry_repo::{ArtifactRepository, RepositoryKind};
use serde::Serialize;

/// One line of the repository listing
#[derive(Debug, Clone, Serialize)]
pub struct RepositoryRow {
    pub name: String,
    pub kind: RepositoryKind,
    pub location: String,
    pub authenticated: bool,
}

impl From<&ArtifactRepository> for RepositoryRow {
    fn from(repo: &ArtifactRepository) -> Self {
        let location = match (repo.url(), repo.as_flat_dir()) {
            (Some(url), _) => url.to_string(),
            (None, Some(flat)) if !flat.dirs().is_empty() => flat
                .dirs()
                .iter()
                .map(|d| d.display().to_string())
                .collect::<Vec<_>>()
                .join(", "),
            _ => "-".to_string(),
        };

        Self {
            name: repo.name().to_string(),
            kind: repo.kind(),
            location,
            authenticated: repo.credentials().is_some_and(|c| !c.is_empty()),
        }
    }
}

/// Render rows as a plain aligned table
pub fn render_table(rows: &[RepositoryRow]) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(format!("{:<20} {:<10} {}", "NAME", "KIND", "LOCATION"));
    lines.push("-".repeat(60));

    for row in rows {
        let location = if row.authenticated {
            format!("{} (authenticated)", row.location)
        } else {
            row.location.clone()
        };
        lines.push(format!("{:<20} {:<10} {}", row.name, row.kind.to_string(), location));
    }

    lines.join("\n")
}

//! Ordered list of declared repositories
//!
//! Mirrors a build script's `repositories { }` block: shorthands for the
//! well-known repositories, map based declarations for each kind, and
//! unique naming of everything that is added.

use serde_json::{Map, Value as JsonValue};

use crate::configure::configure_by_map;
use crate::error::{RepoError, Result};
use crate::factory::{Notation, RepositoryFactory};
use crate::repository::ArtifactRepository;

/// Default name of the Maven Central repository
pub const MAVEN_CENTRAL_NAME: &str = "MavenRepo";

/// Default name of the local Maven repository
pub const MAVEN_LOCAL_NAME: &str = "MavenLocal";

/// Repositories declared against a factory, in declaration order
pub struct RepositoryHandler<'a> {
    factory: &'a dyn RepositoryFactory,
    repositories: Vec<ArtifactRepository>,
}

impl<'a> RepositoryHandler<'a> {
    pub fn new(factory: &'a dyn RepositoryFactory) -> Self {
        Self {
            factory,
            repositories: Vec::new(),
        }
    }

    /// Declare Maven Central
    pub fn maven_central(&mut self) -> Result<&ArtifactRepository> {
        self.maven_central_with(&Map::new())
    }

    /// Declare Maven Central, then apply `properties`
    pub fn maven_central_with(
        &mut self,
        properties: &Map<String, JsonValue>,
    ) -> Result<&ArtifactRepository> {
        let mut repo = self.factory.create_maven_central_repository();
        repo.set_name(MAVEN_CENTRAL_NAME);
        configure_by_map(properties, &mut repo)?;
        self.push(repo.into(), properties.contains_key("name"))
    }

    /// Declare the locally installed Maven repository
    pub fn maven_local(&mut self) -> Result<&ArtifactRepository> {
        self.maven_local_with(&Map::new())
    }

    /// Declare the local Maven repository, then apply `properties`
    pub fn maven_local_with(
        &mut self,
        properties: &Map<String, JsonValue>,
    ) -> Result<&ArtifactRepository> {
        let mut repo = self.factory.create_maven_local_repository()?;
        repo.set_name(MAVEN_LOCAL_NAME);
        configure_by_map(properties, &mut repo)?;
        self.push(repo.into(), properties.contains_key("name"))
    }

    /// Declare a Maven repository configured by `properties`
    pub fn maven(&mut self, properties: &Map<String, JsonValue>) -> Result<&ArtifactRepository> {
        let mut repo = self.factory.create_maven_repository();
        configure_by_map(properties, &mut repo)?;
        self.push(repo.into(), properties.contains_key("name"))
    }

    /// Declare an Ivy repository configured by `properties`
    pub fn ivy(&mut self, properties: &Map<String, JsonValue>) -> Result<&ArtifactRepository> {
        let mut repo = self.factory.create_ivy_repository();
        configure_by_map(properties, &mut repo)?;
        self.push(repo.into(), properties.contains_key("name"))
    }

    /// Declare a flat directory repository configured by `properties`
    pub fn flat_dir(&mut self, properties: &Map<String, JsonValue>) -> Result<&ArtifactRepository> {
        let mut repo = self.factory.create_flat_dir_repository();
        configure_by_map(properties, &mut repo)?;
        self.push(repo.into(), properties.contains_key("name"))
    }

    /// Declare a repository from any notation the factory accepts
    pub fn add(&mut self, notation: Notation) -> Result<&ArtifactRepository> {
        let explicit_name = match &notation {
            Notation::Repository(repo) => !repo.has_default_name(),
            Notation::Resolver(_) => true,
            Notation::Value(JsonValue::Object(map)) => map.contains_key("name"),
            Notation::Value(_) => false,
        };
        let repo = self.factory.create_repository(notation)?;
        self.push(repo, explicit_name)
    }

    /// Declare one entry of a repositories file
    ///
    /// Accepts `mavenCentral` / `mavenLocal` shorthands, single-key maps
    /// naming a repository kind (`maven`, `ivy`, `flatDir`, `mavenCentral`,
    /// `mavenLocal`), or any other notation.
    pub fn declare(&mut self, entry: JsonValue) -> Result<&ArtifactRepository> {
        match &entry {
            JsonValue::String(s) if s == "mavenCentral" => return self.maven_central(),
            JsonValue::String(s) if s == "mavenLocal" => return self.maven_local(),
            JsonValue::Object(map) if map.len() == 1 => {
                if let Some((kind, config)) = map.iter().next() {
                    if is_shorthand(kind) {
                        let properties = shorthand_properties(kind, config)?;
                        return match kind.as_str() {
                            "mavenCentral" => self.maven_central_with(&properties),
                            "mavenLocal" => self.maven_local_with(&properties),
                            "maven" => self.maven(&properties),
                            "ivy" => self.ivy(&properties),
                            _ => self.flat_dir(&properties),
                        };
                    }
                }
            }
            _ => {}
        }
        self.add(entry.into())
    }

    pub fn repositories(&self) -> &[ArtifactRepository] {
        &self.repositories
    }

    pub fn into_repositories(self) -> Vec<ArtifactRepository> {
        self.repositories
    }

    pub fn get(&self, name: &str) -> Option<&ArtifactRepository> {
        self.repositories.iter().find(|r| r.name() == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.repositories.iter().map(|r| r.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.repositories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.repositories.is_empty()
    }

    /// Default names get a numeric suffix on collision; explicit names must be unique
    fn push(
        &mut self,
        mut repo: ArtifactRepository,
        explicit_name: bool,
    ) -> Result<&ArtifactRepository> {
        if self.get(repo.name()).is_some() {
            if explicit_name {
                return Err(RepoError::DuplicateRepository {
                    name: repo.name().to_string(),
                });
            }
            let unique = self.unique_name(repo.name());
            repo.set_name(unique);
        }

        tracing::debug!("Declared {} repository '{}'", repo.kind(), repo.name());
        let index = self.repositories.len();
        self.repositories.push(repo);
        Ok(&self.repositories[index])
    }

    fn unique_name(&self, base: &str) -> String {
        (2..)
            .map(|n| format!("{}{}", base, n))
            .find(|candidate| self.get(candidate).is_none())
            .unwrap_or_else(|| base.to_string())
    }
}

fn is_shorthand(key: &str) -> bool {
    matches!(key, "mavenCentral" | "mavenLocal" | "maven" | "ivy" | "flatDir")
}

fn shorthand_properties(kind: &str, config: &JsonValue) -> Result<Map<String, JsonValue>> {
    match config {
        JsonValue::Null => Ok(Map::new()),
        JsonValue::Object(map) => Ok(map.clone()),
        other => Err(RepoError::InvalidConfig {
            message: format!("'{}' expects a map of properties, got {}", kind, other),
        }),
    }
}

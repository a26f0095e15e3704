//! Artifact repository variants
//!
//! Provides the closed set of repository kinds the resolution engine can query:
//! - **Maven**: a Maven-layout repository at a URL
//! - **Ivy**: an Ivy repository described by a URL plus layout patterns
//! - **Flat directory**: plain directories searched by file name
//! - **Custom**: a bridge around a legacy [`DependencyResolver`]

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use crate::credentials::PasswordCredentials;
use crate::error::RepoError;
use crate::infrastructure::{FileResolver, SharedInfrastructure, TransportFactory};

/// Maven Central, the well-known public default
pub const MAVEN_CENTRAL_URL: &str = "https://repo1.maven.org/maven2/";

/// Repository kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RepositoryKind {
    Maven,
    Ivy,
    FlatDir,
    Custom,
}

impl fmt::Display for RepositoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RepositoryKind::Maven => "maven",
            RepositoryKind::Ivy => "ivy",
            RepositoryKind::FlatDir => "flatDir",
            RepositoryKind::Custom => "custom",
        };
        f.write_str(name)
    }
}

/// Legacy resolver implementation supplied by a build script
///
/// Such resolvers manage their own credentials and transport configuration.
pub trait DependencyResolver: Send + Sync + fmt::Debug {
    /// Resolver name
    fn name(&self) -> &str;
}

/// A configured artifact repository
#[derive(Debug, Clone)]
pub enum ArtifactRepository {
    Maven(MavenArtifactRepository),
    Ivy(IvyArtifactRepository),
    FlatDir(FlatDirArtifactRepository),
    Custom(CustomResolverArtifactRepository),
}

impl ArtifactRepository {
    pub fn name(&self) -> &str {
        match self {
            ArtifactRepository::Maven(repo) => repo.name(),
            ArtifactRepository::Ivy(repo) => repo.name(),
            ArtifactRepository::FlatDir(repo) => repo.name(),
            ArtifactRepository::Custom(repo) => repo.name(),
        }
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        match self {
            ArtifactRepository::Maven(repo) => repo.set_name(name),
            ArtifactRepository::Ivy(repo) => repo.set_name(name),
            ArtifactRepository::FlatDir(repo) => repo.set_name(name),
            ArtifactRepository::Custom(repo) => repo.set_name(name),
        }
    }

    pub fn kind(&self) -> RepositoryKind {
        match self {
            ArtifactRepository::Maven(_) => RepositoryKind::Maven,
            ArtifactRepository::Ivy(_) => RepositoryKind::Ivy,
            ArtifactRepository::FlatDir(_) => RepositoryKind::FlatDir,
            ArtifactRepository::Custom(_) => RepositoryKind::Custom,
        }
    }

    /// Whether the repository still carries its kind's default name
    ///
    /// Custom resolver repositories are always named by their resolver.
    pub fn has_default_name(&self) -> bool {
        match self {
            ArtifactRepository::Maven(repo) => repo.name() == MavenArtifactRepository::DEFAULT_NAME,
            ArtifactRepository::Ivy(repo) => repo.name() == IvyArtifactRepository::DEFAULT_NAME,
            ArtifactRepository::FlatDir(repo) => {
                repo.name() == FlatDirArtifactRepository::DEFAULT_NAME
            }
            ArtifactRepository::Custom(_) => false,
        }
    }

    /// Endpoint URL, for the kinds that have one
    pub fn url(&self) -> Option<&str> {
        match self {
            ArtifactRepository::Maven(repo) => repo.url(),
            ArtifactRepository::Ivy(repo) => repo.url(),
            ArtifactRepository::FlatDir(_) | ArtifactRepository::Custom(_) => None,
        }
    }

    /// Credentials owned by this repository
    pub fn credentials(&self) -> Option<&PasswordCredentials> {
        match self {
            ArtifactRepository::Maven(repo) => Some(repo.credentials()),
            ArtifactRepository::Ivy(repo) => Some(repo.credentials()),
            ArtifactRepository::FlatDir(_) | ArtifactRepository::Custom(_) => None,
        }
    }

    /// Transport factory the repository was bound to
    pub fn transport_factory(&self) -> &Arc<dyn TransportFactory> {
        match self {
            ArtifactRepository::Maven(repo) => repo.infrastructure().transport_factory(),
            ArtifactRepository::Ivy(repo) => repo.infrastructure().transport_factory(),
            ArtifactRepository::FlatDir(repo) => repo.transport_factory(),
            ArtifactRepository::Custom(repo) => repo.transport_factory(),
        }
    }

    pub fn as_maven(&self) -> Option<&MavenArtifactRepository> {
        match self {
            ArtifactRepository::Maven(repo) => Some(repo),
            _ => None,
        }
    }

    pub fn as_ivy(&self) -> Option<&IvyArtifactRepository> {
        match self {
            ArtifactRepository::Ivy(repo) => Some(repo),
            _ => None,
        }
    }

    pub fn as_flat_dir(&self) -> Option<&FlatDirArtifactRepository> {
        match self {
            ArtifactRepository::FlatDir(repo) => Some(repo),
            _ => None,
        }
    }
}

impl From<MavenArtifactRepository> for ArtifactRepository {
    fn from(repo: MavenArtifactRepository) -> Self {
        ArtifactRepository::Maven(repo)
    }
}

impl From<IvyArtifactRepository> for ArtifactRepository {
    fn from(repo: IvyArtifactRepository) -> Self {
        ArtifactRepository::Ivy(repo)
    }
}

impl From<FlatDirArtifactRepository> for ArtifactRepository {
    fn from(repo: FlatDirArtifactRepository) -> Self {
        ArtifactRepository::FlatDir(repo)
    }
}

impl From<CustomResolverArtifactRepository> for ArtifactRepository {
    fn from(repo: CustomResolverArtifactRepository) -> Self {
        ArtifactRepository::Custom(repo)
    }
}

// ============ Maven ============

/// Maven-layout repository
#[derive(Debug, Clone)]
pub struct MavenArtifactRepository {
    name: String,
    url: Option<String>,
    artifact_urls: Vec<String>,
    credentials: PasswordCredentials,
    infrastructure: SharedInfrastructure,
}

impl MavenArtifactRepository {
    pub const DEFAULT_NAME: &'static str = "maven";

    /// Create a repository with no URL
    pub fn new(credentials: PasswordCredentials, infrastructure: SharedInfrastructure) -> Self {
        Self {
            name: Self::DEFAULT_NAME.to_string(),
            url: None,
            artifact_urls: Vec::new(),
            credentials,
            infrastructure,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Set the endpoint URL verbatim; the transport validates it on use
    pub fn set_url(&mut self, url: impl Into<String>) {
        self.url = Some(url.into());
    }

    /// Additional locations searched for artifacts (not POMs)
    pub fn artifact_urls(&self) -> &[String] {
        &self.artifact_urls
    }

    pub fn add_artifact_url(&mut self, url: impl Into<String>) {
        self.artifact_urls.push(url.into());
    }

    pub fn set_artifact_urls(&mut self, urls: Vec<String>) {
        self.artifact_urls = urls;
    }

    pub fn credentials(&self) -> &PasswordCredentials {
        &self.credentials
    }

    pub fn credentials_mut(&mut self) -> &mut PasswordCredentials {
        &mut self.credentials
    }

    pub fn infrastructure(&self) -> &SharedInfrastructure {
        &self.infrastructure
    }
}

// ============ Ivy ============

/// Well-known Ivy repository layouts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IvyLayout {
    #[default]
    Gradle,
    Maven,
    Ivy,
}

impl IvyLayout {
    /// Pattern for artifact files, relative to the repository URL
    pub fn artifact_pattern(&self) -> &'static str {
        match self {
            IvyLayout::Gradle | IvyLayout::Maven => {
                "[organisation]/[module]/[revision]/[artifact]-[revision](-[classifier])(.[ext])"
            }
            IvyLayout::Ivy => "[organisation]/[module]/[revision]/[type]s/[artifact](.[ext])",
        }
    }

    /// Pattern for ivy descriptor files, relative to the repository URL
    pub fn ivy_pattern(&self) -> &'static str {
        match self {
            IvyLayout::Gradle | IvyLayout::Maven => {
                "[organisation]/[module]/[revision]/ivy-[revision].xml"
            }
            IvyLayout::Ivy => "[organisation]/[module]/[revision]/[type]s/[artifact](.[ext])",
        }
    }

    /// Whether dots in the organisation become directory separators
    pub fn is_m2_compatible(&self) -> bool {
        matches!(self, IvyLayout::Maven)
    }
}

impl FromStr for IvyLayout {
    type Err = RepoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gradle" => Ok(IvyLayout::Gradle),
            "maven" => Ok(IvyLayout::Maven),
            "ivy" => Ok(IvyLayout::Ivy),
            other => Err(RepoError::property(
                "layout",
                "Ivy repository",
                format!(
                    "unknown layout '{}', expected one of: gradle, maven, ivy",
                    other
                ),
            )),
        }
    }
}

/// Ivy repository
#[derive(Debug, Clone)]
pub struct IvyArtifactRepository {
    name: String,
    url: Option<String>,
    layout: IvyLayout,
    artifact_patterns: Vec<String>,
    ivy_patterns: Vec<String>,
    credentials: PasswordCredentials,
    infrastructure: SharedInfrastructure,
}

impl IvyArtifactRepository {
    pub const DEFAULT_NAME: &'static str = "ivy";

    /// Create a repository with no URL and the default layout
    pub fn new(credentials: PasswordCredentials, infrastructure: SharedInfrastructure) -> Self {
        Self {
            name: Self::DEFAULT_NAME.to_string(),
            url: None,
            layout: IvyLayout::default(),
            artifact_patterns: Vec::new(),
            ivy_patterns: Vec::new(),
            credentials,
            infrastructure,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn set_url(&mut self, url: impl Into<String>) {
        self.url = Some(url.into());
    }

    pub fn layout(&self) -> IvyLayout {
        self.layout
    }

    pub fn set_layout(&mut self, layout: IvyLayout) {
        self.layout = layout;
    }

    /// Add an absolute artifact pattern searched after the layout's own
    pub fn add_artifact_pattern(&mut self, pattern: impl Into<String>) {
        self.artifact_patterns.push(pattern.into());
    }

    /// Add an absolute ivy descriptor pattern searched after the layout's own
    pub fn add_ivy_pattern(&mut self, pattern: impl Into<String>) {
        self.ivy_patterns.push(pattern.into());
    }

    /// All artifact patterns: the layout pattern under the URL, then extras
    pub fn resolved_artifact_patterns(&self) -> Vec<String> {
        self.resolve_patterns(self.layout.artifact_pattern(), &self.artifact_patterns)
    }

    /// All ivy descriptor patterns: the layout pattern under the URL, then extras.
    /// Falls back to the artifact patterns when none are configured.
    pub fn resolved_ivy_patterns(&self) -> Vec<String> {
        let patterns = self.resolve_patterns(self.layout.ivy_pattern(), &self.ivy_patterns);
        if patterns.is_empty() {
            self.resolved_artifact_patterns()
        } else {
            patterns
        }
    }

    fn resolve_patterns(&self, layout_pattern: &str, extra: &[String]) -> Vec<String> {
        let mut patterns = Vec::with_capacity(extra.len() + 1);
        if let Some(url) = &self.url {
            patterns.push(format!("{}/{}", url.trim_end_matches('/'), layout_pattern));
        }
        patterns.extend(extra.iter().cloned());
        patterns
    }

    pub fn credentials(&self) -> &PasswordCredentials {
        &self.credentials
    }

    pub fn credentials_mut(&mut self) -> &mut PasswordCredentials {
        &mut self.credentials
    }

    pub fn infrastructure(&self) -> &SharedInfrastructure {
        &self.infrastructure
    }
}

// ============ Flat directory ============

/// Repository searching plain directories for artifacts by file name
#[derive(Debug, Clone)]
pub struct FlatDirArtifactRepository {
    name: String,
    dirs: Vec<PathBuf>,
    file_resolver: FileResolver,
    transport_factory: Arc<dyn TransportFactory>,
}

impl FlatDirArtifactRepository {
    pub const DEFAULT_NAME: &'static str = "flatDir";

    /// Create a repository with no search directories
    pub fn new(file_resolver: FileResolver, transport_factory: Arc<dyn TransportFactory>) -> Self {
        Self {
            name: Self::DEFAULT_NAME.to_string(),
            dirs: Vec::new(),
            file_resolver,
            transport_factory,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Search directories, already resolved
    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// Add a search directory, resolved against the project directory
    pub fn dir(&mut self, dir: impl AsRef<Path>) {
        let resolved = self.file_resolver.resolve(dir);
        if !self.dirs.contains(&resolved) {
            self.dirs.push(resolved);
        }
    }

    /// Replace the search directories
    pub fn set_dirs<I, P>(&mut self, dirs: I)
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        self.dirs.clear();
        for dir in dirs {
            self.dir(dir);
        }
    }

    pub fn transport_factory(&self) -> &Arc<dyn TransportFactory> {
        &self.transport_factory
    }
}

// ============ Custom resolver bridge ============

/// Adapter exposing a legacy resolver as an artifact repository
#[derive(Debug, Clone)]
pub struct CustomResolverArtifactRepository {
    name: String,
    resolver: Arc<dyn DependencyResolver>,
    transport_factory: Arc<dyn TransportFactory>,
}

impl CustomResolverArtifactRepository {
    pub fn new(
        resolver: Arc<dyn DependencyResolver>,
        transport_factory: Arc<dyn TransportFactory>,
    ) -> Self {
        Self {
            name: resolver.name().to_string(),
            resolver,
            transport_factory,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn resolver(&self) -> &Arc<dyn DependencyResolver> {
        &self.resolver
    }

    pub fn transport_factory(&self) -> &Arc<dyn TransportFactory> {
        &self.transport_factory
    }
}

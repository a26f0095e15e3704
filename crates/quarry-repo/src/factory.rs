//! Repository factory
//!
//! Turns a user supplied repository notation into a configured
//! [`ArtifactRepository`]. Classification order matters:
//!
//! 1. An existing repository is returned unchanged
//! 2. A string becomes a Maven repository with that URL
//! 3. A map becomes a Maven repository configured by the map
//! 4. A legacy resolver is wrapped in a custom resolver repository
//! 5. Anything else is rejected

use serde_json::{Map, Value as JsonValue};
use std::fmt;
use std::sync::Arc;
use url::Url;

use crate::configure::configure_by_map;
use crate::credentials::{CredentialFactory, DefaultCredentialFactory, PasswordCredentials};
use crate::error::{RepoError, Result};
use crate::infrastructure::{FileResolver, SharedInfrastructure};
use crate::locator::LocalRepositoryLocator;
use crate::repository::{
    ArtifactRepository, CustomResolverArtifactRepository, DependencyResolver,
    FlatDirArtifactRepository, IvyArtifactRepository, MAVEN_CENTRAL_URL, MavenArtifactRepository,
};

/// Untyped repository notation as written by a user
#[derive(Debug, Clone)]
pub enum Notation {
    /// An already built repository
    Repository(ArtifactRepository),
    /// A legacy resolver implementation
    Resolver(Arc<dyn DependencyResolver>),
    /// A dynamic value: only strings and maps are accepted
    Value(JsonValue),
}

/// A classified notation with its typed payload
#[derive(Debug)]
pub enum Descriptor {
    Existing(ArtifactRepository),
    Url(String),
    Properties(Map<String, JsonValue>),
    Resolver(Arc<dyn DependencyResolver>),
}

impl Notation {
    /// Classify the notation, rejecting unsupported shapes
    pub fn classify(self) -> Result<Descriptor> {
        match self {
            Notation::Repository(repo) => Ok(Descriptor::Existing(repo)),
            Notation::Value(JsonValue::String(url)) => Ok(Descriptor::Url(url)),
            Notation::Value(JsonValue::Object(properties)) => {
                Ok(Descriptor::Properties(properties))
            }
            Notation::Resolver(resolver) => Ok(Descriptor::Resolver(resolver)),
            Notation::Value(other) => Err(RepoError::UnsupportedDescriptor {
                descriptor: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Notation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notation::Repository(repo) => write!(f, "{} repository '{}'", repo.kind(), repo.name()),
            Notation::Resolver(resolver) => write!(f, "resolver '{}'", resolver.name()),
            Notation::Value(JsonValue::String(s)) => f.write_str(s),
            Notation::Value(other) => write!(f, "{}", other),
        }
    }
}

impl From<ArtifactRepository> for Notation {
    fn from(repo: ArtifactRepository) -> Self {
        Notation::Repository(repo)
    }
}

impl From<MavenArtifactRepository> for Notation {
    fn from(repo: MavenArtifactRepository) -> Self {
        Notation::Repository(repo.into())
    }
}

impl From<IvyArtifactRepository> for Notation {
    fn from(repo: IvyArtifactRepository) -> Self {
        Notation::Repository(repo.into())
    }
}

impl From<FlatDirArtifactRepository> for Notation {
    fn from(repo: FlatDirArtifactRepository) -> Self {
        Notation::Repository(repo.into())
    }
}

impl From<Arc<dyn DependencyResolver>> for Notation {
    fn from(resolver: Arc<dyn DependencyResolver>) -> Self {
        Notation::Resolver(resolver)
    }
}

impl From<JsonValue> for Notation {
    fn from(value: JsonValue) -> Self {
        Notation::Value(value)
    }
}

impl From<Map<String, JsonValue>> for Notation {
    fn from(properties: Map<String, JsonValue>) -> Self {
        Notation::Value(JsonValue::Object(properties))
    }
}

impl From<&str> for Notation {
    fn from(url: &str) -> Self {
        Notation::Value(JsonValue::String(url.to_string()))
    }
}

impl From<String> for Notation {
    fn from(url: String) -> Self {
        Notation::Value(JsonValue::String(url))
    }
}

/// Builds artifact repositories
pub trait RepositoryFactory {
    /// Build a repository from any supported notation
    fn create_repository(&self, notation: Notation) -> Result<ArtifactRepository>;

    /// Flat directory repository with no directories
    fn create_flat_dir_repository(&self) -> FlatDirArtifactRepository;

    /// Maven repository with no URL
    fn create_maven_repository(&self) -> MavenArtifactRepository;

    /// Maven repository pointing at the locally installed repository
    fn create_maven_local_repository(&self) -> Result<MavenArtifactRepository>;

    /// Maven repository pointing at Maven Central
    fn create_maven_central_repository(&self) -> MavenArtifactRepository;

    /// Ivy repository with no URL
    fn create_ivy_repository(&self) -> IvyArtifactRepository;
}

/// Default factory wiring repositories with shared infrastructure
///
/// Holds no record of the repositories it builds; every call returns a new,
/// exclusively owned value.
#[derive(Debug, Clone)]
pub struct DefaultRepositoryFactory {
    local_repository_locator: Arc<dyn LocalRepositoryLocator>,
    file_resolver: FileResolver,
    credential_factory: Arc<dyn CredentialFactory>,
    infrastructure: SharedInfrastructure,
}

impl DefaultRepositoryFactory {
    pub fn new(
        local_repository_locator: Arc<dyn LocalRepositoryLocator>,
        file_resolver: FileResolver,
        infrastructure: SharedInfrastructure,
    ) -> Self {
        Self {
            local_repository_locator,
            file_resolver,
            credential_factory: Arc::new(DefaultCredentialFactory),
            infrastructure,
        }
    }

    /// Replace the factory used to mint credential holders
    pub fn with_credential_factory(mut self, credential_factory: Arc<dyn CredentialFactory>) -> Self {
        self.credential_factory = credential_factory;
        self
    }

    pub fn infrastructure(&self) -> &SharedInfrastructure {
        &self.infrastructure
    }

    pub fn file_resolver(&self) -> &FileResolver {
        &self.file_resolver
    }

    fn create_password_credentials(&self) -> PasswordCredentials {
        self.credential_factory.create_password_credentials()
    }

    /// `file:` URL for a local repository directory
    fn local_repository_url(&self, location: &std::path::Path) -> Result<String> {
        let location = self.file_resolver.resolve(location);
        Url::from_directory_path(&location)
            .map(String::from)
            .map_err(|_| RepoError::LocalRepositoryUnavailable {
                message: format!(
                    "Local Maven repository location {} cannot be used as a URL",
                    location.display()
                ),
            })
    }
}

impl RepositoryFactory for DefaultRepositoryFactory {
    fn create_repository(&self, notation: Notation) -> Result<ArtifactRepository> {
        match notation.classify()? {
            Descriptor::Existing(repo) => Ok(repo),
            Descriptor::Url(url) => {
                let mut repo = self.create_maven_repository();
                repo.set_url(url);
                Ok(repo.into())
            }
            Descriptor::Properties(properties) => {
                let mut repo = self.create_maven_repository();
                configure_by_map(&properties, &mut repo)?;
                Ok(repo.into())
            }
            Descriptor::Resolver(resolver) => {
                tracing::debug!("Wrapping custom resolver '{}'", resolver.name());
                let transport_factory = self.infrastructure.transport_factory().clone();
                Ok(CustomResolverArtifactRepository::new(resolver, transport_factory).into())
            }
        }
    }

    fn create_flat_dir_repository(&self) -> FlatDirArtifactRepository {
        tracing::debug!("Creating flat directory repository");
        FlatDirArtifactRepository::new(
            self.file_resolver.clone(),
            self.infrastructure.transport_factory().clone(),
        )
    }

    fn create_maven_repository(&self) -> MavenArtifactRepository {
        tracing::debug!("Creating Maven repository");
        MavenArtifactRepository::new(
            self.create_password_credentials(),
            self.infrastructure.clone(),
        )
    }

    fn create_maven_local_repository(&self) -> Result<MavenArtifactRepository> {
        let mut repo = self.create_maven_repository();
        let location = self
            .local_repository_locator
            .locate_local_repository()
            .map_err(|e| RepoError::LocalRepositoryUnavailable {
                message: e.message().to_string(),
            })?;
        repo.set_url(self.local_repository_url(&location)?);
        Ok(repo)
    }

    fn create_maven_central_repository(&self) -> MavenArtifactRepository {
        let mut repo = self.create_maven_repository();
        repo.set_url(MAVEN_CENTRAL_URL);
        repo
    }

    fn create_ivy_repository(&self) -> IvyArtifactRepository {
        tracing::debug!("Creating Ivy repository");
        IvyArtifactRepository::new(
            self.create_password_credentials(),
            self.infrastructure.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locator::CannotLocateLocalRepository;
    use crate::repository::RepositoryKind;
    use serde_json::json;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug)]
    struct FixedLocator(std::result::Result<PathBuf, CannotLocateLocalRepository>);

    impl LocalRepositoryLocator for FixedLocator {
        fn locate_local_repository(&self) -> std::result::Result<PathBuf, CannotLocateLocalRepository> {
            self.0.clone()
        }
    }

    #[derive(Debug, Default)]
    struct CountingCredentialFactory {
        minted: AtomicUsize,
    }

    impl CredentialFactory for CountingCredentialFactory {
        fn create_password_credentials(&self) -> PasswordCredentials {
            self.minted.fetch_add(1, Ordering::SeqCst);
            PasswordCredentials::new()
        }
    }

    #[derive(Debug)]
    struct LegacyResolver;

    impl DependencyResolver for LegacyResolver {
        fn name(&self) -> &str {
            "legacy-resolver"
        }
    }

    fn factory_with_locator(
        locator: std::result::Result<PathBuf, CannotLocateLocalRepository>,
    ) -> DefaultRepositoryFactory {
        DefaultRepositoryFactory::new(
            Arc::new(FixedLocator(locator)),
            FileResolver::new("/project"),
            SharedInfrastructure::default(),
        )
    }

    fn factory() -> DefaultRepositoryFactory {
        factory_with_locator(Ok(PathBuf::from("/home/dev/.m2/repository")))
    }

    #[test]
    fn test_existing_repository_passes_through() {
        let counter = Arc::new(CountingCredentialFactory::default());
        let factory = factory().with_credential_factory(counter.clone());

        let mut existing = factory.create_maven_repository();
        existing.set_name("preconfigured");
        existing.set_url("https://example.org/existing");
        existing.credentials_mut().set_username(Some("alice".to_string()));
        assert_eq!(counter.minted.load(Ordering::SeqCst), 1);

        let repo = factory.create_repository(existing.into()).unwrap();

        assert_eq!(counter.minted.load(Ordering::SeqCst), 1);
        let maven = repo.as_maven().unwrap();
        assert_eq!(maven.name(), "preconfigured");
        assert_eq!(maven.url(), Some("https://example.org/existing"));
        assert_eq!(maven.credentials().username.as_deref(), Some("alice"));
    }

    #[test]
    fn test_string_becomes_maven_repository() {
        let repo = factory()
            .create_repository("https://example.org/repo".into())
            .unwrap();

        assert_eq!(repo.kind(), RepositoryKind::Maven);
        assert_eq!(repo.url(), Some("https://example.org/repo"));
        let credentials = repo.credentials().unwrap();
        assert_eq!(credentials.username, None);
        assert_eq!(credentials.password, None);
    }

    #[test]
    fn test_string_is_not_validated_or_trimmed() {
        let raw = "  not a url at all/ ";
        let repo = factory().create_repository(raw.into()).unwrap();
        assert_eq!(repo.url(), Some(raw));
    }

    #[test]
    fn test_map_configures_maven_repository() {
        let repo = factory()
            .create_repository(json!({"name": "custom", "url": "https://example.org/repo"}).into())
            .unwrap();

        assert_eq!(repo.kind(), RepositoryKind::Maven);
        assert_eq!(repo.name(), "custom");
        assert_eq!(repo.url(), Some("https://example.org/repo"));
    }

    #[test]
    fn test_map_with_unknown_key_fails() {
        let err = factory()
            .create_repository(json!({"name": "custom", "flavour": "vanilla"}).into())
            .unwrap_err();

        match err {
            RepoError::PropertyAssignment { property, .. } => assert_eq!(property, "flavour"),
            other => panic!("Expected PropertyAssignment, got {:?}", other),
        }
    }

    #[test]
    fn test_legacy_resolver_is_wrapped() {
        let counter = Arc::new(CountingCredentialFactory::default());
        let factory = factory().with_credential_factory(counter.clone());
        let resolver: Arc<dyn DependencyResolver> = Arc::new(LegacyResolver);

        let repo = factory.create_repository(resolver.clone().into()).unwrap();

        assert_eq!(counter.minted.load(Ordering::SeqCst), 0);
        match &repo {
            ArtifactRepository::Custom(custom) => {
                assert!(Arc::ptr_eq(custom.resolver(), &resolver));
                assert!(Arc::ptr_eq(
                    custom.transport_factory(),
                    factory.infrastructure().transport_factory()
                ));
                assert_eq!(custom.name(), "legacy-resolver");
            }
            other => panic!("Expected custom repository, got {:?}", other),
        }
    }

    #[test]
    fn test_unsupported_descriptors() {
        let factory = factory();
        for (value, expected) in [
            (json!(42), "42"),
            (json!(true), "true"),
            (json!(null), "null"),
            (json!(["https://example.org"]), "[\"https://example.org\"]"),
        ] {
            match factory.create_repository(value.into()) {
                Err(RepoError::UnsupportedDescriptor { descriptor }) => {
                    assert_eq!(descriptor, expected)
                }
                other => panic!("Expected UnsupportedDescriptor, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_unsupported_descriptor_message() {
        let err = factory().create_repository(json!(42).into()).unwrap_err();
        assert_eq!(err.to_string(), "Cannot create a repository from 42");
    }

    #[test]
    fn test_credentials_are_never_shared() {
        let factory = factory();
        let mut first = factory.create_maven_repository();
        let second = factory.create_maven_repository();

        first
            .credentials_mut()
            .set_username(Some("first-user".to_string()));
        first
            .credentials_mut()
            .set_password(Some("first-pass".to_string()));

        assert!(second.credentials().is_empty());
        assert_eq!(first.credentials().username.as_deref(), Some("first-user"));
    }

    #[test]
    fn test_ivy_credentials_are_fresh() {
        let counter = Arc::new(CountingCredentialFactory::default());
        let factory = factory().with_credential_factory(counter.clone());

        let mut first = factory.create_ivy_repository();
        let second = factory.create_ivy_repository();
        first.credentials_mut().set_username(Some("ivy".to_string()));

        assert_eq!(counter.minted.load(Ordering::SeqCst), 2);
        assert!(second.credentials().is_empty());
        assert_eq!(second.url(), None);
    }

    #[test]
    fn test_repositories_share_infrastructure() {
        let factory = factory();
        let maven = factory.create_maven_repository();
        let ivy = factory.create_ivy_repository();
        let flat = factory.create_flat_dir_repository();

        assert!(maven.infrastructure().shares_handles_with(factory.infrastructure()));
        assert!(ivy.infrastructure().shares_handles_with(factory.infrastructure()));
        assert!(Arc::ptr_eq(
            flat.transport_factory(),
            factory.infrastructure().transport_factory()
        ));
    }

    #[test]
    fn test_flat_dir_starts_empty() {
        let repo = factory().create_flat_dir_repository();
        assert!(repo.dirs().is_empty());
        assert_eq!(repo.name(), "flatDir");
    }

    #[test]
    fn test_maven_repository_has_no_url() {
        let repo = factory().create_maven_repository();
        assert_eq!(repo.url(), None);
        assert_eq!(repo.name(), "maven");
    }

    #[test]
    fn test_maven_central() {
        let factory = factory();
        let first = factory.create_maven_central_repository();
        let _ = factory.create_repository("https://elsewhere.example.org".into());
        let second = factory.create_maven_central_repository();

        assert_eq!(first.url(), Some(MAVEN_CENTRAL_URL));
        assert_eq!(second.url(), Some(MAVEN_CENTRAL_URL));
    }

    #[cfg(unix)]
    #[test]
    fn test_maven_local() {
        let repo = factory().create_maven_local_repository().unwrap();
        assert_eq!(repo.url(), Some("file:///home/dev/.m2/repository/"));
    }

    #[cfg(unix)]
    #[test]
    fn test_maven_local_relative_location_is_resolved() {
        let repo = factory_with_locator(Ok(PathBuf::from("build/m2")))
            .create_maven_local_repository()
            .unwrap();
        assert_eq!(repo.url(), Some("file:///project/build/m2/"));
    }

    #[test]
    fn test_maven_local_unavailable() {
        let factory = factory_with_locator(Err(CannotLocateLocalRepository::new(
            "Unable to parse local Maven settings file /home/dev/.m2/settings.xml",
        )));

        match factory.create_maven_local_repository() {
            Err(RepoError::LocalRepositoryUnavailable { message }) => assert_eq!(
                message,
                "Unable to parse local Maven settings file /home/dev/.m2/settings.xml"
            ),
            other => panic!("Expected LocalRepositoryUnavailable, got {:?}", other),
        }
    }

    #[test]
    fn test_notation_display() {
        assert_eq!(Notation::from("https://example.org").to_string(), "https://example.org");
        assert_eq!(Notation::from(json!(42)).to_string(), "42");
        let resolver: Arc<dyn DependencyResolver> = Arc::new(LegacyResolver);
        assert_eq!(Notation::from(resolver).to_string(), "resolver 'legacy-resolver'");
    }

    #[test]
    fn test_factory_is_thread_safe() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DefaultRepositoryFactory>();
    }
}

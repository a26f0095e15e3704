//! Quarry Repository Provisioning
//!
//! This crate turns user supplied repository declarations into configured
//! artifact repositories for the dependency resolver:
//!
//! - **Maven repositories**: from a URL, a property map, Maven Central or the local `~/.m2`
//! - **Ivy repositories**: URL plus layout patterns
//! - **Flat directories**: plain directories searched by file name
//! - **Custom resolvers**: legacy resolver implementations bridged in as repositories
//!
//! ## Key Features
//!
//! - **One entry point**: [`RepositoryFactory::create_repository`] accepts any supported notation
//! - **Isolated credentials**: every repository gets its own credential holder
//! - **Shared infrastructure**: transport, resource finder and cache index are shared read-only
//! - **Maven settings aware**: the local repository honours `settings.xml`
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use quarry_repo::{
//!     DefaultRepositoryFactory, FileResolver, MavenLocalRepositoryLocator, RepositoryFactory,
//!     SharedInfrastructure,
//! };
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let factory = DefaultRepositoryFactory::new(
//!     Arc::new(MavenLocalRepositoryLocator::from_env()),
//!     FileResolver::current_dir()?,
//!     SharedInfrastructure::default(),
//! );
//!
//! let repo = factory.create_repository("https://repo.example.org/releases".into())?;
//! assert_eq!(repo.url(), Some("https://repo.example.org/releases"));
//!
//! let central = factory.create_maven_central_repository();
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod credentials;
pub mod infrastructure;
pub mod repository;
pub mod configure;
pub mod locator;
pub mod factory;
pub mod handler;
pub mod config;

// Re-exports for convenience
pub use error::{RepoError, Result};
pub use credentials::{CredentialFactory, DefaultCredentialFactory, PasswordCredentials};
pub use infrastructure::{
    CachedExternalResource, CachedExternalResourceIndex, DefaultTransportFactory, FileResolver,
    InMemoryResourceIndex, LocallyAvailableResourceFinder, NoLocalResources, SharedInfrastructure,
    TransportFactory,
};
pub use repository::{
    ArtifactRepository, CustomResolverArtifactRepository, DependencyResolver,
    FlatDirArtifactRepository, IvyArtifactRepository, IvyLayout, MavenArtifactRepository,
    RepositoryKind, MAVEN_CENTRAL_URL,
};
pub use configure::{Configurable, configure_by_map};
pub use locator::{CannotLocateLocalRepository, LocalRepositoryLocator, MavenLocalRepositoryLocator};
pub use factory::{DefaultRepositoryFactory, Descriptor, Notation, RepositoryFactory};
pub use handler::{RepositoryHandler, MAVEN_CENTRAL_NAME, MAVEN_LOCAL_NAME};
pub use config::RepositoriesFile;

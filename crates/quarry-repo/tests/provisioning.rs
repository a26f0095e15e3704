//! End-to-end provisioning through the public API

use quarry_repo::{
    ArtifactRepository, CannotLocateLocalRepository, DefaultRepositoryFactory, DependencyResolver,
    FileResolver, LocalRepositoryLocator, MAVEN_CENTRAL_URL, Notation, RepoError,
    RepositoryFactory, RepositoryKind, SharedInfrastructure,
};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug)]
struct MissingLocalRepository;

impl LocalRepositoryLocator for MissingLocalRepository {
    fn locate_local_repository(&self) -> Result<PathBuf, CannotLocateLocalRepository> {
        Err(CannotLocateLocalRepository::new(
            "Unable to parse local Maven settings file /nowhere/settings.xml",
        ))
    }
}

#[derive(Debug)]
struct ScriptResolver;

impl DependencyResolver for ScriptResolver {
    fn name(&self) -> &str {
        "script"
    }
}

fn factory() -> DefaultRepositoryFactory {
    DefaultRepositoryFactory::new(
        Arc::new(MissingLocalRepository),
        FileResolver::new(std::env::temp_dir()),
        SharedInfrastructure::default(),
    )
}

mod create_repository {
    use super::*;

    #[test]
    fn test_url_scenario() {
        let repo = factory()
            .create_repository("https://example.org/repo".into())
            .unwrap();

        assert_eq!(repo.kind(), RepositoryKind::Maven);
        assert_eq!(repo.url(), Some("https://example.org/repo"));
        let credentials = repo.credentials().unwrap();
        assert!(credentials.username.is_none());
        assert!(credentials.password.is_none());
    }

    #[test]
    fn test_map_scenario() {
        let repo = factory()
            .create_repository(json!({"name": "custom", "url": "https://example.org/repo"}).into())
            .unwrap();

        assert_eq!(repo.name(), "custom");
        assert_eq!(repo.url(), Some("https://example.org/repo"));
    }

    #[test]
    fn test_number_scenario() {
        let err = factory().create_repository(json!(42).into()).unwrap_err();
        assert!(matches!(err, RepoError::UnsupportedDescriptor { ref descriptor } if descriptor == "42"));
    }

    #[test]
    fn test_resolver_and_existing_repository() {
        let factory = factory();
        let resolver: Arc<dyn DependencyResolver> = Arc::new(ScriptResolver);

        let custom = factory.create_repository(Notation::Resolver(resolver)).unwrap();
        assert_eq!(custom.kind(), RepositoryKind::Custom);
        assert_eq!(custom.name(), "script");

        let same = factory.create_repository(custom.into()).unwrap();
        assert_eq!(same.kind(), RepositoryKind::Custom);
        assert_eq!(same.name(), "script");
    }
}

mod well_known_repositories {
    use super::*;

    #[test]
    fn test_maven_central() {
        let repo = factory().create_maven_central_repository();
        assert_eq!(repo.url(), Some(MAVEN_CENTRAL_URL));
    }

    #[test]
    fn test_maven_local_unavailable() {
        let err = factory().create_maven_local_repository().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unable to parse local Maven settings file /nowhere/settings.xml"
        );
    }
}

#[test]
fn test_concurrent_construction() {
    let factory = factory();

    let repositories: Vec<ArtifactRepository> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let factory = &factory;
                scope.spawn(move || {
                    let mut repo = factory.create_maven_repository();
                    repo.credentials_mut().set_username(Some(format!("user-{}", i)));
                    ArtifactRepository::from(repo)
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for (i, repo) in repositories.iter().enumerate() {
        assert_eq!(
            repo.credentials().unwrap().username.as_deref(),
            Some(format!("user-{}", i).as_str())
        );
        assert!(repo
            .as_maven()
            .unwrap()
            .infrastructure()
            .shares_handles_with(factory.infrastructure()));
    }
}

//! Shared infrastructure handed to every repository
//!
//! The transport factory, resource finder and resource index are assembled
//! once and then only read. Repositories hold `Arc` clones of the same
//! handles; nothing here is ever replaced after [`SharedInfrastructure::new`].

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Opens transports for repository URLs
///
/// Repositories keep a handle to this; provisioning never calls it.
pub trait TransportFactory: Send + Sync + fmt::Debug {
    /// Whether transports can be created for the given URL scheme
    fn supports_scheme(&self, scheme: &str) -> bool;
}

/// Finds artifacts already present on the local machine
pub trait LocallyAvailableResourceFinder: Send + Sync + fmt::Debug {
    /// Candidate local files for an artifact identifier (`group:module:version`)
    fn find_candidates(&self, artifact: &str) -> Vec<PathBuf>;
}

/// Index of external resources that were downloaded before
pub trait CachedExternalResourceIndex: Send + Sync + fmt::Debug {
    /// Look up a cached entry by source URL
    fn lookup(&self, url: &str) -> Option<CachedExternalResource>;

    /// Record a cached entry for a source URL
    fn store(&self, url: &str, resource: CachedExternalResource);

    /// Forget a cached entry
    fn clear(&self, url: &str);
}

/// Entry in a [`CachedExternalResourceIndex`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedExternalResource {
    /// Local copy of the resource
    pub cached_file: PathBuf,
    /// When the resource was cached
    pub cached_at: DateTime<Utc>,
    /// ETag reported by the server, if any
    pub etag: Option<String>,
    /// Content length reported by the server, if any
    pub content_length: Option<u64>,
}

/// Transport factory for `http`, `https` and `file` URLs
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultTransportFactory;

impl TransportFactory for DefaultTransportFactory {
    fn supports_scheme(&self, scheme: &str) -> bool {
        matches!(scheme, "http" | "https" | "file")
    }
}

/// Finder that never reports local candidates
#[derive(Debug, Default, Clone, Copy)]
pub struct NoLocalResources;

impl LocallyAvailableResourceFinder for NoLocalResources {
    fn find_candidates(&self, _artifact: &str) -> Vec<PathBuf> {
        Vec::new()
    }
}

/// In-memory resource index
#[derive(Debug, Default)]
pub struct InMemoryResourceIndex {
    entries: RwLock<HashMap<String, CachedExternalResource>>,
}

impl InMemoryResourceIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached entries
    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // Entries stay consistent after a panicking writer: every write is a single map operation.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, CachedExternalResource>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, CachedExternalResource>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CachedExternalResourceIndex for InMemoryResourceIndex {
    fn lookup(&self, url: &str) -> Option<CachedExternalResource> {
        self.read().get(url).cloned()
    }

    fn store(&self, url: &str, resource: CachedExternalResource) {
        self.write().insert(url.to_string(), resource);
    }

    fn clear(&self, url: &str) {
        self.write().remove(url);
    }
}

/// Read-only bundle of handles shared by every repository
#[derive(Debug, Clone)]
pub struct SharedInfrastructure {
    transport_factory: Arc<dyn TransportFactory>,
    resource_finder: Arc<dyn LocallyAvailableResourceFinder>,
    resource_index: Arc<dyn CachedExternalResourceIndex>,
}

impl SharedInfrastructure {
    /// Assemble the shared handles
    pub fn new(
        transport_factory: Arc<dyn TransportFactory>,
        resource_finder: Arc<dyn LocallyAvailableResourceFinder>,
        resource_index: Arc<dyn CachedExternalResourceIndex>,
    ) -> Self {
        Self {
            transport_factory,
            resource_finder,
            resource_index,
        }
    }

    pub fn transport_factory(&self) -> &Arc<dyn TransportFactory> {
        &self.transport_factory
    }

    pub fn resource_finder(&self) -> &Arc<dyn LocallyAvailableResourceFinder> {
        &self.resource_finder
    }

    pub fn resource_index(&self) -> &Arc<dyn CachedExternalResourceIndex> {
        &self.resource_index
    }

    /// True when both bundles point at the very same handles
    pub fn shares_handles_with(&self, other: &SharedInfrastructure) -> bool {
        Arc::ptr_eq(&self.transport_factory, &other.transport_factory)
            && Arc::ptr_eq(&self.resource_finder, &other.resource_finder)
            && Arc::ptr_eq(&self.resource_index, &other.resource_index)
    }
}

impl Default for SharedInfrastructure {
    fn default() -> Self {
        Self::new(
            Arc::new(DefaultTransportFactory),
            Arc::new(NoLocalResources),
            Arc::new(InMemoryResourceIndex::new()),
        )
    }
}

/// Resolves user-supplied paths against a base directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileResolver {
    base_dir: PathBuf,
}

impl FileResolver {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Resolver rooted at the process working directory
    pub fn current_dir() -> std::io::Result<Self> {
        Ok(Self::new(std::env::current_dir()?))
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Absolute paths are returned as-is, relative ones are joined to the base
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_transport_schemes() {
        let transport = DefaultTransportFactory;
        assert!(transport.supports_scheme("https"));
        assert!(transport.supports_scheme("file"));
        assert!(!transport.supports_scheme("sftp"));
    }

    #[test]
    fn test_in_memory_index() {
        let index = InMemoryResourceIndex::new();
        assert!(index.is_empty());

        let resource = CachedExternalResource {
            cached_file: PathBuf::from("/cache/foo-1.0.jar"),
            cached_at: Utc::now(),
            etag: Some("\"abc\"".to_string()),
            content_length: Some(42),
        };
        index.store("https://example.org/foo-1.0.jar", resource.clone());

        assert_eq!(index.len(), 1);
        assert_eq!(
            index.lookup("https://example.org/foo-1.0.jar"),
            Some(resource)
        );
        assert!(index.lookup("https://example.org/bar-1.0.jar").is_none());

        index.clear("https://example.org/foo-1.0.jar");
        assert!(index.is_empty());
    }

    #[test]
    fn test_in_memory_index_survives_poisoned_lock() {
        let index = Arc::new(InMemoryResourceIndex::new());
        let resource = CachedExternalResource {
            cached_file: PathBuf::from("/cache/foo-1.0.jar"),
            cached_at: Utc::now(),
            etag: None,
            content_length: None,
        };
        index.store("https://example.org/foo-1.0.jar", resource.clone());

        let poisoner = Arc::clone(&index);
        let result = std::thread::spawn(move || {
            let _guard = poisoner.entries.write().unwrap();
            panic!("writer panicked while holding the lock");
        })
        .join();
        assert!(result.is_err());
        assert!(index.entries.is_poisoned());

        assert_eq!(index.len(), 1);
        index.store("https://example.org/bar-1.0.jar", resource.clone());
        assert_eq!(index.len(), 2);
        index.clear("https://example.org/foo-1.0.jar");
        assert_eq!(
            index.lookup("https://example.org/bar-1.0.jar"),
            Some(resource)
        );
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_clones_share_handles() {
        let infrastructure = SharedInfrastructure::default();
        let copy = infrastructure.clone();
        assert!(infrastructure.shares_handles_with(&copy));
        assert!(!infrastructure.shares_handles_with(&SharedInfrastructure::default()));
    }

    #[cfg(unix)]
    #[test]
    fn test_file_resolver() {
        let resolver = FileResolver::new("/project");
        assert_eq!(resolver.resolve("libs"), PathBuf::from("/project/libs"));
        assert_eq!(resolver.resolve("/opt/libs"), PathBuf::from("/opt/libs"));
    }
}

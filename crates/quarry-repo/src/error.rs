//! Error types for repository provisioning

use thiserror::Error;

/// Repository provisioning errors
#[derive(Debug, Error)]
pub enum RepoError {
    // ============ Descriptor Errors ============
    #[error("Cannot create a repository from {descriptor}")]
    UnsupportedDescriptor { descriptor: String },

    #[error("Could not set property '{property}' on {target}: {reason}")]
    PropertyAssignment {
        property: String,
        target: String,
        reason: String,
    },

    // ============ Local Repository Errors ============
    /// The message is the locator's diagnostic, unchanged
    #[error("{message}")]
    LocalRepositoryUnavailable { message: String },

    // ============ Declaration Errors ============
    #[error(
        "Cannot add a repository with name '{name}' as a repository with that name already exists"
    )]
    DuplicateRepository { name: String },

    #[error("Invalid repository configuration: {message}")]
    InvalidConfig { message: String },

    // ============ IO Errors ============
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl RepoError {
    /// Build a property assignment error for `target`
    pub fn property(
        property: impl Into<String>,
        target: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        RepoError::PropertyAssignment {
            property: property.into(),
            target: target.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for repository operations
pub type Result<T> = std::result::Result<T, RepoError>;

impl From<serde_yaml::Error> for RepoError {
    fn from(e: serde_yaml::Error) -> Self {
        RepoError::Serialization(e.to_string())
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(e: serde_json::Error) -> Self {
        RepoError::Serialization(e.to_string())
    }
}

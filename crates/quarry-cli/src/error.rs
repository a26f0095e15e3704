//! CLI error types with exit code handling
//!
//! This module provides a unified error type for CLI operations that
//! maps errors to appropriate exit codes.

use miette::Diagnostic;
use quarry_repo::RepoError;
use thiserror::Error;

use crate::exit_codes;

/// CLI-specific error type that includes exit code information
#[derive(Error, Debug, Diagnostic, Clone)]
pub enum CliError {
    /// A repository declaration was rejected
    #[error("{message}")]
    #[diagnostic(code(quarry::cli::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// A repository could not be provisioned
    #[error("{message}")]
    #[diagnostic(code(quarry::cli::repository))]
    Repository {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// IO error (file not found, permissions, etc.)
    #[error("IO error: {message}")]
    #[diagnostic(code(quarry::cli::io))]
    Io { message: String },

    /// Internal error (runtime, unexpected failure)
    #[error("Internal error: {message}")]
    #[diagnostic(code(quarry::cli::internal))]
    Internal { message: String },
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Config { .. } => exit_codes::CONFIG_ERROR,
            CliError::Repository { .. } => exit_codes::REPOSITORY_ERROR,
            CliError::Io { .. } => exit_codes::IO_ERROR,
            CliError::Internal { .. } => exit_codes::ERROR,
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            help: None,
        }
    }

    /// Create a configuration error with help text
    pub fn config_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            help: Some(help.into()),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Io {
            message: err.to_string(),
        }
    }
}

impl From<RepoError> for CliError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::UnsupportedDescriptor { .. } => CliError::config_with_help(
                err.to_string(),
                "Use a URL string, a map of repository properties, or one of \
                 mavenCentral, mavenLocal, maven, ivy, flatDir",
            ),
            RepoError::PropertyAssignment { .. } | RepoError::DuplicateRepository { .. } => {
                CliError::config(err.to_string())
            }
            RepoError::InvalidConfig { .. } | RepoError::Serialization(_) => {
                CliError::config(err.to_string())
            }
            RepoError::LocalRepositoryUnavailable { .. } => CliError::Repository {
                message: err.to_string(),
                help: Some(
                    "Set localRepository in the repositories file or the MAVEN_REPO_LOCAL \
                     environment variable"
                        .to_string(),
                ),
            },
            RepoError::Io(e) => CliError::from(e),
        }
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

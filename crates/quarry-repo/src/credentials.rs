//! Per-repository password credentials
//!
//! Every Maven and Ivy repository owns its own [`PasswordCredentials`].
//! Holders are minted by a [`CredentialFactory`] and are never shared, so
//! changing the credentials of one repository cannot leak into another.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Username/password pair, both absent by default
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PasswordCredentials {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl PasswordCredentials {
    /// Create an empty credential holder
    pub fn new() -> Self {
        Self::default()
    }

    /// Create credentials with both fields set
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            password: Some(password.into()),
        }
    }

    pub fn set_username(&mut self, username: Option<String>) {
        self.username = username;
    }

    pub fn set_password(&mut self, password: Option<String>) {
        self.password = password;
    }

    /// True when neither username nor password is set
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.password.is_none()
    }

    /// Basic authorization header value, if a username is configured
    pub fn auth_header(&self) -> Option<String> {
        let username = self.username.as_deref()?;
        let password = self.password.as_deref().unwrap_or_default();
        let encoded = base64::Engine::encode(
            &base64::engine::general_purpose::STANDARD,
            format!("{}:{}", username, password),
        );
        Some(format!("Basic {}", encoded))
    }
}

impl fmt::Debug for PasswordCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordCredentials")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Mints credential holders for newly built repositories
pub trait CredentialFactory: Send + Sync + fmt::Debug {
    /// Create a fresh, independent credential holder
    fn create_password_credentials(&self) -> PasswordCredentials;
}

/// Produces empty credential holders
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultCredentialFactory;

impl CredentialFactory for DefaultCredentialFactory {
    fn create_password_credentials(&self) -> PasswordCredentials {
        PasswordCredentials::new()
    }
}

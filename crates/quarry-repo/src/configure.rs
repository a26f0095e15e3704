//! Configuration of repositories from key/value maps
//!
//! Each map entry is applied as a named property assignment, in map order.
//! Keys are not checked up front: the first key the target does not know
//! aborts with [`RepoError::PropertyAssignment`].

use serde_json::{Map, Value as JsonValue};

use crate::credentials::PasswordCredentials;
use crate::error::{RepoError, Result};
use crate::repository::{
    FlatDirArtifactRepository, IvyArtifactRepository, IvyLayout, MavenArtifactRepository,
};

/// Target of a by-map configuration
pub trait Configurable {
    /// Human readable name used in error messages
    fn display_name(&self) -> String;

    /// Assign a single named property
    fn set_property(&mut self, property: &str, value: &JsonValue) -> Result<()>;
}

/// Apply every entry of `properties` onto `target`
pub fn configure_by_map<T>(properties: &Map<String, JsonValue>, target: &mut T) -> Result<()>
where
    T: Configurable + ?Sized,
{
    for (property, value) in properties {
        target.set_property(property, value)?;
    }
    Ok(())
}

impl Configurable for MavenArtifactRepository {
    fn display_name(&self) -> String {
        format!("Maven repository '{}'", self.name())
    }

    fn set_property(&mut self, property: &str, value: &JsonValue) -> Result<()> {
        match property {
            "name" => {
                let name = expect_string(self, property, value)?;
                self.set_name(name);
            }
            "url" => {
                let url = expect_string(self, property, value)?;
                self.set_url(url);
            }
            "artifactUrls" => {
                let urls = expect_strings(self, property, value)?;
                self.set_artifact_urls(urls);
            }
            "credentials" => {
                let credentials = expect_credentials(self, property, value)?;
                *self.credentials_mut() = credentials;
            }
            _ => return Err(unknown_property(self, property)),
        }
        Ok(())
    }
}

impl Configurable for IvyArtifactRepository {
    fn display_name(&self) -> String {
        format!("Ivy repository '{}'", self.name())
    }

    fn set_property(&mut self, property: &str, value: &JsonValue) -> Result<()> {
        match property {
            "name" => {
                let name = expect_string(self, property, value)?;
                self.set_name(name);
            }
            "url" => {
                let url = expect_string(self, property, value)?;
                self.set_url(url);
            }
            "layout" => {
                let layout = expect_string(self, property, value)?;
                let layout = match layout.parse::<IvyLayout>() {
                    Ok(layout) => layout,
                    Err(RepoError::PropertyAssignment { reason, .. }) => {
                        return Err(RepoError::property(property, self.display_name(), reason));
                    }
                    Err(e) => return Err(e),
                };
                self.set_layout(layout);
            }
            "artifactPattern" | "artifactPatterns" => {
                for pattern in expect_strings(self, property, value)? {
                    self.add_artifact_pattern(pattern);
                }
            }
            "ivyPattern" | "ivyPatterns" => {
                for pattern in expect_strings(self, property, value)? {
                    self.add_ivy_pattern(pattern);
                }
            }
            "credentials" => {
                let credentials = expect_credentials(self, property, value)?;
                *self.credentials_mut() = credentials;
            }
            _ => return Err(unknown_property(self, property)),
        }
        Ok(())
    }
}

impl Configurable for FlatDirArtifactRepository {
    fn display_name(&self) -> String {
        format!("flat directory repository '{}'", self.name())
    }

    fn set_property(&mut self, property: &str, value: &JsonValue) -> Result<()> {
        match property {
            "name" => {
                let name = expect_string(self, property, value)?;
                self.set_name(name);
            }
            "dirs" => {
                let dirs = expect_strings(self, property, value)?;
                self.set_dirs(dirs);
            }
            "dir" => {
                for dir in expect_strings(self, property, value)? {
                    self.dir(dir);
                }
            }
            _ => return Err(unknown_property(self, property)),
        }
        Ok(())
    }
}

fn unknown_property<T: Configurable + ?Sized>(target: &T, property: &str) -> RepoError {
    RepoError::property(property, target.display_name(), "no such property")
}

fn expect_string<T: Configurable + ?Sized>(
    target: &T,
    property: &str,
    value: &JsonValue,
) -> Result<String> {
    match value {
        JsonValue::String(s) => Ok(s.clone()),
        other => Err(RepoError::property(
            property,
            target.display_name(),
            format!("expected a string, got {}", other),
        )),
    }
}

/// A single string or a list of strings
fn expect_strings<T: Configurable + ?Sized>(
    target: &T,
    property: &str,
    value: &JsonValue,
) -> Result<Vec<String>> {
    match value {
        JsonValue::String(s) => Ok(vec![s.clone()]),
        JsonValue::Array(items) => items
            .iter()
            .map(|item| expect_string(target, property, item))
            .collect(),
        other => Err(RepoError::property(
            property,
            target.display_name(),
            format!("expected a string or a list of strings, got {}", other),
        )),
    }
}

fn expect_credentials<T: Configurable + ?Sized>(
    target: &T,
    property: &str,
    value: &JsonValue,
) -> Result<PasswordCredentials> {
    if !value.is_object() {
        return Err(RepoError::property(
            property,
            target.display_name(),
            format!("expected a map with username and password, got {}", value),
        ));
    }
    serde_json::from_value(value.clone()).map_err(|e| {
        RepoError::property(property, target.display_name(), e.to_string())
    })
}

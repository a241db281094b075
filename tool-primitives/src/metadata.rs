//! Identity attached to every registered tool.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Metadata describing a tool.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToolMetadata {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

impl ToolMetadata {
    /// Creates metadata for the supplied tool name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMetadata`] if the name is empty or contains
    /// whitespace.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(Error::InvalidMetadata {
                reason: "tool name cannot be empty".into(),
            });
        }
        if name.chars().any(char::is_whitespace) {
            return Err(Error::InvalidMetadata {
                reason: format!("tool name `{name}` cannot contain whitespace"),
            });
        }

        Ok(Self {
            name,
            version: None,
            description: None,
        })
    }

    /// Sets the semantic version string.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        let version = version.into();
        self.version = (!version.trim().is_empty()).then_some(version);
        self
    }

    /// Sets the human-readable description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Returns the tool name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the optional version.
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Returns the optional description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_metadata() {
        let metadata = ToolMetadata::new("echo")
            .unwrap()
            .with_version("1.0.0")
            .with_description("Echo incoming payload");

        assert_eq!(metadata.name(), "echo");
        assert_eq!(metadata.version(), Some("1.0.0"));
        assert_eq!(metadata.description(), Some("Echo incoming payload"));
    }

    #[test]
    fn invalid_names_error() {
        let err = ToolMetadata::new(" ").expect_err("empty name should error");
        assert!(matches!(err, Error::InvalidMetadata { .. }));

        let err = ToolMetadata::new("two words").expect_err("whitespace should error");
        assert!(matches!(err, Error::InvalidMetadata { .. }));
    }

    #[test]
    fn blank_version_is_dropped() {
        let metadata = ToolMetadata::new("echo").unwrap().with_version("  ");
        assert_eq!(metadata.version(), None);
    }
}

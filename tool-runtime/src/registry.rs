//! Immutable name-to-tool registry built once at startup.

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

use crate::tool::Tool;

/// Result alias for registry construction.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Errors produced while building a registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Tool name collided with an existing registration.
    #[error("tool `{name}` is already registered")]
    DuplicateTool {
        /// Name of the offending tool.
        name: String,
    },
}

/// Registry that stores tools keyed by their metadata name.
///
/// The registry is read-only once built, so it can be shared between
/// concurrent requests without locking.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Tool>,
}

impl fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("registered", &self.names())
            .finish()
    }
}

impl ToolRegistry {
    /// Starts an empty builder.
    #[must_use]
    pub fn builder() -> ToolRegistryBuilder {
        ToolRegistryBuilder::default()
    }

    /// Returns the tool registered under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Tool> {
        self.tools.get(name)
    }

    /// Returns whether a tool is registered under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Lists registered names in sorted order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.tools.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Returns the number of registered tools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Returns whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Iterates over registered tools in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = &Tool> {
        self.tools.values()
    }
}

/// Builder for [`ToolRegistry`].
#[derive(Default)]
pub struct ToolRegistryBuilder {
    tools: HashMap<String, Tool>,
}

impl fmt::Debug for ToolRegistryBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolRegistryBuilder")
            .field("pending", &self.tools.len())
            .finish()
    }
}

impl ToolRegistryBuilder {
    /// Adds a tool, consuming the builder.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateTool`] if the name is already present.
    pub fn register(mut self, tool: impl Into<Tool>) -> RegistryResult<Self> {
        self.insert(tool)?;
        Ok(self)
    }

    /// Adds a tool in place.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateTool`] if the name is already present.
    pub fn insert(&mut self, tool: impl Into<Tool>) -> RegistryResult<()> {
        let tool = tool.into();
        let name = tool.name().to_owned();
        if self.tools.contains_key(&name) {
            return Err(RegistryError::DuplicateTool { name });
        }

        tracing::debug!(tool = %name, kind = tool.kind(), "registered tool");
        self.tools.insert(name, tool);
        Ok(())
    }

    /// Freezes the registry.
    #[must_use]
    pub fn build(self) -> ToolRegistry {
        ToolRegistry { tools: self.tools }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Value;
    use tool_primitives::ToolMetadata;

    use super::*;
    use crate::FunctionTool;

    fn echo(name: &str) -> FunctionTool {
        FunctionTool::builder(ToolMetadata::new(name).unwrap())
            .handler(|args| async move { Ok(Value::Object(args.into_inner())) })
    }

    #[test]
    fn register_and_lookup() {
        let registry = ToolRegistry::builder()
            .register(echo("echo"))
            .unwrap()
            .register(echo("alpha"))
            .unwrap()
            .build();

        assert_eq!(registry.len(), 2);
        assert!(registry.contains("echo"));
        assert_eq!(registry.get("echo").unwrap().name(), "echo");
        assert_eq!(registry.names(), ["alpha", "echo"]);
    }

    #[test]
    fn duplicate_registration_errors() {
        let err = ToolRegistry::builder()
            .register(echo("echo"))
            .unwrap()
            .register(echo("echo"))
            .expect_err("duplicate registration should fail");

        assert!(matches!(err, RegistryError::DuplicateTool { name } if name == "echo"));
    }

    #[test]
    fn unknown_tool_is_absent() {
        let registry = ToolRegistry::builder().build();
        assert!(registry.is_empty());
        assert!(registry.get("missing").is_none());
    }
}

//! Loader input naming a module symbol and its construction arguments.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identifies the tool to load and the arguments to build it with.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToolConfig {
    /// Module identifier in the catalog.
    pub module_name: String,
    /// Symbol exported by the module.
    pub tool_name: String,
    /// Arguments handed to factories and constructors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<Map<String, Value>>,
}

impl ToolConfig {
    /// Creates a configuration without arguments.
    #[must_use]
    pub fn new(module_name: impl Into<String>, tool_name: impl Into<String>) -> Self {
        Self {
            module_name: module_name.into(),
            tool_name: tool_name.into(),
            args: None,
        }
    }

    /// Attaches construction arguments.
    #[must_use]
    pub fn with_args(mut self, args: Map<String, Value>) -> Self {
        self.args = Some(args);
        self
    }
}

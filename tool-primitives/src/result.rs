//! Successful call payloads.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ToolError, ToolResult};

/// Image attached to a tool response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageContent {
    mime_type: String,
    /// Base64 encoded image bytes.
    data: String,
}

impl ImageContent {
    /// Creates an image from its MIME type and base64 encoded data.
    #[must_use]
    pub fn new(mime_type: impl Into<String>, base64_data: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: base64_data.into(),
        }
    }

    /// Returns the MIME type.
    #[must_use]
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Returns the base64 encoded image data.
    #[must_use]
    pub fn base64_data(&self) -> &str {
        &self.data
    }
}

/// Canonical successful-call payload.
///
/// `variable_name` and `content` are always populated; everything else is an
/// optional extension point.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StructuredResult {
    variable_name: String,
    content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    local_file_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    metadata: Option<Map<String, Value>>,
    #[serde(default)]
    memory_push: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    images: Option<Vec<ImageContent>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl StructuredResult {
    /// Creates a result with the two mandatory fields.
    #[must_use]
    pub fn new(variable_name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            variable_name: variable_name.into(),
            content: content.into(),
            local_file_path: None,
            metadata: None,
            memory_push: false,
            images: None,
            error: None,
        }
    }

    /// Points to a local file holding the full content.
    #[must_use]
    pub fn with_local_file_path(mut self, path: impl Into<String>) -> Self {
        self.local_file_path = Some(path.into());
        self
    }

    /// Attaches free-form metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Marks the response for inclusion in the caller's memory.
    #[must_use]
    pub fn with_memory_push(mut self, memory_push: bool) -> Self {
        self.memory_push = memory_push;
        self
    }

    /// Attaches images.
    #[must_use]
    pub fn with_images(mut self, images: Vec<ImageContent>) -> Self {
        self.images = Some(images);
        self
    }

    /// Records a soft error message alongside an otherwise successful result.
    #[must_use]
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// Returns the variable name.
    #[must_use]
    pub fn variable_name(&self) -> &str {
        &self.variable_name
    }

    /// Returns the content.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns the local file path, if any.
    #[must_use]
    pub fn local_file_path(&self) -> Option<&str> {
        self.local_file_path.as_deref()
    }

    /// Returns the metadata map, if any.
    #[must_use]
    pub fn metadata(&self) -> Option<&Map<String, Value>> {
        self.metadata.as_ref()
    }

    /// Returns whether the result should be pushed to memory.
    #[must_use]
    pub const fn memory_push(&self) -> bool {
        self.memory_push
    }

    /// Returns the attached images, if any.
    #[must_use]
    pub fn images(&self) -> Option<&[ImageContent]> {
        self.images.as_deref()
    }

    /// Returns the soft error message, if any.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// Value returned by a tool implementation before normalisation.
#[derive(Clone, Debug, PartialEq)]
pub enum ToolOutput {
    /// The tool produced the canonical payload itself.
    Structured(StructuredResult),
    /// Arbitrary JSON, wrapped into a [`StructuredResult`] by the service.
    Value(Value),
}

impl ToolOutput {
    /// Serialises any value into a JSON output.
    ///
    /// # Errors
    ///
    /// Returns an `internal_error` [`ToolError`] when serialisation fails.
    pub fn json<T: Serialize>(value: &T) -> ToolResult<Self> {
        serde_json::to_value(value).map(Self::Value).map_err(|err| {
            ToolError::internal(format!("failed to serialise tool output: {err}")).with_cause(err)
        })
    }

    /// Normalises the output into a [`StructuredResult`].
    ///
    /// Strings become the content verbatim; other JSON values are rendered as
    /// compact JSON text. The variable name is derived from the tool name.
    #[must_use]
    pub fn into_structured(self, tool_name: &str) -> StructuredResult {
        match self {
            Self::Structured(result) => result,
            Self::Value(Value::String(content)) => {
                StructuredResult::new(format!("{tool_name}_result"), content)
            }
            Self::Value(value) => {
                StructuredResult::new(format!("{tool_name}_result"), value.to_string())
            }
        }
    }
}

impl From<StructuredResult> for ToolOutput {
    fn from(value: StructuredResult) -> Self {
        Self::Structured(value)
    }
}

impl From<Value> for ToolOutput {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<String> for ToolOutput {
    fn from(value: String) -> Self {
        Self::Value(Value::String(value))
    }
}

impl From<&str> for ToolOutput {
    fn from(value: &str) -> Self {
        Self::Value(Value::String(value.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn strings_become_content() {
        let result = ToolOutput::from("Processed: hi").into_structured("echo");
        assert_eq!(result.variable_name(), "echo_result");
        assert_eq!(result.content(), "Processed: hi");
        assert!(!result.memory_push());
    }

    #[test]
    fn values_are_rendered_as_json() {
        let result = ToolOutput::from(json!({"a": 1, "b": [true]})).into_structured("identity");
        let parsed: Value = serde_json::from_str(result.content()).unwrap();
        assert_eq!(parsed, json!({"a": 1, "b": [true]}));
    }

    #[test]
    fn structured_results_pass_through() {
        let structured = StructuredResult::new("weather", "sunny")
            .with_memory_push(true)
            .with_images(vec![ImageContent::new("image/png", "aGk=")]);
        let result = ToolOutput::from(structured.clone()).into_structured("ignored");
        assert_eq!(result, structured);
    }

    #[test]
    fn deserialises_with_defaults() {
        let result: StructuredResult =
            serde_json::from_value(json!({"variable_name": "x", "content": "y"})).unwrap();
        assert_eq!(result.local_file_path(), None);
        assert!(!result.memory_push());
        assert_eq!(result.images(), None);
    }
}

//! The two tool variants and the erased handle used by the service.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tool_primitives::{ToolError, ToolMetadata, ToolOutput, ToolResult, ToolSchema};

use crate::function::FunctionTool;
use crate::reflect;
use crate::shape::InputShape;

/// Tool whose input is a typed, validated object.
///
/// The service decodes the request payload into [`StructuredTool::Input`],
/// runs [`StructuredTool::validate_input`], and only then calls
/// [`StructuredTool::execute`]. Decoding and validation failures are reported
/// as `invalid_input` without reaching `execute`.
///
/// `execute` runs on the service's single scheduler thread unless
/// [`StructuredTool::blocking`] returns `true`, in which case the whole call
/// is moved to the bounded worker pool.
#[async_trait]
pub trait StructuredTool: Send + Sync + 'static {
    /// Declared input type.
    type Input: DeserializeOwned + JsonSchema + Send + Sync + 'static;

    /// Returns the declared input shape used for schema reflection.
    ///
    /// Override to return `None` for tools whose input should stay opaque.
    fn input_shape(&self) -> Option<InputShape> {
        Some(InputShape::of::<Self::Input>())
    }

    /// Returns `true` for tools that block or burn CPU inside `execute`.
    fn blocking(&self) -> bool {
        false
    }

    /// Checks the decoded input before execution.
    ///
    /// # Errors
    ///
    /// Returns a human-readable reason when the input is rejected.
    async fn validate_input(&self, _input: &Self::Input) -> Result<(), String> {
        Ok(())
    }

    /// Runs the tool.
    ///
    /// # Errors
    ///
    /// Returns a [`ToolError`] describing the failure.
    async fn execute(&self, input: Self::Input) -> ToolResult<ToolOutput>;
}

#[async_trait]
trait ErasedStructuredTool: Send + Sync {
    fn input_shape(&self) -> Option<InputShape>;

    fn blocking(&self) -> bool;

    async fn call(&self, input: Map<String, Value>) -> ToolResult<ToolOutput>;
}

#[async_trait]
impl<T: StructuredTool> ErasedStructuredTool for T {
    fn input_shape(&self) -> Option<InputShape> {
        StructuredTool::input_shape(self)
    }

    fn blocking(&self) -> bool {
        StructuredTool::blocking(self)
    }

    async fn call(&self, input: Map<String, Value>) -> ToolResult<ToolOutput> {
        let input: T::Input = serde_json::from_value(Value::Object(input)).map_err(|err| {
            ToolError::invalid_input(format!("input does not match the declared shape: {err}"))
                .with_cause(err)
        })?;
        self.validate_input(&input)
            .await
            .map_err(ToolError::invalid_input)?;
        self.execute(input).await
    }
}

/// Type-erased structured tool together with its metadata.
#[derive(Clone)]
pub struct StructuredToolHandle {
    metadata: ToolMetadata,
    inner: Arc<dyn ErasedStructuredTool>,
}

impl StructuredToolHandle {
    /// Returns the declared input shape, if the tool exposes one.
    #[must_use]
    pub fn input_shape(&self) -> Option<InputShape> {
        self.inner.input_shape()
    }

    /// Returns `true` if calls belong on the worker pool.
    #[must_use]
    pub fn is_blocking(&self) -> bool {
        self.inner.blocking()
    }

    /// Decodes, validates, and executes.
    ///
    /// # Errors
    ///
    /// Returns `invalid_input` for decoding or validation failures and
    /// whatever the tool itself reports otherwise.
    pub async fn call(&self, input: Map<String, Value>) -> ToolResult<ToolOutput> {
        self.inner.call(input).await
    }
}

/// A registered tool.
#[derive(Clone)]
pub enum Tool {
    /// Invoked with named arguments.
    Function(FunctionTool),
    /// Invoked with a typed input object.
    Structured(StructuredToolHandle),
}

impl Tool {
    /// Wraps a structured tool.
    pub fn structured<T: StructuredTool>(metadata: ToolMetadata, tool: T) -> Self {
        Self::Structured(StructuredToolHandle {
            metadata,
            inner: Arc::new(tool),
        })
    }

    /// Returns the tool metadata.
    #[must_use]
    pub fn metadata(&self) -> &ToolMetadata {
        match self {
            Self::Function(function) => function.metadata(),
            Self::Structured(handle) => &handle.metadata,
        }
    }

    /// Returns the registry name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.metadata().name()
    }

    /// Returns the configured description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.metadata().description()
    }

    /// Returns the variant name used in logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Function(_) => "function",
            Self::Structured(_) => "structured",
        }
    }

    /// Reflects the tool's input schema.
    #[must_use]
    pub fn schema(&self) -> ToolSchema {
        reflect::describe(self)
    }
}

impl From<FunctionTool> for Tool {
    fn from(function: FunctionTool) -> Self {
        Self::Function(function)
    }
}

impl fmt::Debug for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tool")
            .field("name", &self.name())
            .field("kind", &self.kind())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;
    use tool_primitives::ToolErrorKind;

    use super::*;

    #[derive(Deserialize, JsonSchema)]
    struct Person {
        name: String,
        age: i64,
    }

    struct Registrar;

    #[async_trait]
    impl StructuredTool for Registrar {
        type Input = Person;

        async fn validate_input(&self, input: &Person) -> Result<(), String> {
            if input.age < 0 {
                return Err("Age must be non-negative".into());
            }
            Ok(())
        }

        async fn execute(&self, input: Person) -> ToolResult<ToolOutput> {
            Ok(format!("{} is {}", input.name, input.age).into())
        }
    }

    fn registrar() -> Tool {
        Tool::structured(
            ToolMetadata::new("person")
                .unwrap()
                .with_description("Registers a person."),
            Registrar,
        )
    }

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    async fn call(tool: &Tool, input: Value) -> ToolResult<ToolOutput> {
        match tool {
            Tool::Structured(handle) => handle.call(object(input)).await,
            Tool::Function(_) => unreachable!("structured tool expected"),
        }
    }

    #[tokio::test]
    async fn valid_input_reaches_execute() {
        let output = call(&registrar(), json!({"name": "Alice", "age": 30}))
            .await
            .unwrap();
        assert_eq!(output, ToolOutput::from("Alice is 30"));
    }

    #[tokio::test]
    async fn validation_failure_is_invalid_input() {
        let err = call(&registrar(), json!({"name": "Bob", "age": -5}))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ToolErrorKind::InvalidInput);
        assert_eq!(err.message(), "Age must be non-negative");
    }

    #[tokio::test]
    async fn mismatched_shape_is_invalid_input() {
        let err = call(&registrar(), json!({"name": "Carol"})).await.unwrap_err();
        assert_eq!(err.kind(), ToolErrorKind::InvalidInput);
        assert!(err.message().contains("age"));
    }

    #[test]
    fn metadata_description_wins_over_shape() {
        let tool = registrar();
        assert_eq!(tool.kind(), "structured");
        assert_eq!(tool.schema().description(), "Registers a person.");
        assert_eq!(tool.schema().fields().len(), 2);
    }
}

//! Demo tool module covering each way a tool can be exported.

use anyhow::Result;
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Map, Value, json};
use toolhost::loader::{Symbol, ToolCatalog, ToolModule};
use toolhost::primitives::{
    StructuredResult, ToolError, ToolMetadata, ToolOutput, ToolResult, TypeTag,
};
use toolhost::runtime::{FunctionTool, Parameter, StructuredTool, Tool};

/// Module name to put in `TOOLHOST_TOOL_MODULE`.
pub const MODULE: &str = "demo_tools";

/// Builds the catalog shipped with the demo server.
pub fn catalog() -> Result<ToolCatalog> {
    let module = ToolModule::new()
        .with_symbol("EchoTool", Symbol::function(echo()?))
        .with_symbol("DivisionTool", Symbol::function(division()?))
        .with_symbol(
            "PowerTool",
            Symbol::constructible::<Power>(
                ToolMetadata::new("power")?.with_description("Raises a base to a power."),
            ),
        )
        .with_symbol("PersonTool", Symbol::factory(person));

    Ok(ToolCatalog::new().with_module(MODULE, module))
}

fn echo() -> Result<FunctionTool> {
    let metadata = ToolMetadata::new("echo")?
        .with_version("1.0.0")
        .with_description("Echoes a message back.");

    Ok(FunctionTool::builder(metadata)
        .param(Parameter::required("message", TypeTag::String).with_description("Text to echo."))
        .handler(|args| async move {
            let message: String = args.get("message")?;
            Ok::<_, ToolError>(format!("Processed: {message}"))
        }))
}

fn division() -> Result<FunctionTool> {
    let metadata = ToolMetadata::new("division")?.with_description("Divides two numbers.");

    Ok(FunctionTool::builder(metadata)
        .param(Parameter::required("dividend", TypeTag::Double))
        .param(Parameter::optional("divisor", TypeTag::Double).with_default(json!(1.0)))
        .blocking(|args| {
            let dividend: f64 = args.get("dividend")?;
            let divisor: f64 = args.get("divisor")?;
            if divisor == 0.0 {
                return Err(ToolError::execution("Cannot divide by zero"));
            }
            Ok(json!(dividend / divisor))
        }))
}

/// Input of the `power` tool.
#[derive(Debug, Deserialize, JsonSchema)]
struct PowerInput {
    /// Number to raise.
    base: f64,
}

/// Configured through the spec file's `tool_args`.
#[derive(Debug, Deserialize)]
struct Power {
    #[serde(default = "default_exponent")]
    exponent: i32,
}

const fn default_exponent() -> i32 {
    2
}

#[async_trait]
impl StructuredTool for Power {
    type Input = PowerInput;

    async fn execute(&self, input: PowerInput) -> ToolResult<ToolOutput> {
        let value = input.base.powi(self.exponent);
        let mut metadata = Map::new();
        metadata.insert("exponent".to_owned(), json!(self.exponent));
        Ok(StructuredResult::new("power_result", value.to_string())
            .with_metadata(metadata)
            .into())
    }
}

/// A person to register.
#[derive(Debug, Deserialize, JsonSchema)]
struct PersonInput {
    /// Full name.
    name: String,
    /// Age in years.
    age: i64,
    /// Contact address, if any.
    email: Option<String>,
}

struct Registrar {
    greeting: String,
}

#[async_trait]
impl StructuredTool for Registrar {
    type Input = PersonInput;

    async fn validate_input(&self, input: &PersonInput) -> Result<(), String> {
        if input.name.trim().is_empty() {
            return Err("Name must not be empty".to_owned());
        }
        Ok(())
    }

    async fn execute(&self, input: PersonInput) -> ToolResult<ToolOutput> {
        if input.age < 0 {
            return Err(ToolError::execution("Age cannot be negative"));
        }
        let contact = input.email.as_deref().unwrap_or("no email");
        Ok(format!("{}, {} ({}, {contact})", self.greeting, input.name, input.age).into())
    }
}

fn person(args: Map<String, Value>) -> Result<Tool, ToolError> {
    let greeting = match args.get("greeting") {
        None => "Registered".to_owned(),
        Some(Value::String(greeting)) => greeting.clone(),
        Some(other) => {
            return Err(ToolError::invalid_input(format!(
                "greeting must be a string, got {other}"
            )));
        }
    };
    let metadata = ToolMetadata::new("person").map_err(|err| ToolError::internal(err.to_string()))?;
    Ok(Tool::structured(metadata, Registrar { greeting }))
}

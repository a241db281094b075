//! Declared input shapes backed by JSON Schema.

use schemars::generate::SchemaSettings;
use schemars::{JsonSchema, Schema};
use serde_json::Value;
use tool_primitives::FieldDescriptor;

use crate::reflect::fields_from_schema;

/// Declared input shape of a tool.
///
/// Wraps the JSON Schema generated for the tool's input type. Subschemas are
/// inlined so every member can be inspected without resolving references.
#[derive(Clone, Debug, PartialEq)]
pub struct InputShape {
    schema: Schema,
}

impl InputShape {
    /// Generates the shape of `T`.
    #[must_use]
    pub fn of<T: JsonSchema>() -> Self {
        let settings = SchemaSettings::default().with(|schema_settings| {
            schema_settings.inline_subschemas = true;
        });
        Self {
            schema: settings.into_generator().into_root_schema_for::<T>(),
        }
    }

    /// Wraps an existing schema.
    #[must_use]
    pub fn from_schema(schema: Schema) -> Self {
        Self { schema }
    }

    /// Returns the underlying schema.
    #[must_use]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Returns the top-level description, typically the input type's doc comment.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.schema.get("description").and_then(Value::as_str)
    }

    /// Returns one descriptor per declared member, in declaration order.
    #[must_use]
    pub fn fields(&self) -> Vec<FieldDescriptor> {
        fields_from_schema(self.schema.as_value())
    }
}

//! Schema reflection: turns a tool's declared input into ordered field
//! descriptors.
//!
//! Reflection is best effort. A tool without a declared shape or typed
//! parameters yields an empty field list rather than an error.

use serde_json::Value;
use tool_primitives::{FieldDescriptor, ToolSchema, TypeTag};

use crate::tool::Tool;

/// Describes the input expected by `tool`.
///
/// Structured tools are described from their declared input shape. Function
/// tools use their shape when they have one and otherwise fall back to their
/// declared parameter list, where parameters without a default are required
/// and parameters without a type annotation are skipped.
#[must_use]
pub fn describe(tool: &Tool) -> ToolSchema {
    let (fields, shape_description) = match tool {
        Tool::Structured(handle) => match handle.input_shape() {
            Some(shape) => (shape.fields(), shape.description().map(str::to_owned)),
            None => (Vec::new(), None),
        },
        Tool::Function(function) => match function.input_shape() {
            Some(shape) => (shape.fields(), shape.description().map(str::to_owned)),
            None => (
                function
                    .parameters()
                    .unwrap_or_default()
                    .iter()
                    .filter_map(crate::Parameter::descriptor)
                    .collect(),
                None,
            ),
        },
    };

    let description = tool
        .description()
        .map(str::to_owned)
        .or(shape_description)
        .unwrap_or_default();

    ToolSchema::new(tool.name())
        .with_description(description)
        .with_fields(fields)
}

/// Walks the `properties` of an object schema in declaration order.
pub(crate) fn fields_from_schema(schema: &Value) -> Vec<FieldDescriptor> {
    let Some(properties) = schema.get("properties").and_then(Value::as_object) else {
        return Vec::new();
    };

    let required: Vec<&str> = schema
        .get("required")
        .and_then(Value::as_array)
        .map(|names| names.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    properties
        .iter()
        .map(|(name, property)| {
            let description = property
                .get("description")
                .and_then(Value::as_str)
                .unwrap_or_default();
            FieldDescriptor::new(
                name.clone(),
                type_tag_of(property),
                required.contains(&name.as_str()),
            )
            .with_description(description)
        })
        .collect()
}

/// Maps a property schema onto the closed set of wire tags.
///
/// Nullable scalars keep their scalar tag; objects, arrays, unions, and
/// anything unrecognised collapse to `bytes`.
fn type_tag_of(property: &Value) -> TypeTag {
    match property.get("type") {
        Some(Value::String(name)) => return tag_for(name),
        Some(Value::Array(names)) => {
            let non_null: Vec<&str> = names
                .iter()
                .filter_map(Value::as_str)
                .filter(|name| *name != "null")
                .collect();
            return match non_null.as_slice() {
                [single] => tag_for(single),
                _ => TypeTag::Bytes,
            };
        }
        _ => {}
    }

    for key in ["anyOf", "oneOf"] {
        if let Some(variants) = property.get(key).and_then(Value::as_array) {
            let non_null: Vec<&Value> = variants
                .iter()
                .filter(|variant| variant.get("type").and_then(Value::as_str) != Some("null"))
                .collect();
            return match non_null.as_slice() {
                [single] => type_tag_of(single),
                _ => TypeTag::Bytes,
            };
        }
    }

    TypeTag::Bytes
}

fn tag_for(json_type: &str) -> TypeTag {
    match json_type {
        "integer" => TypeTag::Int64,
        "string" => TypeTag::String,
        "number" => TypeTag::Double,
        "boolean" => TypeTag::Bool,
        _ => TypeTag::Bytes,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use schemars::JsonSchema;
    use serde::Deserialize;
    use serde_json::json;
    use tool_primitives::{ToolMetadata, ToolOutput, ToolResult};

    use super::*;
    use crate::{FunctionTool, InputShape, Parameter, StructuredTool};

    /// Order to place with the kitchen.
    #[derive(Debug, Deserialize, JsonSchema)]
    #[allow(dead_code)]
    struct OrderInput {
        /// Dish to prepare.
        dish: String,
        quantity: i64,
        price: f64,
        #[serde(default)]
        takeaway: bool,
        notes: Option<String>,
        extras: Vec<String>,
        options: HashMap<String, String>,
        address: Address,
    }

    #[derive(Debug, Deserialize, JsonSchema)]
    #[allow(dead_code)]
    struct Address {
        street: String,
    }

    struct Kitchen;

    #[async_trait::async_trait]
    impl StructuredTool for Kitchen {
        type Input = OrderInput;

        async fn execute(&self, input: OrderInput) -> ToolResult<ToolOutput> {
            Ok(input.dish.into())
        }
    }

    #[test]
    fn structured_fields_follow_declaration_order() {
        let tool = Tool::structured(ToolMetadata::new("kitchen").unwrap(), Kitchen);
        let schema = describe(&tool);

        let summary: Vec<_> = schema
            .fields()
            .iter()
            .map(|field| (field.name(), field.type_tag(), field.required()))
            .collect();
        assert_eq!(
            summary,
            [
                ("dish", TypeTag::String, true),
                ("quantity", TypeTag::Int64, true),
                ("price", TypeTag::Double, true),
                ("takeaway", TypeTag::Bool, false),
                ("notes", TypeTag::String, false),
                ("extras", TypeTag::Bytes, true),
                ("options", TypeTag::Bytes, true),
                ("address", TypeTag::Bytes, true),
            ]
        );
        assert_eq!(schema.field("dish").unwrap().description(), "Dish to prepare.");
        assert_eq!(schema.description(), "Order to place with the kitchen.");
    }

    #[test]
    fn function_fields_come_from_parameters() {
        let tool: Tool = FunctionTool::builder(ToolMetadata::new("greet").unwrap())
            .param(Parameter::required("name", TypeTag::String))
            .param(Parameter::optional("times", TypeTag::Int64).with_default(json!(1)))
            .param(Parameter::untyped("context"))
            .handler(|_args| async { Ok("hello") })
            .into();

        let schema = describe(&tool);
        let summary: Vec<_> = schema
            .fields()
            .iter()
            .map(|field| (field.name(), field.type_tag(), field.required()))
            .collect();
        assert_eq!(
            summary,
            [("name", TypeTag::String, true), ("times", TypeTag::Int64, false)]
        );
    }

    #[test]
    fn tools_without_type_information_have_no_fields() {
        let tool: Tool = FunctionTool::builder(ToolMetadata::new("opaque").unwrap())
            .handler(|_args| async { Ok("ok") })
            .into();

        let schema = describe(&tool);
        assert_eq!(schema.tool_name(), "opaque");
        assert!(schema.fields().is_empty());
    }

    #[test]
    fn non_object_schemas_have_no_fields() {
        assert!(InputShape::of::<String>().fields().is_empty());
        assert!(fields_from_schema(&json!(true)).is_empty());
    }

    #[test]
    fn nullable_unions_keep_scalar_tag() {
        assert_eq!(type_tag_of(&json!({"type": ["integer", "null"]})), TypeTag::Int64);
        assert_eq!(
            type_tag_of(&json!({"anyOf": [{"type": "number"}, {"type": "null"}]})),
            TypeTag::Double
        );
        assert_eq!(
            type_tag_of(&json!({"anyOf": [{"type": "number"}, {"type": "string"}]})),
            TypeTag::Bytes
        );
    }
}

//! Introspectable description of a tool's expected input.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// Wire-level type of a single input field.
///
/// Maps, nested objects, and sequences all collapse to [`TypeTag::Bytes`];
/// their structure travels inside the JSON payload instead.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeTag {
    /// Signed 64-bit integer.
    Int64,
    /// UTF-8 string.
    String,
    /// Double-precision float.
    Double,
    /// Boolean.
    Bool,
    /// Opaque structured value.
    Bytes,
}

impl TypeTag {
    /// Returns the tag string carried on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Int64 => "int64",
            Self::String => "string",
            Self::Double => "double",
            Self::Bool => "bool",
            Self::Bytes => "bytes",
        }
    }

    /// Returns `true` when the JSON value is acceptable for this tag.
    #[must_use]
    pub fn accepts(self, value: &Value) -> bool {
        match self {
            Self::Int64 => value.is_i64() || value.is_u64(),
            Self::String => value.is_string(),
            Self::Double => value.is_number(),
            Self::Bool => value.is_boolean(),
            Self::Bytes => true,
        }
    }
}

impl Display for TypeTag {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TypeTag {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "int64" => Ok(Self::Int64),
            "string" => Ok(Self::String),
            "double" => Ok(Self::Double),
            "bool" => Ok(Self::Bool),
            "bytes" => Ok(Self::Bytes),
            other => Err(Error::UnknownTypeTag {
                tag: other.to_owned(),
            }),
        }
    }
}

/// One input field of a tool.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    name: String,
    type_tag: TypeTag,
    required: bool,
    #[serde(default)]
    description: String,
}

impl FieldDescriptor {
    /// Creates a descriptor with an empty description.
    #[must_use]
    pub fn new(name: impl Into<String>, type_tag: TypeTag, required: bool) -> Self {
        Self {
            name: name.into(),
            type_tag,
            required,
            description: String::new(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Returns the field name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the wire type tag.
    #[must_use]
    pub const fn type_tag(&self) -> TypeTag {
        self.type_tag
    }

    /// Returns whether the field must be present.
    #[must_use]
    pub const fn required(&self) -> bool {
        self.required
    }

    /// Returns the description, possibly empty.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }
}

/// Ordered description of a tool's input fields.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ToolSchema {
    tool_name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    fields: Vec<FieldDescriptor>,
}

impl ToolSchema {
    /// Creates an empty schema for the named tool.
    #[must_use]
    pub fn new(tool_name: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            description: String::new(),
            fields: Vec::new(),
        }
    }

    /// Sets the tool description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Replaces the field list, keeping the supplied order.
    #[must_use]
    pub fn with_fields(mut self, fields: Vec<FieldDescriptor>) -> Self {
        self.fields = fields;
        self
    }

    /// Returns the tool name.
    #[must_use]
    pub fn tool_name(&self) -> &str {
        &self.tool_name
    }

    /// Returns the description, possibly empty.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the fields in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Looks up a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }
}

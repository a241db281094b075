//! Protobuf messages exchanged by the tool service.
//!
//! Field tags are part of the deployed contract. A tag, once assigned, is
//! never reused or renumbered.

use bytes::Bytes;

/// Request to run a tool.
#[derive(Clone, PartialEq, prost::Message)]
pub struct ExecuteRequest {
    /// Registry name of the tool.
    #[prost(string, tag = "1")]
    pub tool_name: String,
    /// JSON object carried as text or as UTF-8 bytes.
    #[prost(oneof = "execute_request::Payload", tags = "2, 3")]
    pub payload: Option<execute_request::Payload>,
}

/// Nested types for [`ExecuteRequest`].
pub mod execute_request {
    use bytes::Bytes;

    /// The two encodings of the same logical input object.
    #[derive(Clone, PartialEq, prost::Oneof)]
    pub enum Payload {
        /// JSON text.
        #[prost(string, tag = "2")]
        TextPayload(String),
        /// UTF-8 JSON bytes.
        #[prost(bytes = "bytes", tag = "3")]
        BinaryPayload(Bytes),
    }
}

/// Outcome of an `Execute` call.
#[derive(Clone, PartialEq, prost::Message)]
pub struct ExecuteResponse {
    /// Exactly one of a result or an error.
    #[prost(oneof = "execute_response::Outcome", tags = "1, 2")]
    pub result: Option<execute_response::Outcome>,
}

/// Nested types for [`ExecuteResponse`].
pub mod execute_response {
    /// Successful result or tool failure.
    #[derive(Clone, PartialEq, prost::Oneof)]
    pub enum Outcome {
        /// The call succeeded.
        #[prost(message, tag = "1")]
        StructuredResult(super::StructuredResult),
        /// The call failed inside the tool boundary.
        #[prost(message, tag = "2")]
        Error(super::ToolError),
    }
}

/// Flattened successful-call payload.
#[derive(Clone, PartialEq, prost::Message)]
pub struct StructuredResult {
    /// Suggested variable name for the content.
    #[prost(string, tag = "1")]
    pub variable_name: String,
    /// Primary content, encoded the same way as the request payload.
    #[prost(oneof = "structured_result::Content", tags = "2, 9")]
    pub content: Option<structured_result::Content>,
    /// Path to a local file with the full content.
    #[prost(string, optional, tag = "3")]
    pub local_file_path: Option<String>,
    /// JSON metadata, encoded the same way as the request payload.
    #[prost(oneof = "structured_result::Metadata", tags = "4, 5")]
    pub metadata: Option<structured_result::Metadata>,
    /// Whether the caller should keep the result in memory.
    #[prost(bool, tag = "6")]
    pub memory_push: bool,
    /// Attached images.
    #[prost(message, repeated, tag = "7")]
    pub images: Vec<Image>,
    /// Soft error reported alongside the result.
    #[prost(string, optional, tag = "8")]
    pub error: Option<String>,
}

/// Nested types for [`StructuredResult`].
pub mod structured_result {
    use bytes::Bytes;

    /// Primary content as text or UTF-8 bytes.
    #[derive(Clone, PartialEq, prost::Oneof)]
    pub enum Content {
        /// Text.
        #[prost(string, tag = "2")]
        ContentText(String),
        /// UTF-8 bytes.
        #[prost(bytes = "bytes", tag = "9")]
        ContentBinary(Bytes),
    }

    /// Metadata object as JSON text or UTF-8 JSON bytes.
    #[derive(Clone, PartialEq, prost::Oneof)]
    pub enum Metadata {
        /// JSON text.
        #[prost(string, tag = "4")]
        MetadataText(String),
        /// UTF-8 JSON bytes.
        #[prost(bytes = "bytes", tag = "5")]
        MetadataBinary(Bytes),
    }
}

/// Image attached to a result.
#[derive(Clone, PartialEq, prost::Message)]
pub struct Image {
    /// MIME type.
    #[prost(string, tag = "1")]
    pub mime_type: String,
    /// Base64 encoded data.
    #[prost(string, tag = "2")]
    pub data: String,
}

/// Tool failure.
#[derive(Clone, PartialEq, prost::Message)]
pub struct ToolError {
    /// snake_case failure kind.
    #[prost(string, tag = "1")]
    pub kind: String,
    /// Human-readable message.
    #[prost(string, tag = "2")]
    pub message: String,
}

/// Request for a tool's input schema.
#[derive(Clone, PartialEq, prost::Message)]
pub struct GetToolSchemaRequest {
    /// Registry name of the tool.
    #[prost(string, tag = "1")]
    pub tool_name: String,
}

/// Ordered input description of a tool.
#[derive(Clone, PartialEq, prost::Message)]
pub struct ToolSchema {
    /// Registry name of the tool.
    #[prost(string, tag = "1")]
    pub tool_name: String,
    /// Fields in declaration order.
    #[prost(message, repeated, tag = "2")]
    pub fields: Vec<FieldDescriptor>,
    /// Tool description.
    #[prost(string, tag = "3")]
    pub description: String,
}

/// One input field.
#[derive(Clone, PartialEq, prost::Message)]
pub struct FieldDescriptor {
    /// Field name.
    #[prost(string, tag = "1")]
    pub name: String,
    /// One of `int64`, `string`, `double`, `bool`, `bytes`.
    #[prost(string, tag = "2")]
    pub type_tag: String,
    /// Whether the field must be supplied.
    #[prost(bool, tag = "3")]
    pub required: bool,
    /// Field description.
    #[prost(string, tag = "4")]
    pub description: String,
}

impl ExecuteRequest {
    /// Builds a request carrying a JSON text payload.
    #[must_use]
    pub fn text(tool_name: impl Into<String>, json: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            payload: Some(execute_request::Payload::TextPayload(json.into())),
        }
    }

    /// Builds a request carrying a binary payload.
    #[must_use]
    pub fn binary(tool_name: impl Into<String>, json: impl Into<Bytes>) -> Self {
        Self {
            tool_name: tool_name.into(),
            payload: Some(execute_request::Payload::BinaryPayload(json.into())),
        }
    }
}

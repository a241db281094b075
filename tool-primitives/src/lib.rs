//! Core shared types for tools hosted behind the toolhost RPC service.

#![warn(missing_docs, clippy::pedantic)]

mod error;
mod metadata;
mod result;
mod schema;

/// Error types: the tool failure taxonomy and primitive validation errors.
pub use error::{BoxError, Error, Result, ToolError, ToolErrorKind, ToolResult};
/// Tool identity advertised through the schema endpoint.
pub use metadata::ToolMetadata;
/// Successful call payloads.
pub use result::{ImageContent, StructuredResult, ToolOutput};
/// Introspectable input descriptions.
pub use schema::{FieldDescriptor, ToolSchema, TypeTag};

//! Wire contract of the toolhost RPC service.
//!
//! The messages in [`messages`] are hand-annotated prost types whose tags are
//! binding for deployed callers. The gRPC server trait and client stub in
//! [`tool_service`] are generated at build time from a manual service
//! definition, so no `protoc` toolchain is required.

#![warn(missing_docs, clippy::pedantic)]

mod convert;
mod error;
pub mod messages;
mod payload;

/// Generated `ToolService` server trait and client stub.
#[allow(missing_docs, clippy::pedantic)]
pub mod tool_service {
    include!(concat!(env!("OUT_DIR"), "/toolhost.tools.ToolService.rs"));
}

pub use convert::{decode_result, encode_result, result_encoding};
pub use error::{WireError, WireResult};
pub use messages::{
    ExecuteRequest, ExecuteResponse, FieldDescriptor, GetToolSchemaRequest, Image,
    StructuredResult, ToolError, ToolSchema,
};
pub use payload::{PayloadEncoding, decode_payload, encode_payload};
pub use tool_service::tool_service_client::ToolServiceClient;
pub use tool_service::tool_service_server::{ToolService, ToolServiceServer};

//! Host Rust tools behind a gRPC service.
//!
//! Depend on this crate via `cargo add toolhost`. It bundles the internal
//! crates behind feature flags so a server can skip the client and a caller
//! can skip the server.

#![warn(missing_docs, clippy::pedantic)]

/// Re-export shared primitives for convenience.
pub use tool_primitives as primitives;

/// Protobuf contract and payload codecs (enabled by `wire` feature).
#[cfg(feature = "wire")]
pub use tool_wire as wire;

/// Tool kinds, schema reflection, and the registry (enabled by `runtime` feature).
#[cfg(feature = "runtime")]
pub use tool_runtime as runtime;

/// Tool resolution from the environment or a spec file (enabled by `loader` feature).
#[cfg(feature = "loader")]
pub use tool_loader as loader;

/// gRPC server, worker pool, and shutdown (enabled by `service` feature).
#[cfg(feature = "service")]
pub use tool_service as service;

/// Caller-side client (enabled by `client` feature).
#[cfg(feature = "client")]
pub use tool_client as client;

/// Tracing subscriber setup (enabled by `telemetry` feature).
#[cfg(feature = "telemetry")]
pub use tool_telemetry as telemetry;

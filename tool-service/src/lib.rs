//! RPC host for toolhost tools.
//!
//! The service owns an immutable [`ToolRegistry`](tool_runtime::ToolRegistry)
//! and answers two unary calls: `Execute` decodes the payload, dispatches to
//! the tool by variant, and encodes the result in the request's encoding;
//! `GetToolSchema` reflects the tool's input. Calls are multiplexed on a
//! single cooperative scheduler, with blocking tool work moved to a bounded
//! [`WorkerPool`]. Shutdown is an explicit future, so it can be driven by
//! signals in production and by plain channels in tests.

#![warn(missing_docs, clippy::pedantic)]

mod bootstrap;
mod config;
mod dispatch;
mod error;
mod lifecycle;
mod pool;
mod server;
mod service;
mod shutdown;

pub use bootstrap::{run, run_from_env_source, run_from_environment};
pub use config::{GRACE_PERIOD_VAR, GRPC_PORT_VAR, MAX_WORKERS_VAR, ServiceConfig};
pub use dispatch::Dispatcher;
pub use error::{ServiceError, ServiceResult};
pub use lifecycle::{
    LifecycleError, LifecycleEvent, LifecycleResult, ServiceLifecycle, ServiceState,
};
pub use pool::{PoolError, PoolResult, WorkerPool};
pub use server::{ShutdownOutcome, serve_with_shutdown};
pub use service::ToolService;
pub use shutdown::shutdown_signal;

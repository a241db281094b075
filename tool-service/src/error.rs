//! Errors raised while starting or running the service.

use std::net::SocketAddr;

use thiserror::Error;
use tool_loader::LoaderError;
use tool_runtime::RegistryError;

use crate::lifecycle::LifecycleError;

/// Result alias for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors that stop the service from starting or serving.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// An environment variable held an unusable value.
    #[error("invalid service configuration {variable}: {reason}")]
    InvalidConfig {
        /// Offending variable.
        variable: &'static str,
        /// Human-readable reason.
        reason: String,
    },

    /// The tool could not be loaded.
    #[error(transparent)]
    Loader(#[from] LoaderError),

    /// The registry rejected a tool.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// The async runtime could not be built.
    #[error("failed to build runtime")]
    Runtime(#[source] std::io::Error),

    /// The listening socket could not be bound.
    #[error("failed to bind {addr}")]
    Bind {
        /// Requested address.
        addr: SocketAddr,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The transport failed while serving.
    #[error("transport failure")]
    Transport(#[from] tonic::transport::Error),

    /// The service lifecycle was driven out of order.
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
}

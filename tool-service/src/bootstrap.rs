//! Process entry point: configuration, runtime, and serving.

use std::net::{Ipv4Addr, SocketAddr};

use tokio::net::TcpListener;
use tool_loader::{EnvSource, ProcessEnv, ToolLoader};
use tool_runtime::ToolRegistry;
use tracing::{error, info};

use crate::config::ServiceConfig;
use crate::error::{ServiceError, ServiceResult};
use crate::pool::WorkerPool;
use crate::server::{ShutdownOutcome, serve_with_shutdown};
use crate::service::ToolService;
use crate::shutdown::shutdown_signal;

/// Loads the tool named by the environment and serves it until a
/// termination signal arrives.
///
/// # Errors
///
/// Returns a [`ServiceError`] for configuration, loading, binding, or
/// transport failures.
pub fn run_from_environment(loader: &ToolLoader) -> ServiceResult<ShutdownOutcome> {
    run_from_env_source(loader, &ProcessEnv)
}

/// Same as [`run_from_environment`], reading variables from `env`.
///
/// # Errors
///
/// See [`run_from_environment`].
pub fn run_from_env_source(
    loader: &ToolLoader,
    env: &impl EnvSource,
) -> ServiceResult<ShutdownOutcome> {
    let config = ServiceConfig::from_env(env).inspect_err(log_fatal)?;
    let tool = loader.load_from_env_source(env).inspect_err(|err| {
        error!(error = %err, "failed to load tool");
    })?;
    info!(tool = tool.name(), kind = tool.kind(), "tool loaded");

    let registry = ToolRegistry::builder().register(tool)?.build();
    run(registry, config)
}

/// Serves `registry` with `config` on a single-threaded runtime until a
/// termination signal arrives.
///
/// # Errors
///
/// Returns [`ServiceError::Runtime`], [`ServiceError::Bind`], or
/// [`ServiceError::Transport`].
pub fn run(registry: ToolRegistry, config: ServiceConfig) -> ServiceResult<ShutdownOutcome> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .max_blocking_threads(config.max_workers().get())
        .build()
        .map_err(ServiceError::Runtime)?;

    let outcome = runtime.block_on(async {
        let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, config.port()));
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServiceError::Bind { addr, source })?;

        let service = ToolService::new(registry, WorkerPool::new(config.max_workers()));
        serve_with_shutdown(service, listener, config.grace_period(), shutdown_signal()).await
    });

    // Blocking work abandoned by a forced stop must not hold the process.
    runtime.shutdown_background();
    outcome
}

fn log_fatal(err: &ServiceError) {
    error!(error = %err, "invalid service configuration");
}

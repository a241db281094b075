//! Serving loop with explicit, testable shutdown.

use std::future::Future;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tokio_util::sync::CancellationToken;
use tonic::transport::Server;
use tracing::{info, warn};

use crate::error::ServiceResult;
use crate::lifecycle::{LifecycleEvent, ServiceLifecycle};
use crate::service::ToolService;

/// How the server stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownOutcome {
    /// Every in-flight call completed within the grace period.
    Drained,
    /// The grace period elapsed with calls still in flight.
    Forced,
}

impl ShutdownOutcome {
    /// Process exit code for this outcome.
    #[must_use]
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::Drained => 0,
            Self::Forced => 1,
        }
    }
}

/// Serves `service` on `listener` until `shutdown` resolves.
///
/// Once `shutdown` resolves the server stops accepting connections and
/// in-flight calls get `grace_period` to finish. Calls still running after
/// that are abandoned and the outcome is [`ShutdownOutcome::Forced`].
///
/// # Errors
///
/// Returns [`crate::ServiceError::Transport`] if the transport fails while
/// serving.
pub async fn serve_with_shutdown<F>(
    service: ToolService,
    listener: TcpListener,
    grace_period: Duration,
    shutdown: F,
) -> ServiceResult<ShutdownOutcome>
where
    F: Future<Output = ()> + Send,
{
    let mut lifecycle = ServiceLifecycle::new();
    let stop = CancellationToken::new();

    if let Ok(addr) = listener.local_addr() {
        info!(
            %addr,
            tools = ?service.registry().names(),
            workers = service.dispatcher().pool().size().get(),
            "tool service listening"
        );
    }

    let pool = service.dispatcher().pool().clone();
    let stopped = stop.clone();
    let server = Server::builder()
        .add_service(service.into_server())
        .serve_with_incoming_shutdown(TcpListenerStream::new(listener), async move {
            stopped.cancelled().await;
        });
    tokio::pin!(server);
    lifecycle.transition(LifecycleEvent::Serve)?;

    tokio::select! {
        result = &mut server => {
            result?;
            lifecycle.transition(LifecycleEvent::Stop)?;
            return Ok(ShutdownOutcome::Drained);
        }
        () = shutdown => {}
    }

    lifecycle.transition(LifecycleEvent::Drain)?;
    info!(grace_ms = grace_period.as_millis(), "shutdown requested, draining calls");
    stop.cancel();

    let outcome = match tokio::time::timeout(grace_period, &mut server).await {
        Ok(result) => {
            result?;
            lifecycle.transition(LifecycleEvent::Stop)?;
            info!("tool service stopped");
            ShutdownOutcome::Drained
        }
        Err(_) => {
            lifecycle.transition(LifecycleEvent::Abort)?;
            warn!(grace_ms = grace_period.as_millis(), "grace period elapsed, abandoning calls");
            ShutdownOutcome::Forced
        }
    };
    pool.close();
    Ok(outcome)
}

//! Lifecycle state machine for the tool service.

use thiserror::Error;
use tracing::debug;

/// States the service moves through between startup and exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceState {
    /// Registry built, listener not yet serving.
    Starting,
    /// Accepting and handling calls.
    Serving,
    /// No longer accepting calls; in-flight calls are finishing.
    Draining,
    /// Every in-flight call completed before the grace period ran out.
    Stopped,
    /// The grace period ran out with calls still in flight.
    Aborted,
}

impl ServiceState {
    /// Returns `true` once the service has stopped, cleanly or not.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Stopped | Self::Aborted)
    }
}

/// Events that trigger lifecycle transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// The listener is bound and the server is running.
    Serve,
    /// A shutdown was requested.
    Drain,
    /// Draining finished within the grace period.
    Stop,
    /// The grace period elapsed; remaining calls are abandoned.
    Abort,
}

/// Lifecycle state manager.
#[derive(Debug, Clone, Copy)]
pub struct ServiceLifecycle {
    state: ServiceState,
}

impl Default for ServiceLifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceLifecycle {
    /// Starts in [`ServiceState::Starting`].
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: ServiceState::Starting,
        }
    }

    /// Returns the current state.
    #[must_use]
    pub const fn state(&self) -> ServiceState {
        self.state
    }

    /// Applies an event, returning the resulting state.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::InvalidTransition`] when the event is not
    /// allowed from the current state.
    pub fn transition(&mut self, event: LifecycleEvent) -> LifecycleResult<ServiceState> {
        let next = match (self.state, event) {
            (ServiceState::Starting, LifecycleEvent::Serve) => Some(ServiceState::Serving),
            (ServiceState::Starting | ServiceState::Serving, LifecycleEvent::Drain) => {
                Some(ServiceState::Draining)
            }
            (ServiceState::Draining | ServiceState::Serving, LifecycleEvent::Stop)
            | (ServiceState::Stopped, LifecycleEvent::Stop) => Some(ServiceState::Stopped),
            (state, LifecycleEvent::Abort) if !state.is_terminal() => Some(ServiceState::Aborted),
            (ServiceState::Aborted, LifecycleEvent::Abort) => Some(ServiceState::Aborted),
            _ => None,
        };

        let Some(next_state) = next else {
            return Err(LifecycleError::InvalidTransition {
                from: self.state,
                event,
            });
        };

        if next_state != self.state {
            debug!(?self.state, ?next_state, ?event, "service lifecycle transition");
            self.state = next_state;
        }

        Ok(self.state)
    }
}

/// Errors emitted by the lifecycle controller.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// Transition was not permitted from the current state.
    #[error("invalid service lifecycle transition from {from:?} via {event:?}")]
    InvalidTransition {
        /// State prior to the attempted transition.
        from: ServiceState,
        /// Event that triggered the failure.
        event: LifecycleEvent,
    },
}

/// Result alias used for lifecycle operations.
pub type LifecycleResult<T> = Result<T, LifecycleError>;

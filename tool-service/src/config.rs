//! Service configuration read from the environment.

use std::num::NonZeroUsize;
use std::time::Duration;

use tool_loader::EnvSource;

use crate::error::{ServiceError, ServiceResult};

/// Variable holding the listening port.
pub const GRPC_PORT_VAR: &str = "TOOLHOST_GRPC_PORT";
/// Variable holding the worker pool size.
pub const MAX_WORKERS_VAR: &str = "TOOLHOST_MAX_WORKERS";
/// Variable holding the shutdown grace period in seconds.
pub const GRACE_PERIOD_VAR: &str = "TOOLHOST_GRACE_PERIOD_SECS";

const DEFAULT_PORT: u16 = 50051;
const DEFAULT_MAX_WORKERS: usize = 10;
const DEFAULT_GRACE_PERIOD: Duration = Duration::from_secs(5);

/// Runtime settings of the tool service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceConfig {
    port: u16,
    max_workers: NonZeroUsize,
    grace_period: Duration,
}

impl ServiceConfig {
    /// Creates a configuration.
    #[must_use]
    pub const fn new(port: u16, max_workers: NonZeroUsize, grace_period: Duration) -> Self {
        Self {
            port,
            max_workers,
            grace_period,
        }
    }

    /// Reads the configuration, falling back to defaults for unset variables.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::InvalidConfig`] when a variable is set but does
    /// not parse, or when the worker count is zero.
    pub fn from_env(env: &impl EnvSource) -> ServiceResult<Self> {
        let port = parse_var(env, GRPC_PORT_VAR)?.unwrap_or(DEFAULT_PORT);
        let max_workers = parse_var::<usize>(env, MAX_WORKERS_VAR)?.unwrap_or(DEFAULT_MAX_WORKERS);
        let grace_period = parse_var(env, GRACE_PERIOD_VAR)?
            .map_or(DEFAULT_GRACE_PERIOD, Duration::from_secs);

        let max_workers = NonZeroUsize::new(max_workers).ok_or(ServiceError::InvalidConfig {
            variable: MAX_WORKERS_VAR,
            reason: "worker count must be greater than zero".into(),
        })?;

        Ok(Self::new(port, max_workers, grace_period))
    }

    /// Returns the listening port. Zero binds an ephemeral port.
    #[must_use]
    pub const fn port(self) -> u16 {
        self.port
    }

    /// Returns the worker pool size.
    #[must_use]
    pub const fn max_workers(self) -> NonZeroUsize {
        self.max_workers
    }

    /// Returns the shutdown grace period.
    #[must_use]
    pub const fn grace_period(self) -> Duration {
        self.grace_period
    }

    /// Returns a copy with a different port.
    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Returns a copy with a different grace period.
    #[must_use]
    pub const fn with_grace_period(mut self, grace_period: Duration) -> Self {
        self.grace_period = grace_period;
        self
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self::new(
            DEFAULT_PORT,
            NonZeroUsize::new(DEFAULT_MAX_WORKERS).expect("non-zero"),
            DEFAULT_GRACE_PERIOD,
        )
    }
}

fn parse_var<T>(env: &impl EnvSource, variable: &'static str) -> ServiceResult<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let Some(raw) = env.var(variable) else {
        return Ok(None);
    };
    raw.trim()
        .parse()
        .map(Some)
        .map_err(|err: T::Err| ServiceError::InvalidConfig {
            variable,
            reason: format!("`{raw}`: {err}"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(vars: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |key: &str| {
            vars.iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (*value).to_owned())
        }
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = ServiceConfig::from_env(&env(&[])).unwrap();
        assert_eq!(config, ServiceConfig::default());
        assert_eq!(config.port(), 50051);
        assert_eq!(config.max_workers().get(), 10);
        assert_eq!(config.grace_period(), Duration::from_secs(5));
    }

    #[test]
    fn variables_override_defaults() {
        let config = ServiceConfig::from_env(&env(&[
            (GRPC_PORT_VAR, "6000"),
            (MAX_WORKERS_VAR, "4"),
            (GRACE_PERIOD_VAR, "30"),
        ]))
        .unwrap();
        assert_eq!(config.port(), 6000);
        assert_eq!(config.max_workers().get(), 4);
        assert_eq!(config.grace_period(), Duration::from_secs(30));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let err = ServiceConfig::from_env(&env(&[(GRPC_PORT_VAR, "http")])).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidConfig { variable, .. } if variable == GRPC_PORT_VAR));

        let err = ServiceConfig::from_env(&env(&[(MAX_WORKERS_VAR, "0")])).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidConfig { variable, .. } if variable == MAX_WORKERS_VAR));
    }
}

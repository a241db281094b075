//! Caller-side mirror of the two service operations.

use std::time::Duration;

use serde_json::{Map, Value};
use tonic::Request;
use tonic::transport::{Channel, Endpoint};
use tool_primitives::{StructuredResult, ToolSchema};
use tool_wire::{
    ExecuteRequest, GetToolSchemaRequest, PayloadEncoding, ToolServiceClient, encode_payload,
};
use tracing::debug;

use crate::error::{ClientError, ClientResult};

/// Connection settings for [`ToolClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    address: String,
    encoding: PayloadEncoding,
    timeout: Option<Duration>,
}

impl ClientConfig {
    /// Targets `address`, given as `host:port` or a full `http://` URI.
    #[must_use]
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            encoding: PayloadEncoding::Text,
            timeout: None,
        }
    }

    /// Sends binary payloads instead of JSON text.
    #[must_use]
    pub fn with_binary(mut self, use_binary: bool) -> Self {
        self.encoding = if use_binary {
            PayloadEncoding::Binary
        } else {
            PayloadEncoding::Text
        };
        self
    }

    /// Attaches a deadline to every call.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Returns the configured address.
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Returns the payload encoding.
    #[must_use]
    pub const fn encoding(&self) -> PayloadEncoding {
        self.encoding
    }

    /// Returns the per-call deadline.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    fn uri(&self) -> String {
        if self.address.contains("://") {
            self.address.clone()
        } else {
            format!("http://{}", self.address)
        }
    }
}

/// Connected client.
#[derive(Debug, Clone)]
pub struct ToolClient {
    inner: Option<ToolServiceClient<Channel>>,
    config: ClientConfig,
}

impl ToolClient {
    /// Connects to the service.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Connect`] if the address is invalid or the
    /// service cannot be reached.
    pub async fn connect(config: ClientConfig) -> ClientResult<Self> {
        let connect_error = |source| ClientError::Connect {
            address: config.address.clone(),
            source,
        };
        let channel = Endpoint::from_shared(config.uri())
            .map_err(connect_error)?
            .connect()
            .await
            .map_err(connect_error)?;

        debug!(address = %config.address, "connected to tool service");
        Ok(Self {
            inner: Some(ToolServiceClient::new(channel)),
            config,
        })
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Releases the connection. Later calls fail with [`ClientError::Closed`].
    pub fn close(&mut self) {
        if self.inner.take().is_some() {
            debug!(address = %self.config.address, "closed tool client");
        }
    }

    /// Fetches the input schema of `tool_name`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Rpc`] with `NOT_FOUND` for unknown tools, or
    /// another transport-level error.
    pub async fn get_tool_schema(&mut self, tool_name: &str) -> ClientResult<ToolSchema> {
        let request = self.request(GetToolSchemaRequest {
            tool_name: tool_name.to_owned(),
        });
        let schema = self.inner()?.get_tool_schema(request).await?.into_inner();
        Ok(ToolSchema::try_from(schema)?)
    }

    /// Runs `tool_name` with `input`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Tool`] when the tool reports a failure and a
    /// transport-level error otherwise.
    pub async fn execute(
        &mut self,
        tool_name: &str,
        input: &Map<String, Value>,
    ) -> ClientResult<StructuredResult> {
        let payload = encode_payload(input, self.config.encoding)?;
        let request = self.request(ExecuteRequest {
            tool_name: tool_name.to_owned(),
            payload: Some(payload),
        });

        debug!(tool = tool_name, encoding = %self.config.encoding, "executing tool");
        let response = self.inner()?.execute(request).await?.into_inner();
        Ok(response.into_outcome()??)
    }

    fn request<T>(&self, message: T) -> Request<T> {
        let mut request = Request::new(message);
        if let Some(timeout) = self.config.timeout {
            request.set_timeout(timeout);
        }
        request
    }

    fn inner(&mut self) -> ClientResult<&mut ToolServiceClient<Channel>> {
        self.inner.as_mut().ok_or(ClientError::Closed)
    }
}

/// Connects, runs one call, and disconnects.
///
/// # Errors
///
/// See [`ToolClient::connect`] and [`ToolClient::execute`].
pub async fn run(
    config: ClientConfig,
    tool_name: &str,
    input: &Map<String, Value>,
) -> ClientResult<StructuredResult> {
    let mut client = ToolClient::connect(config).await?;
    let result = client.execute(tool_name, input).await;
    client.close();
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_addresses_get_a_scheme() {
        assert_eq!(ClientConfig::new("localhost:50051").uri(), "http://localhost:50051");
        assert_eq!(
            ClientConfig::new("https://tools.internal:443").uri(),
            "https://tools.internal:443"
        );
    }

    #[test]
    fn text_is_the_default_encoding() {
        let config = ClientConfig::new("localhost:50051");
        assert_eq!(config.encoding(), PayloadEncoding::Text);
        assert_eq!(config.with_binary(true).encoding(), PayloadEncoding::Binary);
    }

    #[tokio::test]
    async fn unreachable_service_is_an_rpc_error() {
        let err = ToolClient::connect(ClientConfig::new("not a uri"))
            .await
            .unwrap_err();
        assert!(err.is_rpc_error());
        assert_eq!(err.kind(), crate::RPC_ERROR);
    }
}

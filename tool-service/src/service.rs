//! gRPC handler for `Execute` and `GetToolSchema`.

use std::sync::Arc;

use tonic::{Request, Response, Status};
use tool_primitives::ToolError;
use tool_runtime::ToolRegistry;
use tool_wire::{
    ExecuteRequest, ExecuteResponse, GetToolSchemaRequest, PayloadEncoding, ToolSchema,
    ToolServiceServer, WireError, decode_payload, encode_result,
};
use tracing::{Instrument, debug, info_span, warn};
use uuid::Uuid;

use crate::dispatch::Dispatcher;
use crate::pool::WorkerPool;

/// Serves the tools of an immutable registry.
#[derive(Debug, Clone)]
pub struct ToolService {
    registry: Arc<ToolRegistry>,
    dispatcher: Dispatcher,
}

impl ToolService {
    /// Creates a handler over `registry`, running blocking work on `pool`.
    #[must_use]
    pub fn new(registry: ToolRegistry, pool: WorkerPool) -> Self {
        Self {
            registry: Arc::new(registry),
            dispatcher: Dispatcher::new(pool),
        }
    }

    /// Returns the registry.
    #[must_use]
    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Returns the dispatcher.
    #[must_use]
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Wraps the handler in the generated tonic server.
    #[must_use]
    pub fn into_server(self) -> ToolServiceServer<Self> {
        ToolServiceServer::new(self)
    }

    async fn run(&self, request: ExecuteRequest) -> Result<ExecuteResponse, Status> {
        let Some(tool) = self.registry.get(&request.tool_name) else {
            return Err(tool_not_found(&request.tool_name));
        };

        let payload = request
            .payload
            .ok_or(WireError::MissingPayload)
            .map_err(invalid_payload)?;
        let encoding = PayloadEncoding::of(&payload);
        let input = decode_payload(&payload).map_err(invalid_payload)?;

        debug!(%encoding, fields = input.len(), "decoded payload");

        let response = match self.dispatcher.invoke(tool, input).await {
            Ok(result) => match encode_result(&result, encoding) {
                Ok(encoded) => ExecuteResponse::success(encoded),
                Err(err) => ExecuteResponse::failure(
                    &ToolError::internal(format!("failed to encode result: {err}"))
                        .with_cause(err),
                ),
            },
            Err(error) => {
                warn!(kind = %error.kind(), message = error.message(), "tool call failed");
                ExecuteResponse::failure(&error)
            }
        };
        Ok(response)
    }
}

#[tonic::async_trait]
impl tool_wire::ToolService for ToolService {
    async fn execute(
        &self,
        request: Request<ExecuteRequest>,
    ) -> Result<Response<ExecuteResponse>, Status> {
        let request = request.into_inner();
        let span = info_span!(
            "execute",
            call_id = %Uuid::new_v4(),
            tool = %request.tool_name,
        );
        self.run(request).instrument(span).await.map(Response::new)
    }

    async fn get_tool_schema(
        &self,
        request: Request<GetToolSchemaRequest>,
    ) -> Result<Response<ToolSchema>, Status> {
        let request = request.into_inner();
        let tool = self
            .registry
            .get(&request.tool_name)
            .ok_or_else(|| tool_not_found(&request.tool_name))?;

        debug!(tool = %request.tool_name, "describing tool");
        Ok(Response::new(ToolSchema::from(&tool.schema())))
    }
}

#[allow(clippy::needless_pass_by_value)]
fn invalid_payload(err: WireError) -> Status {
    Status::invalid_argument(err.to_string())
}

fn tool_not_found(name: &str) -> Status {
    Status::not_found(format!("Tool {name} not found"))
}

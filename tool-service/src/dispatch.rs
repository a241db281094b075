//! Runs a tool for one call and normalises whatever it produces.

use std::any::Any;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use serde_json::{Map, Value};
use tool_primitives::{StructuredResult, ToolError, ToolOutput, ToolResult};
use tool_runtime::{FunctionHandler, Tool};
use tracing::debug;

use crate::pool::{PoolError, WorkerPool};

/// Invokes tools by variant.
///
/// Every failure, including a panic inside tool code, comes back as a
/// [`ToolError`]; nothing escapes unconverted.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    pool: WorkerPool,
}

impl Dispatcher {
    /// Creates a dispatcher that sends blocking work to `pool`.
    #[must_use]
    pub fn new(pool: WorkerPool) -> Self {
        Self { pool }
    }

    /// Returns the worker pool.
    #[must_use]
    pub fn pool(&self) -> &WorkerPool {
        &self.pool
    }

    /// Runs `tool` with the decoded input object.
    ///
    /// # Errors
    ///
    /// Returns the tool's own error, `invalid_input` for arguments that do
    /// not fit the tool, and `internal_error` for panics or an unavailable
    /// worker pool.
    pub async fn invoke(
        &self,
        tool: &Tool,
        input: Map<String, Value>,
    ) -> ToolResult<StructuredResult> {
        let output = match tool {
            Tool::Function(function) => {
                let args = function.bind(input)?;
                match function.handler() {
                    FunctionHandler::Async(handler) => {
                        debug!(handler = "async", "dispatching function tool");
                        let handler = handler.clone();
                        catch_panic(async move { handler(args).await }).await
                    }
                    FunctionHandler::Blocking(handler) => {
                        debug!(handler = "blocking", "dispatching function tool");
                        let handler = handler.clone();
                        self.pool
                            .run(move || handler(args))
                            .await
                            .unwrap_or_else(|err| Err(pool_failure(&err)))
                    }
                }
            }
            Tool::Structured(handle) if handle.is_blocking() => {
                debug!(handler = "blocking", "dispatching structured tool");
                let handle = handle.clone();
                let runtime = tokio::runtime::Handle::current();
                self.pool
                    .run(move || runtime.block_on(handle.call(input)))
                    .await
                    .unwrap_or_else(|err| Err(pool_failure(&err)))
            }
            Tool::Structured(handle) => {
                debug!(handler = "async", "dispatching structured tool");
                let handle = handle.clone();
                catch_panic(async move { handle.call(input).await }).await
            }
        }?;

        Ok(output.into_structured(tool.name()))
    }
}

async fn catch_panic<F>(future: F) -> ToolResult<ToolOutput>
where
    F: Future<Output = ToolResult<ToolOutput>>,
{
    AssertUnwindSafe(future)
        .catch_unwind()
        .await
        .unwrap_or_else(|panic| {
            Err(ToolError::internal(format!(
                "tool panicked: {}",
                panic_message(&*panic)
            )))
        })
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    panic
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| panic.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}

fn pool_failure(err: &PoolError) -> ToolError {
    match err {
        PoolError::Closed => ToolError::internal("worker pool is shut down"),
        PoolError::Panicked { message } => ToolError::internal(format!("tool panicked: {message}")),
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;
    use std::thread::{self, ThreadId};

    use async_trait::async_trait;
    use schemars::JsonSchema;
    use serde::Deserialize;
    use serde_json::json;
    use tool_primitives::{ToolErrorKind, ToolMetadata, TypeTag};
    use tool_runtime::{FunctionTool, Parameter, StructuredTool};

    use super::*;

    #[derive(Deserialize, JsonSchema)]
    struct Empty {}

    struct Hasher;

    #[async_trait]
    impl StructuredTool for Hasher {
        type Input = Empty;

        fn blocking(&self) -> bool {
            true
        }

        async fn execute(&self, _input: Empty) -> ToolResult<ToolOutput> {
            Ok(format!("{:?}", thread::current().id()).into())
        }
    }

    fn thread_label(id: ThreadId) -> String {
        format!("{id:?}")
    }

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(WorkerPool::new(NonZeroUsize::new(2).unwrap()))
    }

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn blocking_tools_run_on_the_pool() {
        let tool: Tool = FunctionTool::builder(ToolMetadata::new("square").unwrap())
            .param(Parameter::required("x", TypeTag::Int64))
            .blocking(|args| {
                let x: i64 = args.get("x")?;
                Ok(json!(x * x))
            })
            .into();

        let result = dispatcher().invoke(&tool, object(json!({"x": 7}))).await.unwrap();
        assert_eq!(result.content(), "49");
        assert_eq!(result.variable_name(), "square_result");
    }

    #[tokio::test]
    async fn panics_become_internal_errors() {
        let tool: Tool = FunctionTool::builder(ToolMetadata::new("explode").unwrap())
            .handler(|_args| async move {
                if true {
                    panic!("kaboom");
                }
                Ok("unreachable")
            })
            .into();

        let err = dispatcher().invoke(&tool, Map::new()).await.unwrap_err();
        assert_eq!(err.kind(), ToolErrorKind::InternalError);
        assert!(err.message().contains("kaboom"));
    }

    #[tokio::test]
    async fn blocking_structured_tools_leave_the_scheduler_thread() {
        let tool = Tool::structured(ToolMetadata::new("hasher").unwrap(), Hasher);

        let result = dispatcher().invoke(&tool, Map::new()).await.unwrap();
        assert_ne!(result.content(), thread_label(thread::current().id()));
        assert_eq!(result.variable_name(), "hasher_result");

        let dispatcher = dispatcher();
        dispatcher.pool().close();
        let err = dispatcher.invoke(&tool, Map::new()).await.unwrap_err();
        assert_eq!(err.kind(), ToolErrorKind::InternalError);
    }

    #[tokio::test]
    async fn closed_pool_is_an_internal_error() {
        let tool: Tool = FunctionTool::builder(ToolMetadata::new("noop").unwrap())
            .blocking(|_args| Ok("done"))
            .into();

        let dispatcher = dispatcher();
        dispatcher.pool().close();
        let err = dispatcher.invoke(&tool, Map::new()).await.unwrap_err();
        assert_eq!(err.kind(), ToolErrorKind::InternalError);
    }
}

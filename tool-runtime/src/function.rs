//! Function-style tools invoked with named arguments.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::{self, BoxFuture, FutureExt};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tool_primitives::{FieldDescriptor, ToolError, ToolMetadata, ToolOutput, ToolResult, TypeTag};

use crate::shape::InputShape;

/// Future returned by asynchronous function handlers.
pub type BoxToolFuture = BoxFuture<'static, ToolResult<ToolOutput>>;

type AsyncFn = dyn Fn(Arguments) -> BoxToolFuture + Send + Sync;
type BlockingFn = dyn Fn(Arguments) -> ToolResult<ToolOutput> + Send + Sync;

/// How the service should run a function tool.
#[derive(Clone)]
pub enum FunctionHandler {
    /// Runs on the service's cooperative scheduler.
    Async(Arc<AsyncFn>),
    /// CPU-bound or blocking work, run on the bounded worker pool.
    Blocking(Arc<BlockingFn>),
}

impl fmt::Debug for FunctionHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Async(_) => f.write_str("FunctionHandler::Async"),
            Self::Blocking(_) => f.write_str("FunctionHandler::Blocking"),
        }
    }
}

/// Declared parameter of a function tool.
#[derive(Clone, Debug, PartialEq)]
pub struct Parameter {
    name: String,
    type_tag: Option<TypeTag>,
    required: bool,
    default: Option<Value>,
    description: String,
}

impl Parameter {
    /// A typed parameter without a default.
    #[must_use]
    pub fn required(name: impl Into<String>, type_tag: TypeTag) -> Self {
        Self {
            name: name.into(),
            type_tag: Some(type_tag),
            required: true,
            default: None,
            description: String::new(),
        }
    }

    /// A typed parameter that may be omitted.
    #[must_use]
    pub fn optional(name: impl Into<String>, type_tag: TypeTag) -> Self {
        Self {
            required: false,
            ..Self::required(name, type_tag)
        }
    }

    /// A required parameter without a type annotation.
    #[must_use]
    pub fn untyped(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_tag: None,
            required: true,
            default: None,
            description: String::new(),
        }
    }

    /// Supplies a default value, which makes the parameter optional.
    #[must_use]
    pub fn with_default(mut self, default: Value) -> Self {
        self.required = false;
        self.default = Some(default);
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Returns the parameter name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the type annotation, if any.
    #[must_use]
    pub const fn type_tag(&self) -> Option<TypeTag> {
        self.type_tag
    }

    /// Returns whether callers must supply the parameter.
    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.required
    }

    /// Returns the default value, if any.
    #[must_use]
    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Describes the parameter for the schema endpoint.
    ///
    /// Untyped parameters have no wire description and yield `None`.
    #[must_use]
    pub fn descriptor(&self) -> Option<FieldDescriptor> {
        self.type_tag.map(|type_tag| {
            FieldDescriptor::new(self.name.clone(), type_tag, self.required)
                .with_description(self.description.clone())
        })
    }

    fn from_descriptor(field: &FieldDescriptor) -> Self {
        Self {
            name: field.name().to_owned(),
            type_tag: Some(field.type_tag()),
            required: field.required(),
            default: None,
            description: field.description().to_owned(),
        }
    }
}

/// Named arguments passed to a function tool.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Arguments(Map<String, Value>);

impl Arguments {
    /// Wraps a decoded JSON object.
    #[must_use]
    pub fn new(values: Map<String, Value>) -> Self {
        Self(values)
    }

    /// Deserialises a required argument.
    ///
    /// # Errors
    ///
    /// Returns an `invalid_input` [`ToolError`] if the argument is missing or
    /// has the wrong shape.
    pub fn get<T: DeserializeOwned>(&self, name: &str) -> ToolResult<T> {
        let value = self
            .0
            .get(name)
            .ok_or_else(|| ToolError::invalid_input(format!("missing argument `{name}`")))?;
        T::deserialize(value).map_err(|err| {
            ToolError::invalid_input(format!("invalid argument `{name}`: {err}")).with_cause(err)
        })
    }

    /// Deserialises an optional argument; `null` counts as absent.
    ///
    /// # Errors
    ///
    /// Returns an `invalid_input` [`ToolError`] if the argument is present but
    /// has the wrong shape.
    pub fn get_optional<T: DeserializeOwned>(&self, name: &str) -> ToolResult<Option<T>> {
        match self.0.get(name) {
            None | Some(Value::Null) => Ok(None),
            Some(_) => self.get(name).map(Some),
        }
    }

    /// Returns the raw JSON value of an argument.
    #[must_use]
    pub fn raw(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Deserialises all arguments into a single structured value.
    ///
    /// # Errors
    ///
    /// Returns an `invalid_input` [`ToolError`] if the arguments do not match `T`.
    pub fn parse<T: DeserializeOwned>(self) -> ToolResult<T> {
        serde_json::from_value(Value::Object(self.0)).map_err(|err| {
            ToolError::invalid_input(format!("invalid arguments: {err}")).with_cause(err)
        })
    }

    /// Returns the underlying JSON object.
    #[must_use]
    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

/// Function-style tool.
#[derive(Clone)]
pub struct FunctionTool {
    metadata: ToolMetadata,
    parameters: Option<Vec<Parameter>>,
    shape: Option<InputShape>,
    handler: FunctionHandler,
}

impl fmt::Debug for FunctionTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionTool")
            .field("name", &self.metadata.name())
            .field("parameters", &self.parameters)
            .field("handler", &self.handler)
            .finish_non_exhaustive()
    }
}

impl FunctionTool {
    /// Starts building a function tool with explicit parameters.
    #[must_use]
    pub fn builder(metadata: ToolMetadata) -> FunctionToolBuilder {
        FunctionToolBuilder {
            metadata,
            parameters: None,
        }
    }

    /// Builds a tool whose single input is a typed struct.
    ///
    /// Parameters are derived from the struct's schema, and the decoded
    /// arguments are deserialised into `P` before `handler` runs.
    pub fn typed<P, O, F, Fut>(metadata: ToolMetadata, handler: F) -> Self
    where
        P: DeserializeOwned + JsonSchema + Send + 'static,
        O: Into<ToolOutput> + 'static,
        F: Fn(P) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ToolResult<O>> + Send + 'static,
    {
        let shape = InputShape::of::<P>();
        let parameters = shape.fields().iter().map(Parameter::from_descriptor).collect();
        let handler: Arc<AsyncFn> = Arc::new(move |args: Arguments| match args.parse::<P>() {
            Ok(params) => handler(params)
                .map(|result| result.map(Into::<ToolOutput>::into))
                .boxed(),
            Err(err) => future::ready(Err(err)).boxed(),
        });

        Self {
            metadata,
            parameters: Some(parameters),
            shape: Some(shape),
            handler: FunctionHandler::Async(handler),
        }
    }

    /// Returns the tool metadata.
    #[must_use]
    pub fn metadata(&self) -> &ToolMetadata {
        &self.metadata
    }

    /// Returns the declared parameters, or `None` when the signature is unknown.
    #[must_use]
    pub fn parameters(&self) -> Option<&[Parameter]> {
        self.parameters.as_deref()
    }

    /// Returns the declared input shape of typed tools.
    #[must_use]
    pub fn input_shape(&self) -> Option<&InputShape> {
        self.shape.as_ref()
    }

    /// Returns the handler.
    #[must_use]
    pub fn handler(&self) -> &FunctionHandler {
        &self.handler
    }

    /// Binds decoded arguments to the declared parameters.
    ///
    /// Missing required parameters, unknown names, and values that do not
    /// match a parameter's type annotation are rejected; defaults are filled
    /// in for omitted optional parameters. Tools with an unknown signature
    /// receive the arguments unchanged.
    ///
    /// # Errors
    ///
    /// Returns an `invalid_input` [`ToolError`] describing the first problem.
    pub fn bind(&self, mut values: Map<String, Value>) -> ToolResult<Arguments> {
        let Some(parameters) = &self.parameters else {
            return Ok(Arguments::new(values));
        };

        if let Some(unexpected) = values
            .keys()
            .find(|name| !parameters.iter().any(|param| param.name == **name))
        {
            return Err(ToolError::invalid_input(format!(
                "{}() got an unexpected argument `{unexpected}`",
                self.metadata.name()
            )));
        }

        for param in parameters {
            match values.get(&param.name) {
                None => {
                    if param.required {
                        return Err(ToolError::invalid_input(format!(
                            "{}() missing required argument `{}`",
                            self.metadata.name(),
                            param.name
                        )));
                    }
                    if let Some(default) = &param.default {
                        values.insert(param.name.clone(), default.clone());
                    }
                }
                Some(Value::Null) if !param.required => {}
                Some(value) => {
                    if let Some(type_tag) = param.type_tag {
                        if !type_tag.accepts(value) {
                            return Err(ToolError::invalid_input(format!(
                                "argument `{}` must be of type {type_tag}",
                                param.name
                            )));
                        }
                    }
                }
            }
        }

        Ok(Arguments::new(values))
    }
}

/// Builder for [`FunctionTool`].
#[derive(Debug)]
pub struct FunctionToolBuilder {
    metadata: ToolMetadata,
    parameters: Option<Vec<Parameter>>,
}

impl FunctionToolBuilder {
    /// Declares a parameter. Declaration order is preserved in the schema.
    #[must_use]
    pub fn param(mut self, parameter: Parameter) -> Self {
        self.parameters.get_or_insert_with(Vec::new).push(parameter);
        self
    }

    /// Declares an empty parameter list, so any argument is rejected.
    #[must_use]
    pub fn no_params(mut self) -> Self {
        self.parameters.get_or_insert_with(Vec::new);
        self
    }

    /// Finishes the tool with an asynchronous handler.
    pub fn handler<O, F, Fut>(self, handler: F) -> FunctionTool
    where
        O: Into<ToolOutput> + 'static,
        F: Fn(Arguments) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ToolResult<O>> + Send + 'static,
    {
        let handler: Arc<AsyncFn> = Arc::new(move |args: Arguments| {
            handler(args).map(|result| result.map(Into::<ToolOutput>::into)).boxed()
        });
        self.finish(FunctionHandler::Async(handler))
    }

    /// Finishes the tool with a blocking handler run on the worker pool.
    pub fn blocking<O, F>(self, handler: F) -> FunctionTool
    where
        O: Into<ToolOutput> + 'static,
        F: Fn(Arguments) -> ToolResult<O> + Send + Sync + 'static,
    {
        let handler: Arc<BlockingFn> =
            Arc::new(move |args: Arguments| handler(args).map(Into::<ToolOutput>::into));
        self.finish(FunctionHandler::Blocking(handler))
    }

    fn finish(self, handler: FunctionHandler) -> FunctionTool {
        FunctionTool {
            metadata: self.metadata,
            parameters: self.parameters,
            shape: None,
            handler,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;
    use tool_primitives::ToolErrorKind;

    use super::*;

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    fn greet() -> FunctionTool {
        FunctionTool::builder(ToolMetadata::new("greet").unwrap())
            .param(Parameter::required("name", TypeTag::String))
            .param(Parameter::optional("punctuation", TypeTag::String).with_default(json!("!")))
            .handler(|args| async move {
                let name: String = args.get("name")?;
                let punctuation: String = args.get("punctuation")?;
                Ok::<_, ToolError>(format!("Hello, {name}{punctuation}"))
            })
    }

    async fn run(tool: &FunctionTool, args: Arguments) -> ToolResult<ToolOutput> {
        match tool.handler() {
            FunctionHandler::Async(handler) => handler(args).await,
            FunctionHandler::Blocking(handler) => handler(args),
        }
    }

    #[tokio::test]
    async fn bind_fills_defaults() {
        let tool = greet();
        let args = tool.bind(object(json!({"name": "Alice"}))).unwrap();
        let output = run(&tool, args).await.unwrap();
        assert_eq!(output, ToolOutput::from("Hello, Alice!"));
    }

    #[test]
    fn bind_rejects_bad_arguments() {
        let tool = greet();

        let err = tool.bind(object(json!({}))).unwrap_err();
        assert_eq!(err.kind(), ToolErrorKind::InvalidInput);
        assert!(err.message().contains("missing required argument `name`"));

        let err = tool.bind(object(json!({"name": 42}))).unwrap_err();
        assert_eq!(err.kind(), ToolErrorKind::InvalidInput);

        let err = tool.bind(object(json!({"name": "Bob", "mood": "happy"}))).unwrap_err();
        assert!(err.message().contains("unexpected argument `mood`"));
    }

    #[test]
    fn unknown_signature_passes_arguments_through() {
        let tool = FunctionTool::builder(ToolMetadata::new("raw").unwrap())
            .handler(|args| async move { Ok(Value::Object(args.into_inner())) });
        let args = tool.bind(object(json!({"anything": [1, 2]}))).unwrap();
        assert_eq!(args.raw("anything"), Some(&json!([1, 2])));
    }

    #[derive(Deserialize, JsonSchema)]
    struct Addition {
        x: i64,
        y: i64,
    }

    #[tokio::test]
    async fn typed_tools_parse_their_input() {
        let tool = FunctionTool::typed(
            ToolMetadata::new("add").unwrap(),
            |input: Addition| async move { Ok(json!(input.x + input.y)) },
        );

        let names: Vec<_> = tool.parameters().unwrap().iter().map(Parameter::name).collect();
        assert_eq!(names, ["x", "y"]);

        let args = tool.bind(object(json!({"x": 5, "y": 3}))).unwrap();
        assert_eq!(run(&tool, args).await.unwrap(), ToolOutput::from(json!(8)));

        let err = tool.bind(object(json!({"x": "five", "y": 3}))).unwrap_err();
        assert_eq!(err.kind(), ToolErrorKind::InvalidInput);
    }

    #[test]
    fn blocking_handlers_are_tagged() {
        let tool = FunctionTool::builder(ToolMetadata::new("hash").unwrap())
            .no_params()
            .blocking(|_args| Ok("digest"));
        assert!(matches!(tool.handler(), FunctionHandler::Blocking(_)));
        assert!(tool.bind(object(json!({"x": 1}))).is_err());
    }
}

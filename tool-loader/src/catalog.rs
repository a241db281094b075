//! Explicit catalog of loadable tool modules.
//!
//! A binary lists the modules it ships and the symbols each module exports.
//! The loader resolves `(module, symbol)` pairs against this catalog instead
//! of importing code at runtime.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tool_primitives::{BoxError, ToolMetadata};
use tool_runtime::{StructuredTool, Tool};

type Constructor = Arc<dyn Fn(Map<String, Value>) -> Result<Tool, BoxError> + Send + Sync>;

/// An exported entry of a tool module.
///
/// A symbol may carry a factory, a direct constructor, and a ready-made tool.
/// When loading, the factory wins over the constructor, which wins over the
/// ready-made tool.
#[derive(Clone, Default)]
pub struct Symbol {
    factory: Option<Constructor>,
    constructor: Option<Constructor>,
    function: Option<Tool>,
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Symbol")
            .field("factory", &self.factory.is_some())
            .field("constructor", &self.constructor.is_some())
            .field("function", &self.function)
            .finish()
    }
}

impl Symbol {
    /// A symbol built by a factory that receives the configured arguments.
    pub fn factory<F, E>(factory: F) -> Self
    where
        F: Fn(Map<String, Value>) -> Result<Tool, E> + Send + Sync + 'static,
        E: Into<BoxError>,
    {
        Self::default().with_factory(factory)
    }

    /// A structured tool instantiated by deserialising the configured
    /// arguments into `T`.
    #[must_use]
    pub fn constructible<T>(metadata: ToolMetadata) -> Self
    where
        T: StructuredTool + DeserializeOwned,
    {
        let constructor: Constructor = Arc::new(move |args| {
            let tool: T = serde_json::from_value(Value::Object(args))?;
            Ok(Tool::structured(metadata.clone(), tool))
        });
        Self {
            constructor: Some(constructor),
            ..Self::default()
        }
    }

    /// A ready-to-use tool, returned as is.
    pub fn function(tool: impl Into<Tool>) -> Self {
        Self {
            function: Some(tool.into()),
            ..Self::default()
        }
    }

    /// Adds a factory, which takes precedence over any other entry.
    #[must_use]
    pub fn with_factory<F, E>(mut self, factory: F) -> Self
    where
        F: Fn(Map<String, Value>) -> Result<Tool, E> + Send + Sync + 'static,
        E: Into<BoxError>,
    {
        self.factory = Some(Arc::new(move |args| {
            factory(args).map_err(Into::<BoxError>::into)
        }));
        self
    }

    pub(crate) fn instantiate(&self, args: Option<Map<String, Value>>) -> Instantiation {
        if let Some(factory) = &self.factory {
            return Instantiation::Built {
                via: "factory",
                result: factory(args.unwrap_or_default()),
            };
        }
        if let Some(constructor) = &self.constructor {
            return Instantiation::Built {
                via: "constructor",
                result: constructor(args.unwrap_or_default()),
            };
        }
        match &self.function {
            Some(tool) => Instantiation::Ready(tool.clone()),
            None => Instantiation::Empty,
        }
    }
}

pub(crate) enum Instantiation {
    Built {
        via: &'static str,
        result: Result<Tool, BoxError>,
    },
    Ready(Tool),
    Empty,
}

/// Named group of symbols.
#[derive(Clone, Debug, Default)]
pub struct ToolModule {
    symbols: HashMap<String, Symbol>,
}

impl ToolModule {
    /// Creates an empty module.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Exports `symbol` under `name`, replacing any previous export.
    #[must_use]
    pub fn with_symbol(mut self, name: impl Into<String>, symbol: Symbol) -> Self {
        self.symbols.insert(name.into(), symbol);
        self
    }

    /// Returns the symbol exported under `name`.
    #[must_use]
    pub fn symbol(&self, name: &str) -> Option<&Symbol> {
        self.symbols.get(name)
    }
}

/// Every module a binary can load tools from.
#[derive(Clone, Debug, Default)]
pub struct ToolCatalog {
    modules: HashMap<String, ToolModule>,
}

impl ToolCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `module` under `name`, replacing any previous module.
    #[must_use]
    pub fn with_module(mut self, name: impl Into<String>, module: ToolModule) -> Self {
        self.modules.insert(name.into(), module);
        self
    }

    /// Returns the module registered under `name`.
    #[must_use]
    pub fn module(&self, name: &str) -> Option<&ToolModule> {
        self.modules.get(name)
    }

    /// Lists module names in sorted order.
    #[must_use]
    pub fn module_names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.modules.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

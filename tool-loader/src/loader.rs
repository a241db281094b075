//! Resolves configured tools against a [`ToolCatalog`].

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tool_runtime::Tool;
use tracing::{info, warn};

use crate::catalog::{Instantiation, ToolCatalog};
use crate::config::ToolConfig;
use crate::env::{
    DEFAULT_TOOLSPEC_PATH, EnvSource, ProcessEnv, TOOL_MODULE_VAR, TOOL_NAME_VAR,
    TOOLSPEC_PATH_VAR,
};
use crate::error::{LoaderError, LoaderResult};
use crate::spec::{ToolSpec, read_tool_args};

/// Loads tools from configuration.
#[derive(Clone, Debug)]
pub struct ToolLoader {
    catalog: ToolCatalog,
}

impl ToolLoader {
    /// Creates a loader over `catalog`.
    #[must_use]
    pub fn new(catalog: ToolCatalog) -> Self {
        Self { catalog }
    }

    /// Returns the catalog.
    #[must_use]
    pub fn catalog(&self) -> &ToolCatalog {
        &self.catalog
    }

    /// Loads the tool named by the process environment.
    ///
    /// # Errors
    ///
    /// See [`ToolLoader::load_from_env_source`].
    pub fn load_from_environment(&self) -> LoaderResult<Tool> {
        self.load_from_env_source(&ProcessEnv)
    }

    /// Loads the tool named by `TOOLHOST_TOOL_MODULE` and `TOOLHOST_TOOL_NAME`.
    ///
    /// Construction arguments come from the spec file's `tool_args` when the
    /// file exists. A spec file that cannot be read only logs a warning.
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError::Configuration`] if either variable is missing or
    /// empty, and any [`ToolLoader::load_tool`] error.
    pub fn load_from_env_source(&self, env: &impl EnvSource) -> LoaderResult<Tool> {
        let module_name = env.var(TOOL_MODULE_VAR).filter(|value| !value.is_empty());
        let tool_name = env.var(TOOL_NAME_VAR).filter(|value| !value.is_empty());
        let (Some(module_name), Some(tool_name)) = (module_name, tool_name) else {
            return Err(LoaderError::configuration(format!(
                "{TOOL_MODULE_VAR} and {TOOL_NAME_VAR} environment variables are required"
            )));
        };

        let mut config = ToolConfig::new(module_name, tool_name);
        config.args = args_from_spec(&spec_path(env));
        self.load_tool(&config)
    }

    /// Loads the tool described by a spec file.
    ///
    /// # Errors
    ///
    /// Returns a configuration or spec error if the file is missing or
    /// invalid, and any [`ToolLoader::load_tool`] error.
    pub fn load_from_spec(&self, path: impl AsRef<Path>) -> LoaderResult<Tool> {
        let spec = ToolSpec::from_path(path.as_ref())?;
        self.load_tool(&spec.to_config()?)
    }

    /// Resolves the module and symbol, then builds the tool.
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError::ModuleNotFound`], [`LoaderError::SymbolNotFound`],
    /// or [`LoaderError::Construction`] when the corresponding step fails.
    pub fn load_tool(&self, config: &ToolConfig) -> LoaderResult<Tool> {
        info!(module = %config.module_name, "loading tool module");
        let module = self.catalog.module(&config.module_name).ok_or_else(|| {
            LoaderError::ModuleNotFound {
                module: config.module_name.clone(),
            }
        })?;

        info!(symbol = %config.tool_name, "loading tool symbol");
        let symbol = module
            .symbol(&config.tool_name)
            .ok_or_else(|| symbol_not_found(config))?;

        match symbol.instantiate(config.args.clone()) {
            Instantiation::Built { via, result } => {
                info!(via, "creating tool instance");
                result.map_err(|source| LoaderError::Construction {
                    symbol: config.tool_name.clone(),
                    source,
                })
            }
            Instantiation::Ready(tool) => {
                info!(tool = tool.name(), "using function-based tool");
                Ok(tool)
            }
            Instantiation::Empty => Err(symbol_not_found(config)),
        }
    }
}

fn symbol_not_found(config: &ToolConfig) -> LoaderError {
    LoaderError::SymbolNotFound {
        module: config.module_name.clone(),
        symbol: config.tool_name.clone(),
    }
}

fn spec_path(env: &impl EnvSource) -> PathBuf {
    env.var(TOOLSPEC_PATH_VAR)
        .unwrap_or_else(|| DEFAULT_TOOLSPEC_PATH.to_owned())
        .into()
}

fn args_from_spec(path: &Path) -> Option<Map<String, Value>> {
    if !path.exists() {
        return None;
    }
    match read_tool_args(path) {
        Ok(args) => args,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "failed to load tool args from spec");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;

    use async_trait::async_trait;
    use schemars::JsonSchema;
    use serde::Deserialize;
    use serde_json::json;
    use tool_primitives::{ToolError, ToolMetadata, ToolOutput, ToolResult};
    use tool_runtime::FunctionTool;

    use super::*;
    use crate::catalog::{Symbol, ToolModule};

    #[derive(Deserialize, JsonSchema)]
    struct PowerInput {
        base: f64,
    }

    #[derive(Debug, Deserialize)]
    struct PowerTool {
        exponent: i32,
    }

    #[async_trait]
    impl tool_runtime::StructuredTool for PowerTool {
        type Input = PowerInput;

        async fn execute(&self, input: PowerInput) -> ToolResult<ToolOutput> {
            Ok(ToolOutput::from(json!(input.base.powi(self.exponent))))
        }
    }

    fn power_metadata() -> ToolMetadata {
        ToolMetadata::new("power").unwrap()
    }

    fn catalog() -> ToolCatalog {
        let echo = FunctionTool::builder(ToolMetadata::new("echo").unwrap())
            .handler(|args| async move { Ok::<_, ToolError>(Value::Object(args.into_inner())) });

        let power = Symbol::constructible::<PowerTool>(power_metadata());
        let doubled = Symbol::constructible::<PowerTool>(power_metadata()).with_factory(
            |_args: Map<String, Value>| -> Result<Tool, ToolError> {
                Ok(Tool::structured(
                    ToolMetadata::new("square").unwrap(),
                    PowerTool { exponent: 2 },
                ))
            },
        );

        ToolCatalog::new().with_module(
            "power_tool",
            ToolModule::new()
                .with_symbol("PowerTool", power)
                .with_symbol("SquareTool", doubled)
                .with_symbol("echo", Symbol::function(echo)),
        )
    }

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    fn args(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn constructor_receives_arguments() {
        let loader = ToolLoader::new(catalog());
        let config =
            ToolConfig::new("power_tool", "PowerTool").with_args(args(json!({"exponent": 3})));
        let tool = loader.load_tool(&config).unwrap();
        assert_eq!(tool.name(), "power");
        assert_eq!(tool.kind(), "structured");
    }

    #[test]
    fn factory_takes_precedence_over_constructor() {
        let loader = ToolLoader::new(catalog());
        let tool = loader
            .load_tool(&ToolConfig::new("power_tool", "SquareTool"))
            .unwrap();
        assert_eq!(tool.name(), "square");
    }

    #[test]
    fn function_tools_are_returned_unmodified() {
        let loader = ToolLoader::new(catalog());
        let tool = loader
            .load_tool(&ToolConfig::new("power_tool", "echo").with_args(args(json!({"x": 1}))))
            .unwrap();
        assert_eq!(tool.kind(), "function");
    }

    #[test]
    fn resolution_failures_are_descriptive() {
        let loader = ToolLoader::new(catalog());

        let err = loader
            .load_tool(&ToolConfig::new("missing", "PowerTool"))
            .unwrap_err();
        assert!(matches!(err, LoaderError::ModuleNotFound { module } if module == "missing"));

        let err = loader
            .load_tool(&ToolConfig::new("power_tool", "CubeTool"))
            .unwrap_err();
        assert!(matches!(err, LoaderError::SymbolNotFound { symbol, .. } if symbol == "CubeTool"));

        let err = loader
            .load_tool(&ToolConfig::new("power_tool", "PowerTool"))
            .unwrap_err();
        assert!(matches!(err, LoaderError::Construction { .. }));
        assert!(err.to_string().contains("PowerTool"));
    }

    #[test]
    fn environment_requires_module_and_name() {
        let loader = ToolLoader::new(catalog());
        let err = loader
            .load_from_env_source(&env(&[(TOOL_MODULE_VAR, "power_tool")]))
            .unwrap_err();
        assert!(matches!(err, LoaderError::Configuration { .. }));
    }

    #[test]
    fn environment_reads_args_from_spec_file() {
        let mut spec = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            spec,
            "tool:\n  name: Power\n  entrypoint: power_tool.rs\n  tool_args:\n    - name: exponent\n      value: 2"
        )
        .unwrap();
        let spec_path = spec.path().to_str().unwrap().to_owned();

        let loader = ToolLoader::new(catalog());
        let tool = loader
            .load_from_env_source(&env(&[
                (TOOL_MODULE_VAR, "power_tool"),
                (TOOL_NAME_VAR, "PowerTool"),
                (TOOLSPEC_PATH_VAR, spec_path.as_str()),
            ]))
            .unwrap();
        assert_eq!(tool.name(), "power");
    }

    #[test]
    fn malformed_spec_only_warns_in_environment_path() {
        let mut spec = tempfile::NamedTempFile::new().unwrap();
        writeln!(spec, "tool: [not, a, mapping]").unwrap();
        let spec_path = spec.path().to_str().unwrap().to_owned();

        let loader = ToolLoader::new(catalog());
        let tool = loader
            .load_from_env_source(&env(&[
                (TOOL_MODULE_VAR, "power_tool"),
                (TOOL_NAME_VAR, "echo"),
                (TOOLSPEC_PATH_VAR, spec_path.as_str()),
            ]))
            .unwrap();
        assert_eq!(tool.name(), "echo");
    }

    #[test]
    fn environment_keeps_args_from_spec_without_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("toolspec.yaml");
        std::fs::write(&path, "tool:\n  tool_args:\n    - name: exponent\n      value: 2\n")
            .unwrap();
        let spec_path = path.to_str().unwrap().to_owned();

        // PowerTool has no default exponent, so loading fails without the args.
        let tool = ToolLoader::new(catalog())
            .load_from_env_source(&env(&[
                (TOOL_MODULE_VAR, "power_tool"),
                (TOOL_NAME_VAR, "PowerTool"),
                (TOOLSPEC_PATH_VAR, spec_path.as_str()),
            ]))
            .unwrap();
        assert_eq!(tool.name(), "power");
    }

    #[test]
    fn spec_file_drives_loading() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("toolspec.yaml");
        std::fs::write(
            &path,
            "tool:\n  name: Power\n  module: power_tool\n  tool_args:\n    - name: exponent\n      value: 4\n",
        )
        .unwrap();

        let tool = ToolLoader::new(catalog()).load_from_spec(&path).unwrap();
        assert_eq!(tool.name(), "power");

        let err = ToolLoader::new(catalog())
            .load_from_spec(dir.path().join("absent.yaml"))
            .unwrap_err();
        assert!(matches!(err, LoaderError::Configuration { .. }));
    }
}

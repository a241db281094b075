//! The declarative `toolspec.yaml` file.

use std::path::Path;

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::config::ToolConfig;
use crate::error::{LoaderError, LoaderResult};

/// Parsed spec file.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ToolSpec {
    /// The `tool` section.
    pub tool: ToolSection,
}

/// The `tool` section of a spec file.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ToolSection {
    /// Tool name; the entry symbol is this name followed by `Tool`.
    pub name: String,
    /// Human-readable description.
    #[serde(default)]
    pub description: Option<String>,
    /// Version, written either as a string or a bare number.
    #[serde(default, deserialize_with = "scalar_string")]
    pub version: Option<String>,
    /// Explicit module identifier.
    #[serde(default)]
    pub module: Option<String>,
    /// Entry file; without its `.rs` extension it names the module when
    /// `module` is absent.
    #[serde(default)]
    pub entrypoint: Option<String>,
    /// Ordered construction arguments.
    #[serde(default)]
    pub tool_args: Option<Vec<ToolArg>>,
}

/// Only the `tool_args` of a spec file. The rest of the section may be
/// incomplete without losing the arguments.
#[derive(Deserialize)]
struct ArgsOnly {
    tool: ArgsSection,
}

#[derive(Deserialize)]
struct ArgsSection {
    #[serde(default)]
    tool_args: Option<Vec<ToolArg>>,
}

/// One `{name, value}` construction argument.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ToolArg {
    /// Argument name.
    #[serde(default)]
    pub name: Option<String>,
    /// Argument value. An explicit `null` counts as present.
    #[serde(default, deserialize_with = "present")]
    pub value: Option<Value>,
}

impl ToolSpec {
    /// Parses spec text.
    ///
    /// # Errors
    ///
    /// Returns the YAML error if the text is not a valid spec.
    pub fn parse(text: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }

    /// Reads and parses a spec file.
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError::Configuration`] if the file does not exist,
    /// [`LoaderError::SpecRead`] if it cannot be read, and
    /// [`LoaderError::SpecFormat`] if it is not a valid spec.
    pub fn from_path(path: &Path) -> LoaderResult<Self> {
        let text = read_spec(path)?;
        Self::parse(&text).map_err(|source| LoaderError::SpecFormat {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Returns the module identifier named by the tool spec.
    #[must_use]
    pub fn module_name(&self) -> Option<String> {
        if let Some(module) = &self.tool.module {
            return Some(module.clone());
        }
        let entrypoint = self.tool.entrypoint.as_deref()?;
        let module = entrypoint.strip_suffix(".rs").unwrap_or(entrypoint);
        Some(module.to_owned())
    }

    /// Returns the entry symbol, `<name>Tool`.
    #[must_use]
    pub fn symbol(&self) -> String {
        format!("{}Tool", self.tool.name)
    }

    /// Collapses `tool_args` into a map. Later duplicates win; entries
    /// missing a name or a value are skipped.
    #[must_use]
    pub fn args(&self) -> Option<Map<String, Value>> {
        self.tool.tool_args.as_deref().map(collapse_args)
    }

    /// Builds the loader configuration described by the tool spec.
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError::Configuration`] if neither `module` nor
    /// `entrypoint` is set.
    pub fn to_config(&self) -> LoaderResult<ToolConfig> {
        let module = self.module_name().filter(|module| !module.is_empty()).ok_or_else(|| {
            LoaderError::configuration("tool spec names neither `module` nor `entrypoint`")
        })?;
        let config = ToolConfig::new(module, self.symbol());
        Ok(config.with_args(self.args().unwrap_or_default()))
    }
}

/// Reads only `tool.tool_args` from a spec file, collapsed as in
/// [`ToolSpec::args`]. Other keys of the `tool` section are not required.
///
/// # Errors
///
/// Returns the same errors as [`ToolSpec::from_path`], except that a missing
/// `name` is not one.
pub fn read_tool_args(path: &Path) -> LoaderResult<Option<Map<String, Value>>> {
    let text = read_spec(path)?;
    let spec: ArgsOnly = serde_yaml::from_str(&text).map_err(|source| LoaderError::SpecFormat {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(spec.tool.tool_args.as_deref().map(collapse_args))
}

fn read_spec(path: &Path) -> LoaderResult<String> {
    if !path.exists() {
        return Err(LoaderError::configuration(format!(
            "tool spec not found: {}",
            path.display()
        )));
    }
    std::fs::read_to_string(path).map_err(|source| LoaderError::SpecRead {
        path: path.to_path_buf(),
        source,
    })
}

fn collapse_args(tool_args: &[ToolArg]) -> Map<String, Value> {
    tool_args
        .iter()
        .filter_map(|arg| Some((arg.name.clone()?, arg.value.clone()?)))
        .collect()
}

fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

fn scalar_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(text)) => Some(text),
        Some(other) => Some(other.to_string()),
    })
}

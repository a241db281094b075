//! Environment lookups behind a seam so tests never touch process state.

/// Variable naming the tool module.
pub const TOOL_MODULE_VAR: &str = "TOOLHOST_TOOL_MODULE";
/// Variable naming the entry symbol inside the module.
pub const TOOL_NAME_VAR: &str = "TOOLHOST_TOOL_NAME";
/// Variable overriding the spec file path.
pub const TOOLSPEC_PATH_VAR: &str = "TOOLHOST_TOOLSPEC_PATH";
/// Spec file read when [`TOOLSPEC_PATH_VAR`] is unset.
pub const DEFAULT_TOOLSPEC_PATH: &str = "toolspec.yaml";

/// Source of configuration variables.
pub trait EnvSource {
    /// Returns the value of `key`, if set and valid UTF-8.
    fn var(&self, key: &str) -> Option<String>;
}

/// Reads the real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl<F> EnvSource for F
where
    F: Fn(&str) -> Option<String>,
{
    fn var(&self, key: &str) -> Option<String> {
        self(key)
    }
}

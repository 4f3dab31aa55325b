//! Parse-wide configuration for a [`crate::FlagSet`].

use crate::env::{EnvKeyFn, default_env_key};
use crate::handling::ErrorHandling;

/// Behaviour switches shared by every pass of one parse.
///
/// [`crate::FlagSet`] exposes a chaining setter for each field; the struct
/// itself suits callers that build settings up front.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Program name shown in usage and version output.
    pub name: String,
    /// Version string; enables the built-in `--version` flag when set.
    pub version: Option<String>,
    /// Paragraph shown under the usage line.
    pub description: Option<String>,
    /// Prefix for derived environment keys; derivation is off when unset.
    pub env_prefix: Option<String>,
    /// Builds an environment key from the prefix and a flag name.
    pub env_key: EnvKeyFn,
    /// Skips the environment pass entirely.
    pub env_disabled: bool,
    /// Skips environment values that fail to parse instead of failing.
    pub ignore_invalid_env: bool,
    /// Minimum number of positional arguments.
    pub min_positionals: usize,
    /// Lists flags alphabetically in help instead of registration order.
    pub sort_flags: bool,
    /// Omits the built-in `-h/--help` flag.
    pub disable_help: bool,
    /// What `parse` does with an error.
    pub error_handling: ErrorHandling,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            name: String::new(),
            version: None,
            description: None,
            env_prefix: None,
            env_key: default_env_key,
            env_disabled: false,
            ignore_invalid_env: false,
            min_positionals: 0,
            sort_flags: false,
            disable_help: false,
            error_handling: ErrorHandling::default(),
        }
    }
}

impl Settings {
    /// Settings for the program `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// The prefix, ignoring an empty string.
    #[must_use]
    pub fn prefix(&self) -> Option<&str> {
        self.env_prefix.as_deref().filter(|prefix| !prefix.is_empty())
    }
}

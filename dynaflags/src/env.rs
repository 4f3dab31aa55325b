//! Environment fallback for flags argv left untouched.
//!
//! Only static flags read the environment; dynamic instances exist only
//! once named on the command line. The lookup function is injected so tests
//! never depend on the process environment.

use tracing::{debug, trace};

use crate::error::FlagError;
use crate::flag::{BaseFlag, EnvBinding};
use crate::registry::FlagRegistry;
use crate::settings::Settings;

/// Resolves an environment key to its value.
pub type EnvLookup = dyn Fn(&str) -> Option<String>;

/// Builds an environment key from a prefix and a flag's long name.
pub type EnvKeyFn = fn(&str, &str) -> String;

/// `PREFIX_NAME`, upper-cased, with `-` and `.` mapped to `_`.
///
/// Trailing underscores on the prefix are dropped so `APP` and `APP_`
/// derive the same key.
///
/// # Examples
///
/// ```
/// use dynaflags::default_env_key;
///
/// assert_eq!(default_env_key("app_", "log-level"), "APP_LOG_LEVEL");
/// assert_eq!(default_env_key("app", "db.url"), "APP_DB_URL");
/// ```
#[must_use]
pub fn default_env_key(prefix: &str, name: &str) -> String {
    let joined = format!("{}_{name}", prefix.trim_end_matches('_'));
    joined
        .chars()
        .map(|c| match c {
            '-' | '.' => '_',
            other => other.to_ascii_uppercase(),
        })
        .collect()
}

/// Reads the real process environment.
///
/// Values that are not valid Unicode are treated as unset.
#[must_use]
pub fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// One environment pass over a registry.
pub(crate) struct EnvContext<'a> {
    settings: &'a Settings,
    lookup: &'a EnvLookup,
}

impl<'a> EnvContext<'a> {
    pub(crate) fn new(settings: &'a Settings, lookup: &'a EnvLookup) -> Self {
        Self { settings, lookup }
    }

    /// The key `flag` reads, if any.
    pub(crate) fn key_for(&self, flag: &BaseFlag) -> Option<String> {
        if self.settings.env_disabled {
            return None;
        }
        match flag.options().env() {
            EnvBinding::Disabled => None,
            EnvBinding::Key(key) => Some(key.clone()),
            EnvBinding::Derived => self
                .settings
                .prefix()
                .map(|prefix| (self.settings.env_key)(prefix, flag.name())),
        }
    }

    /// Assigns environment values to every unchanged flag.
    pub(crate) fn apply(&self, registry: &mut FlagRegistry) -> Result<(), FlagError> {
        if self.settings.env_disabled {
            return Ok(());
        }
        for flag in registry.iter_mut() {
            if flag.changed() {
                continue;
            }
            let Some(key) = self.key_for(flag) else {
                continue;
            };
            let Some(raw) = (self.lookup)(&key).filter(|raw| !raw.is_empty()) else {
                continue;
            };
            self.assign(flag, key, raw)?;
        }
        Ok(())
    }

    fn assign(&self, flag: &mut BaseFlag, key: String, raw: String) -> Result<(), FlagError> {
        match flag.set(&raw) {
            Ok(()) => {
                trace!(flag = flag.name(), key = %key, "flag set from environment");
                Ok(())
            }
            Err(source) if self.settings.ignore_invalid_env => {
                debug!(
                    flag = flag.name(),
                    key = %key,
                    error = %source,
                    "ignoring invalid environment value"
                );
                Ok(())
            }
            Err(source) => Err(FlagError::InvalidEnv {
                key,
                flag: flag.name().to_owned(),
                raw,
                source,
            }),
        }
    }
}

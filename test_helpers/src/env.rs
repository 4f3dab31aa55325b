//! Guards for mutating the process environment in tests.
//!
//! Every mutation takes a global re-entrant mutex and returns a guard that
//! restores the previous value, or removes the variable, when dropped.
//! [`EnvScope`] keeps the lock for its whole lifetime so a test can read
//! the environment without another test rewriting it underneath.
//!
//! # Examples
//!
//! ```
//! use test_helpers::env;
//!
//! let _scope = env::EnvScope::with_vars(&[("DEMO_PORT", Some("8080")), ("DEMO_HOST", None)]);
//! assert_eq!(std::env::var("DEMO_PORT").as_deref(), Ok("8080"));
//! assert!(std::env::var("DEMO_HOST").is_err());
//! ```

use std::env;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::sync::LazyLock;

use parking_lot::{ReentrantMutex, ReentrantMutexGuard};

static ENV_MUTEX: LazyLock<ReentrantMutex<()>> = LazyLock::new(ReentrantMutex::default);

/// Wrapper around `std::env::set_var`.
///
/// # Safety
///
/// Callers must hold `ENV_MUTEX`.
unsafe fn env_set_var(key: &str, value: &OsStr) {
    unsafe { env::set_var(key, value) };
}

/// Wrapper around `std::env::remove_var`.
///
/// # Safety
///
/// Callers must hold `ENV_MUTEX`.
unsafe fn env_remove_var(key: &str) {
    unsafe { env::remove_var(key) };
}

/// Restores one variable to its prior state on drop.
#[must_use = "dropping restores the prior value"]
pub struct EnvVarGuard {
    key: String,
    original: Option<OsString>,
}

impl fmt::Debug for EnvVarGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvVarGuard")
            .field("key", &self.key)
            .field("had_original", &self.original.is_some())
            .finish_non_exhaustive()
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        let _lock = ENV_MUTEX.lock();
        match self.original.take() {
            // SAFETY: the environment mutex is held.
            Some(value) => unsafe { env_set_var(&self.key, &value) },
            // SAFETY: the environment mutex is held.
            None => unsafe { env_remove_var(&self.key) },
        }
    }
}

fn mutate(key: &str, value: Option<&str>) -> EnvVarGuard {
    let _lock = ENV_MUTEX.lock();
    let original = env::var_os(key);
    match value {
        // SAFETY: the environment mutex is held.
        Some(text) => unsafe { env_set_var(key, OsStr::new(text)) },
        // SAFETY: the environment mutex is held.
        None => unsafe { env_remove_var(key) },
    }
    EnvVarGuard {
        key: key.to_owned(),
        original,
    }
}

/// Sets `key` to `value` until the guard drops.
pub fn set_var(key: &str, value: &str) -> EnvVarGuard {
    mutate(key, Some(value))
}

/// Removes `key` until the guard drops.
pub fn remove_var(key: &str) -> EnvVarGuard {
    mutate(key, None)
}

/// Holds the environment lock while a set of guards is alive.
#[must_use = "dropping releases the environment lock and restores guards"]
pub struct EnvScope {
    guards: Vec<EnvVarGuard>,
    _lock: ReentrantMutexGuard<'static, ()>,
}

impl fmt::Debug for EnvScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvScope")
            .field("guards", &self.guards)
            .finish_non_exhaustive()
    }
}

impl EnvScope {
    /// Sets (`Some`) or removes (`None`) each variable under one lock.
    pub fn with_vars(vars: &[(&str, Option<&str>)]) -> Self {
        let lock = ENV_MUTEX.lock();
        let guards = vars.iter().map(|(key, value)| mutate(key, *value)).collect();
        Self {
            guards,
            _lock: lock,
        }
    }
}

impl Drop for EnvScope {
    fn drop(&mut self) {
        // Restore while the lock is still held; fields drop after this body.
        self.guards.clear();
    }
}

//! Test helpers shared across the dynaflags workspace.
//!
//! [`FakeEnv`] is a deterministic environment lookup for `FlagSet`
//! tests; [`env`] guards mutations of the real process environment for the
//! few tests that need it.

pub mod env;
mod fake_env;

pub use fake_env::FakeEnv;

/// Owned argument vector from string literals.
///
/// # Examples
///
/// ```
/// assert_eq!(test_helpers::argv(&["--port", "80"]), ["--port", "80"]);
/// ```
#[must_use]
pub fn argv(args: &[&str]) -> Vec<String> {
    args.iter().map(|arg| (*arg).to_owned()).collect()
}

//! Deterministic environment lookups.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

/// An in-memory environment that records every key it is asked for.
///
/// Clones share the recorded keys, so a test can hand [`FakeEnv::lookup`]
/// to a `FlagSet` and inspect [`FakeEnv::queried`] afterwards.
///
/// # Examples
///
/// ```
/// use test_helpers::FakeEnv;
///
/// let env = FakeEnv::new().with("APP_PORT", "8080");
/// let lookup = env.lookup();
/// assert_eq!(lookup("APP_PORT").as_deref(), Some("8080"));
/// assert_eq!(lookup("APP_HOST"), None);
/// assert_eq!(env.queried(), ["APP_PORT", "APP_HOST"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct FakeEnv {
    vars: BTreeMap<String, String>,
    queried: Rc<RefCell<Vec<String>>>,
}

impl FakeEnv {
    /// An empty environment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `key=value`.
    #[must_use]
    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.vars.insert(key.to_owned(), value.to_owned());
        self
    }

    /// A lookup closure over a snapshot of the variables.
    #[must_use]
    pub fn lookup(&self) -> impl Fn(&str) -> Option<String> + 'static {
        let vars = self.vars.clone();
        let queried = Rc::clone(&self.queried);
        move |key: &str| {
            queried.borrow_mut().push(key.to_owned());
            vars.get(key).cloned()
        }
    }

    /// Keys looked up so far, in order.
    #[must_use]
    pub fn queried(&self) -> Vec<String> {
        self.queried.borrow().clone()
    }
}

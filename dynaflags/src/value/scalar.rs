//! Single-valued flags of any codec type, booleans included.

use std::any::Any;
use std::cell::OnceCell;

use super::{Hooked, Shorthand, Value, ValueHooks};
use crate::codec::{self, Codec};
use crate::error::ValueError;

/// Holds one `T`; later assignments overwrite earlier ones.
pub struct ScalarValue<T> {
    codec: Codec<T>,
    default: T,
    current: Option<T>,
    hooks: ValueHooks<T>,
    finalized_default: OnceCell<T>,
    shorthand: Shorthand,
}

impl<T: Clone + 'static> ScalarValue<T> {
    /// Creates a value-taking scalar with `default`.
    #[must_use]
    pub fn new(codec: Codec<T>, default: T) -> Self {
        Self {
            codec,
            default,
            current: None,
            hooks: ValueHooks::default(),
            finalized_default: OnceCell::new(),
            shorthand: Shorthand::TakesValue,
        }
    }

    /// The effective value: the last assignment, else the (possibly
    /// finalised) default.
    #[must_use]
    pub fn value(&self) -> &T {
        if let Some(current) = &self.current {
            return current;
        }
        self.effective_default()
    }

    fn effective_default(&self) -> &T {
        if self.hooks.finalizes_default() {
            return self
                .finalized_default
                .get_or_init(|| self.hooks.finalize(self.default.clone()));
        }
        &self.default
    }
}

impl ScalarValue<bool> {
    /// Non-strict boolean: a bare occurrence sets `true`.
    #[must_use]
    pub fn boolean(default: bool) -> Self {
        let mut value = Self::new(codec::boolean(), default);
        value.shorthand = Shorthand::SetsTrue;
        value
    }

    /// Switches to strict parsing; the flag then always needs a value.
    pub fn make_strict(&mut self) {
        self.codec = codec::strict_boolean();
        self.shorthand = Shorthand::TakesValue;
    }
}

impl<T: Clone + 'static> Value for ScalarValue<T> {
    fn set(&mut self, raw: &str) -> Result<(), ValueError> {
        let parsed = self.codec.parse(raw).map_err(ValueError::Parse)?;
        let admitted = self.hooks.admit(parsed)?;
        self.current = Some(admitted);
        Ok(())
    }

    fn get(&self) -> &dyn Any {
        self.value()
    }

    fn changed(&self) -> bool {
        self.current.is_some()
    }

    fn default_text(&self) -> String {
        self.codec.format(self.effective_default())
    }

    fn shorthand(&self) -> Shorthand {
        self.shorthand
    }

    fn allowed(&self) -> &[String] {
        self.hooks.allowed()
    }

    fn type_name(&self) -> &'static str {
        self.codec.type_name()
    }
}

impl<T: 'static> Hooked for ScalarValue<T> {
    type Item = T;

    fn hooks_mut(&mut self) -> &mut ValueHooks<T> {
        &mut self.hooks
    }

    fn codec(&self) -> Codec<T> {
        self.codec
    }
}

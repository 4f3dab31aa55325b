//! Per-instance value containers.

use std::any::Any;
use std::cell::OnceCell;
use std::collections::BTreeMap;

use crate::codec::{self, Codec};
use crate::error::ValueError;
use crate::value::{Hooked, Shorthand, ValueHooks, admit_elements, format_items};

/// Contract for a dynamic field's storage, keyed by instance ID.
pub trait DynamicValue: Any {
    /// Parses `raw` and stores it for instance `id`, creating the slot.
    ///
    /// # Errors
    ///
    /// Returns a [`ValueError`] when `raw` is rejected; nothing is stored.
    fn set(&mut self, id: &str, raw: &str) -> Result<(), ValueError>;

    /// Whether instance `id` has been assigned.
    fn is_set(&self, id: &str) -> bool;

    /// Instance IDs with stored values, in sorted order.
    fn ids(&self) -> Vec<&str>;

    /// The value for `id`, falling back to the field default.
    fn get(&self, id: &str) -> &dyn Any;

    /// The declared default, formatted; finalised first when default
    /// finalisation is enabled.
    fn default_text(&self) -> String;

    /// Meaning of a bare occurrence.
    fn shorthand(&self) -> Shorthand {
        Shorthand::TakesValue
    }

    /// Allowed values, formatted.
    fn allowed(&self) -> &[String] {
        &[]
    }

    /// Short type label for help output.
    fn type_name(&self) -> &'static str;
}

/// One `T` per instance.
pub struct DynamicScalarValue<T> {
    codec: Codec<T>,
    default: T,
    values: BTreeMap<String, T>,
    hooks: ValueHooks<T>,
    finalized_default: OnceCell<T>,
    shorthand: Shorthand,
}

impl<T: Clone + 'static> DynamicScalarValue<T> {
    /// Creates a value-taking field with `default`.
    #[must_use]
    pub fn new(codec: Codec<T>, default: T) -> Self {
        Self {
            codec,
            default,
            values: BTreeMap::new(),
            hooks: ValueHooks::default(),
            finalized_default: OnceCell::new(),
            shorthand: Shorthand::TakesValue,
        }
    }

    /// The value for `id`, or the (possibly finalised) default.
    #[must_use]
    pub fn value(&self, id: &str) -> &T {
        if let Some(stored) = self.values.get(id) {
            return stored;
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

impl DynamicScalarValue<bool> {
    /// Non-strict boolean field; a bare occurrence sets `true`.
    #[must_use]
    pub fn boolean(default: bool) -> Self {
        let mut value = Self::new(codec::boolean(), default);
        value.shorthand = Shorthand::SetsTrue;
        value
    }

    /// Switches to strict parsing.
    pub fn make_strict(&mut self) {
        self.codec = codec::strict_boolean();
        self.shorthand = Shorthand::TakesValue;
    }
}

impl<T: Clone + 'static> DynamicValue for DynamicScalarValue<T> {
    fn set(&mut self, id: &str, raw: &str) -> Result<(), ValueError> {
        let parsed = self.codec.parse(raw).map_err(ValueError::Parse)?;
        let admitted = self.hooks.admit(parsed)?;
        self.values.insert(id.to_owned(), admitted);
        Ok(())
    }

    fn is_set(&self, id: &str) -> bool {
        self.values.contains_key(id)
    }

    fn ids(&self) -> Vec<&str> {
        self.values.keys().map(String::as_str).collect()
    }

    fn get(&self, id: &str) -> &dyn Any {
        self.value(id)
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

impl<T: 'static> Hooked for DynamicScalarValue<T> {
    type Item = T;

    fn hooks_mut(&mut self) -> &mut ValueHooks<T> {
        &mut self.hooks
    }

    fn codec(&self) -> Codec<T> {
        self.codec
    }
}

/// A `Vec<T>` per instance; the first assignment replaces the defaults.
pub struct DynamicSliceValue<T> {
    codec: Codec<T>,
    defaults: Vec<T>,
    values: BTreeMap<String, Vec<T>>,
    delimiter: Option<char>,
    hooks: ValueHooks<T>,
    finalized_defaults: OnceCell<Vec<T>>,
}

impl<T: Clone + 'static> DynamicSliceValue<T> {
    /// Creates a comma-split field with `defaults`.
    #[must_use]
    pub fn new(codec: Codec<T>, defaults: Vec<T>) -> Self {
        Self {
            codec,
            defaults,
            values: BTreeMap::new(),
            delimiter: Some(crate::value::DEFAULT_DELIMITER),
            hooks: ValueHooks::default(),
            finalized_defaults: OnceCell::new(),
        }
    }

    /// Splits on `delimiter` instead; `None` keeps occurrences whole.
    pub const fn set_delimiter(&mut self, delimiter: Option<char>) {
        self.delimiter = delimiter;
    }

    /// Items for `id`, or the (possibly finalised) defaults.
    #[must_use]
    pub fn items(&self, id: &str) -> &Vec<T> {
        if let Some(stored) = self.values.get(id) {
            return stored;
        }
        self.effective_defaults()
    }

    fn effective_defaults(&self) -> &Vec<T> {
        if self.hooks.finalizes_default() {
            return self.finalized_defaults.get_or_init(|| {
                self.defaults
                    .iter()
                    .cloned()
                    .map(|item| self.hooks.finalize(item))
                    .collect()
            });
        }
        &self.defaults
    }
}

impl<T: Clone + 'static> DynamicValue for DynamicSliceValue<T> {
    fn set(&mut self, id: &str, raw: &str) -> Result<(), ValueError> {
        let admitted = admit_elements(self.codec, &self.hooks, self.delimiter, raw)?;
        self.values
            .entry(id.to_owned())
            .or_default()
            .extend(admitted);
        Ok(())
    }

    fn is_set(&self, id: &str) -> bool {
        self.values.contains_key(id)
    }

    fn ids(&self) -> Vec<&str> {
        self.values.keys().map(String::as_str).collect()
    }

    fn get(&self, id: &str) -> &dyn Any {
        self.items(id)
    }

    fn default_text(&self) -> String {
        format_items(self.codec, self.effective_defaults())
    }

    fn allowed(&self) -> &[String] {
        self.hooks.allowed()
    }

    fn type_name(&self) -> &'static str {
        self.codec.type_name()
    }
}

impl<T: 'static> Hooked for DynamicSliceValue<T> {
    type Item = T;

    fn hooks_mut(&mut self) -> &mut ValueHooks<T> {
        &mut self.hooks
    }

    fn codec(&self) -> Codec<T> {
        self.codec
    }
}

//! Repeatable flags collecting a `Vec<T>`.

use std::any::Any;
use std::cell::OnceCell;

use super::{Hooked, Value, ValueHooks};
use crate::codec::Codec;
use crate::error::ValueError;

/// Default element separator.
pub const DEFAULT_DELIMITER: char = ',';

/// Collects items from every occurrence, splitting each on a delimiter.
///
/// The first successful assignment replaces the defaults; later ones
/// append. A call either commits all of its elements or none.
pub struct SliceValue<T> {
    codec: Codec<T>,
    defaults: Vec<T>,
    items: Vec<T>,
    changed: bool,
    delimiter: Option<char>,
    hooks: ValueHooks<T>,
    finalized_defaults: OnceCell<Vec<T>>,
}

impl<T: Clone + 'static> SliceValue<T> {
    /// Creates a slice split on commas.
    #[must_use]
    pub fn new(codec: Codec<T>, defaults: Vec<T>) -> Self {
        Self {
            codec,
            defaults,
            items: Vec::new(),
            changed: false,
            delimiter: Some(DEFAULT_DELIMITER),
            hooks: ValueHooks::default(),
            finalized_defaults: OnceCell::new(),
        }
    }

    /// Splits on `delimiter` instead; `None` keeps each occurrence whole.
    pub const fn set_delimiter(&mut self, delimiter: Option<char>) {
        self.delimiter = delimiter;
    }

    /// The collected items, or the defaults when never assigned.
    #[must_use]
    pub fn items(&self) -> &Vec<T> {
        if self.changed {
            return &self.items;
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

impl<T: Clone + 'static> Value for SliceValue<T> {
    fn set(&mut self, raw: &str) -> Result<(), ValueError> {
        let admitted = admit_elements(self.codec, &self.hooks, self.delimiter, raw)?;
        if !self.changed {
            self.items.clear();
            self.changed = true;
        }
        self.items.extend(admitted);
        Ok(())
    }

    fn get(&self) -> &dyn Any {
        self.items()
    }

    fn changed(&self) -> bool {
        self.changed
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

impl<T: 'static> Hooked for SliceValue<T> {
    type Item = T;

    fn hooks_mut(&mut self) -> &mut ValueHooks<T> {
        &mut self.hooks
    }

    fn codec(&self) -> Codec<T> {
        self.codec
    }
}

/// Renders items as `[a,b,c]`.
pub(crate) fn format_items<T>(codec: Codec<T>, items: &[T]) -> String {
    let joined = items
        .iter()
        .map(|item| codec.format(item))
        .collect::<Vec<_>>()
        .join(",");
    format!("[{joined}]")
}

/// Splits `raw` and runs every element through the codec and hooks.
///
/// Returns all elements or the first failure, tagged with its element.
pub(crate) fn admit_elements<T>(
    codec: Codec<T>,
    hooks: &ValueHooks<T>,
    delimiter: Option<char>,
    raw: &str,
) -> Result<Vec<T>, ValueError> {
    let elements: Vec<&str> = match delimiter {
        Some(separator) => raw.split(separator).collect(),
        None => vec![raw],
    };
    elements
        .into_iter()
        .map(|element| {
            codec
                .parse(element)
                .map_err(ValueError::Parse)
                .and_then(|parsed| hooks.admit(parsed))
                .map_err(|source| ValueError::Element {
                    element: element.to_owned(),
                    source: Box::new(source),
                })
        })
        .collect()
}

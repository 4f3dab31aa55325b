//! Typed value containers behind every flag.
//!
//! The parser only ever talks to the [`Value`] trait object. Concrete
//! containers ([`ScalarValue`], [`SliceValue`], [`CounterValue`]) keep the
//! typed state and share the allowed-values, validation and finalisation
//! pipeline in [`ValueHooks`].

mod counter;
mod hooks;
mod scalar;
mod slice;

use std::any::Any;

use crate::error::ValueError;

pub use counter::CounterValue;
pub use hooks::{Hooked, ValueHooks};
pub use scalar::ScalarValue;
pub use slice::{DEFAULT_DELIMITER, SliceValue};
pub(crate) use slice::{admit_elements, format_items};

/// What a bare occurrence of a flag (no `=value`) means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shorthand {
    /// The flag needs a value from `=value` or the next token.
    TakesValue,
    /// A bare occurrence stores `true`.
    SetsTrue,
    /// A bare occurrence increments a counter.
    Increments,
}

impl Shorthand {
    /// Raw text handed to [`Value::set`] for a bare occurrence, if any.
    #[must_use]
    pub const fn bare_value(self) -> Option<&'static str> {
        match self {
            Self::TakesValue => None,
            Self::SetsTrue => Some("true"),
            Self::Increments => Some(""),
        }
    }

    /// Returns `true` when the flag consumes a value token.
    #[must_use]
    pub const fn takes_value(self) -> bool {
        matches!(self, Self::TakesValue)
    }
}

/// Contract shared by every static flag value.
///
/// `changed` starts `false` and flips to `true` on the first successful
/// [`Value::set`]; it never reverts.
pub trait Value: Any {
    /// Parses, validates, finalises and stores `raw`.
    ///
    /// # Errors
    ///
    /// Returns a [`ValueError`] when `raw` cannot be parsed or is rejected;
    /// the stored value is left untouched in that case.
    fn set(&mut self, raw: &str) -> Result<(), ValueError>;

    /// The current value as `&dyn Any`; downcast to the container's item type.
    fn get(&self) -> &dyn Any;

    /// Whether a `set` has succeeded.
    fn changed(&self) -> bool;

    /// The declared default, formatted. Finalised first when default
    /// finalisation is enabled.
    fn default_text(&self) -> String;

    /// Meaning of a bare occurrence.
    fn shorthand(&self) -> Shorthand {
        Shorthand::TakesValue
    }

    /// Allowed values, formatted, for help output.
    fn allowed(&self) -> &[String] {
        &[]
    }

    /// Short type label for help output.
    fn type_name(&self) -> &'static str;
}

//! Allowed-value, validator and finaliser pipeline shared by typed values.

use std::fmt;

use crate::codec::Codec;
use crate::error::ValueError;

type Check<T> = Box<dyn Fn(&T) -> bool>;
type Validator<T> = Box<dyn Fn(&T) -> Result<(), String>>;
type Finalizer<T> = Box<dyn Fn(T) -> T>;

/// Post-parse hooks applied to every stored item.
///
/// Order is fixed: allowed-set membership, then the validator, then the
/// finaliser. A rejected item is never stored.
pub struct ValueHooks<T> {
    allowed: Vec<String>,
    allowed_check: Option<Check<T>>,
    validator: Option<Validator<T>>,
    finalizer: Option<Finalizer<T>>,
    finalize_default: bool,
}

impl<T> Default for ValueHooks<T> {
    fn default() -> Self {
        Self {
            allowed: Vec::new(),
            allowed_check: None,
            validator: None,
            finalizer: None,
            finalize_default: false,
        }
    }
}

impl<T> fmt::Debug for ValueHooks<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueHooks")
            .field("allowed", &self.allowed)
            .field("validator", &self.validator.is_some())
            .field("finalizer", &self.finalizer.is_some())
            .field("finalize_default", &self.finalize_default)
            .finish()
    }
}

impl<T: 'static> ValueHooks<T> {
    /// Restricts items to `values`.
    pub fn set_allowed(&mut self, values: Vec<T>, codec: Codec<T>)
    where
        T: PartialEq,
    {
        self.allowed = values.iter().map(|v| codec.format(v)).collect();
        self.allowed_check = Some(Box::new(move |candidate| values.contains(candidate)));
    }

    /// Installs a validator; replaces any earlier one.
    pub fn set_validator<F>(&mut self, validator: F)
    where
        F: Fn(&T) -> Result<(), String> + 'static,
    {
        self.validator = Some(Box::new(validator));
    }

    /// Installs a finaliser; replaces any earlier one.
    pub fn set_finalizer<F>(&mut self, finalizer: F)
    where
        F: Fn(T) -> T + 'static,
    {
        self.finalizer = Some(Box::new(finalizer));
    }

    /// Finalise the default on first read when never explicitly set.
    pub const fn enable_default_finalization(&mut self) {
        self.finalize_default = true;
    }
}

impl<T> ValueHooks<T> {
    /// Runs the full pipeline on a freshly parsed item.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::NotAllowed`] or [`ValueError::Rejected`].
    pub fn admit(&self, item: T) -> Result<T, ValueError> {
        if let Some(check) = &self.allowed_check
            && !check(&item)
        {
            return Err(ValueError::NotAllowed {
                allowed: self.allowed.clone(),
            });
        }
        if let Some(validate) = &self.validator {
            validate(&item).map_err(ValueError::Rejected)?;
        }
        Ok(self.finalize(item))
    }

    /// Applies the finaliser alone.
    pub fn finalize(&self, item: T) -> T {
        if let Some(finalize) = &self.finalizer {
            return finalize(item);
        }
        item
    }

    /// Whether an untouched default should be finalised on read.
    #[must_use]
    pub const fn finalizes_default(&self) -> bool {
        self.finalize_default && self.finalizer.is_some()
    }

    /// Formatted allowed values.
    #[must_use]
    pub fn allowed(&self) -> &[String] {
        &self.allowed
    }
}

/// Containers whose items flow through [`ValueHooks`].
///
/// Builders use this to offer `validate`, `finalize` and `allowed` once for
/// every container kind.
pub trait Hooked {
    /// Item type produced by the codec.
    type Item: 'static;

    /// Mutable access to the hook pipeline.
    fn hooks_mut(&mut self) -> &mut ValueHooks<Self::Item>;

    /// The item codec.
    fn codec(&self) -> Codec<Self::Item>;
}

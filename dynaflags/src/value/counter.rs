//! Verbosity-style counters.

use std::any::Any;

use super::{Shorthand, Value};
use crate::codec;
use crate::error::ValueError;

/// Counts bare occurrences; `=n` sets an absolute, non-negative value.
#[derive(Debug, Clone, Default)]
pub struct CounterValue {
    default: i64,
    count: i64,
    max: Option<i64>,
    changed: bool,
}

impl CounterValue {
    /// Creates a counter starting at `default`.
    #[must_use]
    pub const fn new(default: i64) -> Self {
        Self {
            default,
            count: default,
            max: None,
            changed: false,
        }
    }

    /// Rejects counts above `max`.
    pub const fn set_max(&mut self, max: i64) {
        self.max = Some(max);
    }

    /// Current count.
    #[must_use]
    pub const fn count(&self) -> i64 {
        self.count
    }

    fn check_ceiling(&self, value: i64) -> Result<i64, ValueError> {
        match self.max {
            Some(max) if value > max => Err(ValueError::AboveMaximum { value, max }),
            _ => Ok(value),
        }
    }
}

impl Value for CounterValue {
    fn set(&mut self, raw: &str) -> Result<(), ValueError> {
        let next = if raw.is_empty() {
            self.count
                .checked_add(1)
                .ok_or_else(|| ValueError::Rejected("counter overflow".to_owned()))?
        } else {
            let absolute = codec::int().parse(raw).map_err(ValueError::Parse)?;
            if absolute < 0 {
                return Err(ValueError::Rejected(format!(
                    "count must not be negative, got {absolute}"
                )));
            }
            absolute
        };
        self.count = self.check_ceiling(next)?;
        self.changed = true;
        Ok(())
    }

    fn get(&self) -> &dyn Any {
        &self.count
    }

    fn changed(&self) -> bool {
        self.changed
    }

    fn default_text(&self) -> String {
        self.default.to_string()
    }

    fn shorthand(&self) -> Shorthand {
        Shorthand::Increments
    }

    fn type_name(&self) -> &'static str {
        "count"
    }
}

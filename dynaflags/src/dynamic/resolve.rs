//! Splitting `group.id.field` names and routing them to storage.

use std::fmt;

use indexmap::IndexMap;

use super::group::{DynamicField, DynamicGroup};
use crate::error::FlagError;

/// A long name split into its three dynamic segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DynamicName<'a> {
    /// Group prefix.
    pub group: &'a str,
    /// Instance ID.
    pub id: &'a str,
    /// Field name.
    pub field: &'a str,
}

impl<'a> DynamicName<'a> {
    /// Splits `name` when it has exactly two dots and no empty segment.
    ///
    /// # Examples
    ///
    /// ```
    /// use dynaflags::DynamicName;
    ///
    /// let name = DynamicName::split("http.alpha.port");
    /// assert_eq!(name.map(|n| n.id), Some("alpha"));
    /// assert!(DynamicName::split("http..port").is_none());
    /// assert!(DynamicName::split("http.alpha").is_none());
    /// ```
    #[must_use]
    pub fn split(name: &'a str) -> Option<Self> {
        let mut parts = name.split('.');
        let (Some(group), Some(id), Some(field), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return None;
        };
        if group.is_empty() || id.is_empty() || field.is_empty() {
            return None;
        }
        Some(Self { group, id, field })
    }
}

impl fmt::Display for DynamicName<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.group, self.id, self.field)
    }
}

/// Dynamic groups keyed by prefix, in registration order.
#[derive(Debug, Default)]
pub(crate) struct DynamicRegistry {
    groups: IndexMap<String, DynamicGroup>,
}

impl DynamicRegistry {
    /// Adds `group`.
    ///
    /// # Panics
    ///
    /// Panics when a group with the same prefix exists.
    pub(crate) fn register(&mut self, group: DynamicGroup) {
        assert!(
            !self.groups.contains_key(group.name()),
            "dynamic group redefined: {}",
            group.name()
        );
        self.groups.insert(group.name().to_owned(), group);
    }

    pub(crate) fn get(&self, name: &str) -> Option<&DynamicGroup> {
        self.groups.get(name)
    }

    pub(crate) fn contains(&self, name: &str) -> bool {
        self.groups.contains_key(name)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &DynamicGroup> {
        self.groups.values()
    }

    /// Whether `name` starts with a declared group prefix.
    ///
    /// Used to report malformed dynamic names instead of unknown flags.
    pub(crate) fn claims(&self, name: &str) -> bool {
        name.split_once('.')
            .is_some_and(|(prefix, _)| self.groups.contains_key(prefix))
    }

    /// Resolves the field template `name` addresses.
    pub(crate) fn field_mut(
        &mut self,
        name: &DynamicName<'_>,
    ) -> Result<&mut DynamicField, FlagError> {
        let group = self
            .groups
            .get_mut(name.group)
            .ok_or_else(|| FlagError::UnknownDynamicGroup {
                group: name.group.to_owned(),
            })?;
        group
            .lookup_mut(name.field)
            .ok_or_else(|| FlagError::UnknownDynamicField {
                group: name.group.to_owned(),
                field: name.field.to_owned(),
            })
    }
}

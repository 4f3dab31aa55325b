//! Post-parse constraint checks.
//!
//! Checks run in a fixed order and the first failure wins: required static
//! flags, required dynamic fields, one-of groups, all-or-none groups,
//! `requires` edges, then the positional minimum. "Set" means changed by
//! argv or the environment.

use tracing::debug;

use crate::dynamic::DynamicRegistry;
use crate::error::FlagError;
use crate::groups::{AllOrNoneGroup, GroupRegistry, OneOfGroup};
use crate::registry::FlagRegistry;

/// Read-only view over everything the checks need.
pub(crate) struct Validator<'a> {
    pub(crate) registry: &'a FlagRegistry,
    pub(crate) dynamic: &'a DynamicRegistry,
    pub(crate) groups: &'a GroupRegistry,
    pub(crate) positionals: usize,
    pub(crate) min_positionals: usize,
}

impl Validator<'_> {
    pub(crate) fn run(&self) -> Result<(), FlagError> {
        self.required_static()?;
        self.required_dynamic()?;
        for group in self.groups.one_of() {
            self.one_of(group)?;
        }
        for group in self.groups.all_or_none() {
            self.all_or_none(group)?;
        }
        self.dependencies()?;
        self.positional_minimum()
    }

    fn is_set(&self, name: &str) -> bool {
        self.registry.get(name).is_some_and(|flag| flag.changed())
    }

    fn required_static(&self) -> Result<(), FlagError> {
        let missing = self
            .registry
            .iter()
            .find(|flag| flag.options().is_required() && !flag.changed());
        if let Some(flag) = missing {
            return Err(FlagError::MissingRequired {
                flag: flag.name().to_owned(),
            });
        }
        Ok(())
    }

    fn required_dynamic(&self) -> Result<(), FlagError> {
        for group in self.dynamic.iter() {
            for id in group.instances() {
                let missing = group
                    .fields()
                    .find(|field| field.is_required() && !field.value().is_set(&id));
                if let Some(field) = missing {
                    return Err(FlagError::MissingRequiredDynamic {
                        group: group.name().to_owned(),
                        id,
                        field: field.name().to_owned(),
                    });
                }
            }
        }
        Ok(())
    }

    fn bundle_complete(&self, bundle: &AllOrNoneGroup) -> bool {
        !bundle.members().is_empty() && bundle.members().iter().all(|name| self.is_set(name))
    }

    fn one_of(&self, group: &OneOfGroup) -> Result<(), FlagError> {
        let mut selected: Vec<String> = group
            .members()
            .iter()
            .filter(|name| self.is_set(name))
            .cloned()
            .collect();
        selected.extend(
            group
                .bundles()
                .iter()
                .filter(|name| {
                    self.groups
                        .get_all_or_none(name)
                        .is_some_and(|bundle| self.bundle_complete(bundle))
                })
                .cloned(),
        );
        debug!(group = group.name(), selected = ?selected, "checking one-of group");
        if selected.len() > 1 {
            return Err(FlagError::OneOfConflict {
                group: group.name().to_owned(),
                selected,
            });
        }
        if selected.is_empty() && group.is_required() {
            let options = group
                .members()
                .iter()
                .chain(group.bundles())
                .cloned()
                .collect();
            return Err(FlagError::OneOfMissing {
                group: group.name().to_owned(),
                options,
            });
        }
        Ok(())
    }

    fn all_or_none(&self, group: &AllOrNoneGroup) -> Result<(), FlagError> {
        let (set, missing): (Vec<String>, Vec<String>) = group
            .members()
            .iter()
            .cloned()
            .partition(|name| self.is_set(name));
        if !set.is_empty() && !missing.is_empty() {
            return Err(FlagError::AllOrNoneIncomplete {
                group: group.name().to_owned(),
                set,
                missing,
            });
        }
        if set.is_empty() && group.is_required() && !missing.is_empty() {
            return Err(FlagError::AllOrNoneMissing {
                group: group.name().to_owned(),
                members: missing,
            });
        }
        Ok(())
    }

    fn dependencies(&self) -> Result<(), FlagError> {
        for flag in self.registry.iter().filter(|flag| flag.changed()) {
            if let Some(target) = flag
                .options()
                .requires()
                .iter()
                .find(|target| !self.is_set(target))
            {
                return Err(FlagError::MissingDependency {
                    flag: flag.name().to_owned(),
                    requires: target.clone(),
                });
            }
        }
        Ok(())
    }

    fn positional_minimum(&self) -> Result<(), FlagError> {
        if self.positionals < self.min_positionals {
            return Err(FlagError::TooFewPositionals {
                required: self.min_positionals,
                got: self.positionals,
            });
        }
        Ok(())
    }
}

/// Declaration contracts that can only be checked once everything is
/// registered.
///
/// # Panics
///
/// Panics on `requires` targets, group members or bundles that name
/// nothing, and on static flags whose prefix collides with a dynamic group.
pub(crate) fn check_declarations(
    registry: &FlagRegistry,
    dynamic: &DynamicRegistry,
    groups: &GroupRegistry,
) {
    for flag in registry.iter() {
        for target in flag.options().requires() {
            assert!(
                registry.contains(target),
                "flag \"{}\" requires unknown flag \"{target}\"",
                flag.name()
            );
        }
        assert!(
            !dynamic.claims(flag.name()),
            "flag \"{}\" collides with a dynamic group prefix",
            flag.name()
        );
    }
    for group in groups.one_of() {
        for member in group.members() {
            assert!(
                registry.contains(member),
                "one-of group \"{}\" names unknown flag \"{member}\"",
                group.name()
            );
        }
        for bundle in group.bundles() {
            assert!(
                groups.get_all_or_none(bundle).is_some(),
                "one-of group \"{}\" bundles unknown group \"{bundle}\"",
                group.name()
            );
        }
    }
    for group in groups.all_or_none() {
        for member in group.members() {
            assert!(
                registry.contains(member),
                "all-or-none group \"{}\" names unknown flag \"{member}\"",
                group.name()
            );
        }
    }
}

//! Ordered storage for static flags.

use indexmap::IndexMap;

use crate::flag::BaseFlag;

/// Static flags keyed by long name, in registration order.
#[derive(Debug, Default)]
pub(crate) struct FlagRegistry {
    flags: IndexMap<String, BaseFlag>,
}

impl FlagRegistry {
    /// Adds `flag`.
    ///
    /// # Panics
    ///
    /// Panics when the long name or the short alias is already taken.
    pub(crate) fn register(&mut self, flag: BaseFlag) {
        assert!(
            !self.flags.contains_key(flag.name()),
            "flag redefined: {}",
            flag.name()
        );
        if let Some(short) = flag.options().short()
            && let Some(existing) = self.find_short(short)
        {
            panic!(
                "shorthand -{short} for flag \"{}\" is already used by \"{}\"",
                flag.name(),
                existing.name()
            );
        }
        self.flags.insert(flag.name().to_owned(), flag);
    }

    pub(crate) fn contains(&self, name: &str) -> bool {
        self.flags.contains_key(name)
    }

    pub(crate) fn get(&self, name: &str) -> Option<&BaseFlag> {
        self.flags.get(name)
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut BaseFlag> {
        self.flags.get_mut(name)
    }

    pub(crate) fn find_short(&self, short: char) -> Option<&BaseFlag> {
        self.flags
            .values()
            .find(|flag| flag.options().short() == Some(short))
    }

    pub(crate) fn find_short_mut(&mut self, short: char) -> Option<&mut BaseFlag> {
        self.flags
            .values_mut()
            .find(|flag| flag.options().short() == Some(short))
    }

    pub(crate) fn short_taken(&self, short: char) -> bool {
        self.find_short(short).is_some()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &BaseFlag> {
        self.flags.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut BaseFlag> {
        self.flags.values_mut()
    }

    /// Flags ordered by long name.
    pub(crate) fn sorted(&self) -> Vec<&BaseFlag> {
        let mut flags: Vec<&BaseFlag> = self.flags.values().collect();
        flags.sort_by(|left, right| left.name().cmp(right.name()));
        flags
    }
}

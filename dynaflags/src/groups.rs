//! Cross-flag constraint groups.

use indexmap::IndexMap;

/// At most one member may be set; exactly one when required.
///
/// Besides plain flags, a one-of group can hold all-or-none groups as
/// bundles. A bundle counts as one selection when it has members and all
/// of them are set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OneOfGroup {
    name: String,
    title: Option<String>,
    members: Vec<String>,
    bundles: Vec<String>,
    required: bool,
}

impl OneOfGroup {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            title: None,
            members: Vec::new(),
            bundles: Vec::new(),
            required: false,
        }
    }

    /// Requires exactly one selection.
    pub const fn required(&mut self) -> &mut Self {
        self.required = true;
        self
    }

    /// Heading used in help output.
    pub fn title(&mut self, title: impl Into<String>) -> &mut Self {
        self.title = Some(title.into());
        self
    }

    /// Adds the static flag `flag` as a member.
    pub fn member(&mut self, flag: impl Into<String>) -> &mut Self {
        push_unique(&mut self.members, flag.into());
        self
    }

    /// Adds the all-or-none group `group` as a single slot.
    pub fn bundle(&mut self, group: impl Into<String>) -> &mut Self {
        push_unique(&mut self.bundles, group.into());
        self
    }

    /// Group name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Help heading, if any.
    #[must_use]
    pub fn heading(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Member flag names in insertion order.
    #[must_use]
    pub fn members(&self) -> &[String] {
        &self.members
    }

    /// Bundled all-or-none group names.
    #[must_use]
    pub fn bundles(&self) -> &[String] {
        &self.bundles
    }

    /// Whether a selection is mandatory.
    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.required
    }
}

/// Members are set together or not at all; at least once when required.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllOrNoneGroup {
    name: String,
    title: Option<String>,
    members: Vec<String>,
    required: bool,
}

impl AllOrNoneGroup {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            title: None,
            members: Vec::new(),
            required: false,
        }
    }

    /// Rejects the case where no member is set.
    pub const fn required(&mut self) -> &mut Self {
        self.required = true;
        self
    }

    /// Heading used in help output.
    pub fn title(&mut self, title: impl Into<String>) -> &mut Self {
        self.title = Some(title.into());
        self
    }

    /// Adds the static flag `flag` as a member.
    pub fn member(&mut self, flag: impl Into<String>) -> &mut Self {
        push_unique(&mut self.members, flag.into());
        self
    }

    /// Group name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Help heading, if any.
    #[must_use]
    pub fn heading(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Member flag names in insertion order.
    #[must_use]
    pub fn members(&self) -> &[String] {
        &self.members
    }

    /// Whether at least one complete set is mandatory.
    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.required
    }
}

fn push_unique(names: &mut Vec<String>, name: String) {
    if !names.contains(&name) {
        names.push(name);
    }
}

/// Both group kinds, keyed by name, created on first mention.
#[derive(Debug, Default)]
pub(crate) struct GroupRegistry {
    one_of: IndexMap<String, OneOfGroup>,
    all_or_none: IndexMap<String, AllOrNoneGroup>,
}

impl GroupRegistry {
    pub(crate) fn one_of_mut(&mut self, name: &str) -> &mut OneOfGroup {
        self.one_of
            .entry(name.to_owned())
            .or_insert_with(|| OneOfGroup::new(name))
    }

    pub(crate) fn all_or_none_mut(&mut self, name: &str) -> &mut AllOrNoneGroup {
        self.all_or_none
            .entry(name.to_owned())
            .or_insert_with(|| AllOrNoneGroup::new(name))
    }

    pub(crate) fn one_of(&self) -> impl Iterator<Item = &OneOfGroup> {
        self.one_of.values()
    }

    pub(crate) fn all_or_none(&self) -> impl Iterator<Item = &AllOrNoneGroup> {
        self.all_or_none.values()
    }

    pub(crate) fn get_all_or_none(&self, name: &str) -> Option<&AllOrNoneGroup> {
        self.all_or_none.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_are_created_once_and_deduplicate_members() {
        let mut groups = GroupRegistry::default();
        groups.one_of_mut("output").member("json").member("yaml");
        groups.one_of_mut("output").member("json").required();
        let output: Vec<&OneOfGroup> = groups.one_of().collect();
        assert_eq!(output.len(), 1);
        assert_eq!(output.first().map(|group| group.members().len()), Some(2));
        assert!(output.first().is_some_and(|group| group.is_required()));
    }

    #[test]
    fn bundles_reference_all_or_none_groups_by_name() {
        let mut groups = GroupRegistry::default();
        groups.all_or_none_mut("creds").member("user").member("pass");
        groups.one_of_mut("auth").member("token").bundle("creds");
        let auth = groups.one_of().next().map(|group| group.bundles().to_vec());
        assert_eq!(auth, Some(vec!["creds".to_owned()]));
        assert!(groups.get_all_or_none("creds").is_some());
    }
}

//! Serialisable description of a declared flag set.
//!
//! [`crate::FlagSet::describe`] produces these structures; the plain-text
//! help renderer reads nothing else, so external tooling sees exactly what
//! users see.

use serde::Serialize;

/// Version of the documentation IR layout.
pub const IR_VERSION: &str = "1.0";

/// Top-level description of a flag set.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FlagSetDoc {
    /// Layout version, [`IR_VERSION`].
    pub ir_version: String,
    /// Program name.
    pub name: String,
    /// Program version, when configured.
    pub version: Option<String>,
    /// Program description.
    pub description: Option<String>,
    /// Minimum positional arguments.
    pub min_positionals: usize,
    /// Visible static flags, in help order.
    pub flags: Vec<FlagDoc>,
    /// Visible dynamic groups, in registration order.
    pub dynamic_groups: Vec<DynamicGroupDoc>,
    /// One-of constraints.
    pub one_of_groups: Vec<GroupDoc>,
    /// All-or-none constraints.
    pub all_or_none_groups: Vec<GroupDoc>,
}

/// A static flag.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FlagDoc {
    /// Long name without dashes.
    pub name: String,
    /// Short alias.
    pub short: Option<char>,
    /// Help text.
    pub usage: String,
    /// Codec type label.
    pub type_name: String,
    /// Whether the flag consumes a value.
    pub takes_value: bool,
    /// Value name shown after the flag; `None` for switch-like flags.
    pub value_name: Option<String>,
    /// Formatted default, when shown.
    pub default: Option<String>,
    /// Environment variable consulted, if any.
    pub env: Option<String>,
    /// Allowed values.
    pub allowed: Vec<String>,
    /// Whether the flag must be set.
    pub required: bool,
    /// Deprecation notice.
    pub deprecated: Option<String>,
    /// Flags this one depends on.
    pub requires: Vec<String>,
}

/// A dynamic group and its field templates.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DynamicGroupDoc {
    /// Group prefix.
    pub name: String,
    /// Help heading.
    pub title: Option<String>,
    /// Help paragraph.
    pub description: Option<String>,
    /// Field templates in declaration order.
    pub fields: Vec<DynamicFieldDoc>,
}

/// One field template of a dynamic group.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DynamicFieldDoc {
    /// Field name.
    pub name: String,
    /// Flag pattern, such as `--http.<id>.port`.
    pub pattern: String,
    /// Help text.
    pub usage: String,
    /// Codec type label.
    pub type_name: String,
    /// Whether the field consumes a value.
    pub takes_value: bool,
    /// Value name shown after the pattern.
    pub value_name: Option<String>,
    /// Formatted default, when shown.
    pub default: Option<String>,
    /// Allowed values.
    pub allowed: Vec<String>,
    /// Whether every instance must set the field.
    pub required: bool,
}

/// A one-of or all-or-none constraint.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct GroupDoc {
    /// Group name.
    pub name: String,
    /// Help heading.
    pub title: Option<String>,
    /// Member flag names.
    pub members: Vec<String>,
    /// Bundled all-or-none groups; empty for all-or-none groups.
    pub bundles: Vec<String>,
    /// Whether the group must be satisfied by at least one selection.
    pub required: bool,
}

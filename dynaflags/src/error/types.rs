//! Primary error enums for the parse pipeline.

use thiserror::Error;

/// Failure raised by a single value while handling one raw input.
///
/// Values know nothing about flag names; the parser wraps these in a
/// [`FlagError`] carrying the flag and the offending text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ValueError {
    /// The codec could not parse the raw text.
    #[error("{0}")]
    Parse(String),

    /// A user-supplied validator rejected the parsed value.
    #[error("{0}")]
    Rejected(String),

    /// The parsed value is not in the declared allowed set.
    #[error("must be one of [{}]", .allowed.join(", "))]
    NotAllowed {
        /// Formatted allowed values, in declaration order.
        allowed: Vec<String>,
    },

    /// A counter was pushed past its configured ceiling.
    #[error("value {value} exceeds maximum of {max}")]
    AboveMaximum {
        /// Value that would have been stored.
        value: i64,
        /// Configured ceiling.
        max: i64,
    },

    /// One element of a delimited list failed.
    #[error("element \"{element}\": {source}")]
    Element {
        /// Raw element text after splitting.
        element: String,
        /// Failure reported for that element.
        #[source]
        source: Box<ValueError>,
    },
}

/// Errors surfaced by [`crate::FlagSet::parse`].
///
/// The help and version variants are control sentinels rather than failures;
/// use [`FlagError::is_display_request`] to tell them apart.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum FlagError {
    /// A `--name` token did not match any registered flag.
    #[error("unknown flag: {flag}")]
    UnknownFlag {
        /// Flag as written, including dashes.
        flag: String,
    },

    /// A character in a short-flag token did not match any alias.
    #[error("unknown shorthand flag: -{short}")]
    UnknownShorthand {
        /// Unmatched alias character.
        short: char,
    },

    /// A value-taking flag reached the end of input or another flag.
    #[error("missing value for flag: {flag}")]
    MissingValue {
        /// Flag as written, including dashes.
        flag: String,
    },

    /// A dotted name claims a dynamic group but is not `group.id.field`.
    #[error("malformed dynamic flag: --{name} (expected --<group>.<id>.<field>)")]
    MalformedDynamic {
        /// Flag name without the leading dashes.
        name: String,
    },

    /// The group segment of a dynamic flag is not declared.
    #[error("unknown dynamic group: {group}")]
    UnknownDynamicGroup {
        /// Group segment as written.
        group: String,
    },

    /// The field segment of a dynamic flag is not declared in its group.
    #[error("unknown dynamic field: {group}.{field}")]
    UnknownDynamicField {
        /// Declared group name.
        group: String,
        /// Field segment as written.
        field: String,
    },

    /// A value supplied on the command line was rejected.
    #[error("invalid value \"{raw}\" for flag {flag}: {source}")]
    InvalidValue {
        /// Flag as written, including dashes.
        flag: String,
        /// Raw text that failed.
        raw: String,
        /// Underlying value failure.
        #[source]
        source: ValueError,
    },

    /// A bare counter occurrence pushed the count past its ceiling.
    #[error("too many occurrences of flag {flag}: {source}")]
    CounterLimit {
        /// Flag as written, including dashes.
        flag: String,
        /// Underlying value failure.
        #[source]
        source: ValueError,
    },

    /// A value read from the environment was rejected.
    #[error("invalid value \"{raw}\" for flag --{flag} from environment variable {key}: {source}")]
    InvalidEnv {
        /// Environment variable consulted.
        key: String,
        /// Long name of the flag being resolved.
        flag: String,
        /// Raw environment text.
        raw: String,
        /// Underlying value failure.
        #[source]
        source: ValueError,
    },

    /// A required static flag was never set.
    #[error("missing required flag: --{flag}")]
    MissingRequired {
        /// Long name of the flag.
        flag: String,
    },

    /// A required dynamic field is missing for a discovered instance.
    #[error("missing required flag: --{group}.{id}.{field}")]
    MissingRequiredDynamic {
        /// Dynamic group name.
        group: String,
        /// Instance lacking the field.
        id: String,
        /// Required field name.
        field: String,
    },

    /// More than one member of a one-of group was selected.
    #[error("only one of [{}] may be set (group \"{group}\")", .selected.join(", "))]
    OneOfConflict {
        /// Group name.
        group: String,
        /// Labels of every selected member.
        selected: Vec<String>,
    },

    /// A required one-of group had no selection.
    #[error("exactly one of [{}] must be set (group \"{group}\")", .options.join(", "))]
    OneOfMissing {
        /// Group name.
        group: String,
        /// Labels of every selectable member.
        options: Vec<String>,
    },

    /// Only part of an all-or-none group was set.
    #[error("flags [{}] must be set together; missing [{}] (group \"{group}\")", .set.join(", "), .missing.join(", "))]
    AllOrNoneIncomplete {
        /// Group name.
        group: String,
        /// Members that were set.
        set: Vec<String>,
        /// Members that were not set.
        missing: Vec<String>,
    },

    /// A required all-or-none group had no members set.
    #[error("flags [{}] are required together (group \"{group}\")", .members.join(", "))]
    AllOrNoneMissing {
        /// Group name.
        group: String,
        /// Every member of the group.
        members: Vec<String>,
    },

    /// A set flag depends on a flag that was not set.
    #[error("flag --{flag} requires --{requires}")]
    MissingDependency {
        /// Flag that was set.
        flag: String,
        /// Flag it depends on.
        requires: String,
    },

    /// Fewer positional arguments than the configured minimum.
    #[error("expected at least {required} positional argument(s), got {got}")]
    TooFewPositionals {
        /// Configured minimum.
        required: usize,
        /// Number collected.
        got: usize,
    },

    /// `--help` was given; carries the rendered help text.
    #[error("help requested")]
    HelpRequested(String),

    /// `--version` was given; carries the rendered version text.
    #[error("version requested")]
    VersionRequested(String),
}

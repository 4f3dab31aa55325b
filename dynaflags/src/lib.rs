//! Command-line flag parsing with templated per-instance flags.
//!
//! A [`FlagSet`] holds static [`Flag`]s, identified by long name and an
//! optional one-character alias, and [`DynamicGroup`]s whose fields are
//! addressed as `--group.instance.field`. Parsing runs three passes in a
//! fixed order:
//!
//! 1. the tokenizer assigns argv tokens to flags and positionals;
//! 2. the environment pass fills unchanged static flags from variables such
//!    as `APP_PORT`;
//! 3. the validator enforces required flags, one-of and all-or-none groups,
//!    `requires` edges and the positional minimum.
//!
//! ```
//! use dynaflags::{Flag, FlagError, FlagSet};
//!
//! let mut set = FlagSet::new("app");
//! set.env_prefix("APP")
//!     .env_lookup(|key| (key == "APP_TOKEN").then(|| "s3cret".to_owned()))
//!     .add(Flag::string("token", "").required())
//!     .add(Flag::bool("json", false).one_of("format"))
//!     .add(Flag::bool("yaml", false).one_of("format"));
//!
//! let err = set.parse(["--json", "--yaml"]).err();
//! assert!(matches!(err, Some(FlagError::OneOfConflict { .. })));
//! assert_eq!(set.get::<String>("token").map(String::as_str), Some("s3cret"));
//! ```

pub mod codec;
mod docs;
mod dynamic;
mod env;
mod error;
mod flag;
mod flag_set;
mod groups;
mod handling;
mod parser;
mod registry;
mod settings;
mod validate;
pub mod value;

pub use codec::Codec;
pub use docs::{
    DynamicFieldDoc, DynamicGroupDoc, FlagDoc, FlagSetDoc, GroupDoc, IR_VERSION, render_help,
};
pub use dynamic::{
    DynamicField, DynamicFlag, DynamicGroup, DynamicName, DynamicScalarValue, DynamicSliceValue,
    DynamicValue,
};
pub use env::{EnvKeyFn, EnvLookup, default_env_key, process_env};
pub use error::{FlagError, ValueError};
pub use flag::{BaseFlag, EnvBinding, Flag, FlagOptions};
pub use flag_set::FlagSet;
pub use groups::{AllOrNoneGroup, OneOfGroup};
pub use handling::{EXIT_CODE_SUCCESS, EXIT_CODE_USAGE, ErrorHandling};
pub use parser::UnknownFlagHandler;
pub use settings::Settings;
pub use value::{Shorthand, Value};

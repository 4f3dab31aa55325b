//! Token-by-token assignment of argv to flags and positionals.

mod tokenizer;

use crate::error::FlagError;

pub(crate) use tokenizer::{Builtins, DisplayRequest, HELP_FLAG, Tokenizer, VERSION_FLAG};

/// Called with every unknown-flag error; returning `Ok` skips the token.
pub type UnknownFlagHandler = dyn FnMut(FlagError) -> Result<(), FlagError>;

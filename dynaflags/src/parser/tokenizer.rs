//! The argv state machine.

use std::iter::Peekable;
use std::vec::IntoIter;

use tracing::{debug, trace, warn};

use super::UnknownFlagHandler;
use crate::dynamic::{DynamicName, DynamicRegistry};
use crate::error::FlagError;
use crate::flag::BaseFlag;
use crate::registry::FlagRegistry;
use crate::value::Shorthand;

/// Long name of the built-in help flag.
pub(crate) const HELP_FLAG: &str = "help";
/// Long name of the built-in version flag.
pub(crate) const VERSION_FLAG: &str = "version";

/// A built-in flag asked for text instead of a parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DisplayRequest {
    Help,
    Version,
}

/// Which built-in flags this parse installed.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Builtins {
    pub(crate) help: bool,
    pub(crate) version: bool,
}

impl Builtins {
    fn request_for(self, flag: &BaseFlag) -> Option<DisplayRequest> {
        if flag.get::<bool>() != Some(&true) {
            return None;
        }
        match flag.name() {
            HELP_FLAG if self.help => Some(DisplayRequest::Help),
            VERSION_FLAG if self.version => Some(DisplayRequest::Version),
            _ => None,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub(super) enum Token<'t> {
    Terminator,
    Long {
        name: &'t str,
        value: Option<&'t str>,
    },
    Short(&'t str),
    Positional,
}

pub(super) fn classify(token: &str) -> Token<'_> {
    if token == "--" {
        return Token::Terminator;
    }
    if let Some(body) = token.strip_prefix("--") {
        return body.split_once('=').map_or(
            Token::Long {
                name: body,
                value: None,
            },
            |(name, value)| Token::Long {
                name,
                value: Some(value),
            },
        );
    }
    if let Some(body) = token.strip_prefix('-')
        && !body.is_empty()
    {
        return Token::Short(body);
    }
    Token::Positional
}

/// `-` followed by anything reads as a flag, so it is never taken as a value.
fn looks_like_flag(token: &str) -> bool {
    token.len() > 1 && token.starts_with('-')
}

pub(super) struct Cursor {
    tokens: Peekable<IntoIter<String>>,
}

impl Cursor {
    pub(super) fn new(tokens: Vec<String>) -> Self {
        Self {
            tokens: tokens.into_iter().peekable(),
        }
    }

    pub(super) fn advance(&mut self) -> Option<String> {
        self.tokens.next()
    }

    pub(super) fn take_value(&mut self) -> Option<String> {
        self.tokens.next_if(|token| !looks_like_flag(token))
    }

    fn drain(&mut self) -> impl Iterator<Item = String> + '_ {
        self.tokens.by_ref()
    }
}

/// One pass over argv, borrowing the pieces of a `FlagSet` it writes to.
pub(crate) struct Tokenizer<'a> {
    pub(crate) registry: &'a mut FlagRegistry,
    pub(crate) dynamic: &'a mut DynamicRegistry,
    pub(crate) handler: Option<&'a mut UnknownFlagHandler>,
    pub(crate) positionals: &'a mut Vec<String>,
    pub(crate) builtins: Builtins,
}

impl Tokenizer<'_> {
    /// Assigns every token, stopping at the first error.
    ///
    /// Returns early with a request when a built-in help or version flag is
    /// set; assignments made before any error are kept.
    pub(crate) fn run(mut self, args: Vec<String>) -> Result<Option<DisplayRequest>, FlagError> {
        let mut cursor = Cursor::new(args);
        while let Some(token) = cursor.advance() {
            let request = match classify(&token) {
                Token::Terminator => {
                    self.positionals.extend(cursor.drain());
                    break;
                }
                Token::Long { name, value } => self.long(name, value, &mut cursor)?,
                Token::Short(body) => self.short(body, &mut cursor)?,
                Token::Positional => {
                    self.positionals.push(token.clone());
                    None
                }
            };
            if request.is_some() {
                return Ok(request);
            }
        }
        Ok(None)
    }

    fn long(
        &mut self,
        name: &str,
        inline: Option<&str>,
        cursor: &mut Cursor,
    ) -> Result<Option<DisplayRequest>, FlagError> {
        if let Some(parsed) = DynamicName::split(name) {
            self.dynamic(&parsed, inline, cursor)?;
            return Ok(None);
        }
        if self.dynamic.claims(name) {
            return Err(FlagError::MalformedDynamic {
                name: name.to_owned(),
            });
        }
        let text = format!("--{name}");
        let Some(flag) = self.registry.get_mut(name) else {
            self.unknown_flag(FlagError::UnknownFlag { flag: text })?;
            return Ok(None);
        };
        let raw = take_raw(inline, flag.shorthand(), cursor, &text)?;
        assign(flag, &text, &raw)?;
        Ok(self.builtins.request_for(flag))
    }

    fn dynamic(
        &mut self,
        parsed: &DynamicName<'_>,
        inline: Option<&str>,
        cursor: &mut Cursor,
    ) -> Result<(), FlagError> {
        if !self.dynamic.contains(parsed.group) {
            return self.unknown_flag(FlagError::UnknownDynamicGroup {
                group: parsed.group.to_owned(),
            });
        }
        let text = format!("--{parsed}");
        let field = self.dynamic.field_mut(parsed)?;
        let raw = take_raw(inline, field.value().shorthand(), cursor, &text)?;
        if let Err(source) = field.value_mut().set(parsed.id, &raw) {
            return Err(FlagError::InvalidValue {
                flag: text,
                raw,
                source,
            });
        }
        trace!(flag = %text, instance = parsed.id, raw = %raw, "dynamic flag assigned");
        Ok(())
    }

    fn short(
        &mut self,
        body: &str,
        cursor: &mut Cursor,
    ) -> Result<Option<DisplayRequest>, FlagError> {
        for (index, alias) in body.char_indices() {
            let text = format!("-{alias}");
            let Some(flag) = self.registry.find_short_mut(alias) else {
                self.unknown_flag(FlagError::UnknownShorthand { short: alias })?;
                continue;
            };
            let rest = body.get(index + alias.len_utf8()..).unwrap_or_default();
            let (raw, ends_bundle) = match (flag.shorthand().bare_value(), rest.strip_prefix('='))
            {
                (_, Some(attached)) => (attached.to_owned(), true),
                (Some(bare), None) => (bare.to_owned(), false),
                (None, None) if !rest.is_empty() => (rest.to_owned(), true),
                (None, None) => (take_raw(None, Shorthand::TakesValue, cursor, &text)?, true),
            };
            assign(flag, &text, &raw)?;
            let request = self.builtins.request_for(flag);
            if request.is_some() {
                return Ok(request);
            }
            if ends_bundle {
                break;
            }
        }
        Ok(None)
    }

    fn unknown_flag(&mut self, err: FlagError) -> Result<(), FlagError> {
        debug!(error = %err, "unrecognised flag");
        if let Some(handler) = self.handler.as_deref_mut() {
            return handler(err);
        }
        Err(err)
    }
}

/// Value precedence: `=value`, then the bare shorthand, then the next token.
fn take_raw(
    inline: Option<&str>,
    shorthand: Shorthand,
    cursor: &mut Cursor,
    text: &str,
) -> Result<String, FlagError> {
    if let Some(value) = inline {
        return Ok(value.to_owned());
    }
    if let Some(bare) = shorthand.bare_value() {
        return Ok(bare.to_owned());
    }
    cursor.take_value().ok_or_else(|| FlagError::MissingValue {
        flag: text.to_owned(),
    })
}

fn assign(flag: &mut BaseFlag, text: &str, raw: &str) -> Result<(), FlagError> {
    let bare_count = raw.is_empty() && flag.shorthand() == Shorthand::Increments;
    flag.set(raw).map_err(|source| {
        if bare_count {
            return FlagError::CounterLimit {
                flag: text.to_owned(),
                source,
            };
        }
        FlagError::InvalidValue {
            flag: text.to_owned(),
            raw: raw.to_owned(),
            source,
        }
    })?;
    if let Some(notice) = flag.options().deprecated() {
        warn!(flag = %text, notice, "deprecated flag used");
    }
    trace!(flag = %text, raw, "flag assigned");
    Ok(())
}

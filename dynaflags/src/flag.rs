//! Static flag declarations.
//!
//! A [`Flag`] pairs the shared [`FlagOptions`] metadata with a typed value
//! container. Typed builder methods live on the `Flag<V>` instantiations
//! they apply to; [`crate::FlagSet::add`] erases the container into a
//! [`BaseFlag`] for the registry.

use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use chrono::{DateTime, Utc};
use url::Url;

use crate::codec::{self, Codec};
use crate::dynamic::DynamicName;
use crate::error::ValueError;
use crate::value::{CounterValue, Hooked, ScalarValue, Shorthand, SliceValue, Value};

/// How a flag participates in the environment fallback pass.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EnvBinding {
    /// Use the set's key function and prefix.
    #[default]
    Derived,
    /// Read exactly this variable.
    Key(String),
    /// Never read the environment.
    Disabled,
}

/// Metadata shared by every static flag regardless of value type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagOptions {
    name: String,
    short: Option<char>,
    usage: String,
    env: EnvBinding,
    required: bool,
    hidden: bool,
    deprecated: Option<String>,
    placeholder: Option<String>,
    hide_default: bool,
    requires: Vec<String>,
    one_of: Vec<String>,
    all_or_none: Vec<String>,
}

impl FlagOptions {
    /// Starts metadata for the long name `name`.
    ///
    /// # Panics
    ///
    /// Panics when `name` is empty, starts with `-`, contains `=` or
    /// whitespace, or has the `group.id.field` shape reserved for dynamic
    /// flags.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let long: String = name.into();
        assert_long_name(&long);
        Self {
            name: long,
            short: None,
            usage: String::new(),
            env: EnvBinding::Derived,
            required: false,
            hidden: false,
            deprecated: None,
            placeholder: None,
            hide_default: false,
            requires: Vec::new(),
            one_of: Vec::new(),
            all_or_none: Vec::new(),
        }
    }

    /// Long name without dashes.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// One-character alias.
    #[must_use]
    pub const fn short(&self) -> Option<char> {
        self.short
    }

    /// Help text.
    #[must_use]
    pub fn usage(&self) -> &str {
        &self.usage
    }

    /// Environment binding.
    #[must_use]
    pub const fn env(&self) -> &EnvBinding {
        &self.env
    }

    /// Whether the flag must be set by argument or environment.
    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.required
    }

    /// Whether the flag is left out of help output.
    #[must_use]
    pub const fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Deprecation notice, if deprecated.
    #[must_use]
    pub fn deprecated(&self) -> Option<&str> {
        self.deprecated.as_deref()
    }

    /// Value name shown in help instead of the type label.
    #[must_use]
    pub fn placeholder(&self) -> Option<&str> {
        self.placeholder.as_deref()
    }

    /// Whether help omits the default.
    #[must_use]
    pub const fn hides_default(&self) -> bool {
        self.hide_default
    }

    /// Flags that must also be set whenever this one is.
    #[must_use]
    pub fn requires(&self) -> &[String] {
        &self.requires
    }

    /// One-of groups this flag belongs to.
    #[must_use]
    pub fn one_of(&self) -> &[String] {
        &self.one_of
    }

    /// All-or-none groups this flag belongs to.
    #[must_use]
    pub fn all_or_none(&self) -> &[String] {
        &self.all_or_none
    }
}

fn assert_long_name(name: &str) {
    assert!(!name.is_empty(), "flag name must not be empty");
    assert!(
        !name.starts_with('-'),
        "flag name \"{name}\" must not start with '-'"
    );
    assert!(
        !name.contains('=') && !name.contains(char::is_whitespace),
        "flag name \"{name}\" must not contain '=' or whitespace"
    );
    assert!(
        DynamicName::split(name).is_none(),
        "flag name \"{name}\" is reserved for dynamic flags"
    );
}

/// A typed flag declaration, consumed by [`crate::FlagSet::add`].
///
/// # Examples
///
/// ```
/// use dynaflags::Flag;
///
/// let port = Flag::int("port", 8080)
///     .short('p')
///     .usage("Port to listen on")
///     .validate(|port| {
///         if (1..=65535).contains(port) {
///             Ok(())
///         } else {
///             Err("port out of range".to_owned())
///         }
///     });
/// assert_eq!(port.options().short(), Some('p'));
/// ```
pub struct Flag<V> {
    options: FlagOptions,
    value: V,
}

impl<V: Value> Flag<V> {
    /// Wraps an arbitrary value container.
    ///
    /// # Panics
    ///
    /// Panics when `name` is not a valid long name; see [`FlagOptions::new`].
    #[must_use]
    pub fn with_value(name: impl Into<String>, value: V) -> Self {
        Self {
            options: FlagOptions::new(name),
            value,
        }
    }

    /// Declared metadata.
    #[must_use]
    pub const fn options(&self) -> &FlagOptions {
        &self.options
    }

    /// Typed value container.
    #[must_use]
    pub const fn value(&self) -> &V {
        &self.value
    }

    /// Sets the one-character alias.
    ///
    /// # Panics
    ///
    /// Panics when `short` is `-`, `=` or whitespace.
    #[must_use]
    pub fn short(mut self, short: char) -> Self {
        assert!(
            short != '-' && short != '=' && !short.is_whitespace(),
            "invalid shorthand {short:?} for flag \"{}\"",
            self.options.name
        );
        self.options.short = Some(short);
        self
    }

    /// Sets the help text.
    #[must_use]
    pub fn usage(mut self, usage: impl Into<String>) -> Self {
        self.options.usage = usage.into();
        self
    }

    /// Reads `key` from the environment instead of the derived key.
    ///
    /// # Panics
    ///
    /// Panics when environment lookup was already disabled for this flag.
    #[must_use]
    pub fn env(mut self, key: impl Into<String>) -> Self {
        assert!(
            self.options.env != EnvBinding::Disabled,
            "flag \"{}\" cannot both set and disable an environment key",
            self.options.name
        );
        self.options.env = EnvBinding::Key(key.into());
        self
    }

    /// Never reads the environment for this flag.
    ///
    /// # Panics
    ///
    /// Panics when an explicit environment key was already set.
    #[must_use]
    pub fn disable_env(mut self) -> Self {
        assert!(
            !matches!(self.options.env, EnvBinding::Key(_)),
            "flag \"{}\" cannot both set and disable an environment key",
            self.options.name
        );
        self.options.env = EnvBinding::Disabled;
        self
    }

    /// Fails validation when neither argv nor the environment sets the flag.
    #[must_use]
    pub const fn required(mut self) -> Self {
        self.options.required = true;
        self
    }

    /// Leaves the flag out of help output.
    #[must_use]
    pub const fn hidden(mut self) -> Self {
        self.options.hidden = true;
        self
    }

    /// Marks the flag deprecated; using it logs `message` as a warning.
    #[must_use]
    pub fn deprecated(mut self, message: impl Into<String>) -> Self {
        self.options.deprecated = Some(message.into());
        self
    }

    /// Value name shown in help.
    #[must_use]
    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.options.placeholder = Some(placeholder.into());
        self
    }

    /// Omits the default from help.
    #[must_use]
    pub const fn hide_default(mut self) -> Self {
        self.options.hide_default = true;
        self
    }

    /// Whenever this flag is set, `other` must be set too.
    #[must_use]
    pub fn requires(mut self, other: impl Into<String>) -> Self {
        self.options.requires.push(other.into());
        self
    }

    /// Joins the one-of group `group`, creating it on registration.
    #[must_use]
    pub fn one_of(mut self, group: impl Into<String>) -> Self {
        self.options.one_of.push(group.into());
        self
    }

    /// Joins the all-or-none group `group`, creating it on registration.
    #[must_use]
    pub fn all_or_none(mut self, group: impl Into<String>) -> Self {
        self.options.all_or_none.push(group.into());
        self
    }

    /// Erases the value type.
    #[must_use]
    pub fn into_base(self) -> BaseFlag {
        BaseFlag {
            options: self.options,
            value: Box::new(self.value),
        }
    }
}

impl<V: Value + Hooked> Flag<V> {
    /// Rejects parsed values for which `validator` returns an error.
    #[must_use]
    pub fn validate<F>(mut self, validator: F) -> Self
    where
        F: Fn(&V::Item) -> Result<(), String> + 'static,
    {
        self.value.hooks_mut().set_validator(validator);
        self
    }

    /// Transforms values after validation, before storage.
    #[must_use]
    pub fn finalize<F>(mut self, finalizer: F) -> Self
    where
        F: Fn(V::Item) -> V::Item + 'static,
    {
        self.value.hooks_mut().set_finalizer(finalizer);
        self
    }

    /// Also finalises the default on first read when never set.
    #[must_use]
    pub fn finalize_default(mut self) -> Self {
        self.value.hooks_mut().enable_default_finalization();
        self
    }

    /// Restricts values to `allowed`.
    #[must_use]
    pub fn allowed(mut self, allowed: impl IntoIterator<Item = V::Item>) -> Self
    where
        V::Item: PartialEq,
    {
        let codec = self.value.codec();
        self.value
            .hooks_mut()
            .set_allowed(allowed.into_iter().collect(), codec);
        self
    }
}

impl<T: Clone + 'static> Flag<ScalarValue<T>> {
    /// Scalar flag of any codec type.
    ///
    /// # Panics
    ///
    /// Panics when `name` is not a valid long name.
    #[must_use]
    pub fn scalar(name: impl Into<String>, codec: Codec<T>, default: T) -> Self {
        Self::with_value(name, ScalarValue::new(codec, default))
    }
}

impl Flag<ScalarValue<String>> {
    /// String flag.
    ///
    /// # Panics
    ///
    /// Panics when `name` is not a valid long name.
    #[must_use]
    pub fn string(name: impl Into<String>, default: impl Into<String>) -> Self {
        Self::scalar(name, codec::string(), default.into())
    }
}

impl Flag<ScalarValue<i64>> {
    /// Signed integer flag.
    ///
    /// # Panics
    ///
    /// Panics when `name` is not a valid long name.
    #[must_use]
    pub fn int(name: impl Into<String>, default: i64) -> Self {
        Self::scalar(name, codec::int(), default)
    }
}

impl Flag<ScalarValue<u64>> {
    /// Unsigned integer flag.
    ///
    /// # Panics
    ///
    /// Panics when `name` is not a valid long name.
    #[must_use]
    pub fn uint(name: impl Into<String>, default: u64) -> Self {
        Self::scalar(name, codec::uint(), default)
    }
}

impl Flag<ScalarValue<f64>> {
    /// Float flag.
    ///
    /// # Panics
    ///
    /// Panics when `name` is not a valid long name.
    #[must_use]
    pub fn float(name: impl Into<String>, default: f64) -> Self {
        Self::scalar(name, codec::float(), default)
    }
}

impl Flag<ScalarValue<Duration>> {
    /// Duration flag, parsed with humantime syntax.
    ///
    /// # Panics
    ///
    /// Panics when `name` is not a valid long name.
    #[must_use]
    pub fn duration(name: impl Into<String>, default: Duration) -> Self {
        Self::scalar(name, codec::duration(), default)
    }
}

impl Flag<ScalarValue<IpAddr>> {
    /// IP address flag.
    ///
    /// # Panics
    ///
    /// Panics when `name` is not a valid long name.
    #[must_use]
    pub fn ip_addr(name: impl Into<String>, default: IpAddr) -> Self {
        Self::scalar(name, codec::ip_addr(), default)
    }
}

impl Flag<ScalarValue<SocketAddr>> {
    /// Socket address flag.
    ///
    /// # Panics
    ///
    /// Panics when `name` is not a valid long name.
    #[must_use]
    pub fn socket_addr(name: impl Into<String>, default: SocketAddr) -> Self {
        Self::scalar(name, codec::socket_addr(), default)
    }
}

impl Flag<ScalarValue<Url>> {
    /// URL flag.
    ///
    /// # Panics
    ///
    /// Panics when `name` is not a valid long name.
    #[must_use]
    pub fn url(name: impl Into<String>, default: Url) -> Self {
        Self::scalar(name, codec::url(), default)
    }
}

impl Flag<ScalarValue<DateTime<Utc>>> {
    /// RFC 3339 timestamp flag.
    ///
    /// # Panics
    ///
    /// Panics when `name` is not a valid long name.
    #[must_use]
    pub fn timestamp(name: impl Into<String>, default: DateTime<Utc>) -> Self {
        Self::scalar(name, codec::timestamp(), default)
    }
}

impl Flag<ScalarValue<bool>> {
    /// Boolean flag; a bare `--name` sets `true`.
    ///
    /// # Panics
    ///
    /// Panics when `name` is not a valid long name.
    #[must_use]
    pub fn bool(name: impl Into<String>, default: bool) -> Self {
        Self::with_value(name, ScalarValue::boolean(default))
    }

    /// Requires an explicit `true` or `false`.
    #[must_use]
    pub fn strict(mut self) -> Self {
        self.value.make_strict();
        self
    }
}

impl<T: Clone + 'static> Flag<SliceValue<T>> {
    /// Repeatable flag of any codec type.
    ///
    /// # Panics
    ///
    /// Panics when `name` is not a valid long name.
    #[must_use]
    pub fn slice(name: impl Into<String>, codec: Codec<T>, defaults: Vec<T>) -> Self {
        Self::with_value(name, SliceValue::new(codec, defaults))
    }

    /// Splits each occurrence on `delimiter`.
    #[must_use]
    pub const fn delimiter(mut self, delimiter: char) -> Self {
        self.value.set_delimiter(Some(delimiter));
        self
    }

    /// Keeps each occurrence as a single element.
    #[must_use]
    pub const fn no_delimiter(mut self) -> Self {
        self.value.set_delimiter(None);
        self
    }
}

impl Flag<SliceValue<String>> {
    /// Repeatable string flag.
    ///
    /// # Panics
    ///
    /// Panics when `name` is not a valid long name.
    #[must_use]
    pub fn strings<I, S>(name: impl Into<String>, defaults: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::slice(
            name,
            codec::string(),
            defaults.into_iter().map(Into::into).collect(),
        )
    }
}

impl Flag<CounterValue> {
    /// Counter flag; each bare occurrence adds one.
    ///
    /// # Panics
    ///
    /// Panics when `name` is not a valid long name.
    #[must_use]
    pub fn counter(name: impl Into<String>) -> Self {
        Self::with_value(name, CounterValue::new(0))
    }

    /// Rejects counts above `max`.
    #[must_use]
    pub const fn max(mut self, max: i64) -> Self {
        self.value.set_max(max);
        self
    }
}

/// A registered flag with its value type erased.
pub struct BaseFlag {
    options: FlagOptions,
    value: Box<dyn Value>,
}

impl fmt::Debug for BaseFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BaseFlag")
            .field("options", &self.options)
            .field("type_name", &self.value.type_name())
            .field("changed", &self.value.changed())
            .finish_non_exhaustive()
    }
}

impl BaseFlag {
    /// Declared metadata.
    #[must_use]
    pub const fn options(&self) -> &FlagOptions {
        &self.options
    }

    /// Long name without dashes.
    #[must_use]
    pub fn name(&self) -> &str {
        self.options.name()
    }

    /// The erased value.
    #[must_use]
    pub fn value(&self) -> &dyn Value {
        self.value.as_ref()
    }

    /// Whether argv or the environment assigned the flag.
    #[must_use]
    pub fn changed(&self) -> bool {
        self.value.changed()
    }

    /// Meaning of a bare occurrence.
    #[must_use]
    pub fn shorthand(&self) -> Shorthand {
        self.value.shorthand()
    }

    /// Typed view of the current value.
    #[must_use]
    pub fn get<T: 'static>(&self) -> Option<&T> {
        self.value.get().downcast_ref::<T>()
    }

    pub(crate) fn set(&mut self, raw: &str) -> Result<(), ValueError> {
        self.value.set(raw)
    }
}

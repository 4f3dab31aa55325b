//! Parse and format function pairs for the primitive types flags carry.
//!
//! A [`Codec`] is the only place a flag learns how to turn raw text into a
//! `T` and back. The engine never inspects `T` itself; it calls the pair
//! supplied at declaration time. The functions below cover the common
//! primitives, and [`Codec::display`] adapts any `FromStr + Display` type.

use std::fmt::{self, Display};
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use url::Url;

/// Parses raw text into a value.
pub type ParseFn<T> = fn(&str) -> Result<T, String>;

/// Formats a value back into text.
pub type FormatFn<T> = fn(&T) -> String;

/// A `(parse, format)` pair plus a short type label used in help output.
pub struct Codec<T> {
    type_name: &'static str,
    parse: ParseFn<T>,
    format: FormatFn<T>,
}

impl<T> Clone for Codec<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Codec<T> {}

impl<T> fmt::Debug for Codec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Codec")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

impl<T> Codec<T> {
    /// Builds a codec from explicit functions.
    ///
    /// # Examples
    ///
    /// ```
    /// use dynaflags::Codec;
    ///
    /// let upper = Codec::new(
    ///     "name",
    ///     |raw: &str| Ok(raw.to_ascii_uppercase()),
    ///     |value: &String| value.clone(),
    /// );
    /// assert_eq!(upper.parse("abc").as_deref(), Ok("ABC"));
    /// ```
    #[must_use]
    pub const fn new(type_name: &'static str, parse: ParseFn<T>, format: FormatFn<T>) -> Self {
        Self {
            type_name,
            parse,
            format,
        }
    }

    /// Parses `raw`.
    ///
    /// # Errors
    ///
    /// Returns the codec's message when `raw` is not a valid `T`.
    pub fn parse(&self, raw: &str) -> Result<T, String> {
        (self.parse)(raw)
    }

    /// Formats `value`.
    #[must_use]
    pub fn format(&self, value: &T) -> String {
        (self.format)(value)
    }

    /// Short label shown in help output, such as `int` or `duration`.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl<T> Codec<T>
where
    T: FromStr + Display,
    T::Err: Display,
{
    /// Codec backed by `FromStr` and `Display`.
    ///
    /// # Examples
    ///
    /// ```
    /// use dynaflags::Codec;
    ///
    /// let codec = Codec::<u16>::display("port");
    /// assert_eq!(codec.parse("8080"), Ok(8080));
    /// assert_eq!(codec.format(&8080), "8080");
    /// ```
    #[must_use]
    pub fn display(type_name: &'static str) -> Self {
        Self::new(type_name, parse_from_str::<T>, format_display::<T>)
    }
}

fn parse_from_str<T>(raw: &str) -> Result<T, String>
where
    T: FromStr,
    T::Err: Display,
{
    raw.trim().parse::<T>().map_err(|err| err.to_string())
}

fn format_display<T: Display>(value: &T) -> String {
    value.to_string()
}

/// Plain strings, stored verbatim.
#[must_use]
pub fn string() -> Codec<String> {
    Codec::new("string", |raw| Ok(raw.to_owned()), String::clone)
}

/// Signed 64-bit integers.
#[must_use]
pub fn int() -> Codec<i64> {
    Codec::display("int")
}

/// Unsigned 64-bit integers.
#[must_use]
pub fn uint() -> Codec<u64> {
    Codec::display("uint")
}

/// Any integer width, labelled `int` in help output.
#[must_use]
pub fn integer<T>() -> Codec<T>
where
    T: FromStr + Display,
    T::Err: Display,
{
    Codec::display("int")
}

/// 64-bit floats.
#[must_use]
pub fn float() -> Codec<f64> {
    Codec::display("float")
}

/// Lenient booleans: `true/false`, `t/f`, `1/0`, `yes/no`, any case.
#[must_use]
pub fn boolean() -> Codec<bool> {
    Codec::new("bool", parse_bool, format_display::<bool>)
}

/// Strict booleans: exactly `true` or `false`.
#[must_use]
pub fn strict_boolean() -> Codec<bool> {
    Codec::new("bool", parse_strict_bool, format_display::<bool>)
}

fn parse_bool(raw: &str) -> Result<bool, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "t" | "1" | "yes" | "y" => Ok(true),
        "false" | "f" | "0" | "no" | "n" => Ok(false),
        other => Err(format!("invalid boolean \"{other}\"")),
    }
}

fn parse_strict_bool(raw: &str) -> Result<bool, String> {
    match raw {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(format!("expected \"true\" or \"false\", got \"{other}\"")),
    }
}

/// Human durations such as `1h 30m` or `250ms`.
#[must_use]
pub fn duration() -> Codec<Duration> {
    Codec::new("duration", parse_duration, format_duration)
}

fn parse_duration(raw: &str) -> Result<Duration, String> {
    humantime::parse_duration(raw.trim()).map_err(|err| err.to_string())
}

fn format_duration(value: &Duration) -> String {
    humantime::format_duration(*value).to_string()
}

/// IPv4 or IPv6 addresses.
#[must_use]
pub fn ip_addr() -> Codec<IpAddr> {
    Codec::display("ip")
}

/// `host:port` socket addresses with a literal IP host.
#[must_use]
pub fn socket_addr() -> Codec<SocketAddr> {
    Codec::display("addr")
}

/// Absolute URLs.
#[must_use]
pub fn url() -> Codec<Url> {
    Codec::display("url")
}

/// RFC 3339 timestamps, normalised to UTC.
#[must_use]
pub fn timestamp() -> Codec<DateTime<Utc>> {
    Codec::new("time", parse_timestamp, format_timestamp)
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|err| err.to_string())
}

fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

//! Built-in codecs format defaults into text they parse back unchanged.

use std::fmt::Debug;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;

use anyhow::{Result, anyhow, ensure};
use chrono::{TimeZone, Utc};
use dynaflags::{Codec, codec};
use rstest::rstest;
use url::Url;

fn check_round_trip<T: PartialEq + Debug>(codec: Codec<T>, value: &T) -> Result<()> {
    let text = codec.format(value);
    let parsed = codec.parse(&text).map_err(|err| anyhow!("{text:?}: {err}"))?;
    ensure!(&parsed == value, "{text:?} parsed as {parsed:?}");
    ensure!(codec.format(&parsed) == text, "formatting {text:?} is not stable");
    Ok(())
}

#[rstest]
#[case("")]
#[case("hello world")]
#[case(" padded ")]
fn strings(#[case] value: &str) -> Result<()> {
    check_round_trip(codec::string(), &value.to_owned())
}

#[rstest]
#[case(0)]
#[case(-42)]
#[case(i64::MAX)]
fn signed_integers(#[case] value: i64) -> Result<()> {
    check_round_trip(codec::int(), &value)
}

#[test]
fn other_numeric_types() -> Result<()> {
    check_round_trip(codec::uint(), &u64::MAX)?;
    check_round_trip(codec::integer::<u16>(), &8080)?;
    check_round_trip(codec::float(), &0.1)?;
    check_round_trip(codec::float(), &-2.5e10)
}

#[rstest]
#[case(true)]
#[case(false)]
fn booleans(#[case] value: bool) -> Result<()> {
    check_round_trip(codec::boolean(), &value)?;
    check_round_trip(codec::strict_boolean(), &value)
}

#[rstest]
#[case(Duration::ZERO)]
#[case(Duration::from_millis(250))]
#[case(Duration::from_secs(5400))]
#[case(Duration::from_secs(86_400 * 3 + 1))]
fn durations(#[case] value: Duration) -> Result<()> {
    check_round_trip(codec::duration(), &value)
}

#[test]
fn addresses() -> Result<()> {
    check_round_trip(codec::ip_addr(), &IpAddr::V4(Ipv4Addr::LOCALHOST))?;
    check_round_trip(codec::ip_addr(), &IpAddr::V6(Ipv6Addr::LOCALHOST))?;
    check_round_trip(
        codec::socket_addr(),
        &SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 8080),
    )
}

#[test]
fn urls() -> Result<()> {
    let value = Url::parse("https://example.com/a?b=c")?;
    check_round_trip(codec::url(), &value)
}

#[test]
fn timestamps() -> Result<()> {
    let value = Utc
        .with_ymd_and_hms(2024, 5, 1, 10, 0, 0)
        .single()
        .ok_or_else(|| anyhow!("ambiguous timestamp"))?;
    check_round_trip(codec::timestamp(), &value)
}

#[test]
fn display_codecs_trim_surrounding_whitespace() {
    assert_eq!(codec::int().parse(" 7 "), Ok(7));
    assert!(codec::int().parse("").is_err());
}

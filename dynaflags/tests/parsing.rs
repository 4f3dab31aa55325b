//! Tokenizer behaviour observed through `FlagSet::parse`.

use std::time::Duration;

use anyhow::{Context, Result, ensure};
use dynaflags::{ErrorHandling, Flag, FlagError, FlagSet};
use rstest::{fixture, rstest};
use test_helpers::argv;

#[fixture]
fn set() -> FlagSet {
    let mut set = FlagSet::new("app");
    set.env_lookup(|_| None)
        .add(Flag::int("port", 80).short('p'))
        .add(Flag::string("name", "anon").short('n'))
        .add(Flag::float("ratio", 0.5))
        .add(Flag::uint("workers", 1))
        .add(Flag::duration("timeout", Duration::from_secs(1)))
        .add(Flag::bool("a", false).short('a'))
        .add(Flag::bool("b", false).short('b'))
        .add(Flag::bool("c", false).short('c'))
        .add(Flag::bool("strict", false).strict())
        .add(Flag::counter("verbose").short('v'));
    set
}

#[rstest]
fn long_assignment_parses_and_marks_changed(mut set: FlagSet) -> Result<()> {
    set.parse(argv(&[
        "--port=8080",
        "--name=ada",
        "--ratio=0.25",
        "--workers",
        "4",
        "--timeout=2m",
    ]))?;
    ensure!(set.get::<i64>("port") == Some(&8080));
    ensure!(set.get::<String>("name").map(String::as_str) == Some("ada"));
    ensure!(set.get::<f64>("ratio") == Some(&0.25));
    ensure!(set.get::<u64>("workers") == Some(&4));
    ensure!(set.get::<Duration>("timeout") == Some(&Duration::from_secs(120)));
    for name in ["port", "name", "ratio", "workers", "timeout"] {
        ensure!(set.changed(name), "{name} should be changed");
    }
    ensure!(!set.changed("verbose"));
    Ok(())
}

#[rstest]
fn untouched_flags_keep_defaults(mut set: FlagSet) -> Result<()> {
    set.parse(Vec::<String>::new())?;
    ensure!(set.get::<i64>("port") == Some(&80));
    ensure!(set.get::<String>("name").map(String::as_str) == Some("anon"));
    ensure!(!set.changed("port"));
    Ok(())
}

#[rstest]
fn bundled_booleans_all_become_true(mut set: FlagSet) -> Result<()> {
    set.parse(["-abc"])?;
    for name in ["a", "b", "c"] {
        ensure!(set.get::<bool>(name) == Some(&true), "{name} should be true");
    }
    ensure!(set.args().is_empty());
    Ok(())
}

#[rstest]
fn value_flag_then_positional(mut set: FlagSet) -> Result<()> {
    set.parse(["--port", "8080", "extra"])?;
    ensure!(set.get::<i64>("port") == Some(&8080));
    ensure!(set.args() == ["extra"]);
    ensure!(set.arg(0) == Some("extra"));
    ensure!(set.arg(1).is_none());
    Ok(())
}

#[rstest]
fn trailing_value_flag_reports_missing_value(mut set: FlagSet) -> Result<()> {
    let err = set.parse(["--name"]).err().context("expected an error")?;
    ensure!(err.to_string() == "missing value for flag: --name", "got {err}");
    Ok(())
}

#[rstest]
#[case(&["--port", "--name=x"], "--port")]
#[case(&["-p", "-a"], "-p")]
fn flag_like_tokens_are_not_values(
    mut set: FlagSet,
    #[case] args: &[&str],
    #[case] flag: &str,
) -> Result<()> {
    let err = set.parse(argv(args)).err();
    ensure!(
        err == Some(FlagError::MissingValue {
            flag: flag.to_owned()
        }),
        "got {err:?}"
    );
    Ok(())
}

#[rstest]
fn lone_dash_is_a_positional_and_a_value(mut set: FlagSet) -> Result<()> {
    set.parse(["-", "--name", "-"])?;
    ensure!(set.args() == ["-"]);
    ensure!(set.get::<String>("name").map(String::as_str) == Some("-"));
    Ok(())
}

#[rstest]
fn terminator_keeps_remaining_tokens_verbatim(mut set: FlagSet) -> Result<()> {
    set.parse(["-a", "--", "-b", "--port=1", "--"])?;
    ensure!(set.get::<bool>("a") == Some(&true));
    ensure!(set.get::<bool>("b") == Some(&false));
    ensure!(set.args() == ["-b", "--port=1", "--"]);
    Ok(())
}

#[rstest]
#[case(&["-vvv"], 3)]
#[case(&["-v", "--verbose", "-v"], 3)]
#[case(&["--verbose=7"], 7)]
#[case(&["-vv", "--verbose=1", "-v"], 2)]
fn counters_increment_or_take_absolute_values(
    mut set: FlagSet,
    #[case] args: &[&str],
    #[case] expected: i64,
) -> Result<()> {
    set.parse(argv(args))?;
    ensure!(set.get::<i64>("verbose") == Some(&expected));
    Ok(())
}

#[test]
fn counter_ceilings_distinguish_bare_and_explicit_occurrences() -> Result<()> {
    let mut set = FlagSet::new("app");
    set.env_lookup(|_| None)
        .add(Flag::counter("verbose").short('v').max(2));
    let bare = set.parse(["-vvv"]).err().context("expected an error")?;
    ensure!(
        bare.to_string() == "too many occurrences of flag -v: value 3 exceeds maximum of 2",
        "got {bare}"
    );
    ensure!(set.get::<i64>("verbose") == Some(&2));
    let explicit = set.parse(["--verbose=5"]).err();
    ensure!(
        matches!(&explicit, Some(FlagError::InvalidValue { flag, raw, .. }) if flag == "--verbose" && raw == "5"),
        "got {explicit:?}"
    );
    Ok(())
}

#[rstest]
fn strict_booleans_need_explicit_values(mut set: FlagSet) -> Result<()> {
    set.parse(["--strict", "true"])?;
    ensure!(set.get::<bool>("strict") == Some(&true));
    Ok(())
}

#[rstest]
fn strict_booleans_reject_lenient_spellings(mut set: FlagSet) -> Result<()> {
    let err = set.parse(["--strict=yes"]).err();
    ensure!(
        matches!(err, Some(FlagError::InvalidValue { ref flag, ref raw, .. }) if flag == "--strict" && raw == "yes"),
        "got {err:?}"
    );
    Ok(())
}

#[rstest]
#[case("--a=false", false)]
#[case("--a=YES", true)]
#[case("--a=0", false)]
fn lenient_booleans_accept_inline_values(
    mut set: FlagSet,
    #[case] arg: &str,
    #[case] expected: bool,
) -> Result<()> {
    set.parse([arg])?;
    ensure!(set.get::<bool>("a") == Some(&expected));
    ensure!(set.changed("a"));
    Ok(())
}

#[rstest]
fn unknown_flags_abort_but_keep_earlier_assignments(mut set: FlagSet) -> Result<()> {
    let err = set.parse(["--port=9", "--nope", "--name=late"]).err();
    ensure!(
        err == Some(FlagError::UnknownFlag {
            flag: "--nope".to_owned()
        }),
        "got {err:?}"
    );
    ensure!(set.get::<i64>("port") == Some(&9));
    ensure!(!set.changed("name"));
    Ok(())
}

#[rstest]
fn unknown_shorthands_name_the_character(mut set: FlagSet) -> Result<()> {
    let err = set.parse(["-ax"]).err().context("expected an error")?;
    ensure!(err.to_string() == "unknown shorthand flag: -x", "got {err}");
    Ok(())
}

#[rstest]
fn handler_absorbs_unknown_flags(mut set: FlagSet) -> Result<()> {
    set.unknown_flag_handler(|err| match err {
        FlagError::UnknownFlag { .. } => Ok(()),
        other => Err(other),
    });
    set.parse(["--nope", "--port=5"])?;
    ensure!(set.get::<i64>("port") == Some(&5));
    let err = set.parse(["-x"]).err();
    ensure!(err == Some(FlagError::UnknownShorthand { short: 'x' }), "got {err:?}");
    Ok(())
}

#[rstest]
fn invalid_values_carry_flag_and_raw_text(mut set: FlagSet) -> Result<()> {
    let err = set.parse(["-p", "http"]).err().context("expected an error")?;
    ensure!(
        err.to_string() == "invalid value \"http\" for flag -p: invalid digit found in string",
        "got {err}"
    );
    Ok(())
}

#[test]
fn allowed_values_and_validators_surface_as_invalid_values() -> Result<()> {
    let mut set = FlagSet::new("app");
    set.env_lookup(|_| None)
        .add(Flag::string("mode", "fast").allowed(["fast".to_owned(), "slow".to_owned()]))
        .add(Flag::int("port", 80).validate(|port| {
            if *port > 0 {
                Ok(())
            } else {
                Err("port must be positive".to_owned())
            }
        }));
    let mode = set.parse(["--mode=medium"]).err().context("expected an error")?;
    ensure!(
        mode.to_string() == "invalid value \"medium\" for flag --mode: must be one of [fast, slow]",
        "got {mode}"
    );
    let port = set.parse(["--port=0"]).err().context("expected an error")?;
    ensure!(
        port.to_string() == "invalid value \"0\" for flag --port: port must be positive",
        "got {port}"
    );
    Ok(())
}

#[test]
fn finalizers_transform_values_and_optionally_defaults() -> Result<()> {
    let mut set = FlagSet::new("app");
    set.env_lookup(|_| None)
        .add(Flag::string("level", "INFO").finalize(|level| level.to_lowercase()))
        .add(
            Flag::string("region", "EU")
                .finalize(|region| region.to_lowercase())
                .finalize_default(),
        );
    set.parse(Vec::<String>::new())?;
    ensure!(set.get::<String>("level").map(String::as_str) == Some("INFO"));
    ensure!(set.get::<String>("region").map(String::as_str) == Some("eu"));
    ensure!(!set.changed("region"));

    let mut explicit = FlagSet::new("app");
    explicit
        .env_lookup(|_| None)
        .add(Flag::string("level", "INFO").finalize(|level| level.to_lowercase()));
    explicit.parse(["--level=DEBUG"])?;
    ensure!(explicit.get::<String>("level").map(String::as_str) == Some("debug"));
    Ok(())
}

#[test]
#[should_panic(expected = "missing value for flag: --name")]
fn panic_policy_panics_with_the_message() {
    let mut set = FlagSet::new("app");
    set.env_lookup(|_| None)
        .error_handling(ErrorHandling::PanicOnError)
        .add(Flag::string("name", ""));
    let _outcome = set.parse(["--name"]);
}

#[test]
#[should_panic(expected = "requires unknown flag")]
fn unknown_requires_targets_panic_when_parsing_starts() {
    let mut set = FlagSet::new("app");
    set.add(Flag::string("user", "").requires("pasword"));
    let _outcome = set.parse(Vec::<String>::new());
}

#[test]
#[should_panic(expected = "flag redefined: port")]
fn duplicate_registration_panics() {
    let mut set = FlagSet::new("app");
    set.add(Flag::int("port", 1)).add(Flag::int("port", 2));
}

//! Environment fallback for flags the command line left unset.

use anyhow::{Context, Result, ensure};
use dynaflags::{DynamicFlag, DynamicGroup, Flag, FlagError, FlagSet, process_env};
use rstest::rstest;
use serial_test::serial;
use test_helpers::FakeEnv;
use test_helpers::env::{self, EnvScope};

fn flag_set(env: &FakeEnv) -> FlagSet {
    let mut set = FlagSet::new("app");
    set.env_prefix("APP")
        .env_lookup(env.lookup())
        .add(Flag::int("port", 80))
        .add(Flag::string("log-level", "info"))
        .add(Flag::string("token", "").env("SERVICE_TOKEN"))
        .add(Flag::string("secret", "").disable_env());
    set
}

#[test]
fn unchanged_flags_read_derived_keys() -> Result<()> {
    let env = FakeEnv::new()
        .with("APP_PORT", "9090")
        .with("APP_LOG_LEVEL", "debug");
    let mut set = flag_set(&env);
    set.parse(Vec::<String>::new())?;
    ensure!(set.get::<i64>("port") == Some(&9090));
    ensure!(set.get::<String>("log-level").map(String::as_str) == Some("debug"));
    ensure!(set.changed("port"));
    Ok(())
}

#[test]
fn command_line_wins_and_is_never_looked_up() -> Result<()> {
    let env = FakeEnv::new().with("APP_PORT", "9090");
    let mut set = flag_set(&env);
    set.parse(["--port=1"])?;
    ensure!(set.get::<i64>("port") == Some(&1));
    ensure!(
        !env.queried().iter().any(|key| key == "APP_PORT"),
        "queried {:?}",
        env.queried()
    );
    Ok(())
}

#[test]
fn explicit_keys_and_disabled_flags() -> Result<()> {
    let env = FakeEnv::new()
        .with("SERVICE_TOKEN", "abc")
        .with("APP_SECRET", "leaked")
        .with("APP_TOKEN", "ignored");
    let mut set = flag_set(&env);
    set.parse(Vec::<String>::new())?;
    ensure!(set.get::<String>("token").map(String::as_str) == Some("abc"));
    ensure!(set.get::<String>("secret").map(String::as_str) == Some(""));
    ensure!(env.queried() == ["APP_PORT", "APP_LOG_LEVEL", "SERVICE_TOKEN"]);
    Ok(())
}

#[test]
fn explicit_keys_apply_without_a_prefix() -> Result<()> {
    let env = FakeEnv::new().with("SERVICE_TOKEN", "abc").with("PORT", "1");
    let mut set = FlagSet::new("app");
    set.env_lookup(env.lookup())
        .add(Flag::int("port", 80))
        .add(Flag::string("token", "").env("SERVICE_TOKEN"));
    set.parse(Vec::<String>::new())?;
    ensure!(set.get::<String>("token").map(String::as_str) == Some("abc"));
    ensure!(set.get::<i64>("port") == Some(&80));
    ensure!(env.queried() == ["SERVICE_TOKEN"]);
    Ok(())
}

#[test]
fn global_disable_skips_every_lookup() -> Result<()> {
    let env = FakeEnv::new().with("APP_PORT", "9090");
    let mut set = flag_set(&env);
    set.disable_env();
    set.parse(Vec::<String>::new())?;
    ensure!(set.get::<i64>("port") == Some(&80));
    ensure!(env.queried().is_empty());
    Ok(())
}

#[test]
fn empty_values_are_skipped() -> Result<()> {
    let env = FakeEnv::new().with("APP_PORT", "");
    let mut set = flag_set(&env);
    set.parse(Vec::<String>::new())?;
    ensure!(!set.changed("port"));
    Ok(())
}

#[test]
fn invalid_values_name_the_variable() -> Result<()> {
    let env = FakeEnv::new().with("APP_PORT", "eighty");
    let mut set = flag_set(&env);
    let err = set.parse(Vec::<String>::new()).err().context("expected an error")?;
    ensure!(
        matches!(&err, FlagError::InvalidEnv { key, flag, raw, .. }
            if key == "APP_PORT" && flag == "port" && raw == "eighty"),
        "got {err:?}"
    );
    ensure!(err.to_string().contains("from environment variable APP_PORT"));
    Ok(())
}

#[test]
fn invalid_values_can_be_ignored() -> Result<()> {
    let env = FakeEnv::new()
        .with("APP_PORT", "eighty")
        .with("APP_LOG_LEVEL", "warn");
    let mut set = flag_set(&env);
    set.ignore_invalid_env();
    set.parse(Vec::<String>::new())?;
    ensure!(set.get::<i64>("port") == Some(&80));
    ensure!(!set.changed("port"));
    ensure!(set.get::<String>("log-level").map(String::as_str) == Some("warn"));
    Ok(())
}

#[rstest]
#[case("APP_", "APP_PORT")]
#[case("app", "APP_PORT")]
#[case("my-app", "MY_APP_PORT")]
fn prefixes_normalise(#[case] prefix: &str, #[case] expected: &str) {
    let mut set = FlagSet::new("app");
    set.env_prefix(prefix).add(Flag::int("port", 80));
    assert_eq!(set.env_key("port").as_deref(), Some(expected));
}

#[test]
fn custom_key_functions_replace_the_default() -> Result<()> {
    let env = FakeEnv::new().with("app__port", "7");
    let mut set = FlagSet::new("app");
    set.env_prefix("app")
        .env_key_fn(|prefix, name| format!("{prefix}__{name}"))
        .env_lookup(env.lookup())
        .add(Flag::int("port", 80));
    set.parse(Vec::<String>::new())?;
    ensure!(set.get::<i64>("port") == Some(&7));
    Ok(())
}

#[test]
fn dynamic_fields_never_read_the_environment() -> Result<()> {
    let env = FakeEnv::new().with("APP_HTTP_ALPHA_PORT", "1");
    let mut set = FlagSet::new("app");
    set.env_prefix("APP")
        .env_lookup(env.lookup())
        .add_dynamic_group(DynamicGroup::new("http").field(DynamicFlag::int("port", 80)));
    set.parse(Vec::<String>::new())?;
    ensure!(set.instances("http").is_empty());
    ensure!(env.queried().is_empty());
    Ok(())
}

#[test]
#[serial]
fn process_environment_is_the_default_lookup() -> Result<()> {
    let _scope = EnvScope::with_vars(&[
        ("DYNAFLAGS_IT_PORT", Some("4242")),
        ("DYNAFLAGS_IT_NAME", None),
    ]);
    ensure!(process_env("DYNAFLAGS_IT_PORT").as_deref() == Some("4242"));
    let mut set = FlagSet::new("app");
    set.env_prefix("DYNAFLAGS_IT")
        .add(Flag::int("port", 80))
        .add(Flag::string("name", "anon"));
    set.parse(Vec::<String>::new())?;
    ensure!(set.get::<i64>("port") == Some(&4242));
    ensure!(set.get::<String>("name").map(String::as_str) == Some("anon"));
    Ok(())
}

#[test]
#[serial]
fn single_variable_guards_restore_on_drop() -> Result<()> {
    {
        let _port = env::set_var("DYNAFLAGS_GUARD_PORT", "5150");
        let _name = env::remove_var("DYNAFLAGS_GUARD_NAME");
        let mut set = FlagSet::new("app");
        set.env_prefix("DYNAFLAGS_GUARD")
            .add(Flag::int("port", 80))
            .add(Flag::string("name", "anon"));
        set.parse(Vec::<String>::new())?;
        ensure!(set.get::<i64>("port") == Some(&5150));
        ensure!(!set.changed("name"));
    }
    ensure!(process_env("DYNAFLAGS_GUARD_PORT").is_none());
    Ok(())
}

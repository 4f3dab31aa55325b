//! Hello Flags demo entry-point: declare flags, parse argv, print a plan.

use std::io::{self, Write};
use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use dynaflags::codec;
use dynaflags::{DynamicFlag, DynamicGroup, ErrorHandling, Flag, FlagSet};
use serde_json::json;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let mut set = declare();
    set.parse(std::env::args().skip(1))?;
    print_plan(&set)?;
    Ok(())
}

fn declare() -> FlagSet {
    let mut set = FlagSet::new("hello-flags");
    set.version(env!("CARGO_PKG_VERSION"))
        .description("Greets recipients and describes the listeners it would open.")
        .env_prefix("HELLO")
        .error_handling(ErrorHandling::ExitOnError)
        .add(
            Flag::string("greeting", "Hello")
                .short('g')
                .usage("Greeting to use"),
        )
        .add(
            Flag::strings("recipient", ["World"])
                .short('r')
                .placeholder("NAME")
                .usage("Who to greet; repeat or separate with commas"),
        )
        .add(Flag::bool("shout", false).short('s').usage("Upper-case the output"))
        .add(Flag::counter("verbose").short('v').max(3).usage("More detail"))
        .add(
            Flag::duration("timeout", Duration::from_secs(30))
                .usage("Listener idle timeout"),
        )
        .add(Flag::bool("json", false).one_of("format").usage("Emit JSON lines"))
        .add(Flag::bool("plain", false).one_of("format").usage("Emit plain text"))
        .add(
            Flag::string("user", "")
                .all_or_none("auth")
                .hide_default()
                .usage("Basic auth user"),
        )
        .add(
            Flag::string("password", "")
                .all_or_none("auth")
                .disable_env()
                .hide_default()
                .usage("Basic auth password"),
        )
        .add_dynamic_group(
            DynamicGroup::new("listener")
                .title("Listeners")
                .description("Declare any number of listeners as --listener.<id>.<field>.")
                .field(DynamicFlag::int("port", 0).required().usage("Port to bind"))
                .field(
                    DynamicFlag::scalar("bind", codec::ip_addr(), IpAddr::V4(Ipv4Addr::LOCALHOST))
                        .usage("Address to bind"),
                )
                .field(DynamicFlag::bool("tls", false).usage("Serve TLS")),
        );
    set.one_of_group("format").title("output format");
    set
}

fn print_plan(set: &FlagSet) -> io::Result<()> {
    let mut out = io::stdout().lock();
    let greeting = set.get::<String>("greeting").map_or("Hello", String::as_str);
    let shout = set.get::<bool>("shout").copied().unwrap_or(false);
    let as_json = set.get::<bool>("json").copied().unwrap_or(false);
    debug!(verbosity = set.get::<i64>("verbose").copied().unwrap_or(0), "printing plan");

    for recipient in set.get::<Vec<String>>("recipient").into_iter().flatten() {
        let line = format!("{greeting}, {recipient}!");
        let text = if shout { line.to_uppercase() } else { line };
        if as_json {
            writeln!(out, "{}", json!({ "greeting": text }))?;
        } else {
            writeln!(out, "{text}")?;
        }
    }

    let timeout = set
        .get::<Duration>("timeout")
        .map(|value| codec::duration().format(value))
        .unwrap_or_default();
    for id in set.instances("listener") {
        let port = set.dynamic_get::<i64>("listener", &id, "port").copied().unwrap_or(0);
        let bind = set
            .dynamic_get::<IpAddr>("listener", &id, "bind")
            .map_or_else(String::new, ToString::to_string);
        let tls = set.dynamic_get::<bool>("listener", &id, "tls").copied().unwrap_or(false);
        let scheme = if tls { "https" } else { "http" };
        writeln!(out, "listener {id}: {scheme}://{bind}:{port} (idle timeout {timeout})")?;
    }

    if let Some(user) = set.get::<String>("user").filter(|_| set.changed("user")) {
        writeln!(out, "auth: {user}")?;
    }
    for extra in set.args() {
        writeln!(out, "extra argument: {extra}")?;
    }
    Ok(())
}

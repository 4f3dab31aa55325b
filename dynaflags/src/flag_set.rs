//! The user-facing flag set: declaration, parsing and typed access.

use std::fmt;
use std::io::{self, Write};

use tracing::debug;

use crate::docs::{DynamicGroupDoc, FlagDoc, FlagSetDoc, GroupDoc, IR_VERSION, render_help};
use crate::dynamic::{DynamicGroup, DynamicRegistry};
use crate::env::{EnvContext, EnvKeyFn, EnvLookup, process_env};
use crate::error::FlagError;
use crate::flag::{BaseFlag, Flag};
use crate::groups::{AllOrNoneGroup, GroupRegistry, OneOfGroup};
use crate::handling::{Disposition, ErrorHandling, dispose};
use crate::parser::{Builtins, DisplayRequest, HELP_FLAG, Tokenizer, UnknownFlagHandler, VERSION_FLAG};
use crate::registry::FlagRegistry;
use crate::settings::Settings;
use crate::validate::{Validator, check_declarations};
use crate::value::Value;

/// A registry of flags plus the state of one parse.
///
/// Build one per run: declare flags and groups, call [`FlagSet::parse`],
/// then read values back.
///
/// # Examples
///
/// ```
/// use dynaflags::{DynamicFlag, DynamicGroup, Flag, FlagSet};
///
/// let mut set = FlagSet::new("serve");
/// set.add(Flag::int("port", 80).short('p'))
///     .add(Flag::bool("verbose", false).short('v'))
///     .add_dynamic_group(DynamicGroup::new("http").field(DynamicFlag::int("port", 0)));
///
/// set.parse(["-vp", "8080", "--http.alpha.port=9000", "extra"])?;
///
/// assert_eq!(set.get::<i64>("port"), Some(&8080));
/// assert_eq!(set.get::<bool>("verbose"), Some(&true));
/// assert_eq!(set.instances("http"), ["alpha"]);
/// assert_eq!(set.dynamic_get::<i64>("http", "alpha", "port"), Some(&9000));
/// assert_eq!(set.args(), ["extra"]);
/// # Ok::<(), dynaflags::FlagError>(())
/// ```
pub struct FlagSet {
    settings: Settings,
    registry: FlagRegistry,
    dynamic: DynamicRegistry,
    groups: GroupRegistry,
    env_lookup: Box<EnvLookup>,
    output: Box<dyn Write>,
    unknown: Option<Box<UnknownFlagHandler>>,
    positionals: Vec<String>,
    builtins: Builtins,
}

impl fmt::Debug for FlagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlagSet")
            .field("settings", &self.settings)
            .field("registry", &self.registry)
            .field("dynamic", &self.dynamic)
            .field("groups", &self.groups)
            .field("positionals", &self.positionals)
            .finish_non_exhaustive()
    }
}

impl FlagSet {
    /// An empty set for the program `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_settings(Settings::new(name))
    }

    /// An empty set using prepared `settings`.
    #[must_use]
    pub fn with_settings(settings: Settings) -> Self {
        Self {
            settings,
            registry: FlagRegistry::default(),
            dynamic: DynamicRegistry::default(),
            groups: GroupRegistry::default(),
            env_lookup: Box::new(process_env),
            output: Box::new(io::stderr()),
            unknown: None,
            positionals: Vec::new(),
            builtins: Builtins::default(),
        }
    }

    /// Current settings.
    #[must_use]
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Sets the version and enables `--version`.
    pub fn version(&mut self, version: impl Into<String>) -> &mut Self {
        self.settings.version = Some(version.into());
        self
    }

    /// Sets the paragraph shown under the usage line.
    pub fn description(&mut self, description: impl Into<String>) -> &mut Self {
        self.settings.description = Some(description.into());
        self
    }

    /// Derives environment keys as `PREFIX_NAME`.
    pub fn env_prefix(&mut self, prefix: impl Into<String>) -> &mut Self {
        self.settings.env_prefix = Some(prefix.into());
        self
    }

    /// Replaces the environment key function.
    pub const fn env_key_fn(&mut self, key_fn: EnvKeyFn) -> &mut Self {
        self.settings.env_key = key_fn;
        self
    }

    /// Replaces the environment lookup, by default the process environment.
    pub fn env_lookup<F>(&mut self, lookup: F) -> &mut Self
    where
        F: Fn(&str) -> Option<String> + 'static,
    {
        self.env_lookup = Box::new(lookup);
        self
    }

    /// Skips the environment pass.
    pub const fn disable_env(&mut self) -> &mut Self {
        self.settings.env_disabled = true;
        self
    }

    /// Skips environment values that fail to parse.
    pub const fn ignore_invalid_env(&mut self) -> &mut Self {
        self.settings.ignore_invalid_env = true;
        self
    }

    /// Requires at least `count` positional arguments.
    pub const fn min_positionals(&mut self, count: usize) -> &mut Self {
        self.settings.min_positionals = count;
        self
    }

    /// Lists flags alphabetically in help.
    pub const fn sort_flags(&mut self) -> &mut Self {
        self.settings.sort_flags = true;
        self
    }

    /// Omits the built-in help flag.
    pub const fn disable_help(&mut self) -> &mut Self {
        self.settings.disable_help = true;
        self
    }

    /// Chooses what `parse` does with errors.
    pub const fn error_handling(&mut self, policy: ErrorHandling) -> &mut Self {
        self.settings.error_handling = policy;
        self
    }

    /// Where exit-on-error output goes, by default stderr.
    pub fn output<W: Write + 'static>(&mut self, output: W) -> &mut Self {
        self.output = Box::new(output);
        self
    }

    /// Installs a handler for unknown flags.
    ///
    /// The handler receives the unknown-flag error; returning `Ok` skips the
    /// token and parsing continues.
    pub fn unknown_flag_handler<F>(&mut self, handler: F) -> &mut Self
    where
        F: FnMut(FlagError) -> Result<(), FlagError> + 'static,
    {
        self.unknown = Some(Box::new(handler));
        self
    }

    /// Registers a static flag and its group memberships.
    ///
    /// # Panics
    ///
    /// Panics when the long name or short alias is already registered.
    pub fn add<V: Value>(&mut self, flag: Flag<V>) -> &mut Self {
        let base = flag.into_base();
        for group in base.options().one_of() {
            self.groups.one_of_mut(group).member(base.name());
        }
        for group in base.options().all_or_none() {
            self.groups.all_or_none_mut(group).member(base.name());
        }
        self.registry.register(base);
        self
    }

    /// Registers a dynamic group.
    ///
    /// # Panics
    ///
    /// Panics when a group with the same prefix is already registered.
    pub fn add_dynamic_group(&mut self, group: DynamicGroup) -> &mut Self {
        self.dynamic.register(group);
        self
    }

    /// The one-of group `name`, created if absent.
    pub fn one_of_group(&mut self, name: &str) -> &mut OneOfGroup {
        self.groups.one_of_mut(name)
    }

    /// The all-or-none group `name`, created if absent.
    pub fn all_or_none_group(&mut self, name: &str) -> &mut AllOrNoneGroup {
        self.groups.all_or_none_mut(name)
    }

    /// Makes the all-or-none group `all_or_none` one slot of the one-of
    /// group `one_of`, creating either if absent.
    pub fn one_of_bundle(&mut self, one_of: &str, all_or_none: &str) -> &mut Self {
        self.groups.all_or_none_mut(all_or_none);
        self.groups.one_of_mut(one_of).bundle(all_or_none);
        self
    }

    /// Parses `args` (without the program name).
    ///
    /// Runs the tokenizer, then the environment pass, then constraint
    /// validation, stopping at the first error. Built-in `--help` and
    /// `--version` surface as [`FlagError::HelpRequested`] and
    /// [`FlagError::VersionRequested`].
    ///
    /// # Errors
    ///
    /// Returns the first failure under [`ErrorHandling::ContinueOnError`],
    /// and help or version requests under [`ErrorHandling::PanicOnError`].
    ///
    /// # Panics
    ///
    /// Panics on failures under [`ErrorHandling::PanicOnError`], and on
    /// declarations that reference unknown flags or groups.
    pub fn parse<I, S>(&mut self, args: I) -> Result<(), FlagError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.install_builtins();
        check_declarations(&self.registry, &self.dynamic, &self.groups);
        let argv: Vec<String> = args.into_iter().map(Into::into).collect();
        debug!(program = %self.settings.name, count = argv.len(), "parsing arguments");
        let result = self.run_passes(argv);
        self.surface(result)
    }

    fn run_passes(&mut self, argv: Vec<String>) -> Result<(), FlagError> {
        let tokenizer = Tokenizer {
            registry: &mut self.registry,
            dynamic: &mut self.dynamic,
            handler: self.unknown.as_deref_mut(),
            positionals: &mut self.positionals,
            builtins: self.builtins,
        };
        if let Some(request) = tokenizer.run(argv)? {
            return Err(self.display_error(request));
        }
        EnvContext::new(&self.settings, self.env_lookup.as_ref()).apply(&mut self.registry)?;
        Validator {
            registry: &self.registry,
            dynamic: &self.dynamic,
            groups: &self.groups,
            positionals: self.positionals.len(),
            min_positionals: self.settings.min_positionals,
        }
        .run()
    }

    fn display_error(&self, request: DisplayRequest) -> FlagError {
        match request {
            DisplayRequest::Help => FlagError::HelpRequested(self.help()),
            DisplayRequest::Version => FlagError::VersionRequested(self.version_text()),
        }
    }

    fn surface(&mut self, result: Result<(), FlagError>) -> Result<(), FlagError> {
        let Err(err) = result else {
            return Ok(());
        };
        match dispose(self.settings.error_handling, &err) {
            Disposition::Return => Err(err),
            Disposition::Exit { code, message } => {
                self.emit(&message);
                std::process::exit(code)
            }
            Disposition::Panic(message) => fail(&message),
        }
    }

    fn emit(&mut self, message: &str) {
        let written = self
            .output
            .write_all(message.as_bytes())
            .and_then(|()| self.output.flush());
        if let Err(write_err) = written {
            debug!(error = %write_err, "could not write parse output");
        }
    }

    fn pending_builtins(&self) -> Vec<BaseFlag> {
        let mut flags = Vec::new();
        if !self.settings.disable_help && !self.registry.contains(HELP_FLAG) {
            let mut help = Flag::bool(HELP_FLAG, false)
                .usage("Show this help")
                .disable_env();
            if !self.registry.short_taken('h') {
                help = help.short('h');
            }
            flags.push(help.into_base());
        }
        if self.settings.version.is_some() && !self.registry.contains(VERSION_FLAG) {
            let version = Flag::bool(VERSION_FLAG, false)
                .usage("Show version information")
                .disable_env();
            flags.push(version.into_base());
        }
        flags
    }

    fn install_builtins(&mut self) {
        for flag in self.pending_builtins() {
            self.builtins.help |= flag.name() == HELP_FLAG;
            self.builtins.version |= flag.name() == VERSION_FLAG;
            self.registry.register(flag);
        }
    }

    /// The static flag called `name`.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&BaseFlag> {
        self.registry.get(name)
    }

    /// Typed value of the static flag `name`.
    ///
    /// Returns `None` for an unknown flag or a mismatched `T`.
    #[must_use]
    pub fn get<T: 'static>(&self, name: &str) -> Option<&T> {
        self.registry.get(name).and_then(BaseFlag::get::<T>)
    }

    /// Whether argv or the environment set `name`.
    #[must_use]
    pub fn changed(&self, name: &str) -> bool {
        self.registry.get(name).is_some_and(BaseFlag::changed)
    }

    /// Static flags in registration order.
    pub fn flags(&self) -> impl Iterator<Item = &BaseFlag> {
        self.registry.iter()
    }

    /// Static flags ordered by long name.
    #[must_use]
    pub fn sorted_flags(&self) -> Vec<&BaseFlag> {
        self.registry.sorted()
    }

    /// The dynamic group with prefix `name`.
    #[must_use]
    pub fn dynamic_group(&self, name: &str) -> Option<&DynamicGroup> {
        self.dynamic.get(name)
    }

    /// Dynamic groups in registration order.
    pub fn dynamic_groups(&self) -> impl Iterator<Item = &DynamicGroup> {
        self.dynamic.iter()
    }

    /// Sorted instance IDs seen for `group`; empty for unknown groups.
    #[must_use]
    pub fn instances(&self, group: &str) -> Vec<String> {
        self.dynamic
            .get(group)
            .map(DynamicGroup::instances)
            .unwrap_or_default()
    }

    /// Typed value of `group.id.field`, or the field default.
    #[must_use]
    pub fn dynamic_get<T: 'static>(&self, group: &str, id: &str, field: &str) -> Option<&T> {
        self.dynamic
            .get(group)
            .and_then(|found| found.get::<T>(id, field))
    }

    /// Positional arguments.
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.positionals
    }

    /// The positional argument at `index`.
    #[must_use]
    pub fn arg(&self, index: usize) -> Option<&str> {
        self.positionals.get(index).map(String::as_str)
    }

    /// Environment key the flag `name` reads, if any.
    #[must_use]
    pub fn env_key(&self, name: &str) -> Option<String> {
        let env = EnvContext::new(&self.settings, self.env_lookup.as_ref());
        self.registry.get(name).and_then(|flag| env.key_for(flag))
    }

    /// Ordered, serialisable description of every visible declaration.
    #[must_use]
    pub fn describe(&self) -> FlagSetDoc {
        let env = EnvContext::new(&self.settings, self.env_lookup.as_ref());
        let pending = self.pending_builtins();
        let mut flags: Vec<&BaseFlag> = self
            .registry
            .iter()
            .chain(&pending)
            .filter(|flag| !flag.options().is_hidden())
            .collect();
        if self.settings.sort_flags {
            flags.sort_by(|left, right| left.name().cmp(right.name()));
        }
        FlagSetDoc {
            ir_version: IR_VERSION.to_owned(),
            name: self.settings.name.clone(),
            version: self.settings.version.clone(),
            description: self.settings.description.clone(),
            min_positionals: self.settings.min_positionals,
            flags: flags
                .into_iter()
                .map(|flag| FlagDoc::from_flag(flag, env.key_for(flag)))
                .collect(),
            dynamic_groups: self
                .dynamic
                .iter()
                .filter(|group| !group.is_hidden())
                .map(DynamicGroupDoc::from_group)
                .collect(),
            one_of_groups: self.groups.one_of().map(GroupDoc::from_one_of).collect(),
            all_or_none_groups: self
                .groups
                .all_or_none()
                .map(GroupDoc::from_all_or_none)
                .collect(),
        }
    }

    /// Rendered help text.
    #[must_use]
    pub fn help(&self) -> String {
        render_help(&self.describe())
    }

    /// `"<name> <version>\n"`.
    #[must_use]
    pub fn version_text(&self) -> String {
        format!(
            "{} {}\n",
            self.settings.name,
            self.settings.version.as_deref().unwrap_or_default()
        )
    }
}

fn fail(message: &str) -> ! {
    panic!("{message}")
}

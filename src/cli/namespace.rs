//! Parsed arguments handed to subcommand handlers

use crate::{cli::parser::COLOR, config::ConfigFile, core::verbosity::Level};
use clap::{ArgMatches, parser::ValueSource};
use std::any::Any;

/// The result of parsing one command line.
///
/// Global arguments may appear on either side of the subcommand; lookups
/// prefer an explicit value given after the subcommand, then one given
/// before it, then defaults.
#[derive(Debug, Clone)]
pub struct Namespace {
    level: Level,
    subcommand: String,
    global: ArgMatches,
    command: Option<ArgMatches>,
    config_file: Option<ConfigFile>,
}

impl Namespace {
    pub(crate) fn new(
        level: Level,
        subcommand: String,
        global: ArgMatches,
        command: Option<ArgMatches>,
    ) -> Self {
        Self {
            level,
            subcommand,
            global,
            command,
            config_file: None,
        }
    }

    pub(crate) fn with_config_file(mut self, config_file: ConfigFile) -> Self {
        self.config_file = Some(config_file);
        self
    }

    /// Log level after applying every `-v` and `-q`
    pub fn level(&self) -> Level {
        self.level
    }

    /// Whether `--no-color` was left off
    pub fn color(&self) -> bool {
        self.get_one::<bool>(COLOR).copied().unwrap_or(true)
    }

    /// Selected subcommand, `"help"` when none was given
    pub fn subcommand(&self) -> &str {
        &self.subcommand
    }

    /// The tool's config file, when the dispatcher resolved one
    pub fn config_file(&self) -> Option<&ConfigFile> {
        self.config_file.as_ref()
    }

    /// Whether the argument has a value from any source
    pub fn contains(&self, id: &str) -> bool {
        self.matches_for(id).is_some()
    }

    /// Single value of an argument
    pub fn get_one<V>(&self, id: &str) -> Option<&V>
    where
        V: Any + Clone + Send + Sync + 'static,
    {
        self.matches_for(id)?.try_get_one::<V>(id).ok().flatten()
    }

    /// Every value of an argument
    pub fn get_many<V>(&self, id: &str) -> Vec<&V>
    where
        V: Any + Clone + Send + Sync + 'static,
    {
        self.matches_for(id)
            .and_then(|m| m.try_get_many::<V>(id).ok().flatten())
            .map(Iterator::collect)
            .unwrap_or_default()
    }

    /// Value of a `SetTrue`/`SetFalse` flag, false when undeclared
    pub fn get_flag(&self, id: &str) -> bool {
        self.get_one::<bool>(id).copied().unwrap_or(false)
    }

    /// Convenience for string-valued arguments
    pub fn get_str(&self, id: &str) -> Option<&str> {
        self.get_one::<String>(id).map(String::as_str)
    }

    /// Matches holding the value to report for `id`
    fn matches_for(&self, id: &str) -> Option<&ArgMatches> {
        let levels: Vec<&ArgMatches> = self.command.iter().chain([&self.global]).collect();

        levels
            .iter()
            .copied()
            .find(|m| is_explicit(m, id))
            .or_else(|| levels.iter().copied().find(|m| is_present(m, id)))
    }
}

fn is_present(matches: &ArgMatches, id: &str) -> bool {
    matches.ids().any(|present| present.as_str() == id)
}

fn is_explicit(matches: &ArgMatches, id: &str) -> bool {
    is_present(matches, id)
        && matches
            .value_source(id)
            .is_some_and(|source| source != ValueSource::DefaultValue)
}

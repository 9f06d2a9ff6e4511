//! Tool definitions and the sorted subcommand registry
//!
//! A [`ToolBuilder`] collects declarations in source order; [`ToolBuilder::build`]
//! checks them once and produces the immutable [`ToolDescriptor`] that the
//! parser and dispatcher work from.

use crate::{
    cli::parser::{COLOR, QUIET, VERBOSE},
    core::command::Subcommand,
    error::{Result, TermtoolError},
    logging::LogFormat,
};
use clap::Arg;
use std::collections::HashSet;
use tracing::debug;

/// Name the parser keeps for printing help
pub const HELP_COMMAND: &str = "help";

/// Collects a tool's declarations before they are frozen
pub struct ToolBuilder<T> {
    name: String,
    description: Option<String>,
    doc: Option<String>,
    arguments: Vec<Arg>,
    commands: Vec<Subcommand<T>>,
    log_format: LogFormat,
}

/// The checked, immutable definition of a tool
pub struct ToolDescriptor<T> {
    name: String,
    description: Option<String>,
    arguments: Vec<Arg>,
    commands: Vec<Subcommand<T>>,
    log_format: LogFormat,
}

impl<T> ToolBuilder<T> {
    /// Start a definition named after the tool type
    pub fn new() -> Self {
        Self {
            name: default_tool_name::<T>(),
            description: None,
            doc: None,
            arguments: Vec::new(),
            commands: Vec::new(),
            log_format: LogFormat::default(),
        }
    }

    /// Override the tool name used for the program name and the config file
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Tool documentation, shown when no description is set
    #[must_use]
    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Add a global argument accepted by every subcommand
    #[must_use]
    pub fn arg(mut self, arg: Arg) -> Self {
        self.arguments.push(arg);
        self
    }

    #[must_use]
    pub fn subcommand(mut self, command: Subcommand<T>) -> Self {
        self.commands.push(command);
        self
    }

    #[must_use]
    pub fn log_format(mut self, format: LogFormat) -> Self {
        self.log_format = format;
        self
    }

    /// Freeze the declarations, sorting subcommands by name.
    ///
    /// Two subcommands with the same name are rejected rather than letting
    /// one silently replace the other. So are arguments whose id is already
    /// taken by a global argument, since both end up in the same parser.
    pub fn build(self) -> Result<ToolDescriptor<T>> {
        check_names(&self.commands)?;
        check_arguments(&self.name, &self.arguments, &self.commands)?;

        let mut commands = self.commands;
        commands.sort_by(|a, b| a.spec.name.cmp(&b.spec.name));

        debug!(
            "Built tool `{}` with {} subcommand(s)",
            self.name,
            commands.len()
        );

        Ok(ToolDescriptor {
            name: self.name,
            description: self.description.or(self.doc),
            arguments: self.arguments,
            commands,
            log_format: self.log_format,
        })
    }
}

impl<T> Default for ToolBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ToolDescriptor<T> {
    /// Tool name, lower case unless overridden
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Description, falling back to the tool documentation
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Global arguments in declaration order
    pub fn arguments(&self) -> &[Arg] {
        &self.arguments
    }

    /// Subcommands sorted by name
    pub fn commands(&self) -> &[Subcommand<T>] {
        &self.commands
    }

    pub fn log_format(&self) -> &LogFormat {
        &self.log_format
    }

    /// Look up a subcommand by its canonical name
    pub fn command(&self, name: &str) -> Option<&Subcommand<T>> {
        self.commands
            .binary_search_by(|c| c.spec.name.as_str().cmp(name))
            .ok()
            .map(|i| &self.commands[i])
    }

    /// Subcommand names in presentation order
    pub fn command_names(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().map(|c| c.spec.name.as_str())
    }
}

fn check_names<T>(commands: &[Subcommand<T>]) -> Result<()> {
    let mut seen = HashSet::new();
    for command in commands {
        let name = command.spec.name.as_str();
        if name == HELP_COMMAND {
            return Err(TermtoolError::reserved_subcommand(name));
        }
        if !seen.insert(name) {
            return Err(TermtoolError::duplicate_subcommand(name));
        }
    }
    Ok(())
}

fn check_arguments<T>(tool: &str, arguments: &[Arg], commands: &[Subcommand<T>]) -> Result<()> {
    let mut global: HashSet<&str> = HashSet::from([VERBOSE, QUIET, COLOR]);
    for arg in arguments {
        let id = arg.get_id().as_str();
        if !global.insert(id) {
            return Err(TermtoolError::argument_conflict(tool, id));
        }
    }

    for command in commands {
        for arg in command.arguments() {
            let id = arg.get_id().as_str();
            if global.contains(id) {
                return Err(TermtoolError::argument_conflict(&command.spec.name, id));
            }
        }
    }
    Ok(())
}

/// Lower-cased final path segment of the tool type, generics removed
fn default_tool_name<T>() -> String {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base).to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Namespace;

    struct Example;

    fn noop(_tool: &mut Example, _args: &Namespace) -> anyhow::Result<()> {
        Ok(())
    }

    #[test]
    fn test_default_name_is_lowercased_type_name() {
        let descriptor = ToolBuilder::<Example>::new().build().unwrap();
        assert_eq!(descriptor.name(), "example");
    }

    #[test]
    fn test_commands_sorted_regardless_of_declaration_order() {
        let descriptor = ToolBuilder::<Example>::new()
            .subcommand(Subcommand::new("loglevel", noop))
            .subcommand(Subcommand::new("frob", noop))
            .subcommand(Subcommand::new("display", noop))
            .build()
            .unwrap();

        let names: Vec<_> = descriptor.command_names().collect();
        assert_eq!(names, ["display", "frob", "loglevel"]);
        assert!(descriptor.command("frob").is_some());
        assert!(descriptor.command("missing").is_none());
    }

    #[test]
    fn test_duplicate_names_are_rejected() {
        let result = ToolBuilder::<Example>::new()
            .subcommand(Subcommand::new("frob", noop))
            .subcommand(Subcommand::new("other", noop).name("frob"))
            .build();

        assert!(matches!(
            result,
            Err(TermtoolError::DuplicateSubcommand { ref name }) if name == "frob"
        ));
    }

    #[test]
    fn test_help_name_is_reserved() {
        let result = ToolBuilder::<Example>::new()
            .subcommand(Subcommand::new("help", noop))
            .build();
        assert!(matches!(result, Err(TermtoolError::ReservedSubcommand { .. })));
    }

    #[test]
    fn test_subcommand_argument_clashing_with_global_is_rejected() {
        let result = ToolBuilder::<Example>::new()
            .arg(Arg::new("name").long("name"))
            .subcommand(Subcommand::new("frob", noop).arg(Arg::new("name")))
            .build();

        assert!(matches!(
            result,
            Err(TermtoolError::ArgumentConflict { ref scope, ref argument })
                if scope == "frob" && argument == "name"
        ));
    }

    #[test]
    fn test_builtin_argument_ids_are_reserved() {
        let result = ToolBuilder::<Example>::new()
            .arg(Arg::new("verbose").long("loud"))
            .build();
        assert!(matches!(
            result,
            Err(TermtoolError::ArgumentConflict { ref argument, .. }) if argument == "verbose"
        ));

        let result = ToolBuilder::<Example>::new()
            .subcommand(Subcommand::new("frob", noop).arg(Arg::new("color").long("colour")))
            .build();
        assert!(matches!(result, Err(TermtoolError::ArgumentConflict { .. })));
    }

    #[test]
    fn test_same_argument_in_two_subcommands_is_allowed() {
        let descriptor = ToolBuilder::<Example>::new()
            .subcommand(Subcommand::new("frob", noop).arg(Arg::new("baz")))
            .subcommand(Subcommand::new("display", noop).arg(Arg::new("baz")))
            .build();
        assert!(descriptor.is_ok());
    }

    #[test]
    fn test_description_falls_back_to_doc() {
        let descriptor = ToolBuilder::<Example>::new()
            .doc("A script that frobs bazzes.")
            .build()
            .unwrap();
        assert_eq!(descriptor.description(), Some("A script that frobs bazzes."));

        let descriptor = ToolBuilder::<Example>::new()
            .doc("A script that frobs bazzes.")
            .description("Frobber")
            .build()
            .unwrap();
        assert_eq!(descriptor.description(), Some("Frobber"));
    }
}

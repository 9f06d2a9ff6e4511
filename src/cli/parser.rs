//! Argument parser assembly
//!
//! The parser has two levels: the top-level command carries the global
//! options, and every subcommand repeats them next to its own arguments so
//! that global options work before and after the subcommand name.

use crate::{
    cli::Namespace,
    core::{
        command::Handler,
        registry::{HELP_COMMAND, ToolDescriptor},
        verbosity::{Level, Step},
    },
};
use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use std::ffi::OsString;
use tracing::{debug, instrument};

/// Argument id of the `-v` option
pub const VERBOSE: &str = "verbose";
/// Argument id of the `-q` option
pub const QUIET: &str = "quiet";
/// Argument id of the `--no-color` option
pub const COLOR: &str = "color";

/// A parsed command line together with the handler it selects
pub struct ParsedInvocation<T> {
    pub namespace: Namespace,
    /// `None` when no subcommand was given
    pub handler: Option<Handler<T>>,
}

/// Options shared by the top-level command and every subcommand
fn global_options<T>(descriptor: &ToolDescriptor<T>) -> Vec<Arg> {
    let mut options = vec![
        verbosity_option(VERBOSE, 'v', "be more verbose (stackable)"),
        verbosity_option(QUIET, 'q', "be less verbose (stackable)"),
        Arg::new(COLOR)
            .long("no-color")
            .action(ArgAction::SetFalse)
            .help("use no color in log"),
    ];
    options.extend(descriptor.arguments().iter().cloned());
    options
}

/// A repeatable short flag recording one value per occurrence.
///
/// `Append` keeps the position of every occurrence, which a counting
/// flag would discard; `-v=2` counts as two steps.
fn verbosity_option(id: &'static str, short: char, help: &'static str) -> Arg {
    Arg::new(id)
        .short(short)
        .help(help)
        .action(ArgAction::Append)
        .num_args(0..=1)
        .require_equals(true)
        .default_missing_value("1")
        .value_name("STEPS")
        .value_parser(value_parser!(u8))
}

/// Build the parser for a tool
#[instrument(skip(descriptor), fields(tool = descriptor.name()))]
pub fn build_parser<T>(descriptor: &ToolDescriptor<T>) -> Command {
    let globals = global_options(descriptor);

    // Saved arguments come first, so a repeated option keeps its last value.
    let mut parser = Command::new(descriptor.name().to_string())
        .args_override_self(true)
        .args(globals.iter().cloned())
        .subcommand_help_heading("Subcommands")
        .subcommand_value_name("SUBCOMMAND");
    if let Some(description) = descriptor.description() {
        parser = parser.about(description.to_string());
    }

    // Already sorted by name, and clap lists subcommands in insertion order.
    for command in descriptor.commands() {
        let spec = command.spec();
        let mut subparser = Command::new(spec.name.clone())
            .args_override_self(true)
            .args(globals.iter().cloned())
            .args(command.arguments().iter().cloned());

        if let Some(help) = &spec.help {
            subparser = subparser.about(help.clone());
        }
        if let Some(description) = spec.effective_description() {
            subparser = subparser.long_about(description.to_string());
        }
        if let Some(epilog) = &spec.epilog {
            subparser = subparser.after_help(epilog.clone());
        }
        for alias in &spec.aliases {
            subparser = subparser.visible_alias(alias.clone());
        }

        parser = parser.subcommand(subparser);
    }

    parser
}

/// Parse `args` (without the program name) against the tool's parser.
///
/// Errors are clap usage errors, `--help` and `help` included; callers
/// normally end the process with [`clap::Error::exit`].
pub fn parse<T, I, S>(
    descriptor: &ToolDescriptor<T>,
    args: I,
) -> Result<ParsedInvocation<T>, clap::Error>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    let argv = std::iter::once(OsString::from(descriptor.name()))
        .chain(args.into_iter().map(Into::into));
    let matches = build_parser(descriptor).try_get_matches_from(argv)?;

    let (subcommand, command_matches) = match matches.subcommand() {
        Some((name, sub)) => (name.to_string(), Some(sub.clone())),
        None => (HELP_COMMAND.to_string(), None),
    };

    let mut steps = verbosity_steps(&matches);
    if let Some(sub) = &command_matches {
        // Everything in the subcommand's matches came after its name.
        steps.extend(verbosity_steps(sub));
    }
    let level = Level::resolve(steps);

    let handler = descriptor.command(&subcommand).map(|c| c.handler());
    let namespace = Namespace::new(level, subcommand, matches, command_matches);

    debug!(
        "Parsed subcommand `{}` at level {}",
        namespace.subcommand(),
        level
    );

    Ok(ParsedInvocation { namespace, handler })
}

/// `-v`/`-q` occurrences of one parser level in command-line order
fn verbosity_steps(matches: &ArgMatches) -> Vec<Step> {
    let mut occurrences: Vec<(usize, Step, u8)> = Vec::new();

    for (id, step) in [(VERBOSE, Step::More), (QUIET, Step::Less)] {
        let (Some(indices), Some(counts)) = (matches.indices_of(id), matches.get_many::<u8>(id))
        else {
            continue;
        };
        occurrences.extend(indices.zip(counts).map(|(index, count)| (index, step, *count)));
    }

    occurrences.sort_by_key(|(index, _, _)| *index);
    occurrences
        .into_iter()
        .flat_map(|(_, step, count)| std::iter::repeat_n(step, usize::from(count)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{command::Subcommand, registry::ToolBuilder};
    use clap::error::ErrorKind;

    #[derive(Default)]
    struct Example {
        calls: Vec<String>,
    }

    impl Example {
        fn display(&mut self, _args: &Namespace) -> anyhow::Result<()> {
            self.calls.push("display".into());
            Ok(())
        }

        fn frob(&mut self, _args: &Namespace) -> anyhow::Result<()> {
            self.calls.push("frob".into());
            Ok(())
        }
    }

    fn example() -> ToolDescriptor<Example> {
        ToolBuilder::new()
            .doc("A script that frobs or displays bazzes.")
            .arg(Arg::new("name").long("name").default_value("anonymous"))
            .subcommand(
                Subcommand::new("frob", Example::frob as Handler<Example>)
                    .help("frob a baz")
                    .alias("fr")
                    .arg(Arg::new("baz").help("the baz to frob")),
            )
            .subcommand(
                Subcommand::new("display", Example::display as Handler<Example>)
                    .help("display a baz")
                    .arg(Arg::new("baz").help("the baz to display"))
                    .arg(
                        Arg::new("csv")
                            .long("csv")
                            .action(ArgAction::SetTrue)
                            .help("sets display mode to CSV"),
                    ),
            )
            .build()
            .unwrap()
    }

    fn level_of(args: &[&str]) -> Level {
        parse(&example(), args).unwrap().namespace.level()
    }

    #[test]
    fn test_parse_subcommand_arguments() {
        let parsed = parse(&example(), ["display", "myfile", "--csv"]).unwrap();
        assert_eq!(parsed.namespace.subcommand(), "display");
        assert_eq!(parsed.namespace.get_str("baz"), Some("myfile"));
        assert!(parsed.namespace.get_flag("csv"));

        let parsed = parse(&example(), ["display", "myfile"]).unwrap();
        assert!(!parsed.namespace.get_flag("csv"));
    }

    #[test]
    fn test_handler_matches_selected_subcommand() {
        let descriptor = example();
        let mut tool = Example::default();

        let parsed = parse(&descriptor, ["frob", "x"]).unwrap();
        (parsed.handler.unwrap())(&mut tool, &parsed.namespace).unwrap();
        let parsed = parse(&descriptor, ["display", "x"]).unwrap();
        (parsed.handler.unwrap())(&mut tool, &parsed.namespace).unwrap();

        assert_eq!(tool.calls, ["frob", "display"]);
    }

    #[test]
    fn test_alias_resolves_to_canonical_name() {
        let parsed = parse(&example(), ["fr", "x"]).unwrap();
        assert_eq!(parsed.namespace.subcommand(), "frob");
        assert!(parsed.handler.is_some());
    }

    #[test]
    fn test_missing_subcommand_defaults_to_help() {
        let parsed = parse(&example(), ["-v"]).unwrap();
        assert_eq!(parsed.namespace.subcommand(), "help");
        assert!(parsed.handler.is_none());
        assert_eq!(parsed.namespace.level(), Level::Info);
    }

    #[test]
    fn test_tool_without_subcommands_parses_globals() {
        let descriptor = ToolBuilder::<Example>::new()
            .arg(Arg::new("token").long("token"))
            .build()
            .unwrap();
        let parsed = parse(&descriptor, ["--token", "abc", "-q"]).unwrap();

        assert_eq!(parsed.namespace.subcommand(), "help");
        assert_eq!(parsed.namespace.get_str("token"), Some("abc"));
        assert_eq!(parsed.namespace.level(), Level::Error);
    }

    #[test]
    fn test_global_argument_accepted_on_both_sides() {
        let parsed = parse(&example(), ["--name", "alice", "frob", "x"]).unwrap();
        assert_eq!(parsed.namespace.get_str("name"), Some("alice"));

        let parsed = parse(&example(), ["frob", "x", "--name", "bob"]).unwrap();
        assert_eq!(parsed.namespace.get_str("name"), Some("bob"));

        let parsed = parse(&example(), ["--name", "alice", "frob", "x", "--name", "bob"]).unwrap();
        assert_eq!(parsed.namespace.get_str("name"), Some("bob"));

        let parsed = parse(&example(), ["frob", "x"]).unwrap();
        assert_eq!(parsed.namespace.get_str("name"), Some("anonymous"));
    }

    #[test]
    fn test_repeated_option_keeps_last_value() {
        let parsed = parse(&example(), ["--name", "saved", "--name", "live", "frob", "x"]).unwrap();
        assert_eq!(parsed.namespace.get_str("name"), Some("live"));

        let parsed = parse(&example(), ["display", "x", "--csv", "--csv"]).unwrap();
        assert!(parsed.namespace.get_flag("csv"));
    }

    #[test]
    fn test_no_color_flag_on_either_side() {
        assert!(parse(&example(), ["frob", "x"]).unwrap().namespace.color());
        assert!(!parse(&example(), ["--no-color", "frob", "x"]).unwrap().namespace.color());
        assert!(!parse(&example(), ["frob", "x", "--no-color"]).unwrap().namespace.color());
    }

    #[test]
    fn test_verbosity_steps_in_command_line_order() {
        assert_eq!(level_of(&[]), Level::Warning);
        assert_eq!(level_of(&["-v"]), Level::Info);
        assert_eq!(level_of(&["-v", "-v", "-v"]), Level::Debug);
        assert_eq!(level_of(&["-q", "-q", "-q", "-q", "-v"]), Level::Error);
        assert_eq!(level_of(&["-qqqqq", "-v"]), Level::Error);
        assert_eq!(level_of(&["-vvvq"]), Level::Info);
        assert_eq!(level_of(&["-v=2"]), Level::Debug);
    }

    #[test]
    fn test_verbosity_across_subcommand_boundary() {
        assert_eq!(level_of(&["-v", "frob", "x", "-v"]), Level::Debug);
        assert_eq!(level_of(&["-q", "-q", "-q", "frob", "x", "-v"]), Level::Error);
        assert_eq!(level_of(&["-v", "-v", "-v", "frob", "x", "-q"]), Level::Info);
    }

    #[test]
    fn test_help_lists_subcommands_sorted() {
        let help = build_parser(&example()).render_help().to_string();
        assert!(help.contains("A script that frobs or displays bazzes."));
        assert!(help.contains("be more verbose (stackable)"));

        let listing = &help[help.find("Subcommands:").unwrap()..];
        let display = listing.find("display").unwrap();
        let frob = listing.find("frob").unwrap();
        assert!(display < frob);
    }

    #[test]
    fn test_usage_errors_are_returned() {
        let err = parse(&example(), ["--bogus"]).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);

        let err = parse(&example(), ["--help"]).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);

        let err = parse(&example(), ["unknown"]).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::InvalidSubcommand);
    }
}

//! Running a tool: saved arguments, parsing, logging, then the handler

use crate::{
    cli::{self, Namespace},
    config::ConfigFile,
    core::{
        interrupt,
        registry::{ToolBuilder, ToolDescriptor},
    },
    error::{Result, TermtoolError},
    setup_logging,
};
use std::ffi::OsString;
use tracing::{debug, instrument};

/// A terminal tool whose methods are subcommands
pub trait Termtool: Sized + 'static {
    /// Declare the tool's description, global arguments and subcommands
    fn declare(tool: ToolBuilder<Self>) -> ToolBuilder<Self>;

    /// Called after logging is set up and before the subcommand runs.
    ///
    /// Override to apply the values of the tool's global arguments.
    fn configure(&mut self, args: &Namespace) -> anyhow::Result<()> {
        let _ = args;
        Ok(())
    }
}

/// A tool instance together with its checked definition
pub struct Tool<T> {
    instance: T,
    descriptor: ToolDescriptor<T>,
    config_file: Option<ConfigFile>,
}

impl<T: Termtool> Tool<T> {
    /// Build the tool's definition, rejecting duplicate subcommand names
    pub fn new(instance: T) -> Result<Self> {
        let descriptor = T::declare(ToolBuilder::new()).build()?;
        Ok(Self {
            instance,
            descriptor,
            config_file: None,
        })
    }

    /// Read saved arguments from `config_file` instead of `~/.<toolname>`
    #[must_use]
    pub fn with_config_file(mut self, config_file: ConfigFile) -> Self {
        self.config_file = Some(config_file);
        self
    }

    pub fn descriptor(&self) -> &ToolDescriptor<T> {
        &self.descriptor
    }

    pub fn instance(&self) -> &T {
        &self.instance
    }

    pub fn instance_mut(&mut self) -> &mut T {
        &mut self.instance
    }

    pub fn into_inner(self) -> T {
        self.instance
    }

    /// The file saved arguments are read from and written to
    pub fn config_file(&self) -> Result<ConfigFile> {
        match &self.config_file {
            Some(config_file) => Ok(config_file.clone()),
            None => ConfigFile::for_tool(self.descriptor.name()),
        }
    }

    /// Saved arguments, empty when there is no config file or no home
    /// directory to look for one in
    pub fn read_config_file(&self) -> Result<Vec<String>> {
        let (args, _) = saved_arguments(self.config_file())?;
        Ok(args)
    }

    /// Save arguments to be used on every later run
    pub fn write_config_file<I, S>(&self, args: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.config_file()?.write(args)
    }

    /// Run the subcommand named in `argv` (without the program name).
    ///
    /// Saved arguments are parsed first. Returns 0 when the subcommand
    /// completes and 1 when the user interrupted it, whether or not the
    /// subcommand noticed; any other error from the subcommand is returned
    /// as is. Usage errors and `--help` end the process from inside the
    /// parser.
    #[instrument(skip_all, fields(tool = self.descriptor.name()))]
    pub fn main<I, S>(&mut self, argv: I) -> anyhow::Result<i32>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        interrupt::reset();

        let (saved, config_file) = saved_arguments(self.config_file())?;
        let mut args: Vec<OsString> = saved.into_iter().map(OsString::from).collect();
        debug!("Prepending {} saved argument(s)", args.len());
        args.extend(argv.into_iter().map(Into::into));

        let parsed = match cli::parse(&self.descriptor, args) {
            Ok(parsed) => parsed,
            Err(err) => err.exit(),
        };
        let namespace = match config_file {
            Some(config_file) => parsed.namespace.with_config_file(config_file),
            None => parsed.namespace,
        };

        setup_logging(
            namespace.level(),
            namespace.color(),
            self.descriptor.log_format(),
        )?;
        self.instance.configure(&namespace)?;

        let Some(handler) = parsed.handler else {
            cli::build_parser(&self.descriptor).print_long_help()?;
            return Ok(0);
        };

        debug!("Running subcommand `{}`", namespace.subcommand());
        let result = handler(&mut self.instance, &namespace);
        let interrupted = interrupt::take();
        match result {
            Err(err) if !interrupted && !interrupt::is_interrupt(&err) => Err(err),
            Err(err) => {
                debug!("Subcommand `{}` interrupted: {}", namespace.subcommand(), err);
                Ok(interrupt::EXIT_CODE)
            }
            Ok(()) if interrupted => {
                debug!("Subcommand `{}` interrupted", namespace.subcommand());
                Ok(interrupt::EXIT_CODE)
            }
            Ok(()) => Ok(0),
        }
    }

    /// Run with the process's arguments, catching Ctrl-C
    pub fn run(&mut self) -> anyhow::Result<i32> {
        interrupt::install_handler();
        self.main(std::env::args_os().skip(1))
    }
}

/// Saved arguments and the file they came from.
///
/// Without a home directory there is nothing to read, so the run goes on
/// with no saved arguments and no file to write them to.
fn saved_arguments(config_file: Result<ConfigFile>) -> Result<(Vec<String>, Option<ConfigFile>)> {
    match config_file {
        Ok(config_file) => Ok((config_file.read()?, Some(config_file))),
        Err(TermtoolError::HomeDirectory { tool }) => {
            debug!("No home directory, running `{}` without saved arguments", tool);
            Ok((Vec::new(), None))
        }
        Err(err) => Err(err),
    }
}

//! # termtool
//!
//! Declarative subcommand-based terminal tools. A tool is a type whose
//! methods become subcommands; the framework assembles the argument parser,
//! prepends arguments saved in the tool's config file, sets up logging from
//! `-v`/`-q`, and calls the selected method.
//!
//! ## Features
//!
//! - Subcommands listed alphabetically, each with its own arguments
//! - Global arguments accepted before or after the subcommand name
//! - Stackable `-v`/`-q` over a five-level scale, colored log lines on a terminal
//! - Saved arguments in an owner-only `~/.<toolname>` file
//! - Table and progress bar helpers for subcommand output
//!
//! ## Example
//!
//! ```no_run
//! use termtool::{Arg, Namespace, Termtool, Tool, ToolBuilder, subcommand};
//!
//! struct Example;
//!
//! impl Example {
//!     fn frob(&mut self, args: &Namespace) -> anyhow::Result<()> {
//!         tracing::info!("frobbing {}", args.get_str("baz").unwrap_or_default());
//!         Ok(())
//!     }
//! }
//!
//! impl Termtool for Example {
//!     fn declare(tool: ToolBuilder<Self>) -> ToolBuilder<Self> {
//!         tool.description("A script that frobs bazzes.").subcommand(
//!             subcommand!(Example::frob)
//!                 .help("frob a baz")
//!                 .arg(Arg::new("baz").help("the baz to frob")),
//!         )
//!     }
//! }
//!
//! let code = Tool::new(Example)?.run()?;
//! std::process::exit(code);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod utils;

pub use crate::cli::Namespace;
pub use crate::config::ConfigFile;
pub use crate::core::{
    CommandSpec, Handler, Interrupted, Level, Subcommand, Termtool, Tool, ToolBuilder,
    ToolDescriptor, interrupt,
};
pub use crate::error::{Result, TermtoolError};
pub use crate::logging::{LogFormat, setup_logging, setup_logging_with_writer};
pub use crate::utils::{ProgressBar, Table};
pub use clap::{Arg, ArgAction, value_parser};

#[doc(hidden)]
pub use tracing as __tracing;

//! Core functionality for declaring and running tools
//!
//! Contains subcommand declarations, the sorted registry, the verbosity
//! scale and the dispatcher.

pub mod command;
pub mod dispatcher;
pub mod interrupt;
pub mod registry;
pub mod verbosity;

pub use command::{CommandSpec, Handler, Subcommand};
pub use dispatcher::{Termtool, Tool};
pub use interrupt::Interrupted;
pub use registry::{ToolBuilder, ToolDescriptor};
pub use verbosity::{Level, Step};

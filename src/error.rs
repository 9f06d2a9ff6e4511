//! Error types for tool definition and the framework's own I/O
//!
//! Usage errors never show up here: the argument parser reports them and
//! terminates the process itself.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the terminal tool framework
#[derive(Error, Debug)]
pub enum TermtoolError {
    /// Two subcommands resolved to the same name
    #[error("Subcommand `{name}` is declared more than once")]
    DuplicateSubcommand { name: String },

    /// A subcommand used a name the parser keeps for itself
    #[error("Subcommand name `{name}` is reserved")]
    ReservedSubcommand { name: String },

    /// An argument id used twice within one parser level
    #[error("Argument `{argument}` of `{scope}` clashes with a global argument")]
    ArgumentConflict { scope: String, argument: String },

    /// The user's home directory could not be determined
    #[error("Could not determine the home directory for the config file of `{tool}`")]
    HomeDirectory { tool: String },

    /// Config file operation errors
    #[error("Config file error: {operation} failed on {path}")]
    ConfigFile {
        operation: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An argument that cannot be stored one-per-line
    #[error("Config argument {argument:?} contains a line break")]
    InvalidConfigArgument { argument: String },

    /// Logging could not be installed
    #[error("Logging error: {message}")]
    Logging { message: String },

    /// A table row whose width does not match the header
    #[error("Table row has {actual} columns, expected {expected}")]
    TableRow { expected: usize, actual: usize },
}

impl TermtoolError {
    /// Create a new duplicate subcommand error
    pub fn duplicate_subcommand(name: impl Into<String>) -> Self {
        Self::DuplicateSubcommand { name: name.into() }
    }

    /// Create a new reserved subcommand error
    pub fn reserved_subcommand(name: impl Into<String>) -> Self {
        Self::ReservedSubcommand { name: name.into() }
    }

    /// Create a new argument conflict error
    pub fn argument_conflict(scope: impl Into<String>, argument: impl Into<String>) -> Self {
        Self::ArgumentConflict {
            scope: scope.into(),
            argument: argument.into(),
        }
    }

    /// Create a new home directory error
    pub fn home_directory(tool: impl Into<String>) -> Self {
        Self::HomeDirectory { tool: tool.into() }
    }

    /// Create a new config file error
    pub fn config_file<P: Into<PathBuf>>(
        operation: impl Into<String>,
        path: P,
        source: std::io::Error,
    ) -> Self {
        Self::ConfigFile {
            operation: operation.into(),
            path: path.into(),
            source,
        }
    }

    /// Create a new invalid config argument error
    pub fn invalid_config_argument(argument: impl Into<String>) -> Self {
        Self::InvalidConfigArgument {
            argument: argument.into(),
        }
    }

    /// Create a new logging error
    pub fn logging(message: impl Into<String>) -> Self {
        Self::Logging {
            message: message.into(),
        }
    }

    /// Create a new table row error
    pub fn table_row(expected: usize, actual: usize) -> Self {
        Self::TableRow { expected, actual }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, TermtoolError>;

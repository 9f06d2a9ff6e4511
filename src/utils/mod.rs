//! Utility modules for common functionality
//!
//! Provides table and progress output for subcommands, and the owner-only
//! file handling behind the config file.

pub mod fs;
pub mod progress;
pub mod table;

pub use fs::FileSystemUtils;
pub use progress::ProgressBar;
pub use table::Table;

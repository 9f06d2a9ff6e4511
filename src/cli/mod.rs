//! Command-line interface module
//!
//! Builds the argument parser from a tool definition and exposes the parsed
//! arguments to handlers.

pub mod namespace;
pub mod parser;

pub use namespace::Namespace;
pub use parser::{ParsedInvocation, build_parser, parse};

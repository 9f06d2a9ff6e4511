//! Subcommand declarations
//!
//! A subcommand pairs a [`CommandSpec`] with the handler to call and the
//! arguments only that subcommand accepts.

use crate::cli::Namespace;
use clap::Arg;

/// Function invoked when its subcommand is selected
pub type Handler<T> = fn(&mut T, &Namespace) -> anyhow::Result<()>;

/// Name and help texts of a subcommand
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// Name the user types
    pub name: String,
    /// One-line summary shown in the subcommand list
    pub help: Option<String>,
    /// Long description shown by the subcommand's own `--help`
    pub description: Option<String>,
    /// Handler documentation, used when no description is set
    pub doc: Option<String>,
    /// Alternative names accepted on the command line
    pub aliases: Vec<String>,
    /// Text printed after the argument list in `--help`
    pub epilog: Option<String>,
}

impl CommandSpec {
    /// Create a command entry with only a name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            help: None,
            description: None,
            doc: None,
            aliases: Vec::new(),
            epilog: None,
        }
    }

    /// Description for the subcommand's help page; an explicit
    /// description wins over the handler documentation
    pub fn effective_description(&self) -> Option<&str> {
        self.description.as_deref().or(self.doc.as_deref())
    }
}

/// A subcommand declaration: metadata, handler and its own arguments
pub struct Subcommand<T> {
    pub(crate) spec: CommandSpec,
    pub(crate) arguments: Vec<Arg>,
    pub(crate) handler: Handler<T>,
}

impl<T> Subcommand<T> {
    /// Declare a subcommand called `name`.
    ///
    /// The [`subcommand!`](crate::subcommand) macro fills `name` in from the
    /// handler's method name.
    pub fn new(name: impl Into<String>, handler: Handler<T>) -> Self {
        Self {
            spec: CommandSpec::new(name),
            arguments: Vec::new(),
            handler,
        }
    }

    /// Override the name the user types
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.spec.name = name.into();
        self
    }

    #[must_use]
    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.spec.help = Some(help.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.spec.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.spec.doc = Some(doc.into());
        self
    }

    #[must_use]
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.spec.aliases.push(alias.into());
        self
    }

    #[must_use]
    pub fn epilog(mut self, epilog: impl Into<String>) -> Self {
        self.spec.epilog = Some(epilog.into());
        self
    }

    /// Add an argument; arguments keep the order they are added in
    #[must_use]
    pub fn arg(mut self, arg: Arg) -> Self {
        self.arguments.push(arg);
        self
    }

    /// The subcommand's name and help texts
    pub fn spec(&self) -> &CommandSpec {
        &self.spec
    }

    /// The subcommand's own arguments, in declaration order
    pub fn arguments(&self) -> &[Arg] {
        &self.arguments
    }

    /// The function called when this subcommand is selected
    pub fn handler(&self) -> Handler<T> {
        self.handler
    }
}

impl<T> std::fmt::Debug for Subcommand<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subcommand")
            .field("spec", &self.spec)
            .field("arguments", &self.arguments.len())
            .finish_non_exhaustive()
    }
}

/// Declare a subcommand named after a handler method.
///
/// ```ignore
/// tool.subcommand(subcommand!(Example::frob).help("frob a baz"))
/// ```
#[macro_export]
macro_rules! subcommand {
    ($tool:ident :: $method:ident) => {
        $crate::Subcommand::new(stringify!($method), $tool::$method)
    };
}

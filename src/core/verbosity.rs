//! The five-step verbosity scale driven by `-v` and `-q`

use std::fmt;
use tracing::level_filters::LevelFilter;

/// A log threshold, ordered from least to most verbose
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Level {
    Critical,
    Error,
    #[default]
    Warning,
    Info,
    Debug,
}

/// One `-v` (`More`) or `-q` (`Less`) occurrence on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    More,
    Less,
}

impl Level {
    /// Every level, least verbose first
    pub const ALL: [Self; 5] = [
        Self::Critical,
        Self::Error,
        Self::Warning,
        Self::Info,
        Self::Debug,
    ];

    /// Upper-case name used in log lines
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Critical => "CRITICAL",
            Self::Error => "ERROR",
            Self::Warning => "WARNING",
            Self::Info => "INFO",
            Self::Debug => "DEBUG",
        }
    }

    fn index(self) -> usize {
        self as usize
    }

    /// One step toward `Debug`, staying at `Debug`
    #[must_use]
    pub fn more_verbose(self) -> Self {
        Self::ALL[(self.index() + 1).min(Self::ALL.len() - 1)]
    }

    /// One step toward `Critical`, staying at `Critical`
    #[must_use]
    pub fn less_verbose(self) -> Self {
        Self::ALL[self.index().saturating_sub(1)]
    }

    /// Apply a single occurrence
    #[must_use]
    pub fn step(self, step: Step) -> Self {
        match step {
            Step::More => self.more_verbose(),
            Step::Less => self.less_verbose(),
        }
    }

    /// Walk from the default level through `steps` in the order given.
    ///
    /// Each step clamps on its own, so `-q -q -q -v` ends at `Error`
    /// rather than at the sum of the offsets.
    pub fn resolve<I: IntoIterator<Item = Step>>(steps: I) -> Self {
        steps
            .into_iter()
            .fold(Self::default(), |level, step| level.step(step))
    }

    /// The tracing filter letting this level's records through.
    ///
    /// tracing has no critical level: `Critical` opens the filter at
    /// `ERROR` and the threshold layer narrows it to tagged records.
    #[must_use]
    pub const fn as_filter(self) -> LevelFilter {
        match self {
            Self::Critical | Self::Error => LevelFilter::ERROR,
            Self::Warning => LevelFilter::WARN,
            Self::Info => LevelFilter::INFO,
            Self::Debug => LevelFilter::DEBUG,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

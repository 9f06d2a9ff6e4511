//! Log output to standard error
//!
//! Lines are rendered from a [`LogFormat`] template. With color on, the
//! level name is wrapped in an ANSI color chosen by level; with color off,
//! ANSI sequences are stripped from the whole line.
//!
//! tracing has no critical level, so critical records are error records
//! carrying a `critical` field; use the [`critical!`](crate::critical) macro.

use crate::{
    core::verbosity::Level,
    error::{Result, TermtoolError},
};
use is_terminal::IsTerminal;
use regex::Regex;
use std::fmt::{self, Write as _};
use std::sync::{Arc, Mutex, RwLock};
use tracing::{Event, Metadata, Subscriber, field::Field, field::Visit, info};
use tracing_subscriber::{
    Layer, Registry,
    fmt::{FmtContext, FormatEvent, FormatFields, MakeWriter, format::Writer},
    layer::{Context, SubscriberExt},
    registry::LookupSpan,
    reload,
    util::SubscriberInitExt,
};

/// Field marking an error record as critical
pub const CRITICAL_FIELD: &str = "critical";

const RESET: &str = "\x1b[0m";

/// Emit a critical record: an error tagged with `critical = true`
#[macro_export]
macro_rules! critical {
    ($($arg:tt)+) => {
        $crate::__tracing::error!(critical = true, $($arg)+)
    };
}

/// Template for one log line.
///
/// Placeholders: `{levelcolor}`, `{levelname}`, `{resetcolor}`, `{target}`
/// and `{message}`. The color placeholders are empty when color is off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFormat {
    template: String,
}

impl LogFormat {
    pub const DEFAULT_TEMPLATE: &'static str = "{levelcolor}{levelname}{resetcolor} {message}";

    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    fn render(&self, level: Level, target: &str, message: &str, color: bool) -> String {
        let (level_color, reset_color) = if color {
            (format!("\x1b[1;{}m", color_code(level)), RESET)
        } else {
            (String::new(), "")
        };

        self.template
            .replace("{levelcolor}", &level_color)
            .replace("{levelname}", level.name())
            .replace("{resetcolor}", reset_color)
            .replace("{target}", target)
            .replace("{message}", message)
    }
}

impl Default for LogFormat {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TEMPLATE)
    }
}

/// ANSI color number for a level
fn color_code(level: Level) -> &'static str {
    match level {
        Level::Debug => "32",    // green
        Level::Info => "37",     // white
        Level::Warning => "33",  // yellow
        Level::Error => "31",    // red
        Level::Critical => "35", // magenta
    }
}

fn is_critical(metadata: &Metadata<'_>) -> bool {
    metadata.fields().field(CRITICAL_FIELD).is_some()
}

/// Scale level of a tracing record
fn record_level(metadata: &Metadata<'_>) -> Level {
    match *metadata.level() {
        tracing::Level::ERROR if is_critical(metadata) => Level::Critical,
        tracing::Level::ERROR => Level::Error,
        tracing::Level::WARN => Level::Warning,
        tracing::Level::INFO => Level::Info,
        _ => Level::Debug,
    }
}

/// Drops records below the configured level
#[derive(Debug, Clone, Copy)]
struct Threshold(Level);

impl Threshold {
    fn admits(self, metadata: &Metadata<'_>) -> bool {
        match self.0 {
            Level::Critical => *metadata.level() == tracing::Level::ERROR && is_critical(metadata),
            level => level.as_filter() >= *metadata.level(),
        }
    }
}

impl<S: Subscriber> Layer<S> for Threshold {
    fn enabled(&self, metadata: &Metadata<'_>, _ctx: Context<'_, S>) -> bool {
        self.admits(metadata)
    }

    fn max_level_hint(&self) -> Option<tracing::level_filters::LevelFilter> {
        Some(self.0.as_filter())
    }
}

/// Settings the formatter reads on every record
#[derive(Debug)]
struct Style {
    format: LogFormat,
    color: bool,
}

/// Renders events through the shared [`Style`]
struct LineFormatter {
    style: Arc<RwLock<Style>>,
    ansi: Regex,
}

impl LineFormatter {
    fn new(style: Arc<RwLock<Style>>) -> Result<Self> {
        let ansi = Regex::new(r"\x1b\[[^m]+m")
            .map_err(|e| TermtoolError::logging(format!("Failed to compile regex: {e}")))?;
        Ok(Self { style, ansi })
    }

    fn line(&self, metadata: &Metadata<'_>, message: &str) -> String {
        let level = record_level(metadata);
        let Ok(style) = self.style.read() else {
            return format!("{} {message}", level.name());
        };

        let line = style
            .format
            .render(level, metadata.target(), message, style.color);
        if style.color {
            line
        } else {
            self.ansi.replace_all(&line, "").into_owned()
        }
    }
}

impl<S, N> FormatEvent<S, N> for LineFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        writeln!(writer, "{}", self.line(event.metadata(), &visitor.finish()))
    }
}

/// Collects the message and any extra fields of an event
#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: Vec<String>,
}

impl MessageVisitor {
    fn finish(self) -> String {
        if self.fields.is_empty() {
            self.message
        } else {
            format!("{} {}", self.message, self.fields.join(" "))
        }
    }
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "message" => self.message = value.to_string(),
            CRITICAL_FIELD => {}
            name => self.fields.push(format!("{name}={value}")),
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        match field.name() {
            "message" => self.message = format!("{value:?}"),
            CRITICAL_FIELD => {}
            name => self.fields.push(format!("{name}={value:?}")),
        }
    }
}

/// Handles to the installed subscriber's adjustable parts
struct Installed {
    threshold: reload::Handle<Threshold, Registry>,
    style: Arc<RwLock<Style>>,
}

static INSTALLED: Mutex<Option<Installed>> = Mutex::new(None);

/// Build a subscriber writing to `writer`, plus the handle to its threshold
fn build_subscriber<W>(
    level: Level,
    style: Arc<RwLock<Style>>,
    writer: W,
) -> Result<(
    impl Subscriber + Send + Sync + 'static,
    reload::Handle<Threshold, Registry>,
)>
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let (threshold, handle) = reload::Layer::new(Threshold(level));
    let subscriber = tracing_subscriber::registry().with(threshold).with(
        tracing_subscriber::fmt::layer()
            .with_writer(writer)
            .event_format(LineFormatter::new(style)?),
    );
    Ok((subscriber, handle))
}

/// Send log records at `level` and above to standard error.
///
/// Color is used only when `color` is set and standard error is a
/// terminal. The first call installs the process-wide subscriber; later
/// calls adjust it in place. Announces the level with an info record.
pub fn setup_logging(level: Level, color: bool, format: &LogFormat) -> Result<()> {
    let color = color && std::io::stderr().is_terminal();
    setup_logging_with_writer(level, color, format, std::io::stderr)
}

/// Like [`setup_logging`], writing to `writer` and taking `color` as given.
///
/// The writer is fixed by the call that installs the subscriber; later
/// calls change the level, color and format of that same subscriber, so
/// each record is still written once.
pub fn setup_logging_with_writer<W>(
    level: Level,
    color: bool,
    format: &LogFormat,
    writer: W,
) -> Result<()>
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    {
        let mut installed = INSTALLED
            .lock()
            .map_err(|_| TermtoolError::logging("Logging state lock poisoned"))?;

        match installed.as_ref() {
            Some(current) => {
                current
                    .threshold
                    .reload(Threshold(level))
                    .map_err(|e| TermtoolError::logging(format!("Failed to set log level: {e}")))?;
                let mut style = current
                    .style
                    .write()
                    .map_err(|_| TermtoolError::logging("Log style lock poisoned"))?;
                style.format = format.clone();
                style.color = color;
            }
            None => {
                let style = Arc::new(RwLock::new(Style {
                    format: format.clone(),
                    color,
                }));
                let (subscriber, threshold) = build_subscriber(level, Arc::clone(&style), writer)?;
                subscriber
                    .try_init()
                    .map_err(|e| TermtoolError::logging(format!("Failed to initialize logging: {e}")))?;
                *installed = Some(Installed { threshold, style });
            }
        }
    }

    info!("Set log level to {}", level);
    Ok(())
}

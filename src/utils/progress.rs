//! Progress bar for long-running subcommands
//!
//! Draws a single line, redrawn in place with a carriage return. The
//! standard error bar stays silent when standard error is not a terminal.

use is_terminal::IsTerminal;
use std::io::{self, Stderr, Write};

const DEFAULT_WIDTH: usize = 40;

/// A fixed-total progress bar
#[derive(Debug)]
pub struct ProgressBar<W: Write> {
    writer: W,
    total: u64,
    position: u64,
    width: usize,
    visible: bool,
}

impl ProgressBar<Stderr> {
    /// A bar on standard error, drawn only on a terminal
    pub fn new(total: u64) -> Self {
        let stderr = io::stderr();
        let visible = stderr.is_terminal();
        let mut bar = Self::with_writer(total, stderr);
        bar.visible = visible;
        bar
    }
}

impl<W: Write> ProgressBar<W> {
    /// A bar that always draws to `writer`
    pub fn with_writer(total: u64, writer: W) -> Self {
        Self {
            writer,
            total,
            position: 0,
            width: DEFAULT_WIDTH,
            visible: true,
        }
    }

    /// Set the number of cells between the brackets
    #[must_use]
    pub fn width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    pub fn position(&self) -> u64 {
        self.position
    }

    /// Advance by `delta`, stopping at the total
    pub fn inc(&mut self, delta: u64) -> io::Result<()> {
        self.set_position(self.position.saturating_add(delta))
    }

    pub fn set_position(&mut self, position: u64) -> io::Result<()> {
        self.position = position.min(self.total);
        self.draw()
    }

    /// Fill the bar and end its line
    pub fn finish(mut self) -> io::Result<W> {
        self.position = self.total;
        self.draw()?;
        if self.visible {
            writeln!(self.writer)?;
            self.writer.flush()?;
        }
        Ok(self.writer)
    }

    fn draw(&mut self) -> io::Result<()> {
        if !self.visible {
            return Ok(());
        }
        write!(self.writer, "\r{}", render(self.position, self.total, self.width))?;
        self.writer.flush()
    }
}

/// One frame of the bar, e.g. `[#####-----]  50% (5/10)`
fn render(position: u64, total: u64, width: usize) -> String {
    let fraction = if total == 0 {
        1.0
    } else {
        position.min(total) as f64 / total as f64
    };
    let filled = ((fraction * width as f64).round() as usize).min(width);
    format!(
        "[{}{}] {:>3}% ({position}/{total})",
        "#".repeat(filled),
        "-".repeat(width - filled),
        (fraction * 100.0).floor() as u64,
    )
}

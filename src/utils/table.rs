//! Plain text tables for subcommand output

use crate::error::{Result, TermtoolError};
use comfy_table::{CellAlignment, ContentArrangement, presets::NOTHING};
use std::fmt;

/// Space between adjacent columns
const COLUMN_GAP: u16 = 2;

/// Left-aligned columns separated by two spaces, header row first
#[derive(Debug, Clone)]
pub struct Table {
    inner: comfy_table::Table,
    columns: usize,
    rows: usize,
}

impl Table {
    /// Create a table with the given column labels
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        let columns = labels.len();

        let mut inner = comfy_table::Table::new();
        inner
            .load_preset(NOTHING)
            .set_content_arrangement(ContentArrangement::Disabled)
            .set_header(labels);

        for (i, column) in inner.column_iter_mut().enumerate() {
            let right = if i + 1 == columns { 0 } else { COLUMN_GAP };
            column.set_padding((0, right));
            column.set_cell_alignment(CellAlignment::Left);
        }

        Self {
            inner,
            columns,
            rows: 0,
        }
    }

    /// Append a row; it must have one value per column
    pub fn add_row<I, S>(&mut self, values: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let row: Vec<String> = values.into_iter().map(Into::into).collect();
        if row.len() != self.columns {
            return Err(TermtoolError::table_row(self.columns, row.len()));
        }
        self.inner.add_row(row);
        self.rows += 1;
        Ok(())
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Number of rows below the header
    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Cells are padded to the column width, including the last one.
        for (n, line) in self.inner.lines().enumerate() {
            if n > 0 {
                writeln!(f)?;
            }
            f.write_str(line.trim_end())?;
        }
        Ok(())
    }
}

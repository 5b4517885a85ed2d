//! Column-aligned tables.

use std::io::{self, Write};

use serde_json::{Map, Value};

/// Spaces between columns.
const PADDING: usize = 2;

/// A table of string cells under a header row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    /// Column headers.
    pub headers: Vec<String>,
    /// Data rows; short rows are padded with empty cells.
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Creates an empty table with the given headers.
    #[must_use]
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Appends a row.
    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    /// True when the table has no data rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn column_widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                let len = cell.chars().count();
                match widths.get_mut(i) {
                    Some(w) => *w = (*w).max(len),
                    None => widths.push(len),
                }
            }
        }
        widths
    }

    /// Writes the headers and a dash separator (skipped when there are no
    /// headers), then the rows, aligned.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn render<W: Write>(&self, w: &mut W) -> io::Result<()> {
        let widths = self.column_widths();
        let separator: Vec<String> = self
            .headers
            .iter()
            .map(|h| "-".repeat(h.chars().count()))
            .collect();

        if !self.headers.is_empty() {
            write_line(w, &self.headers, &widths)?;
            write_line(w, &separator, &widths)?;
        }
        for row in &self.rows {
            write_line(w, row, &widths)?;
        }
        Ok(())
    }

    /// The data rows without headers.
    #[must_use]
    pub fn to_plain(&self) -> Vec<Vec<String>> {
        self.rows.clone()
    }

    /// One `header -> cell` object per row.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let rows = self
            .rows
            .iter()
            .map(|row| {
                let object: Map<String, Value> = self
                    .headers
                    .iter()
                    .enumerate()
                    .map(|(i, h)| {
                        let cell = row.get(i).cloned().unwrap_or_default();
                        (h.clone(), Value::String(cell))
                    })
                    .collect();
                Value::Object(object)
            })
            .collect();
        Value::Array(rows)
    }
}

fn write_line<W: Write>(w: &mut W, cells: &[String], widths: &[usize]) -> io::Result<()> {
    let columns = widths.len().max(cells.len());
    let mut line = String::new();
    for i in 0..columns {
        let cell = cells.get(i).map_or("", String::as_str);
        line.push_str(cell);
        if i + 1 < columns {
            let width = widths.get(i).copied().unwrap_or_default();
            let fill = width.saturating_sub(cell.chars().count()) + PADDING;
            line.extend(std::iter::repeat_n(' ', fill));
        }
    }
    writeln!(w, "{}", line.trim_end())
}

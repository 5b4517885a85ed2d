//! Output formatting: aligned tables, pretty JSON, or tab-separated text.

mod table;

pub use table::Table;

use std::io::{self, Write};

use serde::Serialize;
use serde_json::Value;

/// Output format selected by the global flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Format {
    /// Aligned columns for humans.
    #[default]
    Table,
    /// Pretty-printed JSON.
    Json,
    /// Tab-separated rows for scripts.
    Plain,
}

impl Format {
    /// Parses a format name; unknown names fall back to [`Format::Table`].
    #[must_use]
    pub fn parse(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "json" => Self::Json,
            "plain" => Self::Plain,
            _ => Self::Table,
        }
    }

    /// Picks the format from `--json` and `--plain`; `--json` wins.
    #[must_use]
    pub const fn from_flags(json: bool, plain: bool) -> Self {
        if json {
            Self::Json
        } else if plain {
            Self::Plain
        } else {
            Self::Table
        }
    }
}

/// Something a command wants printed.
#[derive(Debug, Clone)]
pub enum Content<'a> {
    /// Several rows of cells.
    Rows(&'a [Vec<String>]),
    /// A single row of cells.
    Row(&'a [String]),
    /// Free text.
    Text(&'a str),
    /// A table with headers.
    Table(&'a Table),
    /// Any serializable value.
    Value(Value),
}

impl Content<'_> {
    /// Wraps a serializable value.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` cannot be represented as JSON.
    pub fn value<T: Serialize>(value: &T) -> serde_json::Result<Self> {
        serde_json::to_value(value).map(Content::Value)
    }

    fn to_json(&self) -> Value {
        match self {
            Self::Rows(rows) => serde_json::json!(rows),
            Self::Row(row) => serde_json::json!(row),
            Self::Text(text) => Value::String((*text).to_string()),
            Self::Table(table) => table.to_json(),
            Self::Value(value) => value.clone(),
        }
    }
}

/// Writes [`Content`] to `W` in one [`Format`].
#[derive(Debug)]
pub struct Formatter<W> {
    format: Format,
    writer: W,
}

impl<W: Write> Formatter<W> {
    /// Creates a formatter writing to `writer`.
    pub const fn new(format: Format, writer: W) -> Self {
        Self { format, writer }
    }

    /// The selected format.
    pub const fn format(&self) -> Format {
        self.format
    }

    /// Prints `content` in the selected format.
    ///
    /// # Errors
    ///
    /// Returns an error if writing or JSON encoding fails.
    pub fn print(&mut self, content: &Content<'_>) -> io::Result<()> {
        match self.format {
            Format::Json => self.print_json(&content.to_json()),
            Format::Plain => self.print_plain(content),
            Format::Table => self.print_display(content),
        }
    }

    /// Prints any serializable value.
    ///
    /// # Errors
    ///
    /// Returns an error if writing or JSON encoding fails.
    pub fn print_value<T: Serialize>(&mut self, value: &T) -> io::Result<()> {
        self.print(&Content::value(value)?)
    }

    /// Prints one line of text regardless of format.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn line(&mut self, text: impl AsRef<str>) -> io::Result<()> {
        writeln!(self.writer, "{}", text.as_ref())
    }

    fn print_json(&mut self, value: &Value) -> io::Result<()> {
        serde_json::to_writer_pretty(&mut self.writer, value)?;
        writeln!(self.writer)
    }

    fn print_plain(&mut self, content: &Content<'_>) -> io::Result<()> {
        match content {
            Content::Rows(rows) => write_rows(&mut self.writer, rows),
            Content::Table(table) => write_rows(&mut self.writer, &table.rows),
            Content::Row(row) => writeln!(self.writer, "{}", row.join("\t")),
            Content::Text(text) => writeln!(self.writer, "{text}"),
            Content::Value(value) => self.print_json(value),
        }
    }

    fn print_display(&mut self, content: &Content<'_>) -> io::Result<()> {
        match content {
            Content::Table(table) => table.render(&mut self.writer),
            Content::Rows(rows) => {
                for row in *rows {
                    writeln!(self.writer, "{}", row.join(" "))?;
                }
                Ok(())
            }
            Content::Row(row) => writeln!(self.writer, "{}", row.join(" ")),
            Content::Text(text) => writeln!(self.writer, "{text}"),
            Content::Value(value) => writeln!(self.writer, "{value}"),
        }
    }

    /// Consumes the formatter and returns the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn write_rows<W: Write>(w: &mut W, rows: &[Vec<String>]) -> io::Result<()> {
    for row in rows {
        writeln!(w, "{}", row.join("\t"))?;
    }
    Ok(())
}

/// Prints `table` to `w`: rendered, as tab-separated rows, or as JSON objects.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn print_table<W: Write>(format: Format, table: &Table, w: W) -> io::Result<()> {
    Formatter::new(format, w).print(&Content::Table(table))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn output(format: Format, content: &Content<'_>) -> String {
        let mut f = Formatter::new(format, Vec::new());
        f.print(content).unwrap();
        String::from_utf8(f.into_inner()).unwrap()
    }

    #[test]
    fn test_format_parse() {
        assert_eq!(Format::parse("json"), Format::Json);
        assert_eq!(Format::parse("PLAIN"), Format::Plain);
        assert_eq!(Format::parse("table"), Format::Table);
        assert_eq!(Format::parse("yaml"), Format::Table);
    }

    #[test]
    fn test_format_from_flags() {
        assert_eq!(Format::from_flags(true, true), Format::Json);
        assert_eq!(Format::from_flags(false, true), Format::Plain);
        assert_eq!(Format::from_flags(false, false), Format::Table);
    }

    #[test]
    fn test_json_is_pretty_with_newline() {
        let out = output(
            Format::Json,
            &Content::value(&serde_json::json!({"a": 1})).unwrap(),
        );
        assert_eq!(out, "{\n  \"a\": 1\n}\n");
    }

    #[test]
    fn test_plain_rows_and_text() {
        let rows = vec![
            vec!["a".to_string(), "b".to_string()],
            vec!["c".to_string(), "d".to_string()],
        ];
        assert_eq!(output(Format::Plain, &Content::Rows(&rows)), "a\tb\nc\td\n");
        assert_eq!(output(Format::Plain, &Content::Row(&rows[0])), "a\tb\n");
        assert_eq!(output(Format::Plain, &Content::Text("as-is")), "as-is\n");
    }

    #[test]
    fn test_plain_falls_back_to_json() {
        let out = output(
            Format::Plain,
            &Content::value(&serde_json::json!(["x"])).unwrap(),
        );
        assert_eq!(out, "[\n  \"x\"\n]\n");
    }

    #[test]
    fn test_table_format_prints_display_text() {
        assert_eq!(output(Format::Table, &Content::Text("hello")), "hello\n");
    }

    #[test]
    fn test_print_table_dispatch() {
        let mut table = Table::new(["ID", "NAME"]);
        table.push_row(vec!["1".into(), "Inbox".into()]);

        let mut out = Vec::new();
        print_table(Format::Plain, &table, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "1\tInbox\n");

        let mut out = Vec::new();
        print_table(Format::Json, &table, &mut out).unwrap();
        let json: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(json[0]["NAME"], "Inbox");

        let mut out = Vec::new();
        print_table(Format::Table, &table, &mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().starts_with("ID  NAME\n--  ----\n"));
    }
}

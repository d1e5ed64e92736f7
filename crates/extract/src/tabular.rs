//! Header-driven tokenizer for tab-separated tables.
//!
//! The first non-blank line of the input names the columns; every following
//! non-blank line becomes a [`Row`]. Nothing is coerced or validated here
//! beyond splitting on tabs: deciding whether a row is *usable* is the job of
//! the domain parser that consumes it.

use crate::error::{ErrorKind, Result};
use memchr::memchr_iter;
use std::collections::HashMap;
use std::str::{FromStr, Lines};

const BYTE_ORDER_MARK: char = '\u{feff}';

/// A parsed tab-separated table, borrowing from the source text.
#[derive(Debug, Clone)]
pub struct Table<'a> {
    columns: Vec<&'a str>,
    index: HashMap<&'a str, usize>,
    body: &'a str,
}

impl<'a> Table<'a> {
    /// Split off the header line. Empty input, or input with only blank
    /// lines, produces a table without columns (and therefore without rows).
    pub fn parse(text: &'a str) -> Self {
        let text = text.strip_prefix(BYTE_ORDER_MARK).unwrap_or(text);
        let mut offset = 0;
        for line in text.split_inclusive('\n') {
            offset += line.len();
            let line = trim_line_ending(line);
            if is_blank(line) {
                continue;
            }
            let columns: Vec<&str> = split_fields(line).collect();
            let mut index = HashMap::with_capacity(columns.len());
            for (position, column) in columns.iter().enumerate() {
                // Duplicate column names exist in the wild; the first one wins.
                index.entry(*column).or_insert(position);
            }
            return Self {
                columns,
                index,
                body: &text[offset..],
            };
        }
        Self {
            columns: Vec::new(),
            index: HashMap::new(),
            body: "",
        }
    }

    /// Column names in header order.
    pub fn columns(&self) -> &[&'a str] {
        &self.columns
    }

    pub fn has_header(&self) -> bool {
        !self.columns.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.index.contains_key(column)
    }

    /// Ensure the header exists and names every column in `columns`.
    ///
    /// This is the only structural failure a table can produce; callers decide
    /// whether a table without, say, a `code` column is fatal.
    pub fn require(&self, table: &'static str, columns: &[&'static str]) -> Result<()> {
        for column in columns {
            if !self.has_column(column) {
                exn::bail!(ErrorKind::MissingColumn { table, column });
            }
        }
        Ok(())
    }

    /// Iterate the data rows in file order.
    ///
    /// Each call starts again from the first data line.
    pub fn rows(&self) -> Rows<'_> {
        Rows {
            table: self,
            lines: self.body.lines(),
        }
    }

    fn position(&self, column: &str) -> Option<usize> {
        self.index.get(column).copied()
    }
}

/// Lazy iterator over the data rows of a [`Table`].
#[derive(Debug, Clone)]
pub struct Rows<'t> {
    table: &'t Table<'t>,
    lines: Lines<'t>,
}

impl<'t> Iterator for Rows<'t> {
    type Item = Row<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.table.has_header() {
            return None;
        }
        let width = self.table.columns.len();
        for line in self.lines.by_ref() {
            if is_blank(line) {
                continue;
            }
            let mut values: Vec<&str> = split_fields(line).take(width).collect();
            // Sources routinely drop trailing empty columns.
            values.resize(width, "");
            return Some(Row {
                table: self.table,
                values,
            });
        }
        None
    }
}

/// One data line, addressable by column name.
#[derive(Debug, Clone)]
pub struct Row<'t> {
    table: &'t Table<'t>,
    values: Vec<&'t str>,
}

impl<'t> Row<'t> {
    /// Raw value of `column`, or `""` when the header has no such column.
    pub fn get(&self, column: &str) -> &'t str {
        self.table.position(column).and_then(|i| self.values.get(i).copied()).unwrap_or("")
    }

    /// Trimmed value of `column`, or `None` when it is blank.
    pub fn text(&self, column: &str) -> Option<&'t str> {
        Some(self.get(column).trim()).filter(|s| !s.is_empty())
    }

    /// First non-blank value among several spellings of the same column.
    pub fn first_of(&self, columns: &[&str]) -> Option<&'t str> {
        columns.iter().find_map(|column| self.text(column))
    }

    /// Parse `column` as a number, defaulting to zero.
    pub fn number<T: FromStr + Default>(&self, column: &str) -> T {
        number(self.get(column))
    }

    /// `true` for any non-zero numeric value.
    pub fn flag(&self, column: &str) -> bool {
        self.number::<i64>(column) != 0
    }

    /// `(column, value)` pairs in header order.
    pub fn iter(&self) -> impl Iterator<Item = (&'t str, &'t str)> + '_ {
        self.table.columns.iter().copied().zip(self.values.iter().copied())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Resilient numeric conversion: anything unparseable becomes the default.
pub fn number<T: FromStr + Default>(value: &str) -> T {
    value.trim().parse::<T>().unwrap_or_default()
}

fn split_fields(line: &str) -> impl Iterator<Item = &str> {
    let bytes = line.as_bytes();
    let mut start = 0;
    memchr_iter(b'\t', bytes)
        .chain(std::iter::once(bytes.len()))
        .map(move |end| {
            // Tabs are ASCII, so both ends always fall on char boundaries.
            let field = &line[start..end];
            start = end + 1;
            field
        })
}

fn trim_line_ending(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

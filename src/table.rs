//! # Tables
//!
//! Minimal column-ordered table used for both the local cycle listings and the archive
//! responses.
//!
//! ## Data model
//! -----------------
//! * A [`Table`] owns an ordered list of column names and a list of rows; every row has
//!   exactly one [`Cell`] per column.
//! * A [`Cell`] is a nullable, typed value. [`Cell::Missing`] is the no-value marker used for
//!   remote columns without a match; it is never confused with zero or with an empty string
//!   and is written as `NaN` in CSV output.
//!
//! ## Reading
//! -----------------
//! * [`Table::read_csv`] keeps every cell of a local file **verbatim** as [`Cell::Text`], so
//!   local columns are written back unchanged.
//! * [`Table::from_csv_inferred`] infers the cell types of an archive response
//!   (empty → missing, integer, float, text). Name columns are exempted from inference and
//!   stay text, so a numeric looking name still joins with its local row.
//!
//! ## Ordering
//! -----------------
//! [`Table::sort_by_column`] is a stable, ascending, byte-wise (locale independent) sort.
use std::{borrow::Cow, cmp::Ordering, collections::HashMap, fmt, fs::File, io::Read};

use camino::Utf8Path;
use itertools::Itertools;
use serde::{Serialize, Serializer};

use crate::{constants::MISSING_SENTINEL, target_query_errors::TargetQueryError};

/// A single nullable table value.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Missing,
    Int(i64),
    Float(f64),
    Text(String),
}

impl Cell {
    /// Infer the type of a raw CSV field coming from the archive.
    pub fn infer(raw: &str) -> Cell {
        if raw.is_empty() {
            Cell::Missing
        } else if let Ok(value) = raw.parse::<i64>() {
            Cell::Int(value)
        } else if let Ok(value) = raw.parse::<f64>() {
            Cell::Float(value)
        } else {
            Cell::Text(raw.to_string())
        }
    }

    /// Keep a raw CSV field as is.
    pub fn verbatim(raw: &str) -> Cell {
        Cell::Text(raw.to_string())
    }

    /// Text field of the archive, an empty field being missing.
    pub fn text_or_missing(raw: &str) -> Cell {
        if raw.is_empty() {
            Cell::Missing
        } else {
            Cell::verbatim(raw)
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    /// Text used when the cell is a join key, `None` for missing cells.
    pub fn as_key(&self) -> Option<Cow<'_, str>> {
        match self {
            Cell::Missing => None,
            Cell::Text(text) => Some(Cow::Borrowed(text)),
            other => Some(Cow::Owned(other.to_string())),
        }
    }

    /// Byte-wise comparison of the rendered values. Missing cells sort first.
    pub fn cmp_ordinal(&self, other: &Cell) -> Ordering {
        match (self.as_key(), other.as_key()) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(a), Some(b)) => a.as_bytes().cmp(b.as_bytes()),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Missing => write!(f, "{MISSING_SENTINEL}"),
            Cell::Int(value) => write!(f, "{value}"),
            Cell::Float(value) => write!(f, "{value:?}"),
            Cell::Text(value) => write!(f, "{value}"),
        }
    }
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Cell::Missing => serializer.serialize_str(MISSING_SENTINEL),
            Cell::Int(value) => serializer.serialize_i64(*value),
            Cell::Float(value) => serializer.serialize_f64(*value),
            Cell::Text(value) => serializer.serialize_str(value),
        }
    }
}

/// Ordered columns and their rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Create an empty table with the given schema.
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        Table {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Create a table from a schema and its rows.
    ///
    /// Return
    /// ----------
    /// * [`TargetQueryError::RowLengthMismatch`] if a row does not match the schema width.
    pub fn from_rows<S: Into<String>>(
        columns: impl IntoIterator<Item = S>,
        rows: Vec<Vec<Cell>>,
    ) -> Result<Self, TargetQueryError> {
        let mut table = Table::new(columns);
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Index of a column that must exist.
    pub fn require_column(&self, name: &str) -> Result<usize, TargetQueryError> {
        self.column_index(name)
            .ok_or_else(|| TargetQueryError::MissingColumn(name.to_string()))
    }

    pub fn push_row(&mut self, row: Vec<Cell>) -> Result<(), TargetQueryError> {
        if row.len() != self.columns.len() {
            return Err(TargetQueryError::RowLengthMismatch {
                expected: self.columns.len(),
                found: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub(crate) fn rows_mut(&mut self) -> &mut [Vec<Cell>] {
        &mut self.rows
    }

    /// Cell at the given row of a named column.
    pub fn get(&self, row: usize, column: &str) -> Option<&Cell> {
        let index = self.column_index(column)?;
        self.rows.get(row).map(|cells| &cells[index])
    }

    /// All the cells of a column, in row order.
    pub fn column_values(&self, name: &str) -> Result<Vec<&Cell>, TargetQueryError> {
        let index = self.require_column(name)?;
        Ok(self.rows.iter().map(|row| &row[index]).collect())
    }

    /// Distinct non-missing keys of a column, in first-seen order.
    pub fn unique_keys(&self, name: &str) -> Result<Vec<String>, TargetQueryError> {
        Ok(self
            .column_values(name)?
            .into_iter()
            .filter_map(|cell| cell.as_key().map(Cow::into_owned))
            .unique()
            .collect())
    }

    /// Append a column, filling every existing row with `fill`.
    ///
    /// An already present column is left untouched.
    pub fn add_column(&mut self, name: &str, fill: Cell) {
        if self.has_column(name) {
            return;
        }
        self.columns.push(name.to_string());
        for row in &mut self.rows {
            row.push(fill.clone());
        }
    }

    /// Set every cell of a column to `value`, appending the column if needed.
    pub fn set_column(&mut self, name: &str, value: Cell) {
        match self.column_index(name) {
            Some(index) => {
                for row in &mut self.rows {
                    row[index] = value.clone();
                }
            }
            None => self.add_column(name, value),
        }
    }

    /// Rename columns through a mapping; columns absent from the mapping keep their name.
    pub fn rename_columns(&mut self, mapping: &HashMap<String, String>) {
        for column in &mut self.columns {
            if let Some(new_name) = mapping.get(column.as_str()) {
                *column = new_name.clone();
            }
        }
    }

    /// Project the table on the given columns, in the given order.
    ///
    /// Return
    /// ----------
    /// * [`TargetQueryError::MissingColumn`] for the first requested column that does not exist.
    pub fn select(&self, names: &[&str]) -> Result<Table, TargetQueryError> {
        let indices = names
            .iter()
            .map(|name| self.require_column(name))
            .collect::<Result<Vec<usize>, _>>()?;

        Ok(Table {
            columns: names.iter().map(|name| name.to_string()).collect(),
            rows: self
                .rows
                .iter()
                .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
                .collect(),
        })
    }

    /// Stable ascending sort on the ordinal value of one column.
    pub fn sort_by_column(&mut self, name: &str) -> Result<(), TargetQueryError> {
        let index = self.require_column(name)?;
        self.rows.sort_by(|a, b| a[index].cmp_ordinal(&b[index]));
        Ok(())
    }

    /// Cast the values of a column to floats, keeping missing cells missing.
    pub fn cast_column_to_float(&mut self, name: &str) -> Result<(), TargetQueryError> {
        let index = self.require_column(name)?;
        for row in &mut self.rows {
            let cast = match &row[index] {
                Cell::Missing => Cell::Missing,
                Cell::Int(value) => Cell::Float(*value as f64),
                Cell::Float(value) => Cell::Float(*value),
                Cell::Text(text) => match text.trim() {
                    "" => Cell::Missing,
                    trimmed => Cell::Float(trimmed.parse::<f64>().map_err(|_| {
                        TargetQueryError::InvalidFloat {
                            column: name.to_string(),
                            value: text.clone(),
                        }
                    })?),
                },
            };
            row[index] = cast;
        }
        Ok(())
    }

    /// Vertical concatenation over the union of the schemas.
    ///
    /// Columns keep their first-seen order; cells of columns a table does not have are
    /// [`Cell::Missing`].
    pub fn concat(tables: &[Table]) -> Table {
        let columns: Vec<String> = tables
            .iter()
            .flat_map(|table| table.columns.iter().cloned())
            .unique()
            .collect();

        let rows = tables
            .iter()
            .flat_map(|table| {
                let positions: Vec<Option<usize>> = columns
                    .iter()
                    .map(|column| table.column_index(column))
                    .collect();
                table.rows.iter().map(move |row| {
                    positions
                        .iter()
                        .map(|position| position.map_or(Cell::Missing, |i| row[i].clone()))
                        .collect()
                })
            })
            .collect();

        Table { columns, rows }
    }

    /// Read a local CSV file, keeping every field verbatim as text.
    pub fn read_csv(path: &Utf8Path) -> Result<Table, TargetQueryError> {
        let file = File::open(path)?;
        Table::from_csv_reader(file, |_| Cell::verbatim)
    }

    /// Parse an archive CSV response with type inference.
    ///
    /// Arguments
    /// -----------------
    /// * `content` – CSV text, header line first.
    /// * `text_columns` – Columns never inferred (names, identifiers). Their empty fields are
    ///   still missing, any other field is kept as [`Cell::Text`].
    pub fn from_csv_inferred(
        content: &str,
        text_columns: &[&str],
    ) -> Result<Table, TargetQueryError> {
        Table::from_csv_reader(content.as_bytes(), |column| -> fn(&str) -> Cell {
            if text_columns.iter().any(|name| *name == column) {
                Cell::text_or_missing
            } else {
                Cell::infer
            }
        })
    }

    fn from_csv_reader<R: Read>(
        reader: R,
        parser_for: impl Fn(&str) -> fn(&str) -> Cell,
    ) -> Result<Table, TargetQueryError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut table = Table::new(csv_reader.headers()?.iter());
        let parsers: Vec<fn(&str) -> Cell> =
            table.columns.iter().map(|column| parser_for(column)).collect();

        for record in csv_reader.records() {
            let row = record?
                .iter()
                .enumerate()
                .map(|(i, raw)| {
                    parsers
                        .get(i)
                        .map_or_else(|| Cell::verbatim(raw), |parse| parse(raw))
                })
                .collect();
            table.push_row(row)?;
        }

        Ok(table)
    }

    /// Write the table as CSV, creating the parent directory when needed.
    pub fn write_csv(&self, path: &Utf8Path) -> Result<(), TargetQueryError> {
        if let Some(parent) = path.parent() {
            if !parent.as_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(&self.columns)?;
        for row in &self.rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
        Ok(())
    }
}

//! Header slots and their types.

use std::{cmp::Ordering, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    column_map::{ColumnMap, Declaration},
    data::{Cell, Value, display_cell},
    error::{Result, TabularError},
    keys::{self, Key},
    table::Table,
};

const DATE_KEY: &str = "date";

/// How a column's cells are coerced when read. `Declared` carries a
/// caller-supplied tag; its cells pass through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ColumnType {
    String,
    Date,
    Boolean,
    Declared(String),
}

impl ColumnType {
    pub fn from_name(name: &str) -> Self {
        let normalized = name.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "string" => ColumnType::String,
            "date" => ColumnType::Date,
            "boolean" | "bool" => ColumnType::Boolean,
            _ => ColumnType::Declared(normalized),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ColumnType::String => "string",
            ColumnType::Date => "date",
            ColumnType::Boolean => "boolean",
            ColumnType::Declared(tag) => tag,
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColumnType {
    type Err = std::convert::Infallible;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(ColumnType::from_name(value))
    }
}

impl From<String> for ColumnType {
    fn from(value: String) -> Self {
        ColumnType::from_name(&value)
    }
}

impl From<ColumnType> for String {
    fn from(value: ColumnType) -> Self {
        value.as_str().to_string()
    }
}

/// One slot of a table header. The key is fixed at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    key: Option<Key>,
    column_type: ColumnType,
}

impl Column {
    /// Builds a column from a raw header cell, consulting `column_map` for a
    /// rename or an explicit type.
    pub fn from_header(raw: Option<&Value>, column_map: &ColumnMap) -> Result<Self> {
        let Some(parsed) = keys::normalize(raw) else {
            return Ok(Self {
                key: None,
                column_type: ColumnType::String,
            });
        };

        let column = match column_map.declaration(&parsed)? {
            None => Self {
                column_type: infer_column_type(&parsed, &parsed),
                key: Some(parsed),
            },
            Some(Declaration::Rename(renamed)) => Self {
                column_type: infer_column_type(&parsed, &renamed),
                key: Some(renamed),
            },
            Some(Declaration::Typed(column_type)) => Self {
                key: Some(parsed),
                column_type,
            },
        };
        Ok(column)
    }

    pub fn named(name: &str, column_map: &ColumnMap) -> Result<Self> {
        Self::from_header(Some(&Value::from(name)), column_map)
    }

    pub fn key(&self) -> Option<&Key> {
        self.key.as_ref()
    }

    pub fn column_type(&self) -> &ColumnType {
        &self.column_type
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.key {
            Some(key) => write!(f, "{key}"),
            None => Ok(()),
        }
    }
}

// `date` is decided on the header as written; the `?` suffix on the key the
// column ends up with.
fn infer_column_type(parsed: &Key, effective: &Key) -> ColumnType {
    if parsed.as_str() == DATE_KEY {
        ColumnType::Date
    } else if effective.is_predicate() {
        ColumnType::Boolean
    } else {
        ColumnType::String
    }
}

/// A column viewed through its table, for the operations that need the rows.
#[derive(Clone, Copy)]
pub struct ColumnRef<'a> {
    table: &'a Table,
    column: &'a Column,
}

impl<'a> ColumnRef<'a> {
    pub(crate) fn new(table: &'a Table, column: &'a Column) -> Self {
        Self { table, column }
    }

    pub fn column(&self) -> &'a Column {
        self.column
    }

    pub fn key(&self) -> Option<&'a Key> {
        self.column.key()
    }

    pub fn column_type(&self) -> &'a ColumnType {
        self.column.column_type()
    }

    pub fn table(&self) -> &'a Table {
        self.table
    }

    /// Coerced value of every row at this column, in row order.
    pub fn cells(&self) -> Result<Vec<Cell>> {
        let Some(key) = self.key() else {
            return Ok(vec![None; self.table.len()]);
        };
        self.table.rows().map(|row| row.get(key.as_str())).collect()
    }

    /// Largest non-null cell. Fails when the cells are of different kinds.
    pub fn max(&self) -> Result<Cell> {
        let mut max: Option<Value> = None;
        for value in self.cells()?.into_iter().flatten() {
            max = match max {
                None => Some(value),
                Some(current) => match value.partial_cmp(&current) {
                    Some(Ordering::Greater) => Some(value),
                    Some(_) => Some(current),
                    None => {
                        return Err(TabularError::Comparison {
                            key: self.to_string(),
                            left: current.to_string(),
                            right: value.to_string(),
                        });
                    }
                },
            };
        }
        Ok(max)
    }

    /// Digits needed right of the decimal point to show every cell rounded to
    /// thousandths, e.g. `2` for `10.75` and `12.000`.
    pub fn precision(&self) -> Result<usize> {
        let precision = self
            .cells()?
            .iter()
            .map(|cell| {
                let number = cell.as_ref().map(Value::to_f64).unwrap_or(0.0);
                let rounded = format!("{number:.3}");
                rounded
                    .split_once('.')
                    .map(|(_, fraction)| fraction.trim_end_matches('0').len())
                    .unwrap_or(0)
            })
            .max()
            .unwrap_or(0);
        Ok(precision)
    }

    /// Widest of the header text and every cell's text, in characters.
    pub fn width(&self) -> Result<usize> {
        let header = self.to_string().chars().count();
        let widest_cell = self
            .cells()?
            .iter()
            .map(|cell| display_cell(cell.as_ref()).chars().count())
            .max()
            .unwrap_or(0);
        Ok(header.max(widest_cell))
    }

    pub fn render_header(&self) -> String {
        self.table
            .columns()
            .renderer(self.key())
            .render_header(self)
    }

    pub fn to_space_delimited(&self) -> Result<String> {
        let width = self.width()?;
        Ok(format!("{:<width$}", self.render_header()))
    }
}

impl fmt::Display for ColumnRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.column.fmt(f)
    }
}

impl fmt::Debug for ColumnRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#<Column {} {}>", self.column, self.column.column_type)
    }
}

//! Records and rows.
//!
//! A [`Row`] stores its cells in header order and coerces a cell to its
//! column's type the first time the cell is read by key. Coerced values are
//! memoized per key until the row, or the header, changes.
//!
//! Rows are read through [`RowRef`] and written through [`RowMut`]; both
//! borrow the owning [`Table`] so that key lookups, navigation and writes that
//! introduce new columns all see the current header.

use std::{
    cell::RefCell,
    collections::{BTreeMap, HashMap},
    fmt,
};

use itertools::Itertools;

use crate::{
    column::{Column, ColumnRef, ColumnType},
    columns::Columns,
    data::{Cell, Value, display_cell, is_blank, parse_naive_date, parse_slash_date},
    error::{Result, TabularError},
    keys::Key,
    table::{Metadata, Table},
};

/// A raw record handed to [`Table::append`].
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    /// Cells in header order.
    Positional(Vec<Cell>),
    /// Header and cell pairs, in order. Headers are normalized on ingestion.
    Keyed(Vec<(String, Cell)>),
}

impl Record {
    pub fn positional<I, V>(cells: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Record::Positional(cells.into_iter().map(|cell| Some(cell.into())).collect())
    }

    pub fn keyed<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Record::Keyed(
            pairs
                .into_iter()
                .map(|(key, value)| (key.into(), Some(value.into())))
                .collect(),
        )
    }

    pub fn is_keyed(&self) -> bool {
        matches!(self, Record::Keyed(_))
    }
}

/// Turns each raw record into the cells a row is built from.
pub trait RowMapper {
    fn map(&self, record: &Record) -> Record;
}

impl<F> RowMapper for F
where
    F: Fn(&Record) -> Record,
{
    fn map(&self, record: &Record) -> Record {
        self(record)
    }
}

#[derive(Debug)]
pub struct Row {
    index: usize,
    source: Record,
    cells: Vec<Cell>,
    coerced: RefCell<HashMap<Key, Cell>>,
}

impl Row {
    pub(crate) fn new(index: usize, cells: Vec<Cell>, source: Record) -> Self {
        Self {
            index,
            source,
            cells,
            coerced: RefCell::new(HashMap::new()),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// The record as it was appended, before any row mapper ran.
    pub fn source(&self) -> &Record {
        &self.source
    }

    /// Stored cells in header order, uncoerced.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// A row is blank when every stored cell is blank.
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|cell| is_blank(cell.as_ref()))
    }

    pub(crate) fn set_index(&mut self, index: usize) {
        self.index = index;
    }

    /// Coerced value for `key`; `None` when the header has no such column or
    /// this row is too short to hold it.
    pub(crate) fn value(&self, columns: &Columns, key: &str) -> Result<Cell> {
        if let Some(cached) = self.coerced.borrow().get(key) {
            return Ok(cached.clone());
        }
        let (Some(column), Some(position)) = (columns.get(key), columns.position(key)) else {
            return Ok(None);
        };
        let raw = self.cells.get(position).cloned().flatten();
        let value = coerce(column, raw, self.index)?;
        if let Some(column_key) = column.key() {
            self.coerced
                .borrow_mut()
                .insert(column_key.clone(), value.clone());
        }
        Ok(value)
    }

    pub(crate) fn write(&mut self, position: usize, cell: Cell) {
        if self.cells.len() <= position {
            self.cells.resize(position + 1, None);
        }
        self.cells[position] = cell;
        self.invalidate();
    }

    pub(crate) fn remove(&mut self, position: usize) {
        if position < self.cells.len() {
            self.cells.remove(position);
        }
        self.invalidate();
    }

    /// Drops every memoized coerced value.
    pub fn invalidate(&self) {
        self.coerced.borrow_mut().clear();
    }
}

fn coerce(column: &Column, raw: Cell, index: usize) -> Result<Cell> {
    match column.column_type() {
        ColumnType::Boolean => Ok(Some(Value::Boolean(is_truthy(raw.as_ref())))),
        ColumnType::Date => coerce_date(column, raw, index),
        ColumnType::String | ColumnType::Declared(_) => Ok(raw),
    }
}

/// Exactly `1`, `"1"`, `true` and `"true"` are true.
fn is_truthy(raw: Option<&Value>) -> bool {
    match raw {
        Some(Value::Integer(1)) | Some(Value::Boolean(true)) => true,
        Some(Value::String(text)) => text == "1" || text == "true",
        _ => false,
    }
}

fn coerce_date(column: &Column, raw: Cell, index: usize) -> Result<Cell> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    if raw.is_temporal() {
        return Ok(Some(raw));
    }
    if raw.is_blank() {
        return Ok(None);
    }
    let text = raw.as_display();
    parse_naive_date(&text)
        .or_else(|| parse_slash_date(&text))
        .map(|date| Some(Value::Date(date)))
        .ok_or_else(|| TabularError::DateCoercion {
            key: column.to_string(),
            index,
            value: text,
        })
}

/// A row viewed through its table.
#[derive(Clone, Copy)]
pub struct RowRef<'a> {
    table: &'a Table,
    row: &'a Row,
}

impl<'a> RowRef<'a> {
    pub(crate) fn new(table: &'a Table, row: &'a Row) -> Self {
        Self { table, row }
    }

    pub fn row(&self) -> &'a Row {
        self.row
    }

    pub fn index(&self) -> usize {
        self.row.index
    }

    pub fn source(&self) -> &'a Record {
        &self.row.source
    }

    pub fn columns(&self) -> &'a Columns {
        self.table.columns()
    }

    pub fn metadata(&self) -> &'a Metadata {
        self.table.metadata()
    }

    /// Coerced cell for `key`. A malformed date fails here, on read.
    pub fn get(&self, key: &str) -> Result<Cell> {
        self.row.value(self.table.columns(), key)
    }

    /// Keys of the header's keyed columns, in order.
    pub fn keys(&self) -> Vec<Key> {
        self.table.columns().keys().cloned().collect()
    }

    /// Every keyed column with its coerced value, in header order.
    pub fn entries(&self) -> Result<Vec<(Key, Cell)>> {
        self.table
            .columns()
            .keys()
            .map(|key| Ok((key.clone(), self.get(key.as_str())?)))
            .collect()
    }

    pub fn each_with_key<F>(&self, mut f: F) -> Result<()>
    where
        F: FnMut(&Key, &Cell),
    {
        for (key, value) in self.entries()? {
            f(&key, &value);
        }
        Ok(())
    }

    pub fn to_hash(&self) -> Result<BTreeMap<Key, Cell>> {
        Ok(self.entries()?.into_iter().collect())
    }

    pub fn previous(&self) -> Option<RowRef<'a>> {
        let index = self.row.index.checked_sub(1)?;
        self.table.get(index)
    }

    pub fn next(&self) -> Option<RowRef<'a>> {
        self.table.get(self.row.index + 1)
    }

    pub fn is_last(&self) -> bool {
        self.row.index + 1 == self.table.len()
    }

    pub fn is_blank(&self) -> bool {
        self.row.is_blank()
    }

    /// Cell for `key` through the column's renderer.
    pub fn render(&self, key: &str) -> Result<Cell> {
        let Some(column) = self.table.column(key) else {
            return Ok(None);
        };
        self.render_column(&column)
    }

    fn render_column(&self, column: &ColumnRef<'_>) -> Result<Cell> {
        self.table
            .columns()
            .renderer(column.key())
            .render(column, self)
    }

    /// Stored cells joined by `separator`.
    pub fn join(&self, separator: &str) -> String {
        self.row
            .cells
            .iter()
            .map(|cell| display_cell(cell.as_ref()))
            .join(separator)
    }

    /// Rendered cells padded to their column widths.
    pub fn to_space_delimited(&self) -> Result<String> {
        let mut cells = Vec::new();
        for column in self.table.columns().iter() {
            let Some(key) = column.key() else {
                continue;
            };
            let Some(column) = self.table.column(key.as_str()) else {
                continue;
            };
            let width = column.width()?;
            let rendered = display_cell(self.render_column(&column)?.as_ref());
            cells.push(format!("{rendered:<width$}"));
        }
        Ok(cells.join("   "))
    }
}

impl fmt::Display for RowRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.join(", "))
    }
}

impl fmt::Debug for RowRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowRef")
            .field("index", &self.row.index)
            .field("cells", &self.row.cells)
            .finish()
    }
}

/// Write access to one row of a table.
pub struct RowMut<'a> {
    table: &'a mut Table,
    index: usize,
}

impl<'a> RowMut<'a> {
    pub(crate) fn new(table: &'a mut Table, index: usize) -> Self {
        Self { table, index }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn get(&self, key: &str) -> Result<Cell> {
        self.view().get(key)
    }

    pub fn view(&self) -> RowRef<'_> {
        let table: &Table = self.table;
        RowRef::new(table, &table.rows[self.index])
    }

    /// Stores `value` at `key`, adding a column to the table when the header has
    /// none for it.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> Result<()> {
        self.table.write_cell(self.index, key, Some(value.into()))
    }

    /// Stores a null at `key`.
    pub fn clear(&mut self, key: &str) -> Result<()> {
        self.table.write_cell(self.index, key, None)
    }
}

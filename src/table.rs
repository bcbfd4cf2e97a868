//! The table: a header of [`Columns`] and the ordered list of [`Row`]s.
//!
//! The table is the only place columns are created while ingesting. The
//! first positional record becomes the header; keyed records add a column for
//! every key the header has not seen yet, so a key that first shows up deep in
//! the input still gets a column.

use std::{collections::BTreeMap, fmt, path::Path, rc::Rc};

use log::debug;

use crate::{
    column::{Column, ColumnRef},
    column_map::ColumnMap,
    columns::Columns,
    data::{Cell, Value, is_blank, is_zero},
    error::Result,
    io_utils::{self, ReadOptions},
    keys::{self, Key},
    renderer::Renderer,
    row::{Record, Row, RowMapper, RowMut, RowRef},
};

/// Caller data attached to a table. The table never reads it.
pub type Metadata = BTreeMap<String, serde_json::Value>;

#[derive(Default)]
pub struct Table {
    columns: Columns,
    pub(crate) rows: Vec<Row>,
    row_mapper: Option<Box<dyn RowMapper>>,
    metadata: Metadata,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_column_map(column_map: ColumnMap) -> Self {
        Self {
            columns: Columns::new(column_map),
            ..Self::default()
        }
    }

    /// Builds a table by appending each record in turn.
    pub fn from_records<I>(records: I) -> Result<Self>
    where
        I: IntoIterator<Item = Record>,
    {
        let mut table = Self::new();
        table.extend(records)?;
        Ok(table)
    }

    /// Reads a CSV or tab-delimited file whose first line is the header.
    pub fn from_path(path: &Path, options: &ReadOptions) -> Result<Self> {
        let mut table = Self::new();
        table.read(path, options)?;
        Ok(table)
    }

    /// Appends every record of a delimited file. Returns the number of rows added.
    pub fn read(&mut self, path: &Path, options: &ReadOptions) -> Result<usize> {
        let before = self.rows.len();
        self.extend(io_utils::read_records(path, options)?)?;
        let added = self.rows.len() - before;
        debug!("Added {added} row(s) from {path:?}");
        Ok(added)
    }

    pub fn extend<I>(&mut self, records: I) -> Result<()>
    where
        I: IntoIterator<Item = Record>,
    {
        for record in records {
            self.append(record)?;
        }
        Ok(())
    }

    /// Appends one record, running it through the row mapper first when one is
    /// set. Returns the new row's index, or `None` when the record became the
    /// header.
    pub fn append(&mut self, record: Record) -> Result<Option<usize>> {
        let cells = match &self.row_mapper {
            Some(mapper) => mapper.map(&record),
            None => record.clone(),
        };

        let cells = match cells {
            Record::Positional(cells) => {
                if self.columns.is_empty() {
                    self.columns.extend_from_headers(&cells)?;
                    debug!("Header set with {} column(s)", self.columns.len());
                    return Ok(None);
                }
                cells
            }
            Record::Keyed(pairs) => self.lay_out(pairs)?,
        };

        let index = self.rows.len();
        self.rows.push(Row::new(index, cells, record));
        Ok(Some(index))
    }

    // Places keyed cells at their header positions, growing the header first.
    fn lay_out(&mut self, pairs: Vec<(String, Cell)>) -> Result<Vec<Cell>> {
        let mut keyed = Vec::with_capacity(pairs.len());
        for (header, cell) in pairs {
            if let Some(key) = self.columns.append(&header)? {
                keyed.push((key, cell));
            }
        }
        let mut cells = vec![None; self.columns.len()];
        for (key, cell) in keyed {
            if let Some(position) = self.columns.position(key.as_str()) {
                cells[position] = cell;
            }
        }
        Ok(cells)
    }

    pub fn set_row_mapper(&mut self, mapper: impl RowMapper + 'static) {
        self.row_mapper = Some(Box::new(mapper));
    }

    /// Replaces the declared column map. Before any row is ingested this also
    /// discards the header so it is rebuilt under the new map.
    pub fn set_column_map(&mut self, column_map: ColumnMap) {
        if self.rows.is_empty() {
            self.columns.reset(column_map);
        } else {
            self.columns.set_column_map(column_map);
        }
    }

    /// Renderer for every column without one of its own.
    pub fn set_renderer(&mut self, renderer: impl Renderer + 'static) {
        self.columns.set_renderer(Rc::new(renderer));
    }

    pub fn set_column_renderer(&mut self, key: &str, renderer: impl Renderer + 'static) {
        if let Some(key) = keys::normalize_str(key) {
            self.columns.set_column_renderer(key, Rc::new(renderer));
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn columns(&self) -> &Columns {
        &self.columns
    }

    pub fn column(&self, key: &str) -> Option<ColumnRef<'_>> {
        self.columns
            .get(key)
            .map(|column| ColumnRef::new(self, column))
    }

    /// Every header slot, keyed or not, in order.
    pub fn column_refs(&self) -> impl Iterator<Item = ColumnRef<'_>> {
        self.columns
            .iter()
            .map(move |column| ColumnRef::new(self, column))
    }

    pub fn get(&self, index: usize) -> Option<RowRef<'_>> {
        self.rows.get(index).map(|row| RowRef::new(self, row))
    }

    pub fn row_mut(&mut self, index: usize) -> Option<RowMut<'_>> {
        if index < self.rows.len() {
            Some(RowMut::new(self, index))
        } else {
            None
        }
    }

    pub fn first(&self) -> Option<RowRef<'_>> {
        self.get(0)
    }

    pub fn last(&self) -> Option<RowRef<'_>> {
        self.rows.len().checked_sub(1).and_then(|index| self.get(index))
    }

    pub fn rows(&self) -> impl Iterator<Item = RowRef<'_>> {
        self.rows.iter().map(move |row| RowRef::new(self, row))
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn metadata_mut(&mut self) -> &mut Metadata {
        &mut self.metadata
    }

    pub(crate) fn write_cell(&mut self, index: usize, key: &str, cell: Cell) -> Result<()> {
        let position = match self.columns.position(key) {
            Some(position) => Some(position),
            None => self
                .columns
                .append(key)?
                .and_then(|resolved| self.columns.position(resolved.as_str())),
        };
        let Some(position) = position else {
            debug!("Ignoring write to blank key {key:?}");
            return Ok(());
        };
        if let Some(row) = self.rows.get_mut(index) {
            row.write(position, cell);
        }
        Ok(())
    }

    fn column_cells(&self, key: &str) -> Result<Vec<Cell>> {
        self.rows
            .iter()
            .map(|row| row.value(&self.columns, key))
            .collect()
    }

    fn keys_except(&self, except: &[&str]) -> Vec<Key> {
        self.columns
            .keys()
            .filter(|key| !except.contains(&key.as_str()))
            .cloned()
            .collect()
    }

    /// Removes every column, other than those in `except`, whose cells are all
    /// blank or zero.
    pub fn delete_blank_columns(&mut self, except: &[&str]) -> Result<()> {
        for key in self.keys_except(except) {
            let cells = self.column_cells(key.as_str())?;
            if cells
                .iter()
                .all(|cell| is_blank(cell.as_ref()) || is_zero(cell.as_ref()))
            {
                self.delete_column(key.as_str());
            }
        }
        Ok(())
    }

    /// Removes every column, other than those in `except`, that holds the same
    /// value in every row. Tables with fewer than two rows are left alone.
    pub fn delete_homogenous_columns(&mut self, except: &[&str]) -> Result<()> {
        if self.rows.len() < 2 {
            return Ok(());
        }
        for key in self.keys_except(except) {
            let cells = self.column_cells(key.as_str())?;
            if cells.windows(2).all(|pair| pair[0] == pair[1]) {
                self.delete_column(key.as_str());
            }
        }
        Ok(())
    }

    /// Drops rows whose stored cells are all blank and renumbers the rest.
    pub fn delete_blank_rows(&mut self) {
        let before = self.rows.len();
        self.rows.retain(|row| !row.is_blank());
        for (index, row) in self.rows.iter_mut().enumerate() {
            row.set_index(index);
        }
        debug!("Deleted {} blank row(s)", before - self.rows.len());
    }

    /// Trims whitespace around string cells and turns whole-number floats into
    /// integers.
    pub fn strip(&mut self) -> Result<()> {
        let keys = self.keys_except(&[]);
        for index in 0..self.rows.len() {
            for key in &keys {
                let stripped = match self.rows[index].value(&self.columns, key.as_str())? {
                    Some(Value::String(text)) if text.trim().len() != text.len() => {
                        Value::from(text.trim())
                    }
                    Some(Value::Float(number)) if is_whole(number) => {
                        Value::Integer(number as i64)
                    }
                    _ => continue,
                };
                self.write_cell(index, key.as_str(), Some(stripped))?;
            }
        }
        Ok(())
    }

    /// Removes the column for `key` from the header and its cell from every row.
    pub fn delete_column(&mut self, key: &str) -> Option<Column> {
        let position = self.columns.position(key)?;
        for row in &mut self.rows {
            row.remove(position);
        }
        self.columns.delete(key)
    }

    /// Header and rows as fixed-width text, one line each.
    pub fn to_space_delimited(&self) -> Result<String> {
        let mut header = Vec::new();
        for column in self.column_refs().filter(|column| column.key().is_some()) {
            header.push(column.to_space_delimited()?);
        }
        let mut lines = vec![header.join("   ")];
        for row in self.rows() {
            lines.push(row.to_space_delimited()?);
        }
        let mut output = lines.join("\n");
        output.push('\n');
        Ok(output)
    }
}

fn is_whole(number: f64) -> bool {
    number.is_finite()
        && number.fract() == 0.0
        && number >= i64::MIN as f64
        && number <= i64::MAX as f64
}

impl fmt::Debug for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Table")
            .field("columns", &self.columns)
            .field("rows", &self.rows)
            .field("row_mapper", &self.row_mapper.is_some())
            .field("metadata", &self.metadata)
            .finish()
    }
}

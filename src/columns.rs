//! The table header: an ordered list of [`Column`]s with a key to position index.
//!
//! Rows store their cells positionally and find a key's cell through
//! [`Columns::position`], so every structural change rebuilds the index from
//! the column order.

use std::{collections::HashMap, fmt, rc::Rc};

use log::debug;

use crate::{
    column::Column,
    column_map::ColumnMap,
    data::Value,
    error::Result,
    keys::Key,
    renderer::{DefaultRenderer, Renderer},
};

#[derive(Default)]
pub struct Columns {
    columns: Vec<Column>,
    positions: HashMap<Key, usize>,
    column_map: ColumnMap,
    renderers: HashMap<Key, Rc<dyn Renderer>>,
    renderer: Option<Rc<dyn Renderer>>,
}

impl Columns {
    pub fn new(column_map: ColumnMap) -> Self {
        Self {
            column_map,
            ..Self::default()
        }
    }

    /// Header from a row of header cells. Every cell takes a position, so a
    /// blank header, or one repeating an earlier key, holds its slot as a column
    /// without a key.
    pub fn from_headers(headers: &[Option<Value>], column_map: ColumnMap) -> Result<Self> {
        let mut columns = Self::new(column_map);
        columns.extend_from_headers(headers)?;
        Ok(columns)
    }

    pub(crate) fn extend_from_headers(&mut self, headers: &[Option<Value>]) -> Result<()> {
        for header in headers {
            let column = Column::from_header(header.as_ref(), &self.column_map)?;
            let column = match column.key() {
                Some(key) if self.positions.contains_key(key) => {
                    debug!("Duplicate header '{key}' keeps its position without a key");
                    Column::from_header(None, &self.column_map)?
                }
                _ => column,
            };
            self.push(column);
        }
        Ok(())
    }

    /// Drops every column and adopts `column_map`. Renderers stay registered.
    pub(crate) fn reset(&mut self, column_map: ColumnMap) {
        self.columns.clear();
        self.positions.clear();
        self.column_map = column_map;
    }

    pub(crate) fn set_column_map(&mut self, column_map: ColumnMap) {
        self.column_map = column_map;
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.positions.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Column> {
        self.position(key).map(|position| &self.columns[position])
    }

    /// Zero-based position of the column for `key`.
    pub fn position(&self, key: &str) -> Option<usize> {
        self.positions.get(key).copied()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Column> {
        self.columns.iter()
    }

    /// Keys of every keyed column, in header order.
    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.columns.iter().filter_map(Column::key)
    }

    pub fn column_map(&self) -> &ColumnMap {
        &self.column_map
    }

    /// Adds a column for the header text `raw` unless its key is blank or
    /// already present. Returns the key `raw` resolves to.
    pub fn append(&mut self, raw: &str) -> Result<Option<Key>> {
        self.append_header(Some(&Value::from(raw)))
    }

    pub fn append_header(&mut self, raw: Option<&Value>) -> Result<Option<Key>> {
        let column = Column::from_header(raw, &self.column_map)?;
        Ok(self.append_column(column))
    }

    pub fn append_column(&mut self, column: Column) -> Option<Key> {
        let key = column.key()?.clone();
        if !self.positions.contains_key(&key) {
            debug!("Adding column '{key}' at position {}", self.columns.len());
            self.push(column);
        }
        Some(key)
    }

    /// Removes the column for `key` and closes the gap it leaves.
    pub fn delete(&mut self, key: &str) -> Option<Column> {
        let position = self.position(key)?;
        let removed = self.columns.remove(position);
        self.renderers.remove(key);
        self.reindex();
        debug!("Deleted column '{key}' from position {position}");
        Some(removed)
    }

    /// Renderer for `key`: its own, else the table-wide one, else [`DefaultRenderer`].
    pub fn renderer(&self, key: Option<&Key>) -> &dyn Renderer {
        key.and_then(|key| self.renderers.get(key))
            .or(self.renderer.as_ref())
            .map(|renderer| &**renderer)
            .unwrap_or(&DefaultRenderer)
    }

    pub(crate) fn set_renderer(&mut self, renderer: Rc<dyn Renderer>) {
        self.renderer = Some(renderer);
    }

    pub(crate) fn set_column_renderer(&mut self, key: Key, renderer: Rc<dyn Renderer>) {
        self.renderers.insert(key, renderer);
    }

    fn push(&mut self, column: Column) {
        if let Some(key) = column.key() {
            self.positions.insert(key.clone(), self.columns.len());
        }
        self.columns.push(column);
    }

    fn reindex(&mut self) {
        self.positions = self
            .columns
            .iter()
            .enumerate()
            .filter_map(|(position, column)| column.key().map(|key| (key.clone(), position)))
            .collect();
    }
}

impl<'a> IntoIterator for &'a Columns {
    type Item = &'a Column;
    type IntoIter = std::slice::Iter<'a, Column>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.iter()
    }
}

impl fmt::Debug for Columns {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Columns")
            .field("columns", &self.columns)
            .field("positions", &self.positions)
            .field("renderers", &self.renderers.keys().collect::<Vec<_>>())
            .finish()
    }
}

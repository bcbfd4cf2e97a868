//! Custom display of headers and cells.
//!
//! Implement [`Renderer`] and register it with
//! [`Table::set_renderer`](crate::table::Table::set_renderer) for every column or
//! [`Table::set_column_renderer`](crate::table::Table::set_column_renderer) for one.

use crate::{column::ColumnRef, data::Cell, error::Result, row::RowRef};

pub trait Renderer {
    fn render_header(&self, column: &ColumnRef<'_>) -> String {
        column.to_string()
    }

    fn render(&self, column: &ColumnRef<'_>, row: &RowRef<'_>) -> Result<Cell> {
        match column.key() {
            Some(key) => row.get(key.as_str()),
            None => Ok(None),
        }
    }
}

/// Header text is the key; cells are the coerced values.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultRenderer;

impl Renderer for DefaultRenderer {}

//! Declared column map: caller configuration that renames or types columns.
//!
//! Entries are keyed by the normalized form of the original header. Each
//! entry is kept as the YAML value it was written as and interpreted when a
//! column is built, so a malformed entry is reported against the header that
//! hits it:
//!
//! ```yaml
//! nom: name                    # rename
//! homme:                       # structured declaration
//!   column_type: boolean
//! ```

use std::{fs, path::Path};

use serde_yaml::{Mapping, Value as YamlValue};

use crate::{
    column::ColumnType,
    error::{Result, TabularError},
    keys::{self, Key},
};

const COLUMN_TYPE_FIELD: &str = "column_type";

/// What a declared column map says about one key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declaration {
    Rename(Key),
    Typed(ColumnType),
}

#[derive(Debug, Clone, Default)]
pub struct ColumnMap {
    entries: Vec<(Key, YamlValue)>,
}

impl ColumnMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(TabularError::MissingFile(path.to_path_buf()));
        }
        let raw = fs::read_to_string(path)?;
        Self::from_yaml_str(&raw)
    }

    pub fn from_yaml_str(input: &str) -> Result<Self> {
        if input.trim().is_empty() {
            return Ok(Self::default());
        }
        let document: YamlValue = serde_yaml::from_str(input)?;
        match document {
            YamlValue::Null => Ok(Self::default()),
            YamlValue::Mapping(mapping) => Self::from_mapping(mapping),
            other => Err(TabularError::configuration(
                "<root>",
                format!("column map must be a mapping, found {other:?}"),
            )),
        }
    }

    fn from_mapping(mapping: Mapping) -> Result<Self> {
        let mut map = Self::default();
        for (raw_key, declaration) in mapping {
            let header = match raw_key {
                YamlValue::String(text) => text,
                YamlValue::Number(number) => number.to_string(),
                YamlValue::Bool(flag) => flag.to_string(),
                other => {
                    return Err(TabularError::configuration(
                        format!("{other:?}"),
                        "column map keys must be scalars",
                    ));
                }
            };
            map.insert(&header, declaration);
        }
        Ok(map)
    }

    /// Registers a raw declaration for `header`. A later entry for a header that
    /// normalizes to the same key replaces the earlier one. Blank headers are ignored.
    pub fn insert(&mut self, header: &str, declaration: YamlValue) -> &mut Self {
        if let Some(key) = keys::normalize_str(header) {
            self.entries.retain(|(existing, _)| *existing != key);
            self.entries.push((key, declaration));
        }
        self
    }

    pub fn rename(&mut self, from: &str, to: &str) -> &mut Self {
        self.insert(from, YamlValue::String(to.to_string()))
    }

    pub fn declare(&mut self, header: &str, column_type: ColumnType) -> &mut Self {
        let mut declaration = Mapping::new();
        declaration.insert(
            YamlValue::String(COLUMN_TYPE_FIELD.to_string()),
            YamlValue::String(column_type.to_string()),
        );
        self.insert(header, YamlValue::Mapping(declaration))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Interprets the entry for `key`, if any.
    pub fn declaration(&self, key: &Key) -> Result<Option<Declaration>> {
        let Some((_, raw)) = self.entries.iter().find(|(existing, _)| existing == key) else {
            return Ok(None);
        };
        parse_declaration(key, raw).map(Some)
    }
}

fn parse_declaration(key: &Key, raw: &YamlValue) -> Result<Declaration> {
    match raw {
        YamlValue::String(target) => keys::normalize_str(target)
            .map(Declaration::Rename)
            .ok_or_else(|| {
                TabularError::configuration(key.as_str(), "rename target is blank")
            }),
        YamlValue::Mapping(mapping) => {
            let column_type = mapping
                .get(COLUMN_TYPE_FIELD)
                .and_then(YamlValue::as_str)
                .ok_or_else(|| {
                    TabularError::configuration(
                        key.as_str(),
                        format!("structured declaration requires a string '{COLUMN_TYPE_FIELD}'"),
                    )
                })?;
            Ok(Declaration::Typed(ColumnType::from_name(column_type)))
        }
        other => Err(TabularError::configuration(
            key.as_str(),
            format!("expected a column name or a '{COLUMN_TYPE_FIELD}' mapping, found {other:?}"),
        )),
    }
}

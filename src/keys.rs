//! Canonical column keys.
//!
//! Every header, whatever its source (a CSV header line, a key of an
//! in-process record, a key passed to a cell write), is reduced to a
//! lower-case, underscore-separated [`Key`] by [`normalize`]. Headers that
//! are blank, or that normalize to nothing, produce no key at all.

use std::{borrow::Borrow, fmt, sync::OnceLock};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{data::Value, error::TabularError};

/// A normalized column key. Deserializing runs the text through [`normalize_str`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Key(String);

impl Key {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Keys that end in `?` name boolean columns.
    pub fn is_predicate(&self) -> bool {
        self.0.ends_with('?')
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Key {
    type Error = TabularError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        normalize_str(&raw)
            .ok_or_else(|| TabularError::configuration(raw, "key is blank after normalization"))
    }
}

impl From<Key> for String {
    fn from(key: Key) -> Self {
        key.0
    }
}

impl Borrow<str> for Key {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Key {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Key {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Key {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Key for an arbitrary header cell. Blank cells (null, `false`, whitespace)
/// have no key.
pub fn normalize(raw: Option<&Value>) -> Option<Key> {
    match raw {
        None => None,
        Some(value) if value.is_blank() => None,
        Some(Value::String(text)) => normalize_str(text),
        Some(other) => normalize_str(&other.as_display()),
    }
}

/// Key for header text: `"StartDate"`, `"Start Date"` and `"start-date"` all
/// become `start_date`.
pub fn normalize_str(raw: &str) -> Option<Key> {
    let symbolized = symbolize(raw);
    if symbolized.is_empty() {
        None
    } else {
        Some(Key(symbolized))
    }
}

fn symbolize(raw: &str) -> String {
    let text = raw.replace(';', "");
    let text = text.trim().replace("::", "/");
    let text = acronym_boundary().replace_all(&text, "${1}_${2}");
    let text = camel_boundary().replace_all(&text, "${1}_${2}");
    let text = text.replace('-', "_");
    let text = space_run().replace_all(&text, "_");
    text.to_lowercase()
}

fn acronym_boundary() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"([A-Z]+)([A-Z][a-z])").expect("valid acronym pattern"))
}

fn camel_boundary() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"([a-z\d])([A-Z])").expect("valid camel case pattern"))
}

fn space_run() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r" +").expect("valid space pattern"))
}

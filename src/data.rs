use std::{cmp::Ordering, fmt, sync::OnceLock};

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// A single table cell. `None` is the null cell.
pub type Cell = Option<Value>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Value {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl Value {
    pub fn as_display(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            Value::Integer(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Boolean(b) => b.to_string(),
            Value::Date(d) => d.format("%Y-%m-%d").to_string(),
            Value::DateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_temporal(&self) -> bool {
        matches!(self, Value::Date(_) | Value::DateTime(_))
    }

    /// Blank: `false` and whitespace-only strings. Numbers, `true`, and dates are never blank.
    pub fn is_blank(&self) -> bool {
        match self {
            Value::String(s) => s.trim().is_empty(),
            Value::Boolean(b) => !b,
            Value::Integer(_) | Value::Float(_) | Value::Date(_) | Value::DateTime(_) => false,
        }
    }

    /// Zero: numeric zero, `"0"`, or a `0.0`-shaped string such as `"000.00"`.
    pub fn is_zero(&self) -> bool {
        match self {
            Value::Integer(i) => *i == 0,
            Value::Float(f) => *f == 0.0,
            Value::String(s) => s == "0" || zero_decimal_pattern().is_match(s),
            Value::Boolean(_) | Value::Date(_) | Value::DateTime(_) => false,
        }
    }

    /// Numeric reading used for display precision. Unparseable text reads as `0.0`.
    pub fn to_f64(&self) -> f64 {
        match self {
            Value::Integer(i) => *i as f64,
            Value::Float(f) => *f,
            Value::String(s) => s.trim().parse().unwrap_or(0.0),
            Value::Boolean(_) | Value::Date(_) | Value::DateTime(_) => 0.0,
        }
    }
}

impl PartialOrd for Value {
    /// Only values of the same kind are ordered.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            (Value::Integer(a), Value::Integer(b)) => Some(a.cmp(b)),
            (Value::Float(a), Value::Float(b)) => Some(a.total_cmp(b)),
            (Value::Boolean(a), Value::Boolean(b)) => Some(a.cmp(b)),
            (Value::Date(a), Value::Date(b)) => Some(a.cmp(b)),
            (Value::DateTime(a), Value::DateTime(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_display())
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Value::Date(value)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(value: NaiveDateTime) -> Self {
        Value::DateTime(value)
    }
}

/// Null cells are blank.
pub fn is_blank(cell: Option<&Value>) -> bool {
    cell.is_none_or(Value::is_blank)
}

/// Null cells are not zero.
pub fn is_zero(cell: Option<&Value>) -> bool {
    cell.is_some_and(Value::is_zero)
}

/// Text form of a cell; null renders as the empty string.
pub fn display_cell(cell: Option<&Value>) -> String {
    cell.map(Value::as_display).unwrap_or_default()
}

fn zero_decimal_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^0+\.0+$").expect("valid zero pattern"))
}

/// Calendar-date parse of ISO-style year-first dates (optionally with a time
/// part), day-first `d/m/yyyy` dates and dates with a spelled-out month.
/// Month-first and two-digit-year slash dates are left to [`parse_slash_date`].
pub fn parse_naive_date(value: &str) -> Option<NaiveDate> {
    const YEAR_FIRST_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y%m%d", "%Y.%m.%d"];
    const YEAR_FIRST_DATETIME_FORMATS: &[&str] = &[
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ];
    const DAY_FIRST_FORMAT: &str = "%d/%m/%Y";
    const MONTH_NAME_FORMATS: &[&str] = &[
        "%d %B %Y",
        "%d-%B-%Y",
        "%B %d %Y",
        "%B %d, %Y",
        "%A %B %d %Y",
        "%A, %d %B %Y",
    ];

    let value = value.trim();
    let leading_digits = value.chars().take_while(char::is_ascii_digit).count();
    if leading_digits == 4 || leading_digits == 8 {
        for fmt in YEAR_FIRST_FORMATS {
            if let Ok(parsed) = NaiveDate::parse_from_str(value, fmt) {
                return Some(parsed);
            }
        }
        for fmt in YEAR_FIRST_DATETIME_FORMATS {
            if let Ok(parsed) = NaiveDateTime::parse_from_str(value, fmt) {
                return Some(parsed.date());
            }
        }
        return None;
    }
    if has_four_digit_year(value)
        && let Ok(parsed) = NaiveDate::parse_from_str(value, DAY_FIRST_FORMAT)
    {
        return Some(parsed);
    }
    MONTH_NAME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
}

// `%Y` alone would also accept `08` as the year 8.
fn has_four_digit_year(value: &str) -> bool {
    value
        .rsplit_once('/')
        .is_some_and(|(_, year)| year.len() == 4 && year.bytes().all(|b| b.is_ascii_digit()))
}

/// Reads `month/day/year` with a one-, two- or four-digit year.
///
/// Two-digit years 00-68 land in 2000-2068 and 70-99 in 1970-1999; 69 is
/// rejected as ambiguous. Years of three or more digits must fall within
/// 1900-2050.
pub fn parse_slash_date(value: &str) -> Option<NaiveDate> {
    let parts = value
        .trim()
        .split('/')
        .map(|part| part.parse::<u32>().ok())
        .collect::<Option<Vec<_>>>()?;
    let [month, day, year] = parts[..] else {
        return None;
    };
    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return None;
    }
    let year = add_century(year)?;
    NaiveDate::from_ymd_opt(year, month, day)
}

fn add_century(year: u32) -> Option<i32> {
    let year = i32::try_from(year).ok()?;
    match year {
        0..=68 => Some(2000 + year),
        69 => None,
        70..=99 => Some(1900 + year),
        1900..=2050 => Some(year),
        _ => None,
    }
}

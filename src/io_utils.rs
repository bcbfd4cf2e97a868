//! Delimited-file ingestion.
//!
//! Turns a CSV or tab-delimited file into the raw [`Record`]s a
//! [`Table`](crate::table::Table) is built from. The core never sees the file:
//!
//! - **Format**: taken from [`ReadOptions::format`] or the file extension
//!   (`.csv` comma, `.txt`/`.tsv` tab). Spreadsheets are rejected.
//! - **Encoding**: input decoded via `encoding_rs`, defaulting to UTF-8.
//! - **stdin**: the `-` path reads standard input.
//! - Records may have different lengths; every field becomes a string cell.

use std::{
    fs::File,
    io::{BufReader, Read},
    path::Path,
};

use clap::ValueEnum;
use encoding_rs::{Encoding, UTF_8};
use log::debug;

use crate::{
    data::Value,
    error::{Result, TabularError},
    row::Record,
};

pub const DEFAULT_CSV_DELIMITER: u8 = b',';
pub const DEFAULT_TXT_DELIMITER: u8 = b'\t';

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Csv,
    Txt,
    Xls,
    Xlsx,
}

impl Format {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        if ext.eq_ignore_ascii_case("csv") {
            Some(Format::Csv)
        } else if ext.eq_ignore_ascii_case("txt") || ext.eq_ignore_ascii_case("tsv") {
            Some(Format::Txt)
        } else if ext.eq_ignore_ascii_case("xls") {
            Some(Format::Xls)
        } else if ext.eq_ignore_ascii_case("xlsx") {
            Some(Format::Xlsx)
        } else {
            None
        }
    }

    pub fn delimiter(self) -> Result<u8> {
        match self {
            Format::Csv => Ok(DEFAULT_CSV_DELIMITER),
            Format::Txt => Ok(DEFAULT_TXT_DELIMITER),
            Format::Xls => Err(TabularError::UnsupportedFormat("xls".to_string())),
            Format::Xlsx => Err(TabularError::UnsupportedFormat("xlsx".to_string())),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReadOptions {
    /// Overrides the format implied by the file extension.
    pub format: Option<Format>,
    /// Encoding label such as `windows-1252`.
    pub encoding: Option<String>,
}

pub fn is_dash(path: &Path) -> bool {
    path == Path::new("-")
}

pub fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding> {
    if let Some(value) = label {
        Encoding::for_label(value.trim().as_bytes())
            .ok_or_else(|| TabularError::UnknownEncoding(value.to_string()))
    } else {
        Ok(UTF_8)
    }
}

pub fn resolve_format(path: &Path, provided: Option<Format>) -> Result<Format> {
    if let Some(format) = provided {
        return Ok(format);
    }
    if is_dash(path) {
        return Ok(Format::Csv);
    }
    Format::from_path(path).ok_or_else(|| {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();
        TabularError::UnsupportedFormat(ext.to_string())
    })
}

pub fn open_csv_reader<R>(reader: R, delimiter: u8) -> csv::Reader<R>
where
    R: Read,
{
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(false)
        .delimiter(delimiter)
        .double_quote(true)
        .flexible(true);
    builder.from_reader(reader)
}

pub fn open_input(path: &Path) -> Result<Box<dyn Read>> {
    if is_dash(path) {
        return Ok(Box::new(std::io::stdin().lock()));
    }
    if !path.exists() {
        return Err(TabularError::MissingFile(path.to_path_buf()));
    }
    Ok(Box::new(BufReader::new(File::open(path)?)))
}

pub fn decode_bytes(bytes: &[u8], encoding: &'static Encoding) -> Result<String> {
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        Err(TabularError::Decode(encoding.name()))
    } else {
        Ok(text.into_owned())
    }
}

pub fn decode_record(record: &csv::ByteRecord, encoding: &'static Encoding) -> Result<Vec<String>> {
    record
        .iter()
        .map(|field| decode_bytes(field, encoding))
        .collect()
}

/// Every line of the file, header included, as a positional record.
pub fn read_records(path: &Path, options: &ReadOptions) -> Result<Vec<Record>> {
    let format = resolve_format(path, options.format)?;
    let delimiter = format.delimiter()?;
    let encoding = resolve_encoding(options.encoding.as_deref())?;
    let mut reader = open_csv_reader(open_input(path)?, delimiter);

    let mut records = Vec::new();
    for record in reader.byte_records() {
        let fields = decode_record(&record?, encoding)?;
        records.push(Record::Positional(
            fields.into_iter().map(|field| Some(Value::String(field))).collect(),
        ));
    }
    debug!(
        "Read {} record(s) from {:?} as {:?} ({})",
        records.len(),
        path,
        format,
        encoding.name()
    );
    Ok(records)
}

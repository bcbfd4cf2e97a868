use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::io_utils::Format;

#[derive(Debug, Parser)]
#[command(author, version, about = "Load delimited files into typed, keyed tables", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print a file as a space-aligned table, optionally cleaned up first
    Show(ShowArgs),
    /// List the columns a file produces with their keys, types, and widths
    Columns(ColumnsArgs),
}

#[derive(Debug, Args)]
pub struct InputArgs {
    /// Input file (`-` reads stdin as CSV)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Read the input as this format instead of guessing from the extension
    #[arg(long = "as", value_enum)]
    pub format: Option<Format>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// YAML file renaming or typing columns by their original header
    #[arg(short = 'm', long = "column-map")]
    pub column_map: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    #[command(flatten)]
    pub input: InputArgs,
    /// Trim whitespace around cells and print whole-number floats as integers
    #[arg(long)]
    pub strip: bool,
    /// Drop columns whose cells are all blank or zero
    #[arg(long = "delete-blank-columns")]
    pub delete_blank_columns: bool,
    /// Drop columns holding the same value in every row
    #[arg(long = "delete-homogenous-columns")]
    pub delete_homogenous_columns: bool,
    /// Drop rows whose cells are all blank
    #[arg(long = "delete-blank-rows")]
    pub delete_blank_rows: bool,
    /// Column keys the column deletions must keep
    #[arg(long = "except", value_delimiter = ',')]
    pub except: Vec<String>,
}

#[derive(Debug, Args)]
pub struct ColumnsArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

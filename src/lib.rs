pub mod cli;
pub mod column;
pub mod column_map;
pub mod columns;
pub mod data;
pub mod error;
pub mod io_utils;
pub mod keys;
pub mod renderer;
pub mod row;
pub mod table;

use std::{env, sync::OnceLock};

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, info};

use crate::{
    cli::{Cli, ColumnsArgs, Commands, InputArgs, ShowArgs},
    column_map::ColumnMap,
    io_utils::ReadOptions,
    table::Table,
};

pub use crate::{
    column::{Column, ColumnRef, ColumnType},
    columns::Columns,
    data::{Cell, Value},
    error::TabularError,
    keys::Key,
    renderer::{DefaultRenderer, Renderer},
    row::{Record, Row, RowMapper, RowMut, RowRef},
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("tabular", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Show(args) => handle_show(&args),
        Commands::Columns(args) => handle_columns(&args),
    }
}

fn load_table(args: &InputArgs) -> Result<Table> {
    let column_map = match &args.column_map {
        Some(path) => ColumnMap::load(path)
            .with_context(|| format!("Loading column map from {path:?}"))?,
        None => ColumnMap::new(),
    };
    let options = ReadOptions {
        format: args.format,
        encoding: args.input_encoding.clone(),
    };
    let mut table = Table::with_column_map(column_map);
    table
        .read(&args.input, &options)
        .with_context(|| format!("Reading {:?}", args.input))?;
    info!(
        "Loaded {} row(s) across {} column(s) from {:?}",
        table.len(),
        table.columns().len(),
        args.input
    );
    Ok(table)
}

fn handle_show(args: &ShowArgs) -> Result<()> {
    let mut table = load_table(&args.input)?;
    let except = args
        .except
        .iter()
        .filter_map(|raw| keys::normalize_str(raw))
        .collect::<Vec<_>>();
    let except = except.iter().map(Key::as_str).collect::<Vec<_>>();

    if args.delete_blank_rows {
        table.delete_blank_rows();
    }
    if args.strip {
        table.strip().context("Stripping cells")?;
    }
    if args.delete_blank_columns {
        table
            .delete_blank_columns(&except)
            .context("Deleting blank columns")?;
    }
    if args.delete_homogenous_columns {
        table
            .delete_homogenous_columns(&except)
            .context("Deleting homogenous columns")?;
    }

    let rendered = table.to_space_delimited().context("Rendering table")?;
    print!("{rendered}");
    info!(
        "Displayed {} row(s) across {} column(s)",
        table.len(),
        table.columns().keys().count()
    );
    Ok(())
}

fn handle_columns(args: &ColumnsArgs) -> Result<()> {
    let table = load_table(&args.input)?;
    for (position, column) in table.column_refs().enumerate() {
        let width = column
            .width()
            .with_context(|| format!("Measuring column '{column}'"))?;
        println!(
            "{position}\t{key}\t{column_type}\t{width}",
            key = column,
            column_type = column.column_type(),
        );
    }
    Ok(())
}

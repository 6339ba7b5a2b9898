//! Delimited table I/O shared by the command-line tool and the tests.

use polars::prelude::*;
use std::fs::File;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("Error from the underlying Polars library: {0}")]
    Polars(#[from] PolarsError),
    #[error("IO error on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Tab for `.tsv`, `.tab` and `.txt` files, comma otherwise.
pub fn delimiter_for(path: &Path) -> u8 {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .as_deref()
    {
        Some("tsv") | Some("tab") | Some("txt") => b'\t',
        _ => b',',
    }
}

/// Reads a delimited table with a header row.
pub fn read_table(path: &str, separator: Option<u8>) -> Result<DataFrame, TableError> {
    let path_ref = Path::new(path);
    let separator = separator.unwrap_or_else(|| delimiter_for(path_ref));
    let file = File::open(path_ref).map_err(|source| TableError::Io {
        path: path.to_string(),
        source,
    })?;
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .map_parse_options(|options| options.with_separator(separator))
        .into_reader_with_file_handle(file)
        .finish()?;
    log::debug!(
        "Read {} rows x {} columns from '{}'",
        df.height(),
        df.width(),
        path
    );
    Ok(df)
}

/// Writes `df` as a delimited table with a header row.
pub fn write_table(df: &mut DataFrame, path: &str, separator: Option<u8>) -> Result<(), TableError> {
    let path_ref = Path::new(path);
    let separator = separator.unwrap_or_else(|| delimiter_for(path_ref));
    let mut file = File::create(path_ref).map_err(|source| TableError::Io {
        path: path.to_string(),
        source,
    })?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .with_separator(separator)
        .finish(df)?;
    Ok(())
}

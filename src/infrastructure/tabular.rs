//! Tabular input source and output sink (CSV)
//!
//! Input headers are normalised (trimmed, upper-cased) before the required
//! column check, and must stay distinct after normalisation. Rows shorter than
//! the header are padded with empty cells.
//!
//! Output columns are every input column in first-seen order, followed by the
//! observation columns. Absent values are written as empty cells.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use crate::domain::record::normalize_column_name;
use crate::domain::{InputRow, OutputRecord};

#[derive(Error, Debug)]
pub enum TabularError {
    #[error("Failed to read input {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Input {path:?} is missing required columns: {missing:?}")]
    MissingColumns { path: PathBuf, missing: Vec<String> },

    #[error("Input {path:?} has columns that collide once normalised: {columns:?}")]
    DuplicateColumns { path: PathBuf, columns: Vec<String> },

    #[error("Failed to create output directory {path:?}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write output {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Read every input row, failing before any processing if a required column is missing.
pub fn read_input_rows(
    path: &Path,
    required_columns: &[String],
) -> Result<Vec<InputRow>, TabularError> {
    let file = std::fs::File::open(path).map_err(|e| TabularError::Read {
        path: path.to_path_buf(),
        source: csv::Error::from(e),
    })?;
    let rows = read_input_rows_from(file, path, required_columns)?;
    info!("Loaded {} input rows from {:?}", rows.len(), path);
    Ok(rows)
}

/// Same as [`read_input_rows`] over any reader; `origin` only labels errors.
pub fn read_input_rows_from<R: Read>(
    reader: R,
    origin: &Path,
    required_columns: &[String],
) -> Result<Vec<InputRow>, TabularError> {
    let read_err = |source| TabularError::Read {
        path: origin.to_path_buf(),
        source,
    };

    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers: Vec<String> = rdr
        .headers()
        .map_err(read_err)?
        .iter()
        .map(normalize_column_name)
        .collect();

    let mut duplicates: Vec<String> = Vec::new();
    for (i, name) in headers.iter().enumerate() {
        if headers[..i].contains(name) && !duplicates.contains(name) {
            duplicates.push(name.clone());
        }
    }
    if !duplicates.is_empty() {
        return Err(TabularError::DuplicateColumns {
            path: origin.to_path_buf(),
            columns: duplicates,
        });
    }

    let missing: Vec<String> = required_columns
        .iter()
        .map(|c| normalize_column_name(c))
        .filter(|c| !headers.contains(c))
        .collect();
    if !missing.is_empty() {
        return Err(TabularError::MissingColumns {
            path: origin.to_path_buf(),
            missing,
        });
    }

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record.map_err(read_err)?;
        let cells = headers
            .iter()
            .enumerate()
            .map(|(i, name)| (name, record.get(i).unwrap_or("")));
        rows.push(InputRow::from_pairs(cells));
    }
    Ok(rows)
}

/// Persist records as one table, creating the parent directory if needed.
pub fn write_output_records(path: &Path, records: &[OutputRecord]) -> Result<usize, TabularError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| TabularError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let file = std::fs::File::create(path).map_err(|e| TabularError::Write {
        path: path.to_path_buf(),
        source: csv::Error::from(e),
    })?;
    let written = write_output_records_to(file, records).map_err(|source| TabularError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    info!("Saved {} rows to {:?}", written, path);
    Ok(written)
}

pub fn write_output_records_to<W: Write>(
    writer: W,
    records: &[OutputRecord],
) -> Result<usize, csv::Error> {
    let flattened: Vec<Vec<(String, Option<String>)>> =
        records.iter().map(OutputRecord::to_columns).collect();

    let mut input_header: Vec<&str> = Vec::new();
    let mut observed_header: Vec<&str> = Vec::new();
    for (record, columns) in records.iter().zip(&flattened) {
        let (input, observed) = columns.split_at(record.input.columns().len());
        extend_unique(&mut input_header, input);
        extend_unique(&mut observed_header, observed);
    }
    let header: Vec<&str> = input_header.into_iter().chain(observed_header).collect();

    let mut wtr = csv::Writer::from_writer(writer);
    if !header.is_empty() {
        wtr.write_record(&header)?;
    }

    for columns in &flattened {
        let values: HashMap<&str, &str> = columns
            .iter()
            .filter_map(|(name, value)| value.as_deref().map(|v| (name.as_str(), v)))
            .collect();
        wtr.write_record(header.iter().map(|name| values.get(name).copied().unwrap_or("")))?;
    }
    wtr.flush()?;
    Ok(flattened.len())
}

fn extend_unique<'a>(header: &mut Vec<&'a str>, columns: &'a [(String, Option<String>)]) {
    for (name, _) in columns {
        if !header.contains(&name.as_str()) {
            header.push(name);
        }
    }
}

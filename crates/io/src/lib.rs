// File I/O operations

pub mod csv;
pub mod error;
pub mod xlsx;

use std::path::Path;

use namelink_recon::config::OutputFormat;
use namelink_recon::model::Table;

pub use error::IoError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// Delimiter sniffed from content
    Csv,
    Tsv,
    Excel,
}

impl InputFormat {
    pub fn from_path(path: &Path) -> Result<Self, IoError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "csv" | "txt" => Ok(Self::Csv),
            "tsv" | "tab" => Ok(Self::Tsv),
            "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => Ok(Self::Excel),
            "" => Err(IoError::UnsupportedFormat("(no extension)".into())),
            other => Err(IoError::UnsupportedFormat(format!(".{other}"))),
        }
    }
}

/// Load a table, picking the reader from the file extension.
/// The first row is the header row.
pub fn read_table(path: &Path) -> Result<Table, IoError> {
    if !path.exists() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }
    let table = match InputFormat::from_path(path)? {
        InputFormat::Csv => crate::csv::import(path)?,
        InputFormat::Tsv => crate::csv::import_with_delimiter(path, b'\t')?,
        InputFormat::Excel => xlsx::import(path)?,
    };
    log::info!(
        "Loaded {} records from {} (columns: {})",
        table.len(),
        path.display(),
        table.headers.join(", ")
    );
    Ok(table)
}

pub fn write_table(table: &Table, path: &Path, format: OutputFormat) -> Result<(), IoError> {
    match format {
        OutputFormat::Csv => crate::csv::export(table, path),
        OutputFormat::Xlsx => xlsx::export(table, path),
    }
}

/// Make header names unique by suffixing repeats with `.1`, `.2`, ...
pub(crate) fn dedupe_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::with_capacity(headers.len());
    for h in headers {
        let mut candidate = h.clone();
        let mut n = 1;
        while seen.contains(&candidate) {
            candidate = format!("{h}.{n}");
            n += 1;
        }
        seen.push(candidate);
    }
    seen
}

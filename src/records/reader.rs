use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Errors that abort the normalization of a feed.
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed record in {path:?} at line {line}: {source}")]
    Parse {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid {field} in {path:?} at line {line}: {reason}")]
    InvalidField {
        path: PathBuf,
        line: usize,
        field: &'static str,
        reason: String,
    },
}

/// Parses a line-delimited JSON file, one record per non-blank line.
///
/// Records come back paired with their 1-based line number.
pub fn read_json_lines<T: DeserializeOwned>(path: &Path) -> Result<Vec<(usize, T)>, NormalizeError> {
    let io_error = |source| NormalizeError::Io {
        path: path.to_path_buf(),
        source,
    };
    let reader = BufReader::new(File::open(path).map_err(io_error)?);

    let mut records = Vec::new();
    for (index, line_result) in reader.lines().enumerate() {
        let line = line_result.map_err(io_error)?;
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(&line).map_err(|source| NormalizeError::Parse {
            path: path.to_path_buf(),
            line: index + 1,
            source,
        })?;
        records.push((index + 1, record));
    }

    debug!("Read {} records from {}", records.len(), path.display());
    Ok(records)
}

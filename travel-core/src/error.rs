use std::path::PathBuf;

use thiserror::Error;

/// Problems the record store reports to its caller
#[derive(Debug, Error)]
pub enum StoreError {
    /// Data file was not present when loading
    #[error("{} not found", path.display())]
    FileMissing { path: PathBuf },

    /// Data file exists but could not be opened or read
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A row could not be read or coerced into a record
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Saving a collection or appending a row failed
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// No record matched the key
    #[error("{kind} '{key}' not found")]
    LookupMiss { kind: &'static str, key: String },

    /// Username and password did not match any user
    #[error("invalid credentials for '{username}'")]
    AuthFailure { username: String },
}

impl StoreError {
    pub(crate) fn write(path: impl Into<PathBuf>, source: impl Into<csv::Error>) -> Self {
        StoreError::Write {
            path: path.into(),
            source: source.into(),
        }
    }

    pub(crate) fn parse(path: impl Into<PathBuf>, source: impl Into<csv::Error>) -> Self {
        StoreError::Parse {
            path: path.into(),
            source: source.into(),
        }
    }
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

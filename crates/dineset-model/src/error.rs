//! Error taxonomy for the pipeline edges.
//!
//! Only two failure classes exist: a missing required input table (fatal,
//! raised before any generation starts) and I/O or CSV trouble while
//! reading/writing a table. Empty-candidate skips during sampling are not
//! errors; the stage builders count and log them.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatasetError {
    /// A stage was asked to run before its upstream tables exist.
    #[error("missing required input table: {}", path.display())]
    MissingInput { path: PathBuf },

    #[error("failed to read table {}: {source}", path.display())]
    ReadTable {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to write table {}: {source}", path.display())]
    WriteTable {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

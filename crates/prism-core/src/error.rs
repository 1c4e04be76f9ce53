use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PrismError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("raster not found: {0}")]
    NotFound(PathBuf),

    #[error("unreadable raster {path}: {reason}")]
    Format { path: PathBuf, reason: String },

    #[error("{band} is on a {found_rows}x{found_cols} grid, expected {expected_rows}x{expected_cols}")]
    GridMismatch {
        band: String,
        expected_rows: usize,
        expected_cols: usize,
        found_rows: usize,
        found_cols: usize,
    },

    #[error("cannot standardize {0}: zero variance")]
    DegenerateBand(String),

    #[error("decomposition failed: {0}")]
    Decomposition(String),

    #[error("unsupported output format: {0}")]
    UnsupportedFormat(String),

    #[error("band index {index} out of range (total: {total})")]
    BandIndexOutOfRange { index: usize, total: usize },

    #[error("empty band stack")]
    EmptyStack,

    #[error("TIFF error: {0}")]
    Tiff(#[from] tiff::TiffError),
}

pub type Result<T> = std::result::Result<T, PrismError>;

//! Error types.
//!
//! Most failures in this crate are expected outcomes (a file that is not a
//! ZIP, a workbook that cannot be read) and end up as an empty result rather
//! than an error. The types here cover what is left.

use calamine::XlsxError;
use thiserror::Error;

/// Why a workbook could not be hashed by its cell content.
///
/// Never escapes [`hash_excel_buffer`](crate::hash_excel_buffer); it is
/// logged and turned into an empty digest so the dispatcher can fall back.
#[derive(Debug, Error)]
pub enum WorkbookError {
    /// The bytes are not a ZIP package, or lack the workbook parts.
    #[error("The provided data is not a valid .xlsx file: {0}")]
    NotXlsx(#[source] XlsxError),

    /// A ZIP package that lists no worksheets.
    #[error("The provided data is not a valid .xlsx file: no worksheets")]
    NoSheets,

    /// The package opened but its sheets could not be read.
    #[error("The Excel file is corrupted or unreadable: {0}")]
    Unreadable(#[source] XlsxError),

    /// The reader panicked.
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl WorkbookError {
    /// Sort a reader error into the "not a workbook" or "unreadable" class.
    pub fn classify(err: XlsxError) -> Self {
        match err {
            XlsxError::Zip(_) | XlsxError::FileNotFound(_) => Self::NotXlsx(err),
            _ => Self::Unreadable(err),
        }
    }
}

/// Failure of the size-and-hash dispatcher.
///
/// Only I/O can fail it: opening the path, or reading an open file.
#[derive(Debug, Error)]
pub enum HashError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, HashError>;

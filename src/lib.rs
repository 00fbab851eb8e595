//! # archash
//!
//! Change detection for downloaded files: a `(size, hash)` pair that moves
//! when the content moves and stays put when only packaging metadata does.
//!
//! Three strategies are combined by [`size_and_hash`]:
//!
//! - ZIP-family files (ZIP, zipped shapefiles...) are identified by the XOR
//!   of the CRC32 values stored in their Central Directory, which ignores
//!   timestamps and entry order and needs no decompression
//! - XLSX workbooks are identified by an MD5 over sheet names and cell
//!   values, so re-saving an unchanged workbook keeps its hash
//! - Everything else, and every failed strategy, falls back to plain MD5
//!
//! Remote archives can be identified without downloading them: the
//! [`zip_tail_range_header`] and [`zip_cd_range_header`] helpers give the
//! two `Range` requests needed, and [`HttpRangeReader`] performs them.
//!
//! The hashes are for change detection only and make no cryptographic
//! claims.
//!
//! ## Example
//!
//! ```no_run
//! let (size, hash) = archash::size_and_hash("boundaries.zip", "shp")?;
//! println!("{size} {hash}");
//! # Ok::<(), archash::HashError>(())
//! ```

pub mod cli;
pub mod error;
pub mod hashing;
pub mod io;
pub mod logging;
pub mod xlsx;
pub mod zip;

pub use cli::Cli;
pub use error::{HashError, WorkbookError};
pub use hashing::{hash_xlsx_with_fallback, md5_hex, size_and_hash, size_and_hash_reader};
pub use io::{HttpOptions, HttpRangeReader};
pub use logging::init_tracing;
pub use xlsx::{hash_excel_buffer, hash_excel_stream};
pub use zip::{
    RangeHeader, ZipCrcs, crc_sum, crc_zip_buffer, crc_zip_stream, zip_cd_range_header,
    zip_crcs_from_buffer, zip_crcs_from_stream, zip_tail_range_header,
};

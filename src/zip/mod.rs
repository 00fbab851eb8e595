//! ZIP Central Directory reading and CRC-based content identity.
//!
//! ## Architecture
//!
//! - [`structures`]: fixed-size ZIP records (EOCD, Central Directory File Header)
//! - [`parser`]: locating the EOCD and walking the Central Directory, from a
//!   buffer or from a seekable stream
//! - [`crc`]: folding per-entry CRC32 values into one order-independent sum
//! - [`range`]: HTTP `Range` headers for fetching only the tail and the
//!   Central Directory of a remote archive
//!
//! ## ZIP Format Overview
//!
//! A ZIP file consists of:
//! 1. Local file headers and compressed data for each file
//! 2. Central Directory with metadata for all files
//! 3. End of Central Directory (EOCD) record at the end
//!
//! The Central Directory already stores a CRC32 of every entry's content, so
//! reading it is enough to tell whether the archive's content changed,
//! without touching the compressed data.
//!
//! ## Limitations
//!
//! - No ZIP64 support: 16-bit record counts and 32-bit offsets only
//! - No multi-disk archive support

mod crc;
mod parser;
mod range;
mod structures;

pub use crc::{crc_sum, crc_zip_buffer, crc_zip_stream};
pub use parser::{
    ZipCrcs, decode_entry_name, find_eocd_signature, parse_central_directory, tail_start,
    zip_crcs_from_buffer, zip_crcs_from_stream,
};
pub use range::{RangeHeader, zip_cd_range_header, zip_tail_range_header};
pub use structures::*;

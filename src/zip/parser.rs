//! Low-level ZIP Central Directory reader.
//!
//! This module recovers the stored CRC32 of every entry in a ZIP-family file
//! (ZIP, XLSX, zipped shapefiles...) without decompressing anything.
//!
//! ## Parsing Strategy
//!
//! ZIP files are designed to be read from the end:
//! 1. Read the tail window (the last `65535 + 22` bytes at most), which is
//!    guaranteed to contain the End of Central Directory (EOCD) record
//! 2. Take the *last* EOCD signature in that window
//! 3. Read the Central Directory it points to and walk its file headers
//!
//! Malformed input is a normal outcome here, not an error: a missing EOCD
//! gives an empty map and a bad file header ends the walk with whatever was
//! collected before it.

use std::borrow::Cow;
use std::collections::HashMap;
use std::io::{self, Read, Seek, SeekFrom};

use tracing::{debug, trace};

use super::structures::*;

/// Mapping from entry path to its stored CRC32.
pub type ZipCrcs = HashMap<String, u32>;

/// Offset where the EOCD search window starts for a file of `size` bytes.
///
/// The window is `min(size, 65535 + 22)` bytes long and ends at the end of
/// the file.
pub fn tail_start(size: u64) -> u64 {
    let read_size = size.min(MAX_COMMENT_SIZE + EndOfCentralDirectory::SIZE as u64);
    size - read_size
}

/// Find the last EOCD record in `tail_data`.
///
/// Searching from the end skips signature-like bytes that may appear earlier
/// in compressed payloads. Returns `None` when no signature is present or
/// the record after the last signature is truncated.
pub fn find_eocd_signature(tail_data: &[u8]) -> Option<EocdDescriptor> {
    let eocd_pos = tail_data
        .windows(EndOfCentralDirectory::SIGNATURE.len())
        .rposition(|w| w == EndOfCentralDirectory::SIGNATURE)?;

    let eocd = EndOfCentralDirectory::from_bytes(&tail_data[eocd_pos..]);
    if eocd.is_none() {
        debug!(eocd_pos, "EOCD signature found but record is truncated");
    }
    eocd.map(|eocd| eocd.descriptor())
}

/// Decode an entry name from the Central Directory.
///
/// Names are decoded as UTF-8; every invalid byte sequence is replaced by
/// U+FFFD so one bad name never discards the rest of the directory.
pub fn decode_entry_name(raw: &[u8]) -> Cow<'_, str> {
    String::from_utf8_lossy(raw)
}

/// Walk up to `num_records` Central Directory File Headers in `data`.
///
/// Directory entries (names ending in `/`) are skipped. Duplicate paths keep
/// the last CRC seen. The walk stops early, returning what it has, when the
/// next header would overrun `data` or its signature does not match.
pub fn parse_central_directory(data: &[u8], num_records: usize) -> ZipCrcs {
    let mut results = ZipCrcs::new();
    let mut offset = 0usize;

    for index in 0..num_records {
        let Some(header) = data.get(offset..).and_then(CentralDirectoryHeader::from_bytes) else {
            trace!(index, offset, "Central Directory walk stopped");
            break;
        };

        let name_start = offset + CentralDirectoryHeader::SIZE;
        let name_end = (name_start + header.file_name_length as usize).min(data.len());
        let file_name = decode_entry_name(&data[name_start..name_end]);

        if !file_name.ends_with('/') {
            results.insert(file_name.into_owned(), header.crc32);
        }

        offset += header.record_len();
    }

    results
}

/// Get the CRC32 of each entry of a ZIP held entirely in memory.
pub fn zip_crcs_from_buffer(buffer: &[u8]) -> ZipCrcs {
    let start = tail_start(buffer.len() as u64) as usize;
    let Some(eocd) = find_eocd_signature(&buffer[start..]) else {
        debug!(size = buffer.len(), "no EOCD record in buffer");
        return ZipCrcs::new();
    };

    let cd_start = (eocd.cd_offset as usize).min(buffer.len());
    let cd_end = (eocd.cd_end as usize).clamp(cd_start, buffer.len());
    parse_central_directory(&buffer[cd_start..cd_end], eocd.total_records as usize)
}

/// Get the CRC32 of each entry of a ZIP from a seekable stream.
///
/// Only the tail window and the Central Directory are read. The stream
/// position is left wherever the last read ended.
///
/// # Errors
///
/// Only I/O errors from the stream itself are returned; a stream that is
/// not a ZIP gives an empty map.
pub fn zip_crcs_from_stream<R: Read + Seek>(reader: &mut R) -> io::Result<ZipCrcs> {
    let size = reader.seek(SeekFrom::End(0))?;
    reader.seek(SeekFrom::Start(tail_start(size)))?;

    let mut tail_data = Vec::new();
    reader.read_to_end(&mut tail_data)?;

    let Some(eocd) = find_eocd_signature(&tail_data) else {
        debug!(size, "no EOCD record in stream");
        return Ok(ZipCrcs::new());
    };

    // cd_size is untrusted; no up-front reservation.
    reader.seek(SeekFrom::Start(eocd.cd_offset))?;
    let mut cd_data = Vec::new();
    reader.by_ref().take(eocd.cd_size()).read_to_end(&mut cd_data)?;

    Ok(parse_central_directory(&cd_data, eocd.total_records as usize))
}
